//! Event statuses reported by action plugins.

/// Outcome of an event passing through an action plugin.
///
/// The set is closed: the board always reports every variant, in the order
/// of [`EventStatus::ALL`], for each tracked action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EventStatus {
    /// The event reached the action.
    Received,
    /// The action dropped the event.
    Discarded,
    /// The action let the event through.
    Passed,
    /// The action's match condition did not apply.
    NotMatched,
    /// The event was merged into another one.
    Collapse,
    /// The action is holding the event (e.g. joining multiline logs).
    Hold,
}

impl EventStatus {
    /// Every status in report order.
    pub const ALL: [EventStatus; 6] = [
        EventStatus::Received,
        EventStatus::Discarded,
        EventStatus::Passed,
        EventStatus::NotMatched,
        EventStatus::Collapse,
        EventStatus::Hold,
    ];

    /// Tag used as the counter key and in the JSON encoding.
    pub const fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Received => "received",
            EventStatus::Discarded => "discarded",
            EventStatus::Passed => "passed",
            EventStatus::NotMatched => "not_matched",
            EventStatus::Collapse => "collapse",
            EventStatus::Hold => "hold",
        }
    }

    /// Color the dashboard paints this status with.
    pub const fn color(&self) -> &'static str {
        match self {
            EventStatus::Received => "#0d8bf0",
            EventStatus::Discarded => "red",
            EventStatus::Passed => "green",
            EventStatus::NotMatched => "#8bc34a",
            EventStatus::Collapse => "#009688",
            EventStatus::Hold => "#f050f0",
        }
    }

    /// Parse a counter tag back into a status.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == tag)
    }
}

impl core::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_order_is_fixed() {
        let names: Vec<_> = EventStatus::ALL.iter().map(|s| s.as_str()).collect();
        assert_eq!(
            names,
            ["received", "discarded", "passed", "not_matched", "collapse", "hold"]
        );
    }

    #[test]
    fn colors_match_dashboard_palette() {
        assert_eq!(EventStatus::Received.color(), "#0d8bf0");
        assert_eq!(EventStatus::Discarded.color(), "red");
        assert_eq!(EventStatus::Passed.color(), "green");
        assert_eq!(EventStatus::NotMatched.color(), "#8bc34a");
        assert_eq!(EventStatus::Collapse.color(), "#009688");
        assert_eq!(EventStatus::Hold.color(), "#f050f0");
    }

    #[test]
    fn from_tag_inverts_as_str() {
        for status in EventStatus::ALL {
            assert_eq!(EventStatus::from_tag(status.as_str()), Some(status));
        }
        assert_eq!(EventStatus::from_tag("unknown"), None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_uses_counter_tags() {
        let json = serde_json::to_string(&EventStatus::NotMatched).unwrap();
        assert_eq!(json, "\"not_matched\"");
        let parsed: EventStatus = serde_json::from_str("\"collapse\"").unwrap();
        assert_eq!(parsed, EventStatus::Collapse);
    }
}
