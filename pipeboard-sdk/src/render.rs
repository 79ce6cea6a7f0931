//! Presentation adapters: JSON encoding and the HTML dashboard.
//!
//! Both adapters return `Result`s. [`render_or_report`] is the single place
//! that decides what a failure looks like to the HTTP client.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use minijinja::{context, Environment};
use pipeboard_types::BoardSnapshot;
use tracing::error;

use crate::error::BoardError;

/// The dashboard shipped with the crate.
pub const DEFAULT_TEMPLATE: &str = include_str!("../templates/pipeline_info.html");

/// Name the dashboard's one-based index helper is registered under.
pub const INDEX_HELPER: &str = "title";

/// Where the dashboard template comes from.
///
/// Sources are asked for the template on every request; nothing is cached.
pub trait TemplateSource: Send + Sync {
    /// Template name, used in error messages and to pick auto-escaping.
    fn name(&self) -> &str;

    fn load(&self) -> Result<Cow<'_, str>, BoardError>;
}

/// The built-in dashboard.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedTemplate;

impl TemplateSource for EmbeddedTemplate {
    fn name(&self) -> &str {
        "pipeline_info.html"
    }

    fn load(&self) -> Result<Cow<'_, str>, BoardError> {
        Ok(Cow::Borrowed(DEFAULT_TEMPLATE))
    }
}

/// A template file read from disk on each request, so edits show up live.
#[derive(Debug, Clone)]
pub struct FileTemplate {
    path: PathBuf,
    name: String,
}

impl FileTemplate {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "pipeline_info.html".to_string());
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TemplateSource for FileTemplate {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<Cow<'_, str>, BoardError> {
        std::fs::read_to_string(&self.path)
            .map(Cow::Owned)
            .map_err(|source| BoardError::TemplateLoad {
                path: self.path.clone(),
                source,
            })
    }
}

/// Encode a snapshot as JSON.
pub fn render_json(snapshot: &BoardSnapshot) -> Result<String, BoardError> {
    Ok(serde_json::to_string(snapshot)?)
}

fn one_based(index: i64) -> i64 {
    index + 1
}

/// Load, parse and render the dashboard for a snapshot.
///
/// The template sees `input`, `output`, `actions` and `log_changes`, plus
/// the [`INDEX_HELPER`] function turning a zero-based index into a
/// one-based one.
pub fn render_dashboard(
    source: &dyn TemplateSource,
    snapshot: &BoardSnapshot,
) -> Result<String, BoardError> {
    let text = source.load()?;

    let mut env = Environment::new();
    env.add_function(INDEX_HELPER, one_based);

    let template = env
        .template_from_named_str(source.name(), &text)
        .map_err(BoardError::TemplateParse)?;

    template
        .render(context! {
            input => &snapshot.input,
            output => &snapshot.output,
            actions => &snapshot.actions,
            log_changes => &snapshot.log_changes,
        })
        .map_err(BoardError::TemplateRender)
}

/// How presentation failures reach the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Failure text goes into the body of a `200 OK` response.
    #[default]
    Lenient,
    /// Same body, but with a `500` status.
    Strict,
}

/// Which read surface a response belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Json,
    Dashboard,
}

impl Surface {
    pub fn content_type(&self) -> &'static str {
        match self {
            Surface::Json => "application/json",
            Surface::Dashboard => "text/html; charset=utf-8",
        }
    }
}

/// A response ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl Rendered {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Turn an adapter result into a response, reporting failures in the body.
pub fn render_or_report(
    surface: Surface,
    result: Result<String, BoardError>,
    policy: ErrorPolicy,
) -> Rendered {
    let err = match result {
        Ok(body) => {
            return Rendered {
                status: 200,
                content_type: surface.content_type(),
                body,
            }
        }
        Err(err) => err,
    };

    let body = match surface {
        Surface::Json => {
            error!(error = %err, "can't encode board snapshot");
            format!("can't get json info: {err}")
        }
        Surface::Dashboard if err.is_template_parse() => {
            error!(error = %err, "can't parse html template");
            format!("<html><body>can't parse html: {err}")
        }
        Surface::Dashboard => {
            error!(error = %err, "can't execute html template");
            format!("<html><body>can't render html: {err}")
        }
    };

    Rendered {
        status: match policy {
            ErrorPolicy::Lenient => 200,
            ErrorPolicy::Strict => 500,
        },
        content_type: match surface {
            Surface::Json => "text/plain; charset=utf-8",
            Surface::Dashboard => surface.content_type(),
        },
        body,
    }
}
