//! Layered configuration for the pipeboard binary.
//!
//! Sources, lowest precedence first: built-in defaults, an optional TOML
//! file, then `PIPEBOARD_*` environment variables (`__` separates nested
//! keys, e.g. `PIPEBOARD_DEMO__WORKERS=8`). Command-line flags are applied
//! on top by the binary.
//!
//! ```toml
//! listen_addr = "127.0.0.1:9000"
//! strict_errors = true
//!
//! [pipeline.input]
//! type = "kafka"
//!
//! [[pipeline.actions]]
//! type = "geoip"
//! metric_name = "geoip"
//!
//! [[pipeline.actions]]
//! type = "discard"
//!
//! [pipeline.output]
//! type = "elasticsearch"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use pipeboard_sdk::{
    ActionPluginInfo, ErrorPolicy, InputPluginInfo, OutputPluginInfo, ServerConfig,
};
use serde::Deserialize;

/// Everything the binary can be configured with.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub listen_addr: String,
    pub json_path: String,
    pub html_path: String,
    /// Dashboard template on disk; the embedded one is used when unset.
    pub template_path: Option<PathBuf>,
    /// Report presentation failures with a 500 instead of a 200.
    pub strict_errors: bool,
    /// Default log filter when `RUST_LOG` is not set.
    pub log_level: String,
    pub pipeline: PipelineSettings,
    pub demo: DemoSettings,
}

impl Default for Settings {
    fn default() -> Self {
        let server = ServerConfig::default();
        Self {
            listen_addr: server.listen_addr,
            json_path: server.json_path,
            html_path: server.html_path,
            template_path: None,
            strict_errors: false,
            log_level: "info".to_string(),
            pipeline: PipelineSettings::default(),
            demo: DemoSettings::default(),
        }
    }
}

/// Plugin identities of the pipeline the board describes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    pub input: InputPluginInfo,
    /// In pipeline order.
    pub actions: Vec<ActionPluginInfo>,
    pub output: OutputPluginInfo,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            input: InputPluginInfo::new("file"),
            actions: vec![
                ActionPluginInfo::new("json_decode"),
                ActionPluginInfo::new("geoip").with_metric("geoip"),
                ActionPluginInfo::new("throttle").with_metric("throttled"),
                ActionPluginInfo::new("mask"),
            ],
            output: OutputPluginInfo::new("kafka"),
        }
    }
}

/// Synthetic load generated by the demo pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DemoSettings {
    pub enabled: bool,
    pub workers: usize,
    /// Pause between batches, per worker.
    pub tick_ms: u64,
    /// Events read per batch.
    pub batch_size: usize,
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            workers: 4,
            tick_ms: 50,
            batch_size: 64,
        }
    }
}

impl Settings {
    /// Load settings from defaults, an optional file and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        let config = builder
            .add_source(
                Environment::with_prefix("PIPEBOARD")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("can't load configuration")?;

        config
            .try_deserialize()
            .context("invalid configuration")
    }

    /// HTTP server configuration for the board.
    pub fn server_config(&self) -> ServerConfig {
        let mut builder = ServerConfig::builder()
            .listen_addr(self.listen_addr.clone())
            .json_path(self.json_path.clone())
            .html_path(self.html_path.clone())
            .error_policy(if self.strict_errors {
                ErrorPolicy::Strict
            } else {
                ErrorPolicy::Lenient
            });
        if let Some(path) = &self.template_path {
            builder = builder.template_path(path.clone());
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_without_sources() {
        let settings = Settings::load(None).unwrap();
        assert_eq!(settings.listen_addr, "0.0.0.0:9000");
        assert_eq!(settings.pipeline.actions.len(), 4);
        assert!(settings.pipeline.actions[1].is_tracked());
        assert!(!settings.pipeline.actions[0].is_tracked());
        assert!(settings.demo.enabled);
    }

    #[test]
    fn file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
listen_addr = "127.0.0.1:9100"
strict_errors = true

[pipeline.input]
type = "kafka"

[[pipeline.actions]]
type = "geoip"
metric_name = "geoip"

[[pipeline.actions]]
type = "discard"

[pipeline.output]
type = "elasticsearch"

[demo]
workers = 2
"#
        )
        .unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.listen_addr, "127.0.0.1:9100");
        assert!(settings.strict_errors);
        assert_eq!(settings.pipeline.input.kind, "kafka");
        assert_eq!(
            settings.pipeline.actions,
            vec![
                ActionPluginInfo::new("geoip").with_metric("geoip"),
                ActionPluginInfo::new("discard"),
            ]
        );
        assert_eq!(settings.pipeline.output.kind, "elasticsearch");
        assert_eq!(settings.demo.workers, 2);
        assert_eq!(settings.demo.tick_ms, 50);
    }

    #[test]
    fn missing_file_is_an_error() {
        let result = Settings::load(Some(Path::new("/nonexistent/pipeboard.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn server_config_follows_settings() {
        let settings = Settings {
            strict_errors: true,
            template_path: Some(PathBuf::from("board.html")),
            ..Settings::default()
        };
        let config = settings.server_config();
        assert_eq!(config.error_policy, ErrorPolicy::Strict);
        assert_eq!(config.template_path, Some(PathBuf::from("board.html")));
        assert_eq!(config.json_path, "/pipeline/info.json");
    }
}
