//! HTTP endpoints for the board.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use pipeboard_sdk::{Board, BoardServer, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let board = Arc::new(Board::builder().input("file").output("devnull").build());
//!
//!     let config = ServerConfig::builder()
//!         .listen_addr("127.0.0.1:9000")
//!         .build();
//!
//!     // JSON at /pipeline/info.json, dashboard at /pipeline/info
//!     BoardServer::new(config, board).run().await.unwrap();
//! }
//! ```

use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

use crate::board::Board;
use crate::error::BoardError;
use crate::render::{
    render_dashboard, render_json, render_or_report, EmbeddedTemplate, ErrorPolicy, FileTemplate,
    Rendered, Surface, TemplateSource,
};

/// Configuration for the board's HTTP endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:9000")
    pub listen_addr: String,
    /// Path of the JSON endpoint
    pub json_path: String,
    /// Path of the HTML dashboard
    pub html_path: String,
    /// How presentation failures are reported
    pub error_policy: ErrorPolicy,
    /// Dashboard template on disk; the embedded one is used when unset
    pub template_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:9000".to_string(),
            json_path: "/pipeline/info.json".to_string(),
            html_path: "/pipeline/info".to_string(),
            error_policy: ErrorPolicy::Lenient,
            template_path: None,
        }
    }
}

impl ServerConfig {
    /// Create a new builder for ServerConfig.
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }
}

/// Builder for ServerConfig.
#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    config: ServerConfig,
}

impl ServerConfigBuilder {
    /// Set the listen address.
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the JSON endpoint path.
    pub fn json_path(mut self, path: impl Into<String>) -> Self {
        self.config.json_path = path.into();
        self
    }

    /// Set the dashboard path.
    pub fn html_path(mut self, path: impl Into<String>) -> Self {
        self.config.html_path = path.into();
        self
    }

    pub fn error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.config.error_policy = policy;
        self
    }

    /// Serve the dashboard from a template file instead of the embedded one.
    pub fn template_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.template_path = Some(path.into());
        self
    }

    /// Build the ServerConfig.
    pub fn build(self) -> ServerConfig {
        self.config
    }
}

/// Serves board snapshots over HTTP.
///
/// Every request builds a fresh snapshot; nothing is cached between
/// requests.
#[derive(Clone)]
pub struct BoardServer {
    config: Arc<ServerConfig>,
    board: Arc<Board>,
    template: Arc<dyn TemplateSource>,
}

impl BoardServer {
    pub fn new(config: ServerConfig, board: Arc<Board>) -> Self {
        let template: Arc<dyn TemplateSource> = match &config.template_path {
            Some(path) => Arc::new(FileTemplate::new(path)),
            None => Arc::new(EmbeddedTemplate),
        };
        Self {
            config: Arc::new(config),
            board,
            template,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Answer a request for `path` without going through the network.
    pub fn route(&self, path: &str) -> Rendered {
        let policy = self.config.error_policy;

        if path == self.config.json_path {
            let snapshot = self.board.snapshot();
            render_or_report(Surface::Json, render_json(&snapshot), policy)
        } else if path == self.config.html_path {
            let snapshot = self.board.snapshot();
            render_or_report(
                Surface::Dashboard,
                render_dashboard(&*self.template, &snapshot),
                policy,
            )
        } else if path == "/health" || path == "/healthz" {
            plain(200, "OK")
        } else {
            plain(404, "Not Found")
        }
    }

    /// Bind the configured address and serve until the runtime shuts down.
    pub async fn run(self) -> Result<(), BoardError> {
        let addr: SocketAddr =
            self.config
                .listen_addr
                .parse()
                .map_err(|source| BoardError::InvalidAddr {
                    addr: self.config.listen_addr.clone(),
                    source,
                })?;
        let listener = TcpListener::bind(addr).await?;
        self.serve(listener).await
    }

    /// Serve connections from an already bound listener.
    pub async fn serve(self, listener: TcpListener) -> Result<(), BoardError> {
        let local = listener.local_addr()?;
        info!(
            addr = %local,
            json = %self.config.json_path,
            html = %self.config.html_path,
            "board listening"
        );

        loop {
            let (stream, peer) = listener.accept().await?;
            debug!(%peer, "board connection");
            let io = TokioIo::new(stream);
            let server = self.clone();

            tokio::spawn(async move {
                let service = service_fn(move |req: Request<hyper::body::Incoming>| {
                    let server = server.clone();
                    async move { server.handle_request(req) }
                });

                if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                    error!(error = %e, "board connection error");
                }
            });
        }
    }

    /// Spawn [`run`](Self::run) on the current runtime, logging its failure.
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            if let Err(e) = self.run().await {
                error!(error = %e, "board server error");
            }
        })
    }

    fn handle_request(
        &self,
        req: Request<hyper::body::Incoming>,
    ) -> Result<Response<Full<Bytes>>, Infallible> {
        Ok(into_response(self.route(req.uri().path())))
    }
}

impl std::fmt::Debug for BoardServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardServer")
            .field("config", &self.config)
            .field("template", &self.template.name())
            .finish()
    }
}

fn plain(status: u16, body: &str) -> Rendered {
    Rendered {
        status,
        content_type: "text/plain",
        body: body.to_string(),
    }
}

fn into_response(rendered: Rendered) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(rendered.body)));
    *response.status_mut() =
        StatusCode::from_u16(rendered.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(rendered.content_type));
    response
}
