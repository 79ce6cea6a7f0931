use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use pipeboard::{build_board, logging, DemoPipeline, DemoSinks, Settings};
use pipeboard_sdk::BoardServer;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "pipeboard")]
#[command(about = "Live observability board for a streaming pipeline")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on, overrides `listen_addr`
    #[arg(short, long)]
    listen: Option<String>,

    /// Dashboard template to load instead of the embedded one
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Answer presentation failures with HTTP 500
    #[arg(long)]
    strict: bool,

    /// Don't start the demo workers
    #[arg(long)]
    no_demo: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(listen) = args.listen {
        settings.listen_addr = listen;
    }
    if let Some(template) = args.template {
        settings.template_path = Some(template);
    }
    if args.strict {
        settings.strict_errors = true;
    }
    if args.no_demo {
        settings.demo.enabled = false;
    }

    logging::init(&settings.log_level);

    let sinks = DemoSinks::new();
    let board = Arc::new(build_board(&settings.pipeline, &sinks));

    let demo = if settings.demo.enabled {
        Some(DemoPipeline::start(
            &settings.demo,
            &settings.pipeline.actions,
            &sinks,
        )?)
    } else {
        None
    };

    let server = BoardServer::new(settings.server_config(), board);

    let result = tokio::select! {
        result = server.run() => result.map_err(anyhow::Error::from),
        signal = tokio::signal::ctrl_c() => {
            info!("shutting down");
            signal.map_err(anyhow::Error::from)
        }
    };

    if let Some(demo) = demo {
        demo.shutdown();
    }

    if let Err(e) = &result {
        error!(error = %e, "pipeboard stopped");
    }
    result
}
