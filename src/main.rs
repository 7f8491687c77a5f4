use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Replay raw HTTP request files against live servers until interrupted.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long)]
    config_path: Option<String>,

    /// Maximum number of requests in flight
    #[arg(short, long)]
    threads: Option<u32>,

    /// Seconds between rounds
    #[arg(short, long)]
    interval: Option<u64>,

    /// Directory holding the post*.txt request files
    #[arg(short, long)]
    dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "replay=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let mut config = match args.config_path {
        Some(path) => replay::Config::read(&path)?,
        None => replay::Config::default(),
    };
    if let Some(threads) = args.threads {
        config.threads = threads;
    }
    if let Some(interval) = args.interval {
        config.interval = interval;
    }
    if let Some(dir) = args.dir {
        config.templates.dir = dir;
    }
    config.validate()?;

    let dispatcher = match replay::app(&config) {
        Ok(dispatcher) => dispatcher,
        Err(err) => {
            tracing::error!("{:#}", err);
            return Err(err);
        }
    };

    let (trigger, shutdown) = replay::shutdown::channel();
    tokio::spawn(replay::shutdown::listen(trigger));

    let summary = dispatcher.run(shutdown).await;
    tracing::info!(
        "all requests completed after {} rounds ({} requests), exiting",
        summary.rounds,
        summary.sends
    );

    Ok(())
}
