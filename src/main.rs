//! txdash main entry point

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;
use tokio::sync::RwLock;
use txdash_api::start_server;
use txdash_config::{Config, ConfigError};
use txdash_core::{
    load_dashboard, random_active_now, spawn_live_metric, Dashboard, HttpUserSource, RandomizedMapper,
};

#[derive(Parser, Debug)]
#[command(name = "txdash")]
#[command(version = "0.1.0")]
#[command(about = "A lightweight analytics dashboard for transaction data", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Print the default configuration and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let (config, missing) = match Config::load(&args.config) {
        Ok(config) => (config, false),
        Err(ConfigError::FileNotFound { .. }) => (Config::default(), true),
        Err(e) => {
            eprintln!("{}", e.to_details());
            return Err(e).with_context(|| format!("Failed to load {}", args.config.display()));
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.logging.level.as_str())).init();

    if missing {
        log::warn!(
            "Config file {} not found, using defaults (see --print-default-config)",
            args.config.display()
        );
    } else {
        log::info!("Config loaded from {}", args.config.display());
    }

    let rt = Runtime::new()?;
    rt.block_on(async {
        let live = spawn_live_metric(
            Duration::from_secs(config.dashboard.live_metric_interval_secs),
            random_active_now(),
            random_active_now,
        );
        let dashboard = Arc::new(RwLock::new(Dashboard::new(&config.dashboard, live.metric())));

        let loader = Arc::clone(&dashboard);
        let endpoint = config.source.endpoint.clone();
        tokio::spawn(async move {
            let source = HttpUserSource::new(endpoint);
            load_dashboard(&loader, &source, &RandomizedMapper::default()).await;
        });

        let result = start_server(config, dashboard).await;
        live.stop();
        result.context("Server failed")
    })
}
