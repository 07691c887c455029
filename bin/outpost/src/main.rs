#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

//! Periodic L2 output submitter for OP-stack style rollups.

use clap::Parser;
use tracing::info;

use outpost_config::Opts;
use outpost_driver::OutputSubmitter;

mod allocator;
use allocator::{Allocator, new_allocator};

#[global_allocator]
static ALLOC: Allocator = new_allocator();

#[tokio::main]
async fn main() -> eyre::Result<()> {
    if let Ok(custom_env_file) = std::env::var("ENV_FILE") {
        // Try from custom env file, and abort if it fails
        dotenvy::from_filename(custom_env_file)?;
    } else {
        // Try from default .env file, and ignore if it fails. It might
        // be that the user isn't using it.
        dotenvy::dotenv().ok();
    }

    let opts = Opts::parse();

    let tracer_provider = opts.telemetry.setup(&opts.instance_name)?;

    info!("🛰️ Outpost submitter starting...");

    let submitter = OutputSubmitter::from_opts(&opts).await?;
    submitter.start().await?;

    tokio::signal::ctrl_c().await?;
    info!("👋 Outpost submitter shutting down...");

    submitter.stop_if_running().await;
    tracer_provider.shutdown();

    Ok(())
}
