use std::{io, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use stake_query::{chain, Cli, QueryRunner};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = Cli::parse()
        .into_config()
        .context("invalid arguments")?;
    info!(
        rpc = %config.rpc_url,
        contract = ?config.contract,
        token_id = %config.token_id,
        abi = %config.abi_path.display(),
        "configuration loaded"
    );

    let provider = chain::connect(&config.rpc_url)?;
    let runner = QueryRunner::new(Arc::new(provider), config);

    let mut out = io::stdout();
    runner
        .run(&mut out)
        .await
        .context("stake query aborted")?;

    Ok(())
}
