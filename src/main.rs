mod app;
mod config;
mod report;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use utxo_pools::domain::pool::PoolType;

#[derive(Parser, Debug)]
#[command(version, about = "Pool state and swap quotes for UTxO constant-product and stableswap pools")]
struct Args {
    /// Path to config file
    #[arg(long, default_value = "Config.toml")]
    config: String,

    /// Swap fee in basis points (overrides config)
    #[arg(long)]
    fee_bps: Option<u32>,

    /// Pool type: constant_product or stableswap (overrides config)
    #[arg(long)]
    pool_type: Option<PoolType>,

    #[command(subcommand)]
    command: app::Command,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let cfg = config::Config::from_file(&args.config)?;
    let app_cfg = app::AppCfg::from_config(cfg, args.fee_bps, args.pool_type)?;

    app::run(app_cfg, args.command).await
}
