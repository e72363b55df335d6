// std
// crates
use clap::Parser;
use color_eyre::eyre::{eyre, Result};
use da_proxy::{Config, HttpArgs, LogArgs};
// internal

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path for a yaml-encoded proxy config file
    config: std::path::PathBuf,
    /// Overrides log config.
    #[clap(flatten)]
    log_args: LogArgs,
    /// Overrides http config.
    #[clap(flatten)]
    http_args: HttpArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let Args {
        config,
        log_args,
        http_args,
    } = Args::parse();
    let config = serde_yaml::from_reader::<_, Config>(std::fs::File::open(config)?)?
        .update_from_args(log_args, http_args)?;

    let _guard = da_tracing::init_tracing(config.log.clone())
        .map_err(|e| eyre!("Failed to initialize tracing: {e}"))?;

    da_proxy::run(config).await
}
