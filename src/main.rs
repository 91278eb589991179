use anyhow::Context;
use clap::Parser;
use quotefeed::bootstrap::{
    apply_overrides, default_config_path, init_tracing_subscriber, load_config, load_config_or_empty,
};
use quotefeed::cli::{self, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine.
    let _ = dotenvy::dotenv();

    let args = Cli::parse();
    init_tracing_subscriber().context("failed to initialize tracing")?;

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => match default_config_path() {
            Some(path) => load_config_or_empty(&path)?,
            None => qf_core::config::AppConfig::empty(),
        },
    };
    let config = apply_overrides(config, |name| std::env::var(name).ok());

    cli::run(args.command, &config).await
}
