//! Schwab order code generator
//!
//! Prints Rust code that places the most recent order on an account again.

use anyhow::{Context, bail};
use clap::Parser;
use schwab_api::client::client_from_config;
use schwab_api::config::Config;
use schwab_api::order_codegen::{AccountSelector, latest_order_code};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Generates code that rebuilds your most recent order.
#[derive(Debug, Parser)]
#[command(name = "schwab-order-codegen", version, about)]
struct Args {
    /// Path to the token file.
    #[arg(long = "token_file")]
    token_file: Option<PathBuf>,

    /// Application key.
    #[arg(long = "api_key")]
    api_key: Option<String>,

    /// Application secret.
    #[arg(long = "app_secret")]
    app_secret: Option<String>,

    /// Account number whose orders are searched.
    #[arg(long = "account_id", conflicts_with = "account_hash")]
    account_id: Option<String>,

    /// Account hash whose orders are searched.
    #[arg(long = "account_hash")]
    account_hash: Option<String>,

    /// TOML configuration file; flags take precedence.
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Args {
    fn resolve_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => {
                let (Some(api_key), Some(app_secret)) = (&self.api_key, &self.app_secret) else {
                    bail!("--api_key and --app_secret are required without --config");
                };
                Config::new(api_key.as_str(), app_secret.as_str())
            }
        };

        if let Some(api_key) = &self.api_key {
            config.oauth.api_key.clone_from(api_key);
        }
        if let Some(app_secret) = &self.app_secret {
            config.oauth.app_secret.clone_from(app_secret);
        }
        match (&self.token_file, &self.config) {
            (Some(path), _) => config.token.path.clone_from(path),
            (None, None) => bail!("--token_file is required without --config"),
            (None, Some(_)) => {}
        }
        config.validate()?;
        Ok(config)
    }

    fn selector(&self) -> AccountSelector {
        match (&self.account_id, &self.account_hash) {
            (Some(id), _) => AccountSelector::AccountId(id.clone()),
            (None, Some(hash)) => AccountSelector::AccountHash(hash.clone()),
            (None, None) => AccountSelector::All,
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = args.resolve_config()?;
    debug!(token_file = %config.token.path.display(), "starting");

    let client = client_from_config(&config)?;
    match latest_order_code(&client, &args.selector()).await? {
        Some(latest) => print!("{}", latest.render()),
        None => println!("No recent orders found"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::from(255)
        }
    }
}
