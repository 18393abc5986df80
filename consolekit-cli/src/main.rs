//! ConsoleKit operator CLI.
//!
//! Resolves an account identifier against the configured catalog, brokers
//! the credential chain per account and prints one JSON line per account
//! for the downstream rendering collaborator. Per-account failures are
//! reported and skipped; the exit status is non-zero only when accounts
//! were matched and every one of them failed.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use consolekit_core::{
    open_consoles, CatalogDirectory, ConsoleUrlIssuer, CredentialBroker, RunContext, SdkSts,
    DEFAULT_TIMEOUT,
};
use eyre::eyre;
use serde::Serialize;

mod config;
use config::CliConfig;

#[derive(Debug, Parser)]
#[command(name = "consolekit", version, about = "Open federated AWS consoles for one or many accounts")]
struct Cli {
    /// The ID, name or regular expression identifying the account(s).
    identifier: String,

    /// The realm to resolve accounts in.
    #[arg(long)]
    realm: Option<String>,

    /// The region the console should be opened with.
    #[arg(long)]
    region: Option<String>,

    /// The role to use.
    #[arg(long)]
    role: Option<String>,

    /// Intermediary role to chain through when the target role is not
    /// directly assumable.
    #[arg(long)]
    intermediary: Option<String>,

    /// Console destinations for the rendering consumer, comma separated.
    /// Independent of --role.
    #[arg(long, value_delimiter = ',')]
    urls: Vec<String>,

    /// Path to the account catalog JSON file.
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Path to the configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Identity-service and federation timeout, in seconds.
    #[arg(long)]
    timeout: Option<u64>,
}

/// What the rendering collaborator receives per successfully-resolved
/// account.
#[derive(Debug, Serialize)]
struct Handoff<'a> {
    account: &'a str,
    number: &'a str,
    console_url: &'a str,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    destinations: &'a [String],
}

fn render_causes(err: &dyn std::error::Error) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        rendered.push_str(&format!(": {cause}"));
        source = cause.source();
    }
    rendered
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = CliConfig::load(cli.config.as_deref())?;

    let realm = cli
        .realm
        .or_else(|| config.default_realm.clone())
        .ok_or_else(|| eyre!("no realm given and no default_realm configured"))?;
    let region = cli
        .region
        .or_else(|| config.default_region.clone())
        .ok_or_else(|| eyre!("no region given and no default_region configured"))?;
    let user = config
        .user_name
        .clone()
        .or_else(|| std::env::var("USER").ok())
        .ok_or_else(|| eyre!("no user_name configured and USER is not set"))?;
    let catalog_path = cli
        .catalog
        .or_else(|| config.catalog.clone())
        .ok_or_else(|| eyre!("no account catalog configured (set `catalog` or pass --catalog)"))?;

    let directory = CatalogDirectory::load(&catalog_path)?;

    let timeout = cli.timeout.map_or(DEFAULT_TIMEOUT, Duration::from_secs);
    let broker = CredentialBroker::new(SdkSts::connect(&region, timeout).await);
    let issuer = ConsoleUrlIssuer::new(timeout);

    let ctx = RunContext {
        realm,
        region,
        identifier: cli.identifier,
        role: cli.role,
        intermediary: cli.intermediary,
        user,
    };

    let report = open_consoles(&ctx, &directory, &config.overrides, &broker, &issuer).await;

    if !report.matched_any() {
        // open_consoles already warned with the identifier and realm.
        return Ok(());
    }

    let destinations = if cli.urls.is_empty() {
        config.console_urls
    } else {
        cli.urls
    };

    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(console_url) => {
                let handoff = Handoff {
                    account: &outcome.account.name,
                    number: &outcome.account.number,
                    console_url,
                    destinations: &destinations,
                };
                println!("{}", serde_json::to_string(&handoff)?);
            }
            Err(e) => {
                tracing::error!(account = %outcome.account.name, "{}", render_causes(e));
            }
        }
    }

    if report.all_failed() {
        return Err(eyre!("all matched accounts failed"));
    }
    Ok(())
}
