use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::sync::Arc;
use std::time::Duration;
use sync_ssh_keys::aggregator::Aggregator;
use sync_ssh_keys::cli::output::FORMATS;
use sync_ssh_keys::cli::{Cli, OutputFormatter};
use sync_ssh_keys::core::{Config, KeySyncError, SyncResults, Transport, WarningPolicy};
use sync_ssh_keys::sources::build_sources;
use sync_ssh_keys::utils::HttpClient;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Load .env file if it exists
    let _ = dotenv::dotenv();

    let cli = Cli::parse();

    // stdout carries the keys, logs go to stderr
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        OutputFormatter::print_error(&format!("{:#}", e));
        let code = match e.downcast_ref::<KeySyncError>() {
            Some(err @ KeySyncError::Usage(_)) => {
                eprintln!("Try 'sync-ssh-keys --help' for more information.");
                err.exit_code()
            }
            Some(err) => err.exit_code(),
            None => 1,
        };
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    cli.apply_to(&mut config);

    if !FORMATS.contains(&config.output.format.as_str()) {
        return Err(KeySyncError::Usage(format!(
            "--format must be one of: {}.",
            FORMATS.join(", ")
        ))
        .into());
    }

    let policy = Arc::new(WarningPolicy::new(cli.werror));
    let transport: Arc<dyn Transport> = Arc::new(HttpClient::with_timeout(Duration::from_secs(
        config.http.timeout_secs,
    )));
    let aggregator = Aggregator::new(build_sources(&config, transport, Arc::clone(&policy)));

    for warning in aggregator.check_inputs()? {
        OutputFormatter::print_warning(&warning);
    }

    let mut results = SyncResults::new();
    for source in aggregator.sources() {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
        spinner.set_message(format!("Fetching keys from {}...", source.name()));
        spinner.enable_steady_tick(Duration::from_millis(100));

        let outcome = aggregator.collect_source(source.as_ref(), &mut results).await;
        spinner.finish_and_clear();
        outcome?;
    }

    let rendered = OutputFormatter::render(&results, &config.output.format)?;
    match &config.output.path {
        Some(path) => {
            fs::write(path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            OutputFormatter::print_success(&format!(
                "{} keys written to {}",
                results.total_keys(),
                path.display()
            ));
        }
        None => print!("{}", rendered),
    }

    OutputFormatter::print_summary(&results);

    let warnings = policy.warnings();
    if !warnings.is_empty() {
        info!("Completed with {} warnings", warnings.len());
    }

    Ok(())
}
