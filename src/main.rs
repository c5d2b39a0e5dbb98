//! imgdownloader - CLI entry point.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use indicatif::ProgressBar;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, EnvFilter};

use imgdownloader::{
    cli::Args,
    config::Config,
    download::{BatchStats, DownloadOutcome, Downloader},
    error::{exit_codes, Result},
    fs::ensure_output_dir,
    output::{
        create_item_bar, create_spinner, print_batch_stats, print_error, print_info,
        print_run_summary, print_success, print_warning,
    },
    provider::{build_client, Registry},
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(stats) if stats.has_failures() => {
            ExitCode::from(exit_codes::SOME_DOWNLOADS_FAILED as u8)
        }
        Ok(_) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            ExitCode::from(exit_codes::FAILURE as u8)
        }
    }
}

async fn run() -> Result<BatchStats> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    args.validate()?;

    // Resolve the provider before touching the network or the filesystem
    let client = build_client(Duration::from_secs(args.timeout))?;
    let registry = Registry::new(client.clone());
    let mut provider = registry.get(&args.provider).map_err(|e| {
        tracing::debug!("Known providers: {}", registry.names().join(", "));
        e
    })?;

    // Load configuration
    let mut config = Config::discover(args.config.as_deref())?;
    match config.source() {
        Some(path) => tracing::debug!("Loaded configuration from {}", path.display()),
        None if args.settings.is_empty() => {
            print_warning("No configuration file found; provider settings are empty")
        }
        None => {}
    }
    args.merge_into_config(&mut config, provider.name());
    provider.configure(&config.provider(provider.name()));

    ensure_output_dir(&args.out)?;

    print_run_summary(
        provider.name(),
        &args.tag,
        args.count,
        &args.out,
        args.workers,
    );

    // Collect the full item list before any download starts
    let spinner = (!args.quiet).then(|| {
        create_spinner(&format!(
            "Searching {} for '{}'...",
            provider.name(),
            args.tag
        ))
    });
    let items = provider.request(&args.tag, args.count).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let items = items?;
    print_info(&format!("Found {} images", items.len()));

    // Ctrl-C cancels whatever is still queued or in flight
    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                print_warning("Interrupted, cancelling remaining downloads");
                shutdown.cancel();
            }
        });
    }

    let mut downloader =
        Downloader::new(client, &args.out, args.workers)?.with_cancellation(&shutdown);
    if let Some(limit) = args.max_failures {
        downloader = downloader.with_failure_limit(limit);
    }

    let mut batch = downloader.start(items);
    let bar = if args.quiet {
        ProgressBar::hidden()
    } else {
        create_item_bar(batch.expected() as u64, "Downloading")
    };

    let mut stats = BatchStats::default();
    while let Some(outcome) = batch.next().await {
        stats.record(&outcome);
        bar.suspend(|| report(&outcome));
        bar.inc(1);
    }
    bar.finish_and_clear();

    print_batch_stats(&stats);
    Ok(stats)
}

fn report(outcome: &DownloadOutcome) {
    let line = outcome.to_string();
    if outcome.is_success() {
        print_success(&line);
    } else {
        print_warning(&line);
    }
}
