//! Main entry point for beewatch.

use beewatch::{load_config, run, Args, ReportError, EXIT_CONFIG, EXIT_STARTUP};
use beewatch_common::init_logging;
use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            // --help and --version land here too
            return if err.use_stderr() {
                ExitCode::from(EXIT_CONFIG)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("beewatch: {} failed: {}", e.stage(), e);
            return ExitCode::from(e.exit_code());
        }
    };

    // Keep the guard alive until exit so file logs are flushed
    let _guard = match init_logging(config.logging.to_subscriber_config()) {
        Ok(guard) => guard,
        Err(e) => {
            let e = anyhow::anyhow!(e).context("failed to initialise logging");
            eprintln!("beewatch: startup failed: {e:#}");
            return ExitCode::from(EXIT_STARTUP);
        }
    };

    info!("Starting monthly window analysis");

    let month = match args.month() {
        Ok(month) => month,
        Err(e) => return fail(&e),
    };

    match run(&config, month) {
        Ok(report) => {
            info!(
                "Charted {} from {} ({} rows read, {} skipped)",
                report.month,
                report.input.display(),
                report.rows_read,
                report.skipped_total()
            );
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

/// Log the failed stage, echo it on stderr and map it to an exit status
fn fail(e: &ReportError) -> ExitCode {
    error!(stage = e.stage(), "{} failed: {}", e.stage(), e);
    eprintln!("beewatch: {} failed: {}", e.stage(), e);
    ExitCode::from(e.exit_code())
}
