//! Command-line entry point for the campsite checker.
//! Checks campgrounds or pass facilities once and prints the report.

mod cli;

use std::sync::Arc;

use anyhow::Result;
use campground_scan::{
    CheckerConfig, DateWindow, FailurePolicy, ScanExecutor, ScanExecutorConfig,
};
use clap::Parser;
use cli::{Cli, Command};
use notification_services::{NotificationConfig, build_notifier};
use rec_gov::RecGovClient;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let level = if cli.debug { "debug" } else { "info" };
    env_logger::init_from_env(env_logger::Env::new().default_filter_or(level));

    if let Err(e) = run(cli).await {
        eprintln!("Something went wrong");
        return Err(e);
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let config = CheckerConfig::from_env();
    let park_ids = cli.park_ids(std::io::stdin().lock())?;

    let notifier = if cli.notify.is_empty() {
        None
    } else {
        let notification_config = NotificationConfig::from_env()?;
        build_notifier(&notification_config, &cli.notify).await?
    };

    let failure_policy = if cli.keep_going {
        FailurePolicy::Continue
    } else {
        FailurePolicy::Abort
    };

    let client = RecGovClient::new(&config.base_url)?;
    log::debug!("Using User-Agent: {}", client.user_agent());

    let executor = ScanExecutor::new(
        Arc::new(client),
        notifier,
        Some(ScanExecutorConfig { failure_policy }),
    );

    let report = match &cli.command {
        Command::Campgrounds {
            start_date,
            end_date,
            ..
        } => {
            let window = DateWindow::validated(*start_date, *end_date)?;
            executor.scan_campgrounds(&park_ids, &window).await?
        }
        Command::Passes { start_date, .. } => executor.scan_passes(&park_ids, *start_date).await?,
    };

    println!("{}", report.render());

    executor.notify(&report, cli.target.as_deref()).await?;
    Ok(())
}
