pub mod cli;
pub mod dashboard;
pub mod feed;
pub mod history;
pub mod insights;
pub mod metrics;
pub mod models;
pub mod query;
pub mod settings;
pub mod source;
mod utils;

use anyhow::{Context, Result};
use log::{info, warn};
use tokio::io::{AsyncBufReadExt, BufReader};

pub use cli::Cli;
use dashboard::{DashboardController, DashboardSnapshot};
use feed::FeedStatus;
use settings::ReplaySettings;

pub async fn run(cli: Cli) -> Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("regionwatch starting up...");

    let mut settings = ReplaySettings::load(&cli.config)?;
    cli.apply_overrides(&mut settings);

    let dashboard = DashboardController::new(settings)?;
    if let Some(region) = &cli.region {
        dashboard.select_region(region.clone()).await;
    }

    let printer = tokio::spawn(print_updates(dashboard.subscribe(), cli.json));

    let run_id = dashboard
        .start_feed()
        .await
        .context("failed to start replay")?;
    info!(
        "replaying {} as run {run_id}",
        dashboard.settings().dataset_path.display()
    );

    let status = if cli.interactive {
        interactive_session(&dashboard).await?
    } else {
        tokio::select! {
            status = dashboard.wait_for_feed() => status,
            _ = tokio::signal::ctrl_c() => {
                warn!("interrupted, stopping replay");
                dashboard.stop_feed().await?
            }
        }
    };
    info!("replay ended: {status:?}");

    for question in &cli.ask {
        println!("> {question}");
        println!("{}", dashboard.ask(question).await);
    }

    let metrics = dashboard.metrics().await;
    info!(
        "consumed {} readings, delivered {}",
        metrics.readings_consumed, metrics.readings_delivered
    );

    printer.abort();
    Ok(())
}

/// Questions and commands from stdin until EOF or `quit`. Stops the feed on exit.
async fn interactive_session(dashboard: &DashboardController) -> Result<FeedStatus> {
    println!("Commands: 'regions', 'select <region>', 'quit'. Anything else is a question.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match line.split_once(' ') {
            _ if line.eq_ignore_ascii_case("quit") => break,
            _ if line.eq_ignore_ascii_case("regions") => {
                println!("{}", dashboard.regions().await.join(", "));
            }
            Some((command, region)) if command.eq_ignore_ascii_case("select") => {
                dashboard.select_region(region.trim()).await;
            }
            _ => println!("{}", dashboard.ask(line).await),
        }
    }

    dashboard.stop_feed().await
}

async fn print_updates(mut rx: tokio::sync::watch::Receiver<DashboardSnapshot>, json: bool) {
    while rx.changed().await.is_ok() {
        let snapshot = rx.borrow_and_update().clone();
        if json {
            match serde_json::to_string(&snapshot) {
                Ok(line) => println!("{line}"),
                Err(err) => warn!("failed to serialize snapshot: {err}"),
            }
        } else {
            println!("{}", summary_line(&snapshot));
        }
    }
}

fn summary_line(snapshot: &DashboardSnapshot) -> String {
    let insight = &snapshot.insight;
    if insight.is_empty() {
        return format!(
            "[{:?}] {} (no data yet, {} regions)",
            snapshot.feed_status,
            snapshot.selected_region.as_deref().unwrap_or("<none>"),
            snapshot.regions.len(),
        );
    }
    let fmt = |value: Option<f32>| value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"));

    format!(
        "[{:?}] {} ({} readings, {} regions) current={} avg={} peak={} anomalies={}",
        snapshot.feed_status,
        snapshot.selected_region.as_deref().unwrap_or("<none>"),
        snapshot.history.len(),
        snapshot.regions.len(),
        fmt(insight.current_value),
        fmt(insight.rolling_average),
        fmt(insight.peak_value),
        insight.anomalies_count,
    )
}
