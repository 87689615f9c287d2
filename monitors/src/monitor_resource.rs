use anyhow::{Context, Result};
use clap::Parser;
use lib_poller::{PollerConfig, ResourceObserver};
use log::{info, warn};
use serde_json::Value;

/// Observes one JSON resource from the command line and logs every published
/// snapshot. This is the thin consumer standing in for the dashboard cards:
/// it only ever reads data, loading, and error.
#[derive(Parser, Debug)]
#[command(
    name = "monitor_resource",
    about = "Polls a remote JSON resource and logs every published snapshot."
)]
struct Args {
    /// Base URL of the API (e.g. https://api.example.com/).
    #[arg(long)]
    base_url: String,

    /// Resource path to observe (e.g. /api/orders?skip=0&limit=10).
    #[arg(long)]
    resource: String,

    /// Milliseconds between polls (0 = single fetch).
    #[arg(long, default_value_t = 5000)]
    interval_ms: u64,

    /// Request only changes since the last update (`?since=` cursor).
    #[arg(long, default_value_t = false)]
    incremental: bool,
}

fn setup_logging() -> Result<()> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d %H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(log::LevelFilter::Info)
        .chain(std::io::stderr())
        .chain(fern::log_file("monitor_resource.log")?)
        .apply()?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging().context("Failed to initialize logging")?;
    let args = Args::parse();

    let config = PollerConfig {
        poll_interval_ms: args.interval_ms,
        incremental: args.incremental,
        ..PollerConfig::default()
    };

    let mut observer = ResourceObserver::new(&args.base_url);
    let mut updates = observer
        .observe(&args.resource, config)
        .context("Failed to start observing the resource")?;

    info!(
        "Observing {}{} every {}ms (incremental: {})",
        args.base_url, args.resource, args.interval_ms, args.incremental
    );

    loop {
        // The channel closes once a single-shot poller finishes its cycle.
        if updates.changed().await.is_err() {
            info!("Poller finished. Exiting.");
            break;
        }
        let state = updates.borrow_and_update().clone();

        if let Some(error) = &state.error {
            warn!("{}", error);
        } else if !state.loading {
            let rendered = serde_json::to_string(&state.data.unwrap_or(Value::Null))?;
            info!("Snapshot: {}", rendered);
        }
    }

    Ok(())
}
