//! Agenda daemon: composition root for the schedule store and reminder
//! scanner.
//!
//! Loads the TOML config (defaults when absent), restores the schedule
//! snapshot, starts the scanner loop, and logs every notice it receives.
//! A UI embedding the library would consume the notice channel instead of
//! this logging loop.

use agenda::notice::NoticeKind;
use agenda::schedule::{ReminderScanner, ScheduleStore, SharedScheduleStore};
use agenda::{AgendaConfig, notice};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("agendad starting");

    let config_path = AgendaConfig::default_config_path();
    let config = if config_path.exists() {
        AgendaConfig::from_file(&config_path)
            .map_err(|e| anyhow::anyhow!("cannot load {}: {e}", config_path.display()))?
    } else {
        tracing::info!("no config at {}, using defaults", config_path.display());
        AgendaConfig::default()
    };

    let (notice_tx, mut notice_rx) = notice::channel();

    let snapshot_path = config.storage.effective_snapshot_path();
    let store = ScheduleStore::load(Some(snapshot_path.clone()), notice_tx.clone());
    tracing::info!(
        "loaded {} schedule(s) from {}",
        store.len(),
        snapshot_path.display()
    );
    let shared: SharedScheduleStore = Arc::new(tokio::sync::Mutex::new(store));

    let scanner = ReminderScanner::new(notice_tx)
        .with_scan_interval(std::time::Duration::from_secs(
            config.scanner.scan_interval_secs,
        ))
        .with_tolerance(chrono::Duration::seconds(i64::from(
            config.scanner.tolerance_secs,
        )))
        .with_notice_duration_ms(config.notice.default_duration_ms);
    let scanner_handle = scanner.run(Arc::clone(&shared));

    // Surface notices until the channel closes or we are interrupted.
    loop {
        tokio::select! {
            maybe_notice = notice_rx.recv() => {
                match maybe_notice {
                    Some(n) => match n.kind {
                        NoticeKind::Reminder => tracing::info!("reminder: {} ({})", n.title, n.body),
                        NoticeKind::Warning => tracing::warn!("{}: {}", n.title, n.body),
                    },
                    None => break,
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupt received");
                break;
            }
        }
    }

    scanner_handle.abort();
    tracing::info!("agendad shut down cleanly");
    Ok(())
}
