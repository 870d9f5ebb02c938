use super::open_repository;
use crate::libs::{config::Config, daemon};
use anyhow::Result;

/// Runs the watcher in the foreground until interrupted.
pub async fn cmd() -> Result<()> {
    let config = Config::read()?;
    let poll_interval = config.daemon.clone().unwrap_or_default().poll_interval;
    let repo = open_repository(&config)?;

    daemon::run_with_signal_handling(repo.storage(), repo.reminders(), repo.observe_grouped_view(), poll_interval).await
}
