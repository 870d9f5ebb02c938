//! Background watcher for the `watch` command.
//!
//! Polls for due reminders and delivers them, re-reads the database so edits
//! made by other grit invocations reach the board, and prints the board
//! whenever the grouped view changes. Runs until SIGINT/SIGTERM (Ctrl+C on
//! Windows).

use crate::db::reminders::Reminder;
use crate::libs::formatter::format_deadline;
use crate::libs::grouped_view::GroupedViewStream;
use crate::libs::messages::Message;
use crate::libs::scheduler::SqliteReminderScheduler;
use crate::libs::storage::Storage;
use crate::libs::view::View;
use crate::{msg_error, msg_info, msg_print};
#[cfg(not(any(unix, windows)))]
use crate::msg_warning;
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Fires every reminder due at `now` and prints a notification for each.
pub fn deliver_due(reminders: &SqliteReminderScheduler, now: DateTime<Utc>) -> Result<Vec<Reminder>> {
    let fired = reminders.fire_due(now)?;
    for reminder in &fired {
        msg_print!(Message::ReminderDue(reminder.title.clone(), format_deadline(&reminder.deadline)));
        tracing::debug!(task_id = reminder.task_id, "reminder delivered");
    }
    Ok(fired)
}

/// Runs the watcher loop until a shutdown signal arrives.
pub async fn run_with_signal_handling(storage: &Storage, reminders: &SqliteReminderScheduler, views: GroupedViewStream, poll_interval: u64) -> Result<()> {
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    #[cfg(unix)]
    {
        tokio::spawn(async move {
            use tokio::signal::unix::{signal, SignalKind};

            let (mut sigterm, mut sigint) = match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                (Ok(sigterm), Ok(sigint)) => (sigterm, sigint),
                (Err(e), _) | (_, Err(e)) => {
                    msg_error!(Message::WatcherError(e.to_string()));
                    // Keep the sender alive: no handler means no signal-driven stop
                    std::future::pending::<()>().await;
                    return;
                }
            };

            tokio::select! {
                _ = sigterm.recv() => {
                    msg_info!(Message::WatcherReceivedSigterm);
                }
                _ = sigint.recv() => {
                    msg_info!(Message::WatcherReceivedSigint);
                }
            }

            let _ = shutdown_tx.send(());
        });
    }

    #[cfg(windows)]
    {
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    msg_info!(Message::WatcherReceivedCtrlC);
                    let _ = shutdown_tx.send(());
                }
                Err(e) => {
                    msg_error!(Message::WatcherCtrlCListenFailed(e.to_string()));
                    std::future::pending::<()>().await;
                }
            }
        });
    }

    #[cfg(not(any(unix, windows)))]
    let _shutdown_tx = {
        msg_warning!(Message::WatcherSignalHandlingNotSupported);
        shutdown_tx
    };

    msg_info!(Message::WatcherStarted(poll_interval));

    tokio::select! {
        result = watch_loop(storage, reminders, views, poll_interval) => {
            if let Err(e) = result {
                msg_error!(Message::WatcherError(e.to_string()));
            }
        }
        _ = shutdown_rx => {}
    }

    msg_info!(Message::WatcherStopped);
    Ok(())
}

async fn watch_loop(storage: &Storage, reminders: &SqliteReminderScheduler, mut views: GroupedViewStream, poll_interval: u64) -> Result<()> {
    let mut ticker = tokio::time::interval(Duration::from_millis(poll_interval.max(1)));

    if let Some(view) = views.next().await {
        View::board(&view);
    }

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                storage.reload()?;
                deliver_due(reminders, Utc::now())?;
            }
            view = views.next() => match view {
                Some(view) => {
                    msg_print!(Message::BoardChanged, true);
                    View::board(&view);
                }
                None => return Ok(()),
            },
        }
    }
}
