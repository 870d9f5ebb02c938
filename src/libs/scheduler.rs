//! Deadline reminders.
//!
//! [`ReminderScheduler`] is the seam the task repository talks to. The
//! shipped implementation, [`SqliteReminderScheduler`], keeps one pending
//! reminder per task in the `reminders` table; the `watch` daemon fires them
//! with [`SqliteReminderScheduler::fire_due`].

use crate::db::db::Db;
use crate::db::reminders::{Reminder, Reminders};
use crate::libs::config::ReminderConfig;
use crate::libs::error::SchedulingError;
use crate::libs::task::Task;
use chrono::{DateTime, Duration, Utc};
use std::future::Future;
use std::sync::Arc;

/// Arranges and cancels one-shot deadline notifications, keyed by task id.
pub trait ReminderScheduler {
    /// Schedules a reminder for the task's deadline, replacing any existing
    /// reminder for the same task. A task without a deadline is a no-op.
    fn schedule_deadline_reminder(&self, task: &Task) -> impl Future<Output = Result<(), SchedulingError>> + Send;

    /// Removes the task's pending reminder, if any.
    fn cancel_reminders(&self, task: &Task) -> impl Future<Output = Result<(), SchedulingError>> + Send;
}

pub struct SqliteReminderScheduler {
    db: Arc<Db>,
    config: ReminderConfig,
}

impl SqliteReminderScheduler {
    pub fn new(db: Arc<Db>, config: ReminderConfig) -> Self {
        SqliteReminderScheduler { db, config }
    }

    /// Reminder that should exist for `task` at time `now`, if any.
    ///
    /// Completed tasks and deadlines already passed get none. A lead time
    /// reaching into the past is clamped to `now`.
    pub fn plan(&self, task: &Task, now: DateTime<Utc>) -> Option<Reminder> {
        let task_id = task.id?;
        let deadline = task.deadline?;
        if task.is_completed() || deadline <= now {
            return None;
        }

        let lead = i64::try_from(self.config.lead_minutes)
            .ok()
            .and_then(Duration::try_minutes)
            .unwrap_or(Duration::MAX);
        let fire_at = deadline.checked_sub_signed(lead).unwrap_or(now).max(now);

        Some(Reminder {
            task_id,
            title: task.title.clone(),
            deadline,
            fire_at,
        })
    }

    pub fn pending(&self) -> Result<Vec<Reminder>, SchedulingError> {
        Reminders::new(&self.db.conn()).list().map_err(|e| SchedulingError::Store(e.to_string()))
    }

    pub fn pending_for(&self, task_id: i64) -> Result<Option<Reminder>, SchedulingError> {
        Reminders::new(&self.db.conn()).get(task_id).map_err(|e| SchedulingError::Store(e.to_string()))
    }

    /// Removes and returns every reminder due at `now`. Each one fires once.
    pub fn fire_due(&self, now: DateTime<Utc>) -> Result<Vec<Reminder>, SchedulingError> {
        let conn = self.db.conn();
        let tx = conn.unchecked_transaction()?;
        let reminders = Reminders::new(&tx);

        let due = reminders.due(now).map_err(|e| SchedulingError::Store(e.to_string()))?;
        for reminder in &due {
            reminders.delete(reminder.task_id).map_err(|e| SchedulingError::Store(e.to_string()))?;
        }
        tx.commit()?;

        Ok(due)
    }
}

impl ReminderScheduler for SqliteReminderScheduler {
    async fn schedule_deadline_reminder(&self, task: &Task) -> Result<(), SchedulingError> {
        if task.deadline.is_none() {
            return Ok(());
        }
        let Some(reminder) = self.plan(task, Utc::now()) else {
            tracing::debug!(task_id = ?task.id, "no reminder needed");
            return Ok(());
        };
        if !self.config.enabled {
            return Err(SchedulingError::PermissionDenied("reminders are disabled in the configuration".to_string()));
        }

        Reminders::new(&self.db.conn())
            .upsert(&reminder)
            .map_err(|e| SchedulingError::Store(e.to_string()))?;
        tracing::debug!(task_id = reminder.task_id, fire_at = %reminder.fire_at, "reminder scheduled");

        Ok(())
    }

    async fn cancel_reminders(&self, task: &Task) -> Result<(), SchedulingError> {
        let Some(task_id) = task.id else {
            return Ok(());
        };

        let removed = Reminders::new(&self.db.conn())
            .delete(task_id)
            .map_err(|e| SchedulingError::Store(e.to_string()))?;
        if removed > 0 {
            tracing::debug!(task_id, "reminder cancelled");
        }

        Ok(())
    }
}
