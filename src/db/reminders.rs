//! Row access for pending deadline reminders, one row per task.

use crate::libs::error::Result;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

const UPSERT_REMINDER: &str = "INSERT INTO reminders (task_id, title, deadline, fire_at) VALUES (?1, ?2, ?3, ?4)
    ON CONFLICT(task_id) DO UPDATE SET title = excluded.title, deadline = excluded.deadline, fire_at = excluded.fire_at";
const DELETE_REMINDER: &str = "DELETE FROM reminders WHERE task_id = ?1";
const SELECT_REMINDERS: &str = "SELECT task_id, title, deadline, fire_at FROM reminders";
const WHERE_TASK: &str = "WHERE task_id = ?1";
const ORDER_BY_FIRE_AT: &str = "ORDER BY fire_at, task_id";

/// A pending one-shot notification, keyed by task id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub task_id: i64,
    pub title: String,
    pub deadline: DateTime<Utc>,
    pub fire_at: DateTime<Utc>,
}

pub struct Reminders<'a> {
    conn: &'a Connection,
}

impl<'a> Reminders<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Stores the reminder, replacing any existing one for the same task.
    pub fn upsert(&self, reminder: &Reminder) -> Result<()> {
        self.conn.execute(
            UPSERT_REMINDER,
            params![reminder.task_id, reminder.title, reminder.deadline, reminder.fire_at],
        )?;
        Ok(())
    }

    pub fn delete(&self, task_id: i64) -> Result<usize> {
        Ok(self.conn.execute(DELETE_REMINDER, params![task_id])?)
    }

    pub fn get(&self, task_id: i64) -> Result<Option<Reminder>> {
        Ok(self
            .conn
            .query_row(&format!("{} {}", SELECT_REMINDERS, WHERE_TASK), params![task_id], Self::from_row)
            .optional()?)
    }

    pub fn list(&self) -> Result<Vec<Reminder>> {
        let mut stmt = self.conn.prepare(&format!("{} {}", SELECT_REMINDERS, ORDER_BY_FIRE_AT))?;
        let reminders = stmt.query_map([], Self::from_row)?.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(reminders)
    }

    /// Reminders whose fire time is at or before `now`, earliest first.
    /// Compared as timestamps rather than as stored text.
    pub fn due(&self, now: DateTime<Utc>) -> Result<Vec<Reminder>> {
        let mut due: Vec<Reminder> = self.list()?.into_iter().filter(|r| r.fire_at <= now).collect();
        due.sort_by_key(|r| (r.fire_at, r.task_id));
        Ok(due)
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Reminder> {
        Ok(Reminder {
            task_id: row.get(0)?,
            title: row.get(1)?,
            deadline: row.get(2)?,
            fire_at: row.get(3)?,
        })
    }
}
