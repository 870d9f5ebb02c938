//! Row access for the `tasks` table.
//!
//! Lists are ordered by id; grouping and display order are applied later by
//! the grouped view.

use crate::libs::error::Result;
use crate::libs::task::Task;
use rusqlite::{params, Connection, OptionalExtension, Row};

const UPSERT_TASK: &str = "INSERT INTO tasks (id, category_id, title, status, \"index\", deadline, priority)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
    ON CONFLICT(id) DO UPDATE SET
        category_id = excluded.category_id,
        title = excluded.title,
        status = excluded.status,
        \"index\" = excluded.\"index\",
        deadline = excluded.deadline,
        priority = excluded.priority";
const DELETE_TASK: &str = "DELETE FROM tasks WHERE id = ?1";
const DELETE_ALL_TASKS: &str = "DELETE FROM tasks";
const SELECT_TASKS: &str = "SELECT id, category_id, title, status, \"index\", deadline, priority FROM tasks";
const WHERE_ID: &str = "WHERE id = ?1";
const WHERE_CATEGORY: &str = "WHERE category_id = ?1";
const ORDER_BY_ID: &str = "ORDER BY id";

/// Task table access over a borrowed connection.
pub struct Tasks<'a> {
    conn: &'a Connection,
}

impl<'a> Tasks<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Inserts the task, or updates it in place when its id already exists.
    /// Fails with a constraint violation if the category does not exist.
    pub fn upsert(&self, task: &Task) -> Result<i64> {
        self.conn.execute(
            UPSERT_TASK,
            params![task.id, task.category_id, task.title, task.status, task.index, task.deadline, task.priority],
        )?;
        Ok(task.id.unwrap_or_else(|| self.conn.last_insert_rowid()))
    }

    pub fn delete(&self, id: i64) -> Result<usize> {
        Ok(self.conn.execute(DELETE_TASK, params![id])?)
    }

    pub fn delete_all(&self) -> Result<usize> {
        Ok(self.conn.execute(DELETE_ALL_TASKS, [])?)
    }

    /// All tasks in storage order.
    pub fn list(&self) -> Result<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!("{} {}", SELECT_TASKS, ORDER_BY_ID))?;
        let task_iter = stmt.query_map([], Self::from_row)?;

        let mut tasks = Vec::new();
        for task in task_iter {
            tasks.push(task?);
        }
        Ok(tasks)
    }

    pub fn list_by_category(&self, category_id: i64) -> Result<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!("{} {} {}", SELECT_TASKS, WHERE_CATEGORY, ORDER_BY_ID))?;
        let task_iter = stmt.query_map(params![category_id], Self::from_row)?;

        let mut tasks = Vec::new();
        for task in task_iter {
            tasks.push(task?);
        }
        Ok(tasks)
    }

    pub fn get_by_id(&self, id: i64) -> Result<Option<Task>> {
        Ok(self
            .conn
            .query_row(&format!("{} {}", SELECT_TASKS, WHERE_ID), params![id], Self::from_row)
            .optional()?)
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
        Ok(Task {
            id: row.get(0)?,
            category_id: row.get(1)?,
            title: row.get(2)?,
            status: row.get(3)?,
            index: row.get(4)?,
            deadline: row.get(5)?,
            priority: row.get(6)?,
        })
    }
}
