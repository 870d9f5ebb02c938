//! Storage gateway over the task and category tables.
//!
//! Every write runs in one transaction that also reads the resulting table
//! snapshots, so a write either commits together with a readable snapshot or
//! not at all. After the commit the snapshots are published on two `watch`
//! channels. Those channels are the change streams the grouped view
//! is built from; only this gateway sends on them.

use crate::db::categories::Categories;
use crate::db::db::Db;
use crate::db::tasks::Tasks;
use crate::libs::error::{Result, StorageError};
use crate::libs::task::{Category, Task};
use rusqlite::Connection;
use std::sync::Arc;
use tokio::sync::watch;

pub struct Storage {
    db: Arc<Db>,
    tasks_tx: watch::Sender<Vec<Task>>,
    categories_tx: watch::Sender<Vec<Category>>,
}

impl Storage {
    /// Wraps an opened database and seeds both change streams with its rows.
    pub fn new(db: Arc<Db>) -> Result<Self> {
        let (tasks, categories) = {
            let conn = db.conn();
            (Tasks::new(&conn).list()?, Categories::new(&conn).list()?)
        };
        let (tasks_tx, _) = watch::channel(tasks);
        let (categories_tx, _) = watch::channel(categories);

        Ok(Storage { db, tasks_tx, categories_tx })
    }

    pub fn db(&self) -> Arc<Db> {
        Arc::clone(&self.db)
    }

    pub fn tasks(&self) -> Result<Vec<Task>> {
        Tasks::new(&self.db.conn()).list()
    }

    pub fn categories(&self) -> Result<Vec<Category>> {
        Categories::new(&self.db.conn()).list()
    }

    pub fn task(&self, id: i64) -> Result<Option<Task>> {
        Tasks::new(&self.db.conn()).get_by_id(id)
    }

    pub fn category(&self, id: i64) -> Result<Option<Category>> {
        Categories::new(&self.db.conn()).get_by_id(id)
    }

    pub fn tasks_in_category(&self, category_id: i64) -> Result<Vec<Task>> {
        Tasks::new(&self.db.conn()).list_by_category(category_id)
    }

    /// Live snapshots of all task rows. The receiver starts at the latest one.
    pub fn subscribe_tasks(&self) -> watch::Receiver<Vec<Task>> {
        self.tasks_tx.subscribe()
    }

    /// Live snapshots of all category rows.
    pub fn subscribe_categories(&self) -> watch::Receiver<Vec<Category>> {
        self.categories_tx.subscribe()
    }

    /// Inserts or updates a task and returns it as stored.
    pub fn upsert_task(&self, task: &Task) -> Result<Task> {
        let conn = self.db.conn();
        let tx = conn.unchecked_transaction()?;
        let id = Tasks::new(&tx).upsert(task)?;
        let tasks = Tasks::new(&tx).list()?;
        tx.commit()?;

        self.tasks_tx.send_replace(tasks);
        Ok(Task { id: Some(id), ..task.clone() })
    }

    pub fn upsert_category(&self, category: &Category) -> Result<Category> {
        let conn = self.db.conn();
        let tx = conn.unchecked_transaction()?;
        let id = Categories::new(&tx).upsert(category)?;
        let categories = Categories::new(&tx).list()?;
        tx.commit()?;

        self.categories_tx.send_replace(categories);
        Ok(Category {
            id: Some(id),
            ..category.clone()
        })
    }

    /// Deletes one task. Fails with [`StorageError::NotFound`] if it is absent.
    pub fn delete_task(&self, id: i64) -> Result<()> {
        let conn = self.db.conn();
        let tx = conn.unchecked_transaction()?;
        if Tasks::new(&tx).delete(id)? == 0 {
            return Err(StorageError::NotFound { entity: "task", id });
        }
        let tasks = Tasks::new(&tx).list()?;
        tx.commit()?;

        self.tasks_tx.send_replace(tasks);
        Ok(())
    }

    /// Deletes every task and returns the rows that were removed.
    pub fn delete_all_tasks(&self) -> Result<Vec<Task>> {
        let conn = self.db.conn();
        let tx = conn.unchecked_transaction()?;
        let removed = Tasks::new(&tx).list()?;
        Tasks::new(&tx).delete_all()?;
        tx.commit()?;

        self.tasks_tx.send_replace(Vec::new());
        Ok(removed)
    }

    /// Deletes a category and returns the tasks removed with it by the cascade.
    ///
    /// The affected tasks are read in the same transaction as the delete, so
    /// the returned list is exactly what the cascade removed.
    pub fn delete_category(&self, id: i64) -> Result<Vec<Task>> {
        let conn = self.db.conn();
        let tx = conn.unchecked_transaction()?;
        let cascaded = Tasks::new(&tx).list_by_category(id)?;
        if Categories::new(&tx).delete(id)? == 0 {
            return Err(StorageError::NotFound { entity: "category", id });
        }
        let (categories, tasks) = snapshot(&tx)?;
        tx.commit()?;

        self.publish(categories, tasks);
        Ok(cascaded)
    }

    /// Deletes every category, and with them every task. Returns the removed tasks.
    pub fn delete_all_categories(&self) -> Result<Vec<Task>> {
        let conn = self.db.conn();
        let tx = conn.unchecked_transaction()?;
        let cascaded = Tasks::new(&tx).list()?;
        Categories::new(&tx).delete_all()?;
        tx.commit()?;

        self.publish(Vec::new(), Vec::new());
        Ok(cascaded)
    }

    /// Re-reads both tables and publishes whichever snapshot differs from the
    /// last one sent. Picks up writes made by another process on the same file.
    /// Returns `true` if anything changed.
    pub fn reload(&self) -> Result<bool> {
        let conn = self.db.conn();
        let tasks = Tasks::new(&conn).list()?;
        let categories = Categories::new(&conn).list()?;

        let tasks_changed = self.tasks_tx.send_if_modified(|current| replace_if_changed(current, tasks));
        let categories_changed = self.categories_tx.send_if_modified(|current| replace_if_changed(current, categories));

        Ok(tasks_changed || categories_changed)
    }

    fn publish(&self, categories: Vec<Category>, tasks: Vec<Task>) {
        self.categories_tx.send_replace(categories);
        self.tasks_tx.send_replace(tasks);
    }
}

/// Reads both tables through `conn`. Writers call this before committing so a
/// failed read rolls their write back.
fn snapshot(conn: &Connection) -> Result<(Vec<Category>, Vec<Task>)> {
    Ok((Categories::new(conn).list()?, Tasks::new(conn).list()?))
}

fn replace_if_changed<T: PartialEq>(current: &mut Vec<T>, fresh: Vec<T>) -> bool {
    if *current == fresh {
        return false;
    }
    *current = fresh;
    true
}
