//! SQLite persistence layer.
//!
//! [`db::Db`] owns the connection and applies migrations; the table modules
//! borrow that connection for typed reads and writes.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use grit::db::{categories::Categories, db::Db, tasks::Tasks};
//! use grit::libs::task::{Category, Task};
//!
//! let db = Db::open_in_memory()?;
//! let conn = db.conn();
//! let work = Categories::new(&conn).upsert(&Category::new("Work", 0))?;
//! Tasks::new(&conn).upsert(&Task::new(work, "Report", 0))?;
//! # Ok::<(), grit::libs::error::StorageError>(())
//! ```

/// Connection management and initialization.
pub mod db;

/// Versioned schema migrations.
pub mod migrations;

/// Category table.
pub mod categories;

/// Task table; tasks cascade with their category.
pub mod tasks;

/// Pending deadline reminders, one row per task.
pub mod reminders;
