//! Core library modules for grit.
//!
//! ## Features
//!
//! - **Storage**: SQLite-backed tasks and categories with live change streams
//! - **Aggregation**: tasks grouped under their categories, recomputed on change
//! - **Mutations**: one repository that writes first and then re-arms reminders and the widget
//! - **Side effects**: deadline reminders and a JSON widget snapshot
//! - **Console**: tables, messages, deadline formatting
//!
//! ## Usage
//!
//! ```rust,no_run
//! use grit::db::db::Db;
//! use grit::libs::grouped_view::GroupedView;
//! use grit::libs::storage::Storage;
//! use std::sync::Arc;
//!
//! let storage = Storage::new(Arc::new(Db::new()?))?;
//! let view = GroupedView::build(&storage.categories()?, &storage.tasks()?);
//! println!("{} categories", view.category_count());
//! # Ok::<(), grit::libs::error::StorageError>(())
//! ```

pub mod config;
pub mod daemon;
pub mod data_storage;
pub mod error;
pub mod formatter;
pub mod grouped_view;
pub mod messages;
pub mod repository;
pub mod scheduler;
pub mod storage;
pub mod task;
pub mod view;
pub mod widget;
