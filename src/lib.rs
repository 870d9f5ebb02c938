//! # Grit - Grouped Reminders and Items Tracker
//!
//! A command-line task tracker that keeps tasks grouped by category.
//!
//! ## Features
//!
//! - **Categories**: ordered groups that own their tasks; deleting one deletes its tasks
//! - **Tasks**: title, completion, position, optional deadline and priority
//! - **Live Board**: a grouped view that updates whenever tasks or categories change
//! - **Reminders**: one pending reminder per task deadline, delivered by `grit watch`
//! - **Widget**: a JSON snapshot of pending work for status bars and desktop widgets
//!
//! ## Usage
//!
//! ```rust,no_run
//! use grit::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod commands;
pub mod db;
pub mod libs;
