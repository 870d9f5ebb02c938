//! Display implementation for grit messages.
//!
//! All message text is defined here, in one place, so wording stays
//! consistent across commands: sentence case, active voice, and the relevant
//! names or counts interpolated from the variant's parameters.

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === TASK MESSAGES ===
            Message::TaskSaved(id, title) => format!("Task #{} '{}' saved", id, title),
            Message::TaskCompleted(title) => format!("Task '{}' completed", title),
            Message::TaskReopened(title) => format!("Task '{}' reopened", title),
            Message::TaskDeleted(title) => format!("Task '{}' deleted", title),
            Message::TaskMoved(title, category) => format!("Task '{}' moved to '{}'", title, category),
            Message::TasksCleared(count) => format!("Deleted {} tasks", count),
            Message::TaskNotFound(id) => format!("Task #{} not found", id),
            Message::NoTasks => "No tasks yet".to_string(),
            Message::ConfirmClearTasks(count) => format!("Delete all {} tasks?", count),
            Message::PromptTaskTitle => "Task title".to_string(),

            // === CATEGORY MESSAGES ===
            Message::CategorySaved(id, name) => format!("Category #{} '{}' saved", id, name),
            Message::CategoryRenamed(old, new) => format!("Category '{}' renamed to '{}'", old, new),
            Message::CategoryMoved(name, index) => format!("Category '{}' moved to position {}", name, index),
            Message::CategoryDeleted(name, count) => match count {
                0 => format!("Category '{}' deleted", name),
                1 => format!("Category '{}' and its task deleted", name),
                _ => format!("Category '{}' and its {} tasks deleted", name, count),
            },
            Message::CategoriesCleared(count) => format!("Deleted all categories and {} tasks", count),
            Message::CategoryNotFound(category) => format!("Category '{}' not found", category),
            Message::CategoryAlreadyExists(name) => format!("Category '{}' already exists", name),
            Message::NoCategories => "No categories yet. Create one with `grit category add <name>`".to_string(),
            Message::CategoryListHeader => "Categories:".to_string(),
            Message::ConfirmDeleteCategory(name, count) => {
                format!("Delete category '{}' and its {} tasks?", name, count)
            }
            Message::ConfirmClearCategories => "Delete every category and every task?".to_string(),
            Message::PromptCategoryName => "Category name".to_string(),

            // === BOARD MESSAGES ===
            Message::BoardHeader(categories, tasks) => format!("{} categories, {} tasks", categories, tasks),
            Message::BoardEmptyCategory => "(empty)".to_string(),
            Message::BoardChanged => "Board updated".to_string(),

            // === INPUT MESSAGES ===
            Message::InvalidDeadline(input) => {
                format!("Invalid deadline '{}'. Use 'YYYY-MM-DD HH:MM' (local time) or RFC 3339", input)
            }
            Message::InvalidPriority(input) => format!("Invalid priority '{}'. Use low, medium or high", input),
            Message::OperationCancelled => "Operation cancelled".to_string(),

            // === SIDE EFFECT MESSAGES ===
            Message::SideEffectFailed(error) => format!("Saved, but {}", error),
            Message::ReminderDue(title, deadline) => format!("⏰ '{}' is due {}", title, deadline),
            Message::RemindersPending(count) => format!("{} reminders pending", count),
            Message::NoRemindersPending => "No reminders pending".to_string(),
            Message::WidgetRefreshed(path) => format!("Widget snapshot written to {}", path),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved".to_string(),
            Message::ConfigModuleReminders => "Reminders".to_string(),
            Message::ConfigModuleWidget => "Widget".to_string(),
            Message::ConfigModuleDaemon => "Watcher".to_string(),
            Message::PromptSelectModules => "Select sections to configure".to_string(),
            Message::PromptRemindersEnabled => "Enable deadline reminders?".to_string(),
            Message::PromptLeadMinutes => "Minutes before the deadline to remind".to_string(),
            Message::PromptWidgetPath => "Widget snapshot path (empty for default)".to_string(),
            Message::PromptWidgetMaxTasks => "Tasks shown per category".to_string(),
            Message::PromptPollInterval => "Poll interval (ms)".to_string(),

            // === WATCHER MESSAGES ===
            Message::WatcherStarted(poll_interval) => format!("Watching for due reminders every {} ms. Press Ctrl+C to stop", poll_interval),
            Message::WatcherStopped => "Watcher stopped".to_string(),
            Message::WatcherError(error) => format!("Watcher error: {}", error),
            Message::WatcherReceivedSigterm => "Received SIGTERM, shutting down".to_string(),
            Message::WatcherReceivedSigint => "Received SIGINT, shutting down".to_string(),
            Message::WatcherReceivedCtrlC => "Received Ctrl+C, shutting down".to_string(),
            Message::WatcherCtrlCListenFailed(error) => format!("Failed to listen for Ctrl+C: {}", error),
            Message::WatcherSignalHandlingNotSupported => "Signal handling is not supported on this platform".to_string(),

            // === MIGRATION MESSAGES ===
            Message::MigrationsFound(count) => format!("Found {} pending database migrations", count),
            Message::RunningMigration(version, name) => format!("Running migration v{}: {}", version, name),
            Message::MigrationCompleted(version) => format!("✓ Migration v{} completed", version),
            Message::MigrationFailed(version, error) => format!("✗ Migration v{} failed: {}", version, error),
            Message::AllMigrationsCompleted => "All database migrations completed successfully".to_string(),
            Message::DatabaseVersion(version) => format!("Current database version: {}", version),
            Message::DatabaseUpToDate => "Database schema is up to date".to_string(),
            Message::DatabaseNeedsUpdate => "Database schema needs to be updated".to_string(),
            Message::MigrationHistory => "Migration history:".to_string(),
            Message::NothingToRollback => "Nothing to rollback".to_string(),
            Message::RollingBack(from, to) => format!("Rolling back from v{} to v{}", from, to),
            Message::RollbackCompleted(version) => format!("Rollback to v{} completed", version),
        };

        write!(f, "{}", text)
    }
}
