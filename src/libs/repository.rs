//! Task repository: the single writer of tasks and categories.
//!
//! Each mutation writes storage first. Only once the write has committed does
//! it touch the reminder scheduler and then the widget. A storage failure
//! aborts the mutation before any side effect runs. Side-effect failures are
//! logged, collected into [`Applied::warnings`] and never undo the write; a
//! failed reminder does not stop the widget refresh.
//!
//! Dropping a mutation future after its write committed leaves the write in
//! place and skips the side effects not yet issued.
//!
//! ## Usage
//!
//! ```rust,no_run
//! # async fn demo() -> Result<(), grit::libs::error::StorageError> {
//! use grit::db::db::Db;
//! use grit::libs::config::ReminderConfig;
//! use grit::libs::repository::TaskRepository;
//! use grit::libs::scheduler::SqliteReminderScheduler;
//! use grit::libs::storage::Storage;
//! use grit::libs::task::{Category, Task};
//! use grit::libs::widget::JsonWidget;
//! use std::sync::Arc;
//!
//! let db = Arc::new(Db::open_in_memory()?);
//! let storage = Storage::new(Arc::clone(&db))?;
//! let widget = JsonWidget::new(grit::libs::grouped_view::GroupedViewStream::from_storage(&storage), "widget.json".into(), 5);
//! let reminders = SqliteReminderScheduler::new(db, ReminderConfig::default());
//! let repo = TaskRepository::new(storage, reminders, widget);
//!
//! let work = repo.upsert_category(&Category::new("Work", 0)).await?;
//! let applied = repo.upsert_task(&Task::new(work.id.unwrap_or_default(), "Report", 0)).await?;
//! for warning in &applied.warnings {
//!     eprintln!("{}", warning);
//! }
//! # Ok(())
//! # }
//! ```

use crate::libs::error::{Result, SideEffectError, StorageError};
use crate::libs::grouped_view::GroupedViewStream;
use crate::libs::messages::Message;
use crate::libs::scheduler::ReminderScheduler;
use crate::libs::storage::Storage;
use crate::libs::task::{Category, Task};
use crate::libs::widget::WidgetRefresher;
use crate::msg_warning;

/// Result of a committed mutation together with its non-fatal side-effect
/// failures.
#[derive(Debug)]
pub struct Applied<T> {
    pub value: T,
    pub warnings: Vec<SideEffectError>,
}

impl<T> Applied<T> {
    fn new(value: T, warnings: Vec<SideEffectError>) -> Self {
        Applied { value, warnings }
    }

    /// `true` if every side effect succeeded.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

pub struct TaskRepository<R, W> {
    storage: Storage,
    reminders: R,
    widget: W,
}

impl<R: ReminderScheduler, W: WidgetRefresher> TaskRepository<R, W> {
    pub fn new(storage: Storage, reminders: R, widget: W) -> Self {
        TaskRepository { storage, reminders, widget }
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn reminders(&self) -> &R {
        &self.reminders
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }

    /// Live grouped view; the first item is the current state.
    pub fn observe_grouped_view(&self) -> GroupedViewStream {
        GroupedViewStream::from_storage(&self.storage)
    }

    pub fn list_tasks(&self) -> Result<Vec<Task>> {
        self.storage.tasks()
    }

    pub fn list_categories(&self) -> Result<Vec<Category>> {
        self.storage.categories()
    }

    pub fn get_task(&self, id: i64) -> Result<Option<Task>> {
        self.storage.task(id)
    }

    pub fn get_category(&self, id: i64) -> Result<Option<Category>> {
        self.storage.category(id)
    }

    /// Inserts or updates a task, then re-arms its reminder from the current
    /// deadline and refreshes the widget. Returns the task as stored.
    ///
    /// Fails with [`StorageError::Constraint`] if the category does not exist.
    pub async fn upsert_task(&self, task: &Task) -> Result<Applied<Task>> {
        let stored = self.storage.upsert_task(task)?;
        tracing::debug!(task_id = ?stored.id, category_id = stored.category_id, "task saved");

        let mut warnings = Vec::new();
        // Cancel first: a cleared or completed deadline schedules nothing and
        // would otherwise leave the old reminder armed
        self.cancel_reminder(&stored, &mut warnings).await;
        self.schedule_reminder(&stored, &mut warnings).await;
        self.refresh_widget(&mut warnings).await;

        Ok(Applied::new(stored, warnings))
    }

    /// Deletes a stored task, cancels its reminder and refreshes the widget.
    pub async fn delete_task(&self, task: &Task) -> Result<Applied<()>> {
        let id = task.id.ok_or(StorageError::MissingId("task"))?;
        self.storage.delete_task(id)?;
        tracing::debug!(task_id = id, "task deleted");

        let mut warnings = Vec::new();
        self.cancel_reminder(task, &mut warnings).await;
        self.refresh_widget(&mut warnings).await;

        Ok(Applied::new((), warnings))
    }

    /// Deletes every task. Returns how many were removed.
    pub async fn delete_all_tasks(&self) -> Result<Applied<usize>> {
        let removed = self.storage.delete_all_tasks()?;
        tracing::debug!(count = removed.len(), "all tasks deleted");

        let mut warnings = Vec::new();
        for task in &removed {
            self.cancel_reminder(task, &mut warnings).await;
        }
        self.refresh_widget(&mut warnings).await;

        Ok(Applied::new(removed.len(), warnings))
    }

    /// Inserts or updates a category. No side effects: the grouped view picks
    /// the change up from the category stream.
    pub async fn upsert_category(&self, category: &Category) -> Result<Category> {
        let stored = self.storage.upsert_category(category)?;
        tracing::debug!(category_id = ?stored.id, "category saved");
        Ok(stored)
    }

    /// Deletes a category together with its tasks. Reminders of the cascaded
    /// tasks are cancelled and the widget refreshed once. Returns how many
    /// tasks went with the category.
    pub async fn delete_category(&self, category: &Category) -> Result<Applied<usize>> {
        let id = category.id.ok_or(StorageError::MissingId("category"))?;
        let cascaded = self.storage.delete_category(id)?;
        tracing::debug!(category_id = id, cascaded = cascaded.len(), "category deleted");

        Ok(self.clean_up_cascade(cascaded).await)
    }

    /// Deletes every category and therefore every task.
    pub async fn delete_all_categories(&self) -> Result<Applied<usize>> {
        let cascaded = self.storage.delete_all_categories()?;
        tracing::debug!(cascaded = cascaded.len(), "all categories deleted");

        Ok(self.clean_up_cascade(cascaded).await)
    }

    async fn clean_up_cascade(&self, cascaded: Vec<Task>) -> Applied<usize> {
        let mut warnings = Vec::new();
        for task in &cascaded {
            self.cancel_reminder(task, &mut warnings).await;
        }
        self.refresh_widget(&mut warnings).await;

        Applied::new(cascaded.len(), warnings)
    }

    async fn schedule_reminder(&self, task: &Task, warnings: &mut Vec<SideEffectError>) {
        if let Err(source) = self.reminders.schedule_deadline_reminder(task).await {
            Self::warn(
                warnings,
                SideEffectError::Scheduling {
                    task_id: task.id.unwrap_or_default(),
                    source,
                },
            );
        }
    }

    async fn cancel_reminder(&self, task: &Task, warnings: &mut Vec<SideEffectError>) {
        if let Err(source) = self.reminders.cancel_reminders(task).await {
            Self::warn(
                warnings,
                SideEffectError::Scheduling {
                    task_id: task.id.unwrap_or_default(),
                    source,
                },
            );
        }
    }

    async fn refresh_widget(&self, warnings: &mut Vec<SideEffectError>) {
        if let Err(e) = self.widget.refresh().await {
            Self::warn(warnings, e.into());
        }
    }

    fn warn(warnings: &mut Vec<SideEffectError>, error: SideEffectError) {
        msg_warning!(Message::SideEffectFailed(error.to_string()));
        warnings.push(error);
    }
}
