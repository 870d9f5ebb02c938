//! At-a-glance widget snapshot.
//!
//! The widget is whatever renders outside the app (a status bar block, a
//! desktop widget, a shell prompt segment). grit only publishes the data it
//! shows: a small JSON document rebuilt from the grouped view on every task
//! mutation.

use crate::libs::error::RefreshError;
use crate::libs::grouped_view::{GroupedView, GroupedViewStream};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::path::{Path, PathBuf};

/// Recomputes and republishes the external summary. Must be idempotent.
pub trait WidgetRefresher {
    fn refresh(&self) -> impl Future<Output = Result<(), RefreshError>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetTask {
    pub id: i64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetCategory {
    pub id: i64,
    pub name: String,
    pub pending: usize,
    pub completed: usize,
    /// First pending tasks in display order.
    pub tasks: Vec<WidgetTask>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetSnapshot {
    pub generated_at: DateTime<Utc>,
    pub pending: usize,
    pub completed: usize,
    pub categories: Vec<WidgetCategory>,
}

impl WidgetSnapshot {
    pub fn from_view(view: &GroupedView, max_tasks: usize, generated_at: DateTime<Utc>) -> Self {
        let categories: Vec<WidgetCategory> = view
            .iter()
            .filter_map(|group| {
                let id = group.category.id?;
                let pending = group.tasks.iter().filter(|t| !t.is_completed()).count();
                let tasks = group
                    .tasks
                    .iter()
                    .filter(|t| !t.is_completed())
                    .filter_map(|t| {
                        Some(WidgetTask {
                            id: t.id?,
                            title: t.title.clone(),
                            deadline: t.deadline,
                        })
                    })
                    .take(max_tasks)
                    .collect();

                Some(WidgetCategory {
                    id,
                    name: group.category.name.clone(),
                    pending,
                    completed: group.tasks.len() - pending,
                    tasks,
                })
            })
            .collect();

        WidgetSnapshot {
            generated_at,
            pending: categories.iter().map(|c| c.pending).sum(),
            completed: categories.iter().map(|c| c.completed).sum(),
            categories,
        }
    }
}

/// Writes the snapshot as pretty JSON to a file.
pub struct JsonWidget {
    view: GroupedViewStream,
    path: PathBuf,
    max_tasks: usize,
}

impl JsonWidget {
    pub fn new(view: GroupedViewStream, path: PathBuf, max_tasks: usize) -> Self {
        JsonWidget { view, path, max_tasks }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn read_snapshot(&self) -> Result<WidgetSnapshot, RefreshError> {
        let raw = tokio::fs::read(&self.path).await?;
        Ok(serde_json::from_slice(&raw)?)
    }
}

impl WidgetRefresher for JsonWidget {
    async fn refresh(&self) -> Result<(), RefreshError> {
        let snapshot = WidgetSnapshot::from_view(&self.view.current(), self.max_tasks, Utc::now());
        let body = serde_json::to_vec_pretty(&snapshot)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        // Readers never see a half-written file
        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, &body).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;

        tracing::debug!(path = %self.path.display(), pending = snapshot.pending, "widget refreshed");
        Ok(())
    }
}
