//! Grouped view: categories with their ordered tasks, kept live.
//!
//! [`GroupedView::build`] is the pure projection. [`GroupedViewStream`] joins
//! the storage gateway's two change streams with combine-latest semantics: it
//! recomputes whenever *either* the task or the category snapshot changes, and
//! a fresh subscriber gets the latest view on its first `next()` call.
//!
//! ## Usage
//!
//! ```rust,no_run
//! # async fn demo(storage: &grit::libs::storage::Storage) {
//! use grit::libs::grouped_view::GroupedViewStream;
//!
//! let mut views = GroupedViewStream::from_storage(storage);
//! while let Some(view) = views.next().await {
//!     for group in view.groups() {
//!         println!("{}: {} tasks", group.category.name, group.tasks.len());
//!     }
//! }
//! # }
//! ```

use crate::libs::storage::Storage;
use crate::libs::task::{Category, Task};
use serde::Serialize;
use std::collections::HashMap;
use tokio::sync::watch;

/// One category and its tasks, ordered by task index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryGroup {
    pub category: Category,
    pub tasks: Vec<Task>,
}

/// Categories ordered by index, each with its own tasks ordered by index.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct GroupedView {
    groups: Vec<CategoryGroup>,
}

impl GroupedView {
    /// Projects raw table snapshots into the grouped view.
    ///
    /// Both sorts are stable, so equal indices keep the input (storage) order.
    /// Categories without tasks get an empty group; tasks whose category is
    /// unknown are left out.
    pub fn build(categories: &[Category], tasks: &[Task]) -> Self {
        let mut categories = categories.to_vec();
        categories.sort_by_key(|category| category.index);

        let mut tasks = tasks.to_vec();
        tasks.sort_by_key(|task| task.index);

        let mut partitions: HashMap<i64, Vec<Task>> = HashMap::new();
        for task in tasks {
            partitions.entry(task.category_id).or_default().push(task);
        }

        let groups = categories
            .into_iter()
            .map(|category| {
                let tasks = category.id.and_then(|id| partitions.remove(&id)).unwrap_or_default();
                CategoryGroup { category, tasks }
            })
            .collect();

        GroupedView { groups }
    }

    pub fn groups(&self) -> &[CategoryGroup] {
        &self.groups
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryGroup> {
        self.groups.iter()
    }

    pub fn get(&self, category_id: i64) -> Option<&CategoryGroup> {
        self.groups.iter().find(|group| group.category.id == Some(category_id))
    }

    /// Tasks of one category, or `None` if the category is not in the view.
    pub fn tasks(&self, category_id: i64) -> Option<&[Task]> {
        self.get(category_id).map(|group| group.tasks.as_slice())
    }

    pub fn find_task(&self, task_id: i64) -> Option<&Task> {
        self.groups.iter().flat_map(|group| group.tasks.iter()).find(|task| task.id == Some(task_id))
    }

    pub fn category_count(&self) -> usize {
        self.groups.len()
    }

    pub fn task_count(&self) -> usize {
        self.groups.iter().map(|group| group.tasks.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Restartable, replay-latest stream of [`GroupedView`]s.
///
/// Cloning yields an independent subscriber that starts again from the
/// latest view.
#[derive(Debug)]
pub struct GroupedViewStream {
    categories: watch::Receiver<Vec<Category>>,
    tasks: watch::Receiver<Vec<Task>>,
    primed: bool,
}

impl GroupedViewStream {
    pub fn new(categories: watch::Receiver<Vec<Category>>, tasks: watch::Receiver<Vec<Task>>) -> Self {
        GroupedViewStream {
            categories,
            tasks,
            primed: false,
        }
    }

    pub fn from_storage(storage: &Storage) -> Self {
        Self::new(storage.subscribe_categories(), storage.subscribe_tasks())
    }

    /// The view for the latest snapshots, without waiting.
    pub fn current(&self) -> GroupedView {
        GroupedView::build(&self.categories.borrow(), &self.tasks.borrow())
    }

    /// Next grouped view.
    ///
    /// The first call returns the latest view immediately. Later calls wait
    /// until either source publishes a new snapshot. Returns `None` once the
    /// storage gateway has been dropped.
    pub async fn next(&mut self) -> Option<GroupedView> {
        if self.primed {
            let changed = tokio::select! {
                changed = self.categories.changed() => changed,
                changed = self.tasks.changed() => changed,
            };
            if changed.is_err() {
                return None;
            }
        }
        self.primed = true;

        let categories = self.categories.borrow_and_update().clone();
        let tasks = self.tasks.borrow_and_update().clone();
        Some(GroupedView::build(&categories, &tasks))
    }
}

impl Clone for GroupedViewStream {
    fn clone(&self) -> Self {
        Self::new(self.categories.clone(), self.tasks.clone())
    }
}
