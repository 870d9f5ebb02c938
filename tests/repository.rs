#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use grit::db::db::Db;
    use grit::libs::error::{RefreshError, SchedulingError, SideEffectError, StorageError};
    use grit::libs::repository::TaskRepository;
    use grit::libs::scheduler::ReminderScheduler;
    use grit::libs::storage::Storage;
    use grit::libs::task::{Category, Task};
    use grit::libs::widget::WidgetRefresher;
    use parking_lot::Mutex;
    use rusqlite::Connection;
    use std::sync::Arc;
    use tempfile::TempDir;
    use test_context::{test_context, AsyncTestContext};

    type CallLog = Arc<Mutex<Vec<String>>>;

    struct RecordingScheduler {
        log: CallLog,
        fail_schedule: bool,
        fail_cancel: bool,
    }

    impl ReminderScheduler for RecordingScheduler {
        async fn schedule_deadline_reminder(&self, task: &Task) -> Result<(), SchedulingError> {
            self.log.lock().push(format!("schedule:{}", task.id.unwrap_or_default()));
            if self.fail_schedule {
                return Err(SchedulingError::PermissionDenied("denied in test".to_string()));
            }
            Ok(())
        }

        async fn cancel_reminders(&self, task: &Task) -> Result<(), SchedulingError> {
            self.log.lock().push(format!("cancel:{}", task.id.unwrap_or_default()));
            if self.fail_cancel {
                return Err(SchedulingError::Store("scheduler offline".to_string()));
            }
            Ok(())
        }
    }

    struct RecordingWidget {
        log: CallLog,
        fail: bool,
    }

    impl WidgetRefresher for RecordingWidget {
        async fn refresh(&self) -> Result<(), RefreshError> {
            self.log.lock().push("refresh".to_string());
            if self.fail {
                return Err(RefreshError::Io(std::io::Error::other("widget host gone")));
            }
            Ok(())
        }
    }

    struct RepositoryTestContext {
        temp_dir: TempDir,
        db: Arc<Db>,
        log: CallLog,
    }

    impl AsyncTestContext for RepositoryTestContext {
        async fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db = Arc::new(Db::open(temp_dir.path().join("grit.db")).unwrap());
            RepositoryTestContext {
                temp_dir,
                db,
                log: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    impl RepositoryTestContext {
        fn repo(&self) -> TaskRepository<RecordingScheduler, RecordingWidget> {
            self.repo_failing(Failures::default())
        }

        fn repo_failing(&self, failures: Failures) -> TaskRepository<RecordingScheduler, RecordingWidget> {
            TaskRepository::new(
                Storage::new(Arc::clone(&self.db)).unwrap(),
                RecordingScheduler {
                    log: Arc::clone(&self.log),
                    fail_schedule: failures.schedule,
                    fail_cancel: failures.cancel,
                },
                RecordingWidget {
                    log: Arc::clone(&self.log),
                    fail: failures.refresh,
                },
            )
        }

        fn calls(&self) -> Vec<String> {
            self.log.lock().clone()
        }

        fn clear_calls(&self) {
            self.log.lock().clear();
        }

        /// Second connection to the same file, for writes behind the repository's back.
        fn raw_connection(&self) -> Connection {
            Connection::open(self.temp_dir.path().join("grit.db")).unwrap()
        }
    }

    #[derive(Default)]
    struct Failures {
        schedule: bool,
        cancel: bool,
        refresh: bool,
    }

    #[test_context(RepositoryTestContext)]
    #[tokio::test]
    async fn test_new_task_appears_in_grouped_view(ctx: &mut RepositoryTestContext) {
        let repo = ctx.repo();
        let mut views = repo.observe_grouped_view();

        let work = repo.upsert_category(&Category::new("Work", 0)).await.unwrap();
        let work_id = work.id.unwrap();
        let deadline = Utc::now() + Duration::hours(2);
        let applied = repo.upsert_task(&Task::new(work_id, "Report", 0).with_deadline(deadline)).await.unwrap();
        assert!(applied.is_clean());
        let report = applied.into_inner();

        let view = views.next().await.unwrap();
        assert_eq!(view.category_count(), 1);
        let tasks = view.tasks(work_id).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Report");
        assert_eq!(tasks[0].id, report.id);
        assert_eq!(tasks[0].deadline, Some(deadline));
    }

    #[test_context(RepositoryTestContext)]
    #[tokio::test]
    async fn test_task_side_effects_run_in_order(ctx: &mut RepositoryTestContext) {
        let repo = ctx.repo();
        let work = repo.upsert_category(&Category::new("Work", 0)).await.unwrap();
        assert!(ctx.calls().is_empty(), "category upsert has no side effects");

        let report = repo.upsert_task(&Task::new(work.id.unwrap(), "Report", 0)).await.unwrap().into_inner();
        let id = report.id.unwrap();

        assert_eq!(ctx.calls(), vec![format!("cancel:{}", id), format!("schedule:{}", id), "refresh".to_string()]);
    }

    #[test_context(RepositoryTestContext)]
    #[tokio::test]
    async fn test_update_replaces_task_in_place(ctx: &mut RepositoryTestContext) {
        let repo = ctx.repo();
        let work = repo.upsert_category(&Category::new("Work", 0)).await.unwrap();
        let mut report = repo.upsert_task(&Task::new(work.id.unwrap(), "Report", 0)).await.unwrap().into_inner();

        report.title = "Quarterly report".to_string();
        report.status = true;
        let updated = repo.upsert_task(&report).await.unwrap().into_inner();
        assert_eq!(updated.id, report.id);

        let tasks = repo.list_tasks().unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Quarterly report");
        assert!(tasks[0].status);

        let view = repo.observe_grouped_view().next().await.unwrap();
        assert_eq!(view.task_count(), 1);
        assert_eq!(view.find_task(report.id.unwrap()).unwrap().title, "Quarterly report");
    }

    #[test_context(RepositoryTestContext)]
    #[tokio::test]
    async fn test_round_trip_preserves_fields(ctx: &mut RepositoryTestContext) {
        let repo = ctx.repo();
        let home = repo.upsert_category(&Category::new("Home", 3)).await.unwrap();
        let deadline = Utc::now() + Duration::days(1);
        let task = Task::new(home.id.unwrap(), "Water plants", 7)
            .with_deadline(deadline)
            .with_priority(grit::libs::task::Priority::High);

        let stored = repo.upsert_task(&task).await.unwrap().into_inner();
        let fetched = repo.get_task(stored.id.unwrap()).unwrap().unwrap();
        assert_eq!(fetched, stored);
        assert_eq!(repo.get_category(home.id.unwrap()).unwrap().unwrap(), home);
    }

    #[test_context(RepositoryTestContext)]
    #[tokio::test]
    async fn test_delete_category_cascades_to_tasks(ctx: &mut RepositoryTestContext) {
        let repo = ctx.repo();
        let work = repo.upsert_category(&Category::new("Work", 0)).await.unwrap();
        let home = repo.upsert_category(&Category::new("Home", 1)).await.unwrap();
        let a = repo.upsert_task(&Task::new(work.id.unwrap(), "A", 0)).await.unwrap().into_inner();
        let b = repo.upsert_task(&Task::new(work.id.unwrap(), "B", 1)).await.unwrap().into_inner();
        repo.upsert_task(&Task::new(home.id.unwrap(), "C", 0)).await.unwrap();
        ctx.clear_calls();

        let applied = repo.delete_category(&work).await.unwrap();
        assert_eq!(applied.value, 2);
        assert!(applied.is_clean());

        let remaining = repo.list_tasks().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].title, "C");

        let view = repo.observe_grouped_view().next().await.unwrap();
        assert!(view.get(work.id.unwrap()).is_none());
        assert_eq!(view.category_count(), 1);

        assert_eq!(
            ctx.calls(),
            vec![format!("cancel:{}", a.id.unwrap()), format!("cancel:{}", b.id.unwrap()), "refresh".to_string()]
        );
    }

    #[test_context(RepositoryTestContext)]
    #[tokio::test]
    async fn test_delete_empty_category_still_refreshes(ctx: &mut RepositoryTestContext) {
        let repo = ctx.repo();
        let empty = repo.upsert_category(&Category::new("Empty", 0)).await.unwrap();

        let applied = repo.delete_category(&empty).await.unwrap();
        assert_eq!(applied.value, 0);
        assert_eq!(ctx.calls(), vec!["refresh".to_string()]);
        assert!(repo.list_categories().unwrap().is_empty());
    }

    #[test_context(RepositoryTestContext)]
    #[tokio::test]
    async fn test_task_with_missing_category_is_rejected(ctx: &mut RepositoryTestContext) {
        let repo = ctx.repo();
        let mut views = repo.observe_grouped_view();
        let before = views.next().await.unwrap();

        let result = repo.upsert_task(&Task::new(999, "Orphan", 0)).await;
        assert!(matches!(result, Err(StorageError::Constraint(_))));

        assert!(ctx.calls().is_empty(), "no side effect after a failed write");
        assert!(repo.list_tasks().unwrap().is_empty());
        assert_eq!(views.current(), before);
    }

    #[test_context(RepositoryTestContext)]
    #[tokio::test]
    async fn test_scheduling_failure_keeps_write_and_refreshes_widget(ctx: &mut RepositoryTestContext) {
        let repo = ctx.repo_failing(Failures {
            schedule: true,
            ..Failures::default()
        });
        let work = repo.upsert_category(&Category::new("Work", 0)).await.unwrap();

        let applied = repo
            .upsert_task(&Task::new(work.id.unwrap(), "Report", 0).with_deadline(Utc::now() + Duration::hours(1)))
            .await
            .unwrap();

        assert_eq!(applied.warnings.len(), 1);
        assert!(matches!(
            applied.warnings[0],
            SideEffectError::Scheduling {
                source: SchedulingError::PermissionDenied(_),
                ..
            }
        ));
        assert_eq!(ctx.calls().last().map(String::as_str), Some("refresh"));
        assert_eq!(repo.list_tasks().unwrap().len(), 1);
    }

    #[test_context(RepositoryTestContext)]
    #[tokio::test]
    async fn test_widget_failure_is_a_warning(ctx: &mut RepositoryTestContext) {
        let repo = ctx.repo_failing(Failures {
            refresh: true,
            ..Failures::default()
        });
        let work = repo.upsert_category(&Category::new("Work", 0)).await.unwrap();
        let report = repo.upsert_task(&Task::new(work.id.unwrap(), "Report", 0)).await.unwrap().into_inner();

        let applied = repo.delete_task(&report).await.unwrap();
        assert_eq!(applied.warnings.len(), 1);
        assert!(matches!(applied.warnings[0], SideEffectError::Refresh(_)));
        assert!(repo.list_tasks().unwrap().is_empty());
    }

    #[test_context(RepositoryTestContext)]
    #[tokio::test]
    async fn test_delete_task_cancels_then_refreshes(ctx: &mut RepositoryTestContext) {
        let repo = ctx.repo();
        let work = repo.upsert_category(&Category::new("Work", 0)).await.unwrap();
        let report = repo.upsert_task(&Task::new(work.id.unwrap(), "Report", 0)).await.unwrap().into_inner();
        ctx.clear_calls();

        repo.delete_task(&report).await.unwrap();
        assert_eq!(ctx.calls(), vec![format!("cancel:{}", report.id.unwrap()), "refresh".to_string()]);
    }

    #[test_context(RepositoryTestContext)]
    #[tokio::test]
    async fn test_delete_task_requires_stored_task(ctx: &mut RepositoryTestContext) {
        let repo = ctx.repo();

        let unsaved = repo.delete_task(&Task::new(1, "Never saved", 0)).await;
        assert!(matches!(unsaved, Err(StorageError::MissingId("task"))));

        let mut ghost = Task::new(1, "Ghost", 0);
        ghost.id = Some(42);
        let missing = repo.delete_task(&ghost).await;
        assert!(matches!(missing, Err(StorageError::NotFound { entity: "task", id: 42 })));

        assert!(ctx.calls().is_empty());
    }

    #[test_context(RepositoryTestContext)]
    #[tokio::test]
    async fn test_delete_all_tasks_keeps_categories(ctx: &mut RepositoryTestContext) {
        let repo = ctx.repo();
        let work = repo.upsert_category(&Category::new("Work", 0)).await.unwrap();
        for (i, title) in ["A", "B", "C"].iter().enumerate() {
            repo.upsert_task(&Task::new(work.id.unwrap(), title, i as i32)).await.unwrap();
        }
        ctx.clear_calls();

        let applied = repo.delete_all_tasks().await.unwrap();
        assert_eq!(applied.value, 3);
        assert!(repo.list_tasks().unwrap().is_empty());
        assert_eq!(repo.list_categories().unwrap().len(), 1);

        let calls = ctx.calls();
        assert_eq!(calls.iter().filter(|c| c.starts_with("cancel:")).count(), 3);
        assert_eq!(calls.last().map(String::as_str), Some("refresh"));

        let view = repo.observe_grouped_view().next().await.unwrap();
        assert_eq!(view.tasks(work.id.unwrap()), Some(&[][..]));
    }

    #[test_context(RepositoryTestContext)]
    #[tokio::test]
    async fn test_delete_all_categories_empties_board(ctx: &mut RepositoryTestContext) {
        let repo = ctx.repo();
        let work = repo.upsert_category(&Category::new("Work", 0)).await.unwrap();
        let home = repo.upsert_category(&Category::new("Home", 1)).await.unwrap();
        repo.upsert_task(&Task::new(work.id.unwrap(), "A", 0)).await.unwrap();
        repo.upsert_task(&Task::new(home.id.unwrap(), "B", 0)).await.unwrap();

        let applied = repo.delete_all_categories().await.unwrap();
        assert_eq!(applied.value, 2);
        assert!(repo.list_tasks().unwrap().is_empty());
        assert!(repo.observe_grouped_view().next().await.unwrap().is_empty());
    }

    #[test_context(RepositoryTestContext)]
    #[tokio::test]
    async fn test_category_changes_reach_the_stream(ctx: &mut RepositoryTestContext) {
        let repo = ctx.repo();
        let mut work = repo.upsert_category(&Category::new("Work", 0)).await.unwrap();
        let mut views = repo.observe_grouped_view();
        assert_eq!(views.next().await.unwrap().groups()[0].category.name, "Work");

        work.name = "Office".to_string();
        repo.upsert_category(&work).await.unwrap();

        let view = views.next().await.unwrap();
        assert_eq!(view.groups()[0].category.name, "Office");
        assert!(ctx.calls().is_empty());
    }

    #[test_context(RepositoryTestContext)]
    #[tokio::test]
    async fn test_failed_cancel_on_delete_task_is_a_warning(ctx: &mut RepositoryTestContext) {
        let repo = ctx.repo_failing(Failures {
            cancel: true,
            ..Failures::default()
        });
        let work = repo.upsert_category(&Category::new("Work", 0)).await.unwrap();
        let report = repo.upsert_task(&Task::new(work.id.unwrap(), "Report", 0)).await.unwrap().into_inner();
        ctx.clear_calls();

        let applied = repo.delete_task(&report).await.unwrap();

        assert_eq!(applied.warnings.len(), 1);
        assert!(matches!(
            applied.warnings[0],
            SideEffectError::Scheduling {
                source: SchedulingError::Store(_),
                ..
            }
        ));
        assert_eq!(ctx.calls(), vec![format!("cancel:{}", report.id.unwrap()), "refresh".to_string()]);
        assert!(repo.list_tasks().unwrap().is_empty());
        assert!(repo.observe_grouped_view().next().await.unwrap().find_task(report.id.unwrap()).is_none());
    }

    #[test_context(RepositoryTestContext)]
    #[tokio::test]
    async fn test_failed_cancels_during_cascade_still_refresh(ctx: &mut RepositoryTestContext) {
        let repo = ctx.repo_failing(Failures {
            cancel: true,
            ..Failures::default()
        });
        let work = repo.upsert_category(&Category::new("Work", 0)).await.unwrap();
        repo.upsert_task(&Task::new(work.id.unwrap(), "A", 0)).await.unwrap();
        repo.upsert_task(&Task::new(work.id.unwrap(), "B", 1)).await.unwrap();
        ctx.clear_calls();

        let applied = repo.delete_category(&work).await.unwrap();

        assert_eq!(applied.value, 2);
        assert_eq!(applied.warnings.len(), 2);
        assert!(applied.warnings.iter().all(|w| matches!(w, SideEffectError::Scheduling { .. })));
        let calls = ctx.calls();
        assert_eq!(calls.iter().filter(|c| c.starts_with("cancel:")).count(), 2);
        assert_eq!(calls.last().map(String::as_str), Some("refresh"));
        assert!(repo.list_tasks().unwrap().is_empty());
        assert!(repo.list_categories().unwrap().is_empty());
    }

    #[test_context(RepositoryTestContext)]
    #[tokio::test]
    async fn test_unreadable_snapshot_rolls_back_the_write(ctx: &mut RepositoryTestContext) {
        let repo = ctx.repo();
        let work = repo.upsert_category(&Category::new("Work", 0)).await.unwrap();
        let mut views = repo.observe_grouped_view();
        let before = views.next().await.unwrap();
        ctx.clear_calls();

        // A row the task decoder cannot read, written past the priority check
        let raw = ctx.raw_connection();
        raw.pragma_update(None, "ignore_check_constraints", "ON").unwrap();
        raw.execute(
            "INSERT INTO tasks (category_id, title, status, \"index\", priority) VALUES (?1, 'Legacy', 0, 0, 'URGENT')",
            [work.id.unwrap()],
        )
        .unwrap();

        let result = repo
            .upsert_task(&Task::new(work.id.unwrap(), "Report", 1).with_deadline(Utc::now() + Duration::hours(3)))
            .await;
        assert!(result.is_err());

        let stored: i64 = raw.query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get(0)).unwrap();
        assert_eq!(stored, 1, "only the unreadable row remains");
        assert!(ctx.calls().is_empty(), "no side effect after a rolled back write");
        assert_eq!(views.current(), before);
    }
}
