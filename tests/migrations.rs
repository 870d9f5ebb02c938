#[cfg(test)]
mod tests {
    use grit::db::migrations::{get_db_version, needs_migration, MigrationManager};
    use grit::libs::error::StorageError;
    use rusqlite::Connection;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct MigrationTestContext {
        temp_dir: TempDir,
    }

    impl TestContext for MigrationTestContext {
        fn setup() -> Self {
            MigrationTestContext {
                temp_dir: tempfile::tempdir().unwrap(),
            }
        }
    }

    impl MigrationTestContext {
        fn connection(&self) -> Connection {
            let conn = Connection::open(self.temp_dir.path().join("grit.db")).unwrap();
            conn.pragma_update(None, "foreign_keys", "ON").unwrap();
            conn
        }
    }

    fn table_exists(conn: &Connection, name: &str) -> bool {
        conn.query_row("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1", [name], |row| row.get::<_, i64>(0))
            .unwrap()
            > 0
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_fresh_database_is_migrated(ctx: &mut MigrationTestContext) {
        let mut conn = ctx.connection();
        let manager = MigrationManager::new();

        manager.run_migrations(&mut conn).unwrap();

        assert_eq!(get_db_version(&conn).unwrap(), manager.latest_version());
        assert!(!needs_migration(&conn).unwrap());
        assert!(table_exists(&conn, "categories"));
        assert!(table_exists(&conn, "tasks"));
        assert!(table_exists(&conn, "reminders"));
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_history_is_recorded_in_order(ctx: &mut MigrationTestContext) {
        let mut conn = ctx.connection();
        let manager = MigrationManager::new();
        manager.run_migrations(&mut conn).unwrap();

        let history = manager.get_migration_history(&conn).unwrap();
        assert!(!history.is_empty());
        for (i, (version, _, _)) in history.iter().enumerate() {
            assert_eq!(*version as usize, i + 1);
        }
        assert!(manager.is_migration_applied(&conn, 1).unwrap());
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_running_twice_is_a_no_op(ctx: &mut MigrationTestContext) {
        let mut conn = ctx.connection();
        let manager = MigrationManager::new();

        manager.run_migrations(&mut conn).unwrap();
        let first = manager.get_migration_history(&conn).unwrap().len();
        manager.run_migrations(&mut conn).unwrap();

        assert_eq!(manager.get_migration_history(&conn).unwrap().len(), first);
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_tasks_cascade_with_their_category(ctx: &mut MigrationTestContext) {
        let mut conn = ctx.connection();
        MigrationManager::new().run_migrations(&mut conn).unwrap();

        conn.execute("INSERT INTO categories (id, name, \"index\") VALUES (1, 'Work', 0)", []).unwrap();
        conn.execute(
            "INSERT INTO tasks (category_id, title, status, \"index\", priority) VALUES (1, 'Report', 0, 0, 'MEDIUM')",
            [],
        )
        .unwrap();
        conn.execute("DELETE FROM categories WHERE id = 1", []).unwrap();

        let remaining: i64 = conn.query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get(0)).unwrap();
        assert_eq!(remaining, 0);
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_unknown_priority_is_rejected(ctx: &mut MigrationTestContext) {
        let mut conn = ctx.connection();
        MigrationManager::new().run_migrations(&mut conn).unwrap();

        conn.execute("INSERT INTO categories (id, name, \"index\") VALUES (1, 'Work', 0)", []).unwrap();
        let err = conn
            .execute(
                "INSERT INTO tasks (category_id, title, status, \"index\", priority) VALUES (1, 'Report', 0, 0, 'URGENT')",
                [],
            )
            .unwrap_err();

        assert!(matches!(StorageError::from(err), StorageError::Constraint(_)));
        let stored: i64 = conn.query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get(0)).unwrap();
        assert_eq!(stored, 0);
    }

    #[cfg(debug_assertions)]
    #[test_context(MigrationTestContext)]
    #[test]
    fn test_rollback_forgets_later_versions(ctx: &mut MigrationTestContext) {
        let mut conn = ctx.connection();
        let manager = MigrationManager::new();
        manager.run_migrations(&mut conn).unwrap();

        manager.rollback_to(&mut conn, 1).unwrap();
        assert_eq!(get_db_version(&conn).unwrap(), 1);
        assert!(needs_migration(&conn).unwrap());
    }
}
