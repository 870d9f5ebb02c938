/// Every user-facing message of the application.
///
/// The text for each variant lives in the `Display` implementation in
/// `display.rs`; call sites only pick the variant and its parameters.
#[derive(Debug, Clone)]
pub enum Message {
    // === TASK MESSAGES ===
    TaskSaved(i64, String), // id, title
    TaskCompleted(String),
    TaskReopened(String),
    TaskDeleted(String),
    TaskMoved(String, String), // title, category
    TasksCleared(usize),
    TaskNotFound(i64),
    NoTasks,
    ConfirmClearTasks(usize),
    PromptTaskTitle,

    // === CATEGORY MESSAGES ===
    CategorySaved(i64, String), // id, name
    CategoryRenamed(String, String),
    CategoryMoved(String, i32),
    CategoryDeleted(String, usize), // name, cascaded task count
    CategoriesCleared(usize),       // cascaded task count
    CategoryNotFound(String),
    CategoryAlreadyExists(String),
    NoCategories,
    CategoryListHeader,
    ConfirmDeleteCategory(String, usize),
    ConfirmClearCategories,
    PromptCategoryName,

    // === BOARD MESSAGES ===
    BoardHeader(usize, usize), // categories, tasks
    BoardEmptyCategory,
    BoardChanged,

    // === INPUT MESSAGES ===
    InvalidDeadline(String),
    InvalidPriority(String),
    OperationCancelled,

    // === SIDE EFFECT MESSAGES ===
    SideEffectFailed(String),
    ReminderDue(String, String), // title, deadline
    RemindersPending(usize),
    NoRemindersPending,
    WidgetRefreshed(String),

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigModuleReminders,
    ConfigModuleWidget,
    ConfigModuleDaemon,
    PromptSelectModules,
    PromptRemindersEnabled,
    PromptLeadMinutes,
    PromptWidgetPath,
    PromptWidgetMaxTasks,
    PromptPollInterval,

    // === WATCHER MESSAGES ===
    WatcherStarted(u64), // poll interval, ms
    WatcherStopped,
    WatcherError(String),
    WatcherReceivedSigterm,
    WatcherReceivedSigint,
    WatcherReceivedCtrlC,
    WatcherCtrlCListenFailed(String),
    WatcherSignalHandlingNotSupported,

    // === MIGRATION MESSAGES ===
    MigrationsFound(usize),
    RunningMigration(u32, String),
    MigrationCompleted(u32),
    MigrationFailed(u32, String),
    AllMigrationsCompleted,
    DatabaseVersion(u32),
    DatabaseUpToDate,
    DatabaseNeedsUpdate,
    MigrationHistory,
    NothingToRollback,
    RollingBack(u32, u32),
    RollbackCompleted(u32),
}
