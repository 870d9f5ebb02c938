pub mod board;
pub mod category;
pub mod init;
#[cfg(debug_assertions)]
pub mod migrations;
pub mod reminders;
pub mod task;
pub mod watch;

use crate::db::db::Db;
use crate::libs::config::Config;
use crate::libs::grouped_view::GroupedViewStream;
use crate::libs::repository::TaskRepository;
use crate::libs::scheduler::SqliteReminderScheduler;
use crate::libs::storage::Storage;
use crate::libs::widget::JsonWidget;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;

/// Repository with the shipped reminder scheduler and widget.
pub type AppRepository = TaskRepository<SqliteReminderScheduler, JsonWidget>;

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "Manage categories")]
    Category(category::CategoryArgs),
    #[command(about = "Manage tasks", arg_required_else_help = true)]
    Task(task::TaskArgs),
    #[command(about = "Show tasks grouped by category")]
    Board(board::BoardArgs),
    #[command(about = "Show pending deadline reminders")]
    Reminders,
    #[command(about = "Deliver reminders and follow board changes until interrupted")]
    Watch,
    #[cfg(debug_assertions)]
    #[command(about = "Database migrations (debug builds)")]
    Migrations(migrations::MigrationsArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::Category(args) => category::cmd(args).await,
            Commands::Task(args) => task::cmd(args).await,
            Commands::Board(args) => board::cmd(args).await,
            Commands::Reminders => reminders::cmd(),
            Commands::Watch => watch::cmd().await,
            #[cfg(debug_assertions)]
            Commands::Migrations(args) => migrations::cmd(args),
        }
    }
}

/// Opens the database in the data directory and wires the repository
/// collaborators from the saved configuration.
pub fn open_repository(config: &Config) -> Result<AppRepository> {
    let db = Arc::new(Db::new()?);
    build_repository(db, config)
}

/// Same wiring as [`open_repository`] over an already opened database.
pub fn build_repository(db: Arc<Db>, config: &Config) -> Result<AppRepository> {
    let storage = Storage::new(Arc::clone(&db))?;
    let widget_config = config.widget.clone().unwrap_or_default();
    let widget = JsonWidget::new(GroupedViewStream::from_storage(&storage), widget_config.resolve_path()?, widget_config.max_tasks);
    let reminders = SqliteReminderScheduler::new(db, config.reminders.clone().unwrap_or_default());

    Ok(TaskRepository::new(storage, reminders, widget))
}
