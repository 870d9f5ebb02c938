use super::category::find_category;
use super::{open_repository, AppRepository};
use crate::{
    libs::{
        config::Config,
        formatter::parse_deadline,
        grouped_view::GroupedView,
        messages::Message,
        task::{Priority, Task},
        view::View,
    },
    msg_error, msg_info, msg_success,
};
use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use dialoguer::{theme::ColorfulTheme, Confirm, Input};

#[derive(Debug, Args)]
pub struct TaskArgs {
    #[command(subcommand)]
    command: TaskCommand,
}

#[derive(Debug, Subcommand)]
enum TaskCommand {
    /// Add a task to a category
    Add {
        /// Task title (prompted when omitted)
        title: Option<String>,
        /// Category name or ID
        #[arg(short, long)]
        category: String,
        /// Deadline: 'YYYY-MM-DD HH:MM', 'YYYY-MM-DD' or RFC 3339
        #[arg(short, long)]
        deadline: Option<String>,
        /// Priority: low, medium or high
        #[arg(short, long)]
        priority: Option<String>,
        /// Position inside the category, appended at the end by default
        #[arg(short, long)]
        index: Option<i32>,
    },
    /// Mark a task as completed
    Done {
        /// Task ID
        id: i64,
    },
    /// Mark a completed task as pending again
    Undo {
        /// Task ID
        id: i64,
    },
    /// Change a task's title, deadline, priority or position
    Edit {
        /// Task ID
        id: i64,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long, conflicts_with = "no_deadline")]
        deadline: Option<String>,
        /// Remove the deadline and its reminder
        #[arg(long)]
        no_deadline: bool,
        #[arg(short, long)]
        priority: Option<String>,
        #[arg(short, long)]
        index: Option<i32>,
    },
    /// Move a task to another category
    Move {
        /// Task ID
        id: i64,
        /// Target category name or ID
        category: String,
        /// Position inside the target category, appended at the end by default
        #[arg(short, long)]
        index: Option<i32>,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: i64,
    },
    /// Delete every task, keeping the categories
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// List tasks in board order
    List {
        /// Only show tasks of this category (name or ID)
        #[arg(short, long)]
        category: Option<String>,
    },
}

pub async fn cmd(args: TaskArgs) -> Result<()> {
    let repo = open_repository(&Config::read()?)?;

    match args.command {
        TaskCommand::Add {
            title,
            category,
            deadline,
            priority,
            index,
        } => handle_add(&repo, title, category, deadline, priority, index).await,
        TaskCommand::Done { id } => handle_status(&repo, id, true).await,
        TaskCommand::Undo { id } => handle_status(&repo, id, false).await,
        TaskCommand::Edit {
            id,
            title,
            deadline,
            no_deadline,
            priority,
            index,
        } => handle_edit(&repo, id, title, deadline, no_deadline, priority, index).await,
        TaskCommand::Move { id, category, index } => handle_move(&repo, id, category, index).await,
        TaskCommand::Delete { id } => handle_delete(&repo, id).await,
        TaskCommand::Clear { yes } => handle_clear(&repo, yes).await,
        TaskCommand::List { category } => handle_list(&repo, category),
    }
}

async fn handle_add(
    repo: &AppRepository,
    title: Option<String>,
    category: String,
    deadline: Option<String>,
    priority: Option<String>,
    index: Option<i32>,
) -> Result<()> {
    let Some(category) = find_category(repo, &category)? else {
        msg_error!(Message::CategoryNotFound(category));
        return Ok(());
    };
    let Some(category_id) = category.id else {
        msg_error!(Message::CategoryNotFound(category.name));
        return Ok(());
    };

    let Some(deadline) = deadline_arg(deadline) else {
        return Ok(());
    };
    let Some(priority) = priority_arg(priority) else {
        return Ok(());
    };

    let title = match title {
        Some(title) => title,
        None => Input::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptTaskTitle.to_string())
            .interact_text()?,
    };

    let index = match index {
        Some(index) => index,
        None => next_index(repo, category_id)?,
    };

    let mut task = Task::new(category_id, title.trim(), index);
    task.deadline = deadline;
    task.priority = priority.unwrap_or_default();

    let stored = repo.upsert_task(&task).await?.into_inner();
    msg_success!(Message::TaskSaved(stored.id.unwrap_or_default(), stored.title));
    Ok(())
}

async fn handle_status(repo: &AppRepository, id: i64, status: bool) -> Result<()> {
    let Some(mut task) = repo.get_task(id)? else {
        msg_error!(Message::TaskNotFound(id));
        return Ok(());
    };

    task.status = status;
    let stored = repo.upsert_task(&task).await?.into_inner();

    if status {
        msg_success!(Message::TaskCompleted(stored.title));
    } else {
        msg_success!(Message::TaskReopened(stored.title));
    }
    Ok(())
}

async fn handle_edit(
    repo: &AppRepository,
    id: i64,
    title: Option<String>,
    deadline: Option<String>,
    no_deadline: bool,
    priority: Option<String>,
    index: Option<i32>,
) -> Result<()> {
    let Some(mut task) = repo.get_task(id)? else {
        msg_error!(Message::TaskNotFound(id));
        return Ok(());
    };

    let Some(deadline) = deadline_arg(deadline) else {
        return Ok(());
    };
    let Some(priority) = priority_arg(priority) else {
        return Ok(());
    };

    if let Some(title) = title {
        task.title = title.trim().to_string();
    }
    if no_deadline {
        task.deadline = None;
    } else if deadline.is_some() {
        task.deadline = deadline;
    }
    if let Some(priority) = priority {
        task.priority = priority;
    }
    if let Some(index) = index {
        task.index = index;
    }

    let stored = repo.upsert_task(&task).await?.into_inner();
    msg_success!(Message::TaskSaved(stored.id.unwrap_or_default(), stored.title));
    Ok(())
}

async fn handle_move(repo: &AppRepository, id: i64, category: String, index: Option<i32>) -> Result<()> {
    let Some(mut task) = repo.get_task(id)? else {
        msg_error!(Message::TaskNotFound(id));
        return Ok(());
    };
    let Some(target) = find_category(repo, &category)? else {
        msg_error!(Message::CategoryNotFound(category));
        return Ok(());
    };
    let Some(target_id) = target.id else {
        msg_error!(Message::CategoryNotFound(target.name));
        return Ok(());
    };

    task.index = match index {
        Some(index) => index,
        None if task.category_id == target_id => task.index,
        None => next_index(repo, target_id)?,
    };
    task.category_id = target_id;

    let stored = repo.upsert_task(&task).await?.into_inner();
    msg_success!(Message::TaskMoved(stored.title, target.name));
    Ok(())
}

async fn handle_delete(repo: &AppRepository, id: i64) -> Result<()> {
    let Some(task) = repo.get_task(id)? else {
        msg_error!(Message::TaskNotFound(id));
        return Ok(());
    };

    repo.delete_task(&task).await?;
    msg_success!(Message::TaskDeleted(task.title));
    Ok(())
}

async fn handle_clear(repo: &AppRepository, yes: bool) -> Result<()> {
    let count = repo.list_tasks()?.len();
    if count == 0 {
        msg_info!(Message::NoTasks);
        return Ok(());
    }

    if !yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::ConfirmClearTasks(count).to_string())
            .default(false)
            .interact()?;
        if !confirmed {
            msg_info!(Message::OperationCancelled);
            return Ok(());
        }
    }

    let applied = repo.delete_all_tasks().await?;
    msg_success!(Message::TasksCleared(applied.value));
    Ok(())
}

fn handle_list(repo: &AppRepository, category: Option<String>) -> Result<()> {
    let view = GroupedView::build(&repo.list_categories()?, &repo.list_tasks()?);

    let tasks: Vec<Task> = match category {
        Some(identifier) => {
            let Some(category) = find_category(repo, &identifier)? else {
                msg_error!(Message::CategoryNotFound(identifier));
                return Ok(());
            };
            category
                .id
                .and_then(|id| view.tasks(id))
                .map(|tasks| tasks.to_vec())
                .unwrap_or_default()
        }
        None => view.iter().flat_map(|group| group.tasks.iter().cloned()).collect(),
    };

    if tasks.is_empty() {
        msg_info!(Message::NoTasks);
        return Ok(());
    }

    View::tasks(&tasks);
    Ok(())
}

/// Position after the last task of the category.
fn next_index(repo: &AppRepository, category_id: i64) -> Result<i32> {
    let tasks = repo.storage().tasks_in_category(category_id)?;
    Ok(tasks.iter().map(|t| t.index + 1).max().unwrap_or(0))
}

/// `Some(parsed)` for a valid or absent deadline, `None` after reporting bad input.
fn deadline_arg(input: Option<String>) -> Option<Option<DateTime<Utc>>> {
    match input {
        None => Some(None),
        Some(input) => match parse_deadline(&input) {
            Some(deadline) => Some(Some(deadline)),
            None => {
                msg_error!(Message::InvalidDeadline(input));
                None
            }
        },
    }
}

fn priority_arg(input: Option<String>) -> Option<Option<Priority>> {
    match input {
        None => Some(None),
        Some(input) => match input.parse::<Priority>() {
            Ok(priority) => Some(Some(priority)),
            Err(_) => {
                msg_error!(Message::InvalidPriority(input));
                None
            }
        },
    }
}
