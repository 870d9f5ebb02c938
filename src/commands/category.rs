use super::{open_repository, AppRepository};
use crate::{
    libs::{config::Config, grouped_view::GroupedView, messages::Message, task::Category, view::View},
    msg_error, msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};
use dialoguer::{theme::ColorfulTheme, Confirm, Input};

#[derive(Debug, Args)]
pub struct CategoryArgs {
    #[command(subcommand)]
    command: Option<CategoryCommand>,
}

#[derive(Debug, Subcommand)]
enum CategoryCommand {
    /// Create a new category
    Add {
        /// Category name (prompted when omitted)
        name: Option<String>,
        /// Position on the board, appended at the end by default
        #[arg(short, long)]
        index: Option<i32>,
    },
    /// List categories in board order
    List,
    /// Rename a category
    Rename {
        /// Category name or ID
        category: String,
        /// New name
        name: String,
    },
    /// Change a category's position on the board
    Move {
        /// Category name or ID
        category: String,
        /// New position
        index: i32,
    },
    /// Delete a category and all of its tasks
    Delete {
        /// Category name or ID
        category: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Delete every category and every task
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn cmd(args: CategoryArgs) -> Result<()> {
    let repo = open_repository(&Config::read()?)?;

    match args.command {
        Some(CategoryCommand::Add { name, index }) => handle_add(&repo, name, index).await,
        Some(CategoryCommand::List) | None => handle_list(&repo),
        Some(CategoryCommand::Rename { category, name }) => handle_rename(&repo, category, name).await,
        Some(CategoryCommand::Move { category, index }) => handle_move(&repo, category, index).await,
        Some(CategoryCommand::Delete { category, yes }) => handle_delete(&repo, category, yes).await,
        Some(CategoryCommand::Clear { yes }) => handle_clear(&repo, yes).await,
    }
}

/// Looks a category up by ID, falling back to a case-insensitive name match.
pub(crate) fn find_category(repo: &AppRepository, identifier: &str) -> Result<Option<Category>> {
    if let Ok(id) = identifier.parse::<i64>() {
        if let Some(category) = repo.get_category(id)? {
            return Ok(Some(category));
        }
    }

    Ok(repo
        .list_categories()?
        .into_iter()
        .find(|category| category.name.eq_ignore_ascii_case(identifier.trim())))
}

async fn handle_add(repo: &AppRepository, name: Option<String>, index: Option<i32>) -> Result<()> {
    let name = match name {
        Some(name) => name,
        None => Input::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptCategoryName.to_string())
            .interact_text()?,
    };

    let categories = repo.list_categories()?;
    if categories.iter().any(|c| c.name.eq_ignore_ascii_case(name.trim())) {
        msg_error!(Message::CategoryAlreadyExists(name));
        return Ok(());
    }

    let index = index.unwrap_or_else(|| categories.iter().map(|c| c.index + 1).max().unwrap_or(0));
    let stored = repo.upsert_category(&Category::new(name.trim(), index)).await?;

    msg_success!(Message::CategorySaved(stored.id.unwrap_or_default(), stored.name));
    Ok(())
}

fn handle_list(repo: &AppRepository) -> Result<()> {
    let view = GroupedView::build(&repo.list_categories()?, &repo.list_tasks()?);

    if view.is_empty() {
        msg_info!(Message::NoCategories);
        return Ok(());
    }

    msg_print!(Message::CategoryListHeader, true);
    let categories: Vec<Category> = view.iter().map(|group| group.category.clone()).collect();
    let counts: Vec<usize> = view.iter().map(|group| group.tasks.len()).collect();
    View::categories(&categories, &counts);
    Ok(())
}

async fn handle_rename(repo: &AppRepository, identifier: String, name: String) -> Result<()> {
    let Some(mut category) = find_category(repo, &identifier)? else {
        msg_error!(Message::CategoryNotFound(identifier));
        return Ok(());
    };

    let old_name = std::mem::replace(&mut category.name, name.trim().to_string());
    repo.upsert_category(&category).await?;

    msg_success!(Message::CategoryRenamed(old_name, category.name));
    Ok(())
}

async fn handle_move(repo: &AppRepository, identifier: String, index: i32) -> Result<()> {
    let Some(mut category) = find_category(repo, &identifier)? else {
        msg_error!(Message::CategoryNotFound(identifier));
        return Ok(());
    };

    category.index = index;
    repo.upsert_category(&category).await?;

    msg_success!(Message::CategoryMoved(category.name, index));
    Ok(())
}

async fn handle_delete(repo: &AppRepository, identifier: String, yes: bool) -> Result<()> {
    let Some(category) = find_category(repo, &identifier)? else {
        msg_error!(Message::CategoryNotFound(identifier));
        return Ok(());
    };

    let task_count = match category.id {
        Some(id) => repo.storage().tasks_in_category(id)?.len(),
        None => 0,
    };

    if !yes && task_count > 0 {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::ConfirmDeleteCategory(category.name.clone(), task_count).to_string())
            .default(false)
            .interact()?;
        if !confirmed {
            msg_info!(Message::OperationCancelled);
            return Ok(());
        }
    }

    let applied = repo.delete_category(&category).await?;
    msg_success!(Message::CategoryDeleted(category.name, applied.value));
    Ok(())
}

async fn handle_clear(repo: &AppRepository, yes: bool) -> Result<()> {
    if repo.list_categories()?.is_empty() {
        msg_info!(Message::NoCategories);
        return Ok(());
    }

    if !yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::ConfirmClearCategories.to_string())
            .default(false)
            .interact()?;
        if !confirmed {
            msg_info!(Message::OperationCancelled);
            return Ok(());
        }
    }

    let applied = repo.delete_all_categories().await?;
    msg_success!(Message::CategoriesCleared(applied.value));
    Ok(())
}
