use super::open_repository;
use crate::{
    libs::{config::Config, messages::Message, view::View, widget::WidgetRefresher},
    msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct BoardArgs {
    /// Also rewrite the widget snapshot from the current board
    #[arg(short, long)]
    widget: bool,
}

pub async fn cmd(args: BoardArgs) -> Result<()> {
    let repo = open_repository(&Config::read()?)?;
    let view = repo.observe_grouped_view().current();

    if view.is_empty() {
        msg_info!(Message::NoCategories);
    } else {
        msg_print!(Message::BoardHeader(view.category_count(), view.task_count()));
        View::board(&view);
    }

    if args.widget {
        repo.widget().refresh().await?;
        msg_success!(Message::WidgetRefreshed(repo.widget().path().display().to_string()));
    }

    Ok(())
}
