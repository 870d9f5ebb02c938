use super::open_repository;
use crate::{
    libs::{config::Config, formatter::format_deadline, messages::Message},
    msg_info, msg_print,
};
use anyhow::Result;
use prettytable::{row, Table};

pub fn cmd() -> Result<()> {
    let repo = open_repository(&Config::read()?)?;
    let pending = repo.reminders().pending()?;

    if pending.is_empty() {
        msg_info!(Message::NoRemindersPending);
        return Ok(());
    }

    msg_print!(Message::RemindersPending(pending.len()), true);
    let mut table = Table::new();
    table.add_row(row!["TASK", "TITLE", "DEADLINE", "REMIND AT"]);
    for reminder in &pending {
        table.add_row(row![
            reminder.task_id,
            reminder.title,
            format_deadline(&reminder.deadline),
            format_deadline(&reminder.fire_at)
        ]);
    }
    table.printstd();
    Ok(())
}
