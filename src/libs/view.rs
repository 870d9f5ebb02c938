use super::formatter::format_deadline;
use super::grouped_view::GroupedView;
use super::messages::Message;
use super::task::{Category, Task};
use prettytable::{row, Table};

/// Console tables.
pub struct View {}

impl View {
    /// One table per category, tasks in display order.
    pub fn board(view: &GroupedView) {
        for group in view.iter() {
            println!("\n{} (#{})", group.category.name, group.category.id.unwrap_or(0));
            if group.tasks.is_empty() {
                println!("  {}", Message::BoardEmptyCategory);
                continue;
            }
            Self::tasks_table(&group.tasks).printstd();
        }
    }

    pub fn tasks(tasks: &[Task]) {
        Self::tasks_table(tasks).printstd();
    }

    pub fn categories(categories: &[Category], task_counts: &[usize]) {
        let mut table = Table::new();

        table.add_row(row!["ID", "NAME", "INDEX", "TASKS"]);
        for (category, count) in categories.iter().zip(task_counts) {
            table.add_row(row![category.id.unwrap_or(0), category.name, category.index, count]);
        }
        table.printstd();
    }

    fn tasks_table(tasks: &[Task]) -> Table {
        let mut table = Table::new();

        table.add_row(row!["ID", "", "TITLE", "PRIORITY", "DEADLINE"]);
        for task in tasks {
            table.add_row(row![
                task.id.unwrap_or(0),
                if task.is_completed() { "[x]" } else { "[ ]" },
                task.title,
                task.priority,
                task.deadline.as_ref().map(format_deadline).unwrap_or_default()
            ]);
        }
        table
    }
}
