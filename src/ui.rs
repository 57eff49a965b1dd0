use colored::*;
use jiff::civil::Date;

use crate::models::task::{Category, Priority, Recurrence, Task};

/// Get the terminal width, defaulting to 80 if unavailable
fn get_terminal_width() -> usize {
    term_size::dimensions().map(|(w, _)| w).unwrap_or(80)
}

/// Get the appropriate status glyph for a task
pub fn get_status_glyph(task: &Task, is_overdue: bool) -> ColoredString {
    if task.completed {
        "✓".dimmed()
    } else if is_overdue {
        "●".red()
    } else {
        "○".normal()
    }
}

fn priority_badge(priority: Priority) -> ColoredString {
    match priority {
        Priority::High => "high".red(),
        Priority::Medium => "medium".yellow(),
        Priority::Low => "low".green(),
    }
}

fn category_badge(category: Category) -> ColoredString {
    match category {
        Category::Personal => "personal".blue(),
        Category::Work => "work".magenta(),
        Category::Shopping => "shopping".bright_magenta(),
        Category::Business => "business".bright_blue(),
        Category::School => "school".cyan(),
        Category::Other => "other".normal(),
    }
}

/// Render a single task line with glyph, title, and a right-aligned due date
pub fn render_task_line(task: &Task, is_overdue: bool) {
    let terminal_width = get_terminal_width();

    let glyph = get_status_glyph(task, is_overdue);
    let title = &task.title;

    let left_section = format!("  {}  {}", glyph, title);

    let styled_left = if task.completed {
        left_section.dimmed()
    } else {
        left_section.bold()
    };

    let right_section = match task.due_date {
        Some(date) => format_due_date(date),
        None => String::new(),
    };

    if !right_section.is_empty() {
        let right_styled = if is_overdue {
            right_section.red()
        } else {
            right_section.dimmed()
        };

        let left_visible_len = format!("  {}  {}", " ", title).len();
        let total_content = left_visible_len + right_section.chars().count();

        if total_content + 4 < terminal_width {
            let padding = terminal_width - total_content - 2;
            println!("{}{}{}", styled_left, " ".repeat(padding), right_styled);
        } else {
            // Not enough space for right alignment, just print normally
            println!("{}", styled_left);
        }
    } else {
        println!("{}", styled_left);
    }

    render_task_meta(task);
}

/// Metadata line below the title: priority • category • recurrence • progress • tags
fn render_task_meta(task: &Task) {
    let mut meta_parts = vec![
        priority_badge(task.priority).to_string(),
        category_badge(task.category).to_string(),
    ];

    if task.recurring != Recurrence::None {
        meta_parts.push(format!("↻ {}", task.recurring));
    }

    if !task.subtasks.is_empty() {
        let done = task.subtasks.iter().filter(|s| s.completed).count();
        meta_parts.push(format!(
            "{}/{} ({}%)",
            done,
            task.subtasks.len(),
            task.progress()
        ));
    }

    if !task.tags.is_empty() {
        meta_parts.push(task.tags.join(", "));
    }

    println!("     {}", meta_parts.join(&format!(" {} ", "•".dimmed())));
}

/// Render a task's checklist, one indented line per item
pub fn render_subtasks(task: &Task) {
    for subtask in &task.subtasks {
        let line = if subtask.completed {
            format!("       {} {}", "✓".dimmed(), subtask.title).dimmed()
        } else {
            format!("       {} {}", "○".normal(), subtask.title).normal()
        };
        println!("{}", line);
    }
}

/// Render a view header with title and count
pub fn render_view_header(title: &str, count: usize) {
    let task_word = if count == 1 { "task" } else { "tasks" };
    println!("\n  {} ({} {})\n", title.cyan().bold(), count, task_word);
}

/// Render a section header (e.g., "Tomorrow", "No due date")
pub fn render_section_header(title: &str) {
    println!("\n  ─── {} ───\n", title.bold());
}

/// Check if a task is overdue (due date in the past and not completed)
pub fn is_overdue(task: &Task) -> bool {
    if task.completed {
        return false;
    }

    if let Some(due) = task.due_date {
        let today = jiff::Zoned::now().date();
        return due < today;
    }

    false
}

/// Format a due date for display (e.g., "Today", "Tomorrow", "Mar 01")
pub fn format_due_date(date: Date) -> String {
    let today = jiff::Zoned::now().date();

    if date == today {
        "Today".to_string()
    } else if date == today.tomorrow().expect("tomorrow should be valid") {
        "Tomorrow".to_string()
    } else if date.year() == today.year() {
        date.strftime("%b %d").to_string()
    } else {
        date.strftime("%b %d, %Y").to_string()
    }
}

/// Format a date as a calendar section header (e.g., "Monday, Feb 17")
pub fn format_date_header(date: Date) -> String {
    let today = jiff::Zoned::now().date();

    if date == today {
        "Today".to_string()
    } else if date == today.tomorrow().expect("tomorrow should be valid") {
        "Tomorrow".to_string()
    } else {
        date.strftime("%A, %b %d").to_string()
    }
}
