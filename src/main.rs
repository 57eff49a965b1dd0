use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use jiff::civil::Date;

use crate::{
    models::{
        state::{AppState, StatusFilter, View},
        task::{Category, Priority, Recurrence, Task},
    },
    projection::visible_tasks,
    services::{
        settings::{
            set_category_filter, set_priority_filter, set_search, set_status_filter, set_view,
            toggle_theme,
        },
        subtasks::{
            AddSubtaskParameters, DeleteSubtaskParameters, SubtaskError, ToggleSubtaskParameters,
            add_subtask, delete_subtask, toggle_subtask,
        },
        tasks::{
            AddTaskError, AddTaskParameters, DeleteTaskParameters, ReorderTasksParameters,
            ToggleTaskParameters, UpdateTaskError, UpdateTaskParameters, add_task, delete_task,
            reorder_tasks, toggle_task, update_task,
        },
    },
    storage::{Storage, json::JsonFileStorage},
};

mod models;
mod projection;
mod services;
mod storage;
mod store;
mod ui;

#[derive(Parser)]
#[command(
    name = "tdm",
    about = "A minimal and clean task manager for your terminal"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show tasks using the saved filters and view
    List,

    /// Add a new task
    Add {
        /// Task title
        title: String,

        /// Free-form description
        #[arg(short, long)]
        description: Option<String>,

        /// Due date (e.g., "2026-03-01")
        #[arg(long)]
        due: Option<String>,

        /// Task priority
        #[arg(short, long, value_enum, default_value_t)]
        priority: Priority,

        /// Task category
        #[arg(short, long, value_enum, default_value_t)]
        category: Category,

        /// Recurrence label (descriptive only)
        #[arg(short, long, value_enum, default_value_t)]
        recurring: Recurrence,
    },

    /// Toggle a task between active and completed
    Toggle {
        /// Task UUID or title fragment
        task: String,
    },

    /// Edit fields of an existing task
    Update {
        /// Task UUID or title fragment
        task: String,

        /// New title
        #[arg(short, long)]
        title: Option<String>,

        /// New description
        #[arg(short, long)]
        description: Option<String>,

        /// New due date (e.g., "2026-03-01")
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<String>,

        /// Remove the due date
        #[arg(long)]
        clear_due: bool,

        /// New priority
        #[arg(short, long, value_enum)]
        priority: Option<Priority>,

        /// New category
        #[arg(short, long, value_enum)]
        category: Option<Category>,

        /// New recurrence label
        #[arg(short, long, value_enum)]
        recurring: Option<Recurrence>,
    },

    /// Delete a task and its checklist
    Delete {
        /// Task UUID or title fragment
        task: String,
    },

    /// Manage a task's checklist
    #[command(subcommand)]
    Subtask(SubtaskCommands),

    /// Adjust which tasks are visible
    #[command(subcommand)]
    Filter(FilterCommands),

    /// Set the free-text title search (omit the text to clear it)
    Search { text: Option<String> },

    /// Switch between list and calendar view
    View {
        #[arg(value_enum)]
        view: View,
    },

    /// Toggle between light and dark theme
    Theme,

    /// Reorder the visible tasks; list every visible task in its new order
    Reorder {
        #[arg(required = true, num_args = 1..)]
        tasks: Vec<String>,
    },
}

#[derive(Debug, Subcommand)]
enum SubtaskCommands {
    /// Add a checklist item to a task
    Add { task: String, title: String },
    /// Toggle a checklist item
    Toggle { task: String, subtask: String },
    /// Delete a checklist item
    Delete { task: String, subtask: String },
}

#[derive(Debug, Subcommand)]
enum FilterCommands {
    /// Filter by completion status
    Status {
        #[arg(value_enum)]
        status: StatusFilter,
    },
    /// Filter by priority, or "all" to remove the filter
    Priority {
        #[arg(value_enum)]
        priority: PriorityFilterArg,
    },
    /// Filter by category, or "all" to remove the filter
    Category {
        #[arg(value_enum)]
        category: CategoryFilterArg,
    },
    /// Reset status, priority, category and search filters
    Clear,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PriorityFilterArg {
    All,
    Low,
    Medium,
    High,
}

impl From<PriorityFilterArg> for Option<Priority> {
    fn from(arg: PriorityFilterArg) -> Self {
        match arg {
            PriorityFilterArg::All => None,
            PriorityFilterArg::Low => Some(Priority::Low),
            PriorityFilterArg::Medium => Some(Priority::Medium),
            PriorityFilterArg::High => Some(Priority::High),
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CategoryFilterArg {
    All,
    Personal,
    Work,
    Shopping,
    Business,
    School,
    Other,
}

impl From<CategoryFilterArg> for Option<Category> {
    fn from(arg: CategoryFilterArg) -> Self {
        match arg {
            CategoryFilterArg::All => None,
            CategoryFilterArg::Personal => Some(Category::Personal),
            CategoryFilterArg::Work => Some(Category::Work),
            CategoryFilterArg::Shopping => Some(Category::Shopping),
            CategoryFilterArg::Business => Some(Category::Business),
            CategoryFilterArg::School => Some(Category::School),
            CategoryFilterArg::Other => Some(Category::Other),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize storage
    let storage_path = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tdm")
        .join("state.json");

    // Create parent directory if it doesn't exist
    if let Some(parent) = storage_path.parent() {
        std::fs::create_dir_all(parent).unwrap_or_else(|e| {
            eprintln!("Error: Failed to create data directory: {}", e);
            std::process::exit(1);
        });
    }

    let storage = JsonFileStorage::new(storage_path);

    let mut state = match storage.load() {
        Ok(state) => state,
        Err(e) => {
            eprintln!("Error: Failed to load state: {}", e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::List) | None => {
            render_tasks(&state);
        }
        Some(Commands::Add {
            title,
            description,
            due,
            priority,
            category,
            recurring,
        }) => {
            let params = AddTaskParameters {
                title,
                description,
                due_date: due,
                priority,
                category,
                recurring,
            };

            match add_task(&mut state, &storage, params) {
                Ok(task) => {
                    println!("✓ Task added: {}", task.title);
                    if let Some(due) = task.due_date {
                        println!("  Due: {}", ui::format_due_date(due));
                    }
                }
                Err(AddTaskError::EmptyTitle) => {
                    eprintln!("Error: Task title cannot be empty");
                    std::process::exit(1);
                }
                Err(AddTaskError::InvalidDueDate(date_str, error)) => {
                    eprintln!("Error: Invalid due date '{}': {}", date_str, error);
                    eprintln!("\nExpected format: YYYY-MM-DD (e.g., 2026-03-01)");
                    std::process::exit(1);
                }
                Err(AddTaskError::Storage(e)) => {
                    eprintln!("Error: Failed to save task: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Toggle { task }) => {
            match toggle_task(&mut state, &storage, ToggleTaskParameters { task }) {
                Ok(task) => {
                    if task.completed {
                        println!("✓ Task completed: {}", task.title);
                    } else {
                        println!("○ Task reactivated: {}", task.title);
                    }
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Update {
            task,
            title,
            description,
            due,
            clear_due,
            priority,
            category,
            recurring,
        }) => {
            let params = UpdateTaskParameters {
                task,
                title,
                description,
                due_date: due,
                clear_due_date: clear_due,
                priority,
                category,
                recurring,
            };

            match update_task(&mut state, &storage, params) {
                Ok(task) => {
                    println!("✓ Task updated: {}", task.title);
                }
                Err(UpdateTaskError::InvalidDueDate(date_str, error)) => {
                    eprintln!("Error: Invalid due date '{}': {}", date_str, error);
                    eprintln!("\nExpected format: YYYY-MM-DD (e.g., 2026-03-01)");
                    std::process::exit(1);
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Delete { task }) => {
            match delete_task(&mut state, &storage, DeleteTaskParameters { task }) {
                Ok(task) => {
                    println!("✓ Task deleted: {}", task.title);
                    if !task.subtasks.is_empty() {
                        println!("  └─ {} checklist item(s) also deleted", task.subtasks.len());
                    }
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Subtask(SubtaskCommands::Add { task, title })) => {
            match add_subtask(&mut state, &storage, AddSubtaskParameters { task, title }) {
                Ok(parent) => {
                    let added = parent.subtasks.last().map(|s| s.title.as_str()).unwrap_or("");
                    println!("✓ Checklist item added to '{}': {}", parent.title, added);
                }
                Err(SubtaskError::EmptyTitle) => {
                    eprintln!("Error: Checklist item title cannot be empty");
                    std::process::exit(1);
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Subtask(SubtaskCommands::Toggle { task, subtask })) => {
            match toggle_subtask(
                &mut state,
                &storage,
                ToggleSubtaskParameters { task, subtask },
            ) {
                Ok(subtask) => {
                    if subtask.completed {
                        println!("✓ Checklist item completed: {}", subtask.title);
                    } else {
                        println!("○ Checklist item reactivated: {}", subtask.title);
                    }
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Subtask(SubtaskCommands::Delete { task, subtask })) => {
            match delete_subtask(
                &mut state,
                &storage,
                DeleteSubtaskParameters { task, subtask },
            ) {
                Ok(subtask) => {
                    println!("✓ Checklist item deleted: {}", subtask.title);
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Filter(FilterCommands::Status { status })) => {
            if let Err(e) = set_status_filter(&mut state, &storage, status) {
                eprintln!("Error: Failed to save filter: {}", e);
                std::process::exit(1);
            }
            render_tasks(&state);
        }
        Some(Commands::Filter(FilterCommands::Priority { priority })) => {
            if let Err(e) = set_priority_filter(&mut state, &storage, priority.into()) {
                eprintln!("Error: Failed to save filter: {}", e);
                std::process::exit(1);
            }
            render_tasks(&state);
        }
        Some(Commands::Filter(FilterCommands::Category { category })) => {
            if let Err(e) = set_category_filter(&mut state, &storage, category.into()) {
                eprintln!("Error: Failed to save filter: {}", e);
                std::process::exit(1);
            }
            render_tasks(&state);
        }
        Some(Commands::Filter(FilterCommands::Clear)) => {
            let cleared = set_status_filter(&mut state, &storage, StatusFilter::All)
                .and_then(|_| set_priority_filter(&mut state, &storage, None))
                .and_then(|_| set_category_filter(&mut state, &storage, None))
                .and_then(|_| set_search(&mut state, &storage, String::new()));

            if let Err(e) = cleared {
                eprintln!("Error: Failed to save filters: {}", e);
                std::process::exit(1);
            }
            println!("✓ Filters cleared");
            render_tasks(&state);
        }
        Some(Commands::Search { text }) => {
            let search = text.unwrap_or_default();
            if let Err(e) = set_search(&mut state, &storage, search) {
                eprintln!("Error: Failed to save search: {}", e);
                std::process::exit(1);
            }
            render_tasks(&state);
        }
        Some(Commands::View { view }) => {
            if let Err(e) = set_view(&mut state, &storage, view) {
                eprintln!("Error: Failed to save view: {}", e);
                std::process::exit(1);
            }
            render_tasks(&state);
        }
        Some(Commands::Theme) => match toggle_theme(&mut state, &storage) {
            Ok(theme) => {
                println!("✓ Theme set to {}", theme);
            }
            Err(e) => {
                eprintln!("Error: Failed to save theme: {}", e);
                std::process::exit(1);
            }
        },
        Some(Commands::Reorder { tasks }) => {
            match reorder_tasks(&mut state, &storage, ReorderTasksParameters { order: tasks }) {
                Ok(reordered) => {
                    println!("✓ Tasks reordered");
                    for (index, task) in reordered.iter().enumerate() {
                        println!("  {}. {}", index + 1, task.title);
                    }
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }
}

/// Render the current projection, honoring the saved view.
fn render_tasks(state: &AppState) {
    let tasks = visible_tasks(state);

    if tasks.is_empty() {
        println!("No tasks to show");
        render_active_filters(state);
        return;
    }

    match state.view {
        View::List => {
            ui::render_view_header("Tasks", tasks.len());
            for task in &tasks {
                ui::render_task_line(task, ui::is_overdue(task));
                ui::render_subtasks(task);
            }
        }
        View::Calendar => {
            // Group by due date; undated tasks go in a trailing section
            let mut dated: BTreeMap<Date, Vec<&Task>> = BTreeMap::new();
            let mut undated: Vec<&Task> = vec![];

            for task in &tasks {
                match task.due_date {
                    Some(date) => dated.entry(date).or_default().push(task),
                    None => undated.push(task),
                }
            }

            ui::render_view_header("Calendar", tasks.len());

            for (date, tasks) in dated {
                ui::render_section_header(&ui::format_date_header(date));
                for task in tasks {
                    ui::render_task_line(task, ui::is_overdue(task));
                    ui::render_subtasks(task);
                }
            }

            if !undated.is_empty() {
                ui::render_section_header("No due date");
                for task in undated {
                    ui::render_task_line(task, ui::is_overdue(task));
                    ui::render_subtasks(task);
                }
            }
        }
    }

    render_active_filters(state);
}

/// One dimmed summary line for any non-default filter settings.
fn render_active_filters(state: &AppState) {
    let mut parts = vec![];

    match state.filter {
        StatusFilter::All => {}
        StatusFilter::Active => parts.push(String::from("status: active")),
        StatusFilter::Completed => parts.push(String::from("status: completed")),
    }
    if let Some(priority) = state.priority_filter {
        parts.push(format!("priority: {}", priority));
    }
    if let Some(category) = state.category_filter {
        parts.push(format!("category: {}", category));
    }
    if !state.search.is_empty() {
        parts.push(format!("search: \"{}\"", state.search));
    }

    if !parts.is_empty() {
        println!("\n  {}", format!("filters · {}", parts.join(" · ")).dimmed());
    }
}
