use jiff::civil::Date;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    models::{
        state::AppState,
        task::{Category, Priority, Recurrence, Task},
    },
    projection::visible_tasks,
    store::{Action, TaskDraft, reduce},
    storage::{Storage, StorageError},
};

/// Errors shared by every operation that takes a human-friendly task
/// reference (a full UUID or a case-insensitive title fragment).
#[derive(Debug, Error)]
pub enum TaskLookupError {
    #[error("Task '{0}' not found")]
    TaskNotFound(String),

    #[error("Task reference is ambiguous. Multiple tasks found: {}", .0.join(", "))]
    AmbiguousTask(Vec<String>),
}

/// All tasks in `tasks` matching `ident`: exact id when `ident` parses as a
/// UUID, otherwise case-insensitive title substring.
fn find_matches<'a>(tasks: &'a [Task], ident: &str) -> Vec<&'a Task> {
    if let Ok(id) = ident.parse::<Uuid>() {
        return tasks.iter().filter(|t| t.id == id).collect();
    }

    let needle = ident.to_lowercase();
    tasks
        .iter()
        .filter(|t| t.title.to_lowercase().contains(&needle))
        .collect()
}

pub(crate) fn resolve_task(state: &AppState, ident: &str) -> Result<Task, TaskLookupError> {
    let matches = find_matches(&state.tasks, ident);

    match matches.len() {
        0 => Err(TaskLookupError::TaskNotFound(ident.to_string())),
        1 => Ok(matches[0].clone()),
        _ => {
            let titles: Vec<String> = matches.iter().map(|t| t.title.clone()).collect();
            Err(TaskLookupError::AmbiguousTask(titles))
        }
    }
}

#[derive(Debug, Error)]
pub enum AddTaskError {
    #[error("Task title cannot be empty")]
    EmptyTitle,

    #[error("Invalid due date '{0}': {1}")]
    InvalidDueDate(String, String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub struct AddTaskParameters {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub priority: Priority,
    pub category: Category,
    pub recurring: Recurrence,
}

pub fn add_task(
    state: &mut AppState,
    storage: &impl Storage,
    parameters: AddTaskParameters,
) -> Result<Task, AddTaskError> {
    // 1. Validate the title - the store itself accepts anything
    let title = parameters.title.trim().to_string();
    if title.is_empty() {
        return Err(AddTaskError::EmptyTitle);
    }

    // 2. Parse due date if provided
    let due_date = if let Some(due_str) = parameters.due_date {
        Some(
            due_str
                .parse::<Date>()
                .map_err(|e| AddTaskError::InvalidDueDate(due_str.clone(), e.to_string()))?,
        )
    } else {
        None
    };

    // 3. Dispatch - id, created_at and position are assigned by the reducer
    let draft = TaskDraft {
        title,
        description: parameters.description.unwrap_or_default(),
        completed: false,
        due_date,
        priority: parameters.priority,
        category: parameters.category,
        subtasks: vec![],
        recurring: parameters.recurring,
        tags: vec![],
    };
    *state = reduce(state, Action::AddTask(draft));

    // 4. Persist to storage
    storage.save(state)?;

    // 5. Return the created task (AddTask always appends)
    Ok(state.tasks.last().unwrap().clone())
}

#[derive(Debug, Error)]
pub enum ToggleTaskError {
    #[error(transparent)]
    Lookup(#[from] TaskLookupError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub struct ToggleTaskParameters {
    pub task: String,
}

pub fn toggle_task(
    state: &mut AppState,
    storage: &impl Storage,
    parameters: ToggleTaskParameters,
) -> Result<Task, ToggleTaskError> {
    let task = resolve_task(state, &parameters.task)?;

    *state = reduce(state, Action::ToggleTask(task.id));

    storage.save(state)?;

    Ok(state.get_task(task.id).unwrap().clone())
}

#[derive(Debug, Error)]
pub enum UpdateTaskError {
    #[error(transparent)]
    Lookup(#[from] TaskLookupError),

    #[error("Task title cannot be empty")]
    EmptyTitle,

    #[error("Invalid due date '{0}': {1}")]
    InvalidDueDate(String, String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub struct UpdateTaskParameters {
    pub task: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub clear_due_date: bool,
    pub priority: Option<Priority>,
    pub category: Option<Category>,
    pub recurring: Option<Recurrence>,
}

pub fn update_task(
    state: &mut AppState,
    storage: &impl Storage,
    parameters: UpdateTaskParameters,
) -> Result<Task, UpdateTaskError> {
    let mut task = resolve_task(state, &parameters.task)?;

    if let Some(title) = parameters.title {
        let title = title.trim().to_string();
        if title.is_empty() {
            return Err(UpdateTaskError::EmptyTitle);
        }
        task.title = title;
    }
    if let Some(description) = parameters.description {
        task.description = description;
    }
    if parameters.clear_due_date {
        task.due_date = None;
    } else if let Some(due_str) = parameters.due_date {
        task.due_date = Some(
            due_str
                .parse::<Date>()
                .map_err(|e| UpdateTaskError::InvalidDueDate(due_str.clone(), e.to_string()))?,
        );
    }
    if let Some(priority) = parameters.priority {
        task.priority = priority;
    }
    if let Some(category) = parameters.category {
        task.category = category;
    }
    if let Some(recurring) = parameters.recurring {
        task.recurring = recurring;
    }

    // The reducer replaces the matching task wholesale
    let task_id = task.id;
    *state = reduce(state, Action::UpdateTask(task));

    storage.save(state)?;

    Ok(state.get_task(task_id).unwrap().clone())
}

#[derive(Debug, Error)]
pub enum DeleteTaskError {
    #[error(transparent)]
    Lookup(#[from] TaskLookupError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub struct DeleteTaskParameters {
    pub task: String,
}

pub fn delete_task(
    state: &mut AppState,
    storage: &impl Storage,
    parameters: DeleteTaskParameters,
) -> Result<Task, DeleteTaskError> {
    let task = resolve_task(state, &parameters.task)?;

    *state = reduce(state, Action::DeleteTask(task.id));

    storage.save(state)?;

    Ok(task)
}

#[derive(Debug, Error)]
pub enum ReorderTasksError {
    #[error("Task '{0}' not found in the current view")]
    TaskNotFound(String),

    #[error("Task reference is ambiguous. Multiple tasks found: {}", .0.join(", "))]
    AmbiguousTask(Vec<String>),

    #[error("Task '{0}' listed more than once")]
    DuplicateTask(String),

    #[error("Order lists {listed} task(s) but the current view shows {visible}. List every visible task exactly once.")]
    IncompleteOrder { listed: usize, visible: usize },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub struct ReorderTasksParameters {
    /// The new order of the currently visible tasks, each referenced by
    /// UUID or title fragment.
    pub order: Vec<String>,
}

/// Reorder the visible tasks. Only tasks in the current projection move;
/// tasks excluded by the active filters are never touched or dropped.
pub fn reorder_tasks(
    state: &mut AppState,
    storage: &impl Storage,
    parameters: ReorderTasksParameters,
) -> Result<Vec<Task>, ReorderTasksError> {
    let visible = visible_tasks(state);

    let mut ordered: Vec<Task> = Vec::with_capacity(parameters.order.len());
    for ident in &parameters.order {
        let matches = find_matches(&visible, ident);
        let task = match matches.len() {
            0 => return Err(ReorderTasksError::TaskNotFound(ident.clone())),
            1 => matches[0].clone(),
            _ => {
                let titles: Vec<String> = matches.iter().map(|t| t.title.clone()).collect();
                return Err(ReorderTasksError::AmbiguousTask(titles));
            }
        };

        if ordered.iter().any(|t| t.id == task.id) {
            return Err(ReorderTasksError::DuplicateTask(ident.clone()));
        }
        ordered.push(task);
    }

    if ordered.len() != visible.len() {
        return Err(ReorderTasksError::IncompleteOrder {
            listed: ordered.len(),
            visible: visible.len(),
        });
    }

    *state = reduce(state, Action::ReorderTasks(ordered));

    storage.save(state)?;

    Ok(visible_tasks(state))
}
