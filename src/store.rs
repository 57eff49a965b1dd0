use jiff::Timestamp;
use jiff::civil::Date;
use uuid::Uuid;

use crate::models::{
    state::{AppState, StatusFilter, Theme, View},
    task::{Category, Priority, Recurrence, SubTask, Task},
};

/// Caller-supplied fields for a new task. The store injects `id`,
/// `created_at` and `position`; everything else is taken verbatim.
#[derive(Default, Clone, Debug)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub due_date: Option<Date>,
    pub priority: Priority,
    pub category: Category,
    pub subtasks: Vec<SubTask>,
    pub recurring: Recurrence,
    pub tags: Vec<String>,
}

/// Closed set of state mutations. Actions referencing an absent id are
/// silent no-ops, never errors.
#[derive(Clone, Debug)]
pub enum Action {
    AddTask(TaskDraft),
    UpdateTask(Task),
    DeleteTask(Uuid),
    ToggleTask(Uuid),
    AddSubtask { task_id: Uuid, title: String },
    ToggleSubtask { task_id: Uuid, subtask_id: Uuid },
    DeleteSubtask { task_id: Uuid, subtask_id: Uuid },
    SetFilter(StatusFilter),
    SetSearch(String),
    SetPriorityFilter(Option<Priority>),
    SetCategoryFilter(Option<Category>),
    ToggleTheme,
    SetView(View),
    ReorderTasks(Vec<Task>),
}

/// Pure state reduction: never mutates its input, always returns a new state.
pub fn reduce(state: &AppState, action: Action) -> AppState {
    let mut next = state.clone();

    match action {
        Action::AddTask(draft) => {
            let task = Task {
                id: Uuid::new_v4(),
                title: draft.title,
                description: draft.description,
                completed: draft.completed,
                created_at: Timestamp::now(),
                due_date: draft.due_date,
                priority: draft.priority,
                category: draft.category,
                subtasks: draft.subtasks,
                recurring: draft.recurring,
                tags: draft.tags,
                position: next.tasks.len() as u64,
            };
            next.tasks.push(task);
        }

        Action::UpdateTask(updated) => {
            if let Some(slot) = next.tasks.iter_mut().find(|t| t.id == updated.id) {
                *slot = updated;
            }
        }

        Action::DeleteTask(id) => {
            next.tasks.retain(|t| t.id != id);
        }

        Action::ToggleTask(id) => {
            if let Some(task) = next.tasks.iter_mut().find(|t| t.id == id) {
                task.completed = !task.completed;
            }
        }

        Action::AddSubtask { task_id, title } => {
            if let Some(task) = next.tasks.iter_mut().find(|t| t.id == task_id) {
                task.subtasks.push(SubTask {
                    id: Uuid::new_v4(),
                    title,
                    completed: false,
                });
            }
        }

        Action::ToggleSubtask { task_id, subtask_id } => {
            if let Some(task) = next.tasks.iter_mut().find(|t| t.id == task_id)
                && let Some(subtask) = task.subtasks.iter_mut().find(|s| s.id == subtask_id)
            {
                subtask.completed = !subtask.completed;
            }
        }

        Action::DeleteSubtask { task_id, subtask_id } => {
            if let Some(task) = next.tasks.iter_mut().find(|t| t.id == task_id) {
                task.subtasks.retain(|s| s.id != subtask_id);
            }
        }

        Action::SetFilter(filter) => next.filter = filter,
        Action::SetSearch(search) => next.search = search,
        Action::SetPriorityFilter(priority) => next.priority_filter = priority,
        Action::SetCategoryFilter(category) => next.category_filter = category,

        Action::ToggleTheme => {
            next.theme = match next.theme {
                Theme::Light => Theme::Dark,
                Theme::Dark => Theme::Light,
            };
        }

        Action::SetView(view) => next.view = view,

        Action::ReorderTasks(ordered) => {
            // Positions follow the 0-based index of the supplied order.
            // Tasks not named in the list keep their entries untouched, so
            // reordering a filtered view never drops hidden tasks.
            for (index, mut reordered) in ordered.into_iter().enumerate() {
                reordered.position = index as u64;
                if let Some(slot) = next.tasks.iter_mut().find(|t| t.id == reordered.id) {
                    *slot = reordered;
                }
            }
        }
    }

    next
}
