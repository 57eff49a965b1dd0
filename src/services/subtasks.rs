use thiserror::Error;
use uuid::Uuid;

use crate::{
    models::{
        state::AppState,
        task::{SubTask, Task},
    },
    services::tasks::{TaskLookupError, resolve_task},
    store::{Action, reduce},
    storage::{Storage, StorageError},
};

#[derive(Debug, Error)]
pub enum SubtaskError {
    #[error(transparent)]
    Lookup(#[from] TaskLookupError),

    #[error("Subtask title cannot be empty")]
    EmptyTitle,

    #[error("Subtask '{0}' not found")]
    SubtaskNotFound(String),

    #[error("Subtask reference is ambiguous. Multiple subtasks found: {}", .0.join(", "))]
    AmbiguousSubtask(Vec<String>),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Resolve `ident` against a parent task's checklist: exact id when it
/// parses as a UUID, otherwise case-insensitive title substring.
fn resolve_subtask(task: &Task, ident: &str) -> Result<SubTask, SubtaskError> {
    if let Ok(id) = ident.parse::<Uuid>() {
        return task
            .get_subtask(id)
            .cloned()
            .ok_or_else(|| SubtaskError::SubtaskNotFound(ident.to_string()));
    }

    let needle = ident.to_lowercase();
    let matches: Vec<&SubTask> = task
        .subtasks
        .iter()
        .filter(|s| s.title.to_lowercase().contains(&needle))
        .collect();

    match matches.len() {
        0 => Err(SubtaskError::SubtaskNotFound(ident.to_string())),
        1 => Ok(matches[0].clone()),
        _ => {
            let titles: Vec<String> = matches.iter().map(|s| s.title.clone()).collect();
            Err(SubtaskError::AmbiguousSubtask(titles))
        }
    }
}

pub struct AddSubtaskParameters {
    pub task: String,
    pub title: String,
}

/// Append a checklist item to a task. Returns the parent with the new entry.
pub fn add_subtask(
    state: &mut AppState,
    storage: &impl Storage,
    parameters: AddSubtaskParameters,
) -> Result<Task, SubtaskError> {
    let title = parameters.title.trim().to_string();
    if title.is_empty() {
        return Err(SubtaskError::EmptyTitle);
    }

    let task = resolve_task(state, &parameters.task)?;

    *state = reduce(
        state,
        Action::AddSubtask {
            task_id: task.id,
            title,
        },
    );

    storage.save(state)?;

    Ok(state.get_task(task.id).unwrap().clone())
}

pub struct ToggleSubtaskParameters {
    pub task: String,
    pub subtask: String,
}

pub fn toggle_subtask(
    state: &mut AppState,
    storage: &impl Storage,
    parameters: ToggleSubtaskParameters,
) -> Result<SubTask, SubtaskError> {
    let task = resolve_task(state, &parameters.task)?;
    let subtask = resolve_subtask(&task, &parameters.subtask)?;

    *state = reduce(
        state,
        Action::ToggleSubtask {
            task_id: task.id,
            subtask_id: subtask.id,
        },
    );

    storage.save(state)?;

    Ok(state
        .get_task(task.id)
        .unwrap()
        .get_subtask(subtask.id)
        .unwrap()
        .clone())
}

pub struct DeleteSubtaskParameters {
    pub task: String,
    pub subtask: String,
}

pub fn delete_subtask(
    state: &mut AppState,
    storage: &impl Storage,
    parameters: DeleteSubtaskParameters,
) -> Result<SubTask, SubtaskError> {
    let task = resolve_task(state, &parameters.task)?;
    let subtask = resolve_subtask(&task, &parameters.subtask)?;

    *state = reduce(
        state,
        Action::DeleteSubtask {
            task_id: task.id,
            subtask_id: subtask.id,
        },
    );

    storage.save(state)?;

    Ok(subtask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::TaskDraft;

    struct NullStorage;

    impl Storage for NullStorage {
        fn load(&self) -> Result<AppState, StorageError> {
            Ok(AppState::default())
        }

        fn save(&self, _state: &AppState) -> Result<(), StorageError> {
            Ok(())
        }
    }

    fn state_with_task(title: &str) -> AppState {
        reduce(
            &AppState::default(),
            Action::AddTask(TaskDraft {
                title: String::from(title),
                ..TaskDraft::default()
            }),
        )
    }

    #[test]
    fn test_add_then_toggle_subtask() {
        let mut state = state_with_task("Groceries");

        let parent = add_subtask(
            &mut state,
            &NullStorage,
            AddSubtaskParameters {
                task: String::from("groceries"),
                title: String::from("buy milk"),
            },
        )
        .unwrap();
        assert_eq!(parent.subtasks.len(), 1);
        assert!(!parent.subtasks[0].completed);

        let toggled = toggle_subtask(
            &mut state,
            &NullStorage,
            ToggleSubtaskParameters {
                task: String::from("groceries"),
                subtask: String::from("milk"),
            },
        )
        .unwrap();
        assert!(toggled.completed);
        assert_eq!(state.tasks[0].subtasks.len(), 1);
    }

    #[test]
    fn test_add_subtask_rejects_blank_title() {
        let mut state = state_with_task("Groceries");

        let result = add_subtask(
            &mut state,
            &NullStorage,
            AddSubtaskParameters {
                task: String::from("groceries"),
                title: String::from(" "),
            },
        );

        assert!(matches!(result, Err(SubtaskError::EmptyTitle)));
        assert!(state.tasks[0].subtasks.is_empty());
    }

    #[test]
    fn test_delete_subtask_removes_only_the_match() {
        let mut state = state_with_task("Groceries");
        for title in ["buy milk", "buy eggs"] {
            add_subtask(
                &mut state,
                &NullStorage,
                AddSubtaskParameters {
                    task: String::from("groceries"),
                    title: String::from(title),
                },
            )
            .unwrap();
        }

        let removed = delete_subtask(
            &mut state,
            &NullStorage,
            DeleteSubtaskParameters {
                task: String::from("groceries"),
                subtask: String::from("milk"),
            },
        )
        .unwrap();

        assert_eq!(removed.title, "buy milk");
        assert_eq!(state.tasks[0].subtasks.len(), 1);
        assert_eq!(state.tasks[0].subtasks[0].title, "buy eggs");
    }

    #[test]
    fn test_ambiguous_subtask_reference() {
        let mut state = state_with_task("Groceries");
        for title in ["buy milk", "buy eggs"] {
            add_subtask(
                &mut state,
                &NullStorage,
                AddSubtaskParameters {
                    task: String::from("groceries"),
                    title: String::from(title),
                },
            )
            .unwrap();
        }

        let result = toggle_subtask(
            &mut state,
            &NullStorage,
            ToggleSubtaskParameters {
                task: String::from("groceries"),
                subtask: String::from("buy"),
            },
        );

        assert!(matches!(result, Err(SubtaskError::AmbiguousSubtask(_))));
    }
}
