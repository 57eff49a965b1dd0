use crate::models::{
    state::{AppState, StatusFilter},
    task::Task,
};

/// Derive the visible task list from raw state: status, priority, category
/// and search predicates ANDed, result sorted ascending by `position`.
///
/// Pure and eager - a fresh sequence is materialized on every call.
pub fn visible_tasks(state: &AppState) -> Vec<Task> {
    let needle = state.search.to_lowercase();

    let mut tasks: Vec<Task> = state
        .tasks
        .iter()
        .filter(|task| {
            match state.filter {
                StatusFilter::All => {}
                StatusFilter::Active if task.completed => return false,
                StatusFilter::Completed if !task.completed => return false,
                _ => {}
            }

            if let Some(priority) = state.priority_filter
                && task.priority != priority
            {
                return false;
            }

            if let Some(category) = state.category_filter
                && task.category != category
            {
                return false;
            }

            if !needle.is_empty() && !task.title.to_lowercase().contains(&needle) {
                return false;
            }

            true
        })
        .cloned()
        .collect();

    tasks.sort_by_key(|t| t.position);
    tasks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::{Category, Priority};
    use crate::store::{Action, TaskDraft, reduce};

    fn fixture() -> AppState {
        // A(position=0, active), B(position=1, completed)
        let state = reduce(
            &AppState::default(),
            Action::AddTask(TaskDraft {
                title: String::from("Buy groceries"),
                priority: Priority::High,
                category: Category::Shopping,
                ..TaskDraft::default()
            }),
        );
        let state = reduce(
            &state,
            Action::AddTask(TaskDraft {
                title: String::from("Walk dog"),
                completed: true,
                priority: Priority::Low,
                category: Category::Personal,
                ..TaskDraft::default()
            }),
        );
        state
    }

    fn titles(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.title.as_str()).collect()
    }

    #[test]
    fn test_status_filter_splits_active_and_completed() {
        let state = fixture();

        let all = visible_tasks(&state);
        assert_eq!(titles(&all), vec!["Buy groceries", "Walk dog"]);

        let active = reduce(&state, Action::SetFilter(StatusFilter::Active));
        assert_eq!(titles(&visible_tasks(&active)), vec!["Buy groceries"]);

        let completed = reduce(&state, Action::SetFilter(StatusFilter::Completed));
        assert_eq!(titles(&visible_tasks(&completed)), vec!["Walk dog"]);
    }

    #[test]
    fn test_priority_and_category_filters_require_exact_match() {
        let state = fixture();

        let high = reduce(&state, Action::SetPriorityFilter(Some(Priority::High)));
        assert_eq!(titles(&visible_tasks(&high)), vec!["Buy groceries"]);

        let medium = reduce(&state, Action::SetPriorityFilter(Some(Priority::Medium)));
        assert!(visible_tasks(&medium).is_empty());

        let personal = reduce(&state, Action::SetCategoryFilter(Some(Category::Personal)));
        assert_eq!(titles(&visible_tasks(&personal)), vec!["Walk dog"]);
    }

    #[test]
    fn test_search_is_case_insensitive_substring_on_title() {
        let state = fixture();

        let searched = reduce(&state, Action::SetSearch(String::from("groceries")));
        assert_eq!(titles(&visible_tasks(&searched)), vec!["Buy groceries"]);

        let shouting = reduce(&state, Action::SetSearch(String::from("GROC")));
        assert_eq!(titles(&visible_tasks(&shouting)), vec!["Buy groceries"]);

        let miss = reduce(&state, Action::SetSearch(String::from("laundry")));
        assert!(visible_tasks(&miss).is_empty());
    }

    #[test]
    fn test_predicates_are_anded() {
        let state = fixture();
        let state = reduce(&state, Action::SetFilter(StatusFilter::Active));
        let state = reduce(&state, Action::SetPriorityFilter(Some(Priority::Low)));

        // "Buy groceries" passes status but not priority; "Walk dog" the
        // other way around.
        assert!(visible_tasks(&state).is_empty());
    }

    #[test]
    fn test_projection_is_idempotent() {
        let state = fixture();
        assert_eq!(visible_tasks(&state), visible_tasks(&state));
    }

    #[test]
    fn test_result_is_sorted_by_position_after_reorder() {
        let state = fixture();
        let (a, b) = (state.tasks[0].clone(), state.tasks[1].clone());

        let state = reduce(&state, Action::ReorderTasks(vec![b, a]));
        assert_eq!(titles(&visible_tasks(&state)), vec!["Walk dog", "Buy groceries"]);
    }
}
