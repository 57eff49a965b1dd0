use thiserror::Error;

use crate::{
    models::{
        state::{AppState, StatusFilter, Theme, View},
        task::{Category, Priority},
    },
    store::{Action, reduce},
    storage::{Storage, StorageError},
};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

fn apply(
    state: &mut AppState,
    storage: &impl Storage,
    action: Action,
) -> Result<(), SettingsError> {
    *state = reduce(state, action);
    storage.save(state)?;
    Ok(())
}

pub fn set_status_filter(
    state: &mut AppState,
    storage: &impl Storage,
    filter: StatusFilter,
) -> Result<(), SettingsError> {
    apply(state, storage, Action::SetFilter(filter))
}

pub fn set_search(
    state: &mut AppState,
    storage: &impl Storage,
    search: String,
) -> Result<(), SettingsError> {
    apply(state, storage, Action::SetSearch(search))
}

pub fn set_priority_filter(
    state: &mut AppState,
    storage: &impl Storage,
    priority: Option<Priority>,
) -> Result<(), SettingsError> {
    apply(state, storage, Action::SetPriorityFilter(priority))
}

pub fn set_category_filter(
    state: &mut AppState,
    storage: &impl Storage,
    category: Option<Category>,
) -> Result<(), SettingsError> {
    apply(state, storage, Action::SetCategoryFilter(category))
}

pub fn set_view(
    state: &mut AppState,
    storage: &impl Storage,
    view: View,
) -> Result<(), SettingsError> {
    apply(state, storage, Action::SetView(view))
}

/// Flips light <-> dark and returns the new theme.
pub fn toggle_theme(
    state: &mut AppState,
    storage: &impl Storage,
) -> Result<Theme, SettingsError> {
    apply(state, storage, Action::ToggleTheme)?;
    Ok(state.theme)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullStorage;

    impl Storage for NullStorage {
        fn load(&self) -> Result<AppState, StorageError> {
            Ok(AppState::default())
        }

        fn save(&self, _state: &AppState) -> Result<(), StorageError> {
            Ok(())
        }
    }

    #[test]
    fn test_settings_round_trip_through_the_reducer() {
        let mut state = AppState::default();

        set_status_filter(&mut state, &NullStorage, StatusFilter::Completed).unwrap();
        set_search(&mut state, &NullStorage, String::from("milk")).unwrap();
        set_priority_filter(&mut state, &NullStorage, Some(Priority::Low)).unwrap();
        set_category_filter(&mut state, &NullStorage, Some(Category::School)).unwrap();
        set_view(&mut state, &NullStorage, View::Calendar).unwrap();

        assert_eq!(state.filter, StatusFilter::Completed);
        assert_eq!(state.search, "milk");
        assert_eq!(state.priority_filter, Some(Priority::Low));
        assert_eq!(state.category_filter, Some(Category::School));
        assert_eq!(state.view, View::Calendar);

        assert_eq!(toggle_theme(&mut state, &NullStorage).unwrap(), Theme::Dark);
        assert_eq!(toggle_theme(&mut state, &NullStorage).unwrap(), Theme::Light);
    }
}
