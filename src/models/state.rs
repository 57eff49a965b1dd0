use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::task::{Category, Priority, Task};

/// Current schema version
pub const CURRENT_VERSION: u32 = 1;

/// The entire application state, serialized wholesale on every change.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct AppState {
    pub version: u32,
    /// Full task collection. Ids are unique; display order is `position`.
    pub tasks: Vec<Task>,
    /// Status filter applied by the projection
    pub filter: StatusFilter,
    /// Case-insensitive title substring filter, empty = off
    pub search: String,
    /// Priority filter, `None` = all priorities
    pub priority_filter: Option<Priority>,
    /// Category filter, `None` = all categories
    pub category_filter: Option<Category>,
    pub theme: Theme,
    pub view: View,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            tasks: vec![],
            filter: StatusFilter::All,
            search: String::new(),
            priority_filter: None,
            category_filter: None,
            theme: Theme::Light,
            view: View::List,
        }
    }
}

impl AppState {
    pub fn get_task(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }
}

#[derive(
    Serialize, Deserialize, Default, Clone, Copy, PartialEq, Eq, Debug, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

#[derive(Serialize, Deserialize, Default, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

#[derive(
    Serialize, Deserialize, Default, Clone, Copy, PartialEq, Eq, Debug, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    List,
    Calendar,
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            View::List => write!(f, "list"),
            View::Calendar => write!(f, "calendar"),
        }
    }
}
