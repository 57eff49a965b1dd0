use jiff::Timestamp;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Default, Clone, PartialEq, Debug)]
pub struct Task {
    /// UUID to identify the task
    pub id: Uuid,
    /// Title of the task
    pub title: String,
    /// Free-form description, may be empty
    pub description: String,
    /// Whether the task is done
    pub completed: bool,
    /// When the task was created - set once, never mutated
    pub created_at: Timestamp,
    /// Optional deadline for this task
    pub due_date: Option<Date>,
    /// Priority of the task
    pub priority: Priority,
    /// Category of the task
    pub category: Category,
    /// Checklist items owned by this task, insertion order relevant
    pub subtasks: Vec<SubTask>,
    /// Recurrence label - descriptive only, completing a recurring task
    /// does not spawn a follow-up instance
    pub recurring: Recurrence,
    /// Tags of the task
    pub tags: Vec<String>,
    /// Manual sort order among all tasks
    pub position: u64,
}

impl Task {
    /// Percentage of completed subtasks, 0 when there are none
    pub fn progress(&self) -> u8 {
        if self.subtasks.is_empty() {
            return 0;
        }
        let completed = self.subtasks.iter().filter(|s| s.completed).count();
        ((completed as f64 / self.subtasks.len() as f64) * 100.0).round() as u8
    }

    pub fn get_subtask(&self, subtask_id: Uuid) -> Option<&SubTask> {
        self.subtasks.iter().find(|s| s.id == subtask_id)
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct SubTask {
    pub id: Uuid,
    pub title: String,
    pub completed: bool,
}

#[derive(
    Serialize, Deserialize, Default, Clone, Copy, PartialEq, Eq, Debug, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
        }
    }
}

#[derive(
    Serialize, Deserialize, Default, Clone, Copy, PartialEq, Eq, Debug, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Personal,
    Work,
    Shopping,
    Business,
    School,
    Other,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Personal => write!(f, "personal"),
            Category::Work => write!(f, "work"),
            Category::Shopping => write!(f, "shopping"),
            Category::Business => write!(f, "business"),
            Category::School => write!(f, "school"),
            Category::Other => write!(f, "other"),
        }
    }
}

#[derive(
    Serialize, Deserialize, Default, Clone, Copy, PartialEq, Eq, Debug, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
}

impl std::fmt::Display for Recurrence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Recurrence::None => write!(f, "none"),
            Recurrence::Daily => write!(f, "daily"),
            Recurrence::Weekly => write!(f, "weekly"),
            Recurrence::Monthly => write!(f, "monthly"),
        }
    }
}
