pub mod settings;
pub mod subtasks;
pub mod tasks;
