pub mod state;
pub mod task;
