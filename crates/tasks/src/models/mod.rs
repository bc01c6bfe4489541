//! Domain models for the tasks application.

pub mod task;

pub use task::{Task, TaskForm, TaskInput, ValidationErrors};
