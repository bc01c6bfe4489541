//! Task domain types and form validation.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use orchard_core::TaskId;

/// Longest accepted title, in characters.
pub const TITLE_MAX_CHARS: usize = 255;

/// A stored task.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw create/update form submission.
///
/// Fields default to empty so that a missing input is reported as a
/// validation error instead of a deserialization rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Validated task fields, trimmed and ready to store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskInput {
    pub title: String,
    pub description: String,
}

/// Field-level validation messages, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<String>);

impl ValidationErrors {
    /// Whether no rule failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages in the order the fields appear on the form.
    #[must_use]
    pub fn messages(&self) -> &[String] {
        &self.0
    }
}

impl TaskForm {
    /// Check the submission against the task rules.
    ///
    /// Both fields are required and the title is limited to
    /// [`TITLE_MAX_CHARS`] characters.
    ///
    /// # Errors
    ///
    /// Returns every failed rule so the form can show them together.
    pub fn validate(&self) -> Result<TaskInput, ValidationErrors> {
        let title = self.title.trim();
        let description = self.description.trim();
        let mut errors = Vec::new();

        if title.is_empty() {
            errors.push("The title field is required.".to_string());
        } else if title.chars().count() > TITLE_MAX_CHARS {
            errors.push(format!(
                "The title field must not be greater than {TITLE_MAX_CHARS} characters."
            ));
        }

        if description.is_empty() {
            errors.push("The description field is required.".to_string());
        }

        if errors.is_empty() {
            Ok(TaskInput {
                title: title.to_string(),
                description: description.to_string(),
            })
        } else {
            Err(ValidationErrors(errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(title: &str, description: &str) -> TaskForm {
        TaskForm {
            title: title.to_string(),
            description: description.to_string(),
        }
    }

    #[test]
    fn test_valid_input_is_trimmed() {
        let input = form("  Buy milk ", "\tsemi-skimmed\n").validate();
        assert_eq!(
            input,
            Ok(TaskInput {
                title: "Buy milk".to_string(),
                description: "semi-skimmed".to_string(),
            })
        );
    }

    #[test]
    fn test_blank_fields_are_required() {
        let errors = form("   ", "").validate().unwrap_err();
        assert_eq!(
            errors.messages(),
            [
                "The title field is required.",
                "The description field is required."
            ]
        );
    }

    #[test]
    fn test_title_length_limit() {
        assert!(form(&"x".repeat(TITLE_MAX_CHARS), "d").validate().is_ok());

        let errors = form(&"x".repeat(TITLE_MAX_CHARS + 1), "d")
            .validate()
            .unwrap_err();
        assert_eq!(errors.messages().len(), 1);
        assert!(errors.messages()[0].contains("255"));
    }
}
