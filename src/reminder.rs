use crate::error::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: String,
    pub title: String,
    pub date: DateTime<Utc>,
    pub completed_date: Option<DateTime<Utc>>,
    pub is_completed: bool,
}

impl Reminder {
    /// Build a fresh, incomplete reminder with a newly generated id.
    pub fn new(title: impl Into<String>, date: DateTime<Utc>) -> AppResult<Self> {
        let title = title.into();
        validate_title(&title)?;
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            title,
            date,
            completed_date: None,
            is_completed: false,
        })
    }

    /// Flip completion, keeping `completed_date` in step with `is_completed`.
    pub fn toggle_completion(&mut self, now: DateTime<Utc>) {
        if self.is_completed {
            self.is_completed = false;
            self.completed_date = None;
        } else {
            self.is_completed = true;
            self.completed_date = Some(now);
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.is_completed == self.completed_date.is_some()
    }
}

/// Titles must contain something other than whitespace.
pub fn validate_title(title: &str) -> AppResult<()> {
    if title.trim().is_empty() {
        return Err(AppError::validation("Reminder title cannot be empty"));
    }
    Ok(())
}

/// Incomplete reminders first, then ascending by due date within each group.
pub fn display_order(a: &Reminder, b: &Reminder) -> Ordering {
    a.is_completed
        .cmp(&b.is_completed)
        .then_with(|| a.date.cmp(&b.date))
}
