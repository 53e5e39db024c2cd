use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Task priority. Variant order matters: the scheduler sorts flexible tasks
/// by priority descending, so `Low < Medium < High` must hold under `Ord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl FromStr for Priority {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(AppError::validation(format!("invalid priority: {}", s))),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Scheduled,
    Completed,
    Skipped,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "pending"),
            TaskStatus::Scheduled => write!(f, "scheduled"),
            TaskStatus::Completed => write!(f, "completed"),
            TaskStatus::Skipped => write!(f, "skipped"),
        }
    }
}

impl TaskStatus {
    /// Allowed transitions within one day. `Scheduled` is a projection label
    /// the caller may commit and later clear back to `Pending`; the terminal
    /// states never reopen (recurrence creates a fresh task instead).
    pub fn can_transition_to(self, next: TaskStatus) -> bool {
        use TaskStatus::{Completed, Pending, Scheduled, Skipped};
        match (self, next) {
            (Pending, Scheduled) | (Pending, Completed) | (Pending, Skipped) => true,
            (Scheduled, Pending) | (Scheduled, Completed) | (Scheduled, Skipped) => true,
            (Completed, _) | (Skipped, _) => false,
            _ => false,
        }
    }
}

/// How often a task repeats. `Once` tasks end when completed; `Daily` and
/// `Weekly` tasks spawn a next occurrence on completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Once,
    Daily,
    Weekly,
}

impl FromStr for Frequency {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "once" | "none" => Ok(Frequency::Once),
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            _ => Err(AppError::validation(format!("invalid frequency: {}", s))),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::Once => write!(f, "once"),
            Frequency::Daily => write!(f, "daily"),
            Frequency::Weekly => write!(f, "weekly"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: String,
    pub pet_id: String,
    pub description: String,
    pub duration_minutes: i64,
    pub priority: Priority,
    pub status: TaskStatus,
    pub frequency: Frequency,
    /// Fixed clock time as validated `HH:MM`, or `None` for flexible tasks.
    pub time: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub created_at: String,
    pub updated_at: String,
}

impl TaskRecord {
    pub fn is_fixed(&self) -> bool {
        self.time.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskCreateInput {
    pub description: String,
    pub duration_minutes: i64,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub frequency: Option<Frequency>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdateInput {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub duration_minutes: Option<i64>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub frequency: Option<Frequency>,
    #[serde(default)]
    pub time: Option<Option<String>>,
    #[serde(default)]
    pub due_date: Option<Option<NaiveDate>>,
}

/// Filter for task listings. Empty filter matches everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFilter {
    #[serde(default)]
    pub pet_id: Option<String>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
}
