use chrono::{Duration, NaiveDate};
use tracing::debug;
use uuid::Uuid;

use crate::models::task::{Frequency, TaskRecord, TaskStatus};

/// Derives the next occurrence of a recurring task. Runs only on completion
/// events; the planner never calls into here.
pub struct OccurrenceEngine;

impl OccurrenceEngine {
    /// New pending task for the next occurrence, or `None` for one-off tasks.
    /// The completed original is left untouched so history is preserved.
    pub fn next_occurrence(task: &TaskRecord, today: NaiveDate, now: &str) -> Option<TaskRecord> {
        let step = match task.frequency {
            Frequency::Once => return None,
            Frequency::Daily => Duration::days(1),
            Frequency::Weekly => Duration::days(7),
        };

        let base = task.due_date.unwrap_or(today);
        let next_due = base + step;

        debug!(
            target: "app::recurrence",
            task_id = %task.id,
            frequency = %task.frequency,
            next_due = %next_due,
            "deriving next occurrence"
        );

        Some(TaskRecord {
            id: Uuid::new_v4().to_string(),
            pet_id: task.pet_id.clone(),
            description: task.description.clone(),
            duration_minutes: task.duration_minutes,
            priority: task.priority,
            status: TaskStatus::Pending,
            frequency: task.frequency,
            time: task.time.clone(),
            due_date: Some(next_due),
            created_at: now.to_string(),
            updated_at: now.to_string(),
        })
    }
}
