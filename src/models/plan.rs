use serde::{Deserialize, Serialize};

use crate::models::task::Priority;

/// One placed task in a generated day plan. Derived output only: nothing in
/// here is written back to the store unless the caller commits the plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlanEntry {
    pub task_id: String,
    pub pet_id: String,
    pub description: String,
    pub priority: Priority,
    /// Minutes since local midnight, `[start_minute, end_minute)`.
    pub start_minute: i64,
    pub end_minute: i64,
    /// True when the task carried an explicit clock time.
    pub fixed: bool,
    /// True when this entry participates in at least one fixed-time overlap.
    pub conflict: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    BudgetExceeded,
    NoAvailableSlot,
}

impl SkipReason {
    pub fn message(self) -> &'static str {
        match self {
            SkipReason::BudgetExceeded => "not enough time left in the daily budget",
            SkipReason::NoAvailableSlot => "no free slot long enough anywhere in the day",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SkippedTask {
    pub task_id: String,
    pub description: String,
    pub reason: SkipReason,
}

/// An overlapping pair of fixed-time entries. Advisory only: both tasks stay
/// in the plan, the overlap may even be intentional (feeding two pets at the
/// same time), but the owner should see it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleConflict {
    pub first_task_id: String,
    pub second_task_id: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    /// Entries sorted ascending by start minute.
    pub entries: Vec<PlanEntry>,
    pub skipped: Vec<SkippedTask>,
    pub conflicts: Vec<ScheduleConflict>,
    /// Minutes of placed work, fixed and flexible together.
    pub total_minutes_used: i64,
    pub budget_minutes: i64,
    pub explanation: String,
    pub generated_at: String,
}
