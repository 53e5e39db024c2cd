use chrono::Utc;
use tracing::{debug, info};

use crate::error::AppResult;
use crate::models::owner::WindowPreference;
use crate::models::plan::{DayPlan, PlanEntry, ScheduleConflict, SkipReason, SkippedTask};
use crate::models::task::{TaskRecord, TaskStatus};
use crate::services::schedule_utils::{self, MinuteSpan};
use crate::store::CareStore;

/// Builds the day plan for an owner's pending tasks. Plan generation is a
/// read-only projection: the store is never mutated here, and the same
/// snapshot always yields the same plan.
#[derive(Clone)]
pub struct ScheduleService {
    store: CareStore,
}

impl ScheduleService {
    pub fn new(store: CareStore) -> Self {
        Self { store }
    }

    /// Snapshot the owner's pending tasks, budget, and window preference,
    /// then run the planner over them.
    pub fn generate_for_owner(&self, owner_id: &str) -> AppResult<DayPlan> {
        let (tasks, budget, preference) = self.store.with_state(|state| {
            let owner = state.owner(owner_id)?;
            let pending = state
                .tasks_for_owner(owner_id)?
                .into_iter()
                .filter(|task| task.status == TaskStatus::Pending)
                .collect::<Vec<_>>();
            Ok((pending, owner.available_time_minutes, owner.preferred_window))
        })?;

        debug!(
            target: "app::schedule",
            owner_id,
            pending = tasks.len(),
            budget,
            "generating day plan"
        );

        let plan = generate_schedule(&tasks, budget, preference)?;

        info!(
            target: "app::schedule",
            owner_id,
            scheduled = plan.entries.len(),
            skipped = plan.skipped.len(),
            conflicts = plan.conflicts.len(),
            "day plan generated"
        );

        Ok(plan)
    }
}

/// Core planning algorithm. Fixed-time tasks are placed verbatim and never
/// skipped; flexible tasks are placed greedily by priority into the earliest
/// gap (preferred window first), within the owner's minute budget.
pub fn generate_schedule(
    tasks: &[TaskRecord],
    budget_minutes: i64,
    preference: Option<WindowPreference>,
) -> AppResult<DayPlan> {
    let window = schedule_utils::window_bounds(preference);

    let (fixed, flexible): (Vec<&TaskRecord>, Vec<&TaskRecord>) =
        tasks.iter().partition(|task| task.is_fixed());

    let mut entries = Vec::new();
    let mut occupied: Vec<MinuteSpan> = Vec::new();
    let mut fixed_minutes = 0;

    for task in &fixed {
        let raw = match task.time.as_deref() {
            Some(raw) => raw,
            None => continue,
        };
        let start = schedule_utils::parse_clock(raw)?;
        let span = MinuteSpan::new(start, start + task.duration_minutes);
        schedule_utils::insert_span(&mut occupied, span);
        fixed_minutes += task.duration_minutes;
        entries.push(PlanEntry {
            task_id: task.id.clone(),
            pet_id: task.pet_id.clone(),
            description: task.description.clone(),
            priority: task.priority,
            start_minute: span.start,
            end_minute: span.end,
            fixed: true,
            conflict: false,
        });
    }

    // Fixed tasks may already overdraw the budget; the remainder goes
    // negative and every flexible task fails the budget check below.
    let mut remaining_budget = budget_minutes - fixed_minutes;
    let mut placed_minutes = fixed_minutes;
    let mut skipped = Vec::new();

    for task in order_flexible(&flexible) {
        if task.duration_minutes > remaining_budget {
            skipped.push(SkippedTask {
                task_id: task.id.clone(),
                description: task.description.clone(),
                reason: SkipReason::BudgetExceeded,
            });
            continue;
        }

        match schedule_utils::find_slot(task.duration_minutes, &occupied, window) {
            Some(start) => {
                let span = MinuteSpan::new(start, start + task.duration_minutes);
                schedule_utils::insert_span(&mut occupied, span);
                remaining_budget -= task.duration_minutes;
                placed_minutes += task.duration_minutes;
                entries.push(PlanEntry {
                    task_id: task.id.clone(),
                    pet_id: task.pet_id.clone(),
                    description: task.description.clone(),
                    priority: task.priority,
                    start_minute: span.start,
                    end_minute: span.end,
                    fixed: false,
                    conflict: false,
                });
            }
            None => skipped.push(SkippedTask {
                task_id: task.id.clone(),
                description: task.description.clone(),
                reason: SkipReason::NoAvailableSlot,
            }),
        }
    }

    entries.sort_by_key(|entry| entry.start_minute);

    let fixed_entries = entries
        .iter()
        .filter(|entry| entry.fixed)
        .cloned()
        .collect::<Vec<_>>();
    let conflicts = detect_conflicts(&fixed_entries);
    for conflict in &conflicts {
        for entry in entries.iter_mut() {
            if entry.task_id == conflict.first_task_id || entry.task_id == conflict.second_task_id
            {
                entry.conflict = true;
            }
        }
    }

    let explanation = build_explanation(&entries, &skipped, &conflicts, placed_minutes, budget_minutes);

    Ok(DayPlan {
        entries,
        skipped,
        conflicts,
        total_minutes_used: placed_minutes,
        budget_minutes,
        explanation,
        generated_at: Utc::now().to_rfc3339(),
    })
}

/// Every pairwise overlap among fixed-time entries, not just adjacent ones.
/// Advisory: the plan keeps both members of each pair.
pub fn detect_conflicts(fixed_entries: &[PlanEntry]) -> Vec<ScheduleConflict> {
    let mut conflicts = Vec::new();

    for (index, first) in fixed_entries.iter().enumerate() {
        for second in fixed_entries.iter().skip(index + 1) {
            let a = MinuteSpan::new(first.start_minute, first.end_minute);
            let b = MinuteSpan::new(second.start_minute, second.end_minute);
            if schedule_utils::overlaps(a, b) {
                conflicts.push(ScheduleConflict {
                    first_task_id: first.task_id.clone(),
                    second_task_id: second.task_id.clone(),
                    message: format!(
                        "'{}' ({} - {}) overlaps '{}' ({} - {})",
                        first.description,
                        schedule_utils::format_clock(first.start_minute),
                        schedule_utils::format_clock(first.end_minute),
                        second.description,
                        schedule_utils::format_clock(second.start_minute),
                        schedule_utils::format_clock(second.end_minute),
                    ),
                });
            }
        }
    }

    conflicts
}

/// Chronological listing helper: timed tasks ascending by clock, untimed
/// tasks after them in their original order.
pub fn sort_by_clock(tasks: &[TaskRecord]) -> Vec<TaskRecord> {
    let mut sorted = tasks.to_vec();
    sorted.sort_by_key(|task| {
        match task.time.as_deref().and_then(|raw| schedule_utils::parse_clock(raw).ok()) {
            Some(minute) => (false, minute),
            None => (true, 0),
        }
    });
    sorted
}

/// Placement order for flexible tasks: priority descending, shorter duration
/// first within a priority, stable for full ties.
fn order_flexible<'a>(flexible: &[&'a TaskRecord]) -> Vec<&'a TaskRecord> {
    let mut ordered = flexible.to_vec();
    ordered.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| a.duration_minutes.cmp(&b.duration_minutes))
    });
    ordered
}

fn build_explanation(
    entries: &[PlanEntry],
    skipped: &[SkippedTask],
    conflicts: &[ScheduleConflict],
    placed_minutes: i64,
    budget_minutes: i64,
) -> String {
    let mut parts = vec![format!(
        "Scheduled {} task(s) using {} of {} available minutes.",
        entries.len(),
        placed_minutes,
        budget_minutes
    )];

    let over_budget = skipped
        .iter()
        .filter(|skip| skip.reason == SkipReason::BudgetExceeded)
        .count();
    let no_slot = skipped.len() - over_budget;
    if over_budget > 0 {
        parts.push(format!("Skipped {} task(s) over the time budget.", over_budget));
    }
    if no_slot > 0 {
        parts.push(format!("Skipped {} task(s) with no free slot.", no_slot));
    }

    if !conflicts.is_empty() {
        parts.push(format!(
            "{} fixed-time conflict(s) need attention.",
            conflicts.len()
        ));
    }

    parts.join(" ")
}
