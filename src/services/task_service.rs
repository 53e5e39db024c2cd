use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::plan::DayPlan;
use crate::models::task::{
    Frequency, Priority, TaskCreateInput, TaskFilter, TaskRecord, TaskStatus, TaskUpdateInput,
};
use crate::services::recurrence_service::OccurrenceEngine;
use crate::services::schedule_utils::{self, DAY_END_MINUTE};
use crate::store::CareStore;

#[derive(Clone)]
pub struct TaskService {
    store: CareStore,
}

impl TaskService {
    pub fn new(store: CareStore) -> Self {
        Self { store }
    }

    pub fn create_task(&self, pet_id: &str, input: TaskCreateInput) -> AppResult<TaskRecord> {
        let record = build_record_from_create(pet_id, input)?;

        self.store.with_state_mut(|state| {
            let pet = state.pet_mut(pet_id)?;
            pet.task_ids.push(record.id.clone());
            pet.updated_at = record.created_at.clone();
            state.tasks.insert(record.id.clone(), record.clone());
            Ok(())
        })?;

        info!(target: "app::tasks", task_id = %record.id, pet_id, "task created");
        Ok(record)
    }

    pub fn get_task(&self, id: &str) -> AppResult<TaskRecord> {
        let record = self.store.with_state(|state| Ok(state.task(id)?.clone()))?;
        debug!(target: "app::tasks", task_id = %record.id, "task fetched");
        Ok(record)
    }

    /// Tasks in insertion order across pets, optionally narrowed by pet
    /// and/or status.
    pub fn list_tasks(&self, filter: &TaskFilter) -> AppResult<Vec<TaskRecord>> {
        let tasks = self.store.with_state(|state| {
            let mut tasks = Vec::new();
            if let Some(pet_id) = &filter.pet_id {
                let pet = state.pet(pet_id)?;
                for task_id in &pet.task_ids {
                    tasks.push(state.task(task_id)?.clone());
                }
            } else {
                let mut owners: Vec<_> = state.owners.values().collect();
                owners.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
                for owner in owners {
                    for pet_id in &owner.pet_ids {
                        let pet = state.pet(pet_id)?;
                        for task_id in &pet.task_ids {
                            tasks.push(state.task(task_id)?.clone());
                        }
                    }
                }
            }

            if let Some(status) = filter.status {
                tasks.retain(|task| task.status == status);
            }

            Ok(tasks)
        })?;

        debug!(target: "app::tasks", count = tasks.len(), "tasks listed");
        Ok(tasks)
    }

    pub fn update_task(&self, id: &str, update: TaskUpdateInput) -> AppResult<TaskRecord> {
        let updated = self.store.with_state_mut(|state| {
            let mut record = state.task(id)?.clone();
            apply_update(&mut record, update)?;
            record.updated_at = Utc::now().to_rfc3339();
            state.tasks.insert(record.id.clone(), record.clone());
            Ok(record)
        })?;

        info!(target: "app::tasks", task_id = %updated.id, "task updated");
        Ok(updated)
    }

    /// Reassign a task to another pet. Unlink and relink happen in one store
    /// mutation, so the task is never in zero or two pets.
    pub fn move_task(&self, id: &str, to_pet_id: &str) -> AppResult<TaskRecord> {
        let moved = self.store.with_state_mut(|state| {
            let record = state.task(id)?.clone();
            if record.pet_id == to_pet_id {
                return Ok(record);
            }

            state.pet(to_pet_id)?;
            let now = Utc::now().to_rfc3339();

            let from_pet = state.pet_mut(&record.pet_id)?;
            from_pet.task_ids.retain(|task_id| task_id != id);
            from_pet.updated_at = now.clone();

            let to_pet = state.pet_mut(to_pet_id)?;
            to_pet.task_ids.push(id.to_string());
            to_pet.updated_at = now.clone();

            let task = state.task_mut(id)?;
            task.pet_id = to_pet_id.to_string();
            task.updated_at = now;
            Ok(task.clone())
        })?;

        info!(target: "app::tasks", task_id = %id, to_pet_id, "task moved");
        Ok(moved)
    }

    pub fn delete_task(&self, id: &str) -> AppResult<()> {
        self.store.with_state_mut(|state| {
            let record = state.task(id)?.clone();
            let pet = state.pet_mut(&record.pet_id)?;
            pet.task_ids.retain(|task_id| task_id != id);
            state.tasks.remove(id);
            Ok(())
        })?;

        info!(target: "app::tasks", task_id = %id, "task deleted");
        Ok(())
    }

    /// Apply one step of the status state machine. Terminal states never
    /// reopen; recurrence creates fresh tasks instead.
    pub fn change_status(&self, id: &str, next: TaskStatus) -> AppResult<TaskRecord> {
        let updated = self.store.with_state_mut(|state| {
            let task = state.task_mut(id)?;
            if !task.status.can_transition_to(next) {
                return Err(AppError::conflict(format!(
                    "cannot change task status from {} to {}",
                    task.status, next
                )));
            }
            task.status = next;
            task.updated_at = Utc::now().to_rfc3339();
            Ok(task.clone())
        })?;

        info!(target: "app::tasks", task_id = %id, status = %updated.status, "task status changed");
        Ok(updated)
    }

    /// Mark a task completed. Daily and weekly tasks additionally spawn their
    /// next occurrence on the same pet; the completed original is retained.
    pub fn complete_task(&self, id: &str) -> AppResult<(TaskRecord, Option<TaskRecord>)> {
        let completed = self.change_status(id, TaskStatus::Completed)?;

        let today = Utc::now().date_naive();
        let now = Utc::now().to_rfc3339();
        let next = match OccurrenceEngine::next_occurrence(&completed, today, &now) {
            Some(next) => next,
            None => return Ok((completed, None)),
        };

        self.store.with_state_mut(|state| {
            let pet = state.pet_mut(&next.pet_id)?;
            pet.task_ids.push(next.id.clone());
            pet.updated_at = now.clone();
            state.tasks.insert(next.id.clone(), next.clone());
            Ok(())
        })?;

        info!(
            target: "app::tasks",
            task_id = %id,
            next_task_id = %next.id,
            "recurring task completed, next occurrence created"
        );
        Ok((completed, Some(next)))
    }

    /// Commit a generated plan: every planned pending task gets the
    /// `scheduled` projection label. Optional; plans are valid without it.
    pub fn apply_plan(&self, plan: &DayPlan) -> AppResult<usize> {
        let committed = self.store.with_state_mut(|state| {
            let now = Utc::now().to_rfc3339();
            let mut committed = 0;
            for entry in &plan.entries {
                if let Some(task) = state.tasks.get_mut(&entry.task_id) {
                    if task.status == TaskStatus::Pending {
                        task.status = TaskStatus::Scheduled;
                        task.updated_at = now.clone();
                        committed += 1;
                    }
                }
            }
            Ok(committed)
        })?;

        info!(target: "app::tasks", committed, "plan applied to task statuses");
        Ok(committed)
    }

    /// Inverse of [`apply_plan`]: every `scheduled` task of the owner goes
    /// back to `pending`. Completed and skipped tasks are untouched.
    pub fn clear_plan(&self, owner_id: &str) -> AppResult<usize> {
        let cleared = self.store.with_state_mut(|state| {
            let now = Utc::now().to_rfc3339();
            let task_ids: Vec<String> = state
                .tasks_for_owner(owner_id)?
                .into_iter()
                .filter(|task| task.status == TaskStatus::Scheduled)
                .map(|task| task.id)
                .collect();
            for task_id in &task_ids {
                let task = state.task_mut(task_id)?;
                task.status = TaskStatus::Pending;
                task.updated_at = now.clone();
            }
            Ok(task_ids.len())
        })?;

        info!(target: "app::tasks", owner_id, cleared, "plan cleared");
        Ok(cleared)
    }
}

fn build_record_from_create(pet_id: &str, mut input: TaskCreateInput) -> AppResult<TaskRecord> {
    let description = normalize_description(&input.description)?;
    let duration_minutes = validate_duration(input.duration_minutes)?;
    let priority = input.priority.unwrap_or(Priority::Medium);
    let frequency = input.frequency.unwrap_or(Frequency::Once);
    let time = normalize_time(input.time.take())?;
    ensure_within_day(time.as_deref(), duration_minutes)?;

    let now = Utc::now().to_rfc3339();
    Ok(TaskRecord {
        id: Uuid::new_v4().to_string(),
        pet_id: pet_id.to_string(),
        description,
        duration_minutes,
        priority,
        status: TaskStatus::Pending,
        frequency,
        time,
        due_date: input.due_date,
        created_at: now.clone(),
        updated_at: now,
    })
}

fn apply_update(record: &mut TaskRecord, update: TaskUpdateInput) -> AppResult<()> {
    if let Some(description) = update.description {
        record.description = normalize_description(&description)?;
    }

    if let Some(duration_minutes) = update.duration_minutes {
        record.duration_minutes = validate_duration(duration_minutes)?;
    }

    if let Some(priority) = update.priority {
        record.priority = priority;
    }

    if let Some(frequency) = update.frequency {
        record.frequency = frequency;
    }

    if let Some(time) = update.time {
        record.time = normalize_time(time)?;
    }

    if let Some(due_date) = update.due_date {
        record.due_date = due_date;
    }

    ensure_within_day(record.time.as_deref(), record.duration_minutes)?;

    Ok(())
}

fn normalize_description(description: &str) -> AppResult<String> {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("task description cannot be empty"));
    }
    if trimmed.chars().count() > 160 {
        return Err(AppError::validation(
            "task description must be 160 characters or fewer",
        ));
    }
    Ok(trimmed.to_string())
}

fn validate_duration(duration_minutes: i64) -> AppResult<i64> {
    if duration_minutes <= 0 {
        return Err(AppError::validation("task duration must be positive"));
    }
    if duration_minutes > DAY_END_MINUTE {
        return Err(AppError::validation("task duration cannot exceed one day"));
    }
    Ok(duration_minutes)
}

fn normalize_time(time: Option<String>) -> AppResult<Option<String>> {
    match time {
        Some(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            schedule_utils::parse_clock(trimmed)?;
            Ok(Some(trimmed.to_string()))
        }
        None => Ok(None),
    }
}

/// Fixed tasks must finish by midnight; cross-midnight intervals are outside
/// the planning domain and rejected here rather than mishandled later.
fn ensure_within_day(time: Option<&str>, duration_minutes: i64) -> AppResult<()> {
    if let Some(raw) = time {
        let start = schedule_utils::parse_clock(raw)?;
        if start + duration_minutes > DAY_END_MINUTE {
            return Err(AppError::validation(format!(
                "a task starting at {} for {} minutes would run past midnight",
                raw, duration_minutes
            )));
        }
    }
    Ok(())
}
