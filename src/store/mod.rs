use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::models::owner::OwnerRecord;
use crate::models::pet::PetRecord;
use crate::models::task::TaskRecord;

/// In-memory arena for one household: owners, pets, and tasks keyed by id,
/// linked by id lists rather than ownership pointers. Durable persistence is
/// the surrounding system's concern; the store is the snapshot the planner
/// reads.
#[derive(Debug, Default)]
pub struct CareState {
    pub owners: HashMap<String, OwnerRecord>,
    pub pets: HashMap<String, PetRecord>,
    pub tasks: HashMap<String, TaskRecord>,
}

impl CareState {
    pub fn owner(&self, id: &str) -> AppResult<&OwnerRecord> {
        self.owners.get(id).ok_or_else(AppError::not_found)
    }

    pub fn owner_mut(&mut self, id: &str) -> AppResult<&mut OwnerRecord> {
        self.owners.get_mut(id).ok_or_else(AppError::not_found)
    }

    pub fn pet(&self, id: &str) -> AppResult<&PetRecord> {
        self.pets.get(id).ok_or_else(AppError::not_found)
    }

    pub fn pet_mut(&mut self, id: &str) -> AppResult<&mut PetRecord> {
        self.pets.get_mut(id).ok_or_else(AppError::not_found)
    }

    pub fn task(&self, id: &str) -> AppResult<&TaskRecord> {
        self.tasks.get(id).ok_or_else(AppError::not_found)
    }

    pub fn task_mut(&mut self, id: &str) -> AppResult<&mut TaskRecord> {
        self.tasks.get_mut(id).ok_or_else(AppError::not_found)
    }

    /// Tasks for one owner, walking pet and task id lists so the result keeps
    /// insertion order across pets.
    pub fn tasks_for_owner(&self, owner_id: &str) -> AppResult<Vec<TaskRecord>> {
        let owner = self.owner(owner_id)?;
        let mut tasks = Vec::new();
        for pet_id in &owner.pet_ids {
            let pet = self.pet(pet_id)?;
            for task_id in &pet.task_ids {
                tasks.push(self.task(task_id)?.clone());
            }
        }
        Ok(tasks)
    }
}

/// Cloneable handle to the shared state. Every multi-record mutation runs
/// inside one `with_state_mut` closure, which is what keeps cross-collection
/// invariants (a task belongs to exactly one pet) atomic for all callers.
#[derive(Clone, Default)]
pub struct CareStore {
    state: Arc<RwLock<CareState>>,
}

impl CareStore {
    pub fn new() -> Self {
        debug!(target: "app::store", "initializing in-memory care store");
        Self::default()
    }

    pub fn with_state<F, T>(&self, callback: F) -> AppResult<T>
    where
        F: FnOnce(&CareState) -> AppResult<T>,
    {
        let state = self.state.read().unwrap();
        callback(&state)
    }

    pub fn with_state_mut<F, T>(&self, callback: F) -> AppResult<T>
    where
        F: FnOnce(&mut CareState) -> AppResult<T>,
    {
        let mut state = self.state.write().unwrap();
        callback(&mut state)
    }
}
