use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::owner::{OwnerCreateInput, OwnerRecord, OwnerUpdateInput};
use crate::models::pet::{PetCreateInput, PetRecord, PetUpdateInput};
use crate::services::schedule_utils::DAY_END_MINUTE;
use crate::store::CareStore;

const DEFAULT_BUDGET_MINUTES: i64 = 8 * 60;
const MAX_PET_AGE: u8 = 30;

/// Owner and pet management. Pets link to their owner by id and tasks link
/// to their pet by id; every cross-collection change runs in one store
/// mutation so the one-owner-per-pet invariant holds for all readers.
#[derive(Clone)]
pub struct RosterService {
    store: CareStore,
}

impl RosterService {
    pub fn new(store: CareStore) -> Self {
        Self { store }
    }

    pub fn create_owner(&self, input: OwnerCreateInput) -> AppResult<OwnerRecord> {
        let name = normalize_name(&input.name, "owner name")?;
        let available_time_minutes =
            validate_budget(input.available_time_minutes.unwrap_or(DEFAULT_BUDGET_MINUTES))?;

        let now = Utc::now().to_rfc3339();
        let record = OwnerRecord {
            id: Uuid::new_v4().to_string(),
            name,
            contact_info: normalize_optional(input.contact_info),
            available_time_minutes,
            preferred_window: input.preferred_window,
            pet_ids: Vec::new(),
            created_at: now.clone(),
            updated_at: now,
        };

        self.store.with_state_mut(|state| {
            state.owners.insert(record.id.clone(), record.clone());
            Ok(())
        })?;

        info!(target: "app::roster", owner_id = %record.id, "owner created");
        Ok(record)
    }

    pub fn get_owner(&self, id: &str) -> AppResult<OwnerRecord> {
        let record = self.store.with_state(|state| Ok(state.owner(id)?.clone()))?;
        debug!(target: "app::roster", owner_id = %record.id, "owner fetched");
        Ok(record)
    }

    pub fn update_owner(&self, id: &str, update: OwnerUpdateInput) -> AppResult<OwnerRecord> {
        let updated = self.store.with_state_mut(|state| {
            let mut record = state.owner(id)?.clone();

            if let Some(name) = update.name {
                record.name = normalize_name(&name, "owner name")?;
            }
            if let Some(contact_info) = update.contact_info {
                record.contact_info = normalize_optional(contact_info);
            }
            if let Some(available_time_minutes) = update.available_time_minutes {
                record.available_time_minutes = validate_budget(available_time_minutes)?;
            }
            if let Some(preferred_window) = update.preferred_window {
                record.preferred_window = preferred_window;
            }

            record.updated_at = Utc::now().to_rfc3339();
            state.owners.insert(record.id.clone(), record.clone());
            Ok(record)
        })?;

        info!(target: "app::roster", owner_id = %id, "owner updated");
        Ok(updated)
    }

    /// Register a pet under an owner. A second pet with the same name and
    /// species (case-insensitive) under the same owner is rejected.
    pub fn add_pet(&self, owner_id: &str, input: PetCreateInput) -> AppResult<PetRecord> {
        let name = normalize_name(&input.name, "pet name")?;
        let species = normalize_name(&input.species, "pet species")?;
        let age = validate_age(input.age)?;

        let record = self.store.with_state_mut(|state| {
            let owner = state.owner(owner_id)?;
            let duplicate = owner.pet_ids.iter().any(|pet_id| {
                state
                    .pets
                    .get(pet_id)
                    .map(|pet| {
                        pet.name.eq_ignore_ascii_case(&name)
                            && pet.species.eq_ignore_ascii_case(&species)
                    })
                    .unwrap_or(false)
            });
            if duplicate {
                return Err(AppError::conflict(format!(
                    "owner already has a {} named {}",
                    species.to_lowercase(),
                    name
                )));
            }

            let now = Utc::now().to_rfc3339();
            let record = PetRecord {
                id: Uuid::new_v4().to_string(),
                owner_id: owner_id.to_string(),
                name,
                species,
                age,
                task_ids: Vec::new(),
                created_at: now.clone(),
                updated_at: now.clone(),
            };

            let owner = state.owner_mut(owner_id)?;
            owner.pet_ids.push(record.id.clone());
            owner.updated_at = now;
            state.pets.insert(record.id.clone(), record.clone());
            Ok(record)
        })?;

        info!(target: "app::roster", pet_id = %record.id, owner_id, "pet added");
        Ok(record)
    }

    pub fn get_pet(&self, id: &str) -> AppResult<PetRecord> {
        let record = self.store.with_state(|state| Ok(state.pet(id)?.clone()))?;
        debug!(target: "app::roster", pet_id = %record.id, "pet fetched");
        Ok(record)
    }

    pub fn list_pets(&self, owner_id: &str) -> AppResult<Vec<PetRecord>> {
        let pets = self.store.with_state(|state| {
            let owner = state.owner(owner_id)?;
            owner
                .pet_ids
                .iter()
                .map(|pet_id| state.pet(pet_id).cloned())
                .collect::<AppResult<Vec<_>>>()
        })?;

        debug!(target: "app::roster", owner_id, count = pets.len(), "pets listed");
        Ok(pets)
    }

    pub fn update_pet(&self, id: &str, update: PetUpdateInput) -> AppResult<PetRecord> {
        let updated = self.store.with_state_mut(|state| {
            let mut record = state.pet(id)?.clone();

            if let Some(name) = update.name {
                record.name = normalize_name(&name, "pet name")?;
            }
            if let Some(species) = update.species {
                record.species = normalize_name(&species, "pet species")?;
            }
            if let Some(age) = update.age {
                record.age = validate_age(age)?;
            }

            record.updated_at = Utc::now().to_rfc3339();
            state.pets.insert(record.id.clone(), record.clone());
            Ok(record)
        })?;

        info!(target: "app::roster", pet_id = %id, "pet updated");
        Ok(updated)
    }

    /// Remove a pet, its tasks, and the owner link in one mutation.
    pub fn remove_pet(&self, id: &str) -> AppResult<()> {
        self.store.with_state_mut(|state| {
            let record = state.pet(id)?.clone();
            for task_id in &record.task_ids {
                state.tasks.remove(task_id);
            }
            let owner = state.owner_mut(&record.owner_id)?;
            owner.pet_ids.retain(|pet_id| pet_id != id);
            owner.updated_at = Utc::now().to_rfc3339();
            state.pets.remove(id);
            Ok(())
        })?;

        info!(target: "app::roster", pet_id = %id, "pet removed");
        Ok(())
    }
}

fn normalize_name(value: &str, field: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{} cannot be empty", field)));
    }
    if trimmed.chars().count() > 80 {
        return Err(AppError::validation(format!(
            "{} must be 80 characters or fewer",
            field
        )));
    }
    Ok(trimmed.to_string())
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value.and_then(|val| {
        let trimmed = val.trim().to_string();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    })
}

fn validate_budget(minutes: i64) -> AppResult<i64> {
    if minutes < 0 {
        return Err(AppError::validation("available time cannot be negative"));
    }
    if minutes > DAY_END_MINUTE {
        return Err(AppError::validation(
            "available time cannot exceed one day",
        ));
    }
    Ok(minutes)
}

fn validate_age(age: u8) -> AppResult<u8> {
    if age > MAX_PET_AGE {
        return Err(AppError::validation(format!(
            "pet age must be {} or lower",
            MAX_PET_AGE
        )));
    }
    Ok(age)
}
