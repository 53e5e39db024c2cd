use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PetRecord {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub species: String,
    pub age: u8,
    /// Ids of this pet's tasks, in insertion order. A task id appears in
    /// exactly one pet's list at a time.
    pub task_ids: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PetCreateInput {
    pub name: String,
    pub species: String,
    #[serde(default)]
    pub age: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PetUpdateInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub species: Option<String>,
    #[serde(default)]
    pub age: Option<u8>,
}
