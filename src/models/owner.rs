use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Preferred time-of-day window for flexible tasks. Unset preference is
/// modeled as `None` on the owner record, not as an extra variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowPreference {
    Morning,
    Afternoon,
    Evening,
}

impl FromStr for WindowPreference {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "morning" => Ok(WindowPreference::Morning),
            "afternoon" => Ok(WindowPreference::Afternoon),
            "evening" => Ok(WindowPreference::Evening),
            _ => Err(AppError::validation(format!(
                "invalid window preference: {}",
                s
            ))),
        }
    }
}

impl fmt::Display for WindowPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowPreference::Morning => write!(f, "morning"),
            WindowPreference::Afternoon => write!(f, "afternoon"),
            WindowPreference::Evening => write!(f, "evening"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OwnerRecord {
    pub id: String,
    pub name: String,
    pub contact_info: Option<String>,
    /// Total minutes the owner can spend on pet care in one day.
    pub available_time_minutes: i64,
    pub preferred_window: Option<WindowPreference>,
    /// Ids of this owner's pets, in insertion order.
    pub pet_ids: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OwnerCreateInput {
    pub name: String,
    #[serde(default)]
    pub contact_info: Option<String>,
    #[serde(default)]
    pub available_time_minutes: Option<i64>,
    #[serde(default)]
    pub preferred_window: Option<WindowPreference>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OwnerUpdateInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub contact_info: Option<Option<String>>,
    #[serde(default)]
    pub available_time_minutes: Option<i64>,
    #[serde(default)]
    pub preferred_window: Option<Option<WindowPreference>>,
}
