//! Registration data models.

use serde::{Deserialize, Serialize};

use crate::store::{KeyValueStore, keys};

/// Self-described gender.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" => Some(Self::Male),
            "female" => Some(Self::Female),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Male => write!(f, "male"),
            Self::Female => write!(f, "female"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Editable draft behind the first step. Optional fields model "not yet
/// chosen".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub first_name: String,
    pub last_name: String,
    pub gender: Option<Gender>,
    /// ISO code of the selected country.
    pub country: String,
    pub email: String,
    /// Formatted display string from the phone input.
    pub phone: String,
    pub accept_terms: Option<bool>,
}

/// A validated registration, persisted between steps.
///
/// Stored as camelCase JSON under [`keys::REGISTRATION_DATA`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRecord {
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub country: String,
    pub email: String,
    pub phone: String,
    pub accept_terms: bool,
}

/// Contact details read back from storage by the OTP steps. Missing or
/// malformed fields degrade to empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredContact {
    pub email: String,
    pub phone: String,
}

/// Read the persisted registration as a raw JSON object.
///
/// Absent, unreadable, or malformed data yields `None`; failures are logged.
pub async fn load_registration(store: &dyn KeyValueStore) -> Option<serde_json::Value> {
    let raw = match store.get(keys::REGISTRATION_DATA).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::error!(error = %e, "Failed to read stored registration data");
            return None;
        }
    };
    match serde_json::from_str::<serde_json::Value>(&raw) {
        Ok(value) if value.is_object() => Some(value),
        Ok(_) => {
            tracing::error!("Stored registration data is not a JSON object");
            None
        }
        Err(e) => {
            tracing::error!(error = %e, "Error parsing registration data");
            None
        }
    }
}

/// Email and phone from the persisted registration, tolerant of gaps.
pub async fn load_contact(store: &dyn KeyValueStore) -> StoredContact {
    let Some(value) = load_registration(store).await else {
        return StoredContact::default();
    };
    let field = |name: &str| {
        value
            .get(name)
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string()
    };
    StoredContact {
        email: field("email"),
        phone: field("phone"),
    }
}
