//! User Model (table `usuarios`)

use super::{Validate, require_text};
use crate::error::StoreResult;
use crate::serde_helpers::present_or_null;
use serde::{Deserialize, Serialize};

/// User entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub full_name: String,
    /// Unique in the store
    pub email: String,
    #[serde(rename = "telefono", default)]
    pub phone: Option<String>,
}

/// Create user payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCreate {
    #[serde(rename = "nombre")]
    pub full_name: String,
    pub email: String,
    #[serde(rename = "telefono", default)]
    pub phone: Option<String>,
}

impl UserCreate {
    pub fn new(full_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            email: email.into(),
            phone: None,
        }
    }

    /// Blank phone numbers are stored as null
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = normalize_phone(phone.into());
        self
    }
}

/// Update user payload
///
/// `phone: Some(None)` clears the stored number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(rename = "nombre", skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(
        rename = "telefono",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_or_null"
    )]
    pub phone: Option<Option<String>>,
}

impl UserUpdate {
    pub fn set_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(normalize_phone(phone.into()));
        self
    }
}

fn normalize_phone(phone: String) -> Option<String> {
    let trimmed = phone.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl Validate for UserCreate {
    fn validate(&self) -> StoreResult<()> {
        require_text(&self.full_name, "Name")?;
        require_text(&self.email, "Email")
    }
}

impl Validate for UserUpdate {
    fn validate(&self) -> StoreResult<()> {
        if let Some(name) = &self.full_name {
            require_text(name, "Name")?;
        }
        if let Some(email) = &self.email {
            require_text(email, "Email")?;
        }
        Ok(())
    }
}
