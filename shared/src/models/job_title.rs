//! Job Title Model (table `cargos`)

use super::{Validate, require_text};
use crate::error::{StoreError, StoreResult};
use crate::serde_helpers::decimal_or_zero;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Job title entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobTitle {
    pub id: i64,
    /// Label shown in lists and used as the report filter
    #[serde(rename = "cargo")]
    pub name: String,
    #[serde(
        rename = "sueldo",
        default,
        serialize_with = "rust_decimal::serde::float::serialize",
        deserialize_with = "decimal_or_zero"
    )]
    pub base_salary: Decimal,
}

/// Create job title payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobTitleCreate {
    #[serde(rename = "cargo")]
    pub name: String,
    /// Defaults to zero when omitted
    #[serde(rename = "sueldo", default, with = "rust_decimal::serde::float")]
    pub base_salary: Decimal,
}

impl JobTitleCreate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_salary: Decimal::ZERO,
        }
    }

    pub fn with_base_salary(mut self, amount: Decimal) -> Self {
        self.base_salary = amount;
        self
    }
}

/// Update job title payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobTitleUpdate {
    #[serde(rename = "cargo", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        rename = "sueldo",
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub base_salary: Option<Decimal>,
}

fn check_salary(amount: &Decimal) -> StoreResult<()> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(StoreError::validation("Base salary cannot be negative"));
    }
    Ok(())
}

impl Validate for JobTitleCreate {
    fn validate(&self) -> StoreResult<()> {
        require_text(&self.name, "Job title")?;
        check_salary(&self.base_salary)
    }
}

impl Validate for JobTitleUpdate {
    fn validate(&self) -> StoreResult<()> {
        if let Some(name) = &self.name {
            require_text(name, "Job title")?;
        }
        if let Some(amount) = &self.base_salary {
            check_salary(amount)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_store_row() {
        let row: JobTitle =
            serde_json::from_value(json!({"id": 7, "cargo": "Developer", "sueldo": 3000.0}))
                .unwrap();
        assert_eq!(row.id, 7);
        assert_eq!(row.name, "Developer");
        assert_eq!(row.base_salary, Decimal::new(300000, 2));

        let row: JobTitle =
            serde_json::from_value(json!({"id": 8, "cargo": "Janitor", "sueldo": null})).unwrap();
        assert!(row.base_salary.is_zero());
    }

    #[test]
    fn test_create_defaults_salary() {
        let draft = JobTitleCreate::new("Teacher");
        assert!(draft.base_salary.is_zero());
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["cargo"], "Teacher");
        assert_eq!(json["sueldo"], 0.0);
    }

    #[test]
    fn test_update_skips_absent_fields() {
        let patch = JobTitleUpdate {
            base_salary: Some(Decimal::new(3500, 0)),
            ..Default::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert!(json.get("cargo").is_none());
        assert_eq!(json["sueldo"], 3500.0);

        let parsed: JobTitleUpdate = serde_json::from_value(json!({"sueldo": 1250.5})).unwrap();
        assert_eq!(parsed.base_salary, Some(Decimal::new(12505, 1)));
        let parsed: JobTitleUpdate = serde_json::from_value(json!({"cargo": "Nurse"})).unwrap();
        assert!(parsed.base_salary.is_none());
    }

    #[test]
    fn test_salary_is_a_json_number() {
        let draft = JobTitleCreate::new("Developer").with_base_salary(Decimal::new(300050, 2));
        let json = serde_json::to_value(&draft).unwrap();
        assert!(json["sueldo"].is_number());
        assert_eq!(json["sueldo"], 3000.5);

        let row = JobTitle {
            id: 1,
            name: "Developer".into(),
            base_salary: Decimal::new(3000, 0),
        };
        assert_eq!(serde_json::to_value(&row).unwrap()["sueldo"], 3000.0);
    }

    #[test]
    fn test_validation() {
        assert!(JobTitleCreate::new("Developer").validate().is_ok());
        let err = JobTitleCreate::new("   ").validate().unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.message, "Job title is required");

        let negative = JobTitleCreate::new("Intern").with_base_salary(Decimal::new(-1, 0));
        assert!(negative.validate().is_err());

        let blank_patch = JobTitleUpdate {
            name: Some(String::new()),
            ..Default::default()
        };
        assert!(blank_patch.validate().is_err());
        assert!(JobTitleUpdate::default().validate().is_ok());
    }
}
