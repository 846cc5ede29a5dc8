//! Assignment Model (table `usuarios_cargos`)
//!
//! Links one user to one job title, optionally with a schedule, from an
//! effective date on. References are enforced by the store's foreign keys.

use super::{Validate, require_id};
use crate::error::StoreResult;
use crate::serde_helpers::present_or_null;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Assignment entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: i64,
    #[serde(rename = "id_usuario")]
    pub user_id: i64,
    #[serde(rename = "id_cargo")]
    pub job_title_id: i64,
    #[serde(rename = "id_horario", default)]
    pub schedule_id: Option<i64>,
    #[serde(rename = "fecha_asignacion")]
    pub effective_date: NaiveDate,
}

/// Create assignment payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentCreate {
    #[serde(rename = "id_usuario")]
    pub user_id: i64,
    #[serde(rename = "id_cargo")]
    pub job_title_id: i64,
    #[serde(rename = "id_horario", default)]
    pub schedule_id: Option<i64>,
    #[serde(rename = "fecha_asignacion")]
    pub effective_date: NaiveDate,
}

impl AssignmentCreate {
    pub fn new(user_id: i64, job_title_id: i64, effective_date: NaiveDate) -> Self {
        Self {
            user_id,
            job_title_id,
            schedule_id: None,
            effective_date,
        }
    }

    pub fn with_schedule(mut self, schedule_id: i64) -> Self {
        self.schedule_id = Some(schedule_id);
        self
    }
}

/// Update assignment payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentUpdate {
    #[serde(rename = "id_usuario", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(rename = "id_cargo", skip_serializing_if = "Option::is_none")]
    pub job_title_id: Option<i64>,
    /// `Some(None)` detaches the schedule
    #[serde(
        rename = "id_horario",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_or_null"
    )]
    pub schedule_id: Option<Option<i64>>,
    #[serde(rename = "fecha_asignacion", skip_serializing_if = "Option::is_none")]
    pub effective_date: Option<NaiveDate>,
}

impl Validate for AssignmentCreate {
    fn validate(&self) -> StoreResult<()> {
        require_id(self.user_id, "User")?;
        require_id(self.job_title_id, "Job title")?;
        if let Some(schedule_id) = self.schedule_id {
            require_id(schedule_id, "Schedule")?;
        }
        Ok(())
    }
}

impl Validate for AssignmentUpdate {
    fn validate(&self) -> StoreResult<()> {
        if let Some(user_id) = self.user_id {
            require_id(user_id, "User")?;
        }
        if let Some(job_title_id) = self.job_title_id {
            require_id(job_title_id, "Job title")?;
        }
        if let Some(Some(schedule_id)) = self.schedule_id {
            require_id(schedule_id, "Schedule")?;
        }
        Ok(())
    }
}
