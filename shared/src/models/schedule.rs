//! Schedule Model (table `horarios`)

use super::Validate;
use crate::error::{StoreError, StoreResult};
use crate::format;
use crate::serde_helpers::{option_time_of_day, parse_time, time_of_day};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Schedule entity - stored with second precision, shown as `HH:MM`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: i64,
    #[serde(rename = "hora_ingreso", with = "time_of_day")]
    pub entry_time: NaiveTime,
    #[serde(rename = "hora_salida", with = "time_of_day")]
    pub exit_time: NaiveTime,
}

impl Schedule {
    /// `HH:MM - HH:MM`
    pub fn label(&self) -> String {
        format::time_range(&self.entry_time, &self.exit_time)
    }
}

/// Create schedule payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleCreate {
    #[serde(rename = "hora_ingreso", with = "time_of_day")]
    pub entry_time: NaiveTime,
    #[serde(rename = "hora_salida", with = "time_of_day")]
    pub exit_time: NaiveTime,
}

impl ScheduleCreate {
    pub fn new(entry_time: NaiveTime, exit_time: NaiveTime) -> Self {
        Self {
            entry_time,
            exit_time,
        }
    }

    /// Build from form input (`HH:MM` or `HH:MM:SS`)
    pub fn parse(entry: &str, exit: &str) -> StoreResult<Self> {
        Ok(Self::new(parse_field(entry)?, parse_field(exit)?))
    }
}

/// Update schedule payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleUpdate {
    #[serde(
        rename = "hora_ingreso",
        default,
        with = "option_time_of_day",
        skip_serializing_if = "Option::is_none"
    )]
    pub entry_time: Option<NaiveTime>,
    #[serde(
        rename = "hora_salida",
        default,
        with = "option_time_of_day",
        skip_serializing_if = "Option::is_none"
    )]
    pub exit_time: Option<NaiveTime>,
}

impl ScheduleUpdate {
    /// Build from edit form input; both times are required
    pub fn parse(entry: &str, exit: &str) -> StoreResult<Self> {
        Ok(Self {
            entry_time: Some(parse_field(entry)?),
            exit_time: Some(parse_field(exit)?),
        })
    }
}

fn parse_field(raw: &str) -> StoreResult<NaiveTime> {
    if raw.trim().is_empty() {
        return Err(StoreError::validation("Entry and exit times are required"));
    }
    parse_time(raw).ok_or_else(|| StoreError::validation(format!("Invalid time: {raw}")))
}

// Both fields are typed times, so a constructed draft is always complete.
impl Validate for ScheduleCreate {
    fn validate(&self) -> StoreResult<()> {
        Ok(())
    }
}

impl Validate for ScheduleUpdate {
    fn validate(&self) -> StoreResult<()> {
        Ok(())
    }
}
