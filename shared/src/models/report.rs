//! Report rows returned by the store's aggregate procedures

use crate::format;
use crate::serde_helpers::option_time_of_day;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// One row of "users and their schedule, filtered by job title"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    #[serde(alias = "nombre")]
    pub user_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(alias = "hora_ingreso", default, with = "option_time_of_day")]
    pub entry_time: Option<NaiveTime>,
    #[serde(alias = "hora_salida", default, with = "option_time_of_day")]
    pub exit_time: Option<NaiveTime>,
}

impl ReportRow {
    /// `HH:MM` or `N/A`
    pub fn entry_display(&self) -> String {
        format::time_hm(self.entry_time.as_ref())
    }

    /// `HH:MM` or `N/A`
    pub fn exit_display(&self) -> String {
        format::time_hm(self.exit_time.as_ref())
    }
}

/// Untyped result table for the canned queries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportTable {
    /// Header labels (`_` shown as spaces)
    pub columns: Vec<String>,
    /// Cell display strings, one vector per row
    pub rows: Vec<Vec<String>>,
}

impl ReportTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
