//! The `dog` roster entity and the controlled vocabularies for its text fields.
use std::fmt;
use std::str::FromStr;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// A row of the roster. Serialized with camelCase keys and `badgeID`, dates as `YYYY-MM-DD`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "dog")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub breed: String,
    pub supplier: String,
    #[sea_orm(unique)]
    #[serde(rename = "badgeID")]
    pub badge_id: i32,
    pub gender: String,
    pub birth_date: Option<Date>,
    pub date_acquired: Option<Date>,
    pub status: String,
    pub leaving_date: Option<Date>,
    pub leaving_reason: String,
    pub kenneling_characteristics: String,
    pub date_deleted: Option<Date>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_active(&self) -> bool {
        self.date_deleted.is_none()
    }
}

/// Renders a vocabulary as `[a, b, c]`, the form used in rejection messages.
pub fn describe_vocabulary(values: &[&str]) -> String {
    format!("[{}]", values.join(", "))
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DogStatus {
    InTraining,
    InService,
    Retired,
    Left,
}

impl DogStatus {
    pub const ALL: [DogStatus; 4] = [DogStatus::InTraining, DogStatus::InService, DogStatus::Retired, DogStatus::Left];
    pub const NAMES: [&'static str; 4] = ["in training", "in service", "retired", "left"];

    pub fn as_str(self) -> &'static str {
        match self {
            DogStatus::InTraining => "in training",
            DogStatus::InService => "in service",
            DogStatus::Retired => "retired",
            DogStatus::Left => "left",
        }
    }

    pub fn vocabulary() -> String {
        describe_vocabulary(&Self::NAMES)
    }
}

impl FromStr for DogStatus {
    type Err = ModelError;

    /// Case-insensitive; surrounding whitespace is not ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == lower)
            .ok_or_else(|| ModelError::Validation(format!("unknown status '{s}'")))
    }
}

impl fmt::Display for DogStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LeavingReason {
    Transferred,
    RetiredPutDown,
    Kia,
    RetiredReHomed,
    Died,
}

impl LeavingReason {
    pub const ALL: [LeavingReason; 5] = [
        LeavingReason::Transferred,
        LeavingReason::RetiredPutDown,
        LeavingReason::Kia,
        LeavingReason::RetiredReHomed,
        LeavingReason::Died,
    ];
    pub const NAMES: [&'static str; 5] = ["transferred", "retired (put down)", "kia", "retired (re-homed)", "died"];

    pub fn as_str(self) -> &'static str {
        match self {
            LeavingReason::Transferred => "transferred",
            LeavingReason::RetiredPutDown => "retired (put down)",
            LeavingReason::Kia => "kia",
            LeavingReason::RetiredReHomed => "retired (re-homed)",
            LeavingReason::Died => "died",
        }
    }

    pub fn vocabulary() -> String {
        describe_vocabulary(&Self::NAMES)
    }
}

impl FromStr for LeavingReason {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == lower)
            .ok_or_else(|| ModelError::Validation(format!("unknown leaving reason '{s}'")))
    }
}

impl fmt::Display for LeavingReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
