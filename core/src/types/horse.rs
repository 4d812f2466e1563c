use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::age::age_in_years;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Gelding,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorseStatus {
    #[default]
    Active,
    Inactive,
    Sold,
    Deceased,
}

impl HorseStatus {
    /// Sold and deceased horses stay in the registry but can no longer be
    /// housed or bred.
    pub fn is_on_farm(&self) -> bool {
        matches!(self, HorseStatus::Active | HorseStatus::Inactive)
    }
}

/// Breeding classification: garanhão, doadora, receptora.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreedingRole {
    Stallion,
    Donor,
    Recipient,
}

/// Denormalized sire or dam reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lineage {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offspring {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration: Option<String>,
}

/// A horse as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Horse {
    pub id: Uuid,
    pub haras_id: Uuid,
    pub name: String,
    pub breed: String,
    pub gender: Gender,
    pub birth_date: NaiveDate,
    pub color: String,
    #[serde(default)]
    pub status: HorseStatus,
    #[serde(default)]
    pub stall_id: Option<Uuid>,
    #[serde(default)]
    pub breeding_role: Option<BreedingRole>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub registration: Option<String>,
    #[serde(default)]
    pub microchip: Option<String>,
    #[serde(default)]
    pub father: Option<Lineage>,
    #[serde(default)]
    pub mother: Option<Lineage>,
    #[serde(default)]
    pub offspring: Vec<Offspring>,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default)]
    pub acquisition_date: Option<NaiveDate>,
    #[serde(default)]
    pub acquisition_value: Option<f64>,
    #[serde(default)]
    pub current_value: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub photos: Vec<String>,
}

impl Horse {
    pub fn age_on(&self, today: NaiveDate) -> i32 {
        age_in_years(self.birth_date, today)
    }

    pub fn is_housed(&self) -> bool {
        self.stall_id.is_some()
    }
}

/// Payload for `POST /horses`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHorse {
    pub haras_id: Uuid,
    pub name: String,
    pub breed: String,
    pub gender: Gender,
    pub birth_date: NaiveDate,
    pub color: String,
    #[serde(default)]
    pub status: HorseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breeding_role: Option<BreedingRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub microchip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub father: Option<Lineage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mother: Option<Lineage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acquisition_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acquisition_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Payload for `PUT /horses/:id`. Only the fields present in the JSON are
/// applied; stall placement goes through the assign/remove endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HorseUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<HorseStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breeding_role: Option<BreedingRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub microchip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub achievements: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenderCount {
    #[serde(default)]
    pub male: u32,
    #[serde(default)]
    pub female: u32,
    #[serde(default)]
    pub gelding: u32,
}

/// Dashboard counters from `GET /horses/haras/:harasId/stats`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HorseStats {
    pub total: u32,
    pub active: u32,
    pub inactive: u32,
    pub sold: u32,
    pub deceased: u32,
    pub by_gender: GenderCount,
    pub with_stall: u32,
    pub without_stall: u32,
}

/// Body of `PUT /horses/:id/assign-stall`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StallAssignment {
    pub stall_id: Uuid,
}
