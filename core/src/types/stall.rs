use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StallStatus {
    #[default]
    #[serde(alias = "empty")]
    Available,
    Occupied,
    Maintenance,
    Reserved,
}

impl StallStatus {
    /// Badge color shown next to the stall on the dashboard.
    pub fn color(&self) -> &'static str {
        match self {
            StallStatus::Available => "#4CAF50",
            StallStatus::Occupied => "#2196F3",
            StallStatus::Maintenance => "#FF9800",
            StallStatus::Reserved => "#9C27B0",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StallType {
    #[default]
    Individual,
    Paddock,
    Quarantine,
    Breeding,
}

/// Stall dimensions in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub length: f64,
    pub width: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl Dimensions {
    pub fn area(&self) -> f64 {
        self.length * self.width
    }
}

/// Denormalized occupant embedded in a stall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StallOccupant {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stall {
    pub id: Uuid,
    pub haras_id: Uuid,
    pub number: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_capacity")]
    pub capacity: u32,
    #[serde(default)]
    pub status: StallStatus,
    #[serde(rename = "type", default)]
    pub stall_type: StallType,
    #[serde(default)]
    pub dimensions: Option<Dimensions>,
    #[serde(default)]
    pub horse: Option<StallOccupant>,
}

fn default_capacity() -> u32 {
    1
}

impl Stall {
    /// Label for lists: the stall name when set, otherwise "Baia <number>".
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!("Baia {}", self.number),
        }
    }

    pub fn occupant_id(&self) -> Option<Uuid> {
        self.horse.as_ref().map(|h| h.id)
    }
}

/// Dashboard counters from `GET /stalls/haras/:harasId/stats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StallStats {
    pub total: u32,
    pub available: u32,
    pub occupied: u32,
    pub maintenance: u32,
    pub reserved: u32,
    /// Percentage of stalls currently occupied, 0 to 100.
    pub occupancy_rate: f64,
}

/// Body of `PUT /stalls/:id/status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StallStatusUpdate {
    pub status: StallStatus,
}
