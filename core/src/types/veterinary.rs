use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MedicineType {
    Antibiotic,
    AntiInflammatory,
    Vaccine,
    Vermifuge,
    Vitamin,
    Anesthetic,
    Other,
}

/// Catalog entry for a medicine, shared across farms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medicine {
    pub id: Uuid,
    pub name: String,
    pub active_ingredient: String,
    #[serde(rename = "type")]
    pub medicine_type: MedicineType,
    pub dosage_form: String,
    #[serde(default)]
    pub requires_prescription: bool,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMedicine {
    pub name: String,
    pub active_ingredient: String,
    #[serde(rename = "type")]
    pub medicine_type: MedicineType,
    pub dosage_form: String,
    #[serde(default)]
    pub requires_prescription: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicineUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_ingredient: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub medicine_type: Option<MedicineType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dosage_form: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires_prescription: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A stock lot of one medicine held by a farm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VeterinaryStock {
    pub id: Uuid,
    pub haras_id: Uuid,
    pub medicine_id: Uuid,
    #[serde(default)]
    pub medicine: Option<Medicine>,
    pub batch_number: String,
    pub current_quantity: f64,
    pub minimum_quantity: f64,
    #[serde(default)]
    pub maximum_quantity: Option<f64>,
    pub unit: String,
    pub unit_cost: f64,
    pub expiration_date: NaiveDate,
    #[serde(default)]
    pub storage_location: Option<String>,
}

impl VeterinaryStock {
    pub fn total_value(&self) -> f64 {
        self.current_quantity * self.unit_cost
    }

    /// Display name: the embedded medicine name, or the batch number when the
    /// backend did not embed the catalog entry.
    pub fn display_name(&self) -> &str {
        self.medicine
            .as_ref()
            .map(|m| m.name.as_str())
            .unwrap_or(self.batch_number.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStock {
    pub haras_id: Uuid,
    pub medicine_id: Uuid,
    pub batch_number: String,
    pub current_quantity: f64,
    pub minimum_quantity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_quantity: Option<f64>,
    pub unit: String,
    pub unit_cost: f64,
    pub expiration_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_location: Option<String>,
}

/// Quantities move through `/movements`; this only touches lot metadata
/// and thresholds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_quantity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_quantity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_location: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    /// Purchase or donation received.
    Entry,
    /// Administered to a horse or otherwise consumed.
    Exit,
    /// Inventory count correction; `quantity` is the new absolute level.
    Adjustment,
    /// Discarded: spoiled, broken, expired.
    Loss,
}

/// Payload for `POST /veterinary/stocks/:id/movements`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStockMovement {
    pub kind: MovementKind,
    pub quantity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horse_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
    pub id: Uuid,
    pub stock_id: Uuid,
    pub kind: MovementKind,
    pub quantity: f64,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub horse_id: Option<Uuid>,
    pub performed_at: DateTime<Utc>,
    /// Lot quantity after the movement was applied.
    pub balance_after: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AlertKind {
    LowStock,
    ExpiringSoon,
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AlertSeverity {
    pub fn color(&self) -> &'static str {
        match self {
            AlertSeverity::Low => "#8BC34A",
            AlertSeverity::Medium => "#FFC107",
            AlertSeverity::High => "#FF9800",
            AlertSeverity::Critical => "#F44336",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAlert {
    pub stock_id: Uuid,
    pub medicine_name: String,
    pub kind: AlertKind,
    pub severity: AlertSeverity,
    pub message: String,
}

/// Stock-level classification shown as a colored chip on each lot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    Normal,
    Low,
    OutOfStock,
    Expiring,
    Expired,
}

impl StockStatus {
    pub fn color(&self) -> &'static str {
        match self {
            StockStatus::Normal => "#4CAF50",
            StockStatus::Low => "#FFC107",
            StockStatus::OutOfStock => "#F44336",
            StockStatus::Expiring => "#FF9800",
            StockStatus::Expired => "#9E9E9E",
        }
    }
}

/// Spend summary from `GET /veterinary/haras/:harasId/costs`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CostSummary {
    /// Value of the stock currently on hand.
    pub total_value: f64,
    pub lot_count: u32,
    pub by_medicine_type: BTreeMap<MedicineType, f64>,
    /// Value of entry movements in the current month.
    pub purchases_this_month: f64,
    /// Value of exit and loss movements in the current month.
    pub consumption_this_month: f64,
}
