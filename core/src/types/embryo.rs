use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::gestation::{calculate_gestation_info, GestationInfo};

/// Lifecycle of a frozen embryo. Transitions are decided by the backend:
/// `frozen -> activated -> transferred | failed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbryoStatus {
    #[default]
    Frozen,
    Activated,
    Transferred,
    Failed,
}

impl EmbryoStatus {
    pub fn can_activate(&self) -> bool {
        matches!(self, EmbryoStatus::Frozen)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, EmbryoStatus::Transferred | EmbryoStatus::Failed)
    }

    pub fn color(&self) -> &'static str {
        match self {
            EmbryoStatus::Frozen => "#03A9F4",
            EmbryoStatus::Activated => "#4CAF50",
            EmbryoStatus::Transferred => "#8BC34A",
            EmbryoStatus::Failed => "#F44336",
        }
    }
}

/// Sire or dam of an embryo. `id` is set when the parent is registered on
/// the farm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration: Option<String>,
}

/// Recipient mare (receptora) carrying an activated embryo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Embryo {
    pub id: Uuid,
    pub haras_id: Uuid,
    pub code: String,
    pub father: Parent,
    pub mother: Parent,
    pub creation_date: NaiveDate,
    #[serde(default)]
    pub freezing_date: Option<NaiveDate>,
    pub veterinarian: String,
    pub clinic: String,
    pub technique: String,
    #[serde(default)]
    pub status: EmbryoStatus,
    #[serde(default)]
    pub recipient: Option<Recipient>,
    #[serde(default)]
    pub activation_date: Option<NaiveDate>,
    #[serde(default)]
    pub days_pregnant: Option<i64>,
    #[serde(default)]
    pub expected_birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Embryo {
    /// Gestation progress for an activated embryo, `None` before activation.
    /// A `daysPregnant` recorded by the backend takes precedence over the
    /// elapsed-time count.
    pub fn gestation(&self, now: DateTime<Utc>) -> Option<GestationInfo> {
        let activation = self.activation_date?;
        Some(calculate_gestation_info(activation, self.days_pregnant, now))
    }
}

/// Payload for `POST /embryos`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEmbryo {
    pub haras_id: Uuid,
    pub code: String,
    pub father: Parent,
    pub mother: Parent,
    pub creation_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freezing_date: Option<NaiveDate>,
    pub veterinarian: String,
    pub clinic: String,
    pub technique: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Payload for `POST /embryos/:id/activate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbryoActivation {
    pub recipient_id: Uuid,
    pub recipient_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_registration: Option<String>,
    pub activation_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_pregnant: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
