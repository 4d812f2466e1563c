//! Data-driven dispatch over every facade operation.
//!
//! # Design
//! Foreign hosts cannot call a hundred typed methods comfortably. An
//! `Operation` names one call and carries its arguments as a tagged JSON
//! object, e.g. `{"op":"assignStall","horseId":"…","stallId":"…"}`. The host
//! passes the same operation to `build` and then to `parse_value` with the
//! response, and gets the typed result back as JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::client::HarasClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{
    EmbryoActivation, HorseUpdate, MedicineUpdate, NewEmbryo, NewHorse, NewMedicine, NewStock,
    NewStockMovement, StallStatus, StockUpdate,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Operation {
    ListHorses { haras_id: Uuid },
    ListAvailableHorses { haras_id: Uuid },
    GetHorse { id: Uuid },
    CreateHorse { horse: NewHorse },
    UpdateHorse { id: Uuid, changes: HorseUpdate },
    DeleteHorse { id: Uuid },
    AssignStall { horse_id: Uuid, stall_id: Uuid },
    RemoveStall { horse_id: Uuid },
    HorseStats { haras_id: Uuid },

    ListStalls { haras_id: Uuid },
    ListAvailableStalls { haras_id: Uuid },
    GetStall { id: Uuid },
    StallStats { haras_id: Uuid },
    SetStallStatus { id: Uuid, status: StallStatus },

    ListEmbryos { haras_id: Uuid },
    GetEmbryo { id: Uuid },
    CreateEmbryo { embryo: NewEmbryo },
    ActivateEmbryo { id: Uuid, activation: EmbryoActivation },

    ListMedicines,
    GetMedicine { id: Uuid },
    CreateMedicine { medicine: NewMedicine },
    UpdateMedicine { id: Uuid, changes: MedicineUpdate },
    DeleteMedicine { id: Uuid },
    ListStocks { haras_id: Uuid },
    GetStock { id: Uuid },
    CreateStock { stock: NewStock },
    UpdateStock { id: Uuid, changes: StockUpdate },
    DeleteStock { id: Uuid },
    RecordMovement { stock_id: Uuid, movement: NewStockMovement },
    ListLowStock { haras_id: Uuid },
    ListAlerts { haras_id: Uuid },
    CostSummary { haras_id: Uuid },

    ListHaras,
    GetHaras { id: Uuid },
    DefaultHaras,
}

impl Operation {
    /// Parse an operation from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, ApiError> {
        serde_json::from_str(json).map_err(|e| ApiError::InvalidArgument(e.to_string()))
    }
}

impl HarasClient {
    /// Build the request for any operation.
    pub fn build(&self, op: &Operation) -> Result<HttpRequest, ApiError> {
        use Operation::*;
        let request = match op {
            ListHorses { haras_id } => self.build_list_horses(*haras_id),
            ListAvailableHorses { haras_id } => self.build_list_available_horses(*haras_id),
            GetHorse { id } => self.build_get_horse(*id),
            CreateHorse { horse } => self.build_create_horse(horse)?,
            UpdateHorse { id, changes } => self.build_update_horse(*id, changes)?,
            DeleteHorse { id } => self.build_delete_horse(*id),
            AssignStall { horse_id, stall_id } => self.build_assign_stall(*horse_id, *stall_id)?,
            RemoveStall { horse_id } => self.build_remove_stall(*horse_id),
            HorseStats { haras_id } => self.build_horse_stats(*haras_id),

            ListStalls { haras_id } => self.build_list_stalls(*haras_id),
            ListAvailableStalls { haras_id } => self.build_list_available_stalls(*haras_id),
            GetStall { id } => self.build_get_stall(*id),
            StallStats { haras_id } => self.build_stall_stats(*haras_id),
            SetStallStatus { id, status } => self.build_set_stall_status(*id, *status)?,

            ListEmbryos { haras_id } => self.build_list_embryos(*haras_id),
            GetEmbryo { id } => self.build_get_embryo(*id),
            CreateEmbryo { embryo } => self.build_create_embryo(embryo)?,
            ActivateEmbryo { id, activation } => self.build_activate_embryo(*id, activation)?,

            ListMedicines => self.build_list_medicines(),
            GetMedicine { id } => self.build_get_medicine(*id),
            CreateMedicine { medicine } => self.build_create_medicine(medicine)?,
            UpdateMedicine { id, changes } => self.build_update_medicine(*id, changes)?,
            DeleteMedicine { id } => self.build_delete_medicine(*id),
            ListStocks { haras_id } => self.build_list_stocks(*haras_id),
            GetStock { id } => self.build_get_stock(*id),
            CreateStock { stock } => self.build_create_stock(stock)?,
            UpdateStock { id, changes } => self.build_update_stock(*id, changes)?,
            DeleteStock { id } => self.build_delete_stock(*id),
            RecordMovement { stock_id, movement } => self.build_record_movement(*stock_id, movement)?,
            ListLowStock { haras_id } => self.build_list_low_stock(*haras_id),
            ListAlerts { haras_id } => self.build_list_alerts(*haras_id),
            CostSummary { haras_id } => self.build_cost_summary(*haras_id),

            ListHaras => self.build_list_haras(),
            GetHaras { id } => self.build_get_haras(*id),
            DefaultHaras => self.build_default_haras(),
        };
        Ok(request)
    }

    /// Parse the response to `op` and return the typed result as JSON.
    /// Operations without a payload yield `null`.
    pub fn parse_value(&self, op: &Operation, response: HttpResponse) -> Result<Value, ApiError> {
        use Operation::*;
        match op {
            ListHorses { .. } => json(self.parse_list_horses(response)),
            ListAvailableHorses { .. } => json(self.parse_list_available_horses(response)),
            GetHorse { .. } => json(self.parse_get_horse(response)),
            CreateHorse { .. } => json(self.parse_create_horse(response)),
            UpdateHorse { .. } => json(self.parse_update_horse(response)),
            DeleteHorse { .. } => json(self.parse_delete_horse(response)),
            AssignStall { .. } => json(self.parse_assign_stall(response)),
            RemoveStall { .. } => json(self.parse_remove_stall(response)),
            HorseStats { .. } => json(self.parse_horse_stats(response)),

            ListStalls { .. } => json(self.parse_list_stalls(response)),
            ListAvailableStalls { .. } => json(self.parse_list_available_stalls(response)),
            GetStall { .. } => json(self.parse_get_stall(response)),
            StallStats { .. } => json(self.parse_stall_stats(response)),
            SetStallStatus { .. } => json(self.parse_set_stall_status(response)),

            ListEmbryos { .. } => json(self.parse_list_embryos(response)),
            GetEmbryo { .. } => json(self.parse_get_embryo(response)),
            CreateEmbryo { .. } => json(self.parse_create_embryo(response)),
            ActivateEmbryo { .. } => json(self.parse_activate_embryo(response)),

            ListMedicines => json(self.parse_list_medicines(response)),
            GetMedicine { .. } => json(self.parse_get_medicine(response)),
            CreateMedicine { .. } => json(self.parse_create_medicine(response)),
            UpdateMedicine { .. } => json(self.parse_update_medicine(response)),
            DeleteMedicine { .. } => json(self.parse_delete_medicine(response)),
            ListStocks { .. } => json(self.parse_list_stocks(response)),
            GetStock { .. } => json(self.parse_get_stock(response)),
            CreateStock { .. } => json(self.parse_create_stock(response)),
            UpdateStock { .. } => json(self.parse_update_stock(response)),
            DeleteStock { .. } => json(self.parse_delete_stock(response)),
            RecordMovement { .. } => json(self.parse_record_movement(response)),
            ListLowStock { .. } => json(self.parse_list_low_stock(response)),
            ListAlerts { .. } => json(self.parse_list_alerts(response)),
            CostSummary { .. } => json(self.parse_cost_summary(response)),

            ListHaras => json(self.parse_list_haras(response)),
            GetHaras { .. } => json(self.parse_get_haras(response)),
            DefaultHaras => json(self.parse_default_haras(response)),
        }
    }
}

fn json<T: Serialize>(result: Result<T, ApiError>) -> Result<Value, ApiError> {
    let value = result?;
    serde_json::to_value(value).map_err(|e| ApiError::SerializationError(e.to_string()))
}
