use uuid::Uuid;

use super::HarasClient;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    CostSummary, Medicine, MedicineUpdate, NewMedicine, NewStock, NewStockMovement, StockAlert,
    StockMovement, StockUpdate, VeterinaryStock,
};

impl HarasClient {
    // -- medicine catalog --------------------------------------------------

    pub fn build_list_medicines(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/veterinary/medicines")
    }

    pub fn build_get_medicine(&self, id: Uuid) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("/veterinary/medicines/{id}"))
    }

    pub fn build_create_medicine(&self, input: &NewMedicine) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/veterinary/medicines", input)
    }

    pub fn build_update_medicine(&self, id: Uuid, input: &MedicineUpdate) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Put, &format!("/veterinary/medicines/{id}"), input)
    }

    pub fn build_delete_medicine(&self, id: Uuid) -> HttpRequest {
        self.request(HttpMethod::Delete, &format!("/veterinary/medicines/{id}"))
    }

    pub fn parse_list_medicines(&self, response: HttpResponse) -> Result<Vec<Medicine>, ApiError> {
        self.decode(response)
    }

    pub fn parse_get_medicine(&self, response: HttpResponse) -> Result<Medicine, ApiError> {
        self.decode(response)
    }

    pub fn parse_create_medicine(&self, response: HttpResponse) -> Result<Medicine, ApiError> {
        self.decode(response)
    }

    pub fn parse_update_medicine(&self, response: HttpResponse) -> Result<Medicine, ApiError> {
        self.decode(response)
    }

    pub fn parse_delete_medicine(&self, response: HttpResponse) -> Result<(), ApiError> {
        self.decode::<serde_json::Value>(response).map(|_| ())
    }

    // -- stock lots --------------------------------------------------------

    pub fn build_list_stocks(&self, haras_id: Uuid) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("/veterinary/haras/{haras_id}/stocks"))
    }

    pub fn build_get_stock(&self, id: Uuid) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("/veterinary/stocks/{id}"))
    }

    pub fn build_create_stock(&self, input: &NewStock) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/veterinary/stocks", input)
    }

    pub fn build_update_stock(&self, id: Uuid, input: &StockUpdate) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Put, &format!("/veterinary/stocks/{id}"), input)
    }

    pub fn build_delete_stock(&self, id: Uuid) -> HttpRequest {
        self.request(HttpMethod::Delete, &format!("/veterinary/stocks/{id}"))
    }

    pub fn build_record_movement(&self, stock_id: Uuid, input: &NewStockMovement) -> Result<HttpRequest, ApiError> {
        if !input.quantity.is_finite() || input.quantity < 0.0 {
            return Err(ApiError::InvalidArgument(format!(
                "movement quantity must be a non-negative number, got {}",
                input.quantity
            )));
        }
        self.json_request(
            HttpMethod::Post,
            &format!("/veterinary/stocks/{stock_id}/movements"),
            input,
        )
    }

    pub fn build_list_low_stock(&self, haras_id: Uuid) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("/veterinary/haras/{haras_id}/stocks/low"))
    }

    pub fn build_list_alerts(&self, haras_id: Uuid) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("/veterinary/haras/{haras_id}/alerts"))
    }

    pub fn build_cost_summary(&self, haras_id: Uuid) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("/veterinary/haras/{haras_id}/costs"))
    }

    pub fn parse_list_stocks(&self, response: HttpResponse) -> Result<Vec<VeterinaryStock>, ApiError> {
        self.decode(response)
    }

    pub fn parse_get_stock(&self, response: HttpResponse) -> Result<VeterinaryStock, ApiError> {
        self.decode(response)
    }

    pub fn parse_create_stock(&self, response: HttpResponse) -> Result<VeterinaryStock, ApiError> {
        self.decode(response)
    }

    pub fn parse_update_stock(&self, response: HttpResponse) -> Result<VeterinaryStock, ApiError> {
        self.decode(response)
    }

    pub fn parse_delete_stock(&self, response: HttpResponse) -> Result<(), ApiError> {
        self.decode::<serde_json::Value>(response).map(|_| ())
    }

    pub fn parse_record_movement(&self, response: HttpResponse) -> Result<StockMovement, ApiError> {
        self.decode(response)
    }

    pub fn parse_list_low_stock(&self, response: HttpResponse) -> Result<Vec<VeterinaryStock>, ApiError> {
        self.decode(response)
    }

    pub fn parse_list_alerts(&self, response: HttpResponse) -> Result<Vec<StockAlert>, ApiError> {
        self.decode(response)
    }

    pub fn parse_cost_summary(&self, response: HttpResponse) -> Result<CostSummary, ApiError> {
        self.decode(response)
    }
}
