use uuid::Uuid;

use super::HarasClient;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Horse, Stall, StallStats, StallStatus, StallStatusUpdate};

impl HarasClient {
    pub fn build_list_stalls(&self, haras_id: Uuid) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("/stalls/haras/{haras_id}"))
    }

    pub fn build_list_available_stalls(&self, haras_id: Uuid) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("/stalls/haras/{haras_id}/available"))
    }

    pub fn build_get_stall(&self, id: Uuid) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("/stalls/{id}"))
    }

    pub fn build_stall_stats(&self, haras_id: Uuid) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("/stalls/haras/{haras_id}/stats"))
    }

    pub fn build_set_stall_status(&self, id: Uuid, status: StallStatus) -> Result<HttpRequest, ApiError> {
        self.json_request(
            HttpMethod::Put,
            &format!("/stalls/{id}/status"),
            &StallStatusUpdate { status },
        )
    }

    /// Stall-side entry point for placing a horse. Produces the same request
    /// as `build_assign_stall`: placements are written on the horse only.
    pub fn build_assign_horse_to_stall(&self, stall_id: Uuid, horse_id: Uuid) -> Result<HttpRequest, ApiError> {
        self.build_assign_stall(horse_id, stall_id)
    }

    /// Stall-side entry point for vacating a stall; see `build_remove_stall`.
    pub fn build_remove_horse_from_stall(&self, horse_id: Uuid) -> HttpRequest {
        self.build_remove_stall(horse_id)
    }

    pub fn parse_list_stalls(&self, response: HttpResponse) -> Result<Vec<Stall>, ApiError> {
        self.decode(response)
    }

    pub fn parse_list_available_stalls(&self, response: HttpResponse) -> Result<Vec<Stall>, ApiError> {
        self.decode(response)
    }

    pub fn parse_get_stall(&self, response: HttpResponse) -> Result<Stall, ApiError> {
        self.decode(response)
    }

    pub fn parse_stall_stats(&self, response: HttpResponse) -> Result<StallStats, ApiError> {
        self.decode(response)
    }

    pub fn parse_set_stall_status(&self, response: HttpResponse) -> Result<Stall, ApiError> {
        self.decode(response)
    }

    pub fn parse_assign_horse_to_stall(&self, response: HttpResponse) -> Result<Horse, ApiError> {
        self.parse_assign_stall(response)
    }

    pub fn parse_remove_horse_from_stall(&self, response: HttpResponse) -> Result<Horse, ApiError> {
        self.parse_remove_stall(response)
    }
}
