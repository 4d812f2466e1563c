use uuid::Uuid;

use super::HarasClient;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::occupancy::check_assignment;
use crate::types::{Horse, HorseStats, HorseUpdate, NewHorse, Stall, StallAssignment};

impl HarasClient {
    pub fn build_list_horses(&self, haras_id: Uuid) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("/horses/haras/{haras_id}"))
    }

    /// Horses of the farm that are not in any stall.
    pub fn build_list_available_horses(&self, haras_id: Uuid) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("/horses/haras/{haras_id}/available"))
    }

    pub fn build_get_horse(&self, id: Uuid) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("/horses/{id}"))
    }

    pub fn build_create_horse(&self, input: &NewHorse) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/horses", input)
    }

    pub fn build_update_horse(&self, id: Uuid, input: &HorseUpdate) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Put, &format!("/horses/{id}"), input)
    }

    pub fn build_delete_horse(&self, id: Uuid) -> HttpRequest {
        self.request(HttpMethod::Delete, &format!("/horses/{id}"))
    }

    /// The only request that places a horse in a stall.
    pub fn build_assign_stall(&self, horse_id: Uuid, stall_id: Uuid) -> Result<HttpRequest, ApiError> {
        self.json_request(
            HttpMethod::Put,
            &format!("/horses/{horse_id}/assign-stall"),
            &StallAssignment { stall_id },
        )
    }

    /// Like `build_assign_stall`, but refuses placements that would put two
    /// horses in one stall or use a stall that cannot take a horse.
    pub fn build_assign_stall_checked(&self, horse: &Horse, stall: &Stall) -> Result<HttpRequest, ApiError> {
        check_assignment(horse, stall)?;
        self.build_assign_stall(horse.id, stall.id)
    }

    pub fn build_remove_stall(&self, horse_id: Uuid) -> HttpRequest {
        self.request(HttpMethod::Put, &format!("/horses/{horse_id}/remove-stall"))
    }

    pub fn build_horse_stats(&self, haras_id: Uuid) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("/horses/haras/{haras_id}/stats"))
    }

    pub fn parse_list_horses(&self, response: HttpResponse) -> Result<Vec<Horse>, ApiError> {
        self.decode(response)
    }

    pub fn parse_list_available_horses(&self, response: HttpResponse) -> Result<Vec<Horse>, ApiError> {
        self.decode(response)
    }

    pub fn parse_get_horse(&self, response: HttpResponse) -> Result<Horse, ApiError> {
        self.decode(response)
    }

    pub fn parse_create_horse(&self, response: HttpResponse) -> Result<Horse, ApiError> {
        self.decode(response)
    }

    pub fn parse_update_horse(&self, response: HttpResponse) -> Result<Horse, ApiError> {
        self.decode(response)
    }

    pub fn parse_delete_horse(&self, response: HttpResponse) -> Result<(), ApiError> {
        self.decode::<serde_json::Value>(response).map(|_| ())
    }

    /// Returns the horse with its new `stallId`.
    pub fn parse_assign_stall(&self, response: HttpResponse) -> Result<Horse, ApiError> {
        self.decode(response)
    }

    pub fn parse_remove_stall(&self, response: HttpResponse) -> Result<Horse, ApiError> {
        self.decode(response)
    }

    pub fn parse_horse_stats(&self, response: HttpResponse) -> Result<HorseStats, ApiError> {
        self.decode(response)
    }
}
