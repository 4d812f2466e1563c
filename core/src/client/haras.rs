use uuid::Uuid;

use super::HarasClient;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::Haras;

impl HarasClient {
    /// Farms visible to the authenticated user.
    pub fn build_list_haras(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/haras")
    }

    pub fn build_get_haras(&self, id: Uuid) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("/haras/{id}"))
    }

    /// The default farm is the first one the list endpoint returns.
    pub fn build_default_haras(&self) -> HttpRequest {
        self.build_list_haras()
    }

    pub fn parse_list_haras(&self, response: HttpResponse) -> Result<Vec<Haras>, ApiError> {
        self.decode(response)
    }

    pub fn parse_get_haras(&self, response: HttpResponse) -> Result<Haras, ApiError> {
        self.decode(response)
    }

    /// `None` when the user has no farm yet.
    pub fn parse_default_haras(&self, response: HttpResponse) -> Result<Option<Haras>, ApiError> {
        Ok(self.parse_list_haras(response)?.into_iter().next())
    }
}
