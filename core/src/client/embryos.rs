use uuid::Uuid;

use super::HarasClient;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Embryo, EmbryoActivation, NewEmbryo};

impl HarasClient {
    pub fn build_list_embryos(&self, haras_id: Uuid) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("/embryos/haras/{haras_id}"))
    }

    pub fn build_get_embryo(&self, id: Uuid) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("/embryos/{id}"))
    }

    pub fn build_create_embryo(&self, input: &NewEmbryo) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/embryos", input)
    }

    /// Transfer a frozen embryo into a recipient mare. The backend decides
    /// whether the embryo may still be activated.
    pub fn build_activate_embryo(&self, id: Uuid, input: &EmbryoActivation) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, &format!("/embryos/{id}/activate"), input)
    }

    pub fn parse_list_embryos(&self, response: HttpResponse) -> Result<Vec<Embryo>, ApiError> {
        self.decode(response)
    }

    pub fn parse_get_embryo(&self, response: HttpResponse) -> Result<Embryo, ApiError> {
        self.decode(response)
    }

    pub fn parse_create_embryo(&self, response: HttpResponse) -> Result<Embryo, ApiError> {
        self.decode(response)
    }

    pub fn parse_activate_embryo(&self, response: HttpResponse) -> Result<Embryo, ApiError> {
        self.decode(response)
    }
}
