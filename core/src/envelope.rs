//! Response envelope normalisation.
//!
//! The backend wraps payloads in one of two shapes depending on the module
//! that served them:
//!
//! ```json
//! { "status": "success", "data": { ... }, "message": "..." }
//! { "success": true, "data": { ... } }
//! ```
//!
//! Some endpoints return the payload bare. `decode` accepts all three and
//! hands back only the payload, so no facade method ever sees an envelope.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::ApiError;
use crate::http::HttpResponse;

/// Decode `response` into `T`, unwrapping whichever envelope it carries.
pub(crate) fn decode<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    let data = unwrap(response)?;
    serde_json::from_value(data).map_err(|e| {
        warn!(error = %e, "response payload did not match the expected shape");
        ApiError::DeserializationError(e.to_string())
    })
}

/// Check the status code and strip the envelope, returning the raw payload.
pub(crate) fn unwrap(response: HttpResponse) -> Result<Value, ApiError> {
    if !response.is_success() {
        return Err(status_error(response));
    }
    if response.body.trim().is_empty() {
        return Ok(Value::Null);
    }
    let value: Value = serde_json::from_str(&response.body)
        .map_err(|e| ApiError::DeserializationError(e.to_string()))?;
    open(value)
}

fn status_error(response: HttpResponse) -> ApiError {
    if response.status == 404 {
        return ApiError::NotFound;
    }
    let body = serde_json::from_str::<Value>(&response.body)
        .ok()
        .and_then(|v| v.as_object().and_then(message))
        .unwrap_or(response.body);
    warn!(status = response.status, %body, "backend returned an error status");
    ApiError::HttpError {
        status: response.status,
        body,
    }
}

fn open(value: Value) -> Result<Value, ApiError> {
    let Value::Object(mut obj) = value else {
        return Ok(value);
    };

    match envelope_outcome(&obj) {
        Some(true) => Ok(obj.remove("data").unwrap_or(Value::Null)),
        Some(false) => {
            let message = message(&obj).unwrap_or_else(|| "unknown error".to_string());
            warn!(%message, "backend rejected the request");
            Err(ApiError::Rejected { message })
        }
        None => Ok(Value::Object(obj)),
    }
}

/// `Some(ok)` when `obj` is an envelope, `None` when it is a bare payload.
///
/// A bare stall or embryo also has a `status` field, so the string form only
/// counts as an envelope when it holds one of the two envelope values and the
/// object carries `data` or `message` next to it.
fn envelope_outcome(obj: &Map<String, Value>) -> Option<bool> {
    if let Some(Value::Bool(ok)) = obj.get("success") {
        return Some(*ok);
    }
    let has_body = obj.contains_key("data") || obj.contains_key("message");
    match obj.get("status").and_then(Value::as_str) {
        Some("success") if has_body => Some(true),
        Some("error") | Some("fail") if has_body => Some(false),
        _ => None,
    }
}

fn message(obj: &Map<String, Value>) -> Option<String> {
    obj.get("message")
        .or_else(|| obj.get("error"))
        .and_then(Value::as_str)
        .map(str::to_string)
}
