//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Requests cross the boundary as plain C data: a method enum, C strings and
//! a header array. Parse results carry their payload as a JSON C string, so
//! one result type serves every operation. Conversion functions live here to
//! keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use haras_core::error::ApiError;
use haras_core::http::HttpMethod;

/// Opaque handle to a `HarasClient`. C callers receive a pointer to this
/// and pass it back into every FFI function.
pub struct FfiHarasClient {
    pub(crate) inner: haras_core::HarasClient,
}

/// Copy `s` into a heap C string owned by the caller.
///
/// Interior NUL bytes cannot be represented and are dropped.
pub(crate) fn c_string(s: String) -> *mut c_char {
    let cstring = CString::new(s).unwrap_or_else(|e| {
        let mut bytes = e.into_vec();
        bytes.retain(|b| *b != 0);
        CString::new(bytes).unwrap_or_default()
    });
    cstring.into_raw()
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
    Put = 2,
    Delete = 3,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
            HttpMethod::Put => FfiHttpMethod::Put,
            HttpMethod::Delete => FfiHttpMethod::Delete,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// Built by `haras_build_request`. The C caller executes the request and
/// passes the response back through `haras_parse_response`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub path: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: haras_core::HttpRequest) -> *mut Self {
        let path = c_string(req.path);
        let body = match req.body {
            Some(b) => c_string(b),
            None => std::ptr::null_mut(),
        };

        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Box<[FfiHeader]> = req
                .headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: c_string(k),
                    value: c_string(v),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            path,
            headers,
            headers_len,
            body,
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller constructs this on the stack after executing a request,
/// then passes a pointer to `haras_parse_response`. The FFI layer reads
/// but does not free these fields. A null `body` is read as empty.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiHarasResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    NotFound = 1,
    Http = 2,
    Rejected = 3,
    Deserialization = 4,
    Serialization = 5,
    Conflict = 6,
    InvalidArgument = 7,
    Panic = 8,
    NullArg = 9,
}

/// Result envelope for `haras_parse_response`.
///
/// On success `error_code` is `Ok`, `error_message` is null and `data_json`
/// holds the parsed payload as JSON (`null` for operations without one).
/// On failure `error_code` describes the category, `error_message` is a
/// human-readable C string and `data_json` is null.
#[repr(C)]
pub struct FfiHarasResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub data_json: *mut c_char,
}

impl FfiHarasResult {
    fn boxed(error_code: FfiErrorCode, message: Option<String>, http_status: u16, data: Option<String>) -> *mut Self {
        Box::into_raw(Box::new(FfiHarasResult {
            error_code,
            error_message: message.map_or(std::ptr::null_mut(), c_string),
            http_status,
            data_json: data.map_or(std::ptr::null_mut(), c_string),
        }))
    }

    /// Build a success result carrying `data` as JSON text.
    pub(crate) fn ok_json(data: &serde_json::Value) -> *mut Self {
        Self::boxed(FfiErrorCode::Ok, None, 0, Some(data.to_string()))
    }

    /// Build an error result from an `ApiError`.
    pub(crate) fn from_error(err: ApiError) -> *mut Self {
        let error_code = match &err {
            ApiError::NotFound => FfiErrorCode::NotFound,
            ApiError::HttpError { .. } => FfiErrorCode::Http,
            ApiError::Rejected { .. } => FfiErrorCode::Rejected,
            ApiError::DeserializationError(_) => FfiErrorCode::Deserialization,
            ApiError::SerializationError(_) => FfiErrorCode::Serialization,
            ApiError::Conflict(_) => FfiErrorCode::Conflict,
            ApiError::InvalidArgument(_) => FfiErrorCode::InvalidArgument,
        };
        let http_status = err.status().unwrap_or(0);
        Self::boxed(error_code, Some(err.to_string()), http_status, None)
    }

    /// Build an error result for a null argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::boxed(FfiErrorCode::NullArg, Some(format!("null argument: {name}")), 0, None)
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::boxed(FfiErrorCode::Panic, Some(msg.to_string()), 0, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;

    #[test]
    fn c_string_drops_interior_nul() {
        let ptr = c_string("ab\0cd".to_string());
        let s = unsafe { CStr::from_ptr(ptr) }.to_str().unwrap().to_string();
        drop(unsafe { CString::from_raw(ptr) });
        assert_eq!(s, "abcd");
    }

    #[test]
    fn error_codes_follow_api_error() {
        let result = FfiHarasResult::from_error(ApiError::HttpError {
            status: 409,
            body: "stall occupied".to_string(),
        });
        let r = unsafe { Box::from_raw(result) };
        assert_eq!(r.error_code, FfiErrorCode::Http);
        assert_eq!(r.http_status, 409);
        assert!(r.data_json.is_null());
        let message = unsafe { CString::from_raw(r.error_message) };
        assert!(message.to_str().unwrap().contains("stall occupied"));
    }
}
