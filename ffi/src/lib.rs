//! C-ABI wrapper around `haras-core`.
//!
//! # Overview
//! Exposes the Haras API client through `extern "C"` functions so any
//! language with a C FFI can build and parse HTTP requests/responses without
//! linking to Rust's async runtime or serde directly.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Operations are passed as JSON (`{"op":"listHorses","harasId":"..."}`),
//!   the same form `haras_core::Operation` deserializes. One build function
//!   and one parse function cover the whole API.
//! - Parse results come back in a single `FfiHarasResult` with the payload
//!   as a JSON C string.
//! - The C caller owns all returned pointers and must call the matching
//!   `haras_free_*` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::catch_unwind;

use chrono::{DateTime, NaiveDate, Utc};
use haras_core::http::HttpResponse;
use haras_core::{age_in_years, calculate_gestation_info, HarasClient, Operation};

use types::*;

/// Borrow a C string as `&str`. Null or non-UTF-8 input yields `None`.
fn str_arg<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

fn date_arg(ptr: *const c_char) -> Option<NaiveDate> {
    str_arg(ptr)?.parse().ok()
}

/// Convert a caller-provided `FfiHttpResponse` into a core `HttpResponse`.
fn ffi_response_to_core(resp: &FfiHttpResponse) -> HttpResponse {
    let body = if resp.body.is_null() {
        String::new()
    } else {
        unsafe { CStr::from_ptr(resp.body) }.to_string_lossy().into_owned()
    };
    HttpResponse::new(resp.status, body)
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a new `HarasClient` bound to `base_url`.
///
/// Returns null if `base_url` is null or if an internal panic occurs.
/// The caller must free the returned pointer with `haras_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn haras_client_new(base_url: *const c_char) -> *mut FfiHarasClient {
    catch_unwind(|| match str_arg(base_url) {
        Some(url) => Box::into_raw(Box::new(FfiHarasClient {
            inner: HarasClient::new(url),
        })),
        None => std::ptr::null_mut(),
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Create a client that sends `Authorization: Bearer <token>` on every
/// request. A null `token` behaves like `haras_client_new`.
#[unsafe(no_mangle)]
pub extern "C" fn haras_client_new_with_token(
    base_url: *const c_char,
    token: *const c_char,
) -> *mut FfiHarasClient {
    catch_unwind(|| {
        let Some(url) = str_arg(base_url) else {
            return std::ptr::null_mut();
        };
        let client = match str_arg(token) {
            Some(token) => HarasClient::new(url).with_token(token),
            None => HarasClient::new(url),
        };
        Box::into_raw(Box::new(FfiHarasClient { inner: client }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `haras_client_new*`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn haras_client_free(client: *mut FfiHarasClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Build / parse
// ---------------------------------------------------------------------------

/// Build the HTTP request for the operation described by `op_json`.
///
/// Returns null if an argument is null, if `op_json` does not name a known
/// operation, or if the operation's arguments are rejected.
/// The caller must free the returned pointer with `haras_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn haras_build_request(
    client: *const FfiHarasClient,
    op_json: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let Some(op) = str_arg(op_json).and_then(|s| Operation::from_json(s).ok()) else {
            return std::ptr::null_mut();
        };
        match client.inner.build(&op) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Parse the response to the operation described by `op_json`.
///
/// Never returns null. The caller must free the result with
/// `haras_free_result`.
#[unsafe(no_mangle)]
pub extern "C" fn haras_parse_response(
    client: *const FfiHarasClient,
    op_json: *const c_char,
    response: *const FfiHttpResponse,
) -> *mut FfiHarasResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiHarasResult::null_arg("client");
        }
        if response.is_null() {
            return FfiHarasResult::null_arg("response");
        }
        let Some(op_str) = str_arg(op_json) else {
            return FfiHarasResult::null_arg("op_json");
        };
        let op = match Operation::from_json(op_str) {
            Ok(op) => op,
            Err(e) => return FfiHarasResult::from_error(e),
        };
        let client = unsafe { &*client };
        let resp = unsafe { &*response };
        match client.inner.parse_value(&op, ffi_response_to_core(resp)) {
            Ok(value) => FfiHarasResult::ok_json(&value),
            Err(e) => FfiHarasResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiHarasResult::panic("panic in haras_parse_response"))
}

// ---------------------------------------------------------------------------
// Pure helpers
// ---------------------------------------------------------------------------

/// Gestation progress as a JSON C string
/// (`{"gestationDays", "remainingDays", "expectedBirthDate", "percentComplete"}`).
///
/// `activation_date` is `YYYY-MM-DD`. A negative `days_override` means no
/// override. `now_millis` is milliseconds since the Unix epoch.
/// Returns null on bad input. Free with `haras_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn haras_gestation_info(
    activation_date: *const c_char,
    days_override: i64,
    now_millis: i64,
) -> *mut c_char {
    catch_unwind(|| {
        let Some(activation) = date_arg(activation_date) else {
            return std::ptr::null_mut();
        };
        let Some(now) = DateTime::<Utc>::from_timestamp_millis(now_millis) else {
            return std::ptr::null_mut();
        };
        let days_override = (days_override >= 0).then_some(days_override);
        let info = calculate_gestation_info(activation, days_override, now);
        match serde_json::to_string(&info) {
            Ok(json) => c_string(json),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Whole years between two `YYYY-MM-DD` dates. Returns -1 on bad input.
#[unsafe(no_mangle)]
pub extern "C" fn haras_age_in_years(birth_date: *const c_char, today: *const c_char) -> i32 {
    catch_unwind(|| match (date_arg(birth_date), date_arg(today)) {
        (Some(birth), Some(today)) => age_in_years(birth, today),
        _ => -1,
    })
    .unwrap_or(-1)
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by `haras_build_request`.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn haras_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        free_c_string(req.path);
        free_c_string(req.body);
        if !req.headers.is_null() && req.headers_len > 0 {
            let slice = std::ptr::slice_from_raw_parts_mut(req.headers, req.headers_len as usize);
            let headers = unsafe { Box::from_raw(slice) };
            for h in headers.iter() {
                free_c_string(h.key);
                free_c_string(h.value);
            }
        }
    });
}

/// Free an `FfiHarasResult` returned by `haras_parse_response`.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn haras_free_result(result: *mut FfiHarasResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        free_c_string(result.error_message);
        free_c_string(result.data_json);
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn haras_free_string(s: *mut c_char) {
    let _ = catch_unwind(|| free_c_string(s));
}

fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
