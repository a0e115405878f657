//! C-FFI layer for the parameter resolver — used by Go (cgo) and other FFI consumers.
//!
//! ZERO logic here. All calls delegate to `resolver-core`.
//!
//! # Memory Contract
//!
//! All functions that return `*mut c_char` allocate via `CString`.
//! The caller MUST free the returned string by calling `resolver_free_string()`.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use resolver_core::Resolver;

/// Result from a resolver FFI call.
/// If `error` is null, the call succeeded and `result` contains the output.
/// If `error` is non-null, the call failed and `error` contains the message.
/// `code` holds the resolver error code (e.g. `NO_REQUIRED_PARAMETER`) when
/// the failure came from the resolver itself, and is null otherwise.
/// The caller MUST free `result`, `error` and `code` with `resolver_free_string()`.
#[repr(C)]
pub struct ResolverResult {
    pub result: *mut c_char,
    pub error: *mut c_char,
    pub code: *mut c_char,
}

fn into_c(s: String) -> *mut c_char {
    CString::new(s)
        .unwrap_or_else(|_| CString::from(c"interior nul in output"))
        .into_raw()
}

impl ResolverResult {
    fn ok(value: String) -> Self {
        ResolverResult {
            result: into_c(value),
            error: std::ptr::null_mut(),
            code: std::ptr::null_mut(),
        }
    }

    fn err(msg: String) -> Self {
        ResolverResult {
            result: std::ptr::null_mut(),
            error: into_c(msg),
            code: std::ptr::null_mut(),
        }
    }

    fn resolver_err(e: resolver_core::Error) -> Self {
        ResolverResult {
            result: std::ptr::null_mut(),
            error: into_c(e.to_string()),
            code: into_c(e.code().to_string()),
        }
    }
}

/// Helper: convert a C string pointer to a Rust &str.
/// Returns None if the pointer is null or not valid UTF-8.
unsafe fn cstr_to_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok()
}

fn load_schema(schema: &str) -> Result<Resolver, ResolverResult> {
    let doc: serde_json::Value = serde_json::from_str(schema)
        .map_err(|e| ResolverResult::err(format!("Invalid schema JSON: {}", e)))?;
    Resolver::from_json(&doc).map_err(ResolverResult::resolver_err)
}

/// Validate a schema and return its normalized definitions as JSON.
///
/// # Safety
/// `schema` must be a valid null-terminated UTF-8 C string.
/// The caller must free the returned strings with `resolver_free_string()`.
#[no_mangle]
pub unsafe extern "C" fn resolver_check_schema(schema: *const c_char) -> ResolverResult {
    let schema = match cstr_to_str(schema) {
        Some(s) => s,
        None => return ResolverResult::err("null or invalid UTF-8 schema".into()),
    };

    let resolver = match load_schema(schema) {
        Ok(r) => r,
        Err(result) => return result,
    };

    match serde_json::to_string_pretty(resolver.get_all_parameters()) {
        Ok(json) => ResolverResult::ok(json),
        Err(e) => ResolverResult::err(format!("Serialization error: {}", e)),
    }
}

/// Resolve a JSON data record against a JSON schema.
/// On success `result` holds the resolved record as JSON.
///
/// # Safety
/// `schema` and `data` must be valid null-terminated UTF-8 C strings.
/// The caller must free the returned strings with `resolver_free_string()`.
#[no_mangle]
pub unsafe extern "C" fn resolver_resolve(
    schema: *const c_char,
    data: *const c_char,
) -> ResolverResult {
    let schema = match cstr_to_str(schema) {
        Some(s) => s,
        None => return ResolverResult::err("null or invalid UTF-8 schema".into()),
    };
    let data = match cstr_to_str(data) {
        Some(s) => s,
        None => return ResolverResult::err("null or invalid UTF-8 data".into()),
    };

    let resolver = match load_schema(schema) {
        Ok(r) => r,
        Err(result) => return result,
    };

    let data: serde_json::Value = match serde_json::from_str(data) {
        Ok(v) => v,
        Err(e) => return ResolverResult::err(format!("Invalid data JSON: {}", e)),
    };

    resolver.resolve_with(&data, |result| match result {
        Ok(record) => match serde_json::to_string(&record) {
            Ok(json) => ResolverResult::ok(json),
            Err(e) => ResolverResult::err(format!("Serialization error: {}", e)),
        },
        Err(e) => ResolverResult::resolver_err(e),
    })
}

/// Look up a parameter definition. `parent` may be null, in which case the
/// first definition with this name is returned whatever its group.
/// A missing definition yields a null `result` and a null `error`.
///
/// # Safety
/// `schema` and `name` must be valid null-terminated UTF-8 C strings;
/// `parent` must be null or a valid null-terminated UTF-8 C string.
/// The caller must free the returned strings with `resolver_free_string()`.
#[no_mangle]
pub unsafe extern "C" fn resolver_get_parameter(
    schema: *const c_char,
    name: *const c_char,
    parent: *const c_char,
) -> ResolverResult {
    let schema = match cstr_to_str(schema) {
        Some(s) => s,
        None => return ResolverResult::err("null or invalid UTF-8 schema".into()),
    };
    let name = match cstr_to_str(name) {
        Some(s) => s,
        None => return ResolverResult::err("null or invalid UTF-8 name".into()),
    };
    let parent = if parent.is_null() {
        None
    } else {
        match cstr_to_str(parent) {
            Some(s) => Some(s),
            None => return ResolverResult::err("invalid UTF-8 parent".into()),
        }
    };

    let resolver = match load_schema(schema) {
        Ok(r) => r,
        Err(result) => return result,
    };

    let found = match parent {
        Some(group) => resolver.find_parameter(name, Some(group)),
        None => resolver.get_parameter(name),
    };

    match found.map(serde_json::to_string) {
        Some(Ok(json)) => ResolverResult::ok(json),
        Some(Err(e)) => ResolverResult::err(format!("Serialization error: {}", e)),
        None => ResolverResult {
            result: std::ptr::null_mut(),
            error: std::ptr::null_mut(),
            code: std::ptr::null_mut(),
        },
    }
}

/// Free a string previously returned by a resolver FFI function.
///
/// # Safety
/// `ptr` must be a pointer previously returned by a resolver FFI function,
/// or null (in which case this is a no-op).
#[no_mangle]
pub unsafe extern "C" fn resolver_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}
