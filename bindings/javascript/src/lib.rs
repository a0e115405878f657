//! JavaScript/TypeScript bindings for the parameter resolver
//!
//! Thin wrapper around `resolver-core` compiled to WebAssembly.
//! ZERO logic here — all behavior from the canonical Rust implementation.

use js_sys::Promise;
use resolver_core::Resolver;
use wasm_bindgen::prelude::*;

fn to_js_error(e: resolver_core::Error) -> JsError {
    JsError::new(&format!("{}: {}", e.code(), e))
}

fn load_schema(schema: &str) -> Result<Resolver, JsError> {
    let doc: serde_json::Value = serde_json::from_str(schema)
        .map_err(|e| JsError::new(&format!("Invalid schema JSON: {}", e)))?;
    Resolver::from_json(&doc).map_err(to_js_error)
}

fn resolve_to_json(schema: &str, data: &str) -> Result<String, JsError> {
    let resolver = load_schema(schema)?;
    let data: serde_json::Value = serde_json::from_str(data)
        .map_err(|e| JsError::new(&format!("Invalid data JSON: {}", e)))?;

    let record = resolver.resolve(&data).map_err(to_js_error)?;
    serde_json::to_string(&record)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Validate a schema and return its normalized definitions.
///
/// @param schema - JSON array of parameter specifications
/// @returns JSON array of registered definitions, groups first
/// @throws Error "<CODE>: <message>" if a specification is invalid
#[wasm_bindgen(js_name = "checkSchema")]
pub fn check_schema(schema: &str) -> Result<String, JsError> {
    let resolver = load_schema(schema)?;

    serde_json::to_string_pretty(resolver.get_all_parameters())
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Resolve a data record against a schema.
///
/// @param schema - JSON array of parameter specifications
/// @param data - JSON object to resolve
/// @returns JSON string of the resolved record
/// @throws Error "<CODE>: <message>" on the first failing check
#[wasm_bindgen]
pub fn resolve(schema: &str, data: &str) -> Result<String, JsError> {
    resolve_to_json(schema, data)
}

/// Promise form of `resolve`.
///
/// Resolution runs synchronously; the returned Promise is already settled.
///
/// @param schema - JSON array of parameter specifications
/// @param data - JSON object to resolve
/// @returns Promise fulfilled with the resolved record JSON, or rejected
///          with Error "<CODE>: <message>"
#[wasm_bindgen(js_name = "resolvePromise")]
pub fn resolve_promise(schema: &str, data: &str) -> Promise {
    match resolve_to_json(schema, data) {
        Ok(json) => Promise::resolve(&JsValue::from_str(&json)),
        Err(e) => Promise::reject(&JsValue::from(e)),
    }
}

/// Look up a parameter definition.
///
/// @param schema - JSON array of parameter specifications
/// @param name - parameter name
/// @param parent - group name; when omitted the first definition with
///                 this name is returned, whatever its group
/// @returns JSON string of the definition, or undefined if not found
#[wasm_bindgen(js_name = "getParameter")]
pub fn get_parameter(
    schema: &str,
    name: &str,
    parent: Option<String>,
) -> Result<Option<String>, JsError> {
    let resolver = load_schema(schema)?;

    let found = match parent.as_deref() {
        Some(group) => resolver.find_parameter(name, Some(group)),
        None => resolver.get_parameter(name),
    };

    found
        .map(|p| {
            serde_json::to_string(p)
                .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
        })
        .transpose()
}
