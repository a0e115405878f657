//! Python bindings for the parameter resolver
//!
//! Thin wrapper around `resolver-core` — ZERO logic here.
//! All behavior comes from the canonical Rust implementation.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use resolver_core::Resolver;

fn to_py_err(e: resolver_core::Error) -> PyErr {
    PyValueError::new_err(format!("{}: {}", e.code(), e))
}

fn parse_json(text: &str, what: &str) -> PyResult<serde_json::Value> {
    serde_json::from_str(text)
        .map_err(|e| PyValueError::new_err(format!("Invalid {} JSON: {}", what, e)))
}

fn load_schema(schema: &str) -> PyResult<Resolver> {
    Resolver::from_json(&parse_json(schema, "schema")?).map_err(to_py_err)
}

/// Validate a schema and return its normalized definitions.
///
/// Implicit groups are synthesized and placed ahead of their members.
///
/// Args:
///     schema: JSON array of parameter specifications
///
/// Returns:
///     JSON array of registered parameter definitions
///
/// Raises:
///     ValueError: "<CODE>: <message>" if a specification is invalid
#[pyfunction]
fn check_schema(schema: &str) -> PyResult<String> {
    let resolver = load_schema(schema)?;

    serde_json::to_string_pretty(resolver.get_all_parameters())
        .map_err(|e| PyValueError::new_err(format!("Serialization error: {}", e)))
}

/// Resolve a data record against a schema.
///
/// Args:
///     schema: JSON array of parameter specifications
///     data: JSON object to resolve
///
/// Returns:
///     JSON string of the resolved record (recognized fields only,
///     defaults applied)
///
/// Raises:
///     ValueError: "<CODE>: <message>" on the first failing check
#[pyfunction]
fn resolve(schema: &str, data: &str) -> PyResult<String> {
    let resolver = load_schema(schema)?;
    let data = parse_json(data, "data")?;

    resolver.resolve_with(&data, |result| {
        let record = result.map_err(to_py_err)?;
        serde_json::to_string(&record)
            .map_err(|e| PyValueError::new_err(format!("Serialization error: {}", e)))
    })
}

/// Look up a parameter definition.
///
/// Args:
///     schema: JSON array of parameter specifications
///     name: parameter name
///     parent: group name; when omitted the first definition with this
///         name is returned, whatever its group
///
/// Returns:
///     JSON string of the definition, or None if not found
#[pyfunction]
#[pyo3(signature = (schema, name, parent=None))]
fn get_parameter(schema: &str, name: &str, parent: Option<&str>) -> PyResult<Option<String>> {
    let resolver = load_schema(schema)?;

    let found = match parent {
        Some(group) => resolver.find_parameter(name, Some(group)),
        None => resolver.get_parameter(name),
    };

    found
        .map(|p| {
            serde_json::to_string(p)
                .map_err(|e| PyValueError::new_err(format!("Serialization error: {}", e)))
        })
        .transpose()
}

/// Parameter resolver Python module
#[pymodule]
fn param_resolver(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(check_schema, m)?)?;
    m.add_function(wrap_pyfunction!(resolve, m)?)?;
    m.add_function(wrap_pyfunction!(get_parameter, m)?)?;
    Ok(())
}
