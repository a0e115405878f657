//! Resolver Core - Declarative parameter validation
//!
//! This is the single source of truth for resolver semantics.
//! The CLI and all language bindings (Python, JavaScript, Go) compile this same core.
//!
//! # Architecture
//!
//! ```text
//! ParameterSpec → add_parameter → ordered definitions (groups first)
//!                                        ↓
//!            data record → resolve → filtered, defaulted record | first error
//! ```
//!
//! # Example
//!
//! ```
//! use resolver_core::{ParameterSpec, Resolver};
//! use serde_json::json;
//!
//! let mut resolver = Resolver::new();
//! resolver
//!     .add_parameter(ParameterSpec::required("host").kind("string"))?
//!     .add_parameter(ParameterSpec::optional("port").kind("number").default(8080))?
//!     .add_parameter(ParameterSpec::required("user").parent("auth"))?;
//!
//! let resolved = resolver.resolve(&json!({
//!     "host": "localhost",
//!     "auth": {"user": "admin", "token": "dropped"},
//!     "debug": true
//! }))?;
//!
//! assert_eq!(
//!     serde_json::Value::Object(resolved),
//!     json!({"host": "localhost", "port": 8080, "auth": {"user": "admin"}})
//! );
//! # Ok::<(), resolver_core::Error>(())
//! ```
//!
//! # Guarantees
//!
//! - **Fail-fast**: Both phases stop at the first error
//! - **All-or-nothing**: No partial record is ever returned with an error
//! - **Non-mutating**: The input record is never modified
//! - **Deterministic**: Same schema + same input = same result

pub mod error;
pub mod resolve;
pub mod schema;
pub mod types;

pub use error::{Error, Result};
pub use resolve::Record;
pub use schema::Resolver;
pub use types::{ParamType, Parameter, ParameterSpec};
