//! Parameter definition types
//!
//! [`ParameterSpec`] is the intake form handed to
//! [`Resolver::add_parameter`](crate::Resolver::add_parameter). It keeps the
//! loosely-typed fields (`type`, `values`, `parent`) raw so the resolver can
//! report the right error kind for each. [`Parameter`] is the validated,
//! stored definition.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result};

// ── Type Tags ─────────────────────────────────────────────

/// The five recognized type tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Boolean,
    Number,
    Object,
    Array,
}

impl ParamType {
    pub const ALL: [ParamType; 5] = [
        ParamType::String,
        ParamType::Boolean,
        ParamType::Number,
        ParamType::Object,
        ParamType::Array,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Boolean => "boolean",
            ParamType::Number => "number",
            ParamType::Object => "object",
            ParamType::Array => "array",
        }
    }

    /// Type-check rule: `array` accepts a sequence, every other tag
    /// requires the value's kind to be exactly that tag. No coercion;
    /// `null` satisfies nothing, not even `object`, so a `null` default on
    /// an object-typed parameter is a `DefaultTypeMismatch`.
    pub fn check(&self, value: &Value) -> bool {
        match self {
            ParamType::String => value.is_string(),
            ParamType::Boolean => value.is_boolean(),
            ParamType::Number => value.is_number(),
            ParamType::Object => value.is_object(),
            ParamType::Array => value.is_array(),
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParamType {
    type Err = Error;

    fn from_str(tag: &str) -> Result<Self> {
        ParamType::ALL
            .into_iter()
            .find(|t| t.as_str() == tag)
            .ok_or_else(|| Error::InvalidType(tag.to_string()))
    }
}

// ── Intake Form ───────────────────────────────────────────

/// A parameter specification as submitted by the caller.
///
/// `kind`, `values` and `parent` are kept as raw JSON so malformed input
/// can be carried through to [`Resolver::add_parameter`](crate::Resolver::add_parameter)
/// and rejected there with its own error kind.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    pub name: String,
    pub required: bool,
    pub kind: Option<Value>,
    pub default: Option<Value>,
    pub values: Option<Value>,
    pub parent: Option<Value>,
}

impl ParameterSpec {
    pub fn new(name: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            required,
            kind: None,
            default: None,
            values: None,
            parent: None,
        }
    }

    pub fn required(name: impl Into<String>) -> Self {
        Self::new(name, true)
    }

    pub fn optional(name: impl Into<String>) -> Self {
        Self::new(name, false)
    }

    /// Set the type tag (validated on registration)
    pub fn kind(mut self, tag: &str) -> Self {
        self.kind = Some(Value::String(tag.to_string()));
        self
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Set the allowed-values list (must be a non-empty array on registration)
    pub fn values(mut self, values: impl Into<Value>) -> Self {
        self.values = Some(values.into());
        self
    }

    pub fn parent(mut self, parent: &str) -> Self {
        self.parent = Some(Value::String(parent.to_string()));
        self
    }

    /// Parse a specification from a dynamic JSON document.
    ///
    /// Only the structural shape is checked here: the document must be an
    /// object with a non-empty string `name` and a boolean `required`.
    /// Unknown keys are ignored. Key presence is preserved, so
    /// `"default": null` configures a null default while `"parent": null`
    /// means root scope.
    pub fn from_json(doc: &Value) -> Result<Self> {
        let map = doc.as_object().ok_or(Error::ParameterNotValid)?;

        let name = match map.get("name") {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            _ => return Err(Error::ParameterNotValid),
        };
        let required = match map.get("required") {
            Some(Value::Bool(b)) => *b,
            _ => return Err(Error::ParameterNotValid),
        };

        Ok(Self {
            name,
            required,
            kind: map.get("type").cloned(),
            default: map.get("default").cloned(),
            values: map.get("values").cloned(),
            parent: map.get("parent").filter(|p| !p.is_null()).cloned(),
        })
    }
}

// ── Stored Definition ─────────────────────────────────────

/// A registered parameter definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub required: bool,
    /// Grouping key; always serialized, `null` at root scope
    pub parent: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ParamType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<Value>>,
}

impl Parameter {
    /// Implicit group definition synthesized for an undeclared parent
    pub(crate) fn group(name: &str) -> Self {
        Self {
            name: name.to_string(),
            required: true,
            parent: None,
            kind: Some(ParamType::Object),
            default: None,
            values: None,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub(crate) fn matches(&self, name: &str, parent: Option<&str>) -> bool {
        self.name == name && self.parent.as_deref() == parent
    }
}
