//! Record resolution — walks the schema against an input record
//!
//! One synchronous algorithm ([`Resolver::resolve`]) with two thin adapters:
//! a callback form ([`Resolver::resolve_with`]) and an already-settled future
//! ([`Resolver::resolve_async`]).
//!
//! # Algorithm
//!
//! For each definition, in registration order:
//!
//! 1. Locate the candidate: `data[parent][name]`, or `data[name]` at root.
//!    A missing or non-object group yields "not present".
//! 2. Required and absent → `NoRequiredParameter`.
//! 3. Optional and absent: skip without a default, otherwise use it.
//! 4. Declared type not satisfied → `ParameterWrongType`.
//! 5. Not in the allowed values → `ParameterWrongValue`.
//! 6. Commit into the output, under the group mapping when parented.
//!
//! The first failure aborts the call. The input record is never modified.

use std::collections::HashSet;
use std::future::{ready, Ready};

use serde_json::{Map, Value};

use crate::types::Parameter;
use crate::{Error, Resolver, Result};

/// A resolved (filtered, defaulted) record
pub type Record = Map<String, Value>;

impl Resolver {
    /// Validate `data` against the registered definitions.
    ///
    /// On success returns a record holding only recognized fields, with
    /// defaults applied. Groups are rebuilt from their registered children,
    /// so unrecognized keys inside a group are dropped too.
    pub fn resolve(&self, data: &Value) -> Result<Record> {
        let result = self.resolve_record(data);
        match &result {
            Ok(record) => tracing::debug!(fields = record.len(), "resolved record"),
            Err(e) => tracing::debug!(code = e.code(), error = %e, "resolution failed"),
        }
        result
    }

    /// Callback adapter over [`Resolver::resolve`]. The callback runs exactly
    /// once, before this returns, and its return value is passed through.
    pub fn resolve_with<F, R>(&self, data: &Value, on_complete: F) -> R
    where
        F: FnOnce(Result<Record>) -> R,
    {
        on_complete(self.resolve(data))
    }

    /// Deferred adapter over [`Resolver::resolve`].
    ///
    /// Resolution runs to completion before this returns; the future is
    /// already settled and yields the same result as the synchronous call.
    pub fn resolve_async(&self, data: &Value) -> Ready<Result<Record>> {
        ready(self.resolve(data))
    }

    fn resolve_record(&self, data: &Value) -> Result<Record> {
        if self.parameters.is_empty() {
            return Err(Error::NoResolverParameters);
        }

        let input = match data {
            Value::Object(map) if !map.is_empty() => map,
            _ => return Err(Error::EmptyData),
        };

        let groups: HashSet<&str> = self
            .parameters
            .iter()
            .filter_map(|p| p.parent.as_deref())
            .collect();

        let mut output = Record::new();

        for param in &self.parameters {
            tracing::trace!(name = %param.name, parent = ?param.parent, "checking parameter");

            let value = match (candidate(input, param), &param.default) {
                (Some(value), _) => value,
                (None, _) if param.required => {
                    return Err(Error::NoRequiredParameter(param.name.clone()))
                }
                (None, Some(default)) => default,
                (None, None) => continue,
            };

            if param.kind.is_some_and(|k| !k.check(value)) {
                return Err(Error::ParameterWrongType(param.name.clone()));
            }

            if let Some(ref allowed) = param.values {
                if !allowed.iter().any(|v| same_value(v, value)) {
                    return Err(Error::ParameterWrongValue(param.name.clone()));
                }
            }

            let committed = if param.is_root() && groups.contains(param.name.as_str()) {
                Value::Object(Record::new())
            } else {
                value.clone()
            };
            commit(&mut output, param, committed);
        }

        Ok(output)
    }
}

fn candidate<'a>(input: &'a Record, param: &Parameter) -> Option<&'a Value> {
    match param.parent {
        Some(ref group) => input
            .get(group)
            .and_then(Value::as_object)
            .and_then(|members| members.get(&param.name)),
        None => input.get(&param.name),
    }
}

/// Membership equality for allowed values. Numbers compare by numeric
/// value, so `1` and `1.0` match; everything else uses `Value` equality.
fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            if let (Some(x), Some(y)) = (x.as_i64(), y.as_i64()) {
                x == y
            } else if let (Some(x), Some(y)) = (x.as_u64(), y.as_u64()) {
                x == y
            } else {
                x.as_f64() == y.as_f64()
            }
        }
        _ => a == b,
    }
}

fn commit(output: &mut Record, param: &Parameter, value: Value) {
    match param.parent {
        Some(ref group) => {
            let slot = output
                .entry(group.clone())
                .or_insert_with(|| Value::Object(Record::new()));
            if let Value::Object(members) = slot {
                members.insert(param.name.clone(), value);
            }
        }
        None => {
            output.insert(param.name.clone(), value);
        }
    }
}

// ── Tests ─────────────────────────────────────────────────
