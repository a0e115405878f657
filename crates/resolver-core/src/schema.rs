//! Schema registration — the definition phase
//!
//! Definitions are validated fail-fast as they are added and appended to an
//! ordered collection. Referencing a parent either coerces an existing root
//! definition into a group or synthesizes an implicit group definition at the
//! front of the collection, so a group is always visited before its children
//! during resolution.
//!
//! # Validation Order
//!
//! 1. Shape (`name` non-empty) → `ParameterNotValid`
//! 2. Type tag → `InvalidType`
//! 3. Default → `DefaultOnRequired`, `DefaultTypeMismatch`
//! 4. Allowed values → `ValuesNotArray`, `ValuesEmpty`
//! 5. Parent name → `EmptyParentName`
//! 6. `(name, parent)` uniqueness → `DuplicateParameter`
//! 7. Parent linkage → `ParentTypeConflict`
//!
//! No state is touched until every check has passed.

use serde_json::Value;

use crate::types::{ParamType, Parameter, ParameterSpec};
use crate::{Error, Result};

/// Ordered collection of parameter definitions
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    pub(crate) parameters: Vec<Parameter>,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a resolver from a sequence of specifications, stopping at the
    /// first invalid one.
    pub fn from_specs<I>(specs: I) -> Result<Self>
    where
        I: IntoIterator<Item = ParameterSpec>,
    {
        let mut resolver = Self::new();
        for spec in specs {
            resolver.add_parameter(spec)?;
        }
        Ok(resolver)
    }

    /// Build a resolver from a JSON array of specification objects.
    pub fn from_json(schema: &Value) -> Result<Self> {
        let docs = schema.as_array().ok_or(Error::ParameterNotValid)?;
        let mut resolver = Self::new();
        for doc in docs {
            resolver.add_parameter(ParameterSpec::from_json(doc)?)?;
        }
        Ok(resolver)
    }

    /// Validate and register a parameter definition.
    ///
    /// Returns `&mut Self` so registrations can be chained with `?`.
    pub fn add_parameter(&mut self, spec: ParameterSpec) -> Result<&mut Self> {
        if spec.name.is_empty() {
            return Err(Error::ParameterNotValid);
        }

        let kind = spec.kind.as_ref().map(parse_type_tag).transpose()?;

        if let Some(ref default) = spec.default {
            if spec.required {
                return Err(Error::DefaultOnRequired);
            }
            if kind.is_some_and(|k| !k.check(default)) {
                return Err(Error::DefaultTypeMismatch);
            }
        }

        let values = match spec.values {
            Some(Value::Array(values)) if values.is_empty() => return Err(Error::ValuesEmpty),
            Some(Value::Array(values)) => Some(values),
            Some(_) => return Err(Error::ValuesNotArray),
            None => None,
        };

        let parent = match spec.parent {
            Some(Value::String(p)) if !p.is_empty() => Some(p),
            Some(_) => return Err(Error::EmptyParentName),
            None => None,
        };

        if self.find_parameter(&spec.name, parent.as_deref()).is_some() {
            return Err(Error::DuplicateParameter {
                name: spec.name,
                parent,
            });
        }

        if let Some(ref group) = parent {
            self.link_parent(group)?;
        }

        tracing::debug!(
            name = %spec.name,
            parent = parent.as_deref().unwrap_or("-"),
            required = spec.required,
            "registered parameter"
        );

        self.parameters.push(Parameter {
            name: spec.name,
            required: spec.required,
            parent,
            kind,
            default: spec.default,
            values,
        });

        Ok(self)
    }

    /// First definition named `name`, whatever its scope.
    ///
    /// May return a nested definition even when a root-scope one of the same
    /// name exists; use [`Resolver::find_parameter`] to pin the scope.
    pub fn get_parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Definition named `name` under `parent` (`None` for root scope).
    pub fn find_parameter(&self, name: &str, parent: Option<&str>) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.matches(name, parent))
    }

    /// All definitions in iteration order, groups ahead of their children
    pub fn get_all_parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Make `group` usable as a parent: coerce an existing root definition
    /// into a required object, or synthesize one at the front.
    fn link_parent(&mut self, group: &str) -> Result<()> {
        match self.parameters.iter_mut().find(|p| p.matches(group, None)) {
            Some(existing) => {
                if let Some(found) = existing.kind.filter(|k| *k != ParamType::Object) {
                    return Err(Error::ParentTypeConflict {
                        parent: group.to_string(),
                        found: found.to_string(),
                    });
                }
                tracing::debug!(group, "coerced parameter into required group");
                existing.kind = Some(ParamType::Object);
                existing.required = true;
                existing.default = None;
            }
            None => {
                tracing::debug!(group, "synthesized implicit group");
                self.parameters.insert(0, Parameter::group(group));
            }
        }
        Ok(())
    }
}

fn parse_type_tag(tag: &Value) -> Result<ParamType> {
    match tag {
        Value::String(s) => s.parse(),
        other => Err(Error::InvalidType(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn add_json(resolver: &mut Resolver, doc: Value) -> Result<()> {
        resolver.add_parameter(ParameterSpec::from_json(&doc)?)?;
        Ok(())
    }

    fn names(resolver: &Resolver) -> Vec<(String, Option<String>)> {
        resolver
            .get_all_parameters()
            .iter()
            .map(|p| (p.name.clone(), p.parent.clone()))
            .collect()
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut resolver = Resolver::new();
        assert_eq!(
            resolver.add_parameter(ParameterSpec::required("")).unwrap_err(),
            Error::ParameterNotValid
        );
        assert!(resolver.is_empty());
    }

    #[test]
    fn test_null_default_on_object_type() {
        let mut resolver = Resolver::new();
        let err = resolver
            .add_parameter(ParameterSpec::optional("opts").kind("object").default(Value::Null))
            .unwrap_err();
        assert_eq!(err, Error::DefaultTypeMismatch);
    }

    #[test]
    fn test_invalid_type_tag() {
        let mut resolver = Resolver::new();
        let err = add_json(
            &mut resolver,
            json!({"name": "param", "required": true, "type": "wrongtype"}),
        )
        .unwrap_err();
        assert_eq!(err, Error::InvalidType("wrongtype".into()));
        assert_eq!(err.to_string(), "Resolver error: wrong type \"wrongtype\"");
        assert!(resolver.is_empty());
    }

    #[test]
    fn test_non_string_type_tag() {
        let mut resolver = Resolver::new();
        let err = add_json(&mut resolver, json!({"name": "p", "required": true, "type": 5}))
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_TYPE");
    }

    #[test]
    fn test_default_on_required() {
        let mut resolver = Resolver::new();
        let err = resolver
            .add_parameter(ParameterSpec::required("param").default("default value"))
            .unwrap_err();
        assert_eq!(err, Error::DefaultOnRequired);
    }

    #[test]
    fn test_default_type_mismatch() {
        let mut resolver = Resolver::new();
        let err = resolver
            .add_parameter(
                ParameterSpec::optional("param")
                    .kind("number")
                    .default("default value"),
            )
            .unwrap_err();
        assert_eq!(err, Error::DefaultTypeMismatch);
    }

    #[test]
    fn test_default_without_type_is_accepted() {
        let mut resolver = Resolver::new();
        resolver
            .add_parameter(ParameterSpec::optional("p").default(json!({"any": "thing"})))
            .unwrap();
        assert_eq!(
            resolver.get_parameter("p").unwrap().default,
            Some(json!({"any": "thing"}))
        );
    }

    #[test]
    fn test_values_validation() {
        let mut resolver = Resolver::new();
        assert_eq!(
            add_json(
                &mut resolver,
                json!({"name": "param", "required": true, "values": "not an array"})
            ),
            Err(Error::ValuesNotArray)
        );
        assert_eq!(
            add_json(&mut resolver, json!({"name": "param", "required": true, "values": []})),
            Err(Error::ValuesEmpty)
        );
    }

    #[test]
    fn test_empty_parent_name() {
        let mut resolver = Resolver::new();
        assert_eq!(
            add_json(&mut resolver, json!({"name": "p", "required": true, "parent": ""})),
            Err(Error::EmptyParentName)
        );
        assert_eq!(
            add_json(&mut resolver, json!({"name": "p", "required": true, "parent": 7})),
            Err(Error::EmptyParentName)
        );
    }

    #[test]
    fn test_parent_type_conflict() {
        let mut resolver = Resolver::new();
        resolver
            .add_parameter(ParameterSpec::required("oldParam").kind("number"))
            .unwrap();
        let err = resolver
            .add_parameter(ParameterSpec::required("child").parent("oldParam"))
            .unwrap_err();
        assert_eq!(
            err,
            Error::ParentTypeConflict {
                parent: "oldParam".into(),
                found: "number".into()
            }
        );
        assert_eq!(resolver.len(), 1);
    }

    #[test]
    fn test_stored_definition_has_supplied_fields_only() {
        let mut resolver = Resolver::new();
        add_json(
            &mut resolver,
            json!({"name": "param3", "required": true, "some": 1, "awesome": true}),
        )
        .unwrap();
        let stored = serde_json::to_value(resolver.get_parameter("param3").unwrap()).unwrap();
        assert_eq!(
            stored,
            json!({"name": "param3", "required": true, "parent": null})
        );
    }

    #[test]
    fn test_chained_registration() {
        let mut resolver = Resolver::new();
        resolver
            .add_parameter(ParameterSpec::required("param1"))
            .and_then(|r| r.add_parameter(ParameterSpec::optional("param2")))
            .unwrap();
        assert_eq!(resolver.len(), 2);
    }

    #[test]
    fn test_synthesizes_missing_parent_ahead_of_child() {
        let mut resolver = Resolver::new();
        resolver
            .add_parameter(ParameterSpec::required("a").parent("g"))
            .unwrap();

        let all = resolver.get_all_parameters();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0], Parameter::group("g"));
        assert_eq!(all[1].name, "a");
        assert_eq!(all[1].parent.as_deref(), Some("g"));
    }

    #[test]
    fn test_latest_synthesized_group_goes_first() {
        let mut resolver = Resolver::new();
        resolver
            .add_parameter(ParameterSpec::required("param1").parent("parent1"))
            .unwrap()
            .add_parameter(ParameterSpec::required("param1").parent("parent2"))
            .unwrap();

        assert_eq!(
            names(&resolver),
            vec![
                ("parent2".to_string(), None),
                ("parent1".to_string(), None),
                ("param1".to_string(), Some("parent1".to_string())),
                ("param1".to_string(), Some("parent2".to_string())),
            ]
        );
    }

    #[test]
    fn test_shared_parent_is_synthesized_once() {
        let mut resolver = Resolver::new();
        resolver
            .add_parameter(ParameterSpec::required("param1").parent("parent"))
            .unwrap()
            .add_parameter(ParameterSpec::required("param2").parent("parent"))
            .unwrap();

        assert_eq!(
            names(&resolver),
            vec![
                ("parent".to_string(), None),
                ("param1".to_string(), Some("parent".to_string())),
                ("param2".to_string(), Some("parent".to_string())),
            ]
        );
    }

    #[test]
    fn test_existing_parent_is_coerced_to_required_group() {
        let mut resolver = Resolver::new();
        resolver
            .add_parameter(ParameterSpec::optional("g").default(json!({})))
            .unwrap()
            .add_parameter(ParameterSpec::optional("a").parent("g"))
            .unwrap();

        let g = resolver.find_parameter("g", None).unwrap();
        assert!(g.required);
        assert_eq!(g.kind, Some(ParamType::Object));
        assert_eq!(g.default, None);
        assert_eq!(resolver.len(), 2);
    }

    #[test]
    fn test_redeclaring_synthesized_parent_fails() {
        let mut resolver = Resolver::new();
        resolver
            .add_parameter(ParameterSpec::required("param1").parent("parent"))
            .unwrap();
        let err = add_json(
            &mut resolver,
            json!({"name": "parent", "required": true, "parent": null}),
        )
        .unwrap_err();
        assert_eq!(
            err,
            Error::DuplicateParameter {
                name: "parent".into(),
                parent: None
            }
        );
    }

    #[test]
    fn test_duplicate_detected_before_parent_side_effects() {
        let mut resolver = Resolver::new();
        resolver
            .add_parameter(ParameterSpec::required("a").parent("g"))
            .unwrap();
        let before = resolver.get_all_parameters().to_vec();
        assert!(resolver
            .add_parameter(ParameterSpec::required("a").parent("g"))
            .is_err());
        assert_eq!(resolver.get_all_parameters(), before.as_slice());
    }

    #[test]
    fn test_self_parent_does_not_link_to_itself() {
        let mut resolver = Resolver::new();
        resolver
            .add_parameter(ParameterSpec::required("g").parent("g"))
            .unwrap();
        assert_eq!(
            names(&resolver),
            vec![
                ("g".to_string(), None),
                ("g".to_string(), Some("g".to_string())),
            ]
        );
    }

    #[test]
    fn test_get_parameter_lookups() {
        let mut resolver = Resolver::new();
        assert!(resolver.get_parameter("some_parameter").is_none());

        resolver
            .add_parameter(ParameterSpec::required("param1"))
            .unwrap()
            .add_parameter(ParameterSpec::required("param3"))
            .unwrap()
            .add_parameter(ParameterSpec::optional("param3").parent("parent"))
            .unwrap();

        assert!(resolver.get_parameter("absent parameter").is_none());
        assert!(resolver.find_parameter("param1", Some("parent")).is_none());

        let nested = resolver.find_parameter("param3", Some("parent")).unwrap();
        assert!(!nested.required);
        assert_eq!(nested.parent.as_deref(), Some("parent"));

        let root = resolver.find_parameter("param3", None).unwrap();
        assert!(root.required);
    }

    #[test]
    fn test_get_parameter_without_parent_returns_first_match() {
        let mut resolver = Resolver::new();
        resolver
            .add_parameter(ParameterSpec::optional("x").parent("g"))
            .unwrap()
            .add_parameter(ParameterSpec::required("x"))
            .unwrap();
        let first = resolver.get_parameter("x").unwrap();
        assert_eq!(first.parent.as_deref(), Some("g"));
    }

    #[test]
    fn test_from_json_schema() {
        let resolver = Resolver::from_json(&json!([
            {"name": "host", "required": true, "type": "string"},
            {"name": "port", "required": false, "type": "number", "default": 8080},
            {"name": "user", "required": true, "parent": "auth"}
        ]))
        .unwrap();
        assert_eq!(resolver.len(), 4);
        assert_eq!(resolver.get_all_parameters()[0].name, "auth");

        assert_eq!(
            Resolver::from_json(&json!({"name": "host"})).unwrap_err(),
            Error::ParameterNotValid
        );
        assert_eq!(
            Resolver::from_json(&json!([{"name": "p", "required": true, "values": []}]))
                .unwrap_err(),
            Error::ValuesEmpty
        );
    }
}
