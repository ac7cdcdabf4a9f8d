//! # Validator Module
//!
//! Validators are an injected capability: the router never knows which schema
//! library produced them. Anything implementing [`Validate`] can sit on a route
//! template as its path-parameter, query, header, body or response validator.
//!
//! Two implementations ship with the crate:
//!
//! - [`SchemaValidator`] - a JSON Schema compiled once with `jsonschema`. String
//!   inputs are coerced to the declared property type (`integer`, `number`,
//!   `boolean`, `array`) before validation, so `{"id": "42"}` validates against
//!   `{"type": "integer"}` and comes back as `{"id": 42}`.
//! - [`FnValidator`] - wraps a closure, for hand-written checks.
//!
//! [`merge_validators`] implements the ancestor-to-descendant composition used when
//! flattening a declaration tree: object schemas are merged property by property
//! (the deeper declaration wins), anything else is combined with [`AllOf`].

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// A single problem reported by a validator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub location: String,
    pub kind: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(
        location: impl Into<String>,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ValidationIssue {
            location: location.into(),
            kind: kind.into(),
            message: message.into(),
        }
    }
}

/// Rejection returned by a [`Validate`] implementation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{}", format_issues(.issues))]
pub struct ValidationFailure {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationFailure {
    pub fn new(issues: Vec<ValidationIssue>) -> Self {
        Self { issues }
    }

    /// Failure carrying exactly one issue
    pub fn single(
        location: impl Into<String>,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            issues: vec![ValidationIssue::new(location, kind, message)],
        }
    }
}

fn format_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|i| format!("[{}] {}: {}", i.kind, i.location, i.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Raw value in, validated value or typed failure out
pub trait Validate: Send + Sync + fmt::Debug {
    fn validate(&self, raw: &Value) -> Result<Value, ValidationFailure>;

    /// The JSON Schema of an object-shaped validator, if it has one.
    ///
    /// Used by [`merge_validators`] to merge shared and route-level validators
    /// structurally instead of intersecting them.
    fn object_schema(&self) -> Option<&Value> {
        None
    }

    /// Where this validator's issues point (`path`, `header`, `query`, `body`), if fixed
    ///
    /// Lets [`merge_validators`] keep the location of the validators it merges.
    fn location(&self) -> Option<&str> {
        None
    }
}

/// Shared handle to a validator, as stored on route templates
pub type ValidatorRef = Arc<dyn Validate>;

/// Returned when a JSON Schema does not compile
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid JSON schema: {0}")]
pub struct SchemaError(pub String);

/// Issue location of a [`SchemaValidator`] built without [`SchemaValidator::at`]
pub const DEFAULT_LOCATION: &str = "path";

/// JSON Schema validator, compiled once at declaration time
///
/// Every issue it reports carries the validator's location, `path` unless set
/// with [`SchemaValidator::at`].
pub struct SchemaValidator {
    schema: Value,
    compiled: jsonschema::Validator,
    location: String,
}

impl SchemaValidator {
    pub fn new(schema: Value) -> Result<Self, SchemaError> {
        let compiled =
            jsonschema::validator_for(&schema).map_err(|e| SchemaError(e.to_string()))?;
        Ok(Self {
            schema,
            compiled,
            location: DEFAULT_LOCATION.to_string(),
        })
    }

    /// Compile and wrap in a [`ValidatorRef`]
    pub fn shared(schema: Value) -> Result<ValidatorRef, SchemaError> {
        Ok(Arc::new(Self::new(schema)?))
    }

    /// Compile for a given location (`header`, `query`, `body`) and wrap in a [`ValidatorRef`]
    pub fn shared_at(location: impl Into<String>, schema: Value) -> Result<ValidatorRef, SchemaError> {
        Ok(Arc::new(Self::new(schema)?.at(location)))
    }

    /// Set the location reported on issues
    #[must_use]
    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    #[must_use]
    pub fn schema(&self) -> &Value {
        &self.schema
    }

    fn is_object_schema(&self) -> bool {
        self.schema.get("type").and_then(Value::as_str) == Some("object")
            || self.schema.get("properties").is_some()
    }
}

impl fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaValidator")
            .field("schema", &self.schema)
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

impl Validate for SchemaValidator {
    fn validate(&self, raw: &Value) -> Result<Value, ValidationFailure> {
        let coerced = coerce_value(raw, Some(&self.schema));
        let issues: Vec<ValidationIssue> = self
            .compiled
            .iter_errors(&coerced)
            .map(|e| ValidationIssue::new(self.location.as_str(), "schema", e.to_string()))
            .collect();
        if issues.is_empty() {
            Ok(coerced)
        } else {
            Err(ValidationFailure::new(issues))
        }
    }

    fn object_schema(&self) -> Option<&Value> {
        self.is_object_schema().then_some(&self.schema)
    }

    fn location(&self) -> Option<&str> {
        Some(self.location.as_str())
    }
}

/// Coerce string inputs towards the types a schema declares
///
/// Values that do not parse are left as strings so the schema reports them.
fn coerce_value(value: &Value, schema: Option<&Value>) -> Value {
    match value {
        Value::Object(map) => {
            let properties = schema.and_then(|s| s.get("properties"));
            let coerced = map
                .iter()
                .map(|(k, v)| (k.clone(), coerce_value(v, properties.and_then(|p| p.get(k)))))
                .collect::<Map<String, Value>>();
            Value::Object(coerced)
        }
        Value::String(s) => decode_param_value(s, schema),
        other => other.clone(),
    }
}

fn decode_param_value(value: &str, schema: Option<&Value>) -> Value {
    fn convert_primitive(val: &str, schema: Option<&Value>) -> Value {
        match schema.and_then(|s| s.get("type").and_then(Value::as_str)) {
            Some("integer") => val
                .parse::<i64>()
                .map(Value::from)
                .unwrap_or_else(|_| Value::String(val.to_string())),
            Some("number") => val
                .parse::<f64>()
                .map(Value::from)
                .unwrap_or_else(|_| Value::String(val.to_string())),
            Some("boolean") => val
                .parse::<bool>()
                .map(Value::from)
                .unwrap_or_else(|_| Value::String(val.to_string())),
            _ => Value::String(val.to_string()),
        }
    }

    match schema.and_then(|s| s.get("type").and_then(Value::as_str)) {
        Some("array") => {
            let items_schema = schema.and_then(|s| s.get("items"));
            Value::Array(
                value
                    .split(',')
                    .filter(|s| !s.is_empty())
                    .map(|p| convert_primitive(p.trim(), items_schema))
                    .collect(),
            )
        }
        _ => convert_primitive(value, schema),
    }
}

/// Validator backed by a closure
pub struct FnValidator<F> {
    name: &'static str,
    f: F,
}

impl<F> FnValidator<F>
where
    F: Fn(&Value) -> Result<Value, ValidationFailure> + Send + Sync + 'static,
{
    pub fn new(name: &'static str, f: F) -> Self {
        Self { name, f }
    }

    pub fn shared(name: &'static str, f: F) -> ValidatorRef {
        Arc::new(Self::new(name, f))
    }
}

impl<F> fmt::Debug for FnValidator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FnValidator").field(&self.name).finish()
    }
}

impl<F> Validate for FnValidator<F>
where
    F: Fn(&Value) -> Result<Value, ValidationFailure> + Send + Sync,
{
    fn validate(&self, raw: &Value) -> Result<Value, ValidationFailure> {
        (self.f)(raw)
    }
}

/// Intersection of validators: every member sees the raw input and must accept it.
///
/// Object outputs are merged in member order (later members win on key collisions);
/// otherwise the last member's output is returned.
#[derive(Debug, Clone)]
pub struct AllOf {
    members: Vec<ValidatorRef>,
}

impl AllOf {
    pub fn new(members: Vec<ValidatorRef>) -> Self {
        Self { members }
    }
}

impl Validate for AllOf {
    fn validate(&self, raw: &Value) -> Result<Value, ValidationFailure> {
        let mut issues = Vec::new();
        let mut output: Option<Value> = None;

        for member in &self.members {
            match member.validate(raw) {
                Ok(value) => {
                    output = Some(match (output, value) {
                        (Some(Value::Object(mut acc)), Value::Object(next)) => {
                            acc.extend(next);
                            Value::Object(acc)
                        }
                        (_, next) => next,
                    });
                }
                Err(failure) => issues.extend(failure.issues),
            }
        }

        if !issues.is_empty() {
            return Err(ValidationFailure::new(issues));
        }
        Ok(output.unwrap_or_else(|| raw.clone()))
    }
}

/// Compose an ancestor's validator with a descendant's
///
/// Two object schemas merge structurally: properties are unioned with the child
/// winning on name collisions, and any other keyword the child sets overrides the
/// parent's. `required` is unioned, except that a property the child redeclares is
/// required only if the child requires it. The merged validator reports the child's
/// location. Everything else becomes an [`AllOf`].
#[must_use]
pub fn merge_validators(
    parent: Option<&ValidatorRef>,
    child: Option<&ValidatorRef>,
) -> Option<ValidatorRef> {
    match (parent, child) {
        (None, None) => None,
        (Some(v), None) | (None, Some(v)) => Some(Arc::clone(v)),
        (Some(p), Some(c)) => {
            if let (Some(ps), Some(cs)) = (p.object_schema(), c.object_schema()) {
                if let Ok(merged) = SchemaValidator::new(merge_object_schemas(ps, cs)) {
                    let location = c.location().or(p.location()).unwrap_or(DEFAULT_LOCATION);
                    return Some(Arc::new(merged.at(location)));
                }
            }
            Some(Arc::new(AllOf::new(vec![Arc::clone(p), Arc::clone(c)])))
        }
    }
}

fn merge_object_schemas(parent: &Value, child: &Value) -> Value {
    let mut merged = parent.as_object().cloned().unwrap_or_default();
    let Some(child) = child.as_object() else {
        return Value::Object(merged);
    };

    for (key, value) in child {
        match key.as_str() {
            "properties" => {
                let mut props = merged
                    .get("properties")
                    .and_then(Value::as_object)
                    .cloned()
                    .unwrap_or_default();
                if let Some(child_props) = value.as_object() {
                    props.extend(child_props.clone());
                }
                merged.insert(key.clone(), Value::Object(props));
            }
            "required" => {
                let mut required = merged
                    .get("required")
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default();
                for name in value.as_array().into_iter().flatten() {
                    if !required.contains(name) {
                        required.push(name.clone());
                    }
                }
                merged.insert(key.clone(), Value::Array(required));
            }
            _ => {
                merged.insert(key.clone(), value.clone());
            }
        }
    }

    // The child's declaration of a property decides whether it is required.
    let child_props = child.get("properties").and_then(Value::as_object);
    let child_required = child.get("required").and_then(Value::as_array);
    if let (Some(child_props), Some(Value::Array(required))) = (child_props, merged.get_mut("required")) {
        required.retain(|name| {
            let redeclared = name.as_str().is_some_and(|n| child_props.contains_key(n));
            !redeclared || child_required.is_some_and(|r| r.contains(name))
        });
        if required.is_empty() {
            merged.remove("required");
        }
    }

    Value::Object(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn id_schema() -> Value {
        json!({
            "type": "object",
            "properties": {"id": {"type": "integer"}},
            "required": ["id"]
        })
    }

    #[test]
    fn test_schema_validator_coerces_integer_params() {
        let v = SchemaValidator::new(id_schema()).unwrap();
        let out = v.validate(&json!({"id": "42"})).unwrap();
        assert_eq!(out, json!({"id": 42}));
    }

    #[test]
    fn test_schema_validator_rejects_non_numeric() {
        let v = SchemaValidator::new(id_schema()).unwrap();
        let err = v.validate(&json!({"id": "abc"})).unwrap_err();
        assert_eq!(err.issues.len(), 1);
        assert_eq!(err.issues[0].kind, "schema");
    }

    #[test]
    fn test_schema_validator_array_and_boolean() {
        let v = SchemaValidator::new(json!({
            "type": "object",
            "properties": {
                "tags": {"type": "array", "items": {"type": "integer"}},
                "flag": {"type": "boolean"}
            }
        }))
        .unwrap();
        let out = v.validate(&json!({"tags": "1,2,3", "flag": "true"})).unwrap();
        assert_eq!(out, json!({"tags": [1, 2, 3], "flag": true}));
    }

    #[test]
    fn test_invalid_schema_is_rejected() {
        assert!(SchemaValidator::new(json!({"type": 12})).is_err());
    }

    #[test]
    fn test_merge_object_schemas_child_wins() {
        let parent = SchemaValidator::shared(json!({
            "type": "object",
            "properties": {"version": {"type": "string"}, "id": {"type": "string"}},
            "required": ["version"]
        }))
        .unwrap();
        let child = SchemaValidator::shared(id_schema()).unwrap();

        let merged = merge_validators(Some(&parent), Some(&child)).unwrap();
        let schema = merged.object_schema().unwrap();
        assert_eq!(schema["properties"]["id"]["type"], "integer");
        assert_eq!(schema["properties"]["version"]["type"], "string");
        assert_eq!(schema["required"], json!(["version", "id"]));

        let out = merged.validate(&json!({"version": "v1", "id": "7"})).unwrap();
        assert_eq!(out, json!({"version": "v1", "id": 7}));
    }

    #[test]
    fn test_issue_location_comes_from_construction() {
        let path = SchemaValidator::new(id_schema()).unwrap();
        let err = path.validate(&json!({})).unwrap_err();
        assert_eq!(err.issues[0].location, DEFAULT_LOCATION);

        let header = SchemaValidator::shared_at("header", id_schema()).unwrap();
        assert_eq!(header.location(), Some("header"));
        let err = header.validate(&json!({"id": "x"})).unwrap_err();
        assert_eq!(err.issues[0].location, "header");
        assert_eq!(err.to_string().split(':').next(), Some("[schema] header"));
    }

    #[test]
    fn test_merge_keeps_child_location() {
        let parent = SchemaValidator::shared_at(
            "query",
            json!({"type": "object", "properties": {"page": {"type": "integer"}}}),
        )
        .unwrap();
        let child = SchemaValidator::shared_at("query", id_schema()).unwrap();
        let merged = merge_validators(Some(&parent), Some(&child)).unwrap();
        assert_eq!(merged.location(), Some("query"));
        let err = merged.validate(&json!({"page": "x", "id": "1"})).unwrap_err();
        assert!(err.issues.iter().all(|i| i.location == "query"));
    }

    #[test]
    fn test_child_redeclaring_property_decides_required() {
        let parent = SchemaValidator::shared(json!({
            "type": "object",
            "properties": {"id": {"type": "integer"}, "version": {"type": "string"}},
            "required": ["id", "version"]
        }))
        .unwrap();
        let optional_id = SchemaValidator::shared(json!({
            "type": "object",
            "properties": {"id": {"type": "integer"}}
        }))
        .unwrap();

        let merged = merge_validators(Some(&parent), Some(&optional_id)).unwrap();
        assert_eq!(merged.object_schema().unwrap()["required"], json!(["version"]));
        assert!(merged.validate(&json!({"version": "v1"})).is_ok());
        assert!(merged.validate(&json!({"id": "3"})).is_err());

        let relax_all = SchemaValidator::shared(json!({
            "type": "object",
            "properties": {"id": {"type": "integer"}, "version": {"type": "string"}}
        }))
        .unwrap();
        let merged = merge_validators(Some(&parent), Some(&relax_all)).unwrap();
        assert!(merged.object_schema().unwrap().get("required").is_none());
        assert_eq!(merged.validate(&json!({})).unwrap(), json!({}));
    }

    #[test]
    fn test_merge_falls_back_to_all_of() {
        let parent = FnValidator::shared("always-ok", |v: &Value| Ok(v.clone()));
        let child = FnValidator::shared("reject", |_: &Value| {
            Err(ValidationFailure::single("path", "custom", "nope"))
        });
        let merged = merge_validators(Some(&parent), Some(&child)).unwrap();
        assert!(merged.object_schema().is_none());
        let err = merged.validate(&json!({})).unwrap_err();
        assert_eq!(err.to_string(), "[custom] path: nope");
    }

    #[test]
    fn test_merge_with_one_side_missing() {
        let only = SchemaValidator::shared(id_schema()).unwrap();
        let merged = merge_validators(None, Some(&only)).unwrap();
        assert!(Arc::ptr_eq(&merged, &only));
        assert!(merge_validators(None, None).is_none());
    }
}
