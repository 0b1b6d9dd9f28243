//! Schema compilation and evaluation
//!
//! `compile` rejects malformed descriptors up front (undeclared required
//! fields, inverted bounds, empty enums, bad regexes, constraints attached to
//! the wrong kind). The resulting validator is immutable, `Send + Sync`, and
//! evaluation never fails: every problem becomes a [`Violation`].

use std::fmt;

use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use super::node::{
    AdditionalProperties, ArraySchema, ObjectSchema, PrimitiveKind, PrimitiveSchema, SchemaNode,
};
use super::verdict::{describe_value, type_name, Constraint, ValidationVerdict, Violation};

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("{path}: required field '{field}' is not declared in properties")]
    UnknownRequired { path: String, field: String },

    #[error("{path}: property '{field}' is declared twice")]
    DuplicateProperty { path: String, field: String },

    #[error("{path}: {constraint} lower bound {min} exceeds upper bound {max}")]
    InvalidBounds {
        path: String,
        constraint: &'static str,
        min: String,
        max: String,
    },

    #[error("{path}: enum has no values")]
    EmptyEnum { path: String },

    #[error("{path}: invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        path: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("{path}: {constraint} does not apply to {kind} values")]
    ConstraintMismatch {
        path: String,
        constraint: &'static str,
        kind: &'static str,
    },
}

#[derive(Debug)]
enum CompiledNode {
    Any,
    Primitive(CompiledPrimitive),
    Enum(Vec<Value>),
    Object(CompiledObject),
    Array(CompiledArray),
}

#[derive(Debug)]
struct CompiledPrimitive {
    kind: PrimitiveKind,
    min_length: Option<usize>,
    max_length: Option<usize>,
    minimum: Option<f64>,
    maximum: Option<f64>,
    pattern: Option<Regex>,
}

#[derive(Debug)]
struct CompiledObject {
    properties: Vec<(String, CompiledNode)>,
    required: Vec<String>,
    additional: CompiledAdditional,
}

#[derive(Debug)]
enum CompiledAdditional {
    Allow,
    Deny,
    Schema(Box<CompiledNode>),
}

#[derive(Debug)]
struct CompiledArray {
    items: Option<Box<CompiledNode>>,
    min_items: Option<usize>,
    max_items: Option<usize>,
}

/// Reusable validator produced by [`compile`]
#[derive(Debug)]
pub struct CompiledValidator {
    root: CompiledNode,
}

/// Check a descriptor and build its validator
pub fn compile(schema: impl Into<SchemaNode>) -> Result<CompiledValidator, SchemaError> {
    let node = schema.into();
    let root = compile_node(&node, "")?;
    Ok(CompiledValidator { root })
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "(root)".to_string()
    } else {
        path.to_string()
    }
}

fn child_path(parent: &str, field: &str) -> String {
    if parent.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", parent, field)
    }
}

fn compile_node(node: &SchemaNode, path: &str) -> Result<CompiledNode, SchemaError> {
    match node {
        SchemaNode::Any => Ok(CompiledNode::Any),
        SchemaNode::Primitive(p) => compile_primitive(p, path).map(CompiledNode::Primitive),
        SchemaNode::Enum(values) => {
            if values.is_empty() {
                return Err(SchemaError::EmptyEnum {
                    path: display_path(path),
                });
            }
            Ok(CompiledNode::Enum(values.clone()))
        }
        SchemaNode::Object(o) => compile_object(o, path).map(CompiledNode::Object),
        SchemaNode::Array(a) => compile_array(a, path).map(CompiledNode::Array),
    }
}

fn compile_primitive(schema: &PrimitiveSchema, path: &str) -> Result<CompiledPrimitive, SchemaError> {
    let c = &schema.constraints;
    let is_string = schema.kind == PrimitiveKind::String;
    let is_numeric = matches!(schema.kind, PrimitiveKind::Number | PrimitiveKind::Integer);

    let mismatch = |constraint: &'static str| SchemaError::ConstraintMismatch {
        path: display_path(path),
        constraint,
        kind: schema.kind.name(),
    };

    if !is_string {
        if c.min_length.is_some() {
            return Err(mismatch("minLength"));
        }
        if c.max_length.is_some() {
            return Err(mismatch("maxLength"));
        }
        if c.pattern.is_some() {
            return Err(mismatch("pattern"));
        }
    }
    if !is_numeric {
        if c.minimum.is_some() {
            return Err(mismatch("minimum"));
        }
        if c.maximum.is_some() {
            return Err(mismatch("maximum"));
        }
    }

    if let (Some(min), Some(max)) = (c.min_length, c.max_length) {
        if min > max {
            return Err(SchemaError::InvalidBounds {
                path: display_path(path),
                constraint: "length",
                min: min.to_string(),
                max: max.to_string(),
            });
        }
    }
    if let (Some(min), Some(max)) = (c.minimum, c.maximum) {
        if min > max {
            return Err(SchemaError::InvalidBounds {
                path: display_path(path),
                constraint: "numeric",
                min: min.to_string(),
                max: max.to_string(),
            });
        }
    }

    let pattern = match &c.pattern {
        Some(p) => Some(Regex::new(p).map_err(|source| SchemaError::InvalidPattern {
            path: display_path(path),
            pattern: p.clone(),
            source,
        })?),
        None => None,
    };

    Ok(CompiledPrimitive {
        kind: schema.kind,
        min_length: c.min_length,
        max_length: c.max_length,
        minimum: c.minimum,
        maximum: c.maximum,
        pattern,
    })
}

fn compile_object(schema: &ObjectSchema, path: &str) -> Result<CompiledObject, SchemaError> {
    let mut properties = Vec::with_capacity(schema.properties.len());
    for (name, node) in &schema.properties {
        if properties.iter().any(|(n, _): &(String, CompiledNode)| n == name) {
            return Err(SchemaError::DuplicateProperty {
                path: display_path(path),
                field: name.clone(),
            });
        }
        properties.push((name.clone(), compile_node(node, &child_path(path, name))?));
    }

    for field in &schema.required {
        if schema.property(field).is_none() {
            return Err(SchemaError::UnknownRequired {
                path: display_path(path),
                field: field.clone(),
            });
        }
    }

    let additional = match &schema.additional {
        AdditionalProperties::Allow => CompiledAdditional::Allow,
        AdditionalProperties::Deny => CompiledAdditional::Deny,
        AdditionalProperties::Schema(node) => {
            CompiledAdditional::Schema(Box::new(compile_node(node, &child_path(path, "*"))?))
        }
    };

    Ok(CompiledObject {
        properties,
        required: schema.required.clone(),
        additional,
    })
}

fn compile_array(schema: &ArraySchema, path: &str) -> Result<CompiledArray, SchemaError> {
    if let (Some(min), Some(max)) = (schema.min_items, schema.max_items) {
        if min > max {
            return Err(SchemaError::InvalidBounds {
                path: display_path(path),
                constraint: "items",
                min: min.to_string(),
                max: max.to_string(),
            });
        }
    }
    let items = match &schema.items {
        Some(node) => Some(Box::new(compile_node(node, &format!("{}[]", path))?)),
        None => None,
    };
    Ok(CompiledArray {
        items,
        min_items: schema.min_items,
        max_items: schema.max_items,
    })
}

#[derive(Debug, Clone)]
enum Segment<'a> {
    Key(&'a str),
    Index(usize),
}

/// Location of the value currently being visited
#[derive(Debug, Default)]
struct JsonPath<'a> {
    segments: Vec<Segment<'a>>,
}

impl<'a> JsonPath<'a> {
    fn push(&mut self, segment: Segment<'a>) {
        self.segments.push(segment);
    }

    fn pop(&mut self) {
        self.segments.pop();
    }

    fn with_key(&self, key: &str) -> String {
        let base = self.to_string();
        child_path(&base, key)
    }
}

impl fmt::Display for JsonPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.segments.iter().enumerate() {
            match seg {
                Segment::Key(k) if i == 0 => write!(f, "{}", k)?,
                Segment::Key(k) => write!(f, ".{}", k)?,
                Segment::Index(idx) => write!(f, "[{}]", idx)?,
            }
        }
        Ok(())
    }
}

impl CompiledValidator {
    /// Evaluate `value`, collecting every violation
    pub fn validate(&self, value: &Value) -> ValidationVerdict {
        let mut violations = Vec::new();
        let mut path = JsonPath::default();
        visit(&self.root, value, &mut path, &mut violations);
        ValidationVerdict::from_violations(violations)
    }

    pub fn is_valid(&self, value: &Value) -> bool {
        self.validate(value).is_valid()
    }
}

fn visit<'a>(node: &CompiledNode, value: &'a Value, path: &mut JsonPath<'a>, out: &mut Vec<Violation>) {
    match node {
        CompiledNode::Any => {}
        CompiledNode::Primitive(p) => visit_primitive(p, value, path, out),
        CompiledNode::Enum(allowed) => {
            if !allowed.contains(value) {
                out.push(Violation::new(
                    path.to_string(),
                    Constraint::Enum {
                        allowed: allowed.clone(),
                    },
                    describe_value(value),
                ));
            }
        }
        CompiledNode::Object(o) => visit_object(o, value, path, out),
        CompiledNode::Array(a) => visit_array(a, value, path, out),
    }
}

fn type_violation(expected: &str, value: &Value, path: &JsonPath<'_>) -> Violation {
    Violation::new(
        path.to_string(),
        Constraint::Type {
            expected: expected.to_string(),
        },
        format!("{} {}", type_name(value), describe_value(value)),
    )
}

fn is_integer(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0),
        _ => false,
    }
}

fn visit_primitive(p: &CompiledPrimitive, value: &Value, path: &JsonPath<'_>, out: &mut Vec<Violation>) {
    let type_ok = match p.kind {
        PrimitiveKind::String => value.is_string(),
        PrimitiveKind::Number => value.is_number(),
        PrimitiveKind::Integer => is_integer(value),
        PrimitiveKind::Boolean => value.is_boolean(),
        PrimitiveKind::Null => value.is_null(),
    };
    if !type_ok {
        out.push(type_violation(p.kind.name(), value, path));
        return;
    }

    if let Value::String(s) = value {
        let len = s.chars().count();
        if let Some(min) = p.min_length {
            if len < min {
                out.push(Violation::new(
                    path.to_string(),
                    Constraint::MinLength { limit: min },
                    describe_value(value),
                ));
            }
        }
        if let Some(max) = p.max_length {
            if len > max {
                out.push(Violation::new(
                    path.to_string(),
                    Constraint::MaxLength { limit: max },
                    describe_value(value),
                ));
            }
        }
        if let Some(re) = &p.pattern {
            if !re.is_match(s) {
                out.push(Violation::new(
                    path.to_string(),
                    Constraint::Pattern {
                        pattern: re.as_str().to_string(),
                    },
                    describe_value(value),
                ));
            }
        }
    }

    if let Some(n) = value.as_f64() {
        if let Some(min) = p.minimum {
            if n < min {
                out.push(Violation::new(
                    path.to_string(),
                    Constraint::Minimum { limit: min },
                    describe_value(value),
                ));
            }
        }
        if let Some(max) = p.maximum {
            if n > max {
                out.push(Violation::new(
                    path.to_string(),
                    Constraint::Maximum { limit: max },
                    describe_value(value),
                ));
            }
        }
    }
}

fn visit_object<'a>(o: &CompiledObject, value: &'a Value, path: &mut JsonPath<'a>, out: &mut Vec<Violation>) {
    let Value::Object(map) = value else {
        out.push(type_violation("object", value, path));
        return;
    };

    for field in &o.required {
        if !map.contains_key(field) {
            out.push(Violation::new(path.with_key(field), Constraint::Required, "absent"));
        }
    }

    for (name, child) in &o.properties {
        if let Some((key, child_value)) = map.get_key_value(name) {
            path.push(Segment::Key(key.as_str()));
            visit(child, child_value, path, out);
            path.pop();
        }
    }

    if matches!(o.additional, CompiledAdditional::Allow) {
        return;
    }
    for (key, child_value) in map {
        if o.properties.iter().any(|(n, _)| n == key) {
            continue;
        }
        match &o.additional {
            CompiledAdditional::Deny => out.push(Violation::new(
                path.with_key(key),
                Constraint::AdditionalProperty,
                describe_value(child_value),
            )),
            CompiledAdditional::Schema(schema) => {
                path.push(Segment::Key(key.as_str()));
                visit(schema, child_value, path, out);
                path.pop();
            }
            CompiledAdditional::Allow => {}
        }
    }
}

fn visit_array<'a>(a: &CompiledArray, value: &'a Value, path: &mut JsonPath<'a>, out: &mut Vec<Violation>) {
    let Value::Array(items) = value else {
        out.push(type_violation("array", value, path));
        return;
    };

    if let Some(min) = a.min_items {
        if items.len() < min {
            out.push(Violation::new(
                path.to_string(),
                Constraint::MinItems { limit: min },
                format!("{} items", items.len()),
            ));
        }
    }
    if let Some(max) = a.max_items {
        if items.len() > max {
            out.push(Violation::new(
                path.to_string(),
                Constraint::MaxItems { limit: max },
                format!("{} items", items.len()),
            ));
        }
    }

    if let Some(schema) = &a.items {
        for (i, item) in items.iter().enumerate() {
            path.push(Segment::Index(i));
            visit(schema, item, path, out);
            path.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn token_schema() -> SchemaNode {
        SchemaNode::object()
            .field("symbol", SchemaNode::string().min_length(1))
            .field("decimals", SchemaNode::number().minimum(0.0).maximum(18.0))
            .required(["symbol", "decimals"])
            .into()
    }

    #[test]
    fn test_valid_payload_has_no_violations() {
        let validator = compile(token_schema()).unwrap();
        let verdict = validator.validate(&json!({"symbol": "USDC", "decimals": 6, "extra": true}));
        assert!(verdict.is_valid(), "{}", verdict.error_text());
    }

    #[test]
    fn test_each_independent_violation_is_counted() {
        let validator = compile(token_schema()).unwrap();
        // empty symbol + decimals out of range
        let verdict = validator.validate(&json!({"symbol": "", "decimals": 24}));
        assert_eq!(verdict.violations().len(), 2);

        // two required fields missing
        let verdict = validator.validate(&json!({}));
        assert_eq!(verdict.violations().len(), 2);
        assert!(verdict.violations().iter().all(|v| v.constraint == Constraint::Required));
        assert_eq!(verdict.violations()[0].path, "symbol");
    }

    #[test]
    fn test_type_mismatch_stops_descent() {
        let validator = compile(token_schema()).unwrap();
        let verdict = validator.validate(&json!(["not", "an", "object"]));
        assert_eq!(verdict.violations().len(), 1);
        assert!(matches!(verdict.violations()[0].constraint, Constraint::Type { .. }));
        assert_eq!(verdict.violations()[0].path, "");
    }

    #[test]
    fn test_nested_array_paths() {
        let schema = SchemaNode::object().field(
            "estimate",
            SchemaNode::object().field(
                "gasCosts",
                SchemaNode::array_of(SchemaNode::object().field("token", token_schema())),
            ),
        );
        let validator = compile(schema).unwrap();
        let payload = json!({"estimate": {"gasCosts": [
            {"token": {"symbol": "ETH", "decimals": 18}},
            {"token": {"symbol": "ETH", "decimals": 19}}
        ]}});
        let verdict = validator.validate(&payload);
        assert_eq!(verdict.violations().len(), 1);
        assert_eq!(verdict.violations()[0].path, "estimate.gasCosts[1].token.decimals");
        assert!(verdict.error_text().contains("must be <= 18"));
    }

    #[test]
    fn test_additional_properties_policies() {
        let strict = compile(SchemaNode::object().field("a", SchemaNode::any()).deny_unknown()).unwrap();
        let verdict = strict.validate(&json!({"a": 1, "b": 2, "c": 3}));
        assert_eq!(verdict.violations().len(), 2);
        assert_eq!(verdict.violations()[0].path, "b");

        let map = compile(SchemaNode::map_of(SchemaNode::array_of(token_schema()))).unwrap();
        assert!(map.is_valid(&json!({"1": [{"symbol": "ETH", "decimals": 18}], "137": []})));
        let verdict = map.validate(&json!({"1": [{"symbol": "ETH"}], "56": "oops"}));
        assert_eq!(verdict.violations().len(), 2);
        assert_eq!(verdict.violations()[0].path, "1[0].decimals");
        assert_eq!(verdict.violations()[1].path, "56");
    }

    #[test]
    fn test_enum_and_pattern() {
        let schema = SchemaNode::object()
            .field("type", SchemaNode::enumeration(["lifi", "swap", "cross"]))
            .field("toAmount", SchemaNode::string().pattern("^[0-9]+$"));
        let validator = compile(schema).unwrap();
        assert!(validator.is_valid(&json!({"type": "swap", "toAmount": "123"})));

        let verdict = validator.validate(&json!({"type": "teleport", "toAmount": "1.5"}));
        assert_eq!(verdict.violations().len(), 2);
        assert!(matches!(verdict.violations()[0].constraint, Constraint::Enum { .. }));
        assert!(matches!(verdict.violations()[1].constraint, Constraint::Pattern { .. }));
    }

    #[test]
    fn test_min_items_and_integer() {
        let validator = compile(SchemaNode::array_of(SchemaNode::integer()).min_items(1)).unwrap();
        assert!(validator.is_valid(&json!([1, 9270000000000000u64, 2.0])));
        assert_eq!(validator.validate(&json!([])).violations().len(), 1);
        assert_eq!(validator.validate(&json!([1.5, "2"])).violations().len(), 2);
    }

    #[test]
    fn test_validation_is_idempotent() {
        let validator = compile(token_schema()).unwrap();
        let payload = json!({"symbol": "", "decimals": -1});
        assert_eq!(validator.validate(&payload), validator.validate(&payload));
    }

    #[test]
    fn test_compile_rejects_undeclared_required() {
        let err = compile(SchemaNode::object().field("a", SchemaNode::any()).required(["b"])).unwrap_err();
        assert!(matches!(err, SchemaError::UnknownRequired { ref field, .. } if field == "b"));
    }

    #[test]
    fn test_compile_rejects_bad_descriptors() {
        assert!(matches!(
            compile(SchemaNode::number().minimum(5.0).maximum(1.0)),
            Err(SchemaError::InvalidBounds { .. })
        ));
        assert!(matches!(
            compile(SchemaNode::enumeration(Vec::<Value>::new())),
            Err(SchemaError::EmptyEnum { .. })
        ));
        assert!(matches!(
            compile(SchemaNode::string().pattern("([")),
            Err(SchemaError::InvalidPattern { .. })
        ));
        assert!(matches!(
            compile(SchemaNode::number().min_length(1)),
            Err(SchemaError::ConstraintMismatch { constraint: "minLength", .. })
        ));
        assert!(matches!(
            compile(
                SchemaNode::object()
                    .field("a", SchemaNode::any())
                    .field("a", SchemaNode::any())
            ),
            Err(SchemaError::DuplicateProperty { .. })
        ));
    }

    #[test]
    fn test_nested_compile_error_reports_path() {
        let schema = SchemaNode::object().field(
            "action",
            SchemaNode::object().field("fromToken", SchemaNode::object().required(["symbol"])),
        );
        let err = compile(schema).unwrap_err();
        assert!(err.to_string().starts_with("action.fromToken:"), "{}", err);
    }

    #[test]
    fn test_validator_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CompiledValidator>();
    }
}
