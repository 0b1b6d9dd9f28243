//! Schema Descriptors
//!
//! Declarative, composable description of an expected JSON shape. A
//! descriptor is plain data; [`super::compile`] checks it for authoring
//! mistakes and turns it into a reusable validator.
//!
//! ```ignore
//! let token = SchemaNode::object()
//!     .field("symbol", SchemaNode::string().min_length(1))
//!     .field("decimals", SchemaNode::number().minimum(0.0).maximum(18.0))
//!     .required(["symbol", "decimals"]);
//! ```

use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    String,
    Number,
    Integer,
    Boolean,
    Null,
}

impl PrimitiveKind {
    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveKind::String => "string",
            PrimitiveKind::Number => "number",
            PrimitiveKind::Integer => "integer",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Null => "null",
        }
    }
}

/// Scalar constraints; which ones apply depends on the primitive kind
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Constraints {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub pattern: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveSchema {
    pub kind: PrimitiveKind,
    pub constraints: Constraints,
}

impl PrimitiveSchema {
    fn new(kind: PrimitiveKind) -> Self {
        Self {
            kind,
            constraints: Constraints::default(),
        }
    }

    pub fn min_length(mut self, len: usize) -> Self {
        self.constraints.min_length = Some(len);
        self
    }

    pub fn max_length(mut self, len: usize) -> Self {
        self.constraints.max_length = Some(len);
        self
    }

    pub fn minimum(mut self, min: f64) -> Self {
        self.constraints.minimum = Some(min);
        self
    }

    pub fn maximum(mut self, max: f64) -> Self {
        self.constraints.maximum = Some(max);
        self
    }

    /// Regular expression the whole string must match (anchor it yourself)
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.constraints.pattern = Some(pattern.into());
        self
    }
}

/// Policy for object keys not listed in `properties`
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AdditionalProperties {
    #[default]
    Allow,
    Deny,
    /// Every unlisted value must satisfy this schema
    Schema(Box<SchemaNode>),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectSchema {
    /// Declaration order is preserved for stable diagnostics
    pub properties: Vec<(String, SchemaNode)>,
    pub required: Vec<String>,
    pub additional: AdditionalProperties,
}

impl ObjectSchema {
    pub fn field(mut self, name: impl Into<String>, schema: impl Into<SchemaNode>) -> Self {
        self.properties.push((name.into(), schema.into()));
        self
    }

    pub fn required<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn deny_unknown(mut self) -> Self {
        self.additional = AdditionalProperties::Deny;
        self
    }

    pub fn additional(mut self, schema: impl Into<SchemaNode>) -> Self {
        self.additional = AdditionalProperties::Schema(Box::new(schema.into()));
        self
    }

    pub fn property(&self, name: &str) -> Option<&SchemaNode> {
        self.properties.iter().find(|(n, _)| n == name).map(|(_, s)| s)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArraySchema {
    pub items: Option<Box<SchemaNode>>,
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
}

impl ArraySchema {
    pub fn min_items(mut self, n: usize) -> Self {
        self.min_items = Some(n);
        self
    }

    pub fn max_items(mut self, n: usize) -> Self {
        self.max_items = Some(n);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    /// Accepts any value
    Any,
    Primitive(PrimitiveSchema),
    /// Value must equal one of the listed JSON values
    Enum(Vec<Value>),
    Object(ObjectSchema),
    Array(ArraySchema),
}

impl SchemaNode {
    pub fn any() -> Self {
        SchemaNode::Any
    }

    pub fn string() -> PrimitiveSchema {
        PrimitiveSchema::new(PrimitiveKind::String)
    }

    pub fn number() -> PrimitiveSchema {
        PrimitiveSchema::new(PrimitiveKind::Number)
    }

    pub fn integer() -> PrimitiveSchema {
        PrimitiveSchema::new(PrimitiveKind::Integer)
    }

    pub fn boolean() -> PrimitiveSchema {
        PrimitiveSchema::new(PrimitiveKind::Boolean)
    }

    pub fn null() -> PrimitiveSchema {
        PrimitiveSchema::new(PrimitiveKind::Null)
    }

    pub fn enumeration<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        SchemaNode::Enum(values.into_iter().map(Into::into).collect())
    }

    pub fn object() -> ObjectSchema {
        ObjectSchema::default()
    }

    /// Object whose every value matches `schema` (a map keyed by arbitrary strings)
    pub fn map_of(schema: impl Into<SchemaNode>) -> ObjectSchema {
        ObjectSchema::default().additional(schema)
    }

    pub fn array_of(items: impl Into<SchemaNode>) -> ArraySchema {
        ArraySchema {
            items: Some(Box::new(items.into())),
            ..ArraySchema::default()
        }
    }

    /// Array with unconstrained items
    pub fn array() -> ArraySchema {
        ArraySchema::default()
    }
}

impl From<PrimitiveSchema> for SchemaNode {
    fn from(schema: PrimitiveSchema) -> Self {
        SchemaNode::Primitive(schema)
    }
}

impl From<ObjectSchema> for SchemaNode {
    fn from(schema: ObjectSchema) -> Self {
        SchemaNode::Object(schema)
    }
}

impl From<ArraySchema> for SchemaNode {
    fn from(schema: ArraySchema) -> Self {
        SchemaNode::Array(schema)
    }
}
