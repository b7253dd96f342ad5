//! Avro Protocol Document
//!
//! The target schema document: a protocol with a dotted namespace, a name,
//! and an ordered list of named types (records, enums, fixed). The document
//! is built once by the translator and immutable afterwards; this module
//! owns its canonical `.avpr` JSON rendering.
//!
//! Rendering is deterministic: key order is fixed by construction
//! (serde_json with `preserve_order`), so identical documents serialize to
//! byte-identical text.

use serde_json::{json, Value};

use crate::model::Primitive;

/// Avro primitive type names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvroPrimitive {
    String,
    Boolean,
    Int,
    Long,
    Float,
    Double,
    Bytes,
}

impl AvroPrimitive {
    pub fn as_str(&self) -> &'static str {
        match self {
            AvroPrimitive::String => "string",
            AvroPrimitive::Boolean => "boolean",
            AvroPrimitive::Int => "int",
            AvroPrimitive::Long => "long",
            AvroPrimitive::Float => "float",
            AvroPrimitive::Double => "double",
            AvroPrimitive::Bytes => "bytes",
        }
    }
}

impl From<Primitive> for AvroPrimitive {
    /// Meta-model primitives map one-to-one where Avro has an equivalent;
    /// `short`/`char` widen to `int` and `date` is carried as epoch `long`.
    fn from(p: Primitive) -> Self {
        match p {
            Primitive::String => AvroPrimitive::String,
            Primitive::Boolean => AvroPrimitive::Boolean,
            Primitive::Int | Primitive::Short | Primitive::Char => AvroPrimitive::Int,
            Primitive::Long | Primitive::Date => AvroPrimitive::Long,
            Primitive::Float => AvroPrimitive::Float,
            Primitive::Double => AvroPrimitive::Double,
            Primitive::Bytes => AvroPrimitive::Bytes,
        }
    }
}

/// The type of a record field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSchema {
    Primitive(AvroPrimitive),
    /// Reference to a named type in the same document, by full name.
    /// Named indirection is what makes cyclic references representable.
    Named(String),
    Array(Box<FieldSchema>),
    /// Nullable single value, rendered as `["null", T]` (null first so a
    /// null default is legal under Avro's first-branch rule)
    Optional(Box<FieldSchema>),
}

impl FieldSchema {
    fn to_json(&self) -> Value {
        match self {
            FieldSchema::Primitive(p) => json!(p.as_str()),
            FieldSchema::Named(full_name) => json!(full_name),
            FieldSchema::Array(items) => json!({
                "type": "array",
                "items": items.to_json(),
            }),
            FieldSchema::Optional(inner) => json!(["null", inner.to_json()]),
        }
    }
}

/// A named, typed record field with an optional default value
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub schema: FieldSchema,
    pub default: Option<Value>,
}

impl Field {
    fn to_json(&self) -> Value {
        let mut field = serde_json::Map::new();
        field.insert("name".to_string(), json!(self.name));
        field.insert("type".to_string(), self.schema.to_json());
        if let Some(default) = &self.default {
            field.insert("default".to_string(), default.clone());
        }
        Value::Object(field)
    }
}

/// Definition body of a named type
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDef {
    Record { fields: Vec<Field> },
    Enum { symbols: Vec<String> },
    Fixed { size: u32 },
}

/// A named type declared in the protocol
#[derive(Debug, Clone, PartialEq)]
pub struct NamedType {
    pub name: String,
    /// Dotted namespace. Always rendered explicitly so each type JSON is
    /// self-describing and cross-references resolve outside protocol context.
    pub namespace: String,
    pub def: TypeDef,
}

impl NamedType {
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.namespace, self.name)
    }

    pub fn to_json(&self) -> Value {
        match &self.def {
            TypeDef::Record { fields } => json!({
                "type": "record",
                "name": self.name,
                "namespace": self.namespace,
                "fields": fields.iter().map(Field::to_json).collect::<Vec<_>>(),
            }),
            TypeDef::Enum { symbols } => json!({
                "type": "enum",
                "name": self.name,
                "namespace": self.namespace,
                "symbols": symbols,
            }),
            TypeDef::Fixed { size } => json!({
                "type": "fixed",
                "name": self.name,
                "namespace": self.namespace,
                "size": size,
            }),
        }
    }
}

/// An Avro protocol: namespace, name, ordered named types, no messages
#[derive(Debug, Clone, PartialEq)]
pub struct Protocol {
    pub name: String,
    pub namespace: String,
    pub types: Vec<NamedType>,
}

impl Protocol {
    /// Look up a declared type by full name
    pub fn get_type(&self, full_name: &str) -> Option<&NamedType> {
        self.types.iter().find(|t| t.full_name() == full_name)
    }

    pub fn to_json(&self) -> Value {
        json!({
            "protocol": self.name,
            "namespace": self.namespace,
            "types": self.types.iter().map(NamedType::to_json).collect::<Vec<_>>(),
            "messages": {},
        })
    }

    /// Canonical `.avpr` text, newline-terminated
    pub fn to_pretty_json(&self) -> String {
        let mut text = serde_json::to_string_pretty(&self.to_json())
            .expect("protocol JSON has no non-serializable values");
        text.push('\n');
        text
    }

    /// Each declared type as standalone JSON text, in declaration order
    /// (the form `apache_avro::Schema::parse_list` consumes)
    pub fn types_as_json_strings(&self) -> Vec<String> {
        self.types.iter().map(|t| t.to_json().to_string()).collect()
    }
}
