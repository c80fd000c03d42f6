//! Output-format directives for constrained decoding.
//!
//! The schema payload stays opaque to the client — it is passed through to
//! the server's constrained-decoding feature. The client's only obligation
//! is structural validation of the `required`/`properties` consistency, not
//! semantic enforcement, and it never checks that model output actually
//! conforms.

use crate::{Error, ErrorContext};
use serde_json::{json, Value};

/// Directive constraining the model's output shape.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum OutputFormat {
    /// Free text; no format directive is sent.
    #[default]
    Text,
    /// Generic JSON mode (`"format": "json"`).
    Json,
    /// A specific JSON Schema object.
    Schema(JsonSchema),
}

impl OutputFormat {
    /// The wire value for the request `format` field, if any.
    pub(crate) fn to_wire(&self) -> Option<Value> {
        match self {
            OutputFormat::Text => None,
            OutputFormat::Json => Some(json!("json")),
            OutputFormat::Schema(schema) => Some(schema.as_value().clone()),
        }
    }
}

/// A structurally validated, otherwise opaque JSON Schema object.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonSchema {
    schema: Value,
}

impl JsonSchema {
    /// Validate and wrap a raw schema object.
    ///
    /// Checks exactly what the request builder promises: `type` must be
    /// `"object"`, and every name in `required` must also appear in
    /// `properties`. Anything beyond that is the server's business.
    pub fn from_value(schema: Value) -> crate::Result<Self> {
        let obj = schema.as_object().ok_or_else(|| {
            Error::validation_with_context(
                "schema must be a JSON object",
                ErrorContext::new()
                    .with_field_path("format.schema")
                    .with_source("request_builder"),
            )
        })?;

        match obj.get("type").and_then(Value::as_str) {
            Some("object") => {}
            other => {
                return Err(Error::validation_with_context(
                    format!("schema type must be \"object\", got {:?}", other),
                    ErrorContext::new()
                        .with_field_path("format.schema.type")
                        .with_source("request_builder"),
                ));
            }
        }

        let properties = obj.get("properties").and_then(Value::as_object);
        if let Some(required) = obj.get("required").and_then(Value::as_array) {
            for (idx, name) in required.iter().enumerate() {
                let name = name.as_str().ok_or_else(|| {
                    Error::validation_with_context(
                        "schema required entries must be strings",
                        ErrorContext::new()
                            .with_field_path(format!("format.schema.required[{}]", idx))
                            .with_source("request_builder"),
                    )
                })?;
                let known = properties.map(|p| p.contains_key(name)).unwrap_or(false);
                if !known {
                    return Err(Error::validation_with_context(
                        format!("required field {:?} is absent from properties", name),
                        ErrorContext::new()
                            .with_field_path(format!("format.schema.required[{}]", idx))
                            .with_source("request_builder"),
                    ));
                }
            }
        }

        Ok(Self { schema })
    }

    pub fn as_value(&self) -> &Value {
        &self.schema
    }
}

/// Builder for the common object-schema shape: named fields with a type,
/// plus an ordered `required` list.
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    properties: serde_json::Map<String, Value>,
    required: Vec<String>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field with its JSON type (e.g. `"string"`, `"number"`).
    pub fn field(mut self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.properties
            .insert(name.into(), json!({ "type": ty.into() }));
        self
    }

    /// Declare an array field with the given item type.
    pub fn array_field(mut self, name: impl Into<String>, item_ty: impl Into<String>) -> Self {
        self.properties.insert(
            name.into(),
            json!({ "type": "array", "items": { "type": item_ty.into() } }),
        );
        self
    }

    /// Mark a field as required. Order is preserved on the wire.
    pub fn required(mut self, name: impl Into<String>) -> Self {
        self.required.push(name.into());
        self
    }

    pub fn build(self) -> crate::Result<JsonSchema> {
        JsonSchema::from_value(json!({
            "type": "object",
            "properties": self.properties,
            "required": self.required,
        }))
    }
}
