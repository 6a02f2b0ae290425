use crate::FormError;
use schemars::{json_schema, JsonSchema, Schema, SchemaGenerator};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::borrow::Cow;

/// A renderable component this crate does not model, kept as the JSON the renderer receives.
///
/// The only requirement is a string `type` discriminator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AnyComponent(Value);

impl AnyComponent {
    pub fn new(value: Value) -> Result<Self, String> {
        match value.get("type") {
            Some(Value::String(_)) => Ok(Self(value)),
            Some(_) => Err("component `type` must be a string".to_owned()),
            None if value.is_object() => Err("component is missing its `type`".to_owned()),
            None => Err("component must be a JSON object".to_owned()),
        }
    }

    /// Wraps any serializable component, forms included.
    pub fn from_serialize<T: Serialize>(component: &T) -> Result<Self, FormError> {
        let value = serde_json::to_value(component)?;
        Self::new(value).map_err(|message| crate::ValidationError::new("/type", message).into())
    }

    pub fn kind(&self) -> &str {
        self.0.get("type").and_then(Value::as_str).unwrap_or_default()
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl<'de> Deserialize<'de> for AnyComponent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::new(value).map_err(de::Error::custom)
    }
}

impl JsonSchema for AnyComponent {
    fn schema_name() -> Cow<'static, str> {
        "AnyComponent".into()
    }

    fn json_schema(_: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": "object",
            "required": ["type"],
            "properties": {
                "type": { "type": "string" }
            }
        })
    }
}
