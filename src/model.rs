use crate::ConfigurationError;
use schemars::{schema_for, JsonSchema};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// A structured data model: a name plus the JSON Schema describing its properties.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSchema {
    name: String,
    schema: Value,
}

impl ModelSchema {
    /// Schema of a Rust type, generated by `schemars`.
    pub fn of<T: JsonSchema>() -> Self {
        Self {
            name: T::schema_name().into_owned(),
            schema: schema_for!(T).to_value(),
        }
    }

    /// Wraps a JSON Schema obtained elsewhere, e.g. read from disk.
    pub fn from_value(name: impl Into<String>, schema: Value) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// The root object schema, or `NotAModel` when the root has no property map.
    pub fn object(&self) -> Result<&Map<String, Value>, ConfigurationError> {
        let object = self.schema.as_object().filter(|object| {
            let typed_object = match object.get("type") {
                Some(Value::String(kind)) => kind == "object",
                None => true,
                Some(_) => false,
            };
            typed_object && object.get("properties").is_some_and(Value::is_object)
        });
        object.ok_or_else(|| ConfigurationError::NotAModel {
            model: self.name.clone(),
        })
    }
}

/// Models addressable by name, for declarations that cannot name a Rust type.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    models: BTreeMap<String, ModelSchema>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `T` under its schema name.
    pub fn register<T: JsonSchema>(&mut self) -> &mut Self {
        self.insert(ModelSchema::of::<T>())
    }

    pub fn register_schema(&mut self, name: impl Into<String>, schema: Value) -> &mut Self {
        self.insert(ModelSchema::from_value(name, schema))
    }

    pub fn insert(&mut self, model: ModelSchema) -> &mut Self {
        debug!(model = model.name(), "registered model schema");
        self.models.insert(model.name.clone(), model);
        self
    }

    pub fn get(&self, name: &str) -> Result<&ModelSchema, ConfigurationError> {
        self.models
            .get(name)
            .ok_or_else(|| ConfigurationError::UnknownModel {
                name: name.to_owned(),
            })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Registers every `*.json` file in `dir`, named after its file stem.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize, ConfigurationError> {
        let invalid = |reason: String| ConfigurationError::InvalidModelSchema {
            name: dir.display().to_string(),
            reason,
        };

        let mut paths = Vec::new();
        for entry in fs::read_dir(dir).map_err(|e| invalid(e.to_string()))? {
            let path = entry.map_err(|e| invalid(e.to_string()))?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        for path in &paths {
            let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            let raw = fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
            let schema: Value =
                serde_json::from_str(&raw).map_err(|e| ConfigurationError::InvalidModelSchema {
                    name: name.to_owned(),
                    reason: e.to_string(),
                })?;
            self.register_schema(name, schema);
        }
        Ok(paths.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Deserialize, JsonSchema)]
    #[allow(dead_code)]
    struct Signup {
        email: String,
        age: Option<u8>,
    }

    #[test]
    fn schema_of_a_struct_is_a_model() {
        let model = ModelSchema::of::<Signup>();
        assert_eq!(model.name(), "Signup");
        let object = model.object().unwrap();
        assert!(object["properties"].get("email").is_some());
    }

    #[test]
    fn scalars_and_enums_are_not_models() {
        let model = ModelSchema::of::<String>();
        assert_eq!(
            model.object().unwrap_err(),
            ConfigurationError::NotAModel {
                model: "string".into()
            }
        );

        let model = ModelSchema::from_value("Color", json!({"type": "string", "enum": ["red"]}));
        assert!(model.object().is_err());
    }

    #[test]
    fn registry_lookups() {
        let mut registry = ModelRegistry::new();
        registry
            .register::<Signup>()
            .register_schema("Search", json!({"type": "object", "properties": {}}));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("Signup").unwrap().name(), "Signup");
        assert_eq!(
            registry.get("Missing").unwrap_err(),
            ConfigurationError::UnknownModel {
                name: "Missing".into()
            }
        );
    }

    #[test]
    fn load_dir_reads_json_files_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("contact.json"),
            json!({"type": "object", "properties": {"name": {"type": "string"}}}).to_string(),
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let mut registry = ModelRegistry::new();
        assert_eq!(registry.load_dir(dir.path()).unwrap(), 1);
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["contact"]);
    }
}
