//! Form declaration files.
//!
//! A declaration is one YAML (or JSON) document describing a single form. `type: Form` documents
//! use the wire shape directly. `type: ModelForm` documents carry the base form attributes plus
//! `model`, the name of a schema in a [`ModelRegistry`]; their fields are derived on load.

use crate::forms::{AnyForm, BaseForm, Form, FormType, ModelForm, ModelFormType};
use crate::model::ModelRegistry;
use crate::{guard, ConfigurationError, FormError, ValidationError};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Form fields are never declared here; they are derived from `model`.
#[derive(Debug, Deserialize, JsonSchema)]
#[schemars(extend("additionalProperties" = false))]
pub struct ModelFormDeclaration {
    #[serde(flatten)]
    pub base: BaseForm,
    #[serde(default)]
    pub model: Option<String>,
    // Only checked on the way in.
    #[allow(dead_code)]
    #[serde(default, rename = "type")]
    kind: ModelFormType,
}

/// Parses YAML or JSON text into an untyped document.
pub fn parse(raw: &str) -> Result<Value, ValidationError> {
    serde_yaml::from_str(raw)
        .map_err(|e| ValidationError::new("", format!("declaration is not valid YAML or JSON: {e}")))
}

pub fn load_value(value: Value, registry: &ModelRegistry) -> Result<AnyForm, FormError> {
    let kind = match value.get("type") {
        Some(Value::String(kind)) => kind.clone(),
        Some(_) => return Err(ValidationError::new("/type", "`type` must be a string").into()),
        None => {
            return Err(ValidationError::new(
                "/type",
                "declaration must name its `type`: `Form` or `ModelForm`",
            )
            .into());
        }
    };

    match kind.as_str() {
        FormType::VALUE => Ok(Form::from_value(value)?.into()),
        ModelFormType::VALUE => {
            let declaration: ModelFormDeclaration = guard::construct(value)?;
            let name = declaration.model.ok_or(ConfigurationError::MissingModel)?;
            let model = registry.get(&name)?;
            Ok(ModelForm::from_base(declaration.base, model)?.into())
        }
        other => Err(ValidationError::new(
            "/type",
            format!("unknown form type `{other}`, expected `Form` or `ModelForm`"),
        )
        .into()),
    }
}

pub fn load_str(raw: &str, registry: &ModelRegistry) -> Result<AnyForm, FormError> {
    let value = parse(raw)?;
    load_value(value, registry).inspect_err(|e| warn!(error = %e, "rejected form declaration"))
}

pub fn load_file(path: &Path, registry: &ModelRegistry) -> Result<AnyForm, FormError> {
    debug!(path = %path.display(), "loading form declaration");
    let raw = fs::read_to_string(path)?;
    load_str(&raw, registry)
}
