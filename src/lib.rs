//! Declarative schemas for UI form components and the forms containing them.
//!
//! Every type here serializes to the JSON a separate frontend renders. Fields and forms carry a
//! literal `type` discriminator so the renderer can dispatch without outside type information.

#[macro_use]
mod tag;

pub mod class_name;
pub mod component;
pub mod declaration;
pub mod fields;
pub mod forms;
pub mod guard;
pub mod json_schema;
pub mod model;

pub use class_name::ClassName;
pub use component::AnyComponent;
pub use fields::{
    BaseFormField, BooleanMode, DisplayMode, FormField, FormFieldBoolean, FormFieldFile,
    FormFieldInput, FormFieldSelect, FormFieldSelectSearch, InputHtmlType, InputInitial,
    SelectGroup, SelectOption, SelectOptions, Title, DEFAULT_DEBOUNCE_MS,
};
pub use guard::WIRE_RENAMES;
pub use forms::{AnyForm, BaseForm, Footer, Form, FormBuilder, FormMethod, ModelForm, ModelFormBuilder};
pub use json_schema::model_json_schema_to_fields;
pub use model::{ModelRegistry, ModelSchema};

use std::fmt;
use thiserror::Error;

/// Malformed or out-of-range attribute data. Recoverable: fix the input and construct again.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid attribute {}: {message}", DisplayPath(.path))]
pub struct ValidationError {
    /// JSON pointer to the offending attribute, empty for the document root.
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

struct DisplayPath<'a>(&'a str);

impl fmt::Display for DisplayPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "`<root>`")
        } else {
            write!(f, "`{}`", self.0)
        }
    }
}

/// Structural misuse of [`ModelForm`]. A programmer error: fix the call site, do not retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("`ModelForm` must be built with a model, i.e. `ModelForm::builder(url).model::<MyModel>()`")]
    MissingModel,
    #[error("`{model}` is not a structured data model: its schema must be an object with properties")]
    NotAModel { model: String },
    #[error("no model named `{name}` is registered")]
    UnknownModel { name: String },
    #[error("model `{model}` property `{property}` cannot be mapped to a form field: {reason}")]
    UnsupportedProperty {
        model: String,
        property: String,
        reason: String,
    },
    #[error("model `{model}` has an unresolvable reference `{reference}`")]
    InvalidReference { model: String, reference: String },
    #[error("model schema `{name}` could not be loaded: {reason}")]
    InvalidModelSchema { name: String, reason: String },
}

#[derive(Error, Debug)]
pub enum FormError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = FormError> = std::result::Result<T, E>;
