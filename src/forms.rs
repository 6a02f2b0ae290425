//! Form containers.
//!
//! A [`BaseForm`] only exists finalized: every construction route (builders and serde) binds all
//! attributes first and then applies the footer default exactly once. Finalized forms expose
//! read-only accessors.

use crate::class_name::ClassName;
use crate::component::AnyComponent;
use crate::fields::{DisplayMode, FormField};
use crate::json_schema::model_json_schema_to_fields;
use crate::model::ModelSchema;
use crate::{guard, ConfigurationError, ValidationError};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

literal_tag!(FormType => "Form");
literal_tag!(ModelFormType => "ModelForm");

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum FormMethod {
    #[default]
    Post,
    /// Navigate to `submit_url` with the form data as query parameters instead of submitting.
    Goto,
    Get,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Footer {
    Components(Vec<AnyComponent>),
    /// `false` suppresses the renderer's default footer.
    Enabled(bool),
}

impl Footer {
    pub const HIDDEN: Footer = Footer::Enabled(false);
}

/// Inline forms get no default footer unless one was asked for.
fn default_footer(footer: Option<Footer>, display_mode: Option<DisplayMode>) -> Option<Footer> {
    match (footer, display_mode) {
        (None, Some(DisplayMode::Inline)) => Some(Footer::HIDDEN),
        (footer, _) => footer,
    }
}

/// Attributes as bound before finalization.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
struct BaseFormAttrs {
    #[serde(rename = "submitUrl", alias = "submit_url")]
    submit_url: String,
    #[serde(default)]
    initial: Option<BTreeMap<String, Value>>,
    #[serde(default)]
    method: FormMethod,
    #[serde(default, rename = "displayMode", alias = "display_mode")]
    display_mode: Option<DisplayMode>,
    #[serde(default, rename = "submitOnChange", alias = "submit_on_change")]
    submit_on_change: Option<bool>,
    #[serde(default)]
    footer: Option<Footer>,
    #[serde(default)]
    class_name: Option<ClassName>,
}

impl BaseFormAttrs {
    fn new(submit_url: String) -> Self {
        Self {
            submit_url,
            initial: None,
            method: FormMethod::default(),
            display_mode: None,
            submit_on_change: None,
            footer: None,
            class_name: None,
        }
    }

    fn finalize(self) -> BaseForm {
        let footer = default_footer(self.footer.clone(), self.display_mode);
        if footer != self.footer {
            debug!(submit_url = %self.submit_url, "inline form without footer, hiding default footer");
        }

        BaseForm {
            submit_url: self.submit_url,
            initial: self.initial,
            method: self.method,
            display_mode: self.display_mode,
            submit_on_change: self.submit_on_change,
            footer,
            class_name: self.class_name,
        }
    }
}

impl From<BaseFormAttrs> for BaseForm {
    fn from(attrs: BaseFormAttrs) -> Self {
        attrs.finalize()
    }
}

/// Submission metadata shared by [`Form`] and [`ModelForm`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(from = "BaseFormAttrs")]
pub struct BaseForm {
    #[serde(rename = "submitUrl", alias = "submit_url")]
    submit_url: String,
    #[serde(default)]
    initial: Option<BTreeMap<String, Value>>,
    #[serde(default)]
    method: FormMethod,
    #[serde(default, rename = "displayMode", alias = "display_mode")]
    display_mode: Option<DisplayMode>,
    #[serde(default, rename = "submitOnChange", alias = "submit_on_change")]
    submit_on_change: Option<bool>,
    #[serde(default)]
    footer: Option<Footer>,
    #[serde(default)]
    class_name: Option<ClassName>,
}

impl BaseForm {
    pub fn builder(submit_url: impl Into<String>) -> BaseFormBuilder {
        BaseFormBuilder {
            attrs: BaseFormAttrs::new(submit_url.into()),
        }
    }

    pub fn submit_url(&self) -> &str {
        &self.submit_url
    }

    /// Initial values keyed by field name.
    pub fn initial(&self) -> Option<&BTreeMap<String, Value>> {
        self.initial.as_ref()
    }

    pub fn method(&self) -> FormMethod {
        self.method
    }

    pub fn display_mode(&self) -> Option<DisplayMode> {
        self.display_mode
    }

    /// When true the form submits on every change instead of on an explicit submit.
    pub fn submit_on_change(&self) -> Option<bool> {
        self.submit_on_change
    }

    pub fn footer(&self) -> Option<&Footer> {
        self.footer.as_ref()
    }

    pub fn class_name(&self) -> Option<&ClassName> {
        self.class_name.as_ref()
    }
}

macro_rules! form_setters {
    ($($builder:ty),* $(,)?) => {$(
        impl $builder {
            pub fn with_initial(mut self, initial: BTreeMap<String, Value>) -> Self {
                self.attrs.initial = Some(initial);
                self
            }

            pub fn with_initial_value(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
                self.attrs
                    .initial
                    .get_or_insert_with(BTreeMap::new)
                    .insert(name.into(), value.into());
                self
            }

            pub fn with_method(mut self, method: FormMethod) -> Self {
                self.attrs.method = method;
                self
            }

            pub fn with_display_mode(mut self, display_mode: DisplayMode) -> Self {
                self.attrs.display_mode = Some(display_mode);
                self
            }

            pub fn with_submit_on_change(mut self, submit_on_change: bool) -> Self {
                self.attrs.submit_on_change = Some(submit_on_change);
                self
            }

            pub fn with_footer(mut self, footer: Footer) -> Self {
                self.attrs.footer = Some(footer);
                self
            }

            pub fn with_class_name(mut self, class_name: impl Into<ClassName>) -> Self {
                self.attrs.class_name = Some(class_name.into());
                self
            }
        }
    )*};
}

#[derive(Debug, Clone)]
pub struct BaseFormBuilder {
    attrs: BaseFormAttrs,
}

impl BaseFormBuilder {
    pub fn build(self) -> BaseForm {
        self.attrs.finalize()
    }
}

#[derive(Debug, Clone)]
pub struct FormBuilder {
    attrs: BaseFormAttrs,
    form_fields: Vec<FormField>,
}

impl FormBuilder {
    pub fn field(mut self, field: impl Into<FormField>) -> Self {
        self.form_fields.push(field.into());
        self
    }

    pub fn fields<I>(mut self, fields: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<FormField>,
    {
        self.form_fields.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn build(self) -> Form {
        Form {
            base: self.attrs.finalize(),
            form_fields: self.form_fields,
            kind: FormType,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModelFormBuilder {
    attrs: BaseFormAttrs,
    model: Option<ModelSchema>,
}

impl ModelFormBuilder {
    pub fn model<T: JsonSchema>(self) -> Self {
        self.model_schema(ModelSchema::of::<T>())
    }

    pub fn model_schema(mut self, model: ModelSchema) -> Self {
        self.model = Some(model);
        self
    }

    /// Finalizes the form and derives its fields from the model.
    pub fn build(self) -> Result<ModelForm, ConfigurationError> {
        let model = self.model.ok_or(ConfigurationError::MissingModel)?;
        ModelForm::from_base(self.attrs.finalize(), &model)
    }
}

form_setters!(BaseFormBuilder, FormBuilder, ModelFormBuilder);

/// A form with an explicit, ordered list of fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(extend("additionalProperties" = false))]
pub struct Form {
    #[serde(flatten)]
    base: BaseForm,
    #[serde(rename = "formFields", alias = "form_fields")]
    form_fields: Vec<FormField>,
    #[serde(default, rename = "type")]
    kind: FormType,
}

impl Form {
    pub fn builder(submit_url: impl Into<String>) -> FormBuilder {
        FormBuilder {
            attrs: BaseFormAttrs::new(submit_url.into()),
            form_fields: Vec::new(),
        }
    }

    pub fn from_value(value: Value) -> Result<Self, ValidationError> {
        guard::construct(value)
    }

    pub fn base(&self) -> &BaseForm {
        &self.base
    }

    /// Fields in render order.
    pub fn form_fields(&self) -> &[FormField] {
        &self.form_fields
    }

    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.form_fields.iter().find(|field| field.name() == name)
    }
}

/// A form whose fields are derived from a structured data model's JSON Schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(extend("additionalProperties" = false))]
pub struct ModelForm {
    #[serde(flatten)]
    base: BaseForm,
    #[serde(rename = "formFields", alias = "form_fields")]
    form_fields: Vec<FormField>,
    #[serde(default, rename = "type")]
    kind: ModelFormType,
}

impl ModelForm {
    pub fn builder(submit_url: impl Into<String>) -> ModelFormBuilder {
        ModelFormBuilder {
            attrs: BaseFormAttrs::new(submit_url.into()),
            model: None,
        }
    }

    pub fn from_base(base: BaseForm, model: &ModelSchema) -> Result<Self, ConfigurationError> {
        let form_fields = model_json_schema_to_fields(model)?;
        debug!(model = model.name(), fields = form_fields.len(), "derived model form fields");
        Ok(Self {
            base,
            form_fields,
            kind: ModelFormType,
        })
    }

    pub fn base(&self) -> &BaseForm {
        &self.base
    }

    pub fn form_fields(&self) -> &[FormField] {
        &self.form_fields
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum AnyForm {
    Form(Form),
    ModelForm(ModelForm),
}

impl AnyForm {
    pub fn kind(&self) -> &'static str {
        match self {
            AnyForm::Form(_) => FormType::VALUE,
            AnyForm::ModelForm(_) => ModelFormType::VALUE,
        }
    }

    pub fn base(&self) -> &BaseForm {
        match self {
            AnyForm::Form(form) => form.base(),
            AnyForm::ModelForm(form) => form.base(),
        }
    }

    pub fn form_fields(&self) -> &[FormField] {
        match self {
            AnyForm::Form(form) => form.form_fields(),
            AnyForm::ModelForm(form) => form.form_fields(),
        }
    }
}

impl From<Form> for AnyForm {
    fn from(form: Form) -> Self {
        AnyForm::Form(form)
    }
}

impl From<ModelForm> for AnyForm {
    fn from(form: ModelForm) -> Self {
        AnyForm::ModelForm(form)
    }
}
