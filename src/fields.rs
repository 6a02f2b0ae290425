//! Field schemas: one struct per input kind and the closed [`FormField`] union over them.
//!
//! Wire keys follow the renderer's naming (`htmlType`, `searchUrl`, `displayMode`); the
//! attribute names are accepted as aliases on the way in. Absent optional attributes are
//! emitted as explicit `null`.

use crate::class_name::ClassName;
use crate::{guard, ValidationError};
use schemars::{json_schema, JsonSchema, Schema, SchemaGenerator};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::borrow::Cow;

/// Debounce the renderer applies to search requests when a field leaves it unset.
pub const DEFAULT_DEBOUNCE_MS: u32 = 300;

literal_tag!(FormFieldInputType => "FormFieldInput");
literal_tag!(FormFieldBooleanType => "FormFieldBoolean");
literal_tag!(FormFieldFileType => "FormFieldFile");
literal_tag!(FormFieldSelectType => "FormFieldSelect");
literal_tag!(FormFieldSelectSearchType => "FormFieldSelectSearch");

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Default,
    /// Compact layout, label and input on one line.
    Inline,
}

/// A single title, or several lines rendered as a breadcrumb.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Title {
    Single(String),
    Lines(Vec<String>),
}

impl From<&str> for Title {
    fn from(value: &str) -> Self {
        Self::Single(value.to_owned())
    }
}

impl From<String> for Title {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<String>> for Title {
    fn from(value: Vec<String>) -> Self {
        Self::Lines(value)
    }
}

impl From<Vec<&str>> for Title {
    fn from(value: Vec<&str>) -> Self {
        Self::Lines(value.into_iter().map(str::to_owned).collect())
    }
}

/// Identity and presentation attributes every field variant carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BaseFormField {
    pub name: String,
    pub title: Title,
    #[serde(default)]
    pub required: bool,
    /// Validation message, absent while the field is valid.
    #[serde(default)]
    pub error: Option<String>,
    /// Rendered but not editable.
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "displayMode", alias = "display_mode")]
    pub display_mode: Option<DisplayMode>,
    #[serde(default)]
    pub class_name: Option<ClassName>,
}

impl BaseFormField {
    pub fn new(name: impl Into<String>, title: impl Into<Title>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            required: false,
            error: None,
            locked: false,
            description: None,
            display_mode: None,
            class_name: None,
        }
    }
}

macro_rules! base_setters {
    ($($variant:ty),* $(,)?) => {$(
        impl $variant {
            pub fn required(mut self) -> Self {
                self.base.required = true;
                self
            }

            pub fn locked(mut self) -> Self {
                self.base.locked = true;
                self
            }

            pub fn with_error(mut self, error: impl Into<String>) -> Self {
                self.base.error = Some(error.into());
                self
            }

            pub fn with_description(mut self, description: impl Into<String>) -> Self {
                self.base.description = Some(description.into());
                self
            }

            pub fn with_display_mode(mut self, display_mode: DisplayMode) -> Self {
                self.base.display_mode = Some(display_mode);
                self
            }

            pub fn with_class_name(mut self, class_name: impl Into<ClassName>) -> Self {
                self.base.class_name = Some(class_name.into());
                self
            }
        }
    )*};
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum InputHtmlType {
    #[default]
    Text,
    Date,
    DatetimeLocal,
    Time,
    Email,
    Url,
    Number,
    Password,
}

/// Initial value of a scalar input. Booleans are deliberately not representable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum InputInitial {
    Text(String),
    Number(f64),
}

impl From<&str> for InputInitial {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for InputInitial {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for InputInitial {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for InputInitial {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<u32> for InputInitial {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FormFieldInput {
    #[serde(flatten)]
    pub base: BaseFormField,
    #[serde(default, rename = "htmlType", alias = "html_type")]
    pub html_type: InputHtmlType,
    #[serde(default)]
    pub initial: Option<InputInitial>,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default, rename = "type")]
    kind: FormFieldInputType,
}

impl FormFieldInput {
    pub fn new(name: impl Into<String>, title: impl Into<Title>) -> Self {
        Self::from_base(BaseFormField::new(name, title))
    }

    pub fn from_base(base: BaseFormField) -> Self {
        Self {
            base,
            html_type: InputHtmlType::default(),
            initial: None,
            placeholder: None,
            kind: FormFieldInputType,
        }
    }

    pub fn with_html_type(mut self, html_type: InputHtmlType) -> Self {
        self.html_type = html_type;
        self
    }

    pub fn with_initial(mut self, initial: impl Into<InputInitial>) -> Self {
        self.initial = Some(initial.into());
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum BooleanMode {
    #[default]
    Checkbox,
    Switch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FormFieldBoolean {
    #[serde(flatten)]
    pub base: BaseFormField,
    #[serde(default)]
    pub initial: Option<bool>,
    #[serde(default)]
    pub mode: BooleanMode,
    #[serde(default, rename = "type")]
    kind: FormFieldBooleanType,
}

impl FormFieldBoolean {
    pub fn new(name: impl Into<String>, title: impl Into<Title>) -> Self {
        Self::from_base(BaseFormField::new(name, title))
    }

    pub fn from_base(base: BaseFormField) -> Self {
        Self {
            base,
            initial: None,
            mode: BooleanMode::default(),
            kind: FormFieldBooleanType,
        }
    }

    pub fn with_initial(mut self, initial: bool) -> Self {
        self.initial = Some(initial);
        self
    }

    pub fn with_mode(mut self, mode: BooleanMode) -> Self {
        self.mode = mode;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FormFieldFile {
    #[serde(flatten)]
    pub base: BaseFormField,
    #[serde(default)]
    pub multiple: Option<bool>,
    /// MIME pattern, e.g. `image/*`.
    #[serde(default)]
    pub accept: Option<String>,
    #[serde(default, rename = "type")]
    kind: FormFieldFileType,
}

impl FormFieldFile {
    pub fn new(name: impl Into<String>, title: impl Into<Title>) -> Self {
        Self::from_base(BaseFormField::new(name, title))
    }

    pub fn from_base(base: BaseFormField) -> Self {
        Self {
            base,
            multiple: None,
            accept: None,
            kind: FormFieldFileType,
        }
    }

    pub fn multiple(mut self) -> Self {
        self.multiple = Some(true);
        self
    }

    pub fn with_accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = Some(accept.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SelectGroup {
    pub label: String,
    pub options: Vec<SelectOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum SelectOptions {
    Options(Vec<SelectOption>),
    Groups(Vec<SelectGroup>),
}

impl From<Vec<SelectOption>> for SelectOptions {
    fn from(value: Vec<SelectOption>) -> Self {
        Self::Options(value)
    }
}

impl From<Vec<SelectGroup>> for SelectOptions {
    fn from(value: Vec<SelectGroup>) -> Self {
        Self::Groups(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FormFieldSelect {
    #[serde(flatten)]
    pub base: BaseFormField,
    pub options: SelectOptions,
    #[serde(default)]
    pub multiple: Option<bool>,
    #[serde(default)]
    pub initial: Option<String>,
    /// Render the browser's own select instead of the styled one.
    #[serde(default)]
    pub vanilla: Option<bool>,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default, rename = "type")]
    kind: FormFieldSelectType,
}

impl FormFieldSelect {
    pub fn new(
        name: impl Into<String>,
        title: impl Into<Title>,
        options: impl Into<SelectOptions>,
    ) -> Self {
        Self::from_base(BaseFormField::new(name, title), options)
    }

    pub fn from_base(base: BaseFormField, options: impl Into<SelectOptions>) -> Self {
        Self {
            base,
            options: options.into(),
            multiple: None,
            initial: None,
            vanilla: None,
            placeholder: None,
            kind: FormFieldSelectType,
        }
    }

    pub fn multiple(mut self) -> Self {
        self.multiple = Some(true);
        self
    }

    pub fn with_initial(mut self, initial: impl Into<String>) -> Self {
        self.initial = Some(initial.into());
        self
    }

    pub fn vanilla(mut self) -> Self {
        self.vanilla = Some(true);
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }
}

/// Select whose options come from `search_url`, queried as the user types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FormFieldSelectSearch {
    #[serde(flatten)]
    pub base: BaseFormField,
    #[serde(rename = "searchUrl", alias = "search_url")]
    pub search_url: String,
    #[serde(default)]
    pub multiple: Option<bool>,
    #[serde(default)]
    pub initial: Option<SelectOption>,
    /// Milliseconds; unset means [`DEFAULT_DEBOUNCE_MS`].
    #[serde(default)]
    pub debounce: Option<u32>,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default, rename = "type")]
    kind: FormFieldSelectSearchType,
}

impl FormFieldSelectSearch {
    pub fn new(
        name: impl Into<String>,
        title: impl Into<Title>,
        search_url: impl Into<String>,
    ) -> Self {
        Self::from_base(BaseFormField::new(name, title), search_url)
    }

    pub fn from_base(base: BaseFormField, search_url: impl Into<String>) -> Self {
        Self {
            base,
            search_url: search_url.into(),
            multiple: None,
            initial: None,
            debounce: None,
            placeholder: None,
            kind: FormFieldSelectSearchType,
        }
    }

    pub fn multiple(mut self) -> Self {
        self.multiple = Some(true);
        self
    }

    pub fn with_initial(mut self, initial: SelectOption) -> Self {
        self.initial = Some(initial);
        self
    }

    pub fn with_debounce(mut self, debounce_ms: u32) -> Self {
        self.debounce = Some(debounce_ms);
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn effective_debounce(&self) -> u32 {
        self.debounce.unwrap_or(DEFAULT_DEBOUNCE_MS)
    }
}

base_setters!(
    FormFieldInput,
    FormFieldBoolean,
    FormFieldFile,
    FormFieldSelect,
    FormFieldSelectSearch,
);

const FIELD_KINDS: &[&str] = &[
    FormFieldInputType::VALUE,
    FormFieldBooleanType::VALUE,
    FormFieldFileType::VALUE,
    FormFieldSelectType::VALUE,
    FormFieldSelectSearchType::VALUE,
];

/// Any field variant, dispatched on its `type` string.
#[derive(Debug, Clone, PartialEq)]
pub enum FormField {
    Input(FormFieldInput),
    Boolean(FormFieldBoolean),
    File(FormFieldFile),
    Select(FormFieldSelect),
    SelectSearch(FormFieldSelectSearch),
}

impl FormField {
    /// Validates untyped JSON and builds the variant its `type` names.
    ///
    /// Dispatch happens before validation so errors point into the named variant rather than
    /// at the union as a whole.
    pub fn from_value(value: Value) -> Result<Self, ValidationError> {
        let kind = match value.get("type") {
            Some(Value::String(kind)) => kind.clone(),
            Some(_) => return Err(ValidationError::new("/type", "`type` must be a string")),
            None => return Err(ValidationError::new("/type", "field must name its `type`")),
        };

        match kind.as_str() {
            FormFieldInputType::VALUE => guard::construct(value).map(FormField::Input),
            FormFieldBooleanType::VALUE => guard::construct(value).map(FormField::Boolean),
            FormFieldFileType::VALUE => guard::construct(value).map(FormField::File),
            FormFieldSelectType::VALUE => guard::construct(value).map(FormField::Select),
            FormFieldSelectSearchType::VALUE => {
                guard::construct(value).map(FormField::SelectSearch)
            }
            other => Err(ValidationError::new(
                "/type",
                format!("unknown field type `{other}`, expected one of {}", FIELD_KINDS.join(", ")),
            )),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            FormField::Input(_) => FormFieldInputType::VALUE,
            FormField::Boolean(_) => FormFieldBooleanType::VALUE,
            FormField::File(_) => FormFieldFileType::VALUE,
            FormField::Select(_) => FormFieldSelectType::VALUE,
            FormField::SelectSearch(_) => FormFieldSelectSearchType::VALUE,
        }
    }

    pub fn base(&self) -> &BaseFormField {
        match self {
            FormField::Input(field) => &field.base,
            FormField::Boolean(field) => &field.base,
            FormField::File(field) => &field.base,
            FormField::Select(field) => &field.base,
            FormField::SelectSearch(field) => &field.base,
        }
    }

    pub fn name(&self) -> &str {
        &self.base().name
    }
}

impl Serialize for FormField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FormField::Input(field) => field.serialize(serializer),
            FormField::Boolean(field) => field.serialize(serializer),
            FormField::File(field) => field.serialize(serializer),
            FormField::Select(field) => field.serialize(serializer),
            FormField::SelectSearch(field) => field.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for FormField {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let kind = match value.get("type") {
            Some(Value::String(kind)) => kind.clone(),
            Some(_) => return Err(de::Error::custom("`type` must be a string")),
            None => return Err(de::Error::missing_field("type")),
        };

        let field = match kind.as_str() {
            FormFieldInputType::VALUE => serde_json::from_value(value).map(FormField::Input),
            FormFieldBooleanType::VALUE => serde_json::from_value(value).map(FormField::Boolean),
            FormFieldFileType::VALUE => serde_json::from_value(value).map(FormField::File),
            FormFieldSelectType::VALUE => serde_json::from_value(value).map(FormField::Select),
            FormFieldSelectSearchType::VALUE => {
                serde_json::from_value(value).map(FormField::SelectSearch)
            }
            other => return Err(de::Error::unknown_variant(other, FIELD_KINDS)),
        };
        field.map_err(de::Error::custom)
    }
}

impl JsonSchema for FormField {
    fn schema_name() -> Cow<'static, str> {
        "FormField".into()
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "oneOf": [
                generator.subschema_for::<FormFieldInput>(),
                generator.subschema_for::<FormFieldBoolean>(),
                generator.subschema_for::<FormFieldFile>(),
                generator.subschema_for::<FormFieldSelect>(),
                generator.subschema_for::<FormFieldSelectSearch>(),
            ]
        })
    }
}

impl From<FormFieldInput> for FormField {
    fn from(field: FormFieldInput) -> Self {
        FormField::Input(field)
    }
}

impl From<FormFieldBoolean> for FormField {
    fn from(field: FormFieldBoolean) -> Self {
        FormField::Boolean(field)
    }
}

impl From<FormFieldFile> for FormField {
    fn from(field: FormFieldFile) -> Self {
        FormField::File(field)
    }
}

impl From<FormFieldSelect> for FormField {
    fn from(field: FormFieldSelect) -> Self {
        FormField::Select(field)
    }
}

impl From<FormFieldSelectSearch> for FormField {
    fn from(field: FormFieldSelectSearch) -> Self {
        FormField::SelectSearch(field)
    }
}
