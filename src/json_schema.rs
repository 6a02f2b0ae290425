//! Derives form fields from a model's JSON Schema.
//!
//! Works on the schemas `schemars` emits (draft 2020-12, `$defs`) as well as older
//! `definitions`-style documents. Besides standard keywords, a few extension keywords shape the
//! result: `search_url`, `placeholder`, `mode`, `accept` and `debounce`.

use crate::fields::{
    BaseFormField, BooleanMode, FormField, FormFieldBoolean, FormFieldFile, FormFieldInput,
    FormFieldSelect, FormFieldSelectSearch, InputHtmlType, InputInitial, SelectOption, Title,
};
use crate::model::ModelSchema;
use crate::ConfigurationError;
use serde_json::{Map, Value};
use std::collections::HashSet;

// Reference chains longer than this are treated as cycles.
const MAX_REF_DEPTH: usize = 32;

/// One field per leaf property of `model`, in declaration order. Nested objects contribute their
/// own properties under a dotted name and a breadcrumb title.
pub fn model_json_schema_to_fields(
    model: &ModelSchema,
) -> Result<Vec<FormField>, ConfigurationError> {
    let root = model.object()?;
    let deriver = Deriver {
        model: model.name(),
        root: model.schema(),
    };

    let mut fields = Vec::new();
    deriver.object_fields(root, &[], &[], &[model.schema()], &mut fields)?;
    Ok(fields)
}

struct Deriver<'a> {
    model: &'a str,
    root: &'a Value,
}

/// Keywords are looked up on the property as written first, then on what it resolves to, so a
/// description next to a `$ref` wins over the referenced definition's own.
struct Meta<'s> {
    outer: &'s Value,
    inner: &'s Value,
}

impl<'s> Meta<'s> {
    fn get(&self, key: &str) -> Option<&'s Value> {
        self.outer.get(key).or_else(|| self.inner.get(key))
    }

    fn string(&self, key: &str) -> Option<String> {
        self.get(key).and_then(Value::as_str).map(str::to_owned)
    }
}

impl Deriver<'_> {
    /// `enclosing` holds the object schemas entered on the way down, the root included.
    fn object_fields(
        &self,
        object: &Map<String, Value>,
        loc: &[String],
        titles: &[String],
        enclosing: &[&Value],
        out: &mut Vec<FormField>,
    ) -> Result<(), ConfigurationError> {
        let required: HashSet<&str> = object
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        let Some(properties) = object.get("properties").and_then(Value::as_object) else {
            return Ok(());
        };
        for (key, raw) in properties {
            let required = required.contains(key.as_str());
            self.property_fields(key, raw, required, loc, titles, enclosing, out)?;
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn property_fields(
        &self,
        key: &str,
        raw: &Value,
        required: bool,
        loc: &[String],
        titles: &[String],
        enclosing: &[&Value],
        out: &mut Vec<FormField>,
    ) -> Result<(), ConfigurationError> {
        let (schema, nullable) = self.normalize(raw)?;
        let meta = Meta {
            outer: raw,
            inner: &schema,
        };
        let title = meta.string("title").unwrap_or_else(|| title_case(key));

        let mut path = loc.to_vec();
        path.push(key.to_owned());

        if is_nested_object(&schema) && meta.get("search_url").is_none() {
            // An inline subtree never equals one of its ancestors, so a match is a reference
            // back into an enclosing object.
            if enclosing.contains(&&schema) {
                return Err(self.unsupported(
                    &path.join("."),
                    "recursive model: the property refers back to an enclosing object",
                ));
            }
            let mut crumbs = titles.to_vec();
            crumbs.push(title);
            let mut inner = enclosing.to_vec();
            inner.push(&schema);
            if let Some(object) = schema.as_object() {
                self.object_fields(object, &path, &crumbs, &inner, out)?;
            }
            return Ok(());
        }

        let title = if titles.is_empty() {
            Title::Single(title)
        } else {
            let mut crumbs = titles.to_vec();
            crumbs.push(title);
            Title::Lines(crumbs)
        };
        let mut base = BaseFormField::new(path.join("."), title);
        base.required = required && !nullable;
        base.description = meta.string("description");

        out.push(self.field_for(base, &meta, &schema)?);
        Ok(())
    }

    fn field_for(
        &self,
        base: BaseFormField,
        meta: &Meta<'_>,
        schema: &Value,
    ) -> Result<FormField, ConfigurationError> {
        let kind = schema.get("type").and_then(Value::as_str);
        let placeholder = meta.string("placeholder");

        if let Some(search_url) = meta.string("search_url") {
            let mut field = FormFieldSelectSearch::from_base(base, search_url);
            field.multiple = (kind == Some("array")).then_some(true);
            field.debounce = meta
                .get("debounce")
                .and_then(Value::as_u64)
                .and_then(|ms| u32::try_from(ms).ok());
            field.placeholder = placeholder;
            return Ok(field.into());
        }

        if kind == Some("array") {
            return self.array_field(base, meta, schema);
        }

        if let Some(options) = self.select_options(schema)? {
            let mut field = FormFieldSelect::from_base(base, options);
            field.initial = meta.get("default").and_then(option_value);
            field.placeholder = placeholder;
            return Ok(field.into());
        }

        match kind {
            Some("boolean") => {
                let mut field = FormFieldBoolean::from_base(base);
                field.initial = meta.get("default").and_then(Value::as_bool);
                if let Some(mode) = meta.get("mode") {
                    field.mode = serde_json::from_value::<BooleanMode>(mode.clone())
                        .map_err(|e| self.unsupported(&field.base.name, e.to_string()))?;
                }
                Ok(field.into())
            }
            Some("string") if meta.string("format").as_deref() == Some("binary") => {
                let mut field = FormFieldFile::from_base(base);
                field.accept = meta.string("accept");
                Ok(field.into())
            }
            Some("string") => {
                let mut field = FormFieldInput::from_base(base);
                field.html_type = string_html_type(meta);
                field.initial = meta.string("default").map(InputInitial::Text);
                field.placeholder = placeholder;
                Ok(field.into())
            }
            Some("integer" | "number") => {
                let mut field = FormFieldInput::from_base(base);
                field.html_type = InputHtmlType::Number;
                field.initial = meta
                    .get("default")
                    .and_then(Value::as_f64)
                    .map(InputInitial::Number);
                field.placeholder = placeholder;
                Ok(field.into())
            }
            Some(other) => Err(self.unsupported(
                &base.name,
                format!("type `{other}` has no form field"),
            )),
            None => Err(self.unsupported(&base.name, "schema declares no `type`")),
        }
    }

    fn array_field(
        &self,
        base: BaseFormField,
        meta: &Meta<'_>,
        schema: &Value,
    ) -> Result<FormField, ConfigurationError> {
        let Some(items) = schema.get("items") else {
            return Err(self.unsupported(&base.name, "array without `items`"));
        };
        let (items, _) = self.normalize(items)?;

        if let Some(options) = self.select_options(&items)? {
            let mut field = FormFieldSelect::from_base(base, options).multiple();
            field.placeholder = meta.string("placeholder");
            return Ok(field.into());
        }

        let binary_items = items.get("type").and_then(Value::as_str) == Some("string")
            && items.get("format").and_then(Value::as_str) == Some("binary");
        if binary_items {
            let mut field = FormFieldFile::from_base(base).multiple();
            field.accept = meta
                .string("accept")
                .or_else(|| items.get("accept").and_then(Value::as_str).map(str::to_owned));
            return Ok(field.into());
        }

        Err(self.unsupported(
            &base.name,
            "only arrays of choices or files map to a form field",
        ))
    }

    /// Options of an enumerated schema: a plain `enum`, or `oneOf`/`anyOf` alternatives that
    /// each pin a `const` (or a further `enum`).
    fn select_options(
        &self,
        schema: &Value,
    ) -> Result<Option<Vec<SelectOption>>, ConfigurationError> {
        if let Some(values) = schema.get("enum").and_then(Value::as_array) {
            return Ok(Some(values.iter().filter_map(plain_option).collect()));
        }

        for key in ["oneOf", "anyOf"] {
            let Some(variants) = schema.get(key).and_then(Value::as_array) else {
                continue;
            };
            let mut options = Vec::new();
            for variant in variants {
                let variant = self.resolve(variant)?;
                if let Some(value) = variant.get("const").and_then(option_value) {
                    let label = variant
                        .get("title")
                        .and_then(Value::as_str)
                        .map(str::to_owned)
                        .unwrap_or_else(|| title_case(&value));
                    options.push(SelectOption::new(value, label));
                } else if let Some(values) = variant.get("enum").and_then(Value::as_array) {
                    options.extend(values.iter().filter_map(plain_option));
                } else {
                    return Ok(None);
                }
            }
            return Ok(Some(options));
        }
        Ok(None)
    }

    /// Follows `$ref`s and single-member `allOf` wrappers.
    fn resolve(&self, schema: &Value) -> Result<Value, ConfigurationError> {
        let mut current = schema;
        for _ in 0..MAX_REF_DEPTH {
            if let Some(reference) = current.get("$ref").and_then(Value::as_str) {
                current = reference
                    .strip_prefix('#')
                    .and_then(|pointer| self.root.pointer(pointer))
                    .ok_or_else(|| self.invalid_reference(reference))?;
            } else if let Some([single]) = current.get("allOf").and_then(Value::as_array).map(Vec::as_slice) {
                current = single;
            } else {
                return Ok(current.clone());
            }
        }
        Err(self.invalid_reference("reference cycle"))
    }

    /// Resolves `raw` and strips a `null` alternative, reporting whether there was one.
    fn normalize(&self, raw: &Value) -> Result<(Value, bool), ConfigurationError> {
        let schema = self.resolve(raw)?;

        for key in ["anyOf", "oneOf"] {
            if let Some(variants) = schema.get(key).and_then(Value::as_array) {
                let (nulls, others): (Vec<&Value>, Vec<&Value>) =
                    variants.iter().partition(|variant| is_null_schema(variant));
                if !nulls.is_empty() && others.len() == 1 {
                    let (inner, _) = self.normalize(others[0])?;
                    return Ok((inner, true));
                }
            }
        }

        if let Some(Value::Array(types)) = schema.get("type") {
            let non_null: Vec<&Value> = types
                .iter()
                .filter(|kind| kind.as_str() != Some("null"))
                .collect();
            if non_null.len() == 1 && non_null.len() < types.len() {
                let only = non_null[0].clone();
                let mut schema = schema.clone();
                schema["type"] = only;
                return Ok((schema, true));
            }
        }

        Ok((schema, false))
    }

    fn unsupported(&self, property: &str, reason: impl Into<String>) -> ConfigurationError {
        ConfigurationError::UnsupportedProperty {
            model: self.model.to_owned(),
            property: property.to_owned(),
            reason: reason.into(),
        }
    }

    fn invalid_reference(&self, reference: &str) -> ConfigurationError {
        ConfigurationError::InvalidReference {
            model: self.model.to_owned(),
            reference: reference.to_owned(),
        }
    }
}

fn is_null_schema(schema: &Value) -> bool {
    schema.get("type").and_then(Value::as_str) == Some("null")
}

fn is_nested_object(schema: &Value) -> bool {
    let kind = schema.get("type").and_then(Value::as_str);
    matches!(kind, None | Some("object")) && schema.get("properties").is_some_and(Value::is_object)
}

fn string_html_type(meta: &Meta<'_>) -> InputHtmlType {
    if meta.get("writeOnly").and_then(Value::as_bool) == Some(true) {
        return InputHtmlType::Password;
    }
    match meta.string("format").as_deref() {
        Some("date") => InputHtmlType::Date,
        Some("date-time") => InputHtmlType::DatetimeLocal,
        Some("time") => InputHtmlType::Time,
        Some("email") => InputHtmlType::Email,
        Some("uri") => InputHtmlType::Url,
        Some("password") => InputHtmlType::Password,
        _ => InputHtmlType::Text,
    }
}

fn option_value(value: &Value) -> Option<String> {
    match value {
        Value::String(value) => Some(value.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn plain_option(value: &Value) -> Option<SelectOption> {
    option_value(value).map(|value| {
        let label = title_case(&value);
        SelectOption::new(value, label)
    })
}

/// `billing_address` -> `Billing Address`.
fn title_case(key: &str) -> String {
    key.split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
