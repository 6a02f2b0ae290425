use crate::ValidationError;
use jsonschema::error::ValidationErrorKind;
use jsonschema::Validator;
use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

/// Attribute name to wire key. Every other attribute is emitted under its own name.
pub const WIRE_RENAMES: [(&str, &str); 6] = [
    ("display_mode", "displayMode"),
    ("html_type", "htmlType"),
    ("search_url", "searchUrl"),
    ("submit_url", "submitUrl"),
    ("submit_on_change", "submitOnChange"),
    ("form_fields", "formFields"),
];

static VALIDATORS: LazyLock<RwLock<HashMap<TypeId, Arc<Validator>>>> =
    LazyLock::new(Default::default);

/// Builds a `T` from untyped JSON, all or nothing.
///
/// The value is first checked against the JSON Schema generated for `T`, which pins failures to
/// the attribute that caused them; serde then does the actual construction. Attribute names are
/// accepted in place of wire keys.
pub fn construct<T: JsonSchema + DeserializeOwned + 'static>(
    mut value: Value,
) -> Result<T, ValidationError> {
    canonicalize_keys(&mut value);
    check::<T>(&value)?;
    serde_json::from_value(value).map_err(|e| ValidationError::new("", e.to_string()))
}

/// Reports the first schema violation of `value` against `T`'s schema.
pub fn check<T: JsonSchema + 'static>(value: &Value) -> Result<(), ValidationError> {
    let validator = validator::<T>()?;
    let first = validator
        .iter_errors(value)
        .next()
        .map(|error| to_validation_error(&error));
    first.map_or(Ok(()), Err)
}

/// The compiled validator for `T`, built on first use.
fn validator<T: JsonSchema + 'static>() -> Result<Arc<Validator>, ValidationError> {
    let id = TypeId::of::<T>();
    if let Some(validator) = VALIDATORS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&id)
    {
        return Ok(Arc::clone(validator));
    }

    let schema = schema_for!(T);
    let compiled = jsonschema::validator_for(schema.as_value()).map_err(|e| {
        ValidationError::new("", format!("schema for `{}` is unusable: {e}", T::schema_name()))
    })?;
    let mut validators = VALIDATORS.write().unwrap_or_else(PoisonError::into_inner);
    Ok(Arc::clone(
        validators.entry(id).or_insert_with(|| Arc::new(compiled)),
    ))
}

/// Rewrites attribute-name keys to wire keys. `initial` and `footer` hold caller data and
/// opaque components, so they are left alone.
fn canonicalize_keys(value: &mut Value) {
    match value {
        Value::Object(object) => {
            for (attribute, wire) in WIRE_RENAMES {
                if !object.contains_key(wire) {
                    if let Some(inner) = object.remove(attribute) {
                        object.insert(wire.to_owned(), inner);
                    }
                }
            }
            for (key, inner) in object.iter_mut() {
                if key != "initial" && key != "footer" {
                    canonicalize_keys(inner);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(canonicalize_keys),
        _ => {}
    }
}

fn to_validation_error(error: &jsonschema::ValidationError<'_>) -> ValidationError {
    let mut path = error.instance_path.to_string();
    // Missing and unexpected attributes are reported on their parent object.
    let attribute = match &error.kind {
        ValidationErrorKind::Required { property } => property.as_str(),
        ValidationErrorKind::AdditionalProperties { unexpected } => {
            unexpected.first().map(String::as_str)
        }
        _ => None,
    };
    if let Some(name) = attribute {
        path.push('/');
        path.push_str(name);
    }
    ValidationError::new(path, error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{FormField, FormFieldInput, InputInitial};
    use crate::forms::{Footer, Form};
    use serde_json::json;

    #[test]
    fn valid_input_is_constructed() {
        let field: FormFieldInput = construct(json!({
            "name": "age",
            "title": "Age",
            "htmlType": "number",
            "initial": 3,
        }))
        .unwrap();
        assert_eq!(field.initial, Some(InputInitial::Number(3.0)));
    }

    #[test]
    fn boolean_initial_is_rejected_at_its_path() {
        let err = construct::<FormFieldInput>(json!({
            "name": "age",
            "title": "Age",
            "initial": true,
        }))
        .unwrap_err();
        assert_eq!(err.path, "/initial");
    }

    #[test]
    fn missing_required_attribute_is_named() {
        let err = construct::<FormFieldInput>(json!({"title": "Age"})).unwrap_err();
        assert_eq!(err.path, "/name");
    }

    #[test]
    fn enum_violations_point_at_the_attribute() {
        let err = construct::<FormFieldInput>(json!({
            "name": "when",
            "title": "When",
            "htmlType": "week",
        }))
        .unwrap_err();
        assert_eq!(err.path, "/htmlType");

        let err = Form::from_value(json!({
            "submitUrl": "/x",
            "method": "PUT",
            "formFields": [],
        }))
        .unwrap_err();
        assert_eq!(err.path, "/method");
    }

    #[test]
    fn nested_field_errors_point_into_the_field_list() {
        let err = Form::from_value(json!({
            "submitUrl": "/x",
            "formFields": [{"name": "x", "title": "X", "type": "FormFieldColor"}],
        }))
        .unwrap_err();
        assert!(err.path.starts_with("/formFields/0"), "{}", err.path);
    }

    #[test]
    fn attribute_names_pass_the_schema_check() {
        let form = Form::from_value(json!({
            "submit_url": "/x",
            "form_fields": [{"name": "city", "title": "City", "search_url": "/cities", "type": "FormFieldSelectSearch"}],
            "initial": {"search_url": "kept"},
        }))
        .unwrap();
        assert_eq!(form.base().submit_url(), "/x");
        assert_eq!(form.base().initial().unwrap()["search_url"], json!("kept"));
    }

    #[test]
    fn unexpected_attributes_are_named() {
        let err = Form::from_value(json!({
            "submitUrl": "/x",
            "formFields": [],
            "bogus": 1,
        }))
        .unwrap_err();
        assert_eq!(err.path, "/bogus");
    }

    #[test]
    fn validators_are_compiled_once_per_type() {
        let first = validator::<Form>().unwrap();
        let second = validator::<Form>().unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let other = validator::<FormFieldInput>().unwrap();
        assert!(!Arc::ptr_eq(&first, &other));
    }

    #[test]
    fn construction_through_the_guard_still_finalizes() {
        let form = Form::from_value(json!({
            "submitUrl": "/filter",
            "displayMode": "inline",
            "formFields": [{"name": "q", "title": "Search", "type": "FormFieldInput"}],
        }))
        .unwrap();
        assert_eq!(form.base().footer(), Some(&Footer::HIDDEN));
        assert!(matches!(form.form_fields()[0], FormField::Input(_)));
    }
}
