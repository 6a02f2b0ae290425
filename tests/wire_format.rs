use formwire::{
    AnyComponent, AnyForm, BaseForm, DisplayMode, Footer, Form, FormField, FormFieldBoolean,
    FormFieldFile, FormFieldInput, FormFieldSelect, FormFieldSelectSearch, FormMethod,
    InputHtmlType, SelectGroup, SelectOption, Title, WIRE_RENAMES,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn wire(value: impl serde::Serialize) -> Value {
    serde_json::to_value(value).unwrap()
}

#[test]
fn every_field_kind_carries_its_discriminator() {
    let fields: Vec<FormField> = vec![
        FormFieldInput::new("name", "Name").into(),
        FormFieldBoolean::new("agree", "Agree").into(),
        FormFieldFile::new("cv", "CV").into(),
        FormFieldSelect::new("size", "Size", vec![SelectOption::new("s", "Small")]).into(),
        FormFieldSelectSearch::new("city", "City", "/api/cities").into(),
    ];

    let kinds: Vec<Value> = fields.iter().map(|field| wire(field)["type"].clone()).collect();
    assert_eq!(
        kinds,
        vec![
            json!("FormFieldInput"),
            json!("FormFieldBoolean"),
            json!("FormFieldFile"),
            json!("FormFieldSelect"),
            json!("FormFieldSelectSearch"),
        ]
    );
    for field in &fields {
        assert_eq!(wire(field)["type"], json!(field.kind()));
    }
}

#[test]
fn input_field_wire_shape() {
    let field = FormFieldInput::new("born", "Date of birth")
        .required()
        .with_html_type(InputHtmlType::DatetimeLocal)
        .with_placeholder("yyyy-mm-dd")
        .with_class_name("w-50");

    assert_eq!(
        wire(&field),
        json!({
            "name": "born",
            "title": "Date of birth",
            "required": true,
            "error": null,
            "locked": false,
            "description": null,
            "displayMode": null,
            "class_name": "w-50",
            "htmlType": "datetime-local",
            "initial": null,
            "placeholder": "yyyy-mm-dd",
            "type": "FormFieldInput",
        })
    );
}

#[test]
fn select_search_uses_camel_case_url_and_keeps_debounce_unset() {
    let field = FormFieldSelectSearch::new("city", "City", "/api/cities").multiple();
    let value = wire(&field);
    assert_eq!(value["searchUrl"], json!("/api/cities"));
    assert_eq!(value["multiple"], json!(true));
    assert_eq!(value["debounce"], Value::Null);
    assert_eq!(field.effective_debounce(), formwire::DEFAULT_DEBOUNCE_MS);
    assert!(value.get("search_url").is_none());
}

#[test]
fn grouped_select_options() {
    let field = FormFieldSelect::new(
        "car",
        "Car",
        vec![SelectGroup {
            label: "Swedish".into(),
            options: vec![SelectOption::new("volvo", "Volvo"), SelectOption::new("saab", "Saab")],
        }],
    );
    let value = wire(&field);
    assert_eq!(value["options"][0]["label"], json!("Swedish"));
    assert_eq!(value["options"][0]["options"][1]["value"], json!("saab"));

    let back = FormField::from_value(value).unwrap();
    assert_eq!(back, FormField::Select(field));
}

#[test]
fn breadcrumb_titles_serialize_as_lists() {
    let field = FormFieldInput::new("address.city", vec!["Address", "City"]);
    assert_eq!(wire(&field)["title"], json!(["Address", "City"]));
    assert_eq!(field.base.title, Title::Lines(vec!["Address".into(), "City".into()]));
}

#[test]
fn attribute_names_are_accepted_on_input() {
    let field = FormField::from_value(json!({
        "type": "FormFieldInput",
        "name": "site",
        "title": "Site",
        "html_type": "url",
        "display_mode": "inline",
    }))
    .unwrap();

    let FormField::Input(input) = &field else {
        panic!("expected an input field");
    };
    assert_eq!(input.html_type, InputHtmlType::Url);
    assert_eq!(input.base.display_mode, Some(DisplayMode::Inline));

    let value = wire(&field);
    assert_eq!(value["htmlType"], json!("url"));
    assert_eq!(value["displayMode"], json!("inline"));
}

#[test]
fn rename_table_matches_serialized_keys() {
    let form = Form::builder("/x")
        .with_display_mode(DisplayMode::Default)
        .with_submit_on_change(false)
        .field(FormFieldSelectSearch::new("c", "C", "/c"))
        .field(FormFieldInput::new("i", "I"))
        .build();
    let value = wire(&form);
    let field_keys: Vec<String> = value["formFields"]
        .as_array()
        .unwrap()
        .iter()
        .flat_map(|field| field.as_object().unwrap().keys().cloned().collect::<Vec<_>>())
        .collect();

    for (attribute, wire_key) in WIRE_RENAMES {
        let on_form = value.get(wire_key).is_some();
        let on_field = field_keys.iter().any(|key| key == wire_key);
        assert!(on_form || on_field, "`{wire_key}` missing from the wire");
        assert!(value.get(attribute).is_none(), "`{attribute}` leaked onto the wire");
        assert!(!field_keys.iter().any(|key| key == attribute));
    }
}

#[test]
fn inline_footer_rule_survives_a_round_trip() {
    let form = Form::builder("/api/filter")
        .with_display_mode(DisplayMode::Inline)
        .with_method(FormMethod::Goto)
        .build();
    let value = wire(&form);
    assert_eq!(value["footer"], json!(false));
    assert_eq!(value["method"], json!("GOTO"));

    let back: Form = serde_json::from_value(value).unwrap();
    assert_eq!(back, form);
}

#[test]
fn footer_components_are_passed_through() {
    let button = AnyComponent::new(json!({"type": "Button", "text": "Apply"})).unwrap();
    let base = BaseForm::builder("/api/filter")
        .with_display_mode(DisplayMode::Inline)
        .with_footer(Footer::Components(vec![button]))
        .build();

    assert_eq!(wire(&base)["footer"], json!([{"type": "Button", "text": "Apply"}]));
}

#[test]
fn any_form_round_trips_both_kinds() {
    let form = Form::builder("/x").field(FormFieldBoolean::new("ok", "OK")).build();
    let value = wire(AnyForm::from(form.clone()));
    let back: AnyForm = serde_json::from_value(value).unwrap();
    assert_eq!(back, AnyForm::Form(form));

    let model_form = json!({
        "submitUrl": "/m",
        "formFields": [],
        "type": "ModelForm",
    });
    let back: AnyForm = serde_json::from_value(model_form).unwrap();
    assert_eq!(back.kind(), "ModelForm");
}

#[test]
fn invalid_field_attributes_carry_their_path() {
    let err = FormField::from_value(json!({
        "type": "FormFieldBoolean",
        "name": "agree",
        "title": "Agree",
        "mode": "toggle",
    }))
    .unwrap_err();
    assert_eq!(err.path, "/mode");

    let err = FormField::from_value(json!({
        "type": "FormFieldFile",
        "title": "CV",
    }))
    .unwrap_err();
    assert_eq!(err.path, "/name");
}
