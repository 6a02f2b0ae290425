use formwire::{
    model_json_schema_to_fields, AnyForm, BooleanMode, ConfigurationError, DisplayMode, Footer,
    FormField, FormMethod, InputHtmlType, ModelForm, ModelRegistry, ModelSchema, SelectOption,
    SelectOptions, Title,
};
use pretty_assertions::assert_eq;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
#[allow(dead_code)]
enum Plan {
    Free,
    TeamPlus,
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[allow(dead_code)]
struct Address {
    street: String,
    city: String,
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[allow(dead_code)]
struct Signup {
    /// Where we send the confirmation link.
    #[schemars(extend("format" = "email"))]
    email: String,
    age: Option<u32>,
    plan: Plan,
    #[schemars(extend("search_url" = "/api/countries"))]
    country: String,
    #[serde(default)]
    #[schemars(extend("mode" = "switch"))]
    newsletter: bool,
    address: Address,
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[allow(dead_code)]
struct Tagged(String);

#[derive(Serialize, Deserialize, JsonSchema)]
#[allow(dead_code)]
struct Node {
    label: String,
    child: Option<Box<Node>>,
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[allow(dead_code)]
struct Tree {
    name: String,
    root: Node,
}

fn signup_form() -> ModelForm {
    ModelForm::builder("/api/signup")
        .model::<Signup>()
        .with_method(FormMethod::Post)
        .build()
        .unwrap()
}

#[test]
fn fields_follow_declaration_order() {
    let form = signup_form();
    let names: Vec<&str> = form.form_fields().iter().map(FormField::name).collect();
    assert_eq!(
        names,
        vec!["email", "age", "plan", "country", "newsletter", "address.street", "address.city"]
    );
}

#[test]
fn scalar_properties_map_to_inputs() {
    let form = signup_form();

    let FormField::Input(email) = &form.form_fields()[0] else {
        panic!("email should be an input");
    };
    assert_eq!(email.html_type, InputHtmlType::Email);
    assert!(email.base.required);
    assert_eq!(email.base.title, Title::from("Email"));
    assert_eq!(
        email.base.description.as_deref(),
        Some("Where we send the confirmation link.")
    );

    let FormField::Input(age) = &form.form_fields()[1] else {
        panic!("age should be an input");
    };
    assert_eq!(age.html_type, InputHtmlType::Number);
    assert!(!age.base.required);
}

#[test]
fn enums_extensions_and_booleans() {
    let form = signup_form();

    let FormField::Select(plan) = &form.form_fields()[2] else {
        panic!("plan should be a select");
    };
    assert_eq!(
        plan.options,
        SelectOptions::Options(vec![
            SelectOption::new("free", "Free"),
            SelectOption::new("team_plus", "Team Plus"),
        ])
    );

    let FormField::SelectSearch(country) = &form.form_fields()[3] else {
        panic!("country should be a search select");
    };
    assert_eq!(country.search_url, "/api/countries");

    let FormField::Boolean(newsletter) = &form.form_fields()[4] else {
        panic!("newsletter should be a boolean");
    };
    assert_eq!(newsletter.mode, BooleanMode::Switch);
    assert_eq!(newsletter.initial, Some(false));
    assert!(!newsletter.base.required);
}

#[test]
fn nested_structs_get_breadcrumb_titles() {
    let form = signup_form();
    let street = form.form_fields()[5].base();
    assert_eq!(street.name, "address.street");
    assert_eq!(street.title, Title::from(vec!["Address", "Street"]));
    assert!(street.required);
}

#[test]
fn model_forms_follow_the_footer_rule() {
    let form = ModelForm::builder("/api/signup")
        .model::<Signup>()
        .with_display_mode(DisplayMode::Inline)
        .build()
        .unwrap();
    assert_eq!(form.base().footer(), Some(&Footer::HIDDEN));

    let value = serde_json::to_value(AnyForm::from(form)).unwrap();
    assert_eq!(value["type"], "ModelForm");
    assert_eq!(value["footer"], serde_json::json!(false));
    assert_eq!(value["formFields"][3]["searchUrl"], "/api/countries");
}

#[test]
fn non_model_types_are_rejected() {
    let err = ModelForm::builder("/x").model::<Tagged>().build().unwrap_err();
    assert_eq!(err, ConfigurationError::NotAModel { model: "Tagged".into() });

    let err = ModelForm::builder("/x").model::<Plan>().build().unwrap_err();
    assert!(matches!(err, ConfigurationError::NotAModel { .. }));
}

#[test]
fn recursive_models_are_configuration_errors() {
    let err = ModelForm::builder("/x").model::<Node>().build().unwrap_err();
    assert!(matches!(
        err,
        ConfigurationError::UnsupportedProperty { ref property, .. } if property == "child"
    ));

    let err = ModelForm::builder("/x").model::<Tree>().build().unwrap_err();
    assert!(matches!(
        err,
        ConfigurationError::UnsupportedProperty { ref property, .. } if property == "root.child"
    ));
}

#[test]
fn registry_models_match_typed_models() {
    let mut registry = ModelRegistry::new();
    registry.register::<Signup>();

    let from_registry = model_json_schema_to_fields(registry.get("Signup").unwrap()).unwrap();
    let typed = model_json_schema_to_fields(&ModelSchema::of::<Signup>()).unwrap();
    assert_eq!(from_registry, typed);
    assert_eq!(typed, signup_form().form_fields());
}
