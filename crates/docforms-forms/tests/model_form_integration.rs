//! Integration tests for the schema -> form pipeline.
//!
//! These tests drive the public API across the odm and forms crates:
//! 1. Field-set generation from declared schemas (`model_fields`)
//! 2. Form class synthesis, embedded sub-forms, and references (`model_form`)
//! 3. Validation of submitted data through generated forms
//! 4. Custom converters, self-converting fields, and settings

use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, LazyLock};

use docforms_core::settings_loader;
use docforms_core::{DocformsError, Settings, SETTINGS};
use docforms_forms::fields::{FieldArgs, FieldKwargs, FormFieldDef, FormFieldType};
use docforms_forms::filters::Filter;
use docforms_forms::form::{FormBase, FormData};
use docforms_forms::orm::{
    conversion_hook, model_fields, model_form, ConvertFn, FormOptions, ModelConverter,
    ToFormField,
};
use docforms_forms::reference::StaticChoiceLoader;
use docforms_forms::validators::{Validator, UNBOUNDED};
use docforms_odm::document::{register_document, Document, DocumentMeta};
use docforms_odm::fields::{DocumentField, FieldKind};
use docforms_odm::value::Value;

// ============================================================================
// Shared fixtures
// ============================================================================

struct Person;

static PERSON_META: LazyLock<DocumentMeta> = LazyLock::new(|| {
    DocumentMeta::new("Person")
        .field(
            DocumentField::new("name", FieldKind::String)
                .max_length(50)
                .required(),
        )
        .field(DocumentField::new("age", FieldKind::Int).min_value(0.0))
        .field(DocumentField::list(
            "tags",
            DocumentField::element(FieldKind::String),
        ))
});

impl Document for Person {
    fn meta() -> &'static DocumentMeta {
        &PERSON_META
    }
}

static ADDRESS: LazyLock<Arc<DocumentMeta>> = LazyLock::new(|| {
    DocumentMeta::new("Address")
        .field(DocumentField::new("street", FieldKind::String).max_length(80))
        .field(DocumentField::new("city", FieldKind::String).required())
        .field(DocumentField::new("location", FieldKind::GeoLocation))
        .into_shared()
});

/// A blog post touching every built-in field type.
static POST: LazyLock<Arc<DocumentMeta>> = LazyLock::new(|| {
    DocumentMeta::new("Post")
        .field(DocumentField::new("id", FieldKind::ObjectId))
        .field(
            DocumentField::new("title", FieldKind::String)
                .min_length(3)
                .max_length(120)
                .required(),
        )
        .field(DocumentField::new("body", FieldKind::String).max_length(-1))
        .field(DocumentField::new("slug", FieldKind::String).regex("[a-z0-9-]+"))
        .field(DocumentField::new("homepage", FieldKind::Url))
        .field(DocumentField::new("contact", FieldKind::Email).required())
        .field(
            DocumentField::new("rating", FieldKind::Float)
                .min_value(0.0)
                .max_value(5.0),
        )
        .field(DocumentField::new("price", FieldKind::Decimal))
        .field(DocumentField::new("published", FieldKind::Boolean).default(false))
        .field(DocumentField::new("published_at", FieldKind::DateTime))
        .field(DocumentField::new("thumbnail", FieldKind::Binary).max_bytes(4096))
        .field(DocumentField::new("extra", FieldKind::Dict))
        .field(DocumentField::sorted_list(
            "scores",
            DocumentField::element(FieldKind::Int),
        ))
        .field(DocumentField::new("origin", FieldKind::GeoLocation))
        .field(DocumentField::new("related", FieldKind::GenericReference))
        .field(DocumentField::embedded("address", Arc::clone(&ADDRESS)))
        .field(DocumentField::reference("author", "Author").required())
        .field(
            DocumentField::new("status", FieldKind::String)
                .choices([("draft", "Draft"), ("live", "Live")]),
        )
        .into_shared()
});

fn person() -> Arc<DocumentMeta> {
    Arc::new(Person::meta().clone())
}

fn names_of(fields: &docforms_forms::fields::FormFields) -> HashSet<String> {
    fields.names().into_iter().map(str::to_string).collect()
}

fn set(names: &[&str]) -> HashSet<String> {
    names.iter().map(|n| (*n).to_string()).collect()
}

// ============================================================================
// 1. Field-set generation
// ============================================================================

#[test]
fn test_person_round_trip() {
    let fields = model_fields(&person(), &FormOptions::new(), None).unwrap();
    assert_eq!(fields.names(), vec!["name", "age", "tags"]);

    let name = fields.get("name").unwrap();
    assert_eq!(name.field_type, FormFieldType::Text);
    assert_eq!(
        name.validators,
        vec![
            Validator::Required,
            Validator::Length {
                min: UNBOUNDED,
                max: 50
            },
        ]
    );

    let age = fields.get("age").unwrap();
    assert_eq!(age.field_type, FormFieldType::Integer);
    assert_eq!(
        age.validators,
        vec![Validator::NumberRange {
            min: Some(0.0),
            max: None
        }]
    );

    let tags = fields.get("tags").unwrap();
    let FormFieldType::FieldList { entry, min_entries } = &tags.field_type else {
        panic!("tags should be a field list, got {:?}", tags.field_type);
    };
    assert_eq!(*min_entries, 0);
    assert_eq!(entry.field_type, FormFieldType::Text);
    assert!(tags.validators.is_empty());
    assert!(tags.filters.is_empty());
}

#[test]
fn test_only_and_exclude() {
    let only = model_fields(&person(), &FormOptions::new().only(["name"]), None).unwrap();
    assert_eq!(names_of(&only), set(&["name"]));

    let exclude = model_fields(&person(), &FormOptions::new().exclude(["name"]), None).unwrap();
    assert_eq!(names_of(&exclude), set(&["age", "tags"]));

    // `only` decides alone; `exclude` is not consulted.
    let both = FormOptions::new().only(["name", "age"]).exclude(["name"]);
    let fields = model_fields(&person(), &both, None).unwrap();
    assert_eq!(fields.names(), vec!["name", "age"]);
}

#[test]
fn test_field_args_override_only_label() {
    let options = FormOptions::new().field_args("age", FieldArgs::new().label("Years"));
    let fields = model_fields(&person(), &options, None).unwrap();
    let age = fields.get("age").unwrap();
    assert_eq!(age.label, "Years");
    assert_eq!(age.description, "");
    assert!(age.filters.is_empty());
    assert!(age.default.is_none());
    assert_eq!(age.count_validators("number_range"), 1);

    // Other fields keep their defaults.
    assert_eq!(fields.get("name").unwrap().label, "name");
}

#[test]
fn test_every_builtin_type() {
    let fields = model_fields(&*POST, &FormOptions::new(), None).unwrap();
    let expected = [
        ("title", "TextField"),
        ("body", "TextAreaField"),
        ("slug", "TextField"),
        ("homepage", "TextField"),
        ("contact", "TextField"),
        ("rating", "FloatField"),
        ("price", "DecimalField"),
        ("published", "BooleanField"),
        ("published_at", "DateTimeField"),
        ("thumbnail", "TextAreaField"),
        ("extra", "TextAreaField"),
        ("scores", "FieldList"),
        ("address", "FormField"),
        ("author", "ModelSelectField"),
        ("status", "SelectField"),
    ];
    assert_eq!(fields.len(), expected.len());
    for (name, type_name) in expected {
        let field = fields
            .get(name)
            .unwrap_or_else(|| panic!("missing field {name}"));
        assert_eq!(field.field_type.type_name(), type_name, "field {name}");
    }
}

#[test]
fn test_unsupported_types_never_appear() {
    let fields = model_fields(&*POST, &FormOptions::new(), None).unwrap();
    for name in ["id", "origin", "related"] {
        assert!(!fields.contains(name), "{name} should be omitted");
    }
}

#[test]
fn test_required_fields_have_one_required_validator() {
    let fields = model_fields(&*POST, &FormOptions::new(), None).unwrap();
    for name in ["title", "contact", "author"] {
        assert_eq!(fields.get(name).unwrap().count_validators("required"), 1, "{name}");
    }
    let title = fields.get("title").unwrap();
    assert_eq!(title.validators.len(), 2);
    let contact = fields.get("contact").unwrap();
    assert_eq!(contact.validators, vec![Validator::Required, Validator::Email]);
}

#[test]
fn test_choices_become_select() {
    let fields = model_fields(&*POST, &FormOptions::new(), None).unwrap();
    let status = fields.get("status").unwrap();
    assert_eq!(
        status.choices().unwrap(),
        &[
            (Value::from("draft"), "Draft".to_string()),
            (Value::from("live"), "Live".to_string()),
        ]
    );
}

#[test]
fn test_declared_defaults_carry_over() {
    let fields = model_fields(&*POST, &FormOptions::new(), None).unwrap();
    assert_eq!(fields.get("published").unwrap().default, Some(Value::Bool(false)));
}

#[test]
fn test_registered_name_resolves() {
    register_document(
        DocumentMeta::new("IntegrationTag")
            .field(DocumentField::new("label", FieldKind::String).required()),
    );
    let fields = model_fields("IntegrationTag", &FormOptions::new(), None).unwrap();
    assert_eq!(fields.names(), vec!["label"]);
}

#[test]
fn test_unregistered_name_is_rejected() {
    let err = model_form(
        "NotADocument",
        &FormBase::model_form(),
        &FormOptions::new(),
        None,
    )
    .unwrap_err();
    assert!(matches!(err, DocformsError::TypeError(_)));
}

#[test]
fn test_unordered_schema_contains_every_field() {
    let meta = Person::meta().clone().unordered();
    let fields = model_fields(&meta, &FormOptions::new(), None).unwrap();
    assert_eq!(names_of(&fields), set(&["name", "age", "tags"]));
}

// ============================================================================
// 2. Form class synthesis
// ============================================================================

#[test]
fn test_form_class_shape() {
    let form = model_form(&person(), &FormBase::model_form(), &FormOptions::new(), None).unwrap();
    assert_eq!(form.name(), "PersonForm");
    assert_eq!(form.base().name, "ModelForm");
    assert_eq!(form.model_class().name, "Person");
    assert_eq!(form.fields().names(), vec!["name", "age", "tags"]);
}

#[test]
fn test_embedded_form_matches_schema_walk() {
    let fields = model_fields(&*POST, &FormOptions::new(), None).unwrap();
    let address = fields.get("address").unwrap();
    let FormFieldType::FormField { form } = &address.field_type else {
        panic!("address should be a sub-form, got {:?}", address.field_type);
    };
    let expected = model_fields(&*ADDRESS, &FormOptions::new(), None).unwrap();
    assert_eq!(form.fields(), &expected);
    assert_eq!(form.name(), "AddressForm");
    assert_eq!(form.model_class().name, "Address");
    assert!(address.validators.is_empty());
}

#[test]
fn test_embedded_form_ignores_outer_options() {
    let options = FormOptions::new()
        .exclude(["city"])
        .field_args("address", FieldArgs::new().label("Where"));
    let fields = model_fields(&*POST, &options, None).unwrap();
    let address = fields.get("address").unwrap();
    assert_eq!(address.label, "address");
    let FormFieldType::FormField { form } = &address.field_type else {
        panic!("address should be a sub-form");
    };
    assert!(form.fields().contains("city"));
}

#[test]
fn test_custom_base_fields_precede_generated() {
    let base = FormBase::new("SecureForm").field(FormFieldDef::new(
        "csrf_token",
        FormFieldType::Text,
        FieldKwargs {
            validators: vec![Validator::Required],
            ..FieldKwargs::new("csrf_token")
        },
    ));
    let form = model_form(&person(), &base, &FormOptions::new(), None).unwrap();
    let names: Vec<&str> = form.all_fields().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["csrf_token", "name", "age", "tags"]);
}

#[test]
fn test_reference_choices_resolve() {
    let form = model_form(&*POST, &FormBase::model_form(), &FormOptions::new(), None).unwrap();
    let loader = StaticChoiceLoader::new().with_document(
        "Author",
        vec![
            (Value::from("a1"), "Ada".to_string()),
            (Value::from("a2"), "Grace".to_string()),
        ],
    );
    let resolved = form.resolve_choices(&loader).unwrap();
    let author = resolved.field("author").unwrap();
    assert_eq!(author.field_type.type_name(), "SelectField");
    assert_eq!(author.choices().unwrap().len(), 2);
    assert!(author.is_required());
}

#[test]
fn test_reference_choice_loader_failure_propagates() {
    let form = model_form(&*POST, &FormBase::model_form(), &FormOptions::new(), None).unwrap();
    let loader = |document: &str| -> docforms_core::DocformsResult<Vec<(Value, String)>> {
        Err(DocformsError::ChoiceLoadError(format!("{document} unavailable")))
    };
    let err = form.resolve_choices(&loader).unwrap_err();
    assert!(matches!(err, DocformsError::ChoiceLoadError(_)));
}

#[test]
fn test_form_descriptor_json() {
    let form = model_form(&person(), &FormBase::model_form(), &FormOptions::new(), None).unwrap();
    let json = form.to_json();
    assert_eq!(json["name"], "PersonForm");
    assert_eq!(json["model_class"], "Person");
    assert_eq!(json["fields"][0]["type"], "TextField");
    assert_eq!(json["fields"][0]["required"], true);
    assert_eq!(json["fields"][1]["validators"][0]["code"], "number_range");
    assert_eq!(json["fields"][2]["entry"]["widget"], "TextInput");
}

// ============================================================================
// 3. Validation through generated forms
// ============================================================================

#[test]
fn test_person_form_accepts_valid_data() {
    let form = model_form(&person(), &FormBase::model_form(), &FormOptions::new(), None).unwrap();
    let data = FormData::from([
        ("name".to_string(), Value::from("Ada Lovelace")),
        ("age".to_string(), Value::from("36")),
        (
            "tags".to_string(),
            Value::List(vec![Value::from("math"), Value::from("poetry")]),
        ),
    ]);
    let cleaned = form.validate(&data).unwrap();
    assert_eq!(cleaned["age"], Value::Int(36));
    assert_eq!(cleaned["name"], Value::from("Ada Lovelace"));
}

#[test]
fn test_person_form_reports_each_failure() {
    let form = model_form(&person(), &FormBase::model_form(), &FormOptions::new(), None).unwrap();
    let data = FormData::from([
        ("name".to_string(), Value::from("x".repeat(51))),
        ("age".to_string(), Value::from("-3")),
    ]);
    let errors = form.validate(&data).unwrap_err();
    assert_eq!(
        errors["name"],
        vec!["Field cannot be longer than 50 characters.".to_string()]
    );
    assert_eq!(errors["age"], vec!["Number must be at least 0.".to_string()]);
}

#[test]
fn test_post_form_nested_errors() {
    let form = model_form(
        &*POST,
        &FormBase::model_form(),
        &FormOptions::new().only(["title", "address", "scores"]),
        None,
    )
    .unwrap();
    let data = FormData::from([
        ("title".to_string(), Value::from("Hello")),
        ("address".to_string(), Value::Map(BTreeMap::new())),
        (
            "scores".to_string(),
            Value::List(vec![Value::from("3"), Value::from("three")]),
        ),
    ]);
    let errors = form.validate(&data).unwrap_err();
    assert!(errors.contains_key("address-city"));
    assert!(errors.contains_key("scores-1"));
    assert!(!errors.contains_key("scores-0"));
    assert!(!errors.contains_key("title"));
}

#[test]
fn test_filters_from_field_args() {
    let options = FormOptions::new().field_args(
        "name",
        FieldArgs::new()
            .filters(vec![Filter::Strip, Filter::Lowercase])
            .validators(vec![Validator::Length { min: 2, max: 5 }]),
    );
    let form = model_form(&person(), &FormBase::model_form(), &options, None).unwrap();
    let data = FormData::from([("name".to_string(), Value::from("  ADA  "))]);
    let cleaned = form.validate(&data).unwrap();
    assert_eq!(cleaned["name"], Value::from("ada"));
}

// ============================================================================
// 4. Custom converters, self-converting fields, and settings
// ============================================================================

#[test]
fn test_custom_converter_for_application_type() {
    let color: ConvertFn = Arc::new(
        |_: &ModelConverter, _: &DocumentMeta, field: &DocumentField, mut kwargs: FieldKwargs| {
            kwargs.validators.push(Validator::Regexp {
                pattern: "#[0-9a-f]{6}".into(),
            });
            Some(FormFieldDef::new(&field.name, FormFieldType::Text, kwargs))
        },
    );
    let converter = ModelConverter::with_converters([("ColorField".to_string(), color)]);
    let meta = DocumentMeta::new("Theme")
        .field(DocumentField::new("accent", FieldKind::Custom("ColorField".into())))
        .field(DocumentField::new("font", FieldKind::Custom("FontField".into())));

    let fields = model_fields(&meta, &FormOptions::new(), Some(&converter)).unwrap();
    assert_eq!(fields.names(), vec!["accent"]);
    assert_eq!(fields.get("accent").unwrap().count_validators("regexp"), 1);

    // Without the custom converter the type is simply left out.
    let fields = model_fields(&meta, &FormOptions::new(), None).unwrap();
    assert!(fields.is_empty());
}

#[test]
fn test_custom_converter_replaces_builtin() {
    let hidden_int: ConvertFn = Arc::new(
        |_: &ModelConverter, _: &DocumentMeta, field: &DocumentField, kwargs: FieldKwargs| {
            Some(FormFieldDef::new(&field.name, FormFieldType::Text, kwargs))
        },
    );
    let converter = ModelConverter::with_converters([("IntField".to_string(), hidden_int)]);
    let fields = model_fields(&person(), &FormOptions::new(), Some(&converter)).unwrap();
    assert_eq!(fields.get("age").unwrap().field_type, FormFieldType::Text);
}

struct Stars(u8);

impl ToFormField for Stars {
    fn to_form_field(
        &self,
        _model: &DocumentMeta,
        field: &DocumentField,
        kwargs: FieldKwargs,
    ) -> Option<FormFieldDef> {
        let choices = (1..=self.0)
            .map(|n| (Value::Int(i64::from(n)), "*".repeat(usize::from(n))))
            .collect();
        Some(FormFieldDef::new(
            &field.name,
            FormFieldType::Select { choices },
            kwargs,
        ))
    }
}

#[test]
fn test_self_converting_field() {
    let meta = DocumentMeta::new("Review").field(
        DocumentField::new("stars", FieldKind::Custom("StarsField".into()))
            .required()
            .conversion_hook(conversion_hook(Stars(5))),
    );
    let form = model_form(&meta, &FormBase::model_form(), &FormOptions::new(), None).unwrap();
    let stars = form.field("stars").unwrap();
    assert_eq!(stars.choices().unwrap().len(), 5);
    assert!(stars.is_required());

    let data = FormData::from([("stars".to_string(), Value::from("4"))]);
    assert_eq!(form.validate(&data).unwrap()["stars"], Value::Int(4));
}

#[test]
fn test_settings_drive_converter() {
    let settings = settings_loader::from_toml_str(
        r#"
        datetime_format = "%d/%m/%Y %H:%M"
        "#,
    )
    .unwrap();
    let converter = ModelConverter::new().with_settings(&settings);
    let meta = DocumentMeta::new("Event")
        .field(DocumentField::new("starts", FieldKind::DateTime))
        .field(DocumentField::list(
            "hosts",
            DocumentField::element(FieldKind::String),
        ));
    let form = model_form(
        &meta,
        &FormBase::model_form(),
        &FormOptions::new(),
        Some(&converter),
    )
    .unwrap();

    let data = FormData::from([("starts".to_string(), Value::from("29/02/2024 18:30"))]);
    let cleaned = form.validate(&data).unwrap();
    assert!(matches!(cleaned["starts"], Value::DateTime(_)));
    assert_eq!(cleaned["hosts"], Value::List(vec![]));
}

#[test]
fn test_configured_settings_keep_lists_unbounded() {
    if !SETTINGS.is_configured() {
        SETTINGS.configure(Settings {
            debug: true,
            ..Settings::default()
        });
    }
    let fields = model_fields(&person(), &FormOptions::new(), None).unwrap();
    let tags = fields.get("tags").unwrap();
    let FormFieldType::FieldList { min_entries, .. } = &tags.field_type else {
        panic!("tags should be a field list, got {:?}", tags.field_type);
    };
    assert_eq!(*min_entries, 0);
}
