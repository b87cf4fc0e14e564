//! Form classes.
//!
//! A [`FormClass`] is the descriptor produced for a document schema: a name,
//! the base it extends, the generated fields, and the originating schema
//! (exposed under the reserved name [`MODEL_CLASS_FIELD`]). Renderers read
//! its fields; [`FormClass::validate`] runs submitted data through filters,
//! coercion, and validators.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use docforms_core::{DocformsError, DocformsResult};
use docforms_odm::document::DocumentMeta;
use docforms_odm::value::Value;

use crate::fields::{FormFieldDef, FormFieldType, FormFields};
use crate::filters::apply_filters;
use crate::reference::ChoiceLoader;
use crate::validators::Validator;

/// The reserved attribute under which a form class exposes its schema.
pub const MODEL_CLASS_FIELD: &str = "model_class";

/// Submitted (or cleaned) form data keyed by field name.
pub type FormData = HashMap<String, Value>;

/// Validation errors keyed by field path (`tags-0`, `address-city`).
pub type FormErrors = BTreeMap<String, Vec<String>>;

/// Decodes a JSON object submission into [`FormData`].
///
/// ```
/// use docforms_forms::form::form_data_from_json;
/// use docforms_odm::value::Value;
///
/// let data = form_data_from_json(r#"{"name": "Ada", "age": 36}"#).unwrap();
/// assert_eq!(data["age"], Value::Int(36));
/// ```
pub fn form_data_from_json(json: &str) -> DocformsResult<FormData> {
    let decoded: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| DocformsError::SerializationError(format!("Invalid form JSON: {e}")))?;
    match decoded {
        serde_json::Value::Object(map) => Ok(map
            .into_iter()
            .map(|(name, value)| (name, Value::from(value)))
            .collect()),
        other => Err(DocformsError::SerializationError(format!(
            "Form data must be a JSON object, got {other}"
        ))),
    }
}

/// A base form class that generated forms extend.
#[derive(Debug, Clone, PartialEq)]
pub struct FormBase {
    /// The base class name.
    pub name: String,
    /// Fields declared on the base itself.
    pub fields: FormFields,
}

impl FormBase {
    /// Creates a base with no fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: FormFields::new(),
        }
    }

    /// The default base for generated forms.
    pub fn model_form() -> Self {
        Self::new("ModelForm")
    }

    /// Declares a field on the base.
    #[must_use]
    pub fn field(mut self, field: FormFieldDef) -> Self {
        self.fields.insert(field);
        self
    }
}

impl Default for FormBase {
    fn default() -> Self {
        Self::model_form()
    }
}

/// A form class generated from a document schema.
#[derive(Debug, Clone)]
pub struct FormClass {
    name: String,
    base: FormBase,
    fields: FormFields,
    model_class: Arc<DocumentMeta>,
}

impl FormClass {
    /// Assembles a form class.
    pub fn new(
        name: impl Into<String>,
        base: FormBase,
        fields: FormFields,
        model_class: Arc<DocumentMeta>,
    ) -> Self {
        Self {
            name: name.into(),
            base,
            fields,
            model_class,
        }
    }

    /// The class name, e.g. "ArticleForm".
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The base this class extends.
    pub const fn base(&self) -> &FormBase {
        &self.base
    }

    /// The generated fields.
    pub const fn fields(&self) -> &FormFields {
        &self.fields
    }

    /// Returns the named field, looking at generated fields first and then
    /// the base.
    pub fn field(&self, name: &str) -> Option<&FormFieldDef> {
        self.fields.get(name).or_else(|| self.base.fields.get(name))
    }

    /// Base fields not shadowed by generated ones, followed by the generated
    /// fields.
    pub fn all_fields(&self) -> Vec<&FormFieldDef> {
        self.base
            .fields
            .iter()
            .filter(|f| !self.fields.contains(&f.name))
            .chain(self.fields.iter())
            .collect()
    }

    /// The schema this form was generated from.
    pub const fn model_class(&self) -> &Arc<DocumentMeta> {
        &self.model_class
    }

    /// Returns a copy with every reference selection resolved through `loader`.
    pub fn resolve_choices(&self, loader: &dyn ChoiceLoader) -> DocformsResult<Self> {
        let fields = self
            .fields
            .iter()
            .map(|f| f.resolve_choices(loader))
            .collect::<DocformsResult<FormFields>>()?;
        Ok(Self {
            fields,
            ..self.clone()
        })
    }

    /// Serializes the class into a JSON descriptor: its name, base, schema,
    /// and every field in [`all_fields`](Self::all_fields) order.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name,
            "base": self.base.name,
            MODEL_CLASS_FIELD: self.model_class.name,
            "fields": self
                .all_fields()
                .into_iter()
                .map(FormFieldDef::to_json)
                .collect::<Vec<_>>(),
        })
    }

    /// Validates submitted data.
    ///
    /// Missing keys fall back to the field's default. Errors accumulate across
    /// all fields; on success the cleaned, coerced data is returned.
    pub fn validate(&self, data: &FormData) -> Result<FormData, FormErrors> {
        let mut cleaned = FormData::new();
        let mut errors = FormErrors::new();

        for field in self.all_fields() {
            let raw = data
                .get(&field.name)
                .cloned()
                .or_else(|| field.default.clone())
                .unwrap_or(Value::Null);
            let value = clean_value(field, raw, &field.name, &mut errors);
            cleaned.insert(field.name.clone(), value);
        }

        if errors.is_empty() {
            Ok(cleaned)
        } else {
            tracing::debug!(form = %self.name, errors = errors.len(), "form validation failed");
            Err(errors)
        }
    }
}

impl PartialEq for FormClass {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.base == other.base
            && self.fields == other.fields
            && self.model_class.name == other.model_class.name
    }
}

fn clean_value(field: &FormFieldDef, raw: Value, path: &str, errors: &mut FormErrors) -> Value {
    let value = apply_filters(&field.filters, raw);

    match &field.field_type {
        FormFieldType::FieldList { entry, min_entries } => {
            let entries = match value {
                Value::List(items) => items,
                Value::Null => Vec::new(),
                other => vec![other],
            };
            if entries.len() < *min_entries {
                push_error(
                    errors,
                    path,
                    format!("At least {min_entries} entries are required."),
                );
            }
            let cleaned = entries
                .into_iter()
                .enumerate()
                .map(|(i, item)| clean_value(entry, item, &format!("{path}-{i}"), errors))
                .collect();
            Value::List(cleaned)
        }
        FormFieldType::FormField { form } => {
            let data: FormData = match value {
                Value::Map(map) => map.into_iter().collect(),
                _ => FormData::new(),
            };
            match form.validate(&data) {
                Ok(cleaned) => Value::Map(cleaned.into_iter().collect()),
                Err(nested) => {
                    for (key, messages) in nested {
                        errors
                            .entry(format!("{path}-{key}"))
                            .or_default()
                            .extend(messages);
                    }
                    Value::Map(data.into_iter().collect())
                }
            }
        }
        field_type => {
            if value.is_empty() {
                if field.is_required() {
                    if let Err(e) = Validator::Required.validate(&value) {
                        push_error(errors, path, e.message);
                    }
                }
                return value;
            }
            let coerced = match field_type.coerce(value) {
                Ok(v) => v,
                Err(e) => {
                    push_error(errors, path, e.message);
                    return Value::Null;
                }
            };
            for validator in field.validators.iter().filter(|v| **v != Validator::Required) {
                if let Err(e) = validator.validate(&coerced) {
                    push_error(errors, path, e.message);
                }
            }
            coerced
        }
    }
}

fn push_error(errors: &mut FormErrors, path: &str, message: String) {
    errors.entry(path.to_string()).or_default().push(message);
}
