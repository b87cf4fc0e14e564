//! Form field definitions.
//!
//! A [`FormFieldDef`] describes one input control of a generated form: its
//! [`FormFieldType`], label, validators, filters, default, and widget. Field
//! definitions are built from [`FieldKwargs`], the keyword set every
//! converter starts from, optionally overridden per field by [`FieldArgs`].
//! [`FormFields`] is the insertion-ordered name → definition mapping a form
//! holds.

use std::sync::Arc;

use docforms_core::{DocformsResult, ValidationError};
use docforms_odm::fields::DocumentField;
use docforms_odm::value::Value;
use serde_json::json;

use crate::filters::Filter;
use crate::form::FormClass;
use crate::reference::ChoiceLoader;
use crate::validators::Validator;
use crate::widgets::WidgetType;

/// The type of a form field, including type-specific parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum FormFieldType {
    /// A single-line text input.
    Text,
    /// A multi-line text input.
    TextArea,
    /// A selection among fixed `(value, label)` choices.
    Select {
        /// The available choices.
        choices: Vec<(Value, String)>,
    },
    /// An integer input.
    Integer,
    /// A floating-point input.
    Float,
    /// A decimal input, kept in textual form.
    Decimal,
    /// A checkbox.
    Boolean,
    /// A date-time input parsed with `format`.
    DateTime {
        /// The `strftime` format of submitted values.
        format: String,
    },
    /// A repeatable group of `entry` fields.
    FieldList {
        /// The definition every entry is validated with.
        entry: Box<FormFieldDef>,
        /// The minimum number of entries.
        min_entries: usize,
    },
    /// A nested sub-form.
    FormField {
        /// The nested form class.
        form: Arc<FormClass>,
    },
    /// A selection whose choices are the stored documents of a schema,
    /// loaded through a [`ChoiceLoader`].
    ModelSelect {
        /// The referenced schema name.
        document: String,
    },
}

impl FormFieldType {
    /// Returns the form-library class name of this field type.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Text => "TextField",
            Self::TextArea => "TextAreaField",
            Self::Select { .. } => "SelectField",
            Self::Integer => "IntegerField",
            Self::Float => "FloatField",
            Self::Decimal => "DecimalField",
            Self::Boolean => "BooleanField",
            Self::DateTime { .. } => "DateTimeField",
            Self::FieldList { .. } => "FieldList",
            Self::FormField { .. } => "FormField",
            Self::ModelSelect { .. } => "ModelSelectField",
        }
    }

    /// Returns the default widget for this field type.
    pub const fn default_widget(&self) -> WidgetType {
        match self {
            Self::Text => WidgetType::TextInput,
            Self::TextArea => WidgetType::Textarea,
            Self::Select { .. } | Self::ModelSelect { .. } => WidgetType::Select,
            Self::Integer | Self::Float | Self::Decimal => WidgetType::NumberInput,
            Self::Boolean => WidgetType::CheckboxInput,
            Self::DateTime { .. } => WidgetType::DateTimeInput,
            Self::FieldList { .. } => WidgetType::ListWidget,
            Self::FormField { .. } => WidgetType::SubForm,
        }
    }

    /// Coerces a non-empty submitted scalar into this type's value.
    ///
    /// List and sub-form types are handled by the form itself and pass
    /// through unchanged.
    pub fn coerce(&self, value: Value) -> Result<Value, ValidationError> {
        match self {
            Self::Text | Self::TextArea => Ok(match value {
                Value::String(_) | Value::Bytes(_) => value,
                other => Value::String(other.to_string()),
            }),
            Self::Integer => match value {
                Value::Int(_) => Ok(value),
                Value::String(ref s) => s
                    .trim()
                    .parse::<i64>()
                    .map(Value::Int)
                    .map_err(|_| invalid("Not a valid integer value.")),
                _ => Err(invalid("Not a valid integer value.")),
            },
            Self::Float => value
                .as_f64()
                .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
                .map(Value::Float)
                .ok_or_else(|| invalid("Not a valid float value.")),
            Self::Decimal => match value {
                Value::Decimal(_) => Ok(value),
                Value::Int(i) => Ok(Value::Decimal(i.to_string())),
                Value::Float(f) => Ok(Value::Decimal(f.to_string())),
                Value::String(s) if s.trim().parse::<f64>().is_ok() => {
                    Ok(Value::Decimal(s.trim().to_string()))
                }
                _ => Err(invalid("Not a valid decimal value.")),
            },
            Self::Boolean => Ok(match value {
                Value::Bool(_) => value,
                Value::String(s) => Value::Bool(matches!(
                    s.to_lowercase().as_str(),
                    "y" | "yes" | "true" | "on" | "1"
                )),
                Value::Int(i) => Value::Bool(i != 0),
                _ => Value::Bool(false),
            }),
            Self::DateTime { format } => match value {
                Value::DateTime(_) => Ok(value),
                Value::String(s) => chrono::NaiveDateTime::parse_from_str(s.trim(), format)
                    .map(Value::DateTime)
                    .map_err(|_| invalid("Not a valid datetime value.")),
                _ => Err(invalid("Not a valid datetime value.")),
            },
            Self::Select { choices } => choices
                .iter()
                .find(|(choice, _)| *choice == value || choice.to_string() == value.to_string())
                .map(|(choice, _)| choice.clone())
                .ok_or_else(|| invalid("Not a valid choice.")),
            Self::ModelSelect { .. } | Self::FieldList { .. } | Self::FormField { .. } => {
                Ok(value)
            }
        }
    }
}

fn invalid(message: &str) -> ValidationError {
    ValidationError::new(message, "invalid")
}

/// The keyword set a form field is constructed from.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldKwargs {
    /// Human-readable label.
    pub label: String,
    /// Help text rendered with the field.
    pub description: String,
    /// Validators run on submitted values.
    pub validators: Vec<Validator>,
    /// Filters applied to submitted values before validation.
    pub filters: Vec<Filter>,
    /// Initial value.
    pub default: Option<Value>,
    /// Widget override; `None` uses the field type's default.
    pub widget: Option<WidgetType>,
}

impl FieldKwargs {
    /// Creates a keyword set with only a label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: String::new(),
            validators: Vec::new(),
            filters: Vec::new(),
            default: None,
            widget: None,
        }
    }

    /// The base keyword set for a document field: label = field name,
    /// default = the field's declared default.
    pub fn for_field(field: &DocumentField) -> Self {
        Self {
            default: field.default.clone(),
            ..Self::new(field.name.clone())
        }
    }

    /// Applies caller overrides. Each key present in `args` replaces the
    /// base value wholesale.
    pub fn apply(&mut self, args: &FieldArgs) {
        if let Some(label) = &args.label {
            self.label.clone_from(label);
        }
        if let Some(description) = &args.description {
            self.description.clone_from(description);
        }
        if let Some(validators) = &args.validators {
            self.validators.clone_from(validators);
        }
        if let Some(filters) = &args.filters {
            self.filters.clone_from(filters);
        }
        if let Some(default) = &args.default {
            self.default = Some(default.clone());
        }
        if let Some(widget) = args.widget {
            self.widget = Some(widget);
        }
    }
}

/// Per-field caller overrides. Every key is optional.
///
/// ```
/// use docforms_forms::fields::FieldArgs;
///
/// let args = FieldArgs::new().label("Years").description("Age in years");
/// assert_eq!(args.label.as_deref(), Some("Years"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldArgs {
    /// Label override.
    pub label: Option<String>,
    /// Description override.
    pub description: Option<String>,
    /// Validator list override.
    pub validators: Option<Vec<Validator>>,
    /// Filter list override.
    pub filters: Option<Vec<Filter>>,
    /// Default value override.
    pub default: Option<Value>,
    /// Widget override.
    pub widget: Option<WidgetType>,
}

impl FieldArgs {
    /// Creates an empty override set.
    pub fn new() -> Self {
        <Self as Default>::default()
    }

    /// Overrides the label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Overrides the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Overrides the validator list.
    #[must_use]
    pub fn validators(mut self, validators: Vec<Validator>) -> Self {
        self.validators = Some(validators);
        self
    }

    /// Overrides the filter list.
    #[must_use]
    pub fn filters(mut self, filters: Vec<Filter>) -> Self {
        self.filters = Some(filters);
        self
    }

    /// Overrides the default value.
    #[must_use]
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Overrides the widget.
    #[must_use]
    pub const fn widget(mut self, widget: WidgetType) -> Self {
        self.widget = Some(widget);
        self
    }
}

/// Complete definition of a form field.
#[derive(Debug, Clone, PartialEq)]
pub struct FormFieldDef {
    /// The field name (HTML name attribute).
    pub name: String,
    /// The field type.
    pub field_type: FormFieldType,
    /// Human-readable label.
    pub label: String,
    /// Help text.
    pub description: String,
    /// Validators run on submitted values.
    pub validators: Vec<Validator>,
    /// Filters applied before validation.
    pub filters: Vec<Filter>,
    /// Initial value.
    pub default: Option<Value>,
    /// The widget used for rendering.
    pub widget: WidgetType,
}

impl FormFieldDef {
    /// Creates a field definition from a keyword set.
    pub fn new(name: impl Into<String>, field_type: FormFieldType, kwargs: FieldKwargs) -> Self {
        let widget = kwargs
            .widget
            .unwrap_or_else(|| field_type.default_widget());
        Self {
            name: name.into(),
            field_type,
            label: kwargs.label,
            description: kwargs.description,
            validators: kwargs.validators,
            filters: kwargs.filters,
            default: kwargs.default,
            widget,
        }
    }

    /// Returns `true` if a required validator is attached.
    pub fn is_required(&self) -> bool {
        self.validators.contains(&Validator::Required)
    }

    /// Returns the number of validators with the given code.
    pub fn count_validators(&self, code: &str) -> usize {
        self.validators.iter().filter(|v| v.code() == code).count()
    }

    /// Returns the choices of a select field.
    pub fn choices(&self) -> Option<&[(Value, String)]> {
        match &self.field_type {
            FormFieldType::Select { choices } => Some(choices),
            _ => None,
        }
    }

    /// Serializes this field into a JSON descriptor for renderers.
    ///
    /// The descriptor carries the field's type name, label, description,
    /// widget, validators, filters, and default, plus the type-specific
    /// parameters (choices, date-time format, list entry, sub-form).
    pub fn to_json(&self) -> serde_json::Value {
        let mut descriptor = json!({
            "name": self.name,
            "type": self.field_type.type_name(),
            "label": self.label,
            "description": self.description,
            "required": self.is_required(),
            "widget": self.widget,
            "validators": self.validators,
            "filters": self.filters,
            "default": self.default,
        });
        let extra = match &self.field_type {
            FormFieldType::Select { choices } => json!({
                "choices": choices
                    .iter()
                    .map(|(value, label)| json!([value, label]))
                    .collect::<Vec<_>>(),
            }),
            FormFieldType::DateTime { format } => json!({ "format": format }),
            FormFieldType::FieldList { entry, min_entries } => json!({
                "entry": entry.to_json(),
                "min_entries": min_entries,
            }),
            FormFieldType::FormField { form } => json!({ "form": form.to_json() }),
            FormFieldType::ModelSelect { document } => json!({ "document": document }),
            _ => return descriptor,
        };
        if let (Some(target), serde_json::Value::Object(extra)) =
            (descriptor.as_object_mut(), extra)
        {
            target.extend(extra);
        }
        descriptor
    }

    /// Replaces reference selections with concrete choices from `loader`,
    /// descending into list entries and sub-forms.
    pub fn resolve_choices(&self, loader: &dyn ChoiceLoader) -> DocformsResult<Self> {
        let field_type = match &self.field_type {
            FormFieldType::ModelSelect { document } => FormFieldType::Select {
                choices: loader.load_choices(document)?,
            },
            FormFieldType::FieldList { entry, min_entries } => FormFieldType::FieldList {
                entry: Box::new(entry.resolve_choices(loader)?),
                min_entries: *min_entries,
            },
            FormFieldType::FormField { form } => FormFieldType::FormField {
                form: Arc::new(form.resolve_choices(loader)?),
            },
            other => other.clone(),
        };
        Ok(Self {
            field_type,
            ..self.clone()
        })
    }
}

/// An insertion-ordered mapping from field name to field definition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormFields {
    fields: Vec<FormFieldDef>,
}

impl FormFields {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a field. A field with the same name is replaced in place.
    pub fn insert(&mut self, field: FormFieldDef) {
        match self.fields.iter_mut().find(|f| f.name == field.name) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
    }

    /// Removes and returns the named field.
    pub fn remove(&mut self, name: &str) -> Option<FormFieldDef> {
        let idx = self.fields.iter().position(|f| f.name == name)?;
        Some(self.fields.remove(idx))
    }

    /// Returns the named field.
    pub fn get(&self, name: &str) -> Option<&FormFieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns `true` if a field with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns the field names in order.
    pub fn names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if there are no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over the fields in order.
    pub fn iter(&self) -> std::slice::Iter<'_, FormFieldDef> {
        self.fields.iter()
    }
}

impl<'a> IntoIterator for &'a FormFields {
    type Item = &'a FormFieldDef;
    type IntoIter = std::slice::Iter<'a, FormFieldDef>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl FromIterator<FormFieldDef> for FormFields {
    fn from_iter<I: IntoIterator<Item = FormFieldDef>>(iter: I) -> Self {
        let mut fields = Self::new();
        for field in iter {
            fields.insert(field);
        }
        fields
    }
}
