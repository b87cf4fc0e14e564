//! Form generation from document schemas.
//!
//! [`ModelConverter`] maps each document field to a [`FormFieldDef`] through
//! a registry keyed by field type name. [`model_fields`] walks a schema and
//! collects the converted fields; [`model_form`] wraps them in a
//! [`FormClass`] named after the schema.
//!
//! ```
//! use docforms_forms::orm::{model_form, FormOptions};
//! use docforms_forms::form::FormBase;
//! use docforms_odm::document::DocumentMeta;
//! use docforms_odm::fields::{DocumentField, FieldKind};
//!
//! let article = DocumentMeta::new("Article")
//!     .field(DocumentField::new("title", FieldKind::String).max_length(120).required())
//!     .into_shared();
//! let form = model_form(&article, &FormBase::model_form(), &FormOptions::new(), None).unwrap();
//! assert_eq!(form.name(), "ArticleForm");
//! assert!(form.fields().contains("title"));
//! ```
//!
//! Field types without a converter, and the types that have no form
//! counterpart (geo-locations, generic references, object ids), are left out
//! of the generated form rather than reported as errors.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use docforms_core::{DocformsError, DocformsResult, Settings, SETTINGS};
use docforms_odm::document::{get_document, DocumentMeta};
use docforms_odm::fields::{ConversionHook, DocumentField, FieldKind};

use crate::fields::{FieldArgs, FieldKwargs, FormFieldDef, FormFieldType, FormFields};
use crate::form::{FormBase, FormClass, MODEL_CLASS_FIELD};
use crate::validators::{Validator, UNBOUNDED};

/// A conversion function: `(converter, schema, field, kwargs) -> field definition`.
pub type ConvertFn = Arc<
    dyn Fn(&ModelConverter, &DocumentMeta, &DocumentField, FieldKwargs) -> Option<FormFieldDef>
        + Send
        + Sync,
>;

type BuiltinConverter =
    fn(&ModelConverter, &DocumentMeta, &DocumentField, FieldKwargs) -> Option<FormFieldDef>;

/// The built-in converters and the field type names each one handles.
const BUILTIN_CONVERTERS: &[(&[&str], BuiltinConverter)] = &[
    (&["StringField"], ModelConverter::conv_string as BuiltinConverter),
    (&["URLField"], ModelConverter::conv_url as BuiltinConverter),
    (&["EmailField"], ModelConverter::conv_email as BuiltinConverter),
    (&["IntField"], ModelConverter::conv_int as BuiltinConverter),
    (&["FloatField"], ModelConverter::conv_float as BuiltinConverter),
    (&["DecimalField"], ModelConverter::conv_decimal as BuiltinConverter),
    (&["BooleanField"], ModelConverter::conv_boolean as BuiltinConverter),
    (&["DateTimeField"], ModelConverter::conv_datetime as BuiltinConverter),
    (&["BinaryField"], ModelConverter::conv_binary as BuiltinConverter),
    (&["DictField"], ModelConverter::conv_dict as BuiltinConverter),
    (&["ListField"], ModelConverter::conv_list as BuiltinConverter),
    (&["SortedListField"], ModelConverter::conv_sorted_list as BuiltinConverter),
    (
        &["GeoLocationField", "GenericReferenceField", "ObjectIdField"],
        ModelConverter::conv_unsupported as BuiltinConverter,
    ),
    (&["EmbeddedDocumentField"], ModelConverter::conv_embedded as BuiltinConverter),
    (&["ReferenceField"], ModelConverter::conv_reference as BuiltinConverter),
];

/// A field that knows how to convert itself into a form field.
///
/// Attach one to a [`DocumentField`] with [`conversion_hook`]; the converter
/// calls it instead of consulting its registry.
pub trait ToFormField: Send + Sync {
    /// Builds the form field for `field` of `model` from the prepared kwargs.
    fn to_form_field(
        &self,
        model: &DocumentMeta,
        field: &DocumentField,
        kwargs: FieldKwargs,
    ) -> Option<FormFieldDef>;
}

/// Wraps a [`ToFormField`] implementation for [`DocumentField::conversion_hook`].
pub fn conversion_hook(hook: impl ToFormField + 'static) -> ConversionHook {
    let hook: Arc<dyn ToFormField> = Arc::new(hook);
    ConversionHook::new(hook)
}

/// Converts document fields into form fields.
///
/// The registry is fixed at construction. Caller-supplied converters passed to
/// [`with_converters`](ModelConverter::with_converters) are merged after the
/// built-ins, so a caller entry wins when both map the same type name.
#[derive(Clone)]
pub struct ModelConverter {
    converters: HashMap<String, ConvertFn>,
    datetime_format: String,
}

impl std::fmt::Debug for ModelConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelConverter")
            .field("converters", &self.converter_names())
            .field("datetime_format", &self.datetime_format)
            .finish()
    }
}

impl Default for ModelConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelConverter {
    /// Creates a converter with the built-in registry, configured from the
    /// global settings (or their defaults).
    pub fn new() -> Self {
        Self::with_converters(std::iter::empty())
    }

    /// Creates a converter with the built-ins plus caller-supplied converters.
    /// Caller entries replace built-ins registered under the same name.
    pub fn with_converters(converters: impl IntoIterator<Item = (String, ConvertFn)>) -> Self {
        let mut registry: HashMap<String, ConvertFn> = HashMap::new();
        for (names, func) in BUILTIN_CONVERTERS {
            for name in *names {
                registry.insert((*name).to_string(), Arc::new(*func));
            }
        }
        registry.extend(converters);

        Self {
            converters: registry,
            datetime_format: SETTINGS.get_or_default().datetime_format.clone(),
        }
    }

    /// Uses the date-time format of `settings`.
    #[must_use]
    pub fn with_settings(mut self, settings: &Settings) -> Self {
        self.datetime_format.clone_from(&settings.datetime_format);
        self
    }

    /// Returns `true` if a converter is registered for the type name.
    pub fn has_converter(&self, type_name: &str) -> bool {
        self.converters.contains_key(type_name)
    }

    /// Returns the registered type names, sorted.
    pub fn converter_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.converters.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Converts one document field.
    ///
    /// Returns `None` when the field's type has no form counterpart or no
    /// registered converter.
    pub fn convert(
        &self,
        model: &DocumentMeta,
        field: &DocumentField,
        field_args: Option<&FieldArgs>,
    ) -> Option<FormFieldDef> {
        let mut kwargs = FieldKwargs::for_field(field);
        if let Some(args) = field_args {
            kwargs.apply(args);
        }

        if field.required {
            kwargs.validators.push(Validator::Required);
        }

        if let Some(choices) = field.choices.as_ref().filter(|c| !c.is_empty()) {
            let choices = choices.clone();
            return Some(FormFieldDef::new(
                &field.name,
                FormFieldType::Select { choices },
                kwargs,
            ));
        }

        if let Some(hook) = field
            .conversion_hook
            .as_ref()
            .and_then(ConversionHook::downcast_ref::<Arc<dyn ToFormField>>)
        {
            tracing::trace!(field = %field.name, "using field's own conversion");
            return hook.to_form_field(model, field, kwargs);
        }

        let type_name = field.type_name();
        tracing::trace!(document = %model.name, field = %field.name, type_name, "converting field");
        let Some(convert) = self.converters.get(type_name) else {
            tracing::debug!(
                document = %model.name,
                field = %field.name,
                type_name,
                "no converter registered, omitting field"
            );
            return None;
        };

        let converted = convert(self, model, field, kwargs);
        if converted.is_none() {
            tracing::debug!(
                document = %model.name,
                field = %field.name,
                type_name,
                "field type has no form counterpart, omitting field"
            );
        }
        converted
    }

    // ── Shared helpers ────────────────────────────────────────────────

    fn string_common(field: &DocumentField, kwargs: &mut FieldKwargs) {
        if field.max_length.is_some() || field.min_length.is_some() {
            kwargs.validators.push(Validator::Length {
                min: field.min_length.unwrap_or(UNBOUNDED),
                max: field.max_length.unwrap_or(UNBOUNDED),
            });
        }
    }

    fn number_common(field: &DocumentField, kwargs: &mut FieldKwargs) {
        if field.max_value.is_some() || field.min_value.is_some() {
            kwargs.validators.push(Validator::NumberRange {
                min: field.min_value,
                max: field.max_value,
            });
        }
    }

    fn bare_kwargs(field: &DocumentField) -> FieldKwargs {
        FieldKwargs::new(field.name.clone())
    }

    // ── Built-in converters ───────────────────────────────────────────

    fn conv_string(
        &self,
        _model: &DocumentMeta,
        field: &DocumentField,
        mut kwargs: FieldKwargs,
    ) -> Option<FormFieldDef> {
        if let Some(pattern) = &field.regex {
            kwargs.validators.push(Validator::Regexp {
                pattern: pattern.clone(),
            });
        }
        Self::string_common(field, &mut kwargs);
        let field_type = if field.max_length == Some(UNBOUNDED) {
            FormFieldType::TextArea
        } else {
            FormFieldType::Text
        };
        Some(FormFieldDef::new(&field.name, field_type, kwargs))
    }

    fn conv_url(
        &self,
        _model: &DocumentMeta,
        field: &DocumentField,
        mut kwargs: FieldKwargs,
    ) -> Option<FormFieldDef> {
        kwargs.validators.push(Validator::Url);
        Self::string_common(field, &mut kwargs);
        Some(FormFieldDef::new(&field.name, FormFieldType::Text, kwargs))
    }

    fn conv_email(
        &self,
        _model: &DocumentMeta,
        field: &DocumentField,
        mut kwargs: FieldKwargs,
    ) -> Option<FormFieldDef> {
        kwargs.validators.push(Validator::Email);
        Self::string_common(field, &mut kwargs);
        Some(FormFieldDef::new(&field.name, FormFieldType::Text, kwargs))
    }

    fn conv_int(
        &self,
        _model: &DocumentMeta,
        field: &DocumentField,
        mut kwargs: FieldKwargs,
    ) -> Option<FormFieldDef> {
        Self::number_common(field, &mut kwargs);
        Some(FormFieldDef::new(&field.name, FormFieldType::Integer, kwargs))
    }

    fn conv_float(
        &self,
        _model: &DocumentMeta,
        field: &DocumentField,
        mut kwargs: FieldKwargs,
    ) -> Option<FormFieldDef> {
        Self::number_common(field, &mut kwargs);
        Some(FormFieldDef::new(&field.name, FormFieldType::Float, kwargs))
    }

    fn conv_decimal(
        &self,
        _model: &DocumentMeta,
        field: &DocumentField,
        mut kwargs: FieldKwargs,
    ) -> Option<FormFieldDef> {
        Self::number_common(field, &mut kwargs);
        Some(FormFieldDef::new(&field.name, FormFieldType::Decimal, kwargs))
    }

    fn conv_boolean(
        &self,
        _model: &DocumentMeta,
        field: &DocumentField,
        kwargs: FieldKwargs,
    ) -> Option<FormFieldDef> {
        Some(FormFieldDef::new(&field.name, FormFieldType::Boolean, kwargs))
    }

    fn conv_datetime(
        &self,
        _model: &DocumentMeta,
        field: &DocumentField,
        kwargs: FieldKwargs,
    ) -> Option<FormFieldDef> {
        let field_type = FormFieldType::DateTime {
            format: self.datetime_format.clone(),
        };
        Some(FormFieldDef::new(&field.name, field_type, kwargs))
    }

    fn conv_binary(
        &self,
        _model: &DocumentMeta,
        field: &DocumentField,
        mut kwargs: FieldKwargs,
    ) -> Option<FormFieldDef> {
        // TODO: a file-upload field would let binary content be submitted as-is.
        if let Some(max_bytes) = field.max_bytes {
            kwargs.validators.push(Validator::Length {
                min: UNBOUNDED,
                max: i64::try_from(max_bytes).unwrap_or(i64::MAX),
            });
        }
        Some(FormFieldDef::new(&field.name, FormFieldType::TextArea, kwargs))
    }

    fn conv_dict(
        &self,
        _model: &DocumentMeta,
        field: &DocumentField,
        kwargs: FieldKwargs,
    ) -> Option<FormFieldDef> {
        Some(FormFieldDef::new(&field.name, FormFieldType::TextArea, kwargs))
    }

    fn conv_list(
        &self,
        model: &DocumentMeta,
        field: &DocumentField,
        _kwargs: FieldKwargs,
    ) -> Option<FormFieldDef> {
        let element = field.kind.element_field()?;
        let entry = self.convert(model, element, None)?;
        let field_type = FormFieldType::FieldList {
            entry: Box::new(entry),
            min_entries: 0,
        };
        Some(FormFieldDef::new(
            &field.name,
            field_type,
            Self::bare_kwargs(field),
        ))
    }

    fn conv_sorted_list(
        &self,
        model: &DocumentMeta,
        field: &DocumentField,
        kwargs: FieldKwargs,
    ) -> Option<FormFieldDef> {
        // Entries are accepted in submitted order; nothing sorts them here.
        self.conv_list(model, field, kwargs)
    }

    fn conv_unsupported(
        &self,
        _model: &DocumentMeta,
        _field: &DocumentField,
        _kwargs: FieldKwargs,
    ) -> Option<FormFieldDef> {
        None
    }

    fn conv_embedded(
        &self,
        _model: &DocumentMeta,
        field: &DocumentField,
        _kwargs: FieldKwargs,
    ) -> Option<FormFieldDef> {
        let FieldKind::EmbeddedDocument(document) = &field.kind else {
            return None;
        };
        let form = build_form_class(
            Arc::clone(document),
            &FormBase::model_form(),
            &FormOptions::new(),
            self,
        );
        let field_type = FormFieldType::FormField {
            form: Arc::new(form),
        };
        Some(FormFieldDef::new(
            &field.name,
            field_type,
            Self::bare_kwargs(field),
        ))
    }

    fn conv_reference(
        &self,
        _model: &DocumentMeta,
        field: &DocumentField,
        kwargs: FieldKwargs,
    ) -> Option<FormFieldDef> {
        let FieldKind::Reference(document) = &field.kind else {
            return None;
        };
        let field_type = FormFieldType::ModelSelect {
            document: document.clone(),
        };
        Some(FormFieldDef::new(&field.name, field_type, kwargs))
    }
}

/// Identifies the schema a form is generated from: either the schema itself
/// or the name it is registered under.
#[derive(Debug, Clone)]
pub enum ModelRef<'a> {
    /// A schema given directly.
    Meta(Arc<DocumentMeta>),
    /// A schema looked up in the document registry.
    Name(&'a str),
}

impl ModelRef<'_> {
    /// Resolves to the schema.
    ///
    /// Fails with [`DocformsError::TypeError`] when a name is not registered
    /// as a document schema.
    pub fn resolve(self) -> DocformsResult<Arc<DocumentMeta>> {
        match self {
            Self::Meta(meta) => Ok(meta),
            Self::Name(name) => get_document(name).ok_or_else(|| {
                DocformsError::TypeError(format!(
                    "model must be a document schema, '{name}' is not registered"
                ))
            }),
        }
    }
}

impl From<Arc<DocumentMeta>> for ModelRef<'_> {
    fn from(meta: Arc<DocumentMeta>) -> Self {
        Self::Meta(meta)
    }
}

impl From<&Arc<DocumentMeta>> for ModelRef<'_> {
    fn from(meta: &Arc<DocumentMeta>) -> Self {
        Self::Meta(Arc::clone(meta))
    }
}

impl From<&DocumentMeta> for ModelRef<'_> {
    fn from(meta: &DocumentMeta) -> Self {
        Self::Meta(Arc::new(meta.clone()))
    }
}

impl<'a> From<&'a str> for ModelRef<'a> {
    fn from(name: &'a str) -> Self {
        Self::Name(name)
    }
}

/// Field selection and per-field overrides for form generation.
///
/// When `only` is non-empty it alone decides which fields are kept and
/// `exclude` is not consulted.
#[derive(Debug, Clone, Default)]
pub struct FormOptions {
    /// Field names to keep.
    pub only: Option<HashSet<String>>,
    /// Field names to drop.
    pub exclude: Option<HashSet<String>>,
    /// Per-field keyword overrides keyed by field name.
    pub field_args: HashMap<String, FieldArgs>,
}

impl FormOptions {
    /// Creates options that keep every field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps only the named fields.
    #[must_use]
    pub fn only<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.only = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Drops the named fields.
    #[must_use]
    pub fn exclude<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.exclude = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the keyword overrides for one field.
    #[must_use]
    pub fn field_args(mut self, name: impl Into<String>, args: FieldArgs) -> Self {
        self.field_args.insert(name.into(), args);
        self
    }

    fn keeps(&self, name: &str) -> bool {
        match (&self.only, &self.exclude) {
            (Some(only), _) if !only.is_empty() => only.contains(name),
            (_, Some(exclude)) => !exclude.contains(name),
            _ => true,
        }
    }
}

/// Generates the form fields for a schema.
///
/// Fields are visited in declaration order when the schema records one,
/// otherwise in the schema's internal (unspecified) order. Fields that do not
/// convert are left out. A `converter` of `None` uses [`ModelConverter::new`].
pub fn model_fields<'a>(
    model: impl Into<ModelRef<'a>>,
    options: &FormOptions,
    converter: Option<&ModelConverter>,
) -> DocformsResult<FormFields> {
    let meta = model.into().resolve()?;
    let default_converter;
    let converter = match converter {
        Some(c) => c,
        None => {
            default_converter = ModelConverter::new();
            &default_converter
        }
    };
    Ok(collect_fields(&meta, options, converter))
}

/// Generates a form class for a schema.
///
/// The class is named `<Schema>Form`, extends `base`, holds the fields from
/// [`model_fields`], and exposes the schema as its
/// [`model_class`](FormClass::model_class). A schema field named
/// [`MODEL_CLASS_FIELD`] is replaced by that reference.
pub fn model_form<'a>(
    model: impl Into<ModelRef<'a>>,
    base: &FormBase,
    options: &FormOptions,
    converter: Option<&ModelConverter>,
) -> DocformsResult<FormClass> {
    let meta = model.into().resolve()?;
    Ok(match converter {
        Some(c) => build_form_class(meta, base, options, c),
        None => build_form_class(meta, base, options, &ModelConverter::new()),
    })
}

fn collect_fields(
    meta: &DocumentMeta,
    options: &FormOptions,
    converter: &ModelConverter,
) -> FormFields {
    let mut fields = FormFields::new();
    for name in meta.field_names() {
        if !options.keeps(name) {
            continue;
        }
        let Some(field) = meta.get_field(name) else {
            continue;
        };
        if let Some(def) = converter.convert(meta, field, options.field_args.get(name)) {
            fields.insert(FormFieldDef {
                name: name.to_string(),
                ..def
            });
        }
    }
    fields
}

fn build_form_class(
    meta: Arc<DocumentMeta>,
    base: &FormBase,
    options: &FormOptions,
    converter: &ModelConverter,
) -> FormClass {
    let span = docforms_core::logging::form_span(&meta.name);
    let _guard = span.enter();

    let mut fields = collect_fields(&meta, options, converter);
    if fields.remove(MODEL_CLASS_FIELD).is_some() {
        tracing::warn!(
            document = %meta.name,
            "field '{MODEL_CLASS_FIELD}' is reserved for the schema reference, dropping it"
        );
    }

    tracing::debug!(document = %meta.name, fields = fields.len(), "generated form class");
    FormClass::new(format!("{}Form", meta.name), base.clone(), fields, meta)
}
