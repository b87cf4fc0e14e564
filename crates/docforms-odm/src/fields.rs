//! Document field definitions.
//!
//! A [`DocumentField`] describes one attribute of a document schema: its
//! [`FieldKind`], default, required flag, choices, and the type-specific
//! constraints (length and value bounds, regex, byte limits). Composite kinds
//! carry the nested element field or the embedded document schema.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::document::DocumentMeta;
use crate::value::Value;

/// The type of a document field.
///
/// Each variant has a stable type name (see [`FieldKind::type_name`]) that
/// form converters are registered under. [`FieldKind::Custom`] lets
/// applications declare their own field types by name.
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// A string.
    String,
    /// A URL string.
    Url,
    /// An email address string.
    Email,
    /// A 64-bit integer.
    Int,
    /// A floating-point number.
    Float,
    /// A fixed-precision decimal number.
    Decimal,
    /// A boolean.
    Boolean,
    /// A date and time.
    DateTime,
    /// Raw binary data.
    Binary,
    /// An arbitrary dictionary.
    Dict,
    /// A list whose elements are described by the inner field.
    List(Box<DocumentField>),
    /// A list kept sorted on save. Elements are described by the inner field.
    SortedList(Box<DocumentField>),
    /// A `[x, y]` coordinate pair.
    GeoLocation,
    /// A storage-assigned object identifier.
    ObjectId,
    /// A nested document stored inline.
    EmbeddedDocument(Arc<DocumentMeta>),
    /// A reference to a document of the named schema stored elsewhere.
    Reference(String),
    /// A reference to a document of any schema.
    GenericReference,
    /// An application-defined field type, identified by its type name.
    Custom(String),
}

impl FieldKind {
    /// Returns the type name converters are keyed by.
    pub fn type_name(&self) -> &str {
        match self {
            Self::String => "StringField",
            Self::Url => "URLField",
            Self::Email => "EmailField",
            Self::Int => "IntField",
            Self::Float => "FloatField",
            Self::Decimal => "DecimalField",
            Self::Boolean => "BooleanField",
            Self::DateTime => "DateTimeField",
            Self::Binary => "BinaryField",
            Self::Dict => "DictField",
            Self::List(_) => "ListField",
            Self::SortedList(_) => "SortedListField",
            Self::GeoLocation => "GeoLocationField",
            Self::ObjectId => "ObjectIdField",
            Self::EmbeddedDocument(_) => "EmbeddedDocumentField",
            Self::Reference(_) => "ReferenceField",
            Self::GenericReference => "GenericReferenceField",
            Self::Custom(name) => name,
        }
    }

    /// Returns the element field for list kinds.
    pub fn element_field(&self) -> Option<&DocumentField> {
        match self {
            Self::List(field) | Self::SortedList(field) => Some(field),
            _ => None,
        }
    }
}

/// A type-erased handle to a field's self-conversion capability.
///
/// The schema layer does not know the form layer's types, so the hook is
/// stored opaquely and recovered by the form layer with
/// [`downcast_ref`](ConversionHook::downcast_ref).
#[derive(Clone)]
pub struct ConversionHook(Arc<dyn Any + Send + Sync>);

impl ConversionHook {
    /// Wraps a hook value.
    pub fn new<T: Any + Send + Sync>(hook: T) -> Self {
        Self(Arc::new(hook))
    }

    /// Returns the hook as `T` if that is what it holds.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }
}

impl fmt::Debug for ConversionHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ConversionHook(..)")
    }
}

/// Complete definition of a document field.
#[derive(Debug, Clone)]
pub struct DocumentField {
    /// The attribute name of this field. Empty for list elements until the
    /// owning list field names them.
    pub name: String,
    /// The type of this field.
    pub kind: FieldKind,
    /// Default value for new documents.
    pub default: Option<Value>,
    /// Whether a value must be supplied.
    pub required: bool,
    /// Allowed values as `(value, display_label)` pairs.
    pub choices: Option<Vec<(Value, String)>>,
    /// Minimum length for string-like fields.
    pub min_length: Option<i64>,
    /// Maximum length for string-like fields; `-1` declares "unbounded".
    pub max_length: Option<i64>,
    /// Regular expression string values must match.
    pub regex: Option<String>,
    /// Minimum value for numeric fields.
    pub min_value: Option<f64>,
    /// Maximum value for numeric fields.
    pub max_value: Option<f64>,
    /// Maximum size in bytes for binary fields.
    pub max_bytes: Option<usize>,
    /// The field's own form conversion, if it provides one.
    pub conversion_hook: Option<ConversionHook>,
}

impl DocumentField {
    /// Creates a new `DocumentField` with no constraints.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default: None,
            required: false,
            choices: None,
            min_length: None,
            max_length: None,
            regex: None,
            min_value: None,
            max_value: None,
            max_bytes: None,
            conversion_hook: None,
        }
    }

    /// Creates an unnamed field, for use as a list element.
    pub fn element(kind: FieldKind) -> Self {
        Self::new(String::new(), kind)
    }

    /// Creates a list field. An unnamed element takes the list's name.
    pub fn list(name: impl Into<String>, element: Self) -> Self {
        let name = name.into();
        let element = Self::name_element(&name, element);
        Self::new(name, FieldKind::List(Box::new(element)))
    }

    /// Creates a sorted-list field. An unnamed element takes the list's name.
    pub fn sorted_list(name: impl Into<String>, element: Self) -> Self {
        let name = name.into();
        let element = Self::name_element(&name, element);
        Self::new(name, FieldKind::SortedList(Box::new(element)))
    }

    /// Creates an embedded-document field.
    pub fn embedded(name: impl Into<String>, document: Arc<DocumentMeta>) -> Self {
        Self::new(name, FieldKind::EmbeddedDocument(document))
    }

    /// Creates a reference field pointing at the named document schema.
    pub fn reference(name: impl Into<String>, document: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Reference(document.into()))
    }

    fn name_element(name: &str, mut element: Self) -> Self {
        if element.name.is_empty() {
            element.name = name.to_string();
        }
        element
    }

    /// Marks this field as required.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Restricts the field to the given `(value, label)` choices.
    #[must_use]
    pub fn choices<V, L>(mut self, choices: impl IntoIterator<Item = (V, L)>) -> Self
    where
        V: Into<Value>,
        L: Into<String>,
    {
        self.choices = Some(
            choices
                .into_iter()
                .map(|(v, l)| (v.into(), l.into()))
                .collect(),
        );
        self
    }

    /// Restricts the field to the given values, each labelled by itself.
    #[must_use]
    pub fn choice_values<V: Into<Value>>(mut self, values: impl IntoIterator<Item = V>) -> Self {
        self.choices = Some(
            values
                .into_iter()
                .map(|v| {
                    let v = v.into();
                    let label = v.to_string();
                    (v, label)
                })
                .collect(),
        );
        self
    }

    /// Sets the minimum length.
    #[must_use]
    pub const fn min_length(mut self, min_length: i64) -> Self {
        self.min_length = Some(min_length);
        self
    }

    /// Sets the maximum length. Pass `-1` to declare the field unbounded.
    #[must_use]
    pub const fn max_length(mut self, max_length: i64) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Sets the regular expression values must match.
    #[must_use]
    pub fn regex(mut self, pattern: impl Into<String>) -> Self {
        self.regex = Some(pattern.into());
        self
    }

    /// Sets the minimum value.
    #[must_use]
    pub const fn min_value(mut self, min_value: f64) -> Self {
        self.min_value = Some(min_value);
        self
    }

    /// Sets the maximum value.
    #[must_use]
    pub const fn max_value(mut self, max_value: f64) -> Self {
        self.max_value = Some(max_value);
        self
    }

    /// Sets the maximum size in bytes.
    #[must_use]
    pub const fn max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = Some(max_bytes);
        self
    }

    /// Attaches a self-conversion hook.
    #[must_use]
    pub fn conversion_hook(mut self, hook: ConversionHook) -> Self {
        self.conversion_hook = Some(hook);
        self
    }

    /// Returns the type name of this field's kind.
    pub fn type_name(&self) -> &str {
        self.kind.type_name()
    }

    /// Returns `true` if the field declares a choice list.
    pub fn has_choices(&self) -> bool {
        self.choices.as_ref().is_some_and(|c| !c.is_empty())
    }
}
