//! Document schemas and the document registry.
//!
//! [`DocumentMeta`] is the runtime description of a document schema: its
//! name, its fields, and (usually) the order they were declared in. The
//! [`DocumentRegistry`] maps schema names to their metadata; a schema is
//! "recognized" when it has been registered there, the same way the document
//! system resolves schemas referenced by name.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;

use crate::fields::DocumentField;

/// Metadata describing a document schema.
///
/// Fields are held in an internal registry keyed by name. When the schema is
/// built with [`DocumentMeta::field`] the declaration order is also recorded;
/// [`DocumentMeta::unordered`] drops it, in which case iteration follows the
/// registry's (unspecified) order.
///
/// # Examples
///
/// ```
/// use docforms_odm::document::DocumentMeta;
/// use docforms_odm::fields::{DocumentField, FieldKind};
///
/// let meta = DocumentMeta::new("Article")
///     .field(DocumentField::new("title", FieldKind::String).required())
///     .field(DocumentField::new("views", FieldKind::Int));
/// assert_eq!(meta.field_names(), vec!["title", "views"]);
/// ```
#[derive(Debug, Clone)]
pub struct DocumentMeta {
    /// The schema (class) name, e.g. "Article".
    pub name: String,
    /// The storage collection name.
    pub collection: String,
    /// Whether this schema only exists to be inherited from.
    pub abstract_document: bool,
    fields: HashMap<String, DocumentField>,
    fields_order: Option<Vec<String>>,
}

impl DocumentMeta {
    /// Creates an empty schema. The collection name defaults to the
    /// lowercased schema name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let collection = name.to_lowercase();
        Self {
            name,
            collection,
            abstract_document: false,
            fields: HashMap::new(),
            fields_order: Some(Vec::new()),
        }
    }

    /// Declares a field. Re-declaring a name replaces the earlier field but
    /// keeps its original position.
    #[must_use]
    pub fn field(mut self, field: DocumentField) -> Self {
        let name = field.name.clone();
        if self.fields.insert(name.clone(), field).is_none() {
            if let Some(order) = &mut self.fields_order {
                order.push(name);
            }
        }
        self
    }

    /// Drops the recorded declaration order.
    #[must_use]
    pub fn unordered(mut self) -> Self {
        self.fields_order = None;
        self
    }

    /// Sets the storage collection name.
    #[must_use]
    pub fn collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    /// Marks this schema as abstract.
    #[must_use]
    pub const fn abstract_document(mut self) -> Self {
        self.abstract_document = true;
        self
    }

    /// Returns the field with the given name.
    pub fn get_field(&self, name: &str) -> Option<&DocumentField> {
        self.fields.get(name)
    }

    /// Returns the declared field order, if one was recorded.
    pub fn fields_order(&self) -> Option<&[String]> {
        self.fields_order.as_deref()
    }

    /// Returns field names in declaration order, or in registry order when
    /// no declaration order is recorded.
    pub fn field_names(&self) -> Vec<&str> {
        match &self.fields_order {
            Some(order) => order.iter().map(String::as_str).collect(),
            None => self.fields.keys().map(String::as_str).collect(),
        }
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the schema declares no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Wraps this schema in an `Arc` for use in embedded fields and forms.
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

/// A statically declared document schema.
///
/// ```
/// use std::sync::LazyLock;
/// use docforms_odm::document::{Document, DocumentMeta};
/// use docforms_odm::fields::{DocumentField, FieldKind};
///
/// struct Tag;
///
/// static TAG_META: LazyLock<DocumentMeta> = LazyLock::new(|| {
///     DocumentMeta::new("Tag").field(DocumentField::new("label", FieldKind::String))
/// });
///
/// impl Document for Tag {
///     fn meta() -> &'static DocumentMeta {
///         &TAG_META
///     }
/// }
///
/// assert_eq!(Tag::meta().name, "Tag");
/// ```
pub trait Document {
    /// Returns the static schema metadata for this document type.
    fn meta() -> &'static DocumentMeta;
}

/// Maps schema names to their metadata.
#[derive(Debug, Default)]
pub struct DocumentRegistry {
    documents: RwLock<HashMap<String, Arc<DocumentMeta>>>,
}

impl DocumentRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a schema under its name, replacing any previous entry.
    pub fn register(&self, meta: Arc<DocumentMeta>) {
        tracing::debug!(document = %meta.name, fields = meta.len(), "registering document");
        self.documents
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(meta.name.clone(), meta);
    }

    /// Returns the schema registered under `name`.
    pub fn get(&self, name: &str) -> Option<Arc<DocumentMeta>> {
        self.documents
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Returns `true` if a schema is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.documents
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .contains_key(name)
    }

    /// Returns the registered schema names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .documents
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }
}

/// The process-wide document registry.
pub static DOCUMENTS: Lazy<DocumentRegistry> = Lazy::new(DocumentRegistry::new);

/// Registers a schema in the process-wide registry and returns it.
pub fn register_document(meta: DocumentMeta) -> Arc<DocumentMeta> {
    let meta = Arc::new(meta);
    DOCUMENTS.register(Arc::clone(&meta));
    meta
}

/// Looks up a schema in the process-wide registry.
pub fn get_document(name: &str) -> Option<Arc<DocumentMeta>> {
    DOCUMENTS.get(name)
}
