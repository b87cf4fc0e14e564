//! # docforms
//!
//! Generate web-form definitions from document-database schemas.
//!
//! This is the meta-crate that re-exports all sub-crates for convenient access.
//! You can depend on `docforms` to get everything, or depend on individual
//! crates for finer-grained control.
//!
//! ```
//! use docforms::prelude::*;
//!
//! let person = DocumentMeta::new("Person")
//!     .field(DocumentField::new("name", FieldKind::String).max_length(40).required())
//!     .field(DocumentField::new("age", FieldKind::Int).min_value(0.0))
//!     .into_shared();
//!
//! let form = model_form(&person, &FormBase::model_form(), &FormOptions::new(), None).unwrap();
//! assert_eq!(form.name(), "PersonForm");
//! assert_eq!(form.fields().names(), vec!["name", "age"]);
//! ```

/// Errors, settings, settings loading, and logging setup.
pub use docforms_core as core;

/// Document schemas, field kinds, values, and the document registry.
pub use docforms_odm as odm;

/// Form fields, validators, widgets, and schema-to-form conversion.
pub use docforms_forms as forms;

// Third-party crates that appear in the public API.
pub use chrono;
pub use serde;
pub use serde_json;
pub use tracing;

/// The types most applications need.
pub mod prelude {
    pub use docforms_core::{DocformsError, DocformsResult, Settings, SETTINGS};
    pub use docforms_forms::{
        conversion_hook, model_fields, model_form, ChoiceLoader, FieldArgs, FieldKwargs, Filter,
        FormBase, FormClass, FormData, FormFieldDef, FormFieldType, FormOptions, ModelConverter,
        ToFormField, Validator, WidgetType,
    };
    pub use docforms_odm::{
        register_document, Document, DocumentField, DocumentMeta, FieldKind, Value,
    };
}

/// Configures the global settings and installs the tracing subscriber they
/// describe.
///
/// # Panics
///
/// Panics if the global settings were already configured.
pub fn init(settings: docforms_core::Settings) {
    docforms_core::logging::setup_logging(&settings);
    docforms_core::SETTINGS.configure(settings);
}
