//! # docforms-forms
//!
//! The form layer of docforms: form field definitions, validators, filters,
//! and widgets, plus the converter that generates form classes from document
//! schemas.
//!
//! ## Module Overview
//!
//! - [`orm`] - Schema-to-form conversion ([`model_form`], [`model_fields`], [`ModelConverter`])
//! - [`form`] - Form classes, bases, and validation of submitted data
//! - [`fields`] - Form field types and definitions
//! - [`validators`] - Value constraints attached to fields
//! - [`filters`] - Input transformations applied before validation
//! - [`widgets`] - Widget selection for rendering
//! - [`reference`] - Choice loading for reference fields

#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::unnecessary_wraps)]

pub mod fields;
pub mod filters;
pub mod form;
pub mod orm;
pub mod reference;
pub mod validators;
pub mod widgets;

pub use fields::{FieldArgs, FieldKwargs, FormFieldDef, FormFieldType, FormFields};
pub use filters::Filter;
pub use form::{form_data_from_json, FormBase, FormClass, FormData, FormErrors, MODEL_CLASS_FIELD};
pub use orm::{
    conversion_hook, model_fields, model_form, ConvertFn, FormOptions, ModelConverter, ModelRef,
    ToFormField,
};
pub use reference::{ChoiceLoader, StaticChoiceLoader};
pub use validators::{Validator, UNBOUNDED};
pub use widgets::WidgetType;
