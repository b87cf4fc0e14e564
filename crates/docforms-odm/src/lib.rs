//! # docforms-odm
//!
//! The document schema model that forms are generated from. A schema is a
//! [`DocumentMeta`](document::DocumentMeta) holding named
//! [`DocumentField`](fields::DocumentField)s; each field has a
//! [`FieldKind`](fields::FieldKind) whose type name selects the form
//! converter.
//!
//! ## Module Overview
//!
//! - [`document`] - Schemas, the [`Document`](document::Document) trait, and the registry
//! - [`fields`] - Field definitions and kinds
//! - [`value`] - The storage-agnostic [`Value`](value::Value) enum

// cast_precision_loss: i64-to-f64 casts are acceptable for range comparisons
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::return_self_not_must_use)]

pub mod document;
pub mod fields;
pub mod value;

pub use document::{
    get_document, register_document, Document, DocumentMeta, DocumentRegistry, DOCUMENTS,
};
pub use fields::{ConversionHook, DocumentField, FieldKind};
pub use value::Value;
