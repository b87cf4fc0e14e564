//! Widget selection for generated form fields.
//!
//! A [`WidgetType`] names the input control a renderer should use for a
//! field. Every form field type has a default widget; callers can override
//! it per field.

use std::fmt;

use serde::Serialize;

/// Enumerates the built-in widget types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WidgetType {
    /// `<input type="text">`.
    TextInput,
    /// `<textarea>`.
    Textarea,
    /// `<input type="number">`.
    NumberInput,
    /// `<input type="email">`.
    EmailInput,
    /// `<input type="url">`.
    UrlInput,
    /// `<input type="checkbox">`.
    CheckboxInput,
    /// `<input type="datetime-local">`.
    DateTimeInput,
    /// `<select>`.
    Select,
    /// `<input type="hidden">`.
    HiddenInput,
    /// A repeated list of entry widgets.
    ListWidget,
    /// A nested fieldset rendering a sub-form.
    SubForm,
}

impl WidgetType {
    /// Returns the `type` attribute for `<input>`-based widgets.
    pub const fn input_type(self) -> Option<&'static str> {
        match self {
            Self::TextInput => Some("text"),
            Self::NumberInput => Some("number"),
            Self::EmailInput => Some("email"),
            Self::UrlInput => Some("url"),
            Self::CheckboxInput => Some("checkbox"),
            Self::DateTimeInput => Some("datetime-local"),
            Self::HiddenInput => Some("hidden"),
            Self::Textarea | Self::Select | Self::ListWidget | Self::SubForm => None,
        }
    }
}

impl fmt::Display for WidgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TextInput => "TextInput",
            Self::Textarea => "Textarea",
            Self::NumberInput => "NumberInput",
            Self::EmailInput => "EmailInput",
            Self::UrlInput => "UrlInput",
            Self::CheckboxInput => "CheckboxInput",
            Self::DateTimeInput => "DateTimeInput",
            Self::Select => "Select",
            Self::HiddenInput => "HiddenInput",
            Self::ListWidget => "ListWidget",
            Self::SubForm => "SubForm",
        };
        write!(f, "{name}")
    }
}
