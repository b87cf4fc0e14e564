//! Choice loading for reference fields.
//!
//! A reference field renders as a selection among the stored documents of the
//! referenced schema. Loading those documents is storage work, so it is
//! delegated to a [`ChoiceLoader`] supplied by the application.

use std::collections::HashMap;

use docforms_core::DocformsResult;
use docforms_odm::value::Value;

/// Loads `(value, label)` choices for the stored documents of a schema.
pub trait ChoiceLoader: Send + Sync {
    /// Returns the choices for the named schema.
    fn load_choices(&self, document: &str) -> DocformsResult<Vec<(Value, String)>>;
}

impl<F> ChoiceLoader for F
where
    F: Fn(&str) -> DocformsResult<Vec<(Value, String)>> + Send + Sync,
{
    fn load_choices(&self, document: &str) -> DocformsResult<Vec<(Value, String)>> {
        self(document)
    }
}

/// An in-memory [`ChoiceLoader`]. Schemas without stored documents yield no
/// choices.
///
/// ```
/// use docforms_forms::reference::{ChoiceLoader, StaticChoiceLoader};
/// use docforms_odm::value::Value;
///
/// let loader = StaticChoiceLoader::new()
///     .with_document("Author", vec![(Value::from("a1"), "Ada".to_string())]);
/// assert_eq!(loader.load_choices("Author").unwrap().len(), 1);
/// assert!(loader.load_choices("Editor").unwrap().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticChoiceLoader {
    documents: HashMap<String, Vec<(Value, String)>>,
}

impl StaticChoiceLoader {
    /// Creates an empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the stored documents of a schema.
    #[must_use]
    pub fn with_document(
        mut self,
        document: impl Into<String>,
        choices: Vec<(Value, String)>,
    ) -> Self {
        self.documents.insert(document.into(), choices);
        self
    }
}

impl ChoiceLoader for StaticChoiceLoader {
    fn load_choices(&self, document: &str) -> DocformsResult<Vec<(Value, String)>> {
        let choices = self.documents.get(document).cloned().unwrap_or_default();
        tracing::trace!(document, count = choices.len(), "loaded reference choices");
        Ok(choices)
    }
}
