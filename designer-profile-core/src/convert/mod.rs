//! Bidirectional conversion between the JSON model and the document tree.
//!
//! Save path: JSON text → tree → serialized document text.
//! Load path: document text → tree → JSON text.
//!
//! Both converters expose a strict entry point that propagates errors and a
//! fail-soft wrapper (`marshal`/`unmarshal`) that logs the cause and returns
//! [`ConversionOutcome::Degraded`]. Degraded output renders as the empty
//! string, so hosts that only look at the text must treat emptiness as the
//! failure signal.

mod to_document;
mod to_json;

pub use to_document::JsonToDocument;
pub use to_json::DocumentToJson;

/// Result of a fail-soft conversion. The degraded variant means the input
/// could not be converted; the cause was logged and nothing propagated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionOutcome {
    Complete(String),
    Degraded,
}

impl ConversionOutcome {
    /// The converted text, or `""` for a degraded outcome.
    pub fn as_text(&self) -> &str {
        match self {
            ConversionOutcome::Complete(text) => text,
            ConversionOutcome::Degraded => "",
        }
    }

    pub fn into_text(self) -> String {
        match self {
            ConversionOutcome::Complete(text) => text,
            ConversionOutcome::Degraded => String::new(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, ConversionOutcome::Degraded)
    }
}
