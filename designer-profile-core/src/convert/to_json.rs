//! Load path: serialized document text → document tree → JSON model.

use crate::convert::ConversionOutcome;
use crate::document::{DocumentTree, Element};
use crate::error::{ProfileError, Result};
use crate::grammar::DocumentGrammar;
use serde_json::{Map, Value};

/// Converts document text into the editing surface's JSON model.
///
/// Parse-then-convert: the tree builder produces the document tree, then a
/// single walk builds the JSON value. Attribute values coerce to numbers or
/// booleans where the grammar says so; everything else stays a string. An
/// element with no attributes and no children still yields a JSON node.
#[derive(Debug, Clone)]
pub struct DocumentToJson {
    grammar: DocumentGrammar,
}

impl DocumentToJson {
    pub fn new(grammar: DocumentGrammar) -> Self {
        Self { grammar }
    }

    /// Strict conversion: parse the document text and build the JSON model.
    pub fn to_json(&self, document_text: &str) -> Result<Value> {
        let tree = DocumentTree::parse(document_text, &self.grammar)?;
        Ok(self.value_from_element(&tree.root))
    }

    /// Fail-soft conversion to JSON text. On any failure the cause is logged
    /// and the outcome degrades to empty text.
    pub fn unmarshal(&self, document_text: &str) -> ConversionOutcome {
        let result = self.to_json(document_text).and_then(|value| {
            serde_json::to_string(&value).map_err(|e| ProfileError::ModelParse(e.to_string()))
        });
        match result {
            Ok(text) => ConversionOutcome::Complete(text),
            Err(error) => {
                tracing::error!(%error, "document text could not be unmarshalled to a model");
                ConversionOutcome::Degraded
            }
        }
    }

    fn value_from_element(&self, element: &Element) -> Value {
        let mut fields = Map::new();
        fields.insert(
            self.grammar.element_key.clone(),
            Value::String(element.name.clone()),
        );
        for (name, raw) in &element.attributes {
            fields.insert(name.clone(), self.grammar.coerce(name, raw));
        }
        if let Some(text) = &element.text {
            fields.insert(self.grammar.text_key.clone(), Value::String(text.clone()));
        }
        if !element.children.is_empty() {
            let children = element
                .children
                .iter()
                .map(|child| self.value_from_element(child))
                .collect();
            fields.insert(self.grammar.children_key.clone(), Value::Array(children));
        }
        Value::Object(fields)
    }
}
