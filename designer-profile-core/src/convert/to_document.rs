//! Save path: JSON model → document tree → serialized text.

use crate::convert::ConversionOutcome;
use crate::document::{DocumentTree, Element};
use crate::error::{ProfileError, Result};
use crate::grammar::{scalar_to_attr, DocumentGrammar};
use serde_json::Value;

/// Converts the editing surface's JSON model into the document form.
///
/// Structural mapping, per grammar: a JSON object is an element; its scalar
/// fields are attributes; the `children` array holds ordered child elements;
/// the `text` field holds text content. A non-reserved field carrying an
/// array or object does not fit the document shape and fails the conversion
/// loudly; nothing is dropped in silence. `null` fields map to attribute
/// absence; that is the one deliberate lossy rule.
#[derive(Debug, Clone)]
pub struct JsonToDocument {
    grammar: DocumentGrammar,
}

impl JsonToDocument {
    pub fn new(grammar: DocumentGrammar) -> Self {
        Self { grammar }
    }

    /// Strict conversion: parse the JSON model and build the tree.
    pub fn to_document(&self, json_model: &str) -> Result<DocumentTree> {
        let value: Value =
            serde_json::from_str(json_model).map_err(|e| ProfileError::ModelParse(e.to_string()))?;
        let root = self.element_from_value(&value)?;
        Ok(DocumentTree { root })
    }

    /// Fail-soft conversion to serialized text. On any failure the cause is
    /// logged and the outcome degrades to empty text.
    pub fn marshal(&self, json_model: &str) -> ConversionOutcome {
        match self
            .to_document(json_model)
            .and_then(|tree| tree.to_xml(&self.grammar))
        {
            Ok(text) => ConversionOutcome::Complete(text),
            Err(error) => {
                tracing::error!(%error, "model could not be marshalled to document text");
                ConversionOutcome::Degraded
            }
        }
    }

    fn element_from_value(&self, value: &Value) -> Result<Element> {
        let Value::Object(fields) = value else {
            return Err(ProfileError::ModelParse(format!(
                "expected a JSON object for an element node, found {}",
                kind(value)
            )));
        };
        let name = match fields.get(&self.grammar.element_key) {
            Some(Value::String(name)) => name.clone(),
            Some(other) => {
                return Err(ProfileError::ModelParse(format!(
                    "'{}' must be a string, found {}",
                    self.grammar.element_key,
                    kind(other)
                )))
            }
            None => {
                return Err(ProfileError::ModelParse(format!(
                    "element node without a '{}' field",
                    self.grammar.element_key
                )))
            }
        };

        let mut element = Element::new(name);
        for (key, field) in fields {
            if *key == self.grammar.element_key {
                continue;
            }
            if *key == self.grammar.children_key {
                element.children = self.children_from_value(field)?;
            } else if *key == self.grammar.text_key {
                match field {
                    Value::String(text) => element.text = Some(text.clone()),
                    other => {
                        return Err(ProfileError::ModelParse(format!(
                            "'{}' must be a string, found {}",
                            self.grammar.text_key,
                            kind(other)
                        )))
                    }
                }
            } else if field.is_null() {
                // null → absent attribute
            } else {
                match scalar_to_attr(field) {
                    Some(attr) => {
                        element.attributes.insert(key.clone(), attr);
                    }
                    None => {
                        return Err(ProfileError::ModelParse(format!(
                            "field '{}' holds {}, which has no attribute form",
                            key,
                            kind(field)
                        )))
                    }
                }
            }
        }
        Ok(element)
    }

    fn children_from_value(&self, field: &Value) -> Result<Vec<Element>> {
        let Value::Array(items) = field else {
            return Err(ProfileError::ModelParse(format!(
                "'{}' must be an array, found {}",
                self.grammar.children_key,
                kind(field)
            )));
        };
        items.iter().map(|item| self.element_from_value(item)).collect()
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::DocumentGrammar;

    fn converter() -> JsonToDocument {
        JsonToDocument::new(DocumentGrammar::bpmn())
    }

    #[test]
    fn scalar_fields_become_attributes() {
        let tree = converter()
            .to_document(
                r#"{ "element": "definitions",
                     "children": [
                       { "element": "process", "id": "p1", "isExecutable": true,
                         "children": [ { "element": "task", "x": 120 } ] }
                     ] }"#,
            )
            .unwrap();

        let process = &tree.root.children[0];
        assert_eq!(process.attribute("id"), Some("p1"));
        assert_eq!(process.attribute("isExecutable"), Some("true"));
        assert_eq!(process.children[0].attribute("x"), Some("120"));
    }

    #[test]
    fn text_field_becomes_text_content() {
        let tree = converter()
            .to_document(
                r#"{ "element": "definitions",
                     "children": [ { "element": "documentation", "text": "sign first" } ] }"#,
            )
            .unwrap();
        assert_eq!(tree.root.children[0].text.as_deref(), Some("sign first"));
    }

    #[test]
    fn bare_element_still_serializes() {
        let outcome = converter().marshal(r#"{ "element": "definitions" }"#);
        assert!(!outcome.is_degraded());
        assert!(outcome.as_text().contains("<definitions"));
    }

    #[test]
    fn null_fields_are_dropped() {
        let tree = converter()
            .to_document(r#"{ "element": "definitions", "id": null }"#)
            .unwrap();
        assert_eq!(tree.root.attribute("id"), None);
    }

    #[test]
    fn nested_object_outside_children_is_rejected() {
        let err = converter()
            .to_document(r#"{ "element": "definitions", "bounds": { "x": 1 } }"#)
            .unwrap_err();
        assert!(matches!(err, ProfileError::ModelParse(_)));
    }

    #[test]
    fn missing_element_name_is_rejected() {
        let err = converter().to_document(r#"{ "id": "p1" }"#).unwrap_err();
        assert!(matches!(err, ProfileError::ModelParse(_)));
    }

    #[test]
    fn invalid_json_is_a_model_parse_error() {
        let err = converter().to_document("{ not json").unwrap_err();
        assert!(matches!(err, ProfileError::ModelParse(_)));
    }
}
