//! The process designer profile.
//!
//! A profile ties a descriptor to the conversion pipeline and exposes the
//! read-only surface the hosting editor consumes. Construction is the only
//! mutating moment; afterwards the profile is shared freely.

use crate::convert::{DocumentToJson, JsonToDocument};
use crate::descriptor::ProfileDescriptor;
use crate::error::Result;
use crate::grammar::DocumentGrammar;
use crate::plugin::{PluginBinding, PluginRegistry};
use std::io::BufRead;
use std::path::Path;

const PROFILE_NAME: &str = "process";
const PROFILE_TITLE: &str = "Process Designer";
const MODEL_EXTENSION: &str = "bpmn";
const STENCIL_SET_URL: &str = "/designer/stencilsets/bpmn2.0/bpmn2.0.json";
const STENCIL_SET_NAMESPACE_URL: &str = "http://b3mn.org/stencilset/bpmn2.0#";
const STENCIL_SET_EXTENSION_URL: &str =
    "http://oryx-editor.org/stencilsets/extensions/bpmncosts-2.0#";

pub struct DesignerProfile {
    descriptor: ProfileDescriptor,
    grammar: DocumentGrammar,
}

impl DesignerProfile {
    /// Build a profile from a descriptor file. Fails loudly: a missing or
    /// malformed descriptor produces no profile object at all.
    pub fn from_path(path: impl AsRef<Path>, registry: &dyn PluginRegistry) -> Result<Self> {
        Ok(Self::with_descriptor(ProfileDescriptor::from_path(
            path, registry,
        )?))
    }

    /// Build a profile from an already-open descriptor source.
    pub fn from_reader<R: BufRead>(source: R, registry: &dyn PluginRegistry) -> Result<Self> {
        Ok(Self::with_descriptor(ProfileDescriptor::from_reader(
            source, registry,
        )?))
    }

    /// Resolve `<base>/profiles/<name>.xml` and build from it, mirroring how
    /// the hosting container lays out profile descriptors.
    pub fn from_profile_dir(base: impl AsRef<Path>, registry: &dyn PluginRegistry) -> Result<Self> {
        let path = base
            .as_ref()
            .join("profiles")
            .join(format!("{PROFILE_NAME}.xml"));
        Self::from_path(path, registry)
    }

    fn with_descriptor(descriptor: ProfileDescriptor) -> Self {
        Self {
            descriptor,
            grammar: DocumentGrammar::bpmn(),
        }
    }

    /// Swap the document grammar the converters are configured with.
    pub fn with_grammar(mut self, grammar: DocumentGrammar) -> Self {
        self.grammar = grammar;
        self
    }

    // ── Read-only surface ──

    pub fn name(&self) -> &'static str {
        PROFILE_NAME
    }

    pub fn title(&self) -> &'static str {
        PROFILE_TITLE
    }

    pub fn serialized_model_extension(&self) -> &'static str {
        MODEL_EXTENSION
    }

    /// Stencil set named by the descriptor.
    pub fn stencil_set(&self) -> Option<&str> {
        self.descriptor.stencil_set()
    }

    pub fn stencil_set_url(&self) -> &'static str {
        STENCIL_SET_URL
    }

    pub fn stencil_set_namespace_url(&self) -> &'static str {
        STENCIL_SET_NAMESPACE_URL
    }

    pub fn stencil_set_extension_url(&self) -> &'static str {
        STENCIL_SET_EXTENSION_URL
    }

    /// This profile ships no stencil set extensions.
    pub fn stencil_set_extensions(&self) -> &[String] {
        &[]
    }

    /// Plugin names in descriptor order, unresolved ones included.
    pub fn plugins(&self) -> Vec<&str> {
        self.descriptor.plugin_names()
    }

    pub fn plugin_bindings(&self) -> &[PluginBinding] {
        self.descriptor.plugins()
    }

    pub fn external_load_url(&self) -> Option<&str> {
        self.descriptor
            .external_endpoint()
            .and_then(|endpoint| endpoint.url.as_deref())
    }

    pub fn external_load_user(&self) -> Option<&str> {
        self.descriptor
            .external_endpoint()
            .and_then(|endpoint| endpoint.user.as_deref())
    }

    pub fn external_load_password(&self) -> Option<&str> {
        self.descriptor
            .external_endpoint()
            .and_then(|endpoint| endpoint.password.as_deref())
    }

    pub fn descriptor(&self) -> &ProfileDescriptor {
        &self.descriptor
    }

    // ── Conversion pipeline ──

    /// Save-path converter (JSON model → document text). A fresh value per
    /// call; converters share nothing.
    pub fn marshaller(&self) -> JsonToDocument {
        JsonToDocument::new(self.grammar.clone())
    }

    /// Load-path converter (document text → JSON model).
    pub fn unmarshaller(&self) -> DocumentToJson {
        DocumentToJson::new(self.grammar.clone())
    }
}
