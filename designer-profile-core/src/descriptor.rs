//! Profile descriptor loader.
//!
//! A descriptor is a small declarative file naming the profile's stencil
//! set, its ordered plugin list, and an optional external-load endpoint.
//! Loading is a forward-only scan over start-element events. No tree is
//! built, so the pass is O(size) with constant memory.

use crate::error::{ProfileError, Result};
use crate::plugin::{PluginBinding, PluginRegistry};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Endpoint a profile may load external models from. The descriptor carries
/// it as the `externalloadurl` element with `name`/`usr`/`pwd` attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExternalEndpoint {
    pub url: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
}

/// Resolved profile configuration. Built once during profile construction
/// and immutable afterwards, so concurrent readers need no synchronization.
#[derive(Debug, Clone, Default)]
pub struct ProfileDescriptor {
    stencil_set: Option<String>,
    plugins: Vec<PluginBinding>,
    external_endpoint: Option<ExternalEndpoint>,
}

impl ProfileDescriptor {
    /// Load a descriptor from a file. A missing or unreadable file is a
    /// fatal `Configuration` error; no partial descriptor is produced.
    pub fn from_path(path: impl AsRef<Path>, registry: &dyn PluginRegistry) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ProfileError::Configuration {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_reader(BufReader::new(file), registry)
    }

    /// Stream-parse a descriptor. Recognized elements:
    ///
    /// - `profile`: `stencilset` attribute; a repeated element overwrites
    ///   the recorded value (last wins).
    /// - `plugin`: `name` attribute, looked up in `registry`; an
    ///   unresolvable name is kept at its position with an empty binding
    ///   rather than aborting the load.
    /// - `externalloadurl`: `name`/`usr`/`pwd` attributes.
    ///
    /// Unknown elements and attributes are ignored. Tokenizer failures are
    /// `MalformedDescriptor`. The source is dropped on every exit path.
    pub fn from_reader<R: BufRead>(source: R, registry: &dyn PluginRegistry) -> Result<Self> {
        let mut reader = Reader::from_reader(source);
        reader.config_mut().trim_text(true);

        let mut descriptor = Self::default();
        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                    descriptor.apply_element(&e, registry)?;
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => return Err(ProfileError::MalformedDescriptor(e.to_string())),
            }
            buf.clear();
        }
        Ok(descriptor)
    }

    fn apply_element(&mut self, e: &BytesStart<'_>, registry: &dyn PluginRegistry) -> Result<()> {
        match e.local_name().as_ref() {
            b"profile" => {
                if let Some(value) = attr_value(e, b"stencilset")? {
                    self.stencil_set = Some(value);
                }
            }
            b"plugin" => match attr_value(e, b"name")? {
                Some(name) => {
                    let plugin = registry.lookup(&name);
                    if plugin.is_none() {
                        tracing::debug!(plugin = %name, "configured plugin not in registry");
                    }
                    self.plugins.push(PluginBinding { name, plugin });
                }
                None => {
                    tracing::debug!("plugin element without a name attribute, skipped");
                }
            },
            b"externalloadurl" => {
                self.external_endpoint = Some(ExternalEndpoint {
                    url: attr_value(e, b"name")?,
                    user: attr_value(e, b"usr")?,
                    password: attr_value(e, b"pwd")?,
                });
            }
            _ => {}
        }
        Ok(())
    }

    pub fn stencil_set(&self) -> Option<&str> {
        self.stencil_set.as_deref()
    }

    /// Plugin bindings in descriptor order, unresolved names included.
    pub fn plugins(&self) -> &[PluginBinding] {
        &self.plugins
    }

    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.iter().map(|b| b.name.as_str()).collect()
    }

    pub fn external_endpoint(&self) -> Option<&ExternalEndpoint> {
        self.external_endpoint.as_ref()
    }
}

fn attr_value(e: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(|e| ProfileError::MalformedDescriptor(e.to_string()))?;
        if attr.key.local_name().as_ref() == name {
            let value = attr
                .unescape_value()
                .map_err(|e| ProfileError::MalformedDescriptor(e.to_string()))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::tests::StubPlugin;
    use crate::plugin::MemoryPluginRegistry;

    fn registry() -> MemoryPluginRegistry {
        let mut registry = MemoryPluginRegistry::new();
        registry.register(StubPlugin::arc("Arrangement"));
        registry.register(StubPlugin::arc("ShapeMenu"));
        registry
    }

    fn load(text: &str) -> ProfileDescriptor {
        ProfileDescriptor::from_reader(text.as_bytes(), &registry()).unwrap()
    }

    #[test]
    fn full_descriptor_loads() {
        let descriptor = load(
            r#"<profile name="process" stencilset="bpmn2.0">
                 <plugin name="Arrangement"/>
                 <plugin name="ShapeMenu"/>
                 <externalloadurl name="http://repo/models" usr="designer" pwd="secret"/>
               </profile>"#,
        );
        assert_eq!(descriptor.stencil_set(), Some("bpmn2.0"));
        assert_eq!(descriptor.plugin_names(), ["Arrangement", "ShapeMenu"]);

        let endpoint = descriptor.external_endpoint().unwrap();
        assert_eq!(endpoint.url.as_deref(), Some("http://repo/models"));
        assert_eq!(endpoint.user.as_deref(), Some("designer"));
        assert_eq!(endpoint.password.as_deref(), Some("secret"));
    }

    #[test]
    fn repeated_profile_element_last_wins() {
        let descriptor = load(
            r#"<profiles>
                 <profile stencilset="first"/>
                 <profile stencilset="second"/>
               </profiles>"#,
        );
        assert_eq!(descriptor.stencil_set(), Some("second"));
    }

    #[test]
    fn unresolvable_plugin_keeps_its_position() {
        let descriptor = load(
            r#"<profile stencilset="bpmn2.0">
                 <plugin name="Arrangement"/>
                 <plugin name="NotInstalled"/>
                 <plugin name="ShapeMenu"/>
               </profile>"#,
        );
        assert_eq!(
            descriptor.plugin_names(),
            ["Arrangement", "NotInstalled", "ShapeMenu"]
        );
        assert!(descriptor.plugins()[0].is_resolved());
        assert!(!descriptor.plugins()[1].is_resolved());
        assert!(descriptor.plugins()[2].is_resolved());
    }

    #[test]
    fn unknown_elements_and_attributes_are_ignored() {
        let descriptor = load(
            r#"<profile stencilset="bpmn2.0" flavor="dark">
                 <theme name="midnight"/>
               </profile>"#,
        );
        assert_eq!(descriptor.stencil_set(), Some("bpmn2.0"));
        assert!(descriptor.plugins().is_empty());
        assert!(descriptor.external_endpoint().is_none());
    }

    #[test]
    fn malformed_markup_is_rejected() {
        let err =
            ProfileDescriptor::from_reader("<profile stencilset=oops>".as_bytes(), &registry())
                .unwrap_err();
        assert!(matches!(err, ProfileError::MalformedDescriptor(_)));
    }

    #[test]
    fn missing_file_is_a_configuration_error() {
        let err =
            ProfileDescriptor::from_path("/nonexistent/profiles/process.xml", &registry())
                .unwrap_err();
        assert!(matches!(err, ProfileError::Configuration { .. }));
    }

    #[test]
    fn descriptor_loads_from_disk() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"<profile stencilset="bpmn2.0"/>"#).unwrap();
        let descriptor = ProfileDescriptor::from_path(file.path(), &registry()).unwrap();
        assert_eq!(descriptor.stencil_set(), Some("bpmn2.0"));
    }
}
