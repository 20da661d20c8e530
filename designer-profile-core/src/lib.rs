//! Configuration and marshalling core for a process-diagram editing profile.
//!
//! Two responsibilities:
//!
//! 1. Load a declarative profile descriptor naming a stencil set, an ordered
//!    plugin list, and an optional external-load endpoint
//!    ([`ProfileDescriptor`], [`DesignerProfile`]).
//! 2. Bridge a diagram's JSON model and its durable structured-document form
//!    in both directions ([`JsonToDocument`], [`DocumentToJson`]), with the
//!    document grammar carried as data ([`DocumentGrammar`]).
//!
//! Every conversion call is synchronous, builds its parsing state fresh, and
//! shares nothing with other calls. Conversion failures are absorbed at the
//! `marshal`/`unmarshal` boundary ([`ConversionOutcome`]); configuration
//! failures abort profile construction.

pub mod convert;
pub mod descriptor;
pub mod document;
pub mod error;
pub mod grammar;
pub mod plugin;
pub mod profile;

pub use convert::{ConversionOutcome, DocumentToJson, JsonToDocument};
pub use descriptor::{ExternalEndpoint, ProfileDescriptor};
pub use document::{DocumentTree, Element, DOCUMENT_ENCODING};
pub use error::{ProfileError, Result};
pub use grammar::{AttributeType, DocumentGrammar};
pub use plugin::{DiagramPlugin, MemoryPluginRegistry, PluginBinding, PluginRegistry};
pub use profile::DesignerProfile;
