use std::io;
use thiserror::Error;

/// Failures surfaced by the profile core.
///
/// `Configuration` and `MalformedDescriptor` are fatal for profile
/// construction and always propagate. The conversion errors
/// (`MalformedDocument`, `SchemaViolation`, `ModelParse`, `Io`) propagate
/// from the strict `to_document`/`to_json` entry points but are absorbed by
/// the fail-soft `marshal`/`unmarshal` wrappers, which log and return a
/// degraded outcome instead.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("cannot open profile descriptor {path}: {source}")]
    Configuration {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("malformed profile descriptor: {0}")]
    MalformedDescriptor(String),

    #[error("malformed document: {0}")]
    MalformedDocument(String),

    #[error("document violates grammar: {0}")]
    SchemaViolation(String),

    #[error("model parse failed: {0}")]
    ModelParse(String),

    #[error("serialization failed: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, ProfileError>;
