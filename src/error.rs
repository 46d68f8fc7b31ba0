//! Error taxonomy for talking to the package-manager service.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the directory client, version resolver and command
/// executor. Every variant is fatal to the current action; nothing is
/// retried internally.
#[derive(Debug, Error)]
pub enum CrxError {
    /// The listing endpoint answered, but not with a success status.
    #[error("package service at {endpoint} answered status {actual} (expected {expected})")]
    Protocol {
        endpoint: String,
        expected: String,
        actual: String,
    },

    /// The listing response could not be decoded into package elements.
    #[error("malformed package listing: {0}")]
    Parse(String),

    /// Properties-based extraction was configured but yielded no version.
    #[error("could not extract version from {artifact:?}: {reason}")]
    VersionExtraction { artifact: PathBuf, reason: String },

    /// A remote command or upload reported a non-success outcome.
    #[error("'{command}' command against {endpoint} failed with HTTP status {status}")]
    Command {
        command: String,
        endpoint: String,
        status: u16,
    },
}
