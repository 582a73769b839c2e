//! Errors raised while loading CA material and issuing certificates.

use std::path::PathBuf;

use thiserror::Error;

/// Represents errors that can occur while loading CA material or issuing certificates.
///
/// Every failure is terminal for the invocation; nothing here is retried.
#[derive(Debug, Error)]
pub enum CertError {
    /// A required input was missing or out of range. Raised before any I/O.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An input file could not be read.
    #[error("Could not read file {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An output file could not be written.
    #[error("Unable to write {kind} file to {}: {source}", path.display())]
    WriteFile {
        kind: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file did not contain a usable PEM block.
    #[error("Malformed PEM in {}: {reason}", path.display())]
    MalformedPem { path: PathBuf, reason: String },

    /// The PEM payload was not valid DER for the expected structure.
    #[error("Could not parse {what} from {}: {reason}", path.display())]
    Parse {
        what: &'static str,
        path: PathBuf,
        reason: String,
    },

    /// Error during data encoding.
    #[error("Failed to encode data: {0}")]
    EncodingError(String),

    /// Error during data decoding.
    #[error("Failed to decode data: {0}")]
    DecodingError(String),

    /// Error during key generation.
    #[error("Key generation error: {0}")]
    KeyGeneration(String),

    /// Signing failed, or the produced signature did not verify against the issuer.
    #[error("Certificate signing failed: {0}")]
    Signing(String),
}

impl From<der::Error> for CertError {
    /// Converts a `der::Error` into a `CertError`.
    fn from(err: der::Error) -> Self {
        CertError::EncodingError(err.to_string())
    }
}

impl From<rsa::pkcs1::Error> for CertError {
    fn from(err: rsa::pkcs1::Error) -> Self {
        CertError::EncodingError(err.to_string())
    }
}

impl From<rsa::signature::Error> for CertError {
    fn from(err: rsa::signature::Error) -> Self {
        CertError::Signing(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CertError>;
