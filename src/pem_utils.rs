use std::path::Path;

use crate::error::{CertError, Result};

pub const CERTIFICATE_LABEL: &str = "CERTIFICATE";
pub const RSA_PRIVATE_KEY_LABEL: &str = "RSA PRIVATE KEY";

/// Convert DER‑encoded data into a PEM‑encoded string with the provided label.
pub fn der_to_pem(der: &[u8], label: &str) -> String {
    let pem = pem::Pem::new(label, der);
    pem::encode_config(
        &pem,
        pem::EncodeConfig::new().set_line_ending(pem::LineEnding::LF),
    )
}

/// Decode the first PEM block found in `contents` and return its DER payload.
///
/// `source` only labels the error; the label of the block itself is not checked.
pub fn pem_to_der(contents: &[u8], source: &Path) -> Result<Vec<u8>> {
    let pem = pem::parse(contents).map_err(|e| CertError::MalformedPem {
        path: source.to_path_buf(),
        reason: e.to_string(),
    })?;
    if pem.contents().is_empty() {
        return Err(CertError::MalformedPem {
            path: source.to_path_buf(),
            reason: format!("{} block is empty", pem.tag()),
        });
    }
    Ok(pem.contents().to_vec())
}
