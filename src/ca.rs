//! Creates the self-signed CA that cluster certificates are issued from.

use std::path::PathBuf;

use bon::Builder;
use tracing::debug;

use crate::cert::extensions::KeyUsage;
use crate::cert::params::{CertificationRequestInfo, DistinguishedName, Validity};
use crate::cert::{Certificate, CertificateWithPrivateKey};
use crate::cluster::{DEFAULT_CA_CRT, DEFAULT_CA_KEY, DEFAULT_KEY_BITS, VALIDITY_YEARS, invalid};
use crate::error::Result;
use crate::key::{KeyPair, PublicKey};

#[derive(Clone, Debug, Builder)]
pub struct CaCertOptions {
    #[builder(default = DEFAULT_KEY_BITS)]
    pub key_bits: usize,
    #[builder(into, default)]
    pub common_name: String,
    #[builder(into, default)]
    pub organization: String,
    #[builder(into, default = PathBuf::from(DEFAULT_CA_CRT))]
    pub out_crt: PathBuf,
    #[builder(into, default = PathBuf::from(DEFAULT_CA_KEY))]
    pub out_key: PathBuf,
}

impl CaCertOptions {
    pub fn validate(&self) -> Result<()> {
        if self.organization.is_empty() {
            return Err(invalid("Please provide an organisation name."));
        }
        if self.out_crt.as_os_str().is_empty() {
            return Err(invalid("Please provide a certificate file path."));
        }
        if self.out_key.as_os_str().is_empty() {
            return Err(invalid("Please provide a private key file path."));
        }
        if self.key_bits == 0 {
            return Err(invalid("Please provide a positive key size."));
        }
        Ok(())
    }
}

/// Generates a CA key pair and a self-signed CA certificate, and writes both as PEM files.
pub fn create_ca_certificate(options: &CaCertOptions) -> Result<CertificateWithPrivateKey> {
    options.validate()?;

    debug!(bits = options.key_bits, "generating CA key pair");
    let key = KeyPair::generate_rsa(options.key_bits)?;

    let subject = DistinguishedName::builder()
        .common_name(options.common_name.clone())
        .organization(options.organization.clone())
        .build();

    let request = CertificationRequestInfo::builder()
        .subject(subject)
        .subject_public_key(PublicKey::from_key_pair(&key))
        .is_ca(true)
        .key_usage(KeyUsage::certificate_authority())
        .build();

    let cert = Certificate::new_self_signed(&request, &key, Validity::for_years(VALIDITY_YEARS)?)?;

    let ca = CertificateWithPrivateKey { cert, key };
    ca.save(&options.out_crt, &options.out_key, "CA")?;
    Ok(ca)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cert::extensions::{BasicConstraints, SubjectKeyIdentifier};

    #[test]
    fn test_creates_self_signed_ca() {
        let dir = tempfile::tempdir().unwrap();
        let options = CaCertOptions::builder()
            .key_bits(1024)
            .common_name("Acme Root")
            .organization("Acme")
            .out_crt(dir.path().join("ca.crt"))
            .out_key(dir.path().join("ca.key"))
            .build();
        let ca = create_ca_certificate(&options).unwrap();

        assert_eq!(ca.cert.issuer(), ca.cert.subject());
        ca.cert
            .verify_signed_by(&ca.cert.public_key().unwrap())
            .unwrap();

        let bc: BasicConstraints = ca.cert.extension().unwrap().unwrap();
        assert!(bc.is_ca);
        let ski: SubjectKeyIdentifier = ca.cert.extension().unwrap().unwrap();
        assert_eq!(ski.0, ca.key.public_key().key_identifier().unwrap());

        let loaded =
            CertificateWithPrivateKey::load(&options.out_crt, &options.out_key).unwrap();
        assert_eq!(loaded.key.public_key(), ca.key.public_key());
        assert_eq!(loaded.cert.subject_dn().common_name, "Acme Root");
    }

    #[test]
    fn test_organization_is_required() {
        let options = CaCertOptions::builder().build();
        assert!(options.validate().is_err());
    }
}
