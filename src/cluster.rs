//! Issues a CA-signed certificate and private key for one cluster node.
//!
//! The CA material is loaded and parsed before any key is generated, so a broken CA file
//! never leaves output behind. The two output files are written certificate first, and a
//! failure writing the key leaves the certificate on disk for the caller to clean up.

use std::path::PathBuf;

use bon::Builder;
use tracing::debug;

use crate::cert::extensions::{ExtendedKeyUsageOption, KeyUsage};
use crate::cert::params::{CertificationRequestInfo, DistinguishedName, Validity};
use crate::cert::{CertificateWithPrivateKey, random_serial_number};
use crate::error::{CertError, Result};
use crate::identity::classify_hosts;
use crate::issuer::Issuer;
use crate::key::{KeyPair, PublicKey};

pub const DEFAULT_CA_CRT: &str = "ca.crt";
pub const DEFAULT_CA_KEY: &str = "ca.key";
pub const DEFAULT_OUT_CRT: &str = "cluster.crt";
pub const DEFAULT_OUT_KEY: &str = "cluster.key";
pub const DEFAULT_KEY_BITS: usize = 4096;
pub const VALIDITY_YEARS: i32 = 10;

/// Everything needed to issue one cluster node certificate.
///
/// Built once by the caller and never mutated afterwards.
#[derive(Clone, Debug, Builder)]
pub struct ClusterCertOptions {
    #[builder(into, default = PathBuf::from(DEFAULT_CA_CRT))]
    pub ca_crt: PathBuf,
    #[builder(into, default = PathBuf::from(DEFAULT_CA_KEY))]
    pub ca_key: PathBuf,
    #[builder(default = DEFAULT_KEY_BITS)]
    pub key_bits: usize,
    #[builder(into, default)]
    pub common_name: String,
    #[builder(into, default)]
    pub organization: String,
    #[builder(into, default = PathBuf::from(DEFAULT_OUT_CRT))]
    pub out_crt: PathBuf,
    #[builder(into, default = PathBuf::from(DEFAULT_OUT_KEY))]
    pub out_key: PathBuf,
    /// Host names and IP addresses to list as subject alternative names.
    #[builder(default)]
    pub hosts: Vec<String>,
}

impl ClusterCertOptions {
    /// Checks the preconditions that must hold before any file is touched.
    pub fn validate(&self) -> Result<()> {
        if self.ca_crt.as_os_str().is_empty() {
            return Err(invalid("Please provide a CA certificate file path."));
        }
        if self.ca_key.as_os_str().is_empty() {
            return Err(invalid("Please provide a CA private key file path."));
        }
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

pub(crate) fn invalid(message: &str) -> CertError {
    CertError::InvalidInput(message.to_string())
}

/// Issues a node certificate signed by the CA and writes it and its new key as PEM files.
///
/// Returns the issued certificate together with the freshly generated key.
pub fn issue_cluster_certificate(options: &ClusterCertOptions) -> Result<CertificateWithPrivateKey> {
    options.validate()?;

    let subject_alt_name = classify_hosts(&options.hosts);
    debug!(
        dns_names = ?subject_alt_name.dns_names,
        ip_addresses = ?subject_alt_name.ip_addresses,
        "classified host identifiers"
    );

    let ca = CertificateWithPrivateKey::load(&options.ca_crt, &options.ca_key)?;

    debug!(bits = options.key_bits, "generating cluster key pair");
    let key = KeyPair::generate_rsa(options.key_bits)?;

    let subject = DistinguishedName::builder()
        .common_name(options.common_name.clone())
        .organization(options.organization.clone())
        .build();

    let request = CertificationRequestInfo::builder()
        .subject(subject)
        .subject_public_key(PublicKey::from_key_pair(&key))
        .key_usage(KeyUsage::cluster_node())
        .usages(vec![
            ExtendedKeyUsageOption::ServerAuth,
            ExtendedKeyUsageOption::ClientAuth,
        ])
        .subject_alt_name(subject_alt_name)
        .build();

    let serial_number = random_serial_number()?;
    debug!(serial = ?serial_number, "signing cluster certificate");
    let cert = ca.issue(&request, Validity::for_years(VALIDITY_YEARS)?, serial_number)?;

    let issued = CertificateWithPrivateKey { cert, key };
    issued.save(&options.out_crt, &options.out_key, "cluster")?;
    Ok(issued)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_options() -> ClusterCertOptions {
        ClusterCertOptions::builder().organization("Acme").build()
    }

    #[test]
    fn test_builder_defaults_match_cli_defaults() {
        let options = valid_options();
        assert_eq!(options.ca_crt, PathBuf::from("ca.crt"));
        assert_eq!(options.ca_key, PathBuf::from("ca.key"));
        assert_eq!(options.out_crt, PathBuf::from("cluster.crt"));
        assert_eq!(options.out_key, PathBuf::from("cluster.key"));
        assert_eq!(options.key_bits, 4096);
        assert!(options.common_name.is_empty());
        assert!(options.hosts.is_empty());
        options.validate().unwrap();
    }

    #[test]
    fn test_organization_is_required() {
        let options = ClusterCertOptions::builder().build();
        let err = options.validate().unwrap_err();
        assert!(err.to_string().contains("organisation"));
    }

    #[test]
    fn test_preconditions_are_checked_in_order() {
        let options = ClusterCertOptions::builder()
            .ca_crt("")
            .ca_key("")
            .out_crt("")
            .build();
        let err = options.validate().unwrap_err();
        assert!(err.to_string().contains("CA certificate"));

        let options = ClusterCertOptions::builder()
            .organization("Acme")
            .out_crt("")
            .out_key("")
            .build();
        let err = options.validate().unwrap_err();
        assert!(err.to_string().contains("certificate file path"));

        let options = ClusterCertOptions::builder()
            .organization("Acme")
            .out_key("")
            .build();
        let err = options.validate().unwrap_err();
        assert!(err.to_string().contains("private key file path"));
    }

    #[test]
    fn test_zero_key_size_is_rejected() {
        let options = ClusterCertOptions::builder()
            .organization("Acme")
            .key_bits(0)
            .build();
        assert!(matches!(options.validate(), Err(CertError::InvalidInput(_))));
    }

    #[test]
    fn test_missing_ca_file_fails_before_key_generation() {
        let dir = tempfile::tempdir().unwrap();
        let options = ClusterCertOptions::builder()
            .organization("Acme")
            .ca_crt(dir.path().join("missing.crt"))
            .out_crt(dir.path().join("cluster.crt"))
            .out_key(dir.path().join("cluster.key"))
            .build();
        let err = issue_cluster_certificate(&options).unwrap_err();
        assert!(matches!(err, CertError::ReadFile { .. }));
        assert!(!dir.path().join("cluster.crt").exists());
        assert!(!dir.path().join("cluster.key").exists());
    }
}
