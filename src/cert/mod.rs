pub mod extensions;
pub mod params;

use std::path::Path;

use der::{Decode, Encode};
use extensions::{
    AuthorityKeyIdentifier, SubjectAltName, SubjectKeyIdentifier, ToAndFromX509Extension,
};
use params::{CertificationRequestInfo, DistinguishedName, Validity};
use time::OffsetDateTime;
use tracing::info;
use x509_cert::certificate::CertificateInner;
use x509_cert::name::Name;
use x509_cert::serial_number::SerialNumber;

use crate::error::{CertError, Result};
use crate::files::{read_input, write_output};
use crate::issuer::Issuer;
use crate::key::{KeyPair, PublicKey};
use crate::pem_utils::{CERTIFICATE_LABEL, der_to_pem, pem_to_der};

/// Represents the supported signature algorithms for certificates.
///
/// This enum provides a mapping to the corresponding OIDs for each algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    /// SHA-256 with RSA encryption.
    Sha256WithRSA,
    /// SHA-512 with RSA encryption.
    Sha512WithRSA,
}

impl From<SignatureAlgorithm> for x509_cert::spki::AlgorithmIdentifierOwned {
    /// RSA PKCS#1 v1.5 identifiers carry an explicit NULL parameter (RFC 4055).
    fn from(value: SignatureAlgorithm) -> Self {
        let oid = match value {
            SignatureAlgorithm::Sha256WithRSA => const_oid::db::rfc5912::SHA_256_WITH_RSA_ENCRYPTION,
            SignatureAlgorithm::Sha512WithRSA => const_oid::db::rfc5912::SHA_512_WITH_RSA_ENCRYPTION,
        };
        x509_cert::spki::AlgorithmIdentifierOwned {
            oid,
            parameters: Some(der::asn1::Any::from(der::asn1::AnyRef::NULL)),
        }
    }
}

impl TryFrom<&x509_cert::spki::AlgorithmIdentifierOwned> for SignatureAlgorithm {
    type Error = CertError;

    fn try_from(value: &x509_cert::spki::AlgorithmIdentifierOwned) -> Result<Self> {
        match value.oid {
            const_oid::db::rfc5912::SHA_256_WITH_RSA_ENCRYPTION => Ok(Self::Sha256WithRSA),
            const_oid::db::rfc5912::SHA_512_WITH_RSA_ENCRYPTION => Ok(Self::Sha512WithRSA),
            other => Err(CertError::DecodingError(format!(
                "Unsupported signature algorithm {other}"
            ))),
        }
    }
}

/// Represents an X.509 certificate.
///
/// This struct provides methods to encode the certificate into DER or PEM formats.
#[derive(Debug, Clone)]
pub struct Certificate {
    /// The inner representation of the certificate.
    pub inner: CertificateInner,
}

impl Certificate {
    /// Parses a DER-encoded certificate.
    pub fn from_der(der: &[u8]) -> Result<Self> {
        let inner =
            CertificateInner::from_der(der).map_err(|e| CertError::DecodingError(e.to_string()))?;
        Ok(Certificate { inner })
    }

    /// Parses the first PEM block of `contents` as a certificate; `source` names it in errors.
    pub fn from_pem(contents: &[u8], source: &Path) -> Result<Self> {
        let der = pem_to_der(contents, source)?;
        Self::from_der(&der).map_err(|e| CertError::Parse {
            what: "certificate",
            path: source.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Encodes the certificate into DER format.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        self.inner
            .to_der()
            .map_err(|e| CertError::EncodingError(e.to_string()))
    }

    /// Encodes the certificate into a PEM block labelled `CERTIFICATE`.
    pub fn to_pem(&self) -> Result<String> {
        Ok(der_to_pem(&self.to_der()?, CERTIFICATE_LABEL))
    }

    pub fn subject(&self) -> &Name {
        &self.inner.tbs_certificate.subject
    }

    pub fn issuer(&self) -> &Name {
        &self.inner.tbs_certificate.issuer
    }

    pub fn subject_dn(&self) -> DistinguishedName {
        DistinguishedName::from_x509_name(self.subject())
    }

    pub fn serial_number(&self) -> &SerialNumber {
        &self.inner.tbs_certificate.serial_number
    }

    pub fn public_key(&self) -> Result<PublicKey> {
        PublicKey::from_x509spki(&self.inner.tbs_certificate.subject_public_key_info)
    }

    pub fn validity(&self) -> Validity {
        let validity = &self.inner.tbs_certificate.validity;
        Validity {
            not_before: OffsetDateTime::from(validity.not_before.to_system_time()),
            not_after: OffsetDateTime::from(validity.not_after.to_system_time()),
        }
    }

    /// Looks up an extension by its type and decodes it.
    pub fn extension<E: ToAndFromX509Extension>(&self) -> Result<Option<E>> {
        let Some(extensions) = &self.inner.tbs_certificate.extensions else {
            return Ok(None);
        };
        extensions
            .iter()
            .find(|ext| ext.extn_id == E::OID)
            .map(|ext| E::from_x509_extension_value(ext.extn_value.as_bytes()))
            .transpose()
    }

    /// The subject alternative names, or an empty set if the extension is absent.
    pub fn subject_alt_name(&self) -> Result<SubjectAltName> {
        Ok(self.extension::<SubjectAltName>()?.unwrap_or_default())
    }

    /// Checks that this certificate's signature was produced by `issuer`'s key.
    pub fn verify_signed_by(&self, issuer: &PublicKey) -> Result<()> {
        let algorithm = SignatureAlgorithm::try_from(&self.inner.signature_algorithm)?;
        let tbs = self.inner.tbs_certificate.to_der()?;
        let signature = self.inner.signature.raw_bytes();
        issuer.verify(algorithm, &tbs, signature)
    }

    /// Creates a new self-signed certificate.
    ///
    /// # Arguments
    /// * `cert_info` - The certification request information.
    /// * `key` - The key pair used to sign the certificate.
    /// * `validity` - The validity window of the certificate.
    pub fn new_self_signed(
        cert_info: &CertificationRequestInfo,
        key: &KeyPair,
        validity: Validity,
    ) -> Result<Self> {
        // For self-signed certificates, the issuer is the same as the subject
        let self_issuer = SelfIssuer {
            name: cert_info.subject.as_x509_name()?,
            key,
        };
        self_issuer.issue(cert_info, validity, random_serial_number()?)
    }
}

/// A positive 128-bit serial number from the thread-local CSPRNG.
pub fn random_serial_number() -> Result<SerialNumber> {
    let mut bytes: [u8; 16] = rand::random();
    // Clear the sign bit and keep the first byte non-zero so the DER INTEGER is exactly 16 bytes.
    bytes[0] = (bytes[0] & 0x7f) | 0x40;
    Ok(SerialNumber::new(&bytes)?)
}

// Helper struct for self-signed certificates
struct SelfIssuer<'a> {
    name: Name,
    key: &'a KeyPair,
}

impl Issuer for SelfIssuer<'_> {
    fn issuer_name(&self) -> Name {
        self.name.clone()
    }

    fn signing_key(&self) -> &KeyPair {
        self.key
    }

    fn issuer_public_key(&self) -> Result<PublicKey> {
        Ok(self.key.public_key())
    }

    fn authority_key_identifier(&self) -> Result<Option<AuthorityKeyIdentifier>> {
        Ok(None)
    }
}

/// A CA certificate together with its private key, loaded once per invocation.
#[derive(Debug, Clone)]
pub struct CertificateWithPrivateKey {
    pub cert: Certificate,
    pub key: KeyPair,
}

impl CertificateWithPrivateKey {
    /// Loads a CA certificate and its PKCS#1 RSA private key from PEM files.
    ///
    /// The certificate is read and parsed before the key file is touched.
    pub fn load(cert_path: &Path, key_path: &Path) -> Result<Self> {
        let cert = Certificate::from_pem(&read_input(cert_path)?, cert_path)?;
        let key = KeyPair::from_pkcs1_pem(&read_input(key_path)?, key_path)?;
        Ok(Self { cert, key })
    }

    /// Writes the certificate, then the private key, as PEM files.
    ///
    /// Not atomic: if the key write fails the certificate file stays behind.
    pub fn save(&self, cert_path: &Path, key_path: &Path, role: &str) -> Result<()> {
        let cert_pem = self.cert.to_pem()?;
        let key_pem = self.key.to_pkcs1_pem()?;

        info!("Saving {role} certificate file into {}...", cert_path.display());
        write_output(cert_path, cert_pem.as_bytes(), "certificate")?;

        info!("Saving {role} private key file into {}...", key_path.display());
        write_output(key_path, key_pem.as_bytes(), "private key")?;
        Ok(())
    }
}

impl Issuer for CertificateWithPrivateKey {
    fn issuer_name(&self) -> Name {
        // The name of the issuer is the subject of the certificate
        self.cert.subject().clone()
    }

    fn signing_key(&self) -> &KeyPair {
        &self.key
    }

    fn issuer_public_key(&self) -> Result<PublicKey> {
        self.cert.public_key()
    }

    fn authority_key_identifier(&self) -> Result<Option<AuthorityKeyIdentifier>> {
        let key_identifier = match self.cert.extension::<SubjectKeyIdentifier>()? {
            Some(ski) => ski.0,
            None => self.cert.public_key()?.key_identifier()?,
        };
        Ok(Some(AuthorityKeyIdentifier { key_identifier }))
    }
}
