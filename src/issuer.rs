use der::Encode;
use x509_cert::certificate::CertificateInner;
use x509_cert::name::Name;
use x509_cert::serial_number::SerialNumber;

use crate::cert::Certificate;
use crate::cert::SignatureAlgorithm;
use crate::cert::extensions::{
    AuthorityKeyIdentifier, BasicConstraints, ExtendedKeyUsage, SubjectKeyIdentifier,
};
use crate::cert::params::{CertificationRequestInfo, ExtensionParam, Validity};
use crate::error::{CertError, Result};
use crate::key::{KeyPair, PublicKey};
use crate::tbs_certificate::TbsCertificate;

/// Represents an entity capable of issuing certificates.
///
/// This trait provides methods to retrieve issuer details and issue certificates.
pub trait Issuer {
    /// Returns the name written into the issued certificate's issuer field.
    fn issuer_name(&self) -> Name;

    /// Returns the signing key of the issuer.
    fn signing_key(&self) -> &KeyPair;

    /// Returns the public key issued certificates must verify against.
    ///
    /// For a CA this comes from its certificate, not from its private key, so a mismatched
    /// key pair is caught at issuance time.
    fn issuer_public_key(&self) -> Result<PublicKey>;

    /// Returns the authority key identifier to embed, if any.
    fn authority_key_identifier(&self) -> Result<Option<AuthorityKeyIdentifier>>;

    fn signature_algorithm(&self) -> SignatureAlgorithm {
        SignatureAlgorithm::Sha512WithRSA
    }

    /// Issues a certificate based on the provided certification request information.
    ///
    /// # Arguments
    /// * `cert_request` - The certification request information containing details about the certificate to be issued.
    /// * `validity` - The validity window of the issued certificate.
    /// * `serial_number` - The serial number of the issued certificate.
    ///
    /// # Returns
    /// The signed `Certificate`, already checked against [`Issuer::issuer_public_key`].
    fn issue(
        &self,
        cert_request: &CertificationRequestInfo,
        validity: Validity,
        serial_number: SerialNumber,
    ) -> Result<Certificate> {
        let signature_algorithm = self.signature_algorithm();

        let basic_constraints = BasicConstraints {
            is_ca: cert_request.is_ca,
            max_path_length: None,
        };

        let mut extensions: Vec<ExtensionParam> =
            vec![ExtensionParam::from_extension(&basic_constraints, true)?];

        if !cert_request.key_usage.is_empty() {
            extensions.push(ExtensionParam::from_extension(
                &cert_request.key_usage,
                true,
            )?);
        }

        if !cert_request.usages.is_empty() {
            let extended_key_usage = ExtendedKeyUsage {
                usage: cert_request.usages.clone(),
            };
            extensions.push(ExtensionParam::from_extension(&extended_key_usage, false)?);
        }

        if cert_request.is_ca {
            let ski = SubjectKeyIdentifier(cert_request.subject_public_key.key_identifier()?);
            extensions.push(ExtensionParam::from_extension(&ski, false)?);
        }

        if let Some(aki) = self.authority_key_identifier()? {
            extensions.push(ExtensionParam::from_extension(&aki, false)?);
        }

        if !cert_request.subject_alt_name.is_empty() {
            extensions.push(ExtensionParam::from_extension(
                &cert_request.subject_alt_name,
                false,
            )?);
        }

        let tbs_cert = TbsCertificate {
            serial_number,
            signature_algorithm,
            issuer: self.issuer_name(),
            validity,
            subject: cert_request.subject.clone(),
            subject_public_key: cert_request.subject_public_key.clone(),
            extensions,
        };

        let tbs_cert_inner = tbs_cert.to_tbs_certificate_inner()?;

        let signature = self
            .signing_key()
            .sign_data(signature_algorithm, &tbs_cert_inner.to_der()?)?;

        let cert = Certificate {
            inner: CertificateInner {
                tbs_certificate: tbs_cert_inner,
                signature_algorithm: signature_algorithm.into(),
                signature: der::asn1::BitString::from_bytes(&signature)?,
            },
        };

        cert.verify_signed_by(&self.issuer_public_key()?)
            .map_err(|e| {
                CertError::Signing(format!(
                    "signature does not verify against the issuer certificate, \
                     the CA key probably does not belong to the CA certificate ({e})"
                ))
            })?;

        Ok(cert)
    }
}
