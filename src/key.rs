use std::path::Path;

use rsa::pkcs1::{DecodeRsaPrivateKey, EncodeRsaPrivateKey, EncodeRsaPublicKey};
use rsa::pkcs1v15::{
    Signature as RsaSignature, SigningKey as RsaSigningKey, VerifyingKey as RsaVerifyingKey,
};
use rsa::pkcs8::{DecodePublicKey, EncodePublicKey};
use rsa::signature::{SignatureEncoding, Signer as RsaSigner, Verifier as RsaVerifier};
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha1::Sha1;
use sha2::{Sha256, Sha512};
use x509_cert::spki::SubjectPublicKeyInfoOwned;

use crate::cert::SignatureAlgorithm;
use crate::error::{CertError, Result};
use crate::pem_utils::{RSA_PRIVATE_KEY_LABEL, der_to_pem, pem_to_der};

/// An RSA key pair used either as the CA signing key or as a freshly issued node key.
#[derive(Clone, Debug)]
pub struct KeyPair {
    private: Box<RsaPrivateKey>,
    public: RsaPublicKey,
}

impl KeyPair {
    /// Generate an RSA key pair with the specified number of bits.
    ///
    /// Blocks on the OS random source for the whole generation.
    pub fn generate_rsa(bits: usize) -> Result<Self> {
        let mut rng = rand_core::OsRng;
        let private = RsaPrivateKey::new(&mut rng, bits)
            .map_err(|e| CertError::KeyGeneration(e.to_string()))?;
        let public = RsaPublicKey::from(&private);
        Ok(KeyPair {
            private: Box::new(private),
            public,
        })
    }

    /// Import a PKCS#1 DER-encoded RSA private key.
    pub fn import_from_pkcs1_der(der: &[u8]) -> Result<Self> {
        let private = RsaPrivateKey::from_pkcs1_der(der)
            .map_err(|e| CertError::DecodingError(e.to_string()))?;
        let public = RsaPublicKey::from(&private);
        Ok(KeyPair {
            private: Box::new(private),
            public,
        })
    }

    /// Import the first PEM block of `contents` as a PKCS#1 RSA private key.
    ///
    /// `source` names the file in errors.
    pub fn from_pkcs1_pem(contents: &[u8], source: &Path) -> Result<Self> {
        let der = pem_to_der(contents, source)?;
        Self::import_from_pkcs1_der(&der).map_err(|e| CertError::Parse {
            what: "RSA private key",
            path: source.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Export the private key as PKCS#1 DER.
    pub fn to_pkcs1_der(&self) -> Result<Vec<u8>> {
        let document = self.private.to_pkcs1_der()?;
        Ok(document.as_bytes().to_vec())
    }

    /// Export the private key as a PEM block labelled `RSA PRIVATE KEY`.
    pub fn to_pkcs1_pem(&self) -> Result<String> {
        Ok(der_to_pem(&self.to_pkcs1_der()?, RSA_PRIVATE_KEY_LABEL))
    }

    /// Modulus size in bits.
    pub fn bits(&self) -> usize {
        rsa::traits::PublicKeyParts::size(&self.public) * 8
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.public.clone())
    }

    /// Signs `data` with PKCS#1 v1.5 using the digest named by `algorithm`.
    pub fn sign_data(&self, algorithm: SignatureAlgorithm, data: &[u8]) -> Result<Vec<u8>> {
        let private = (*self.private).clone();
        let signature = match algorithm {
            SignatureAlgorithm::Sha256WithRSA => {
                RsaSigningKey::<Sha256>::new(private).try_sign(data)?
            }
            SignatureAlgorithm::Sha512WithRSA => {
                RsaSigningKey::<Sha512>::new(private).try_sign(data)?
            }
        };
        Ok(signature.to_vec())
    }
}

/// The public half of an RSA key, as embedded in a certificate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey(pub RsaPublicKey);

impl PublicKey {
    pub fn from_key_pair(key_pair: &KeyPair) -> Self {
        key_pair.public_key()
    }

    /// Extracts an RSA public key from a certificate's SubjectPublicKeyInfo.
    pub fn from_x509spki(spki: &SubjectPublicKeyInfoOwned) -> Result<Self> {
        use der::Encode;
        let der = spki.to_der()?;
        let public = RsaPublicKey::from_public_key_der(&der)
            .map_err(|e| CertError::DecodingError(format!("not an RSA public key: {e}")))?;
        Ok(PublicKey(public))
    }

    pub fn to_spki(&self) -> Result<SubjectPublicKeyInfoOwned> {
        use der::Decode;
        let der = self
            .0
            .to_public_key_der()
            .map_err(|e| CertError::EncodingError(e.to_string()))?;
        Ok(SubjectPublicKeyInfoOwned::from_der(der.as_bytes())?)
    }

    /// SHA-1 over the PKCS#1 public key bits (RFC 5280 section 4.2.1.2, method 1).
    pub fn key_identifier(&self) -> Result<Vec<u8>> {
        let bits = self.0.to_pkcs1_der()?;
        Ok(<Sha1 as sha1::Digest>::digest(bits.as_bytes()).to_vec())
    }

    /// Verifies a PKCS#1 v1.5 signature over `data`.
    pub fn verify(&self, algorithm: SignatureAlgorithm, data: &[u8], signature: &[u8]) -> Result<()> {
        let signature = RsaSignature::try_from(signature)?;
        let public = self.0.clone();
        match algorithm {
            SignatureAlgorithm::Sha256WithRSA => {
                RsaVerifyingKey::<Sha256>::new(public).verify(data, &signature)?
            }
            SignatureAlgorithm::Sha512WithRSA => {
                RsaVerifyingKey::<Sha512>::new(public).verify(data, &signature)?
            }
        }
        Ok(())
    }
}
