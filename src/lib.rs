//! # clustercert - CA-Signed Certificates for Cluster Nodes
//!
//! clustercert issues one RSA certificate/key pair per invocation for a node of a cluster,
//! signed by an existing certificate authority. It is built entirely on RustCrypto crates
//! (`rsa`, `x509-cert`, `der`, `pem`), without openssl or ring.
//!
//! ## Workflow
//!
//! 1. Host identifiers given on the command line are split into DNS names and IP addresses
//!    ([`identity::classify_hosts`]).
//! 2. The CA certificate and its PKCS#1 RSA private key are loaded from PEM files.
//! 3. A fresh RSA key pair is generated and a leaf certificate is signed with the CA key
//!    (SHA-512 with RSA, ten years validity, server and client authentication).
//! 4. The certificate and the new private key are written as `CERTIFICATE` and
//!    `RSA PRIVATE KEY` PEM files.
//!
//! ## Issuing a Cluster Certificate
//!
//! ```rust,no_run
//! use clustercert::cluster::{ClusterCertOptions, issue_cluster_certificate};
//!
//! # fn main() -> Result<(), clustercert::error::CertError> {
//! let options = ClusterCertOptions::builder()
//!     .ca_crt("crt/ca.crt")
//!     .ca_key("crt/ca.key")
//!     .organization("Acme")
//!     .common_name("node1")
//!     .key_bits(2048)
//!     .hosts(vec!["10.0.0.5".to_string(), "node1.cluster.local".to_string()])
//!     .out_crt("crt/cluster.crt")
//!     .out_key("crt/cluster.key")
//!     .build();
//!
//! let issued = issue_cluster_certificate(&options)?;
//! println!("{}", issued.cert.to_pem()?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Bootstrapping a CA
//!
//! ```rust,no_run
//! use clustercert::ca::{CaCertOptions, create_ca_certificate};
//!
//! # fn main() -> Result<(), clustercert::error::CertError> {
//! let options = CaCertOptions::builder()
//!     .organization("Acme")
//!     .common_name("Acme Cluster CA")
//!     .out_crt("crt/ca.crt")
//!     .out_key("crt/ca.key")
//!     .build();
//! create_ca_certificate(&options)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Every failure is reported as a [`error::CertError`]; nothing is retried and nothing is
//! rolled back.
//!
//! ```rust
//! use std::path::Path;
//! use clustercert::{cert::Certificate, error::CertError};
//!
//! match Certificate::from_pem(b"not a certificate", Path::new("ca.crt")) {
//!     Ok(_) => println!("parsed"),
//!     Err(CertError::MalformedPem { path, reason }) => {
//!         println!("{} is not PEM: {}", path.display(), reason)
//!     }
//!     Err(e) => println!("Other error: {}", e),
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`identity`]: Host identifier classification
//! - [`cluster`]: Cluster certificate issuance workflow and its options
//! - [`ca`]: Self-signed CA creation
//! - [`cert`]: Certificate parsing, encoding, verification and extensions
//! - [`issuer`]: Certificate signing
//! - [`key`]: RSA key generation, import/export and signatures
//! - [`tbs_certificate`]: Low-level certificate structure construction
//! - [`pem_utils`] and [`files`]: PEM envelopes and file I/O
//! - [`cli`]: Command-line front end
//! - [`error`]: Error types

pub mod ca;
pub mod cert;
pub mod cli;
pub mod cluster;
pub mod error;
pub mod files;
pub mod identity;
pub mod issuer;
pub mod key;
pub mod pem_utils;
pub mod tbs_certificate;

pub use cli::run;
