#![allow(dead_code)]

use std::path::{Path, PathBuf};

use clustercert::ca::{CaCertOptions, create_ca_certificate};
use clustercert::cert::CertificateWithPrivateKey;
use clustercert::cluster::ClusterCertOptions;

pub const TEST_KEY_BITS: usize = 1024;

/// Creates `ca.crt`/`ca.key` under `dir` and returns the loaded CA.
pub fn generate_ca(dir: &Path) -> CertificateWithPrivateKey {
    generate_named_ca(dir, "ca", "Test Cluster CA")
}

pub fn generate_named_ca(dir: &Path, stem: &str, common_name: &str) -> CertificateWithPrivateKey {
    let options = CaCertOptions::builder()
        .key_bits(TEST_KEY_BITS)
        .common_name(common_name)
        .organization("Crab widgits SE")
        .out_crt(dir.join(format!("{stem}.crt")))
        .out_key(dir.join(format!("{stem}.key")))
        .build();
    create_ca_certificate(&options).expect("CA generation failed")
}

pub fn out_paths(dir: &Path) -> (PathBuf, PathBuf) {
    (dir.join("cluster.crt"), dir.join("cluster.key"))
}

/// Options for a cluster certificate issued from the CA in `dir`, written into `dir`.
pub fn cluster_options(dir: &Path, hosts: &[&str]) -> ClusterCertOptions {
    let (out_crt, out_key) = out_paths(dir);
    ClusterCertOptions::builder()
        .ca_crt(dir.join("ca.crt"))
        .ca_key(dir.join("ca.key"))
        .key_bits(TEST_KEY_BITS)
        .common_name("node1")
        .organization("Acme")
        .out_crt(out_crt)
        .out_key(out_key)
        .hosts(hosts.iter().map(|h| h.to_string()).collect())
        .build()
}
