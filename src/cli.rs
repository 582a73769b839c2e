//! Command-line argument definitions and dispatch.

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::ca::{CaCertOptions, create_ca_certificate};
use crate::cluster::{
    ClusterCertOptions, DEFAULT_CA_CRT, DEFAULT_CA_KEY, DEFAULT_KEY_BITS, DEFAULT_OUT_CRT,
    DEFAULT_OUT_KEY, issue_cluster_certificate,
};

/// Issue CA-signed certificates for cluster nodes.
#[derive(Parser, Debug)]
#[command(name = "clustercert")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v for debug, -vv for trace); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new cluster certificate and key.
    #[command(
        after_help = "Example:\n  clustercert cluster --ca-crt crt/ca.crt --ca-key crt/ca.key --out-org Acme --out-crt crt/cluster.crt --out-key crt/cluster.key node1.cluster.local 10.0.0.5"
    )]
    Cluster(ClusterArgs),

    /// Create a new self-signed CA certificate and key.
    Ca(CaArgs),
}

#[derive(Args, Debug)]
pub struct ClusterArgs {
    /// The path to the CA certificate file.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CA_CRT)]
    pub ca_crt: PathBuf,

    /// The path to the CA private key file.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CA_KEY)]
    pub ca_key: PathBuf,

    /// The desired number of bits for the key.
    #[arg(long, value_name = "BITS", default_value_t = DEFAULT_KEY_BITS)]
    pub key_size: usize,

    /// The common name for the server certificate.
    #[arg(long, value_name = "NAME", default_value = "", hide_default_value = true)]
    pub out_com: String,

    /// The organisation name for the server certificate.
    #[arg(long, value_name = "NAME", default_value = "", hide_default_value = true)]
    pub out_org: String,

    /// The path destination for the server certificate file.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_OUT_CRT)]
    pub out_crt: PathBuf,

    /// The path destination for the server private key file.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_OUT_KEY)]
    pub out_key: PathBuf,

    /// Host names and IP addresses the certificate is valid for.
    #[arg(value_name = "HOST")]
    pub hosts: Vec<String>,
}

impl From<ClusterArgs> for ClusterCertOptions {
    fn from(args: ClusterArgs) -> Self {
        ClusterCertOptions::builder()
            .ca_crt(args.ca_crt)
            .ca_key(args.ca_key)
            .key_bits(args.key_size)
            .common_name(args.out_com)
            .organization(args.out_org)
            .out_crt(args.out_crt)
            .out_key(args.out_key)
            .hosts(args.hosts)
            .build()
    }
}

#[derive(Args, Debug)]
pub struct CaArgs {
    /// The desired number of bits for the key.
    #[arg(long, value_name = "BITS", default_value_t = DEFAULT_KEY_BITS)]
    pub key_size: usize,

    /// The common name for the CA certificate.
    #[arg(long, value_name = "NAME", default_value = "", hide_default_value = true)]
    pub out_com: String,

    /// The organisation name for the CA certificate.
    #[arg(long, value_name = "NAME", default_value = "", hide_default_value = true)]
    pub out_org: String,

    /// The path destination for the CA certificate file.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CA_CRT)]
    pub out_crt: PathBuf,

    /// The path destination for the CA private key file.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CA_KEY)]
    pub out_key: PathBuf,
}

impl From<CaArgs> for CaCertOptions {
    fn from(args: CaArgs) -> Self {
        CaCertOptions::builder()
            .key_bits(args.key_size)
            .common_name(args.out_com)
            .organization(args.out_org)
            .out_crt(args.out_crt)
            .out_key(args.out_key)
            .build()
    }
}

/// Parse the command line, set up logging and run the selected command.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Cluster(args) => {
            issue_cluster_certificate(&args.into())
                .context("Could not create the cluster certificate")?;
        }
        Commands::Ca(args) => {
            create_ca_certificate(&args.into()).context("Could not create the CA certificate")?;
        }
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .init();
}
