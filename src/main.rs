//! clustercert - issue CA-signed certificates for cluster nodes.

use anyhow::Result;

fn main() -> Result<()> {
    clustercert::run()
}
