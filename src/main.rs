//! buildah_plugin - multi-architecture image builds for CI pipelines.
//!
//! Reads `PLUGIN_*` settings from the environment and drives buildah through
//! login, manifest creation, per-architecture builds and the final push.

use buildah_plugin::cli;
use std::process;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let exit_code = cli::run().await;
    process::exit(exit_code);
}
