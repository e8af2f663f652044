//! xcembed - Xcode build-phase framework embedder.
//!
//! This binary copies framework bundles and their debug-symbol sidecars into
//! the build product, keeping only the architectures valid for the current
//! target.

use std::process;

#[tokio::main]
async fn main() {
    // Build-phase warnings must reach the build log even without RUST_LOG
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // Run CLI and get exit code
    let exit_code = match xcembed::cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    process::exit(exit_code);
}
