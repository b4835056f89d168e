//! Deployment functions used across test cases.

use std::path::PathBuf;

/// Find the project root via the crate root provided by `cargo test`,
/// and get a path relative to it.
/// This depends on the convention that all our crates live two levels
/// below the root, in `/crates/<group>/<name>`.
pub fn get_deployment_file(deployment_path: &str) -> PathBuf {
    let mut d = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    d.push("../../../");
    d.push(deployment_path);
    d
}

/// The configuration directory describing the fixture entities.
pub fn fixture_configuration_directory() -> PathBuf {
    get_deployment_file("static/configuration")
}
