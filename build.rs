//! Build script for Nutriplan
//!
//! Bumps the build counter on each recompilation and embeds build metadata.

use std::fs;
use std::path::Path;

fn main() {
    println!("cargo:rerun-if-changed=src");

    let counter_path = Path::new("build_number.txt");

    let previous: u64 = fs::read_to_string(counter_path)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0);
    let build = previous + 1;

    fs::write(counter_path, build.to_string()).expect("Failed to write build number file");

    let stamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();

    println!("cargo:rustc-env=NUTRIPLAN_BUILD_NUMBER={}", build);
    println!("cargo:rustc-env=NUTRIPLAN_BUILD_TIMESTAMP={}", stamp);
    println!("cargo:warning=Nutriplan build #{} at {}", build, stamp);
}
