// SPDX-License-Identifier: GPL-3.0-only

use std::process::Command;

fn main() {
    println!("cargo::rerun-if-changed=.git/HEAD");
    println!("cargo::rerun-if-env-changed=DEPTH_TRIGGER_VERSION");

    // Packagers can pin the full version string
    let version = std::env::var("DEPTH_TRIGGER_VERSION").unwrap_or_else(|_| {
        let base = env!("CARGO_PKG_VERSION");
        match short_hash() {
            Some(hash) => format!("{}+{}", base, hash),
            None => base.to_string(),
        }
    });

    println!("cargo::rustc-env=GIT_VERSION={}", version);
}

/// Short commit hash of HEAD, `None` outside a git checkout
fn short_hash() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;

    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
        .filter(|hash| !hash.is_empty())
}
