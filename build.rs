// SPDX-License-Identifier: MPL-2.0

use std::process::Command;

fn main() {
    println!("cargo::rerun-if-changed=.git/HEAD");
    println!("cargo::rerun-if-env-changed=PHOTO_EXPRESS_VERSION");

    // Packagers may pin the version (no git checkout in the build sandbox)
    let version = std::env::var("PHOTO_EXPRESS_VERSION")
        .ok()
        .or_else(git_version)
        .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());

    println!("cargo::rustc-env=GIT_VERSION={}", version);
}

/// Package version with the short commit hash appended, `-dirty` when the
/// working tree has uncommitted changes
fn git_version() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--always", "--dirty", "--abbrev=7"])
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let describe = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if describe.is_empty() {
        return None;
    }
    Some(format!("{}-{}", env!("CARGO_PKG_VERSION"), describe))
}
