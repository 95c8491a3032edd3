use std::process::Command;

use chrono::Local;

/// Exposes `BUILD_HASH` (short git hash, plus a timestamp for dirty trees)
/// to `fbref --version`.
fn main() {
    let build_hash = match git_short_hash() {
        Some(hash) if tree_is_dirty() => {
            format!("{hash}-dirty-{}", Local::now().format("%Y%m%d-%H%M%S"))
        }
        Some(hash) => hash,
        None => "unknown".to_string(),
    };

    println!("cargo:rustc-env=BUILD_HASH={build_hash}");
    println!("cargo:rerun-if-changed=../../.git/HEAD");
    println!("cargo:rerun-if-changed=../../.git/index");
}

fn git_short_hash() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;
    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Tracked changes only; untracked files don't count.
fn tree_is_dirty() -> bool {
    Command::new("git")
        .args(["diff", "--quiet", "HEAD"])
        .status()
        .map(|s| !s.success())
        .unwrap_or(false)
}
