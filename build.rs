//! Build script for prdigest: embeds version information for `--version`.
//!
//! `BUILD_INFO_HUMAN` is `"<pkg version> (<git describe>) <rustc version>"`.
//! If the tree has no tags, git describe falls back to the short commit
//! hash. Components that are unavailable (no git, no rustc on PATH) are
//! omitted. A build from a source tarball carries the package version plus
//! a build timestamp.

use std::process::Command;

use chrono::Utc;

fn main() {
    ["src", "build.rs", "Cargo.toml"]
        .iter()
        .for_each(|path| println!("cargo:rerun-if-changed={path}"));

    println!("cargo:rustc-env=BUILD_INFO_HUMAN={}", build_info());
}

/// Runs a command and returns its trimmed stdout if it succeeded.
fn command_output(program: &str, args: &[&str]) -> Option<String> {
    Command::new(program)
        .args(args)
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn git_version() -> String {
    command_output("git", &["describe", "--tags", "--always", "--dirty"])
        .unwrap_or_else(|| format!("built {}", Utc::now().format("%Y%m%d%H%M%S")))
}

fn build_info() -> String {
    [
        Some(env!("CARGO_PKG_VERSION").to_string()),
        Some(format!("({})", git_version())),
        command_output("rustc", &["--version"]),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" ")
}
