// rt-framelog - Build Script
//
// Injects the banner version string; sets up ESP-IDF when the `esp` feature is on.

use std::process::Command;

fn git_short_hash() -> Option<String> {
    let out = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let hash = String::from_utf8(out.stdout).ok()?;
    let hash = hash.trim();
    (!hash.is_empty()).then(|| hash.to_owned())
}

fn main() {
    // ESP-IDF environment setup (MUST be first!)
    #[cfg(feature = "esp")]
    embuild::espidf::sysenv::output();

    let hash = git_short_hash().unwrap_or_else(|| "unknown".to_owned());
    println!("cargo:rustc-env=GIT_HASH={hash}");
    println!(
        "cargo:rustc-env=VERSION_STRING={}-g{hash}",
        env!("CARGO_PKG_VERSION")
    );

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=build.rs");
}
