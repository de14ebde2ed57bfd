//! Platform resolution: host identity → artifact entry.
//!
//! Resolution is an exact table lookup. There is no fallback artifact for a
//! platform the release does not list, and nothing here touches the network
//! or the environment beyond the compile-time host constants.

use htmcp_schema::{ArtifactEntry, PlatformKey, ReleaseDescriptor};
use tracing::debug;

use crate::error::InstallError;

/// Resolve the artifact for raw OS / architecture identifiers.
///
/// Identifiers use the spelling of `std::env::consts` (`macos`, `aarch64`)
/// or the recipe spelling (`macos`, `arm64`).
pub fn resolve(
    release: &ReleaseDescriptor,
    os: &str,
    arch: &str,
) -> Result<(PlatformKey, ArtifactEntry), InstallError> {
    let unsupported = || InstallError::UnsupportedPlatform {
        os: os.to_string(),
        arch: arch.to_string(),
    };

    let key = PlatformKey::from_host_ids(os, arch).ok_or_else(unsupported)?;
    let entry = release.entry(key).ok_or_else(unsupported)?;
    debug!(platform = %key, locator = %entry.locator, "resolved artifact");
    Ok((key, entry))
}

/// Resolve the artifact for the machine we are running on.
pub fn resolve_host(
    release: &ReleaseDescriptor,
) -> Result<(PlatformKey, ArtifactEntry), InstallError> {
    resolve(release, std::env::consts::OS, std::env::consts::ARCH)
}

/// Every (platform, entry) pair the release can install.
pub fn resolve_all(release: &ReleaseDescriptor) -> Vec<(PlatformKey, ArtifactEntry)> {
    release
        .platforms()
        .filter_map(|key| release.entry(key).map(|entry| (key, entry)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use htmcp_schema::{Arch, Os, Recipe};

    const RECIPE: &str = r#"
[package]
name = "ht-mcp"

[release]
version = "0.1.0"
base_url = "https://github.com/memextech/ht-mcp/releases/download"

[release.artifacts.macos-arm64]
name = "ht-mcp-aarch64-apple-darwin"
sha256 = "aa"

[release.artifacts.macos-x86_64]
name = "ht-mcp-x86_64-apple-darwin"
sha256 = "bb"

[release.artifacts.linux-x86_64]
name = "ht-mcp-x86_64-unknown-linux-gnu"
sha256 = "cc"
"#;

    fn release() -> ReleaseDescriptor {
        Recipe::parse(RECIPE).unwrap().release
    }

    #[test]
    fn test_every_listed_platform_resolves() {
        let release = release();
        for key in release.platforms() {
            let (resolved, entry) =
                resolve(&release, key.os.as_str(), key.arch.rust_name()).unwrap();
            assert_eq!(resolved, key);
            assert!(entry.locator.ends_with(&format!(
                "ht-mcp-{}-{}",
                key.arch.rust_name(),
                match key.os {
                    Os::MacOs => "apple-darwin",
                    _ => "unknown-linux-gnu",
                }
            )));
        }
    }

    #[test]
    fn test_macos_arm64_entry() {
        let (key, entry) = resolve(&release(), "macos", "aarch64").unwrap();
        assert_eq!(key, PlatformKey::new(Os::MacOs, Arch::Arm64));
        assert_eq!(entry.digest.as_str(), "aa");
    }

    #[test]
    fn test_unlisted_platforms_are_unsupported() {
        let release = release();
        for (os, arch) in [
            ("windows", "x86_64"),
            ("linux", "aarch64"),
            ("freebsd", "x86_64"),
            ("linux", "riscv64"),
            ("solaris", "sparc64"),
        ] {
            let err = resolve(&release, os, arch).unwrap_err();
            match err {
                InstallError::UnsupportedPlatform { os: o, arch: a } => {
                    assert_eq!((o.as_str(), a.as_str()), (os, arch));
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn test_resolve_all_lists_table() {
        let all = resolve_all(&release());
        assert_eq!(all.len(), 3);
        // BTreeMap order: os first, then arch
        assert_eq!(all[0].0, PlatformKey::new(Os::MacOs, Arch::Arm64));
    }
}
