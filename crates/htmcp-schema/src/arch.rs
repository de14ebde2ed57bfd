//! Host platform identifiers.
//!
//! A recipe publishes one artifact per [`PlatformKey`]. The key is an
//! (operating system, CPU architecture) pair; both halves are closed enums so
//! that adding a platform is a new table row in the recipe, never new control
//! flow.
//!
//! # Example
//!
//! ```
//! use htmcp_schema::{Arch, Os, PlatformKey};
//!
//! let key: PlatformKey = "macos-arm64".parse().unwrap();
//! assert_eq!(key, PlatformKey::new(Os::MacOs, Arch::Arm64));
//! assert_eq!(key.to_string(), "macos-arm64");
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Operating system family.
///
/// Vendors spell the same OS differently (`darwin`, `macos`, `osx`); parsing
/// accepts the common aliases and [`as_str`](Self::as_str) always yields the
/// canonical recipe spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Os {
    /// Apple macOS.
    MacOs,
    /// Linux (glibc).
    Linux,
    /// Microsoft Windows.
    Windows,
    /// FreeBSD.
    FreeBsd,
}

impl Os {
    /// Canonical lowercase name used in recipe keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MacOs => "macos",
            Self::Linux => "linux",
            Self::Windows => "windows",
            Self::FreeBsd => "freebsd",
        }
    }
}

impl std::fmt::Display for Os {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Os {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "macos" | "darwin" | "osx" | "mac" => Ok(Self::MacOs),
            "linux" => Ok(Self::Linux),
            "windows" | "win32" | "win" => Ok(Self::Windows),
            "freebsd" => Ok(Self::FreeBsd),
            _ => Err(format!("Unknown operating system: {s}")),
        }
    }
}

/// CPU architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Arch {
    /// 64-bit ARM (Apple Silicon, Graviton, ...).
    Arm64,
    /// 64-bit Intel/AMD.
    X86_64,
}

impl Arch {
    /// Platform-convention name (`arm64` / `x86_64`), used in recipe keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Arm64 => "arm64",
            Self::X86_64 => "x86_64",
        }
    }

    /// Rust-convention architecture name (`aarch64` / `x86_64`).
    ///
    /// Matches `std::env::consts::ARCH` and the first component of a target
    /// triple, which is how release artifacts are usually named.
    pub fn rust_name(&self) -> &'static str {
        match self {
            Self::Arm64 => "aarch64",
            Self::X86_64 => "x86_64",
        }
    }
}

impl std::fmt::Display for Arch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Arch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "arm64" | "aarch64" => Ok(Self::Arm64),
            "x86_64" | "amd64" | "x64" => Ok(Self::X86_64),
            _ => Err(format!("Unknown architecture: {s}")),
        }
    }
}

/// An (OS, architecture) pair selecting exactly one artifact.
///
/// Written as `<os>-<arch>`, e.g. `linux-x86_64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlatformKey {
    /// Operating system half of the key.
    pub os: Os,
    /// Architecture half of the key.
    pub arch: Arch,
}

impl PlatformKey {
    /// Build a key from its two halves.
    pub fn new(os: Os, arch: Arch) -> Self {
        Self { os, arch }
    }

    /// Map raw host identifiers (as reported by `std::env::consts`) to a key.
    ///
    /// Returns `None` when either identifier is not one of the known variants.
    pub fn from_host_ids(os: &str, arch: &str) -> Option<Self> {
        Some(Self::new(os.parse().ok()?, arch.parse().ok()?))
    }

    /// Key for the machine this binary was compiled for, if it is a known one.
    pub fn host() -> Option<Self> {
        Self::from_host_ids(std::env::consts::OS, std::env::consts::ARCH)
    }
}

impl std::fmt::Display for PlatformKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)
    }
}

impl std::str::FromStr for PlatformKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Architectures contain '_' but never '-', so the first '-' splits.
        let (os, arch) = s
            .split_once('-')
            .ok_or_else(|| format!("Invalid platform key '{s}': expected <os>-<arch>"))?;
        Ok(Self::new(os.parse()?, arch.parse()?))
    }
}

impl Serialize for PlatformKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PlatformKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
