//! TOML recipe parsing.
//!
//! A recipe describes one release of one executable: package metadata, the
//! per-platform artifact table, the installed binary name and the smoke test.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize, de};
use thiserror::Error;

use crate::arch::PlatformKey;
use crate::hash::Sha256Hash;

/// Placeholder substituted with the release version in templates.
pub const VERSION_PLACEHOLDER: &str = "{{version}}";

/// Errors that can occur when loading or parsing a recipe.
#[derive(Error, Debug)]
pub enum RecipeError {
    /// An I/O error occurred while reading a recipe file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The TOML content could not be deserialized into a recipe.
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// The recipe parsed but is not usable.
    #[error("Invalid recipe: {0}")]
    Invalid(String),
}

/// Metadata describing the packaged software.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeInfo {
    /// Package name, also the default installed binary name.
    pub name: String,
    /// Short human-readable summary.
    #[serde(default)]
    pub description: String,
    /// Project homepage.
    #[serde(default)]
    pub homepage: String,
    /// SPDX license identifier.
    #[serde(default)]
    pub license: String,
}

/// One row of the artifact table, as written in the recipe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactSpec {
    /// Release asset file name, joined onto the release base URL and tag.
    #[serde(default)]
    pub name: Option<String>,
    /// Explicit download URL. Takes precedence over `name`.
    #[serde(default)]
    pub url: Option<String>,
    /// Expected SHA-256 of the downloaded artifact.
    pub sha256: Sha256Hash,
}

/// Version plus the per-platform artifact table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseDescriptor {
    /// Release version, e.g. `0.1.0`.
    pub version: String,
    /// Base of the release download URL, e.g. a GitHub `releases/download` path.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Release tag template.
    #[serde(default = "default_tag")]
    pub tag: String,
    /// One artifact per supported platform.
    #[serde(default, deserialize_with = "unique_platforms")]
    pub artifacts: BTreeMap<PlatformKey, ArtifactSpec>,
}

/// Rejects two rows whose keys name the same platform (`darwin-aarch64`,
/// `macos-arm64`).
fn unique_platforms<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<PlatformKey, ArtifactSpec>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, ArtifactSpec>::deserialize(deserializer)?;
    let mut artifacts = BTreeMap::new();
    let mut spelled: BTreeMap<PlatformKey, String> = BTreeMap::new();
    for (text, spec) in raw {
        let key: PlatformKey = text.parse().map_err(de::Error::custom)?;
        if let Some(first) = spelled.insert(key, text.clone()) {
            return Err(de::Error::custom(format!(
                "duplicate platform {key}: rows '{first}' and '{text}'"
            )));
        }
        artifacts.insert(key, spec);
    }
    Ok(artifacts)
}

fn default_tag() -> String {
    format!("v{VERSION_PLACEHOLDER}")
}

/// A resolved download: where to fetch and what the bytes must hash to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactEntry {
    /// Fetch address.
    pub locator: String,
    /// Expected SHA-256.
    pub digest: Sha256Hash,
}

impl ReleaseDescriptor {
    /// Substitute `{{version}}` in `template`.
    pub fn render(&self, template: &str) -> String {
        template.replace(VERSION_PLACEHOLDER, &self.version)
    }

    /// Build the fetch address for one artifact row.
    ///
    /// Returns `None` if the row has neither a URL nor a name usable with the
    /// release base URL.
    pub fn locator(&self, spec: &ArtifactSpec) -> Option<String> {
        if let Some(url) = &spec.url {
            return Some(self.render(url));
        }
        let base = self.base_url.as_deref()?.trim_end_matches('/');
        let name = self.render(spec.name.as_deref()?);
        let tag = self.render(&self.tag);
        if tag.is_empty() {
            Some(format!("{base}/{name}"))
        } else {
            Some(format!("{base}/{tag}/{name}"))
        }
    }

    /// Look up the artifact entry for `key`.
    pub fn entry(&self, key: PlatformKey) -> Option<ArtifactEntry> {
        let spec = self.artifacts.get(&key)?;
        Some(ArtifactEntry {
            locator: self.locator(spec)?,
            digest: spec.sha256.clone(),
        })
    }

    /// Every platform the release publishes an artifact for.
    pub fn platforms(&self) -> impl Iterator<Item = PlatformKey> + '_ {
        self.artifacts.keys().copied()
    }
}

/// Installed-file naming.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstallSpec {
    /// Name of the installed binary; defaults to the package name.
    #[serde(default)]
    pub bin: Option<String>,
}

/// Post-install smoke test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmokeTestSpec {
    /// Arguments passed to the installed binary.
    #[serde(default = "default_test_args")]
    pub args: Vec<String>,
    /// Substring the combined output must contain (templated).
    #[serde(default = "default_test_expect")]
    pub expect: String,
}

impl Default for SmokeTestSpec {
    fn default() -> Self {
        Self {
            args: default_test_args(),
            expect: default_test_expect(),
        }
    }
}

fn default_test_args() -> Vec<String> {
    vec!["--version".to_string()]
}

fn default_test_expect() -> String {
    VERSION_PLACEHOLDER.to_string()
}

/// Complete recipe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// Package metadata.
    pub package: RecipeInfo,
    /// Version and artifact table.
    pub release: ReleaseDescriptor,
    /// Installed-file naming.
    #[serde(default)]
    pub install: InstallSpec,
    /// Smoke test run after install.
    #[serde(default)]
    pub test: SmokeTestSpec,
}

impl Recipe {
    /// Parse a recipe from a TOML file on disk.
    ///
    /// # Errors
    ///
    /// Returns `RecipeError::Io` if the file cannot be read, or the errors of
    /// [`Recipe::parse`].
    pub fn from_file(path: &Path) -> Result<Self, RecipeError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse and validate a recipe from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `RecipeError::Parse` for malformed TOML or unknown platform
    /// keys, and `RecipeError::Invalid` if [`Recipe::validate`] fails.
    pub fn parse(content: &str) -> Result<Self, RecipeError> {
        let recipe: Self = toml::from_str(content)?;
        recipe.validate()?;
        Ok(recipe)
    }

    /// Structural checks that TOML typing cannot express.
    ///
    /// Digest values are deliberately not checked here; see
    /// [`Recipe::placeholder_digests`].
    ///
    /// # Errors
    ///
    /// Returns `RecipeError::Invalid` describing the first problem found.
    pub fn validate(&self) -> Result<(), RecipeError> {
        if self.package.name.is_empty() {
            return Err(RecipeError::Invalid("package.name is empty".into()));
        }
        if self.release.version.is_empty() {
            return Err(RecipeError::Invalid("release.version is empty".into()));
        }
        let bin = self.bin_name();
        if matches!(bin, "" | "." | "..") || bin.contains('/') || bin.contains('\\') {
            return Err(RecipeError::Invalid(format!(
                "install.bin must be a plain file name, got '{bin}'"
            )));
        }
        if self.expected_output().trim().is_empty() {
            return Err(RecipeError::Invalid(
                "test.expect is empty, so the smoke test would always pass".into(),
            ));
        }
        if self.release.artifacts.is_empty() {
            return Err(RecipeError::Invalid("release.artifacts is empty".into()));
        }
        for (key, spec) in &self.release.artifacts {
            let locator = self.release.locator(spec).ok_or_else(|| {
                RecipeError::Invalid(format!(
                    "artifact {key}: needs `url`, or `name` together with release.base_url"
                ))
            })?;
            if !(locator.starts_with("https://") || locator.starts_with("http://")) {
                return Err(RecipeError::Invalid(format!(
                    "artifact {key}: locator must be http(s), got '{locator}'"
                )));
            }
        }
        Ok(())
    }

    /// Fixed name the artifact is installed under.
    pub fn bin_name(&self) -> &str {
        self.install.bin.as_deref().unwrap_or(&self.package.name)
    }

    /// Rendered smoke-test expectation.
    pub fn expected_output(&self) -> String {
        self.release.render(&self.test.expect)
    }

    /// Platforms whose digest is not a well-formed SHA-256.
    pub fn placeholder_digests(&self) -> Vec<PlatformKey> {
        self.release
            .artifacts
            .iter()
            .filter(|(_, spec)| !spec.sha256.is_valid())
            .map(|(key, _)| *key)
            .collect()
    }
}

impl std::str::FromStr for Recipe {
    type Err = RecipeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
