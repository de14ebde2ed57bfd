//! Install failure taxonomy.
//!
//! Every variant is terminal for the run. [`InstallError::stage`] tells the
//! user which step failed and [`InstallError::exit_code`] gives the host
//! package manager a distinct status per step.

use std::path::PathBuf;

use thiserror::Error;

/// Pipeline step, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Host identity → artifact entry.
    Resolve,
    /// Download of the artifact bytes.
    Fetch,
    /// Digest comparison.
    Verify,
    /// Temp write, chmod and rename into the bin directory.
    Place,
    /// Version invocation of the installed binary.
    SmokeTest,
}

impl Stage {
    /// Name shown to users when the stage fails.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Resolve => "resolution",
            Self::Fetch => "fetch",
            Self::Verify => "integrity",
            Self::Place => "permission",
            Self::SmokeTest => "verification",
        }
    }

    /// Progress verb shown while the stage runs.
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Resolve => "Resolving",
            Self::Fetch => "Downloading",
            Self::Verify => "Verifying",
            Self::Place => "Installing",
            Self::SmokeTest => "Testing",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Error, Debug)]
pub enum InstallError {
    #[error("Unsupported platform: no artifact for {os}/{arch}")]
    UnsupportedPlatform { os: String, arch: String },

    #[error("Download of {url} failed: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Hash mismatch: expected {expected}, got {actual}")]
    IntegrityMismatch { expected: String, actual: String },

    #[error("Cannot write {}: {source}", path.display())]
    Permission {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Smoke test of {} failed: {reason}", path.display())]
    VerificationFailed { path: PathBuf, reason: String },
}

impl InstallError {
    pub(crate) fn fetch(url: &str, reason: impl std::fmt::Display) -> Self {
        Self::Fetch {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn permission(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Permission {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn verification(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        Self::VerificationFailed {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// The step that produced this error.
    pub fn stage(&self) -> Stage {
        match self {
            Self::UnsupportedPlatform { .. } => Stage::Resolve,
            Self::Fetch { .. } => Stage::Fetch,
            Self::IntegrityMismatch { .. } => Stage::Verify,
            Self::Permission { .. } => Stage::Place,
            Self::VerificationFailed { .. } => Stage::SmokeTest,
        }
    }

    /// Process exit status for this failure (1 and 2 are left to the CLI).
    pub fn exit_code(&self) -> u8 {
        match self.stage() {
            Stage::Resolve => 3,
            Stage::Fetch => 4,
            Stage::Verify => 5,
            Stage::Place => 6,
            Stage::SmokeTest => 7,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct() {
        let errors = [
            InstallError::UnsupportedPlatform {
                os: "windows".into(),
                arch: "x86_64".into(),
            },
            InstallError::fetch("https://example.com", "HTTP 404"),
            InstallError::IntegrityMismatch {
                expected: "a".into(),
                actual: "b".into(),
            },
            InstallError::permission("/bin/x", std::io::Error::other("denied")),
            InstallError::verification("/bin/x", "no output"),
        ];
        let mut codes: Vec<u8> = errors.iter().map(InstallError::exit_code).collect();
        codes.dedup();
        assert_eq!(codes, vec![3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_stage_labels_name_the_failing_step() {
        let err = InstallError::IntegrityMismatch {
            expected: "a".into(),
            actual: "b".into(),
        };
        assert_eq!(err.stage().label(), "integrity");
        assert_eq!(
            InstallError::permission("/x", std::io::Error::other("ro"))
                .stage()
                .to_string(),
            "permission"
        );
    }
}
