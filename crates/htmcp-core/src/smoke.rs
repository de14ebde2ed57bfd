//! Post-install smoke test.
//!
//! Runs the installed binary with its version flag and looks for the release
//! version in what it prints. Exit status is logged, not judged.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use htmcp_schema::Recipe;
use tokio::process::Command;
use tracing::debug;

use crate::error::InstallError;

/// Invocation and expectation for a smoke test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmokeTest {
    /// Arguments passed to the binary.
    pub args: Vec<String>,
    /// Substring the combined stdout + stderr must contain.
    pub expect: String,
    /// Caller-supplied limit; `None` waits for the process.
    pub timeout: Option<Duration>,
}

impl SmokeTest {
    pub fn new(args: Vec<String>, expect: impl Into<String>) -> Self {
        Self {
            args,
            expect: expect.into(),
            timeout: None,
        }
    }

    /// The recipe's `[test]` table with `{{version}}` rendered.
    pub fn from_recipe(recipe: &Recipe) -> Self {
        Self::new(
            recipe
                .test
                .args
                .iter()
                .map(|a| recipe.release.render(a))
                .collect(),
            recipe.expected_output(),
        )
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run the binary and return its combined output.
    ///
    /// Fails with [`InstallError::VerificationFailed`] if the binary is
    /// missing, cannot be executed, times out, or does not print `expect`.
    pub async fn run(&self, binary: &Path) -> Result<String, InstallError> {
        if !binary.is_file() {
            return Err(InstallError::verification(binary, "binary is not installed"));
        }

        let mut cmd = Command::new(binary);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, cmd.output())
                .await
                .map_err(|_| {
                    InstallError::verification(
                        binary,
                        format!("no exit within {}s", limit.as_secs_f64()),
                    )
                })?,
            None => cmd.output().await,
        }
        .map_err(|e| InstallError::verification(binary, format!("cannot execute: {e}")))?;

        // Same as `2>&1`, minus the interleaving.
        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        debug!(binary = %binary.display(), status = %output.status, output = %combined.trim(), "smoke test ran");

        if combined.contains(&self.expect) {
            Ok(combined)
        } else {
            Err(InstallError::verification(
                binary,
                format!(
                    "expected output to contain '{}', got '{}' ({})",
                    self.expect,
                    combined.trim(),
                    output.status
                ),
            ))
        }
    }
}
