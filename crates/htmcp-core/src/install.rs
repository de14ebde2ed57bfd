//! Install pipeline.
//!
//! resolve → fetch → verify → place → smoke test, strictly in that order.
//! [`InstallPlan`] is the output of resolution; [`Installer::install`] runs
//! the remaining steps. Nothing is written under the bin directory until the
//! fetched bytes match the expected digest.

use std::path::{Path, PathBuf};

use htmcp_schema::{ArtifactEntry, PlatformKey, Recipe, Sha256Digest};
use reqwest::Client;
use tracing::info;

use crate::error::{InstallError, Stage};
use crate::io::{fetch::fetch, place::place};
use crate::smoke::SmokeTest;
use crate::{Reporter, integrity, resolver};

/// Everything needed to install one binary, decided before any network access.
#[derive(Debug, Clone)]
pub struct InstallPlan {
    pub name: String,
    pub version: String,
    pub platform: PlatformKey,
    pub entry: ArtifactEntry,
    /// `<bin-dir>/<bin-name>`
    pub target: PathBuf,
    pub smoke: SmokeTest,
}

impl InstallPlan {
    /// Plan an install of `recipe` for the running host into `bin_dir`.
    pub fn for_host(recipe: &Recipe, bin_dir: &Path) -> Result<Self, InstallError> {
        Self::for_platform(recipe, std::env::consts::OS, std::env::consts::ARCH, bin_dir)
    }

    /// Plan an install for explicit OS / architecture identifiers.
    pub fn for_platform(
        recipe: &Recipe,
        os: &str,
        arch: &str,
        bin_dir: &Path,
    ) -> Result<Self, InstallError> {
        let (platform, entry) = resolver::resolve(&recipe.release, os, arch)?;
        Ok(Self {
            name: recipe.package.name.clone(),
            version: recipe.release.version.clone(),
            platform,
            entry,
            target: bin_dir.join(recipe.bin_name()),
            smoke: SmokeTest::from_recipe(recipe),
        })
    }
}

/// The verified result of an install.
#[derive(Debug, Clone)]
pub struct InstalledBinary {
    pub path: PathBuf,
    pub digest: Sha256Digest,
    pub size: u64,
    /// Combined output of the smoke test.
    pub version_output: String,
}

/// Runs install plans against a shared HTTP client.
pub struct Installer<'a, R: Reporter + ?Sized> {
    client: &'a Client,
    reporter: &'a R,
}

impl<R: Reporter + ?Sized> std::fmt::Debug for Installer<'_, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Installer").finish_non_exhaustive()
    }
}

impl<'a, R: Reporter + ?Sized> Installer<'a, R> {
    pub fn new(client: &'a Client, reporter: &'a R) -> Self {
        Self { client, reporter }
    }

    /// Fetch, verify, place and smoke-test the planned artifact.
    ///
    /// The first failure aborts the run and is reported before it is returned.
    pub async fn install(&self, plan: &InstallPlan) -> Result<InstalledBinary, InstallError> {
        let result = self.run(plan).await;
        if let Err(e) = &result {
            self.reporter.failed(e.stage(), &e.to_string());
        }
        result
    }

    async fn run(&self, plan: &InstallPlan) -> Result<InstalledBinary, InstallError> {
        let locator = plan.entry.locator.as_str();

        self.reporter
            .stage(Stage::Fetch, crate::filename_from_url(locator));
        let bytes = fetch(self.client, locator, self.reporter).await?;

        self.reporter.stage(Stage::Verify, plan.entry.digest.as_str());
        let digest = integrity::verify(&bytes, &plan.entry.digest)?;

        self.reporter
            .stage(Stage::Place, &plan.target.display().to_string());
        place(&bytes, &plan.target)?;

        self.reporter.stage(Stage::SmokeTest, &plan.smoke.args.join(" "));
        let version_output = plan.smoke.run(&plan.target).await?;

        info!(
            name = %plan.name,
            version = %plan.version,
            platform = %plan.platform,
            path = %plan.target.display(),
            "installed"
        );
        self.reporter.done(
            &plan.name,
            &plan.version,
            &plan.target.display().to_string(),
        );

        Ok(InstalledBinary {
            path: plan.target.clone(),
            digest,
            size: bytes.len() as u64,
            version_output,
        })
    }
}

/// Re-run the smoke test against an existing installation.
pub async fn verify_installed(plan: &InstallPlan) -> Result<String, InstallError> {
    plan.smoke.run(&plan.target).await
}
