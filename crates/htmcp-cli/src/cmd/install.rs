//! Install command

use std::path::{Path, PathBuf};

use anyhow::Result;
use htmcp_core::{InstallPlan, Installer};

use crate::ui::{ConsoleReporter, Output, theme::format_size};

/// Resolve, download, verify and install the binary for this machine.
pub async fn install(
    recipe: Option<&Path>,
    bin_dir: Option<PathBuf>,
    smoke_timeout: Option<u64>,
    dry_run: bool,
    output: &Output,
) -> Result<()> {
    let recipe = super::load_recipe(recipe)?;
    let bin_dir = super::bin_dir(bin_dir)?;

    let mut plan = InstallPlan::for_host(&recipe, &bin_dir)?;
    plan.smoke = plan.smoke.with_timeout(super::smoke_timeout(smoke_timeout));

    output.info(&format!(
        "{} {} for {}",
        plan.name, plan.version, plan.platform
    ));

    if !plan.entry.digest.is_valid() {
        output.warning(&format!(
            "Digest for {} is not a SHA256 ('{}'); run `htmcp-install recipe pin` on the recipe",
            plan.platform, plan.entry.digest
        ));
    }

    if dry_run {
        println!("url     {}", plan.entry.locator);
        println!("sha256  {}", plan.entry.digest);
        println!("target  {}", plan.target.display());
        println!("test    {} {}", plan.target.display(), plan.smoke.args.join(" "));
        output.info("Dry run, not installing.");
        return Ok(());
    }

    let client = reqwest::Client::new();
    let reporter = ConsoleReporter::new(output.clone());
    let installed = Installer::new(&client, &reporter).install(&plan).await?;

    output.info(&format!(
        "{} sha256:{}",
        format_size(installed.size),
        installed.digest
    ));
    if !output.is_quiet() {
        println!("{}", installed.version_output.trim());
    }

    Ok(())
}
