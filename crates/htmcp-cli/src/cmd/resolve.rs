//! Resolve command

use std::path::Path;

use anyhow::Result;
use htmcp_core::resolver;
use htmcp_schema::{ArtifactEntry, PlatformKey};

use crate::ui::Output;

/// Print the artifact for the host, an explicit platform, or every platform.
pub fn resolve(
    recipe: Option<&Path>,
    os: Option<&str>,
    arch: Option<&str>,
    all: bool,
    output: &Output,
) -> Result<()> {
    let recipe = super::load_recipe(recipe)?;

    let rows = if all {
        resolver::resolve_all(&recipe.release)
    } else {
        let row = match (os, arch) {
            (Some(os), Some(arch)) => resolver::resolve(&recipe.release, os, arch)?,
            _ => resolver::resolve_host(&recipe.release)?,
        };
        vec![row]
    };

    for (key, entry) in &rows {
        println!("{}", format_row(*key, entry));
        if !entry.digest.is_valid() {
            output.warning(&format!("{key}: digest is a placeholder"));
        }
    }

    Ok(())
}

fn format_row(key: PlatformKey, entry: &ArtifactEntry) -> String {
    format!("{:<14} {} {}", key.to_string(), entry.locator, entry.digest)
}
