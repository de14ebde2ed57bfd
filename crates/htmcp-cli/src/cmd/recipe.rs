//! Recipe authoring commands

use std::path::Path;

use anyhow::{Context, Result};
use htmcp_core::io::fetch::fetch;
use htmcp_core::{NullReporter, resolver};
use htmcp_schema::{PlatformKey, Recipe, Sha256Digest};
use toml_edit::{DocumentMut, value};

use crate::ui::Output;

/// Validate a recipe file
pub fn check(path: &Path, output: &Output) -> Result<()> {
    let recipe = Recipe::from_file(path)
        .with_context(|| format!("Failed to parse recipe {}", path.display()))?;

    output.success("Recipe is valid");
    println!("  Name: {}", recipe.package.name);
    println!("  Version: {}", recipe.release.version);
    println!("  Binary: {}", recipe.bin_name());
    for (key, entry) in resolver::resolve_all(&recipe.release) {
        println!("  {key}: {}", entry.locator);
    }

    let placeholders = recipe.placeholder_digests();
    if !placeholders.is_empty() {
        let keys: Vec<String> = placeholders.iter().map(ToString::to_string).collect();
        anyhow::bail!(
            "Placeholder digests for {}; run `htmcp-install recipe pin {}`",
            keys.join(", "),
            path.display()
        );
    }

    Ok(())
}

/// Download every artifact and record its digest in the recipe.
pub async fn pin(path: &Path, dry_run: bool, output: &Output) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read recipe {}", path.display()))?;
    let recipe = Recipe::parse(&content)
        .with_context(|| format!("Failed to parse recipe {}", path.display()))?;
    let mut doc: DocumentMut = content.parse().context("Failed to parse recipe TOML")?;

    let client = reqwest::Client::new();
    for (key, entry) in resolver::resolve_all(&recipe.release) {
        output.step(&format!("Downloading {}", entry.locator));
        let bytes = fetch(&client, &entry.locator, &NullReporter).await?;
        let digest = Sha256Digest::compute(&bytes);

        if digest.matches(&entry.digest) {
            output.success(&format!("{key}: unchanged"));
            continue;
        }
        output.info(&format!("{key}: {} -> {digest}", entry.digest));
        let row = row_key(&doc, key)
            .with_context(|| format!("No [release.artifacts] row for {key}"))?;
        set_digest(&mut doc, &row, digest.as_str());
    }

    if dry_run {
        print!("{doc}");
        output.info("Dry run, recipe not written.");
        return Ok(());
    }

    std::fs::write(path, doc.to_string())
        .with_context(|| format!("Failed to write recipe {}", path.display()))?;
    output.success(&format!("Pinned {}", path.display()));
    Ok(())
}

/// The key text of the artifact row for `key`, as spelled in the file
/// (`darwin-aarch64` as well as `macos-arm64`).
fn row_key(doc: &DocumentMut, key: PlatformKey) -> Option<String> {
    doc.get("release")?
        .get("artifacts")?
        .as_table_like()?
        .iter()
        .map(|(text, _)| text)
        .find(|text| text.parse::<PlatformKey>().is_ok_and(|k| k == key))
        .map(str::to_string)
}

/// Replace an artifact's `sha256`, keeping any comment on the same line.
fn set_digest(doc: &mut DocumentMut, key: &str, digest: &str) {
    let item = &mut doc["release"]["artifacts"][key]["sha256"];
    let decor = item.as_value().map(|v| v.decor().clone());
    *item = value(digest);
    if let (Some(decor), Some(v)) = (decor, item.as_value_mut()) {
        *v.decor_mut() = decor;
    }
}

/// Print the bundled recipe, as a starting point for a new release.
pub fn show() {
    print!("{}", crate::BUNDLED_RECIPE);
}
