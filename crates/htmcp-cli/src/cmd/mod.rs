//! Subcommand implementations.

pub mod completions;
pub mod hash;
pub mod install;
pub mod recipe;
pub mod resolve;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use htmcp_schema::Recipe;

/// Load `path`, or the bundled recipe when no path is given.
pub(crate) fn load_recipe(path: Option<&Path>) -> Result<Recipe> {
    match path {
        Some(path) => Recipe::from_file(path)
            .with_context(|| format!("Failed to load recipe {}", path.display())),
        None => Recipe::parse(crate::BUNDLED_RECIPE).context("Bundled recipe is invalid"),
    }
}

/// Explicit bin directory, or `~/.htmcp/bin`.
pub(crate) fn bin_dir(arg: Option<PathBuf>) -> Result<PathBuf> {
    match arg {
        Some(dir) => Ok(dir),
        None => htmcp_core::try_bin_path()
            .context("Could not determine home directory. Pass --bin-dir or set HTMCP_HOME."),
    }
}

pub(crate) fn smoke_timeout(secs: Option<u64>) -> Option<Duration> {
    secs.map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_recipe_parses() {
        let recipe = load_recipe(None).unwrap();
        assert_eq!(recipe.package.name, "ht-mcp");
        assert_eq!(recipe.bin_name(), "ht-mcp");
        assert_eq!(recipe.release.platforms().count(), 3);
    }

    #[test]
    fn test_explicit_bin_dir_wins() {
        let dir = PathBuf::from("/opt/tools/bin");
        assert_eq!(bin_dir(Some(dir.clone())).unwrap(), dir);
    }

    #[test]
    fn test_missing_recipe_file_has_context() {
        let err = load_recipe(Some(Path::new("/nonexistent/recipe.toml"))).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/recipe.toml"));
    }
}
