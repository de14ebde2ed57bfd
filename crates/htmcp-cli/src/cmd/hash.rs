//! Hash command

use anyhow::{Context, Result};
use htmcp_schema::Sha256Digest;
use std::path::PathBuf;

/// Compute SHA256 hash of files
pub fn hash(files: &[PathBuf]) -> Result<()> {
    for file in files {
        let hash = Sha256Digest::compute_file(file)
            .with_context(|| format!("Failed to hash {}", file.display()))?;
        println!("{} {}", hash, file.display());
    }
    Ok(())
}
