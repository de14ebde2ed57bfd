//! Shared recipe types for the ht-mcp installer.

pub mod arch;
pub mod hash;
pub mod recipe;

// Re-exports
pub use arch::*;
pub use hash::*;
pub use recipe::{
    ArtifactEntry, ArtifactSpec, InstallSpec, Recipe, RecipeError, RecipeInfo, ReleaseDescriptor,
    SmokeTestSpec,
};
