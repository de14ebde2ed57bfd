pub mod error;
pub mod install;
pub mod integrity;
pub mod io;
pub mod paths;
pub mod reporter;
pub mod resolver;
pub mod smoke;

pub use error::{InstallError, Stage};
pub use install::{InstallPlan, InstalledBinary, Installer, verify_installed};
pub use paths::*;
pub use reporter::{NullReporter, Reporter};
pub use smoke::SmokeTest;

/// User Agent string for artifact downloads
pub const USER_AGENT: &str = concat!("htmcp-core/", env!("CARGO_PKG_VERSION"));
