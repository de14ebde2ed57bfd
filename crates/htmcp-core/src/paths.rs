use dirs::home_dir;
use std::path::PathBuf;

/// Returns the installer home directory, or None if the user's home cannot be resolved.
///
/// `HTMCP_HOME` overrides the default `~/.htmcp`.
pub fn try_htmcp_home() -> Option<PathBuf> {
    if let Ok(val) = std::env::var("HTMCP_HOME") {
        return Some(PathBuf::from(val));
    }
    home_dir().map(|h| h.join(".htmcp"))
}

/// Default binary installation target: ~/.htmcp/bin
pub fn try_bin_path() -> Option<PathBuf> {
    try_htmcp_home().map(|h| h.join("bin"))
}

/// Extract the filename from a URL.
pub fn filename_from_url(url: &str) -> &str {
    url.split('/').next_back().unwrap_or("")
}
