//! Atomic placement of a verified binary.
//!
//! Bytes go to a temp file in the destination directory, get the executable
//! bit, and are renamed over the target. Readers of the target path see
//! either the previous file or the complete new one. On any error the temp
//! file is dropped, which deletes it.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::error::InstallError;

/// Mode for installed executables: rwx for the owner, rx for group/other.
pub const EXECUTABLE_MODE: u32 = 0o755;

const TEMP_PREFIX: &str = ".htmcp-";
const TEMP_SUFFIX: &str = ".part";

/// Atomically install `bytes` at `target` as an executable.
pub fn place(bytes: &[u8], target: &Path) -> Result<(), InstallError> {
    place_with(target, |file| file.write_all(bytes))
}

/// Like [`place`], with the content produced by `write`.
///
/// If `write` fails, the target is left untouched.
pub fn place_with<F>(target: &Path, write: F) -> Result<(), InstallError>
where
    F: FnOnce(&mut File) -> std::io::Result<()>,
{
    let dir = target.parent().ok_or_else(|| {
        InstallError::permission(
            target,
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "target has no parent directory",
            ),
        )
    })?;
    std::fs::create_dir_all(dir).map_err(|e| InstallError::permission(dir, e))?;

    // Same directory as the target, so the final rename never crosses a mount.
    let mut tmp = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(TEMP_SUFFIX)
        .tempfile_in(dir)
        .map_err(|e| InstallError::permission(dir, e))?;

    write(tmp.as_file_mut()).map_err(|e| InstallError::permission(tmp.path(), e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| InstallError::permission(tmp.path(), e))?;

    set_executable(tmp.path())?;

    // Close the handle before the rename so nothing holds the binary open for
    // writing when it is executed.
    let tmp_path = tmp.into_temp_path();
    tmp_path
        .persist(target)
        .map_err(|e| InstallError::permission(target, e.error))?;

    debug!(target = %target.display(), "placed binary");
    Ok(())
}

#[cfg(unix)]
fn set_executable(path: &Path) -> Result<(), InstallError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(EXECUTABLE_MODE))
        .map_err(|e| InstallError::permission(path, e))
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> Result<(), InstallError> {
    Ok(())
}
