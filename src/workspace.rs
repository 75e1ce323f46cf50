//! Container configuration directory setup.
//!
//! buildah reads registry configuration from `~/.config/containers`. The
//! directory is created before any step runs and, when the registriesconfig
//! setting is present, `registries.conf` is written into it.

use crate::error::WorkspaceError;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Directory below the home directory holding container tool configuration
pub const CONTAINERS_DIR: &str = ".config/containers";

/// Registry configuration file name
pub const REGISTRIES_CONF: &str = "registries.conf";

/// Home directory of the current user
pub fn home_dir() -> Result<PathBuf, WorkspaceError> {
    dirs::home_dir().ok_or(WorkspaceError::HomeNotFound)
}

/// `<home>/.config/containers`
pub fn containers_dir(home: &Path) -> PathBuf {
    home.join(CONTAINERS_DIR)
}

/// Create the containers directory and optionally write `registries.conf`.
///
/// The directory is created owner-only (0700). An existing `registries.conf`
/// is replaced and its permissions reset to 0600.
///
/// # Returns
///
/// * `Ok(Some(path))` - Path of the written registries.conf
/// * `Ok(None)` - No registry configuration was supplied
/// * `Err` - Directory creation or file write failed
pub fn prepare(
    home: &Path,
    registries_config: Option<&str>,
) -> Result<Option<PathBuf>, WorkspaceError> {
    let dir = containers_dir(home);
    create_private_dir(&dir).map_err(|source| WorkspaceError::CreateDir {
        path: dir.clone(),
        source,
    })?;
    log::debug!("containers config directory ready at {}", dir.display());

    let Some(content) = registries_config else {
        return Ok(None);
    };

    let path = dir.join(REGISTRIES_CONF);
    write_private_file(&path, content.as_bytes()).map_err(|source| {
        WorkspaceError::WriteConfig {
            path: path.clone(),
            source,
        }
    })?;
    log::info!("wrote registry configuration to {}", path.display());

    Ok(Some(path))
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    fs::DirBuilder::new().recursive(true).mode(0o700).create(dir)
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dir)
}

#[cfg(unix)]
fn write_private_file(path: &Path, content: &[u8]) -> std::io::Result<()> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // mode() only applies on creation
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    file.write_all(content)?;
    file.sync_all()
}

#[cfg(not(unix))]
fn write_private_file(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(content)?;
    file.sync_all()
}
