use std::env;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::debug;

use crate::error::{Error, Result};

/// Environment variable overriding the stage cache directory.
pub const CACHE_DIR_ENV: &str = "EEMAP_CACHE_DIR";

/// Environment variable overriding the database path.
pub const DATABASE_ENV: &str = "EEMAP_DATABASE";

/// Database location used when nothing else is configured.
pub const DEFAULT_DATABASE: &str = "db/ee_map.db";

/// Resolve the default cache location using platform-specific project directories.
pub fn default_cache_dir() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("com", "eemap", "eemap").ok_or(Error::CacheDirsUnavailable)?;
    Ok(dirs.cache_dir().to_path_buf())
}

/// Cache directory from an explicit path, then [`CACHE_DIR_ENV`], then the
/// platform default.
pub fn resolve_cache_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    let from_env = env::var_os(CACHE_DIR_ENV).map(PathBuf::from);
    resolve_cache_dir_from(explicit, from_env)
}

/// Database path from an explicit path, then [`DATABASE_ENV`], then
/// [`DEFAULT_DATABASE`].
pub fn resolve_database_path(explicit: Option<&Path>) -> PathBuf {
    let from_env = env::var_os(DATABASE_ENV).map(PathBuf::from);
    resolve_database_path_from(explicit, from_env)
}

fn resolve_cache_dir_from(explicit: Option<&Path>, from_env: Option<PathBuf>) -> Result<PathBuf> {
    let dir = match non_empty(explicit, from_env) {
        Some(dir) => dir,
        None => default_cache_dir()?,
    };
    debug!(path = %dir.display(), "resolved stage cache directory");
    Ok(dir)
}

fn resolve_database_path_from(explicit: Option<&Path>, from_env: Option<PathBuf>) -> PathBuf {
    let path = non_empty(explicit, from_env).unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE));
    debug!(path = %path.display(), "resolved database path");
    path
}

fn non_empty(explicit: Option<&Path>, from_env: Option<PathBuf>) -> Option<PathBuf> {
    let is_set = |path: &Path| !path.as_os_str().is_empty();
    explicit
        .filter(|path| is_set(*path))
        .map(Path::to_path_buf)
        .or_else(|| from_env.filter(|path| is_set(path.as_path())))
}
