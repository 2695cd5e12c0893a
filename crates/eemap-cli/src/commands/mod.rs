// Module exports for CLI subcommands
//
// Each module handles a specific CLI subcommand. main.rs dispatches to these
// handlers, keeping the entry point focused on parsing and coordination.

pub mod partition;
pub mod rebuild;
pub mod route;
pub mod stats;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use eemap_lib::{
    resolve_cache_dir, resolve_database_path, FileStageCache, SqliteSource, Starmap,
    StarmapPipeline,
};

/// Database and cache locations shared by every command.
#[derive(Debug, Clone)]
pub struct MapContext {
    pub database: PathBuf,
    pub cache_dir: PathBuf,
}

impl MapContext {
    /// Resolve locations from flags, environment and platform defaults.
    pub fn resolve(database: Option<&Path>, cache_dir: Option<&Path>) -> Result<Self> {
        let database = resolve_database_path(database);
        let cache_dir =
            resolve_cache_dir(cache_dir).context("failed to resolve the stage cache directory")?;
        debug!(
            database = %database.display(),
            cache_dir = %cache_dir.display(),
            "resolved starmap locations"
        );
        Ok(Self {
            database,
            cache_dir,
        })
    }

    pub fn pipeline(&self) -> Result<StarmapPipeline<SqliteSource, FileStageCache>> {
        let source = SqliteSource::open(&self.database).with_context(|| {
            format!(
                "failed to open starmap database at {}",
                self.database.display()
            )
        })?;
        Ok(StarmapPipeline::new(
            source,
            FileStageCache::new(&self.cache_dir),
        ))
    }

    /// Load the standard starmap, reusing cached stages when complete.
    pub fn load_starmap(&self) -> Result<Starmap> {
        self.pipeline()?
            .load()
            .with_context(|| format!("failed to build starmap from {}", self.database.display()))
    }
}
