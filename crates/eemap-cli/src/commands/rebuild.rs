use anyhow::{Context, Result};
use tracing::info;

use eemap_lib::{FileStageCache, Stage};

use crate::commands::MapContext;
use eemap_cli::output::{format_rebuild_text, OutputFormat, RebuildReport};

/// Force the pipeline to run from `from`, optionally discarding every cached
/// stage first.
pub fn handle_rebuild_command(
    context: &MapContext,
    format: OutputFormat,
    from: Stage,
    clear: bool,
) -> Result<()> {
    if clear {
        FileStageCache::new(&context.cache_dir)
            .clear()
            .context("failed to clear cached stages")?;
        info!(cache_dir = %context.cache_dir.display(), "cleared cached stages");
    }

    let starmap = context
        .pipeline()?
        .run_from(from)
        .with_context(|| format!("failed to rebuild starmap from stage {from}"))?;

    let report = RebuildReport {
        from,
        systems: starmap.node_count(),
        edges: starmap.edge_count(),
        cache_dir: context.cache_dir.display().to_string(),
    };
    format.print(&report, format_rebuild_text)
}
