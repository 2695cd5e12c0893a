use anyhow::Result;

use eemap_lib::{cross_region_link_counts, longest_shortest_path, StarmapStats};

use crate::commands::MapContext;
use eemap_cli::output::{format_stats_text, OutputFormat, RegionLinks, StatsReport};

/// Print whole-map diagnostics for the standard starmap.
pub fn handle_stats_command(context: &MapContext, format: OutputFormat) -> Result<()> {
    let starmap = context.load_starmap()?;
    let report = StatsReport {
        stats: StarmapStats::collect(&starmap),
        longest_shortest_path: longest_shortest_path(&starmap),
        cross_region_link_counts: cross_region_link_counts(&starmap)
            .into_iter()
            .map(|(region, links)| RegionLinks { region, links })
            .collect(),
    };
    format.print(&report, format_stats_text)
}
