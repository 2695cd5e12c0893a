//! Route command handler for computing paths between star systems.

use anyhow::{Context, Result};

use eemap_lib::{
    find_path, plan_route_focus, resolve_node, MapView, RouteStrategy, RouteSummary,
};

use crate::commands::MapContext;
use eemap_cli::output::{
    format_route_pair_text, format_route_text, OutputFormat, RoutePairReport,
};

/// Arguments for the route command.
#[derive(Debug, Clone)]
pub struct RouteCommandArgs {
    /// Starting system name.
    pub from: String,
    /// Destination system name.
    pub to: String,
    /// Single strategy to report instead of the shortest/safest pair.
    pub strategy: Option<RouteStrategy>,
    /// Emit the focused map view for drawing instead of path summaries.
    pub map: bool,
}

/// Handle the route subcommand.
pub fn handle_route_command(
    context: &MapContext,
    format: OutputFormat,
    args: &RouteCommandArgs,
) -> Result<()> {
    let starmap = context.load_starmap()?;

    if let Some(strategy) = args.strategy {
        let start = resolve_node(&starmap, &args.from)?;
        let goal = resolve_node(&starmap, &args.to)?;
        let path = find_path(&starmap, strategy, start, goal)?;
        let summary = RouteSummary::from_path(&starmap, &path);
        return format.print(&summary, format_route_text);
    }

    let focus = plan_route_focus(&starmap, &args.from, &args.to)?;

    if args.map {
        let view = MapView::from_focus(&focus);
        let json = serde_json::to_string_pretty(&view).context("failed to serialise map view")?;
        println!("{json}");
        return Ok(());
    }

    let report = RoutePairReport {
        shortest: RouteSummary::from_path(&starmap, &focus.shortest),
        safest: RouteSummary::from_path(&starmap, &focus.safest),
        constellations: focus.constellations.clone(),
    };
    format.print(&report, format_route_pair_text)
}
