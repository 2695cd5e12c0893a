//! Output formatting for command results.
//!
//! Every command builds a serialisable report. JSON output prints the report
//! as-is; text output goes through one of the `format_*` functions below.

use std::fmt::Write;

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

use eemap_lib::output::RouteStep;
use eemap_lib::{RouteSummary, SecurityTier, Stage, StarmapStats, SystemId};

use crate::terminal::{format_with_separators, ColorPalette};

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

impl OutputFormat {
    /// Print a report to stdout in this format.
    pub fn print<T, F>(self, report: &T, render_text: F) -> Result<()>
    where
        T: Serialize,
        F: FnOnce(&T, &ColorPalette) -> String,
    {
        match self {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
            OutputFormat::Text => print!("{}", render_text(report, &ColorPalette::detect())),
        }
        Ok(())
    }
}

/// Shortest and safest paths between two systems.
#[derive(Debug, Clone, Serialize)]
pub struct RoutePairReport {
    pub shortest: RouteSummary,
    pub safest: RouteSummary,
    pub constellations: Vec<String>,
}

/// One system listed in a partition report.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PartitionSystem {
    pub id: SystemId,
    pub name: String,
    pub constellation: String,
    pub security: f64,
    pub tier: SecurityTier,
}

/// Contents of a region or constellation partition.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PartitionReport {
    pub kind: &'static str,
    pub name: String,
    pub edges: usize,
    pub systems: Vec<PartitionSystem>,
}

/// Distinct region or constellation name with its system count.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NameCount {
    pub name: String,
    pub systems: usize,
}

/// Cross-region link count for one region.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RegionLinks {
    pub region: String,
    pub links: usize,
}

/// Whole-map diagnostics.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StatsReport {
    #[serde(flatten)]
    pub stats: StarmapStats,
    pub longest_shortest_path: usize,
    pub cross_region_link_counts: Vec<RegionLinks>,
}

/// Result of a forced pipeline run.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RebuildReport {
    pub from: Stage,
    pub systems: usize,
    pub edges: usize,
    pub cache_dir: String,
}

fn format_step(buffer: &mut String, step: &RouteStep, palette: &ColorPalette) {
    let name = step.name.as_deref().unwrap_or("<unknown>");
    let (color, tier) = match step.tier {
        Some(tier) => (palette.tier(tier), tier.label()),
        None => ("", "?"),
    };
    let constellation = step.constellation.as_deref().unwrap_or("-");
    let _ = writeln!(
        buffer,
        "{:>3}. {}{}{} {}({}){} {}[{}]{} {}",
        step.index,
        palette.white_bold,
        name,
        palette.reset,
        palette.gray,
        step.id,
        palette.reset,
        color,
        tier,
        palette.reset,
        constellation
    );
}

/// Render one path summary.
pub fn format_route_text(summary: &RouteSummary, palette: &ColorPalette) -> String {
    let mut buffer = String::new();
    let start = summary
        .steps
        .first()
        .and_then(|step| step.name.as_deref())
        .unwrap_or("<unknown>");
    let goal = summary
        .steps
        .last()
        .and_then(|step| step.name.as_deref())
        .unwrap_or("<unknown>");
    let _ = writeln!(
        buffer,
        "{}{} path{} from {} to {} ({} jumps, risk {}):",
        palette.cyan,
        capitalize(summary.strategy.name()),
        palette.reset,
        start,
        goal,
        summary.hops,
        format_risk(summary.risk)
    );
    for step in &summary.steps {
        format_step(&mut buffer, step, palette);
    }
    buffer
}

/// Render both paths and the constellations they cross.
pub fn format_route_pair_text(report: &RoutePairReport, palette: &ColorPalette) -> String {
    let mut buffer = format_route_text(&report.shortest, palette);
    buffer.push('\n');
    buffer.push_str(&format_route_text(&report.safest, palette));
    let _ = writeln!(
        buffer,
        "\nConstellations on paths: {}",
        report.constellations.join(", ")
    );
    buffer
}

pub fn format_partition_text(report: &PartitionReport, palette: &ColorPalette) -> String {
    let mut buffer = String::new();
    let _ = writeln!(
        buffer,
        "{}{} {}{}: {} systems, {} edges",
        palette.cyan,
        capitalize(report.kind),
        report.name,
        palette.reset,
        report.systems.len(),
        report.edges
    );
    for system in &report.systems {
        let _ = writeln!(
            buffer,
            "- {}{}{} {}({}){} {}{:.2}{} {}",
            palette.white_bold,
            system.name,
            palette.reset,
            palette.gray,
            system.id,
            palette.reset,
            palette.tier(system.tier),
            system.security,
            palette.reset,
            system.constellation
        );
    }
    buffer
}

pub fn format_names_text(names: &[NameCount], _palette: &ColorPalette) -> String {
    let mut buffer = String::new();
    for entry in names {
        let _ = writeln!(buffer, "{} ({} systems)", entry.name, entry.systems);
    }
    buffer
}

pub fn format_stats_text(report: &StatsReport, palette: &ColorPalette) -> String {
    let stats = &report.stats;
    let mut buffer = String::new();
    let _ = writeln!(buffer, "{}Starmap statistics{}", palette.cyan, palette.reset);
    let _ = writeln!(buffer, "Systems:        {}", stats.systems);
    let _ = writeln!(buffer, "Edges:          {}", stats.edges);
    let _ = writeln!(buffer, "Regions:        {}", stats.regions);
    let _ = writeln!(buffer, "Constellations: {}", stats.constellations);
    let _ = writeln!(
        buffer,
        "Security:       {}{} high{}, {}{} low{}, {}{} nul{}",
        palette.green,
        stats.highsec_systems,
        palette.reset,
        palette.orange,
        stats.lowsec_systems,
        palette.reset,
        palette.red,
        stats.nulsec_systems,
        palette.reset
    );
    let _ = writeln!(
        buffer,
        "Longest path:   {} jumps",
        report.longest_shortest_path
    );
    let _ = writeln!(
        buffer,
        "Cross-region links: {}",
        stats.cross_region_links
    );
    for entry in &report.cross_region_link_counts {
        let _ = writeln!(buffer, "  {}: {}", entry.region, entry.links);
    }
    buffer
}

pub fn format_rebuild_text(report: &RebuildReport, _palette: &ColorPalette) -> String {
    format!(
        "Rebuilt starmap from stage {}: {} systems, {} edges (cache: {})\n",
        report.from, report.systems, report.edges, report.cache_dir
    )
}

fn format_risk(risk: f64) -> String {
    if risk.is_finite() && risk >= 0.0 && risk.fract() == 0.0 && risk < u64::MAX as f64 {
        format_with_separators(risk as u64)
    } else {
        format!("{risk}")
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
