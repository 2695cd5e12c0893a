//! Route planning over the starmap.
//!
//! This module provides:
//! - [`RouteStrategy`] - Supported path metrics (fewest hops, least risk, high-sec only)
//! - [`resolve_node`] - Case-insensitive system name resolution
//! - [`shortest_hops`] / [`safest_path`] - The two core path searches
//! - [`plan_route_focus`] - Both paths plus the constellation-focused working copy
//!
//! # Example
//!
//! ```ignore
//! use eemap_lib::{plan_route_focus, StarmapPipeline};
//!
//! let starmap = pipeline.load()?;
//! let focus = plan_route_focus(&starmap, "Jita", "Amarr")?;
//! println!("{} hops, {} constellations", focus.shortest.hop_count(), focus.constellations.len());
//! ```

mod planner;

pub use planner::{select_planner, HighSecPlanner, RoutePlanner, SafestPlanner, ShortestPlanner};

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::partition::retain_constellations;
use crate::path::{path_cost, path_edges, path_risk, visited_constellations};
use crate::starmap::{Starmap, SystemId};

/// Number of fuzzy suggestions attached to unknown system errors.
const SUGGESTION_LIMIT: usize = 3;

/// Supported path metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RouteStrategy {
    /// Fewest hops (breadth-first search).
    Shortest,
    /// Least cumulative risk cost (Dijkstra).
    #[default]
    Safest,
    /// Least cumulative high-sec only cost (Dijkstra).
    #[serde(rename = "highsec")]
    HighSecOnly,
}

impl RouteStrategy {
    pub const ALL: [RouteStrategy; 3] = [
        RouteStrategy::Shortest,
        RouteStrategy::Safest,
        RouteStrategy::HighSecOnly,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RouteStrategy::Shortest => "shortest",
            RouteStrategy::Safest => "safest",
            RouteStrategy::HighSecOnly => "highsec",
        }
    }
}

impl fmt::Display for RouteStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RouteStrategy {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        RouteStrategy::ALL
            .into_iter()
            .find(|strategy| strategy.name().eq_ignore_ascii_case(value))
            .ok_or_else(|| {
                format!("unknown route strategy '{value}' (expected shortest, safest or highsec)")
            })
    }
}

/// How duplicate system names are handled during resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameResolution {
    /// The first system in insertion order wins.
    #[default]
    FirstMatch,
    /// Duplicate names are an error.
    Strict,
}

/// A path found by one of the route strategies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemPath {
    pub strategy: RouteStrategy,
    pub systems: Vec<SystemId>,
    /// Cumulative `risk_cost`, using the cheapest parallel edge per hop.
    pub risk: f64,
    /// Cumulative weight of the strategy that found the path: hops, risk or
    /// high-sec cost.
    pub cost: f64,
}

impl SystemPath {
    /// Number of hops in the path.
    pub fn hop_count(&self) -> usize {
        self.systems.len().saturating_sub(1)
    }

    /// Consecutive system pairs along the path.
    pub fn edges(&self) -> Vec<(SystemId, SystemId)> {
        path_edges(&self.systems)
    }
}

/// Resolve a display name to a system id, case-insensitively. The first
/// matching system in insertion order wins.
pub fn resolve_node(starmap: &Starmap, name: &str) -> Result<SystemId> {
    resolve_node_with(starmap, name, NameResolution::FirstMatch)
}

/// Resolve a display name with an explicit duplicate-name policy.
pub fn resolve_node_with(starmap: &Starmap, name: &str, mode: NameResolution) -> Result<SystemId> {
    let needle = name.to_lowercase();
    let mut matches = starmap
        .systems()
        .filter(|node| node.name().to_lowercase() == needle)
        .map(|node| node.id());

    let Some(first) = matches.next() else {
        return Err(Error::UnknownSystem {
            name: name.to_string(),
            suggestions: starmap.fuzzy_system_matches(name, SUGGESTION_LIMIT),
        });
    };

    if mode == NameResolution::Strict {
        let mut candidates = vec![first];
        candidates.extend(matches);
        if candidates.len() > 1 {
            return Err(Error::AmbiguousSystem {
                name: name.to_string(),
                candidates,
            });
        }
    }

    Ok(first)
}

/// Compute a path between two system ids with the given strategy.
pub fn find_path(
    starmap: &Starmap,
    strategy: RouteStrategy,
    start: SystemId,
    goal: SystemId,
) -> Result<SystemPath> {
    for id in [start, goal] {
        if !starmap.contains(id) {
            return Err(Error::UnknownSystemId { id });
        }
    }

    info!(start, goal, strategy = %strategy, "searching route");
    let planner = select_planner(strategy);
    let Some(systems) = planner.find_path(starmap, start, goal) else {
        return Err(Error::RouteNotFound {
            start: display_name(starmap, start),
            goal: display_name(starmap, goal),
        });
    };

    let risk = path_risk(starmap, &systems).unwrap_or(f64::INFINITY);
    let cost = path_cost(starmap, &systems, |edge| planner.edge_weight(edge))
        .unwrap_or(f64::INFINITY);
    debug!(hops = systems.len().saturating_sub(1), risk, cost, "route found");
    Ok(SystemPath {
        strategy,
        systems,
        risk,
        cost,
    })
}

/// Fewest-hop path.
pub fn shortest_hops(starmap: &Starmap, start: SystemId, goal: SystemId) -> Result<SystemPath> {
    find_path(starmap, RouteStrategy::Shortest, start, goal)
}

/// Minimum cumulative risk path.
pub fn safest_path(starmap: &Starmap, start: SystemId, goal: SystemId) -> Result<SystemPath> {
    find_path(starmap, RouteStrategy::Safest, start, goal)
}

/// Path that avoids anything below high-sec whenever possible.
pub fn highsec_path(starmap: &Starmap, start: SystemId, goal: SystemId) -> Result<SystemPath> {
    find_path(starmap, RouteStrategy::HighSecOnly, start, goal)
}

/// Both paths between two named systems and the map focused on them.
#[derive(Debug, Clone)]
pub struct RouteFocus {
    pub start: SystemId,
    pub goal: SystemId,
    pub shortest: SystemPath,
    pub safest: SystemPath,
    /// Union of constellations visited by either path, shortest path first.
    pub constellations: Vec<String>,
    /// Working copy restricted to `constellations`.
    pub focus: Starmap,
}

/// Resolve both names, compute the shortest and safest paths, and extract the
/// constellations they touch into a fresh working copy.
pub fn plan_route_focus(starmap: &Starmap, start_name: &str, goal_name: &str) -> Result<RouteFocus> {
    let start = resolve_node(starmap, start_name)?;
    let goal = resolve_node(starmap, goal_name)?;

    let shortest = shortest_hops(starmap, start, goal)?;
    let safest = safest_path(starmap, start, goal)?;

    let mut constellations = visited_constellations(starmap, &shortest.systems);
    let mut seen: BTreeSet<String> = constellations.iter().cloned().collect();
    for constellation in visited_constellations(starmap, &safest.systems) {
        if seen.insert(constellation.clone()) {
            constellations.push(constellation);
        }
    }
    debug!(count = constellations.len(), "collected constellations on paths");

    let focus = retain_constellations(starmap, &constellations);
    Ok(RouteFocus {
        start,
        goal,
        shortest,
        safest,
        constellations,
        focus,
    })
}

fn display_name(starmap: &Starmap, id: SystemId) -> String {
    starmap
        .system_name(id)
        .map(str::to_string)
        .unwrap_or_else(|| id.to_string())
}
