//! Route planning strategies implementing the Strategy pattern.
//!
//! Each [`RouteStrategy`] is backed by a [`RoutePlanner`] so new path modes
//! (for example an economic weight built on edge production metrics) can be
//! added without touching the orchestration in [`super::find_path`].

use crate::path::{find_route_bfs, find_route_dijkstra};
use crate::starmap::{Edge, Starmap, SystemId};

use super::RouteStrategy;

/// Trait for route planning strategies.
pub trait RoutePlanner: Send + Sync {
    /// The strategy identifier for this planner.
    fn strategy(&self) -> RouteStrategy;

    /// Execute the search. Returns `None` if `goal` is unreachable.
    fn find_path(&self, starmap: &Starmap, start: SystemId, goal: SystemId)
        -> Option<Vec<SystemId>>;

    /// Weight this planner minimises, used to report the cost of a path.
    fn edge_weight(&self, edge: &Edge) -> f64;
}

/// Fewest-hop planner. Every edge costs one hop regardless of security.
#[derive(Debug, Clone, Default)]
pub struct ShortestPlanner;

impl RoutePlanner for ShortestPlanner {
    fn strategy(&self) -> RouteStrategy {
        RouteStrategy::Shortest
    }

    fn find_path(
        &self,
        starmap: &Starmap,
        start: SystemId,
        goal: SystemId,
    ) -> Option<Vec<SystemId>> {
        find_route_bfs(starmap, start, goal)
    }

    fn edge_weight(&self, edge: &Edge) -> f64 {
        f64::from(edge.hop_cost)
    }
}

/// Minimum cumulative risk planner.
#[derive(Debug, Clone, Default)]
pub struct SafestPlanner;

impl RoutePlanner for SafestPlanner {
    fn strategy(&self) -> RouteStrategy {
        RouteStrategy::Safest
    }

    fn find_path(
        &self,
        starmap: &Starmap,
        start: SystemId,
        goal: SystemId,
    ) -> Option<Vec<SystemId>> {
        find_route_dijkstra(starmap, start, goal, |edge| self.edge_weight(edge))
    }

    fn edge_weight(&self, edge: &Edge) -> f64 {
        edge.risk_cost
    }
}

/// Planner that treats low-sec as dangerous as nul-sec.
#[derive(Debug, Clone, Default)]
pub struct HighSecPlanner;

impl RoutePlanner for HighSecPlanner {
    fn strategy(&self) -> RouteStrategy {
        RouteStrategy::HighSecOnly
    }

    fn find_path(
        &self,
        starmap: &Starmap,
        start: SystemId,
        goal: SystemId,
    ) -> Option<Vec<SystemId>> {
        find_route_dijkstra(starmap, start, goal, |edge| self.edge_weight(edge))
    }

    fn edge_weight(&self, edge: &Edge) -> f64 {
        edge.highsec_cost
    }
}

/// Select the planner for a strategy.
pub fn select_planner(strategy: RouteStrategy) -> Box<dyn RoutePlanner> {
    match strategy {
        RouteStrategy::Shortest => Box::new(ShortestPlanner),
        RouteStrategy::Safest => Box::new(SafestPlanner),
        RouteStrategy::HighSecOnly => Box::new(HighSecPlanner),
    }
}
