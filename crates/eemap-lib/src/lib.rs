//! Starmap graph engine entry points.
//!
//! This crate reads the starmap from its relational store, builds a directed
//! multigraph weighted by system security, caches the graph after every build
//! stage, and answers route and partition queries. Higher-level consumers
//! (the CLI, visualisation tools) should only depend on the functions exported
//! here instead of reimplementing behavior.
//!

#![deny(warnings)]

pub mod analysis;
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod graph;
pub mod output;
pub mod partition;
pub mod path;
pub mod pipeline;
pub mod production;
pub mod routing;
pub mod security;
pub mod starmap;

#[cfg(test)]
mod test_helpers;

pub use analysis::{
    cross_region_link_counts, cross_region_links, longest_shortest_path, CrossRegionLink,
    StarmapStats,
};
pub use cache::{FileStageCache, MemoryStageCache, Stage, StageCache};
pub use config::{default_cache_dir, resolve_cache_dir, resolve_database_path};
pub use db::{NeighborRow, ProductionRow, SqliteSource, StarmapSource, SystemRow};
pub use error::{Error, Result};
pub use graph::{build_from_source, build_starmap};
pub use output::{MapView, RouteRenderMode, RouteSummary};
pub use partition::{
    all_constellations, all_regions, constellation_partitions, induced_subgraph,
    nodes_of_constellation, nodes_of_region, prune_isolated, region_partitions,
    retain_constellations,
};
pub use path::{path_edges, path_risk, visited_constellations};
pub use pipeline::StarmapPipeline;
pub use production::{
    aggregate_production, attach_production, derive_edge_production, edge_production_metric,
};
pub use routing::{
    find_path, highsec_path, plan_route_focus, resolve_node, resolve_node_with, safest_path,
    shortest_hops, NameResolution, RouteFocus, RouteStrategy, SystemPath,
};
pub use security::SecurityTier;
pub use starmap::{Edge, NodeProduction, PlanetOutput, Starmap, SystemId, SystemNode};
