//! Whole-map diagnostics.

use std::collections::HashMap;

use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::partition::{all_constellations, all_regions};
use crate::path::hop_distances;
use crate::security::SecurityTier;
use crate::starmap::{Starmap, SystemId, SystemNode};

/// Longest fewest-hop distance between any two connected systems.
///
/// Runs a breadth-first search from every system. Unreachable pairs are
/// ignored; an empty or edgeless map yields zero.
pub fn longest_shortest_path(starmap: &Starmap) -> usize {
    let ids: Vec<SystemId> = starmap.systems().map(SystemNode::id).collect();
    let longest = ids
        .par_iter()
        .map(|&id| {
            hop_distances(starmap, id)
                .into_values()
                .max()
                .unwrap_or(0)
        })
        .max()
        .unwrap_or(0);
    debug!(jumps = longest, "found longest shortest path");
    longest
}

/// Edge whose endpoints lie in different regions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrossRegionLink {
    pub source: SystemId,
    pub source_region: String,
    pub target: SystemId,
    pub target_region: String,
}

/// Every cross-region edge, ordered by source region then edge insertion.
pub fn cross_region_links(starmap: &Starmap) -> Vec<CrossRegionLink> {
    let mut links: Vec<CrossRegionLink> = starmap
        .edges()
        .iter()
        .filter_map(|edge| {
            let source = starmap.system(edge.source)?;
            let target = starmap.system(edge.target)?;
            (source.region() != target.region()).then(|| CrossRegionLink {
                source: source.id(),
                source_region: source.region().to_string(),
                target: target.id(),
                target_region: target.region().to_string(),
            })
        })
        .collect();
    links.sort_by(|a, b| a.source_region.cmp(&b.source_region));
    links
}

/// Outgoing cross-region links per region, ascending by count then name.
/// Regions without such links are omitted.
pub fn cross_region_link_counts(starmap: &Starmap) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for link in cross_region_links(starmap) {
        *counts.entry(link.source_region).or_insert(0) += 1;
    }
    let mut counts: Vec<(String, usize)> = counts.into_iter().collect();
    counts.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

/// Summary counts for a starmap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StarmapStats {
    pub systems: usize,
    pub edges: usize,
    pub regions: usize,
    pub constellations: usize,
    pub nulsec_systems: usize,
    pub lowsec_systems: usize,
    pub highsec_systems: usize,
    pub cross_region_links: usize,
}

impl StarmapStats {
    pub fn collect(starmap: &Starmap) -> Self {
        let mut stats = Self {
            systems: starmap.node_count(),
            edges: starmap.edge_count(),
            regions: all_regions(starmap).len(),
            constellations: all_constellations(starmap).len(),
            cross_region_links: cross_region_links(starmap).len(),
            ..Self::default()
        };
        for node in starmap.systems() {
            match node.tier() {
                SecurityTier::NulSec => stats.nulsec_systems += 1,
                SecurityTier::LowSec => stats.lowsec_systems += 1,
                SecurityTier::HighSec => stats.highsec_systems += 1,
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{triangle_starmap, StarmapBuilder};

    fn two_regions() -> Starmap {
        StarmapBuilder::new()
            .system(1, "A", "C1", "North", 0.9)
            .system(2, "B", "C1", "North", 0.9)
            .system(3, "C", "C2", "South", 0.3)
            .system(4, "D", "C3", "West", 0.0)
            .edge(1, 2, 0.9)
            .edge(2, 3, 0.3)
            .edge(3, 2, 0.3)
            .edge(3, 4, 0.0)
            .edge(1, 3, 0.3)
            .build()
    }

    #[test]
    fn longest_path_counts_directed_hops() {
        assert_eq!(longest_shortest_path(&two_regions()), 2);
        assert_eq!(longest_shortest_path(&triangle_starmap()), 1);
        assert_eq!(longest_shortest_path(&Starmap::new()), 0);
    }

    #[test]
    fn cross_region_links_are_grouped_by_source_region() {
        let starmap = two_regions();
        let links = cross_region_links(&starmap);
        let pairs: Vec<(SystemId, SystemId)> =
            links.iter().map(|l| (l.source, l.target)).collect();
        assert_eq!(pairs, vec![(2, 3), (1, 3), (3, 2), (3, 4)]);

        assert_eq!(
            cross_region_link_counts(&starmap),
            vec![("North".to_string(), 2), ("South".to_string(), 2)]
        );
    }

    #[test]
    fn stats_cover_tiers_and_partitions() {
        let stats = StarmapStats::collect(&two_regions());
        assert_eq!(stats.systems, 4);
        assert_eq!(stats.edges, 5);
        assert_eq!(stats.regions, 3);
        assert_eq!(stats.constellations, 3);
        assert_eq!(stats.highsec_systems, 2);
        assert_eq!(stats.lowsec_systems, 1);
        assert_eq!(stats.nulsec_systems, 1);
        assert_eq!(stats.cross_region_links, 4);
    }
}
