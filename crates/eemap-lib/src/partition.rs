use std::collections::{BTreeSet, HashSet};

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::starmap::{Starmap, SystemId, SystemNode};

/// Copy the subgraph induced by `ids`.
///
/// Every listed system is copied with its attributes, and every edge whose
/// endpoints are both listed is copied with its key, so parallel edges survive.
/// Identifiers that are not part of `starmap` are skipped.
pub fn induced_subgraph(starmap: &Starmap, ids: &BTreeSet<SystemId>) -> Starmap {
    let mut subgraph = Starmap::new();
    for node in starmap.systems().filter(|node| ids.contains(&node.id())) {
        // Ids are unique in the source graph.
        let _ = subgraph.add_system(node.clone());
    }

    let skipped = ids.len() - subgraph.node_count();
    if skipped > 0 {
        warn!(skipped, "ignored system ids missing from the starmap");
    }

    for edge in starmap.edges() {
        if ids.contains(&edge.source) && ids.contains(&edge.target) {
            subgraph.push_edge(edge.clone());
        }
    }

    debug!(
        systems = subgraph.node_count(),
        edges = subgraph.edge_count(),
        "extracted induced subgraph"
    );
    subgraph
}

/// Systems belonging to a region.
pub fn nodes_of_region(starmap: &Starmap, region: &str) -> BTreeSet<SystemId> {
    let nodes: BTreeSet<SystemId> = starmap
        .systems()
        .filter(|node| node.region() == region)
        .map(SystemNode::id)
        .collect();
    debug!(region, count = nodes.len(), "collected systems of region");
    nodes
}

/// Systems belonging to a constellation.
pub fn nodes_of_constellation(starmap: &Starmap, constellation: &str) -> BTreeSet<SystemId> {
    let nodes: BTreeSet<SystemId> = starmap
        .systems()
        .filter(|node| node.constellation() == constellation)
        .map(SystemNode::id)
        .collect();
    debug!(
        constellation,
        count = nodes.len(),
        "collected systems of constellation"
    );
    nodes
}

/// Distinct regions in first-seen order.
pub fn all_regions(starmap: &Starmap) -> Vec<String> {
    distinct(starmap.systems().map(SystemNode::region))
}

/// Distinct constellations in first-seen order.
pub fn all_constellations(starmap: &Starmap) -> Vec<String> {
    distinct(starmap.systems().map(SystemNode::constellation))
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|value| seen.insert(*value))
        .map(str::to_string)
        .collect()
}

/// Remove every system with no incident edges. Returns how many were removed.
///
/// Degrees are read once before anything is removed.
pub fn prune_isolated(starmap: &mut Starmap) -> usize {
    let isolated: HashSet<SystemId> = starmap
        .systems()
        .map(SystemNode::id)
        .filter(|&id| starmap.degree(id) == 0)
        .collect();
    let removed = isolated.len();
    starmap.remove_systems(&isolated);
    debug!(removed, "removed systems without edges");
    removed
}

/// Working copy that keeps only systems in the given constellations.
pub fn retain_constellations<S: AsRef<str>>(starmap: &Starmap, constellations: &[S]) -> Starmap {
    let wanted: HashSet<&str> = constellations.iter().map(AsRef::as_ref).collect();
    let ids: BTreeSet<SystemId> = starmap
        .systems()
        .filter(|node| wanted.contains(node.constellation()))
        .map(SystemNode::id)
        .collect();
    induced_subgraph(starmap, &ids)
}

/// Partition of every region, sorted by region name.
pub fn region_partitions(starmap: &Starmap) -> Vec<(String, Starmap)> {
    let mut partitions: Vec<(String, Starmap)> = all_regions(starmap)
        .into_par_iter()
        .map(|region| {
            let subgraph = induced_subgraph(starmap, &nodes_of_region(starmap, &region));
            (region, subgraph)
        })
        .collect();
    partitions.sort_by(|a, b| a.0.cmp(&b.0));
    partitions
}

/// Partition of every constellation, sorted by constellation name.
pub fn constellation_partitions(starmap: &Starmap) -> Vec<(String, Starmap)> {
    let mut partitions: Vec<(String, Starmap)> = all_constellations(starmap)
        .into_par_iter()
        .map(|constellation| {
            let subgraph =
                induced_subgraph(starmap, &nodes_of_constellation(starmap, &constellation));
            (constellation, subgraph)
        })
        .collect();
    partitions.sort_by(|a, b| a.0.cmp(&b.0));
    partitions
}
