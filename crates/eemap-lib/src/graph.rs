use tracing::{debug, info};

use crate::db::{NeighborRow, StarmapSource, SystemRow};
use crate::error::Result;
use crate::starmap::{Starmap, SystemNode};

/// Build the starmap from the system and neighbour relations.
///
/// One node is created per system row and one edge per neighbour row;
/// parallel listings are kept as parallel edges. A neighbour row that refers
/// to an unknown system aborts the build with [`crate::Error::DataIntegrity`].
pub fn build_starmap(systems: &[SystemRow], neighbors: &[NeighborRow]) -> Result<Starmap> {
    let mut starmap = Starmap::new();

    for row in systems {
        starmap.add_system(SystemNode::new(
            row.id,
            row.region.as_str(),
            row.constellation.as_str(),
            row.name.as_str(),
            row.security,
        ))?;
    }
    debug!(systems = starmap.node_count(), "created system nodes");

    for row in neighbors {
        starmap.add_edge(row.from, row.to, row.security)?;
    }

    info!(
        systems = starmap.node_count(),
        edges = starmap.edge_count(),
        "built starmap graph"
    );
    Ok(starmap)
}

/// Read both relations from a data source and build the starmap.
pub fn build_from_source(source: &dyn StarmapSource) -> Result<Starmap> {
    let systems = source.systems()?;
    let neighbors = source.neighbors()?;
    build_starmap(&systems, &neighbors)
}
