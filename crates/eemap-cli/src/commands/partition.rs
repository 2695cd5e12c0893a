//! Region and constellation partition commands.

use anyhow::{bail, Result};

use eemap_lib::{
    all_constellations, all_regions, induced_subgraph, nodes_of_constellation, nodes_of_region,
    MapView, Starmap,
};

use crate::commands::MapContext;
use eemap_cli::output::{
    format_names_text, format_partition_text, NameCount, OutputFormat, PartitionReport,
    PartitionSystem,
};

/// Attribute a partition is taken over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionKind {
    Region,
    Constellation,
}

impl PartitionKind {
    fn label(self) -> &'static str {
        match self {
            PartitionKind::Region => "region",
            PartitionKind::Constellation => "constellation",
        }
    }

    fn names(self, starmap: &Starmap) -> Vec<String> {
        match self {
            PartitionKind::Region => all_regions(starmap),
            PartitionKind::Constellation => all_constellations(starmap),
        }
    }

    fn partition(self, starmap: &Starmap, name: &str) -> Starmap {
        let ids = match self {
            PartitionKind::Region => nodes_of_region(starmap, name),
            PartitionKind::Constellation => nodes_of_constellation(starmap, name),
        };
        induced_subgraph(starmap, &ids)
    }
}

/// Print the systems of one region or constellation.
pub fn handle_partition_command(
    context: &MapContext,
    format: OutputFormat,
    kind: PartitionKind,
    name: &str,
    map: bool,
) -> Result<()> {
    let starmap = context.load_starmap()?;
    let partition = kind.partition(&starmap, name);
    if partition.is_empty() {
        bail!("unknown {} '{}'", kind.label(), name);
    }

    if map {
        println!("{}", serde_json::to_string_pretty(&MapView::from_starmap(&partition))?);
        return Ok(());
    }

    let report = PartitionReport {
        kind: kind.label(),
        name: name.to_string(),
        edges: partition.edge_count(),
        systems: partition
            .systems()
            .map(|node| PartitionSystem {
                id: node.id(),
                name: node.name().to_string(),
                constellation: node.constellation().to_string(),
                security: node.security(),
                tier: node.tier(),
            })
            .collect(),
    };
    format.print(&report, format_partition_text)
}

/// List every region or constellation with its system count.
pub fn handle_list_command(
    context: &MapContext,
    format: OutputFormat,
    kind: PartitionKind,
) -> Result<()> {
    let starmap = context.load_starmap()?;
    let names: Vec<NameCount> = kind
        .names(&starmap)
        .into_iter()
        .map(|name| {
            let systems = starmap
                .systems()
                .filter(|node| match kind {
                    PartitionKind::Region => node.region() == name,
                    PartitionKind::Constellation => node.constellation() == name,
                })
                .count();
            NameCount { name, systems }
        })
        .collect();
    format.print(&names, |names, palette| format_names_text(names, palette))
}
