//! Planet production enrichment for systems and edges.
//!
//! Node production sums planet output per resource. Edge production is a
//! per-edge attribute only; it never feeds into the traversal costs.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::db::{ProductionRow, StarmapSource};
use crate::error::Result;
use crate::starmap::{NodeProduction, PlanetOutput, Starmap, SystemId};

/// Sum output per resource name.
pub fn aggregate_production(rows: &[ProductionRow]) -> BTreeMap<String, f64> {
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    for row in rows {
        debug!(
            planet_id = row.planet_id,
            resource = %row.resource,
            output = row.output,
            "planet production"
        );
        *totals.entry(row.resource.clone()).or_insert(0.0) += row.output;
    }
    totals
}

/// Read production rows for every system and store them, with the
/// per-resource totals, on the node.
pub fn attach_production(starmap: &mut Starmap, source: &dyn StarmapSource) -> Result<()> {
    info!(
        systems = starmap.node_count(),
        "adding planetary production data"
    );
    for node in starmap.nodes_mut() {
        let rows = source.production(node.id())?;
        let totals = aggregate_production(&rows);
        let planets = rows
            .into_iter()
            .map(|row| PlanetOutput {
                planet_id: row.planet_id,
                resource: row.resource,
                output: row.output,
            })
            .collect();
        node.production = Some(NodeProduction { planets, totals });
    }
    info!("planetary production data added");
    Ok(())
}

/// Derived production metric between two endpoint totals.
///
/// Resources present on both sides take the mean of the two outputs; a
/// resource present on one side only takes half of that side's output.
pub fn edge_production_metric(
    source: &BTreeMap<String, f64>,
    target: &BTreeMap<String, f64>,
) -> BTreeMap<String, f64> {
    let mut metric = BTreeMap::new();
    for (resource, &output) in source {
        let value = match target.get(resource) {
            Some(&other) => (output + other) / 2.0,
            None => output / 2.0,
        };
        metric.insert(resource.clone(), value);
    }
    for (resource, &output) in target {
        metric
            .entry(resource.clone())
            .or_insert_with(|| output / 2.0);
    }
    metric
}

/// Store a production metric on every edge. Systems without production data
/// count as producing nothing.
pub fn derive_edge_production(starmap: &mut Starmap) {
    info!(
        edges = starmap.edge_count(),
        "adding planetary production data for edges"
    );
    let empty = BTreeMap::new();
    let snapshot: &Starmap = starmap;
    let metrics: Vec<BTreeMap<String, f64>> = snapshot
        .edges()
        .iter()
        .map(|edge| {
            edge_production_metric(
                node_totals(snapshot, edge.source, &empty),
                node_totals(snapshot, edge.target, &empty),
            )
        })
        .collect();

    for (edge, metric) in starmap.edges_mut().iter_mut().zip(metrics) {
        edge.production_metric = Some(metric);
    }
    info!("planetary production weights ready");
}

fn node_totals<'a>(
    starmap: &'a Starmap,
    id: SystemId,
    empty: &'a BTreeMap<String, f64>,
) -> &'a BTreeMap<String, f64> {
    starmap
        .system(id)
        .and_then(|node| node.production())
        .map_or(empty, |production| &production.totals)
}
