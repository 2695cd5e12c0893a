use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::security::{lower_security, SecurityTier};

/// Numeric identifier for a solar system.
pub type SystemId = i64;

/// Minimum Jaro-Winkler similarity for a name to be offered as a suggestion.
const FUZZY_MATCH_THRESHOLD: f64 = 0.75;

/// A single planet production record attached to a system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetOutput {
    pub planet_id: i64,
    pub resource: String,
    pub output: f64,
}

/// Production data attached to a system by the enricher.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeProduction {
    /// Planet records in the order the data source returned them.
    pub planets: Vec<PlanetOutput>,
    /// Summed output per resource name.
    pub totals: BTreeMap<String, f64>,
}

/// Representation of a solar system.
///
/// Identity, region and constellation are fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemNode {
    id: SystemId,
    region: String,
    constellation: String,
    name: String,
    security: f64,
    pub(crate) production: Option<NodeProduction>,
}

impl SystemNode {
    pub fn new(
        id: SystemId,
        region: impl Into<String>,
        constellation: impl Into<String>,
        name: impl Into<String>,
        security: f64,
    ) -> Self {
        Self {
            id,
            region: region.into(),
            constellation: constellation.into(),
            name: name.into(),
            security,
            production: None,
        }
    }

    pub fn id(&self) -> SystemId {
        self.id
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn constellation(&self) -> &str {
        &self.constellation
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn security(&self) -> f64 {
        self.security
    }

    pub fn tier(&self) -> SecurityTier {
        SecurityTier::classify(self.security)
    }

    /// Production data, present once the enricher has run.
    pub fn production(&self) -> Option<&NodeProduction> {
        self.production.as_ref()
    }
}

/// Directed edge between two systems. Parallel edges are distinguished by `key`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: SystemId,
    pub target: SystemId,
    /// Insertion sequence, unique within the graph the edge was created in.
    pub key: u64,
    /// Weight for the fewest-hop search; always 1.
    pub hop_cost: u32,
    /// Weight for the safety-weighted search.
    pub risk_cost: f64,
    /// Weight for the high-sec only search.
    pub highsec_cost: f64,
    /// Raw security value from the neighbour relation.
    pub security_level: f64,
    /// Per-resource production metric derived from both endpoints.
    pub production_metric: Option<BTreeMap<String, f64>>,
}

impl Edge {
    /// Tier the edge costs were derived from.
    pub fn tier(&self) -> SecurityTier {
        if self.risk_cost >= SecurityTier::NulSec.risk_cost() {
            SecurityTier::NulSec
        } else if self.risk_cost >= SecurityTier::LowSec.risk_cost() {
            SecurityTier::LowSec
        } else {
            SecurityTier::HighSec
        }
    }
}

/// In-memory starmap: a directed multigraph of systems.
///
/// Nodes and edges keep insertion order, which is what makes name resolution
/// and traversal order deterministic. Adjacency indexes are derived and are
/// rebuilt whenever a snapshot is restored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "StarmapData")]
pub struct Starmap {
    nodes: Vec<SystemNode>,
    edges: Vec<Edge>,
    next_key: u64,
    #[serde(skip)]
    index: HashMap<SystemId, usize>,
    #[serde(skip)]
    outgoing: HashMap<SystemId, Vec<usize>>,
    #[serde(skip)]
    incoming: HashMap<SystemId, Vec<usize>>,
}

#[derive(Deserialize)]
struct StarmapData {
    nodes: Vec<SystemNode>,
    edges: Vec<Edge>,
    next_key: u64,
}

impl From<StarmapData> for Starmap {
    fn from(data: StarmapData) -> Self {
        let mut starmap = Starmap {
            nodes: data.nodes,
            edges: data.edges,
            next_key: data.next_key,
            ..Starmap::default()
        };
        starmap.reindex();
        starmap
    }
}

impl Starmap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add a system. Duplicate identifiers are a data integrity error.
    pub fn add_system(&mut self, node: SystemNode) -> Result<()> {
        if self.index.contains_key(&node.id) {
            return Err(Error::DuplicateSystem { id: node.id });
        }
        self.index.insert(node.id, self.nodes.len());
        self.nodes.push(node);
        Ok(())
    }

    /// Add a directed edge. Costs are derived from the lower of the two
    /// endpoint securities; `security_level` keeps the row value as-is. Both
    /// endpoints must already exist.
    pub fn add_edge(
        &mut self,
        source: SystemId,
        target: SystemId,
        security_level: f64,
    ) -> Result<u64> {
        let missing = [source, target]
            .into_iter()
            .find(|id| !self.index.contains_key(id));
        if let Some(missing) = missing {
            return Err(Error::DataIntegrity {
                from: source,
                to: target,
                missing,
            });
        }

        let security = lower_security(
            self.nodes[self.index[&source]].security,
            self.nodes[self.index[&target]].security,
        );
        let tier = SecurityTier::classify(security);
        let key = self.next_key;
        self.push_edge(Edge {
            source,
            target,
            key,
            hop_cost: 1,
            risk_cost: tier.risk_cost(),
            highsec_cost: tier.highsec_cost(),
            security_level,
            production_metric: None,
        });
        Ok(key)
    }

    /// Append an edge whose endpoints are known to exist, keeping its key.
    pub(crate) fn push_edge(&mut self, edge: Edge) {
        let position = self.edges.len();
        self.outgoing.entry(edge.source).or_default().push(position);
        self.incoming.entry(edge.target).or_default().push(position);
        self.next_key = self.next_key.max(edge.key + 1);
        self.edges.push(edge);
    }

    pub fn contains(&self, id: SystemId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn system(&self, id: SystemId) -> Option<&SystemNode> {
        self.index.get(&id).map(|&position| &self.nodes[position])
    }

    /// Lookup a system name by identifier.
    pub fn system_name(&self, id: SystemId) -> Option<&str> {
        self.system(id).map(SystemNode::name)
    }

    /// Systems in insertion order.
    pub fn systems(&self) -> impl Iterator<Item = &SystemNode> {
        self.nodes.iter()
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Outgoing edges of a system in insertion order.
    pub fn outgoing(&self, id: SystemId) -> impl Iterator<Item = &Edge> {
        self.outgoing
            .get(&id)
            .into_iter()
            .flatten()
            .map(|&position| &self.edges[position])
    }

    /// Incoming edges of a system in insertion order.
    pub fn incoming(&self, id: SystemId) -> impl Iterator<Item = &Edge> {
        self.incoming
            .get(&id)
            .into_iter()
            .flatten()
            .map(|&position| &self.edges[position])
    }

    /// All parallel edges from `source` to `target`.
    pub fn edges_between(&self, source: SystemId, target: SystemId) -> impl Iterator<Item = &Edge> {
        self.outgoing(source).filter(move |edge| edge.target == target)
    }

    /// In-degree plus out-degree. A self-loop counts twice.
    pub fn degree(&self, id: SystemId) -> usize {
        self.outgoing.get(&id).map_or(0, Vec::len) + self.incoming.get(&id).map_or(0, Vec::len)
    }

    /// Case-insensitive fuzzy matches for a system name, best first.
    pub fn fuzzy_system_matches(&self, name: &str, limit: usize) -> Vec<String> {
        let needle = name.to_lowercase();
        let mut scored: Vec<(f64, &str)> = self
            .nodes
            .iter()
            .map(|node| {
                let score = strsim::jaro_winkler(&needle, &node.name.to_lowercase());
                (score, node.name.as_str())
            })
            .filter(|(score, _)| *score >= FUZZY_MATCH_THRESHOLD)
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));

        let mut seen = HashSet::new();
        scored
            .into_iter()
            .filter(|(_, candidate)| seen.insert(*candidate))
            .take(limit)
            .map(|(_, candidate)| candidate.to_string())
            .collect()
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [SystemNode] {
        &mut self.nodes
    }

    pub(crate) fn edges_mut(&mut self) -> &mut [Edge] {
        &mut self.edges
    }

    /// Remove systems together with every incident edge.
    pub(crate) fn remove_systems(&mut self, ids: &HashSet<SystemId>) {
        if ids.is_empty() {
            return;
        }
        self.nodes.retain(|node| !ids.contains(&node.id));
        self.edges
            .retain(|edge| !ids.contains(&edge.source) && !ids.contains(&edge.target));
        self.reindex();
    }

    fn reindex(&mut self) {
        self.index = self
            .nodes
            .iter()
            .enumerate()
            .map(|(position, node)| (node.id, position))
            .collect();
        self.outgoing.clear();
        self.incoming.clear();
        for (position, edge) in self.edges.iter().enumerate() {
            self.outgoing.entry(edge.source).or_default().push(position);
            self.incoming.entry(edge.target).or_default().push(position);
        }
    }
}
