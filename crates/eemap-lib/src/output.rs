use std::fmt::Write;

use serde::Serialize;

use crate::routing::{RouteFocus, RouteStrategy, SystemPath};
use crate::security::SecurityTier;
use crate::starmap::{Edge, Starmap, SystemId, SystemNode};

/// Presentation style for turning a [`RouteSummary`] into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteRenderMode {
    PlainText,
    /// One system name per line, for pasting into notes.
    Note,
}

/// Step taken during traversal of a path.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteStep {
    pub index: usize,
    pub id: SystemId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constellation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<SecurityTier>,
}

impl RouteStep {
    fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<unknown>")
    }
}

/// Structured representation of a path that higher-level consumers can serialise.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteSummary {
    pub strategy: RouteStrategy,
    pub hops: usize,
    pub risk: f64,
    pub steps: Vec<RouteStep>,
}

impl RouteSummary {
    /// Convert a [`SystemPath`] into a summary with resolved system attributes.
    pub fn from_path(starmap: &Starmap, path: &SystemPath) -> Self {
        let steps = path
            .systems
            .iter()
            .enumerate()
            .map(|(index, &id)| {
                let node = starmap.system(id);
                RouteStep {
                    index,
                    id,
                    name: node.map(|n| n.name().to_string()),
                    constellation: node.map(|n| n.constellation().to_string()),
                    tier: node.map(SystemNode::tier),
                }
            })
            .collect();

        Self {
            strategy: path.strategy,
            hops: path.hop_count(),
            risk: path.risk,
            steps,
        }
    }

    /// Render the summary using the requested textual mode.
    pub fn render(&self, mode: RouteRenderMode) -> String {
        match mode {
            RouteRenderMode::PlainText => self.render_plain(),
            RouteRenderMode::Note => self.render_note(),
        }
    }

    fn render_plain(&self) -> String {
        let mut buffer = String::new();
        let start = self.steps.first().map_or("<unknown>", RouteStep::display_name);
        let goal = self.steps.last().map_or("<unknown>", RouteStep::display_name);
        let _ = writeln!(
            buffer,
            "{} path: {} -> {} ({} hops, risk {})",
            self.strategy, start, goal, self.hops, self.risk
        );
        for step in &self.steps {
            let tier = step.tier.map_or("?", SecurityTier::label);
            let _ = writeln!(
                buffer,
                "{:>3}: {} ({}) [{}]",
                step.index,
                step.display_name(),
                step.id,
                tier
            );
        }
        buffer
    }

    fn render_note(&self) -> String {
        let mut buffer = String::new();
        for step in &self.steps {
            let _ = writeln!(buffer, "{}", step.display_name());
        }
        buffer
    }
}

/// Node payload handed to a visualisation consumer.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MapNode {
    pub id: SystemId,
    pub name: String,
    pub constellation: String,
    pub region: String,
    pub security: f64,
    pub tier: SecurityTier,
    pub label: String,
}

impl From<&SystemNode> for MapNode {
    fn from(node: &SystemNode) -> Self {
        Self {
            id: node.id(),
            name: node.name().to_string(),
            constellation: node.constellation().to_string(),
            region: node.region().to_string(),
            security: node.security(),
            tier: node.tier(),
            label: node_label(node),
        }
    }
}

/// Edge payload handed to a visualisation consumer.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MapEdge {
    pub source: SystemId,
    pub target: SystemId,
    pub key: u64,
    pub security_level: f64,
}

impl From<&Edge> for MapEdge {
    fn from(edge: &Edge) -> Self {
        Self {
            source: edge.source,
            target: edge.target,
            key: edge.key,
            security_level: edge.security_level,
        }
    }
}

/// System ids grouped by their own security tier, in insertion order.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct SecurityGroups {
    pub nulsec: Vec<SystemId>,
    pub lowsec: Vec<SystemId>,
    pub highsec: Vec<SystemId>,
}

/// Edge lists of the two paths drawn on top of a focused map.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct PathHighlight {
    pub shortest: Vec<(SystemId, SystemId)>,
    pub safest: Vec<(SystemId, SystemId)>,
}

/// Serialisable map for drawing a starmap or one of its partitions.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MapView {
    pub nodes: Vec<MapNode>,
    pub edges: Vec<MapEdge>,
    pub security_groups: SecurityGroups,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlights: Option<PathHighlight>,
}

impl MapView {
    pub fn from_starmap(starmap: &Starmap) -> Self {
        Self {
            nodes: starmap.systems().map(MapNode::from).collect(),
            edges: starmap.edges().iter().map(MapEdge::from).collect(),
            security_groups: group_by_security(starmap),
            highlights: None,
        }
    }

    /// View of the focused working copy with both paths highlighted.
    pub fn from_focus(focus: &RouteFocus) -> Self {
        let mut view = Self::from_starmap(&focus.focus);
        view.highlights = Some(PathHighlight {
            shortest: focus.shortest.edges(),
            safest: focus.safest.edges(),
        });
        view
    }
}

/// Group systems by the tier of their own security value.
pub fn group_by_security(starmap: &Starmap) -> SecurityGroups {
    let mut groups = SecurityGroups::default();
    for node in starmap.systems() {
        let bucket = match node.tier() {
            SecurityTier::NulSec => &mut groups.nulsec,
            SecurityTier::LowSec => &mut groups.lowsec,
            SecurityTier::HighSec => &mut groups.highsec,
        };
        bucket.push(node.id());
    }
    groups
}

/// Four-line label: name, constellation, region and security.
pub fn node_label(node: &SystemNode) -> String {
    format!(
        "{}\n{}\n{}\n{}",
        node.name(),
        node.constellation(),
        node.region(),
        node.security()
    )
}
