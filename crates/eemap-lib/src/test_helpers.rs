// Test-only helpers for `eemap-lib` unit tests
#![allow(dead_code)]

use crate::starmap::{Starmap, SystemId, SystemNode};

/// Builder to create small starmaps in tests.
pub struct StarmapBuilder {
    starmap: Starmap,
}

impl StarmapBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            starmap: Starmap::new(),
        }
    }

    pub fn system(
        mut self,
        id: SystemId,
        name: &str,
        constellation: &str,
        region: &str,
        security: f64,
    ) -> Self {
        self.starmap
            .add_system(SystemNode::new(id, region, constellation, name, security))
            .expect("unique test system id");
        self
    }

    pub fn edge(mut self, source: SystemId, target: SystemId, security: f64) -> Self {
        self.starmap
            .add_edge(source, target, security)
            .expect("test edge endpoints exist");
        self
    }

    pub fn build(self) -> Starmap {
        self.starmap
    }
}

impl Default for StarmapBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Alpha(1) -> Beta(2) -> Gamma(3) over high-sec edges, a direct
/// Alpha -> Gamma hop whose row lists 0.3, and an isolated nul-sec Delta(4).
pub fn triangle_starmap() -> Starmap {
    StarmapBuilder::new()
        .system(1, "Alpha", "First", "Home", 0.9)
        .system(2, "Beta", "First", "Home", 0.8)
        .system(3, "Gamma", "Second", "Home", 0.7)
        .system(4, "Delta", "Third", "Away", -0.4)
        .edge(1, 2, 0.9)
        .edge(2, 3, 0.8)
        .edge(1, 3, 0.3)
        .build()
}

/// Origin(1) reaches Harbor(5) in two hops through low-sec Ambush(2), or in
/// three high-sec hops through Haven(3) and Refuge(4). Outpost(6) is isolated.
pub fn detour_starmap() -> Starmap {
    StarmapBuilder::new()
        .system(1, "Origin", "Front", "Home", 0.9)
        .system(2, "Ambush", "Front", "Home", 0.2)
        .system(3, "Haven", "Rear", "Home", 0.9)
        .system(4, "Refuge", "Rear", "Home", 0.8)
        .system(5, "Harbor", "Port", "Home", 0.7)
        .system(6, "Outpost", "Far", "Away", -0.5)
        .edge(1, 2, 0.9)
        .edge(2, 5, 0.2)
        .edge(1, 3, 0.9)
        .edge(3, 4, 0.9)
        .edge(4, 5, 0.8)
        .build()
}
