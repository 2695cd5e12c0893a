// Test utilities used across `eemap-cli` tests.
// Kept under `#[cfg(test)]` so it is not part of the public crate API.
use eemap_lib::output::RouteStep;
use eemap_lib::{RouteStrategy, RouteSummary, SecurityTier, SystemId};

/// Builder for tests that constructs a `RouteSummary` step by step.
pub struct RouteSummaryBuilder {
    summary: RouteSummary,
}

impl RouteSummaryBuilder {
    pub fn new(strategy: RouteStrategy) -> Self {
        Self {
            summary: RouteSummary {
                strategy,
                hops: 0,
                risk: 0.0,
                steps: Vec::new(),
            },
        }
    }

    /// Append a step; hop count follows the number of steps.
    pub fn step(mut self, id: SystemId, name: &str, constellation: &str, tier: SecurityTier) -> Self {
        let index = self.summary.steps.len();
        self.summary.steps.push(RouteStep {
            index,
            id,
            name: Some(name.to_string()),
            constellation: Some(constellation.to_string()),
            tier: Some(tier),
        });
        self.summary.hops = index;
        self
    }

    pub fn risk(mut self, risk: f64) -> Self {
        self.summary.risk = risk;
        self
    }

    pub fn build(self) -> RouteSummary {
        self.summary
    }
}
