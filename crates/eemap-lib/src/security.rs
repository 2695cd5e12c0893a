//! Security classification and the traversal costs derived from it.
//!
//! Every place that turns a security value into a cost goes through
//! [`SecurityTier::classify`], so boundaries stay identical across the edge
//! builder, node groupings and map views.

use std::fmt;

use serde::Serialize;

/// Systems at or above this value are high-sec.
pub const HIGHSEC_THRESHOLD: f64 = 0.5;

/// Risk cost of traversing into nul-sec space.
pub const NULSEC_RISK: f64 = 1_000_000.0;

/// Risk cost of traversing into low-sec space.
pub const LOWSEC_RISK: f64 = 1_000.0;

/// Risk cost of traversing high-sec space.
pub const HIGHSEC_RISK: f64 = 1.0;

/// Security bucket derived from a raw security value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SecurityTier {
    NulSec,
    LowSec,
    HighSec,
}

impl SecurityTier {
    /// Classify a security value. `NaN` is treated as nul-sec.
    pub fn classify(security: f64) -> Self {
        if security.is_nan() || security <= 0.0 {
            SecurityTier::NulSec
        } else if security < HIGHSEC_THRESHOLD {
            SecurityTier::LowSec
        } else {
            SecurityTier::HighSec
        }
    }

    /// Edge weight used by the safety-weighted search.
    pub fn risk_cost(self) -> f64 {
        match self {
            SecurityTier::NulSec => NULSEC_RISK,
            SecurityTier::LowSec => LOWSEC_RISK,
            SecurityTier::HighSec => HIGHSEC_RISK,
        }
    }

    /// Edge weight used by the high-sec only search: anything below high-sec
    /// costs as much as nul-sec.
    pub fn highsec_cost(self) -> f64 {
        match self {
            SecurityTier::HighSec => HIGHSEC_RISK,
            SecurityTier::NulSec | SecurityTier::LowSec => NULSEC_RISK,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SecurityTier::NulSec => "nulsec",
            SecurityTier::LowSec => "lowsec",
            SecurityTier::HighSec => "highsec",
        }
    }
}

impl fmt::Display for SecurityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lower of two security values. A `NaN` on either side wins so that an
/// unknown endpoint is never mistaken for a safe one.
pub fn lower_security(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.min(b)
    }
}
