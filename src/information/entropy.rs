//! Per-dimension Summary Statistics of a Persistence Diagram
//!
//! Besides counts and lifetimes, each dimension gets its persistent
//! entropy:
//!
//!   H_P = -Σᵢ pᵢ log(pᵢ),  pᵢ = lᵢ / L
//!
//! where lᵢ = dᵢ - bᵢ is the lifetime of finite pair i and L = Σⱼ lⱼ.
//! Essential pairs are excluded since their lifetime is unbounded.

use serde::Serialize;

use crate::topology::PersistenceDiagram;

/// Summary of one homology dimension
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DimensionSummary {
    pub dimension: usize,
    /// Number of finite pairs
    pub finite: usize,
    /// Number of essential pairs
    pub essential: usize,
    pub total_persistence: f64,
    pub max_persistence: f64,
    /// Persistent (Shannon) entropy of the finite lifetimes
    pub entropy: f64,
}

impl DimensionSummary {
    pub fn from_diagram(pd: &PersistenceDiagram, dimension: usize) -> Self {
        let lifetimes: Vec<f64> = pd
            .finite(dimension)
            .iter()
            .map(|p| p.persistence())
            .collect();

        Self {
            dimension,
            finite: lifetimes.len(),
            essential: pd.essential_count(dimension),
            total_persistence: lifetimes.iter().sum(),
            max_persistence: lifetimes.iter().copied().fold(0.0, f64::max),
            entropy: persistent_entropy(&lifetimes),
        }
    }
}

/// Summaries for every dimension the diagram reports
pub fn summarize(pd: &PersistenceDiagram) -> Vec<DimensionSummary> {
    (0..pd.homology_dims)
        .map(|d| DimensionSummary::from_diagram(pd, d))
        .collect()
}

/// Shannon entropy of normalised lifetimes; 0 when nothing has positive length
pub fn persistent_entropy(lifetimes: &[f64]) -> f64 {
    let total: f64 = lifetimes.iter().filter(|&&l| l > 0.0).sum();
    if total <= 0.0 {
        return 0.0;
    }

    let mut entropy = 0.0;
    for &l in lifetimes {
        let p = l / total;
        if p > 0.0 {
            entropy -= p * p.ln();
        }
    }
    entropy
}
