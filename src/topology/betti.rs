//! Betti Numbers: Topological Invariants
//!
//! The k-th Betti number βₖ counts the number of k-dimensional
//! "holes" in a topological space:
//!
//! - β₀: Number of connected components
//! - β₁: Number of 1-dimensional loops/cycles
//! - β₂: Number of 2-dimensional voids/cavities
//!
//! For the truncated Rips complex these are the classes still alive at
//! `max_edge_length`, i.e. the essential pairs of the persistence diagram.

use serde::Serialize;

use super::PersistenceDiagram;

/// Betti numbers of the full complex, indexed by dimension
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct BettiNumbers(pub Vec<usize>);

impl BettiNumbers {
    /// One entry per homology dimension the diagram covers
    pub fn from_diagram(pd: &PersistenceDiagram) -> Self {
        Self((0..pd.homology_dims).map(|d| pd.essential_count(d)).collect())
    }

    pub fn get(&self, d: usize) -> usize {
        self.0.get(d).copied().unwrap_or(0)
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Total topological complexity
    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }

    /// Euler characteristic χ = β₀ - β₁ + β₂ - ...
    pub fn euler_characteristic(&self) -> i64 {
        self.0
            .iter()
            .enumerate()
            .map(|(d, &b)| if d % 2 == 0 { b as i64 } else { -(b as i64) })
            .sum()
    }
}

impl std::fmt::Display for BettiNumbers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::{compute_persistence, PersistenceOptions, VietorisRips};
    use ndarray::array;

    #[test]
    fn test_two_clusters() {
        let points = array![
            [0.0, 0.0],
            [0.0, 1.0],
            [20.0, 0.0],
            [20.0, 1.0]
        ];
        let vr = VietorisRips::from_points(&points, 5.0, 2);
        let betti = BettiNumbers::from_diagram(&compute_persistence(&vr, PersistenceOptions::default()));

        assert_eq!(betti.get(0), 2);
        assert_eq!(betti.get(1), 0);
        assert_eq!(betti.get(7), 0);
        assert_eq!(betti.to_string(), "[2]");
    }

    #[test]
    fn test_open_loop_counts_in_beta_1() {
        // Square whose diagonals exceed the threshold, with one extra
        // vertex so a triangle exists and H1 is reported
        let points = array![
            [0.0, 0.0],
            [1.0, 0.0],
            [1.0, 1.0],
            [0.0, 1.0],
            [1.5, 0.5]
        ];
        let vr = VietorisRips::from_points(&points, 1.2, 2);
        let betti = BettiNumbers::from_diagram(&compute_persistence(&vr, PersistenceOptions::default()));

        assert_eq!(betti.as_slice(), &[1, 1]);
        assert_eq!(betti.total(), 2);
        assert_eq!(betti.euler_characteristic(), 0);
    }
}
