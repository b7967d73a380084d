//! Persistent Homology via the Standard Algorithm
//!
//! 1. Collect the filtered simplices of the Rips complex
//! 2. Sort by (filtration, dimension, vertices)
//! 3. Reduce the boundary matrix over Z/2 with left-to-right column additions
//! 4. Read pairs off the pivots; zero columns left unpaired are essential
//!
//! A persistence pair (b, d) is a homology class "born" at filtration
//! value b and killed at d. Classes never killed inside the truncated
//! complex have d = +∞.
//!
//! ## Reference
//!
//! Edelsbrunner, Letscher, Zomorodian (2002). "Topological Persistence
//! and Simplification". Discrete & Computational Geometry.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use super::vietoris_rips::{Simplex, VietorisRips};

/// Persistence interval [birth, death) in a given homology dimension
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PersistencePair {
    pub dimension: usize,
    pub birth: f64,
    /// `f64::INFINITY` for essential classes
    pub death: f64,
}

impl PersistencePair {
    pub fn new(dimension: usize, birth: f64, death: f64) -> Self {
        Self { dimension, birth, death }
    }

    /// Lifetime of the feature
    pub fn persistence(&self) -> f64 {
        if self.death.is_infinite() {
            f64::INFINITY
        } else {
            self.death - self.birth
        }
    }

    /// Is this an essential feature (infinite persistence)?
    pub fn is_essential(&self) -> bool {
        self.death.is_infinite()
    }

    /// Death as an optional value, `None` when essential
    pub fn finite_death(&self) -> Option<f64> {
        (!self.is_essential()).then_some(self.death)
    }
}

/// Knobs for `compute_persistence`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PersistenceOptions {
    /// Finite pairs with lifetime `<= min_persistence` are dropped
    pub min_persistence: f64,
    /// Report homology in the top dimension of the complex too
    pub persistence_dim_max: bool,
}

impl Default for PersistenceOptions {
    fn default() -> Self {
        Self {
            min_persistence: 0.0,
            persistence_dim_max: false,
        }
    }
}

/// Persistence pairs for dimensions `0..homology_dims`
#[derive(Debug, Clone, Default, Serialize)]
pub struct PersistenceDiagram {
    pub pairs: Vec<PersistencePair>,
    /// Number of homology dimensions that were computed
    pub homology_dims: usize,
}

impl PersistenceDiagram {
    /// Get pairs for dimension d
    pub fn dim(&self, d: usize) -> Vec<&PersistencePair> {
        self.pairs.iter().filter(|p| p.dimension == d).collect()
    }

    /// Get finite pairs for dimension d
    pub fn finite(&self, d: usize) -> Vec<&PersistencePair> {
        self.pairs
            .iter()
            .filter(|p| p.dimension == d && !p.is_essential())
            .collect()
    }

    /// Number of essential classes in dimension d
    pub fn essential_count(&self, d: usize) -> usize {
        self.pairs
            .iter()
            .filter(|p| p.dimension == d && p.is_essential())
            .count()
    }

    /// Largest finite death value, or the largest birth if nothing dies
    pub fn max_finite_value(&self) -> f64 {
        self.pairs
            .iter()
            .map(|p| if p.is_essential() { p.birth } else { p.death })
            .fold(0.0, f64::max)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Sparse column representation for boundary matrix
#[derive(Debug, Clone, Default)]
struct SparseColumn {
    /// Non-zero row indices (stored in BTreeSet for efficient operations)
    rows: BTreeSet<usize>,
}

impl SparseColumn {
    fn is_zero(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get the lowest (maximum) non-zero index
    fn low(&self) -> Option<usize> {
        self.rows.iter().next_back().copied()
    }

    /// Flip a single entry - addition in Z/2Z
    fn toggle(&mut self, row: usize) {
        if !self.rows.remove(&row) {
            self.rows.insert(row);
        }
    }

    /// XOR (symmetric difference) with another column - addition in Z/2Z
    fn add_assign(&mut self, other: &SparseColumn) {
        for &row in &other.rows {
            self.toggle(row);
        }
    }
}

/// Filtration order: value, then dimension (faces first), then vertices
fn filtration_order(a: &Simplex, b: &Simplex) -> Ordering {
    a.filtration
        .total_cmp(&b.filtration)
        .then(a.dimension().cmp(&b.dimension()))
        .then_with(|| a.vertices.cmp(&b.vertices))
}

/// Report order: dimension descending, then longest-lived first
fn report_order(a: &PersistencePair, b: &PersistencePair) -> Ordering {
    b.dimension
        .cmp(&a.dimension)
        .then(b.persistence().total_cmp(&a.persistence()))
        .then(a.birth.total_cmp(&b.birth))
}

/// Compute persistence pairs of the Rips filtration
pub fn compute_persistence(vr: &VietorisRips, options: PersistenceOptions) -> PersistenceDiagram {
    let mut simplices = vr.simplices();
    persistence_of_simplices(&mut simplices, options)
}

/// Standard algorithm over an arbitrary filtered complex. The simplex list
/// must be closed under taking faces; it is sorted in place.
pub fn persistence_of_simplices(
    simplices: &mut [Simplex],
    options: PersistenceOptions,
) -> PersistenceDiagram {
    simplices.sort_by(filtration_order);

    let complex_dim = simplices.iter().map(Simplex::dimension).max().unwrap_or(0);
    let homology_dims = if options.persistence_dim_max {
        complex_dim + 1
    } else {
        complex_dim.max(1)
    };

    // Build lookup: vertices -> filtration index
    let simplex_index: HashMap<&[usize], usize> = simplices
        .iter()
        .enumerate()
        .map(|(idx, s)| (s.vertices.as_slice(), idx))
        .collect();

    // Build and reduce boundary matrix
    let m = simplices.len();
    let mut columns: Vec<SparseColumn> = Vec::with_capacity(m);
    let mut low_to_col: HashMap<usize, usize> = HashMap::new();

    for (col_idx, simplex) in simplices.iter().enumerate() {
        let mut boundary = SparseColumn::default();

        if simplex.dimension() > 0 {
            // Boundary of [v0, ..., vk] = sum of [v0, ..., v̂i, ..., vk]
            let mut face = Vec::with_capacity(simplex.vertices.len() - 1);
            for skip in 0..simplex.vertices.len() {
                face.clear();
                face.extend(
                    simplex
                        .vertices
                        .iter()
                        .enumerate()
                        .filter(|&(i, _)| i != skip)
                        .map(|(_, &v)| v),
                );
                if let Some(&face_idx) = simplex_index.get(face.as_slice()) {
                    boundary.toggle(face_idx);
                }
            }
        }

        // Reduce column using previously reduced columns
        while let Some(low_idx) = boundary.low() {
            match low_to_col.get(&low_idx) {
                Some(&pivot_col) => boundary.add_assign(&columns[pivot_col]),
                None => break,
            }
        }

        if let Some(low_idx) = boundary.low() {
            low_to_col.insert(low_idx, col_idx);
        }

        columns.push(boundary);
    }

    // Extract persistence pairs
    let mut pairs = Vec::new();
    let mut paired = vec![false; m];

    for (col_idx, column) in columns.iter().enumerate() {
        if let Some(low_idx) = column.low() {
            paired[low_idx] = true;
            paired[col_idx] = true;

            let birth_simplex = &simplices[low_idx];
            let dimension = birth_simplex.dimension();
            if dimension >= homology_dims {
                continue;
            }
            let pair = PersistencePair::new(dimension, birth_simplex.filtration, simplices[col_idx].filtration);
            if pair.persistence() > options.min_persistence {
                pairs.push(pair);
            }
        }
    }

    // Essential features (unpaired simplices that create homology)
    for (idx, simplex) in simplices.iter().enumerate() {
        if !paired[idx] && columns[idx].is_zero() && simplex.dimension() < homology_dims {
            pairs.push(PersistencePair::new(simplex.dimension(), simplex.filtration, f64::INFINITY));
        }
    }

    pairs.sort_by(report_order);

    PersistenceDiagram { pairs, homology_dims }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    const KEEP_ALL: PersistenceOptions = PersistenceOptions {
        min_persistence: -1.0,
        persistence_dim_max: false,
    };

    fn circle(n: usize, radius: f64) -> Array2<f64> {
        let mut pts = Array2::zeros((n, 2));
        for i in 0..n {
            let theta = 2.0 * std::f64::consts::PI * i as f64 / n as f64;
            pts[[i, 0]] = radius * theta.cos();
            pts[[i, 1]] = radius * theta.sin();
        }
        pts
    }

    #[test]
    fn test_two_points() {
        // Two points at distance 1
        let points = array![[0.0, 0.0], [1.0, 0.0]];
        let vr = VietorisRips::from_points(&points, 2.0, 2);
        let pd = compute_persistence(&vr, PersistenceOptions::default());

        let finite_h0 = pd.finite(0);
        assert_eq!(finite_h0.len(), 1);
        assert!((finite_h0[0].birth - 0.0).abs() < 1e-10);
        assert!((finite_h0[0].death - 1.0).abs() < 1e-10);
        assert_eq!(pd.essential_count(0), 1);
    }

    #[test]
    fn test_points_beyond_threshold_stay_apart() {
        let points = array![[0.0, 0.0], [10.0, 0.0]];
        let vr = VietorisRips::from_points(&points, 5.0, 2);
        let pd = compute_persistence(&vr, PersistenceOptions::default());

        assert!(pd.finite(0).is_empty());
        assert_eq!(pd.essential_count(0), 2);
        assert_eq!(pd.essential_count(0), vr.count_components());
    }

    #[test]
    fn test_triangle_has_no_loop() {
        let points = array![[0.0, 0.0], [1.0, 0.0], [0.5, 0.75_f64.sqrt()]];
        let vr = VietorisRips::from_points(&points, 2.0, 2);
        let pd = compute_persistence(&vr, PersistenceOptions::default());

        assert_eq!(pd.finite(0).len(), 2);
        // The triangle fills at the same value its last edge appears
        assert!(pd.dim(1).is_empty());
    }

    #[test]
    fn test_square_cycle() {
        let s2 = 2.0_f64.sqrt();
        let points = array![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        let vr = VietorisRips::from_points(&points, 2.0, 2);
        let pd = compute_persistence(&vr, PersistenceOptions::default());

        let h1 = pd.finite(1);
        assert_eq!(h1.len(), 1, "square should have one H1 cycle");
        assert!((h1[0].birth - 1.0).abs() < 1e-10, "cycle born at 1");
        assert!((h1[0].death - s2).abs() < 1e-10, "cycle dies at sqrt(2)");
    }

    #[test]
    fn test_unfilled_square_keeps_essential_loop() {
        // Diagonals are longer than the threshold, so the loop never dies
        let points = array![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        let vr = VietorisRips::from_points(&points, 1.2, 2);
        let pd = compute_persistence(&vr, PersistenceOptions::default());

        // No triangles, so the complex is 1-dimensional: only H0 is reported
        assert_eq!(pd.homology_dims, 1);
        assert!(pd.dim(1).is_empty());

        let with_top = compute_persistence(
            &vr,
            PersistenceOptions { persistence_dim_max: true, ..PersistenceOptions::default() },
        );
        assert_eq!(with_top.homology_dims, 2);
        assert_eq!(with_top.essential_count(1), 1);
    }

    #[test]
    fn test_every_vertex_is_born_once() {
        let points = circle(12, 3.0);
        let vr = VietorisRips::from_points(&points, 10.0, 2);
        let pd = compute_persistence(&vr, KEEP_ALL);

        assert_eq!(pd.dim(0).len(), 12);
        assert_eq!(pd.essential_count(0), 1);
        assert!(pd.pairs.iter().all(|p| p.birth <= p.death));
    }

    #[test]
    fn test_circle_loop_is_most_persistent() {
        let points = circle(16, 5.0);
        let vr = VietorisRips::from_points(&points, 11.0, 2);
        let pd = compute_persistence(&vr, PersistenceOptions::default());

        let h1 = pd.finite(1);
        assert!(!h1.is_empty());
        // Adjacent points are ~1.95 apart; the loop is filled once chords
        // spanning more than a third of the circle (~9.24) appear
        assert!(h1[0].birth < 2.0);
        assert!(h1[0].persistence() > 1.0);
    }

    #[test]
    fn test_report_order() {
        let points = circle(10, 4.0);
        let vr = VietorisRips::from_points(&points, 10.0, 2);
        let pd = compute_persistence(&vr, PersistenceOptions::default());

        for w in pd.pairs.windows(2) {
            assert!(w[0].dimension >= w[1].dimension);
            if w[0].dimension == w[1].dimension {
                assert!(w[0].persistence() >= w[1].persistence());
            }
        }
        assert!(pd.pairs.first().map_or(false, |p| p.dimension == 1));
    }

    #[test]
    fn test_min_persistence_filter() {
        let points = array![[0.0, 0.0], [0.5, 0.0], [5.0, 0.0]];
        let vr = VietorisRips::from_points(&points, 10.0, 1);
        let pd = compute_persistence(
            &vr,
            PersistenceOptions { min_persistence: 1.0, ..PersistenceOptions::default() },
        );

        // The 0.5 merge is filtered, the 4.5 merge and the essential class stay
        let h0 = pd.dim(0);
        assert_eq!(h0.len(), 2);
        assert!(h0.iter().any(|p| p.is_essential()));
        assert!(h0.iter().any(|p| (p.death - 4.5).abs() < 1e-10));
    }
}
