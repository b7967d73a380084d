//! Vietoris-Rips Complex Construction
//!
//! The Vietoris-Rips complex VR_ε(X) is a simplicial complex where:
//! - 0-simplices are the points in X
//! - A k-simplex [v₀, ..., vₖ] exists iff d(vᵢ, vⱼ) ≤ ε for all i,j
//!
//! Here ε is the fixed `max_edge_length`, and each simplex carries the
//! filtration value at which it enters: 0 for vertices, the edge length
//! for edges, and the longest edge for higher simplices. Higher simplices
//! are found by clique expansion over the ε-neighbourhood graph.

use ndarray::Array2;

/// A simplex represented by its sorted vertex indices
#[derive(Debug, Clone, PartialEq)]
pub struct Simplex {
    pub vertices: Vec<usize>,
    /// Filtration value where the simplex appears
    pub filtration: f64,
}

impl Simplex {
    pub fn dimension(&self) -> usize {
        self.vertices.len() - 1
    }
}

/// Rips complex builder, truncated at `max_edge_length` and `max_dimension`
pub struct VietorisRips {
    /// Distance matrix (precomputed)
    distances: Array2<f64>,
    max_edge_length: f64,
    max_dimension: usize,
}

impl VietorisRips {
    /// Create from a precomputed distance matrix
    pub fn from_distance_matrix(distances: Array2<f64>, max_edge_length: f64, max_dimension: usize) -> Self {
        Self {
            distances,
            max_edge_length,
            max_dimension,
        }
    }

    /// Create from point cloud (computes distance matrix)
    pub fn from_points(points: &Array2<f64>, max_edge_length: f64, max_dimension: usize) -> Self {
        let distances = Self::compute_distance_matrix(points);
        Self::from_distance_matrix(distances, max_edge_length, max_dimension)
    }

    /// Compute Euclidean distance matrix
    fn compute_distance_matrix(points: &Array2<f64>) -> Array2<f64> {
        let n = points.nrows();
        let dim = points.ncols();

        let mut dm = Array2::<f64>::zeros((n, n));

        for i in 0..n {
            for j in i+1..n {
                let mut dist_sq = 0.0;
                for d in 0..dim {
                    let diff = points[[i, d]] - points[[j, d]];
                    dist_sq += diff * diff;
                }
                let dist = dist_sq.sqrt();
                dm[[i, j]] = dist;
                dm[[j, i]] = dist;
            }
        }

        dm
    }

    /// Number of points
    pub fn n_points(&self) -> usize {
        self.distances.nrows()
    }

    fn adjacent(&self, i: usize, j: usize) -> bool {
        self.distances[[i, j]] <= self.max_edge_length
    }

    /// For each vertex, the higher-indexed vertices within `max_edge_length`
    fn upper_neighbours(&self) -> Vec<Vec<usize>> {
        let n = self.n_points();
        (0..n)
            .map(|i| (i + 1..n).filter(|&j| self.adjacent(i, j)).collect())
            .collect()
    }

    /// All edges of the complex as (i, j, length), i < j
    pub fn edges(&self) -> Vec<(usize, usize, f64)> {
        self.upper_neighbours()
            .into_iter()
            .enumerate()
            .flat_map(|(i, nbrs)| nbrs.into_iter().map(move |j| (i, j)))
            .map(|(i, j)| (i, j, self.distances[[i, j]]))
            .collect()
    }

    /// Every simplex up to `max_dimension`, in no particular order
    pub fn simplices(&self) -> Vec<Simplex> {
        let upper = self.upper_neighbours();
        let mut out = Vec::new();
        let mut current = Vec::with_capacity(self.max_dimension + 1);

        for (v, nbrs) in upper.iter().enumerate() {
            current.push(v);
            out.push(Simplex { vertices: current.clone(), filtration: 0.0 });
            self.expand(&mut current, nbrs, 0.0, &mut out);
            current.pop();
        }

        out
    }

    /// Extend the clique `current` by each candidate in turn. Candidates are
    /// sorted and already adjacent to every vertex of `current`.
    fn expand(&self, current: &mut Vec<usize>, candidates: &[usize], filtration: f64, out: &mut Vec<Simplex>) {
        if current.len() > self.max_dimension {
            return;
        }

        for (idx, &c) in candidates.iter().enumerate() {
            let entry = current
                .iter()
                .map(|&v| self.distances[[v, c]])
                .fold(filtration, f64::max);

            current.push(c);
            out.push(Simplex { vertices: current.clone(), filtration: entry });

            if current.len() <= self.max_dimension {
                let next: Vec<usize> = candidates[idx + 1..]
                    .iter()
                    .copied()
                    .filter(|&w| self.adjacent(c, w))
                    .collect();
                if !next.is_empty() {
                    self.expand(current, &next, entry, out);
                }
            }

            current.pop();
        }
    }

    /// Count connected components of the full complex using Union-Find
    pub fn count_components(&self) -> usize {
        let n = self.n_points();
        let mut parent: Vec<usize> = (0..n).collect();
        let mut rank = vec![0usize; n];

        fn find(parent: &mut [usize], i: usize) -> usize {
            if parent[i] != i {
                parent[i] = find(parent, parent[i]);
            }
            parent[i]
        }

        let mut components = n;
        for (i, j, _) in self.edges() {
            let ri = find(&mut parent, i);
            let rj = find(&mut parent, j);
            if ri == rj {
                continue;
            }
            if rank[ri] < rank[rj] {
                parent[ri] = rj;
            } else if rank[ri] > rank[rj] {
                parent[rj] = ri;
            } else {
                parent[rj] = ri;
                rank[ri] += 1;
            }
            components -= 1;
        }
        components
    }
}
