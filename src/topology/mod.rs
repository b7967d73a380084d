//! Topology Module: Persistent Homology and Simplicial Complexes
//!
//! Implements the mathematical structures for topological data analysis:
//! - Vietoris-Rips complex truncated at a maximum edge length and dimension
//! - Exact persistent homology via boundary matrix reduction
//! - Betti numbers extraction
//!
//! ## Mathematical Background
//!
//! For a point cloud X we build the filtration VR_ε(X), 0 ≤ ε ≤ ε_max,
//! where ε_max is the configured `max_edge_length`. Persistent homology
//! tracks the birth and death of topological features (connected
//! components, loops, voids) across this filtration. Features alive at
//! ε_max are essential and make up the Betti numbers.

mod vietoris_rips;
mod persistence;
mod betti;

pub use vietoris_rips::{Simplex, VietorisRips};
pub use persistence::{
    PersistenceDiagram,
    PersistencePair,
    PersistenceOptions,
    compute_persistence,
    persistence_of_simplices,
};
pub use betti::BettiNumbers;
