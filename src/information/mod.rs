//! Information Module: Summary Statistics over Persistence Diagrams
//!
//! Condenses a diagram into a handful of numbers per homology dimension
//! (pair counts, total and maximal lifetime, persistent entropy) for the
//! CLI printout and the result page.

mod entropy;

pub use entropy::{DimensionSummary, persistent_entropy, summarize};
