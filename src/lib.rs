//! # edge-tda
//!
//! Persistent homology of the edges of a raster image.
//!
//! ## Pipeline
//!
//! 1. **Preprocess**: grayscale conversion, Canny edge detection, and
//!    extraction of edge pixel coordinates, randomly subsampled to at most
//!    `max_points` points
//!
//! 2. **Topology**: Vietoris-Rips complex of the point cloud truncated at
//!    `max_edge_length` and `max_dimension`, reduced to persistence pairs
//!    and Betti numbers (β₀ components, β₁ loops, ...)
//!
//! 3. **Presentation**: a six-panel SVG figure (original image, point
//!    cloud, barcode, diagram, Betti numbers, complex size and timing), or
//!    a two-page web UI that uploads an image and shows its result
//!
//! ## Example
//!
//! ```no_run
//! use edge_tda::{analysis, plot, AnalysisConfig};
//!
//! let analysis = analysis::run("office_chair.jpg", &AnalysisConfig::default())?;
//! println!("Betti numbers: {}", analysis.report.betti);
//! std::fs::write("report.svg", plot::render_figure(&analysis)?)?;
//! # Ok::<(), edge_tda::Error>(())
//! ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod information;
pub mod plot;
pub mod preprocess;
pub mod topology;
pub mod web;

pub use analysis::{Analysis, TopologyReport, analyze_points};
pub use config::{AnalysisConfig, ServerConfig};
pub use error::{Error, Result};

pub use preprocess::{PointCloud, Preprocessed};

pub use topology::{
    BettiNumbers,
    PersistenceDiagram,
    PersistencePair,
    PersistenceOptions,
    VietorisRips,
    compute_persistence,
};

pub use information::DimensionSummary;

pub use plot::{PlotData, render_figure};
