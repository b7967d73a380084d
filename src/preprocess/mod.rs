//! Preprocess Module: Raster Image to Point Cloud
//!
//! The point cloud handed to the topology module is the set of Canny edge
//! pixels of the grayscale image, thinned out by uniform random sampling:
//!
//! ```text
//! image ──► luma8 ──► canny(low, high) ──► {(row, col) : edge > 0} ──► sample(max_points)
//! ```
//!
//! Coordinates stay in pixel units, so `max_edge_length` is measured in
//! pixels as well.

mod edges;
mod sampling;

use image::GrayImage;
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::AnalysisConfig;
use crate::error::{Error, Result};

pub use edges::{decode_grayscale, detect_edges, edge_coordinates, load_grayscale};
pub use sampling::subsample;

/// Edge pixels of an image as an `n x 2` array of (row, col)
#[derive(Debug, Clone)]
pub struct PointCloud {
    pub points: Array2<f64>,
    /// Size of the source image, for plotting in image coordinates
    pub width: u32,
    pub height: u32,
}

impl PointCloud {
    pub fn new(coords: &[[f64; 2]], width: u32, height: u32) -> Self {
        let mut points = Array2::<f64>::zeros((coords.len(), 2));
        for (i, [r, c]) in coords.iter().enumerate() {
            points[[i, 0]] = *r;
            points[[i, 1]] = *c;
        }
        Self { points, width, height }
    }

    pub fn len(&self) -> usize {
        self.points.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.points.nrows() == 0
    }

    /// Rows as `[row, col]` pairs
    pub fn to_vec(&self) -> Vec<[f64; 2]> {
        self.points.rows().into_iter().map(|r| [r[0], r[1]]).collect()
    }
}

/// Everything produced before the topological computation
#[derive(Debug, Clone)]
pub struct Preprocessed {
    pub grayscale: GrayImage,
    pub edges: GrayImage,
    pub cloud: PointCloud,
}

/// Grayscale image -> subsampled edge point cloud
pub fn preprocess(gray: GrayImage, config: &AnalysisConfig) -> Result<Preprocessed> {
    match config.seed {
        Some(seed) => preprocess_with_rng(gray, config, &mut StdRng::seed_from_u64(seed)),
        None => preprocess_with_rng(gray, config, &mut rand::rng()),
    }
}

pub fn preprocess_with_rng<R: Rng + ?Sized>(
    gray: GrayImage,
    config: &AnalysisConfig,
    rng: &mut R,
) -> Result<Preprocessed> {
    let edges = detect_edges(&gray, config.canny_low, config.canny_high);
    let coords = edge_coordinates(&edges);
    if coords.is_empty() {
        return Err(Error::NoEdges);
    }

    let n_edges = coords.len();
    let coords = subsample(coords, config.max_points, rng);
    tracing::debug!(
        width = gray.width(),
        height = gray.height(),
        edge_pixels = n_edges,
        sampled = coords.len(),
        "extracted edge point cloud"
    );

    let cloud = PointCloud::new(&coords, gray.width(), gray.height());
    Ok(Preprocessed { grayscale: gray, edges, cloud })
}
