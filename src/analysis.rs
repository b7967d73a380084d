//! End-to-end pipeline: image -> point cloud -> persistence summary.

use std::path::Path;
use std::time::{Duration, Instant};

use image::GrayImage;
use serde::Serialize;
use sysinfo::System;

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::information::{summarize, DimensionSummary};
use crate::preprocess::{self, PointCloud, Preprocessed};
use crate::topology::{persistence_of_simplices, BettiNumbers, PersistenceDiagram, PersistenceOptions, VietorisRips};

/// Topological summary of one point cloud
#[derive(Debug, Clone, Serialize)]
pub struct TopologyReport {
    pub diagram: PersistenceDiagram,
    pub betti: BettiNumbers,
    pub summaries: Vec<DimensionSummary>,
    /// Number of k-simplices in the Rips complex, indexed by k
    pub simplex_counts: Vec<usize>,
    pub n_points: usize,
    /// Wall-clock time of complex construction and reduction
    #[serde(serialize_with = "serialize_secs")]
    pub elapsed: Duration,
    /// Machine-wide CPU usage over the same interval, 0 to 100
    pub cpu_percent: f64,
}

impl TopologyReport {
    pub fn total_simplices(&self) -> usize {
        self.simplex_counts.iter().sum()
    }
}

fn serialize_secs<S: serde::Serializer>(d: &Duration, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

/// Global CPU load between `start` and `finish`
struct CpuSampler {
    system: System,
}

impl CpuSampler {
    fn start() -> Self {
        let mut system = System::new();
        system.refresh_cpu_usage();
        Self { system }
    }

    fn finish(mut self) -> f64 {
        self.system.refresh_cpu_usage();
        let usage = f64::from(self.system.global_cpu_usage());
        if usage.is_finite() {
            usage.clamp(0.0, 100.0)
        } else {
            0.0
        }
    }
}

/// Rips complex + persistence + Betti numbers for a point cloud
pub fn analyze_points(cloud: &PointCloud, config: &AnalysisConfig) -> Result<TopologyReport> {
    config.validate()?;
    let cpu = CpuSampler::start();
    let start = Instant::now();

    let vr = VietorisRips::from_points(&cloud.points, config.max_edge_length, config.max_dimension);
    let mut simplices = vr.simplices();
    let top = simplices.iter().map(|s| s.dimension()).max().unwrap_or(0);
    let mut simplex_counts = vec![0usize; top + 1];
    for s in &simplices {
        simplex_counts[s.dimension()] += 1;
    }

    let options = PersistenceOptions {
        min_persistence: config.min_persistence,
        persistence_dim_max: config.persistence_dim_max,
    };
    let diagram = persistence_of_simplices(&mut simplices, options);
    let elapsed = start.elapsed();
    let cpu_percent = cpu.finish();

    let betti = BettiNumbers::from_diagram(&diagram);
    let summaries = summarize(&diagram);

    tracing::info!(
        points = cloud.len(),
        simplices = simplices.len(),
        pairs = diagram.len(),
        betti = %betti,
        elapsed_ms = elapsed.as_millis() as u64,
        cpu_percent,
        "persistent homology computed"
    );

    Ok(TopologyReport {
        diagram,
        betti,
        summaries,
        simplex_counts,
        n_points: cloud.len(),
        elapsed,
        cpu_percent,
    })
}

/// Output of the full pipeline on one image
#[derive(Debug, Clone)]
pub struct Analysis {
    pub preprocessed: Preprocessed,
    pub report: TopologyReport,
}

impl Analysis {
    pub fn grayscale(&self) -> &GrayImage {
        &self.preprocessed.grayscale
    }

    pub fn cloud(&self) -> &PointCloud {
        &self.preprocessed.cloud
    }
}

/// Run the pipeline on an already decoded grayscale image
pub fn run_gray(gray: GrayImage, config: &AnalysisConfig) -> Result<Analysis> {
    config.validate()?;
    let preprocessed = preprocess::preprocess(gray, config)?;
    let report = analyze_points(&preprocessed.cloud, config)?;
    Ok(Analysis { preprocessed, report })
}

/// Run the pipeline on an image file
pub fn run(path: impl AsRef<Path>, config: &AnalysisConfig) -> Result<Analysis> {
    let gray = preprocess::load_grayscale(path)?;
    run_gray(gray, config)
}

/// Run the pipeline on encoded image bytes
pub fn run_bytes(bytes: &[u8], config: &AnalysisConfig) -> Result<Analysis> {
    let gray = preprocess::decode_grayscale(bytes)?;
    run_gray(gray, config)
}
