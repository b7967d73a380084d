//! Configuration for the analysis pipeline and the web server.
//!
//! Both structs deserialize from TOML with every field optional; missing
//! fields take the defaults below. Binaries apply command-line overrides on
//! top of whatever the file provided and then call `validate`.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Highest simplex dimension the Rips expansion will build.
pub const MAX_SUPPORTED_DIMENSION: usize = 3;

/// Parameters of the image -> point cloud -> persistence chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Upper bound on the number of edge pixels kept after subsampling.
    pub max_points: usize,
    /// Rips threshold: points farther apart than this are never joined.
    pub max_edge_length: f64,
    /// Dimension of the largest simplex in the Rips complex.
    pub max_dimension: usize,
    /// Canny lower hysteresis threshold.
    pub canny_low: f32,
    /// Canny upper hysteresis threshold; gradients above it seed edges.
    pub canny_high: f32,
    /// Finite pairs with lifetime not above this are dropped.
    pub min_persistence: f64,
    /// Also report homology in the top dimension of the complex.
    pub persistence_dim_max: bool,
    /// Fixed seed for the subsampling RNG.
    pub seed: Option<u64>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_points: 1000,
            max_edge_length: 10.0,
            max_dimension: 2,
            canny_low: 100.0,
            canny_high: 200.0,
            min_persistence: 0.0,
            persistence_dim_max: false,
            seed: None,
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_points == 0 {
            return Err(Error::InvalidConfig("max_points must be positive".into()));
        }
        if !self.max_edge_length.is_finite() || self.max_edge_length <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "max_edge_length must be a positive finite number, got {}",
                self.max_edge_length
            )));
        }
        if self.max_dimension > MAX_SUPPORTED_DIMENSION {
            return Err(Error::InvalidConfig(format!(
                "max_dimension must be at most {MAX_SUPPORTED_DIMENSION}, got {}",
                self.max_dimension
            )));
        }
        if self.canny_low > self.canny_high {
            return Err(Error::InvalidConfig(format!(
                "canny_low ({}) exceeds canny_high ({})",
                self.canny_low, self.canny_high
            )));
        }
        Ok(())
    }
}

/// Web server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub upload_dir: PathBuf,
    /// Request body limit for uploads, in bytes.
    pub max_upload_bytes: usize,
    pub analysis: AnalysisConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 5000)),
            upload_dir: PathBuf::from("uploads"),
            max_upload_bytes: 16 * 1024 * 1024,
            analysis: AnalysisConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_upload_bytes == 0 {
            return Err(Error::InvalidConfig("max_upload_bytes must be positive".into()));
        }
        self.analysis.validate()
    }
}

/// Parse a TOML string into any of the config structs.
pub fn from_toml_str<T: for<'de> Deserialize<'de>>(text: &str) -> Result<T> {
    Ok(toml::from_str(text)?)
}

/// Read and parse a TOML config file.
pub fn from_file<T: for<'de> Deserialize<'de>>(path: impl AsRef<Path>) -> Result<T> {
    let text = std::fs::read_to_string(path.as_ref())?;
    from_toml_str(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_parameters() {
        let cfg = AnalysisConfig::default();
        assert_eq!(cfg.max_points, 1000);
        assert_eq!(cfg.max_edge_length, 10.0);
        assert_eq!(cfg.max_dimension, 2);
        assert_eq!((cfg.canny_low, cfg.canny_high), (100.0, 200.0));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg: ServerConfig = from_toml_str(
            r#"
            upload_dir = "/tmp/tda"

            [analysis]
            max_points = 250
            seed = 7
            "#,
        )
        .unwrap();

        assert_eq!(cfg.upload_dir, PathBuf::from("/tmp/tda"));
        assert_eq!(cfg.bind, ServerConfig::default().bind);
        assert_eq!(cfg.analysis.max_points, 250);
        assert_eq!(cfg.analysis.seed, Some(7));
        assert_eq!(cfg.analysis.max_edge_length, 10.0);
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut cfg = AnalysisConfig::default();
        cfg.max_points = 0;
        assert!(matches!(cfg.validate(), Err(Error::InvalidConfig(_))));

        let mut cfg = AnalysisConfig::default();
        cfg.max_edge_length = f64::NAN;
        assert!(cfg.validate().is_err());

        let mut cfg = AnalysisConfig::default();
        cfg.max_dimension = 4;
        assert!(cfg.validate().is_err());

        let mut cfg = AnalysisConfig::default();
        cfg.canny_low = 250.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = from_toml_str::<AnalysisConfig>("max_points = \"many\"").unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }
}
