//! Plot Module: Presentation of Persistence Results
//!
//! `PlotData` is the JSON contract shared by the result page and the
//! `--json` CLI output. The `svg` submodule draws the six charts:
//!
//! ```text
//! ┌────────────────┬────────────────┬─────────────────────┐
//! │ Original Image │ Point Cloud    │ Persistence Barcode │
//! ├────────────────┼────────────────┼─────────────────────┤
//! │ Persistence    │ Betti Numbers  │ Performance Metrics │
//! │ Diagram        │                │                     │
//! └────────────────┴────────────────┴─────────────────────┘
//! ```

pub mod svg;

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{GrayImage, ImageFormat};
use serde::Serialize;

use crate::analysis::{Analysis, TopologyReport};
use crate::error::{Error, Result};
use crate::preprocess::PointCloud;

pub use svg::Size;

/// One bar of the persistence barcode; `end` is `None` for essential classes
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BarcodeBar {
    pub dimension: usize,
    pub start: f64,
    pub end: Option<f64>,
}

/// One point of the persistence diagram; `death` is `None` for essential classes
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DiagramPoint {
    pub dimension: usize,
    pub birth: f64,
    pub death: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BettiBar {
    pub dimension: usize,
    pub betti: usize,
}

/// Chart-ready view of an analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlotData {
    /// `[row, col]` per point
    pub point_cloud: Vec<[f64; 2]>,
    pub barcode: Vec<BarcodeBar>,
    pub diagram: Vec<DiagramPoint>,
    pub betti: Vec<BettiBar>,
}

impl PlotData {
    pub fn prepare(cloud: &PointCloud, report: &TopologyReport) -> Self {
        let pairs = &report.diagram.pairs;
        Self {
            point_cloud: cloud.to_vec(),
            barcode: pairs
                .iter()
                .map(|p| BarcodeBar {
                    dimension: p.dimension,
                    start: p.birth,
                    end: p.finite_death(),
                })
                .collect(),
            diagram: pairs
                .iter()
                .map(|p| DiagramPoint {
                    dimension: p.dimension,
                    birth: p.birth,
                    death: p.finite_death(),
                })
                .collect(),
            betti: report
                .betti
                .as_slice()
                .iter()
                .enumerate()
                .map(|(dimension, &betti)| BettiBar { dimension, betti })
                .collect(),
        }
    }

    pub fn from_analysis(analysis: &Analysis) -> Self {
        Self::prepare(analysis.cloud(), &analysis.report)
    }
}

/// PNG-encode a grayscale image and base64 it for a data URI
pub fn png_base64(gray: &GrayImage) -> Result<String> {
    let mut buf = Cursor::new(Vec::new());
    gray.write_to(&mut buf, ImageFormat::Png).map_err(Error::ImageEncode)?;
    Ok(STANDARD.encode(buf.into_inner()))
}

/// The five data charts of an analysis, rendered individually
#[derive(Debug, Clone)]
pub struct Charts {
    pub point_cloud: String,
    pub barcode: String,
    pub diagram: String,
    pub betti: String,
    pub metrics: String,
}

impl Charts {
    pub fn render(analysis: &Analysis, data: &PlotData, size: Size) -> Self {
        let cloud = analysis.cloud();
        Self {
            point_cloud: svg::point_cloud(data, cloud.width, cloud.height, size),
            barcode: svg::barcode(data, size),
            diagram: svg::diagram(data, size),
            betti: svg::betti_bars(data, size),
            metrics: svg::metrics_bars(&analysis.report, size),
        }
    }
}

/// Six-panel summary figure as one SVG document
pub fn render_figure(analysis: &Analysis) -> Result<String> {
    let size = Size::default();
    let data = PlotData::from_analysis(analysis);
    let gray = analysis.grayscale();
    let original = svg::original_image(&png_base64(gray)?, gray.width(), gray.height(), size);
    let charts = Charts::render(analysis, &data, size);

    let panels = [
        original,
        charts.point_cloud,
        charts.barcode,
        charts.diagram,
        charts.betti,
        charts.metrics,
    ];

    let (cols, rows) = (3usize, 2usize);
    let (w, h) = (size.width * cols as f64, size.height * rows as f64);
    let mut out = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    );
    for (i, panel) in panels.iter().enumerate() {
        let x = size.width * (i % cols) as f64;
        let y = size.height * (i / cols) as f64;
        out.push_str(&format!(r#"<g transform="translate({x} {y})">{panel}</g>"#));
    }
    out.push_str("</svg>");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::run_gray;
    use crate::config::AnalysisConfig;
    use image::Luma;

    fn stripes() -> GrayImage {
        GrayImage::from_fn(40, 40, |x, _| if (10..30).contains(&x) { Luma([200]) } else { Luma([10]) })
    }

    fn analysis() -> Analysis {
        let cfg = AnalysisConfig {
            seed: Some(5),
            max_points: 60,
            ..AnalysisConfig::default()
        };
        run_gray(stripes(), &cfg).unwrap()
    }

    #[test]
    fn test_plot_data_mirrors_report() {
        let a = analysis();
        let data = PlotData::from_analysis(&a);

        assert_eq!(data.point_cloud.len(), a.cloud().len());
        assert_eq!(data.barcode.len(), a.report.diagram.len());
        assert_eq!(data.diagram.len(), a.report.diagram.len());
        assert_eq!(data.betti.len(), a.report.betti.as_slice().len());
        assert_eq!(
            data.barcode.iter().filter(|b| b.end.is_none()).count(),
            a.report.betti.total()
        );
    }

    #[test]
    fn test_json_uses_null_for_infinity() {
        let a = analysis();
        let json = serde_json::to_value(PlotData::from_analysis(&a)).unwrap();

        let first = &json["barcode"][0];
        assert!(first["dimension"].is_u64());
        assert!(json["diagram"]
            .as_array()
            .unwrap()
            .iter()
            .any(|p| p["death"].is_null()));
        assert_eq!(json["betti"][0]["dimension"], 0);
    }

    #[test]
    fn test_png_round_trip() {
        let gray = stripes();
        let encoded = png_base64(&gray).unwrap();
        let bytes = STANDARD.decode(encoded).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_luma8();
        assert_eq!(decoded, gray);
    }

    #[test]
    fn test_figure_has_six_panels() {
        let svg = render_figure(&analysis()).unwrap();

        assert_eq!(svg.matches("<g transform=").count(), 6);
        for title in [
            "Original Image",
            "Point Cloud",
            "Persistence Barcode",
            "Persistence Diagram",
            "Betti Numbers",
            "Performance Metrics",
        ] {
            assert!(svg.contains(title), "missing panel {title}");
        }
    }

    #[test]
    fn test_metrics_panel_shows_time_and_cpu() {
        let a = analysis();
        let svg = svg::metrics_bars(&a.report, Size::default());

        assert!(svg.contains(">Time (s)</text>"));
        assert!(svg.contains(">CPU Usage (%)</text>"));
        assert!(svg.contains(&format!("{} simplices", a.report.total_simplices())));
    }
}
