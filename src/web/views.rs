//! View models for the two HTML pages.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::analysis::Analysis;
use crate::error::Result;
use crate::information::DimensionSummary;
use crate::plot::{png_base64, BettiBar, Charts, PlotData, Size};

/// Rows beyond this are left out of the pairs table (the charts still show them)
pub const MAX_TABLE_ROWS: usize = 200;

/// Upload form
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexView;

/// One row of the persistence pairs table
pub struct PairRow {
    pub dimension: usize,
    pub birth: String,
    pub death: String,
    pub persistence: String,
}

/// One row of the per-dimension summary table
pub struct SummaryRow {
    pub dimension: usize,
    pub finite: usize,
    pub essential: usize,
    pub total_persistence: String,
    pub max_persistence: String,
    pub entropy: String,
}

impl From<&DimensionSummary> for SummaryRow {
    fn from(s: &DimensionSummary) -> Self {
        Self {
            dimension: s.dimension,
            finite: s.finite,
            essential: s.essential,
            total_persistence: format!("{:.3}", s.total_persistence),
            max_persistence: format!("{:.3}", s.max_persistence),
            entropy: format!("{:.4}", s.entropy),
        }
    }
}

/// Result page for one analysed upload
#[derive(Template)]
#[template(path = "result.html")]
pub struct ResultView {
    pub filename: String,
    pub image_base64: String,
    pub charts: Charts,
    pub betti: Vec<BettiBar>,
    pub summaries: Vec<SummaryRow>,
    pub pairs: Vec<PairRow>,
    pub total_pairs: usize,
    pub n_points: usize,
    pub elapsed: String,
    pub cpu_percent: String,
    /// `PlotData` as JSON, safe to inline in a `<script>` element
    pub plot_json: String,
}

impl ResultView {
    pub fn build(filename: &str, analysis: &Analysis) -> Result<Self> {
        let report = &analysis.report;
        let data = PlotData::from_analysis(analysis);
        let charts = Charts::render(analysis, &data, Size::new(460.0, 360.0));

        let pairs = report
            .diagram
            .pairs
            .iter()
            .take(MAX_TABLE_ROWS)
            .map(|p| PairRow {
                dimension: p.dimension,
                birth: format!("{:.3}", p.birth),
                death: p.finite_death().map_or_else(|| "inf".to_string(), |d| format!("{d:.3}")),
                persistence: p.finite_death().map_or_else(|| "inf".to_string(), |d| format!("{:.3}", d - p.birth)),
            })
            .collect();

        Ok(Self {
            filename: filename.to_string(),
            image_base64: png_base64(analysis.grayscale())?,
            charts,
            betti: data.betti.clone(),
            summaries: report.summaries.iter().map(SummaryRow::from).collect(),
            pairs,
            total_pairs: report.diagram.len(),
            n_points: report.n_points,
            elapsed: format!("{:.3}", report.elapsed.as_secs_f64()),
            cpu_percent: format!("{:.1}", report.cpu_percent),
            plot_json: script_safe_json(&data),
        })
    }
}

/// Serialize for embedding in `<script type="application/json">`
fn script_safe_json(data: &PlotData) -> String {
    // PlotData holds only numbers, so serialization cannot fail
    serde_json::to_string(data)
        .unwrap_or_else(|_| "null".to_string())
        .replace("</", "<\\/")
}

/// Render a template, falling back to a plain 500 on failure
pub fn render_template<T: Template>(template: T) -> Response {
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Template rendering failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Template rendering error").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::run_gray;
    use crate::config::AnalysisConfig;
    use image::{GrayImage, Luma};

    fn analysis() -> Analysis {
        let gray = GrayImage::from_fn(32, 32, |x, y| {
            if (8..24).contains(&x) && (8..24).contains(&y) { Luma([240]) } else { Luma([0]) }
        });
        let cfg = AnalysisConfig { seed: Some(1), ..AnalysisConfig::default() };
        run_gray(gray, &cfg).unwrap()
    }

    #[test]
    fn test_index_has_upload_form() {
        let html = IndexView.render().unwrap();
        assert!(html.contains(r#"enctype="multipart/form-data""#));
        assert!(html.contains(r#"name="file""#));
    }

    #[test]
    fn test_result_page_sections() {
        let a = analysis();
        let html = ResultView::build("square.png", &a).unwrap().render().unwrap();

        assert!(html.contains("square.png"));
        assert!(html.contains("data:image/png;base64,"));
        assert!(html.contains("Persistence Barcode"));
        assert!(html.contains("Persistence Diagram"));
        assert!(html.contains(r#"<script type="application/json" id="plot-data">"#));
    }

    #[test]
    fn test_filename_is_escaped() {
        let a = analysis();
        let html = ResultView::build("<b>x</b>.png", &a).unwrap().render().unwrap();
        assert!(!html.contains("<b>x</b>"));
    }

    #[test]
    fn test_script_json_cannot_close_tag() {
        let data = PlotData::default();
        assert!(!script_safe_json(&data).contains("</"));
    }
}
