//! Request handlers: upload form, upload, result page, JSON result.

use std::path::PathBuf;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;

use super::views::{render_template, IndexView, ResultView};
use super::AppState;
use crate::analysis::{self, Analysis};
use crate::information::DimensionSummary;
use crate::plot::PlotData;

/// Form field carrying the image
pub const FILE_FIELD: &str = "file";

/// Reduce a client-supplied filename to a safe basename, the way werkzeug's
/// `secure_filename` does.
///
/// Directory components are dropped. ASCII whitespace becomes `_`, and any
/// other character outside `[A-Za-z0-9._-]` is removed, non-ASCII included.
/// Dots and underscores are trimmed from both ends, so `日本.png` becomes `png`.
pub fn secure_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or("");
    let cleaned: String = base
        .chars()
        .filter_map(|c| match c {
            c if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') => Some(c),
            c if c.is_ascii_whitespace() => Some('_'),
            _ => None,
        })
        .collect();
    cleaned.trim_matches(['.', '_']).to_string()
}

fn is_safe_name(name: &str) -> bool {
    !name.is_empty() && secure_filename(name) == name
}

/// `GET /`
pub async fn index() -> Response {
    render_template(IndexView)
}

/// `POST /`: store the uploaded file and redirect to its result page
pub async fn upload(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "malformed upload");
                return (StatusCode::BAD_REQUEST, e.body_text()).into_response();
            }
        };
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = secure_filename(field.file_name().unwrap_or(""));
        if filename.is_empty() {
            tracing::warn!("upload without a usable filename");
            return Redirect::to("/").into_response();
        }

        let bytes = match field.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(filename = %filename, error = %e, "failed to read upload");
                return (e.status(), e.body_text()).into_response();
            }
        };

        let path = state.upload_dir().join(&filename);
        if let Err(e) = tokio::fs::write(&path, &bytes).await {
            tracing::error!(path = %path.display(), error = %e, "failed to store upload");
            return (StatusCode::INTERNAL_SERVER_ERROR, format!("An error occurred: {e}")).into_response();
        }

        tracing::info!(filename = %filename, bytes = bytes.len(), "stored upload");
        return Redirect::to(&format!("/result/{filename}")).into_response();
    }

    tracing::warn!(field = FILE_FIELD, "upload without the file field");
    Redirect::to("/").into_response()
}

/// Why a stored upload could not be turned into a result
enum Failure {
    NotFound,
    Analysis(String),
}

impl Failure {
    fn status(&self) -> StatusCode {
        match self {
            Failure::NotFound => StatusCode::NOT_FOUND,
            Failure::Analysis(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            Failure::NotFound => "Image not found".to_string(),
            Failure::Analysis(e) => format!("An error occurred: {e}"),
        }
    }
}

fn resolve(state: &AppState, filename: &str) -> Result<PathBuf, Failure> {
    if !is_safe_name(filename) {
        return Err(Failure::NotFound);
    }
    let path = state.upload_dir().join(filename);
    if path.is_file() {
        Ok(path)
    } else {
        Err(Failure::NotFound)
    }
}

/// Run the pipeline on a stored upload off the async runtime
async fn analyze_upload(state: &AppState, filename: &str) -> Result<Analysis, Failure> {
    let path = resolve(state, filename)?;
    let config = state.config().analysis.clone();

    let outcome = tokio::task::spawn_blocking(move || analysis::run(&path, &config)).await;
    match outcome {
        Ok(Ok(analysis)) => Ok(analysis),
        Ok(Err(e)) => {
            tracing::error!(filename = %filename, error = %e, "error processing image");
            Err(Failure::Analysis(e.to_string()))
        }
        Err(e) => {
            tracing::error!(filename = %filename, error = %e, "analysis task failed");
            Err(Failure::Analysis(e.to_string()))
        }
    }
}

/// `GET /result/{filename}`
pub async fn result(State(state): State<AppState>, Path(filename): Path<String>) -> Response {
    let analysis = match analyze_upload(&state, &filename).await {
        Ok(analysis) => analysis,
        Err(f) => return (f.status(), f.message()).into_response(),
    };

    match ResultView::build(&filename, &analysis) {
        Ok(view) => render_template(view),
        Err(e) => {
            tracing::error!(filename = %filename, error = %e, "error rendering result");
            let f = Failure::Analysis(e.to_string());
            (f.status(), f.message()).into_response()
        }
    }
}

/// JSON body of `GET /api/result/{filename}`
#[derive(Debug, Serialize)]
pub struct ResultResponse {
    pub filename: String,
    pub n_points: usize,
    pub elapsed_seconds: f64,
    pub cpu_percent: f64,
    pub betti_numbers: Vec<usize>,
    pub summaries: Vec<DimensionSummary>,
    pub plot_data: PlotData,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// `GET /api/result/{filename}`
pub async fn api_result(State(state): State<AppState>, Path(filename): Path<String>) -> Response {
    match analyze_upload(&state, &filename).await {
        Ok(analysis) => {
            let report = &analysis.report;
            Json(ResultResponse {
                n_points: report.n_points,
                elapsed_seconds: report.elapsed.as_secs_f64(),
                cpu_percent: report.cpu_percent,
                betti_numbers: report.betti.as_slice().to_vec(),
                summaries: report.summaries.clone(),
                plot_data: PlotData::from_analysis(&analysis),
                filename,
            })
            .into_response()
        }
        Err(f) => (f.status(), Json(ErrorResponse { error: f.message() })).into_response(),
    }
}
