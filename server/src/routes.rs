use actix_web::{get, post, web, HttpResponse, Responder};
use serde::Deserialize;
use tracing::{error, info};
use vitae_core::{AppConfig, Credentials};
use vitae_export::CsvExporter;
use vitae_scanner::{OutcomeRow, ScanError, SearchOrchestrator};

/// Shared state handed to every request.
pub struct AppState {
    pub config: AppConfig,
    pub credentials: Credentials,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub max_profiles: Option<u32>,
}

#[get("/health")]
pub async fn health() -> impl Responder {
    web::Json(serde_json::json!({ "status": "ok", "service": "vitae-server" }))
}

/// Run one search end to end and return the aggregated report.
///
/// The whole pipeline runs inline: collection, detection, export. Upstream
/// failures (login, search UI) map to 502, an empty collection to 404, and
/// anything else to 500.
#[post("/search")]
pub async fn search(
    payload: web::Json<SearchRequest>,
    state: web::Data<AppState>,
) -> actix_web::Result<impl Responder> {
    let req = payload.into_inner();
    let query = req.query.trim().to_string();
    if query.is_empty() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "error": "query must not be empty"
        })));
    }
    let max_profiles = req
        .max_profiles
        .unwrap_or(state.config.search.max_profiles_default) as usize;

    info!(query, max_profiles, "search request accepted");

    let orchestrator = SearchOrchestrator::new(state.config.clone(), state.credentials.clone());
    let report = match orchestrator.run_search(&query, max_profiles).await {
        Ok(report) => report,
        Err(e @ (ScanError::Auth(_) | ScanError::SearchUiUnavailable(_))) => {
            error!(query, "search run failed upstream: {e}");
            return Ok(HttpResponse::BadGateway()
                .json(serde_json::json!({ "error": e.to_string() })));
        }
        Err(e) => {
            error!(query, "search run failed: {e}");
            return Ok(HttpResponse::InternalServerError()
                .json(serde_json::json!({ "error": e.to_string() })));
        }
    };

    if report.profiles_checked() == 0 {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "error": "no profiles found",
            "query": query
        })));
    }

    let exporter = CsvExporter::new(state.config.export.output_dir.clone());
    let csv_path = match exporter.export(&report) {
        Ok(path) => path,
        Err(e) => {
            error!(query, "export failed: {e}");
            return Ok(HttpResponse::InternalServerError()
                .json(serde_json::json!({ "error": e.to_string() })));
        }
    };

    let preview: Vec<OutcomeRow> = report.rows().into_iter().take(10).collect();
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "completed",
        "query": report.query,
        "profiles_checked": report.profiles_checked(),
        "resumes_found": report.resumes_found(),
        "csv_path": csv_path.display().to_string(),
        "results_preview": preview
    })))
}
