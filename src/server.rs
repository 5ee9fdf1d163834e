//! Dashboard HTTP server.
//!
//! Serves the dashboard and attendance pages as server-rendered HTML, plus a
//! small JSON API over the same backend reads. Every page request drives a
//! fresh [`Dashboard`] from its query parameters, so the server itself holds
//! no per-user state.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/` | Dashboard page; `?sem=&course=&q=&type=` select and filter |
//! | `GET`  | `/attendance` | Attendance page |
//! | `GET`  | `/attendance/{altid}` | Class-by-class table for one course (HTML fragment) |
//! | `GET`  | `/api/semesters` | Semester list (JSON) |
//! | `GET`  | `/api/semesters/{sem}/subjects` | Subjects of a semester (JSON) |
//! | `GET`  | `/api/courses/{id}/documents` | Filtered document cards; `?q=&type=` (JSON) |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! JSON endpoints report failures as:
//!
//! ```json
//! { "error": { "code": "upstream", "message": "Error loading subjects. Please try again." } }
//! ```
//!
//! Error codes: `unauthorized` (401), `upstream` (502),
//! `unexpected_response` (502). HTML pages never fail: they render the
//! panel's error message instead.
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::attendance;
use crate::client::{HttpPortal, PortalApi};
use crate::config::Config;
use crate::dashboard::{Action, DashboardState};
use crate::error::{FetchError, INVALID_CREDENTIALS_MESSAGE, NOT_LOGGED_IN_MESSAGE};
use crate::filter::{self, DocFilter, FilterOption};
use crate::html;
use crate::models::{Semester, Subject};
use crate::render::{self, CardContext, DocumentCard};
use crate::runtime::Dashboard;

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
struct AppState {
    /// Card rendering settings derived from the configuration.
    cards: Arc<CardContext>,
    /// Backend access shared by all requests.
    api: Arc<dyn PortalApi>,
}

/// Starts the dashboard server against the configured backend.
///
/// Binds to `[server].bind` and runs until the process is terminated.
///
/// # Returns
///
/// Returns `Ok(())` when the server shuts down, or an error if the HTTP
/// client cannot be built or binding fails.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let api = Arc::new(HttpPortal::new(config)?);
    run_server_with_api(config, api).await
}

/// Starts the dashboard server with a caller-supplied [`PortalApi`].
///
/// # Example
///
/// ```rust,no_run
/// use portal_dash::client::HttpPortal;
/// use portal_dash::server::run_server_with_api;
/// use std::sync::Arc;
///
/// # async fn example(config: &portal_dash::config::Config) -> anyhow::Result<()> {
/// let api = Arc::new(HttpPortal::new(config)?);
/// run_server_with_api(config, api).await?;
/// # Ok(())
/// # }
/// ```
pub async fn run_server_with_api(config: &Config, api: Arc<dyn PortalApi>) -> anyhow::Result<()> {
    let state = AppState {
        cards: Arc::new(CardContext::from_config(config)),
        api,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(handle_dashboard))
        .route("/attendance", get(handle_attendance))
        .route("/attendance/{altid}", get(handle_course_attendance))
        .route("/api/semesters", get(handle_semesters))
        .route("/api/semesters/{sem}/subjects", get(handle_subjects))
        .route("/api/courses/{id}/documents", get(handle_documents))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    info!(bind = %config.server.bind, backend = %config.api.base_url, "dashboard server started");
    println!("Dashboard listening on http://{}", config.server.bind);

    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    /// Machine-readable error code (e.g., `"upstream"`).
    code: String,
    /// The message the matching dashboard panel shows.
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

/// Map a backend failure to a response. `failed` and `unexpected` are the
/// messages the matching dashboard panel shows for the same failure.
fn fetch_error(err: &FetchError, failed: &str, unexpected: &str) -> AppError {
    let (status, code, message) = match err {
        FetchError::NotLoggedIn => (
            StatusCode::UNAUTHORIZED,
            "unauthorized",
            NOT_LOGGED_IN_MESSAGE.to_string(),
        ),
        FetchError::InvalidCredentials => (
            StatusCode::UNAUTHORIZED,
            "unauthorized",
            INVALID_CREDENTIALS_MESSAGE.to_string(),
        ),
        FetchError::UnexpectedShape(_) => (
            StatusCode::BAD_GATEWAY,
            "unexpected_response",
            unexpected.to_string(),
        ),
        FetchError::MalformedJson => (
            StatusCode::BAD_GATEWAY,
            "unexpected_response",
            failed.to_string(),
        ),
        FetchError::Network(_) | FetchError::Status { .. } => {
            (StatusCode::BAD_GATEWAY, "upstream", failed.to_string())
        }
    };
    AppError {
        status,
        code: code.to_string(),
        message,
    }
}

// ============ GET /health ============

/// JSON response body for `GET /health`.
#[derive(Serialize)]
struct HealthResponse {
    /// Always `"ok"` when the server is running.
    status: String,
    /// The crate version from `Cargo.toml`.
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET / ============

/// Query parameters of the dashboard page.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub sem: Option<u32>,
    pub course: Option<i64>,
    pub q: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Replay a page request as user actions and return the settled state.
///
/// Selections are applied in page order (semester, subject, then search and
/// filter), each after the previous one's requests have completed.
pub async fn page_state(api: Arc<dyn PortalApi>, params: &PageParams) -> DashboardState {
    let mut dashboard = Dashboard::new(api);
    dashboard.dispatch(Action::Start);
    dashboard.settle().await;

    if let Some(sem) = params.sem {
        dashboard.dispatch(Action::SelectSemester(sem));
        dashboard.settle().await;

        if let Some(course) = params.course {
            dashboard.dispatch(Action::SelectSubject(Some(course)));
            dashboard.settle().await;
        }
    }
    if let Some(q) = &params.q {
        dashboard.dispatch(Action::SetQuery(q.clone()));
    }
    if let Some(kind) = &params.kind {
        dashboard.dispatch(Action::SetFilter(kind.clone()));
    }

    dashboard.state().clone()
}

async fn handle_dashboard(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Html<String> {
    let snapshot = page_state(Arc::clone(&state.api), &params).await;
    Html(html::dashboard_page(&snapshot, &state.cards))
}

// ============ GET /attendance ============

async fn handle_attendance(State(state): State<AppState>) -> Html<String> {
    let result = state.api.attendance().await;
    Html(html::base_page(
        "Attendance",
        &attendance::attendance_section(&result),
    ))
}

async fn handle_course_attendance(
    State(state): State<AppState>,
    Path(altid): Path<i64>,
) -> Html<String> {
    let result = state.api.course_attendance(altid).await;
    Html(attendance::records_table(&result))
}

// ============ JSON API ============

async fn handle_semesters(State(state): State<AppState>) -> Result<Json<Vec<Semester>>, AppError> {
    state
        .api
        .semesters()
        .await
        .map(Json)
        .map_err(|e| fetch_error(&e, render::SEMESTERS_FAILED, render::SEMESTERS_FAILED))
}

async fn handle_subjects(
    State(state): State<AppState>,
    Path(sem): Path<u32>,
) -> Result<Json<Vec<Subject>>, AppError> {
    state
        .api
        .subjects(sem)
        .await
        .map(Json)
        .map_err(|e| fetch_error(&e, render::SUBJECTS_FAILED, render::UNEXPECTED_RESPONSE))
}

#[derive(Debug, Deserialize)]
struct DocumentParams {
    #[serde(default)]
    q: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

/// JSON response body for `GET /api/courses/{id}/documents`.
#[derive(Serialize)]
struct DocumentsResponse {
    /// Type filter entries for the whole course, `all` first.
    types: Vec<FilterOption>,
    /// Cards that match the query and type filter.
    documents: Vec<DocumentCard>,
}

async fn handle_documents(
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
    Query(params): Query<DocumentParams>,
) -> Result<Json<DocumentsResponse>, AppError> {
    let docs = state
        .api
        .documents(course_id)
        .await
        .map_err(|e| {
            fetch_error(
                &e,
                render::DOCUMENTS_FAILED,
                render::UNEXPECTED_SERVER_RESPONSE,
            )
        })?;

    let types = filter::filter_options(&docs);
    let filter = filter::restrict_kind(
        DocFilter::new(&params.q, params.kind.as_deref().unwrap_or(filter::ALL)),
        &types,
    );
    let cards = state.cards.for_course(Some(course_id));
    let documents = filter::apply(&docs, &filter)
        .into_iter()
        .map(|d| cards.card(d))
        .collect();

    Ok(Json(DocumentsResponse { types, documents }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_codes() {
        let subjects = |e: &FetchError| {
            fetch_error(e, render::SUBJECTS_FAILED, render::UNEXPECTED_RESPONSE)
        };

        let e = subjects(&FetchError::NotLoggedIn);
        assert_eq!(e.status, StatusCode::UNAUTHORIZED);
        assert_eq!(e.message, "User not logged in");

        let e = subjects(&FetchError::UnexpectedShape("no subjects".into()));
        assert_eq!(e.code, "unexpected_response");
        assert_eq!(e.message, render::UNEXPECTED_RESPONSE);

        let e = subjects(&FetchError::Network("refused".into()));
        assert_eq!(e.status, StatusCode::BAD_GATEWAY);
        assert_eq!(e.message, render::SUBJECTS_FAILED);

        let e = subjects(&FetchError::MalformedJson);
        assert_eq!(e.code, "unexpected_response");
        assert_eq!(e.message, render::SUBJECTS_FAILED);
    }

    #[test]
    fn test_documents_shape_error_matches_panel() {
        let e = fetch_error(
            &FetchError::UnexpectedShape("data is not an array".into()),
            render::DOCUMENTS_FAILED,
            render::UNEXPECTED_SERVER_RESPONSE,
        );
        assert_eq!(e.code, "unexpected_response");
        assert_eq!(e.message, render::UNEXPECTED_SERVER_RESPONSE);
    }
}
