//! Backend access.
//!
//! [`PortalApi`] is the seam between the dashboard and the network. The
//! shipped implementation, [`HttpPortal`], issues plain `GET`s with
//! `reqwest` and hands the decoded JSON to the adapters in [`crate::api`].
//! Tests and embedders can supply their own implementation.
//!
//! # Errors
//!
//! Every method returns a [`FetchError`]; callers decide which message to
//! show. No request is retried.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::api::{self, ApiVersion, Endpoints};
use crate::config::Config;
use crate::error::FetchError;
use crate::models::{AttendanceOverview, AttendanceRecord, Document, Semester, Subject};

/// Read access to the student portal backend.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use portal_dash::client::PortalApi;
/// use portal_dash::error::FetchError;
/// use portal_dash::models::*;
///
/// struct Offline;
///
/// #[async_trait]
/// impl PortalApi for Offline {
///     async fn semesters(&self) -> Result<Vec<Semester>, FetchError> { Ok(vec![]) }
///     async fn subjects(&self, _: u32) -> Result<Vec<Subject>, FetchError> { Ok(vec![]) }
///     async fn documents(&self, _: i64) -> Result<Vec<Document>, FetchError> { Ok(vec![]) }
///     async fn attendance(&self) -> Result<AttendanceOverview, FetchError> {
///         Ok(AttendanceOverview::default())
///     }
///     async fn course_attendance(&self, _: i64) -> Result<Vec<AttendanceRecord>, FetchError> {
///         Ok(vec![])
///     }
/// }
/// ```
#[async_trait]
pub trait PortalApi: Send + Sync {
    /// Semesters in display order, keyed by 1-based position.
    async fn semesters(&self) -> Result<Vec<Semester>, FetchError>;

    /// Subjects of the semester at `semester` (a key from [`semesters`](PortalApi::semesters)).
    async fn subjects(&self, semester: u32) -> Result<Vec<Subject>, FetchError>;

    /// All documents of a course, flattened across weeks.
    async fn documents(&self, course_id: i64) -> Result<Vec<Document>, FetchError>;

    /// Overall attendance and per-course summary rows.
    async fn attendance(&self) -> Result<AttendanceOverview, FetchError>;

    /// Class-by-class attendance for one course.
    async fn course_attendance(&self, altid: i64) -> Result<Vec<AttendanceRecord>, FetchError>;
}

/// [`PortalApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpPortal {
    client: reqwest::Client,
    endpoints: Endpoints,
}

impl HttpPortal {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoints: Endpoints::new(&config.api.base_url, config.api.version),
        })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    fn version(&self) -> ApiVersion {
        self.endpoints.version()
    }

    /// `GET` a URL and decode the body as JSON.
    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        debug!(url, "GET");
        let resp = self.client.get(url).send().await.map_err(|e| {
            warn!(url, error = %e, "request failed");
            FetchError::from(e)
        })?;

        let status = resp.status();
        let body = resp.bytes().await?;

        if !status.is_success() {
            let detail = error_detail(&body);
            warn!(url, status = status.as_u16(), detail = ?detail, "backend returned an error");
            return Err(FetchError::from_status(status.as_u16(), detail));
        }

        serde_json::from_slice(&body).map_err(|e| {
            warn!(url, error = %e, "response is not JSON");
            FetchError::MalformedJson
        })
    }
}

/// Pull a human readable message out of an error body.
///
/// FastAPI puts it in `detail`; the standard envelope uses `error`.
fn error_detail(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    ["detail", "error"]
        .iter()
        .filter_map(|k| value.get(*k))
        .find_map(|v| v.as_str().map(str::to_string))
}

#[async_trait]
impl PortalApi for HttpPortal {
    async fn semesters(&self) -> Result<Vec<Semester>, FetchError> {
        let body = self.get_json(&self.endpoints.semesters()).await?;
        api::parse_semesters(self.version(), &body)
    }

    async fn subjects(&self, semester: u32) -> Result<Vec<Subject>, FetchError> {
        let body = self.get_json(&self.endpoints.subjects(semester)).await?;
        api::parse_subjects(self.version(), &body)
    }

    async fn documents(&self, course_id: i64) -> Result<Vec<Document>, FetchError> {
        let body = self.get_json(&self.endpoints.documents(course_id)).await?;
        api::parse_documents(self.version(), &body)
    }

    async fn attendance(&self) -> Result<AttendanceOverview, FetchError> {
        let overall_url = self.endpoints.attendance_overall();

        let Some(courses_url) = self.endpoints.attendance_courses() else {
            let body = self.get_json(&overall_url).await?;
            return api::parse_overall(self.version(), &body);
        };

        // Legacy: percentage and rows are separate requests. A missing
        // percentage still leaves the table usable.
        let (overall, courses) = tokio::join!(
            self.get_json(&overall_url),
            self.get_json(&courses_url)
        );

        let overall_percentage = match overall.and_then(|b| api::parse_overall(self.version(), &b)) {
            Ok(o) => o.overall_percentage,
            Err(e) => {
                warn!(error = %e, "overall attendance unavailable");
                None
            }
        };
        let courses = api::parse_course_summaries(&courses?)?;

        Ok(AttendanceOverview {
            overall_percentage,
            courses,
        })
    }

    async fn course_attendance(&self, altid: i64) -> Result<Vec<AttendanceRecord>, FetchError> {
        let body = self.get_json(&self.endpoints.attendance_course(altid)).await?;
        api::parse_course_records(self.version(), &body)
    }
}
