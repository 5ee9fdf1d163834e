//! API contract: endpoint paths and the payload adapters.
//!
//! The backend exposes two namespaces with different envelopes:
//!
//! | Version | Prefix | Success marker |
//! |---------|--------|----------------|
//! | `legacy` | `/api` | `"status": "success"` |
//! | `v1` | `/api/v1` | `"status": "success"` or `"success": true` |
//!
//! Within `v1` the semester routes answer `{status, data, errors}` while the
//! course-content routes answer `{success, data, status_code}`, so either
//! marker is accepted there.
//!
//! Field naming also drifted between the two (`Subject` vs `subject`,
//! `Total Classes` vs `total_classes`). The adapters in this module accept
//! either spelling and produce the canonical types from [`crate::models`];
//! nothing downstream looks at wire JSON.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::FetchError;
use crate::models::{
    AttendanceOverview, AttendanceRecord, CourseAttendance, Document, Semester, Subject, Week,
};

/// Which backend namespace to talk to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiVersion {
    #[default]
    Legacy,
    V1,
}

impl ApiVersion {
    pub fn prefix(self) -> &'static str {
        match self {
            ApiVersion::Legacy => "/api",
            ApiVersion::V1 => "/api/v1",
        }
    }
}

impl std::fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiVersion::Legacy => write!(f, "legacy"),
            ApiVersion::V1 => write!(f, "v1"),
        }
    }
}

/// What a document link should do when followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocAction {
    View,
    Download,
}

impl DocAction {
    fn as_str(self) -> &'static str {
        match self {
            DocAction::View => "view",
            DocAction::Download => "download",
        }
    }
}

/// URL builder for one backend namespace.
#[derive(Debug, Clone)]
pub struct Endpoints {
    base_url: String,
    version: ApiVersion,
}

impl Endpoints {
    pub fn new(base_url: &str, version: ApiVersion) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            version,
        }
    }

    pub fn version(&self) -> ApiVersion {
        self.version
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, self.version.prefix(), path)
    }

    pub fn semesters(&self) -> String {
        self.url("/sem")
    }

    pub fn subjects(&self, semester_key: u32) -> String {
        self.url(&format!("/sem/{}/course", semester_key))
    }

    pub fn documents(&self, course_id: i64) -> String {
        self.url(&format!("/course/{}/docs", course_id))
    }

    /// Legacy document route, keyed by the module's `view_id`.
    pub fn document_action(&self, view_id: i64, action: DocAction) -> String {
        self.url(&format!("/doc/{}?action={}", view_id, action.as_str()))
    }

    /// Versioned document route. Documents are looked up by `doc_id` within
    /// their course, and the router sits under an extra `/api` segment.
    pub fn course_document(&self, course_id: i64, doc_id: i64, action: DocAction) -> String {
        self.url(&format!(
            "/api/course/{}/doc?doc_id={}&action={}",
            course_id,
            doc_id,
            action.as_str()
        ))
    }

    pub fn attendance_overall(&self) -> String {
        match self.version {
            ApiVersion::Legacy => self.url("/att/"),
            ApiVersion::V1 => self.url("/attendance/overall"),
        }
    }

    /// Per-course summary. The versioned API folds these rows into the
    /// overall response, so there is no separate endpoint.
    pub fn attendance_courses(&self) -> Option<String> {
        match self.version {
            ApiVersion::Legacy => Some(self.url("/att/courses")),
            ApiVersion::V1 => None,
        }
    }

    pub fn attendance_course(&self, altid: i64) -> String {
        match self.version {
            ApiVersion::Legacy => self.url(&format!("/att/course/{}", altid)),
            ApiVersion::V1 => self.url(&format!("/attendance/course/{}", altid)),
        }
    }
}

// ============ Envelopes ============

/// Check the success marker and return the `data` payload.
fn success_data(version: ApiVersion, body: &Value) -> Result<&Value, FetchError> {
    let obj = body
        .as_object()
        .ok_or_else(|| FetchError::UnexpectedShape("response is not a JSON object".into()))?;

    let ok = match version {
        ApiVersion::Legacy => obj.get("status").and_then(Value::as_str) == Some("success"),
        ApiVersion::V1 => {
            obj.get("success").and_then(Value::as_bool) == Some(true)
                || obj.get("status").and_then(Value::as_str) == Some("success")
        }
    };
    if !ok {
        return Err(FetchError::UnexpectedShape(format!(
            "missing {} success marker",
            version
        )));
    }

    match obj.get("data") {
        Some(Value::Null) | None => Err(FetchError::UnexpectedShape("missing data".into())),
        Some(data) => Ok(data),
    }
}

/// `data` without a success marker check; legacy list endpoints only ever
/// looked at the payload.
fn bare_data(body: &Value) -> Option<&Value> {
    body.get("data").filter(|v| !v.is_null())
}

fn array<'a>(value: &'a Value, what: &str) -> Result<&'a Vec<Value>, FetchError> {
    value
        .as_array()
        .ok_or_else(|| FetchError::UnexpectedShape(format!("{} is not an array", what)))
}

// ============ Semesters / subjects / documents ============

#[derive(Deserialize)]
struct WireSemester {
    semester: String,
}

#[derive(Deserialize)]
struct WireSubject {
    id: i64,
    name: String,
}

#[derive(Deserialize)]
struct WireDocument {
    #[serde(default)]
    doc_name: Option<String>,
    #[serde(default)]
    module: Option<String>,
    #[serde(default, rename = "mod")]
    kind: Option<String>,
    #[serde(default)]
    view_id: Option<i64>,
    #[serde(default)]
    doc_id: Option<i64>,
    #[serde(default)]
    doc_url: Option<String>,
    #[serde(default)]
    time: Option<i64>,
}

impl From<WireDocument> for Document {
    fn from(w: WireDocument) -> Self {
        Document {
            doc_name: w.doc_name,
            module: w.module,
            kind: w.kind,
            view_id: w.view_id,
            doc_id: w.doc_id,
            doc_url: w.doc_url,
            time: w.time,
        }
    }
}

fn from_value<T: for<'de> Deserialize<'de>>(value: &Value, what: &str) -> Result<T, FetchError> {
    T::deserialize(value).map_err(|e| FetchError::UnexpectedShape(format!("{}: {}", what, e)))
}

/// Adapt a semester list. Keys are assigned from position, starting at 1.
///
/// Legacy responses without `data` are treated as an empty list.
pub fn parse_semesters(version: ApiVersion, body: &Value) -> Result<Vec<Semester>, FetchError> {
    let data = match version {
        ApiVersion::Legacy => match bare_data(body) {
            Some(data) => data,
            None => return Ok(Vec::new()),
        },
        ApiVersion::V1 => success_data(version, body)?,
    };

    array(data, "semesters")?
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let wire: WireSemester = from_value(item, "semester")?;
            Ok(Semester {
                key: idx as u32 + 1,
                name: wire.semester,
            })
        })
        .collect()
}

/// Adapt a subject list. `data.subjects` must be present.
pub fn parse_subjects(version: ApiVersion, body: &Value) -> Result<Vec<Subject>, FetchError> {
    let data = success_data(version, body)?;
    let subjects = data
        .get("subjects")
        .ok_or_else(|| FetchError::UnexpectedShape("missing data.subjects".into()))?;

    array(subjects, "data.subjects")?
        .iter()
        .map(|item| {
            let wire: WireSubject = from_value(item, "subject")?;
            Ok(Subject {
                id: wire.id,
                name: wire.name,
            })
        })
        .collect()
}

/// Adapt the week-grouped document list.
pub fn parse_weeks(version: ApiVersion, body: &Value) -> Result<Vec<Week>, FetchError> {
    let data = success_data(version, body)?;

    array(data, "data")?
        .iter()
        .map(|week| {
            let title = week.get("week").and_then(Value::as_str).map(str::to_string);
            // A week whose `docs` is missing or not a list contributes nothing.
            let docs = match week.get("docs").and_then(Value::as_array) {
                Some(items) => items
                    .iter()
                    .map(|d| from_value::<WireDocument>(d, "document").map(Document::from))
                    .collect::<Result<Vec<_>, _>>()?,
                None => Vec::new(),
            };
            Ok(Week { title, docs })
        })
        .collect()
}

/// Flatten weeks into one list, keeping week order and in-week order.
pub fn flatten_weeks(weeks: Vec<Week>) -> Vec<Document> {
    weeks.into_iter().flat_map(|w| w.docs).collect()
}

/// [`parse_weeks`] followed by [`flatten_weeks`].
pub fn parse_documents(version: ApiVersion, body: &Value) -> Result<Vec<Document>, FetchError> {
    parse_weeks(version, body).map(flatten_weeks)
}

// ============ Attendance ============

/// First non-null value among `keys`, legacy spelling listed first.
fn pick<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find(|v| !v.is_null())
}

fn lenient_i64(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn lenient_f64(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse().ok(),
        _ => None,
    }
}

fn lenient_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn course_row(item: &Value) -> Result<CourseAttendance, FetchError> {
    let obj = item
        .as_object()
        .ok_or_else(|| FetchError::UnexpectedShape("attendance row is not an object".into()))?;

    Ok(CourseAttendance {
        subject: lenient_string(pick(obj, &["Subject", "subject"])),
        total_classes: lenient_i64(pick(
            obj,
            &["Total Classes", "Total_Classes", "total_classes"],
        )),
        present: lenient_i64(pick(obj, &["Present", "present"])),
        absent: lenient_i64(pick(obj, &["Absent", "absent"])),
        percentage: lenient_f64(pick(obj, &["Percentage", "percentage"])),
        altid: lenient_i64(obj.get("altid")),
    })
}

fn class_record(item: &Value) -> Result<AttendanceRecord, FetchError> {
    let obj = item
        .as_object()
        .ok_or_else(|| FetchError::UnexpectedShape("attendance record is not an object".into()))?;

    Ok(AttendanceRecord {
        class_no: lenient_string(pick(obj, &["Class No", "class_no"])),
        date: lenient_string(pick(obj, &["Date", "date"])),
        time: lenient_string(pick(obj, &["Time", "time"])),
        status: lenient_string(pick(obj, &["Status", "status"])),
    })
}

/// Adapt the overall attendance response.
///
/// Legacy responses carry only the percentage (as a string); the course rows
/// come from a second request, see [`parse_course_summaries`].
pub fn parse_overall(version: ApiVersion, body: &Value) -> Result<AttendanceOverview, FetchError> {
    match version {
        ApiVersion::Legacy => Ok(AttendanceOverview {
            overall_percentage: lenient_f64(bare_data(body)),
            courses: Vec::new(),
        }),
        ApiVersion::V1 => {
            let data = success_data(version, body)?;
            let overall_percentage = data.get("overall_percentage").and_then(Value::as_f64);
            let courses = match data.get("records").and_then(Value::as_array) {
                Some(rows) => rows.iter().map(course_row).collect::<Result<Vec<_>, _>>()?,
                None => Vec::new(),
            };
            Ok(AttendanceOverview {
                overall_percentage,
                courses,
            })
        }
    }
}

/// Adapt the legacy per-course summary list (`/att/courses`).
pub fn parse_course_summaries(body: &Value) -> Result<Vec<CourseAttendance>, FetchError> {
    match bare_data(body) {
        Some(data) => array(data, "data")?.iter().map(course_row).collect(),
        None => Ok(Vec::new()),
    }
}

/// Adapt one course's class-by-class attendance.
pub fn parse_course_records(
    version: ApiVersion,
    body: &Value,
) -> Result<Vec<AttendanceRecord>, FetchError> {
    let rows = match version {
        ApiVersion::Legacy => bare_data(body).and_then(Value::as_array),
        ApiVersion::V1 => success_data(version, body)?
            .get("attendance")
            .and_then(Value::as_array),
    };
    match rows {
        Some(rows) => rows.iter().map(class_record).collect(),
        None => Ok(Vec::new()),
    }
}
