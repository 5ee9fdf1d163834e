//! Canonical data types used throughout the dashboard.
//!
//! These are produced only by the adapters in [`crate::api`], so the
//! renderer never sees legacy or versioned wire shapes.

use serde::Serialize;

/// A semester entry. `key` is its 1-based position in the returned list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Semester {
    pub key: u32,
    pub name: String,
}

/// A subject (course) within a semester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subject {
    pub id: i64,
    pub name: String,
}

/// A course document or activity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Document {
    pub doc_name: Option<String>,
    pub module: Option<String>,
    /// Backend type tag (`mod` on the wire).
    pub kind: Option<String>,
    pub view_id: Option<i64>,
    /// File id inside the course; the versioned document route needs it.
    pub doc_id: Option<i64>,
    pub doc_url: Option<String>,
    /// Unix seconds.
    pub time: Option<i64>,
}

impl Document {
    /// Lowercased type tag, `"unknown"` when the backend sent none.
    pub fn normalized_kind(&self) -> String {
        crate::filter::normalize_kind(self.kind.as_deref())
    }
}

/// A week grouping as returned by the documents endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Week {
    pub title: Option<String>,
    pub docs: Vec<Document>,
}

/// Overall attendance plus the per-course summary rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AttendanceOverview {
    pub overall_percentage: Option<f64>,
    pub courses: Vec<CourseAttendance>,
}

/// One summary row of the attendance table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CourseAttendance {
    pub subject: Option<String>,
    pub total_classes: Option<i64>,
    pub present: Option<i64>,
    pub absent: Option<i64>,
    pub percentage: Option<f64>,
    /// Identifier for the per-course detail request.
    pub altid: Option<i64>,
}

/// A single class in a course's attendance detail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AttendanceRecord {
    pub class_no: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub status: Option<String>,
}

impl AttendanceRecord {
    pub fn is_absent(&self) -> bool {
        self.status.as_deref().is_some_and(|s| s.starts_with('A'))
    }
}
