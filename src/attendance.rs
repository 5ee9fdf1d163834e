//! Attendance views.
//!
//! Overall percentage, the per-course summary table and the expandable
//! class-by-class detail, rendered from the canonical attendance types.

use crate::error::FetchError;
use crate::html::html_escape;
use crate::models::{AttendanceOverview, AttendanceRecord, CourseAttendance};

pub const LOADING_ATTENDANCE: &str = "Loading detailed attendance...";
pub const NO_ATTENDANCE: &str = "No detailed attendance found.";
pub const ATTENDANCE_FAILED: &str = "Error loading detailed attendance.";
pub const NO_RECORDS: &str = "No records found";
pub const RECORDS_FAILED: &str = "Error loading attendance";

/// Overall value as shown in the summary tile.
pub fn overall_label(result: &Result<AttendanceOverview, FetchError>) -> String {
    match result {
        Ok(AttendanceOverview {
            overall_percentage: Some(p),
            ..
        }) => format!("{}%", trim_float(*p)),
        Ok(_) => "N/A".to_string(),
        Err(_) => "Error".to_string(),
    }
}

/// `85.0` -> `85`, `85.5` -> `85.5`.
fn trim_float(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{}", (value * 100.0).round() / 100.0)
    }
}

fn dash<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Percentage cell text: `90%`, or `-` when the backend had none.
pub fn percentage_cell(row: &CourseAttendance) -> String {
    row.percentage
        .map(|p| format!("{}%", trim_float(p)))
        .unwrap_or_else(|| "-".to_string())
}

fn message_row(message: &str) -> String {
    format!(
        r#"<tr><td colspan="6" class="text-center text-gray-500 py-6 italic">{}</td></tr>"#,
        html_escape(message)
    )
}

/// `<tbody>` contents of the summary table.
pub fn summary_rows(result: &Result<AttendanceOverview, FetchError>) -> String {
    let courses = match result {
        Err(_) => return message_row(ATTENDANCE_FAILED),
        Ok(o) if o.courses.is_empty() => return message_row(NO_ATTENDANCE),
        Ok(o) => &o.courses,
    };

    courses
        .iter()
        .map(|row| {
            let subject = row.subject.as_deref().unwrap_or("-");
            let detail = match row.altid {
                Some(altid) => format!(
                    r#"<a class="view-sub-btn text-red-900 font-medium hover:underline text-sm" href="/attendance/{altid}" data-altid="{altid}" data-subject="{subject}">View</a>"#,
                    altid = altid,
                    subject = html_escape(subject),
                ),
                None => "-".to_string(),
            };
            format!(
                r#"<tr class="border-b hover:bg-gray-50 transition-colors duration-200">
    <td class="px-4 py-3 font-medium">{}</td>
    <td class="px-4 py-3">{}</td>
    <td class="px-4 py-3">{}</td>
    <td class="px-4 py-3">{}</td>
    <td class="px-4 py-3">{}</td>
    <td class="px-4 py-3">{}</td>
</tr>"#,
                html_escape(subject),
                dash(row.total_classes),
                dash(row.present),
                dash(row.absent),
                percentage_cell(row),
                detail,
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Full attendance page body.
pub fn attendance_section(result: &Result<AttendanceOverview, FetchError>) -> String {
    format!(
        r#"<section>
    <div class="text-3xl font-bold">Overall: <span id="overallValue">{overall}</span></div>
    <table class="w-full text-left">
        <thead><tr><th>Subject</th><th>Total Classes</th><th>Present</th><th>Absent</th><th>Percentage</th><th></th></tr></thead>
        <tbody id="detailedBody">
{rows}
        </tbody>
    </table>
</section>"#,
        overall = html_escape(&overall_label(result)),
        rows = summary_rows(result),
    )
}

/// Class-by-class table for one course.
pub fn records_table(result: &Result<Vec<AttendanceRecord>, FetchError>) -> String {
    let records = match result {
        Err(_) => {
            return format!(
                r#"<p class="text-yellow-500 text-center italic">{}</p>"#,
                RECORDS_FAILED
            )
        }
        Ok(r) if r.is_empty() => {
            return format!(
                r#"<div class="text-gray-500 italic py-2 text-center">{}</div>"#,
                NO_RECORDS
            )
        }
        Ok(r) => r,
    };

    let rows: String = records
        .iter()
        .map(|r| {
            format!(
                r#"
            <tr class="hover:bg-gray-50 transition-colors duration-200 border-b last:border-b-0">
                <td class="px-4 py-2">{}</td>
                <td class="px-4 py-2">{}</td>
                <td class="px-4 py-2">{}</td>
                <td class="px-4 py-2 font-medium {}">{}</td>
            </tr>"#,
                html_escape(r.class_no.as_deref().unwrap_or("-")),
                html_escape(r.date.as_deref().unwrap_or("-")),
                html_escape(r.time.as_deref().unwrap_or("-")),
                if r.is_absent() {
                    "text-yellow-500"
                } else {
                    "text-green-600"
                },
                html_escape(r.status.as_deref().unwrap_or("-")),
            )
        })
        .collect();

    format!(
        r#"<div class="overflow-x-auto mt-2">
    <table class="w-full text-left border-collapse rounded-xl shadow-sm">
        <thead class="bg-red-50 text-gray-700 uppercase text-sm rounded-t-xl">
            <tr><th class="px-4 py-2">Class No</th><th class="px-4 py-2">Date</th><th class="px-4 py-2">Time</th><th class="px-4 py-2">Status</th></tr>
        </thead>
        <tbody>{}
        </tbody>
    </table>
</div>"#,
        rows
    )
}
