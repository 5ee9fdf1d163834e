//! Display formatting for document cards.

use chrono::{DateTime, Datelike, FixedOffset, Offset, Timelike, Utc};

const KNOWN_EXTENSIONS: [&str; 7] = [".pdf", ".doc", ".docx", ".ppt", ".pptx", ".txt", ".zip"];

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Uppercase the first character, leave the rest untouched.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Strip a file extension from a display name.
///
/// A known extension is removed case-insensitively. Otherwise everything
/// from the last `.` is dropped, if there is one.
pub fn clean_file_name(name: &str) -> String {
    let trimmed = name.trim();
    let lower = trimmed.to_ascii_lowercase();

    let stem = KNOWN_EXTENSIONS
        .iter()
        .find(|ext| lower.ends_with(*ext))
        .map(|ext| &trimmed[..trimmed.len() - ext.len()])
        .unwrap_or_else(|| match trimmed.rfind('.') {
            Some(idx) => &trimmed[..idx],
            None => trimmed,
        });

    stem.trim().to_string()
}

/// Title shown on a card: `doc_name`, then `module`, then `"Untitled"`.
pub fn display_name(doc_name: Option<&str>, module: Option<&str>) -> String {
    let raw = doc_name
        .filter(|s| !s.is_empty())
        .or(module.filter(|s| !s.is_empty()))
        .unwrap_or("Untitled");
    clean_file_name(raw)
}

/// Build a fixed offset from minutes east of UTC, clamping to UTC when the
/// value is out of range.
pub fn offset_from_minutes(minutes: i32) -> FixedOffset {
    FixedOffset::east_opt(minutes * 60).unwrap_or_else(utc)
}

fn utc() -> FixedOffset {
    Utc.fix()
}

/// Format unix seconds as `DD Mon, HH:MM AM/PM` in `offset`.
///
/// Returns `"Unknown"` for a missing or unrepresentable timestamp.
pub fn format_timestamp(ts: Option<i64>, offset: FixedOffset) -> String {
    let Some(dt) = ts.and_then(|t| DateTime::from_timestamp(t, 0)) else {
        return "Unknown".to_string();
    };
    let local = dt.with_timezone(&offset);

    let (is_pm, hour12) = local.hour12();
    format!(
        "{:02} {}, {:02}:{:02} {}",
        local.day(),
        MONTHS[local.month0() as usize],
        hour12,
        local.minute(),
        if is_pm { "PM" } else { "AM" }
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_known_extensions() {
        assert_eq!(clean_file_name("Lecture 1.pdf"), "Lecture 1");
        assert_eq!(clean_file_name("Notes.DOCX"), "Notes");
        assert_eq!(clean_file_name("slides.pptx"), "slides");
        assert_eq!(clean_file_name("  archive.zip  "), "archive");
    }

    #[test]
    fn test_clean_unknown_extension_strips_last_dot() {
        assert_eq!(clean_file_name("data.tar.gz"), "data.tar");
        assert_eq!(clean_file_name("v1.2 release"), "v1");
    }

    #[test]
    fn test_clean_without_dot_is_unchanged() {
        assert_eq!(clean_file_name("Weekly quiz"), "Weekly quiz");
    }

    #[test]
    fn test_clean_is_idempotent_on_stripped_names() {
        for name in ["Lecture 1.pdf", "Weekly quiz", "report.docx", "Untitled", "  x.txt "] {
            let once = clean_file_name(name);
            assert_eq!(clean_file_name(&once), once, "not idempotent for {:?}", name);
        }
    }

    #[test]
    fn test_display_name_fallbacks() {
        assert_eq!(display_name(Some("a.pdf"), Some("Module")), "a");
        assert_eq!(display_name(None, Some("Module")), "Module");
        assert_eq!(display_name(Some(""), None), "Untitled");
        assert_eq!(display_name(None, None), "Untitled");
    }

    #[test]
    fn test_epoch_formats_to_fixed_string() {
        assert_eq!(format_timestamp(Some(0), utc()), "01 Jan, 12:00 AM");
    }

    #[test]
    fn test_known_timestamp() {
        let plus_two = offset_from_minutes(120);
        assert_eq!(format_timestamp(Some(1696767300), plus_two), "08 Oct, 02:15 PM");
        assert_eq!(format_timestamp(Some(1696767300), utc()), "08 Oct, 12:15 PM");
    }

    #[test]
    fn test_missing_timestamp() {
        assert_eq!(format_timestamp(None, utc()), "Unknown");
    }

    #[test]
    fn test_capitalize_first() {
        assert_eq!(capitalize_first("resource"), "Resource");
        assert_eq!(capitalize_first(""), "");
        assert_eq!(capitalize_first("éclair"), "Éclair");
    }
}
