//! One-shot listing commands.
//!
//! Each `run_*` function performs a single backend read through
//! [`PortalApi`] and prints the result to stdout. Fetch failures print the
//! same message the dashboard panel would show and exit non-zero.

use anyhow::{bail, Result};

use crate::attendance;
use crate::client::PortalApi;
use crate::dashboard::{semesters_panel, subjects_panel};
use crate::filter::{self, DocFilter};
use crate::html;
use crate::render::{self, CardActions, CardContext, DocumentCard, DocumentsView, Panel};

/// Print the outcome of a panel, returning an error for failed requests.
fn print_panel<T>(panel: &Panel<T>, print_ready: impl FnOnce(&T)) -> Result<()> {
    match panel {
        Panel::Idle => Ok(()),
        Panel::Loading(msg) | Panel::Empty(msg) => {
            println!("{}", msg);
            Ok(())
        }
        Panel::Error(msg) => bail!("{}", msg),
        Panel::Ready(items) => {
            print_ready(items);
            Ok(())
        }
    }
}

/// `portal semesters`
pub async fn run_semesters(api: &dyn PortalApi) -> Result<()> {
    let panel = semesters_panel(api.semesters().await);
    print_panel(&panel, |semesters| {
        for sem in semesters {
            println!("{:>3}  {}", sem.key, sem.name);
        }
    })
}

/// `portal subjects <SEM>`
pub async fn run_subjects(api: &dyn PortalApi, semester: u32) -> Result<()> {
    let panel = subjects_panel(api.subjects(semester).await);
    print_panel(&panel, |subjects| {
        for sub in subjects {
            println!("{:>8}  {}", sub.id, sub.name);
        }
    })
}

/// Text block for one card, as printed by `docs` and `browse`.
pub fn card_text(card: &DocumentCard) -> String {
    let mut out = format!(
        "- {}\n    {}\n    uploaded: {}\n    view id:  {}\n",
        card.title, card.type_label, card.uploaded, card.view_id_label
    );
    match &card.actions {
        CardActions::ManualTask(label) => {
            out.push_str(&format!("    [{}]\n", label));
        }
        CardActions::Links { view, download } => {
            out.push_str(&format!("    view:     {}\n", view));
            if let Some(href) = download {
                out.push_str(&format!("    download: {}\n", href));
            }
        }
    }
    out
}

/// Text rendering of the documents container.
pub fn documents_text(view: &DocumentsView<'_>, ctx: &CardContext) -> String {
    match view {
        DocumentsView::Placeholder(msg) | DocumentsView::Error(msg) => format!("{}\n", msg),
        DocumentsView::Skeleton => format!("{}\n", render::LOADING_DOCUMENTS),
        DocumentsView::Cards(docs) => docs.iter().map(|d| card_text(&ctx.card(d))).collect(),
    }
}

/// `portal docs <COURSE> [--query Q] [--type T] [--html]`
pub async fn run_docs(
    api: &dyn PortalApi,
    ctx: &CardContext,
    course_id: i64,
    query: Option<&str>,
    kind: Option<&str>,
    as_html: bool,
) -> Result<()> {
    let documents = match api.documents(course_id).await {
        Ok(docs) => docs,
        Err(e) if e.is_unexpected_shape() => bail!("{}", render::UNEXPECTED_SERVER_RESPONSE),
        Err(_) => bail!("{}", render::DOCUMENTS_FAILED),
    };

    if documents.is_empty() {
        println!("{}", render::NO_DOCUMENTS);
        return Ok(());
    }

    let options = filter::filter_options(&documents);
    let filter = filter::restrict_kind(
        DocFilter::new(query.unwrap_or(""), kind.unwrap_or(filter::ALL)),
        &options,
    );
    let view = render::filter_documents(&documents, &filter);
    let ctx = ctx.for_course(Some(course_id));

    if as_html {
        println!("{}", html::documents(&view, &ctx));
    } else {
        let types: Vec<String> = options.into_iter().map(|o| o.value).collect();
        println!("types: {}", types.join(", "));
        println!();
        print!("{}", documents_text(&view, &ctx));
    }
    Ok(())
}

/// `portal attendance [--course ALTID]`
pub async fn run_attendance(api: &dyn PortalApi, course: Option<i64>) -> Result<()> {
    if let Some(altid) = course {
        match api.course_attendance(altid).await {
            Err(_) => bail!("{}", attendance::RECORDS_FAILED),
            Ok(records) if records.is_empty() => println!("{}", attendance::NO_RECORDS),
            Ok(records) => {
                println!("{:<10} {:<12} {:<14} STATUS", "CLASS", "DATE", "TIME");
                for r in &records {
                    println!(
                        "{:<10} {:<12} {:<14} {}",
                        r.class_no.as_deref().unwrap_or("-"),
                        r.date.as_deref().unwrap_or("-"),
                        r.time.as_deref().unwrap_or("-"),
                        r.status.as_deref().unwrap_or("-"),
                    );
                }
            }
        }
        return Ok(());
    }

    let result = api.attendance().await;
    println!("Overall: {}", attendance::overall_label(&result));
    println!();

    let overview = match result {
        Ok(o) => o,
        Err(_) => bail!("{}", attendance::ATTENDANCE_FAILED),
    };
    if overview.courses.is_empty() {
        println!("{}", attendance::NO_ATTENDANCE);
        return Ok(());
    }

    println!(
        "{:<40} {:>6} {:>8} {:>7} {:>6}  ALTID",
        "SUBJECT", "TOTAL", "PRESENT", "ABSENT", "PCT"
    );
    println!("{}", "-".repeat(80));
    let dash = |v: Option<i64>| v.map(|n| n.to_string()).unwrap_or_else(|| "-".into());
    for row in &overview.courses {
        println!(
            "{:<40} {:>6} {:>8} {:>7} {:>6}  {}",
            row.subject.as_deref().unwrap_or("-"),
            dash(row.total_classes),
            dash(row.present),
            dash(row.absent),
            attendance::percentage_cell(row),
            dash(row.altid),
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::Document;

    fn ctx() -> CardContext {
        CardContext::from_config(&Config::minimal())
    }

    #[test]
    fn test_card_text_links() {
        let doc = Document {
            doc_name: Some("Week 1.pdf".into()),
            kind: Some("resource".into()),
            view_id: Some(42),
            ..Default::default()
        };
        let text = card_text(&ctx().card(&doc));
        assert!(text.starts_with("- Week 1\n    Type: Resource\n"));
        assert!(text.contains("view:"));
        assert!(text.contains("download:"));
    }

    #[test]
    fn test_card_text_manual_task() {
        let doc = Document {
            kind: Some("assign".into()),
            ..Default::default()
        };
        let text = card_text(&ctx().card(&doc));
        assert!(text.contains("[Manual Task]"));
        assert!(!text.contains("view:"));
    }

    #[test]
    fn test_documents_text_placeholder() {
        let text = documents_text(&DocumentsView::Placeholder(render::SELECT_SUBJECT), &ctx());
        assert_eq!(text, "Select a subject to load documents\n");
    }
}
