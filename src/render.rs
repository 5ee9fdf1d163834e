//! View model for the dashboard panels.
//!
//! Turns canonical data plus the current filter into [`DocumentCard`]s and
//! panel states. Output formats ([`crate::html`], the CLI listings) only
//! template what is computed here.

use chrono::FixedOffset;
use serde::Serialize;

use crate::api::{ApiVersion, DocAction, Endpoints};
use crate::config::{Config, TypeRulesConfig};
use crate::filter::{self, DocFilter};
use crate::format::{capitalize_first, display_name, format_timestamp, offset_from_minutes};
use crate::models::Document;

pub const LOADING_SEMESTERS: &str = "Loading semesters...";
pub const NO_SEMESTERS: &str = "No semesters found.";
pub const SEMESTERS_FAILED: &str = "Error loading semesters.";

pub const LOADING_SUBJECTS: &str = "Loading subjects...";
pub const NO_SUBJECTS: &str = "No subjects found for this semester.";
pub const SUBJECTS_FAILED: &str = "Error loading subjects. Please try again.";
pub const UNEXPECTED_RESPONSE: &str = "Unexpected response from server.";

pub const SELECT_SUBJECT: &str = "Select a subject to load documents";
pub const LOADING_DOCUMENTS: &str = "Loading documents...";
pub const NO_DOCUMENTS: &str = "No documents found for this course.";
pub const NO_MATCHING_DOCUMENTS: &str = "No matching documents found";
pub const DOCUMENTS_FAILED: &str = "Error loading documents. Please try again.";
pub const UNEXPECTED_SERVER_RESPONSE: &str = "Unexpected server response.";

/// State of a list panel (semesters, subjects).
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Panel<T> {
    /// Nothing requested yet.
    #[default]
    Idle,
    Loading(&'static str),
    /// The request succeeded but returned nothing.
    Empty(&'static str),
    Error(&'static str),
    Ready(T),
}

impl<T> Panel<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Panel::Ready(v) => Some(v),
            _ => None,
        }
    }
}

/// Lifecycle of the documents panel. The documents themselves live in the
/// dashboard state so the filter can re-run without a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocPanel {
    /// No subject selected.
    #[default]
    Prompt,
    Loading,
    Empty(&'static str),
    Error(&'static str),
    Loaded,
}

/// What the documents container shows.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentsView<'a> {
    Placeholder(&'static str),
    Error(&'static str),
    Skeleton,
    Cards(Vec<&'a Document>),
}

/// Compute the documents container for a panel state and filter.
pub fn documents_view<'a>(
    panel: DocPanel,
    documents: &'a [Document],
    filter: &DocFilter,
) -> DocumentsView<'a> {
    match panel {
        DocPanel::Prompt => DocumentsView::Placeholder(SELECT_SUBJECT),
        DocPanel::Loading => DocumentsView::Skeleton,
        DocPanel::Empty(msg) => DocumentsView::Placeholder(msg),
        DocPanel::Error(msg) => DocumentsView::Error(msg),
        DocPanel::Loaded => filter_documents(documents, filter),
    }
}

/// The pure renderer: filter `documents` and pick the placeholder when
/// nothing is left.
pub fn filter_documents<'a>(documents: &'a [Document], filter: &DocFilter) -> DocumentsView<'a> {
    if documents.is_empty() {
        return DocumentsView::Placeholder(SELECT_SUBJECT);
    }
    let matched = filter::apply(documents, filter);
    if matched.is_empty() {
        DocumentsView::Placeholder(NO_MATCHING_DOCUMENTS)
    } else {
        DocumentsView::Cards(matched)
    }
}

/// Actions offered on a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CardActions {
    /// The activity has to be done on the portal itself.
    ManualTask(String),
    Links {
        view: String,
        download: Option<String>,
    },
}

/// Everything a document card displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentCard {
    pub title: String,
    pub kind: String,
    pub type_label: String,
    pub uploaded: String,
    pub view_id_label: String,
    pub actions: CardActions,
}

/// Settings shared by every card in one render pass.
#[derive(Debug, Clone)]
pub struct CardContext {
    pub endpoints: Endpoints,
    pub rules: TypeRulesConfig,
    pub offset: FixedOffset,
    pub manual_task_label: String,
    pub skeleton_count: usize,
    /// Course the cards belong to; versioned document links need it.
    pub course_id: Option<i64>,
}

impl CardContext {
    pub fn from_config(config: &Config) -> Self {
        Self {
            endpoints: Endpoints::new(&config.api.base_url, config.api.version),
            rules: config.types.clone(),
            offset: offset_from_minutes(config.display.utc_offset_minutes),
            manual_task_label: config.display.manual_task_label.clone(),
            skeleton_count: config.display.skeleton_count,
            course_id: None,
        }
    }

    /// The same settings for the cards of `course_id`.
    pub fn for_course(&self, course_id: Option<i64>) -> Self {
        Self {
            course_id,
            ..self.clone()
        }
    }

    fn link(&self, doc: &Document, action: DocAction) -> String {
        let url = match self.endpoints.version() {
            ApiVersion::Legacy => doc
                .view_id
                .map(|id| self.endpoints.document_action(id, action)),
            ApiVersion::V1 => self
                .course_id
                .zip(doc.doc_id)
                .map(|(course, id)| self.endpoints.course_document(course, id, action)),
        };
        url.unwrap_or_else(|| "#".to_string())
    }

    pub fn card(&self, doc: &Document) -> DocumentCard {
        let kind = doc.normalized_kind();

        let actions = if self.rules.hide_all.contains(&kind) {
            CardActions::ManualTask(self.manual_task_label.clone())
        } else {
            let view = if self.rules.direct_url.contains(&kind) {
                doc.doc_url.clone().unwrap_or_else(|| "#".to_string())
            } else {
                self.link(doc, DocAction::View)
            };
            let download = (!self.rules.hide_download.contains(&kind))
                .then(|| self.link(doc, DocAction::Download));
            CardActions::Links { view, download }
        };

        DocumentCard {
            title: display_name(doc.doc_name.as_deref(), doc.module.as_deref()),
            type_label: format!("Type: {}", capitalize_first(&kind)),
            kind,
            uploaded: format_timestamp(doc.time, self.offset),
            view_id_label: doc
                .view_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "N/A".to_string()),
            actions,
        }
    }
}
