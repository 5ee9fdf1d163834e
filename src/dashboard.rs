//! Dashboard state machine.
//!
//! The browsing flow is modeled as an explicit [`DashboardState`] and a
//! finite set of [`Action`]s. [`DashboardState::apply`] never mutates in
//! place: it returns the next state plus the [`Effect`]s (network requests)
//! the runtime has to start. Request completions come back as actions
//! carrying the generation they were issued under; completions from an
//! older generation are dropped, so a slow response for a previous
//! selection can never overwrite a newer one.
//!
//! ```text
//! Start ──▶ SemestersLoaded
//!              │ SelectSemester(k)      (resets subjects + documents)
//!              ▼
//!           SubjectsLoaded{gen}
//!              │ SelectSubject(id)      (resets documents + filter)
//!              ▼
//!           DocumentsLoaded{gen} ──▶ SetQuery / SetFilter (no request)
//! ```

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::FetchError;
use crate::filter::{self, DocFilter, FilterOption};
use crate::models::{Document, Semester, Subject};
use crate::render::{self, DocPanel, DocumentsView, Panel};

/// Input to the state machine: user intent or a request completion.
#[derive(Debug)]
pub enum Action {
    /// Page load: request the semester list.
    Start,
    SelectSemester(u32),
    /// `None` shows the "select a subject" prompt without a request.
    SelectSubject(Option<i64>),
    SetQuery(String),
    SetFilter(String),
    SemestersLoaded(Result<Vec<Semester>, FetchError>),
    SubjectsLoaded {
        generation: u64,
        result: Result<Vec<Subject>, FetchError>,
    },
    DocumentsLoaded {
        generation: u64,
        result: Result<Vec<Document>, FetchError>,
    },
}

/// A request the runtime has to perform on behalf of the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchSemesters,
    FetchSubjects { generation: u64, semester: u32 },
    FetchDocuments { generation: u64, course_id: i64 },
}

/// Immutable snapshot of the dashboard.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    semesters: Panel<Vec<Semester>>,
    selected_semester: Option<u32>,
    subjects: Panel<Vec<Subject>>,
    selected_subject: Option<i64>,
    documents: Arc<Vec<Document>>,
    doc_panel: DocPanel,
    filter: DocFilter,
    filter_options: Vec<FilterOption>,
    controls_enabled: bool,
    subject_generation: u64,
    document_generation: u64,
}

/// Map a subject request outcome to its panel.
pub fn subjects_panel(result: Result<Vec<Subject>, FetchError>) -> Panel<Vec<Subject>> {
    match result {
        Ok(subjects) if subjects.is_empty() => Panel::Empty(render::NO_SUBJECTS),
        Ok(subjects) => Panel::Ready(subjects),
        Err(e) if e.is_unexpected_shape() => Panel::Error(render::UNEXPECTED_RESPONSE),
        Err(_) => Panel::Error(render::SUBJECTS_FAILED),
    }
}

/// Map a semester request outcome to its panel.
pub fn semesters_panel(result: Result<Vec<Semester>, FetchError>) -> Panel<Vec<Semester>> {
    match result {
        Ok(semesters) if semesters.is_empty() => Panel::Empty(render::NO_SEMESTERS),
        Ok(semesters) => Panel::Ready(semesters),
        Err(_) => Panel::Error(render::SEMESTERS_FAILED),
    }
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn semesters(&self) -> &Panel<Vec<Semester>> {
        &self.semesters
    }

    pub fn selected_semester(&self) -> Option<u32> {
        self.selected_semester
    }

    pub fn subjects(&self) -> &Panel<Vec<Subject>> {
        &self.subjects
    }

    pub fn selected_subject(&self) -> Option<i64> {
        self.selected_subject
    }

    /// The flattened document list of the selected subject.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn doc_panel(&self) -> DocPanel {
        self.doc_panel
    }

    pub fn filter(&self) -> &DocFilter {
        &self.filter
    }

    /// Type filter entries; always starts with `All`.
    pub fn filter_options(&self) -> &[FilterOption] {
        if self.filter_options.is_empty() {
            ALL_ONLY.as_slice()
        } else {
            self.filter_options.as_slice()
        }
    }

    /// Whether the search box and type filter accept input.
    pub fn controls_enabled(&self) -> bool {
        self.controls_enabled
    }

    /// What the documents container currently shows.
    pub fn documents_view(&self) -> DocumentsView<'_> {
        render::documents_view(self.doc_panel, &self.documents, &self.filter)
    }

    /// Compute the next state for `action`.
    pub fn apply(&self, action: Action) -> (DashboardState, Vec<Effect>) {
        let mut next = self.clone();
        let effects = next.reduce(action);
        (next, effects)
    }

    fn reset_documents(&mut self) {
        self.documents = Arc::new(Vec::new());
        self.doc_panel = DocPanel::Prompt;
        self.filter = DocFilter::default();
        self.filter_options.clear();
        self.controls_enabled = false;
        // Anything still in flight for the old subject is now stale.
        self.document_generation += 1;
    }

    fn reduce(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::Start => {
                self.semesters = Panel::Loading(render::LOADING_SEMESTERS);
                vec![Effect::FetchSemesters]
            }

            Action::SemestersLoaded(result) => {
                if let Err(e) = &result {
                    warn!(error = %e, "loading semesters failed");
                }
                self.semesters = semesters_panel(result);
                Vec::new()
            }

            Action::SelectSemester(key) => {
                let known = self
                    .semesters
                    .ready()
                    .is_some_and(|list| list.iter().any(|s| s.key == key));
                if !known {
                    warn!(semester = key, "ignoring selection of unknown semester");
                    return Vec::new();
                }

                self.selected_semester = Some(key);
                self.selected_subject = None;
                self.subjects = Panel::Loading(render::LOADING_SUBJECTS);
                self.reset_documents();
                self.subject_generation += 1;

                vec![Effect::FetchSubjects {
                    generation: self.subject_generation,
                    semester: key,
                }]
            }

            Action::SubjectsLoaded { generation, result } => {
                if generation != self.subject_generation {
                    debug!(generation, current = self.subject_generation, "dropping stale subjects");
                    return Vec::new();
                }
                if let Err(e) = &result {
                    warn!(error = %e, "loading subjects failed");
                }
                self.subjects = subjects_panel(result);
                Vec::new()
            }

            Action::SelectSubject(None) => {
                self.selected_subject = None;
                self.reset_documents();
                Vec::new()
            }

            Action::SelectSubject(Some(course_id)) => {
                let known = self
                    .subjects
                    .ready()
                    .is_some_and(|list| list.iter().any(|s| s.id == course_id));
                if !known {
                    warn!(course_id, "ignoring selection of unknown subject");
                    return Vec::new();
                }

                self.selected_subject = Some(course_id);
                self.reset_documents();
                self.doc_panel = DocPanel::Loading;

                vec![Effect::FetchDocuments {
                    generation: self.document_generation,
                    course_id,
                }]
            }

            Action::DocumentsLoaded { generation, result } => {
                if generation != self.document_generation {
                    debug!(generation, current = self.document_generation, "dropping stale documents");
                    return Vec::new();
                }
                match result {
                    Ok(docs) if docs.is_empty() => {
                        self.doc_panel = DocPanel::Empty(render::NO_DOCUMENTS);
                    }
                    Ok(docs) => {
                        self.filter_options = filter::filter_options(&docs);
                        self.documents = Arc::new(docs);
                        self.controls_enabled = true;
                        self.doc_panel = DocPanel::Loaded;
                    }
                    Err(e) => {
                        warn!(error = %e, "loading documents failed");
                        self.doc_panel = if e.is_unexpected_shape() {
                            DocPanel::Error(render::UNEXPECTED_SERVER_RESPONSE)
                        } else {
                            DocPanel::Error(render::DOCUMENTS_FAILED)
                        };
                    }
                }
                Vec::new()
            }

            Action::SetQuery(query) => {
                if self.controls_enabled {
                    self.filter = self.filter.clone().with_query(&query);
                }
                Vec::new()
            }

            Action::SetFilter(kind) => {
                if !self.controls_enabled {
                    return Vec::new();
                }
                let candidate = self.filter.clone().with_kind(&kind);
                if filter::offers(&self.filter_options, candidate.kind()) {
                    self.filter = candidate;
                } else {
                    warn!(kind = %kind, "ignoring unknown document type filter");
                }
                Vec::new()
            }
        }
    }
}

static ALL_ONLY: std::sync::LazyLock<Vec<FilterOption>> =
    std::sync::LazyLock::new(|| filter::filter_options(&[]));
