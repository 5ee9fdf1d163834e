//! In-memory search and type filtering over a flattened document list.
//!
//! Nothing here touches the network: every keystroke or filter change
//! re-runs [`apply`] against documents that were already fetched.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::format::capitalize_first;
use crate::models::Document;

/// Filter value that matches every type.
pub const ALL: &str = "all";

/// Type tag used when a document carries none.
pub const UNKNOWN_KIND: &str = "unknown";

/// Lowercase a raw type tag, mapping a missing tag to [`UNKNOWN_KIND`].
pub fn normalize_kind(kind: Option<&str>) -> String {
    match kind {
        Some(k) if !k.is_empty() => k.to_lowercase(),
        _ => UNKNOWN_KIND.to_string(),
    }
}

/// Current search text and type filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocFilter {
    query: String,
    kind: String,
}

impl Default for DocFilter {
    fn default() -> Self {
        Self {
            query: String::new(),
            kind: ALL.to_string(),
        }
    }
}

impl DocFilter {
    pub fn new(query: &str, kind: &str) -> Self {
        Self::default().with_query(query).with_kind(kind)
    }

    pub fn with_query(mut self, query: &str) -> Self {
        self.query = query.trim().to_lowercase();
        self
    }

    /// An empty filter value means "all".
    pub fn with_kind(mut self, kind: &str) -> Self {
        let kind = kind.trim().to_lowercase();
        self.kind = if kind.is_empty() { ALL.to_string() } else { kind };
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn matches(&self, doc: &Document) -> bool {
        let matches_kind = self.kind == ALL || doc.normalized_kind() == self.kind;
        matches_kind && self.matches_query(doc)
    }

    fn matches_query(&self, doc: &Document) -> bool {
        if self.query.is_empty() {
            return true;
        }
        [doc.doc_name.as_deref(), doc.module.as_deref()]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&self.query))
    }
}

/// Documents matching `filter`, in their original order.
pub fn apply<'a>(documents: &'a [Document], filter: &DocFilter) -> Vec<&'a Document> {
    documents.iter().filter(|d| filter.matches(d)).collect()
}

/// One entry of the type filter control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
}

/// Whether `kind` is one of the entries in `options`.
pub fn offers(options: &[FilterOption], kind: &str) -> bool {
    options.iter().any(|o| o.value == kind)
}

/// `filter` with a type that `options` does not offer replaced by [`ALL`].
///
/// Unknown types are ignored rather than matching nothing, the same way the
/// dashboard keeps its previous filter when given one.
pub fn restrict_kind(filter: DocFilter, options: &[FilterOption]) -> DocFilter {
    if offers(options, filter.kind()) {
        filter
    } else {
        tracing::warn!(kind = %filter.kind(), "ignoring unknown document type filter");
        filter.with_kind(ALL)
    }
}

/// `All` followed by the distinct normalized types, sorted.
pub fn filter_options(documents: &[Document]) -> Vec<FilterOption> {
    let kinds: BTreeSet<String> = documents.iter().map(Document::normalized_kind).collect();

    std::iter::once(FilterOption {
        value: ALL.to_string(),
        label: "All".to_string(),
    })
    .chain(kinds.into_iter().map(|k| FilterOption {
        label: capitalize_first(&k),
        value: k,
    }))
    .collect()
}
