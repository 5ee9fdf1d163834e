//! HTML fragments for the dashboard page.
//!
//! Every function returns a string that replaces the contents of one
//! container. Selections are plain links (`?sem=..&course=..`) and the
//! search box is a `GET` form, so the page works without scripts.

use crate::dashboard::DashboardState;
use crate::filter::FilterOption;
use crate::models::{Semester, Subject};
use crate::render::{CardActions, CardContext, DocumentCard, DocumentsView, Panel};

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

pub fn placeholder(message: &str) -> String {
    format!(
        r#"<div class="col-span-full text-center text-gray-400 py-6">{}</div>"#,
        html_escape(message)
    )
}

pub fn error(message: &str) -> String {
    format!(
        r#"<div class="col-span-full text-center text-red-600 py-6 font-medium">{}</div>"#,
        html_escape(message)
    )
}

fn panel<T>(panel: &Panel<T>, ready: impl FnOnce(&T) -> String) -> String {
    match panel {
        Panel::Idle => String::new(),
        Panel::Loading(msg) | Panel::Empty(msg) => placeholder(msg),
        Panel::Error(msg) => error(msg),
        Panel::Ready(items) => ready(items),
    }
}

fn active(selected: bool) -> &'static str {
    if selected {
        " bg-red-50 font-semibold"
    } else {
        ""
    }
}

/// Semester buttons, keyed by position.
pub fn semester_grid(semesters: &Panel<Vec<Semester>>, selected: Option<u32>) -> String {
    panel(semesters, |list| {
        list.iter()
            .map(|sem| {
                format!(
                    r#"<a href="?sem={key}" data-sem="{key}" class="semester-btn bg-white shadow-sm border border-gray-200 px-4 py-2 rounded-xl hover:bg-red-50 transition text-sm font-medium flex-shrink-0{active}">{name}</a>"#,
                    key = sem.key,
                    active = active(selected == Some(sem.key)),
                    name = html_escape(&sem.name),
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    })
}

/// Subject list for the selected semester.
pub fn subject_grid(
    subjects: &Panel<Vec<Subject>>,
    semester: Option<u32>,
    selected: Option<i64>,
) -> String {
    let sem = semester.map(|k| k.to_string()).unwrap_or_default();
    panel(subjects, |list| {
        let items: String = list
            .iter()
            .map(|sub| {
                format!(
                    r#"
    <li data-sub="{id}" class="subject-item px-3 py-2 cursor-pointer hover:bg-red-50 rounded transition{active}"><a href="?sem={sem}&amp;course={id}">{name}</a></li>"#,
                    id = sub.id,
                    sem = sem,
                    active = active(selected == Some(sub.id)),
                    name = html_escape(&sub.name),
                )
            })
            .collect();
        format!(r#"<ul class="flex flex-col gap-1">{}
</ul>"#, items)
    })
}

pub fn skeleton(count: usize) -> String {
    r#"<div class="animate-pulse bg-gray-200 h-28 rounded-xl w-full"></div>"#.repeat(count)
}

pub fn filter_select(options: &[FilterOption], selected: &str, enabled: bool) -> String {
    let opts: String = options
        .iter()
        .map(|o| {
            format!(
                r#"<option value="{value}"{sel}>{label}</option>"#,
                value = html_escape(&o.value),
                sel = if o.value == selected { " selected" } else { "" },
                label = html_escape(&o.label),
            )
        })
        .collect();
    format!(
        r#"<select id="docFilter" name="type"{}>{}</select>"#,
        if enabled { "" } else { " disabled" },
        opts
    )
}

pub fn search_input(query: &str, enabled: bool) -> String {
    format!(
        r#"<input id="searchDocs" name="q" type="search" placeholder="Search documents" value="{}"{}>"#,
        html_escape(query),
        if enabled { "" } else { " disabled" }
    )
}

pub fn document_card(card: &DocumentCard) -> String {
    let actions = match &card.actions {
        CardActions::ManualTask(label) => format!(
            r#"<span class="text-gray-400 text-sm italic">{}</span>"#,
            html_escape(label)
        ),
        CardActions::Links { view, download } => {
            let mut links = format!(
                r#"<a href="{}" target="_blank" rel="noopener noreferrer" class="text-red-700 font-medium hover:underline text-sm">View</a>"#,
                html_escape(view)
            );
            if let Some(href) = download {
                links.push_str(&format!(
                    r#"<a href="{}" class="text-red-700 font-medium hover:underline text-sm">Download</a>"#,
                    html_escape(href)
                ));
            }
            links
        }
    };

    format!(
        r#"<div class="doc-card bg-white border border-gray-200 shadow-sm rounded-xl p-4 hover:shadow-md transition" data-type="{kind}">
    <h4 class="font-semibold text-slate-800">{title}</h4>
    <p class="text-sm text-slate-500">{type_label}</p>
    <div class="mt-2 text-xs text-gray-500">Uploaded: {uploaded}</div>
    <div class="mt-3 flex justify-between items-center">
        <div class="text-xs text-gray-500">View ID: {view_id}</div>
        <div class="flex gap-3">{actions}</div>
    </div>
</div>"#,
        kind = html_escape(&card.kind),
        title = html_escape(&card.title),
        type_label = html_escape(&card.type_label),
        uploaded = html_escape(&card.uploaded),
        view_id = html_escape(&card.view_id_label),
        actions = actions,
    )
}

/// Contents of the documents container.
pub fn documents(view: &DocumentsView<'_>, ctx: &CardContext) -> String {
    match view {
        DocumentsView::Placeholder(msg) => placeholder(msg),
        DocumentsView::Error(msg) => error(msg),
        DocumentsView::Skeleton => skeleton(ctx.skeleton_count),
        DocumentsView::Cards(docs) => docs
            .iter()
            .map(|d| document_card(&ctx.card(d)))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Full dashboard page for a state snapshot.
pub fn dashboard_page(state: &DashboardState, ctx: &CardContext) -> String {
    let sem = state.selected_semester();
    let course = state.selected_subject();
    let hidden = match (sem, course) {
        (Some(s), Some(c)) => format!(
            r#"<input type="hidden" name="sem" value="{}"><input type="hidden" name="course" value="{}">"#,
            s, c
        ),
        _ => String::new(),
    };

    let body = format!(
        r#"<section>
    <h2>Semesters</h2>
    <div id="semesterGrid" class="flex gap-2 overflow-x-auto">
{semesters}
    </div>
</section>
<section>
    <h2>Subjects</h2>
    <div id="subjectGrid">
{subjects}
    </div>
</section>
<section>
    <h2>Documents</h2>
    <form method="get" class="flex gap-2">{hidden}{search}{filter}<button type="submit"{disabled}>Apply</button></form>
    <div id="documentsContainer" class="grid gap-4">
{documents}
    </div>
</section>"#,
        semesters = semester_grid(state.semesters(), sem),
        subjects = subject_grid(state.subjects(), sem, course),
        hidden = hidden,
        search = search_input(state.filter().query(), state.controls_enabled()),
        filter = filter_select(
            state.filter_options(),
            state.filter().kind(),
            state.controls_enabled()
        ),
        disabled = if state.controls_enabled() { "" } else { " disabled" },
        documents = documents(&state.documents_view(), &ctx.for_course(course)),
    );

    base_page("Dashboard", &body)
}

pub fn base_page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - Student Portal</title>
</head>
<body>
    <nav><a href="/">Dashboard</a> <a href="/attendance">Attendance</a></nav>
    <main>
        <h1>{title}</h1>
{body}
    </main>
</body>
</html>"#,
        title = html_escape(title),
        body = body
    )
}
