//! `portal browse`: drive the dashboard from stdin.
//!
//! Each input line is one user action:
//!
//! | Line | Action |
//! |------|--------|
//! | `sem <N>` | select semester `N` |
//! | `subject <ID>` / `subject none` | select a subject, or clear it |
//! | `query <TEXT>` | set the search text (empty clears it) |
//! | `filter <TYPE>` | set the type filter (`all` for everything) |
//! | `show` | print the current view |
//! | `quit` | exit |
//!
//! After every action the dashboard settles (all requests complete) and the
//! view is printed.

use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::client::PortalApi;
use crate::commands::documents_text;
use crate::dashboard::{Action, DashboardState};
use crate::render::{CardContext, Panel};
use crate::runtime::Dashboard;

/// A parsed input line.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Act(ActionLine),
    Show,
    Quit,
}

/// Input lines that become dashboard actions.
#[derive(Debug, PartialEq, Eq)]
pub enum ActionLine {
    Semester(u32),
    Subject(Option<i64>),
    Query(String),
    Filter(String),
}

impl ActionLine {
    fn into_action(self) -> Action {
        match self {
            ActionLine::Semester(k) => Action::SelectSemester(k),
            ActionLine::Subject(id) => Action::SelectSubject(id),
            ActionLine::Query(q) => Action::SetQuery(q),
            ActionLine::Filter(f) => Action::SetFilter(f),
        }
    }
}

/// Parse one input line. Unknown or malformed lines yield an error message.
pub fn parse_line(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((w, r)) => (w, r.trim()),
        None => (line, ""),
    };

    match word {
        "sem" => rest
            .parse()
            .map(|k| Command::Act(ActionLine::Semester(k)))
            .map_err(|_| format!("invalid semester: '{}'", rest)),
        "subject" if rest == "none" || rest.is_empty() => {
            Ok(Command::Act(ActionLine::Subject(None)))
        }
        "subject" => rest
            .parse()
            .map(|id| Command::Act(ActionLine::Subject(Some(id))))
            .map_err(|_| format!("invalid subject id: '{}'", rest)),
        "query" => Ok(Command::Act(ActionLine::Query(rest.to_string()))),
        "filter" => Ok(Command::Act(ActionLine::Filter(rest.to_string()))),
        "show" => Ok(Command::Show),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(format!("unknown command: '{}'", other)),
    }
}

fn panel_text<T>(panel: &Panel<T>, ready: impl FnOnce(&T) -> String) -> String {
    match panel {
        Panel::Idle => String::new(),
        Panel::Loading(msg) | Panel::Empty(msg) | Panel::Error(msg) => format!("  {}\n", msg),
        Panel::Ready(items) => ready(items),
    }
}

fn marker(selected: bool) -> char {
    if selected {
        '*'
    } else {
        ' '
    }
}

/// Plain-text rendering of a dashboard snapshot.
pub fn view_text(state: &DashboardState, ctx: &CardContext) -> String {
    let mut out = String::from("Semesters:\n");
    out.push_str(&panel_text(state.semesters(), |list| {
        list.iter()
            .map(|s| {
                let sel = state.selected_semester() == Some(s.key);
                format!(" {}{:>3}  {}\n", marker(sel), s.key, s.name)
            })
            .collect()
    }));

    out.push_str("Subjects:\n");
    out.push_str(&panel_text(state.subjects(), |list| {
        list.iter()
            .map(|s| {
                let sel = state.selected_subject() == Some(s.id);
                format!(" {}{:>8}  {}\n", marker(sel), s.id, s.name)
            })
            .collect()
    }));

    let types: Vec<&str> = state
        .filter_options()
        .iter()
        .map(|o| o.value.as_str())
        .collect();
    out.push_str(&format!(
        "Documents [query: \"{}\", type: {}, types: {}{}]:\n",
        state.filter().query(),
        state.filter().kind(),
        types.join("|"),
        if state.controls_enabled() {
            ""
        } else {
            ", controls disabled"
        }
    ));
    let ctx = ctx.for_course(state.selected_subject());
    out.push_str(&documents_text(&state.documents_view(), &ctx));
    out
}

/// Run the stdin loop until EOF or `quit`.
pub async fn run_browse(api: Arc<dyn PortalApi>, ctx: &CardContext) -> Result<()> {
    let mut dashboard = Dashboard::new(api);
    dashboard.dispatch(Action::Start);
    print!("{}", view_text(dashboard.settle().await, ctx));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(&line) {
            Ok(Command::Quit) => break,
            Ok(Command::Show) => {}
            Ok(Command::Act(act)) => {
                debug!(?act, "browse action");
                dashboard.dispatch(act.into_action());
            }
            Err(msg) => {
                eprintln!("{}", msg);
                continue;
            }
        }
        println!();
        print!("{}", view_text(dashboard.settle().await, ctx));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_parse_lines() {
        assert_eq!(
            parse_line("sem 2"),
            Ok(Command::Act(ActionLine::Semester(2)))
        );
        assert_eq!(
            parse_line("subject 101"),
            Ok(Command::Act(ActionLine::Subject(Some(101))))
        );
        assert_eq!(
            parse_line("subject none"),
            Ok(Command::Act(ActionLine::Subject(None)))
        );
        assert_eq!(
            parse_line("query  Lab Sheet "),
            Ok(Command::Act(ActionLine::Query("Lab Sheet".into())))
        );
        assert_eq!(
            parse_line("query"),
            Ok(Command::Act(ActionLine::Query(String::new())))
        );
        assert_eq!(parse_line("show"), Ok(Command::Show));
        assert_eq!(parse_line("quit"), Ok(Command::Quit));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_line("sem two").is_err());
        assert!(parse_line("subject x").is_err());
        assert!(parse_line("reload").is_err());
    }

    #[test]
    fn test_initial_view_text() {
        let ctx = CardContext::from_config(&Config::minimal());
        let text = view_text(&DashboardState::new(), &ctx);
        assert!(text.contains("Semesters:"));
        assert!(text.contains("controls disabled"));
        assert!(text.contains("Select a subject to load documents"));
    }
}
