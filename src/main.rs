//! # Portal Dash CLI (`portal`)
//!
//! Browse a student portal from the terminal or serve the web dashboard.
//!
//! ## Usage
//!
//! ```bash
//! portal --config ./config/portal.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `portal semesters` | List semesters with their keys |
//! | `portal subjects <SEM>` | List subjects of a semester |
//! | `portal docs <COURSE>` | List (and filter) the documents of a course |
//! | `portal attendance` | Overall and per-course attendance |
//! | `portal browse` | Interactive dashboard on stdin/stdout |
//! | `portal endpoints` | Show the backend URLs in use |
//! | `portal serve` | Start the web dashboard |
//!
//! ## Examples
//!
//! ```bash
//! # Search a course's documents for "lab"
//! portal docs 101 --query lab
//!
//! # Only resources, rendered as HTML cards
//! portal docs 101 --type resource --html
//!
//! # Class-by-class attendance of one course
//! portal attendance --course 7
//!
//! # Talk to the versioned backend
//! portal --api-version v1 semesters
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use portal_dash::api::{ApiVersion, DocAction};
use portal_dash::client::{HttpPortal, PortalApi};
use portal_dash::render::CardContext;
use portal_dash::{browse, commands, config, logging, server};

/// Portal Dash: semesters, subjects, documents and attendance from a
/// student portal backend.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/portal.example.toml` for a full example. A missing
/// file means built-in defaults.
#[derive(Parser)]
#[command(name = "portal", version, about = "Student portal dashboard client")]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/portal.toml")]
    config: PathBuf,

    /// Override `[api].base_url`.
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Override `[api].version` (`legacy` or `v1`).
    #[arg(long, global = true, value_parser = parse_version)]
    api_version: Option<ApiVersion>,

    /// Log request details to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// List semesters.
    ///
    /// Keys are 1-based positions in the backend's list; pass them to
    /// `subjects`.
    Semesters,

    /// List the subjects of a semester.
    Subjects {
        /// Semester key as printed by `semesters`.
        semester: u32,
    },

    /// List the documents of a course, flattened across weeks.
    Docs {
        /// Course id as printed by `subjects`.
        course: i64,

        /// Case-insensitive substring matched against document and module names.
        #[arg(long, short)]
        query: Option<String>,

        /// Only show this document type (`all` for everything).
        #[arg(long = "type", short = 't')]
        kind: Option<String>,

        /// Print HTML cards instead of text.
        #[arg(long)]
        html: bool,
    },

    /// Show attendance.
    Attendance {
        /// Show class-by-class records for this course (its `altid`).
        #[arg(long)]
        course: Option<i64>,
    },

    /// Drive the dashboard interactively.
    ///
    /// Reads commands (`sem N`, `subject ID`, `query TEXT`, `filter TYPE`,
    /// `show`, `quit`) from stdin and prints the dashboard after each one.
    Browse,

    /// Show the backend URLs the client calls.
    Endpoints,

    /// Start the web dashboard.
    ///
    /// Binds to the address configured in `[server].bind`.
    Serve {
        /// Override `[server].bind`.
        #[arg(long)]
        bind: Option<String>,
    },
}

fn parse_version(s: &str) -> Result<ApiVersion, String> {
    match s.to_ascii_lowercase().as_str() {
        "legacy" => Ok(ApiVersion::Legacy),
        "v1" => Ok(ApiVersion::V1),
        other => Err(format!("unknown api version '{}': expected legacy or v1", other)),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    let mut cfg =
        config::load_or_default(&cli.config)?.with_overrides(cli.base_url, cli.api_version)?;

    let http = HttpPortal::new(&cfg)?;
    let ctx = CardContext::from_config(&cfg);

    match cli.command {
        Commands::Semesters => {
            commands::run_semesters(&http).await?;
        }
        Commands::Subjects { semester } => {
            commands::run_subjects(&http, semester).await?;
        }
        Commands::Docs {
            course,
            query,
            kind,
            html,
        } => {
            commands::run_docs(
                &http,
                &ctx,
                course,
                query.as_deref(),
                kind.as_deref(),
                html,
            )
            .await?;
        }
        Commands::Attendance { course } => {
            commands::run_attendance(&http, course).await?;
        }
        Commands::Browse => {
            let api: Arc<dyn PortalApi> = Arc::new(http);
            browse::run_browse(api, &ctx).await?;
        }
        Commands::Endpoints => {
            let ep = http.endpoints();
            println!("API version: {}", ep.version());
            println!();
            println!("  semesters:          {}", ep.semesters());
            println!("  subjects:           {}", ep.subjects(1));
            println!("  documents:          {}", ep.documents(0));
            let doc = |action| match ep.version() {
                ApiVersion::Legacy => ep.document_action(0, action),
                ApiVersion::V1 => ep.course_document(0, 0, action),
            };
            println!("  document (view):    {}", doc(DocAction::View));
            println!("  document (download): {}", doc(DocAction::Download));
            println!("  attendance:         {}", ep.attendance_overall());
            if let Some(courses) = ep.attendance_courses() {
                println!("  attendance courses: {}", courses);
            }
            println!("  course attendance:  {}", ep.attendance_course(0));
        }
        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                cfg.server.bind = bind;
            }
            server::run_server_with_api(&cfg, Arc::new(http)).await?;
        }
    }

    Ok(())
}
