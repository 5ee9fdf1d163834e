//! # Portal Dash
//!
//! A client for a student-portal backend: browse semesters, subjects and
//! course documents, search and filter documents in memory, and view
//! attendance. Ships as a library, a CLI (`portal`) and a small
//! server-rendered web dashboard.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌─────────────┐   ┌──────────────┐
//! │   Backend    │──▶│  Adapters   │──▶│  Dashboard   │
//! │ /api, /api/v1│   │ api, client │   │ state+runtime│
//! └──────────────┘   └─────────────┘   └──────┬───────┘
//!                                             │
//!                        ┌────────────────────┤
//!                        ▼                    ▼
//!                   ┌──────────┐        ┌──────────┐
//!                   │   CLI    │        │   HTTP   │
//!                   │ (portal) │        │  (HTML)  │
//!                   └──────────┘        └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! portal semesters                   # list semesters
//! portal subjects 2                  # subjects of the second semester
//! portal docs 101 --type resource    # filtered documents of a course
//! portal browse                      # drive the dashboard from stdin
//! portal serve                       # start the web dashboard
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Canonical data types |
//! | [`error`] | Fetch failure taxonomy |
//! | [`api`] | Endpoint paths and response adapters |
//! | [`client`] | `PortalApi` trait and HTTP implementation |
//! | [`filter`] | In-memory search and type filter |
//! | [`format`] | Display names and timestamps |
//! | [`render`] | Panel states and document cards |
//! | [`dashboard`] | Dashboard state machine |
//! | [`runtime`] | Runs dashboard requests |
//! | [`html`] | Dashboard HTML |
//! | [`attendance`] | Attendance views |
//! | [`commands`] | One-shot CLI listings |
//! | [`browse`] | Interactive CLI dashboard |
//! | [`server`] | Web dashboard server |
//! | [`logging`] | Tracing setup |

pub mod api;
pub mod attendance;
pub mod browse;
pub mod client;
pub mod commands;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod format;
pub mod html;
pub mod logging;
pub mod models;
pub mod render;
pub mod runtime;
pub mod server;
