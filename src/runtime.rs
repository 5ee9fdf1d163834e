//! Single-threaded driver for the dashboard state machine.
//!
//! Effects returned by [`DashboardState::apply`] are spawned as tokio
//! tasks; each task sends its completion back as an [`Action`] on one mpsc
//! queue, and only [`Dashboard`] reduces actions. Requests therefore run
//! concurrently while state changes happen one at a time, in arrival order.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::client::PortalApi;
use crate::dashboard::{Action, DashboardState, Effect};
use crate::error::FetchError;

pub struct Dashboard {
    api: Arc<dyn PortalApi>,
    state: DashboardState,
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Action>,
    in_flight: usize,
}

impl Dashboard {
    pub fn new(api: Arc<dyn PortalApi>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            api,
            state: DashboardState::new(),
            tx,
            rx,
            in_flight: 0,
        }
    }

    /// Current snapshot.
    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Number of requests whose completion has not been reduced yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Reduce `action` and start any requests it asks for.
    pub fn dispatch(&mut self, action: Action) {
        let (next, effects) = self.state.apply(action);
        self.state = next;
        for effect in effects {
            self.spawn(effect);
        }
    }

    fn spawn(&mut self, effect: Effect) {
        debug!(?effect, "starting request");
        self.in_flight += 1;
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();

        tokio::spawn(async move {
            // The request runs in its own task so a panic inside the client
            // still produces a completion for this effect.
            let action = match tokio::spawn(fetch(api, effect.clone())).await {
                Ok(action) => action,
                Err(err) => {
                    warn!(?effect, error = %err, "request task failed");
                    failed(effect, FetchError::Network(err.to_string()))
                }
            };
            // The receiver lives as long as the dashboard; a send error only
            // means the dashboard was dropped.
            let _ = tx.send(action);
        });
    }

    /// Wait for the next completion and reduce it. Returns `false` when
    /// nothing is in flight.
    pub async fn step(&mut self) -> bool {
        if self.in_flight == 0 {
            return false;
        }
        match self.rx.recv().await {
            Some(action) => {
                self.in_flight -= 1;
                self.dispatch(action);
                true
            }
            None => false,
        }
    }

    /// Reduce completions until no request is outstanding.
    pub async fn settle(&mut self) -> &DashboardState {
        while self.step().await {}
        &self.state
    }
}

async fn fetch(api: Arc<dyn PortalApi>, effect: Effect) -> Action {
    match effect {
        Effect::FetchSemesters => Action::SemestersLoaded(api.semesters().await),
        Effect::FetchSubjects {
            generation,
            semester,
        } => Action::SubjectsLoaded {
            generation,
            result: api.subjects(semester).await,
        },
        Effect::FetchDocuments {
            generation,
            course_id,
        } => Action::DocumentsLoaded {
            generation,
            result: api.documents(course_id).await,
        },
    }
}

/// The completion `effect` reports when its request never returned.
fn failed(effect: Effect, err: FetchError) -> Action {
    match effect {
        Effect::FetchSemesters => Action::SemestersLoaded(Err(err)),
        Effect::FetchSubjects { generation, .. } => Action::SubjectsLoaded {
            generation,
            result: Err(err),
        },
        Effect::FetchDocuments { generation, .. } => Action::DocumentsLoaded {
            generation,
            result: Err(err),
        },
    }
}
