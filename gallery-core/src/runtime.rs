//! Event loop glue between [`GalleryState`] and the [`FetchOrchestrator`].
//!
//! The runtime owns the only copy of the state. Fetches run as spawned tasks
//! and report back over a channel; completions are applied in arrival order and
//! the state itself discards any that belong to a superseded request.

use tokio::sync::mpsc;

use crate::{
    error::NavigationError,
    fetch::FetchOrchestrator,
    model::FetchOutcome,
    state::{Action, Event, GalleryState, reduce},
};

#[derive(Debug)]
struct Completion {
    request: u64,
    outcome: FetchOutcome,
}

#[derive(Debug)]
pub struct GalleryRuntime {
    state: GalleryState,
    orchestrator: FetchOrchestrator,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
    in_flight: usize,
}

impl GalleryRuntime {
    pub fn new(orchestrator: FetchOrchestrator) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            state: GalleryState::new(),
            orchestrator,
            completions_tx,
            completions_rx,
            in_flight: 0,
        }
    }

    pub fn state(&self) -> &GalleryState {
        &self.state
    }

    /// Number of spawned fetches whose completion has not been applied yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Applies `event` and starts any fetch it requests. Must be called inside a Tokio runtime.
    pub fn dispatch(&mut self, event: Event) -> Result<(), NavigationError> {
        let transition = reduce(&self.state, event)?;
        self.state = transition.state;
        for action in transition.actions {
            self.perform(action);
        }
        Ok(())
    }

    fn perform(&mut self, action: Action) {
        match action {
            Action::Fetch(request) => {
                let orchestrator = self.orchestrator.clone();
                let tx = self.completions_tx.clone();
                self.in_flight += 1;

                let id = request.id;
                let task = tokio::spawn(async move { orchestrator.run(&request).await });

                tokio::spawn(async move {
                    // A panicking fetch still has to report, or `settle` would wait forever.
                    let outcome = task.await.unwrap_or_else(|err| {
                        tracing::error!(request = id, error = %err, "fetch task aborted");
                        FetchOutcome::Failed { reason: format!("fetch task aborted: {err}") }
                    });
                    // The receiver lives as long as the runtime; a send error only means it is gone.
                    let _ = tx.send(Completion { request: id, outcome });
                });
            }
        }
    }

    /// Waits for the next fetch to finish and applies it. Returns `false` if nothing is in flight.
    pub async fn next_completion(&mut self) -> bool {
        if self.in_flight == 0 {
            return false;
        }

        let Some(completion) = self.completions_rx.recv().await else {
            return false;
        };
        self.in_flight -= 1;

        let event = Event::FetchCompleted { request: completion.request, outcome: completion.outcome };
        if let Err(err) = self.dispatch(event) {
            tracing::warn!(error = %err, "completion rejected");
        }
        true
    }

    /// Waits until every issued fetch has completed.
    pub async fn settle(&mut self) {
        while self.next_completion().await {}
    }
}
