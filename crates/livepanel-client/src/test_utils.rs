//! Test helpers for exercising the engine without a real endpoint
//!
//! Gated behind the `test-helpers` feature so downstream crates can opt in
//! from their dev-dependencies.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use livepanel_core::prelude::*;
use livepanel_core::{FormSnapshot, PreviewVerdict};

use crate::endpoint::RenderEndpoint;

/// One scripted outcome for a [`ScriptedEndpoint`]
#[derive(Debug, Clone)]
enum ScriptedOutcome {
    Verdict(PreviewVerdict),
    TransportError(String),
}

#[derive(Debug, Default)]
struct ScriptedState {
    script: VecDeque<ScriptedOutcome>,
    snapshots: Vec<FormSnapshot>,
}

/// A rendering endpoint that replays a scripted sequence of outcomes and
/// records every snapshot it receives.
///
/// When the script is exhausted, further calls answer with a clean verdict.
/// An optional per-call delay lets tests overlap an in-flight request with
/// poll ticks or user actions.
#[derive(Debug, Clone, Default)]
pub struct ScriptedEndpoint {
    state: Arc<Mutex<ScriptedState>>,
    delay: Option<Duration>,
}

impl ScriptedEndpoint {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every `render` call, simulating network latency
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queue a verdict for the next unscripted call
    pub fn push_verdict(&self, verdict: PreviewVerdict) {
        self.state
            .lock()
            .unwrap()
            .script
            .push_back(ScriptedOutcome::Verdict(verdict));
    }

    /// Queue a transport failure for the next unscripted call
    pub fn push_transport_error(&self, message: impl Into<String>) {
        self.state
            .lock()
            .unwrap()
            .script
            .push_back(ScriptedOutcome::TransportError(message.into()));
    }

    /// Number of `render` calls observed so far
    pub fn calls(&self) -> usize {
        self.state.lock().unwrap().snapshots.len()
    }

    /// Snapshots received, in submission order
    pub fn snapshots(&self) -> Vec<FormSnapshot> {
        self.state.lock().unwrap().snapshots.clone()
    }
}

impl RenderEndpoint for ScriptedEndpoint {
    async fn render(&self, snapshot: &FormSnapshot) -> Result<PreviewVerdict> {
        let outcome = {
            let mut state = self.state.lock().unwrap();
            state.snapshots.push(snapshot.clone());
            state.script.pop_front()
        };

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match outcome {
            Some(ScriptedOutcome::Verdict(v)) => Ok(v),
            Some(ScriptedOutcome::TransportError(message)) => Err(Error::transport(message)),
            None => Ok(PreviewVerdict::ok()),
        }
    }
}
