//! Panel engine -- the single-writer orchestration loop
//!
//! One task owns the panel session and performs every mutation: the fixed
//! 500 ms poll tick drives automatic synchronization, and a control channel
//! carries the user-triggered paths (mode change, open in new tab, forced
//! sync). Because submissions run inline in this task, at most one
//! request/swap cycle is ever in flight and swaps cannot interleave.

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use livepanel_client::RenderEndpoint;
use livepanel_core::prelude::*;
use livepanel_core::TabId;

use crate::config::PanelConfig;
use crate::form::FormSource;
use crate::host::SurfaceHost;
use crate::message::PanelMessage;
use crate::panel::PanelSession;
use crate::sync::SubmitOrigin;

/// User-facing alert shown when a submission fails in transit
pub(crate) const SUBMIT_FAILED_ALERT: &str = "Error while sending preview data.";

/// The preview panel's synchronization engine.
///
/// Owns the [`PanelSession`] and the three collaborator seams: the surface
/// host, the rendering endpoint, and the form source. Constructed with
/// [`attach`](PanelEngine::attach) and consumed by [`run`](PanelEngine::run).
pub struct PanelEngine<H, E, F> {
    pub(crate) host: H,
    pub(crate) endpoint: E,
    pub(crate) form: F,
    pub(crate) config: PanelConfig,
    pub(crate) session: PanelSession,
    rx: mpsc::Receiver<PanelMessage>,
}

/// Cloneable sender side of the engine's control channel
#[derive(Debug, Clone)]
pub struct PanelHandle {
    tx: mpsc::Sender<PanelMessage>,
}

impl PanelHandle {
    /// Change the active preview mode
    pub async fn set_mode(&self, mode: impl Into<String>) -> Result<()> {
        self.send(PanelMessage::SetMode(mode.into())).await
    }

    /// Open the preview in a new tab.
    ///
    /// Pass the id of a tab already opened within the triggering user
    /// gesture, or `None` to let the engine open one through the host.
    pub async fn open_in_new_tab(&self, tab: Option<TabId>) -> Result<()> {
        self.send(PanelMessage::OpenInNewTab { tab }).await
    }

    /// Force a synchronization regardless of form-change state
    pub async fn sync_now(&self) -> Result<()> {
        self.send(PanelMessage::SyncNow).await
    }

    /// Stop the engine loop
    pub async fn shutdown(&self) -> Result<()> {
        self.send(PanelMessage::Shutdown).await
    }

    async fn send(&self, msg: PanelMessage) -> Result<()> {
        self.tx
            .send(msg)
            .await
            .map_err(|e| Error::channel_send(format!("{:?}", e.0)))
    }
}

impl<H, E, F> PanelEngine<H, E, F>
where
    H: SurfaceHost,
    E: RenderEndpoint,
    F: FormSource,
{
    /// Attach an engine to the page.
    ///
    /// Returns `None` when the panel root markup is absent -- a page
    /// without a panel is a silent no-op, not an error.
    pub fn attach(
        host: H,
        endpoint: E,
        form: F,
        config: PanelConfig,
    ) -> Result<Option<(Self, PanelHandle)>> {
        if !host.panel_present() {
            debug!("no preview panel on page, nothing to do");
            return Ok(None);
        }

        let surface = host.initial_surface()?;
        let session = PanelSession::new(surface, config.initial_mode.clone());
        let (tx, rx) = mpsc::channel(config.channel_capacity);

        let engine = Self {
            host,
            endpoint,
            form,
            config,
            session,
            rx,
        };
        Ok(Some((engine, PanelHandle { tx })))
    }

    /// Whether the poll loop should drive automatic synchronization
    fn auto_update_enabled(&self) -> bool {
        self.config
            .auto_update
            .unwrap_or_else(|| self.host.auto_update_enabled())
    }

    /// Run the engine until shutdown.
    ///
    /// Seeds the comparator with the form's initial content so the first
    /// poll tick only fires for an actual edit.
    pub async fn run(mut self) -> Result<()> {
        let initial = self.form.capture();
        self.session.comparator.seed(&initial);
        info!(
            mode = %self.session.mode,
            poll_ms = self.config.poll_interval.as_millis() as u64,
            "panel engine running"
        );

        let mut poll = tokio::time::interval(self.config.poll_interval);
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // an interval's first tick completes immediately; the cadence
        // starts one full interval after startup
        poll.tick().await;

        loop {
            tokio::select! {
                _ = poll.tick() => {
                    self.poll_tick().await?;
                }
                msg = self.rx.recv() => match msg {
                    Some(PanelMessage::SetMode(mode)) => {
                        let outcome = self.set_mode(&mode).await;
                        self.settle(outcome)?;
                    }
                    Some(PanelMessage::OpenInNewTab { tab }) => {
                        let outcome = self.open_in_new_tab(tab).await;
                        self.settle(outcome)?;
                    }
                    Some(PanelMessage::SyncNow) => {
                        let outcome = self.sync_now().await;
                        self.settle(outcome)?;
                    }
                    Some(PanelMessage::Shutdown) | None => {
                        info!("panel engine stopping");
                        break;
                    }
                },
            }
        }
        Ok(())
    }

    /// One tick of the poll scheduler: gate on the pending flag, then on
    /// change detection, then submit.
    pub(crate) async fn poll_tick(&mut self) -> Result<()> {
        if !self.auto_update_enabled() {
            return Ok(());
        }
        if self.session.pending {
            debug!("poll tick skipped: submission pending");
            return Ok(());
        }
        let snapshot = self.form.capture();
        if !self.session.comparator.has_changed(&snapshot) {
            return Ok(());
        }

        debug!("form content changed, synchronizing preview");
        let outcome = self.submit(SubmitOrigin::Poll).await.map(|_| ());
        self.settle(outcome)
    }

    /// Convert a recoverable failure into a single user-visible alert; let
    /// fatal failures abort the run.
    fn settle(&self, outcome: Result<()>) -> Result<()> {
        match outcome {
            Ok(()) => Ok(()),
            Err(err) if err.is_fatal() => Err(err),
            Err(err) => {
                warn!("preview synchronization failed: {err}");
                self.host.alert(SUBMIT_FAILED_ALERT);
                Ok(())
            }
        }
    }
}
