//! Submission pipeline -- request gate, verdict handling, cycle lifecycle
//!
//! A cycle runs: gate check, pending set, loading shown, snapshot capture,
//! endpoint exchange, verdict flags, scroll capture, frame swap. Pending
//! stays true until the swap completes; a transport failure clears it
//! without swapping so the last known-good preview stays on screen.

use livepanel_client::RenderEndpoint;
use livepanel_core::prelude::*;
use livepanel_core::PanelFlag;

use crate::engine::PanelEngine;
use crate::form::FormSource;
use crate::host::SurfaceHost;

/// Who asked for a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SubmitOrigin {
    /// The fixed-cadence poll loop; rejected while a cycle is pending
    Poll,
    /// A user-triggered path (mode change, new tab, forced sync)
    Explicit,
}

impl<H, E, F> PanelEngine<H, E, F>
where
    H: SurfaceHost,
    E: RenderEndpoint,
    F: FormSource,
{
    /// Force a synchronization regardless of form-change state
    pub(crate) async fn sync_now(&mut self) -> Result<()> {
        self.submit(SubmitOrigin::Explicit).await.map(|_| ())
    }

    /// Run one submission cycle.
    ///
    /// Resolves to `Some(is_valid)` once the matching swap has completed,
    /// or `None` when the gate rejected a poll-origin attempt. Explicit
    /// attempts are never rejected; they reach this method only after any
    /// prior cycle has fully resolved, since all cycles run inline on the
    /// engine task.
    pub(crate) async fn submit(&mut self, origin: SubmitOrigin) -> Result<Option<bool>> {
        if self.session.pending && origin == SubmitOrigin::Poll {
            debug!("request gate: cycle pending, poll attempt rejected");
            return Ok(None);
        }

        self.session.pending = true;
        self.host.set_flag(PanelFlag::Loading, true);

        let snapshot = self.form.capture();
        // the submitted content becomes the comparator reference, so the
        // next poll tick does not re-submit what this cycle already sent
        self.session.comparator.seed(&snapshot);

        let verdict = match self.endpoint.render(&snapshot).await {
            Ok(verdict) => verdict,
            Err(err) => {
                // no swap, flags untouched: the last known-good preview
                // stays displayed
                self.abort_cycle();
                return Err(err);
            }
        };

        self.session.has_errors = !verdict.is_valid;
        self.session.unavailable = !verdict.is_available;
        self.host.set_flag(PanelFlag::HasErrors, self.session.has_errors);
        self.host.set_flag(PanelFlag::Unavailable, self.session.unavailable);
        // an unavailable preview overrides the selected device preset
        self.host
            .set_flag(PanelFlag::DefaultSize, self.session.unavailable);

        self.session.captured_scroll = match self.host.scroll(self.session.current_surface) {
            Ok(scroll) => scroll,
            Err(err) => {
                self.abort_cycle();
                return Err(err);
            }
        };

        if let Err(err) = self.swap_surface().await {
            self.abort_cycle();
            return Err(err);
        }

        Ok(Some(verdict.is_valid))
    }

    /// Unwind a failed cycle: hide the loading indicator, clear pending.
    fn abort_cycle(&mut self) {
        self.host.set_flag(PanelFlag::Loading, false);
        self.session.pending = false;
    }
}
