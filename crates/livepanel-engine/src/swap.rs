//! Frame swap engine -- flicker-free replacement of the preview surface
//!
//! Reloading the visible surface in place flashes blank and resets scroll.
//! Instead, a hidden twin is spawned pointing at the same source, loads in
//! parallel while the old surface stays visible and interactive, and takes
//! over the moment it is ready.

use livepanel_client::RenderEndpoint;
use livepanel_core::prelude::*;
use livepanel_core::{PanelFlag, SurfaceDescriptor, SurfaceId};

use crate::engine::PanelEngine;
use crate::form::FormSource;
use crate::host::SurfaceHost;

impl<H, E, F> PanelEngine<H, E, F>
where
    H: SurfaceHost,
    E: RenderEndpoint,
    F: FormSource,
{
    /// Replace the current surface with a freshly loaded twin.
    ///
    /// On completion the twin is the session's current surface, the old
    /// one is gone, pending is cleared and the loading indicator hidden.
    /// Ownership of "current" transfers atomically here; the session never
    /// refers to two surfaces at once.
    pub(crate) async fn swap_surface(&mut self) -> Result<()> {
        let old = self.session.current_surface;
        let src = self.host.current_source(old)?;
        let replacement = self.host.spawn_hidden_surface(&src)?;
        debug!(%old, %replacement, "replacement surface loading");

        match self.finish_swap(old, replacement).await {
            Ok(()) => Ok(()),
            Err(err) => {
                // leave the old surface in place; the twin is useless now
                let _ = self.host.remove_surface(replacement);
                Err(err)
            }
        }
    }

    async fn finish_swap(&mut self, old: SurfaceId, replacement: SurfaceId) -> Result<()> {
        // old stays visible until the twin has fully loaded
        self.host.await_load(replacement).await?;

        let descriptor =
            SurfaceDescriptor::for_replacement(&self.host.attributes(old)?, self.session.captured_scroll);
        self.host.apply_descriptor(replacement, &descriptor)?;

        self.host.remove_surface(old)?;
        self.session.current_surface = replacement;
        self.host.clear_placeholder(replacement)?;

        self.session.pending = false;
        self.host.set_flag(PanelFlag::Loading, false);
        self.session.record_sync();
        debug!(surface = %replacement, "swap complete");
        Ok(())
    }
}
