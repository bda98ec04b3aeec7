//! Surface host seam
//!
//! Everything the engine needs from the rendering context it lives in --
//! a browser page in production, an in-memory recording host under test,
//! the headless host in the driver binary. The engine never touches a
//! surface directly; all reads and mutations go through this trait.

use std::collections::BTreeMap;

use livepanel_core::prelude::*;
use livepanel_core::{PanelFlag, ScrollPosition, SurfaceDescriptor, SurfaceId, TabId};

/// Operations the panel engine performs against its rendering context.
///
/// Surface mutations are synchronous; the one genuine suspension point is
/// [`await_load`](LocalSurfaceHost::await_load), which resolves when a
/// freshly spawned surface finishes loading its content. Implementations
/// are expected to use interior mutability; the engine holds a shared
/// reference.
#[trait_variant::make(SurfaceHost: Send)]
pub trait LocalSurfaceHost {
    // ─────────────────────────────────────────────────────────
    // Panel Markup
    // ─────────────────────────────────────────────────────────

    /// Whether the panel root markup exists on the page.
    ///
    /// A page without a panel is a silent no-op run, not an error.
    fn panel_present(&self) -> bool;

    /// Whether the markup enables automatic polling updates
    fn auto_update_enabled(&self) -> bool;

    /// The surface embedded in the panel at initialization time
    fn initial_surface(&self) -> Result<SurfaceId>;

    // ─────────────────────────────────────────────────────────
    // Surfaces
    // ─────────────────────────────────────────────────────────

    /// Source URL of a surface
    fn current_source(&self, id: SurfaceId) -> Result<String>;

    /// Rewrite a surface's source URL in place.
    ///
    /// This reloads the surface through the host's normal navigation and
    /// is visibly non-atomic; the swap path never uses it. Mode changes do,
    /// deliberately.
    fn set_source(&self, id: SurfaceId, src: &str) -> Result<()>;

    /// Create a not-yet-visible surface loading `src`, inserted immediately
    /// after the current surface: zero size, transparent, absolutely
    /// positioned so it cannot affect layout. Loading starts right away.
    fn spawn_hidden_surface(&self, src: &str) -> Result<SurfaceId>;

    /// Resolve once the surface finishes loading its content. One-shot:
    /// the host must detach its listener so it cannot fire again on later
    /// navigations of the same surface.
    async fn await_load(&self, id: SurfaceId) -> Result<()>;

    /// All attributes of a surface, including the source attribute
    fn attributes(&self, id: SurfaceId) -> Result<BTreeMap<String, String>>;

    /// Copy the descriptor's attributes onto the surface and restore the
    /// descriptor's scroll offset into its content.
    fn apply_descriptor(&self, id: SurfaceId, descriptor: &SurfaceDescriptor) -> Result<()>;

    /// Current scroll offset of a surface's content
    fn scroll(&self, id: SurfaceId) -> Result<ScrollPosition>;

    /// Drop the hidden sizing/visibility overrides left over from
    /// [`spawn_hidden_surface`](LocalSurfaceHost::spawn_hidden_surface),
    /// letting the surface render at full size.
    fn clear_placeholder(&self, id: SurfaceId) -> Result<()>;

    /// Remove a surface from the page
    fn remove_surface(&self, id: SurfaceId) -> Result<()>;

    // ─────────────────────────────────────────────────────────
    // Panel Chrome
    // ─────────────────────────────────────────────────────────

    /// Toggle a visual flag on the panel markup
    fn set_flag(&self, flag: PanelFlag, on: bool);

    /// Point the "open in new tab" trigger at `url`
    fn set_new_tab_target(&self, url: &str) -> Result<()>;

    /// Show a user-visible alert
    fn alert(&self, message: &str);

    // ─────────────────────────────────────────────────────────
    // Tabs
    // ─────────────────────────────────────────────────────────

    /// Open a blank tab and focus it.
    ///
    /// Browser hosts must call this synchronously within the triggering
    /// user gesture (popup blocking) and hand the id to the engine via
    /// [`PanelMessage::OpenInNewTab`](crate::PanelMessage::OpenInNewTab).
    fn open_tab(&self) -> Result<TabId>;

    /// Navigate an opened tab to `url`
    fn navigate_tab(&self, tab: TabId, url: &str) -> Result<()>;

    /// Close an opened tab
    fn close_tab(&self, tab: TabId) -> Result<()>;

    /// Return focus to the panel's own window
    fn refocus_panel(&self);
}
