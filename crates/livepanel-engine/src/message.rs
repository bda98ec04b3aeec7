//! Control messages for the panel engine

use livepanel_core::TabId;

/// Messages a page (or driver) sends to the engine's control channel.
///
/// The poll loop is the sole periodic driver of synchronization; these are
/// the user-triggered paths alongside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelMessage {
    /// Preview mode changed via the mode select control
    SetMode(String),

    /// "Open in new tab" was triggered.
    ///
    /// Browser hosts open the blank tab synchronously inside the click
    /// gesture (popup blocking) and pass its id; `None` asks the engine to
    /// open one through the host.
    OpenInNewTab { tab: Option<TabId> },

    /// Force a synchronization regardless of form-change state
    SyncNow,

    /// Stop the engine loop
    Shutdown,
}
