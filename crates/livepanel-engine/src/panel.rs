//! Per-panel session state -- surface ownership, pending gate, flags, timing.

use chrono::{DateTime, Local};

use livepanel_core::{ScrollPosition, SnapshotComparator, SurfaceId};

/// A single preview panel's mutable state.
///
/// One instance per panel; every mutation funnels through the engine task
/// that owns it, preserving single-writer semantics without ambient/global
/// state.
#[derive(Debug)]
pub struct PanelSession {
    /// The surface currently displayed. Ownership transfers atomically at
    /// swap completion; at no time do two surfaces share identity as
    /// "current".
    pub current_surface: SurfaceId,

    /// True from request dispatch until the corresponding swap completes
    /// or the request fails. Never true for two overlapping requests.
    pub pending: bool,

    /// Scroll offset captured from the displayed surface immediately before
    /// replacement, re-applied to the replacement after it loads.
    pub captured_scroll: ScrollPosition,

    /// Active preview mode, as carried in the surface source URL
    pub mode: String,

    /// Target for the "open in new tab" trigger (panel marker stripped)
    pub new_tab_target: Option<String>,

    // ─────────────────────────────────────────────────────────
    // Verdict Flags
    // ─────────────────────────────────────────────────────────
    /// Last verdict reported invalid content
    pub has_errors: bool,

    /// Last verdict reported no applicable preview mode
    pub unavailable: bool,

    // ─────────────────────────────────────────────────────────
    // Change Detection
    // ─────────────────────────────────────────────────────────
    /// Reference snapshot for the poll loop's change detection
    pub comparator: SnapshotComparator,

    // ─────────────────────────────────────────────────────────
    // Timing
    // ─────────────────────────────────────────────────────────
    /// When this session was created
    pub created_at: DateTime<Local>,

    /// When the last successful swap completed
    pub last_synced_at: Option<DateTime<Local>>,

    /// Completed request/swap cycles this session
    pub sync_count: u32,
}

impl PanelSession {
    /// Create a session around the panel's initial surface
    pub fn new(current_surface: SurfaceId, mode: impl Into<String>) -> Self {
        Self {
            current_surface,
            pending: false,
            captured_scroll: ScrollPosition::default(),
            mode: mode.into(),
            new_tab_target: None,
            has_errors: false,
            unavailable: false,
            comparator: SnapshotComparator::new(),
            created_at: Local::now(),
            last_synced_at: None,
            sync_count: 0,
        }
    }

    /// Record a completed request/swap cycle
    pub fn record_sync(&mut self) {
        self.sync_count += 1;
        self.last_synced_at = Some(Local::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_defaults() {
        let session = PanelSession::new(SurfaceId(1), "desktop");
        assert_eq!(session.current_surface, SurfaceId(1));
        assert!(!session.pending);
        assert!(!session.has_errors);
        assert!(!session.unavailable);
        assert_eq!(session.mode, "desktop");
        assert_eq!(session.sync_count, 0);
        assert!(session.last_synced_at.is_none());
        assert_eq!(session.captured_scroll, ScrollPosition::default());
    }

    #[test]
    fn test_record_sync_advances_counters() {
        let mut session = PanelSession::new(SurfaceId(1), "desktop");
        session.record_sync();
        session.record_sync();
        assert_eq!(session.sync_count, 2);
        assert!(session.last_synced_at.is_some());
    }
}
