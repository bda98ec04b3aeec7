//! Preview surface value types
//!
//! The live surface itself belongs to a host (a browser frame, or an
//! in-memory stand-in under test). This module holds the pure values the
//! engine passes across that seam: ids, scroll offsets, the replacement
//! descriptor used by the frame swap, and the DOM marker contract.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The source attribute of a preview surface.
///
/// Deliberately excluded from attribute copies during a swap: rewriting it
/// on a live surface triggers a reload through normal navigation.
pub const SOURCE_ATTRIBUTE: &str = "src";

/// Opaque handle to a preview surface owned by a host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceId(pub u64);

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface#{}", self.0)
    }
}

/// Opaque handle to a browser tab opened by a host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TabId(pub u64);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tab#{}", self.0)
    }
}

/// Scroll offset of a surface's content, captured immediately before a
/// swap and re-applied to the replacement after it finishes loading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrollPosition {
    pub top: f64,
    pub left: f64,
}

impl ScrollPosition {
    pub fn new(top: f64, left: f64) -> Self {
        Self { top, left }
    }
}

/// Visual flag the engine toggles on the panel markup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelFlag {
    /// Loading indicator shown while a submission/swap cycle is running
    Loading,
    /// The last verdict reported invalid content
    HasErrors,
    /// The last verdict reported no applicable preview mode
    Unavailable,
    /// Default sizing forced, overriding the selected device preset
    DefaultSize,
}

/// Everything needed to finish constructing a replacement surface: the old
/// surface's attributes minus the source attribute, plus the scroll offset
/// to restore once the replacement has loaded.
///
/// Pure value; building it does not touch any live surface, which keeps the
/// swap's attribute-transfer rules testable without a rendering context.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceDescriptor {
    pub attributes: BTreeMap<String, String>,
    pub scroll: ScrollPosition,
}

impl SurfaceDescriptor {
    /// Derive the replacement descriptor from the old surface's attributes.
    ///
    /// Copies every attribute except [`SOURCE_ATTRIBUTE`].
    pub fn for_replacement(
        old_attributes: &BTreeMap<String, String>,
        scroll: ScrollPosition,
    ) -> Self {
        let attributes = old_attributes
            .iter()
            .filter(|(name, _)| name.as_str() != SOURCE_ATTRIBUTE)
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        Self { attributes, scroll }
    }
}

// ─────────────────────────────────────────────────────────────────
// DOM Marker Contract
// ─────────────────────────────────────────────────────────────────

/// Data attributes identifying the panel's moving parts in page markup.
///
/// These are the sole contract between the engine and the surrounding page;
/// a host locates its anchors by them. A page with no panel root is a
/// silent no-op, not an error.
pub mod markers {
    /// Panel root element
    pub const PANEL: &str = "data-preview-panel";
    /// Size preset radio inputs
    pub const SIZE_INPUT: &str = "data-preview-size-input";
    /// The default-size input, forced when the preview is unavailable
    pub const DEFAULT_SIZE_INPUT: &str = "data-preview-default-size";
    /// "Open in new tab" trigger
    pub const NEW_TAB: &str = "data-preview-new-tab";
    /// Loading indicator element
    pub const LOADING: &str = "data-preview-loading";
    /// The embedded preview surface
    pub const SURFACE: &str = "data-preview-surface";
    /// Preview mode select control
    pub const MODE_SELECT: &str = "data-preview-mode-select";
    /// The edit form whose fields are snapshotted
    pub const EDIT_FORM: &str = "data-edit-form";
    /// Present when automatic polling updates are enabled
    pub const AUTO_UPDATE: &str = "data-preview-auto-update";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn old_attrs() -> BTreeMap<String, String> {
        BTreeMap::from([
            ("src".to_string(), "/preview/?mode=desktop".to_string()),
            ("id".to_string(), "preview-frame".to_string()),
            ("class".to_string(), "preview".to_string()),
            ("title".to_string(), "Preview".to_string()),
        ])
    }

    #[test]
    fn test_descriptor_strips_source_attribute() {
        let desc = SurfaceDescriptor::for_replacement(&old_attrs(), ScrollPosition::default());
        assert!(!desc.attributes.contains_key(SOURCE_ATTRIBUTE));
        assert_eq!(desc.attributes.len(), 3);
    }

    #[test]
    fn test_descriptor_copies_all_other_attributes() {
        let old = old_attrs();
        let desc = SurfaceDescriptor::for_replacement(&old, ScrollPosition::default());
        for (name, value) in &old {
            if name == SOURCE_ATTRIBUTE {
                continue;
            }
            assert_eq!(desc.attributes.get(name), Some(value), "attribute {name}");
        }
    }

    #[test]
    fn test_descriptor_carries_scroll() {
        let scroll = ScrollPosition::new(1024.0, 16.5);
        let desc = SurfaceDescriptor::for_replacement(&old_attrs(), scroll);
        assert_eq!(desc.scroll, scroll);
    }

    #[test]
    fn test_descriptor_without_source_attribute() {
        let mut old = old_attrs();
        old.remove(SOURCE_ATTRIBUTE);
        let desc = SurfaceDescriptor::for_replacement(&old, ScrollPosition::default());
        assert_eq!(desc.attributes, old);
    }

    #[test]
    fn test_scroll_default_is_origin() {
        let s = ScrollPosition::default();
        assert_eq!(s.top, 0.0);
        assert_eq!(s.left, 0.0);
    }

    #[test]
    fn test_id_display() {
        assert_eq!(SurfaceId(3).to_string(), "surface#3");
        assert_eq!(TabId(1).to_string(), "tab#1");
    }

    #[test]
    fn test_markers_are_distinct_data_attributes() {
        let all = [
            markers::PANEL,
            markers::SIZE_INPUT,
            markers::DEFAULT_SIZE_INPUT,
            markers::NEW_TAB,
            markers::LOADING,
            markers::SURFACE,
            markers::MODE_SELECT,
            markers::EDIT_FORM,
            markers::AUTO_UPDATE,
        ];
        for marker in all {
            assert!(marker.starts_with("data-"), "{marker}");
        }
        let unique: std::collections::BTreeSet<_> = all.iter().collect();
        assert_eq!(unique.len(), all.len());
    }
}
