//! Rendering endpoint verdicts

use serde::{Deserialize, Serialize};

/// The rendering endpoint's answer to a snapshot submission.
///
/// Decoded from the JSON body `{"is_valid": bool, "is_available": bool}`.
/// The two flags drive independent visual states on the panel (error state,
/// unavailable state) and are not mutually exclusive. Neither is an error:
/// an invalid or unavailable verdict still swaps the surface so the preview
/// reflects what the server rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewVerdict {
    /// Whether the submitted form content passed server-side validation
    pub is_valid: bool,
    /// Whether a preview mode is applicable for this content at all
    pub is_available: bool,
}

impl PreviewVerdict {
    /// Verdict for content that rendered cleanly
    pub fn ok() -> Self {
        Self {
            is_valid: true,
            is_available: true,
        }
    }

    /// Parse a verdict from an endpoint response body
    pub fn parse(body: &str) -> serde_json::Result<Self> {
        serde_json::from_str(body)
    }
}
