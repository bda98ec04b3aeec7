//! # livepanel-client - Rendering Endpoint Client
//!
//! Network exchange with the server-side rendering endpoint and handling
//! of the preview surface's source URL.
//!
//! ## Public API
//!
//! ### Endpoint (`endpoint`)
//! - [`RenderEndpoint`] / [`LocalRenderEndpoint`] - The submission seam
//! - [`HttpRenderEndpoint`] - reqwest-backed implementation (form-encoded
//!   POST, JSON verdict body)
//!
//! ### Preview URLs (`preview_url`)
//! - [`with_mode`] - Rewrite the `mode` query parameter
//! - [`with_panel_marker`] / [`without_panel_marker`] - The internal
//!   in-panel marker parameter
//! - [`panel_surface_url`] - Derive an embedded surface's source URL
//! - [`new_tab_url`] - Derive the "open in new tab" target
//!
//! ### Test helpers (`test_utils`, feature `test-helpers`)
//! - [`ScriptedEndpoint`](test_utils::ScriptedEndpoint) - Scripted verdict
//!   sequences with snapshot recording

pub mod endpoint;
pub mod preview_url;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

pub use endpoint::{HttpRenderEndpoint, LocalRenderEndpoint, RenderEndpoint};
pub use preview_url::{
    new_tab_url, panel_surface_url, parse_preview_url, with_mode, with_panel_marker,
    without_panel_marker, MODE_PARAM, PANEL_MARKER_PARAM,
};
