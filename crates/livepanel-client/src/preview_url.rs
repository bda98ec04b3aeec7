//! Preview source URL handling
//!
//! The surface's source URL carries two query parameters the engine owns:
//! the active preview mode, and an internal marker meaning "being shown
//! inside the panel". The marker is stripped when deriving the URL used for
//! "open in new tab". All rewrites preserve every unrelated parameter in
//! its original order.

use livepanel_core::prelude::*;
use url::Url;

/// Query parameter carrying the active preview mode
pub const MODE_PARAM: &str = "mode";

/// Internal marker parameter: the surface is embedded in the panel
pub const PANEL_MARKER_PARAM: &str = "in_preview_panel";

/// Parse a preview URL, mapping parse failures to [`Error::InvalidUrl`]
pub fn parse_preview_url(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|e| Error::invalid_url(format!("{raw}: {e}")))
}

/// Replace a query parameter, preserving the order of all other parameters.
///
/// If the parameter appears, its first occurrence is replaced in place and
/// any duplicates are dropped; otherwise it is appended.
fn set_query_param(url: &Url, name: &str, value: &str) -> Url {
    let mut pairs: Vec<(String, String)> = Vec::new();
    let mut replaced = false;
    for (k, v) in url.query_pairs() {
        if k == name {
            if !replaced {
                pairs.push((name.to_string(), value.to_string()));
                replaced = true;
            }
        } else {
            pairs.push((k.into_owned(), v.into_owned()));
        }
    }
    if !replaced {
        pairs.push((name.to_string(), value.to_string()));
    }

    let mut out = url.clone();
    out.query_pairs_mut().clear().extend_pairs(pairs);
    out
}

/// Remove every occurrence of a query parameter, preserving the rest.
fn remove_query_param(url: &Url, name: &str) -> Url {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != name)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut out = url.clone();
    if pairs.is_empty() {
        out.set_query(None);
    } else {
        out.query_pairs_mut().clear().extend_pairs(pairs);
    }
    out
}

/// Set or replace the `mode` parameter
pub fn with_mode(url: &Url, mode: &str) -> Url {
    set_query_param(url, MODE_PARAM, mode)
}

/// Add the in-panel marker parameter
pub fn with_panel_marker(url: &Url) -> Url {
    set_query_param(url, PANEL_MARKER_PARAM, "true")
}

/// Strip the in-panel marker parameter
pub fn without_panel_marker(url: &Url) -> Url {
    remove_query_param(url, PANEL_MARKER_PARAM)
}

/// Derive the "open in new tab" URL from a surface source URL: same mode,
/// marker stripped.
pub fn new_tab_url(surface_src: &Url, mode: &str) -> Url {
    without_panel_marker(&with_mode(surface_src, mode))
}

/// Derive the source URL for a surface embedded in the panel: requested
/// mode, marker added.
pub fn panel_surface_url(preview: &Url, mode: &str) -> Url {
    with_panel_marker(&with_mode(preview, mode))
}
