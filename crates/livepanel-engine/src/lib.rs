//! Livepanel Engine
//!
//! The coordination core: a single-writer task that watches an edit form
//! for changes, submits snapshots to a render endpoint, and applies the
//! verdict to the panel through a [`SurfaceHost`].
//!
//! # Architecture
//!
//! - [`engine`] - The panel engine task, its handle, and message dispatch
//! - [`panel`] - Per-panel session state
//! - [`host`] - The surface host seam to the rendering context
//! - [`form`] - Form snapshot sources
//! - [`config`] - Engine tuning knobs
//! - [`message`] - Commands accepted by a running engine
//!
//! One engine owns one panel. All session state lives inside the engine
//! task; callers steer it through a cloneable [`PanelHandle`]. Because
//! every submission is awaited inline by that task, update cycles are
//! serialized end to end and a finished swap can never be overtaken by a
//! newer one.

pub mod config;
pub mod engine;
pub mod form;
pub mod host;
pub mod message;
pub mod panel;
pub mod test_utils;

mod nav;
mod swap;
mod sync;

pub use config::{PanelConfig, DEFAULT_MODE, DEFAULT_POLL_MS};
pub use engine::{PanelEngine, PanelHandle};
pub use form::{FormSource, MemoryForm};
pub use host::{LocalSurfaceHost, SurfaceHost};
pub use message::PanelMessage;
pub use panel::PanelSession;
