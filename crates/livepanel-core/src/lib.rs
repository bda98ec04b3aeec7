//! # livepanel-core - Core Domain Types
//!
//! Foundation crate for Livepanel. Provides the domain values of the
//! preview synchronization engine, error handling, and logging setup.
//!
//! This crate has **zero internal dependencies** -- it only depends on
//! external crates (serde, thiserror, tracing).
//!
//! ## Public API
//!
//! ### Snapshots (`snapshot`)
//! - [`FormSnapshot`] - Ordered capture of the edit form's field values
//! - [`SnapshotComparator`] - Change detection with an always-advancing reference
//!
//! ### Verdicts (`verdict`)
//! - [`PreviewVerdict`] - The rendering endpoint's validity/availability answer
//!
//! ### Surfaces (`surface`)
//! - [`SurfaceId`], [`TabId`] - Opaque host-owned handles
//! - [`ScrollPosition`] - Scroll offset preserved across a swap
//! - [`SurfaceDescriptor`] - Replacement-surface plan (attributes minus source)
//! - [`PanelFlag`] - Visual flags toggled on the panel
//! - [`markers`](surface::markers) - DOM data-attribute contract
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `fatal` vs `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use livepanel_core::prelude::*;
//! ```

pub mod error;
pub mod logging;
pub mod snapshot;
pub mod surface;
pub mod verdict;

/// Prelude for common imports used throughout all Livepanel crates
pub mod prelude {
    pub use super::error::{Error, Result, ResultExt};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

// Re-export commonly used types at crate root for convenience
pub use error::{Error, Result, ResultExt};
pub use snapshot::{FormSnapshot, SnapshotComparator};
pub use surface::{
    markers, PanelFlag, ScrollPosition, SurfaceDescriptor, SurfaceId, TabId, SOURCE_ATTRIBUTE,
};
pub use verdict::PreviewVerdict;
