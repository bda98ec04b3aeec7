//! Edit form seam

use std::sync::{Arc, Mutex};

use livepanel_core::FormSnapshot;

/// Source of the editable form's current field values.
///
/// Capture is pure local computation with no failure modes; a form that
/// cannot be read yields an empty snapshot at the implementation's
/// discretion.
pub trait FormSource {
    /// Capture the form's current field values
    fn capture(&self) -> FormSnapshot;
}

/// In-memory form whose fields can be edited from the outside.
///
/// Shared between a test (or driver) and the engine; editing a field is
/// what a user typing into the form looks like from the engine's side.
#[derive(Debug, Clone, Default)]
pub struct MemoryForm {
    fields: Arc<Mutex<FormSnapshot>>,
}

impl MemoryForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: Arc::new(Mutex::new(FormSnapshot::from_fields(fields))),
        }
    }

    /// Edit a single field
    pub fn edit(&self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.lock().unwrap().set(name, value);
    }
}

impl FormSource for MemoryForm {
    fn capture(&self) -> FormSnapshot {
        self.fields.lock().unwrap().clone()
    }
}
