//! Headless host + file-backed form for the driver binary
//!
//! Stands in for a browser page: surfaces are in-memory records, tab and
//! flag transitions are logged, and the edit form is a JSON object file
//! re-read on every capture. Good enough to exercise a real rendering
//! endpoint end to end from a terminal.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use livepanel_core::prelude::*;
use livepanel_core::{
    FormSnapshot, PanelFlag, ScrollPosition, SurfaceDescriptor, SurfaceId, TabId,
};
use livepanel_engine::{FormSource, SurfaceHost};

/// Edit form backed by a JSON object file.
///
/// Every capture re-reads the file, so editing it externally while the
/// engine runs is what drives the poll loop. An unreadable or malformed
/// file yields an empty snapshot; capture has no failure channel.
#[derive(Debug, Clone)]
pub struct FileFormSource {
    path: PathBuf,
}

impl FileFormSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl FormSource for FileFormSource {
    fn capture(&self) -> FormSnapshot {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(path = %self.path.display(), "form file unreadable: {err}");
                return FormSnapshot::new();
            }
        };
        match serde_json::from_str::<BTreeMap<String, String>>(&raw) {
            Ok(fields) => FormSnapshot::from_fields(fields),
            Err(err) => {
                warn!(path = %self.path.display(), "form file is not a JSON object of strings: {err}");
                FormSnapshot::new()
            }
        }
    }
}

#[derive(Debug, Default)]
struct HeadlessState {
    surfaces: BTreeMap<u64, BTreeMap<String, String>>,
    next_surface: u64,
    next_tab: u64,
    new_tab_target: Option<String>,
}

/// In-memory surface host that narrates every transition to the log.
///
/// No scroll state exists outside a browser, so scroll reads answer the
/// origin and restores are logged only.
#[derive(Debug, Clone)]
pub struct HeadlessHost {
    state: Arc<Mutex<HeadlessState>>,
    auto_update: bool,
}

impl HeadlessHost {
    pub fn new(preview_url: &str, auto_update: bool) -> Self {
        let mut state = HeadlessState {
            next_surface: 1,
            ..Default::default()
        };
        state.surfaces.insert(
            1,
            BTreeMap::from([("src".to_string(), preview_url.to_string())]),
        );
        Self {
            state: Arc::new(Mutex::new(state)),
            auto_update,
        }
    }
}

impl SurfaceHost for HeadlessHost {
    fn panel_present(&self) -> bool {
        true
    }

    fn auto_update_enabled(&self) -> bool {
        self.auto_update
    }

    fn initial_surface(&self) -> Result<SurfaceId> {
        Ok(SurfaceId(1))
    }

    fn current_source(&self, id: SurfaceId) -> Result<String> {
        let state = self.state.lock().map_err(|_| Error::surface("host state poisoned"))?;
        let surface = state
            .surfaces
            .get(&id.0)
            .ok_or(Error::UnknownSurface { id: id.0 })?;
        surface
            .get("src")
            .cloned()
            .ok_or_else(|| Error::surface(format!("{id} has no source")))
    }

    fn set_source(&self, id: SurfaceId, src: &str) -> Result<()> {
        let mut state = self.state.lock().map_err(|_| Error::surface("host state poisoned"))?;
        let surface = state
            .surfaces
            .get_mut(&id.0)
            .ok_or(Error::UnknownSurface { id: id.0 })?;
        surface.insert("src".to_string(), src.to_string());
        info!(%id, src, "surface source rewritten");
        Ok(())
    }

    fn spawn_hidden_surface(&self, src: &str) -> Result<SurfaceId> {
        let mut state = self.state.lock().map_err(|_| Error::surface("host state poisoned"))?;
        state.next_surface += 1;
        let id = state.next_surface;
        state
            .surfaces
            .insert(id, BTreeMap::from([("src".to_string(), src.to_string())]));
        info!(surface = %SurfaceId(id), src, "replacement surface spawned");
        Ok(SurfaceId(id))
    }

    async fn await_load(&self, _id: SurfaceId) -> Result<()> {
        // nothing renders; the endpoint exchange already happened
        Ok(())
    }

    fn attributes(&self, id: SurfaceId) -> Result<BTreeMap<String, String>> {
        let state = self.state.lock().map_err(|_| Error::surface("host state poisoned"))?;
        state
            .surfaces
            .get(&id.0)
            .cloned()
            .ok_or(Error::UnknownSurface { id: id.0 })
    }

    fn apply_descriptor(&self, id: SurfaceId, descriptor: &SurfaceDescriptor) -> Result<()> {
        let mut state = self.state.lock().map_err(|_| Error::surface("host state poisoned"))?;
        let surface = state
            .surfaces
            .get_mut(&id.0)
            .ok_or(Error::UnknownSurface { id: id.0 })?;
        for (name, value) in &descriptor.attributes {
            surface.insert(name.clone(), value.clone());
        }
        debug!(%id, scroll_top = descriptor.scroll.top, "descriptor applied");
        Ok(())
    }

    fn scroll(&self, _id: SurfaceId) -> Result<ScrollPosition> {
        Ok(ScrollPosition::default())
    }

    fn clear_placeholder(&self, id: SurfaceId) -> Result<()> {
        debug!(%id, "surface revealed");
        Ok(())
    }

    fn remove_surface(&self, id: SurfaceId) -> Result<()> {
        let mut state = self.state.lock().map_err(|_| Error::surface("host state poisoned"))?;
        state
            .surfaces
            .remove(&id.0)
            .ok_or(Error::UnknownSurface { id: id.0 })?;
        debug!(%id, "surface removed");
        Ok(())
    }

    fn set_flag(&self, flag: PanelFlag, on: bool) {
        debug!(?flag, on, "panel flag");
    }

    fn set_new_tab_target(&self, url: &str) -> Result<()> {
        let mut state = self.state.lock().map_err(|_| Error::surface("host state poisoned"))?;
        state.new_tab_target = Some(url.to_string());
        info!(url, "new-tab target updated");
        Ok(())
    }

    fn alert(&self, message: &str) {
        eprintln!("⚠ {message}");
    }

    fn open_tab(&self) -> Result<TabId> {
        let mut state = self.state.lock().map_err(|_| Error::surface("host state poisoned"))?;
        state.next_tab += 1;
        Ok(TabId(state.next_tab))
    }

    fn navigate_tab(&self, tab: TabId, url: &str) -> Result<()> {
        info!(%tab, url, "tab navigated");
        Ok(())
    }

    fn close_tab(&self, tab: TabId) -> Result<()> {
        info!(%tab, "tab closed");
        Ok(())
    }

    fn refocus_panel(&self) {
        debug!("panel refocused");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_file_form_reads_json_object() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"title": "Home", "body": "Hello"}}"#).unwrap();

        let form = FileFormSource::new(file.path().to_path_buf());
        let snapshot = form.capture();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(
            snapshot.fields().get("title").map(String::as_str),
            Some("Home")
        );
    }

    #[test]
    fn test_file_form_missing_file_yields_empty_snapshot() {
        let form = FileFormSource::new(PathBuf::from("/nonexistent/form.json"));
        assert!(form.capture().is_empty());
    }

    #[test]
    fn test_file_form_malformed_json_yields_empty_snapshot() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let form = FileFormSource::new(file.path().to_path_buf());
        assert!(form.capture().is_empty());
    }

    #[test]
    fn test_headless_host_swap_surfaces() {
        let host = HeadlessHost::new("https://cms.test/preview/", true);
        let twin = host.spawn_hidden_surface("https://cms.test/preview/").unwrap();
        assert_ne!(twin, SurfaceId(1));
        host.remove_surface(SurfaceId(1)).unwrap();
        assert!(host.current_source(SurfaceId(1)).is_err());
        assert!(host.current_source(twin).is_ok());
    }
}
