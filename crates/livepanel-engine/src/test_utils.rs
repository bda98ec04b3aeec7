//! Test utilities for the panel engine
//!
//! Provides an in-memory [`RecordingHost`] that implements the surface
//! host seam and records every transition, so the full synchronization
//! pipeline can be exercised without a rendering context.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use livepanel_core::prelude::*;
use livepanel_core::{PanelFlag, ScrollPosition, SurfaceDescriptor, SurfaceId, TabId};

use crate::host::SurfaceHost;

/// An in-memory preview surface
#[derive(Debug, Clone)]
pub struct FakeSurface {
    pub attributes: BTreeMap<String, String>,
    pub scroll: ScrollPosition,
    /// Still carrying the zero-size/transparent placeholder overrides
    pub hidden: bool,
}

/// An in-memory browser tab
#[derive(Debug, Clone)]
pub struct FakeTab {
    pub id: TabId,
    pub url: Option<String>,
    pub closed: bool,
}

#[derive(Debug, Default)]
struct HostState {
    surfaces: BTreeMap<u64, FakeSurface>,
    next_surface: u64,
    tabs: Vec<FakeTab>,
    next_tab: u64,
    flags: HashMap<PanelFlag, bool>,
    alerts: Vec<String>,
    new_tab_target: Option<String>,
    refocus_count: usize,
    /// In-place source rewrites, in order (surface, new source)
    navigations: Vec<(SurfaceId, String)>,
}

/// In-memory surface host recording every engine-visible transition.
///
/// Clones share state, so a test keeps one handle for assertions while the
/// engine owns another.
#[derive(Debug, Clone)]
pub struct RecordingHost {
    state: Arc<Mutex<HostState>>,
    panel_present: bool,
    auto_update: bool,
    load_delay: Option<Duration>,
}

impl RecordingHost {
    /// A host whose panel contains one visible surface loading `src`
    pub fn new(src: &str) -> Self {
        let mut state = HostState {
            next_surface: 1,
            ..Default::default()
        };
        let initial = FakeSurface {
            attributes: BTreeMap::from([
                ("src".to_string(), src.to_string()),
                ("id".to_string(), "preview-frame".to_string()),
                ("class".to_string(), "preview".to_string()),
            ]),
            scroll: ScrollPosition::default(),
            hidden: false,
        };
        state.surfaces.insert(1, initial);

        Self {
            state: Arc::new(Mutex::new(state)),
            panel_present: true,
            auto_update: true,
            load_delay: None,
        }
    }

    /// A page with no panel root markup
    pub fn without_panel() -> Self {
        Self {
            state: Arc::new(Mutex::new(HostState::default())),
            panel_present: false,
            auto_update: false,
            load_delay: None,
        }
    }

    /// Set the markup's auto-update flag
    pub fn with_auto_update(mut self, enabled: bool) -> Self {
        self.auto_update = enabled;
        self
    }

    /// Delay every surface load, simulating content render time
    pub fn with_load_delay(mut self, delay: Duration) -> Self {
        self.load_delay = Some(delay);
        self
    }

    // ─────────────────────────────────────────────────────────
    // Assertion Accessors
    // ─────────────────────────────────────────────────────────

    pub fn surface(&self, id: SurfaceId) -> Option<FakeSurface> {
        self.state.lock().unwrap().surfaces.get(&id.0).cloned()
    }

    pub fn surfaces_alive(&self) -> usize {
        self.state.lock().unwrap().surfaces.len()
    }

    pub fn flag(&self, flag: PanelFlag) -> bool {
        self.state
            .lock()
            .unwrap()
            .flags
            .get(&flag)
            .copied()
            .unwrap_or(false)
    }

    pub fn alerts(&self) -> Vec<String> {
        self.state.lock().unwrap().alerts.clone()
    }

    pub fn tabs(&self) -> Vec<FakeTab> {
        self.state.lock().unwrap().tabs.clone()
    }

    pub fn new_tab_target(&self) -> Option<String> {
        self.state.lock().unwrap().new_tab_target.clone()
    }

    pub fn refocus_count(&self) -> usize {
        self.state.lock().unwrap().refocus_count
    }

    pub fn navigations(&self) -> Vec<(SurfaceId, String)> {
        self.state.lock().unwrap().navigations.clone()
    }

    // ─────────────────────────────────────────────────────────
    // Test Setup
    // ─────────────────────────────────────────────────────────

    /// Set an attribute on a surface directly
    pub fn set_attribute(&self, id: SurfaceId, name: &str, value: &str) {
        if let Some(surface) = self.state.lock().unwrap().surfaces.get_mut(&id.0) {
            surface
                .attributes
                .insert(name.to_string(), value.to_string());
        }
    }

    /// Scroll a surface's content directly, as a user would
    pub fn scroll_to(&self, id: SurfaceId, scroll: ScrollPosition) {
        if let Some(surface) = self.state.lock().unwrap().surfaces.get_mut(&id.0) {
            surface.scroll = scroll;
        }
    }

    /// Open a tab outside the engine, as a click handler would
    pub fn open_tab_for_test(&self) -> TabId {
        self.open_blank_tab()
    }

    fn open_blank_tab(&self) -> TabId {
        let mut state = self.state.lock().unwrap();
        state.next_tab += 1;
        let id = TabId(state.next_tab);
        state.tabs.push(FakeTab {
            id,
            url: None,
            closed: false,
        });
        id
    }
}

impl SurfaceHost for RecordingHost {
    fn panel_present(&self) -> bool {
        self.panel_present
    }

    fn auto_update_enabled(&self) -> bool {
        self.auto_update
    }

    fn initial_surface(&self) -> Result<SurfaceId> {
        if !self.panel_present {
            return Err(Error::surface("no panel markup"));
        }
        Ok(SurfaceId(1))
    }

    fn current_source(&self, id: SurfaceId) -> Result<String> {
        let state = self.state.lock().unwrap();
        let surface = state
            .surfaces
            .get(&id.0)
            .ok_or(Error::UnknownSurface { id: id.0 })?;
        surface
            .attributes
            .get("src")
            .cloned()
            .ok_or_else(|| Error::surface(format!("{id} has no source")))
    }

    fn set_source(&self, id: SurfaceId, src: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let surface = state
            .surfaces
            .get_mut(&id.0)
            .ok_or(Error::UnknownSurface { id: id.0 })?;
        surface
            .attributes
            .insert("src".to_string(), src.to_string());
        // an in-place rewrite reloads through normal navigation
        surface.scroll = ScrollPosition::default();
        state.navigations.push((id, src.to_string()));
        Ok(())
    }

    fn spawn_hidden_surface(&self, src: &str) -> Result<SurfaceId> {
        let mut state = self.state.lock().unwrap();
        state.next_surface += 1;
        let id = state.next_surface;
        state.surfaces.insert(
            id,
            FakeSurface {
                attributes: BTreeMap::from([("src".to_string(), src.to_string())]),
                scroll: ScrollPosition::default(),
                hidden: true,
            },
        );
        Ok(SurfaceId(id))
    }

    async fn await_load(&self, id: SurfaceId) -> Result<()> {
        let delay = {
            let state = self.state.lock().unwrap();
            if !state.surfaces.contains_key(&id.0) {
                return Err(Error::UnknownSurface { id: id.0 });
            }
            self.load_delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(())
    }

    fn attributes(&self, id: SurfaceId) -> Result<BTreeMap<String, String>> {
        let state = self.state.lock().unwrap();
        state
            .surfaces
            .get(&id.0)
            .map(|s| s.attributes.clone())
            .ok_or(Error::UnknownSurface { id: id.0 })
    }

    fn apply_descriptor(&self, id: SurfaceId, descriptor: &SurfaceDescriptor) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let surface = state
            .surfaces
            .get_mut(&id.0)
            .ok_or(Error::UnknownSurface { id: id.0 })?;
        for (name, value) in &descriptor.attributes {
            surface.attributes.insert(name.clone(), value.clone());
        }
        surface.scroll = descriptor.scroll;
        Ok(())
    }

    fn scroll(&self, id: SurfaceId) -> Result<ScrollPosition> {
        let state = self.state.lock().unwrap();
        state
            .surfaces
            .get(&id.0)
            .map(|s| s.scroll)
            .ok_or(Error::UnknownSurface { id: id.0 })
    }

    fn clear_placeholder(&self, id: SurfaceId) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let surface = state
            .surfaces
            .get_mut(&id.0)
            .ok_or(Error::UnknownSurface { id: id.0 })?;
        surface.hidden = false;
        Ok(())
    }

    fn remove_surface(&self, id: SurfaceId) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state
            .surfaces
            .remove(&id.0)
            .ok_or(Error::UnknownSurface { id: id.0 })?;
        Ok(())
    }

    fn set_flag(&self, flag: PanelFlag, on: bool) {
        self.state.lock().unwrap().flags.insert(flag, on);
    }

    fn set_new_tab_target(&self, url: &str) -> Result<()> {
        self.state.lock().unwrap().new_tab_target = Some(url.to_string());
        Ok(())
    }

    fn alert(&self, message: &str) {
        self.state.lock().unwrap().alerts.push(message.to_string());
    }

    fn open_tab(&self) -> Result<TabId> {
        Ok(self.open_blank_tab())
    }

    fn navigate_tab(&self, tab: TabId, url: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let tab = state
            .tabs
            .iter_mut()
            .find(|t| t.id == tab)
            .ok_or_else(|| Error::surface(format!("unknown {tab}")))?;
        if tab.closed {
            return Err(Error::surface(format!("{} is closed", tab.id)));
        }
        tab.url = Some(url.to_string());
        Ok(())
    }

    fn close_tab(&self, tab: TabId) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let tab = state
            .tabs
            .iter_mut()
            .find(|t| t.id == tab)
            .ok_or_else(|| Error::surface(format!("unknown {tab}")))?;
        tab.closed = true;
        Ok(())
    }

    fn refocus_panel(&self) {
        self.state.lock().unwrap().refocus_count += 1;
    }
}
