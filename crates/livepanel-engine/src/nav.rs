//! Mode and navigation coordination
//!
//! Mode changes rewrite the surface source in place (a visible transition
//! is expected there, so the swap engine is bypassed) and force a
//! synchronization. New-tab requests navigate an already-opened blank tab
//! on success and close it on failure.

use livepanel_client::{new_tab_url, parse_preview_url, with_mode, RenderEndpoint};
use livepanel_core::prelude::*;
use livepanel_core::TabId;

use crate::engine::PanelEngine;
use crate::form::FormSource;
use crate::host::SurfaceHost;
use crate::sync::SubmitOrigin;

impl<H, E, F> PanelEngine<H, E, F>
where
    H: SurfaceHost,
    E: RenderEndpoint,
    F: FormSource,
{
    /// Switch the panel to a different preview mode.
    ///
    /// Rewrites the surface source URL with the new `mode` parameter
    /// (reloading through normal navigation), retargets the new-tab
    /// trigger without the panel marker, and submits the current form
    /// state regardless of whether it changed.
    ///
    /// No scroll capture happens here: the reload resets the content
    /// scroll, and the forced submission's swap restores whatever the
    /// reloaded surface reports.
    pub(crate) async fn set_mode(&mut self, mode: &str) -> Result<()> {
        info!(from = %self.session.mode, to = mode, "preview mode change");
        let current = self.session.current_surface;
        let src = parse_preview_url(&self.host.current_source(current)?)?;
        let src = with_mode(&src, mode);
        self.host.set_source(current, src.as_str())?;
        self.session.mode = mode.to_string();

        let tab_url = new_tab_url(&src, mode);
        self.host.set_new_tab_target(tab_url.as_str())?;
        self.session.new_tab_target = Some(tab_url.into());

        // the new mode must reflect current form state immediately
        self.submit(SubmitOrigin::Explicit).await.map(|_| ())
    }

    /// Open the preview in a new tab.
    ///
    /// The blank tab already exists (opened within the user gesture) or is
    /// opened through the host before anything awaits. It is only
    /// navigated once the content is known valid; otherwise focus returns
    /// to the panel and the tab is closed.
    pub(crate) async fn open_in_new_tab(&mut self, tab: Option<TabId>) -> Result<()> {
        let tab = match tab {
            Some(tab) => tab,
            None => self.host.open_tab()?,
        };

        match self.submit(SubmitOrigin::Explicit).await {
            Ok(Some(true)) => {
                let target = self.new_tab_target()?;
                self.host.navigate_tab(tab, &target)?;
                info!(%tab, url = %target, "preview opened in new tab");
                Ok(())
            }
            Ok(_) => {
                debug!(%tab, "content invalid, new-tab navigation aborted");
                self.host.refocus_panel();
                self.host.close_tab(tab)?;
                Ok(())
            }
            Err(err) => {
                self.host.refocus_panel();
                let _ = self.host.close_tab(tab);
                Err(err)
            }
        }
    }

    /// The URL the new-tab trigger points at, deriving it from the current
    /// surface source if no mode change has set one yet.
    fn new_tab_target(&self) -> Result<String> {
        if let Some(target) = &self.session.new_tab_target {
            return Ok(target.clone());
        }
        let src = parse_preview_url(&self.host.current_source(self.session.current_surface)?)?;
        Ok(new_tab_url(&src, &self.session.mode).into())
    }
}

#[cfg(test)]
mod tests {
    use crate::config::PanelConfig;
    use crate::engine::PanelEngine;
    use crate::form::MemoryForm;
    use crate::test_utils::RecordingHost;
    use livepanel_client::test_utils::ScriptedEndpoint;
    use livepanel_core::{PreviewVerdict, SurfaceId};

    const SRC: &str = "https://cms.test/preview/?mode=desktop&in_preview_panel=true";

    fn attach(
        host: &RecordingHost,
        endpoint: &ScriptedEndpoint,
    ) -> PanelEngine<RecordingHost, ScriptedEndpoint, MemoryForm> {
        let (engine, _handle) = PanelEngine::attach(
            host.clone(),
            endpoint.clone(),
            MemoryForm::with_fields([("title", "Home")]),
            PanelConfig::default(),
        )
        .unwrap()
        .unwrap();
        engine
    }

    #[tokio::test]
    async fn test_set_mode_rewrites_source_and_new_tab_target() {
        let host = RecordingHost::new(SRC);
        let endpoint = ScriptedEndpoint::new();
        let mut engine = attach(&host, &endpoint);

        engine.set_mode("mobile").await.unwrap();

        // the in-place rewrite targeted the pre-swap surface
        let navigations = host.navigations();
        assert_eq!(navigations[0].0, SurfaceId(1));
        assert_eq!(
            navigations[0].1,
            "https://cms.test/preview/?mode=mobile&in_preview_panel=true"
        );
        // new-tab target: re-moded, marker stripped
        assert_eq!(
            host.new_tab_target().as_deref(),
            Some("https://cms.test/preview/?mode=mobile")
        );
        assert_eq!(engine.session.mode, "mobile");
    }

    #[tokio::test]
    async fn test_set_mode_submits_regardless_of_change_state() {
        let host = RecordingHost::new(SRC);
        let endpoint = ScriptedEndpoint::new();
        let mut engine = attach(&host, &endpoint);

        // seed so the form counts as unchanged
        let snapshot = livepanel_core::FormSnapshot::from_fields([("title", "Home")]);
        engine.session.comparator.seed(&snapshot);

        engine.set_mode("mobile").await.unwrap();
        assert_eq!(endpoint.calls(), 1);
    }

    #[tokio::test]
    async fn test_new_tab_navigates_on_valid_content() {
        let host = RecordingHost::new(SRC);
        let endpoint = ScriptedEndpoint::new();
        let mut engine = attach(&host, &endpoint);

        engine.open_in_new_tab(None).await.unwrap();

        let tabs = host.tabs();
        assert_eq!(tabs.len(), 1);
        assert!(!tabs[0].closed);
        assert_eq!(
            tabs[0].url.as_deref(),
            Some("https://cms.test/preview/?mode=desktop")
        );
    }

    #[tokio::test]
    async fn test_new_tab_closes_on_invalid_content() {
        let host = RecordingHost::new(SRC);
        let endpoint = ScriptedEndpoint::new();
        endpoint.push_verdict(PreviewVerdict {
            is_valid: false,
            is_available: true,
        });
        let mut engine = attach(&host, &endpoint);

        engine.open_in_new_tab(None).await.unwrap();

        let tabs = host.tabs();
        assert_eq!(tabs.len(), 1);
        assert!(tabs[0].closed);
        assert!(tabs[0].url.is_none(), "tab must not be navigated");
        assert_eq!(host.refocus_count(), 1);
    }

    #[tokio::test]
    async fn test_new_tab_closes_on_transport_failure() {
        let host = RecordingHost::new(SRC);
        let endpoint = ScriptedEndpoint::new();
        endpoint.push_transport_error("connection reset");
        let mut engine = attach(&host, &endpoint);

        engine.open_in_new_tab(None).await.unwrap_err();

        let tabs = host.tabs();
        assert!(tabs[0].closed);
        assert!(tabs[0].url.is_none());
        assert_eq!(host.refocus_count(), 1);
    }

    #[tokio::test]
    async fn test_new_tab_uses_pre_opened_tab() {
        let host = RecordingHost::new(SRC);
        let endpoint = ScriptedEndpoint::new();
        let mut engine = attach(&host, &endpoint);

        // tab opened synchronously within the click gesture
        let tab = host.open_tab_for_test();
        engine.open_in_new_tab(Some(tab)).await.unwrap();

        let tabs = host.tabs();
        assert_eq!(tabs.len(), 1);
        assert!(tabs[0].url.is_some());
    }
}
