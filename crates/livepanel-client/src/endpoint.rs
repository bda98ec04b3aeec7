//! Rendering endpoint client
//!
//! The endpoint accepts a form-encoded submission of all current field
//! values and answers with a JSON verdict body. A verdict of invalid or
//! unavailable content is a normal outcome, not an error; only transport
//! and protocol failures surface as `Err`.

use livepanel_core::prelude::*;
use livepanel_core::{FormSnapshot, PreviewVerdict};
use url::Url;

/// Maximum length in bytes of an error body echoed into an [`Error::Endpoint`]
const ERROR_BODY_LIMIT: usize = 200;

/// Clip an error body to at most [`ERROR_BODY_LIMIT`] bytes, cutting only
/// on a char boundary.
fn truncate_body(body: &str) -> String {
    let mut cut = ERROR_BODY_LIMIT.min(body.len());
    while !body.is_char_boundary(cut) {
        cut -= 1;
    }
    body[..cut].to_string()
}

/// Network exchange with the server-side rendering endpoint
///
/// Both the panel engine and the headless driver use this trait; tests
/// substitute a scripted implementation.
#[trait_variant::make(RenderEndpoint: Send)]
pub trait LocalRenderEndpoint {
    /// Submit a snapshot of the form content and decode the verdict
    async fn render(&self, snapshot: &FormSnapshot) -> Result<PreviewVerdict>;
}

/// Implementation backed by an HTTP endpoint
#[derive(Debug, Clone)]
pub struct HttpRenderEndpoint {
    endpoint: Url,
    client: reqwest::Client,
}

impl HttpRenderEndpoint {
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            client: reqwest::Client::new(),
        }
    }

    /// The configured endpoint URL
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl RenderEndpoint for HttpRenderEndpoint {
    async fn render(&self, snapshot: &FormSnapshot) -> Result<PreviewVerdict> {
        debug!(
            endpoint = %self.endpoint,
            fields = snapshot.len(),
            "submitting preview snapshot"
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .form(snapshot.fields())
            .send()
            .await
            .map_err(|e| Error::transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::endpoint(status.as_u16(), truncate_body(body.trim())));
        }

        let verdict: PreviewVerdict = response
            .json()
            .await
            .map_err(|e| Error::endpoint(status.as_u16(), format!("malformed verdict: {e}")))?;

        debug!(
            is_valid = verdict.is_valid,
            is_available = verdict.is_available,
            "verdict received"
        );
        Ok(verdict)
    }
}
