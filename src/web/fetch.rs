//! `window.fetch` implementations of the catalog and probe seams.

use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Response, window};

use crate::catalog::{NamePage, PageSource, page_url};
use crate::error::GameError;
use crate::resolver::ImageProbe;

async fn fetch_response(url: &str) -> Result<Response, GameError> {
    let win = window().ok_or_else(|| GameError::Dom("no window".into()))?;
    let value = JsFuture::from(win.fetch_with_str(url))
        .await
        .map_err(|e| GameError::network(&e))?;
    value.dyn_into::<Response>().map_err(|v| GameError::network(&v))
}

/// Paginated list endpoint over HTTP.
pub struct FetchPageSource {
    list_base: String,
}

impl FetchPageSource {
    pub fn new(list_base: impl Into<String>) -> Self {
        Self { list_base: list_base.into() }
    }
}

impl PageSource for FetchPageSource {
    async fn fetch_page(&self, limit: usize, offset: usize) -> Result<NamePage, GameError> {
        let url = page_url(&self.list_base, limit, offset);
        let resp = fetch_response(&url).await?;
        if !resp.ok() {
            return Err(GameError::HttpStatus { url, status: resp.status() });
        }
        let text = resp.text().map_err(|e| GameError::network(&e))?;
        let body = JsFuture::from(text).await.map_err(|e| GameError::network(&e))?;
        let body = body
            .as_string()
            .ok_or_else(|| GameError::Network(format!("non-text body from {url}")))?;
        NamePage::from_json(&body)
    }
}

/// Plain GET; any success status means the sprite exists.
pub struct FetchImageProbe;

impl ImageProbe for FetchImageProbe {
    async fn probe(&self, url: &str) -> Result<bool, GameError> {
        let resp = fetch_response(url).await?;
        Ok(resp.ok())
    }
}
