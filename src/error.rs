//! Error types for catalog loading, configuration and browser glue.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Errors surfaced by the game. None of them carry recovery hints: a failed
/// catalog load ends the round, everything else is logged.
#[derive(Debug, Error)]
pub enum GameError {
    /// `fetch` rejected, or resolved to something that is not a `Response`.
    #[error("network request failed: {0}")]
    Network(String),

    /// A catalog page came back with a non-success status.
    #[error("request to {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    /// Body was not the JSON shape we expect.
    #[error("could not decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    /// Missing window / document / element.
    #[error("DOM unavailable: {0}")]
    Dom(String),

    #[error("random source unavailable: {0}")]
    Entropy(String),
}

impl GameError {
    /// Wraps a JS exception value as a network error, keeping whatever text it carries.
    pub fn network(value: &JsValue) -> Self {
        let text = value
            .as_string()
            .or_else(|| js_sys::JSON::stringify(value).ok().and_then(|s| s.as_string()))
            .unwrap_or_else(|| format!("{value:?}"));
        GameError::Network(text)
    }
}

impl From<getrandom::Error> for GameError {
    fn from(err: getrandom::Error) -> Self {
        GameError::Entropy(err.to_string())
    }
}

impl From<GameError> for JsValue {
    fn from(err: GameError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
