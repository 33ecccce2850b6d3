//! Runtime configuration. Every field has a default, so the host page only
//! passes the keys it wants to override (or nothing at all).

use serde::Deserialize;

use crate::error::GameError;

pub const DEFAULT_LIST_BASE: &str = "https://pokeapi.co/api/v2/pokemon";
pub const DEFAULT_IMAGE_BASE: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon";
/// Names requested per catalog page.
pub const DEFAULT_PAGE_SIZE: usize = 100;
/// Index reassignments allowed after the first failed probe.
pub const DEFAULT_MAX_REDRAWS: u32 = 5;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Paginated list endpoint; queried as `{list_base}?limit=..&offset=..`.
    pub list_base: String,
    /// Sprite directory; probed as `{image_base}/{index + 1}.png`.
    pub image_base: String,
    pub page_size: usize,
    pub max_redraws: u32,
    /// One of `trace`, `debug`, `info`, `warn`, `error`.
    pub log_level: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            list_base: DEFAULT_LIST_BASE.to_string(),
            image_base: DEFAULT_IMAGE_BASE.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            max_redraws: DEFAULT_MAX_REDRAWS,
            log_level: "info".to_string(),
        }
    }
}

impl GameConfig {
    /// Parse a (possibly partial) JSON object and validate it.
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let cfg: GameConfig = serde_json::from_str(json)?;
        cfg.validated()
    }

    /// Trims trailing slashes off the base URLs and rejects unusable values.
    pub fn validated(mut self) -> Result<Self, GameError> {
        self.list_base = self.list_base.trim().trim_end_matches('/').to_string();
        self.image_base = self.image_base.trim().trim_end_matches('/').to_string();
        if self.list_base.is_empty() {
            return Err(GameError::Config("list_base must not be empty".into()));
        }
        if self.image_base.is_empty() {
            return Err(GameError::Config("image_base must not be empty".into()));
        }
        if self.page_size == 0 {
            return Err(GameError::Config("page_size must be greater than zero".into()));
        }
        self.level()?;
        Ok(self)
    }

    pub fn level(&self) -> Result<tracing::Level, GameError> {
        self.log_level
            .parse::<tracing::Level>()
            .map_err(|_| GameError::Config(format!("unknown log level '{}'", self.log_level)))
    }
}
