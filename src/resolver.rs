//! Sprite resolution: confirm that the image for a selection exists before
//! showing it, drawing a different selection when it does not.
//!
//! States: `Idle` -> `Probing` on the first index, `Probing` -> `Probing` on
//! a failed probe with budget left (a freshly drawn index from the whole
//! catalog, which may repeat), `Probing` -> `Resolved` on success,
//! `Probing` -> `Exhausted` once `max_redraws` reassignments have all
//! failed. A network error counts as a failed probe and is logged with its
//! cause.

use tracing::{debug, error, info, warn};

use crate::error::GameError;
use crate::rng::IndexSource;

/// Existence check for a candidate sprite URL.
#[allow(async_fn_in_trait)]
pub trait ImageProbe {
    /// `Ok(true)` on a success status, `Ok(false)` on any other status,
    /// `Err` when the request itself failed.
    async fn probe(&self, url: &str) -> Result<bool, GameError>;
}

/// Sprite ids are 1-based while catalog indices are 0-based.
pub fn sprite_url(image_base: &str, index: usize) -> String {
    format!("{image_base}/{}.png", index + 1)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolverState {
    Idle,
    Probing { index: usize, redraws: u32 },
    Resolved { index: usize, url: String },
    Exhausted { last_index: usize, redraws: u32 },
}

/// A confirmed selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub index: usize,
    pub url: String,
    /// Number of index reassignments it took.
    pub redraws: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolveOutcome {
    Resolved(Resolution),
    /// Budget spent; no URL is committed. `last_index` is the final selection tried.
    Exhausted { last_index: usize, probes: u32 },
}

pub struct ImageResolver {
    image_base: String,
    max_redraws: u32,
    state: ResolverState,
}

impl ImageResolver {
    pub fn new(image_base: impl Into<String>, max_redraws: u32) -> Self {
        Self { image_base: image_base.into(), max_redraws, state: ResolverState::Idle }
    }

    pub fn state(&self) -> &ResolverState {
        &self.state
    }

    pub fn max_redraws(&self) -> u32 {
        self.max_redraws
    }

    /// Probe `index`, redrawing from `[0, catalog_len)` on failure, sequentially.
    /// A redraw is not excluded from hitting an index that already failed.
    pub async fn resolve<P, R>(
        &mut self,
        probe: &P,
        rng: &mut R,
        index: usize,
        catalog_len: usize,
    ) -> ResolveOutcome
    where
        P: ImageProbe,
        R: IndexSource,
    {
        let mut index = index;
        let mut redraws = 0u32;
        loop {
            self.state = ResolverState::Probing { index, redraws };
            let url = sprite_url(&self.image_base, index);
            let exists = match probe.probe(&url).await {
                Ok(found) => found,
                Err(err) => {
                    warn!(%url, error = %err, "sprite probe failed");
                    false
                }
            };
            debug!(%url, exists, redraws, "sprite probe");

            if exists {
                info!(index, %url, redraws, "sprite resolved");
                self.state = ResolverState::Resolved { index, url: url.clone() };
                return ResolveOutcome::Resolved(Resolution { index, url, redraws });
            }

            let next = if redraws < self.max_redraws { rng.next_index(catalog_len) } else { None };
            match next {
                Some(fresh) => {
                    redraws += 1;
                    warn!(missing = %url, next_index = fresh, redraws, "sprite missing, drawing another");
                    index = fresh;
                }
                None => {
                    error!(last_index = index, redraws, "giving up on sprite resolution");
                    self.state = ResolverState::Exhausted { last_index: index, redraws };
                    return ResolveOutcome::Exhausted { last_index: index, probes: redraws + 1 };
                }
            }
        }
    }
}
