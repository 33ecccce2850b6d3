//! Round controller.
//!
//! `GameController` is the single owner of everything a round mutates:
//! catalog, selection, resolved sprite URL and guess state. Each round is
//! tagged with a `RoundToken`; commits carrying a token from an earlier round
//! are dropped, which is what makes `reset` safe while a previous round is
//! still waiting on the network.
//!
//! `drive_round` is the only place the round sequence (reset, load, draw,
//! resolve) is spelled out. It reaches the controller through a `RoundHost`,
//! re-borrowing it between awaits, so the browser session and a plain owned
//! controller run the same code.

use tracing::{error, info, warn};

use crate::catalog::{NameCatalog, PageSource, load_catalog};
use crate::config::GameConfig;
use crate::error::GameError;
use crate::guess::{GuessState, Verdict};
use crate::resolver::{ImageProbe, ImageResolver, ResolveOutcome};
use crate::rng::IndexSource;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RoundToken(u64);

/// Short-lived access to a controller that may be shared with event handlers.
pub trait RoundHost {
    /// Run `f` against the controller; `None` when there is none to run against.
    fn with_game<T>(&mut self, f: impl FnOnce(&mut GameController) -> T) -> Option<T>;
}

impl RoundHost for GameController {
    fn with_game<T>(&mut self, f: impl FnOnce(&mut GameController) -> T) -> Option<T> {
        Some(f(self))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the catalog.
    Loading,
    /// Selection drawn, sprite not confirmed yet.
    Probing,
    /// Sprite confirmed, accepting guesses.
    Ready,
    Solved,
    /// Every probe failed; nothing to show this round.
    Unavailable,
    /// Round could not start (catalog load or entropy failure).
    Failed,
}

pub struct GameController {
    config: GameConfig,
    round: u64,
    catalog: Option<NameCatalog>,
    selection: Option<usize>,
    resolved_url: Option<String>,
    exhausted: bool,
    failed: bool,
    guess: GuessState,
}

impl GameController {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            round: 0,
            catalog: None,
            selection: None,
            resolved_url: None,
            exhausted: false,
            failed: false,
            guess: GuessState::default(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Swap the configuration, keeping the round counter so tokens handed
    /// out before the swap stay stale. Takes effect from the next round.
    pub fn reconfigure(&mut self, config: GameConfig) {
        self.config = config;
    }

    pub fn token(&self) -> RoundToken {
        RoundToken(self.round)
    }

    /// Drop all round state and open a new round.
    pub fn reset(&mut self) -> RoundToken {
        self.round += 1;
        self.catalog = None;
        self.selection = None;
        self.resolved_url = None;
        self.exhausted = false;
        self.failed = false;
        self.guess = GuessState::default();
        info!(round = self.round, "round started");
        self.token()
    }

    fn is_current(&self, token: RoundToken) -> bool {
        if token.0 != self.round {
            warn!(stale = token.0, current = self.round, "dropping result of superseded round");
            return false;
        }
        true
    }

    /// Store the fully loaded catalog. Returns false for a stale token or a
    /// catalog that is already installed.
    pub fn install_catalog(&mut self, token: RoundToken, catalog: NameCatalog) -> bool {
        if !self.is_current(token) || self.catalog.is_some() {
            return false;
        }
        self.catalog = Some(catalog);
        true
    }

    pub fn mark_failed(&mut self, token: RoundToken, err: &GameError) {
        if self.is_current(token) {
            error!(error = %err, "round failed");
            self.failed = true;
        }
    }

    /// Draw the round's selection uniformly from the catalog. Only the first
    /// draw of a round counts; later redraws belong to the resolver.
    pub fn draw_selection<R: IndexSource>(&mut self, token: RoundToken, rng: &mut R) -> Option<usize> {
        if !self.is_current(token) {
            return None;
        }
        if self.selection.is_some() || self.resolved_url.is_some() {
            warn!(round = self.round, "selection already drawn for this round");
            return None;
        }
        let len = self.catalog.as_ref()?.len();
        let index = rng.next_index(len)?;
        self.selection = Some(index);
        Some(index)
    }

    /// Record what the resolver ended with. The URL is only stored when a probe confirmed it.
    pub fn apply_resolution(&mut self, token: RoundToken, outcome: ResolveOutcome) {
        if !self.is_current(token) || self.resolved_url.is_some() || self.exhausted {
            return;
        }
        match outcome {
            ResolveOutcome::Resolved(res) => {
                self.selection = Some(res.index);
                self.resolved_url = Some(res.url);
            }
            ResolveOutcome::Exhausted { last_index, .. } => {
                self.selection = Some(last_index);
                self.exhausted = true;
            }
        }
    }

    /// Full round for a caller that owns the controller across awaits.
    pub async fn run_round<S, P, R>(
        &mut self,
        source: &S,
        probe: &P,
        rng: &mut R,
    ) -> Result<Phase, GameError>
    where
        S: PageSource,
        P: ImageProbe,
        R: IndexSource,
    {
        drive_round(self, source, probe, rng).await
    }

    /// Submit a guess against the confirmed target.
    pub fn submit_guess(&mut self, raw: &str) -> Verdict {
        let target = match (&self.resolved_url, self.selection, &self.catalog) {
            (Some(_), Some(index), Some(catalog)) => catalog.get(index),
            _ => None,
        };
        let verdict = self.guess.submit(raw, target);
        match verdict {
            Verdict::Correct => info!(round = self.round, "solved"),
            Verdict::NotReady => warn!("guess submitted before a sprite was confirmed"),
            _ => {}
        }
        verdict
    }

    pub fn phase(&self) -> Phase {
        if self.failed {
            Phase::Failed
        } else if self.guess.is_solved() {
            Phase::Solved
        } else if self.resolved_url.is_some() {
            Phase::Ready
        } else if self.exhausted {
            Phase::Unavailable
        } else if self.selection.is_some() {
            Phase::Probing
        } else {
            Phase::Loading
        }
    }

    pub fn catalog(&self) -> Option<&NameCatalog> {
        self.catalog.as_ref()
    }

    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    pub fn resolved_url(&self) -> Option<&str> {
        self.resolved_url.as_deref()
    }

    pub fn is_solved(&self) -> bool {
        self.guess.is_solved()
    }

    pub fn last_guess(&self) -> Option<&str> {
        self.guess.last_guess()
    }

    /// Name to reveal; only available once solved.
    pub fn revealed_name(&self) -> Option<&str> {
        if !self.guess.is_solved() {
            return None;
        }
        self.catalog.as_ref()?.get(self.selection?)
    }
}

/// Run one round: reset, load the catalog, draw a selection, resolve its
/// sprite. The host is only borrowed between awaits; results from a round
/// that was reset meanwhile are dropped by the controller.
pub async fn drive_round<H, S, P, R>(
    host: &mut H,
    source: &S,
    probe: &P,
    rng: &mut R,
) -> Result<Phase, GameError>
where
    H: RoundHost,
    S: PageSource,
    P: ImageProbe,
    R: IndexSource,
{
    let (token, config) = host
        .with_game(|g| (g.reset(), g.config().clone()))
        .ok_or_else(|| GameError::Dom("game session is gone".into()))?;

    let catalog = match load_catalog(source, config.page_size).await {
        Ok(c) => c,
        Err(err) => {
            host.with_game(|g| g.mark_failed(token, &err));
            return Err(err);
        }
    };
    let len = catalog.len();

    let drawn = host
        .with_game(|g| {
            if !g.install_catalog(token, catalog) {
                return Err(g.phase());
            }
            g.draw_selection(token, &mut *rng).ok_or_else(|| g.phase())
        })
        .ok_or_else(|| GameError::Dom("game session is gone".into()))?;
    let index = match drawn {
        Ok(index) => index,
        Err(phase) => {
            if len == 0 {
                warn!("catalog is empty, nothing to guess");
            }
            return Ok(phase);
        }
    };

    let mut resolver = ImageResolver::new(config.image_base, config.max_redraws);
    let outcome = resolver.resolve(probe, rng, index, len).await;
    host.with_game(|g| {
        g.apply_resolution(token, outcome);
        g.phase()
    })
    .ok_or_else(|| GameError::Dom("game session is gone".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::Resolution;
    use crate::rng::XorShiftIndexSource;

    fn ready_controller() -> (GameController, RoundToken) {
        let mut game = GameController::new(GameConfig::default());
        let token = game.reset();
        assert!(game.install_catalog(token, NameCatalog::from_names(["bulbasaur", "ivysaur"])));
        game.apply_resolution(
            token,
            ResolveOutcome::Resolved(Resolution { index: 1, url: "u/2.png".into(), redraws: 0 }),
        );
        (game, token)
    }

    #[test]
    fn fresh_controller_is_loading() {
        let game = GameController::new(GameConfig::default());
        assert_eq!(game.phase(), Phase::Loading);
        assert!(game.catalog().is_none());
    }

    #[test]
    fn draw_stays_inside_catalog() {
        let mut game = GameController::new(GameConfig::default());
        let mut rng = XorShiftIndexSource::from_seed(3);
        for _ in 0..100 {
            let token = game.reset();
            game.install_catalog(token, NameCatalog::from_names(["a", "b", "c"]));
            let i = game.draw_selection(token, &mut rng).unwrap();
            assert!(i < 3);
            assert_eq!(game.phase(), Phase::Probing);
        }
    }

    #[test]
    fn selection_is_drawn_once_per_round() {
        let (mut game, token) = ready_controller();
        let mut rng = XorShiftIndexSource::from_seed(11);
        assert_eq!(game.draw_selection(token, &mut rng), None);
        assert_eq!(game.selection(), Some(1));
        assert_eq!(game.resolved_url(), Some("u/2.png"));

        let mut game = GameController::new(GameConfig::default());
        let token = game.reset();
        game.install_catalog(token, NameCatalog::from_names(["a", "b", "c"]));
        let first = game.draw_selection(token, &mut rng).unwrap();
        assert_eq!(game.draw_selection(token, &mut rng), None);
        assert_eq!(game.selection(), Some(first));
    }

    #[test]
    fn resolution_is_committed_once_per_round() {
        let (mut game, token) = ready_controller();
        game.apply_resolution(
            token,
            ResolveOutcome::Resolved(Resolution { index: 0, url: "u/1.png".into(), redraws: 0 }),
        );
        assert_eq!(game.selection(), Some(1));
        assert_eq!(game.resolved_url(), Some("u/2.png"));
    }

    #[test]
    fn reconfigure_keeps_earlier_tokens_stale() {
        let mut game = GameController::new(GameConfig::default());
        let old = game.reset();
        game.reconfigure(GameConfig { image_base: "img".into(), ..GameConfig::default() });
        let new = game.reset();
        assert_ne!(old, new);
        assert_eq!(game.config().image_base, "img");

        assert!(!game.install_catalog(old, NameCatalog::from_names(["bulbasaur"])));
        game.apply_resolution(
            old,
            ResolveOutcome::Resolved(Resolution { index: 0, url: "img/1.png".into(), redraws: 0 }),
        );
        assert!(game.catalog().is_none());
        assert_eq!(game.resolved_url(), None);

        assert!(game.install_catalog(new, NameCatalog::from_names(["bulbasaur", "ivysaur", "venusaur"])));
        let mut rng = XorShiftIndexSource::from_seed(5);
        let index = game.draw_selection(new, &mut rng).unwrap();
        game.apply_resolution(
            new,
            ResolveOutcome::Resolved(Resolution { index, url: format!("img/{}.png", index + 1), redraws: 0 }),
        );
        let name = game.catalog().unwrap().get(index).unwrap().to_string();
        assert_eq!(game.submit_guess(&name), Verdict::Correct);
    }

    #[test]
    fn empty_catalog_draws_nothing() {
        let mut game = GameController::new(GameConfig::default());
        let token = game.reset();
        game.install_catalog(token, NameCatalog::default());
        assert_eq!(game.draw_selection(token, &mut XorShiftIndexSource::from_seed(1)), None);
    }

    #[test]
    fn stale_round_results_are_ignored() {
        let mut game = GameController::new(GameConfig::default());
        let old = game.reset();
        let new = game.reset();
        assert!(!game.install_catalog(old, NameCatalog::from_names(["x"])));
        assert!(game.catalog().is_none());
        assert!(game.install_catalog(new, NameCatalog::from_names(["y"])));
        game.apply_resolution(
            old,
            ResolveOutcome::Resolved(Resolution { index: 0, url: "stale".into(), redraws: 0 }),
        );
        assert_eq!(game.resolved_url(), None);
    }

    #[test]
    fn catalog_is_installed_once_per_round() {
        let (mut game, token) = ready_controller();
        assert!(!game.install_catalog(token, NameCatalog::from_names(["other"])));
        assert_eq!(game.catalog().unwrap().len(), 2);
    }

    #[test]
    fn exhausted_resolution_commits_no_url() {
        let mut game = GameController::new(GameConfig::default());
        let token = game.reset();
        game.install_catalog(token, NameCatalog::from_names(["a", "b"]));
        game.apply_resolution(token, ResolveOutcome::Exhausted { last_index: 1, probes: 6 });
        assert_eq!(game.phase(), Phase::Unavailable);
        assert_eq!(game.resolved_url(), None);
        assert_eq!(game.submit_guess("b"), Verdict::NotReady);
    }

    #[test]
    fn wrong_guess_leaves_selection_and_catalog_alone() {
        let (mut game, _) = ready_controller();
        assert_eq!(game.submit_guess("eevee"), Verdict::TryAgain);
        assert_eq!(game.phase(), Phase::Ready);
        assert_eq!(game.selection(), Some(1));
        assert_eq!(game.catalog().unwrap().names(), ["bulbasaur", "ivysaur"]);
        assert_eq!(game.revealed_name(), None);
    }

    #[test]
    fn correct_guess_solves_and_reveals() {
        let (mut game, _) = ready_controller();
        assert_eq!(game.submit_guess("IVYSAUR"), Verdict::Correct);
        assert_eq!(game.phase(), Phase::Solved);
        assert_eq!(game.revealed_name(), Some("ivysaur"));
    }

    #[test]
    fn reset_clears_everything() {
        let (mut game, token) = ready_controller();
        game.submit_guess("ivysaur");
        let next = game.reset();
        assert_ne!(token, next);
        assert_eq!(game.phase(), Phase::Loading);
        assert!(game.catalog().is_none());
        assert_eq!(game.selection(), None);
        assert_eq!(game.resolved_url(), None);
        assert!(!game.is_solved());
    }

    #[test]
    fn failed_load_is_terminal_for_round() {
        let mut game = GameController::new(GameConfig::default());
        let token = game.reset();
        game.mark_failed(token, &GameError::Network("offline".into()));
        assert_eq!(game.phase(), Phase::Failed);
        game.reset();
        assert_eq!(game.phase(), Phase::Loading);
    }
}
