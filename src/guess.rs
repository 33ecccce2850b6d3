//! Guess evaluation.

/// Result of one submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    /// Wrong name; the round stays open.
    TryAgain,
    /// Round already won, submission ignored.
    AlreadySolved,
    /// No confirmed target yet.
    NotReady,
}

impl Verdict {
    /// Whether the player gets the blocking "keep trying" notice.
    pub fn asks_to_retry(self) -> bool {
        matches!(self, Verdict::TryAgain | Verdict::NotReady)
    }
}

/// Case folding applied to user input. Catalog entries are compared as stored.
pub fn normalize(raw: &str) -> String {
    raw.to_lowercase()
}

pub fn is_match(raw: &str, target: &str) -> bool {
    normalize(raw) == target
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GuessState {
    solved: bool,
    last_guess: Option<String>,
}

impl GuessState {
    pub fn is_solved(&self) -> bool {
        self.solved
    }

    /// Normalized text of the latest accepted submission.
    pub fn last_guess(&self) -> Option<&str> {
        self.last_guess.as_deref()
    }

    /// Compare `raw` against `target`. Solving is terminal for the round.
    pub fn submit(&mut self, raw: &str, target: Option<&str>) -> Verdict {
        if self.solved {
            return Verdict::AlreadySolved;
        }
        let Some(target) = target else {
            return Verdict::NotReady;
        };
        let guess = normalize(raw);
        let verdict = if guess == target { Verdict::Correct } else { Verdict::TryAgain };
        self.last_guess = Some(guess);
        if verdict == Verdict::Correct {
            self.solved = true;
        }
        verdict
    }
}
