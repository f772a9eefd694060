//! Tapper - tap as fast as you can
//!
//! A counter with a persisted best score. No loop, no timer: every state
//! change is a direct reaction to a shell event.

use std::rc::Rc;

use crate::hub::{GameModule, HostServices};
use crate::platform::ScoreStore;

pub const TAPPER_ID: &str = "tapper";

const BEST_SCORE_KEY: &str = "game_tapper_highscore";

pub struct TapperGame {
    score: u32,
    best: u64,
    store: Option<Rc<dyn ScoreStore>>,
}

impl TapperGame {
    pub fn new() -> Self {
        Self {
            score: 0,
            best: 0,
            store: None,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    /// Count a tap; the best score is persisted the moment it is beaten
    pub fn tap(&mut self) -> u32 {
        self.score += 1;
        if u64::from(self.score) > self.best {
            self.best = u64::from(self.score);
            if let Some(store) = &self.store {
                store.set(BEST_SCORE_KEY, self.best);
            }
        }
        self.score
    }

    /// Zero the current run; the best survives
    pub fn reset(&mut self) {
        self.score = 0;
    }
}

impl Default for TapperGame {
    fn default() -> Self {
        Self::new()
    }
}

impl GameModule for TapperGame {
    fn id(&self) -> &'static str {
        TAPPER_ID
    }

    fn display_name(&self) -> &'static str {
        "Tapper"
    }

    fn mount(&mut self, services: &HostServices) {
        self.score = 0;
        self.store = services.store.clone();
        match &self.store {
            Some(store) => {
                self.best = store.get(BEST_SCORE_KEY).unwrap_or(0);
            }
            None => {
                log::info!("tapper: storage unavailable, best score is session-only");
                self.best = 0;
            }
        }
    }

    fn unmount(&mut self) {
        self.store = None;
    }
}
