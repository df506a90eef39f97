//! One play session: read a hand, classify it, step the engine, then carry
//! out the side effects the engine reported (sound, high score file).

use std::time::Duration;

use tracing::{debug, info};

use crate::audio::{Audio, Effect};
use crate::compute::{init_state, step, GameEvent};
use crate::config::Config;
use crate::entities::GameState;
use crate::gesture::{classify, GestureConfig, Intent};
use crate::landmark::HandLandmarks;
use crate::score_store::HighScoreStore;
use crate::source::LandmarkSource;

pub const FRAME: Duration = Duration::from_micros(16_667); // ≈60 FPS

pub struct Session {
    pub state: GameState,
    gesture: GestureConfig,
    store: HighScoreStore,
    audio: Box<dyn Audio>,
    last_hand: Option<HandLandmarks>,
    last_intent: Intent,
}

impl Session {
    /// Reads the stored record and starts idle.
    pub fn new(config: Config, mut store: HighScoreStore, audio: Box<dyn Audio>) -> Self {
        let high_score = store.load();
        Self {
            state: init_state(config.rules, high_score),
            gesture: config.gesture,
            store,
            audio,
            last_hand: None,
            last_intent: Intent::Neutral,
        }
    }

    pub fn store(&self) -> &HighScoreStore {
        &self.store
    }

    /// The hand seen on the last tick, after any mirroring.
    pub fn last_hand(&self) -> Option<&HandLandmarks> {
        self.last_hand.as_ref()
    }

    pub fn last_intent(&self) -> Intent {
        self.last_intent
    }

    /// Input, classification, update.  Rendering is up to the caller.
    pub fn tick(&mut self, source: &mut dyn LandmarkSource, now: Duration) -> Vec<GameEvent> {
        let mut hand = source.next_frame();
        if self.gesture.mirror {
            hand = hand.map(|h| h.mirrored());
        }
        let intent = classify(hand.as_ref(), &self.gesture);
        let (next, events) = step(&self.state, intent, now);
        self.state = next;
        self.last_hand = hand;
        self.last_intent = intent;

        for event in &events {
            match *event {
                GameEvent::Fired(weapon) => {
                    debug!(weapon = weapon.as_str(), "fired");
                    self.audio.play(Effect::Shot(weapon));
                }
                GameEvent::RunEnded { new_record: true, .. } => {
                    self.store.save_if_higher(self.state.high_score);
                }
                _ => {}
            }
        }
        events
    }

    /// Persist the record on the way out.
    pub fn finish(&mut self) {
        self.store.save_if_higher(self.state.high_score);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadlessReport {
    pub ticks: u64,
    /// Runs that ended in a crash.
    pub runs: u32,
    pub best: u32,
}

/// Drive the session on a simulated clock, one `FRAME` per tick.
pub fn run_headless(session: &mut Session, source: &mut dyn LandmarkSource, ticks: u64) -> HeadlessReport {
    let mut report = HeadlessReport { ticks, runs: 0, best: 0 };
    for n in 0..ticks {
        let now = FRAME.saturating_mul(u32::try_from(n).unwrap_or(u32::MAX));
        for event in session.tick(source, now) {
            if let GameEvent::RunEnded { score, .. } = event {
                report.runs += 1;
                report.best = report.best.max(score);
            }
        }
    }
    info!(
        ticks,
        runs = report.runs,
        best = report.best,
        high_score = session.state.high_score,
        "headless run finished"
    );
    report
}
