//! Landmark sources: where each tick's hand comes from.
//!
//! The hand-landmark model itself runs outside this program.  Its output
//! reaches the game as a text stream (one frame per line), or is stood in
//! for by the keyboard or a random demo player.

use std::io::BufRead;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use rand::Rng;
use tracing::{debug, info};

use crate::landmark::{poses, HandLandmarks};

/// Supplies at most one hand per tick.
pub trait LandmarkSource {
    /// Called once per tick.  `None` means no hand this tick.
    fn next_frame(&mut self) -> Option<HandLandmarks>;

    /// Key events seen by the driver loop.  Ignored by most sources.
    fn on_key(&mut self, _key: KeyEvent) {}
}

// ── Text stream ──────────────────────────────────────────────────────────────

/// Reads frames from a line-oriented stream (file, FIFO, stdin).
///
/// A malformed line counts as "no hand".  After the stream ends every
/// tick is "no hand"; the game keeps running.
pub struct StreamSource<R: BufRead> {
    reader: R,
    line: String,
    line_no: u64,
    finished: bool,
}

impl<R: BufRead> StreamSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
            line_no: 0,
            finished: false,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl<R: BufRead> LandmarkSource for StreamSource<R> {
    fn next_frame(&mut self) -> Option<HandLandmarks> {
        if self.finished {
            return None;
        }
        self.line.clear();
        match self.reader.read_line(&mut self.line) {
            Ok(0) => {
                info!(frames = self.line_no, "landmark stream ended");
                self.finished = true;
                None
            }
            Ok(_) => {
                self.line_no += 1;
                match HandLandmarks::parse_line(&self.line) {
                    Ok(hand) => hand,
                    Err(err) => {
                        debug!(line = self.line_no, "skipping landmark frame: {err}");
                        None
                    }
                }
            }
            Err(err) => {
                info!("landmark stream failed: {err}");
                self.finished = true;
                None
            }
        }
    }
}

// ── Keyboard ─────────────────────────────────────────────────────────────────

/// Ticks a pose stays up after its key was last seen (about half a
/// second at 60 FPS).  Covers the auto-repeat delay of terminals that
/// report neither repeats nor releases until the OS starts repeating.
pub const KEY_HOLD_TICKS: u32 = 30;

/// Emulates hand poses with keys: f ✊, v ✌️, h 🤘, p 🤏, s 🤙.
///
/// On terminals that report key releases the pose drops as soon as its key
/// is let go; elsewhere it lapses `KEY_HOLD_TICKS` after the last press.
#[derive(Default)]
pub struct KeyboardSource {
    held: Option<Held>,
}

struct Held {
    key: KeyCode,
    hand: HandLandmarks,
    ticks_left: u32,
}

fn fold_case(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

impl KeyboardSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pose_for_key(code: KeyCode) -> Option<HandLandmarks> {
        match fold_case(code) {
            KeyCode::Char('f') => Some(poses::fist()),
            KeyCode::Char('v') => Some(poses::peace()),
            KeyCode::Char('h') => Some(poses::horns()),
            KeyCode::Char('p') => Some(poses::pinch()),
            KeyCode::Char('s') => Some(poses::shaka()),
            _ => None,
        }
    }
}

impl LandmarkSource for KeyboardSource {
    fn next_frame(&mut self) -> Option<HandLandmarks> {
        let held = self.held.as_mut()?;
        let hand = held.hand.clone();
        held.ticks_left -= 1;
        if held.ticks_left == 0 {
            self.held = None;
        }
        Some(hand)
    }

    fn on_key(&mut self, key: KeyEvent) {
        let code = fold_case(key.code);
        match key.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                if let Some(hand) = Self::pose_for_key(code) {
                    self.held = Some(Held {
                        key: code,
                        hand,
                        ticks_left: KEY_HOLD_TICKS,
                    });
                }
            }
            KeyEventKind::Release => {
                if self.held.as_ref().is_some_and(|h| h.key == code) {
                    self.held = None;
                }
            }
        }
    }
}

// ── Demo player ──────────────────────────────────────────────────────────────

/// Maximum per-coordinate tracker noise added to demo poses.
const DEMO_JITTER: f32 = 0.004;

/// Random player for attract and soak runs.  Holds a random pose (or no
/// hand) for a random number of ticks, with a little tracker noise.
pub struct DemoSource<R: Rng> {
    rng: R,
    current: Option<HandLandmarks>,
    ticks_left: u32,
}

impl<R: Rng> DemoSource<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            current: None,
            ticks_left: 0,
        }
    }

    fn pick(&mut self) -> Option<HandLandmarks> {
        match self.rng.gen_range(0..7) {
            0 => Some(poses::fist()),
            1 => Some(poses::peace()),
            2 => Some(poses::horns()),
            3 => Some(poses::pinch()),
            4 => Some(poses::shaka()),
            5 => Some(poses::open_palm()),
            _ => None,
        }
    }
}

impl<R: Rng> LandmarkSource for DemoSource<R> {
    fn next_frame(&mut self) -> Option<HandLandmarks> {
        if self.ticks_left == 0 {
            self.current = self.pick();
            self.ticks_left = self.rng.gen_range(15..90);
        }
        self.ticks_left -= 1;

        let base = self.current.as_ref()?;
        let mut points = *base.points();
        for p in points.iter_mut() {
            p.x += self.rng.gen_range(-DEMO_JITTER..DEMO_JITTER);
            p.y += self.rng.gen_range(-DEMO_JITTER..DEMO_JITTER);
        }
        Some(HandLandmarks::new(points))
    }
}
