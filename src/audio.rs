//! Sound triggers.  Fire-and-forget: a failing device never stops the game.

use std::io::Write;

use tracing::warn;

use crate::entities::Weapon;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Shot(Weapon),
}

pub trait Audio {
    fn play(&mut self, effect: Effect);
}

/// No sound at all (`--mute`, headless runs).
pub struct Silent;

impl Audio for Silent {
    fn play(&mut self, _effect: Effect) {}
}

/// Rings the terminal bell.  Disables itself after the first write error.
pub struct Bell<W: Write> {
    out: W,
    enabled: bool,
}

impl<W: Write> Bell<W> {
    pub fn new(out: W) -> Self {
        Self { out, enabled: true }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl<W: Write> Audio for Bell<W> {
    fn play(&mut self, _effect: Effect) {
        if !self.enabled {
            return;
        }
        let result = self.out.write_all(b"\x07").and_then(|_| self.out.flush());
        if let Err(err) = result {
            warn!("sound disabled: {err}");
            self.enabled = false;
        }
    }
}
