use std::io::{self, Write};

use gesture_runner::audio::*;
use gesture_runner::entities::Weapon;

struct BrokenSpeaker;

impl Write for BrokenSpeaker {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "unplugged"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn bell_rings_once_per_shot() {
    let mut bell = Bell::new(Vec::new());
    bell.play(Effect::Shot(Weapon::Light));
    bell.play(Effect::Shot(Weapon::Special));
    assert!(bell.is_enabled());
}

#[test]
fn broken_device_disables_sound_quietly() {
    let mut bell = Bell::new(BrokenSpeaker);
    bell.play(Effect::Shot(Weapon::Heavy));
    assert!(!bell.is_enabled());
    bell.play(Effect::Shot(Weapon::Heavy));
}

#[test]
fn silent_accepts_everything() {
    let mut audio: Box<dyn Audio> = Box::new(Silent);
    audio.play(Effect::Shot(Weapon::Light));
}
