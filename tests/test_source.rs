use std::io::Cursor;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use gesture_runner::gesture::{classify, GestureConfig, Intent};
use gesture_runner::landmark::poses;
use gesture_runner::source::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn line_for(hand: &gesture_runner::landmark::HandLandmarks) -> String {
    hand.points()
        .iter()
        .map(|p| format!("{} {}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

fn press(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn repeat(code: KeyCode) -> KeyEvent {
    KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Repeat)
}

fn release(code: KeyCode) -> KeyEvent {
    KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Release)
}

fn intents(source: &mut dyn LandmarkSource, n: usize) -> Vec<Intent> {
    let cfg = GestureConfig::default();
    (0..n)
        .map(|_| classify(source.next_frame().as_ref(), &cfg))
        .collect()
}

// ── StreamSource ──────────────────────────────────────────────────────────────

#[test]
fn stream_reads_one_frame_per_line() {
    let text = format!(
        "{}\nnone\n1 2 3\n{}\n",
        line_for(&poses::fist()),
        line_for(&poses::horns())
    );
    let mut src = StreamSource::new(Cursor::new(text));
    assert_eq!(
        intents(&mut src, 4),
        vec![Intent::Start, Intent::Neutral, Intent::Neutral, Intent::FireHeavy]
    );
    assert!(!src.is_finished());
}

#[test]
fn stream_end_means_no_hand_forever() {
    let mut src = StreamSource::new(Cursor::new(format!("{}\n", line_for(&poses::peace()))));
    assert!(src.next_frame().is_some());
    assert!(src.next_frame().is_none());
    assert!(src.is_finished());
    assert!(src.next_frame().is_none());
}

// ── KeyboardSource ────────────────────────────────────────────────────────────

#[test]
fn keyboard_is_empty_until_a_key() {
    let mut src = KeyboardSource::new();
    assert!(src.next_frame().is_none());
}

#[test]
fn keyboard_holds_pose_for_a_while() {
    let mut src = KeyboardSource::new();
    src.on_key(press(KeyCode::Char('f')));
    let got = intents(&mut src, KEY_HOLD_TICKS as usize + 1);
    assert!(got[..KEY_HOLD_TICKS as usize].iter().all(|&i| i == Intent::Start));
    assert_eq!(got[KEY_HOLD_TICKS as usize], Intent::Neutral);
}

#[test]
fn keyboard_repeat_refreshes_hold() {
    let mut src = KeyboardSource::new();
    src.on_key(press(KeyCode::Char('v')));
    let _ = intents(&mut src, KEY_HOLD_TICKS as usize - 1);
    src.on_key(repeat(KeyCode::Char('v')));
    let got = intents(&mut src, KEY_HOLD_TICKS as usize);
    assert!(got.iter().all(|&i| i == Intent::FireLight));
}

#[test]
fn keyboard_keys_cover_every_intent() {
    for (key, intent) in [
        ('f', Intent::Start),
        ('v', Intent::FireLight),
        ('h', Intent::FireHeavy),
        ('p', Intent::FireSpecial),
        ('S', Intent::Restart),
    ] {
        let mut src = KeyboardSource::new();
        src.on_key(press(KeyCode::Char(key)));
        assert_eq!(intents(&mut src, 1), vec![intent], "key {key}");
    }
}

#[test]
fn keyboard_ignores_other_keys() {
    let mut src = KeyboardSource::new();
    src.on_key(press(KeyCode::Char('x')));
    src.on_key(press(KeyCode::Enter));
    assert!(src.next_frame().is_none());
}

#[test]
fn keyboard_hold_outlasts_auto_repeat_delay() {
    // Terminals commonly wait up to 500 ms (30 ticks) before repeating.
    let mut src = KeyboardSource::new();
    src.on_key(press(KeyCode::Char('p')));
    let got = intents(&mut src, 30);
    assert!(got.iter().all(|&i| i == Intent::FireSpecial));
}

#[test]
fn keyboard_release_drops_pose_at_once() {
    let mut src = KeyboardSource::new();
    src.on_key(press(KeyCode::Char('h')));
    assert_eq!(intents(&mut src, 2), vec![Intent::FireHeavy; 2]);
    src.on_key(release(KeyCode::Char('H')));
    assert_eq!(intents(&mut src, 1), vec![Intent::Neutral]);
}

#[test]
fn keyboard_release_of_other_key_keeps_pose() {
    let mut src = KeyboardSource::new();
    src.on_key(press(KeyCode::Char('h')));
    src.on_key(press(KeyCode::Char('v')));
    src.on_key(release(KeyCode::Char('h')));
    assert_eq!(intents(&mut src, 1), vec![Intent::FireLight]);
}

// ── DemoSource ────────────────────────────────────────────────────────────────

#[test]
fn demo_is_reproducible_for_a_seed() {
    let mut a = DemoSource::new(StdRng::seed_from_u64(7));
    let mut b = DemoSource::new(StdRng::seed_from_u64(7));
    for _ in 0..500 {
        assert_eq!(a.next_frame(), b.next_frame());
    }
}

#[test]
fn demo_noise_does_not_change_poses() {
    // Each held pose classifies the same way on every tick it is held,
    // so intents only change in runs, never flicker tick to tick.
    let mut src = DemoSource::new(StdRng::seed_from_u64(99));
    let got = intents(&mut src, 3000);
    let changes = got.windows(2).filter(|w| w[0] != w[1]).count();
    assert!(changes < 3000 / 15);
    assert!(got.contains(&Intent::Start));
    assert!(got.contains(&Intent::FireSpecial));
    assert!(got.contains(&Intent::Restart));
}
