//! Gesture classification from hand landmarks.
//!
//! Five static poses are recognized (fist, peace, horns, shaka, pinch) from
//! simple comparisons between fingertip and joint positions.  When several
//! match at once a fixed priority picks the winner:
//! shaka > pinch > horns > peace > fist.

use serde::{Deserialize, Serialize};

use crate::entities::Weapon;
use crate::landmark::{Finger, HandJoint, HandLandmarks};

// ── Output ─────────────────────────────────────────────────

/// The player command for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    /// No hand, or a hand pose that means nothing.
    Neutral,
    Start,
    Restart,
    FireLight,
    FireHeavy,
    FireSpecial,
}

impl Intent {
    /// The weapon a fire intent selects.
    pub fn weapon(self) -> Option<Weapon> {
        match self {
            Self::FireLight => Some(Weapon::Light),
            Self::FireHeavy => Some(Weapon::Heavy),
            Self::FireSpecial => Some(Weapon::Special),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Start => "start",
            Self::Restart => "restart",
            Self::FireLight => "fire-light",
            Self::FireHeavy => "fire-heavy",
            Self::FireSpecial => "fire-special",
        }
    }
}

/// Recognized hand poses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pose {
    Shaka,
    Pinch,
    Horns,
    Peace,
    Fist,
}

impl Pose {
    /// Highest priority first.
    pub const PRIORITY: [Pose; 5] = [Pose::Shaka, Pose::Pinch, Pose::Horns, Pose::Peace, Pose::Fist];

    pub fn intent(self) -> Intent {
        match self {
            Self::Shaka => Intent::Restart,
            Self::Pinch => Intent::FireSpecial,
            Self::Horns => Intent::FireHeavy,
            Self::Peace => Intent::FireLight,
            Self::Fist => Intent::Start,
        }
    }
}

// ── Config ─────────────────────────────────────────────────

/// Which hand the camera sees, after any mirroring of the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Handedness {
    /// Thumb points toward smaller x when splayed.
    Right,
    /// Thumb points toward larger x when splayed.
    Left,
}

/// Thresholds for the pose predicates, in normalized image units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Maximum thumb-tip to index-tip distance for a pinch.
    pub pinch_threshold: f32,
    /// Minimum sideways thumb-tip displacement from the thumb IP joint for a shaka.
    pub thumb_splay: f32,
    /// How many joints back from a fingertip the fist test compares against.
    pub joint_offset: usize,
    pub handedness: Handedness,
    /// Flip incoming landmarks left to right before classifying.  For
    /// trackers fed an unmirrored camera image.
    pub mirror: bool,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            pinch_threshold: 0.05,
            thumb_splay: 0.05,
            joint_offset: 2,
            handedness: Handedness::Right,
            mirror: false,
        }
    }
}

// ── Predicates ─────────────────────────────────────────────

/// Tip above its PIP joint (smaller y is higher on screen).
fn extended(hand: &HandLandmarks, finger: Finger) -> bool {
    hand.get(finger.tip()).y < hand.back(finger.tip(), 2).y
}

/// Tip below its PIP joint.  Not simply `!extended`: a tip level with the
/// joint is neither.
fn curled(hand: &HandLandmarks, finger: Finger) -> bool {
    hand.get(finger.tip()).y > hand.back(finger.tip(), 2).y
}

pub fn is_fist(hand: &HandLandmarks, config: &GestureConfig) -> bool {
    Finger::ALL.iter().all(|&f| {
        hand.get(f.tip()).y > hand.back(f.tip(), config.joint_offset).y
    })
}

pub fn is_peace(hand: &HandLandmarks) -> bool {
    extended(hand, Finger::Index)
        && extended(hand, Finger::Middle)
        && curled(hand, Finger::Ring)
        && curled(hand, Finger::Pinky)
}

pub fn is_horns(hand: &HandLandmarks) -> bool {
    extended(hand, Finger::Index)
        && extended(hand, Finger::Pinky)
        && curled(hand, Finger::Middle)
        && curled(hand, Finger::Ring)
}

pub fn is_shaka(hand: &HandLandmarks, config: &GestureConfig) -> bool {
    let tip = hand.get(HandJoint::ThumbTip).x;
    let base = hand.get(HandJoint::ThumbIp).x;
    let splayed = match config.handedness {
        Handedness::Right => tip < base - config.thumb_splay,
        Handedness::Left => tip > base + config.thumb_splay,
    };
    splayed
        && extended(hand, Finger::Pinky)
        && curled(hand, Finger::Index)
        && curled(hand, Finger::Middle)
        && curled(hand, Finger::Ring)
}

pub fn is_pinch(hand: &HandLandmarks, config: &GestureConfig) -> bool {
    let d = hand
        .get(HandJoint::ThumbTip)
        .distance(&hand.get(HandJoint::IndexTip));
    d < config.pinch_threshold
}

fn matches(pose: Pose, hand: &HandLandmarks, config: &GestureConfig) -> bool {
    match pose {
        Pose::Shaka => is_shaka(hand, config),
        Pose::Pinch => is_pinch(hand, config),
        Pose::Horns => is_horns(hand),
        Pose::Peace => is_peace(hand),
        Pose::Fist => is_fist(hand, config),
    }
}

// ── Classifier ─────────────────────────────────────────────

/// Highest-priority pose the hand satisfies, if any.
pub fn detect_pose(hand: &HandLandmarks, config: &GestureConfig) -> Option<Pose> {
    Pose::PRIORITY
        .into_iter()
        .find(|&pose| matches(pose, hand, config))
}

/// Map one frame's landmarks (or the lack of a hand) to an intent.
pub fn classify(hand: Option<&HandLandmarks>, config: &GestureConfig) -> Intent {
    hand.and_then(|h| detect_pose(h, config))
        .map(Pose::intent)
        .unwrap_or(Intent::Neutral)
}
