//! Hand landmark data as reported by the external hand-tracking model.
//!
//! Models the 21 points per hand of the usual webcam hand-landmark layout,
//! in normalized image coordinates (x right, y down, both roughly in [0, 1]).

use anyhow::{anyhow, bail};

// ── Joint definitions ──────────────────────────────────────

/// The 21 landmarks in the model's fixed anatomical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandJoint {
    Wrist,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexMcp,
    IndexPip,
    IndexDip,
    IndexTip,
    MiddleMcp,
    MiddlePip,
    MiddleDip,
    MiddleTip,
    RingMcp,
    RingPip,
    RingDip,
    RingTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

/// Total number of landmarks per hand.
pub const LANDMARK_COUNT: usize = 21;

impl HandJoint {
    /// Convert joint enum to array index (0-20).
    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// The four non-thumb fingers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Finger {
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 4] = [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky];

    pub fn tip(self) -> HandJoint {
        match self {
            Self::Index => HandJoint::IndexTip,
            Self::Middle => HandJoint::MiddleTip,
            Self::Ring => HandJoint::RingTip,
            Self::Pinky => HandJoint::PinkyTip,
        }
    }
}

// ── Points ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Landmark) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// One detected hand: exactly 21 points.
#[derive(Debug, Clone, PartialEq)]
pub struct HandLandmarks {
    points: [Landmark; LANDMARK_COUNT],
}

impl HandLandmarks {
    pub fn new(points: [Landmark; LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    /// `None` unless exactly 21 points are given.
    pub fn from_slice(points: &[Landmark]) -> Option<Self> {
        let points: [Landmark; LANDMARK_COUNT] = points.try_into().ok()?;
        Some(Self { points })
    }

    pub fn get(&self, joint: HandJoint) -> Landmark {
        self.points[joint.index()]
    }

    /// Landmark `offset` joints back along the kinematic chain from `joint`.
    /// Saturates at the wrist.
    pub fn back(&self, joint: HandJoint, offset: usize) -> Landmark {
        self.points[joint.index().saturating_sub(offset)]
    }

    pub fn set(&mut self, joint: HandJoint, point: Landmark) {
        self.points[joint.index()] = point;
    }

    pub fn points(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.points
    }

    /// Reflect horizontally, turning a right hand into a left hand.
    pub fn mirrored(&self) -> Self {
        let mut points = self.points;
        for p in &mut points {
            p.x = 1.0 - p.x;
        }
        Self { points }
    }

    /// Parse one text frame: 42 numbers `x0 y0 x1 y1 … x20 y20`, separated by
    /// whitespace and/or commas.  A blank line, `-` or `none` means no hand.
    pub fn parse_line(line: &str) -> anyhow::Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() || line == "-" || line.eq_ignore_ascii_case("none") {
            return Ok(None);
        }

        let values = line
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<f32>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| anyhow!("not a coordinate: {s:?}"))
            })
            .collect::<anyhow::Result<Vec<f32>>>()?;

        if values.len() != LANDMARK_COUNT * 2 {
            bail!("expected {} numbers, got {}", LANDMARK_COUNT * 2, values.len());
        }

        let points: Vec<Landmark> = values
            .chunks_exact(2)
            .map(|xy| Landmark::new(xy[0], xy[1]))
            .collect();
        Ok(Self::from_slice(&points))
    }
}

// ── Reference poses ────────────────────────────────────────

/// Canonical right-hand poses as seen in a mirrored webcam image.
///
/// The keyboard input source emits these, and the tests classify them.
pub mod poses {
    use super::{Finger, HandJoint, HandLandmarks, Landmark, LANDMARK_COUNT};

    const WRIST: Landmark = Landmark { x: 0.52, y: 0.80 };
    const KNUCKLE_Y: f32 = 0.60;

    fn finger_x(finger: Finger) -> f32 {
        match finger {
            Finger::Index => 0.45,
            Finger::Middle => 0.50,
            Finger::Ring => 0.55,
            Finger::Pinky => 0.60,
        }
    }

    fn set_finger(hand: &mut HandLandmarks, finger: Finger, extended: bool) {
        let x = finger_x(finger);
        let ys = if extended {
            [KNUCKLE_Y, 0.50, 0.44, 0.38]
        } else {
            [KNUCKLE_Y, 0.52, 0.58, 0.62]
        };
        let mcp = finger.tip().index() - 3;
        for (i, y) in ys.into_iter().enumerate() {
            hand.points[mcp + i] = Landmark::new(x, y);
        }
    }

    fn set_thumb(hand: &mut HandLandmarks, splayed: bool) {
        hand.set(HandJoint::ThumbCmc, Landmark::new(0.47, 0.74));
        hand.set(HandJoint::ThumbMcp, Landmark::new(0.44, 0.68));
        if splayed {
            hand.set(HandJoint::ThumbIp, Landmark::new(0.40, 0.62));
            hand.set(HandJoint::ThumbTip, Landmark::new(0.32, 0.58));
        } else {
            hand.set(HandJoint::ThumbIp, Landmark::new(0.41, 0.64));
            hand.set(HandJoint::ThumbTip, Landmark::new(0.40, 0.66));
        }
    }

    /// Build a hand from per-finger extension flags (index, middle, ring, pinky).
    pub fn hand(extended: [bool; 4], thumb_splayed: bool) -> HandLandmarks {
        let mut hand = HandLandmarks::new([WRIST; LANDMARK_COUNT]);
        set_thumb(&mut hand, thumb_splayed);
        for (finger, ext) in Finger::ALL.into_iter().zip(extended) {
            set_finger(&mut hand, finger, ext);
        }
        hand
    }

    /// ✊
    pub fn fist() -> HandLandmarks {
        hand([false, false, false, false], false)
    }

    /// ✌️
    pub fn peace() -> HandLandmarks {
        hand([true, true, false, false], false)
    }

    /// 🤘
    pub fn horns() -> HandLandmarks {
        hand([true, false, false, true], false)
    }

    /// 🤙
    pub fn shaka() -> HandLandmarks {
        hand([false, false, false, true], true)
    }

    /// 🤏: "OK" shape: index curled onto the thumb, other fingers up.
    pub fn pinch() -> HandLandmarks {
        let mut h = hand([false, true, true, true], false);
        let tip = h.get(HandJoint::IndexTip);
        h.set(HandJoint::ThumbTip, Landmark::new(tip.x - 0.01, tip.y - 0.01));
        h
    }

    /// 🖐: matches no gesture.
    pub fn open_palm() -> HandLandmarks {
        hand([true, true, true, true], false)
    }
}
