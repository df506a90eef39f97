/// Playfield types shared by the engine, the renderer and the tests.

use std::time::Duration;

use crate::config::Rules;

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle in playfield units (origin top-left, y grows down).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    /// Strict overlap: rectangles that only share an edge do not collide.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }
}

// ── Weapons & projectiles ─────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Weapon {
    /// Rapid low-damage shots (✌️).
    Light,
    /// Slower cannon (🤘).
    Heavy,
    /// Boss-killing beam (🤏).
    Special,
}

impl Weapon {
    pub const ALL: [Weapon; 3] = [Weapon::Light, Weapon::Heavy, Weapon::Special];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Heavy => "heavy",
            Self::Special => "special",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub rect: Rect,
    /// Fixed at creation from the weapon table.
    pub damage: u32,
    pub weapon: Weapon,
}

// ── Enemies ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    /// Zombie walker.
    Standard,
    /// T-Rex.
    Boss,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub rect: Rect,
    pub health: u32,
    pub max_health: u32,
    pub kind: EnemyKind,
}

impl Enemy {
    pub fn is_boss(&self) -> bool {
        self.kind == EnemyKind::Boss
    }
}

// ── Master game state ─────────────────────────────────────────────────────────

/// Coarse lifecycle of one play session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for a fist to start.
    Idle,
    Active,
    /// The car hit something; waiting for a shaka.
    Terminated,
}

/// The entire game state.  Cloneable so the pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    pub phase: Phase,
    pub score: u32,
    /// Best score across completed runs (and the one loaded at startup).
    pub high_score: u32,
    /// World scroll speed in playfield units per tick.
    pub speed: f32,
    /// Last weapon chosen by gesture; drives the HUD.
    pub weapon: Weapon,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    /// Last successful shot per weapon, indexed by `Weapon::index`.
    pub last_fire: [Option<Duration>; 3],
    pub last_spawn: Duration,
    /// Background scroll positions, each in `[0, period)` of its layer.
    pub road_offset: f32,
    pub skyline_offset: f32,
    /// The run that just ended beat the previous record (not merely tied it).
    pub new_record: bool,
    pub rules: Rules,
}

impl GameState {
    pub fn player_rect(&self) -> Rect {
        self.rules.player_rect()
    }

    pub fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }
}
