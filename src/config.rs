/// Tunable constants for the game and the gesture classifier.
///
/// Every number the engine or classifier compares against lives here, with a
/// `Default` matching the shipped game.  A RON file may override any subset.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::entities::{EnemyKind, Rect, Weapon};
use crate::gesture::GestureConfig;

// ── Defaults ─────────────────────────────────────────────────────────────────

pub const FIELD_WIDTH: f32 = 1000.0;
pub const FIELD_HEIGHT: f32 = 480.0;
pub const GROUND_Y: f32 = 380.0;

pub const PLAYER_X: f32 = 80.0;
pub const PLAYER_WIDTH: f32 = 100.0;
pub const PLAYER_HEIGHT: f32 = 50.0;
/// Distance from the ground line up to the car's roof.
pub const PLAYER_RIDE_HEIGHT: f32 = 55.0;

pub const INITIAL_SPEED: f32 = 7.0;
pub const SPEED_PER_KILL: f32 = 0.15;
pub const PROJECTILE_STEP: f32 = 20.0;
/// Enemies whose x drops to this value or below have left the field.
pub const DESPAWN_X: f32 = -150.0;

pub const SPAWN_INTERVAL_MS: u64 = 1300;
pub const BOSS_CADENCE: u32 = 10;

/// Road markings and skyline scroll at fixed rates, independent of enemy speed.
pub const ROAD_SCROLL: f32 = 10.0;
pub const ROAD_PERIOD: f32 = 80.0;
pub const SKYLINE_SCROLL: f32 = 1.0;
/// Ten buildings 150 units apart, then the skyline repeats.
pub const SKYLINE_PERIOD: f32 = 1500.0;
// ── Tables ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeaponSpec {
    pub damage: u32,
    pub width: f32,
    pub height: f32,
    /// Launch height measured down from the car's roof.
    pub y_offset: f32,
    pub cooldown_ms: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemySpec {
    pub width: f32,
    pub height: f32,
    pub health: u32,
    pub score: u32,
}

/// All gameplay constants.  Stored inside `GameState` so the pure engine
/// functions need nothing beyond the state itself.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub field_width: f32,
    pub field_height: f32,
    pub ground_y: f32,
    pub player_x: f32,
    pub player_width: f32,
    pub player_height: f32,
    pub player_ride_height: f32,
    pub initial_speed: f32,
    pub speed_per_kill: f32,
    pub projectile_step: f32,
    pub despawn_x: f32,
    pub spawn_interval_ms: u64,
    pub boss_cadence: u32,
    pub road_scroll: f32,
    pub road_period: f32,
    pub skyline_scroll: f32,
    pub skyline_period: f32,
    pub standard: EnemySpec,
    pub boss: EnemySpec,
    pub light: WeaponSpec,
    pub heavy: WeaponSpec,
    pub special: WeaponSpec,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            ground_y: GROUND_Y,
            player_x: PLAYER_X,
            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            player_ride_height: PLAYER_RIDE_HEIGHT,
            initial_speed: INITIAL_SPEED,
            speed_per_kill: SPEED_PER_KILL,
            projectile_step: PROJECTILE_STEP,
            despawn_x: DESPAWN_X,
            spawn_interval_ms: SPAWN_INTERVAL_MS,
            boss_cadence: BOSS_CADENCE,
            road_scroll: ROAD_SCROLL,
            road_period: ROAD_PERIOD,
            skyline_scroll: SKYLINE_SCROLL,
            skyline_period: SKYLINE_PERIOD,
            standard: EnemySpec { width: 40.0, height: 45.0, health: 5, score: 1 },
            boss: EnemySpec { width: 140.0, height: 100.0, health: 40, score: 10 },
            light: WeaponSpec {
                damage: 1,
                width: 20.0,
                height: 6.0,
                y_offset: 20.0,
                cooldown_ms: 250,
            },
            heavy: WeaponSpec {
                damage: 4,
                width: 30.0,
                height: 10.0,
                y_offset: 20.0,
                cooldown_ms: 500,
            },
            special: WeaponSpec {
                damage: 10,
                width: 60.0,
                height: 20.0,
                y_offset: 10.0,
                cooldown_ms: 800,
            },
        }
    }
}

impl Rules {
    pub fn weapon(&self, weapon: Weapon) -> &WeaponSpec {
        match weapon {
            Weapon::Light => &self.light,
            Weapon::Heavy => &self.heavy,
            Weapon::Special => &self.special,
        }
    }

    pub fn enemy(&self, kind: EnemyKind) -> &EnemySpec {
        match kind {
            EnemyKind::Standard => &self.standard,
            EnemyKind::Boss => &self.boss,
        }
    }

    /// Top edge of the car; the car never leaves the ground.
    pub fn player_y(&self) -> f32 {
        self.ground_y - self.player_ride_height
    }

    pub fn player_rect(&self) -> Rect {
        Rect {
            x: self.player_x,
            y: self.player_y(),
            w: self.player_width,
            h: self.player_height,
        }
    }
}

// ── File config ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub rules: Rules,
    pub gesture: GestureConfig,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("when loading config file at {:?}", path))?;
        Self::parse(&content).with_context(|| format!("when parsing config file at {:?}", path))
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(ron::from_str(content)?)
    }
}
