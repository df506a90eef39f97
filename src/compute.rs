/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `GameState` plus the caller's clock reading, and returns a brand-new
/// `GameState` together with the events the driver loop should react to.
/// Nothing here reads a clock, touches the disk or plays sound.

use std::time::Duration;

use tracing::{debug, info};

use crate::config::Rules;
use crate::entities::{Enemy, EnemyKind, GameState, Phase, Projectile, Rect, Weapon};
use crate::gesture::Intent;

/// Things that happened during a state transition.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    RunStarted,
    /// Back to idle after a terminated run.
    RunReset,
    WeaponSelected(Weapon),
    Fired(Weapon),
    EnemySpawned(EnemyKind),
    EnemyKilled { kind: EnemyKind, score: u32 },
    RunEnded { score: u32, new_record: bool },
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build an idle game state.  `high_score` is the persisted record.
pub fn init_state(rules: Rules, high_score: u32) -> GameState {
    GameState {
        phase: Phase::Idle,
        score: 0,
        high_score,
        speed: rules.initial_speed,
        weapon: Weapon::Light,
        enemies: Vec::new(),
        projectiles: Vec::new(),
        last_fire: [None; 3],
        last_spawn: Duration::ZERO,
        road_offset: 0.0,
        skyline_offset: 0.0,
        new_record: false,
        rules,
    }
}

/// Fresh world, keeping the record and the rules.
fn fresh(state: &GameState) -> GameState {
    init_state(state.rules.clone(), state.high_score)
}

/// IDLE → ACTIVE.  The spawn timer starts now.
pub fn start_run(state: &GameState, now: Duration) -> GameState {
    GameState {
        phase: Phase::Active,
        last_spawn: now,
        ..fresh(state)
    }
}

/// TERMINATED → IDLE.
pub fn reset_run(state: &GameState) -> GameState {
    fresh(state)
}

pub fn enemy_at(rules: &Rules, kind: EnemyKind, x: f32) -> Enemy {
    let spec = rules.enemy(kind);
    Enemy {
        rect: Rect {
            x,
            y: rules.ground_y - spec.height,
            w: spec.width,
            h: spec.height,
        },
        health: spec.health,
        max_health: spec.health,
        kind,
    }
}

pub fn projectile_for(rules: &Rules, weapon: Weapon) -> Projectile {
    let spec = rules.weapon(weapon);
    let player = rules.player_rect();
    Projectile {
        rect: Rect {
            x: player.x + player.w,
            y: player.y + spec.y_offset,
            w: spec.width,
            h: spec.height,
        },
        damage: spec.damage,
        weapon,
    }
}

// ── Firing ───────────────────────────────────────────────────────────────────

fn cooled_down(state: &GameState, weapon: Weapon, now: Duration) -> bool {
    let cooldown = Duration::from_millis(state.rules.weapon(weapon).cooldown_ms);
    match state.last_fire[weapon.index()] {
        Some(last) => now.saturating_sub(last) >= cooldown,
        None => true,
    }
}

/// Select `weapon` and fire it if its cooldown has elapsed.
///
/// Only acts while a run is active.  The selection sticks even when the
/// shot is blocked by the cooldown.
pub fn try_fire(state: &GameState, weapon: Weapon, now: Duration) -> (GameState, bool) {
    if !state.is_active() {
        return (state.clone(), false);
    }

    let mut next = GameState {
        weapon,
        ..state.clone()
    };
    if !cooled_down(state, weapon, now) {
        return (next, false);
    }

    next.projectiles.push(projectile_for(&state.rules, weapon));
    next.last_fire[weapon.index()] = Some(now);
    (next, true)
}

// ── Intent handling ──────────────────────────────────────────────────────────

/// Apply the run-phase state machine for one intent.  Intents that mean
/// nothing in the current phase are ignored.
pub fn apply_intent(
    state: &GameState,
    intent: Intent,
    now: Duration,
) -> (GameState, Vec<GameEvent>) {
    let mut events = Vec::new();

    let next = match (state.phase, intent) {
        (Phase::Idle, Intent::Start) => {
            info!(high_score = state.high_score, "run started");
            events.push(GameEvent::RunStarted);
            start_run(state, now)
        }
        (Phase::Terminated, Intent::Restart) => {
            events.push(GameEvent::RunReset);
            reset_run(state)
        }
        (Phase::Active, _) => match intent.weapon() {
            Some(weapon) => {
                let (next, fired) = try_fire(state, weapon, now);
                if weapon != state.weapon {
                    events.push(GameEvent::WeaponSelected(weapon));
                }
                if fired {
                    events.push(GameEvent::Fired(weapon));
                }
                next
            }
            None => state.clone(),
        },
        _ => state.clone(),
    };

    (next, events)
}

// ── Per-tick update ──────────────────────────────────────────────────────────

/// Advance a looping background layer, staying within `[0, period)`.
fn scroll(offset: f32, step: f32, period: f32) -> f32 {
    if period > 0.0 {
        (offset + step).rem_euclid(period)
    } else {
        0.0
    }
}

fn spawn_kind(score: u32, cadence: u32) -> EnemyKind {
    if score > 0 && cadence > 0 && score % cadence == 0 {
        EnemyKind::Boss
    } else {
        EnemyKind::Standard
    }
}

/// Advance the world by one tick.  No-op unless a run is active.
pub fn tick(state: &GameState, now: Duration) -> (GameState, Vec<GameEvent>) {
    if !state.is_active() {
        return (state.clone(), Vec::new());
    }
    let rules = &state.rules;
    let mut events = Vec::new();

    // ── 0. Scroll the background ─────────────────────────────────────────────
    let road_offset = scroll(state.road_offset, rules.road_scroll, rules.road_period);
    let skyline_offset = scroll(state.skyline_offset, rules.skyline_scroll, rules.skyline_period);

    // ── 1. Move projectiles ──────────────────────────────────────────────────
    let mut projectiles: Vec<Projectile> = state
        .projectiles
        .iter()
        .map(|p| Projectile {
            rect: Rect { x: p.rect.x + rules.projectile_step, ..p.rect },
            ..p.clone()
        })
        .filter(|p| p.rect.x < rules.field_width)
        .collect();

    // ── 2. Move enemies toward the car ───────────────────────────────────────
    let mut enemies: Vec<Enemy> = state
        .enemies
        .iter()
        .map(|e| Enemy {
            rect: Rect { x: e.rect.x - state.speed, ..e.rect },
            ..e.clone()
        })
        .filter(|e| e.rect.x > rules.despawn_x)
        .collect();

    // ── 3. Spawn ─────────────────────────────────────────────────────────────
    let mut last_spawn = state.last_spawn;
    if now.saturating_sub(state.last_spawn) >= Duration::from_millis(rules.spawn_interval_ms) {
        let kind = spawn_kind(state.score, rules.boss_cadence);
        if kind == EnemyKind::Boss {
            debug!(score = state.score, "boss spawned");
        }
        enemies.push(enemy_at(rules, kind, rules.field_width));
        events.push(GameEvent::EnemySpawned(kind));
        last_spawn = now;
    }

    // ── 4. Collisions ────────────────────────────────────────────────────────
    // A car crash ends the run, but the rest of the pass still resolves so
    // shots already in flight land this tick.
    let player = rules.player_rect();
    let mut crashed = false;
    let mut score = state.score;
    let mut speed = state.speed;
    let mut survivors = Vec::with_capacity(enemies.len());

    for mut enemy in enemies.drain(..) {
        if player.overlaps(&enemy.rect) {
            crashed = true;
        }

        let mut killed = false;
        let mut i = 0;
        while i < projectiles.len() {
            if !projectiles[i].rect.overlaps(&enemy.rect) {
                i += 1;
                continue;
            }
            let shot = projectiles.remove(i);
            enemy.health = enemy.health.saturating_sub(shot.damage);
            if enemy.health == 0 {
                killed = true;
                break;
            }
        }

        if killed {
            score += rules.enemy(enemy.kind).score;
            speed += rules.speed_per_kill;
            events.push(GameEvent::EnemyKilled { kind: enemy.kind, score });
        } else {
            survivors.push(enemy);
        }
    }

    // ── 5. Run end ───────────────────────────────────────────────────────────
    let mut phase = state.phase;
    let mut high_score = state.high_score;
    let mut new_record = false;
    if crashed {
        phase = Phase::Terminated;
        new_record = score > high_score;
        if new_record {
            high_score = score;
        }
        info!(score, high_score, new_record, "run ended");
        events.push(GameEvent::RunEnded { score, new_record });
    }

    let next = GameState {
        phase,
        score,
        high_score,
        speed,
        enemies: survivors,
        projectiles,
        last_spawn,
        road_offset,
        skyline_offset,
        new_record,
        ..state.clone()
    };
    (next, events)
}

/// One full tick: apply the intent, then advance the world.
pub fn step(state: &GameState, intent: Intent, now: Duration) -> (GameState, Vec<GameEvent>) {
    let (next, mut events) = apply_intent(state, intent, now);
    let (next, tick_events) = tick(&next, now);
    events.extend(tick_events);
    (next, events)
}
