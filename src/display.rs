/// Terminal renderer.  All screen output happens here.
///
/// Each function receives a mutable writer and an immutable view of the
/// game state.  No game logic is performed; this module only translates
/// the playfield into terminal cells.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use gesture_runner::entities::{Enemy, EnemyKind, GameState, Phase, Projectile, Rect, Weapon};
use gesture_runner::gesture::Intent;
use gesture_runner::landmark::HandLandmarks;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_GROUND: Color = Color::Cyan;
const C_ROAD_MARK: Color = Color::DarkGrey;
const C_SKYLINE: Color = Color::DarkBlue;
const C_TRACKER: Color = Color::Cyan;
const C_LANDMARK: Color = Color::Magenta;
const C_HUD_SCORE: Color = Color::White;
const C_HUD_RECORD: Color = Color::DarkGrey;
const C_CAR: Color = Color::Grey;
const C_ZOMBIE: Color = Color::DarkGreen;
const C_TREX: Color = Color::DarkYellow;
const C_HEALTH: Color = Color::Green;
const C_HEALTH_BOSS: Color = Color::Red;
const C_HINT: Color = Color::DarkGrey;

fn weapon_color(weapon: Weapon) -> Color {
    match weapon {
        Weapon::Light => Color::Cyan,
        Weapon::Heavy => Color::Magenta,
        Weapon::Special => Color::Red,
    }
}

fn weapon_label(weapon: Weapon) -> &'static str {
    match weapon {
        Weapon::Light => "SMG (✌️)",
        Weapon::Heavy => "CANNON (🤘)",
        Weapon::Special => "MONSTER GUN (🤏)",
    }
}

// ── Playfield → terminal mapping ──────────────────────────────────────────────

/// Terminal layout: HUD on row 0, border on rows 1 and h-2, hint on row h-1.
pub struct Viewport {
    pub width: u16,
    pub height: u16,
    field_width: f32,
    field_height: f32,
}

impl Viewport {
    pub fn new(width: u16, height: u16, state: &GameState) -> Self {
        Self {
            width,
            height,
            field_width: state.rules.field_width,
            field_height: state.rules.field_height,
        }
    }

    fn inner_cols(&self) -> f32 {
        self.width.saturating_sub(2) as f32
    }

    fn inner_rows(&self) -> f32 {
        self.height.saturating_sub(4) as f32
    }

    fn col(&self, x: f32) -> i32 {
        1 + (x / self.field_width * self.inner_cols()).floor() as i32
    }

    fn row(&self, y: f32) -> i32 {
        2 + (y / self.field_height * self.inner_rows()).floor() as i32
    }

    /// Cell span of a rectangle, clipped to the play area.  At least one
    /// cell in each direction so small things stay visible.
    fn cells(&self, rect: &Rect) -> Option<(u16, u16, u16, u16)> {
        let c0 = self.col(rect.x).max(1);
        let c1 = self.col(rect.x + rect.w).max(c0 + 1).min(self.width as i32 - 1);
        let r0 = self.row(rect.y).max(2);
        let r1 = self.row(rect.y + rect.h).max(r0 + 1).min(self.height as i32 - 2);
        if c0 >= c1 || r0 >= r1 {
            return None;
        }
        Some((c0 as u16, r0 as u16, (c1 - c0) as u16, (r1 - r0) as u16))
    }
}

fn fill<W: Write>(out: &mut W, view: &Viewport, rect: &Rect, glyph: char) -> std::io::Result<()> {
    if let Some((col, row, w, h)) = view.cells(rect) {
        let line: String = std::iter::repeat(glyph).take(w as usize).collect();
        for r in row..row + h {
            out.queue(cursor::MoveTo(col, r))?;
            out.queue(Print(&line))?;
        }
    }
    Ok(())
}

// ── Public entry point ────────────────────────────────────────────────────────

/// What the hand tracker saw on the last tick.
pub struct Tracker<'a> {
    pub hand: Option<&'a HandLandmarks>,
    pub intent: Intent,
}

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    state: &GameState,
    view: &Viewport,
    tracker: &Tracker,
    hint: &str,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, view)?;
    draw_skyline(out, state, view)?;
    draw_ground(out, state, view)?;
    draw_hud(out, state, view)?;

    for enemy in &state.enemies {
        draw_enemy(out, enemy, view)?;
    }
    for projectile in &state.projectiles {
        draw_projectile(out, projectile, view)?;
    }
    draw_car(out, state, view)?;
    draw_tracker(out, view, tracker)?;

    out.queue(cursor::MoveTo(1, view.height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(hint))?;

    match state.phase {
        Phase::Idle => draw_banner(
            out,
            view,
            Color::Cyan,
            &["T-REX PROTOCOL ACTIVE".to_string(), "HOLD ✊ TO INITIALIZE".to_string()],
        )?,
        Phase::Terminated => draw_game_over(out, state, view)?,
        Phase::Active => {}
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, view.height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Frame ─────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    let w = view.width as usize;
    let h = view.height;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

/// Building spacing and width along the skyline, in playfield units.
const BUILDING_STEP: f32 = 150.0;
const BUILDING_WIDTH: f32 = 100.0;

/// Height of the `i`th building in a skyline that repeats every ten.
fn building_height(i: usize) -> f32 {
    120.0 + ((i % 10) as f32 * 0.7).sin() * 60.0
}

fn draw_skyline<W: Write>(out: &mut W, state: &GameState, view: &Viewport) -> std::io::Result<()> {
    let rules = &state.rules;
    let base = rules.ground_y - 80.0;
    let count = ((rules.skyline_period + rules.field_width) / BUILDING_STEP).ceil() as usize + 1;

    out.queue(style::SetForegroundColor(C_SKYLINE))?;
    for i in 0..count {
        let x = i as f32 * BUILDING_STEP - state.skyline_offset;
        if x + BUILDING_WIDTH <= 0.0 || x >= rules.field_width {
            continue;
        }
        let h = building_height(i);
        let left = x.max(0.0);
        let right = (x + BUILDING_WIDTH).min(rules.field_width);
        let building = Rect { x: left, y: base - h, w: right - left, h };
        fill(out, view, &building, '░')?;
    }
    Ok(())
}

fn draw_ground<W: Write>(out: &mut W, state: &GameState, view: &Viewport) -> std::io::Result<()> {
    let rules = &state.rules;
    let row = view.row(rules.ground_y);
    if row < 2 || row >= view.height as i32 - 2 {
        return Ok(());
    }
    out.queue(cursor::MoveTo(1, row as u16))?;
    out.queue(style::SetForegroundColor(C_GROUND))?;
    out.queue(Print("═".repeat(view.width.saturating_sub(2) as usize)))?;

    // Lane dashes halfway down the road, half a period long.
    if rules.road_period <= 0.0 {
        return Ok(());
    }
    let lane_y = rules.ground_y + (rules.field_height - rules.ground_y) / 2.0;
    let dash = rules.road_period / 2.0;
    let count = (rules.field_width / rules.road_period).ceil() as usize + 1;
    out.queue(style::SetForegroundColor(C_ROAD_MARK))?;
    for i in 0..count {
        let x = i as f32 * rules.road_period - state.road_offset;
        let left = x.max(0.0);
        let right = (x + dash).min(rules.field_width);
        if right <= left {
            continue;
        }
        // Flat one-cell-high strip: `cells` widens zero height to one row.
        let mark = Rect { x: left, y: lane_y, w: right - left, h: 0.0 };
        fill(out, view, &mark, '━')?;
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &GameState, view: &Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("EXTERMINATIONS:{:>5}", state.score)))?;
    out.queue(style::SetForegroundColor(C_HUD_RECORD))?;
    out.queue(Print(format!("   RECORD:{:>5}", state.high_score)))?;

    let label = weapon_label(state.weapon);
    let rx = view.width.saturating_sub(label.chars().count() as u16 + 2);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(weapon_color(state.weapon)))?;
    out.queue(Print(label))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_car<W: Write>(out: &mut W, state: &GameState, view: &Viewport) -> std::io::Result<()> {
    let body = state.player_rect();
    out.queue(style::SetForegroundColor(C_CAR))?;
    fill(out, view, &body, '█')?;

    // Wheel hubs show the selected weapon.
    if let Some((col, row, w, h)) = view.cells(&body) {
        let wheel_row = row + h - 1;
        out.queue(style::SetForegroundColor(weapon_color(state.weapon)))?;
        out.queue(cursor::MoveTo(col, wheel_row))?;
        out.queue(Print("o"))?;
        out.queue(cursor::MoveTo(col + w.saturating_sub(1), wheel_row))?;
        out.queue(Print("o"))?;
    }
    Ok(())
}

fn draw_enemy<W: Write>(out: &mut W, enemy: &Enemy, view: &Viewport) -> std::io::Result<()> {
    let (color, glyph, bar_color) = match enemy.kind {
        EnemyKind::Standard => (C_ZOMBIE, 'Z', C_HEALTH),
        EnemyKind::Boss => (C_TREX, '▓', C_HEALTH_BOSS),
    };
    out.queue(style::SetForegroundColor(color))?;
    fill(out, view, &enemy.rect, glyph)?;

    // Health bar one row above the sprite.
    if let Some((col, row, w, _)) = view.cells(&enemy.rect) {
        if row > 2 {
            let filled = (w as u32 * enemy.health / enemy.max_health.max(1)) as usize;
            let bar: String = "▀".repeat(filled) + &" ".repeat((w as usize).saturating_sub(filled));
            out.queue(cursor::MoveTo(col, row - 1))?;
            out.queue(style::SetForegroundColor(bar_color))?;
            out.queue(Print(bar))?;
        }
    }
    Ok(())
}

fn draw_projectile<W: Write>(out: &mut W, projectile: &Projectile, view: &Viewport) -> std::io::Result<()> {
    let glyph = match projectile.weapon {
        Weapon::Light => '-',
        Weapon::Heavy => '=',
        Weapon::Special => '≡',
    };
    out.queue(style::SetForegroundColor(weapon_color(projectile.weapon)))?;
    fill(out, view, &projectile.rect, glyph)
}

// ── Tracker panel (top right) ─────────────────────────────────────────────────

const PANEL_COLS: u16 = 22;
const PANEL_ROWS: u16 = 9;

/// The tracked hand's 21 points scaled into a small box, with the intent
/// they classify as underneath.
fn draw_tracker<W: Write>(out: &mut W, view: &Viewport, tracker: &Tracker) -> std::io::Result<()> {
    if view.width < PANEL_COLS + 4 || view.height < PANEL_ROWS + 6 {
        return Ok(());
    }
    let left = view.width - PANEL_COLS - 2;
    let top = 2;
    let inner_w = PANEL_COLS - 2;
    let inner_h = PANEL_ROWS - 2;

    out.queue(style::SetForegroundColor(C_TRACKER))?;
    out.queue(cursor::MoveTo(left, top))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(inner_w as usize))))?;
    for r in 1..=inner_h {
        out.queue(cursor::MoveTo(left, top + r))?;
        out.queue(Print(format!("│{}│", " ".repeat(inner_w as usize))))?;
    }
    out.queue(cursor::MoveTo(left, top + PANEL_ROWS - 1))?;
    out.queue(Print(format!("└{}┘", "─".repeat(inner_w as usize))))?;

    match tracker.hand {
        Some(hand) => {
            out.queue(style::SetForegroundColor(C_LANDMARK))?;
            for p in hand.points() {
                let cx = (p.x.clamp(0.0, 1.0) * (inner_w - 1) as f32).round() as u16;
                let cy = (p.y.clamp(0.0, 1.0) * (inner_h - 1) as f32).round() as u16;
                out.queue(cursor::MoveTo(left + 1 + cx, top + 1 + cy))?;
                out.queue(Print("•"))?;
            }
        }
        None => {
            out.queue(cursor::MoveTo(left + 1 + (inner_w - 7) / 2, top + PANEL_ROWS / 2))?;
            out.queue(Print("no hand"))?;
        }
    }

    out.queue(style::SetForegroundColor(C_TRACKER))?;
    out.queue(cursor::MoveTo(left + 1, top + PANEL_ROWS))?;
    out.queue(Print(tracker.intent.as_str()))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_banner<W: Write>(
    out: &mut W,
    view: &Viewport,
    color: Color,
    lines: &[String],
) -> std::io::Result<()> {
    let cx = view.width / 2;
    let start_row = (view.height / 2).saturating_sub(lines.len() as u16 / 2);

    out.queue(style::SetForegroundColor(color))?;
    for (i, line) in lines.iter().enumerate() {
        let col = cx.saturating_sub(line.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(Print(line))?;
    }
    Ok(())
}

fn draw_game_over<W: Write>(out: &mut W, state: &GameState, view: &Viewport) -> std::io::Result<()> {
    let record_line = if state.new_record {
        format!("★ NEW RECORD: {} ★", state.high_score)
    } else {
        format!("SURVIVAL RECORD: {}", state.high_score)
    };
    draw_banner(
        out,
        view,
        Color::Red,
        &[
            "TERMINATION DETECTED".to_string(),
            format!("SCORE: {}", state.score),
            record_line,
            "HOLD 🤙 TO REBOOT".to_string(),
        ],
    )
}
