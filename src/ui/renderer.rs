/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// This eliminates flicker caused by full-screen redraws.
///
/// Every tile is two terminal columns wide. Actors are drawn at the tile
/// holding the centre of their box; sub-tile motion is not shown.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::collision::Collider;
use crate::domain::geom::Aabb;
use crate::domain::grid::tile_coord;
use crate::error::ResourceError;
use crate::sim::world::{Camera, Phase, WorldState};
use super::glyphs::{self, Glyph, GlyphBook};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: [u8; 4],
    ch_len: u8,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit dark background for all "empty" terminal cells.
    ///
    /// On VTE-based terminals the inter-row gap pixels use the background
    /// from the last Clear. Using the SAME explicit RGB for the Clear and
    /// every cell's background keeps the gaps invisible.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Cell = Cell {
        ch: [b' ', 0, 0, 0],
        ch_len: 1,
        fg: Color::White,
        bg: Cell::BASE_BG,
    };

    /// Sentinel cell used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell {
        ch: [b'?', 0, 0, 0],
        ch_len: 1,
        fg: Color::Magenta,
        bg: Color::Magenta,
    };

    /// Normalize bg: Color::Reset → BASE_BG so that every cell gets an
    /// explicit background color (never terminal-default).
    #[inline]
    fn norm_bg(bg: Color) -> Color {
        match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        }
    }

    fn from_char(c: char, fg: Color, bg: Color) -> Self {
        let mut cell = Self::BLANK;
        let len = c.encode_utf8(&mut cell.ch).len() as u8;
        cell.ch_len = len;
        cell.fg = fg;
        cell.bg = Self::norm_bg(bg);
        cell
    }

    fn as_str(&self) -> &str {
        std::str::from_utf8(&self.ch[..self.ch_len as usize]).unwrap_or(" ")
    }

    #[cfg(test)]
    fn ch(&self) -> char {
        self.as_str().chars().next().unwrap_or(' ')
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![Cell::BLANK; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y) with given colors. Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (cx, ch) in (x..self.width).zip(s.chars()) {
            self.set(cx, y, Cell::from_char(ch, fg, bg));
        }
    }

    fn fill_row(&mut self, y: usize, bg: Color) {
        for x in 0..self.width {
            self.set(x, y, Cell::from_char(' ', Color::White, bg));
        }
    }

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, bg: Color) {
        for row in y..y + h {
            for col in x..x + w {
                self.set(col, row, Cell::from_char(' ', Color::White, bg));
            }
        }
    }

    /// Overlay a sprite onto a tile cell. Blank columns and a transparent
    /// background leave what is underneath visible.
    fn put_glyph(&mut self, col: usize, row: usize, glyph: Glyph) {
        for (i, ch) in glyph.chars.into_iter().enumerate() {
            if ch == ' ' { continue; }
            let under = self.get(col + i, row);
            let bg = match glyph.bg {
                Color::Reset => under.bg,
                other => other,
            };
            self.set(col + i, row, Cell::from_char(ch, glyph.fg, bg));
        }
    }

    #[cfg(test)]
    fn row_text(&self, y: usize) -> String {
        (0..self.width).map(|x| self.get(x, y).ch()).collect()
    }
}

/// Greedy word wrap. Words longer than `width` are split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        let line_len = line.chars().count();
        if line_len > 0 && line_len + 1 + word.len() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.extend(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Blend `to` over `from` by `alpha`; non-RGB colors snap at half way.
fn fade(from: Color, to: Color, alpha: f64) -> Color {
    let a = alpha.clamp(0.0, 1.0);
    match (from, to) {
        (Color::Rgb { r: r0, g: g0, b: b0 }, Color::Rgb { r: r1, g: g1, b: b1 }) => {
            let mix = |c0: u8, c1: u8| (c0 as f64 + (c1 as f64 - c0 as f64) * a).round() as u8;
            Color::Rgb { r: mix(r0, r1), g: mix(g0, g1), b: mix(b0, b1) }
        }
        _ if a >= 0.5 => to,
        _ => from,
    }
}

// ── Renderer ──

/// Each game cell = 2 terminal columns.
const CELL_W: usize = 2;

/// Vertical offsets
const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;

const HUD_BG: Color = Color::Rgb { r: 20, g: 20, b: 60 };
const MSG_BG: Color = Color::Rgb { r: 200, g: 180, b: 50 };
const PANEL_BG: Color = Color::Rgb { r: 40, g: 40, b: 40 };
const GOLD: Color = Color::Rgb { r: 255, g: 220, b: 50 };
const GREEN: Color = Color::Rgb { r: 80, g: 255, b: 80 };
const SIGN_FG: Color = Color::Rgb { r: 235, g: 225, b: 200 };
const SIGN_BG: Color = Color::Rgb { r: 60, g: 45, b: 30 };

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_phase: Option<Phase>,
    glyphs: GlyphBook,
    /// Keyboard enhancement pushed; popped again on cleanup.
    key_release: bool,
}

impl Renderer {
    pub fn new(glyphs: GlyphBook) -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_phase: None,
            glyphs,
            key_release: false,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.resize(tw as usize, th as usize);
        Ok(())
    }

    /// Ask the terminal to report key releases. Returns whether it will.
    pub fn enable_key_release(&mut self) -> bool {
        if !matches!(terminal::supports_keyboard_enhancement(), Ok(true)) {
            tracing::info!("terminal reports no key releases, using hold timeout");
            return false;
        }
        let flags = KeyboardEnhancementFlags::REPORT_EVENT_TYPES;
        self.key_release = execute!(self.writer, PushKeyboardEnhancementFlags(flags)).is_ok();
        self.key_release
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        if self.key_release {
            execute!(self.writer, PopKeyboardEnhancementFlags)?;
        }
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    fn resize(&mut self, w: usize, h: usize) {
        self.term_w = w;
        self.term_h = h;
        self.front.resize(w, h);
        self.back.resize(w, h);
        // Force full repaint: back ≠ front for every cell.
        self.back.cells.fill(Cell::INVALID);
    }

    pub fn render(&mut self, world: &mut WorldState) -> anyhow::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.resize(tw as usize, th as usize);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        // Phase change → clear for a clean transition
        if self.last_phase != Some(world.phase) {
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
            self.last_phase = Some(world.phase);
        }

        self.compose(world)?;
        self.flush_diff()?;

        // Swap: current front becomes next back
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    /// Size the camera to the terminal. A changed viewport recenters on
    /// the player; otherwise the step's dead-zone follow stands.
    fn update_viewport(&self, world: &mut WorldState) {
        let reserved_rows = MAP_ROW + 4; // HUD + gap + msg + help
        let max_view_h = self.term_h.saturating_sub(reserved_rows).max(1);
        let view_w = (self.term_w / CELL_W).min(world.grid.width().max(1));
        let view_h = max_view_h.min(world.grid.height().max(1));

        if world.camera.view_w != view_w || world.camera.view_h != view_h {
            world.camera.view_w = view_w;
            world.camera.view_h = view_h;
            world.center_camera();
        }
    }

    /// Build the whole frame into the front buffer.
    fn compose(&mut self, world: &mut WorldState) -> Result<(), ResourceError> {
        self.update_viewport(world);
        self.front.clear();

        match world.phase {
            Phase::GameComplete => self.compose_game_complete(world),
            Phase::Playing | Phase::Reading => {
                self.compose_game(world)?;
                if let Some(page) = &world.reading {
                    self.compose_book(&page.title, &page.spell, &page.text, &world.camera);
                }
            }
        }

        // Pause overlay (drawn on top of game)
        if world.paused && world.phase == Phase::Playing {
            self.compose_pause_overlay(world);
        }
        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Explicit base colors; ResetColor would fall back to the terminal
        // default, which may differ from BASE_BG.
        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.as_str()))?;
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose_game(&mut self, w: &WorldState) -> Result<(), ResourceError> {
        self.compose_hud(w)?;
        self.compose_map(w)?;
        self.compose_actors(w)?;
        if let Some(sign) = w.active_sign() {
            self.compose_sign(w, sign.collision_box(), &sign.text, sign.alpha());
        }

        let cam = &w.camera;

        // ── Message bar ──
        let msg_row = MAP_ROW + cam.view_h + 1;
        if msg_row < self.front.height && !w.message.is_empty() {
            let msg = format!(" ◈ {} ", w.message);
            self.front.fill_row(msg_row, MSG_BG);
            self.front.put_str(0, msg_row, &msg, Color::Black, MSG_BG);
        }

        // ── Help / debug bar ──
        let help_row = MAP_ROW + cam.view_h + 3;
        if help_row < self.front.height {
            if w.debug {
                let k = &w.player.kin;
                let c = w.player.contacts();
                let flag = |on: bool, s: &'static str| if on { s } else { "-" };
                let line = format!(
                    " pos ({:7.2},{:7.2})  vel ({:7.2},{:7.2})  [{} {} {}]{}  tick {}",
                    k.x, k.y, k.vx, k.vy,
                    flag(c.hit_floor, "floor"),
                    flag(c.hit_ceiling, "ceil"),
                    flag(c.hit_wall, "wall"),
                    if k.locked_to_ladder { " ladder" } else { "" },
                    w.tick,
                );
                self.front.put_str(0, help_row, &line, Color::Cyan, Color::Reset);
            } else {
                let help = " ←→↑↓/WASD Move  Space/K Jump  J/X Cast  Tab Spell  F1 Pause  F2 Restart  Esc Quit";
                self.front.put_str(0, help_row, help, Color::DarkGrey, Color::Reset);
            }
        }
        Ok(())
    }

    fn compose_hud(&mut self, w: &WorldState) -> Result<(), ResourceError> {
        self.front.fill_row(HUD_ROW, HUD_BG);

        // Health bar: one heart per point of max health
        let full = self.glyphs.get("hud.heart")?;
        let empty = self.glyphs.get("hud.heart_empty")?;
        let max = w.max_health.max(w.player.health).max(0) as usize;
        let mut col = 1;
        for i in 0..max {
            let g = if (i as i32) < w.player.health { full } else { empty };
            self.front.set(col, HUD_ROW, Cell::from_char(g.chars[0], g.fg, HUD_BG));
            col += 1;
        }

        col += 2;
        let spell_icon = self.glyphs.get("hud.spell")?;
        self.front.set(col, HUD_ROW, Cell::from_char(spell_icon.chars[0], spell_icon.fg, HUD_BG));
        let spell = w.player.current_spell().unwrap_or("none");
        let known = w.player.spells().len();
        let spell_text = if known > 1 {
            format!(" {spell} ({known})")
        } else {
            format!(" {spell}")
        };
        self.front.put_str(col + 1, HUD_ROW, &spell_text, Color::White, HUD_BG);
        col += 2 + spell_text.chars().count() + 2;

        let level = format!(
            "│ {}/{} {}  │ Kills {}  │ {:.0}s",
            w.current_level + 1, w.total_levels, w.level_name, w.kills, w.elapsed,
        );
        self.front.put_str(col, HUD_ROW, &level, Color::White, HUD_BG);
        Ok(())
    }

    /// Tiles through the camera; out-of-world cells are void.
    fn compose_map(&mut self, w: &WorldState) -> Result<(), ResourceError> {
        let cam = &w.camera;
        let (gw, gh) = (w.grid.width() as i32, w.grid.height() as i32);
        for vy in 0..cam.view_h {
            let row = MAP_ROW + vy;
            if row >= self.front.height { break; }
            let wy = cam.y + vy as i32;

            for vx in 0..cam.view_w {
                let col = vx * CELL_W;
                if col + 1 >= self.front.width { break; }
                let wx = cam.x + vx as i32;
                if wx < 0 || wy < 0 || wx >= gw || wy >= gh {
                    continue; // void: stays BLANK
                }
                let g = self.glyphs.get(glyphs::tile_sprite(w.grid.tile(wx, wy)))?;
                self.front.set(col, row, Cell::from_char(g.chars[0], g.fg, g.bg));
                self.front.set(col + 1, row, Cell::from_char(g.chars[1], g.fg, g.bg));
            }
        }
        Ok(())
    }

    /// Screen cell of the tile holding world point `(px, py)`.
    fn screen_cell(&self, w: &WorldState, px: f64, py: f64) -> Option<(usize, usize)> {
        let (vx, vy) = w.camera.world_to_view(tile_coord(px), tile_coord(py))?;
        let (col, row) = (vx * CELL_W, MAP_ROW + vy);
        (col + 1 < self.front.width && row < self.front.height).then_some((col, row))
    }

    fn draw_at(&mut self, w: &WorldState, px: f64, py: f64, glyph: Glyph) {
        if let Some((col, row)) = self.screen_cell(w, px, py) {
            self.front.put_glyph(col, row, glyph);
        }
    }

    fn draw_box(&mut self, w: &WorldState, b: Aabb, glyph: Glyph) {
        self.draw_at(w, b.center_x(), b.center_y(), glyph);
    }

    /// Back to front: exit, signs, props, pickups, enemies, spells, effects, player.
    fn compose_actors(&mut self, w: &WorldState) -> Result<(), ResourceError> {
        if let Some(exit) = &w.exit {
            let g = self.glyphs.get(glyphs::EXIT)?;
            let b = exit.collision_box();
            let half = b.h / 4.0;
            self.draw_at(w, b.center_x(), b.y + half, g);
            self.draw_at(w, b.center_x(), b.bottom() - half, g);
        }

        let sign = self.glyphs.get(glyphs::SIGN)?;
        for s in &w.signs {
            self.draw_box(w, s.collision_box(), sign);
        }

        let prop = self.glyphs.get(glyphs::PROP)?;
        for p in w.props.items() {
            self.draw_box(w, p.collision_box(), prop);
        }

        for p in w.pickups.items() {
            let g = self.glyphs.get(glyphs::pickup_sprite(&p.kind))?;
            self.draw_box(w, p.collision_box(), g);
        }

        for e in w.enemies.items() {
            let g = self.glyphs.get(glyphs::enemy_sprite(e))?;
            self.draw_box(w, e.collision_box(), g);
        }

        let spell = self.glyphs.get(glyphs::SPELL)?;
        for s in w.spells.items() {
            let (cx, cy) = s.center();
            self.draw_at(w, cx, cy, spell);
        }

        for fx in w.effects.items() {
            let g = self.glyphs.get(glyphs::effect_sprite(fx.kind))?;
            // Fade toward the background over the effect's life.
            let g = Glyph { fg: fade(g.fg, Cell::BASE_BG, fx.progress()), ..g };
            self.draw_at(w, fx.x, fx.y, g);
        }

        let player = self.glyphs.facing(glyphs::player_sprite(w.player.anim()), w.player.facing)?;
        // Blink while invulnerable
        let blink = w.player.is_invulnerable() && !w.player.is_dying() && (w.tick / 4) % 2 == 1;
        if !blink {
            self.draw_box(w, w.player.collision_box(), player);
        }
        Ok(())
    }

    /// Sign popup above the sign, faded by `alpha`.
    fn compose_sign(&mut self, w: &WorldState, at: Aabb, text: &str, alpha: f64) {
        let Some((col, row)) = self.screen_cell(w, at.center_x(), at.center_y()) else { return };
        let view_cols = w.camera.view_w * CELL_W;
        let lines = wrap(text, 28.min(view_cols.saturating_sub(4)).max(8));
        let box_w = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) + 2;
        let box_h = lines.len();

        let top = row.saturating_sub(box_h + 1).max(MAP_ROW);
        let left = (col + 1).saturating_sub(box_w / 2).min(view_cols.saturating_sub(box_w));
        let fg = fade(Cell::BASE_BG, SIGN_FG, alpha);
        let bg = fade(Cell::BASE_BG, SIGN_BG, alpha);

        self.front.fill_rect(left, top, box_w, box_h, bg);
        for (i, line) in lines.iter().enumerate() {
            self.front.put_str(left + 1, top + i, line, fg, bg);
        }
    }

    fn compose_book(&mut self, title: &str, spell: &str, text: &str, cam: &Camera) {
        let view_cols = (cam.view_w * CELL_W).max(24);
        let box_w = 44_usize.min(view_cols);
        let inner = box_w.saturating_sub(4);
        let body = wrap(text, inner);
        let box_h = body.len() + 7;
        let box_x = view_cols.saturating_sub(box_w) / 2;
        let box_y = MAP_ROW + cam.view_h.saturating_sub(box_h) / 2;

        self.front.fill_rect(box_x, box_y, box_w, box_h, PANEL_BG);
        self.front.put_str(box_x + 2, box_y + 1, title, GOLD, PANEL_BG);
        let learned = format!("Learned spell: {spell}");
        self.front.put_str(box_x + 2, box_y + 2, &learned, Color::Rgb { r: 190, g: 120, b: 255 }, PANEL_BG);
        for (i, line) in body.iter().enumerate() {
            self.front.put_str(box_x + 2, box_y + 4 + i, line, Color::White, PANEL_BG);
        }
        self.front.put_str(box_x + 2, box_y + box_h - 2, "▸ ENTER: Close", GREEN, PANEL_BG);
    }

    fn compose_game_complete(&mut self, w: &WorldState) {
        let box_art = [
            "╔══════════════════════════════════╗",
            "║   ★ THE LAST DOOR IS OPENED ★    ║",
            "╚══════════════════════════════════╝",
        ];
        for (i, l) in box_art.iter().enumerate() {
            self.front.put_str(4, 4 + i, l, GOLD, Color::Reset);
        }
        let levels = format!("◈ All {} levels cleared!", w.total_levels);
        let kills = format!("◈ Enemies defeated: {}", w.kills);
        let spells = format!("◈ Spells learned: {}", w.progress.spells.len());
        self.front.put_str(6, 9, &levels, GREEN, Color::Reset);
        self.front.put_str(6, 10, &kills, Color::White, Color::Reset);
        self.front.put_str(6, 11, &spells, Color::White, Color::Reset);
        self.front.put_str(6, 13, "▸ ENTER / ESC: Quit", GREEN, Color::Reset);
    }

    fn compose_pause_overlay(&mut self, w: &WorldState) {
        let blink = (w.tick / 8) % 2 == 0;
        let cam = &w.camera;

        // Center the overlay in the viewport
        let view_cols = cam.view_w * CELL_W;
        let box_w = 28_usize;
        let box_h = 9_usize;
        let box_x = view_cols.saturating_sub(box_w) / 2;
        let box_y = MAP_ROW + cam.view_h.saturating_sub(box_h) / 2;

        self.front.fill_rect(box_x, box_y, box_w, box_h, PANEL_BG);

        let key_c = Color::Rgb { r: 100, g: 200, b: 255 };
        let label = if blink { "▶  PAUSED  ◀" } else { "   PAUSED   " };
        self.front.put_str(box_x + 8, box_y + 1, label, GOLD, PANEL_BG);

        let y0 = box_y + 3;
        self.front.put_str(box_x + 2, y0, "F1   Resume", key_c, PANEL_BG);
        self.front.put_str(box_x + 2, y0 + 1, "F2   Restart Level", key_c, PANEL_BG);
        self.front.put_str(box_x + 2, y0 + 2, "F3   Debug Info", key_c, PANEL_BG);
        self.front.put_str(box_x + 2, y0 + 4, "ESC  Quit", key_c, PANEL_BG);
    }
}
