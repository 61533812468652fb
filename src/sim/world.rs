/// WorldState: the complete snapshot of a running game.
///
/// ## Ownership
///
/// The world owns the level's static grid plus every dynamic collection
/// (enemies, spells, effects, pickups, props) in arenas. Actors never hold
/// references into each other; the step function passes them the pieces
/// they need (grid, collider snapshot, player box) each tick.
///
/// ## Camera / Viewport
///
/// World coordinates and screen coordinates are separate:
///   - `camera`: viewport into the tile grid (top-left tile + size)
///   - Renderer maps: `screen(sx, sy) = tile(camera.x + sx, camera.y + sy)`
///   - Camera follows the player's tile with a dead-zone approach
///   - Maps smaller than the viewport are centered

use crate::domain::collision::Collider;
use crate::domain::enemy::Enemy;
use crate::domain::entity::{Effect, Exit, Flimsy, Pickup, Sign};
use crate::domain::geom::Aabb;
use crate::domain::grid::{tile_coord, TileGrid};
use crate::domain::player::Player;
use crate::domain::spell::SpellBullet;
use crate::sim::arena::Arena;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Playing,
    /// A book overlay is open; the simulation waits for confirm.
    Reading,
    GameComplete,
}

/// Camera: a viewport into the tile grid.
///
/// `(x, y)` is the tile coordinate of the top-left visible cell.
/// `(view_w, view_h)` is how many tiles fit in the viewport.
/// These are computed from terminal size and set during `render()`.
#[derive(Clone, Debug, Default)]
pub struct Camera {
    /// Tile X of the top-left visible cell (can be negative for centering)
    pub x: i32,
    /// Tile Y of the top-left visible cell
    pub y: i32,
    pub view_w: usize,
    pub view_h: usize,
}

impl Camera {
    pub fn new() -> Self {
        Camera::default()
    }

    /// Follow a target tile within the given world bounds (in tiles).
    /// Dead zone: the camera only scrolls when the target gets within 20%
    /// of a viewport edge.
    pub fn follow(&mut self, target_x: i32, target_y: i32, world_w: usize, world_h: usize) {
        if self.view_w == 0 || self.view_h == 0 { return; }
        self.x = follow_axis(self.x, target_x, self.view_w, world_w);
        self.y = follow_axis(self.y, target_y, self.view_h, world_h);
    }

    /// Snap camera directly to center on a tile (no dead zone).
    /// Used on level load / restart.
    pub fn center_on(&mut self, target_x: i32, target_y: i32, world_w: usize, world_h: usize) {
        if self.view_w == 0 || self.view_h == 0 { return; }
        self.x = center_axis(target_x, self.view_w, world_w);
        self.y = center_axis(target_y, self.view_h, world_h);
    }

    /// Convert a tile coordinate to a viewport coordinate.
    /// Returns None if outside the visible area.
    pub fn world_to_view(&self, tx: i32, ty: i32) -> Option<(usize, usize)> {
        let vx = tx - self.x;
        let vy = ty - self.y;
        if vx >= 0 && vx < self.view_w as i32 && vy >= 0 && vy < self.view_h as i32 {
            Some((vx as usize, vy as usize))
        } else {
            None
        }
    }
}

fn follow_axis(pos: i32, target: i32, view: usize, world: usize) -> i32 {
    let view = view as i32;
    let world = world as i32;
    // Map fits entirely: center it
    if world <= view {
        return -((view - world) / 2);
    }
    let margin = view / 5;
    let low = pos + margin;
    let high = pos + view - margin - 1;
    let pos = if target < low {
        target - margin
    } else if target > high {
        target - view + margin + 1
    } else {
        pos
    };
    pos.max(0).min((world - view).max(0))
}

fn center_axis(target: i32, view: usize, world: usize) -> i32 {
    let view = view as i32;
    let world = world as i32;
    if world <= view {
        return -((view - world) / 2);
    }
    (target - view / 2).max(0).min((world - view).max(0))
}

/// Spells the player has learned, carried across levels and deaths.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlayerProgress {
    pub spells: Vec<String>,
}

impl PlayerProgress {
    pub fn add_spell(&mut self, spell: &str) {
        if !self.spells.iter().any(|s| s == spell) {
            self.spells.push(spell.to_string());
        }
    }

    /// Give a fresh player every spell learned so far.
    pub fn hydrate(&self, player: &mut Player) {
        for spell in &self.spells {
            player.add_spell(spell);
        }
    }
}

/// Open book overlay.
#[derive(Clone, Debug, PartialEq)]
pub struct BookPage {
    pub title: String,
    pub spell: String,
    pub text: String,
}

pub struct WorldState {
    // ── Terrain ──
    pub grid: TileGrid,

    // ── Entities ──
    pub player: Player,
    pub enemies: Arena<Enemy>,
    pub spells: Arena<SpellBullet>,
    pub effects: Arena<Effect>,
    pub pickups: Arena<Pickup>,
    pub props: Arena<Flimsy>,
    pub signs: Vec<Sign>,
    pub exit: Option<Exit>,

    // ── Progress ──
    pub progress: PlayerProgress,
    pub kills: u32,
    /// Health cap, for the HUD bar.
    pub max_health: i32,

    // ── Meta ──
    pub phase: Phase,
    pub current_level: usize,
    pub total_levels: usize,
    pub level_name: String,
    pub tick: u64,
    /// Seconds of simulated time in the current level.
    pub elapsed: f64,

    // ── UI ──
    pub message: String,
    pub message_timer: f64,
    pub reading: Option<BookPage>,
    pub paused: bool,
    pub debug: bool,

    // ── Camera / Viewport ──
    pub camera: Camera,
}

impl WorldState {
    pub fn new() -> Self {
        WorldState {
            grid: TileGrid::default(),
            player: Player::new(0.0, 0.0, 1),
            enemies: Arena::new(),
            spells: Arena::new(),
            effects: Arena::new(),
            pickups: Arena::new(),
            props: Arena::new(),
            signs: vec![],
            exit: None,
            progress: PlayerProgress::default(),
            kills: 0,
            max_health: 0,
            phase: Phase::Playing,
            current_level: 0,
            total_levels: 0,
            level_name: String::new(),
            tick: 0,
            elapsed: 0.0,
            message: String::new(),
            message_timer: 0.0,
            reading: None,
            paused: false,
            debug: false,
            camera: Camera::new(),
        }
    }

    pub fn set_message(&mut self, msg: &str, seconds: f64) {
        self.message = msg.to_string();
        self.message_timer = seconds;
    }

    /// Boxes of every live breakable prop, the resolver's collider snapshot.
    pub fn collider_snapshot(&self) -> Vec<Aabb> {
        self.props.items().map(Collider::collision_box).collect()
    }

    /// Tile holding the player's centre.
    pub fn player_tile(&self) -> (i32, i32) {
        let b = self.player.collision_box();
        (tile_coord(b.center_x()), tile_coord(b.center_y()))
    }

    /// Visible sign popup, if the player is at one.
    pub fn active_sign(&self) -> Option<&Sign> {
        self.signs.iter().find(|s| s.is_visible())
    }

    /// Recenter the camera on the player (level load, respawn, resize).
    pub fn center_camera(&mut self) {
        let (tx, ty) = self.player_tile();
        let (w, h) = (self.grid.width(), self.grid.height());
        self.camera.center_on(tx, ty, w, h);
    }

    pub fn follow_camera(&mut self) {
        let (tx, ty) = self.player_tile();
        let (w, h) = (self.grid.width(), self.grid.height());
        self.camera.follow(tx, ty, w, h);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera(w: usize, h: usize) -> Camera {
        Camera { x: 0, y: 0, view_w: w, view_h: h }
    }

    #[test]
    fn small_map_is_centered() {
        let mut cam = camera(40, 20);
        cam.follow(3, 3, 20, 10);
        assert_eq!((cam.x, cam.y), (-10, -5));
    }

    #[test]
    fn dead_zone_holds_camera_still() {
        let mut cam = camera(20, 10);
        cam.follow(10, 5, 100, 50);
        assert_eq!((cam.x, cam.y), (0, 0));
    }

    #[test]
    fn camera_scrolls_past_dead_zone() {
        let mut cam = camera(20, 10);
        cam.follow(30, 5, 100, 50);
        // margin 4: target sits 4 tiles from the right edge
        assert_eq!(cam.x, 30 - 20 + 4 + 1);
        assert_eq!(cam.world_to_view(30, 5), Some((15, 5)));
    }

    #[test]
    fn camera_is_clamped_to_world() {
        let mut cam = camera(20, 10);
        cam.center_on(99, 49, 100, 50);
        assert_eq!((cam.x, cam.y), (80, 40));
        cam.center_on(0, 0, 100, 50);
        assert_eq!((cam.x, cam.y), (0, 0));
        assert_eq!(cam.world_to_view(-1, 0), None);
    }

    #[test]
    fn progress_hydrates_spells_in_order() {
        let mut progress = PlayerProgress::default();
        progress.add_spell("spark");
        progress.add_spell("frost");
        progress.add_spell("spark");
        let mut p = Player::new(0.0, 0.0, 6);
        progress.hydrate(&mut p);
        assert_eq!(p.spells().len(), 2);
        assert_eq!(p.current_spell(), Some("spark"));
    }
}
