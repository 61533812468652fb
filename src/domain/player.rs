/// Player kinematic controller.
///
/// ## Tick order
///
///   1. Input → intent (target run speed, climb direction, jump edges).
///   2. Gravity integration. Rise and fall use different curves: gravity is
///      `-(2·jump_height)/t²` with `t = jump_time` during the rise window and
///      `t = fall_time` after it, so falls are snappier than rises.
///   3. Collision resolve (drop-through while "down" is held).
///   4. Ladder grab / climb, re-sampling the grid at the old position.
///   5. Damage tile probe at the feet.
///   6. Jump: fresh or buffered press + (floor | coyote | ladder).
///   7. Variable height cut on early release (one-shot per jump).
///   8. Contact bookkeeping, horizontal easing, hurt timers, casting.
///
/// ## Sign convention
///
/// World y grows downward, but `vy` is positive UPWARD: the position moves
/// by `-Δy` each tick. Launch speed is `+2·jump_height/jump_time`.
///
/// ## Ladder lock
///
/// While locked to a ladder gravity displacement is suspended and `vy` is
/// held at zero. A floor contact always clears the lock, so `locked` and
/// `hit_floor` are never both set at the end of a tick.

use crate::config::{PhysicsConfig, PlayerConfig};

use super::collision::{resolve, CollisionOutcome, Motion, EPSILON};
use super::entity::{Facing, FrameInput};
use super::geom::Aabb;
use super::grid::{tile_coord, tile_origin, TileQuery, TILE_SIZE};

pub const PLAYER_WIDTH: f64 = 10.0;
pub const PLAYER_HEIGHT: f64 = 14.0;

/// How far below the feet the ladder probe looks.
const LADDER_PROBE: f64 = 1.0;
/// Damage probe height above the feet.
const DAMAGE_PROBE: f64 = 4.0;
/// Downward speed after bumping a ceiling.
const CEILING_BOUNCE: f64 = -20.0;
/// Below this horizontal speed the player counts as standing still.
const RUN_THRESHOLD: f64 = 1.0;

pub const SPELL_SPEED: f64 = 200.0;

/// Motion state shared with the debug overlay.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct KinematicState {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub coyote_timer: f64,
    pub jump_timer: f64,
    pub late_jump_timer: f64,
    pub locked_to_ladder: bool,
    pub already_aborted_jump: bool,
    pub was_pressing_jump: bool,
}

/// Presentation state, derived every tick.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Anim {
    Idle,
    Run,
    Jump,
    Fall,
    Climb,
    Crouch,
    Hurt,
    Death,
}

#[derive(Clone, Copy, PartialEq, Debug)]
enum Life {
    Alive,
    Dying { timer: f64 },
}

/// Result of a damage request.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DamageOutcome {
    /// Invulnerable (hurt or in post-hurt grace) or already dying.
    Ignored,
    Hurt,
    Killed,
}

/// A spell launch: bullet centre and world-space velocity (y down).
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct CastRequest {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
}

/// Per-tick intent derived from `FrameInput`.
#[derive(Clone, Copy, Debug, Default)]
struct Intent {
    target_vx: f64,
    climb: f64,
    drop_through: bool,
    try_jump: bool,
    press_jump: bool,
}

#[derive(Clone, Debug)]
pub struct Player {
    pub kin: KinematicState,
    pub facing: Facing,
    pub health: i32,
    spells: Vec<String>,
    current_spell: Option<usize>,
    intent: Intent,
    contacts: CollisionOutcome,
    crouching: bool,
    aim_y: f64,
    take_damage_timer: f64,
    post_damage_timer: f64,
    cast_timer: f64,
    life: Life,
}

impl Player {
    /// New player whose collision box has its top-left at `(x, y)`.
    pub fn new(x: f64, y: f64, health: i32) -> Self {
        Player {
            kin: KinematicState { x, y, ..KinematicState::default() },
            facing: Facing::Right,
            health,
            spells: Vec::new(),
            current_spell: None,
            intent: Intent::default(),
            contacts: CollisionOutcome::default(),
            crouching: false,
            aim_y: 0.0,
            take_damage_timer: 0.0,
            post_damage_timer: 0.0,
            cast_timer: 0.0,
            life: Life::Alive,
        }
    }

    /// Stand the player on the floor of spawn tile `(tx, ty)`.
    pub fn at_spawn(tx: i32, ty: i32, health: i32) -> Self {
        let x = tile_origin(tx) + (TILE_SIZE - PLAYER_WIDTH) / 2.0;
        let y = tile_origin(ty) + TILE_SIZE - PLAYER_HEIGHT - EPSILON;
        Player::new(x, y, health)
    }

    pub fn collision_box(&self) -> Aabb {
        Aabb::new(self.kin.x, self.kin.y, PLAYER_WIDTH, PLAYER_HEIGHT)
    }

    /// Contact flags from the last resolve.
    pub fn contacts(&self) -> CollisionOutcome {
        self.contacts
    }

    pub fn is_dying(&self) -> bool {
        matches!(self.life, Life::Dying { .. })
    }

    /// The death animation has finished; the level should restart.
    pub fn respawn_due(&self) -> bool {
        matches!(self.life, Life::Dying { timer } if timer < 0.0)
    }

    pub fn is_hurt(&self) -> bool {
        self.take_damage_timer > 0.0
    }

    /// Hurt or in the grace period after it.
    pub fn is_invulnerable(&self) -> bool {
        self.take_damage_timer > 0.0 || self.post_damage_timer > 0.0
    }

    pub fn spells(&self) -> &[String] {
        &self.spells
    }

    pub fn current_spell(&self) -> Option<&str> {
        self.current_spell.and_then(|i| self.spells.get(i)).map(String::as_str)
    }

    /// Learn a spell. The first one learned becomes current.
    /// Returns false if it was already known.
    pub fn add_spell(&mut self, name: &str) -> bool {
        if self.spells.iter().any(|s| s == name) {
            return false;
        }
        self.spells.push(name.to_string());
        if self.current_spell.is_none() {
            self.current_spell = Some(self.spells.len() - 1);
        }
        true
    }

    /// Cycle to the next known spell.
    pub fn next_spell(&mut self) {
        if let Some(i) = self.current_spell {
            self.current_spell = Some((i + 1) % self.spells.len());
        }
    }

    /// Restore health, capped at `max_health`. Returns false when already full.
    pub fn add_health(&mut self, amount: i32, max_health: i32) -> bool {
        if self.health >= max_health {
            return false;
        }
        self.health = (self.health + amount).min(max_health);
        true
    }

    pub fn anim(&self) -> Anim {
        if self.is_dying() {
            Anim::Death
        } else if self.is_hurt() {
            Anim::Hurt
        } else if self.kin.locked_to_ladder {
            Anim::Climb
        } else if !self.contacts.hit_floor {
            if self.kin.vy > 0.0 { Anim::Jump } else { Anim::Fall }
        } else if self.crouching {
            Anim::Crouch
        } else if self.kin.vx.abs() > RUN_THRESHOLD {
            Anim::Run
        } else {
            Anim::Idle
        }
    }

    // ── Damage ──

    /// Apply one point of damage. A surviving player is knocked upward.
    pub fn take_damage(&mut self, phys: &PhysicsConfig, cfg: &PlayerConfig) -> DamageOutcome {
        if self.is_dying() || self.is_invulnerable() {
            return DamageOutcome::Ignored;
        }
        self.health -= 1;
        if self.health > 0 {
            self.take_damage_timer = cfg.take_damage_time;
            self.kin.already_aborted_jump = true;
            self.kin.locked_to_ladder = false;
            self.kin.vy = phys.launch_speed(phys.forced_jump_height);
            DamageOutcome::Hurt
        } else {
            self.health = 0;
            self.kin.vx = 0.0;
            self.kin.vy = 0.0;
            self.life = Life::Dying { timer: cfg.death_time };
            DamageOutcome::Killed
        }
    }

    // ── Update ──

    /// Advance one tick. Returns a spell launch when a cast fires.
    pub fn update<G: TileQuery + ?Sized>(
        &mut self,
        dt: f64,
        input: &FrameInput,
        grid: &G,
        colliders: &[Aabb],
        phys: &PhysicsConfig,
        cfg: &PlayerConfig,
    ) -> Option<CastRequest> {
        if let Life::Dying { timer } = &mut self.life {
            *timer -= dt;
            return None;
        }

        self.read_input(input, phys);
        let intent = self.intent;

        self.kin.late_jump_timer -= dt;
        let t = if self.kin.jump_timer > phys.jump_time { phys.fall_time } else { phys.jump_time };
        let gravity = -(2.0 * phys.jump_height) / (t * t);

        let old = self.collision_box();
        let new_x = old.x + dt * self.kin.vx;
        let mut new_y = old.y;
        if !self.kin.locked_to_ladder {
            let move_y = self.kin.vy * dt + 0.5 * gravity * dt * dt;
            new_y = old.y - move_y;
        }
        self.kin.vy += gravity * dt;

        let outcome = resolve(&Motion::new(old, new_x, new_y), grid, colliders, intent.drop_through);
        self.kin.x = outcome.x;
        self.kin.y = outcome.y;
        self.contacts = outcome;

        if outcome.hit_floor {
            self.kin.vy = 0.0;
            self.kin.coyote_timer = phys.coyote_time;
        }

        self.climb_ladder(dt, &old, grid, phys);

        let hit_damage = grid.sample_at(old.center_x(), old.bottom() - DAMAGE_PROBE).damage;

        // ── Jump ──
        let k = &mut self.kin;
        if (intent.try_jump || k.late_jump_timer > 0.0)
            && (outcome.hit_floor || k.coyote_timer > 0.0 || k.locked_to_ladder)
        {
            k.locked_to_ladder = false;
            k.coyote_timer = 0.0;
            k.late_jump_timer = 0.0;
            k.vy = phys.launch_speed(phys.jump_height);
            k.jump_timer = 0.0;
            k.already_aborted_jump = false;
        }

        if !intent.press_jump
            && k.jump_timer < phys.jump_time / 2.0
            && k.was_pressing_jump
            && !k.already_aborted_jump
        {
            k.already_aborted_jump = true;
            k.vy = k.vy.min(phys.launch_speed(phys.min_jump_height));
        }

        k.jump_timer += dt;
        if k.coyote_timer > 0.0 {
            k.coyote_timer -= dt;
        }
        if outcome.hit_floor {
            k.locked_to_ladder = false;
        }
        if k.locked_to_ladder {
            k.vy = 0.0;
            k.already_aborted_jump = false;
        }
        if outcome.hit_ceiling {
            k.already_aborted_jump = true;
            k.vy = CEILING_BOUNCE;
        }
        k.was_pressing_jump = intent.press_jump;

        if outcome.hit_wall {
            k.vx = 0.0;
            self.intent.target_vx = 0.0;
        }

        self.aim_y = if (intent.climb > 0.0 && !outcome.hit_floor) || intent.climb < 0.0 {
            intent.climb
        } else {
            0.0
        };
        self.crouching = input.down && outcome.hit_floor && !self.kin.locked_to_ladder;

        self.ease_run(phys);

        if hit_damage {
            self.take_damage(phys, cfg);
        }
        self.tick_hurt(dt, cfg);

        self.cast_timer -= dt;
        if input.cast_pressed && self.cast_timer <= 0.0 && self.current_spell().is_some() && !self.is_dying() {
            self.cast_timer = cfg.cast_cooldown;
            return Some(self.launch());
        }
        None
    }

    fn read_input(&mut self, input: &FrameInput, phys: &PhysicsConfig) {
        let mut target = 0.0;
        if input.left {
            target -= phys.max_run_speed;
            self.facing = Facing::Left;
        }
        if input.right {
            target += phys.max_run_speed;
            self.facing = Facing::Right;
        }
        if self.kin.locked_to_ladder {
            target /= 2.0;
        }
        if self.is_hurt() {
            target = 0.0;
        }

        self.intent = Intent {
            target_vx: target,
            climb: input.climb(),
            drop_through: input.down,
            try_jump: input.jump_pressed,
            press_jump: input.jump_held || input.jump_pressed,
        };
        if input.jump_pressed {
            self.kin.late_jump_timer = phys.late_jump_margin;
        }
    }

    /// Grab, climb or release a ladder. Samples at the pre-move position.
    fn climb_ladder<G: TileQuery + ?Sized>(&mut self, dt: f64, old: &Aabb, grid: &G, phys: &PhysicsConfig) {
        let cx = old.center_x();
        let top = grid.sample_at(cx, old.y);
        let below = grid.sample_at(cx, old.bottom() + LADDER_PROBE);
        if !top.ladder && !below.ladder {
            self.kin.locked_to_ladder = false;
            return;
        }

        let climb = self.intent.climb;
        if climb == 0.0 {
            return;
        }
        let middle = tile_origin(tile_coord(cx)) + TILE_SIZE / 2.0;
        if (cx - middle).abs() >= phys.ladder_grab_allowance {
            return;
        }

        self.kin.locked_to_ladder = true;
        let new_y = old.y + dt * phys.ladder_speed * climb;
        let blocked = if climb > 0.0 {
            grid.sample_at(cx, new_y + old.h + LADDER_PROBE).block
        } else {
            grid.sample_at(cx, new_y).block
        };
        if blocked {
            // Keep the gravity-resolved position so the feet settle on the floor.
            self.kin.locked_to_ladder = false;
            return;
        }
        self.kin.y = new_y;
    }

    fn ease_run(&mut self, phys: &PhysicsConfig) {
        let target = self.intent.target_vx;
        let k = &mut self.kin;
        if k.vx < target {
            k.vx = (k.vx + phys.run_acc).min(target);
        } else if k.vx > target {
            k.vx = (k.vx - phys.run_acc).max(target);
        }
    }

    fn tick_hurt(&mut self, dt: f64, cfg: &PlayerConfig) {
        if self.take_damage_timer > 0.0 {
            self.take_damage_timer -= dt;
            if self.take_damage_timer <= 0.0 {
                self.post_damage_timer = cfg.post_damage_time;
            }
        } else if self.post_damage_timer > 0.0 {
            self.post_damage_timer -= dt;
        }
    }

    fn launch(&self) -> CastRequest {
        let b = self.collision_box();
        if self.aim_y < 0.0 {
            CastRequest { x: b.center_x(), y: b.y - 4.0, vx: 0.0, vy: -SPELL_SPEED }
        } else if self.aim_y > 0.0 {
            CastRequest { x: b.center_x(), y: b.bottom() + 4.0, vx: 0.0, vy: SPELL_SPEED }
        } else {
            let dir = self.facing.sign();
            let y = if self.crouching { b.center_y() + 3.0 } else { b.center_y() - 2.0 };
            CastRequest { x: b.center_x() + dir * 8.0, y, vx: dir * SPELL_SPEED, vy: 0.0 }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid::{grid_from, TileGrid};

    const DT: f64 = 1.0 / 60.0;

    fn cfgs() -> (PhysicsConfig, PlayerConfig) {
        (PhysicsConfig::default(), PlayerConfig::default())
    }

    fn tick(p: &mut Player, grid: &TileGrid, input: FrameInput) -> Option<CastRequest> {
        let (phys, cfg) = cfgs();
        p.update(DT, &input, grid, &[], &phys, &cfg)
    }

    fn idle() -> FrameInput {
        FrameInput::default()
    }

    fn press_jump() -> FrameInput {
        FrameInput { jump_pressed: true, jump_held: true, ..FrameInput::default() }
    }

    fn hold_jump() -> FrameInput {
        FrameInput { jump_held: true, ..FrameInput::default() }
    }

    fn flat() -> TileGrid {
        grid_from(&[
            "..........",
            "..........",
            "..........",
            "..........",
            "..........",
            "##########",
        ])
    }

    /// Player standing on row 4 of `flat()`.
    fn grounded(grid: &TileGrid) -> Player {
        let mut p = Player::at_spawn(3, 4, 6);
        tick(&mut p, grid, idle());
        assert!(p.contacts().hit_floor);
        p
    }

    #[test]
    fn idle_player_stays_put() {
        let grid = flat();
        let mut p = grounded(&grid);
        let before = p.kin;
        for _ in 0..120 {
            tick(&mut p, &grid, idle());
            assert!(p.contacts().hit_floor);
            assert_eq!(p.kin.vy, 0.0);
        }
        assert_eq!(p.kin.x, before.x);
        assert_eq!(p.kin.y, before.y);
        assert_eq!(p.kin.vx, 0.0);
        assert_eq!(p.kin.vy, 0.0);
        assert_eq!(p.anim(), Anim::Idle);
    }

    #[test]
    fn jump_launches_upward() {
        let grid = flat();
        let mut p = grounded(&grid);
        let y0 = p.kin.y;
        tick(&mut p, &grid, press_jump());
        let phys = PhysicsConfig::default();
        assert!((p.kin.vy - phys.launch_speed(phys.jump_height)).abs() < 1e-9);
        tick(&mut p, &grid, hold_jump());
        assert!(p.kin.y < y0, "positive vy moves the player up the screen");
        assert_eq!(p.anim(), Anim::Jump);
    }

    #[test]
    fn coyote_time_allows_late_jump() {
        let grid = grid_from(&["........", "........", "........", "###....."]);
        let mut p = Player::at_spawn(1, 2, 6);
        tick(&mut p, &grid, idle());
        assert!(p.contacts().hit_floor);

        // Step off the ledge: teleport over the pit.
        p.kin.x = 70.0;
        for _ in 0..5 {
            tick(&mut p, &grid, idle());
            assert!(!p.contacts().hit_floor);
        }
        tick(&mut p, &grid, press_jump());
        assert!(p.kin.vy > 0.0, "jump within the coyote window");
    }

    #[test]
    fn coyote_window_expires() {
        let grid = grid_from(&["........", "........", "........", "###....."]);
        let mut p = Player::at_spawn(1, 2, 6);
        tick(&mut p, &grid, idle());
        p.kin.x = 70.0;
        for _ in 0..10 {
            tick(&mut p, &grid, idle());
        }
        tick(&mut p, &grid, press_jump());
        assert!(p.kin.vy < 0.0, "too late: still falling");
    }

    #[test]
    fn buffered_jump_fires_on_landing() {
        let grid = flat();
        let floor_top = 5.0 * TILE_SIZE;
        let mut p = Player::new(30.0, floor_top - PLAYER_HEIGHT - 2.0, 6);
        tick(&mut p, &grid, press_jump());
        assert!(p.kin.vy <= 0.0, "airborne press does not jump");

        let mut jumped = false;
        for _ in 0..10 {
            tick(&mut p, &grid, hold_jump());
            if p.kin.vy > 0.0 {
                jumped = true;
                break;
            }
        }
        assert!(jumped, "press buffered before landing jumps on contact");
    }

    #[test]
    fn stale_buffer_does_not_jump() {
        let grid = flat();
        let floor_top = 5.0 * TILE_SIZE;
        let mut p = Player::new(30.0, floor_top - PLAYER_HEIGHT - 30.0, 6);
        tick(&mut p, &grid, press_jump());
        for _ in 0..60 {
            tick(&mut p, &grid, idle());
            assert!(p.kin.vy <= 0.0);
        }
        assert!(p.contacts().hit_floor);
    }

    fn apex(hold_ticks: usize) -> f64 {
        let grid = flat();
        let mut p = grounded(&grid);
        let start = p.kin.y;
        let mut top = start;
        tick(&mut p, &grid, press_jump());
        for i in 0..120 {
            let input = if i < hold_ticks { hold_jump() } else { idle() };
            tick(&mut p, &grid, input);
            top = top.min(p.kin.y);
        }
        start - top
    }

    #[test]
    fn releasing_early_cuts_jump() {
        let tapped = apex(0);
        let held = apex(120);
        let phys = PhysicsConfig::default();
        assert!(tapped < held);
        assert!(held > phys.jump_height * 0.9 && held < phys.jump_height * 1.1);
    }

    #[test]
    fn releasing_after_half_jump_time_changes_nothing() {
        let phys = PhysicsConfig::default();
        // Released at about 0.35 s, well past jump_time / 2.
        let late = (0.35 / DT) as usize;
        assert!(late as f64 * DT > phys.jump_time / 2.0);
        let held = apex(120);
        assert!((apex(late) - held).abs() < 1e-9);
    }

    #[test]
    fn jump_cut_is_one_shot() {
        let grid = flat();
        let mut p = grounded(&grid);
        tick(&mut p, &grid, press_jump());
        tick(&mut p, &grid, hold_jump());
        tick(&mut p, &grid, idle());
        assert!(p.kin.already_aborted_jump);
        let phys = PhysicsConfig::default();
        assert!(p.kin.vy <= phys.launch_speed(phys.min_jump_height));

        tick(&mut p, &grid, hold_jump());
        let vy = p.kin.vy;
        tick(&mut p, &grid, idle());
        let g = 2.0 * phys.jump_height / (phys.jump_time * phys.jump_time);
        assert!((p.kin.vy - (vy - g * DT)).abs() < 1e-6, "second release only feels gravity");
    }

    fn ladder_grid() -> TileGrid {
        grid_from(&[
            "......",
            "..H...",
            "..H...",
            "..H...",
            "######",
        ])
    }

    #[test]
    fn ladder_climb_and_floor_unlock() {
        let grid = ladder_grid();
        let mut p = Player::new(35.0, 34.0, 6);
        let up = FrameInput { up: true, ..FrameInput::default() };
        tick(&mut p, &grid, up);
        assert!(p.kin.locked_to_ladder);
        assert!(p.kin.y < 34.0);
        assert_eq!(p.kin.vy, 0.0);
        assert_eq!(p.anim(), Anim::Climb);

        let down = FrameInput { down: true, ..FrameInput::default() };
        for _ in 0..120 {
            tick(&mut p, &grid, down);
            assert!(!(p.kin.locked_to_ladder && p.contacts().hit_floor));
        }
        assert!(!p.kin.locked_to_ladder);
        assert!(p.contacts().hit_floor);
        let floor_top = 4.0 * TILE_SIZE;
        assert!((p.collision_box().bottom() - (floor_top - EPSILON)).abs() < 1e-9);
    }

    #[test]
    fn ladder_needs_centre_alignment() {
        let grid = ladder_grid();
        // Centre 7 units off the ladder's middle, still over the ladder tile.
        let mut p = Player::new(42.0, 34.0, 6);
        tick(&mut p, &grid, FrameInput { up: true, ..FrameInput::default() });
        assert!(!p.kin.locked_to_ladder);
    }

    #[test]
    fn hanging_on_ladder_ignores_gravity() {
        let grid = ladder_grid();
        let mut p = Player::new(35.0, 34.0, 6);
        tick(&mut p, &grid, FrameInput { up: true, ..FrameInput::default() });
        let y = p.kin.y;
        for _ in 0..30 {
            tick(&mut p, &grid, idle());
        }
        assert!(p.kin.locked_to_ladder);
        assert_eq!(p.kin.y, y);
    }

    #[test]
    fn jumping_off_a_ladder_unlocks() {
        let grid = ladder_grid();
        let mut p = Player::new(35.0, 34.0, 6);
        tick(&mut p, &grid, FrameInput { up: true, ..FrameInput::default() });
        tick(&mut p, &grid, press_jump());
        assert!(!p.kin.locked_to_ladder);
        assert!(p.kin.vy > 0.0);
    }

    #[test]
    fn running_eases_toward_max_speed() {
        let grid = flat();
        let mut p = grounded(&grid);
        let right = FrameInput { right: true, ..FrameInput::default() };
        tick(&mut p, &grid, right);
        assert_eq!(p.kin.vx, 20.0);
        for _ in 0..10 {
            tick(&mut p, &grid, right);
        }
        assert_eq!(p.kin.vx, 100.0);
        assert_eq!(p.anim(), Anim::Run);
        assert_eq!(p.facing, Facing::Right);
    }

    #[test]
    fn wall_stops_running() {
        let grid = grid_from(&["....#", "....#", "#####"]);
        let mut p = Player::at_spawn(3, 1, 6);
        let right = FrameInput { right: true, ..FrameInput::default() };
        for _ in 0..60 {
            tick(&mut p, &grid, right);
        }
        // Zeroing vx on contact means the flag only fires on ticks that
        // push into the wall again, so look at a window.
        let x = p.kin.x;
        let mut walled = false;
        for _ in 0..20 {
            tick(&mut p, &grid, right);
            assert_eq!(p.kin.x, x);
            walled |= p.contacts().hit_wall;
        }
        assert!(walled);
        assert!(p.collision_box().right() < 4.0 * TILE_SIZE);
    }

    #[test]
    fn spikes_hurt_then_grant_grace() {
        let grid = grid_from(&["......", "..^...", "######"]);
        let (phys, cfg) = cfgs();
        let mut p = Player::at_spawn(2, 1, 6);
        tick(&mut p, &grid, idle());
        assert_eq!(p.health, 5);
        assert!(p.is_hurt());
        assert_eq!(p.take_damage(&phys, &cfg), DamageOutcome::Ignored);
        assert_eq!(p.health, 5);
    }

    #[test]
    fn hurt_player_cannot_run() {
        let grid = flat();
        let (phys, cfg) = cfgs();
        let mut p = grounded(&grid);
        assert_eq!(p.take_damage(&phys, &cfg), DamageOutcome::Hurt);
        tick(&mut p, &grid, FrameInput { right: true, ..FrameInput::default() });
        assert_eq!(p.kin.vx, 0.0);
        assert_eq!(p.anim(), Anim::Hurt);
    }

    #[test]
    fn grace_period_follows_hurt() {
        let grid = flat();
        let (phys, cfg) = cfgs();
        let mut p = grounded(&grid);
        p.take_damage(&phys, &cfg);
        // 0.3 s hurt + part of the 0.6 s grace.
        for _ in 0..30 {
            tick(&mut p, &grid, idle());
        }
        assert!(!p.is_hurt());
        assert!(p.is_invulnerable());
        for _ in 0..60 {
            tick(&mut p, &grid, idle());
        }
        assert!(!p.is_invulnerable());
        assert_eq!(p.take_damage(&phys, &cfg), DamageOutcome::Hurt);
    }

    #[test]
    fn last_hit_kills_then_respawn_is_due() {
        let grid = flat();
        let (phys, cfg) = cfgs();
        let mut p = grounded(&grid);
        p.health = 1;
        assert_eq!(p.take_damage(&phys, &cfg), DamageOutcome::Killed);
        assert!(p.is_dying());
        assert_eq!(p.anim(), Anim::Death);
        for _ in 0..110 {
            tick(&mut p, &grid, idle());
        }
        assert!(!p.respawn_due());
        for _ in 0..20 {
            tick(&mut p, &grid, idle());
        }
        assert!(p.respawn_due());
    }

    #[test]
    fn health_is_capped() {
        let mut p = Player::new(0.0, 0.0, 8);
        assert!(p.add_health(3, 9));
        assert_eq!(p.health, 9);
        assert!(!p.add_health(1, 9));
    }

    #[test]
    fn first_spell_becomes_current() {
        let mut p = Player::new(0.0, 0.0, 6);
        assert_eq!(p.current_spell(), None);
        assert!(p.add_spell("spark"));
        assert!(p.add_spell("frost"));
        assert!(!p.add_spell("spark"));
        assert_eq!(p.current_spell(), Some("spark"));
        p.next_spell();
        assert_eq!(p.current_spell(), Some("frost"));
    }

    #[test]
    fn cast_needs_spell_and_cooldown() {
        let grid = flat();
        let mut p = grounded(&grid);
        let cast = FrameInput { cast_pressed: true, ..FrameInput::default() };
        assert!(tick(&mut p, &grid, cast).is_none());

        p.add_spell("spark");
        let shot = tick(&mut p, &grid, cast).expect("casts");
        assert_eq!(shot.vx, SPELL_SPEED);
        assert_eq!(shot.vy, 0.0);
        assert!(tick(&mut p, &grid, cast).is_none(), "cooldown");

        for _ in 0..15 {
            tick(&mut p, &grid, idle());
        }
        assert!(tick(&mut p, &grid, cast).is_some());
    }

    #[test]
    fn cast_aims_up() {
        let grid = flat();
        let mut p = grounded(&grid);
        p.add_spell("spark");
        let shot = tick(&mut p, &grid, FrameInput { up: true, cast_pressed: true, ..FrameInput::default() })
            .expect("casts");
        assert_eq!(shot.vx, 0.0);
        assert_eq!(shot.vy, -SPELL_SPEED);
    }
}
