/// Enemy controllers.
///
/// Two kinds, dispatched through one enum:
///
///   - Crawler: walks tile to tile along the floor. At each step it looks at
///     the tile ahead; a wall, hazard or platform there, or a missing floor
///     under it, turns it around. No gravity.
///   - Blob: gravity-driven hopper that moves through the shared collision
///     resolver. Idles until the player comes within sight, then chases the
///     player's last known x, hopping every few seconds.
///
/// Both are frozen while hurt and damage the player on contact.

use super::collision::{resolve, Collider, Motion, EPSILON};
use super::entity::{Effect, EffectKind};
use super::geom::Aabb;
use super::grid::{tile_coord, tile_origin, TileQuery, TILE_SIZE};

const HURT_TIME: f64 = 0.4;

// ── Crawler ──

const CRAWLER_HEALTH: i32 = 3;
const CRAWLER_SPEED: f64 = 16.0;

#[derive(Clone, Debug)]
pub struct Crawler {
    /// Top-left of the tile cell the crawler is drawn in.
    pub x: f64,
    pub y: f64,
    pub health: i32,
    pub direction: i32,
    target_x: f64,
    hurt_timer: f64,
}

impl Crawler {
    pub fn new(x: f64, y: f64) -> Self {
        Crawler {
            x,
            y,
            health: CRAWLER_HEALTH,
            direction: 1,
            target_x: x,
            hurt_timer: 0.0,
        }
    }

    fn update<G: TileQuery + ?Sized>(&mut self, dt: f64, grid: &G) {
        if self.hurt_timer > 0.0 {
            self.hurt_timer -= dt;
        } else {
            let step = CRAWLER_SPEED * dt;
            if (self.x - self.target_x).abs() < step {
                self.x = self.target_x;
            } else if self.x < self.target_x {
                self.x += step;
            } else {
                self.x -= step;
            }
        }
        self.think(grid);
    }

    /// Pick the next tile to walk to, or turn around.
    fn think<G: TileQuery + ?Sized>(&mut self, grid: &G) {
        let ty = tile_coord(self.y);
        let tx = if self.direction > 0 { tile_coord(self.x) + 1 } else { tile_coord(self.x) };

        let ahead = grid.tile_data(tx, ty);
        if ahead.block || ahead.damage || ahead.platform {
            self.direction = -self.direction;
            return;
        }
        if grid.tile_data(tx, ty + 1).is_floor() {
            self.target_x = tile_origin(tx) + self.direction as f64 * TILE_SIZE;
            return;
        }
        self.direction = -self.direction;
    }
}

impl Collider for Crawler {
    fn collision_box(&self) -> Aabb {
        Aabb::new(self.x + 2.0, self.y + 2.0, 12.0, 12.0)
    }
}

// ── Blob ──

pub const BLOB_SIZE: f64 = 14.0;
const BLOB_HEALTH: i32 = 2;
const BLOB_JUMP_HEIGHT: f64 = 2.0 * TILE_SIZE;
const BLOB_JUMP_TIME: f64 = 0.5;
const BLOB_AIR_SPEED: f64 = 80.0;
const BLOB_GROUND_SPEED: f64 = 20.0;
const TIME_BETWEEN_JUMPS: f64 = 2.0;
const BLOB_VIEW_DISTANCE: f64 = 6.0 * TILE_SIZE;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BlobMind {
    Idle,
    Target,
}

#[derive(Clone, Debug)]
pub struct Blob {
    /// Top-left of the collision box.
    pub x: f64,
    pub y: f64,
    pub vy: f64,
    pub health: i32,
    pub mind: BlobMind,
    pub touching_ground: bool,
    target_x: f64,
    last_known_player_x: f64,
    try_jump_timer: f64,
    hurt_timer: f64,
}

impl Blob {
    pub fn new(x: f64, y: f64) -> Self {
        // Deterministic per-spawn phase so blobs don't all hop in unison.
        let phase = ((x + y) / TILE_SIZE * 0.618).fract();
        Blob {
            x,
            y,
            vy: 0.0,
            health: BLOB_HEALTH,
            mind: BlobMind::Idle,
            touching_ground: false,
            target_x: x,
            last_known_player_x: x,
            try_jump_timer: TIME_BETWEEN_JUMPS * (1.0 - phase),
            hurt_timer: 0.0,
        }
    }

    /// Blob resting on the floor of tile `(tx, ty)`.
    pub fn at_tile(tx: i32, ty: i32) -> Self {
        let x = tile_origin(tx) + (TILE_SIZE - BLOB_SIZE) / 2.0;
        let y = tile_origin(ty) + TILE_SIZE - BLOB_SIZE - EPSILON;
        Blob::new(x, y)
    }

    fn update<G: TileQuery + ?Sized>(&mut self, dt: f64, grid: &G, colliders: &[Aabb], player: &Aabb) {
        if self.hurt_timer > 0.0 {
            self.hurt_timer -= dt;
            return;
        }
        self.think(player);
        self.step(dt, grid, colliders);
    }

    fn think(&mut self, player: &Aabb) {
        let px = player.center_x() - BLOB_SIZE / 2.0;
        let can_see = (self.x - px).abs() < BLOB_VIEW_DISTANCE
            && (self.y - player.y).abs() < BLOB_VIEW_DISTANCE;
        if can_see {
            self.last_known_player_x = px;
        }
        let at_target = self.x == self.target_x;

        match self.mind {
            BlobMind::Idle => {
                self.target_x = self.x;
                if can_see {
                    self.mind = BlobMind::Target;
                }
            }
            BlobMind::Target => {
                if self.touching_ground {
                    self.target_x = self.last_known_player_x;
                }
                if !can_see && at_target {
                    self.mind = BlobMind::Idle;
                }
            }
        }
    }

    fn step<G: TileQuery + ?Sized>(&mut self, dt: f64, grid: &G, colliders: &[Aabb]) {
        let gravity = -(2.0 * BLOB_JUMP_HEIGHT) / (BLOB_JUMP_TIME * BLOB_JUMP_TIME);
        let move_y = self.vy * dt + 0.5 * gravity * dt * dt;
        self.vy += gravity * dt;

        let speed = if self.touching_ground { BLOB_GROUND_SPEED } else { BLOB_AIR_SPEED };
        let step = speed * dt;
        let new_x = if (self.x - self.target_x).abs() < step {
            self.target_x
        } else if self.x < self.target_x {
            self.x + step
        } else {
            self.x - step
        };

        let old = self.collision_box();
        let out = resolve(&Motion::new(old, new_x, old.y - move_y), grid, colliders, false);
        self.x = out.x;
        self.y = out.y;
        self.touching_ground = out.hit_floor;
        if out.hit_floor || out.hit_ceiling {
            self.vy = 0.0;
        }
        if out.hit_wall {
            // Give up on an unreachable target.
            self.target_x = self.x;
        }

        self.try_jump_timer += dt;
        if self.touching_ground && self.try_jump_timer > TIME_BETWEEN_JUMPS {
            self.try_jump_timer = 0.0;
            self.vy = (2.0 * BLOB_JUMP_HEIGHT) / BLOB_JUMP_TIME;
        }
    }
}

impl Collider for Blob {
    fn collision_box(&self) -> Aabb {
        Aabb::new(self.x, self.y, BLOB_SIZE, BLOB_SIZE)
    }
}

// ── Dispatch ──

#[derive(Clone, Debug)]
pub enum Enemy {
    Crawler(Crawler),
    Blob(Blob),
}

impl Enemy {
    /// Advance one tick. Returns true when the enemy touches the player.
    pub fn update<G: TileQuery + ?Sized>(
        &mut self,
        dt: f64,
        grid: &G,
        colliders: &[Aabb],
        player: &Aabb,
    ) -> bool {
        match self {
            Enemy::Crawler(c) => c.update(dt, grid),
            Enemy::Blob(b) => b.update(dt, grid, colliders, player),
        }
        self.collision_box().overlaps(player)
    }

    /// Take one point of damage. Returns true when this killed the enemy.
    pub fn get_hurt(&mut self) -> bool {
        let (health, timer) = match self {
            Enemy::Crawler(c) => (&mut c.health, &mut c.hurt_timer),
            Enemy::Blob(b) => (&mut b.health, &mut b.hurt_timer),
        };
        *health -= 1;
        *timer = HURT_TIME;
        *health <= 0
    }

    pub fn is_hurt(&self) -> bool {
        match self {
            Enemy::Crawler(c) => c.hurt_timer > 0.0,
            Enemy::Blob(b) => b.hurt_timer > 0.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Enemy::Crawler(_) => "crawler",
            Enemy::Blob(_) => "blob",
        }
    }

    pub fn death_effect(&self) -> Effect {
        let b = self.collision_box();
        let kind = match self {
            Enemy::Crawler(_) => EffectKind::CrawlerDeath,
            Enemy::Blob(_) => EffectKind::BlobDeath,
        };
        Effect::new(kind, b.center_x(), b.center_y())
    }
}

impl Collider for Enemy {
    fn collision_box(&self) -> Aabb {
        match self {
            Enemy::Crawler(c) => c.collision_box(),
            Enemy::Blob(b) => b.collision_box(),
        }
    }
}
