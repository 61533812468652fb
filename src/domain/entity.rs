/// Level objects that are not actors: input snapshot, pickups, breakable
/// props, signs, exits and short-lived effects.

use super::collision::Collider;
use super::geom::Aabb;
use super::grid::TILE_SIZE;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    pub fn sign(self) -> f64 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// Frame input: intents sampled once per tick.
/// Directions and jump are held (continuous); `jump_pressed` and
/// `cast_pressed` are edge-triggered (fresh press this tick).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub jump_held: bool,
    pub jump_pressed: bool,
    pub cast_pressed: bool,
}

impl FrameInput {
    /// -1 up, +1 down, 0 none. Down wins over up, matching drop-through.
    pub fn climb(&self) -> f64 {
        if self.down {
            1.0
        } else if self.up {
            -1.0
        } else {
            0.0
        }
    }
}

// ── Pickups ──

#[derive(Clone, Debug, PartialEq)]
pub enum PickupKind {
    Health { amount: i32 },
    Book { title: String, spell: String, text: String },
}

#[derive(Clone, Debug)]
pub struct Pickup {
    pub x: f64,
    pub y: f64,
    pub kind: PickupKind,
}

impl Collider for Pickup {
    fn collision_box(&self) -> Aabb {
        Aabb::new(self.x + 2.0, self.y + 2.0, 12.0, 12.0)
    }
}

// ── Breakable props ──

/// A breakable block that acts as a dynamic collider until a spell hits it.
#[derive(Clone, Debug)]
pub struct Flimsy {
    pub x: f64,
    pub y: f64,
}

impl Collider for Flimsy {
    fn collision_box(&self) -> Aabb {
        Aabb::new(self.x, self.y, TILE_SIZE, TILE_SIZE)
    }
}

// ── Signs ──

pub const SIGN_FADE_IN: f64 = 0.6;
pub const SIGN_FADE_OUT: f64 = 0.8;

/// A readable sign. Its popup fades in while the player stands at it and
/// fades out after they leave.
#[derive(Clone, Debug)]
pub struct Sign {
    pub x: f64,
    pub y: f64,
    pub text: String,
    was_near: bool,
    visible: bool,
    timer: f64,
    alpha: f64,
}

impl Sign {
    pub fn new(x: f64, y: f64, text: String) -> Self {
        Sign { x, y, text, was_near: false, visible: false, timer: -1.0, alpha: 0.0 }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Popup opacity in `[0, 1]`.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn update(&mut self, dt: f64, player: &Aabb) {
        let near = self.collision_box().overlaps(player);
        if near {
            self.visible = true;
            if !self.was_near {
                if self.timer <= 0.0 {
                    self.timer = SIGN_FADE_IN;
                }
                self.was_near = true;
            }
        } else if self.was_near {
            self.was_near = false;
            if self.timer <= 0.0 {
                self.timer = SIGN_FADE_OUT;
            }
        }

        if self.timer > 0.0 {
            self.timer -= dt;
            self.alpha = if near {
                1.0 - (self.timer / SIGN_FADE_IN).max(0.0)
            } else {
                (self.timer / SIGN_FADE_OUT).max(0.0)
            };
            if self.timer <= 0.0 && !self.was_near {
                self.visible = false;
                self.alpha = 0.0;
            }
        } else if near {
            self.alpha = 1.0;
        }
    }
}

impl Collider for Sign {
    fn collision_box(&self) -> Aabb {
        Aabb::new(self.x, self.y, TILE_SIZE, TILE_SIZE)
    }
}

// ── Exit ──

/// Level exit: one tile wide, two tiles tall. `y` is the top of the door;
/// levels place it so the bottom half sits on the `X` tile.
#[derive(Clone, Debug)]
pub struct Exit {
    pub x: f64,
    pub y: f64,
    /// Name of the level to load; `None` means the next one in order.
    pub next: Option<String>,
}

impl Collider for Exit {
    fn collision_box(&self) -> Aabb {
        Aabb::new(self.x, self.y, TILE_SIZE, TILE_SIZE * 2.0)
    }
}

// ── Effects ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EffectKind {
    SpellHit,
    CrawlerDeath,
    BlobDeath,
}

impl EffectKind {
    pub fn lifetime(self) -> f64 {
        match self {
            EffectKind::SpellHit => 0.4,
            EffectKind::CrawlerDeath => 0.4,
            EffectKind::BlobDeath => 0.6,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Effect {
    pub kind: EffectKind,
    pub x: f64,
    pub y: f64,
    pub ttl: f64,
}

impl Effect {
    pub fn new(kind: EffectKind, x: f64, y: f64) -> Self {
        Effect { kind, x, y, ttl: kind.lifetime() }
    }

    /// Advance; returns true once expired.
    pub fn update(&mut self, dt: f64) -> bool {
        self.ttl -= dt;
        self.ttl <= 0.0
    }

    /// Fraction of the lifetime already elapsed.
    pub fn progress(&self) -> f64 {
        (1.0 - self.ttl / self.kind.lifetime()).clamp(0.0, 1.0)
    }
}
