/// Spell bullets: straight-line projectiles with a lifetime.
///
/// Each tick a bullet moves by `v·dt`, then checks in order: lifetime, the
/// tile under its centre, enemies, props. The first hit ends it, so a bullet
/// damages at most one target.

use super::geom::Aabb;
use super::grid::TileQuery;

pub const BULLET_TTL: f64 = 10.0;
/// Sprite cell edge; the position is the cell's top-left.
const BULLET_CELL: f64 = 16.0;
/// Lifetimes within this of zero count as spent.
const TTL_TOLERANCE: f64 = 1e-9;

/// Why a bullet stopped, if it did.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BulletHit {
    Expired,
    Wall,
    /// Id of the enemy struck.
    Enemy(usize),
    /// Id of the prop struck.
    Prop(usize),
}

#[derive(Clone, Debug)]
pub struct SpellBullet {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub ttl: f64,
}

impl SpellBullet {
    /// Bullet centred on `(cx, cy)`.
    pub fn new(cx: f64, cy: f64, vx: f64, vy: f64) -> Self {
        SpellBullet {
            x: cx - BULLET_CELL / 2.0,
            y: cy - BULLET_CELL / 2.0,
            vx,
            vy,
            ttl: BULLET_TTL,
        }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + BULLET_CELL / 2.0, self.y + BULLET_CELL / 2.0)
    }

    pub fn hit_box(&self) -> Aabb {
        Aabb::new(self.x + 6.0, self.y + 6.0, 4.0, 4.0)
    }

    /// Advance one tick against `(id, box)` lists of enemies and props.
    pub fn update<G: TileQuery + ?Sized>(
        &mut self,
        dt: f64,
        grid: &G,
        enemies: &[(usize, Aabb)],
        props: &[(usize, Aabb)],
    ) -> Option<BulletHit> {
        self.x += self.vx * dt;
        self.y += self.vy * dt;
        self.ttl -= dt;
        if self.ttl <= TTL_TOLERANCE {
            return Some(BulletHit::Expired);
        }

        let (cx, cy) = self.center();
        if grid.sample_at(cx, cy).block {
            return Some(BulletHit::Wall);
        }

        let hb = self.hit_box();
        if let Some((id, _)) = enemies.iter().find(|(_, b)| hb.overlaps(b)) {
            return Some(BulletHit::Enemy(*id));
        }
        if let Some((id, _)) = props.iter().find(|(_, b)| hb.overlaps(b)) {
            return Some(BulletHit::Prop(*id));
        }
        None
    }
}
