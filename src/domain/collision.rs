/// Axis-aware collision resolver.
///
/// Resolves a box moving from `(old_x, old_y)` to `(new_x, new_y)` against
/// the tile grid and a snapshot of dynamic colliders. Two phases, each
/// sampling the four corners of the moved box:
///
///   1. Horizontal: corners at `(new_x, old_y)`. Any block tile or collider
///      under a corner rejects the whole horizontal move (`hit_wall`).
///   2. Vertical: corners at `(old_x, new_y)`, evaluated bottom-left,
///      top-left, bottom-right, top-right. Each hit snaps `y` against the
///      obstruction; the last corner evaluated wins.
///
/// Axes are independent, so a diagonal move blocked on one axis still
/// completes on the other (wall slides, corner smoothing).
///
/// Every snap keeps `EPSILON` of clearance so the box is never classified
/// as overlapping the same tile again on the next tick.

use super::geom::Aabb;
use super::grid::{tile_coord, tile_origin, TileQuery, TILE_SIZE};

pub const EPSILON: f64 = 0.001;

/// One-way platforms only catch boxes whose previous bottom edge sat no
/// further than this below the platform top.
const PLATFORM_TOLERANCE: f64 = -1.0;

/// Anything that takes part in collision as a box.
pub trait Collider {
    fn collision_box(&self) -> Aabb;
}

impl Collider for Aabb {
    fn collision_box(&self) -> Aabb {
        *self
    }
}

/// A single resolution request: old and tentative position of a box.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Motion {
    pub old_x: f64,
    pub old_y: f64,
    pub new_x: f64,
    pub new_y: f64,
    pub width: f64,
    pub height: f64,
}

impl Motion {
    pub fn new(from: Aabb, new_x: f64, new_y: f64) -> Self {
        Motion {
            old_x: from.x,
            old_y: from.y,
            new_x,
            new_y,
            width: from.w,
            height: from.h,
        }
    }

    fn is_falling(&self) -> bool {
        self.new_y > self.old_y
    }
}

#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct CollisionOutcome {
    pub x: f64,
    pub y: f64,
    pub hit_floor: bool,
    pub hit_ceiling: bool,
    pub hit_wall: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Edge {
    Top,
    Bottom,
}

/// Corner points of a box at `(x, y)`.
struct Corners {
    top_left: (f64, f64),
    top_right: (f64, f64),
    bottom_left: (f64, f64),
    bottom_right: (f64, f64),
}

impl Corners {
    fn of(x: f64, y: f64, w: f64, h: f64) -> Self {
        Corners {
            top_left: (x, y),
            top_right: (x + w, y),
            bottom_left: (x, y + h),
            bottom_right: (x + w, y + h),
        }
    }

    fn all(&self) -> [(f64, f64); 4] {
        [self.top_left, self.top_right, self.bottom_left, self.bottom_right]
    }

    /// Vertical-phase evaluation order. Later entries overwrite earlier ones.
    fn vertical_order(&self) -> [(Edge, (f64, f64)); 4] {
        [
            (Edge::Bottom, self.bottom_left),
            (Edge::Top, self.top_left),
            (Edge::Bottom, self.bottom_right),
            (Edge::Top, self.top_right),
        ]
    }
}

/// Last collider in the snapshot containing the point.
fn collider_at(colliders: &[Aabb], px: f64, py: f64) -> Option<&Aabb> {
    colliders.iter().rev().find(|c| c.contains(px, py))
}

/// Resolve one move. `drop_through` disables one-way platforms.
pub fn resolve<G: TileQuery + ?Sized>(
    motion: &Motion,
    grid: &G,
    colliders: &[Aabb],
    drop_through: bool,
) -> CollisionOutcome {
    let m = motion;
    let mut out = CollisionOutcome {
        x: m.new_x,
        y: m.new_y,
        ..CollisionOutcome::default()
    };

    // ── Horizontal phase ──
    let horizontal = Corners::of(m.new_x, m.old_y, m.width, m.height);
    for (px, py) in horizontal.all() {
        if grid.sample_at(px, py).block || collider_at(colliders, px, py).is_some() {
            out.x = m.old_x;
            out.hit_wall = true;
        }
    }

    // ── Vertical phase ──
    let falling = m.is_falling();
    let vertical = Corners::of(m.old_x, m.new_y, m.width, m.height);
    for (edge, (px, py)) in vertical.vertical_order() {
        let td = grid.sample_at(px, py);
        let tile_top = tile_origin(tile_coord(py));
        let hit = collider_at(colliders, px, py);

        match edge {
            Edge::Bottom => {
                if td.block {
                    out.y = tile_top - m.height - EPSILON;
                    out.hit_floor = true;
                }
                if let Some(cb) = hit {
                    out.y = cb.y - m.height - EPSILON;
                    out.hit_floor = true;
                }
                if !drop_through && td.platform && falling {
                    let distance = tile_top - (m.old_y + m.height);
                    if distance > PLATFORM_TOLERANCE {
                        out.y = m.old_y + distance - EPSILON;
                        out.hit_floor = true;
                    }
                }
            }
            Edge::Top => {
                if td.block {
                    out.y = tile_top + TILE_SIZE + EPSILON;
                    if out.y > 0.0 {
                        out.hit_ceiling = true;
                    }
                }
                if let Some(cb) = hit {
                    out.y = cb.bottom() + EPSILON;
                    if out.y > 0.0 {
                        out.hit_ceiling = true;
                    }
                }
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid::{grid_from, TileGrid};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn actor() -> Aabb {
        Aabb::new(100.0, 100.0, 16.0, 16.0)
    }

    #[test]
    fn falling_onto_collider_snaps_to_its_top() {
        let grid = TileGrid::new(20, 20);
        let floor = [Aabb::new(96.0, 116.0, 16.0, 16.0)];
        let out = resolve(&Motion::new(actor(), 100.0, 102.0), &grid, &floor, false);
        assert!(out.hit_floor);
        assert!(!out.hit_wall);
        assert!(approx(out.y, 116.0 - 16.0 - EPSILON));
        assert!(approx(out.x, 100.0));
    }

    #[test]
    fn falling_onto_block_tile_snaps_to_tile_top() {
        // Block row at y = 112.
        let mut rows = vec!["........"; 7];
        rows.push("########");
        let grid = grid_from(&rows);
        let from = Aabb::new(40.0, 94.0, 16.0, 16.0);
        let out = resolve(&Motion::new(from, 40.0, 98.0), &grid, &[], false);
        assert!(out.hit_floor);
        assert!(approx(out.y, 112.0 - 16.0 - EPSILON));
    }

    #[test]
    fn moving_left_into_block_is_rejected() {
        // Block tile at world (80, 96).
        let grid = grid_from(&[
            "........",
            "........",
            "........",
            "........",
            "........",
            "........",
            ".....#..",
            "........",
        ]);
        let out = resolve(&Motion::new(actor(), 95.0, 100.0), &grid, &[], false);
        assert!(out.hit_wall);
        assert!(approx(out.x, 100.0));
        assert!(!out.hit_floor);
        assert!(approx(out.y, 100.0));
    }

    #[test]
    fn diagonal_move_slides_along_wall() {
        let grid = grid_from(&[
            "......",
            "......",
            "......",
            "#.....",
            "#.....",
            "#.....",
        ]);
        let from = Aabb::new(17.0, 50.0, 10.0, 14.0);
        let out = resolve(&Motion::new(from, 15.0, 53.0), &grid, &[], false);
        assert!(out.hit_wall);
        assert!(approx(out.x, 17.0));
        assert!(approx(out.y, 53.0));
    }

    #[test]
    fn platform_catches_only_from_above() {
        // Platform row at y = 32.
        let grid = grid_from(&["....", "....", "====", "....", "...."]);

        // Falling from above.
        let above = Aabb::new(20.0, 17.0, 10.0, 14.0);
        let out = resolve(&Motion::new(above, 20.0, 20.0), &grid, &[], false);
        assert!(out.hit_floor);
        assert!(approx(out.y, 32.0 - 14.0 - EPSILON));

        // Rising through from below.
        let below = Aabb::new(20.0, 40.0, 10.0, 14.0);
        let out = resolve(&Motion::new(below, 20.0, 30.0), &grid, &[], false);
        assert!(!out.hit_floor && !out.hit_ceiling);
        assert!(approx(out.y, 30.0));

        // Already embedded deeper than the tolerance: keeps falling.
        let embedded = Aabb::new(20.0, 22.0, 10.0, 14.0);
        let out = resolve(&Motion::new(embedded, 20.0, 24.0), &grid, &[], false);
        assert!(!out.hit_floor);
        assert!(approx(out.y, 24.0));
    }

    #[test]
    fn drop_through_ignores_platforms() {
        let grid = grid_from(&["....", "....", "====", "...."]);
        let above = Aabb::new(20.0, 17.0, 10.0, 14.0);
        let out = resolve(&Motion::new(above, 20.0, 20.0), &grid, &[], true);
        assert!(!out.hit_floor);
        assert!(approx(out.y, 20.0));
    }

    #[test]
    fn platforms_never_block_horizontally() {
        let grid = grid_from(&["....", "=...", "...."]);
        let from = Aabb::new(18.0, 17.0, 10.0, 14.0);
        let out = resolve(&Motion::new(from, 14.0, 17.0), &grid, &[], false);
        assert!(!out.hit_wall);
        assert!(approx(out.x, 14.0));
    }

    #[test]
    fn ceiling_block_snaps_below() {
        let grid = grid_from(&["....", "####", "....", "...."]);
        let from = Aabb::new(20.0, 33.0, 10.0, 14.0);
        let out = resolve(&Motion::new(from, 20.0, 30.0), &grid, &[], false);
        assert!(out.hit_ceiling);
        assert!(approx(out.y, 32.0 + EPSILON));
    }

    #[test]
    fn ceiling_flag_needs_positive_result() {
        // Tiles above row 0 read as empty, so use a prop ending at y = -1.
        let grid = TileGrid::new(4, 4);
        let overhead = [Aabb::new(0.0, -40.0, 64.0, 39.0)];
        let from = Aabb::new(20.0, 0.0, 10.0, 14.0);
        let out = resolve(&Motion::new(from, 20.0, -3.0), &grid, &overhead, false);
        assert!(!out.hit_ceiling);
        assert!(approx(out.y, -1.0 + EPSILON));
    }

    #[test]
    fn collider_ceiling_sets_ceiling_flag() {
        let grid = TileGrid::new(8, 8);
        let prop = [Aabb::new(16.0, 16.0, 16.0, 16.0)];
        let from = Aabb::new(20.0, 33.0, 10.0, 14.0);
        let out = resolve(&Motion::new(from, 20.0, 30.0), &grid, &prop, false);
        assert!(out.hit_ceiling);
        assert!(!out.hit_floor);
        assert!(approx(out.y, 32.0 + EPSILON));
    }

    #[test]
    fn colliders_block_horizontally() {
        let grid = TileGrid::new(8, 8);
        let prop = [Aabb::new(32.0, 16.0, 16.0, 16.0)];
        let from = Aabb::new(20.0, 17.0, 10.0, 14.0);
        let out = resolve(&Motion::new(from, 23.0, 17.0), &grid, &prop, false);
        assert!(out.hit_wall);
        assert!(approx(out.x, 20.0));
    }

    #[test]
    fn last_corner_wins_when_bottom_corners_disagree() {
        // Bottom-left lands on a prop (top 33), bottom-right on a block tile
        // (top 32). Bottom-right is evaluated later, so the block snap wins.
        let grid = grid_from(&["....", "....", ".#..", "...."]);
        let prop = [Aabb::new(0.0, 33.0, 12.0, 16.0)];
        let from = Aabb::new(10.0, 17.0, 10.0, 14.0);
        let out = resolve(&Motion::new(from, 10.0, 20.0), &grid, &prop, false);
        assert!(out.hit_floor);
        assert!(approx(out.y, 32.0 - 14.0 - EPSILON));
    }

    #[test]
    fn zero_displacement_is_identity() {
        let grid = grid_from(&["....", "....", "####"]);
        let from = Aabb::new(20.0, 10.0, 10.0, 14.0);
        let out = resolve(&Motion::new(from, 20.0, 10.0), &grid, &[], false);
        assert_eq!(
            out,
            CollisionOutcome { x: 20.0, y: 10.0, ..CollisionOutcome::default() }
        );
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        const W: f64 = 10.0;
        const H: f64 = 14.0;

        fn level() -> TileGrid {
            grid_from(&[
                "############",
                "#..........#",
                "#...##.....#",
                "#.......==.#",
                "#..#.......#",
                "#..#..###..#",
                "#.....=....#",
                "############",
            ])
        }

        fn any_block(grid: &TileGrid, x: f64, y: f64) -> bool {
            Corners::of(x, y, W, H)
                .all()
                .iter()
                .any(|&(px, py)| grid.sample_at(px, py).block)
        }

        proptest! {
            #[test]
            fn resolved_axes_never_enter_blocks(
                x in 0.0f64..192.0,
                y in 0.0f64..128.0,
                dx in -7.9f64..7.9,
                dy in -7.9f64..7.9,
                drop_through in any::<bool>(),
            ) {
                let grid = level();
                prop_assume!(!any_block(&grid, x, y));

                let m = Motion { old_x: x, old_y: y, new_x: x + dx, new_y: y + dy, width: W, height: H };
                let out = resolve(&m, &grid, &[], drop_through);

                prop_assert!(!any_block(&grid, out.x, m.old_y), "horizontal x={}", out.x);
                prop_assert!(!any_block(&grid, m.old_x, out.y), "vertical y={}", out.y);
            }

            #[test]
            fn rising_boxes_ignore_platforms(
                x in 0.0f64..192.0,
                y in 0.0f64..128.0,
                dy in 0.1f64..7.9,
            ) {
                let grid = level();
                prop_assume!(!any_block(&grid, x, y));
                prop_assume!(!any_block(&grid, x, y - dy));

                let m = Motion { old_x: x, old_y: y, new_x: x, new_y: y - dy, width: W, height: H };
                let out = resolve(&m, &grid, &[], false);
                prop_assert!(!out.hit_floor);
                prop_assert!(!out.hit_ceiling);
                prop_assert!((out.y - (y - dy)).abs() < 1e-9);
            }

            #[test]
            fn falling_boxes_are_never_pulled_up(
                x in 0.0f64..192.0,
                y in 0.0f64..128.0,
                dy in 0.1f64..7.9,
            ) {
                let grid = level();
                prop_assume!(!any_block(&grid, x, y));
                // Bottom edge not already inside a platform tile.
                prop_assume!(!grid.sample_at(x, y + H).platform);
                prop_assume!(!grid.sample_at(x + W, y + H).platform);

                let m = Motion { old_x: x, old_y: y, new_x: x, new_y: y + dy, width: W, height: H };
                let out = resolve(&m, &grid, &[], false);
                prop_assert!(out.y >= y - EPSILON * 2.0, "y={} -> {}", y, out.y);
            }
        }
    }
}
