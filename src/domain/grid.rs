/// Tile grid: the level's static terrain, addressed by integer tile
/// coordinates. Immutable after level load.
///
/// World → tile conversion is `floor(coord / TILE_SIZE)`, so negative
/// world coordinates map to negative tile indices, which (like every other
/// out-of-range index) read back as the empty sample.

use super::tile::{Tile, TileSample};

/// Edge length of one tile in world units.
pub const TILE_SIZE: f64 = 16.0;

/// World coordinate → tile index.
#[inline]
pub fn tile_coord(world: f64) -> i32 {
    (world / TILE_SIZE).floor() as i32
}

/// World x/y of a tile's top-left corner.
#[inline]
pub fn tile_origin(index: i32) -> f64 {
    index as f64 * TILE_SIZE
}

/// Read-only terrain lookup used by the resolver and controllers.
pub trait TileQuery {
    /// Flags of the tile at `(tx, ty)`. Out of range → `TileSample::EMPTY`.
    fn tile_data(&self, tx: i32, ty: i32) -> TileSample;

    /// Flags of the tile under a world-space point.
    fn sample_at(&self, wx: f64, wy: f64) -> TileSample {
        self.tile_data(tile_coord(wx), tile_coord(wy))
    }
}

#[derive(Clone, Debug, Default)]
pub struct TileGrid {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl TileGrid {
    pub fn new(width: usize, height: usize) -> Self {
        TileGrid {
            width,
            height,
            tiles: vec![Tile::Empty; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Tile kind at `(tx, ty)`, `Tile::Empty` outside the grid.
    pub fn tile(&self, tx: i32, ty: i32) -> Tile {
        match self.index(tx, ty) {
            Some(i) => self.tiles[i],
            None => Tile::Empty,
        }
    }

    /// Only used while building a level.
    pub fn set(&mut self, tx: usize, ty: usize, tile: Tile) {
        if tx < self.width && ty < self.height {
            self.tiles[ty * self.width + tx] = tile;
        }
    }

    fn index(&self, tx: i32, ty: i32) -> Option<usize> {
        if tx < 0 || ty < 0 {
            return None;
        }
        let (x, y) = (tx as usize, ty as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.width + x)
    }
}

impl TileQuery for TileGrid {
    #[inline]
    fn tile_data(&self, tx: i32, ty: i32) -> TileSample {
        self.tile(tx, ty).sample()
    }
}

/// Build a grid from ASCII rows using the level glyphs. Non-terrain
/// glyphs become empty tiles.
#[cfg(test)]
pub fn grid_from(rows: &[&str]) -> TileGrid {
    let height = rows.len();
    let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
    let mut grid = TileGrid::new(width, height);
    for (y, row) in rows.iter().enumerate() {
        for (x, ch) in row.chars().enumerate() {
            grid.set(x, y, Tile::from_glyph(ch).unwrap_or(Tile::Empty));
        }
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_is_empty() {
        let grid = grid_from(&["##", "##"]);
        assert_eq!(grid.tile_data(-1, 0), TileSample::EMPTY);
        assert_eq!(grid.tile_data(0, -1), TileSample::EMPTY);
        assert_eq!(grid.tile_data(2, 0), TileSample::EMPTY);
        assert_eq!(grid.tile_data(0, 2), TileSample::EMPTY);
        assert!(grid.tile_data(1, 1).block);
    }

    #[test]
    fn tile_coord_floors_negative() {
        assert_eq!(tile_coord(-0.5), -1);
        assert_eq!(tile_coord(0.0), 0);
        assert_eq!(tile_coord(15.999), 0);
        assert_eq!(tile_coord(16.0), 1);
    }

    #[test]
    fn sample_at_uses_world_units() {
        let grid = grid_from(&["..", ".="]);
        assert!(grid.sample_at(20.0, 20.0).platform);
        assert!(!grid.sample_at(10.0, 20.0).platform);
    }
}
