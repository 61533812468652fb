/// Tile kinds and the collision flags they expose.
/// Flags are derived from the kind here, so level data never stores
/// raw booleans and tile semantics stay centralized.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tile {
    Empty,
    Block,     // Solid on every side
    Platform,  // One-way floor
    Ladder,    // Climbable
    LadderTop, // Climbable + one-way floor (top rung)
    Spikes,    // Damage zone
}

/// Per-cell collision flags as seen by the resolver and controllers.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct TileSample {
    pub block: bool,
    pub platform: bool,
    pub ladder: bool,
    pub damage: bool,
}

impl TileSample {
    pub const EMPTY: TileSample = TileSample {
        block: false,
        platform: false,
        ladder: false,
        damage: false,
    };

    /// Anything a walker can stand on.
    pub fn is_floor(self) -> bool {
        self.block || self.platform
    }
}

impl Tile {
    pub fn sample(self) -> TileSample {
        match self {
            Tile::Empty => TileSample::EMPTY,
            Tile::Block => TileSample { block: true, ..TileSample::EMPTY },
            Tile::Platform => TileSample { platform: true, ..TileSample::EMPTY },
            Tile::Ladder => TileSample { ladder: true, ..TileSample::EMPTY },
            Tile::LadderTop => TileSample { ladder: true, platform: true, ..TileSample::EMPTY },
            Tile::Spikes => TileSample { damage: true, ..TileSample::EMPTY },
        }
    }

    /// Map a level glyph to terrain. Returns `None` for glyphs that are
    /// not terrain (spawn markers, actors, pickups).
    pub fn from_glyph(ch: char) -> Option<Tile> {
        match ch {
            ' ' | '.' => Some(Tile::Empty),
            '#' => Some(Tile::Block),
            '=' => Some(Tile::Platform),
            'H' => Some(Tile::Ladder),
            'T' => Some(Tile::LadderTop),
            '^' => Some(Tile::Spikes),
            _ => None,
        }
    }
}

impl Default for Tile {
    fn default() -> Self {
        Tile::Empty
    }
}
