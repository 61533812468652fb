/// Sprite registry: maps sprite names to the two-column glyphs the
/// renderer draws.
///
/// The book is built once at startup and owned by the renderer. Looking up
/// a name that was never registered is a `ResourceError`; `validate()` runs
/// every lookup the renderer can make before the terminal is taken over, so
/// a missing sprite aborts startup instead of a frame.

use std::collections::HashMap;

use crossterm::style::Color;

use crate::domain::enemy::Enemy;
use crate::domain::entity::{EffectKind, Facing, PickupKind};
use crate::domain::player::Anim;
use crate::domain::tile::Tile;
use crate::error::ResourceError;

/// One tile-sized sprite: two terminal columns plus colors.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Glyph {
    pub chars: [char; 2],
    pub fg: Color,
    pub bg: Color,
}

impl Glyph {
    pub const fn new(c0: char, c1: char, fg: Color, bg: Color) -> Self {
        Glyph { chars: [c0, c1], fg, bg }
    }

    /// Left-facing variant: columns swapped and directional marks flipped.
    pub fn mirrored(self) -> Self {
        let flip = |c: char| match c {
            '<' => '>',
            '>' => '<',
            '(' => ')',
            ')' => '(',
            '/' => '\\',
            '\\' => '/',
            '▶' => '◀',
            '◀' => '▶',
            other => other,
        };
        Glyph {
            chars: [flip(self.chars[1]), flip(self.chars[0])],
            ..self
        }
    }
}

const TRANSPARENT: Color = Color::Reset;

// ── Sprite names ──

pub fn tile_sprite(tile: Tile) -> &'static str {
    match tile {
        Tile::Empty => "tile.empty",
        Tile::Block => "tile.block",
        Tile::Platform => "tile.platform",
        Tile::Ladder => "tile.ladder",
        Tile::LadderTop => "tile.ladder_top",
        Tile::Spikes => "tile.spikes",
    }
}

pub fn player_sprite(anim: Anim) -> &'static str {
    match anim {
        Anim::Idle => "player.idle",
        Anim::Run => "player.run",
        Anim::Jump => "player.jump",
        Anim::Fall => "player.fall",
        Anim::Climb => "player.climb",
        Anim::Crouch => "player.crouch",
        Anim::Hurt => "player.hurt",
        Anim::Death => "player.death",
    }
}

pub fn enemy_sprite(enemy: &Enemy) -> &'static str {
    match (enemy, enemy.is_hurt()) {
        (Enemy::Crawler(_), false) => "crawler",
        (Enemy::Crawler(_), true) => "crawler.hurt",
        (Enemy::Blob(_), false) => "blob",
        (Enemy::Blob(_), true) => "blob.hurt",
    }
}

pub fn effect_sprite(kind: EffectKind) -> &'static str {
    match kind {
        EffectKind::SpellHit => "fx.spell_hit",
        EffectKind::CrawlerDeath => "fx.crawler_death",
        EffectKind::BlobDeath => "fx.blob_death",
    }
}

pub fn pickup_sprite(kind: &PickupKind) -> &'static str {
    match kind {
        PickupKind::Health { .. } => "pickup.health",
        PickupKind::Book { .. } => "pickup.book",
    }
}

pub const SPELL: &str = "spell";
pub const PROP: &str = "prop.flimsy";
pub const EXIT: &str = "exit";
pub const SIGN: &str = "sign";

/// Every name the renderer may ask for.
fn required_names() -> Vec<&'static str> {
    let tiles = [
        Tile::Empty, Tile::Block, Tile::Platform,
        Tile::Ladder, Tile::LadderTop, Tile::Spikes,
    ];
    let anims = [
        Anim::Idle, Anim::Run, Anim::Jump, Anim::Fall,
        Anim::Climb, Anim::Crouch, Anim::Hurt, Anim::Death,
    ];
    let effects = [EffectKind::SpellHit, EffectKind::CrawlerDeath, EffectKind::BlobDeath];

    let mut names: Vec<&'static str> = Vec::new();
    names.extend(tiles.into_iter().map(tile_sprite));
    names.extend(anims.into_iter().map(player_sprite));
    names.extend(effects.into_iter().map(effect_sprite));
    names.extend([
        "crawler", "crawler.hurt", "blob", "blob.hurt",
        "pickup.health", "pickup.book",
        SPELL, PROP, EXIT, SIGN,
        "hud.heart", "hud.heart_empty", "hud.spell",
    ]);
    names
}

pub struct GlyphBook {
    glyphs: HashMap<String, Glyph>,
}

impl GlyphBook {
    pub fn empty() -> Self {
        GlyphBook { glyphs: HashMap::new() }
    }

    /// The built-in sprite set.
    pub fn standard() -> Self {
        let brick = Color::Rgb { r: 180, g: 120, b: 60 };
        let brick_bg = Color::Rgb { r: 100, g: 65, b: 30 };
        let rung = Color::Rgb { r: 100, g: 200, b: 255 };
        let hero = Color::Rgb { r: 255, g: 220, b: 120 };
        let hurt = Color::Rgb { r: 255, g: 90, b: 90 };
        let arcane = Color::Rgb { r: 190, g: 120, b: 255 };
        let slime = Color::Rgb { r: 90, g: 220, b: 90 };

        let mut book = GlyphBook::empty();
        let entries: [(&str, Glyph); 30] = [
            ("tile.empty", Glyph::new(' ', ' ', TRANSPARENT, TRANSPARENT)),
            ("tile.block", Glyph::new('▓', '▓', brick, brick_bg)),
            ("tile.platform", Glyph::new('▔', '▔', brick, TRANSPARENT)),
            ("tile.ladder", Glyph::new('╠', '╣', rung, TRANSPARENT)),
            ("tile.ladder_top", Glyph::new('╦', '╦', rung, TRANSPARENT)),
            ("tile.spikes", Glyph::new('▲', '▲', Color::Grey, TRANSPARENT)),
            ("player.idle", Glyph::new('@', '>', hero, TRANSPARENT)),
            ("player.run", Glyph::new('@', '▶', hero, TRANSPARENT)),
            ("player.jump", Glyph::new('@', '/', hero, TRANSPARENT)),
            ("player.fall", Glyph::new('@', '\\', hero, TRANSPARENT)),
            ("player.climb", Glyph::new('@', '#', hero, TRANSPARENT)),
            ("player.crouch", Glyph::new('_', '@', hero, TRANSPARENT)),
            ("player.hurt", Glyph::new('@', '!', hurt, TRANSPARENT)),
            ("player.death", Glyph::new('x', 'x', hurt, TRANSPARENT)),
            ("crawler", Glyph::new('{', '}', Color::Rgb { r: 220, g: 160, b: 60 }, TRANSPARENT)),
            ("crawler.hurt", Glyph::new('{', '}', hurt, TRANSPARENT)),
            ("blob", Glyph::new('(', ')', slime, TRANSPARENT)),
            ("blob.hurt", Glyph::new('(', ')', hurt, TRANSPARENT)),
            ("spell", Glyph::new('*', ' ', arcane, TRANSPARENT)),
            ("fx.spell_hit", Glyph::new('✶', ' ', arcane, TRANSPARENT)),
            ("fx.crawler_death", Glyph::new('~', '~', Color::DarkYellow, TRANSPARENT)),
            ("fx.blob_death", Glyph::new('°', '°', slime, TRANSPARENT)),
            ("pickup.health", Glyph::new('♥', ' ', hurt, TRANSPARENT)),
            ("pickup.book", Glyph::new('▯', '?', arcane, TRANSPARENT)),
            ("prop.flimsy", Glyph::new('▒', '▒', Color::Rgb { r: 150, g: 110, b: 70 }, TRANSPARENT)),
            ("exit", Glyph::new('▐', '▌', Color::Rgb { r: 80, g: 255, b: 80 }, TRANSPARENT)),
            ("sign", Glyph::new('┬', ' ', Color::Rgb { r: 200, g: 180, b: 120 }, TRANSPARENT)),
            ("hud.heart", Glyph::new('♥', ' ', hurt, TRANSPARENT)),
            ("hud.heart_empty", Glyph::new('♡', ' ', Color::DarkGrey, TRANSPARENT)),
            ("hud.spell", Glyph::new('✦', ' ', arcane, TRANSPARENT)),
        ];
        for (name, glyph) in entries {
            book.register(name, glyph);
        }
        book
    }

    pub fn register(&mut self, name: &str, glyph: Glyph) {
        self.glyphs.insert(name.to_string(), glyph);
    }

    pub fn get(&self, name: &str) -> Result<Glyph, ResourceError> {
        self.glyphs
            .get(name)
            .copied()
            .ok_or_else(|| ResourceError::UnknownSprite(name.to_string()))
    }

    /// Sprite for an actor facing `facing`; right-facing is the stored form.
    pub fn facing(&self, name: &str, facing: Facing) -> Result<Glyph, ResourceError> {
        let glyph = self.get(name)?;
        Ok(match facing {
            Facing::Right => glyph,
            Facing::Left => glyph.mirrored(),
        })
    }

    /// Fails on the first sprite the renderer needs that is not registered.
    pub fn validate(&self) -> Result<(), ResourceError> {
        for name in required_names() {
            self.get(name)?;
        }
        Ok(())
    }
}
