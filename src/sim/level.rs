/// Level loader.
///
/// ## Sources (priority order):
///   1. `levels/` directory (individual `.txt` files, sorted by file name)
///   2. Built-in embedded levels
///
/// ## Level format (`.txt`):
///   ```
///   # Level Name
///   @ next <level name>
///   @ sign <x>,<y> <text>
///   @ book <x>,<y> <title>|<spell>|<text>
///   @ health <x>,<y> <amount>
///   <map rows>
///   ```
///
/// The name line and `@` metadata lines come before the map. The first
/// non-empty line is the name when it starts with `#` and a space, so a
/// map whose top row starts that way needs a name line above it. Metadata
/// coordinates are tile coordinates. Without `@ next` the exit leads to the
/// following level in load order.
///
/// ## Tile legend:
///   '#' = Block                  '=' = One-way platform
///   'H' = Ladder                 'T' = Ladder top (ladder + platform)
///   '^' = Spikes                 'F' = Flimsy (breakable) block
///   'P' = Player spawn           'X' = Exit (bottom tile of a 2-tall door)
///   'C' = Crawler                'B' = Blob
///   '+' = Health pickup          ' ' / '.' = Empty

use std::path::Path;

use crate::config::GameConfig;
use crate::domain::enemy::{Blob, Crawler, Enemy};
use crate::domain::entity::{Exit, Flimsy, Pickup, PickupKind, Sign};
use crate::domain::grid::{tile_origin, TileGrid};
use crate::domain::player::Player;
use crate::domain::tile::Tile;
use crate::error::LevelError;
use crate::sim::world::{Phase, WorldState};

/// Runtime level data (owned strings, loaded from file or embedded).
#[derive(Clone, Debug, PartialEq)]
pub struct LevelDef {
    pub name: String,
    pub next: Option<String>,
    pub signs: Vec<(i32, i32, String)>,
    pub books: Vec<(i32, i32, BookDef)>,
    pub health: Vec<(i32, i32, i32)>,
    pub rows: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BookDef {
    pub title: String,
    pub spell: String,
    pub text: String,
}

/// Everything a level map produces, before it goes into the world.
#[derive(Debug)]
pub struct LevelContent {
    pub grid: TileGrid,
    pub spawn: (i32, i32),
    pub enemies: Vec<Enemy>,
    pub pickups: Vec<Pickup>,
    pub props: Vec<Flimsy>,
    pub signs: Vec<Sign>,
    pub exit: Option<Exit>,
}

/// The ordered, validated list of playable levels.
#[derive(Clone, Debug)]
pub struct LevelSet {
    levels: Vec<LevelDef>,
}

// ══════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════

impl LevelSet {
    /// Load from the configured directory, falling back to embedded levels.
    pub fn load(config: &GameConfig) -> Result<Self, LevelError> {
        let dir = &config.levels_dir;
        let levels = if has_level_files(dir) {
            let levels = load_from_directory(dir)?;
            tracing::info!(dir = %dir.display(), count = levels.len(), "loaded levels from directory");
            levels
        } else {
            tracing::info!("using embedded levels");
            embedded_levels()?
        };
        LevelSet::new(levels)
    }

    /// Validate every map and every `next` reference up front.
    pub fn new(levels: Vec<LevelDef>) -> Result<Self, LevelError> {
        if levels.is_empty() {
            return Err(LevelError::NoLevels);
        }
        for def in &levels {
            build(def)?;
            if let Some(target) = &def.next {
                if !levels.iter().any(|l| &l.name == target) {
                    return Err(LevelError::UnknownNext {
                        level: def.name.clone(),
                        target: target.clone(),
                    });
                }
            }
        }
        Ok(LevelSet { levels })
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn get(&self, index: usize) -> Option<&LevelDef> {
        self.levels.get(index)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.levels.iter().position(|l| l.name == name)
    }

    /// Level an exit leads to: the named target, else the following level.
    /// `None` means the game is complete.
    pub fn next_after(&self, current: usize, target: Option<&str>) -> Option<usize> {
        match target {
            Some(name) => self.index_of(name),
            None => Some(current + 1).filter(|&i| i < self.levels.len()),
        }
    }
}

/// Load a level into the world state. Keeps spell progress; the player
/// starts with full starting health.
pub fn load_level(
    world: &mut WorldState,
    levels: &LevelSet,
    index: usize,
    config: &GameConfig,
) -> Result<(), LevelError> {
    let Some(def) = levels.get(index) else {
        world.phase = Phase::GameComplete;
        tracing::info!(kills = world.kills, "game complete");
        return Ok(());
    };

    let content = build(def)?;
    let (w, h) = (content.grid.width(), content.grid.height());

    world.grid = content.grid;
    world.player = Player::at_spawn(content.spawn.0, content.spawn.1, config.player.health);
    world.progress.hydrate(&mut world.player);
    world.max_health = config.player.max_health;
    world.enemies = content.enemies.into_iter().collect();
    world.pickups = content.pickups.into_iter().collect();
    world.props = content.props.into_iter().collect();
    world.spells.clear();
    world.effects.clear();
    world.signs = content.signs;
    world.exit = content.exit;

    world.current_level = index;
    world.total_levels = levels.len();
    world.level_name = def.name.clone();
    world.phase = Phase::Playing;
    world.reading = None;
    world.tick = 0;
    world.elapsed = 0.0;
    world.set_message(&def.name, 2.0);
    world.center_camera();

    tracing::info!(
        level = %def.name,
        width = w,
        height = h,
        enemies = world.enemies.len(),
        pickups = world.pickups.len(),
        props = world.props.len(),
        "level loaded"
    );
    Ok(())
}

/// Reload the current level from scratch (death or manual restart).
pub fn restart_level(world: &mut WorldState, levels: &LevelSet, config: &GameConfig) -> Result<(), LevelError> {
    load_level(world, levels, world.current_level, config)
}

// ══════════════════════════════════════════════════════════════
// Map → content
// ══════════════════════════════════════════════════════════════

pub fn build(def: &LevelDef) -> Result<LevelContent, LevelError> {
    if def.rows.is_empty() {
        return Err(LevelError::Empty { level: def.name.clone() });
    }
    let height = def.rows.len();
    let width = def.rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);

    let mut content = LevelContent {
        grid: TileGrid::new(width, height),
        spawn: (0, 0),
        enemies: vec![],
        pickups: vec![],
        props: vec![],
        signs: vec![],
        exit: None,
    };
    let mut spawn = None;

    for (y, row) in def.rows.iter().enumerate() {
        for (x, ch) in row.chars().enumerate() {
            if let Some(tile) = Tile::from_glyph(ch) {
                content.grid.set(x, y, tile);
                continue;
            }
            let (tx, ty) = (x as i32, y as i32);
            let (wx, wy) = (tile_origin(tx), tile_origin(ty));
            match ch {
                'P' => spawn = Some((tx, ty)),
                'X' => {
                    content.exit = Some(Exit {
                        x: wx,
                        y: tile_origin(ty - 1),
                        next: def.next.clone(),
                    })
                }
                'C' => content.enemies.push(Enemy::Crawler(Crawler::new(wx, wy))),
                'B' => content.enemies.push(Enemy::Blob(Blob::at_tile(tx, ty))),
                '+' => content.pickups.push(Pickup { x: wx, y: wy, kind: PickupKind::Health { amount: 1 } }),
                'F' => content.props.push(Flimsy { x: wx, y: wy }),
                glyph => {
                    return Err(LevelError::UnknownGlyph { level: def.name.clone(), glyph, x, y });
                }
            }
        }
    }

    content.spawn = spawn.ok_or_else(|| LevelError::MissingSpawn { level: def.name.clone() })?;

    for (tx, ty, text) in &def.signs {
        content.signs.push(Sign::new(tile_origin(*tx), tile_origin(*ty), text.clone()));
    }
    for (tx, ty, book) in &def.books {
        content.pickups.push(Pickup {
            x: tile_origin(*tx),
            y: tile_origin(*ty),
            kind: PickupKind::Book {
                title: book.title.clone(),
                spell: book.spell.clone(),
                text: book.text.clone(),
            },
        });
    }
    for (tx, ty, amount) in &def.health {
        content.pickups.push(Pickup {
            x: tile_origin(*tx),
            y: tile_origin(*ty),
            kind: PickupKind::Health { amount: *amount },
        });
    }

    Ok(content)
}

// ══════════════════════════════════════════════════════════════
// Single-level file parsing
// ══════════════════════════════════════════════════════════════

/// Parse a single level from text content.
pub fn parse_level_file(content: &str) -> Result<LevelDef, LevelError> {
    let mut def = LevelDef {
        name: String::new(),
        next: None,
        signs: vec![],
        books: vec![],
        health: vec![],
        rows: vec![],
    };
    let mut meta = vec![];

    for line in content.lines() {
        let in_header = def.rows.is_empty();
        if in_header && def.name.is_empty() && meta.is_empty() && line.starts_with("# ") {
            def.name = line[1..].trim().to_string();
        } else if in_header && line.starts_with("@ ") {
            meta.push(line);
        } else if in_header && line.trim().is_empty() {
            continue;
        } else {
            def.rows.push(line.trim_end_matches('\r').to_string());
        }
    }

    while def.rows.last().map_or(false, |r| r.trim().is_empty()) {
        def.rows.pop();
    }

    if def.name.is_empty() {
        def.name = "Unnamed".to_string();
    }
    for line in meta {
        parse_meta(&mut def, line)?;
    }
    if def.rows.is_empty() {
        return Err(LevelError::Empty { level: def.name });
    }

    // Pad to a rectangle
    let max_width = def.rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
    for row in &mut def.rows {
        let len = row.chars().count();
        if len < max_width {
            row.extend(std::iter::repeat(' ').take(max_width - len));
        }
    }

    Ok(def)
}

fn parse_meta(def: &mut LevelDef, line: &str) -> Result<(), LevelError> {
    let level = def.name.clone();
    let bad = |reason: &'static str| LevelError::BadMeta {
        level: level.clone(),
        line: line.to_string(),
        reason,
    };
    let body = line[2..].trim();
    let (key, rest) = body.split_once(' ').ok_or_else(|| bad("missing value"))?;
    let rest = rest.trim();

    match key {
        "next" => {
            def.next = Some(rest.to_string());
        }
        "sign" => {
            let (pos, text) = rest.split_once(' ').ok_or_else(|| bad("expected: sign x,y text"))?;
            let (x, y) = parse_pos(pos).ok_or_else(|| bad("bad coordinates"))?;
            def.signs.push((x, y, text.trim().to_string()));
        }
        "book" => {
            let (pos, fields) = rest.split_once(' ').ok_or_else(|| bad("expected: book x,y title|spell|text"))?;
            let (x, y) = parse_pos(pos).ok_or_else(|| bad("bad coordinates"))?;
            let mut parts = fields.splitn(3, '|').map(str::trim);
            let (Some(title), Some(spell), Some(text)) = (parts.next(), parts.next(), parts.next()) else {
                return Err(bad("expected: title|spell|text"));
            };
            if spell.is_empty() {
                return Err(bad("book needs a spell name"));
            }
            def.books.push((x, y, BookDef {
                title: title.to_string(),
                spell: spell.to_string(),
                text: text.to_string(),
            }));
        }
        "health" => {
            let (pos, amount) = rest.split_once(' ').ok_or_else(|| bad("expected: health x,y amount"))?;
            let (x, y) = parse_pos(pos).ok_or_else(|| bad("bad coordinates"))?;
            let amount = amount.trim().parse::<i32>().map_err(|_| bad("bad amount"))?;
            def.health.push((x, y, amount));
        }
        _ => return Err(bad("unknown key")),
    }
    Ok(())
}

fn parse_pos(s: &str) -> Option<(i32, i32)> {
    let (x, y) = s.split_once(',')?;
    let x = x.trim().parse::<i32>().ok()?;
    let y = y.trim().parse::<i32>().ok()?;
    (x >= 0 && y >= 0).then_some((x, y))
}

// ══════════════════════════════════════════════════════════════
// Directory loading (individual .txt files)
// ══════════════════════════════════════════════════════════════

fn has_level_files(dir: &Path) -> bool {
    std::fs::read_dir(dir)
        .map(|e| e.flatten().any(|f| f.path().extension().map_or(false, |x| x == "txt")))
        .unwrap_or(false)
}

fn load_from_directory(dir: &Path) -> Result<Vec<LevelDef>, LevelError> {
    let entries = std::fs::read_dir(dir).map_err(|source| LevelError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<_> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.extension().map_or(false, |e| e == "txt"))
        .collect();
    paths.sort();

    let mut levels = vec![];
    for path in paths {
        let content = std::fs::read_to_string(&path).map_err(|source| LevelError::Io {
            path: path.clone(),
            source,
        })?;
        let def = parse_level_file(&content)?;
        tracing::debug!(file = %path.display(), level = %def.name, "parsed level file");
        levels.push(def);
    }
    Ok(levels)
}

// ══════════════════════════════════════════════════════════════
// Embedded fallback levels
// ══════════════════════════════════════════════════════════════

fn embedded_levels() -> Result<Vec<LevelDef>, LevelError> {
    Ok(vec![
        make_embedded(&[
            "# First Steps",
            "@ sign 3,10 Arrows move. Space jumps; hold it to jump higher.",
            "@ sign 8,10 Down drops through thin floors.",
            "@ sign 17,10 Up and down climb ladders.",
            "@ book 19,3 Ember Primer|spark|Press J to hurl a spark. Sparks shatter cracked blocks.",
            "##############################",
            "#............................#",
            "#............................#",
            "#............................#",
            "#..................T.....#####",
            "#..................H.....F...#",
            "#..................H.....F...#",
            "#.......+..........H.....F...#",
            "#.....####.........H.....F...#",
            "#.........===......H.....F...#",
            "#.P.......^^^......H.....F.X.#",
            "##############################",
        ])?,
        make_embedded(&[
            "# Crawler Caves",
            "@ sign 5,13 Crawlers patrol ledges. Three sparks put one down.",
            "################################",
            "#..............................#",
            "#..............................#",
            "#..............................#",
            "#.....C.................+......#",
            "#....######.........T########..#",
            "#...................H..........#",
            "#...................H..........#",
            "#..T########........H...C......#",
            "#..H................H.#######..#",
            "#..H.......C........H..........#",
            "#..H......#####.....H..........#",
            "#..H................H..........#",
            "#.PH.......F.....^^^H.....C..X.#",
            "################################",
        ])?,
        make_embedded(&[
            "# Blob Hollow",
            "@ sign 4,11 Blobs hop after anything they can see.",
            "@ health 14,2 2",
            "##############################",
            "#............................#",
            "#............................#",
            "#..........=======...........#",
            "#............................#",
            "#......B..............B......#",
            "#....######......#######.....#",
            "#............................#",
            "#.........B..............#####",
            "#...====.......====......F...#",
            "#........................F...#",
            "#.P.........^^^..........F.X.#",
            "##############################",
        ])?,
    ])
}

fn make_embedded(lines: &[&str]) -> Result<LevelDef, LevelError> {
    parse_level_file(&lines.join("\n"))
}
