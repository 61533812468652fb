/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub timing: TimingConfig,
    pub physics: PhysicsConfig,
    pub player: PlayerConfig,
    pub gamepad: GamepadConfig,
    pub levels_dir: PathBuf,
}

#[derive(Clone, Debug)]
pub struct TimingConfig {
    pub tick_rate_ms: u64,
    pub max_delta: f64,  // long frames are clamped to this (seconds)
}

/// Movement tuning shared by the player controller.
#[derive(Clone, Debug, PartialEq)]
pub struct PhysicsConfig {
    pub jump_height: f64,
    pub forced_jump_height: f64, // knock-up when hurt
    pub min_jump_height: f64,    // apex of a tapped jump
    pub jump_time: f64,          // rise time of a full jump
    pub fall_time: f64,          // shorter: falls are snappier than rises
    pub coyote_time: f64,
    pub late_jump_margin: f64,   // jump buffer window
    pub run_acc: f64,            // per tick
    pub max_run_speed: f64,
    pub ladder_speed: f64,
    pub ladder_grab_allowance: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlayerConfig {
    pub health: i32,
    pub max_health: i32,
    pub take_damage_time: f64,
    pub post_damage_time: f64,
    pub death_time: f64,
    pub cast_cooldown: f64,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub jump: Vec<String>,
    pub cast: Vec<String>,
    pub confirm: Vec<String>,
    pub cancel: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    physics: TomlPhysics,
    #[serde(default)]
    player: TomlPlayer,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlTiming {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default = "default_max_delta")]
    max_delta: f64,
}

#[derive(Deserialize, Debug)]
struct TomlPhysics {
    #[serde(default = "default_jump_height")]
    jump_height: f64,
    #[serde(default = "default_forced_jump_height")]
    forced_jump_height: f64,
    #[serde(default = "default_min_jump_height")]
    min_jump_height: f64,
    #[serde(default = "default_jump_time")]
    jump_time: f64,
    #[serde(default = "default_fall_time")]
    fall_time: f64,
    #[serde(default = "default_coyote_time")]
    coyote_time: f64,
    #[serde(default = "default_late_jump_margin")]
    late_jump_margin: f64,
    #[serde(default = "default_run_acc")]
    run_acc: f64,
    #[serde(default = "default_max_run_speed")]
    max_run_speed: f64,
    #[serde(default = "default_ladder_speed")]
    ladder_speed: f64,
    #[serde(default = "default_ladder_grab_allowance")]
    ladder_grab_allowance: f64,
}

#[derive(Deserialize, Debug)]
struct TomlPlayer {
    #[serde(default = "default_health")]
    health: i32,
    #[serde(default = "default_max_health")]
    max_health: i32,
    #[serde(default = "default_take_damage_time")]
    take_damage_time: f64,
    #[serde(default = "default_post_damage_time")]
    post_damage_time: f64,
    #[serde(default = "default_death_time")]
    death_time: f64,
    #[serde(default = "default_cast_cooldown")]
    cast_cooldown: f64,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_jump_buttons")]
    jump: Vec<String>,
    #[serde(default = "default_cast_buttons")]
    cast: Vec<String>,
    #[serde(default = "default_confirm")]
    confirm: Vec<String>,
    #[serde(default = "default_cancel")]
    cancel: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_levels_dir")]
    levels_dir: String,
}

// ── Defaults ──

fn default_tick_rate() -> u64 { 16 }
fn default_max_delta() -> f64 { 0.05 }

fn default_jump_height() -> f64 { 16.0 * 3.2 }
fn default_forced_jump_height() -> f64 { 16.0 * 2.0 }
fn default_min_jump_height() -> f64 { 16.0 }
fn default_jump_time() -> f64 { 0.44 }
fn default_fall_time() -> f64 { 0.4 }
fn default_coyote_time() -> f64 { 0.16 }
fn default_late_jump_margin() -> f64 { 0.14 }
fn default_run_acc() -> f64 { 20.0 }
fn default_max_run_speed() -> f64 { 100.0 }
fn default_ladder_speed() -> f64 { 70.0 }
fn default_ladder_grab_allowance() -> f64 { 6.0 }

fn default_health() -> i32 { 6 }
fn default_max_health() -> i32 { 9 }
fn default_take_damage_time() -> f64 { 0.3 }
fn default_post_damage_time() -> f64 { 0.6 }
fn default_death_time() -> f64 { 2.0 }
fn default_cast_cooldown() -> f64 { 0.2 }

fn default_jump_buttons() -> Vec<String> { vec!["A".into()] }
fn default_cast_buttons() -> Vec<String> { vec!["X".into(), "B".into()] }
fn default_confirm() -> Vec<String> { vec!["Start".into()] }
fn default_cancel() -> Vec<String> { vec!["Select".into()] }
fn default_levels_dir() -> String { "levels".into() }

impl Default for TomlTiming {
    fn default() -> Self {
        TomlTiming {
            tick_rate_ms: default_tick_rate(),
            max_delta: default_max_delta(),
        }
    }
}

impl Default for TomlPhysics {
    fn default() -> Self {
        TomlPhysics {
            jump_height: default_jump_height(),
            forced_jump_height: default_forced_jump_height(),
            min_jump_height: default_min_jump_height(),
            jump_time: default_jump_time(),
            fall_time: default_fall_time(),
            coyote_time: default_coyote_time(),
            late_jump_margin: default_late_jump_margin(),
            run_acc: default_run_acc(),
            max_run_speed: default_max_run_speed(),
            ladder_speed: default_ladder_speed(),
            ladder_grab_allowance: default_ladder_grab_allowance(),
        }
    }
}

impl Default for TomlPlayer {
    fn default() -> Self {
        TomlPlayer {
            health: default_health(),
            max_health: default_max_health(),
            take_damage_time: default_take_damage_time(),
            post_damage_time: default_post_damage_time(),
            death_time: default_death_time(),
            cast_cooldown: default_cast_cooldown(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            jump: default_jump_buttons(),
            cast: default_cast_buttons(),
            confirm: default_confirm(),
            cancel: default_cancel(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            levels_dir: default_levels_dir(),
        }
    }
}

impl From<TomlPhysics> for PhysicsConfig {
    fn from(t: TomlPhysics) -> Self {
        PhysicsConfig {
            jump_height: t.jump_height,
            forced_jump_height: t.forced_jump_height,
            min_jump_height: t.min_jump_height,
            jump_time: t.jump_time,
            fall_time: t.fall_time,
            coyote_time: t.coyote_time,
            late_jump_margin: t.late_jump_margin,
            run_acc: t.run_acc,
            max_run_speed: t.max_run_speed,
            ladder_speed: t.ladder_speed,
            ladder_grab_allowance: t.ladder_grab_allowance,
        }
    }
}

impl From<TomlPlayer> for PlayerConfig {
    fn from(t: TomlPlayer) -> Self {
        PlayerConfig {
            health: t.health,
            max_health: t.max_health.max(1),
            take_damage_time: t.take_damage_time,
            post_damage_time: t.post_damage_time,
            death_time: t.death_time,
            cast_cooldown: t.cast_cooldown,
        }
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        TomlPhysics::default().into()
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        TomlPlayer::default().into()
    }
}

impl PhysicsConfig {
    /// Launch speed reaching `height` in `jump_time` under rise gravity.
    pub fn launch_speed(&self, height: f64) -> f64 {
        (2.0 * height) / self.jump_time
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let toml_cfg = load_toml(&search_dirs);

        // Resolve levels directory
        let levels_dir_str = &toml_cfg.general.levels_dir;
        let levels_dir = if PathBuf::from(levels_dir_str).is_absolute() {
            PathBuf::from(levels_dir_str)
        } else {
            search_dirs.iter()
                .map(|d| d.join(levels_dir_str))
                .find(|p| p.is_dir())
                .unwrap_or_else(|| PathBuf::from(levels_dir_str))
        };

        Self::from_toml(toml_cfg, levels_dir)
    }

    /// Parse a config document directly (defaults for anything missing).
    #[cfg(test)]
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        let cfg = toml::from_str::<TomlConfig>(text)?;
        let dir = PathBuf::from(&cfg.general.levels_dir);
        Ok(Self::from_toml(cfg, dir))
    }

    fn from_toml(cfg: TomlConfig, levels_dir: PathBuf) -> Self {
        let max_delta = if cfg.timing.max_delta > 0.0 {
            cfg.timing.max_delta
        } else {
            tracing::warn!(value = cfg.timing.max_delta, "timing.max_delta must be positive, using default");
            default_max_delta()
        };

        GameConfig {
            timing: TimingConfig {
                tick_rate_ms: cfg.timing.tick_rate_ms.max(1),
                max_delta,
            },
            physics: cfg.physics.into(),
            player: cfg.player.into(),
            gamepad: GamepadConfig {
                jump: cfg.gamepad.jump,
                cast: cfg.gamepad.cast,
                confirm: cfg.gamepad.confirm,
                cancel: cfg.gamepad.cancel,
            },
            levels_dir,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::from_toml(TomlConfig::default(), PathBuf::from(default_levels_dir()))
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
pub fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        // Resolve symlinks so a linked binary still finds data next to the real one.
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => {
                        tracing::info!(path = %path.display(), "loaded config");
                        return cfg;
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "config.toml parse error, using defaults");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "could not read config file");
                }
            }
        }
    }
    tracing::debug!("no config.toml found, using defaults");
    TomlConfig::default()
}
