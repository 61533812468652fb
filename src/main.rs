/// Entry point and game loop.

mod config;
mod domain;
mod error;
mod sim;
mod ui;

use std::fs::File;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use config::GameConfig;
use domain::entity::FrameInput;
use sim::event::GameEvent;
use sim::level::{load_level, restart_level, LevelSet};
use sim::step;
use sim::world::{Phase, WorldState};
use ui::gamepad::GamepadState;
use ui::glyphs::GlyphBook;
use ui::input::{self, InputState};
use ui::renderer::Renderer;

const FRAME_SLEEP: Duration = Duration::from_millis(5);
const LOG_FILE_ENV: &str = "TILECASTER_LOG_FILE";
const LOG_FILTER_ENV: &str = "TILECASTER_LOG";

fn main() -> anyhow::Result<()> {
    init_logging()?;

    let config = GameConfig::load();
    let levels = LevelSet::load(&config).context("loading levels")?;
    let glyphs = GlyphBook::standard();
    glyphs.validate().context("checking sprite table")?;

    let mut world = WorldState::new();
    load_level(&mut world, &levels, 0, &config).context("loading first level")?;

    let mut renderer = Renderer::new(glyphs);
    renderer.init().context("terminal init failed")?;

    let result = game_loop(&mut world, &mut renderer, &levels, &config);

    if let Err(e) = renderer.cleanup() {
        tracing::error!(error = %e, "terminal cleanup failed");
        eprintln!("Terminal cleanup failed: {e}");
    }
    result?;

    println!();
    println!("Thanks for playing Tilecaster!");
    println!(
        "Levels cleared: {}/{}  Enemies defeated: {}  Spells learned: {}",
        cleared(&world), world.total_levels, world.kills, world.progress.spells.len(),
    );
    Ok(())
}

/// The terminal is in raw mode while playing, so logs go to a file.
fn init_logging() -> anyhow::Result<()> {
    let path = std::env::var(LOG_FILE_ENV).unwrap_or_else(|_| "tilecaster.log".into());
    let file = File::create(&path).with_context(|| format!("creating log file {path}"))?;
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn cleared(world: &WorldState) -> usize {
    if world.phase == Phase::GameComplete {
        world.total_levels
    } else {
        world.current_level
    }
}

fn game_loop(
    world: &mut WorldState,
    renderer: &mut Renderer,
    levels: &LevelSet,
    config: &GameConfig,
) -> anyhow::Result<()> {
    let mut kb = InputState::new();
    kb.honor_release = renderer.enable_key_release();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    tracing::info!(gamepad = gp.connected, key_release = kb.honor_release, "input ready");

    let tick_rate = Duration::from_millis(config.timing.tick_rate_ms);
    let mut last_tick: Option<Instant> = None;
    // Edge-triggered presses seen between ticks, so none are lost.
    let mut latched = FrameInput::default();

    loop {
        kb.drain_events();
        gp.update();

        if kb.ctrl_c_pressed() {
            break;
        }
        if handle_meta(world, &kb, &gp, levels, config)? {
            break;
        }

        let held = input::merge(kb.frame_input(), gp.frame_input());
        latched.jump_pressed |= held.jump_pressed;
        latched.cast_pressed |= held.cast_pressed;

        let now = Instant::now();
        match last_tick {
            // First frame has no previous tick to measure from.
            None => last_tick = Some(now),
            Some(prev) if now.duration_since(prev) >= tick_rate => {
                let dt = now.duration_since(prev).as_secs_f64().min(config.timing.max_delta);
                last_tick = Some(now);

                let frame = FrameInput {
                    jump_pressed: latched.jump_pressed,
                    cast_pressed: latched.cast_pressed,
                    ..held
                };
                latched = FrameInput::default();

                let events = step::step(world, frame, dt, config);
                handle_events(world, &events, levels, config)?;
            }
            Some(_) => {}
        }

        renderer.render(world)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

/// Act on level transitions; everything is logged.
fn handle_events(
    world: &mut WorldState,
    events: &[GameEvent],
    levels: &LevelSet,
    config: &GameConfig,
) -> anyhow::Result<()> {
    for event in events {
        event.log();
    }
    match transition(events) {
        Some(GameEvent::ExitReached { target }) => {
            tracing::info!(level = %world.level_name, seconds = world.elapsed, "level cleared");
            // Past the last level, load_level switches to GameComplete.
            let next = levels
                .next_after(world.current_level, target.as_deref())
                .unwrap_or(levels.len());
            load_level(world, levels, next, config)?;
        }
        Some(GameEvent::RespawnDue) => restart_level(world, levels, config)?,
        _ => {
            for event in events {
                match event {
                    GameEvent::BookOpened { spell, .. } => {
                        world.set_message(&format!("Learned {spell}! Press J/X to cast"), 3.0);
                    }
                    GameEvent::HealthPicked { health, .. } => {
                        world.set_message(&format!("Health {health}/{}", config.player.max_health), 1.5);
                    }
                    _ => {}
                }
            }
        }
    }
    Ok(())
}

/// The first event that replaces the loaded level, if any.
fn transition(events: &[GameEvent]) -> Option<&GameEvent> {
    events
        .iter()
        .find(|e| matches!(e, GameEvent::ExitReached { .. } | GameEvent::RespawnDue))
}

/// Keys that act outside the simulation. Returns true to quit.
fn handle_meta(
    world: &mut WorldState,
    kb: &InputState,
    gp: &GamepadState,
    levels: &LevelSet,
    config: &GameConfig,
) -> anyhow::Result<bool> {
    let confirm = kb.any_pressed(input::KEYS_CONFIRM) || gp.confirm_pressed();
    if kb.was_pressed(input::KEY_QUIT) || gp.cancel_pressed() {
        return Ok(true);
    }

    match world.phase {
        Phase::GameComplete => return Ok(confirm),
        Phase::Reading => {
            if confirm {
                step::close_book(world);
            }
        }
        Phase::Playing => {
            // F1 (or Start on a pad): pause / resume
            if kb.was_pressed(input::KEY_PAUSE) || gp.confirm_pressed() {
                world.paused = !world.paused;
                tracing::debug!(paused = world.paused, "pause toggled");
            }
            if kb.any_pressed(input::KEYS_NEXT_SPELL) && !world.paused {
                world.player.next_spell();
                if let Some(spell) = world.player.current_spell() {
                    let msg = format!("Spell: {spell}");
                    world.set_message(&msg, 1.5);
                }
            }
            if kb.was_pressed(input::KEY_RESTART) {
                world.paused = false;
                tracing::info!(level = %world.level_name, "restart requested");
                restart_level(world, levels, config)?;
            }
        }
    }

    if kb.was_pressed(input::KEY_DEBUG) {
        world.debug = !world.debug;
    }
    Ok(false)
}
