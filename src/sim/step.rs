/// The step function: advances the world by one tick of `dt` seconds.
///
/// Processing order:
///   1. Player (input, kinematics, casting)
///   2. Level: exit, signs, pickups, enemies
///   3. Camera
///   4. Spell bullets
///   5. Effects
///   6. Sweep of everything marked for removal
///
/// Removals during the tick only mark arena entries; the sweep at the end
/// is the single place where collections shrink. Level transitions are not
/// performed here: they are reported as events for the game loop.

use crate::config::GameConfig;
use crate::domain::collision::Collider;
use crate::domain::entity::{Effect, EffectKind, FrameInput, PickupKind};
use crate::domain::geom::Aabb;
use crate::domain::player::DamageOutcome;
use crate::domain::spell::{BulletHit, SpellBullet};
use super::event::GameEvent;
use super::world::{BookPage, Phase, WorldState};

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step(world: &mut WorldState, input: FrameInput, dt: f64, config: &GameConfig) -> Vec<GameEvent> {
    if world.phase != Phase::Playing || world.paused { return vec![]; }

    let mut events: Vec<GameEvent> = Vec::new();
    world.tick += 1;
    world.elapsed += dt;

    if world.message_timer > 0.0 {
        world.message_timer -= dt;
        if world.message_timer <= 0.0 { world.message.clear(); }
    }

    update_player(world, input, dt, config, &mut events);
    if world.player.respawn_due() {
        events.push(GameEvent::RespawnDue);
        return events;
    }

    if check_exit(world, &mut events) { return events; }
    update_signs(world, dt);
    collect_pickups(world, config, &mut events);
    update_enemies(world, dt, config, &mut events);
    world.follow_camera();
    update_spells(world, dt, &mut events);
    update_effects(world, dt);
    sweep(world);

    events
}

// ══════════════════════════════════════════════════════════════
// Player
// ══════════════════════════════════════════════════════════════

fn update_player(world: &mut WorldState, input: FrameInput, dt: f64, config: &GameConfig, events: &mut Vec<GameEvent>) {
    let colliders = world.collider_snapshot();
    let health = world.player.health;
    let was_dying = world.player.is_dying();

    let cast = world.player.update(dt, &input, &world.grid, &colliders, &config.physics, &config.player);

    if world.player.health < health {
        events.push(GameEvent::PlayerHurt { health: world.player.health });
    }
    if !was_dying && world.player.is_dying() {
        events.push(GameEvent::PlayerDied);
    }
    if let Some(c) = cast {
        world.spells.insert(SpellBullet::new(c.x, c.y, c.vx, c.vy));
        events.push(GameEvent::SpellCast { x: c.x, y: c.y });
    }
}

/// Damage from an enemy or hazard outside the player's own update.
fn hurt_player(world: &mut WorldState, config: &GameConfig, events: &mut Vec<GameEvent>) {
    match world.player.take_damage(&config.physics, &config.player) {
        DamageOutcome::Ignored => {}
        DamageOutcome::Hurt => events.push(GameEvent::PlayerHurt { health: world.player.health }),
        DamageOutcome::Killed => {
            events.push(GameEvent::PlayerHurt { health: 0 });
            events.push(GameEvent::PlayerDied);
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Level objects
// ══════════════════════════════════════════════════════════════

fn check_exit(world: &mut WorldState, events: &mut Vec<GameEvent>) -> bool {
    if world.player.is_dying() { return false; }
    let Some(exit) = &world.exit else { return false };
    if exit.collision_box().overlaps(&world.player.collision_box()) {
        events.push(GameEvent::ExitReached { target: exit.next.clone() });
        return true;
    }
    false
}

fn update_signs(world: &mut WorldState, dt: f64) {
    let player = world.player.collision_box();
    for sign in &mut world.signs {
        sign.update(dt, &player);
    }
}

fn collect_pickups(world: &mut WorldState, config: &GameConfig, events: &mut Vec<GameEvent>) {
    if world.player.is_dying() { return; }
    let player = world.player.collision_box();
    let touched: Vec<usize> = world
        .pickups
        .iter()
        .filter(|(_, p)| p.collision_box().overlaps(&player))
        .map(|(id, _)| id)
        .collect();

    for id in touched {
        let Some(pickup) = world.pickups.get(id) else { continue };
        match pickup.kind.clone() {
            PickupKind::Health { amount } => {
                // Consumed even at full health.
                if world.player.add_health(amount, config.player.max_health) {
                    events.push(GameEvent::HealthPicked { amount, health: world.player.health });
                }
            }
            PickupKind::Book { title, spell, text } => {
                world.player.add_spell(&spell);
                world.progress.add_spell(&spell);
                events.push(GameEvent::BookOpened { title: title.clone(), spell: spell.clone() });
                world.reading = Some(BookPage { title, spell, text });
                world.phase = Phase::Reading;
            }
        }
        world.pickups.remove(id);
    }
}

fn update_enemies(world: &mut WorldState, dt: f64, config: &GameConfig, events: &mut Vec<GameEvent>) {
    let colliders = world.collider_snapshot();
    let player = world.player.collision_box();
    let mut contact = false;
    for (_, enemy) in world.enemies.iter_mut() {
        contact |= enemy.update(dt, &world.grid, &colliders, &player);
    }
    if contact && !world.player.is_dying() {
        hurt_player(world, config, events);
    }
}

/// Close the book overlay and resume play.
pub fn close_book(world: &mut WorldState) {
    if world.phase == Phase::Reading {
        world.reading = None;
        world.phase = Phase::Playing;
    }
}

// ══════════════════════════════════════════════════════════════
// Spells & effects
// ══════════════════════════════════════════════════════════════

fn update_spells(world: &mut WorldState, dt: f64, events: &mut Vec<GameEvent>) {
    let ids: Vec<usize> = world.spells.iter().map(|(id, _)| id).collect();
    for id in ids {
        // Rebuilt per bullet so two bullets never both kill the same target.
        let enemies: Vec<(usize, Aabb)> = world.enemies.iter().map(|(i, e)| (i, e.collision_box())).collect();
        let props: Vec<(usize, Aabb)> = world.props.iter().map(|(i, p)| (i, p.collision_box())).collect();

        let Some(bullet) = world.spells.get_mut(id) else { continue };
        let Some(hit) = bullet.update(dt, &world.grid, &enemies, &props) else { continue };
        let (cx, cy) = bullet.center();

        world.spells.remove(id);
        world.effects.insert(Effect::new(EffectKind::SpellHit, cx, cy));

        match hit {
            BulletHit::Expired | BulletHit::Wall => {}
            BulletHit::Enemy(eid) => {
                let Some(enemy) = world.enemies.get_mut(eid) else { continue };
                if enemy.get_hurt() {
                    let kind = enemy.name();
                    let fx = enemy.death_effect();
                    world.enemies.remove(eid);
                    world.effects.insert(fx);
                    world.kills += 1;
                    events.push(GameEvent::EnemyKilled { kind });
                }
            }
            BulletHit::Prop(pid) => {
                if let Some(prop) = world.props.get(pid) {
                    events.push(GameEvent::PropDestroyed { x: prop.x, y: prop.y });
                }
                world.props.remove(pid);
            }
        }
    }
}

fn update_effects(world: &mut WorldState, dt: f64) {
    let expired: Vec<usize> = world
        .effects
        .iter_mut()
        .filter_map(|(id, fx)| fx.update(dt).then_some(id))
        .collect();
    for id in expired {
        world.effects.remove(id);
    }
}

fn sweep(world: &mut WorldState) {
    world.enemies.sweep();
    world.spells.sweep();
    world.effects.sweep();
    world.pickups.sweep();
    world.props.sweep();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::{load_level, parse_level_file, LevelSet};

    const DT: f64 = 1.0 / 60.0;

    fn world_from(text: &str) -> (WorldState, GameConfig) {
        let def = parse_level_file(text).expect("parses");
        let set = LevelSet::new(vec![def]).expect("valid");
        let config = GameConfig::default();
        let mut world = WorldState::new();
        load_level(&mut world, &set, 0, &config).expect("loads");
        (world, config)
    }

    fn run(world: &mut WorldState, config: &GameConfig, input: FrameInput, ticks: usize) -> Vec<GameEvent> {
        let mut all = vec![];
        for _ in 0..ticks {
            all.extend(step(world, input, DT, config));
        }
        all
    }

    fn cast() -> FrameInput {
        FrameInput { cast_pressed: true, ..FrameInput::default() }
    }

    #[test]
    fn idle_world_is_stable() {
        let (mut world, config) = world_from("# Idle\n......\n..P...\n######\n");
        let before = world.player.kin;
        let events = run(&mut world, &config, FrameInput::default(), 60);
        assert!(events.is_empty());
        assert_eq!(world.player.kin.x, before.x);
        assert_eq!(world.player.kin.y, before.y);
        assert_eq!(world.tick, 60);
    }

    #[test]
    fn spell_breaks_prop_and_clears_collider() {
        let (mut world, config) = world_from("# Props\n........\n.P...F..\n########\n");
        world.progress.add_spell("spark");
        world.progress.hydrate(&mut world.player);
        assert_eq!(world.collider_snapshot().len(), 1);

        let mut events = step(&mut world, cast(), DT, &config);
        events.extend(run(&mut world, &config, FrameInput::default(), 60));
        assert!(events.iter().any(|e| matches!(e, GameEvent::PropDestroyed { .. })));
        assert!(world.props.is_empty());
        assert!(world.collider_snapshot().is_empty());
        assert!(world.spells.is_empty());
    }

    #[test]
    fn spell_kills_crawler_after_three_hits() {
        let (mut world, config) = world_from("# Kill\n..........\n.P.....C..\n##########\n");
        world.player.add_spell("spark");
        let mut events = vec![];
        for _ in 0..3 {
            events.extend(step(&mut world, cast(), DT, &config));
            events.extend(run(&mut world, &config, FrameInput::default(), 40));
        }
        assert!(events.contains(&GameEvent::EnemyKilled { kind: "crawler" }));
        assert!(world.enemies.is_empty());
        assert_eq!(world.kills, 1);
    }

    #[test]
    fn effects_expire() {
        let (mut world, config) = world_from("# Fx\n....\n.P..\n####\n");
        world.effects.insert(Effect::new(EffectKind::BlobDeath, 0.0, 0.0));
        run(&mut world, &config, FrameInput::default(), 30);
        assert_eq!(world.effects.len(), 1);
        run(&mut world, &config, FrameInput::default(), 10);
        assert!(world.effects.is_empty());
    }

    #[test]
    fn crawler_contact_hurts_player() {
        let (mut world, config) = world_from("# Ouch\n......\n..CP..\n######\n");
        let events = run(&mut world, &config, FrameInput::default(), 40);
        assert!(events.iter().any(|e| matches!(e, GameEvent::PlayerHurt { .. })));
        assert_eq!(world.player.health, config.player.health - 1);
    }

    #[test]
    fn health_pickup_restores_and_is_consumed() {
        let (mut world, config) = world_from("# Heal\n......\n.P+...\n######\n");
        world.player.health = 3;
        let right = FrameInput { right: true, ..FrameInput::default() };
        let events = run(&mut world, &config, right, 30);
        assert!(events.contains(&GameEvent::HealthPicked { amount: 1, health: 4 }));
        assert!(world.pickups.is_empty());
    }

    #[test]
    fn book_opens_overlay_and_pauses() {
        let (mut world, config) = world_from("# Book\n@ book 2,1 Tome|spark|Words\n......\n.P....\n######\n");
        let events = run(&mut world, &config, FrameInput { right: true, ..FrameInput::default() }, 30);
        assert!(events.iter().any(|e| matches!(e, GameEvent::BookOpened { .. })));
        assert_eq!(world.phase, Phase::Reading);
        assert_eq!(world.player.current_spell(), Some("spark"));
        assert_eq!(world.progress.spells, vec!["spark".to_string()]);

        let tick = world.tick;
        run(&mut world, &config, FrameInput::default(), 10);
        assert_eq!(world.tick, tick, "simulation waits while reading");
        close_book(&mut world);
        assert_eq!(world.phase, Phase::Playing);
        assert!(world.reading.is_none());
    }

    #[test]
    fn exit_is_reported() {
        let (mut world, config) = world_from("# Door\n@ next Door\n......\n.P.X..\n######\n");
        let right = FrameInput { right: true, ..FrameInput::default() };
        let events = run(&mut world, &config, right, 30);
        assert!(events.contains(&GameEvent::ExitReached { target: Some("Door".into()) }));
    }

    #[test]
    fn death_leads_to_respawn() {
        let (mut world, config) = world_from("# Spikes\n......\n.P^...\n######\n");
        world.player.health = 1;
        let right = FrameInput { right: true, ..FrameInput::default() };
        let mut events = run(&mut world, &config, right, 30);
        assert!(events.contains(&GameEvent::PlayerDied));
        events.extend(run(&mut world, &config, FrameInput::default(), 130));
        assert!(events.contains(&GameEvent::RespawnDue));
    }

    #[test]
    fn paused_world_does_not_advance() {
        let (mut world, config) = world_from("# Pause\n....\n.P..\n####\n");
        world.paused = true;
        run(&mut world, &config, FrameInput::default(), 10);
        assert_eq!(world.tick, 0);
    }
}
