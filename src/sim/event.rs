/// Events emitted during a simulation step.
/// The game loop acts on level transitions and logs the rest.

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    SpellCast { x: f64, y: f64 },
    PlayerHurt { health: i32 },
    PlayerDied,
    /// Death animation finished; the level should be reloaded.
    RespawnDue,
    EnemyKilled { kind: &'static str },
    PropDestroyed { x: f64, y: f64 },
    HealthPicked { amount: i32, health: i32 },
    BookOpened { title: String, spell: String },
    /// Player walked into the exit. `target` is the named next level.
    ExitReached { target: Option<String> },
}

impl GameEvent {
    /// Write the event to the log.
    pub fn log(&self) {
        match self {
            GameEvent::SpellCast { x, y } => tracing::trace!(x, y, "spell cast"),
            GameEvent::PlayerHurt { health } => tracing::debug!(health, "player hurt"),
            GameEvent::PlayerDied => tracing::info!("player died"),
            GameEvent::RespawnDue => tracing::info!("respawning"),
            GameEvent::EnemyKilled { kind } => tracing::info!(kind, "enemy killed"),
            GameEvent::PropDestroyed { x, y } => tracing::debug!(x, y, "prop destroyed"),
            GameEvent::HealthPicked { amount, health } => tracing::info!(amount, health, "health picked up"),
            GameEvent::BookOpened { title, spell } => tracing::info!(%title, %spell, "book picked up"),
            GameEvent::ExitReached { target } => tracing::info!(target = ?target, "exit reached"),
        }
    }
}
