/// Load-time errors. Anything here aborts startup (or a level switch)
/// with a message; nothing in the tick loop produces these.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level '{level}' has no spawn point (P)")]
    MissingSpawn { level: String },

    #[error("level '{level}' has no map rows")]
    Empty { level: String },

    #[error("level '{level}': unknown glyph '{glyph}' at column {x}, row {y}")]
    UnknownGlyph { level: String, glyph: char, x: usize, y: usize },

    #[error("level '{level}': exit leads to unknown level '{target}'")]
    UnknownNext { level: String, target: String },

    #[error("level '{level}': bad metadata line '{line}': {reason}")]
    BadMeta { level: String, line: String, reason: &'static str },

    #[error("no levels found")]
    NoLevels,

    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("no glyph registered for sprite '{0}'")]
    UnknownSprite(String),
}
