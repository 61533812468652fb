//! Terminal front end: keyboard and gamepad input, sprites, rendering.

pub mod gamepad;
pub mod glyphs;
pub mod input;
pub mod renderer;
