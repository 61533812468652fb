//! Game rules with no terminal or timing dependencies: terrain, collision,
//! actors, projectiles.

pub mod collision;
pub mod enemy;
pub mod entity;
pub mod geom;
pub mod grid;
pub mod player;
pub mod spell;
pub mod tile;
