// Engine modules: game loop timing, arcade physics, tilemaps

pub mod game_loop;
pub mod physics;
pub mod tilemap;
