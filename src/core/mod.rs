pub mod config;
pub mod engine;
pub mod leaderboard;
pub mod menu;
pub mod renderer;
