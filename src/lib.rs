pub mod app;
pub mod config;
pub mod recipes;
pub mod state;
pub mod users;
