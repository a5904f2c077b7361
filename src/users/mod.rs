use axum::Router;

use crate::state::AppState;

pub mod dto;
pub mod email;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod repo;

pub fn router() -> Router<AppState> {
    handlers::user_routes()
}
