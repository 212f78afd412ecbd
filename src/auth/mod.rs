use crate::state::AppState;
use axum::Router;

pub mod claims;
mod dto;
pub mod handlers;
pub mod jwt;
#[cfg(test)]
pub(crate) mod memory;
pub mod middleware;
pub mod password;
pub mod repo;
mod repo_types;
pub mod services;
pub(crate) mod validation;

pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(handlers::user_routes())
        .merge(handlers::me_routes(state))
}
