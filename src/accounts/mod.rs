use crate::state::AppState;
use axum::Router;

pub mod availability;
mod dto;
pub mod handlers;
pub mod pages;
pub mod password;
pub mod repo;
mod repo_types;
pub mod services;
pub mod session;
mod views;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::api_routes())
        .merge(pages::page_routes())
}
