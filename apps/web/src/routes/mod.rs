pub mod health;

use axum::{routing::get, Router};

use crate::auth::handlers as auth;
use crate::career::handlers as career;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Accounts
        .route("/", get(auth::handle_home))
        .route("/landing", get(auth::handle_landing))
        .route(
            "/register",
            get(auth::handle_register_page).post(auth::handle_register),
        )
        .route("/login", get(auth::handle_login_page).post(auth::handle_login))
        .route("/logout", get(auth::handle_logout))
        .route("/profile", get(auth::handle_profile))
        // Career flow
        .route(
            "/get_started",
            get(career::handle_get_started_page).post(career::handle_get_started),
        )
        .route(
            "/choose_career",
            get(career::handle_choose_career_page).post(career::handle_choose_career),
        )
        .route(
            "/career_details",
            get(career::handle_career_details).post(career::handle_career_details),
        )
        .with_state(state)
}
