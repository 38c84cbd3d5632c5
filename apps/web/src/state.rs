use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;

use crate::llm_client::{RetryPolicy, TextGenerator};
use crate::store::UserStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Persistence adapter. Default: `PgUserStore`.
    pub users: Arc<dyn UserStore>,
    /// AI text generator. Default: `GeminiClient`.
    pub llm: Arc<dyn TextGenerator>,
    pub retry: RetryPolicy,
    /// Encrypts the session and flash cookies.
    pub cookie_key: Key,
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

#[cfg(test)]
impl AppState {
    /// State with a fresh cookie key and no retry backoff.
    pub fn for_tests(users: Arc<dyn UserStore>, llm: Arc<dyn TextGenerator>) -> Self {
        Self {
            users,
            llm,
            retry: RetryPolicy {
                backoff: std::time::Duration::ZERO,
                ..RetryPolicy::default()
            },
            cookie_key: Key::generate(),
        }
    }
}
