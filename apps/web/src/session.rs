//! Sessions and flash messages, both kept in encrypted cookies.

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::Redirect,
};
use axum_extra::extract::cookie::{Cookie, Key, PrivateCookieJar, SameSite};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use uuid::Uuid;

use crate::state::AppState;

pub const SESSION_COOKIE: &str = "careerpath_session";
pub const FLASH_COOKIE: &str = "careerpath_flash";

/// What a signed-in browser carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    pub user_id: Uuid,
    pub full_name: String,
}

pub fn start_session(jar: PrivateCookieJar, data: &SessionData) -> PrivateCookieJar {
    add_json_cookie(jar, SESSION_COOKIE, data)
}

pub fn end_session(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
        .remove(Cookie::build(FLASH_COOKIE).path("/"))
}

/// Returns the session, or `None` if the cookie is absent or was not issued by us.
pub fn read_session(jar: &PrivateCookieJar) -> Option<SessionData> {
    let cookie = jar.get(SESSION_COOKIE)?;
    match serde_json::from_str(cookie.value()) {
        Ok(data) => Some(data),
        Err(e) => {
            debug!("Ignoring unreadable session cookie: {e}");
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashLevel {
    Success,
    Info,
    Danger,
}

/// A one-shot message shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Info,
            message: message.into(),
        }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Danger,
            message: message.into(),
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self.level {
            FlashLevel::Success => "flash-success",
            FlashLevel::Info => "flash-info",
            FlashLevel::Danger => "flash-danger",
        }
    }
}

/// Stores `flash` for the next request, replacing any pending one.
pub fn set_flash(jar: PrivateCookieJar, flash: &Flash) -> PrivateCookieJar {
    add_json_cookie(jar, FLASH_COOKIE, flash)
}

/// Removes and returns the pending flash, if any.
pub fn take_flash(jar: PrivateCookieJar) -> (PrivateCookieJar, Option<Flash>) {
    let Some(cookie) = jar.get(FLASH_COOKIE) else {
        return (jar, None);
    };
    let flash = serde_json::from_str(cookie.value()).ok();
    (jar.remove(Cookie::build(FLASH_COOKIE).path("/")), flash)
}

/// Adds `value` as a JSON cookie. On a serialization failure the jar is
/// returned unchanged and the error is logged.
fn add_json_cookie<T: Serialize>(
    jar: PrivateCookieJar,
    name: &'static str,
    value: &T,
) -> PrivateCookieJar {
    match serde_json::to_string(value) {
        Ok(json) => jar.add(cookie(name, json)),
        Err(e) => {
            error!("Failed to serialize {name} cookie: {e}");
            jar
        }
    }
}

fn cookie(name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Extractor for handlers that require a signed-in user.
/// Anonymous requests are redirected to `/login`.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub SessionData);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Redirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = PrivateCookieJar::<Key>::from_request_parts(parts, state)
            .await
            .map_err(|never| match never {})?;
        read_session(&jar)
            .map(CurrentUser)
            .ok_or_else(|| Redirect::to("/login"))
    }
}
