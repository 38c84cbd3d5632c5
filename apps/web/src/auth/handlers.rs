//! Axum route handlers for accounts: landing, register, login, logout, profile.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Deserialize;
use tracing::{info, warn};

use crate::auth::password::{hash_password, verify_password};
use crate::career::flow::CareerStage;
use crate::errors::AppError;
use crate::models::user::NewUser;
use crate::pages::{render, LandingPage, LoginPage, PageChrome, ProfilePage, RegisterPage};
use crate::session::{
    end_session, read_session, set_flash, start_session, take_flash, CurrentUser, Flash,
    SessionData,
};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// GET /
pub async fn handle_home(jar: PrivateCookieJar) -> Redirect {
    if read_session(&jar).is_some() {
        Redirect::to("/get_started")
    } else {
        Redirect::to("/landing")
    }
}

/// GET /landing
pub async fn handle_landing(jar: PrivateCookieJar) -> Result<Response, AppError> {
    let session = read_session(&jar);
    let (jar, flash) = take_flash(jar);
    let page = LandingPage {
        chrome: PageChrome::new(session.as_ref(), flash),
    };
    Ok((jar, render(&page)?).into_response())
}

/// GET /register
pub async fn handle_register_page(jar: PrivateCookieJar) -> Result<Response, AppError> {
    let (jar, flash) = take_flash(jar);
    let page = RegisterPage {
        chrome: PageChrome::new(None, flash),
        full_name: String::new(),
        email: String::new(),
    };
    Ok((jar, render(&page)?).into_response())
}

/// POST /register
pub async fn handle_register(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    let full_name = form.full_name.trim().to_string();
    let email = form.email.trim().to_string();

    if let Some(problem) = registration_problem(&full_name, &email, &form.password) {
        return registration_failed(StatusCode::BAD_REQUEST, problem, full_name, email);
    }

    let new_user = NewUser {
        full_name: full_name.clone(),
        email: email.clone(),
        password_hash: hash_password(&form.password)?,
    };
    match state.users.create_user(new_user).await {
        Ok(user) => {
            info!("Registered user {}", user.id);
            let jar = set_flash(jar, &Flash::success("Registration successful! Please log in."));
            Ok((jar, Redirect::to("/login")).into_response())
        }
        Err(AppError::Conflict(_)) => registration_failed(
            StatusCode::CONFLICT,
            "An account with that email already exists.",
            full_name,
            email,
        ),
        Err(e) => Err(e),
    }
}

fn registration_problem(full_name: &str, email: &str, password: &str) -> Option<&'static str> {
    if full_name.is_empty() {
        Some("Please enter your full name.")
    } else if !email.contains('@') {
        Some("Please enter a valid email address.")
    } else if password.is_empty() {
        Some("Please choose a password.")
    } else {
        None
    }
}

fn registration_failed(
    status: StatusCode,
    message: &str,
    full_name: String,
    email: String,
) -> Result<Response, AppError> {
    let page = RegisterPage {
        chrome: PageChrome::new(None, Some(Flash::danger(message))),
        full_name,
        email,
    };
    Ok((status, render(&page)?).into_response())
}

/// GET /login
pub async fn handle_login_page(jar: PrivateCookieJar) -> Result<Response, AppError> {
    let (jar, flash) = take_flash(jar);
    let page = LoginPage {
        chrome: PageChrome::new(None, flash),
        email: String::new(),
    };
    Ok((jar, render(&page)?).into_response())
}

/// POST /login
pub async fn handle_login(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let user = state.users.find_user_by_email(&form.email).await?;

    match user {
        Some(user) if verify_password(&form.password, &user.password_hash) => {
            info!("User {} logged in", user.id);
            let jar = start_session(
                jar,
                &SessionData {
                    user_id: user.id,
                    full_name: user.full_name,
                },
            );
            Ok((jar, Redirect::to("/get_started")).into_response())
        }
        _ => {
            warn!("Failed login attempt");
            let page = LoginPage {
                chrome: PageChrome::new(None, Some(Flash::danger("Invalid credentials"))),
                email: form.email.trim().to_string(),
            };
            Ok((StatusCode::UNAUTHORIZED, render(&page)?).into_response())
        }
    }
}

/// GET /logout
pub async fn handle_logout(jar: PrivateCookieJar) -> (PrivateCookieJar, Redirect) {
    (end_session(jar), Redirect::to("/landing"))
}

/// GET /profile
pub async fn handle_profile(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    jar: PrivateCookieJar,
) -> Result<Response, AppError> {
    let user = state.users.get_user_by_id(session.user_id).await?;
    let stage = CareerStage::of(&user);
    let (jar, flash) = take_flash(jar);

    let page = ProfilePage {
        chrome: PageChrome::new(Some(&session), flash),
        full_name: user.full_name.clone(),
        email: user.email.clone(),
        member_since: user.created_at.format("%B %Y").to_string(),
        career: stage.roadmap().ok().map(|(career, _)| career.to_string()),
        suggestion_count: stage.options().map(|o| o.careers.len()).unwrap_or(0),
    };
    Ok((jar, render(&page)?).into_response())
}
