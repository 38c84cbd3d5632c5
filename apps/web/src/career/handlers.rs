//! Axum route handlers for the career pages.

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Deserialize;
use tracing::warn;

use crate::career::flow::{submit_choice, submit_profile, CareerStage, StateError};
use crate::career::pipeline::PipelineError;
use crate::errors::AppError;
use crate::markdown::render_markdown;
use crate::models::user::User;
use crate::pages::{
    render, CareerCard, CareerDetailsPage, ChooseCareerPage, GetStartedPage, PageChrome,
    RenderedStep, ResourceLink,
};
use crate::session::{set_flash, take_flash, CurrentUser, Flash, SessionData};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GetStartedForm {
    #[serde(default)]
    pub profile: String,
    #[serde(default)]
    pub interests: String,
}

#[derive(Debug, Deserialize)]
pub struct ChooseCareerForm {
    #[serde(default)]
    pub career: String,
}

/// GET /get_started
pub async fn handle_get_started_page(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    jar: PrivateCookieJar,
) -> Result<Response, AppError> {
    let user = state.users.get_user_by_id(session.user_id).await?;
    let (jar, flash) = take_flash(jar);
    let page = get_started_page(&session, &user, flash, String::new(), String::new());
    Ok((jar, render(&page)?).into_response())
}

/// POST /get_started
///
/// Runs the suggestion pipeline. On success the options are stored and the user
/// moves on to pick one; on failure the form is shown again with the error.
pub async fn handle_get_started(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    jar: PrivateCookieJar,
    Form(form): Form<GetStartedForm>,
) -> Result<Response, AppError> {
    match submit_profile(&state, session.user_id, &form.profile, &form.interests).await {
        Ok(_) => Ok(Redirect::to("/choose_career").into_response()),
        Err(PipelineError::Store(e)) => Err(e),
        Err(PipelineError::State(e)) => Ok(redirect_with_flash(jar, &e)),
        Err(e) => {
            warn!("Career suggestions failed for user {}: {e}", session.user_id);
            let user = state.users.get_user_by_id(session.user_id).await?;
            let flash = Flash::danger(format!("Error generating career suggestions: {e}"));
            let page = get_started_page(&session, &user, Some(flash), form.profile, form.interests);
            Ok((jar, render(&page)?).into_response())
        }
    }
}

/// GET /choose_career
pub async fn handle_choose_career_page(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    jar: PrivateCookieJar,
) -> Result<Response, AppError> {
    let user = state.users.get_user_by_id(session.user_id).await?;
    let (jar, flash) = take_flash(jar);
    match choose_career_page(&session, &user, flash) {
        Ok(page) => Ok((jar, render(&page)?).into_response()),
        Err(e) => Ok(redirect_with_flash(jar, &e)),
    }
}

/// POST /choose_career
///
/// Validates the choice against the stored suggestions, then runs the roadmap
/// pipeline. On failure the selection page is shown again with the error.
pub async fn handle_choose_career(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    jar: PrivateCookieJar,
    Form(form): Form<ChooseCareerForm>,
) -> Result<Response, AppError> {
    let career = form.career.trim();
    match submit_choice(&state, session.user_id, career).await {
        Ok(_) => Ok(Redirect::to("/career_details").into_response()),
        Err(PipelineError::Store(e)) => Err(e),
        Err(PipelineError::State(e)) => Ok(redirect_with_flash(jar, &e)),
        Err(e) => {
            warn!("Roadmap for {career} failed for user {}: {e}", session.user_id);
            let user = state.users.get_user_by_id(session.user_id).await?;
            let flash = Flash::danger(format!("Error generating roadmap: {e}"));
            match choose_career_page(&session, &user, Some(flash)) {
                Ok(page) => Ok((jar, render(&page)?).into_response()),
                Err(e) => Ok(redirect_with_flash(jar, &e)),
            }
        }
    }
}

/// GET|POST /career_details
pub async fn handle_career_details(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    jar: PrivateCookieJar,
) -> Result<Response, AppError> {
    let user = state.users.get_user_by_id(session.user_id).await?;
    let (career, roadmap) = match CareerStage::of(&user).roadmap() {
        Ok(found) => found,
        Err(e) => return Ok(redirect_with_flash(jar, &e)),
    };

    let (jar, flash) = take_flash(jar);
    let page = CareerDetailsPage {
        chrome: PageChrome::new(Some(&session), flash),
        career: career.to_string(),
        summary_html: render_markdown(&roadmap.summary),
        steps: roadmap
            .roadmap
            .iter()
            .map(|s| RenderedStep {
                step: s.step.clone(),
                details_html: render_markdown(&s.details),
            })
            .collect(),
        links: roadmap.links.iter().map(|l| ResourceLink::new(l)).collect(),
    };
    Ok((jar, render(&page)?).into_response())
}

fn get_started_page(
    session: &SessionData,
    user: &User,
    flash: Option<Flash>,
    profile: String,
    interests: String,
) -> GetStartedPage {
    GetStartedPage {
        chrome: PageChrome::new(Some(session), flash),
        profile,
        interests,
        has_options: CareerStage::of(user).options().is_ok(),
    }
}

fn choose_career_page(
    session: &SessionData,
    user: &User,
    flash: Option<Flash>,
) -> Result<ChooseCareerPage, StateError> {
    let stage = CareerStage::of(user);
    let options = stage.options()?;
    let chosen = stage.roadmap().ok().map(|(career, _)| career);

    Ok(ChooseCareerPage {
        chrome: PageChrome::new(Some(session), flash),
        careers: options
            .careers
            .iter()
            .map(|(name, description)| CareerCard {
                name: name.clone(),
                description: description.clone(),
                selected: chosen == Some(name.as_str()),
            })
            .collect(),
        has_roadmap: chosen.is_some(),
    })
}

/// Sends the user to the page that completes the missing step.
fn redirect_with_flash(jar: PrivateCookieJar, err: &StateError) -> Response {
    let jar = set_flash(jar, &Flash::info(err.to_string()));
    (jar, Redirect::to(err.redirect_path())).into_response()
}
