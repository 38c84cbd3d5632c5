//! Flow controller: where a user is in the career journey, and the two
//! transitions that move them forward.
//!
//! The stage is derived from what is stored on the user row, never from a
//! separately tracked session flag, so it cannot drift from the data.

use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::career::models::{CareerOptions, CareerRoadmap};
use crate::career::pipeline::{plan_roadmap, suggest_careers, PipelineError};
use crate::models::user::{User, UserField};
use crate::state::AppState;

/// Where a signed-in user is in the flow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CareerStage<'a> {
    NoOptions,
    HasOptions(&'a CareerOptions),
    HasRoadmap {
        options: &'a CareerOptions,
        career: &'a str,
        roadmap: &'a CareerRoadmap,
    },
}

impl<'a> CareerStage<'a> {
    pub fn of(user: &'a User) -> Self {
        let Some(options) = user.career_result.as_deref() else {
            return CareerStage::NoOptions;
        };
        match (user.career.as_deref(), user.career_details.as_deref()) {
            // A roadmap only counts while its career is still among the stored options.
            (Some(career), Some(roadmap)) if options.contains(career) => CareerStage::HasRoadmap {
                options,
                career,
                roadmap,
            },
            _ => CareerStage::HasOptions(options),
        }
    }

    pub fn options(&self) -> Result<&'a CareerOptions, StateError> {
        match *self {
            CareerStage::NoOptions => Err(StateError::NoOptions),
            CareerStage::HasOptions(options) | CareerStage::HasRoadmap { options, .. } => {
                Ok(options)
            }
        }
    }

    pub fn roadmap(&self) -> Result<(&'a str, &'a CareerRoadmap), StateError> {
        match *self {
            CareerStage::NoOptions => Err(StateError::NoOptions),
            CareerStage::HasOptions(_) => Err(StateError::NoRoadmap),
            CareerStage::HasRoadmap {
                career, roadmap, ..
            } => Ok((career, roadmap)),
        }
    }
}

/// A request arrived before its prerequisite step was completed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("Tell us about your profile and interests first.")]
    NoOptions,

    #[error("\"{0}\" is not one of your suggested careers. Please pick one from the list.")]
    UnknownCareer(String),

    #[error("Choose a career to see its roadmap.")]
    NoRoadmap,
}

impl StateError {
    /// The page that completes the missing step.
    pub fn redirect_path(&self) -> &'static str {
        match self {
            StateError::NoOptions => "/get_started",
            StateError::UnknownCareer(_) | StateError::NoRoadmap => "/choose_career",
        }
    }
}

/// Checks that `career` is a key of the user's most recent suggestions.
pub fn validate_choice<'a>(user: &'a User, career: &str) -> Result<&'a CareerOptions, StateError> {
    let options = CareerStage::of(user).options()?;
    if !options.contains(career) {
        return Err(StateError::UnknownCareer(career.to_string()));
    }
    Ok(options)
}

/// Profile submitted: ask for suggestions and store them.
/// Nothing is written unless the AI step succeeds.
pub async fn submit_profile(
    state: &AppState,
    user_id: Uuid,
    profile: &str,
    interests: &str,
) -> Result<CareerOptions, PipelineError> {
    let options = suggest_careers(state.llm.as_ref(), &state.retry, profile, interests).await?;

    state
        .users
        .update_user_field(user_id, UserField::CareerResult(options.clone()))
        .await?;

    info!("Stored {} career options for user {user_id}", options.careers.len());
    Ok(options)
}

/// Career chosen: validate it, ask for a roadmap, then store both in one write.
/// Nothing is written unless the AI step succeeds.
pub async fn submit_choice(
    state: &AppState,
    user_id: Uuid,
    career: &str,
) -> Result<CareerRoadmap, PipelineError> {
    let user = state.users.get_user_by_id(user_id).await?;
    validate_choice(&user, career)?;

    let roadmap = plan_roadmap(state.llm.as_ref(), &state.retry, career).await?;

    state
        .users
        .update_user_field(
            user_id,
            UserField::Choice {
                career: career.to_string(),
                roadmap: roadmap.clone(),
            },
        )
        .await?;

    info!("Stored roadmap for {career} for user {user_id}");
    Ok(roadmap)
}
