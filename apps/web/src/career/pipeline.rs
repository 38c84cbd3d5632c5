//! AI pipeline: prompt builder → fetcher → extractor.

use thiserror::Error;
use tracing::info;

use crate::career::flow::StateError;
use crate::career::models::{CareerOptions, CareerRoadmap};
use crate::career::prompts::{build_options_prompt, build_roadmap_prompt};
use crate::errors::AppError;
use crate::llm_client::extract::{extract, ExtractError};
use crate::llm_client::{fetch, LlmError, RetryPolicy, TextGenerator};

/// Everything that can stop a career request from producing stored data.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Network, auth, quota or timeout failure after all retries.
    #[error("the AI service failed: {0}")]
    Provider(#[from] LlmError),

    #[error("the AI returned malformed output: {0}")]
    Parse(serde_json::Error),

    #[error("the AI response was incomplete: {0}")]
    Schema(String),

    /// The user is not at the step this request needs.
    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Store(#[from] AppError),
}

impl From<ExtractError> for PipelineError {
    fn from(e: ExtractError) -> Self {
        match e {
            ExtractError::Parse(e) => PipelineError::Parse(e),
            ExtractError::Schema(msg) => PipelineError::Schema(msg),
        }
    }
}

/// First call: careers matching a profile and interests.
pub async fn suggest_careers(
    llm: &dyn TextGenerator,
    policy: &RetryPolicy,
    profile: &str,
    interests: &str,
) -> Result<CareerOptions, PipelineError> {
    let prompt = build_options_prompt(profile, interests);
    let raw = fetch(llm, &prompt, policy).await?;

    let options = extract::<CareerOptions>(&raw, CareerOptions::REQUIRED_KEYS)?.normalized();
    if options.careers.is_empty() {
        return Err(PipelineError::Schema("no careers were suggested".to_string()));
    }

    info!("AI suggested {} careers", options.careers.len());
    Ok(options)
}

/// Second call: a roadmap for one chosen career.
pub async fn plan_roadmap(
    llm: &dyn TextGenerator,
    policy: &RetryPolicy,
    career: &str,
) -> Result<CareerRoadmap, PipelineError> {
    let prompt = build_roadmap_prompt(career);
    let raw = fetch(llm, &prompt, policy).await?;

    let roadmap: CareerRoadmap = extract(&raw, CareerRoadmap::REQUIRED_KEYS)?;

    info!(
        "AI planned a {}-step roadmap for {career}",
        roadmap.roadmap.len()
    );
    Ok(roadmap)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::career::fixtures::FIVE_STEP_ROADMAP;
    use crate::llm_client::testing::ScriptedGenerator;

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            backoff: Duration::ZERO,
            ..RetryPolicy::default()
        }
    }

    #[tokio::test]
    async fn test_suggest_careers_builds_prompt_and_extracts_options() {
        let llm = ScriptedGenerator::new(vec![Ok(
            r#"{"careers":{"Data Scientist":"Builds models from data"}}"#.to_string(),
        )]);

        let options = suggest_careers(&llm, &fast_policy(), "B.Tech CS student", "AI, music")
            .await
            .unwrap();

        let prompts = llm.prompts();
        let prompt = &prompts[0];
        assert!(prompt.contains("B.Tech CS student"));
        assert!(prompt.contains("AI, music"));
        assert!(options.contains("Data Scientist"));
    }

    #[tokio::test]
    async fn test_suggest_careers_retries_then_succeeds() {
        let llm = ScriptedGenerator::new(vec![
            Err(LlmError::EmptyContent),
            Err(LlmError::Api {
                status: 503,
                message: "overloaded".to_string(),
            }),
            Ok("```json\n{\"careers\": {\"Sound Engineer\": \"Audio\"}}\n```".to_string()),
        ]);

        let options = suggest_careers(&llm, &fast_policy(), "p", "i").await.unwrap();

        assert_eq!(llm.calls(), 3);
        assert!(options.contains("Sound Engineer"));
    }

    #[tokio::test]
    async fn test_suggest_careers_provider_failure() {
        let llm = ScriptedGenerator::new(Vec::new());

        let err = suggest_careers(&llm, &fast_policy(), "p", "i").await.unwrap_err();

        assert!(matches!(err, PipelineError::Provider(LlmError::EmptyContent)));
        assert_eq!(llm.calls(), 3);
    }

    #[tokio::test]
    async fn test_suggest_careers_malformed_reply_is_parse_error() {
        let llm = ScriptedGenerator::new(vec![Ok("Here are some careers: ...".to_string())]);

        let err = suggest_careers(&llm, &fast_policy(), "p", "i").await.unwrap_err();

        assert!(matches!(err, PipelineError::Parse(_)));
    }

    #[tokio::test]
    async fn test_suggest_careers_rejects_missing_or_empty_careers() {
        for reply in [r#"{"jobs": {}}"#, r#"{"careers": {}}"#] {
            let llm = ScriptedGenerator::new(vec![Ok(reply.to_string())]);
            let err = suggest_careers(&llm, &fast_policy(), "p", "i").await.unwrap_err();
            assert!(matches!(err, PipelineError::Schema(_)), "{reply}: {err:?}");
        }
    }

    #[tokio::test]
    async fn test_suggest_careers_trims_career_names() {
        let llm = ScriptedGenerator::new(vec![Ok(
            r#"{"careers": {" Data Scientist ": "Builds models", "   ": "nameless"}}"#.to_string(),
        )]);

        let options = suggest_careers(&llm, &fast_policy(), "p", "i").await.unwrap();

        assert!(options.contains("Data Scientist"));
        assert_eq!(options.careers.len(), 1);
    }

    #[tokio::test]
    async fn test_suggest_careers_with_only_blank_names_is_schema_error() {
        let llm = ScriptedGenerator::new(vec![Ok(r#"{"careers": {" ": "x"}}"#.to_string())]);

        let err = suggest_careers(&llm, &fast_policy(), "p", "i").await.unwrap_err();

        assert!(matches!(err, PipelineError::Schema(_)));
    }

    #[tokio::test]
    async fn test_plan_roadmap_keeps_five_steps_in_order() {
        let llm = ScriptedGenerator::new(vec![Ok(FIVE_STEP_ROADMAP.to_string())]);

        let roadmap = plan_roadmap(&llm, &fast_policy(), "Data Scientist")
            .await
            .unwrap();

        assert!(llm.prompts()[0].contains("Data Scientist"));
        assert_eq!(roadmap.roadmap.len(), 5);
        let steps: Vec<_> = roadmap.roadmap.iter().map(|s| s.step.as_str()).collect();
        assert_eq!(steps[0], "Step 1: Foundational Skills");
        assert_eq!(steps[4], "Step 5: Continued Growth");
        assert_eq!(roadmap.links.len(), 2);
    }

    #[tokio::test]
    async fn test_plan_roadmap_missing_links_is_schema_error() {
        let llm = ScriptedGenerator::new(vec![Ok(
            r#"{"summary": "s", "roadmap": []}"#.to_string()
        )]);

        let err = plan_roadmap(&llm, &fast_policy(), "Data Scientist")
            .await
            .unwrap_err();

        match err {
            PipelineError::Schema(msg) => assert!(msg.contains("links")),
            other => panic!("expected schema error, got {other:?}"),
        }
    }
}
