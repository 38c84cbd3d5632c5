// Career prompt builders.
// User text is inserted verbatim and exactly once; no validation is applied.

use crate::llm_client::prompts::{ADVISOR_PERSONA, JSON_ONLY_INSTRUCTION};

/// Prompt for the first call: every career relevant to the profile and interests.
pub fn build_options_prompt(profile: &str, interests: &str) -> String {
    format!(
        r#"{ADVISOR_PERSONA}
Your goal is to provide a suitable career path based on the user's profile and interests.

List all careers related to the user's interests and profile.

User Profile: {profile}
User Interests: {interests}

Return a JSON object with this EXACT structure:
{{
  "careers": {{
    "career_name": "About the career (description, relevance, opportunities, expected salary range, growth prospects)"
  }}
}}

{JSON_ONLY_INSTRUCTION}"#
    )
}

/// Prompt for the second call: a five step roadmap for the chosen career.
pub fn build_roadmap_prompt(career: &str) -> String {
    format!(
        r#"{ADVISOR_PERSONA}
Your goal is to provide a detailed, realistic, and actionable career roadmap.

Suggest a detailed career roadmap for {career}. Include skills, courses, and steps to achieve it.

Return a JSON object with this EXACT structure (the "details" fields may use Markdown):
{{
  "summary": "A brief summary of the career, including its relevance and opportunities, expected salary range, and growth prospects.",
  "roadmap": [
    {{"step": "Step 1: Foundational Skills", "details": "Foundational skills with actionable suggestions, e.g. 'Learn Python and data structures'."}},
    {{"step": "Step 2: Core Concepts", "details": "Core concepts to master, e.g. 'Master machine learning algorithms'."}},
    {{"step": "Step 3: Advanced Training & Projects", "details": "Advanced courses, certifications, and portfolio projects."}},
    {{"step": "Step 4: Job Preparation", "details": "Resume building, interview practice, and networking."}},
    {{"step": "Step 5: Continued Growth", "details": "How to stay relevant and keep developing professionally."}}
  ],
  "links": ["Links to relevant courses, resources and communities."]
}}

{JSON_ONLY_INSTRUCTION}"#
    )
}
