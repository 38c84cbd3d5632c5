// Shared prompt fragments.
// Each service that needs AI calls defines its own prompts.rs alongside it;
// this file only holds the cross-cutting pieces.

/// Persona every careerpath prompt opens with.
pub const ADVISOR_PERSONA: &str =
    "Act as a world-class personalized career and skills advisor for Indian students.";

/// Instruction appended to every prompt that expects structured output.
pub const JSON_ONLY_INSTRUCTION: &str = "\
    You MUST respond with a single valid JSON object only. \
    Do NOT include any explanations or additional text outside the JSON. \
    Do NOT use markdown code fences.";
