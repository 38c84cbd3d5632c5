use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Career suggestions from the first AI call, keyed by career name.
///
/// Stored as `{"careers": {...}}` in `users.career_result`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CareerOptions {
    pub careers: BTreeMap<String, String>,
}

impl CareerOptions {
    pub const REQUIRED_KEYS: &'static [&'static str] = &["careers"];

    pub fn contains(&self, career: &str) -> bool {
        self.careers.contains_key(career)
    }

    /// Trims names and descriptions and drops blank names, so stored keys
    /// match the trimmed value a form submits.
    pub fn normalized(self) -> Self {
        Self {
            careers: self
                .careers
                .into_iter()
                .filter_map(|(name, description)| {
                    let name = name.trim();
                    (!name.is_empty()).then(|| (name.to_string(), description.trim().to_string()))
                })
                .collect(),
        }
    }
}

/// One step of a roadmap. `details` is Markdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapStep {
    pub step: String,
    pub details: String,
}

/// Plan for a single chosen career, from the second AI call.
///
/// Stored in `users.career_details`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerRoadmap {
    pub summary: String,
    pub roadmap: Vec<RoadmapStep>,
    pub links: Vec<String>,
}

impl CareerRoadmap {
    pub const REQUIRED_KEYS: &'static [&'static str] = &["summary", "roadmap", "links"];
}
