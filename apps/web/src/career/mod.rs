// Career counselling: prompts, the AI pipeline, the page flow and its handlers.
// All AI calls go through llm_client; nothing here talks to the provider directly.

pub mod flow;
pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod prompts;
