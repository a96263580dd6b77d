// Interview engine: résumé analysis, per-round questions, answer scoring,
// round progression and the final report.
// All model calls go through llm_client; nothing here holds session state.

pub mod handlers;
pub mod models;
pub mod orchestrator;
pub mod prompts;
pub mod resume_text;
pub mod rounds;
pub mod scoring;
