// Interview flow: metadata form → five generated questions → evaluation of
// each answer → summary and report.
// All LLM calls go through llm_client; no provider calls here.

pub mod extraction;
pub mod generator;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod prompts;
pub mod report;
pub mod session;
pub mod store;
pub mod summary;
