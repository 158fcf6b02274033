pub mod config;
pub mod errors;
pub mod interview;
pub mod llm_client;
pub mod log_inspect;
pub mod logging;
pub mod routes;
pub mod state;
