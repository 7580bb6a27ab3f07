// Pipeline: per-session orchestration of extraction → matching, with stale-run suppression.

pub mod handlers;
pub mod orchestrator;
pub mod session;
pub mod state;
