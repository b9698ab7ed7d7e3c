//! Application layer - detection cycles and the HTTP service.

mod orchestrator;
pub mod server;

pub use orchestrator::{run_pipeline, App, CycleReport, ProviderSummary};
