// Lookup pipeline: request pacing, per-query processing, and the cross-query fan-in

pub mod ingestion;
pub mod orchestrator;
pub mod processing;

pub use orchestrator::{LookupPipeline, LookupRun, RunSummary};
