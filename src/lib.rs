pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod parser;
pub mod pipeline;
pub mod roster;
pub mod types;

// Ports the pipeline depends on, and the adapters that implement them
pub mod app;
pub mod infra;

pub mod observability;
