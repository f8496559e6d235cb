// Pipeline ingestion: pacing of outbound lookups

pub mod pacer;

pub use pacer::Pacer;
