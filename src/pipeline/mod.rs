//! Concurrency plumbing shared by discovery and enrichment.

mod events;
mod pool;

pub use events::{CategoryProgress, EventSink, Phase, PipelineEvent};
pub use pool::{cancel_pair, CancelHandle, CancelSignal, PoolSummary, PoolUpdate, WorkPool};
