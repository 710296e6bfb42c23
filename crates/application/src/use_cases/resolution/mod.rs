pub mod aggregator;
pub mod engine;

pub use aggregator::ResultAggregator;
pub use engine::ResolutionEngine;
