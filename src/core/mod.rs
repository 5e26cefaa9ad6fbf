pub mod aggregator;
pub mod collector;
pub mod sink;

pub use aggregator::{Aggregator, DEFAULT_CONCURRENCY};
pub use collector::UsageCollector;
pub use sink::{ConsoleSink, NullSink, ResultSink};
