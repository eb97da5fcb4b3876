//! Batch dispatch: concurrent fan-out of retrying pipelines, plus the sinks
//! that can observe their outcomes.

pub mod dispatcher;
pub mod sink;

pub use dispatcher::{DispatchOptions, Dispatcher};
pub use sink::{ChannelSink, LogSink, NoopSink, OutcomeRecord, OutcomeSink};
