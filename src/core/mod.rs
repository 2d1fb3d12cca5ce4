pub mod autoscroll;
pub mod identity;
pub mod record;
pub mod sse;
pub mod store;
pub mod stream;

pub use autoscroll::{AutoScroll, ScrollMetrics};
pub use record::LogRecord;
pub use store::LogStore;
pub use stream::{LiveLogStream, StreamMessage};
