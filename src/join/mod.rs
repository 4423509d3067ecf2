pub mod engine;
pub mod sink;

pub use engine::join;
pub use sink::{LinkDepthResult, ResultSink};
