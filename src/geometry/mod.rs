pub mod corridor;
pub mod index;

pub use corridor::Corridor;
pub use index::FloodIndex;
