pub mod band;
pub mod flood;
pub mod link;

pub use band::{DepthBand, DepthBandTable};
pub use flood::FloodPolygon;
pub use link::NetworkLink;
