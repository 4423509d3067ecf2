pub mod layer;
pub mod output;
pub mod reader;
pub mod table;

pub use layer::render_corridor_layer;
pub use output::write_artifact;
pub use reader::{FloodFields, NetworkFields, read_floods, read_network};
pub use table::render_depth_table;
