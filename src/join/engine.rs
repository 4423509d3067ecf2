use geo::Intersects;

use crate::domain::DepthBandTable;
use crate::geometry::{Corridor, FloodIndex};

/// Maximum flood depth over all floods that intersect a corridor
///
/// # Algorithm
/// 1. Query the index with the corridor's bounding box
/// 2. Keep candidates whose geometry truly intersects the corridor
/// 3. Reduce their band depths with a running maximum (0 when none)
///
/// Candidate order does not affect the result.
pub fn join(corridor: &Corridor, index: &FloodIndex, table: &DepthBandTable) -> f64 {
    let Some(bbox) = corridor.bounds() else {
        return 0.0;
    };

    let mut max_depth = 0.0;
    for flood in index.query(&bbox) {
        if flood.geometry.intersects(&corridor.geometry) {
            let depth = table.depth(flood.band);
            if depth > max_depth {
                max_depth = depth;
            }
        }
    }
    max_depth
}
