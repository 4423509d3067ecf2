use std::collections::HashMap;

use geo::MultiPolygon;
use tracing::warn;

use crate::geometry::Corridor;

/// Maximum flood depth found for one link
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkDepthResult {
    pub link_id: i64,
    pub max_depth: f64,
}

/// Accumulates join results in network order for the two output artifacts
///
/// Owned by the pipeline for the duration of a run.
#[derive(Debug, Default)]
pub struct ResultSink {
    depths: Vec<LinkDepthResult>,
    corridors: Vec<Corridor>,
    positions: HashMap<i64, usize>,
    duplicates: usize,
}

impl ResultSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            depths: Vec::with_capacity(capacity),
            corridors: Vec::with_capacity(capacity),
            positions: HashMap::with_capacity(capacity),
            duplicates: 0,
        }
    }

    /// Record a link's result
    ///
    /// A repeated link id replaces the earlier result in place and is logged.
    pub fn record(&mut self, link_id: i64, max_depth: f64, geometry: MultiPolygon<f64>) {
        let result = LinkDepthResult { link_id, max_depth };
        let corridor = Corridor { link_id, geometry };

        if let Some(&pos) = self.positions.get(&link_id) {
            warn!(
                link_id,
                previous_depth = self.depths[pos].max_depth,
                depth = max_depth,
                "duplicate link id, overwriting earlier result"
            );
            self.duplicates += 1;
            self.depths[pos] = result;
            self.corridors[pos] = corridor;
            return;
        }

        self.positions.insert(link_id, self.depths.len());
        self.depths.push(result);
        self.corridors.push(corridor);
    }

    /// Rows of the depth table, in network order
    pub fn depth_table(&self) -> &[LinkDepthResult] {
        &self.depths
    }

    /// Corridors of the debug layer, in network order
    pub fn corridor_layer(&self) -> &[Corridor] {
        &self.corridors
    }

    /// Number of records that overwrote an earlier one
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    /// Links with a depth above zero
    pub fn flooded(&self) -> usize {
        self.depths.iter().filter(|r| r.max_depth > 0.0).count()
    }

    pub fn len(&self) -> usize {
        self.depths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }
}
