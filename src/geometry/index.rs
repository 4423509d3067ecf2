use geo::Rect;
use rstar::{AABB, RTree, RTreeObject};
use tracing::debug;

use crate::domain::FloodPolygon;
use crate::error::Error;

/// A flood's bounding box in the R-tree, associated with the flood by position.
#[derive(Debug, Clone)]
struct FloodEnvelope {
    idx: usize,
    bbox: Rect<f64>,
}

impl RTreeObject for FloodEnvelope {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.bbox.min().into(), self.bbox.max().into())
    }
}

/// Read-only bounding-box index over the flood polygons
///
/// Built once with a bulk load; never modified afterwards.
#[derive(Debug)]
pub struct FloodIndex {
    floods: Vec<FloodPolygon>,
    tree: RTree<FloodEnvelope>,
}

impl FloodIndex {
    /// Index every flood by its bounding box
    ///
    /// Fails on the first flood with an empty geometry: it could never be
    /// returned by a query, so results would silently miss it.
    pub fn build(floods: Vec<FloodPolygon>) -> Result<Self, Error> {
        let envelopes = floods
            .iter()
            .enumerate()
            .map(|(idx, flood)| {
                flood
                    .bounds()
                    .map(|bbox| FloodEnvelope { idx, bbox })
                    .ok_or_else(|| Error::EmptyGeometry {
                        flood: flood.id.clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(floods = envelopes.len(), "bulk loading flood index");

        Ok(Self {
            floods,
            tree: RTree::bulk_load(envelopes),
        })
    }

    /// Floods whose bounding box intersects `bbox`, touching edges included
    pub fn query(&self, bbox: &Rect<f64>) -> impl Iterator<Item = &FloodPolygon> + '_ {
        let search = AABB::from_corners(bbox.min().into(), bbox.max().into());
        self.tree
            .locate_in_envelope_intersecting(&search)
            .map(|envelope| &self.floods[envelope.idx])
    }

    pub fn floods(&self) -> &[FloodPolygon] {
        &self.floods
    }

    pub fn len(&self) -> usize {
        self.floods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.floods.is_empty()
    }
}
