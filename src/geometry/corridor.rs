use geo::{BoundingRect, Buffer, MultiPolygon, Rect};

use crate::domain::NetworkLink;

/// Buffered footprint of a network link
#[derive(Debug, Clone)]
pub struct Corridor {
    pub link_id: i64,
    pub geometry: MultiPolygon<f64>,
}

impl Corridor {
    /// Buffer the link's centerline by half its width
    ///
    /// Uses the geometry engine's default buffer style (round joins and caps).
    /// The centerline must be in a planar CRS measured in meters, otherwise the
    /// width is meaningless. An empty centerline yields an empty corridor.
    pub fn build(link: &NetworkLink) -> Self {
        let geometry = link.centerline.buffer(link.width / 2.0);
        Self {
            link_id: link.link_id,
            geometry,
        }
    }

    /// Bounding box, `None` for an empty corridor
    pub fn bounds(&self) -> Option<Rect<f64>> {
        self.geometry.bounding_rect()
    }
}
