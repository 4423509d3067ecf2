use geo::{BoundingRect, MultiPolygon, Polygon, Rect};

use super::DepthBand;

/// A flood extent polygon tagged with its depth band
#[derive(Debug, Clone)]
pub struct FloodPolygon {
    /// Feature id from the flood layer, or its position when the layer has none
    pub id: String,
    pub geometry: MultiPolygon<f64>,
    pub band: DepthBand,
}

impl FloodPolygon {
    pub fn new(id: impl Into<String>, geometry: MultiPolygon<f64>, band: DepthBand) -> Self {
        Self {
            id: id.into(),
            geometry,
            band,
        }
    }

    pub fn from_polygon(id: impl Into<String>, polygon: Polygon<f64>, band: DepthBand) -> Self {
        Self::new(id, MultiPolygon::new(vec![polygon]), band)
    }

    /// Bounding box, `None` when the geometry is empty
    pub fn bounds(&self) -> Option<Rect<f64>> {
        self.geometry.bounding_rect()
    }
}
