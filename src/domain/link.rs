use geo::{LineString, MultiLineString};

/// A network link as read from the network layer
#[derive(Debug, Clone)]
pub struct NetworkLink {
    pub link_id: i64,
    /// Path of the link in the network's planar CRS (meters)
    pub centerline: MultiLineString<f64>,
    /// Physical width in meters
    pub width: f64,
}

impl NetworkLink {
    pub fn new(link_id: i64, centerline: MultiLineString<f64>, width: f64) -> Self {
        Self {
            link_id,
            centerline,
            width,
        }
    }

    pub fn from_line(link_id: i64, line: LineString<f64>, width: f64) -> Self {
        Self::new(link_id, MultiLineString::new(vec![line]), width)
    }

    pub fn has_empty_centerline(&self) -> bool {
        self.centerline.0.iter().all(|line| line.0.is_empty())
    }
}
