use std::fs;
use std::path::Path;

use geojson::feature::Id;
use geojson::{Feature, FeatureCollection, GeoJson};
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::config::defaults;
use crate::domain::{DepthBand, FloodPolygon, NetworkLink};
use crate::error::Error;

/// Attribute names read from the network layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkFields {
    pub id: String,
    pub width: String,
}

impl Default for NetworkFields {
    fn default() -> Self {
        Self {
            id: defaults::ID_FIELD.to_string(),
            width: defaults::WIDTH_FIELD.to_string(),
        }
    }
}

/// Attribute names read from the flood layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FloodFields {
    pub band: String,
}

impl Default for FloodFields {
    fn default() -> Self {
        Self {
            band: defaults::BAND_FIELD.to_string(),
        }
    }
}

/// Read a GeoJSON file that must hold a `FeatureCollection`
pub fn read_feature_collection(path: &Path) -> Result<FeatureCollection, Error> {
    if !path.is_file() {
        return Err(Error::InputNotFound(path.to_path_buf()));
    }

    let contents = fs::read_to_string(path)?;
    parse_feature_collection(&contents, &path.display().to_string())
}

pub(crate) fn parse_feature_collection(
    contents: &str,
    source: &str,
) -> Result<FeatureCollection, Error> {
    match contents.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(collection) => Ok(collection),
        GeoJson::Feature(_) | GeoJson::Geometry(_) => Err(Error::InvalidFeature {
            feature: source.to_string(),
            reason: "expected a FeatureCollection".to_string(),
        }),
    }
}

/// Read network links in file order
pub fn read_network(path: &Path, fields: &NetworkFields) -> Result<Vec<NetworkLink>, Error> {
    let collection = read_feature_collection(path)?;
    let links = parse_network(collection, fields)?;
    debug!(path = %path.display(), links = links.len(), "read network");
    Ok(links)
}

/// Read flood polygons in file order
///
/// Band labels are validated here, so an unknown label fails the run before
/// any join happens. A feature without geometry is kept with an empty
/// geometry and rejected when the index is built.
pub fn read_floods(path: &Path, fields: &FloodFields) -> Result<Vec<FloodPolygon>, Error> {
    let collection = read_feature_collection(path)?;
    let floods = parse_floods(collection, fields)?;
    debug!(path = %path.display(), floods = floods.len(), "read floods");
    Ok(floods)
}

pub(crate) fn parse_network(
    collection: FeatureCollection,
    fields: &NetworkFields,
) -> Result<Vec<NetworkLink>, Error> {
    collection
        .features
        .into_iter()
        .enumerate()
        .map(|(idx, feature)| parse_link(idx, feature, fields))
        .collect()
}

pub(crate) fn parse_floods(
    collection: FeatureCollection,
    fields: &FloodFields,
) -> Result<Vec<FloodPolygon>, Error> {
    collection
        .features
        .into_iter()
        .enumerate()
        .map(|(idx, feature)| parse_flood(idx, feature, fields))
        .collect()
}

fn parse_link(idx: usize, feature: Feature, fields: &NetworkFields) -> Result<NetworkLink, Error> {
    let label = format!("network feature #{idx}");

    let link_id = match feature.property(&fields.id) {
        Some(value) => as_integer(value).ok_or_else(|| Error::InvalidFeature {
            feature: label.clone(),
            reason: format!("attribute {:?} is not an integer: {value}", fields.id),
        })?,
        None => {
            return Err(Error::InvalidFeature {
                feature: label,
                reason: format!("missing id attribute {:?}", fields.id),
            });
        }
    };
    let link_label = format!("link {link_id}");

    let width = match feature.property(&fields.width) {
        Some(value) => as_number(value).ok_or_else(|| Error::InvalidWidth {
            link: link_label.clone(),
            reason: format!("attribute {:?} is not a number: {value}", fields.width),
        })?,
        None => {
            return Err(Error::InvalidWidth {
                link: link_label,
                reason: format!("missing width attribute {:?}", fields.width),
            });
        }
    };
    if !width.is_finite() || width <= 0.0 {
        return Err(Error::InvalidWidth {
            link: link_label,
            reason: format!("width must be positive, got {width}"),
        });
    }

    let geometry = feature.geometry.ok_or_else(|| Error::InvalidFeature {
        feature: link_label.clone(),
        reason: "missing geometry".to_string(),
    })?;
    let link = match geo::Geometry::<f64>::try_from(geometry)? {
        geo::Geometry::LineString(line) => NetworkLink::from_line(link_id, line, width),
        geo::Geometry::MultiLineString(lines) => NetworkLink::new(link_id, lines, width),
        other => {
            return Err(Error::InvalidFeature {
                feature: link_label,
                reason: format!("expected a linear geometry, got {}", geometry_name(&other)),
            });
        }
    };

    if link.has_empty_centerline() {
        warn!(link_id, "link has an empty centerline, its depth will be 0");
    }
    Ok(link)
}

fn parse_flood(idx: usize, feature: Feature, fields: &FloodFields) -> Result<FloodPolygon, Error> {
    let id = match &feature.id {
        Some(Id::String(s)) => s.clone(),
        Some(Id::Number(n)) => n.to_string(),
        None => idx.to_string(),
    };
    let flood_label = format!("flood {id}");

    let band: DepthBand = match feature.property(&fields.band) {
        Some(JsonValue::String(label)) => label
            .parse::<DepthBand>()
            .map_err(|e| e.with_band_context(&flood_label))?,
        Some(other) => {
            return Err(Error::InvalidFeature {
                feature: flood_label,
                reason: format!("attribute {:?} is not a string: {other}", fields.band),
            });
        }
        None => {
            return Err(Error::InvalidFeature {
                feature: flood_label,
                reason: format!("missing band attribute {:?}", fields.band),
            });
        }
    };

    let geometry = match feature.geometry {
        Some(geometry) => match geo::Geometry::<f64>::try_from(geometry)? {
            geo::Geometry::Polygon(polygon) => geo::MultiPolygon::new(vec![polygon]),
            geo::Geometry::MultiPolygon(polygons) => polygons,
            other => {
                return Err(Error::InvalidFeature {
                    feature: flood_label,
                    reason: format!("expected an areal geometry, got {}", geometry_name(&other)),
                });
            }
        },
        None => geo::MultiPolygon::new(vec![]),
    };

    Ok(FloodPolygon::new(id, geometry, band))
}

fn as_integer(value: &JsonValue) -> Option<i64> {
    match value {
        JsonValue::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_number(value: &JsonValue) -> Option<f64> {
    match value {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn geometry_name(geometry: &geo::Geometry<f64>) -> &'static str {
    match geometry {
        geo::Geometry::Point(_) => "Point",
        geo::Geometry::Line(_) => "Line",
        geo::Geometry::LineString(_) => "LineString",
        geo::Geometry::Polygon(_) => "Polygon",
        geo::Geometry::MultiPoint(_) => "MultiPoint",
        geo::Geometry::MultiLineString(_) => "MultiLineString",
        geo::Geometry::MultiPolygon(_) => "MultiPolygon",
        geo::Geometry::GeometryCollection(_) => "GeometryCollection",
        geo::Geometry::Rect(_) => "Rect",
        geo::Geometry::Triangle(_) => "Triangle",
    }
}
