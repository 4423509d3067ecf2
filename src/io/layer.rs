use geo::{BoundingRect, Rect};
use geojson::{Bbox, Feature, FeatureCollection, Geometry, JsonObject};
use serde_json::json;

use crate::error::Error;
use crate::geometry::Corridor;
use crate::io::table::ID_COLUMN;

/// Render the corridor debug layer as a GeoJSON `FeatureCollection`
///
/// Each feature carries the corridor polygon, its `edgeID` and its bounding
/// box. The collection carries the overall bounding box and a named `crs`
/// member for `crs_name` (e.g. `EPSG:27700`).
pub fn render_corridor_layer(corridors: &[Corridor], crs_name: &str) -> Result<Vec<u8>, Error> {
    let mut extent: Option<Rect<f64>> = None;

    let features = corridors
        .iter()
        .map(|corridor| {
            let bounds = corridor.geometry.bounding_rect();
            if let Some(b) = bounds {
                extent = Some(match extent {
                    Some(e) => merge(e, b),
                    None => b,
                });
            }

            let mut properties = JsonObject::new();
            properties.insert(ID_COLUMN.to_string(), json!(corridor.link_id));

            Feature {
                bbox: bounds.map(to_bbox),
                geometry: Some(Geometry::new(geojson::Value::from(&corridor.geometry))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    let mut foreign_members = JsonObject::new();
    foreign_members.insert("name".to_string(), json!("bufferedLinks"));
    foreign_members.insert("crs".to_string(), crs_member(crs_name));

    let collection = FeatureCollection {
        bbox: extent.map(to_bbox),
        features,
        foreign_members: Some(foreign_members),
    };

    Ok(serde_json::to_vec(&collection)?)
}

/// Legacy named-CRS member, e.g. `urn:ogc:def:crs:EPSG::27700`
fn crs_member(crs_name: &str) -> serde_json::Value {
    let urn = match crs_name.split_once(':') {
        Some((authority, code)) => format!("urn:ogc:def:crs:{authority}::{code}"),
        None => crs_name.to_string(),
    };
    json!({ "type": "name", "properties": { "name": urn } })
}

fn merge(a: Rect<f64>, b: Rect<f64>) -> Rect<f64> {
    Rect::new(
        geo::coord! { x: a.min().x.min(b.min().x), y: a.min().y.min(b.min().y) },
        geo::coord! { x: a.max().x.max(b.max().x), y: a.max().y.max(b.max().y) },
    )
}

fn to_bbox(rect: Rect<f64>) -> Bbox {
    vec![rect.min().x, rect.min().y, rect.max().x, rect.max().y]
}
