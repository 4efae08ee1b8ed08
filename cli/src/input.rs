use anyhow::{bail, Result};
use geojson::{Feature, GeoJson, Value};

use atlas_checks::RouteMembers;
use geom::{LonLat, PolyLine, Polygon};

fn read_features(path: &str) -> Result<Vec<Feature>> {
    let raw_string = fs_err::read_to_string(path)?;
    let geojson = raw_string.parse::<GeoJson>()?;
    Ok(match geojson {
        GeoJson::Feature(feature) => vec![feature],
        GeoJson::FeatureCollection(collection) => collection.features,
        _ => bail!("{} doesn't contain features", path),
    })
}

fn to_pts(raw: &[Vec<f64>]) -> Vec<LonLat> {
    raw.iter()
        .filter(|pt| pt.len() >= 2)
        .map(|pt| LonLat::new(pt[0], pt[1]))
        .collect()
}

/// The outer ring of every Polygon feature, in order. Holes are ignored.
pub fn read_polygons(path: &str) -> Result<Vec<Polygon>> {
    let mut results = Vec::new();
    for feature in read_features(path)? {
        if let Some(geom) = &feature.geometry {
            let rings = match &geom.value {
                Value::Polygon(rings) => rings,
                // If there are multiple, just use the first
                Value::MultiPolygon(polygons) if !polygons.is_empty() => &polygons[0],
                _ => {
                    continue;
                }
            };
            if rings.is_empty() {
                continue;
            }
            match Polygon::new(to_pts(&rings[0])) {
                Ok(polygon) => results.push(polygon),
                Err(err) => warn!("Skipping a polygon in {}: {}", path, err),
            }
        }
    }
    Ok(results)
}

/// LineStrings are track fragments, in order. Points are stops, or platforms when their `role`
/// says so.
pub fn read_route(path: &str) -> Result<RouteMembers> {
    let mut members = RouteMembers::default();
    for feature in read_features(path)? {
        let role = feature
            .property("role")
            .and_then(|x| x.as_str())
            .unwrap_or("stop")
            .to_string();
        if let Some(geom) = feature.geometry {
            match geom.value {
                Value::LineString(pts) => match PolyLine::new(to_pts(&pts)) {
                    Ok(pl) => members.tracks.push(pl),
                    Err(err) => warn!("Skipping a track fragment in {}: {}", path, err),
                },
                Value::Point(pt) if pt.len() >= 2 => {
                    let pt = LonLat::new(pt[0], pt[1]);
                    if role == "platform" {
                        members.platforms.push(pt);
                    } else {
                        members.stops.push(pt);
                    }
                }
                _ => {}
            }
        }
    }
    info!(
        "{} has {} track fragments, {} stops, and {} platforms",
        path,
        members.tracks.len(),
        members.stops.len(),
        members.platforms.len()
    );
    Ok(members)
}

/// Every LineString, keyed by its `osm_id` property, which may be a number or a string.
pub fn read_ways(path: &str) -> Result<Vec<(i64, PolyLine)>> {
    let mut results = Vec::new();
    for feature in read_features(path)? {
        let osm_id = match feature.property("osm_id") {
            Some(serde_json::Value::Number(n)) => n.as_i64(),
            Some(serde_json::Value::String(s)) => s.parse::<i64>().ok(),
            _ => None,
        };
        let osm_id = match osm_id {
            Some(id) => id,
            None => bail!("A feature in {} is missing a numeric osm_id", path),
        };
        if let Some(geom) = feature.geometry {
            if let Value::LineString(pts) = geom.value {
                results.push((osm_id, PolyLine::new(to_pts(&pts))?));
            }
        }
    }
    Ok(results)
}
