use std::fmt;

use anyhow::{bail, Result};
use geo::BooleanOps;
use serde::{Deserialize, Serialize};

use crate::{Area, GPSBounds, Line, LonLat, PolyLine, TopologyError};

/// A simple polygon described by its outer ring. The first point isn't repeated at the end.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Polygon {
    pts: Vec<LonLat>,
}

/// The boolean operation to perform in `Polygon::clip`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClipType {
    /// The intersection
    And,
    /// The union
    Or,
    /// Subtract the other polygon
    Not,
    Xor,
}

/// One piece of a clipping result. Pieces that collapse after rounding back to dm7 are kept as
/// slivers, so callers can decide to ignore them.
#[derive(Clone, Debug, PartialEq)]
pub enum Clipped {
    Polygon { outer: Polygon, holes: Vec<Polygon> },
    Sliver(PolyLine),
}

impl Clipped {
    pub fn area(&self) -> Area {
        match self {
            Clipped::Polygon { outer, holes } => {
                outer.area() - holes.iter().map(|h| h.area()).sum::<Area>()
            }
            Clipped::Sliver(_) => Area::ZERO,
        }
    }
}

impl Polygon {
    /// Doesn't check for self-intersections; `validate` does that. If the last point repeats the
    /// first, it's dropped.
    pub fn new(mut pts: Vec<LonLat>) -> Result<Polygon> {
        if pts.len() > 1 && pts[0] == *pts.last().unwrap() {
            pts.pop();
        }
        if pts.len() < 3 {
            bail!("Need at least three points for a Polygon, got {}", pts.len());
        }
        Ok(Polygon { pts })
    }

    pub fn must_new(pts: Vec<LonLat>) -> Polygon {
        Polygon::new(pts).unwrap()
    }

    pub fn from_degrees(pts: &[(f64, f64)]) -> Result<Polygon> {
        Polygon::new(pts.iter().map(|(lon, lat)| LonLat::new(*lon, *lat)).collect())
    }

    pub fn points(&self) -> &Vec<LonLat> {
        &self.pts
    }

    /// Every edge, including the closing one.
    pub fn lines(&self) -> impl Iterator<Item = Line> + '_ {
        let n = self.pts.len();
        (0..n).map(move |i| Line::new(self.pts[i], self.pts[(i + 1) % n]))
    }

    pub fn get_bounds(&self) -> GPSBounds {
        GPSBounds::from(&self.pts)
    }

    /// The exact surface, independent of the ring's orientation.
    pub fn area(&self) -> Area {
        let n = self.pts.len();
        let mut twice_signed: i128 = 0;
        for i in 0..n {
            let a = self.pts[i];
            let b = self.pts[(i + 1) % n];
            twice_signed += (a.lon_dm7() as i128) * (b.lat_dm7() as i128)
                - (b.lon_dm7() as i128) * (a.lat_dm7() as i128);
        }
        Area::dm7_squared((twice_signed.abs() / 2) as i64)
    }

    /// Approximate surface in m^2, scaled for the latitude of the polygon.
    pub fn area_square_meters(&self) -> f64 {
        self.area()
            .to_square_meters_at(self.get_bounds().center().latitude())
    }

    /// Is the point inside the polygon or on its outline?
    pub fn contains_pt(&self, pt: LonLat) -> bool {
        if !self.get_bounds().contains(pt) {
            return false;
        }
        if self.lines().any(|l| l.contains_pt(pt)) {
            return true;
        }
        // Crossing number
        let (x, y) = (pt.lon_dm7() as i128, pt.lat_dm7() as i128);
        let mut inside = false;
        for l in self.lines() {
            let (x1, y1) = (l.pt1().lon_dm7() as i128, l.pt1().lat_dm7() as i128);
            let (x2, y2) = (l.pt2().lon_dm7() as i128, l.pt2().lat_dm7() as i128);
            if (y1 > y) != (y2 > y) {
                // x < x1 + (y - y1) * (x2 - x1) / (y2 - y1), without dividing
                let lhs = (x - x1) * (y2 - y1);
                let rhs = (y - y1) * (x2 - x1);
                if (y2 > y1 && lhs < rhs) || (y2 < y1 && lhs > rhs) {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Checks that the outline is a simple ring: at least three distinct points, some area, and
    /// no edges crossing or doubling back on each other.
    pub fn validate(&self) -> Result<(), TopologyError> {
        let mut pts = self.pts.clone();
        pts.dedup();
        while pts.len() > 1 && pts[0] == *pts.last().unwrap() {
            pts.pop();
        }
        if pts.len() < 3 {
            return Err(TopologyError::new(format!(
                "Polygon has only {} distinct points",
                pts.len()
            )));
        }
        let simple = Polygon { pts };
        if simple.area() == Area::ZERO {
            return Err(TopologyError::new("Polygon has no area".to_string()));
        }

        let lines: Vec<Line> = simple.lines().collect();
        let n = lines.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let adjacent = j == i + 1 || (i == 0 && j == n - 1);
                if adjacent {
                    if lines[i].overlaps_collinear(&lines[j]) {
                        return Err(TopologyError::new(format!(
                            "Polygon doubles back on itself at {}",
                            lines[i].pt2()
                        ))
                        .context(format!("between {} and {}", lines[i], lines[j])));
                    }
                } else if lines[i].intersects(&lines[j]) {
                    return Err(TopologyError::new(
                        "Polygon intersects itself".to_string(),
                    )
                    .context(format!("between {} and {}", lines[i], lines[j])));
                }
            }
        }
        Ok(())
    }

    /// Performs a boolean operation between two polygons. Both must be valid simple polygons,
    /// otherwise the result would be garbage, so a `TopologyError` is returned instead.
    pub fn clip(&self, other: &Polygon, op: ClipType) -> Result<Vec<Clipped>, TopologyError> {
        self.validate()
            .map_err(|err| err.context("clipping the first polygon".to_string()))?;
        other
            .validate()
            .map_err(|err| err.context("clipping the second polygon".to_string()))?;

        let (a, b) = (self.to_geo(), other.to_geo());
        let result = match op {
            ClipType::And => a.intersection(&b),
            ClipType::Or => a.union(&b),
            ClipType::Not => a.difference(&b),
            ClipType::Xor => a.xor(&b),
        };
        Ok(result.into_iter().filter_map(from_geo).collect())
    }

    pub fn to_geojson(&self) -> geojson::Geometry {
        let mut ring: Vec<Vec<f64>> = self
            .pts
            .iter()
            .map(|pt| vec![pt.longitude(), pt.latitude()])
            .collect();
        ring.push(ring[0].clone());
        geojson::Geometry::new(geojson::Value::Polygon(vec![ring]))
    }

    fn to_geo(&self) -> geo::Polygon<f64> {
        let coords: Vec<geo::Coordinate<f64>> = self.pts.iter().map(|pt| (*pt).into()).collect();
        geo::Polygon::new(geo::LineString::from(coords), Vec::new())
    }
}

impl fmt::Display for Polygon {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Polygon[")?;
        for (idx, pt) in self.pts.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "({}, {})", pt.longitude(), pt.latitude())?;
        }
        write!(f, "]")
    }
}

/// Rounds a ring from the boolean op back to dm7. None if nothing with two distinct points is left.
fn ring_from_geo(ring: geo::LineString<f64>) -> Option<Vec<LonLat>> {
    let mut pts: Vec<LonLat> = ring.0.into_iter().map(LonLat::from).collect();
    pts.dedup();
    while pts.len() > 1 && pts[0] == *pts.last().unwrap() {
        pts.pop();
    }
    if pts.len() < 2 {
        return None;
    }
    Some(pts)
}

fn from_geo(poly: geo::Polygon<f64>) -> Option<Clipped> {
    let (exterior, interiors) = poly.into_inner();
    let pts = ring_from_geo(exterior)?;
    if pts.len() < 3 {
        return Some(Clipped::Sliver(PolyLine::new(pts).ok()?));
    }
    let outer = Polygon { pts };
    if outer.area() == Area::ZERO {
        return Some(Clipped::Sliver(PolyLine::new(outer.pts).ok()?));
    }
    let holes = interiors
        .into_iter()
        .filter_map(ring_from_geo)
        .filter(|pts| pts.len() >= 3)
        .map(|pts| Polygon { pts })
        .collect();
    Some(Clipped::Polygon { outer, holes })
}
