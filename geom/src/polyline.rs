use std::collections::BTreeSet;
use std::fmt;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::{Distance, GPSBounds, Line, LonLat};

/// An ordered sequence of at least two locations, like the geometry of an OSM way.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PolyLine {
    pts: Vec<LonLat>,
}

impl PolyLine {
    pub fn new(pts: Vec<LonLat>) -> Result<PolyLine> {
        if pts.len() < 2 {
            bail!("Need at least two points for a PolyLine");
        }
        Ok(PolyLine { pts })
    }

    pub fn must_new(pts: Vec<LonLat>) -> PolyLine {
        PolyLine::new(pts).unwrap()
    }

    /// Convenience for building geometry from degrees, mostly in tests.
    pub fn from_degrees(pts: &[(f64, f64)]) -> Result<PolyLine> {
        PolyLine::new(pts.iter().map(|(lon, lat)| LonLat::new(*lon, *lat)).collect())
    }

    pub fn points(&self) -> &Vec<LonLat> {
        &self.pts
    }

    pub fn first_pt(&self) -> LonLat {
        self.pts[0]
    }

    pub fn last_pt(&self) -> LonLat {
        *self.pts.last().unwrap()
    }

    pub fn reversed(&self) -> PolyLine {
        let mut pts = self.pts.clone();
        pts.reverse();
        PolyLine { pts }
    }

    /// Glues another polyline onto the end. The other must begin where this one ends.
    pub fn extend(self, other: &PolyLine) -> Result<PolyLine> {
        if self.last_pt() != other.first_pt() {
            bail!(
                "Can't extend a PolyLine ending at {} with one starting at {}",
                self.last_pt(),
                other.first_pt()
            );
        }
        let mut pts = self.pts;
        pts.extend(other.pts.iter().skip(1));
        Ok(PolyLine { pts })
    }

    pub fn lines(&self) -> impl Iterator<Item = Line> + '_ {
        self.pts.windows(2).map(|pair| Line::new(pair[0], pair[1]))
    }

    pub fn length(&self) -> Distance {
        self.lines().map(|l| l.length()).sum()
    }

    /// Is the point one of the vertices? Points somewhere in the middle of a segment don't count.
    pub fn contains_pt(&self, pt: LonLat) -> bool {
        self.pts.contains(&pt)
    }

    /// Every location where the two polylines touch or cross, sorted and deduplicated.
    pub fn intersections(&self, other: &PolyLine) -> Vec<LonLat> {
        let mut hits = BTreeSet::new();
        if !self.get_bounds().intersects(&other.get_bounds()) {
            return Vec::new();
        }
        for l1 in self.lines() {
            for l2 in other.lines() {
                if let Some(pt) = l1.intersection(&l2) {
                    hits.insert(pt);
                }
            }
        }
        hits.into_iter().collect()
    }

    /// How far is the point from the closest spot along this polyline?
    pub fn dist_to_pt(&self, pt: LonLat) -> Distance {
        self.lines()
            .map(|l| l.dist_to_pt(pt))
            .min()
            .unwrap_or(Distance::ZERO)
    }

    pub fn get_bounds(&self) -> GPSBounds {
        GPSBounds::from(&self.pts)
    }
}

impl fmt::Display for PolyLine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PolyLine[")?;
        for (idx, pt) in self.pts.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "({}, {})", pt.longitude(), pt.latitude())?;
        }
        write!(f, "]")
    }
}
