use serde::{Deserialize, Serialize};

use crate::{Distance, LonLat, Polygon, DM7_PER_DEGREE, METERS_PER_DEGREE};

/// An axis-aligned rectangle in dm7.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GPSBounds {
    pub min_lon: i32,
    pub min_lat: i32,
    pub max_lon: i32,
    pub max_lat: i32,
}

impl GPSBounds {
    /// An empty box, which `update` will grow.
    pub fn new() -> GPSBounds {
        GPSBounds {
            min_lon: i32::MAX,
            min_lat: i32::MAX,
            max_lon: i32::MIN,
            max_lat: i32::MIN,
        }
    }

    pub fn from(pts: &[LonLat]) -> GPSBounds {
        let mut b = GPSBounds::new();
        for pt in pts {
            b.update(*pt);
        }
        b
    }

    pub fn from_corners(lower_left: LonLat, upper_right: LonLat) -> GPSBounds {
        GPSBounds::from(&[lower_left, upper_right])
    }

    pub fn is_empty(&self) -> bool {
        self.min_lon > self.max_lon || self.min_lat > self.max_lat
    }

    pub fn update(&mut self, pt: LonLat) {
        self.min_lon = self.min_lon.min(pt.lon_dm7());
        self.max_lon = self.max_lon.max(pt.lon_dm7());
        self.min_lat = self.min_lat.min(pt.lat_dm7());
        self.max_lat = self.max_lat.max(pt.lat_dm7());
    }

    pub fn union(&mut self, other: GPSBounds) {
        if other.is_empty() {
            return;
        }
        self.update(other.lower_left());
        self.update(other.upper_right());
    }

    pub fn lower_left(&self) -> LonLat {
        LonLat::from_dm7(self.min_lon, self.min_lat)
    }

    pub fn upper_right(&self) -> LonLat {
        LonLat::from_dm7(self.max_lon, self.max_lat)
    }

    pub fn center(&self) -> LonLat {
        LonLat::center(&[self.lower_left(), self.upper_right()])
    }

    pub fn contains(&self, pt: LonLat) -> bool {
        pt.lon_dm7() >= self.min_lon
            && pt.lon_dm7() <= self.max_lon
            && pt.lat_dm7() >= self.min_lat
            && pt.lat_dm7() <= self.max_lat
    }

    /// Is the other box entirely inside this one? Shared edges are fine.
    pub fn fully_encloses(&self, other: &GPSBounds) -> bool {
        !other.is_empty()
            && self.min_lon <= other.min_lon
            && self.min_lat <= other.min_lat
            && self.max_lon >= other.max_lon
            && self.max_lat >= other.max_lat
    }

    /// Do the boxes share some positive area? Boxes only touching along an edge don't overlap.
    pub fn overlaps(&self, other: &GPSBounds) -> bool {
        self.min_lon < other.max_lon
            && other.min_lon < self.max_lon
            && self.min_lat < other.max_lat
            && other.min_lat < self.max_lat
    }

    /// Like `overlaps`, but touching counts.
    pub fn intersects(&self, other: &GPSBounds) -> bool {
        self.min_lon <= other.max_lon
            && other.min_lon <= self.max_lon
            && self.min_lat <= other.max_lat
            && other.min_lat <= self.max_lat
    }

    /// Grows the box by some distance in every direction. Longitude is scaled for the latitude
    /// farthest from the equator, so the result covers at least `dist` everywhere. Clamped to the
    /// valid range of coordinates.
    pub fn expand(&self, dist: Distance) -> GPSBounds {
        if self.is_empty() {
            return *self;
        }
        let dist = dist.inner_meters().max(0.0);
        let dm7_per_meter = (DM7_PER_DEGREE as f64) / METERS_PER_DEGREE;
        let delta_lat = (dist * dm7_per_meter).ceil() as i64;

        let min_lat = (self.min_lat as i64 - delta_lat).max(-90 * DM7_PER_DEGREE);
        let max_lat = (self.max_lat as i64 + delta_lat).min(90 * DM7_PER_DEGREE);
        let extreme_lat = (min_lat.abs().max(max_lat.abs()) as f64) / (DM7_PER_DEGREE as f64);
        let cos = extreme_lat.to_radians().cos();
        let (min_lon, max_lon) = if cos < 1e-9 {
            (-180 * DM7_PER_DEGREE, 180 * DM7_PER_DEGREE)
        } else {
            let delta_lon = (dist * dm7_per_meter / cos).ceil() as i64;
            (
                (self.min_lon as i64 - delta_lon).max(-180 * DM7_PER_DEGREE),
                (self.max_lon as i64 + delta_lon).min(180 * DM7_PER_DEGREE),
            )
        };

        GPSBounds {
            min_lon: min_lon as i32,
            min_lat: min_lat as i32,
            max_lon: max_lon as i32,
            max_lat: max_lat as i32,
        }
    }

    pub fn get_corners(&self) -> Vec<LonLat> {
        vec![
            LonLat::from_dm7(self.min_lon, self.min_lat),
            LonLat::from_dm7(self.max_lon, self.min_lat),
            LonLat::from_dm7(self.max_lon, self.max_lat),
            LonLat::from_dm7(self.min_lon, self.max_lat),
        ]
    }

    /// Panics if the box is degenerate.
    pub fn to_polygon(&self) -> Polygon {
        Polygon::must_new(self.get_corners())
    }
}

impl Default for GPSBounds {
    fn default() -> Self {
        GPSBounds::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_excludes_shared_edges() {
        let left = GPSBounds::from_corners(LonLat::new(0.0, 0.0), LonLat::new(1.0, 1.0));
        let right = GPSBounds::from_corners(LonLat::new(1.0, 0.0), LonLat::new(2.0, 1.0));
        assert!(!left.overlaps(&right));
        assert!(left.intersects(&right));
        assert!(left.expand(Distance::ONE_METER).overlaps(&right));
    }

    #[test]
    fn expand_covers_the_distance() {
        let b = GPSBounds::from_corners(LonLat::new(10.0, 60.0), LonLat::new(11.0, 61.0));
        let bigger = b.expand(Distance::kilometers(1.0));
        assert!(bigger.fully_encloses(&b));
        // Roughly 1km north
        let north = LonLat::from_dm7(b.max_lon, bigger.max_lat);
        let dist = b.upper_right().gps_dist_meters(north);
        assert!(dist >= Distance::meters(999.0) && dist <= Distance::meters(1001.0));
        // Longitude grows more than latitude this far north
        assert!(bigger.max_lon - b.max_lon > bigger.max_lat - b.max_lat);
    }

    #[test]
    fn expand_clamps_at_the_poles() {
        let b = GPSBounds::from_corners(LonLat::new(179.9, 89.9), LonLat::new(180.0, 90.0));
        let bigger = b.expand(Distance::kilometers(50.0));
        assert_eq!(bigger.max_lat, 90 * DM7_PER_DEGREE as i32);
        assert_eq!(bigger.max_lon, 180 * DM7_PER_DEGREE as i32);
        assert_eq!(bigger.min_lon, -180 * DM7_PER_DEGREE as i32);
    }
}
