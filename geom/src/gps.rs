use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{degrees_to_dm7, dm7_to_degrees, Distance, GPSBounds};

pub const DM7_PER_DEGREE: i64 = 10_000_000;

const MAX_LONGITUDE_DM7: i32 = 180 * DM7_PER_DEGREE as i32;
const MAX_LATITUDE_DM7: i32 = 90 * DM7_PER_DEGREE as i32;

/// A location on the globe. Longitude is x, latitude is y. Both are stored as dm7 integers, so two
/// locations are equal only when they're identical at 7 decimal places.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LonLat {
    lon_dm7: i32,
    lat_dm7: i32,
}

impl LonLat {
    /// Rounds degrees to dm7. Out-of-range values are clamped to the valid range.
    pub fn new(lon: f64, lat: f64) -> LonLat {
        LonLat::from_dm7(degrees_to_dm7(lon), degrees_to_dm7(lat))
    }

    pub fn from_dm7(lon_dm7: i32, lat_dm7: i32) -> LonLat {
        LonLat {
            lon_dm7: lon_dm7.clamp(-MAX_LONGITUDE_DM7, MAX_LONGITUDE_DM7),
            lat_dm7: lat_dm7.clamp(-MAX_LATITUDE_DM7, MAX_LATITUDE_DM7),
        }
    }

    pub fn longitude(self) -> f64 {
        dm7_to_degrees(self.lon_dm7)
    }

    pub fn latitude(self) -> f64 {
        dm7_to_degrees(self.lat_dm7)
    }

    pub fn lon_dm7(self) -> i32 {
        self.lon_dm7
    }

    pub fn lat_dm7(self) -> i32 {
        self.lat_dm7
    }

    /// Haversine distance
    pub fn gps_dist_meters(self, other: LonLat) -> Distance {
        let earth_radius_m = 6_371_000.0;
        let lon1 = self.longitude().to_radians();
        let lon2 = other.longitude().to_radians();
        let lat1 = self.latitude().to_radians();
        let lat2 = other.latitude().to_radians();

        let delta_lat = lat2 - lat1;
        let delta_lon = lon2 - lon1;

        let a = (delta_lat / 2.0).sin().powi(2)
            + (delta_lon / 2.0).sin().powi(2) * lat1.cos() * lat2.cos();
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        Distance::meters(earth_radius_m * c)
    }

    /// A zero-area bounding box around this point.
    pub fn bounds(self) -> GPSBounds {
        GPSBounds::from(&[self])
    }

    pub fn center(pts: &[LonLat]) -> LonLat {
        assert!(!pts.is_empty());
        let mut lon = 0;
        let mut lat = 0;
        for pt in pts {
            lon += pt.lon_dm7 as i64;
            lat += pt.lat_dm7 as i64;
        }
        let len = pts.len() as i64;
        LonLat::from_dm7((lon / len) as i32, (lat / len) as i32)
    }
}

impl fmt::Display for LonLat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "LonLat({0}, {1})", self.longitude(), self.latitude())
    }
}

impl From<LonLat> for geo::Coordinate<f64> {
    fn from(pt: LonLat) -> Self {
        geo::Coordinate {
            x: pt.longitude(),
            y: pt.latitude(),
        }
    }
}

impl From<geo::Coordinate<f64>> for LonLat {
    fn from(coord: geo::Coordinate<f64>) -> Self {
        LonLat::new(coord.x, coord.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dm7_rounding_makes_equality_exact() {
        let a = LonLat::new(-122.123_456_71, 47.5);
        let b = LonLat::new(-122.123_456_74, 47.500_000_001);
        assert_eq!(a, b);
        assert_eq!(a.lon_dm7(), -1_221_234_567);
        assert_ne!(a, LonLat::new(-122.123_456_8, 47.5));
    }

    #[test]
    fn haversine_one_degree_of_latitude() {
        let dist = LonLat::new(0.0, 0.0).gps_dist_meters(LonLat::new(0.0, 1.0));
        assert!((dist.inner_meters() - crate::METERS_PER_DEGREE).abs() < 0.01);
    }
}
