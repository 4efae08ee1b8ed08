//! Geometry primitives for validating OSM data. Locations are stored in dm7 (degrees * 10^7) so
//! that equality is exact and areas can be summed without floating point drift.

#[macro_use]
extern crate log;

mod area;
mod bounds;
mod distance;
mod error;
mod gps;
mod line;
mod polygon;
mod polyline;
mod ring;

pub use crate::area::Area;
pub use crate::bounds::GPSBounds;
pub use crate::distance::Distance;
pub use crate::error::{OpenRings, TopologyError};
pub use crate::gps::{LonLat, DM7_PER_DEGREE};
pub use crate::line::Line;
pub use crate::polygon::{ClipType, Clipped, Polygon};
pub use crate::polyline::PolyLine;
pub use crate::ring::Ring;

/// Meters spanned by one degree of latitude (and of longitude at the equator), using the mean
/// earth radius.
pub const METERS_PER_DEGREE: f64 = 111_194.926_644_558_73;

/// Rounds a value in degrees to dm7.
pub fn degrees_to_dm7(degrees: f64) -> i32 {
    (degrees * DM7_PER_DEGREE as f64).round() as i32
}

/// Converts dm7 back to degrees.
pub fn dm7_to_degrees(dm7: i32) -> f64 {
    (dm7 as f64) / (DM7_PER_DEGREE as f64)
}
