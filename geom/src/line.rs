use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Distance, LonLat, METERS_PER_DEGREE};

/// Segment, technically. Predicates work on the dm7 integers, so they're exact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Line(LonLat, LonLat);

impl Line {
    pub fn new(pt1: LonLat, pt2: LonLat) -> Line {
        Line(pt1, pt2)
    }

    pub fn pt1(&self) -> LonLat {
        self.0
    }

    pub fn pt2(&self) -> LonLat {
        self.1
    }

    pub fn reversed(&self) -> Line {
        Line(self.1, self.0)
    }

    pub fn length(&self) -> Distance {
        self.0.gps_dist_meters(self.1)
    }

    /// Is the point somewhere on the segment, endpoints included?
    pub fn contains_pt(&self, pt: LonLat) -> bool {
        on_segment(self, pt)
    }

    /// Do the segments share any point, including endpoints and collinear overlaps?
    pub fn intersects(&self, other: &Line) -> bool {
        let o1 = orientation(self.0, self.1, other.0);
        let o2 = orientation(self.0, self.1, other.1);
        let o3 = orientation(other.0, other.1, self.0);
        let o4 = orientation(other.0, other.1, self.1);

        if o1 != o2 && o3 != o4 {
            return true;
        }
        (o1 == 0 && on_segment(self, other.0))
            || (o2 == 0 && on_segment(self, other.1))
            || (o3 == 0 && on_segment(other, self.0))
            || (o4 == 0 && on_segment(other, self.1))
    }

    /// Is there a collinear stretch shared by both segments, longer than a single point?
    pub fn overlaps_collinear(&self, other: &Line) -> bool {
        if orientation(self.0, self.1, other.0) != 0 || orientation(self.0, self.1, other.1) != 0 {
            return false;
        }
        let shared = [self.0, self.1, other.0, other.1]
            .into_iter()
            .filter(|pt| on_segment(self, *pt) && on_segment(other, *pt))
            .collect::<std::collections::BTreeSet<_>>();
        shared.len() >= 2
    }

    /// Finds where the segments meet. Endpoints and collinear overlaps are returned exactly;
    /// proper crossings are rounded to dm7.
    pub fn intersection(&self, other: &Line) -> Option<LonLat> {
        if !self.intersects(other) {
            return None;
        }
        for pt in [self.0, self.1] {
            if on_segment(other, pt) {
                return Some(pt);
            }
        }
        for pt in [other.0, other.1] {
            if on_segment(self, pt) {
                return Some(pt);
            }
        }

        let (x1, y1) = (self.0.lon_dm7() as f64, self.0.lat_dm7() as f64);
        let (x2, y2) = (self.1.lon_dm7() as f64, self.1.lat_dm7() as f64);
        let (x3, y3) = (other.0.lon_dm7() as f64, other.0.lat_dm7() as f64);
        let (x4, y4) = (other.1.lon_dm7() as f64, other.1.lat_dm7() as f64);
        let denom = (x1 - x2) * (y3 - y4) - (y1 - y2) * (x3 - x4);
        if denom == 0.0 {
            return None;
        }
        let t = ((x1 - x3) * (y3 - y4) - (y1 - y3) * (x3 - x4)) / denom;
        Some(LonLat::from_dm7(
            (x1 + t * (x2 - x1)).round() as i32,
            (y1 + t * (y2 - y1)).round() as i32,
        ))
    }

    /// The shortest distance from the point to any point on the segment. Uses a local
    /// equirectangular projection around the point, which is plenty for snapping distances.
    pub fn dist_to_pt(&self, pt: LonLat) -> Distance {
        let cos = pt.latitude().to_radians().cos();
        let project = |p: LonLat| {
            (
                (p.longitude() - pt.longitude()) * cos * METERS_PER_DEGREE,
                (p.latitude() - pt.latitude()) * METERS_PER_DEGREE,
            )
        };
        let (ax, ay) = project(self.0);
        let (bx, by) = project(self.1);
        let (dx, dy) = (bx - ax, by - ay);
        let len_squared = dx * dx + dy * dy;
        let t = if len_squared == 0.0 {
            0.0
        } else {
            (-(ax * dx + ay * dy) / len_squared).clamp(0.0, 1.0)
        };
        let (cx, cy) = (ax + t * dx, ay + t * dy);
        Distance::meters((cx * cx + cy * cy).sqrt())
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Line({}, {})", self.0, self.1)
    }
}

/// -1, 0, or 1 depending on which side of pt1->pt2 the third point falls.
fn orientation(pt1: LonLat, pt2: LonLat, pt3: LonLat) -> i8 {
    let cross = (pt2.lon_dm7() as i128 - pt1.lon_dm7() as i128)
        * (pt3.lat_dm7() as i128 - pt1.lat_dm7() as i128)
        - (pt2.lat_dm7() as i128 - pt1.lat_dm7() as i128)
            * (pt3.lon_dm7() as i128 - pt1.lon_dm7() as i128);
    cross.signum() as i8
}

/// Assuming the point is collinear with the line, is it within the segment's extent?
fn on_segment(line: &Line, pt: LonLat) -> bool {
    orientation(line.0, line.1, pt) == 0
        && pt.lon_dm7() >= line.0.lon_dm7().min(line.1.lon_dm7())
        && pt.lon_dm7() <= line.0.lon_dm7().max(line.1.lon_dm7())
        && pt.lat_dm7() >= line.0.lat_dm7().min(line.1.lat_dm7())
        && pt.lat_dm7() <= line.0.lat_dm7().max(line.1.lat_dm7())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> Line {
        Line::new(LonLat::new(x1, y1), LonLat::new(x2, y2))
    }

    #[test]
    fn crossing_point() {
        let hit = line(0.0, 0.0, 2.0, 2.0).intersection(&line(0.0, 2.0, 2.0, 0.0));
        assert_eq!(hit, Some(LonLat::new(1.0, 1.0)));
    }

    #[test]
    fn touching_endpoint_is_exact() {
        let hit = line(0.0, 0.0, 1.0, 0.0).intersection(&line(1.0, 0.0, 1.0, 5.0));
        assert_eq!(hit, Some(LonLat::new(1.0, 0.0)));
    }

    #[test]
    fn parallel_lines_miss() {
        assert!(!line(0.0, 0.0, 1.0, 0.0).intersects(&line(0.0, 1.0, 1.0, 1.0)));
        assert!(!line(0.0, 0.0, 1.0, 0.0).intersects(&line(2.0, 0.0, 3.0, 0.0)));
        assert!(line(0.0, 0.0, 2.0, 0.0).overlaps_collinear(&line(1.0, 0.0, 3.0, 0.0)));
        assert!(!line(0.0, 0.0, 1.0, 0.0).overlaps_collinear(&line(1.0, 0.0, 3.0, 0.0)));
    }

    #[test]
    fn distance_to_segment() {
        let l = line(0.0, 0.0, 0.001, 0.0);
        let dist = l.dist_to_pt(LonLat::new(0.0005, 0.00001));
        assert!((dist.inner_meters() - 1.1119).abs() < 0.01);
        // Past the end, measure to the endpoint
        let dist = l.dist_to_pt(LonLat::new(0.002, 0.0));
        assert!((dist.inner_meters() - 111.19).abs() < 0.1);
    }
}
