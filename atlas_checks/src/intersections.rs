use geom::{Area, ClipType, Clipped, LonLat, PolyLine, Polygon};

/// How much of the smaller polygon is covered by the other one, between 0 and 1. A small polygon
/// entirely inside a big one scores 1. If either polygon is malformed, the pair is treated as not
/// overlapping at all.
pub fn find_intersection_percentage(polygon: &Polygon, other: &Polygon) -> f64 {
    let pieces = match polygon.clip(other, ClipType::And) {
        Ok(pieces) => pieces,
        Err(err) => {
            debug!(
                "Skipping intersection check. Error clipping {} and {}: {}",
                polygon, other, err
            );
            return 0.0;
        }
    };

    let intersection_area: Area = pieces
        .iter()
        .filter(|piece| matches!(piece, Clipped::Polygon { .. }))
        .map(|piece| piece.area())
        .sum();
    if intersection_area == Area::ZERO {
        return 0.0;
    }

    let baseline = polygon.area().min(other.area());
    // Rounding the clipped pieces back to dm7 can nudge the area past the baseline
    (intersection_area / baseline).min(1.0)
}

/// Is every spot where the two lines meet an actual vertex of both? If the intersections are
/// already known, pass them in.
pub fn have_explicit_locations_for_intersections(
    line_crossed: &PolyLine,
    crossing: &PolyLine,
    intersections: Option<&[LonLat]>,
) -> bool {
    let computed;
    let intersections = match intersections {
        Some(list) => list,
        None => {
            computed = line_crossed.intersections(crossing);
            computed.as_slice()
        }
    };
    intersections
        .iter()
        .all(|pt| line_crossed.contains_pt(*pt) && crossing.contains_pt(*pt))
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng};
    use rand_xorshift::XorShiftRng;

    use super::*;

    fn square(x: f64, y: f64, size: f64) -> Polygon {
        Polygon::from_degrees(&[(x, y), (x + size, y), (x + size, y + size), (x, y + size)])
            .unwrap()
    }

    fn rectangle_dm7(x1: i32, y1: i32, x2: i32, y2: i32) -> Polygon {
        Polygon::must_new(vec![
            LonLat::from_dm7(x1, y1),
            LonLat::from_dm7(x2, y1),
            LonLat::from_dm7(x2, y2),
            LonLat::from_dm7(x1, y2),
        ])
    }

    #[test]
    fn contained() {
        let small = square(0.01, 0.01, 0.001);
        let big = square(0.0, 0.0, 0.1);
        assert_eq!(find_intersection_percentage(&small, &big), 1.0);
        assert_eq!(find_intersection_percentage(&big, &small), 1.0);
    }

    #[test]
    fn half() {
        let a = square(0.0, 0.0, 0.002);
        let b = square(0.001, 0.0, 0.002);
        assert_eq!(find_intersection_percentage(&a, &b), 0.5);
    }

    #[test]
    fn disjoint_or_touching() {
        let a = square(0.0, 0.0, 0.001);
        assert_eq!(
            find_intersection_percentage(&a, &square(0.005, 0.005, 0.001)),
            0.0
        );
        assert_eq!(
            find_intersection_percentage(&a, &square(0.001, 0.0, 0.001)),
            0.0
        );
    }

    #[test]
    fn malformed_polygons_dont_overlap() {
        let bowtie =
            Polygon::from_degrees(&[(0.0, 0.0), (0.001, 0.001), (0.001, 0.0), (0.0, 0.001)])
                .unwrap();
        assert_eq!(
            find_intersection_percentage(&bowtie, &square(0.0, 0.0, 0.001)),
            0.0
        );
    }

    #[test]
    fn random_rectangles() {
        let mut rng = XorShiftRng::seed_from_u64(42);
        let random_rect = |rng: &mut XorShiftRng| {
            let x = rng.gen_range(0..100_000);
            let y = rng.gen_range(0..100_000);
            let w = rng.gen_range(1..50_000);
            let h = rng.gen_range(1..50_000);
            (x, y, x + w, y + h)
        };
        for _ in 0..100 {
            let r1 = random_rect(&mut rng);
            let r2 = random_rect(&mut rng);
            let a = rectangle_dm7(r1.0, r1.1, r1.2, r1.3);
            let b = rectangle_dm7(r2.0, r2.1, r2.2, r2.3);

            let overlap_w = (r1.2.min(r2.2) - r1.0.max(r2.0)).max(0) as i64;
            let overlap_h = (r1.3.min(r2.3) - r1.1.max(r2.1)).max(0) as i64;
            let area = |r: (i32, i32, i32, i32)| ((r.2 - r.0) as i64) * ((r.3 - r.1) as i64);
            let expected = (overlap_w * overlap_h) as f64 / area(r1).min(area(r2)) as f64;

            let actual = find_intersection_percentage(&a, &b);
            assert!((0.0..=1.0).contains(&actual));
            assert!(
                (actual - expected).abs() < 1e-9,
                "{:?} and {:?}: expected {}, got {}",
                r1,
                r2,
                expected,
                actual
            );
        }
    }

    #[test]
    fn explicit_intersections() {
        let road = PolyLine::from_degrees(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]).unwrap();
        let crossing_at_vertex =
            PolyLine::from_degrees(&[(0.0, 2.0), (1.0, 1.0), (2.0, 0.0)]).unwrap();
        assert!(have_explicit_locations_for_intersections(
            &road,
            &crossing_at_vertex,
            None
        ));

        let crossing_between = PolyLine::from_degrees(&[(0.0, 1.0), (1.0, 0.0)]).unwrap();
        assert!(!have_explicit_locations_for_intersections(
            &road,
            &crossing_between,
            None
        ));
        // Trust the caller's list
        assert!(have_explicit_locations_for_intersections(
            &road,
            &crossing_between,
            Some(&[])
        ));
    }
}
