use std::collections::BTreeSet;
use std::fmt;

use abstutil::plain_list_names;
use geom::{LonLat, PolyLine, Ring};

/// The members of a multipolygon relation don't close up into rings.
#[derive(Clone, Debug, PartialEq)]
pub struct ClosedLoopIssue {
    /// Members with a dangling end, sorted
    pub osm_ids: Vec<i64>,
    pub open_locations: Vec<LonLat>,
}

impl fmt::Display for ClosedLoopIssue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let ids = self.osm_ids.iter().map(|id| id.to_string()).collect();
        write!(
            f,
            "Ways {} don't form a closed loop, open at",
            plain_list_names(ids)
        )?;
        for pt in &self.open_locations {
            write!(f, " {}", pt)?;
        }
        Ok(())
    }
}

/// Checks that the member ways of a multipolygon, given by OSM id, close up into rings.
pub fn check_closed_loop(members: &[(i64, PolyLine)]) -> Option<ClosedLoopIssue> {
    let pieces: Vec<PolyLine> = members.iter().map(|(_, pl)| pl.clone()).collect();
    let err = Ring::assemble(&pieces).err()?;
    let osm_ids: BTreeSet<i64> = members
        .iter()
        .filter(|(_, pl)| err.open_locations.iter().any(|pt| pl.contains_pt(*pt)))
        .map(|(id, _)| *id)
        .collect();
    debug!("Multipolygon members {:?} are open: {}", osm_ids, err);
    Some(ClosedLoopIssue {
        osm_ids: osm_ids.into_iter().collect(),
        open_locations: err.open_locations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_in_pieces() -> Vec<(i64, PolyLine)> {
        vec![
            (1, PolyLine::from_degrees(&[(0.0, 0.0), (1.0, 0.0)]).unwrap()),
            (2, PolyLine::from_degrees(&[(1.0, 1.0), (1.0, 0.0)]).unwrap()),
            (3, PolyLine::from_degrees(&[(1.0, 1.0), (0.0, 1.0)]).unwrap()),
            (4, PolyLine::from_degrees(&[(0.0, 1.0), (0.0, 0.0)]).unwrap()),
        ]
    }

    #[test]
    fn closed() {
        assert_eq!(check_closed_loop(&square_in_pieces()), None);
    }

    #[test]
    fn retraced_members_have_no_open_ends() {
        let members = vec![
            (1, PolyLine::from_degrees(&[(0.0, 0.0), (1.0, 0.0)]).unwrap()),
            (2, PolyLine::from_degrees(&[(1.0, 0.0), (0.0, 0.0)]).unwrap()),
        ];
        assert_eq!(check_closed_loop(&members), None);
    }

    #[test]
    fn missing_side() {
        let mut members = square_in_pieces();
        members.remove(1);
        let issue = check_closed_loop(&members).unwrap();
        assert_eq!(issue.osm_ids, vec![1, 3]);
        assert_eq!(
            issue.open_locations,
            vec![LonLat::new(1.0, 0.0), LonLat::new(1.0, 1.0)]
        );
        assert!(issue
            .to_string()
            .starts_with("Ways 1 and 3 don't form a closed loop, open at"));
    }
}
