use std::collections::{BTreeSet, VecDeque};
use std::fmt;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::{LonLat, OpenRings, PolyLine, Polygon};

/// Like a PolyLine, but closed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ring {
    // first equals last
    pts: Vec<LonLat>,
}

impl Ring {
    pub fn new(pts: Vec<LonLat>) -> Result<Ring> {
        if pts.len() < 4 {
            bail!("Can't make a ring with only {} points", pts.len());
        }
        if pts[0] != *pts.last().unwrap() {
            bail!("Can't make a ring with mismatching first/last points");
        }
        if pts.windows(2).any(|pair| pair[0] == pair[1]) {
            bail!("Ring has duplicate adjacent points");
        }
        Ok(Ring { pts })
    }

    pub fn must_new(pts: Vec<LonLat>) -> Ring {
        Ring::new(pts).unwrap()
    }

    pub fn points(&self) -> &Vec<LonLat> {
        &self.pts
    }

    pub fn into_polygon(self) -> Polygon {
        Polygon::must_new(self.pts)
    }

    /// Chains pieces of outline, like the member ways of a multipolygon relation, into closed
    /// rings. Pieces may be given in any order and orientation. If some pieces can't be closed up,
    /// every dangling endpoint is reported, sorted and deduplicated.
    ///
    /// Chains that close up but enclose nothing, like a piece retracing another, have no dangling
    /// ends. They aren't open, so they're dropped without becoming a ring.
    pub fn assemble(pieces: &[PolyLine]) -> Result<Vec<Ring>, OpenRings> {
        let mut rings = Vec::new();
        let mut open = BTreeSet::new();
        let mut remaining: VecDeque<Vec<LonLat>> =
            pieces.iter().map(|pl| pl.points().clone()).collect();

        while let Some(mut chain) = remaining.pop_front() {
            let mut flipped = false;
            while chain[0] != *chain.last().unwrap() {
                let glue_pt = *chain.last().unwrap();
                if let Some(idx) = remaining
                    .iter()
                    .position(|pts| pts[0] == glue_pt || *pts.last().unwrap() == glue_pt)
                {
                    let mut append = remaining.remove(idx).unwrap();
                    if append[0] != glue_pt {
                        append.reverse();
                    }
                    chain.pop();
                    chain.extend(append);
                } else if flipped {
                    break;
                } else {
                    // Try growing from the other end
                    flipped = true;
                    chain.reverse();
                }
            }

            if chain[0] != *chain.last().unwrap() {
                open.insert(chain[0]);
                open.insert(*chain.last().unwrap());
                continue;
            }
            chain.dedup();
            match Ring::new(chain) {
                Ok(ring) => rings.push(ring),
                Err(err) => {
                    debug!("Skipping degenerate closed piece: {}", err);
                }
            }
        }

        if open.is_empty() {
            Ok(rings)
        } else {
            Err(OpenRings {
                open_locations: open.into_iter().collect(),
            })
        }
    }
}

impl fmt::Display for Ring {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Ring::new(vec![")?;
        for pt in &self.pts {
            writeln!(f, "  LonLat::new({}, {}),", pt.longitude(), pt.latitude())?;
        }
        write!(f, "])")
    }
}
