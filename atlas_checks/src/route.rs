//! Transit routes are relations whose members should form one continuous track, with stops and
//! platforms along it.

use std::collections::VecDeque;
use std::fmt;

use geom::{Distance, LonLat, PolyLine};

/// Stops and platforms farther than this from every part of the track are suspicious.
pub const DEFAULT_STOP_DISTANCE: Distance = Distance::const_meters(1.5);

/// Fragments of a route chained head-to-tail.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteChain {
    pub chain: Vec<PolyLine>,
    /// Some fragments couldn't be attached to the chain
    pub has_gap: bool,
}

impl RouteChain {
    /// The whole chain as one line. None if the chain is empty.
    pub fn as_polyline(&self) -> Option<PolyLine> {
        let mut iter = self.chain.iter();
        let mut result = iter.next()?.clone();
        for pl in iter {
            result = result.extend(pl).ok()?;
        }
        Some(result)
    }
}

/// Chains route members given in no particular order or orientation, starting from the first one.
/// Fragments only connect when their endpoints are exactly equal. Fragments that can't be reached
/// are left out, and `has_gap` is set.
pub fn reconstruct(fragments: &[PolyLine]) -> RouteChain {
    if fragments.is_empty() {
        return RouteChain {
            chain: Vec::new(),
            has_gap: false,
        };
    }

    let mut chain: VecDeque<PolyLine> = VecDeque::new();
    chain.push_back(fragments[0].clone());
    let mut used = vec![false; fragments.len()];
    used[0] = true;
    let mut num_used = 1;

    for _ in 0..fragments.len() {
        let before = num_used;
        for (idx, fragment) in fragments.iter().enumerate() {
            if used[idx] {
                continue;
            }
            let start = chain[0].first_pt();
            let end = chain[chain.len() - 1].last_pt();
            if fragment.first_pt() == end {
                chain.push_back(fragment.clone());
            } else if fragment.last_pt() == start {
                chain.push_front(fragment.clone());
            } else if fragment.last_pt() == end {
                chain.push_back(fragment.reversed());
            } else if fragment.first_pt() == start {
                chain.push_front(fragment.reversed());
            } else {
                continue;
            }
            used[idx] = true;
            num_used += 1;
        }
        if num_used == fragments.len() || num_used == before {
            break;
        }
    }

    let has_gap = chain.len() < fragments.len();
    if has_gap {
        debug!(
            "Only chained {} of {} route fragments",
            chain.len(),
            fragments.len()
        );
    }
    RouteChain {
        chain: chain.into_iter().collect(),
        has_gap,
    }
}

/// True when there are stops and a track, but none of the stops are within the threshold of the
/// track.
pub fn stops_too_far_from_track(
    stops: &[LonLat],
    track: &[PolyLine],
    threshold: Distance,
) -> bool {
    if stops.is_empty() || track.is_empty() {
        return false;
    }
    !stops
        .iter()
        .any(|stop| track.iter().any(|pl| pl.dist_to_pt(*stop) < threshold))
}

/// The geometry of a route relation's members, split by role.
#[derive(Clone, Debug, Default)]
pub struct RouteMembers {
    /// Main edges and lines, in relation order
    pub tracks: Vec<PolyLine>,
    pub stops: Vec<LonLat>,
    pub platforms: Vec<LonLat>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RouteIssue {
    EmptyRoute,
    GapsInTrack,
    StopsTooFar,
    PlatformsTooFar,
}

impl fmt::Display for RouteIssue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RouteIssue::EmptyRoute => {
                write!(f, "The route is empty. Please add its road segments.")
            }
            RouteIssue::GapsInTrack => write!(f, "The route has gaps in the track."),
            RouteIssue::StopsTooFar => {
                write!(f, "The stops in the route are too far from the track.")
            }
            RouteIssue::PlatformsTooFar => {
                write!(f, "The platforms in the route are too far from the track.")
            }
        }
    }
}

/// Finds everything wrong with one route relation.
pub fn check_route(members: &RouteMembers, stop_distance: Distance) -> Vec<RouteIssue> {
    let mut issues = Vec::new();
    if members.tracks.is_empty() {
        issues.push(RouteIssue::EmptyRoute);
    }
    if members.tracks.len() > 1 && reconstruct(&members.tracks).has_gap {
        issues.push(RouteIssue::GapsInTrack);
    }
    if stops_too_far_from_track(&members.stops, &members.tracks, stop_distance) {
        issues.push(RouteIssue::StopsTooFar);
    }
    if stops_too_far_from_track(&members.platforms, &members.tracks, stop_distance) {
        issues.push(RouteIssue::PlatformsTooFar);
    }
    issues
}
