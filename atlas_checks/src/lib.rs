//! Reusable analysis behind a catalog of OpenStreetMap data-quality checks: walking the edge
//! graph, grouping shards for distributed runs, measuring polygon overlap, and reconstructing
//! routes and multipolygons from their members.

#[macro_use]
extern crate log;

pub mod intersections;
pub mod multipolygon;
pub mod route;
pub mod sharding;
pub mod walker;
pub mod ways;

pub use crate::intersections::{
    find_intersection_percentage, have_explicit_locations_for_intersections,
};
pub use crate::multipolygon::{check_closed_loop, ClosedLoopIssue};
pub use crate::route::{
    check_route, reconstruct, stops_too_far_from_track, RouteChain, RouteIssue, RouteMembers,
    DEFAULT_STOP_DISTANCE,
};
pub use crate::sharding::{IncompleteSharding, ShardGroup, ShardGrouper, SlippyTile, MAX_ZOOM};
pub use crate::walker::BfsWalker;
pub use crate::ways::{Edge, ItemType, OsmType};
