//! Slippy tile shards, and grouping them so that no group pulls in too many shards at once.

mod grouper;
mod incomplete;
mod slippy;

pub use self::grouper::{groups_to_geojson, print_groups, ShardGroup, ShardGrouper};
pub use self::incomplete::IncompleteSharding;
pub use self::slippy::{SlippyTile, MAX_ZOOM};

use geom::GPSBounds;

/// The smallest box around all of the shards.
pub fn bounds_for_shards(shards: &[SlippyTile]) -> GPSBounds {
    let mut bounds = GPSBounds::new();
    for shard in shards {
        bounds.union(shard.bounds());
    }
    bounds
}
