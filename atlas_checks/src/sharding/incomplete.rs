use std::collections::BTreeSet;

use anyhow::{bail, Result};
use rstar::primitives::{GeomWithData, Rectangle};
use rstar::{RTree, AABB};

use geom::{Distance, GPSBounds, Line, LonLat, PolyLine};

use crate::sharding::SlippyTile;

type ShardEnvelope = GeomWithData<Rectangle<[i64; 2]>, usize>;

/// The shards available to one run, which usually don't cover the whole world.
pub struct IncompleteSharding {
    // Sorted and deduplicated
    shards: Vec<SlippyTile>,
    tree: RTree<ShardEnvelope>,
}

impl IncompleteSharding {
    pub fn new(shards: impl IntoIterator<Item = SlippyTile>) -> IncompleteSharding {
        let shards: Vec<SlippyTile> = shards
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let items = shards
            .iter()
            .enumerate()
            .map(|(idx, shard)| {
                let b = shard.bounds();
                GeomWithData::new(
                    Rectangle::from_corners(
                        [b.min_lon as i64, b.min_lat as i64],
                        [b.max_lon as i64, b.max_lat as i64],
                    ),
                    idx,
                )
            })
            .collect();
        IncompleteSharding {
            shards,
            tree: RTree::bulk_load(items),
        }
    }

    pub fn len(&self) -> usize {
        self.shards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.is_empty()
    }

    pub fn contains(&self, shard: &SlippyTile) -> bool {
        self.shards.binary_search(shard).is_ok()
    }

    pub fn all_shards(&self) -> &Vec<SlippyTile> {
        &self.shards
    }

    /// Shards whose bounds share some area with these bounds. Shards only touching along an edge
    /// aren't included.
    pub fn shards(&self, bounds: &GPSBounds) -> Vec<SlippyTile> {
        self.candidates(bounds)
            .into_iter()
            .filter(|shard| shard.bounds().overlaps(bounds))
            .collect()
    }

    /// Shards around this one, including the diagonal ones. Empty if the shard isn't part of the
    /// run.
    pub fn neighbors(&self, shard: &SlippyTile) -> Vec<SlippyTile> {
        if !self.contains(shard) {
            return Vec::new();
        }
        self.shards(&shard.bounds().expand(Distance::ONE_METER))
            .into_iter()
            .filter(|s| s != shard)
            .collect()
    }

    /// Fails if the tile isn't part of the run.
    pub fn shard_for_name(&self, name: &str) -> Result<SlippyTile> {
        let tile = SlippyTile::for_name(name)?;
        if !self.contains(&tile) {
            bail!("This sharding does not include tile {}", name);
        }
        Ok(tile)
    }

    /// Shards containing the point. A point on a shared edge is covered by several shards.
    pub fn shards_covering(&self, pt: LonLat) -> Vec<SlippyTile> {
        self.candidates(&pt.bounds())
            .into_iter()
            .filter(|shard| shard.bounds().contains(pt))
            .collect()
    }

    /// Shards that the polyline passes through or touches.
    pub fn shards_intersecting(&self, pl: &PolyLine) -> Vec<SlippyTile> {
        self.candidates(&pl.get_bounds())
            .into_iter()
            .filter(|shard| {
                let b = shard.bounds();
                if pl.points().iter().any(|pt| b.contains(*pt)) {
                    return true;
                }
                let corners = b.get_corners();
                let sides: Vec<Line> = (0..4)
                    .map(|i| Line::new(corners[i], corners[(i + 1) % 4]))
                    .collect();
                pl.lines().any(|l| sides.iter().any(|side| side.intersects(&l)))
            })
            .collect()
    }

    // Everything with an envelope touching the bounds, in shard order
    fn candidates(&self, bounds: &GPSBounds) -> Vec<SlippyTile> {
        if bounds.is_empty() {
            return Vec::new();
        }
        let envelope = AABB::from_corners(
            [bounds.min_lon as i64, bounds.min_lat as i64],
            [bounds.max_lon as i64, bounds.max_lat as i64],
        );
        let mut indices: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|item| item.data)
            .collect();
        indices.sort_unstable();
        indices.into_iter().map(|idx| self.shards[idx]).collect()
    }
}
