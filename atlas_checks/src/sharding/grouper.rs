use anyhow::{bail, Result};
use geojson::{Feature, FeatureCollection, Geometry, Value};
use serde::{Deserialize, Serialize};

use abstutil::{prettyprint_usize, MultiMap};
use geom::Distance;

use crate::sharding::{bounds_for_shards, IncompleteSharding, SlippyTile, MAX_ZOOM};

/// Shards that get processed together.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardGroup {
    /// The smallest tile containing every shard in the group
    pub name: String,
    /// Sorted
    pub shards: Vec<SlippyTile>,
}

impl ShardGroup {
    fn new(mut shards: Vec<SlippyTile>) -> ShardGroup {
        shards.sort();
        let name = match SlippyTile::lowest_common_ancestor(&shards) {
            Some(tile) => tile.name(),
            None => String::new(),
        };
        ShardGroup { name, shards }
    }

    pub fn len(&self) -> usize {
        self.shards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.is_empty()
    }
}

/// Splits shards into groups, such that processing any group while also looking some distance
/// past its edges never loads more than a maximum number of shards.
///
/// Shards are bucketed by the slippy tiles at zoom 0 enclosing them. Any bucket that would load
/// too many shards is re-bucketed at the next zoom, until it fits. A single shard that still
/// loads too many is an error, as is a shard that no tile at the current zoom encloses.
pub struct ShardGrouper;

impl ShardGrouper {
    pub fn group(
        shards: &[SlippyTile],
        max_shard_load: usize,
        expand_distance: Distance,
    ) -> Result<Vec<ShardGroup>> {
        let universe = IncompleteSharding::new(shards.iter().cloned());
        let mut groups = Vec::new();
        group_at_zoom(
            &universe,
            universe.all_shards().clone(),
            0,
            max_shard_load,
            expand_distance,
            &mut groups,
        )?;
        info!(
            "Grouped {} shards into {} groups, loading at most {} shards each",
            prettyprint_usize(universe.len()),
            prettyprint_usize(groups.len()),
            prettyprint_usize(max_shard_load)
        );
        Ok(groups)
    }
}

fn group_at_zoom(
    universe: &IncompleteSharding,
    shards: Vec<SlippyTile>,
    zoom: u8,
    max_shard_load: usize,
    expand_distance: Distance,
    results: &mut Vec<ShardGroup>,
) -> Result<()> {
    if shards.is_empty() {
        return Ok(());
    }
    if zoom > MAX_ZOOM {
        bail!("This grouper works with slippy tile shards only");
    }

    let buckets = SlippyTile::all_tiles(zoom, &bounds_for_shards(&shards));
    let mut per_bucket: MultiMap<SlippyTile, SlippyTile> = MultiMap::new();
    for shard in shards {
        let shard_bounds = shard.bounds();
        match buckets
            .iter()
            .find(|bucket| bucket.bounds().fully_encloses(&shard_bounds))
        {
            Some(bucket) => {
                per_bucket.insert(*bucket, shard);
            }
            None => {
                bail!("This grouper works with slippy tile shards only");
            }
        }
    }

    for (bucket, members) in per_bucket.consume() {
        let members: Vec<SlippyTile> = members.into_iter().collect();
        let load = universe
            .shards(&bounds_for_shards(&members).expand(expand_distance))
            .len();
        if load <= max_shard_load {
            results.push(ShardGroup::new(members));
            continue;
        }
        if members.len() == 1 {
            bail!(
                "Unable to ensure that at max {} shards are loaded",
                max_shard_load
            );
        }
        debug!(
            "Bucket {} with {} shards would load {}, splitting it",
            bucket,
            members.len(),
            load
        );
        group_at_zoom(
            universe,
            members,
            zoom + 1,
            max_shard_load,
            expand_distance,
            results,
        )?;
    }
    Ok(())
}

/// Describes each group on its own line, biggest groups first.
pub fn print_groups(country: &str, groups: &[ShardGroup]) -> String {
    let mut sorted: Vec<&ShardGroup> = groups.iter().collect();
    sorted.sort_by_key(|g| std::cmp::Reverse(g.len()));
    let mut result = String::new();
    for (idx, group) in sorted.into_iter().enumerate() {
        result.push_str(&format!(
            "\n{} Group {}:{}",
            country,
            idx + 1,
            group
                .shards
                .iter()
                .map(|s| s.name())
                .collect::<Vec<_>>()
                .join(",")
        ));
    }
    result
}

/// One MultiPolygon feature per group, covering its shards.
pub fn groups_to_geojson(groups: &[ShardGroup]) -> FeatureCollection {
    let mut features = Vec::new();
    for group in groups {
        let polygons = group
            .shards
            .iter()
            .filter_map(|shard| match shard.bounds().to_polygon().to_geojson().value {
                Value::Polygon(rings) => Some(rings),
                _ => None,
            })
            .collect();
        let mut feature = Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::MultiPolygon(polygons))),
            id: None,
            properties: None,
            foreign_members: None,
        };
        feature.set_property("name", group.name.clone());
        feature.set_property("size", group.len());
        features.push(feature);
    }
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rand::{Rng, SeedableRng};
    use rand_xorshift::XorShiftRng;

    use super::*;

    fn tiles(names: &[&str]) -> Vec<SlippyTile> {
        names
            .iter()
            .map(|n| SlippyTile::for_name(n).unwrap())
            .collect()
    }

    fn block() -> Vec<SlippyTile> {
        tiles(&["10-100-200", "10-101-200", "10-100-201", "10-101-201"])
    }

    #[test]
    fn everything_fits_in_one_group() {
        let groups = ShardGrouper::group(&block(), 4, Distance::ZERO).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "9-50-100");
        let mut sorted = block();
        sorted.sort();
        assert_eq!(groups[0].shards, sorted);
    }

    #[test]
    fn split_down_to_single_shards() {
        let groups = ShardGrouper::group(&block(), 1, Distance::ZERO).unwrap();
        let names: Vec<String> = groups.iter().map(|g| g.name.clone()).collect();
        assert_eq!(
            names,
            vec!["10-100-200", "10-100-201", "10-101-200", "10-101-201"]
        );
    }

    #[test]
    fn duplicates_are_ignored() {
        let mut input = block();
        input.extend(block());
        let groups = ShardGrouper::group(&input, 4, Distance::ZERO).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 4);
    }

    #[test]
    fn margin_too_big() {
        let err = ShardGrouper::group(&block(), 1, Distance::kilometers(1.0)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unable to ensure that at max 1 shards are loaded"
        );
    }

    #[test]
    fn overlapping_shards() {
        let err = ShardGrouper::group(&tiles(&["2-1-1", "5-10-10"]), 1, Distance::ZERO)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "This grouper works with slippy tile shards only"
        );
    }

    #[test]
    fn report() {
        let groups = vec![
            ShardGroup::new(tiles(&["10-100-200"])),
            ShardGroup::new(tiles(&["10-101-201", "10-101-200"])),
        ];
        assert_eq!(
            print_groups("DMA", &groups),
            "\nDMA Group 1:10-101-200,10-101-201\nDMA Group 2:10-100-200"
        );
        let gj = groups_to_geojson(&groups);
        assert_eq!(gj.features.len(), 2);
        assert_eq!(
            gj.features[1].property("size"),
            Some(&serde_json::Value::from(2))
        );
    }

    // Randomly splits a tile, like a sharding that's finer where there's more data
    fn random_sharding(
        rng: &mut XorShiftRng,
        tile: SlippyTile,
        max_zoom: u8,
        out: &mut Vec<SlippyTile>,
    ) {
        if tile.zoom < max_zoom && rng.gen_bool(0.6) {
            for child in tile.children() {
                random_sharding(rng, child, max_zoom, out);
            }
        } else {
            out.push(tile);
        }
    }

    #[test]
    fn random_shardings_are_partitioned_within_the_limit() {
        for seed in 0..10 {
            let mut rng = XorShiftRng::seed_from_u64(seed);
            let mut shards = Vec::new();
            let root = SlippyTile::new(4, 8, 5).unwrap();
            random_sharding(&mut rng, root, 9, &mut shards);
            let max_shard_load = 200;
            let expand_distance = Distance::kilometers(rng.gen_range(0.0..5.0));

            let groups = ShardGrouper::group(&shards, max_shard_load, expand_distance).unwrap();
            let universe = IncompleteSharding::new(shards.clone());

            let mut seen = BTreeSet::new();
            for group in &groups {
                let load = universe
                    .shards(&bounds_for_shards(&group.shards).expand(expand_distance))
                    .len();
                assert!(load <= max_shard_load);
                assert_eq!(
                    group.name,
                    SlippyTile::lowest_common_ancestor(&group.shards)
                        .unwrap()
                        .name()
                );
                for shard in &group.shards {
                    assert!(seen.insert(*shard), "{} is in two groups", shard);
                }
            }
            assert_eq!(seen, shards.into_iter().collect::<BTreeSet<_>>());
            let names: BTreeSet<&String> = groups.iter().map(|g| &g.name).collect();
            assert_eq!(names.len(), groups.len());
        }
    }
}
