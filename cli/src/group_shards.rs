use anyhow::{bail, Result};

use abstutil::prettyprint_usize;
use atlas_checks::sharding::{groups_to_geojson, print_groups};
use atlas_checks::{ShardGrouper, SlippyTile};
use geom::Distance;

pub fn run(
    shards_path: String,
    max_shard_load: usize,
    expand_distance: Distance,
    country: String,
    geojson_path: Option<String>,
) -> Result<()> {
    let shards = parse_shards(&fs_err::read_to_string(&shards_path)?)?;
    if shards.is_empty() {
        bail!("{} doesn't list any shards", shards_path);
    }
    info!(
        "Read {} shards from {}",
        prettyprint_usize(shards.len()),
        shards_path
    );

    let groups = ShardGrouper::group(&shards, max_shard_load, expand_distance)?;
    println!("{}", print_groups(&country, &groups));

    if let Some(path) = geojson_path {
        let gj = geojson::GeoJson::from(groups_to_geojson(&groups));
        fs_err::write(&path, gj.to_string())?;
        println!("Wrote {}", path);
    }
    Ok(())
}

fn parse_shards(raw: &str) -> Result<Vec<SlippyTile>> {
    raw.split(|c| c == ',' || c == '\n')
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .map(SlippyTile::for_name)
        .collect()
}
