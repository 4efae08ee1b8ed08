//! Runs the OSM checks on local files. These are bundled as a single executable, one subcommand
//! per check.

#[macro_use]
extern crate log;

mod group_shards;
mod input;

use anyhow::{bail, Result};
use structopt::StructOpt;

use atlas_checks::{RouteMembers, DEFAULT_STOP_DISTANCE};
use geom::Distance;

#[derive(StructOpt)]
#[structopt(name = "atlas-checks", about = "Integrity checks for OpenStreetMap data")]
enum Command {
    /// Splits a sharding into groups that can each be processed without loading too many shards.
    GroupShards {
        /// A file listing slippy tile names like `9-168-233`, separated by commas or newlines
        #[structopt(long)]
        shards: String,
        /// No group may need to load more than this many shards
        #[structopt(long)]
        max_shard_load: usize,
        /// How far past the edge of a group its processing needs data
        #[structopt(long, default_value = "0")]
        expand_meters: f64,
        /// A label to prefix each group with
        #[structopt(long, default_value = "")]
        country: String,
        /// Also write the groups as GeoJSON here
        #[structopt(long)]
        geojson: Option<String>,
    },
    /// Prints how much of the smaller of the first two polygons in a GeoJSON file is covered by
    /// the other one.
    Overlap {
        /// The path to a GeoJSON file
        #[structopt()]
        input: String,
    },
    /// Checks that the LineStrings in a GeoJSON file form one continuous route, and that its
    /// stops and platforms are near it.
    ///
    /// Points are stops, unless they have a `role` property of `platform`.
    RouteGaps {
        /// The path to a GeoJSON file
        #[structopt()]
        input: String,
        /// Stops and platforms farther than this from the track are reported
        #[structopt(long, default_value = "1.5")]
        stop_distance_meters: f64,
    },
    /// Checks that the LineStrings in a GeoJSON file, each with an `osm_id` property, close up
    /// into rings.
    ClosedLoop {
        /// The path to a GeoJSON file
        #[structopt()]
        input: String,
    },
}

fn main() -> Result<()> {
    abstutil::logger::setup();

    // Short implementations can stay in this file, but please split larger subcommands to their
    // own module.
    match Command::from_args() {
        Command::GroupShards {
            shards,
            max_shard_load,
            expand_meters,
            country,
            geojson,
        } => group_shards::run(
            shards,
            max_shard_load,
            meters(expand_meters)?,
            country,
            geojson,
        )?,
        Command::Overlap { input } => overlap(input)?,
        Command::RouteGaps {
            input,
            stop_distance_meters,
        } => route_gaps(input, meters(stop_distance_meters)?)?,
        Command::ClosedLoop { input } => closed_loop(input)?,
    }
    Ok(())
}

fn meters(value: f64) -> Result<Distance> {
    if !value.is_finite() || value < 0.0 {
        bail!("{} isn't a usable distance", value);
    }
    Ok(Distance::meters(value))
}

fn overlap(path: String) -> Result<()> {
    let polygons = input::read_polygons(&path)?;
    if polygons.len() < 2 {
        bail!("{} needs at least two polygons, but has {}", path, polygons.len());
    }
    if polygons.len() > 2 {
        warn!("{} has {} polygons, only using the first two", path, polygons.len());
    }
    println!(
        "{}",
        atlas_checks::find_intersection_percentage(&polygons[0], &polygons[1])
    );
    Ok(())
}

fn route_gaps(path: String, stop_distance: Distance) -> Result<()> {
    let members: RouteMembers = input::read_route(&path)?;
    if stop_distance != DEFAULT_STOP_DISTANCE {
        info!("Using a stop distance of {}", stop_distance);
    }
    let issues = atlas_checks::check_route(&members, stop_distance);
    if issues.is_empty() {
        println!("No problems with the route");
    }
    for issue in issues {
        println!("{}", issue);
    }
    Ok(())
}

fn closed_loop(path: String) -> Result<()> {
    let members = input::read_ways(&path)?;
    match atlas_checks::check_closed_loop(&members) {
        Some(issue) => println!("{}", issue),
        None => println!("All {} ways close up", members.len()),
    }
    Ok(())
}
