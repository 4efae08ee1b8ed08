use std::f64::consts::PI;
use std::fmt;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use geom::{GPSBounds, LonLat};

pub const MAX_ZOOM: u8 = 30;

/// The largest latitude covered by Web Mercator tiles
const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_779_806_59;

/// A tile in the usual z/x/y scheme. Its name is `zoom-x-y`. Ordering is by zoom, then x, then y.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlippyTile {
    pub zoom: u8,
    pub x: u32,
    pub y: u32,
}

impl SlippyTile {
    pub fn new(zoom: u8, x: u32, y: u32) -> Result<SlippyTile> {
        if zoom > MAX_ZOOM {
            bail!("Zoom {} is past the maximum of {}", zoom, MAX_ZOOM);
        }
        let n = 1u64 << zoom;
        if x as u64 >= n || y as u64 >= n {
            bail!("Tile {}-{}-{} is out of range at zoom {}", zoom, x, y, zoom);
        }
        Ok(SlippyTile { zoom, x, y })
    }

    pub fn for_name(name: &str) -> Result<SlippyTile> {
        let parts: Vec<&str> = name.trim().split('-').collect();
        if parts.len() != 3 {
            bail!("Tile name {} doesn't look like zoom-x-y", name);
        }
        let parse = |x: &str| -> Result<u32> {
            match x.parse::<u32>() {
                Ok(v) => Ok(v),
                Err(err) => bail!("Bad number {} in tile name {}: {}", x, name, err),
            }
        };
        let zoom = parse(parts[0])?;
        if zoom > MAX_ZOOM as u32 {
            bail!("Zoom {} is past the maximum of {}", zoom, MAX_ZOOM);
        }
        SlippyTile::new(zoom as u8, parse(parts[1])?, parse(parts[2])?)
    }

    pub fn name(&self) -> String {
        self.to_string()
    }

    /// The area covered, rounded to dm7.
    pub fn bounds(&self) -> GPSBounds {
        let n = (1u64 << self.zoom) as f64;
        let min_lon = self.x as f64 / n * 360.0 - 180.0;
        let max_lon = (self.x + 1) as f64 / n * 360.0 - 180.0;
        // y grows to the south
        let max_lat = world_y_to_lat(self.y as f64, n);
        let min_lat = world_y_to_lat((self.y + 1) as f64, n);
        GPSBounds::from_corners(LonLat::new(min_lon, min_lat), LonLat::new(max_lon, max_lat))
    }

    pub fn parent(&self) -> Option<SlippyTile> {
        if self.zoom == 0 {
            return None;
        }
        Some(SlippyTile {
            zoom: self.zoom - 1,
            x: self.x / 2,
            y: self.y / 2,
        })
    }

    /// The tile at a coarser zoom containing this one. None if the zoom is finer.
    pub fn ancestor_at(&self, zoom: u8) -> Option<SlippyTile> {
        if zoom > self.zoom {
            return None;
        }
        let shift = self.zoom - zoom;
        Some(SlippyTile {
            zoom,
            x: self.x >> shift,
            y: self.y >> shift,
        })
    }

    pub fn children(&self) -> Vec<SlippyTile> {
        if self.zoom == MAX_ZOOM {
            return Vec::new();
        }
        let mut result = Vec::new();
        for dx in 0..2 {
            for dy in 0..2 {
                result.push(SlippyTile {
                    zoom: self.zoom + 1,
                    x: self.x * 2 + dx,
                    y: self.y * 2 + dy,
                });
            }
        }
        result
    }

    /// A tile counts as its own ancestor.
    pub fn is_ancestor_of(&self, other: &SlippyTile) -> bool {
        other.ancestor_at(self.zoom) == Some(*self)
    }

    /// The finest tile containing all of the others. None for an empty list.
    pub fn lowest_common_ancestor(tiles: &[SlippyTile]) -> Option<SlippyTile> {
        let zoom = tiles.iter().map(|t| t.zoom).min()?;
        let mut current: Vec<SlippyTile> = tiles
            .iter()
            .filter_map(|t| t.ancestor_at(zoom))
            .collect();
        loop {
            current.sort();
            current.dedup();
            if current.len() == 1 {
                return Some(current[0]);
            }
            current = current.into_iter().filter_map(|t| t.parent()).collect();
        }
    }

    /// Every tile at some zoom touching the bounds, ordered by x, then y.
    pub fn all_tiles(zoom: u8, bounds: &GPSBounds) -> Vec<SlippyTile> {
        if bounds.is_empty() {
            return Vec::new();
        }
        let n = 1u64 << zoom.min(MAX_ZOOM);
        let lon_to_x = |lon: f64| -> u32 {
            let x = ((lon + 180.0) / 360.0 * n as f64).floor();
            (x.max(0.0) as u64).min(n - 1) as u32
        };
        let lat_to_y = |lat: f64| -> u32 {
            let lat = lat
                .clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE)
                .to_radians();
            let y = ((1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * n as f64).floor();
            (y.max(0.0) as u64).min(n - 1) as u32
        };

        // Pad by one tile, since the bounds are rounded. Tiles only touching the bounds count.
        let (x1, x2) = (
            lon_to_x(bounds.lower_left().longitude()).saturating_sub(1),
            (lon_to_x(bounds.upper_right().longitude()) + 1).min((n - 1) as u32),
        );
        let (y1, y2) = (
            lat_to_y(bounds.upper_right().latitude()).saturating_sub(1),
            (lat_to_y(bounds.lower_left().latitude()) + 1).min((n - 1) as u32),
        );
        let mut result = Vec::new();
        for x in x1..=x2 {
            for y in y1..=y2 {
                let tile = SlippyTile {
                    zoom: zoom.min(MAX_ZOOM),
                    x,
                    y,
                };
                if tile.bounds().intersects(bounds) {
                    result.push(tile);
                }
            }
        }
        result
    }
}

impl fmt::Display for SlippyTile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-{}-{}", self.zoom, self.x, self.y)
    }
}

fn world_y_to_lat(world_y: f64, n: f64) -> f64 {
    (PI * (1.0 - 2.0 * world_y / n)).sinh().atan().to_degrees()
}
