use std::{fmt, ops};

use serde::{Deserialize, Serialize};

use crate::{DM7_PER_DEGREE, METERS_PER_DEGREE};

/// A surface measured in dm7 squared. Integer so that summing many pieces is exact and order
/// independent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Area(i64);

impl Area {
    pub const ZERO: Area = Area(0);

    pub fn dm7_squared(value: i64) -> Area {
        assert!(value >= 0, "Bad Area {}", value);
        Area(value)
    }

    /// Converts using the scale at the equator, where a degree of longitude and latitude span the
    /// same distance.
    pub fn to_square_meters(self) -> f64 {
        let meters_per_dm7 = METERS_PER_DEGREE / (DM7_PER_DEGREE as f64);
        (self.0 as f64) * meters_per_dm7 * meters_per_dm7
    }

    /// Converts a surface located around some latitude. Longitude shrinks by cos(latitude).
    pub fn to_square_meters_at(self, latitude: f64) -> f64 {
        self.to_square_meters() * latitude.to_radians().cos().abs()
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} dm7^2", self.0)
    }
}

impl ops::Add for Area {
    type Output = Area;

    fn add(self, other: Area) -> Area {
        Area(self.0 + other.0)
    }
}

impl ops::AddAssign for Area {
    fn add_assign(&mut self, other: Area) {
        self.0 += other.0;
    }
}

impl ops::Sub for Area {
    type Output = Area;

    /// Saturates at zero; a surface can't be negative.
    fn sub(self, other: Area) -> Area {
        Area((self.0 - other.0).max(0))
    }
}

impl ops::Div<Area> for Area {
    type Output = f64;

    fn div(self, other: Area) -> f64 {
        if other == Area::ZERO {
            panic!("Can't divide {} / {}", self, other);
        }
        (self.0 as f64) / (other.0 as f64)
    }
}

impl std::iter::Sum for Area {
    fn sum<I>(iter: I) -> Area
    where
        I: Iterator<Item = Area>,
    {
        let mut sum = Area::ZERO;
        for x in iter {
            sum += x;
        }
        sum
    }
}
