/// Compound cross-section geometry.
///
/// A rectangular summer bed, open at the top, flanked on each side by a
/// summer plain bounded by a summer dyke and a winter plain bounded by a
/// winter dyke. Distances are measured outward from the edge of the summer
/// bed; dyke heights are measured from the plain ground, which sits at the
/// top of the summer bed.
///
/// - `summer_bed_width`, `summer_bed_depth`: low-flow channel [m]
/// - `*_summer_height`, `*_summer_distance`: inner dykes [m]
/// - `*_winter_height`, `*_winter_distance`: outer dykes [m]
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_SUMMER_BED_DEPTH, DEFAULT_SUMMER_BED_WIDTH, DEFAULT_SUMMER_DISTANCE,
    DEFAULT_SUMMER_HEIGHT, DEFAULT_WINTER_DISTANCE, DEFAULT_WINTER_HEIGHT, GEOMETRY_NAMES,
};
use crate::error::{Error, Result};
use crate::traits::ParameterSet;

/// Left or right bank, looking downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Geometry {
    pub summer_bed_width: f64,
    pub summer_bed_depth: f64,
    pub left_summer_height: f64,
    pub left_summer_distance: f64,
    pub right_summer_height: f64,
    pub right_summer_distance: f64,
    pub left_winter_height: f64,
    pub left_winter_distance: f64,
    pub right_winter_height: f64,
    pub right_winter_distance: f64,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            summer_bed_width: DEFAULT_SUMMER_BED_WIDTH,
            summer_bed_depth: DEFAULT_SUMMER_BED_DEPTH,
            left_summer_height: DEFAULT_SUMMER_HEIGHT,
            left_summer_distance: DEFAULT_SUMMER_DISTANCE,
            right_summer_height: DEFAULT_SUMMER_HEIGHT,
            right_summer_distance: DEFAULT_SUMMER_DISTANCE,
            left_winter_height: DEFAULT_WINTER_HEIGHT,
            left_winter_distance: DEFAULT_WINTER_DISTANCE,
            right_winter_height: DEFAULT_WINTER_HEIGHT,
            right_winter_distance: DEFAULT_WINTER_DISTANCE,
        }
    }
}

impl Geometry {
    /// Create a new Geometry, returning an error if any value is out of bounds
    /// or a winter dyke sits inside or below its summer dyke.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        summer_bed_width: f64,
        summer_bed_depth: f64,
        left_summer_height: f64,
        left_summer_distance: f64,
        right_summer_height: f64,
        right_summer_distance: f64,
        left_winter_height: f64,
        left_winter_distance: f64,
        right_winter_height: f64,
        right_winter_distance: f64,
    ) -> Result<Self> {
        let geometry = Self {
            summer_bed_width,
            summer_bed_depth,
            left_summer_height,
            left_summer_distance,
            right_summer_height,
            right_summer_distance,
            left_winter_height,
            left_winter_distance,
            right_winter_height,
            right_winter_distance,
        };
        geometry.validate()?;
        Ok(geometry)
    }

    /// Check bounds and dyke ordering.
    pub fn validate(&self) -> Result<()> {
        let values = self.to_array();
        for (&name, &value) in GEOMETRY_NAMES.iter().zip(&values) {
            if !value.is_finite() {
                return Err(invalid(name, value, "must be finite"));
            }
            if name.ends_with("height") {
                if value < 0.0 {
                    return Err(invalid(name, value, "must not be negative"));
                }
            } else if value <= 0.0 {
                return Err(invalid(name, value, "must be positive"));
            }
        }

        for side in [Side::Left, Side::Right] {
            let (summer_height, summer_distance) = self.summer_dyke(side);
            let (winter_height, winter_distance) = self.winter_dyke(side);
            if winter_distance < summer_distance {
                let name = match side {
                    Side::Left => "left_winter_distance",
                    Side::Right => "right_winter_distance",
                };
                return Err(invalid(
                    name,
                    winter_distance,
                    "winter dyke must not be closer than the summer dyke",
                ));
            }
            if winter_height < summer_height {
                let name = match side {
                    Side::Left => "left_winter_height",
                    Side::Right => "right_winter_height",
                };
                return Err(invalid(
                    name,
                    winter_height,
                    "winter dyke must not be lower than the summer dyke",
                ));
            }
        }
        Ok(())
    }

    /// (height, distance) of the summer dyke on `side`.
    pub fn summer_dyke(&self, side: Side) -> (f64, f64) {
        match side {
            Side::Left => (self.left_summer_height, self.left_summer_distance),
            Side::Right => (self.right_summer_height, self.right_summer_distance),
        }
    }

    /// (height, distance) of the winter dyke on `side`.
    pub fn winter_dyke(&self, side: Side) -> (f64, f64) {
        match side {
            Side::Left => (self.left_winter_height, self.left_winter_distance),
            Side::Right => (self.right_winter_height, self.right_winter_distance),
        }
    }

    /// Width between the two summer dykes, bed included.
    pub fn summer_plains_width(&self) -> f64 {
        self.left_summer_distance + self.summer_bed_width + self.right_summer_distance
    }

    /// Width between the two winter dykes.
    pub fn full_width(&self) -> f64 {
        self.left_winter_distance + self.summer_bed_width + self.right_winter_distance
    }

    /// Width of the winter plain between the summer and winter dyke on `side`.
    pub fn winter_plain_width(&self, side: Side) -> f64 {
        let (_, summer) = self.summer_dyke(side);
        let (_, winter) = self.winter_dyke(side);
        winter - summer
    }

    /// Crest of the lower summer dyke; caps the summer plains.
    pub fn lower_summer_crest(&self) -> f64 {
        self.left_summer_height.min(self.right_summer_height)
    }

    /// Crest of the higher summer dyke.
    pub fn upper_summer_crest(&self) -> f64 {
        self.left_summer_height.max(self.right_summer_height)
    }

    /// Side whose summer dyke is overtopped first, `None` when both crests match.
    pub fn short_side(&self) -> Option<Side> {
        if self.left_summer_height < self.right_summer_height {
            Some(Side::Left)
        } else if self.right_summer_height < self.left_summer_height {
            Some(Side::Right)
        } else {
            None
        }
    }

    /// Crest of the lower winter dyke; the top of the usable section.
    pub fn top_of_section(&self) -> f64 {
        self.left_winter_height.min(self.right_winter_height)
    }
}

impl ParameterSet for Geometry {
    const N_PARAMS: usize = 10;
    const PARAM_NAMES: &'static [&'static str] = GEOMETRY_NAMES;

    fn from_array(arr: &[f64]) -> Result<Self> {
        if arr.len() != Self::N_PARAMS {
            return Err(Error::WrongLength {
                what: "geometry",
                expected: Self::N_PARAMS,
                got: arr.len(),
            });
        }
        Self::new(
            arr[0], arr[1], arr[2], arr[3], arr[4], arr[5], arr[6], arr[7], arr[8], arr[9],
        )
    }

    fn to_array(&self) -> Vec<f64> {
        vec![
            self.summer_bed_width,
            self.summer_bed_depth,
            self.left_summer_height,
            self.left_summer_distance,
            self.right_summer_height,
            self.right_summer_distance,
            self.left_winter_height,
            self.left_winter_distance,
            self.right_winter_height,
            self.right_winter_distance,
        ]
    }
}

fn invalid(name: &'static str, value: f64, reason: &'static str) -> Error {
    Error::InvalidGeometry {
        name,
        value,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asymmetric() -> Geometry {
        Geometry {
            right_summer_height: 4.0,
            right_winter_height: 5.0,
            right_winter_distance: 12.0,
            ..Geometry::default()
        }
    }

    #[test]
    fn default_is_valid() {
        assert!(Geometry::default().validate().is_ok());
    }

    #[test]
    fn derived_widths() {
        let g = asymmetric();
        assert_eq!(g.summer_plains_width(), 20.0);
        assert_eq!(g.full_width(), 37.0);
        assert_eq!(g.winter_plain_width(Side::Left), 10.0);
        assert_eq!(g.winter_plain_width(Side::Right), 7.0);
    }

    #[test]
    fn crests_and_short_side() {
        let g = asymmetric();
        assert_eq!(g.lower_summer_crest(), 2.5);
        assert_eq!(g.upper_summer_crest(), 4.0);
        assert_eq!(g.short_side(), Some(Side::Left));
        assert_eq!(g.top_of_section(), 4.0);
        assert_eq!(Geometry::default().short_side(), None);
    }

    #[test]
    fn zero_heights_are_valid() {
        let g = Geometry {
            left_summer_height: 0.0,
            right_summer_height: 0.0,
            ..Geometry::default()
        };
        assert!(g.validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_width() {
        let g = Geometry {
            summer_bed_width: 0.0,
            ..Geometry::default()
        };
        assert!(matches!(
            g.validate(),
            Err(Error::InvalidGeometry { name: "summer_bed_width", .. })
        ));
    }

    #[test]
    fn rejects_negative_height() {
        let g = Geometry {
            left_summer_height: -0.5,
            ..Geometry::default()
        };
        assert!(g.validate().is_err());
    }

    #[test]
    fn rejects_nan() {
        let g = Geometry {
            summer_bed_depth: f64::NAN,
            ..Geometry::default()
        };
        assert!(g.validate().is_err());
    }

    #[test]
    fn rejects_winter_dyke_inside_summer_dyke() {
        let g = Geometry {
            right_winter_distance: 4.0,
            ..Geometry::default()
        };
        assert!(matches!(
            g.validate(),
            Err(Error::InvalidGeometry { name: "right_winter_distance", .. })
        ));
    }

    #[test]
    fn rejects_winter_dyke_below_summer_dyke() {
        let g = Geometry {
            left_winter_height: 2.0,
            ..Geometry::default()
        };
        assert!(matches!(
            g.validate(),
            Err(Error::InvalidGeometry { name: "left_winter_height", .. })
        ));
    }

    #[test]
    fn from_array_roundtrip() {
        let g = asymmetric();
        let g2 = Geometry::from_array(&g.to_array()).unwrap();
        assert_eq!(g, g2);
    }

    #[test]
    fn from_array_wrong_length() {
        assert!(matches!(
            Geometry::from_array(&[1.0, 2.0]),
            Err(Error::WrongLength { expected: 10, got: 2, .. })
        ));
    }

    #[test]
    fn named_values_follow_array_order() {
        let named = Geometry::default().named();
        assert_eq!(named[0], ("summer_bed_width", 10.0));
        assert_eq!(named[9], ("right_winter_distance", 15.0));
    }
}
