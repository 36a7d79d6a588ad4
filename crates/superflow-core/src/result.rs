//! Solver outputs handed to rendering and the bindings.
//!
//! `WaterLevels` holds one depth per region, each measured from the bottom
//! of that region, never as an absolute elevation. `FlowOutcome` is either a
//! solved state or the overflow signal.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::REGION_NAMES;
use crate::hydraulics::WettedSection;
use crate::regime::RegimeKind;

/// Sub-region of the cross-section that carries its own water level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    SummerBed,
    SummerPlains,
    LeftWinterPlain,
    RightWinterPlain,
    UpperWinterPlains,
}

impl Region {
    pub const ALL: [Region; 5] = [
        Region::SummerBed,
        Region::SummerPlains,
        Region::LeftWinterPlain,
        Region::RightWinterPlain,
        Region::UpperWinterPlains,
    ];

    pub fn name(self) -> &'static str {
        REGION_NAMES[self as usize]
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Water depth per region [m].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WaterLevels {
    pub summer_bed: f64,
    pub summer_plains: f64,
    pub left_winter_plain: f64,
    pub right_winter_plain: f64,
    pub upper_winter_plains: f64,
}

impl WaterLevels {
    pub fn get(&self, region: Region) -> f64 {
        match region {
            Region::SummerBed => self.summer_bed,
            Region::SummerPlains => self.summer_plains,
            Region::LeftWinterPlain => self.left_winter_plain,
            Region::RightWinterPlain => self.right_winter_plain,
            Region::UpperWinterPlains => self.upper_winter_plains,
        }
    }

    pub fn set(&mut self, region: Region, level: f64) {
        match region {
            Region::SummerBed => self.summer_bed = level,
            Region::SummerPlains => self.summer_plains = level,
            Region::LeftWinterPlain => self.left_winter_plain = level,
            Region::RightWinterPlain => self.right_winter_plain = level,
            Region::UpperWinterPlains => self.upper_winter_plains = level,
        }
    }

    /// (region, depth) pairs in reporting order.
    pub fn iter(&self) -> impl Iterator<Item = (Region, f64)> + '_ {
        Region::ALL.into_iter().map(move |r| (r, self.get(r)))
    }

    pub fn to_array(&self) -> [f64; 5] {
        [
            self.summer_bed,
            self.summer_plains,
            self.left_winter_plain,
            self.right_winter_plain,
            self.upper_winter_plains,
        ]
    }
}

/// A solved cross-section for one flow rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowSolution {
    /// Target flow rate [m3/s].
    pub flow_rate: f64,
    /// Regime the solution was found in.
    pub regime: RegimeKind,
    pub levels: WaterLevels,
    /// Flow area [m2].
    pub flow_area: f64,
    /// Wetted perimeter [m].
    pub wetted_perimeter: f64,
    /// Main-channel water surface above the summer bed floor [m].
    pub surface_elevation: f64,
}

impl FlowSolution {
    pub(crate) fn assemble(
        flow_rate: f64,
        regime: RegimeKind,
        levels: WaterLevels,
        section: WettedSection,
        surface_elevation: f64,
    ) -> Self {
        Self {
            flow_rate,
            regime,
            levels,
            flow_area: section.area,
            wetted_perimeter: section.perimeter,
            surface_elevation,
        }
    }

    /// Mean velocity Q / A [m/s]; zero for a dry section.
    pub fn mean_velocity(&self) -> f64 {
        if self.flow_area > 0.0 {
            self.flow_rate / self.flow_area
        } else {
            0.0
        }
    }
}

/// Result of solving for a target flow rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FlowOutcome {
    /// The flow fits inside the dykes.
    Solved(FlowSolution),
    /// The flow exceeds what the section carries with the lower winter dyke
    /// brim-full: the dykes are breached and no finite level applies.
    Overflow { flow_rate: f64, capacity: f64 },
}

impl FlowOutcome {
    pub fn solution(&self) -> Option<&FlowSolution> {
        match self {
            FlowOutcome::Solved(s) => Some(s),
            FlowOutcome::Overflow { .. } => None,
        }
    }

    pub fn is_overflow(&self) -> bool {
        matches!(self, FlowOutcome::Overflow { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_names_match_constants() {
        let names: Vec<&str> = Region::ALL.iter().map(|r| r.name()).collect();
        assert_eq!(names, REGION_NAMES);
    }

    #[test]
    fn levels_default_to_zero() {
        let levels = WaterLevels::default();
        assert!(levels.iter().all(|(_, l)| l == 0.0));
    }

    #[test]
    fn set_and_get_by_region() {
        let mut levels = WaterLevels::default();
        levels.set(Region::RightWinterPlain, 1.25);
        assert_eq!(levels.get(Region::RightWinterPlain), 1.25);
        assert_eq!(levels.right_winter_plain, 1.25);
        assert_eq!(levels.to_array()[3], 1.25);
    }

    #[test]
    fn overflow_has_no_solution() {
        let outcome = FlowOutcome::Overflow {
            flow_rate: 5000.0,
            capacity: 3000.0,
        };
        assert!(outcome.is_overflow());
        assert!(outcome.solution().is_none());
    }

    #[test]
    fn mean_velocity_of_dry_section_is_zero() {
        let s = FlowSolution::assemble(
            0.0,
            RegimeKind::SummerBed,
            WaterLevels::default(),
            WettedSection::new(0.0, 10.0),
            0.0,
        );
        assert_eq!(s.mean_velocity(), 0.0);
    }
}
