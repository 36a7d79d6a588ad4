/// Manning's equation for uniform open-channel flow.
///
/// Q = (1/n) · A · R^(2/3) · √s with hydraulic radius R = A / P.
use serde::{Deserialize, Serialize};

use crate::constants::INVALID_CROSS_SECTION;
use crate::params::HydraulicParameters;

/// Wetted cross-section: flow area [m2] and wetted perimeter [m].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WettedSection {
    pub area: f64,
    pub perimeter: f64,
}

impl WettedSection {
    pub fn new(area: f64, perimeter: f64) -> Self {
        Self { area, perimeter }
    }

    /// Hydraulic radius A / P [m].
    pub fn hydraulic_radius(&self) -> f64 {
        self.area / self.perimeter
    }
}

/// Flow-rate function parameterised by roughness and slope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ManningFunction {
    inverse_roughness: f64,
    sqrt_slope: f64,
}

impl ManningFunction {
    pub fn new(params: &HydraulicParameters) -> Self {
        Self {
            inverse_roughness: 1.0 / params.manning_coefficient,
            sqrt_slope: params.slope.sqrt(),
        }
    }

    /// Flow rate [m3/s] for an area and perimeter.
    ///
    /// Returns [`INVALID_CROSS_SECTION`] (-1) when either input is negative;
    /// callers must check before trusting the value. Use
    /// [`discharge`](Self::discharge) for the checked form.
    pub fn flow_rate(&self, area: f64, perimeter: f64) -> f64 {
        if area < 0.0 || perimeter < 0.0 {
            return INVALID_CROSS_SECTION;
        }
        // R^(2/3) as the squared cube root keeps the exponent exact.
        let radius = (area / perimeter).cbrt();
        self.inverse_roughness * area * radius * radius * self.sqrt_slope
    }

    /// Checked flow rate; `None` for the sentinel or a non-finite result.
    pub fn discharge(&self, section: &WettedSection) -> Option<f64> {
        let q = self.flow_rate(section.area, section.perimeter);
        if q == INVALID_CROSS_SECTION || !q.is_finite() {
            None
        } else {
            Some(q)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn manning() -> ManningFunction {
        ManningFunction::new(&HydraulicParameters::default())
    }

    #[test]
    fn full_summer_bed_matches_hand_calculation() {
        // 10 m x 3.5 m bed: A = 35, P = 17
        let q = manning().flow_rate(35.0, 17.0);
        let expected = (1.0 / 0.035) * 35.0 * (35.0_f64 / 17.0).powf(2.0 / 3.0) * 0.1_f64.sqrt();
        assert_relative_eq!(q, expected, max_relative = 1e-12);
        assert!(q < 750.0);
    }

    #[test]
    fn negative_area_returns_sentinel() {
        assert_eq!(manning().flow_rate(-1.0, 10.0), INVALID_CROSS_SECTION);
    }

    #[test]
    fn negative_perimeter_returns_sentinel() {
        assert_eq!(manning().flow_rate(10.0, -0.1), INVALID_CROSS_SECTION);
    }

    #[test]
    fn zero_area_gives_zero_flow() {
        assert_eq!(manning().flow_rate(0.0, 10.0), 0.0);
    }

    #[test]
    fn zero_slope_gives_zero_flow() {
        let m = ManningFunction::new(&HydraulicParameters::new(0.035, 0.0).unwrap());
        assert_eq!(m.flow_rate(35.0, 17.0), 0.0);
    }

    #[test]
    fn discharge_rejects_sentinel_and_nan() {
        let m = manning();
        assert!(m.discharge(&WettedSection::new(-2.0, 5.0)).is_none());
        assert!(m.discharge(&WettedSection::new(0.0, 0.0)).is_none());
        assert!(m.discharge(&WettedSection::new(35.0, 17.0)).is_some());
    }

    #[test]
    fn rougher_channel_carries_less() {
        let smooth = manning().flow_rate(35.0, 17.0);
        let rough = ManningFunction::new(&HydraulicParameters::new(0.07, 0.1).unwrap())
            .flow_rate(35.0, 17.0);
        assert_relative_eq!(rough, smooth / 2.0, max_relative = 1e-12);
    }

    #[test]
    fn hydraulic_radius() {
        assert_relative_eq!(WettedSection::new(35.0, 17.0).hydraulic_radius(), 35.0 / 17.0);
    }
}
