/// Hydraulic parameters for Manning's equation.
///
/// - `manning_coefficient`: channel roughness n [s/m^(1/3)], > 0
/// - `slope`: longitudinal energy slope [-], >= 0
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MANNING, DEFAULT_SLOPE, HYDRAULIC_NAMES};
use crate::error::{Error, Result};
use crate::traits::ParameterSet;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HydraulicParameters {
    pub manning_coefficient: f64,
    pub slope: f64,
}

impl Default for HydraulicParameters {
    fn default() -> Self {
        Self {
            manning_coefficient: DEFAULT_MANNING,
            slope: DEFAULT_SLOPE,
        }
    }
}

impl HydraulicParameters {
    /// Create new HydraulicParameters, returning an error if out of range.
    pub fn new(manning_coefficient: f64, slope: f64) -> Result<Self> {
        let params = Self {
            manning_coefficient,
            slope,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        let n = self.manning_coefficient;
        if !n.is_finite() || n <= 0.0 {
            return Err(Error::InvalidParameter {
                name: "manning_coefficient",
                value: n,
                reason: "must be finite and positive",
            });
        }
        if !self.slope.is_finite() || self.slope < 0.0 {
            return Err(Error::InvalidParameter {
                name: "slope",
                value: self.slope,
                reason: "must be finite and non-negative",
            });
        }
        Ok(())
    }
}

impl ParameterSet for HydraulicParameters {
    const N_PARAMS: usize = 2;
    const PARAM_NAMES: &'static [&'static str] = HYDRAULIC_NAMES;

    fn from_array(arr: &[f64]) -> Result<Self> {
        if arr.len() != Self::N_PARAMS {
            return Err(Error::WrongLength {
                what: "hydraulic",
                expected: Self::N_PARAMS,
                got: arr.len(),
            });
        }
        Self::new(arr[0], arr[1])
    }

    fn to_array(&self) -> Vec<f64> {
        vec![self.manning_coefficient, self.slope]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_parameters() {
        let p = HydraulicParameters::new(0.035, 0.1).unwrap();
        assert_eq!(p.manning_coefficient, 0.035);
        assert_eq!(p.slope, 0.1);
    }

    #[test]
    fn zero_slope_is_valid() {
        assert!(HydraulicParameters::new(0.035, 0.0).is_ok());
    }

    #[test]
    fn rejects_zero_roughness() {
        assert!(HydraulicParameters::new(0.0, 0.1).is_err());
    }

    #[test]
    fn rejects_negative_slope() {
        assert!(matches!(
            HydraulicParameters::new(0.035, -0.01),
            Err(Error::InvalidParameter { name: "slope", .. })
        ));
    }

    #[test]
    fn from_array_roundtrip() {
        let p = HydraulicParameters::default();
        let p2 = HydraulicParameters::from_array(&p.to_array()).unwrap();
        assert_eq!(p, p2);
    }

    #[test]
    fn from_array_wrong_length() {
        assert!(HydraulicParameters::from_array(&[0.035]).is_err());
        assert!(HydraulicParameters::from_array(&[0.035, 0.1, 1.0]).is_err());
    }
}
