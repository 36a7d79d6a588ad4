use crate::error::Result;

/// Flat-array view of a validated parameter set.
///
/// Geometry and hydraulic parameters travel as plain `f64` arrays through the
/// bindings and the bench; this trait fixes their order and names.
pub trait ParameterSet: Sized {
    const N_PARAMS: usize;
    const PARAM_NAMES: &'static [&'static str];

    /// Build from a slice in `PARAM_NAMES` order, validating every value.
    fn from_array(arr: &[f64]) -> Result<Self>;

    /// Flatten to a vector in `PARAM_NAMES` order.
    fn to_array(&self) -> Vec<f64>;

    /// Pair each value with its name.
    fn named(&self) -> Vec<(&'static str, f64)> {
        Self::PARAM_NAMES
            .iter()
            .copied()
            .zip(self.to_array())
            .collect()
    }
}
