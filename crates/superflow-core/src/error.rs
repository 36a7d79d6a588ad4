//! Error types for the cross-section solver.
//!
//! Overflow is not an error: a flow rate above the channel capacity is a
//! regular [`FlowOutcome`](crate::result::FlowOutcome). Everything here is a
//! local, recoverable condition returned to the caller.

use crate::regime::RegimeKind;

/// Solver result alias.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A geometry value violates its bounds or the dyke ordering invariants.
    #[error("invalid geometry: {name} = {value} ({reason})")]
    InvalidGeometry {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// A hydraulic parameter is out of range.
    #[error("invalid hydraulic parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// Wrong number of values when building a parameter set from an array.
    #[error("expected {expected} {what} values, got {got}")]
    WrongLength {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    /// Target flow rate is negative or not finite.
    #[error("invalid flow rate {0} m3/s: must be finite and non-negative")]
    InvalidFlowRate(f64),

    /// Manning's equation was handed a negative area or perimeter.
    #[error("invalid cross-section in {regime} regime: area {area} m2, perimeter {perimeter} m")]
    InvalidCrossSection {
        regime: RegimeKind,
        area: f64,
        perimeter: f64,
    },

    /// The root finder could not bracket or converge on the target.
    #[error("no level found for {target} m3/s in {regime} regime after {iterations} iterations")]
    NonConvergence {
        regime: RegimeKind,
        target: f64,
        iterations: usize,
    },

    /// A regime's capacity does not exceed the capacity of the one below it.
    #[error("{regime} capacity {max_flow_rate} m3/s does not exceed previous {previous} m3/s")]
    NonMonotonicRegimes {
        regime: RegimeKind,
        previous: f64,
        max_flow_rate: f64,
    },
}
