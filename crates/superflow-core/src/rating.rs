//! Rating curve: the cross-section solved over a range of flow rates.
//!
//! Each row holds the stage and region levels for one flow rate. Rows that
//! overflow or fail to solve keep their flow rate and carry NaN elsewhere, so
//! the columns stay aligned with the input.

use superflow_macros::Series;
use tracing::warn;

use crate::regime::RegimeTable;
use crate::result::{FlowOutcome, FlowSolution};
use crate::solver;

/// One point of the rating curve.
#[derive(Debug, Clone, Copy, PartialEq, Series)]
#[series(name = "RatingCurve")]
pub struct RatingPoint {
    pub flow_rate: f64,
    pub surface_elevation: f64,
    pub summer_bed: f64,
    pub summer_plains: f64,
    pub left_winter_plain: f64,
    pub right_winter_plain: f64,
    pub upper_winter_plains: f64,
    pub flow_area: f64,
    pub wetted_perimeter: f64,
}

impl RatingPoint {
    fn solved(s: &FlowSolution) -> Self {
        Self {
            flow_rate: s.flow_rate,
            surface_elevation: s.surface_elevation,
            summer_bed: s.levels.summer_bed,
            summer_plains: s.levels.summer_plains,
            left_winter_plain: s.levels.left_winter_plain,
            right_winter_plain: s.levels.right_winter_plain,
            upper_winter_plains: s.levels.upper_winter_plains,
            flow_area: s.flow_area,
            wetted_perimeter: s.wetted_perimeter,
        }
    }

    fn unsolved(flow_rate: f64) -> Self {
        Self {
            flow_rate,
            surface_elevation: f64::NAN,
            summer_bed: f64::NAN,
            summer_plains: f64::NAN,
            left_winter_plain: f64::NAN,
            right_winter_plain: f64::NAN,
            upper_winter_plains: f64::NAN,
            flow_area: f64::NAN,
            wetted_perimeter: f64::NAN,
        }
    }

    pub fn is_solved(&self) -> bool {
        !self.surface_elevation.is_nan()
    }
}

/// Solve every flow rate in `flow_rates` against `table`.
pub fn rating_curve(table: &RegimeTable, flow_rates: &[f64]) -> RatingCurve {
    let mut curve = RatingCurve::with_capacity(flow_rates.len());
    let mut skipped = 0usize;

    for &q in flow_rates {
        let point = match solver::solve(table, q) {
            Ok(FlowOutcome::Solved(s)) => RatingPoint::solved(&s),
            Ok(FlowOutcome::Overflow { .. }) => {
                skipped += 1;
                RatingPoint::unsolved(q)
            }
            Err(err) => {
                warn!(flow_rate = q, %err, "rating point not solved");
                skipped += 1;
                RatingPoint::unsolved(q)
            }
        };
        curve.push(&point);
    }

    if skipped > 0 {
        warn!(skipped, total = flow_rates.len(), "rating curve has unsolved points");
    }
    curve
}

/// `n` evenly spaced flow rates from 0 to `capacity` inclusive.
pub fn flow_rates(capacity: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![capacity],
        _ => {
            let last = (n - 1) as f64;
            (0..n).map(|i| capacity * i as f64 / last).collect()
        }
    }
}
