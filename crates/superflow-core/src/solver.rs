//! Level solver: inverts a regime's flow-rate function for a target flow.
//!
//! Flow rate grows with the regime's unknown, so a bracketed bisection on
//! `[lower, upper]` converges to the unique crossing. The bracket is checked
//! up front and any failure surfaces as an error instead of a zero level.

use tracing::{debug, trace, warn};

use crate::constants::{FLOW_TOLERANCE, LEVEL_TOLERANCE, MAX_ITERATIONS};
use crate::error::{Error, Result};
use crate::regime::{Regime, RegimeTable};
use crate::result::{FlowOutcome, FlowSolution};

/// Split `area` between the left and right winter plains.
///
/// Both sides take half. A side whose half exceeds its capacity is clamped to
/// it and the remainder goes to the other side. The caller keeps `area`
/// within the combined capacity.
pub fn split_overflow(area: f64, capacity: [f64; 2]) -> [f64; 2] {
    let half = area / 2.0;
    if half > capacity[0] {
        [capacity[0], (area - capacity[0]).min(capacity[1])]
    } else if half > capacity[1] {
        [(area - capacity[1]).min(capacity[0]), capacity[1]]
    } else {
        [half, half]
    }
}

/// Outcome of a bisection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Root {
    pub x: f64,
    pub iterations: usize,
}

/// Why a bisection stopped without a root.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RootError {
    /// `f` returned a negative sentinel or NaN at `x`.
    Invalid { x: f64 },
    /// The target is not between `f(lower)` and `f(upper)`.
    NotBracketed { f_lower: f64, f_upper: f64 },
    /// `MAX_ITERATIONS` steps did not reach the tolerance.
    MaxIterations,
}

/// Find `x` in `[lower, upper]` with `f(x) = target` for non-decreasing `f`.
///
/// Endpoint values within `FLOW_TOLERANCE` of the target are accepted as
/// roots, which absorbs rounding where two regimes meet.
pub fn bisect<F>(f: F, lower: f64, upper: f64, target: f64) -> std::result::Result<Root, RootError>
where
    F: Fn(f64) -> f64,
{
    let tolerance = FLOW_TOLERANCE * target.max(1.0);
    let evaluate = |x: f64| {
        let y = f(x);
        if y.is_nan() || y < 0.0 {
            Err(RootError::Invalid { x })
        } else {
            Ok(y)
        }
    };

    let f_lower = evaluate(lower)?;
    if (f_lower - target).abs() <= tolerance {
        return Ok(Root { x: lower, iterations: 0 });
    }
    let f_upper = evaluate(upper)?;
    if (f_upper - target).abs() <= tolerance {
        return Ok(Root { x: upper, iterations: 0 });
    }
    if f_lower > target || f_upper < target {
        return Err(RootError::NotBracketed { f_lower, f_upper });
    }

    let width = LEVEL_TOLERANCE * (upper - lower).abs().max(1.0);
    let (mut lo, mut hi) = (lower, upper);
    for i in 1..=MAX_ITERATIONS {
        let mid = 0.5 * (lo + hi);
        let f_mid = evaluate(mid)?;
        trace!(iteration = i, x = mid, flow_rate = f_mid, "bisect");
        if (f_mid - target).abs() <= tolerance || (hi - lo) <= width {
            return Ok(Root { x: mid, iterations: i });
        }
        if f_mid < target {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    Err(RootError::MaxIterations)
}

/// Solve the cross-section for `flow_rate` [m3/s].
///
/// Returns `FlowOutcome::Overflow` when the flow exceeds the table's
/// capacity, and an error when the flow rate is invalid, the regime cannot
/// be inverted, or the flow lies past a break in a non-monotone table.
pub fn solve(table: &RegimeTable, flow_rate: f64) -> Result<FlowOutcome> {
    if !flow_rate.is_finite() || flow_rate < 0.0 {
        return Err(Error::InvalidFlowRate(flow_rate));
    }

    let Some(regime) = table.select(flow_rate) else {
        if let Some(&broken) = table.broken() {
            warn!(flow_rate, regime = %broken.regime, "flow rate reaches a non-monotone regime");
            return Err(broken.into());
        }
        let capacity = table.capacity();
        warn!(flow_rate, capacity, "flow rate exceeds channel capacity");
        return Ok(FlowOutcome::Overflow {
            flow_rate,
            capacity,
        });
    };
    debug!(regime = %regime.kind, flow_rate, "selected regime");

    let x = invert(table, regime, flow_rate)?;
    let wetting = table.wetting(regime, x);
    Ok(FlowOutcome::Solved(FlowSolution::assemble(
        flow_rate,
        regime.kind,
        wetting.levels,
        wetting.section,
        wetting.surface_elevation,
    )))
}

/// Value of the regime's unknown that carries `flow_rate`.
fn invert(table: &RegimeTable, regime: &Regime, flow_rate: f64) -> Result<f64> {
    let root = bisect(
        |x| table.flow_rate(regime, x),
        regime.lower,
        regime.upper,
        flow_rate,
    );
    match root {
        Ok(root) => {
            debug!(x = root.x, iterations = root.iterations, unknown = ?regime.unknown, "converged");
            Ok(root.x)
        }
        Err(RootError::Invalid { x }) => {
            let section = table.wetting(regime, x).section;
            Err(Error::InvalidCrossSection {
                regime: regime.kind,
                area: section.area,
                perimeter: section.perimeter,
            })
        }
        Err(err) => {
            warn!(regime = %regime.kind, flow_rate, ?err, "level inversion failed");
            let iterations = match err {
                RootError::MaxIterations => MAX_ITERATIONS,
                _ => 0,
            };
            Err(Error::NonConvergence {
                regime: regime.kind,
                target: flow_rate,
                iterations,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Geometry, Side};
    use crate::params::HydraulicParameters;
    use crate::regime::{RegimeKind, Unknown};
    use approx::assert_relative_eq;

    fn table(g: &Geometry) -> RegimeTable {
        RegimeTable::build(g, &HydraulicParameters::default()).unwrap()
    }

    fn solved(outcome: FlowOutcome) -> FlowSolution {
        match outcome {
            FlowOutcome::Solved(s) => s,
            FlowOutcome::Overflow { .. } => panic!("unexpected overflow"),
        }
    }

    // -- split_overflow --

    #[test]
    fn split_is_even_below_capacity() {
        assert_eq!(split_overflow(10.0, [25.0, 25.0]), [5.0, 5.0]);
    }

    #[test]
    fn split_clamps_left_and_shifts() {
        assert_eq!(split_overflow(30.0, [10.0, 25.0]), [10.0, 20.0]);
    }

    #[test]
    fn split_clamps_right_and_shifts() {
        assert_eq!(split_overflow(30.0, [25.0, 10.0]), [20.0, 10.0]);
    }

    #[test]
    fn split_routes_everything_to_the_open_side() {
        assert_eq!(split_overflow(7.0, [0.0, 25.0]), [0.0, 7.0]);
        assert_eq!(split_overflow(7.0, [25.0, 0.0]), [7.0, 0.0]);
        assert_eq!(split_overflow(0.0, [0.0, 25.0]), [0.0, 0.0]);
    }

    #[test]
    fn split_never_exceeds_capacity_and_conserves_area() {
        let capacity = [12.0, 30.0];
        for i in 0..=42 {
            let area = i as f64;
            let [l, r] = split_overflow(area, capacity);
            assert!(l <= capacity[0] && r <= capacity[1]);
            assert_relative_eq!(l + r, area, epsilon = 1e-12);
        }
    }

    // -- bisect --

    #[test]
    fn bisect_finds_square_root() {
        let root = bisect(|x| x * x, 0.0, 4.0, 2.0).unwrap();
        assert_relative_eq!(root.x, 2.0_f64.sqrt(), max_relative = 1e-9);
        assert!(root.iterations < MAX_ITERATIONS);
    }

    #[test]
    fn bisect_accepts_endpoints() {
        assert_eq!(bisect(|x| x, 0.0, 1.0, 0.0).unwrap().x, 0.0);
        assert_eq!(bisect(|x| x, 0.0, 1.0, 1.0).unwrap().x, 1.0);
    }

    #[test]
    fn bisect_reports_unbracketed_target() {
        assert!(matches!(
            bisect(|x| x, 0.0, 1.0, 5.0),
            Err(RootError::NotBracketed { .. })
        ));
        assert!(matches!(
            bisect(|x| x + 2.0, 0.0, 1.0, 1.0),
            Err(RootError::NotBracketed { .. })
        ));
    }

    #[test]
    fn bisect_reports_sentinel() {
        assert!(matches!(
            bisect(|x| if x > 0.3 { -1.0 } else { x }, 0.0, 1.0, 0.5),
            Err(RootError::Invalid { .. })
        ));
    }

    // -- solve --

    #[test]
    fn zero_flow_is_dry() {
        let s = solved(solve(&table(&Geometry::default()), 0.0).unwrap());
        assert_eq!(s.regime, RegimeKind::SummerBed);
        assert!(s.levels.iter().all(|(_, l)| l == 0.0));
        assert_eq!(s.flow_area, 0.0);
    }

    #[test]
    fn rejects_negative_and_nan_flow() {
        let t = table(&Geometry::default());
        assert_eq!(solve(&t, -1.0), Err(Error::InvalidFlowRate(-1.0)));
        assert!(matches!(solve(&t, f64::NAN), Err(Error::InvalidFlowRate(_))));
    }

    #[test]
    fn flow_within_summer_bed() {
        let t = table(&Geometry::default());
        let s = solved(solve(&t, 200.0).unwrap());
        assert_eq!(s.regime, RegimeKind::SummerBed);
        assert!(s.levels.summer_bed > 0.0 && s.levels.summer_bed < 3.5);
        assert_eq!(s.levels.summer_plains, 0.0);
        assert_relative_eq!(s.flow_area, 10.0 * s.levels.summer_bed, max_relative = 1e-12);
        assert_relative_eq!(
            t.manning().flow_rate(s.flow_area, s.wetted_perimeter),
            200.0,
            max_relative = 1e-6
        );
    }

    #[test]
    fn capacity_of_a_regime_lands_on_its_saturation_level() {
        let t = table(&Geometry::default());
        let bed = t.regimes()[0];
        let s = solved(solve(&t, bed.max_flow_rate).unwrap());
        assert_eq!(s.regime, RegimeKind::SummerBed);
        assert_relative_eq!(s.levels.summer_bed, 3.5, max_relative = 1e-9);
        assert_eq!(s.levels.summer_plains, 0.0);
    }

    #[test]
    fn overflow_above_capacity() {
        let t = table(&Geometry::default());
        let outcome = solve(&t, t.capacity() * 1.01).unwrap();
        assert_eq!(
            outcome,
            FlowOutcome::Overflow {
                flow_rate: t.capacity() * 1.01,
                capacity: t.capacity(),
            }
        );
    }

    #[test]
    fn exact_capacity_is_not_overflow() {
        let t = table(&Geometry::default());
        let s = solved(solve(&t, t.capacity()).unwrap());
        assert_eq!(s.regime, RegimeKind::UpperWinterPlains);
        assert_relative_eq!(s.levels.upper_winter_plains, 1.5, max_relative = 1e-9);
    }

    #[test]
    fn symmetric_winter_plains_fill_evenly() {
        let t = table(&Geometry::default());
        let lower = t.regimes()[2];
        assert_eq!(lower.unknown, Unknown::OverflowArea);
        let target = 0.5 * (t.regimes()[1].max_flow_rate + lower.max_flow_rate);
        let s = solved(solve(&t, target).unwrap());
        assert_eq!(s.regime, RegimeKind::LowerWinterPlains);
        assert_eq!(s.levels.summer_plains, 2.5);
        assert_relative_eq!(s.levels.left_winter_plain, s.levels.right_winter_plain);
        assert!(s.levels.left_winter_plain > 0.0 && s.levels.left_winter_plain < 2.5);
    }

    #[test]
    fn narrower_plain_fills_first() {
        // Left plain 4 m wide, right 10 m: an even area split fills the left first.
        let g = Geometry {
            left_winter_distance: 9.0,
            ..Geometry::default()
        };
        let t = table(&g);
        let lower = t.regimes()[2];
        assert_eq!(lower.kind, RegimeKind::LowerWinterPlains);
        let near_full = t.flow_rate(&lower, 0.9 * lower.upper);
        let s = solved(solve(&t, near_full).unwrap());
        assert_relative_eq!(s.levels.left_winter_plain, 2.5, max_relative = 1e-9);
        assert!(s.levels.right_winter_plain < 2.5);
    }

    #[test]
    fn second_winter_plain_pins_short_side() {
        let g = Geometry {
            right_summer_height: 4.0,
            right_winter_height: 5.0,
            left_winter_height: 5.0,
            ..Geometry::default()
        };
        let t = table(&g);
        let second = t
            .regimes()
            .iter()
            .find(|r| r.kind == RegimeKind::SecondWinterPlain { side: Side::Right })
            .copied()
            .unwrap();
        let target = t.flow_rate(&second, 0.5 * second.upper);
        let s = solved(solve(&t, target).unwrap());
        assert_eq!(s.levels.summer_plains, 4.0);
        assert_eq!(s.levels.left_winter_plain, 4.0);
        assert_relative_eq!(s.levels.right_winter_plain, 2.0, max_relative = 1e-6);
        assert_relative_eq!(s.surface_elevation, 7.5);
    }

    #[test]
    fn upper_regime_keeps_short_plain_at_taller_crest() {
        let g = Geometry {
            right_summer_height: 4.0,
            right_winter_height: 5.0,
            left_winter_height: 5.0,
            ..Geometry::default()
        };
        let t = table(&g);
        let second = t.regimes()[4];
        assert_eq!(second.kind, RegimeKind::SecondWinterPlain { side: Side::Right });

        let at = solved(solve(&t, second.max_flow_rate).unwrap());
        let above = solved(solve(&t, second.max_flow_rate * 1.0001).unwrap());
        assert_eq!(above.regime, RegimeKind::UpperWinterPlains);
        assert_eq!(at.levels.left_winter_plain, 4.0);
        assert_eq!(above.levels.left_winter_plain, 4.0);
        assert_eq!(above.levels.right_winter_plain, 4.0);
        assert!(above.levels.upper_winter_plains > 0.0);
        assert!(above.surface_elevation > at.surface_elevation);
    }

    #[test]
    fn narrow_plains_still_solve_below_the_break() {
        let g = Geometry {
            left_winter_distance: 5.5,
            right_winter_distance: 5.5,
            ..Geometry::default()
        };
        let t = table(&g);
        assert_eq!(t.broken().unwrap().regime, RegimeKind::LowerWinterPlains);

        let s = solved(solve(&t, 10.0).unwrap());
        assert_eq!(s.regime, RegimeKind::SummerBed);
        assert!(s.levels.summer_bed > 0.0);

        let s = solved(solve(&t, t.capacity()).unwrap());
        assert_eq!(s.regime, RegimeKind::SummerPlains);

        assert!(matches!(
            solve(&t, t.capacity() + 1.0),
            Err(Error::NonMonotonicRegimes {
                regime: RegimeKind::LowerWinterPlains,
                ..
            })
        ));
    }
}
