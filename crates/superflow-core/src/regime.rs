//! Flow regimes of the compound cross-section.
//!
//! As the water rises the wetted shape changes at fixed levels: the summer
//! bed fills, then the summer plains, then the winter plains behind the
//! summer dykes, and finally the whole section up to the lower winter dyke.
//! Each stretch with one fixed shape is a [`Regime`]. A regime is driven by
//! one unknown, either the water level or, while a winter plain fills behind
//! a dyke with the main channel pinned at the crest, the overflow area.
//!
//! Wetted perimeter counts the bed, the bed walls and the vertical dyke faces
//! in contact with water. Plain floors are not counted.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::constants::MAX_REGIMES;
use crate::error::{Error, Result};
use crate::geometry::{Geometry, Side};
use crate::hydraulics::{ManningFunction, WettedSection};
use crate::params::HydraulicParameters;
use crate::result::{Region, WaterLevels};
use crate::solver::split_overflow;

/// Which part of the cross-section is filling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegimeKind {
    /// Rectangular low-flow channel.
    SummerBed,
    /// Between the summer dykes, up to the lower crest.
    SummerPlains,
    /// Equal crests: both winter plains fill behind their summer dykes.
    LowerWinterPlains,
    /// Unequal crests: the winter plain behind the lower crest fills.
    LowerWinterPlain { side: Side },
    /// Main channel and the flooded winter plain on `side` rise together up
    /// to the higher crest.
    MiddleWinterPlain { side: Side },
    /// The winter plain behind the higher crest on `side` fills.
    SecondWinterPlain { side: Side },
    /// One connected surface between the winter dykes.
    UpperWinterPlains,
}

impl fmt::Display for RegimeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegimeKind::SummerBed => f.write_str("summer bed"),
            RegimeKind::SummerPlains => f.write_str("summer plains"),
            RegimeKind::LowerWinterPlains => f.write_str("lower winter plains"),
            RegimeKind::LowerWinterPlain { side } => write!(f, "lower {side} winter plain"),
            RegimeKind::MiddleWinterPlain { side } => write!(f, "middle {side} winter plain"),
            RegimeKind::SecondWinterPlain { side } => write!(f, "second ({side}) winter plain"),
            RegimeKind::UpperWinterPlains => f.write_str("upper winter plains"),
        }
    }
}

/// The quantity a regime is inverted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unknown {
    /// Water level [m] in the region that is filling.
    Level,
    /// Area [m2] spilled into the winter plains beyond the full main channel.
    OverflowArea,
}

/// One row of the regime table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Regime {
    pub kind: RegimeKind,
    pub unknown: Unknown,
    /// Lowest value of the unknown in this regime.
    pub lower: f64,
    /// Value of the unknown at saturation.
    pub upper: f64,
    /// Flow rate at saturation [m3/s].
    pub max_flow_rate: f64,
}

/// Shape of the wetted section for one value of a regime's unknown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wetting {
    pub section: WettedSection,
    pub levels: WaterLevels,
    /// Main-channel surface above the summer bed floor [m].
    pub surface_elevation: f64,
}

/// Wetted section and region levels for `kind` at unknown value `t`.
pub fn wetting(g: &Geometry, kind: RegimeKind, t: f64) -> Wetting {
    let w = g.summer_bed_width;
    let d = g.summer_bed_depth;
    let hs = g.lower_summer_crest();
    let ht = g.upper_summer_crest();
    let plains = g.summer_plains_width();

    let mut levels = WaterLevels {
        summer_bed: d,
        ..WaterLevels::default()
    };

    match kind {
        RegimeKind::SummerBed => {
            levels.summer_bed = t;
            Wetting {
                section: WettedSection::new(w * t, w + 2.0 * t),
                levels,
                surface_elevation: t,
            }
        }
        RegimeKind::SummerPlains => {
            levels.summer_plains = t;
            Wetting {
                section: WettedSection::new(w * d + plains * t, w + 2.0 * d + 2.0 * t),
                levels,
                surface_elevation: d + t,
            }
        }
        RegimeKind::LowerWinterPlains => {
            levels.summer_plains = hs;
            let capacity = [
                g.winter_plain_width(Side::Left) * hs,
                g.winter_plain_width(Side::Right) * hs,
            ];
            let base = WettedSection::new(w * d + plains * hs, w + 2.0 * d + 2.0 * hs);
            fill_winter_plains(g, base, levels, capacity, t, d + hs)
        }
        RegimeKind::LowerWinterPlain { side } => {
            levels.summer_plains = hs;
            let mut capacity = [0.0; 2];
            capacity[index(side)] = g.winter_plain_width(side) * hs;
            let base = WettedSection::new(w * d + plains * hs, w + 2.0 * d + 2.0 * hs);
            fill_winter_plains(g, base, levels, capacity, t, d + hs)
        }
        RegimeKind::MiddleWinterPlain { side } => {
            levels.summer_plains = t;
            set_plain(&mut levels, g, side, t);
            let width = plains + g.winter_plain_width(side);
            let perimeter = w + 2.0 * d + 2.0 * t + back_faces(g, &[side]);
            Wetting {
                section: WettedSection::new(w * d + width * t, perimeter),
                levels,
                surface_elevation: d + t,
            }
        }
        RegimeKind::SecondWinterPlain { side } => {
            let short = side.opposite();
            levels.summer_plains = ht;
            set_plain(&mut levels, g, short, ht);
            let mut capacity = [0.0; 2];
            capacity[index(side)] = g.winter_plain_width(side) * ht;
            let width = plains + g.winter_plain_width(short);
            let perimeter = w + 2.0 * d + 2.0 * ht + back_faces(g, &[short]);
            let base = WettedSection::new(w * d + width * ht, perimeter);
            fill_winter_plains(g, base, levels, capacity, t, d + ht)
        }
        RegimeKind::UpperWinterPlains => {
            levels.summer_plains = ht;
            set_plain(&mut levels, g, Side::Left, ht);
            set_plain(&mut levels, g, Side::Right, ht);
            levels.upper_winter_plains = t - ht;
            let perimeter = w + 2.0 * d + 2.0 * t + back_faces(g, &[Side::Left, Side::Right]);
            Wetting {
                section: WettedSection::new(w * d + g.full_width() * t, perimeter),
                levels,
                surface_elevation: d + t,
            }
        }
    }
}

/// Spill `area` into the winter plains, each bounded by `capacity`, on top of
/// a saturated `base` section. Each flooded plain adds its two wetted dyke
/// faces to the perimeter.
fn fill_winter_plains(
    g: &Geometry,
    base: WettedSection,
    mut levels: WaterLevels,
    capacity: [f64; 2],
    area: f64,
    surface_elevation: f64,
) -> Wetting {
    let split = split_overflow(area, capacity);
    let mut perimeter = base.perimeter;
    for side in [Side::Left, Side::Right] {
        let i = index(side);
        if capacity[i] <= 0.0 {
            continue;
        }
        let depth = split[i] / g.winter_plain_width(side);
        levels.set(plain_region(side), depth);
        perimeter += 2.0 * depth;
    }
    Wetting {
        section: WettedSection::new(base.area + area, perimeter),
        levels,
        surface_elevation,
    }
}

fn index(side: Side) -> usize {
    match side {
        Side::Left => 0,
        Side::Right => 1,
    }
}

fn plain_region(side: Side) -> Region {
    match side {
        Side::Left => Region::LeftWinterPlain,
        Side::Right => Region::RightWinterPlain,
    }
}

/// Both faces of the summer dyke on each of `sides` once the plain behind it
/// is full. Without a plain the summer dyke is part of the outer wall and
/// only its front face is wet, which the outer wall term already counts.
fn back_faces(g: &Geometry, sides: &[Side]) -> f64 {
    sides
        .iter()
        .filter(|&&side| g.winter_plain_width(side) > 0.0)
        .map(|&side| 2.0 * g.summer_dyke(side).0)
        .sum()
}

/// Level on a full or rising winter plain. A plain without width stays dry.
fn set_plain(levels: &mut WaterLevels, g: &Geometry, side: Side, depth: f64) {
    if g.winter_plain_width(side) > 0.0 {
        levels.set(plain_region(side), depth);
    }
}

/// First regime that conveys less at saturation than the one below it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegimeBreak {
    pub regime: RegimeKind,
    /// Capacity of the last kept regime [m3/s].
    pub previous: f64,
    /// Saturation flow rate of `regime` [m3/s].
    pub max_flow_rate: f64,
}

impl From<RegimeBreak> for Error {
    fn from(b: RegimeBreak) -> Self {
        Error::NonMonotonicRegimes {
            regime: b.regime,
            previous: b.previous,
            max_flow_rate: b.max_flow_rate,
        }
    }
}

/// Ordered regimes for one (geometry, hydraulics) pair.
///
/// Capacities are non-decreasing along the table, so the regime holding a
/// flow rate is the first whose capacity reaches it. When a regime would
/// break that order the table stops before it and records the break; flows
/// below the break still solve.
#[derive(Debug, Clone)]
pub struct RegimeTable {
    geometry: Geometry,
    manning: ManningFunction,
    regimes: SmallVec<[Regime; MAX_REGIMES]>,
    broken: Option<RegimeBreak>,
}

impl RegimeTable {
    /// Enumerate the regimes of `geometry` and their saturation flow rates.
    pub fn build(geometry: &Geometry, params: &HydraulicParameters) -> Result<Self> {
        geometry.validate()?;
        params.validate()?;
        let g = *geometry;
        let manning = ManningFunction::new(params);

        let hs = g.lower_summer_crest();
        let ht = g.upper_summer_crest();
        let top = g.top_of_section();

        let mut candidates: SmallVec<[(RegimeKind, Unknown, f64, f64); MAX_REGIMES]> =
            SmallVec::new();
        candidates.push((RegimeKind::SummerBed, Unknown::Level, 0.0, g.summer_bed_depth));
        candidates.push((RegimeKind::SummerPlains, Unknown::Level, 0.0, hs));
        match g.short_side() {
            None => {
                let area = (g.winter_plain_width(Side::Left) + g.winter_plain_width(Side::Right))
                    * hs;
                candidates.push((RegimeKind::LowerWinterPlains, Unknown::OverflowArea, 0.0, area));
            }
            Some(short) => {
                let tall = short.opposite();
                candidates.push((
                    RegimeKind::LowerWinterPlain { side: short },
                    Unknown::OverflowArea,
                    0.0,
                    g.winter_plain_width(short) * hs,
                ));
                candidates.push((
                    RegimeKind::MiddleWinterPlain { side: short },
                    Unknown::Level,
                    hs,
                    ht,
                ));
                candidates.push((
                    RegimeKind::SecondWinterPlain { side: tall },
                    Unknown::OverflowArea,
                    0.0,
                    g.winter_plain_width(tall) * ht,
                ));
            }
        }
        candidates.push((RegimeKind::UpperWinterPlains, Unknown::Level, ht, top));

        let mut regimes: SmallVec<[Regime; MAX_REGIMES]> = SmallVec::new();
        let mut broken = None;
        let mut previous = 0.0;
        for (kind, unknown, lower, mut upper) in candidates {
            // Above the lower winter dyke crest the section is breached.
            let breached = unknown == Unknown::Level && kind != RegimeKind::SummerBed && upper > top;
            if breached {
                upper = top;
            }
            if upper > lower {
                let saturated = wetting(&g, kind, upper);
                let max_flow_rate = manning.discharge(&saturated.section).ok_or(
                    Error::InvalidCrossSection {
                        regime: kind,
                        area: saturated.section.area,
                        perimeter: saturated.section.perimeter,
                    },
                )?;
                if max_flow_rate < previous {
                    warn!(
                        %kind,
                        previous,
                        max_flow_rate,
                        "regime conveys less than the one below, table truncated"
                    );
                    broken = Some(RegimeBreak {
                        regime: kind,
                        previous,
                        max_flow_rate,
                    });
                    break;
                }
                debug!(%kind, lower, upper, max_flow_rate, "regime");
                previous = max_flow_rate;
                regimes.push(Regime {
                    kind,
                    unknown,
                    lower,
                    upper,
                    max_flow_rate,
                });
            }
            if breached {
                break;
            }
        }

        Ok(Self {
            geometry: g,
            manning,
            regimes,
            broken,
        })
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn manning(&self) -> &ManningFunction {
        &self.manning
    }

    pub fn regimes(&self) -> &[Regime] {
        &self.regimes
    }

    pub fn len(&self) -> usize {
        self.regimes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regimes.is_empty()
    }

    /// Where the table stopped short of the brim, if it did.
    pub fn broken(&self) -> Option<&RegimeBreak> {
        self.broken.as_ref()
    }

    /// Highest solvable flow rate [m3/s]: the lower winter dyke brim-full,
    /// or the last kept regime's capacity when the table is broken.
    pub fn capacity(&self) -> f64 {
        self.regimes.last().map_or(0.0, |r| r.max_flow_rate)
    }

    /// First regime whose capacity reaches `flow_rate`, `None` on overflow.
    pub fn select(&self, flow_rate: f64) -> Option<&Regime> {
        self.regimes.iter().find(|r| r.max_flow_rate >= flow_rate)
    }

    /// Wetted shape of `regime` at unknown value `t`.
    pub fn wetting(&self, regime: &Regime, t: f64) -> Wetting {
        wetting(&self.geometry, regime.kind, t)
    }

    /// Raw flow rate of `regime` at unknown value `t`; may be the -1 sentinel.
    pub fn flow_rate(&self, regime: &Regime, t: f64) -> f64 {
        let section = self.wetting(regime, t).section;
        self.manning.flow_rate(section.area, section.perimeter)
    }
}
