//! superflow - water levels in a compound river cross-section.
//!
//! A summer bed flanked by summer plains and winter plains, bounded by dykes
//! of possibly unequal height. Given a flow rate, Manning's equation is
//! inverted regime by regime to find the water level in each region.

pub mod channel;
pub mod config;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod hydraulics;
pub mod params;
pub mod rating;
pub mod regime;
pub mod result;
pub mod solver;
pub mod traits;

pub use channel::Channel;
pub use error::{Error, Result};
pub use geometry::{Geometry, Side};
pub use params::HydraulicParameters;
pub use regime::{Regime, RegimeKind, RegimeTable};
pub use result::{FlowOutcome, FlowSolution, Region, WaterLevels};
