//! A cross-section with its regime table cached.
//!
//! The table depends only on geometry and hydraulic parameters, so it is
//! built once and rebuilt when either changes. Solving is read-only and the
//! table can be shared across threads.

use tracing::debug;

use crate::error::Result;
use crate::geometry::Geometry;
use crate::params::HydraulicParameters;
use crate::regime::RegimeTable;
use crate::result::FlowOutcome;
use crate::solver;

#[derive(Debug, Clone)]
pub struct Channel {
    geometry: Geometry,
    params: HydraulicParameters,
    table: RegimeTable,
}

impl Channel {
    pub fn new(geometry: Geometry, params: HydraulicParameters) -> Result<Self> {
        let table = RegimeTable::build(&geometry, &params)?;
        Ok(Self {
            geometry,
            params,
            table,
        })
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn params(&self) -> &HydraulicParameters {
        &self.params
    }

    pub fn table(&self) -> &RegimeTable {
        &self.table
    }

    /// Flow rate with the lower winter dyke brim-full [m3/s].
    pub fn capacity(&self) -> f64 {
        self.table.capacity()
    }

    /// Replace the geometry and rebuild the table. On error the channel is
    /// left unchanged.
    pub fn set_geometry(&mut self, geometry: Geometry) -> Result<()> {
        if geometry == self.geometry {
            return Ok(());
        }
        self.table = RegimeTable::build(&geometry, &self.params)?;
        self.geometry = geometry;
        debug!(regimes = self.table.len(), "rebuilt regime table for new geometry");
        Ok(())
    }

    /// Replace the hydraulic parameters and rebuild the table. On error the
    /// channel is left unchanged.
    pub fn set_parameters(&mut self, params: HydraulicParameters) -> Result<()> {
        if params == self.params {
            return Ok(());
        }
        self.table = RegimeTable::build(&self.geometry, &params)?;
        self.params = params;
        debug!(regimes = self.table.len(), "rebuilt regime table for new parameters");
        Ok(())
    }

    pub fn solve(&self, flow_rate: f64) -> Result<FlowOutcome> {
        solver::solve(&self.table, flow_rate)
    }
}
