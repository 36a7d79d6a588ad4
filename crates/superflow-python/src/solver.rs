use numpy::PyReadonlyArray1;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use crate::convert::{contiguous_slice, geometry, hydraulics, to_py_err};

use superflow_core::rating::{self, RatingCurve};
use superflow_core::{FlowOutcome, RegimeTable};

define_series_result! {
    /// Rating curve with typed numpy array attributes. Unsolved rows are NaN.
    pub struct RatingCurveResult from RatingCurve {
        flow_rate, surface_elevation, summer_bed, summer_plains,
        left_winter_plain, right_winter_plain, upper_winter_plains,
        flow_area, wetted_perimeter,
    }
}

/// Solved state for one flow rate, or the overflow signal.
///
/// On overflow `regime` is `None` and every level is NaN.
#[pyclass(frozen)]
pub struct FlowResult {
    #[pyo3(get)]
    pub flow_rate: f64,
    #[pyo3(get)]
    pub overflow: bool,
    #[pyo3(get)]
    pub capacity: f64,
    #[pyo3(get)]
    pub regime: Option<String>,
    #[pyo3(get)]
    pub surface_elevation: f64,
    #[pyo3(get)]
    pub summer_bed: f64,
    #[pyo3(get)]
    pub summer_plains: f64,
    #[pyo3(get)]
    pub left_winter_plain: f64,
    #[pyo3(get)]
    pub right_winter_plain: f64,
    #[pyo3(get)]
    pub upper_winter_plains: f64,
    #[pyo3(get)]
    pub flow_area: f64,
    #[pyo3(get)]
    pub wetted_perimeter: f64,
}

#[pymethods]
impl FlowResult {
    fn __repr__(&self) -> String {
        match &self.regime {
            Some(regime) => format!(
                "FlowResult(flow_rate={}, regime='{}', surface_elevation={})",
                self.flow_rate, regime, self.surface_elevation
            ),
            None => format!(
                "FlowResult(flow_rate={}, overflow=True, capacity={})",
                self.flow_rate, self.capacity
            ),
        }
    }
}

impl FlowResult {
    fn from_outcome(outcome: FlowOutcome, capacity: f64) -> Self {
        match outcome {
            FlowOutcome::Solved(s) => Self {
                flow_rate: s.flow_rate,
                overflow: false,
                capacity,
                regime: Some(s.regime.to_string()),
                surface_elevation: s.surface_elevation,
                summer_bed: s.levels.summer_bed,
                summer_plains: s.levels.summer_plains,
                left_winter_plain: s.levels.left_winter_plain,
                right_winter_plain: s.levels.right_winter_plain,
                upper_winter_plains: s.levels.upper_winter_plains,
                flow_area: s.flow_area,
                wetted_perimeter: s.wetted_perimeter,
            },
            FlowOutcome::Overflow {
                flow_rate,
                capacity,
            } => Self {
                flow_rate,
                overflow: true,
                capacity,
                regime: None,
                surface_elevation: f64::NAN,
                summer_bed: f64::NAN,
                summer_plains: f64::NAN,
                left_winter_plain: f64::NAN,
                right_winter_plain: f64::NAN,
                upper_winter_plains: f64::NAN,
                flow_area: f64::NAN,
                wetted_perimeter: f64::NAN,
            },
        }
    }
}

fn build_table<'py>(
    geometry_arr: &'py PyReadonlyArray1<'py, f64>,
    hydraulics_arr: &'py PyReadonlyArray1<'py, f64>,
) -> PyResult<RegimeTable> {
    let g = geometry(geometry_arr)?;
    let p = hydraulics(hydraulics_arr)?;
    RegimeTable::build(&g, &p).map_err(to_py_err)
}

#[pyfunction]
fn solve<'py>(
    geometry: PyReadonlyArray1<'py, f64>,
    hydraulics: PyReadonlyArray1<'py, f64>,
    flow_rate: f64,
) -> PyResult<FlowResult> {
    let table = build_table(&geometry, &hydraulics)?;
    let outcome = superflow_core::solver::solve(&table, flow_rate).map_err(to_py_err)?;
    Ok(FlowResult::from_outcome(outcome, table.capacity()))
}

#[pyfunction]
fn capacity<'py>(
    geometry: PyReadonlyArray1<'py, f64>,
    hydraulics: PyReadonlyArray1<'py, f64>,
) -> PyResult<f64> {
    Ok(build_table(&geometry, &hydraulics)?.capacity())
}

/// One dict per regime: kind, unknown, lower, upper, max_flow_rate.
#[pyfunction]
fn regime_table<'py>(
    py: Python<'py>,
    geometry: PyReadonlyArray1<'py, f64>,
    hydraulics: PyReadonlyArray1<'py, f64>,
) -> PyResult<Bound<'py, PyList>> {
    let table = build_table(&geometry, &hydraulics)?;
    let rows = PyList::empty(py);
    for r in table.regimes() {
        let dict = PyDict::new(py);
        dict.set_item("kind", r.kind.to_string())?;
        dict.set_item("unknown", format!("{:?}", r.unknown))?;
        dict.set_item("lower", r.lower)?;
        dict.set_item("upper", r.upper)?;
        dict.set_item("max_flow_rate", r.max_flow_rate)?;
        rows.append(dict)?;
    }
    Ok(rows)
}

#[pyfunction]
#[pyo3(signature = (geometry, hydraulics, flow_rates=None, points=20))]
fn rating_curve<'py>(
    py: Python<'py>,
    geometry: PyReadonlyArray1<'py, f64>,
    hydraulics: PyReadonlyArray1<'py, f64>,
    flow_rates: Option<PyReadonlyArray1<'py, f64>>,
    points: usize,
) -> PyResult<RatingCurveResult> {
    let table = build_table(&geometry, &hydraulics)?;
    let curve = match &flow_rates {
        Some(arr) => rating::rating_curve(&table, contiguous_slice(arr)?),
        None => rating::rating_curve(&table, &rating::flow_rates(table.capacity(), points)),
    };
    Ok(RatingCurveResult::from_series(py, curve))
}

pub fn register(parent: &Bound<'_, PyModule>) -> PyResult<()> {
    let m = PyModule::new(parent.py(), "solver")?;
    m.add_function(wrap_pyfunction!(solve, &m)?)?;
    m.add_function(wrap_pyfunction!(capacity, &m)?)?;
    m.add_function(wrap_pyfunction!(regime_table, &m)?)?;
    m.add_function(wrap_pyfunction!(rating_curve, &m)?)?;
    m.add_class::<FlowResult>()?;
    m.add_class::<RatingCurveResult>()?;
    parent.add_submodule(&m)?;
    Ok(())
}
