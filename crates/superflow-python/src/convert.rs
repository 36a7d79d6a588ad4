use numpy::PyReadonlyArray1;
use pyo3::exceptions::{PyArithmeticError, PyValueError};
use pyo3::prelude::*;

use superflow_core::traits::ParameterSet;
use superflow_core::{Error, Geometry, HydraulicParameters};

/// Validate that a numpy array is C-contiguous and return its slice.
pub fn contiguous_slice<'py>(arr: &'py PyReadonlyArray1<'py, f64>) -> PyResult<&'py [f64]> {
    arr.as_slice()
        .map_err(|_| PyValueError::new_err("array must be C-contiguous"))
}

/// Validate length + contiguity of a numpy array.
pub fn checked_slice<'py>(
    arr: &'py PyReadonlyArray1<'py, f64>,
    expected_len: usize,
    name: &str,
) -> PyResult<&'py [f64]> {
    let slice = contiguous_slice(arr)?;
    if slice.len() != expected_len {
        return Err(PyValueError::new_err(format!(
            "{} must have {} elements, got {}",
            name,
            expected_len,
            slice.len()
        )));
    }
    Ok(slice)
}

/// Solver failures are arithmetic errors; everything else is a bad input.
pub fn to_py_err(err: Error) -> PyErr {
    match err {
        Error::NonConvergence { .. }
        | Error::InvalidCrossSection { .. }
        | Error::NonMonotonicRegimes { .. } => {
            PyArithmeticError::new_err(err.to_string())
        }
        _ => PyValueError::new_err(err.to_string()),
    }
}

pub fn geometry<'py>(arr: &'py PyReadonlyArray1<'py, f64>) -> PyResult<Geometry> {
    let slice = checked_slice(arr, Geometry::N_PARAMS, "geometry")?;
    Geometry::from_array(slice).map_err(to_py_err)
}

pub fn hydraulics<'py>(arr: &'py PyReadonlyArray1<'py, f64>) -> PyResult<HydraulicParameters> {
    let slice = checked_slice(arr, HydraulicParameters::N_PARAMS, "hydraulics")?;
    HydraulicParameters::from_array(slice).map_err(to_py_err)
}
