//! Python bindings for the search UI backend.

use std::collections::HashMap;

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyList;

use crate::config::SeriesConfig;
use crate::consumer::segment;
use crate::record::Dataset;
use crate::series::classify;

fn value_error(err: impl std::fmt::Display) -> PyErr {
    PyValueError::new_err(err.to_string())
}

/// Split a title into its segment values.
#[pyfunction]
pub fn segment_title(title: &str) -> PyResult<Vec<String>> {
    let seq = segment(title).map_err(value_error)?;
    Ok(seq.values().into_iter().map(str::to_string).collect())
}

/// Whether two titles are within `max_cost` edits of each other.
#[pyfunction]
#[pyo3(signature = (a, b, max_cost=0))]
pub fn titles_within_threshold(a: &str, b: &str, max_cost: usize) -> PyResult<bool> {
    crate::distance::titles_within_threshold(a, b, max_cost).map_err(value_error)
}

/// Group search results into same-package and similar-title series.
///
/// Parameters
/// ----------
/// records_json : str
///     JSON array of search result records.
/// similarity_threshold : int
///     Largest title distance grouped as similar. Default 0.
///
/// Returns
/// -------
/// tuple[list[list[int]], list[list[int]]]
///     Same-package and similar-title groups as indices into the input.
#[pyfunction]
#[pyo3(signature = (records_json, similarity_threshold=0))]
pub fn classify_series(
    py: Python<'_>,
    records_json: &str,
    similarity_threshold: usize,
) -> PyResult<(Py<PyList>, Py<PyList>)> {
    let records = Dataset::from_json_array(records_json).map_err(value_error)?;
    let config = SeriesConfig {
        similarity_threshold,
        ..SeriesConfig::default()
    };
    let batch = classify(&records, &config).map_err(value_error)?;

    let index: HashMap<*const Dataset, usize> = records
        .iter()
        .enumerate()
        .map(|(i, r)| (r as *const Dataset, i))
        .collect();

    let to_list = |groups: &[Vec<&Dataset>]| -> PyResult<Py<PyList>> {
        let outer = PyList::empty_bound(py);
        for group in groups {
            let indices: Vec<usize> = group.iter().map(|d| index[&(*d as *const Dataset)]).collect();
            outer.append(PyList::new_bound(py, indices))?;
        }
        Ok(outer.unbind())
    };

    Ok((to_list(&batch.same_series)?, to_list(&batch.similar_series)?))
}
