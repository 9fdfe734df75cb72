use std::collections::BTreeSet;

use thiserror::Error;

use super::model::{Dataset, Record};

// ---------------------------------------------------------------------------
// FilterCriteria – the user's current selection
// ---------------------------------------------------------------------------

/// Year window preselected for a fresh session, narrowed to the dataset's
/// actual bounds (full bounds when the window misses the data entirely).
pub const DEFAULT_YEAR_WINDOW: (i32, i32) = (2015, 2019);

/// The current selection: inclusive year range plus entity and category
/// sets. Rebuilt from the controls on every interaction; a row is kept only
/// when it satisfies all three predicates at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Inclusive (from, to) year range.
    pub years: (i32, i32),
    /// Selected entities; an empty set matches nothing.
    pub entities: BTreeSet<String>,
    /// Selected health-impact categories; an empty set matches nothing.
    pub categories: BTreeSet<String>,
}

/// Filter-control initialisation failure. Fatal for the session: without
/// year bounds or selection lists there is nothing to render controls from.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterInitError {
    #[error("dataset has no rows to build filter controls from")]
    EmptyDataset,
}

impl FilterCriteria {
    /// Whether a record satisfies every active predicate.
    pub fn matches(&self, rec: &Record) -> bool {
        let (from, to) = self.years;
        rec.year >= from
            && rec.year <= to
            && self.entities.contains(&rec.entity)
            && self.categories.contains(&rec.health_impact)
    }
}

/// Default criteria for a fresh session: the preset year window narrowed to
/// the dataset's bounds and every entity and category selected.
pub fn init_criteria(dataset: &Dataset) -> Result<FilterCriteria, FilterInitError> {
    let (lo, hi) = dataset.year_bounds.ok_or(FilterInitError::EmptyDataset)?;
    let (want_from, want_to) = DEFAULT_YEAR_WINDOW;
    let years = if want_to < lo || want_from > hi {
        (lo, hi)
    } else {
        (want_from.max(lo), want_to.min(hi))
    };

    Ok(FilterCriteria {
        years,
        entities: dataset.entities.clone(),
        categories: dataset.categories.clone(),
    })
}

// ---------------------------------------------------------------------------
// Filtered view
// ---------------------------------------------------------------------------

/// Return indices of records that pass the current criteria.
///
/// Pure: the same dataset and criteria always produce the same view.
/// Criteria whose bounds lie outside the dataset's year span, and empty
/// entity or category selections, yield an empty view, never an error.
pub fn filtered_indices(dataset: &Dataset, criteria: &FilterCriteria) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| criteria.matches(rec))
        .map(|(i, _)| i)
        .collect()
}
