use std::collections::BTreeMap;

use crate::color::CategoryColors;
use crate::data::aggregate::{count_by_category, mean_coordinates, sum_by_year, Metric};
use crate::data::filter::{filtered_indices, FilterCriteria};
use crate::data::model::Dataset;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None when the startup load failed).
    pub dataset: Option<Dataset>,

    /// Current filter selections.
    pub criteria: FilterCriteria,

    /// Indices of records passing the current filters (cached).
    pub view: Vec<usize>,

    /// Premature deaths summed per year over the view (cached).
    pub deaths_by_year: Vec<(i32, f64)>,

    /// Discharge volume summed per year over the view (cached).
    pub discharge_by_year: Vec<(i32, f64)>,

    /// Record count per health-impact category over the view (cached).
    pub category_counts: BTreeMap<String, usize>,

    /// Mean coordinate of the view's mappable rows (cached).
    pub map_center: Option<(f64, f64)>,

    /// Colour per health-impact category for the distribution chart.
    pub category_colors: CategoryColors,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Build the state around a loaded dataset and its initial filter
    /// selections, with all caches populated.
    pub fn with_dataset(dataset: Dataset, criteria: FilterCriteria) -> Self {
        let category_colors = CategoryColors::new(&dataset.categories);
        let mut state = Self {
            dataset: Some(dataset),
            criteria,
            view: Vec::new(),
            deaths_by_year: Vec::new(),
            discharge_by_year: Vec::new(),
            category_counts: BTreeMap::new(),
            map_center: None,
            category_colors,
            status_message: None,
        };
        state.refresh();
        state
    }

    /// State for a startup that could not produce a dataset; the UI shows
    /// `message` instead of the dashboard body.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            dataset: None,
            criteria: FilterCriteria::default(),
            view: Vec::new(),
            deaths_by_year: Vec::new(),
            discharge_by_year: Vec::new(),
            category_counts: BTreeMap::new(),
            map_center: None,
            category_colors: CategoryColors::default(),
            status_message: Some(message.into()),
        }
    }

    /// Recompute the view and every derived aggregate from `criteria`.
    pub fn refresh(&mut self) {
        let Some(ds) = &self.dataset else { return };
        self.view = filtered_indices(ds, &self.criteria);
        self.deaths_by_year = sum_by_year(ds, &self.view, Metric::PrematureDeaths);
        self.discharge_by_year = sum_by_year(ds, &self.view, Metric::DischargeVolume);
        self.category_counts = count_by_category(ds, &self.view);
        self.map_center = mean_coordinates(ds, &self.view);
        log::debug!(
            "pipeline refresh: {} of {} records in view",
            self.view.len(),
            ds.len()
        );
    }

    /// Apply an edited year range: endpoints are ordered and clamped to the
    /// dataset's bounds before the caches are rebuilt.
    pub fn set_year_range(&mut self, from: i32, to: i32) {
        let (mut lo, mut hi) = if from <= to { (from, to) } else { (to, from) };
        if let Some((min, max)) = self.dataset.as_ref().and_then(|ds| ds.year_bounds) {
            lo = lo.clamp(min, max);
            hi = hi.clamp(min, max);
        }
        self.criteria.years = (lo, hi);
        self.refresh();
    }

    /// Toggle a single country in the entity filter.
    pub fn toggle_entity(&mut self, entity: &str) {
        if !self.criteria.entities.remove(entity) {
            self.criteria.entities.insert(entity.to_string());
        }
        self.refresh();
    }

    /// Toggle a single health-impact category.
    pub fn toggle_category(&mut self, category: &str) {
        if !self.criteria.categories.remove(category) {
            self.criteria.categories.insert(category.to_string());
        }
        self.refresh();
    }

    /// Select every country in the dataset.
    pub fn select_all_entities(&mut self) {
        if let Some(ds) = &self.dataset {
            self.criteria.entities = ds.entities.clone();
        }
        self.refresh();
    }

    /// Deselect every country.
    pub fn clear_entities(&mut self) {
        self.criteria.entities.clear();
        self.refresh();
    }

    /// Select every health-impact category in the dataset.
    pub fn select_all_categories(&mut self) {
        if let Some(ds) = &self.dataset {
            self.criteria.categories = ds.categories.clone();
        }
        self.refresh();
    }

    /// Deselect every health-impact category.
    pub fn clear_categories(&mut self) {
        self.criteria.categories.clear();
        self.refresh();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::init_criteria;
    use crate::data::model::Record;

    fn record(entity: &str, year: i32, impact: &str, deaths: f64) -> Record {
        Record {
            entity: entity.to_string(),
            year,
            health_impact: impact.to_string(),
            premature_deaths: deaths,
            discharge_volume: deaths * 2.0,
            latitude: None,
            longitude: None,
        }
    }

    fn loaded_state() -> AppState {
        let dataset = Dataset::from_records(vec![
            record("Australia", 2015, "High", 10.0),
            record("Australia", 2016, "Low", 5.0),
            record("Belgium", 2015, "High", 7.0),
        ]);
        let criteria = init_criteria(&dataset).unwrap();
        AppState::with_dataset(dataset, criteria)
    }

    #[test]
    fn startup_state_has_populated_caches() {
        let state = loaded_state();
        assert_eq!(state.view, vec![0, 1, 2]);
        assert_eq!(
            state.deaths_by_year,
            vec![(2015, 17.0), (2016, 5.0)]
        );
        assert_eq!(state.category_counts["High"], 2);
        assert_eq!(state.category_counts["Low"], 1);
        assert_eq!(state.map_center, None);
        assert!(state.status_message.is_none());
    }

    #[test]
    fn toggling_an_entity_off_shrinks_the_view_and_aggregates() {
        let mut state = loaded_state();
        state.toggle_entity("Belgium");
        assert_eq!(state.view, vec![0, 1]);
        assert_eq!(
            state.deaths_by_year,
            vec![(2015, 10.0), (2016, 5.0)]
        );
        assert_eq!(state.category_counts["High"], 1);

        // Toggling again restores it.
        state.toggle_entity("Belgium");
        assert_eq!(state.view, vec![0, 1, 2]);
    }

    #[test]
    fn clearing_categories_empties_the_view_without_erroring() {
        let mut state = loaded_state();
        state.clear_categories();
        assert!(state.view.is_empty());
        assert!(state.deaths_by_year.is_empty());
        assert!(state.category_counts.is_empty());

        state.select_all_categories();
        assert_eq!(state.view.len(), 3);
    }

    #[test]
    fn year_range_edits_are_ordered_and_clamped() {
        let mut state = loaded_state();
        state.set_year_range(2019, 2010);
        assert_eq!(state.criteria.years, (2015, 2016));

        state.set_year_range(2016, 2016);
        assert_eq!(state.view, vec![1]);
        assert_eq!(state.deaths_by_year, vec![(2016, 5.0)]);
    }

    #[test]
    fn failed_startup_carries_the_message_and_no_dataset() {
        let mut state = AppState::failed("could not read data file");
        assert!(state.dataset.is_none());
        assert_eq!(
            state.status_message.as_deref(),
            Some("could not read data file")
        );

        // Refresh on a failed state is a no-op, not a panic.
        state.refresh();
        assert!(state.view.is_empty());
    }
}
