use std::collections::BTreeMap;

use super::model::{Dataset, Record};

// ---------------------------------------------------------------------------
// Metric – which numeric field a time series sums
// ---------------------------------------------------------------------------

/// The numeric fields the dashboard charts over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    PrematureDeaths,
    DischargeVolume,
}

impl Metric {
    /// Value of the metric for one record.
    pub fn value(self, rec: &Record) -> f64 {
        match self {
            Metric::PrematureDeaths => rec.premature_deaths,
            Metric::DischargeVolume => rec.discharge_volume,
        }
    }

    /// Y-axis label for the time-series charts.
    pub fn label(self) -> &'static str {
        match self {
            Metric::PrematureDeaths => "Premature deaths",
            Metric::DischargeVolume => "Discharges (million m³)",
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregations over the filtered view
// ---------------------------------------------------------------------------

/// Sum `metric` per year over the view. The output ascends by year with one
/// entry per distinct year present; years with no matching rows are
/// omitted, not zero-filled.
pub fn sum_by_year(dataset: &Dataset, view: &[usize], metric: Metric) -> Vec<(i32, f64)> {
    let mut sums: BTreeMap<i32, f64> = BTreeMap::new();
    for &i in view {
        let rec = &dataset.records[i];
        *sums.entry(rec.year).or_insert(0.0) += metric.value(rec);
    }
    sums.into_iter().collect()
}

/// Count rows per health-impact category over the view, covering exactly
/// the categories present in it.
pub fn count_by_category(dataset: &Dataset, view: &[usize]) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for &i in view {
        *counts
            .entry(dataset.records[i].health_impact.clone())
            .or_insert(0) += 1;
    }
    counts
}

/// Mean (latitude, longitude) over the view's mappable rows; `None` when no
/// row carries coordinates. Unmapped rows are skipped here but still count
/// in every other aggregation.
pub fn mean_coordinates(dataset: &Dataset, view: &[usize]) -> Option<(f64, f64)> {
    let mut lat_sum = 0.0;
    let mut lon_sum = 0.0;
    let mut n = 0usize;
    for &i in view {
        if let Some((lat, lon)) = dataset.records[i].coords() {
            lat_sum += lat;
            lon_sum += lon;
            n += 1;
        }
    }
    (n > 0).then(|| (lat_sum / n as f64, lon_sum / n as f64))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(entity: &str, year: i32, impact: &str, deaths: f64) -> Record {
        Record {
            entity: entity.to_string(),
            year,
            health_impact: impact.to_string(),
            premature_deaths: deaths,
            discharge_volume: deaths * 10.0,
            latitude: None,
            longitude: None,
        }
    }

    fn sample() -> Dataset {
        Dataset::from_records(vec![
            record("Australia", 2015, "High", 10.0),
            record("Australia", 2016, "Low", 5.0),
            record("Belgium", 2015, "High", 7.0),
        ])
    }

    #[test]
    fn sums_the_worked_example() {
        let ds = sample();
        let view = vec![0, 2]; // the 2015 rows

        let deaths = sum_by_year(&ds, &view, Metric::PrematureDeaths);
        assert_eq!(deaths, vec![(2015, 17.0)]);

        let counts = count_by_category(&ds, &view);
        assert_eq!(counts.len(), 1);
        assert_eq!(counts["High"], 2);
    }

    #[test]
    fn years_ascend_without_duplicates_and_totals_are_preserved() {
        let ds = Dataset::from_records(vec![
            record("Belgium", 2019, "High", 3.0),
            record("Australia", 2015, "High", 10.0),
            record("Belgium", 2015, "Low", 7.0),
            record("Australia", 2017, "Low", 5.0),
        ]);
        let view: Vec<usize> = (0..ds.len()).collect();

        let series = sum_by_year(&ds, &view, Metric::DischargeVolume);
        let years: Vec<i32> = series.iter().map(|&(y, _)| y).collect();
        assert_eq!(years, vec![2015, 2017, 2019]);
        assert!(years.windows(2).all(|w| w[0] < w[1]));

        let series_total: f64 = series.iter().map(|&(_, v)| v).sum();
        let view_total: f64 = view
            .iter()
            .map(|&i| ds.records[i].discharge_volume)
            .sum();
        assert_eq!(series_total, view_total);
    }

    #[test]
    fn category_counts_total_the_view_length() {
        let ds = sample();
        let view: Vec<usize> = (0..ds.len()).collect();
        let counts = count_by_category(&ds, &view);
        assert_eq!(counts.values().sum::<usize>(), view.len());
        assert_eq!(counts["High"], 2);
        assert_eq!(counts["Low"], 1);
    }

    #[test]
    fn empty_view_aggregates_to_nothing() {
        let ds = sample();
        assert!(sum_by_year(&ds, &[], Metric::PrematureDeaths).is_empty());
        assert!(count_by_category(&ds, &[]).is_empty());
        assert_eq!(mean_coordinates(&ds, &[]), None);
    }

    #[test]
    fn mean_centre_skips_unmapped_rows_but_counts_keep_them() {
        let mut mapped = record("Australia", 2015, "High", 1.0);
        mapped.latitude = Some(-20.0);
        mapped.longitude = Some(130.0);
        let mut mapped2 = record("Belgium", 2015, "High", 1.0);
        mapped2.latitude = Some(50.0);
        mapped2.longitude = Some(4.0);
        let unmapped = record("Atlantis", 2015, "High", 1.0);

        let ds = Dataset::from_records(vec![mapped, unmapped, mapped2]);
        let view: Vec<usize> = (0..ds.len()).collect();

        assert_eq!(mean_coordinates(&ds, &view), Some((15.0, 67.0)));
        assert_eq!(count_by_category(&ds, &view)["High"], 3);
    }
}
