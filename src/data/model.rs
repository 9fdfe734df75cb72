use std::collections::BTreeSet;

// ---------------------------------------------------------------------------
// Record – one row of the dataset
// ---------------------------------------------------------------------------

/// A single observation: one country, one year, one severity label,
/// and the two numeric metrics the dashboard charts.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Country name, the geographic join key.
    pub entity: String,
    /// Observation year.
    pub year: i32,
    /// Categorical severity label (e.g. "High" / "Low").
    pub health_impact: String,
    /// Premature deaths attributed to unsafe water.
    pub premature_deaths: f64,
    /// Discharges to inland waters, million m³.
    pub discharge_volume: f64,
    /// Derived at enrichment time; `None` for entities without a known
    /// coordinate. Always set together with `longitude`.
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Record {
    /// (latitude, longitude) when the record is mappable.
    pub fn coords(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed filter-control indices.
/// Built once at startup and treated as read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// All records (rows), in file order.
    pub records: Vec<Record>,
    /// Sorted distinct entity names.
    pub entities: BTreeSet<String>,
    /// Sorted distinct health-impact labels.
    pub categories: BTreeSet<String>,
    /// Inclusive (min, max) year span; `None` when there are no rows.
    pub year_bounds: Option<(i32, i32)>,
}

impl Dataset {
    /// Build the control indices from the loaded records.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut entities = BTreeSet::new();
        let mut categories = BTreeSet::new();
        let mut year_bounds: Option<(i32, i32)> = None;

        for rec in &records {
            entities.insert(rec.entity.clone());
            categories.insert(rec.health_impact.clone());
            year_bounds = Some(match year_bounds {
                Some((lo, hi)) => (lo.min(rec.year), hi.max(rec.year)),
                None => (rec.year, rec.year),
            });
        }

        Dataset {
            records,
            entities,
            categories,
            year_bounds,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
