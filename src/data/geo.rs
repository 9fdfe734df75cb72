use std::collections::BTreeMap;
use std::sync::OnceLock;

use super::model::Dataset;

// ---------------------------------------------------------------------------
// CoordinateTable – fixed entity → (lat, lon) lookup
// ---------------------------------------------------------------------------

/// Fixed mapping from entity name to a representative coordinate. Not
/// derived from the dataset; entities outside the table simply stay
/// unmapped and are skipped by the map view.
#[derive(Debug)]
pub struct CoordinateTable {
    coords: BTreeMap<&'static str, (f64, f64)>,
}

/// The countries the dashboard ships coordinates for.
const COUNTRY_COORDS: [(&str, (f64, f64)); 9] = [
    ("Australia", (-25.2744, 133.7751)),
    ("Belarus", (53.7098, 27.9534)),
    ("Belgium", (50.5039, 4.4699)),
    ("Bulgaria", (42.7339, 25.4858)),
    ("Costa Rica", (9.7489, -83.7534)),
    ("Croatia", (45.1, 15.2)),
    ("Czechia", (49.8175, 15.4730)),
    ("Denmark", (56.2639, 9.5018)),
    ("Estonia", (58.5953, 25.0136)),
];

impl CoordinateTable {
    /// The built-in table, constructed on first use and shared read-only
    /// for the lifetime of the process.
    pub fn builtin() -> &'static CoordinateTable {
        static TABLE: OnceLock<CoordinateTable> = OnceLock::new();
        TABLE.get_or_init(|| CoordinateTable {
            coords: COUNTRY_COORDS.iter().copied().collect(),
        })
    }

    /// Look up the coordinate for an entity.
    pub fn get(&self, entity: &str) -> Option<(f64, f64)> {
        self.coords.get(entity).copied()
    }
}

// ---------------------------------------------------------------------------
// Enrichment pass
// ---------------------------------------------------------------------------

/// Return the dataset with every record's coordinates set from the table
/// lookup by entity, or `None` when the entity is absent. Row count and
/// order are preserved.
pub fn enrich(mut dataset: Dataset, table: &CoordinateTable) -> Dataset {
    for rec in &mut dataset.records {
        match table.get(&rec.entity) {
            Some((lat, lon)) => {
                rec.latitude = Some(lat);
                rec.longitude = Some(lon);
            }
            None => {
                rec.latitude = None;
                rec.longitude = None;
            }
        }
    }
    dataset
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Record;

    fn bare(entity: &str) -> Record {
        Record {
            entity: entity.to_string(),
            year: 2015,
            health_impact: "High".to_string(),
            premature_deaths: 1.0,
            discharge_volume: 1.0,
            latitude: None,
            longitude: None,
        }
    }

    #[test]
    fn builtin_table_knows_its_countries() {
        let table = CoordinateTable::builtin();
        assert_eq!(table.get("Australia"), Some((-25.2744, 133.7751)));
        assert_eq!(table.get("Estonia"), Some((58.5953, 25.0136)));
        assert_eq!(table.get("Atlantis"), None);
    }

    #[test]
    fn enrich_sets_coords_only_for_mapped_entities() {
        let ds = Dataset::from_records(vec![bare("Belgium"), bare("Atlantis")]);
        let ds = enrich(ds, CoordinateTable::builtin());

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].coords(), Some((50.5039, 4.4699)));
        assert_eq!(ds.records[1].coords(), None);
        // Unmapped rows stay in the dataset; only the map skips them.
        assert!(ds.entities.contains("Atlantis"));
    }

    #[test]
    fn enrich_preserves_row_order() {
        let ds = Dataset::from_records(vec![bare("Denmark"), bare("Croatia"), bare("Belarus")]);
        let ds = enrich(ds, CoordinateTable::builtin());
        let order: Vec<&str> = ds.records.iter().map(|r| r.entity.as_str()).collect();
        assert_eq!(order, ["Denmark", "Croatia", "Belarus"]);
    }
}
