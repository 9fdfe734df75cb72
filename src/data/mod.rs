/// Data layer: core types, loading, enrichment, filtering, aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │   geo     │  attach country coordinates
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  year range + entity/category predicates → view indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ aggregate │  per-year sums, category counts, map centre
///   └──────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod geo;
pub mod loader;
pub mod model;
