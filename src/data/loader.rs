use std::path::{Path, PathBuf};

use arrow::array::{
    Array, ArrayRef, AsArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{Dataset, Record};

// ---------------------------------------------------------------------------
// Schema contract
// ---------------------------------------------------------------------------

pub const COL_ENTITY: &str = "Entity";
pub const COL_YEAR: &str = "Year";
pub const COL_HEALTH_IMPACT: &str = "Health_Impact";
pub const COL_DEATHS: &str = "Premature_Death_Count";
/// Header exactly as it appears in the source dataset.
pub const COL_DISCHARGE: &str = "Total discharges to Inland waters(million m3)";

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Loader failures. All of them abort the load; a partial dataset is never
/// returned.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The file is missing or unreadable.
    #[error("failed to read dataset {path}: {source}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file exists but its contents could not be parsed.
    #[error("malformed dataset: {0}")]
    Malformed(String),
    /// A required column is absent from the file.
    #[error("dataset is missing required column '{0}'")]
    MissingColumn(String),
    /// The extension is not one of the supported formats.
    #[error("unsupported file extension: .{0}")]
    Unsupported(String),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the dashboard dataset from a file. Dispatch by extension.
///
/// Supported formats, all sharing the same column contract
/// (`Entity`, `Year`, `Health_Impact`, `Premature_Death_Count`, discharge):
/// * `.csv`     – delimited text with a header row (the source format)
/// * `.json`    – records-oriented array, `[{ "Entity": ..., ... }, ...]`
/// * `.parquet` – flat scalar columns under the same names
///
/// Extra columns are ignored. Coordinates are not read from the file; they
/// are filled in later by the geocode enrichment pass.
pub fn load_file(path: &Path) -> Result<Dataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(LoadError::Unsupported(other.to_string())),
    }
}

fn open(path: &Path) -> Result<std::fs::File, LoadError> {
    std::fs::File::open(path).map_err(|source| LoadError::Unavailable {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// One row as it appears in the source CSV. Years are strict; metric cells
/// deserialize as `Option` so empty cells can count as zero. Extra columns
/// are ignored.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Entity")]
    entity: String,
    #[serde(rename = "Year")]
    year: i32,
    #[serde(rename = "Health_Impact")]
    health_impact: String,
    #[serde(rename = "Premature_Death_Count")]
    premature_deaths: Option<f64>,
    #[serde(rename = "Total discharges to Inland waters(million m3)")]
    discharge_volume: Option<f64>,
}

impl From<CsvRow> for Record {
    fn from(row: CsvRow) -> Self {
        Record {
            entity: row.entity,
            year: row.year,
            health_impact: row.health_impact,
            premature_deaths: row.premature_deaths.unwrap_or(0.0),
            discharge_volume: row.discharge_volume.unwrap_or(0.0),
            latitude: None,
            longitude: None,
        }
    }
}

fn load_csv(path: &Path) -> Result<Dataset, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(open(path)?);

    // Check the column contract up front so the error names the column
    // instead of pointing at the first row.
    let headers = reader
        .headers()
        .map_err(|e| LoadError::Malformed(format!("reading CSV headers: {e}")))?;
    for required in [
        COL_ENTITY,
        COL_YEAR,
        COL_HEALTH_IMPACT,
        COL_DEATHS,
        COL_DISCHARGE,
    ] {
        if !headers.iter().any(|h| h == required) {
            return Err(LoadError::MissingColumn(required.to_string()));
        }
    }

    let mut records = Vec::new();
    for (row_no, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = result.map_err(|e| LoadError::Malformed(format!("CSV row {row_no}: {e}")))?;
        records.push(Record::from(row));
    }

    Ok(Dataset::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "Entity": "Belgium",
///     "Year": 2016,
///     "Health_Impact": "High",
///     "Premature_Death_Count": 120,
///     "Total discharges to Inland waters(million m3)": 834.2
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Dataset, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Unavailable {
        path: path.to_path_buf(),
        source,
    })?;
    let root: JsonValue = serde_json::from_str(&text)
        .map_err(|e| LoadError::Malformed(format!("parsing JSON: {e}")))?;
    let rows = root
        .as_array()
        .ok_or_else(|| LoadError::Malformed("expected a top-level JSON array of records".into()))?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, rec) in rows.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| LoadError::Malformed(format!("row {i} is not a JSON object")))?;
        let field = |key: &str| obj.get(key).ok_or_else(|| LoadError::MissingColumn(key.to_string()));

        records.push(Record {
            entity: json_str(field(COL_ENTITY)?, i, COL_ENTITY)?,
            year: json_year(field(COL_YEAR)?, i)?,
            health_impact: json_str(field(COL_HEALTH_IMPACT)?, i, COL_HEALTH_IMPACT)?,
            premature_deaths: json_metric(field(COL_DEATHS)?, i, COL_DEATHS)?,
            discharge_volume: json_metric(field(COL_DISCHARGE)?, i, COL_DISCHARGE)?,
            latitude: None,
            longitude: None,
        });
    }

    Ok(Dataset::from_records(records))
}

fn json_str(val: &JsonValue, row: usize, column: &str) -> Result<String, LoadError> {
    val.as_str()
        .map(str::to_string)
        .ok_or_else(|| LoadError::Malformed(format!("row {row}, {column}: expected a string")))
}

fn json_year(val: &JsonValue, row: usize) -> Result<i32, LoadError> {
    val.as_i64()
        .and_then(|y| i32::try_from(y).ok())
        .ok_or_else(|| LoadError::Malformed(format!("row {row}: '{val}' is not a valid year")))
}

fn json_metric(val: &JsonValue, row: usize, column: &str) -> Result<f64, LoadError> {
    if val.is_null() {
        return Ok(0.0); // same treatment as an empty CSV cell
    }
    val.as_f64()
        .ok_or_else(|| LoadError::Malformed(format!("row {row}, {column}: expected a number")))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with flat scalar columns. Works with files written
/// by both Pandas (`df.to_parquet()`) and Polars (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Dataset, LoadError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(open(path)?)
        .map_err(|e| LoadError::Malformed(format!("reading parquet metadata: {e}")))?;
    let reader = builder
        .build()
        .map_err(|e| LoadError::Malformed(format!("building parquet reader: {e}")))?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch =
            batch_result.map_err(|e| LoadError::Malformed(format!("reading record batch: {e}")))?;
        let schema = batch.schema();
        let col = |name: &str| {
            schema
                .index_of(name)
                .map_err(|_| LoadError::MissingColumn(name.to_string()))
        };
        let entity_col = batch.column(col(COL_ENTITY)?);
        let year_col = batch.column(col(COL_YEAR)?);
        let impact_col = batch.column(col(COL_HEALTH_IMPACT)?);
        let deaths_col = batch.column(col(COL_DEATHS)?);
        let discharge_col = batch.column(col(COL_DISCHARGE)?);

        for row in 0..batch.num_rows() {
            records.push(Record {
                entity: string_at(entity_col, row, COL_ENTITY)?,
                year: year_at(year_col, row)?,
                health_impact: string_at(impact_col, row, COL_HEALTH_IMPACT)?,
                premature_deaths: metric_at(deaths_col, row, COL_DEATHS)?,
                discharge_volume: metric_at(discharge_col, row, COL_DISCHARGE)?,
                latitude: None,
                longitude: None,
            });
        }
    }

    Ok(Dataset::from_records(records))
}

// -- Arrow column helpers --

fn string_at(col: &ArrayRef, row: usize, column: &str) -> Result<String, LoadError> {
    if col.is_null(row) {
        return Err(LoadError::Malformed(format!(
            "row {row}, {column}: unexpected null"
        )));
    }
    match col.data_type() {
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .ok_or_else(|| LoadError::Malformed(format!("{column}: expected StringArray")))?;
            Ok(arr.value(row).to_string())
        }
        DataType::LargeUtf8 => Ok(col.as_string::<i64>().value(row).to_string()),
        other => Err(LoadError::Malformed(format!(
            "{column}: expected a string column, got {other:?}"
        ))),
    }
}

fn year_at(col: &ArrayRef, row: usize) -> Result<i32, LoadError> {
    if col.is_null(row) {
        return Err(LoadError::Malformed(format!(
            "row {row}: unexpected null year"
        )));
    }
    let wide = match col.data_type() {
        DataType::Int32 => {
            let arr = col.as_any().downcast_ref::<Int32Array>().ok_or_else(|| {
                LoadError::Malformed(format!("{COL_YEAR}: expected Int32Array"))
            })?;
            i64::from(arr.value(row))
        }
        DataType::Int64 => {
            let arr = col.as_any().downcast_ref::<Int64Array>().ok_or_else(|| {
                LoadError::Malformed(format!("{COL_YEAR}: expected Int64Array"))
            })?;
            arr.value(row)
        }
        other => {
            return Err(LoadError::Malformed(format!(
                "{COL_YEAR}: expected an integer column, got {other:?}"
            )))
        }
    };
    i32::try_from(wide)
        .map_err(|_| LoadError::Malformed(format!("row {row}: year {wide} out of range")))
}

fn metric_at(col: &ArrayRef, row: usize, column: &str) -> Result<f64, LoadError> {
    if col.is_null(row) {
        return Ok(0.0); // same treatment as an empty CSV cell
    }
    match col.data_type() {
        DataType::Float64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float64Array>()
                .ok_or_else(|| LoadError::Malformed(format!("{column}: expected Float64Array")))?;
            Ok(arr.value(row))
        }
        DataType::Float32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float32Array>()
                .ok_or_else(|| LoadError::Malformed(format!("{column}: expected Float32Array")))?;
            Ok(f64::from(arr.value(row)))
        }
        DataType::Int64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int64Array>()
                .ok_or_else(|| LoadError::Malformed(format!("{column}: expected Int64Array")))?;
            Ok(arr.value(row) as f64)
        }
        DataType::Int32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int32Array>()
                .ok_or_else(|| LoadError::Malformed(format!("{column}: expected Int32Array")))?;
            Ok(f64::from(arr.value(row)))
        }
        other => Err(LoadError::Malformed(format!(
            "{column}: expected a numeric column, got {other:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    fn temp_path(name: &str) -> PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!("wastewatch_loader_{}_{name}", std::process::id()));
        p
    }

    fn write_csv(name: &str, contents: &str) -> PathBuf {
        let path = temp_path(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    const HEADER: &str = "Entity,Year,Health_Impact,Premature_Death_Count,\
Total discharges to Inland waters(million m3),Extra";

    #[test]
    fn csv_round_trip() {
        let path = write_csv(
            "ok.csv",
            &format!(
                "{HEADER}\nAustralia,2015,High,120,834.5,x\nBelgium,2016,Low,45,210.0,y\n"
            ),
        );
        let ds = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].entity, "Australia");
        assert_eq!(ds.records[0].year, 2015);
        assert_eq!(ds.records[0].premature_deaths, 120.0);
        assert_eq!(ds.records[1].discharge_volume, 210.0);
        assert_eq!(ds.year_bounds, Some((2015, 2016)));
        // Coordinates are not the loader's job.
        assert_eq!(ds.records[0].coords(), None);
    }

    #[test]
    fn missing_file_is_unavailable() {
        let err = load_file(Path::new("/nonexistent/wastewater.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Unavailable { .. }));
    }

    #[test]
    fn missing_column_is_schema_error() {
        let path = write_csv(
            "nocol.csv",
            "Entity,Year,Premature_Death_Count\nAustralia,2015,120\n",
        );
        let err = load_file(&path).unwrap_err();
        std::fs::remove_file(&path).ok();

        match err {
            LoadError::MissingColumn(col) => assert_eq!(col, COL_HEALTH_IMPACT),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn malformed_year_aborts_the_load() {
        let path = write_csv(
            "badyear.csv",
            &format!("{HEADER}\nAustralia,twenty15,High,120,834.5,x\n"),
        );
        let err = load_file(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, LoadError::Malformed(_)));
    }

    #[test]
    fn empty_metric_cells_count_as_zero() {
        let path = write_csv(
            "gaps.csv",
            &format!("{HEADER}\nAustralia,2015,High,,,x\n"),
        );
        let ds = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(ds.records[0].premature_deaths, 0.0);
        assert_eq!(ds.records[0].discharge_volume, 0.0);
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = load_file(Path::new("data.xlsx")).unwrap_err();
        assert!(matches!(err, LoadError::Unsupported(ext) if ext == "xlsx"));
    }

    #[test]
    fn json_records_round_trip() {
        let path = temp_path("ok.json");
        std::fs::write(
            &path,
            format!(
                r#"[{{"Entity":"Croatia","Year":2018,"Health_Impact":"High",
                     "Premature_Death_Count":33,"{COL_DISCHARGE}":null}}]"#
            ),
        )
        .unwrap();
        let ds = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records[0].entity, "Croatia");
        assert_eq!(ds.records[0].premature_deaths, 33.0);
        assert_eq!(ds.records[0].discharge_volume, 0.0);
    }

    #[test]
    fn json_missing_key_is_schema_error() {
        let path = temp_path("nokey.json");
        std::fs::write(&path, r#"[{"Entity":"Croatia","Year":2018}]"#).unwrap();
        let err = load_file(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, LoadError::MissingColumn(_)));
    }

    #[test]
    fn parquet_round_trip() {
        let schema = Arc::new(Schema::new(vec![
            Field::new(COL_ENTITY, DataType::Utf8, false),
            Field::new(COL_YEAR, DataType::Int64, false),
            Field::new(COL_HEALTH_IMPACT, DataType::Utf8, false),
            Field::new(COL_DEATHS, DataType::Float64, false),
            Field::new(COL_DISCHARGE, DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["Denmark", "Estonia"])),
                Arc::new(Int64Array::from(vec![2017, 2019])),
                Arc::new(StringArray::from(vec!["Low", "High"])),
                Arc::new(Float64Array::from(vec![12.0, 48.0])),
                Arc::new(Float64Array::from(vec![Some(300.25), None])),
            ],
        )
        .unwrap();

        let path = temp_path("ok.parquet");
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].entity, "Denmark");
        assert_eq!(ds.records[0].year, 2017);
        assert_eq!(ds.records[0].discharge_volume, 300.25);
        // Null metric reads as zero, like an empty CSV cell.
        assert_eq!(ds.records[1].discharge_volume, 0.0);
    }
}
