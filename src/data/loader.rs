use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{
    DataType, Date32Type, Float32Type, Float64Type, Int32Type, Int64Type, UInt32Type, UInt64Type,
};
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use chrono::NaiveDate;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::file::reader::ChunkReader;
use serde::Deserialize;

use super::model::{RentalRecord, RentalTable};
use crate::config::DEFAULT_HTTP_TIMEOUT;
use crate::error::LoadError;

const DATE_COLUMNS: [&str; 2] = ["dteday", "date"];
const HOLIDAY: &str = "holiday";
const WORKINGDAY: &str = "workingday";
const TEMP: &str = "temp";
const HUM: &str = "hum";
const WINDSPEED: &str = "windspeed";
const CNT: &str = "cnt";

// ---------------------------------------------------------------------------
// Where the data lives and what shape it has
// ---------------------------------------------------------------------------

/// Location of a rental dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Path(PathBuf),
    Url(String),
}

impl DataSource {
    /// `http://` and `https://` strings become URLs, anything else a path.
    pub fn parse(s: &str) -> Self {
        let lower = s.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            DataSource::Url(s.to_string())
        } else {
            DataSource::Path(PathBuf::from(s))
        }
    }

    fn format(&self) -> Result<Format, LoadError> {
        match self {
            DataSource::Path(path) => {
                Format::from_extension(path.extension().and_then(|e| e.to_str()).unwrap_or(""))
            }
            DataSource::Url(url) => {
                let rest = url.split_once("://").map_or(url.as_str(), |(_, rest)| rest);
                let rest = rest.split(['?', '#']).next().unwrap_or("");
                let path = rest.split_once('/').map_or("", |(_, path)| path);
                let last = path.rsplit('/').next().unwrap_or("");
                let ext = last.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
                Format::from_extension(ext)
            }
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Path(p) => write!(f, "{}", p.display()),
            DataSource::Url(u) => f.write_str(u),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Csv,
    Json,
    Parquet,
}

impl Format {
    fn from_extension(ext: &str) -> Result<Self, LoadError> {
        match ext.to_ascii_lowercase().as_str() {
            "" | "csv" | "txt" => Ok(Format::Csv),
            "json" => Ok(Format::Json),
            "parquet" | "pq" => Ok(Format::Parquet),
            other => Err(LoadError::UnsupportedFormat(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Loads rental tables from disk or over HTTP.
#[derive(Debug, Clone)]
pub struct Loader {
    http_timeout: Duration,
}

impl Default for Loader {
    fn default() -> Self {
        Self::new(DEFAULT_HTTP_TIMEOUT)
    }
}

impl Loader {
    pub fn new(http_timeout: Duration) -> Self {
        Self { http_timeout }
    }

    /// Read the whole dataset; any bad row fails the load.
    pub fn load(&self, source: &DataSource) -> Result<RentalTable, LoadError> {
        let format = source.format()?;
        log::debug!("loading {source} as {format:?}");

        let records = match source {
            DataSource::Path(path) => {
                let file = File::open(path).map_err(|e| LoadError::Io {
                    path: path.clone(),
                    source: e,
                })?;
                match format {
                    Format::Csv => parse_csv(file)?,
                    Format::Json => parse_json(file)?,
                    Format::Parquet => parse_parquet(file)?,
                }
            }
            DataSource::Url(url) => {
                let body = self.fetch(url)?;
                match format {
                    Format::Csv => parse_csv(&body[..])?,
                    Format::Json => parse_json(&body[..])?,
                    Format::Parquet => parse_parquet(body)?,
                }
            }
        };

        log::info!("loaded {} days from {source}", records.len());
        Ok(RentalTable::new(records, source.to_string()))
    }

    fn fetch(&self, url: &str) -> Result<Bytes, LoadError> {
        let http_err = |source| LoadError::Http {
            url: url.to_string(),
            source,
        };
        let client = reqwest::blocking::Client::builder()
            .timeout(self.http_timeout)
            .build()
            .map_err(http_err)?;
        client
            .get(url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.bytes())
            .map_err(http_err)
    }
}

/// Load a local file with the default settings.
pub fn load_file(path: &Path) -> Result<RentalTable, LoadError> {
    Loader::default().load(&DataSource::Path(path.to_path_buf()))
}

// ---------------------------------------------------------------------------
// Row validation shared by all formats
// ---------------------------------------------------------------------------

/// One row after format-specific decoding, before validation.
struct RawRow {
    row: usize,
    date: NaiveDate,
    holiday: i64,
    workingday: i64,
    temp: f64,
    hum: f64,
    windspeed: f64,
    cnt: i64,
}

impl RawRow {
    fn into_record(self) -> Result<RentalRecord, LoadError> {
        let row = self.row;
        let flag = |column: &'static str, v: i64| match v {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(LoadError::InvalidValue {
                row,
                column,
                value: v.to_string(),
            }),
        };
        let factor = |column: &'static str, v: f64| {
            if v.is_finite() {
                Ok(v)
            } else {
                Err(LoadError::InvalidValue {
                    row,
                    column,
                    value: v.to_string(),
                })
            }
        };
        let cnt = u64::try_from(self.cnt).map_err(|_| LoadError::InvalidValue {
            row,
            column: CNT,
            value: self.cnt.to_string(),
        })?;

        Ok(RentalRecord::new(
            self.date,
            flag(HOLIDAY, self.holiday)?,
            flag(WORKINGDAY, self.workingday)?,
            factor(TEMP, self.temp)?,
            factor(HUM, self.hum)?,
            factor(WINDSPEED, self.windspeed)?,
            cnt,
        ))
    }
}

fn build_records(rows: impl IntoIterator<Item = RawRow>) -> Result<Vec<RentalRecord>, LoadError> {
    let mut seen = HashSet::new();
    let mut records = Vec::new();
    for raw in rows {
        let row = raw.row;
        let record = raw.into_record()?;
        if !seen.insert(record.date()) {
            return Err(LoadError::DuplicateDate {
                row,
                date: record.date(),
            });
        }
        records.push(record);
    }
    Ok(records)
}

/// ISO dates, optionally with the midnight time pandas appends.
fn parse_date(row: usize, text: &str) -> Result<NaiveDate, LoadError> {
    let trimmed = text.trim();
    let day = trimmed
        .strip_suffix(" 00:00:00")
        .or_else(|| trimmed.strip_suffix("T00:00:00"))
        .unwrap_or(trimmed);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(day, "%Y/%m/%d"))
        .map_err(|_| LoadError::InvalidDate {
            row,
            value: text.to_string(),
        })
}

fn parse_flag_text(row: usize, column: &'static str, text: &str) -> Result<i64, LoadError> {
    match text.trim().to_ascii_lowercase().as_str() {
        "0" | "false" => Ok(0),
        "1" | "true" => Ok(1),
        other => other.parse::<i64>().map_err(|_| LoadError::InvalidValue {
            row,
            column,
            value: text.to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one day per row.
/// Columns beyond the required ones are ignored.
fn parse_csv<R: Read>(reader: R) -> Result<Vec<RentalRecord>, LoadError> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers = reader.headers()?.clone();

    let position = |name: &str| headers.iter().position(|h| h.trim() == name);
    let column =
        |name: &str| position(name).ok_or_else(|| LoadError::MissingColumn(name.to_string()));

    let date_idx = DATE_COLUMNS
        .iter()
        .find_map(|&name| position(name))
        .ok_or_else(|| LoadError::MissingColumn(DATE_COLUMNS[0].to_string()))?;
    let holiday_idx = column(HOLIDAY)?;
    let workingday_idx = column(WORKINGDAY)?;
    let temp_idx = column(TEMP)?;
    let hum_idx = column(HUM)?;
    let wind_idx = column(WINDSPEED)?;
    let cnt_idx = column(CNT)?;

    let mut rows = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let record = result?;
        let row = i + 1;
        let field = |idx: usize| record.get(idx).unwrap_or("").trim();
        let float = |idx: usize, column: &'static str| {
            field(idx).parse::<f64>().map_err(|_| LoadError::InvalidValue {
                row,
                column,
                value: field(idx).to_string(),
            })
        };

        rows.push(RawRow {
            row,
            date: parse_date(row, field(date_idx))?,
            holiday: parse_flag_text(row, HOLIDAY, field(holiday_idx))?,
            workingday: parse_flag_text(row, WORKINGDAY, field(workingday_idx))?,
            temp: float(temp_idx, TEMP)?,
            hum: float(hum_idx, HUM)?,
            windspeed: float(wind_idx, WINDSPEED)?,
            cnt: field(cnt_idx)
                .parse::<i64>()
                .map_err(|_| LoadError::InvalidValue {
                    row,
                    column: CNT,
                    value: field(cnt_idx).to_string(),
                })?,
        });
    }

    build_records(rows)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Flags may be written as numbers or booleans.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonFlag {
    Int(i64),
    Bool(bool),
}

impl From<JsonFlag> for i64 {
    fn from(flag: JsonFlag) -> Self {
        match flag {
            JsonFlag::Int(v) => v,
            JsonFlag::Bool(b) => i64::from(b),
        }
    }
}

/// Expected JSON schema (records-oriented, `df.to_json(orient='records', date_format='iso')`):
///
/// ```json
/// [
///   { "dteday": "2011-01-01", "holiday": 0, "workingday": 0,
///     "temp": 0.344, "hum": 0.805, "windspeed": 0.160, "cnt": 985 },
///   ...
/// ]
/// ```
#[derive(Debug, Deserialize)]
struct JsonRow {
    #[serde(alias = "date")]
    dteday: String,
    holiday: JsonFlag,
    workingday: JsonFlag,
    temp: f64,
    hum: f64,
    windspeed: f64,
    cnt: i64,
}

fn parse_json<R: Read>(reader: R) -> Result<Vec<RentalRecord>, LoadError> {
    let rows: Vec<JsonRow> = serde_json::from_reader(reader)?;
    let raw = rows
        .into_iter()
        .enumerate()
        .map(|(i, r)| {
            Ok::<_, LoadError>(RawRow {
                row: i + 1,
                date: parse_date(i + 1, &r.dteday)?,
                holiday: r.holiday.into(),
                workingday: r.workingday.into(),
                temp: r.temp,
                hum: r.hum,
                windspeed: r.windspeed,
                cnt: r.cnt,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    build_records(raw)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Expected schema: the same column names as the CSV, with
/// - date as Utf8 / LargeUtf8 text or Date32,
/// - flags as Boolean or integers,
/// - factors as Float32 / Float64,
/// - `cnt` as any integer type.
fn parse_parquet<R: ChunkReader + 'static>(input: R) -> Result<Vec<RentalRecord>, LoadError> {
    let reader = ParquetRecordBatchReaderBuilder::try_new(input)?.build()?;

    let mut rows = Vec::new();
    for batch in reader {
        let batch = batch?;

        let date_col = DATE_COLUMNS
            .iter()
            .find_map(|&name| batch.column_by_name(name))
            .ok_or_else(|| LoadError::MissingColumn(DATE_COLUMNS[0].to_string()))?;
        let holiday = batch_column(&batch, HOLIDAY)?;
        let workingday = batch_column(&batch, WORKINGDAY)?;
        let temp = batch_column(&batch, TEMP)?;
        let hum = batch_column(&batch, HUM)?;
        let wind = batch_column(&batch, WINDSPEED)?;
        let cnt = batch_column(&batch, CNT)?;

        let offset = rows.len();
        for i in 0..batch.num_rows() {
            let row = offset + i + 1;
            rows.push(RawRow {
                row,
                date: arrow_date(date_col, i, row)?,
                holiday: arrow_int(holiday, i, row, HOLIDAY)?,
                workingday: arrow_int(workingday, i, row, WORKINGDAY)?,
                temp: arrow_float(temp, i, row, TEMP)?,
                hum: arrow_float(hum, i, row, HUM)?,
                windspeed: arrow_float(wind, i, row, WINDSPEED)?,
                cnt: arrow_int(cnt, i, row, CNT)?,
            });
        }
    }

    build_records(rows)
}

// -- Arrow helpers --

fn batch_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef, LoadError> {
    batch
        .column_by_name(name)
        .ok_or_else(|| LoadError::MissingColumn(name.to_string()))
}

/// Error for a null cell or a column of an unexpected type.
fn invalid_cell(col: &ArrayRef, i: usize, row: usize, column: &'static str) -> LoadError {
    LoadError::InvalidValue {
        row,
        column,
        value: if col.is_null(i) {
            "<null>".to_string()
        } else {
            format!("<{:?}>", col.data_type())
        },
    }
}

fn arrow_date(col: &ArrayRef, i: usize, row: usize) -> Result<NaiveDate, LoadError> {
    let invalid = || LoadError::InvalidDate {
        row,
        value: if col.is_null(i) {
            "<null>".to_string()
        } else {
            format!("<{:?}>", col.data_type())
        },
    };
    if col.is_null(i) {
        return Err(invalid());
    }
    match col.data_type() {
        DataType::Utf8 => parse_date(row, col.as_string::<i32>().value(i)),
        DataType::LargeUtf8 => parse_date(row, col.as_string::<i64>().value(i)),
        DataType::Date32 => col
            .as_primitive::<Date32Type>()
            .value_as_date(i)
            .ok_or_else(invalid),
        _ => Err(invalid()),
    }
}

fn arrow_int(col: &ArrayRef, i: usize, row: usize, column: &'static str) -> Result<i64, LoadError> {
    if col.is_null(i) {
        return Err(invalid_cell(col, i, row, column));
    }
    match col.data_type() {
        DataType::Boolean => Ok(i64::from(col.as_boolean().value(i))),
        DataType::Int32 => Ok(i64::from(col.as_primitive::<Int32Type>().value(i))),
        DataType::Int64 => Ok(col.as_primitive::<Int64Type>().value(i)),
        DataType::UInt32 => Ok(i64::from(col.as_primitive::<UInt32Type>().value(i))),
        DataType::UInt64 => {
            let v = col.as_primitive::<UInt64Type>().value(i);
            i64::try_from(v).map_err(|_| LoadError::InvalidValue {
                row,
                column,
                value: v.to_string(),
            })
        }
        _ => Err(invalid_cell(col, i, row, column)),
    }
}

fn arrow_float(
    col: &ArrayRef,
    i: usize,
    row: usize,
    column: &'static str,
) -> Result<f64, LoadError> {
    if col.is_null(i) {
        return Err(invalid_cell(col, i, row, column));
    }
    match col.data_type() {
        DataType::Float64 => Ok(col.as_primitive::<Float64Type>().value(i)),
        DataType::Float32 => Ok(f64::from(col.as_primitive::<Float32Type>().value(i))),
        _ => Err(invalid_cell(col, i, row, column)),
    }
}
