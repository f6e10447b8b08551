use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::path::Path;
use std::sync::Arc;
use std::thread;

use arrow::array::{ArrayRef, BooleanArray, Date32Array, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use bike_dash::{
    ChartView, DataSource, DateRange, DayType, DerivedView, Factor, LoadError, Loader,
    aggregate_by_day_type, evaluate, filter_by_date_range, load_file, project_factor, summarize,
};
use chrono::NaiveDate;
use parquet::arrow::ArrowWriter;
use tempfile::TempDir;

const DAY_CSV: &str = "\
instant,dteday,season,yr,mnth,holiday,weekday,workingday,weathersit,temp,atemp,hum,windspeed,casual,registered,cnt
1,2011-01-01,1,0,1,0,6,0,2,0.344167,0.363625,0.805833,0.160446,331,654,985
2,2011-01-02,1,0,1,0,0,0,2,0.363478,0.353739,0.696087,0.248539,131,670,801
3,2011-01-03,1,0,1,0,1,1,1,0.196364,0.189405,0.437273,0.248309,120,1229,1349
4,2011-01-04,1,0,1,0,2,1,1,0.2,0.212122,0.590435,0.160296,108,1454,1562
5,2011-01-05,1,0,1,0,3,1,1,0.226957,0.22927,0.436957,0.1869,82,1518,1600
17,2011-01-17,1,0,1,1,1,0,2,0.175833,0.176771,0.5375,0.194017,117,883,1000
";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn parquet_bytes() -> Vec<u8> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("dteday", DataType::Date32, false),
        Field::new("holiday", DataType::Boolean, false),
        Field::new("workingday", DataType::Int64, false),
        Field::new("temp", DataType::Float64, false),
        Field::new("hum", DataType::Float64, false),
        Field::new("windspeed", DataType::Float64, false),
        Field::new("cnt", DataType::Int64, false),
        Field::new("note", DataType::Utf8, false),
    ]));

    let epoch = date(1970, 1, 1);
    let days: Vec<i32> = [date(2012, 7, 3), date(2012, 7, 4), date(2012, 7, 7)]
        .iter()
        .map(|d| (*d - epoch).num_days() as i32)
        .collect();

    let columns: Vec<ArrayRef> = vec![
        Arc::new(Date32Array::from(days)),
        Arc::new(BooleanArray::from(vec![false, true, false])),
        Arc::new(Int64Array::from(vec![1, 1, 0])),
        Arc::new(Float64Array::from(vec![0.75, 0.8, 0.7])),
        Arc::new(Float64Array::from(vec![0.6, 0.55, 0.5])),
        Arc::new(Float64Array::from(vec![0.1, 0.15, 0.2])),
        Arc::new(Int64Array::from(vec![6000, 5500, 7000])),
        Arc::new(StringArray::from(vec!["a", "b", "c"])),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();

    let mut buf = Vec::new();
    let mut writer = ArrowWriter::try_new(&mut buf, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();
    buf
}

fn write_parquet(path: &Path) {
    fs::write(path, parquet_bytes()).unwrap();
}

/// Answer a single GET on loopback with `body`; returns the base URL.
fn serve_once(body: Vec<u8>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut line = String::new();
        while reader.read_line(&mut line).unwrap() > 0 && line != "\r\n" {
            line.clear();
        }
        write!(
            stream,
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        )
        .unwrap();
        stream.write_all(&body).unwrap();
        stream.flush().unwrap();
    });
    format!("http://{addr}")
}

#[test]
fn csv_file_end_to_end() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "day.csv", DAY_CSV);

    let table = load_file(&path).unwrap();
    assert_eq!(table.len(), 6);
    assert!(table.origin().ends_with("day.csv"));

    let range = DateRange::new(date(2011, 1, 2), date(2011, 1, 17));
    let filtered = filter_by_date_range(table.records(), &range);
    assert_eq!(filtered.len(), 5);

    let agg = aggregate_by_day_type(&filtered);
    assert_eq!(
        agg.iter().collect::<Vec<_>>(),
        vec![
            (DayType::Holiday, 1000),
            (DayType::Weekday, 1349 + 1562 + 1600),
            (DayType::Weekend, 801),
        ]
    );

    let summary = summarize(&filtered);
    assert_eq!(summary.total_rentals, 801 + 1349 + 1562 + 1600 + 1000);
    assert_eq!(summary.busiest_day.unwrap().date(), date(2011, 1, 5));

    let temps = project_factor(&filtered, Factor::Temperature);
    assert_eq!(temps.first(), Some(&(0.363478, 801)));
    assert_eq!(temps.last(), Some(&(0.175833, 1000)));
}

#[test]
fn json_file_loads_like_csv() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "day.json",
        r#"[
            {"dteday": "2011-01-01T00:00:00", "holiday": 0, "workingday": 0,
             "temp": 0.344167, "hum": 0.805833, "windspeed": 0.160446, "cnt": 985},
            {"dteday": "2011-01-17", "holiday": 1, "workingday": 0,
             "temp": 0.175833, "hum": 0.5375, "windspeed": 0.194017, "cnt": 1000}
        ]"#,
    );

    let table = load_file(&path).unwrap();
    let days: Vec<DayType> = table.records().iter().map(|r| r.day_type()).collect();
    assert_eq!(days, vec![DayType::Weekend, DayType::Holiday]);
}

#[test]
fn parquet_file_with_typed_columns() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("day.parquet");
    write_parquet(&path);

    let table = Loader::default().load(&DataSource::Path(path)).unwrap();
    assert_eq!(table.len(), 3);
    assert_eq!(table.records()[1].date(), date(2012, 7, 4));
    assert_eq!(table.records()[1].day_type(), DayType::Holiday);
    assert_eq!(table.records()[2].day_type(), DayType::Weekend);
    assert_eq!(table.date_bounds(), Some((date(2012, 7, 3), date(2012, 7, 7))));

    let view = evaluate(
        &table,
        DateRange::spanning(&table).unwrap(),
        ChartView::Factor(Factor::Windspeed),
    );
    assert_eq!(
        view.view,
        DerivedView::Factor {
            factor: Factor::Windspeed,
            points: vec![(0.1, 6000), (0.15, 5500), (0.2, 7000)],
        }
    );
    assert_eq!(view.summary.busiest_day.unwrap().date(), date(2012, 7, 7));
}

#[test]
fn parquet_missing_column() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("partial.parquet");

    let schema = Arc::new(Schema::new(vec![
        Field::new("dteday", DataType::Utf8, false),
        Field::new("cnt", DataType::Int64, false),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(vec!["2011-01-01"])) as ArrayRef,
            Arc::new(Int64Array::from(vec![985])),
        ],
    )
    .unwrap();
    let mut writer = ArrowWriter::try_new(fs::File::create(&path).unwrap(), schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();

    let err = load_file(&path).unwrap_err();
    assert!(matches!(err, LoadError::MissingColumn(ref c) if c == "holiday"));
}

#[test]
fn malformed_files_fail_without_partial_data() {
    let dir = TempDir::new().unwrap();

    let bad_date = write(
        &dir,
        "bad_date.csv",
        "dteday,holiday,workingday,temp,hum,windspeed,cnt\n\
         2011-01-01,0,0,0.3,0.8,0.1,985\n\
         2011-02-30,0,0,0.3,0.8,0.1,801\n",
    );
    let err = load_file(&bad_date).unwrap_err();
    assert!(matches!(err, LoadError::InvalidDate { row: 2, .. }));

    let ragged = write(
        &dir,
        "ragged.csv",
        "dteday,holiday,workingday,temp,hum,windspeed,cnt\n2011-01-01,0,0\n",
    );
    assert!(matches!(load_file(&ragged).unwrap_err(), LoadError::Csv(_)));

    let unsupported = write(&dir, "day.xlsx", "");
    assert!(matches!(
        load_file(&unsupported).unwrap_err(),
        LoadError::UnsupportedFormat(_)
    ));
}

#[test]
fn unreachable_url_is_a_load_error() {
    // Nothing listens on the discard port of the loopback interface.
    let loader = Loader::new(std::time::Duration::from_secs(2));
    let err = loader
        .load(&DataSource::parse("http://127.0.0.1:9/day.csv"))
        .unwrap_err();
    assert!(matches!(err, LoadError::Http { .. }));
    assert!(err.to_string().contains("127.0.0.1:9"));
}

#[test]
fn csv_over_http() {
    let base = serve_once(DAY_CSV.as_bytes().to_vec());
    let source = DataSource::parse(&format!("{base}/data/day.csv?raw=1"));
    let table = Loader::default().load(&source).unwrap();

    assert_eq!(table.len(), 6);
    assert!(table.origin().starts_with(&base));
    let all: Vec<_> = table.records().iter().collect();
    assert_eq!(summarize(&all).total_rentals, 985 + 801 + 1349 + 1562 + 1600 + 1000);
    assert_eq!(table.records()[5].day_type(), DayType::Holiday);
}

#[test]
fn parquet_over_http() {
    let base = serve_once(parquet_bytes());
    let table = Loader::default()
        .load(&DataSource::parse(&format!("{base}/day.parquet")))
        .unwrap();

    assert_eq!(table.len(), 3);
    assert_eq!(table.records()[1].day_type(), DayType::Holiday);
    assert_eq!(table.date_bounds(), Some((date(2012, 7, 3), date(2012, 7, 7))));
}
