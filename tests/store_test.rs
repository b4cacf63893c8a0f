use std::fs;

use bar_ingestor::{
    Error, RawBar, RawValue, Timeframe, ValidationError, read_bars, write_bars,
};
use chrono::{DateTime, TimeZone, Utc};
use polars::prelude::{Column, DataFrame, DataType, ParquetWriter, SerWriter, TimeUnit};
use tempfile::tempdir;

fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap()
}

fn bar(timestamp: DateTime<Utc>, close: f64) -> RawBar {
    RawBar::from_values(timestamp, close - 0.2, close + 0.5, close - 0.7, close, 1000.0)
}

#[test]
fn write_sorts_and_dedups_by_timestamp() {
    let dir = tempdir().unwrap();
    let bars = vec![bar(day(2), 101.0), bar(day(1), 100.0), bar(day(2), 102.5)];

    let result = write_bars(dir.path(), "AAPL", Timeframe::OneDay, &bars).unwrap();
    let stored = read_bars(dir.path(), "AAPL", Timeframe::OneDay).unwrap();

    assert_eq!(result.input_rows, 3);
    assert_eq!(result.total_rows, 2);
    assert_eq!(
        stored.iter().map(|b| b.timestamp).collect::<Vec<_>>(),
        vec![day(1), day(2)]
    );
    // Duplicate timestamps resolve to the last bar in input order.
    assert_eq!(stored[1].close, 102.5);
    assert_eq!(stored[0].close, 100.0);
}

#[test]
fn write_is_idempotent_for_the_same_input() {
    let dir = tempdir().unwrap();
    let bars = vec![bar(day(1), 100.0), bar(day(2), 101.0)];

    let first = write_bars(dir.path(), "AAPL", Timeframe::OneDay, &bars).unwrap();
    let after_first = read_bars(dir.path(), "AAPL", Timeframe::OneDay).unwrap();
    let second = write_bars(dir.path(), "AAPL", Timeframe::OneDay, &bars).unwrap();
    let after_second = read_bars(dir.path(), "AAPL", Timeframe::OneDay).unwrap();

    assert_eq!(first.total_rows, 2);
    assert_eq!(second, first);
    assert_eq!(after_second, after_first);
}

#[test]
fn incoming_bars_override_existing_ones() {
    let dir = tempdir().unwrap();

    write_bars(dir.path(), "AAPL", Timeframe::OneDay, &[bar(day(1), 100.0)]).unwrap();
    let result = write_bars(
        dir.path(),
        "AAPL",
        Timeframe::OneDay,
        &[bar(day(1), 105.0), bar(day(2), 106.0)],
    )
    .unwrap();
    let stored = read_bars(dir.path(), "AAPL", Timeframe::OneDay).unwrap();

    assert_eq!(result.input_rows, 2);
    assert_eq!(result.total_rows, 2);
    assert_eq!(stored[0].close, 105.0);
    assert_eq!(stored[1].close, 106.0);
}

#[test]
fn read_on_a_never_written_key_is_empty() {
    let dir = tempdir().unwrap();
    let stored = read_bars(dir.path(), "AAPL", Timeframe::OneDay).unwrap();
    assert!(stored.is_empty());
}

#[test]
fn series_keys_do_not_collide() {
    let dir = tempdir().unwrap();

    write_bars(dir.path(), "AAPL", Timeframe::OneDay, &[bar(day(1), 100.0)]).unwrap();
    write_bars(dir.path(), "MSFT", Timeframe::OneDay, &[bar(day(1), 200.0)]).unwrap();
    write_bars(dir.path(), "AAPL", Timeframe::OneHour, &[bar(day(1), 300.0)]).unwrap();

    assert_eq!(
        read_bars(dir.path(), "AAPL", Timeframe::OneDay).unwrap()[0].close,
        100.0
    );
    assert_eq!(
        read_bars(dir.path(), "MSFT", Timeframe::OneDay).unwrap()[0].close,
        200.0
    );
    assert_eq!(
        read_bars(dir.path(), "AAPL", Timeframe::OneHour).unwrap()[0].close,
        300.0
    );
    // Lowercase symbols address the same series.
    assert_eq!(
        read_bars(dir.path(), "aapl", Timeframe::OneDay).unwrap()[0].close,
        100.0
    );
}

#[test]
fn round_trip_preserves_every_field() {
    let dir = tempdir().unwrap();
    let ts = Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 15).unwrap();
    let raw = RawBar::from_values(ts, 12.25, 13.5, 11.75, 13.0, 98765.0);

    write_bars(dir.path(), "AAPL", Timeframe::OneMinute, &[raw]).unwrap();
    let stored = read_bars(dir.path(), "AAPL", Timeframe::OneMinute).unwrap();

    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].timestamp, ts);
    assert_eq!(stored[0].open, 12.25);
    assert_eq!(stored[0].high, 13.5);
    assert_eq!(stored[0].low, 11.75);
    assert_eq!(stored[0].close, 13.0);
    assert_eq!(stored[0].volume, 98765.0);
}

#[test]
fn invalid_bar_fails_the_write_and_touches_nothing() {
    let dir = tempdir().unwrap();
    let mut incomplete = bar(day(1), 100.0);
    incomplete.volume = None;

    let err = write_bars(dir.path(), "AAPL", Timeframe::OneDay, &[incomplete]).unwrap_err();
    match err {
        Error::Validation(ValidationError::MissingFields { fields }) => {
            assert_eq!(fields, vec!["volume"]);
        }
        other => panic!("expected MissingFields, got {other:?}"),
    }
    assert!(!dir.path().join("AAPL/1d/bars.parquet").exists());
}

#[test]
fn boolean_numeric_field_fails_the_write() {
    let dir = tempdir().unwrap();
    let mut raw = bar(day(1), 100.0);
    raw.volume = Some(RawValue::Bool(true));

    let err = write_bars(dir.path(), "AAPL", Timeframe::OneDay, &[raw]).unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::BooleanNumeric { field: "volume" })
    ));
}

#[test]
fn no_temp_file_is_left_behind() {
    let dir = tempdir().unwrap();
    write_bars(dir.path(), "AAPL", Timeframe::OneDay, &[bar(day(1), 100.0)]).unwrap();

    let series_dir = dir.path().join("AAPL/1d");
    let names: Vec<String> = fs::read_dir(&series_dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["bars.parquet".to_string()]);
}

fn write_raw_frame(dir: &std::path::Path, df: &mut DataFrame) {
    let path = dir.join("AAPL/1d/bars.parquet");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let file = fs::File::create(&path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();
}

#[test]
fn file_missing_required_columns_is_a_schema_error() {
    let dir = tempdir().unwrap();
    let mut df = DataFrame::new(vec![
        Column::new("timestamp".into(), vec![0_i64])
            .cast(&DataType::Datetime(TimeUnit::Microseconds, None))
            .unwrap(),
        Column::new("open".into(), vec![1.0_f64]),
        Column::new("close".into(), vec![1.5_f64]),
    ])
    .unwrap();
    write_raw_frame(dir.path(), &mut df);

    let err = read_bars(dir.path(), "AAPL", Timeframe::OneDay).unwrap_err();
    match err {
        Error::Schema(schema) => {
            assert_eq!(schema.missing, vec!["high", "low", "volume"]);
        }
        other => panic!("expected SchemaError, got {other:?}"),
    }
}

#[test]
fn boolean_column_on_disk_surfaces_a_validation_error() {
    let dir = tempdir().unwrap();
    let mut df = DataFrame::new(vec![
        Column::new("timestamp".into(), vec![0_i64])
            .cast(&DataType::Datetime(TimeUnit::Microseconds, None))
            .unwrap(),
        Column::new("open".into(), vec![1.0_f64]),
        Column::new("high".into(), vec![2.0_f64]),
        Column::new("low".into(), vec![0.5_f64]),
        Column::new("close".into(), vec![1.5_f64]),
        Column::new("volume".into(), vec![true]),
    ])
    .unwrap();
    write_raw_frame(dir.path(), &mut df);

    let err = read_bars(dir.path(), "AAPL", Timeframe::OneDay).unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::BooleanNumeric { field: "volume" })
    ));
}

#[test]
fn integer_columns_on_disk_are_renormalized_to_floats() {
    let dir = tempdir().unwrap();
    let mut df = DataFrame::new(vec![
        Column::new("timestamp".into(), vec![1_704_067_200_000_000_i64])
            .cast(&DataType::Datetime(TimeUnit::Microseconds, None))
            .unwrap(),
        Column::new("open".into(), vec![1_i64]),
        Column::new("high".into(), vec![2_i64]),
        Column::new("low".into(), vec![0_i64]),
        Column::new("close".into(), vec![1_i64]),
        Column::new("volume".into(), vec![1000_i64]),
    ])
    .unwrap();
    write_raw_frame(dir.path(), &mut df);

    let stored = read_bars(dir.path(), "AAPL", Timeframe::OneDay).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].timestamp, day(1));
    assert_eq!(stored[0].volume, 1000.0);
}
