//! Writes a synthetic two-year `day.csv` in the bike-sharing daily schema.
//!
//! Usage: `generate_sample [OUTPUT] [--seed N]` (defaults: `day.csv`, 42).

use std::path::PathBuf;

use anyhow::Context;
use chrono::{Datelike, NaiveDate, Weekday};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::Serialize;

#[derive(Debug, Parser)]
#[command(about = "Generate a synthetic daily bike-rental CSV")]
struct Args {
    #[arg(default_value = "day.csv")]
    output: PathBuf,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Column order follows the public bike-sharing `day.csv`.
#[derive(Debug, Serialize)]
struct DayRow {
    instant: usize,
    dteday: String,
    season: u8,
    yr: u8,
    mnth: u32,
    holiday: u8,
    weekday: u32,
    workingday: u8,
    weathersit: u8,
    temp: f64,
    atemp: f64,
    hum: f64,
    windspeed: f64,
    casual: u64,
    registered: u64,
    cnt: u64,
}

/// A handful of fixed-date public holidays.
fn is_holiday(date: NaiveDate) -> bool {
    matches!(
        (date.month(), date.day()),
        (1, 1) | (7, 4) | (11, 11) | (12, 25)
    ) || (date.month() == 1 && date.weekday() == Weekday::Mon && (15..=21).contains(&date.day()))
        || (date.month() == 9 && date.weekday() == Weekday::Mon && date.day() <= 7)
}

fn season(month: u32) -> u8 {
    match month {
        12 | 1 | 2 => 1,
        3..=5 => 2,
        6..=8 => 3,
        _ => 4,
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut rng = StdRng::seed_from_u64(args.seed);
    let noise = Normal::new(0.0, 0.04).context("building noise distribution")?;

    let start = NaiveDate::from_ymd_opt(2011, 1, 1).context("start date")?;
    let end = NaiveDate::from_ymd_opt(2012, 12, 31).context("end date")?;

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    log::info!("writing {} to {}", start.format("%Y-%m-%d"), end.format("%Y-%m-%d"));

    let mut rows = 0usize;
    for (i, date) in start.iter_days().take_while(|d| *d <= end).enumerate() {
        let holiday = is_holiday(date);
        let weekend = matches!(date.weekday(), Weekday::Sat | Weekday::Sun);
        let workingday = !holiday && !weekend;

        // Seasonal temperature curve peaking in mid-July.
        let phase = (f64::from(date.ordinal()) - 196.0) / 365.0 * std::f64::consts::TAU;
        let temp = (0.5 + 0.3 * phase.cos() + noise.sample(&mut rng)).clamp(0.05, 0.95);
        let hum = (0.63 + 0.15 * rng.gen::<f64>() - 0.075 + noise.sample(&mut rng)).clamp(0.0, 1.0);
        let windspeed = (0.19 + 0.08 * noise.sample(&mut rng) / 0.04).clamp(0.02, 0.5);
        let weathersit = if hum > 0.8 { 3 } else if hum > 0.7 { 2 } else { 1 };

        let yr = u8::from(date.year() == 2012);
        let demand = 1500.0 + 6000.0 * temp - 2500.0 * (hum - 0.6).max(0.0)
            - 3000.0 * (windspeed - 0.2).max(0.0)
            + 1800.0 * f64::from(yr);
        let casual_share = if workingday { 0.15 } else { 0.35 };
        let cnt = (demand * (1.0 + noise.sample(&mut rng))).max(22.0).round() as u64;
        let casual = (cnt as f64 * casual_share).round() as u64;

        writer.serialize(DayRow {
            instant: i + 1,
            dteday: date.format("%Y-%m-%d").to_string(),
            season: season(date.month()),
            yr,
            mnth: date.month(),
            holiday: u8::from(holiday),
            weekday: date.weekday().num_days_from_sunday(),
            workingday: u8::from(workingday),
            weathersit,
            temp,
            atemp: temp * 0.95,
            hum,
            windspeed,
            casual,
            registered: cnt - casual,
            cnt,
        })?;
        rows += 1;
    }
    writer.flush()?;
    log::debug!("flushed {}", args.output.display());

    println!("Wrote {rows} days to {}", args.output.display());
    Ok(())
}
