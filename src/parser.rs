//! JSON decoding of data-service payloads into input series.
//!
//! Station payloads carry one reading per date key:
//! `{"data": [["2015-01-01", "12.3"], ["2016-01-01", "M"]]}`.
//! Grid payloads key each date by station id, with projections as
//! `[low, median, high]` triples:
//! `{"data": [[date, {sid: 1.2}]], "proj": [[date, {sid: [0.5, 1.1, 1.9]}]]}`.

use anyhow::{Context, Result, anyhow};
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::warn;

use crate::series::{EnvelopePoint, RawPoint, Reading};

#[derive(Debug, Deserialize)]
struct StationPayload {
    #[serde(default)]
    data: Option<Vec<(String, Value)>>,
}

#[derive(Debug, Deserialize)]
struct GridPayload {
    #[serde(default)]
    data: Option<Vec<(String, HashMap<String, Value>)>>,
    #[serde(default)]
    proj: Option<Vec<(String, HashMap<String, Value>)>>,
}

/// Both series of a grid payload for one station.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridSeries {
    pub observed: Vec<RawPoint>,
    pub projected: Vec<EnvelopePoint>,
}

/// Extracts the year from a `YYYY`, `YYYY-MM` or `YYYY-MM-DD` key.
///
/// The year is exactly four digits; a full date must also be a real
/// calendar day.
pub fn parse_year(key: &str) -> Result<i32> {
    let invalid = || anyhow!("invalid date key {key:?}");

    let (year, rest) = key.split_at_checked(4).ok_or_else(invalid)?;
    if !year.bytes().all(|b| b.is_ascii_digit()) || !(rest.is_empty() || rest.starts_with('-')) {
        return Err(invalid());
    }

    if rest.len() > "-MM".len() {
        let (date, _) = NaiveDate::parse_and_remainder(key, "%Y-%m-%d")
            .with_context(|| format!("invalid date key {key:?}"))?;
        return Ok(date.year());
    }
    Ok(year.parse()?)
}

/// Maps a JSON value to a reading: flags and numeric strings are decoded,
/// anything else is missing.
pub fn reading_from_value(value: &Value) -> Reading {
    match value {
        Value::String(s) => Reading::parse(s),
        Value::Number(n) => n.as_f64().map(Reading::from_f64).unwrap_or(Reading::Missing),
        _ => Reading::Missing,
    }
}

fn component(value: &Value) -> Option<f64> {
    let v = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    v.is_finite().then_some(v)
}

/// Decodes a `[low, median, high]` triple.
pub fn envelope_from_value(value: &Value) -> Option<[f64; 3]> {
    match value.as_array()?.as_slice() {
        [low, median, high] => Some([component(low)?, component(median)?, component(high)?]),
        _ => None,
    }
}

/// Decodes a station payload into a year-ascending series.
pub fn parse_station(json: &str) -> Result<Vec<RawPoint>> {
    let payload: StationPayload =
        serde_json::from_str(json).context("failed to decode station payload")?;

    let mut series = payload
        .data
        .unwrap_or_default()
        .iter()
        .map(|(key, value)| Ok(RawPoint::new(parse_year(key)?, reading_from_value(value))))
        .collect::<Result<Vec<_>>>()?;

    series.sort_by_key(|p| p.year);
    Ok(series)
}

/// Decodes the observed and projected series for station `sid` from a
/// grid payload. A date without an entry for `sid` counts as missing.
pub fn parse_grid(json: &str, sid: &str) -> Result<GridSeries> {
    let payload: GridPayload =
        serde_json::from_str(json).context("failed to decode grid payload")?;

    let mut observed = Vec::new();
    for (key, by_sid) in payload.data.unwrap_or_default() {
        let reading = by_sid
            .get(sid)
            .map(reading_from_value)
            .unwrap_or(Reading::Missing);
        observed.push(RawPoint::new(parse_year(&key)?, reading));
    }

    let mut projected = Vec::new();
    let mut malformed = 0usize;
    for (key, by_sid) in payload.proj.unwrap_or_default() {
        let year = parse_year(&key)?;
        match by_sid.get(sid).and_then(envelope_from_value) {
            Some([low, median, high]) => projected.push(EnvelopePoint::new(year, low, median, high)),
            None => malformed += 1,
        }
    }
    if malformed > 0 {
        warn!(sid, malformed, "Dropped projection entries without a usable envelope");
    }

    observed.sort_by_key(|p| p.year);
    projected.sort_by_key(|p| p.year);

    Ok(GridSeries {
        observed,
        projected,
    })
}
