// src/types.rs
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};

/// One close-price observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub ts_ms: i64, // unix ms
    pub close: f64,
}

/// Malformed series input, caught at construction.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SeriesError {
    #[error("timestamps out of order at index {index}")]
    Unordered { index: usize },
    #[error("duplicate timestamp {ts_ms} at index {index}")]
    Duplicate { ts_ms: i64, index: usize },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown interval '{0}', expected one of 1d, 1wk, 1mo")]
pub struct ParseIntervalError(pub String);

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown period '{0}', expected one of 1mo, 3mo, 6mo, 1y")]
pub struct ParsePeriodError(pub String);

/// Native cadence of a price series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1d")]
    Daily,
    #[serde(rename = "1wk")]
    Weekly,
    #[serde(rename = "1mo")]
    Monthly,
}

impl Interval {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "1d",
            Self::Weekly => "1wk",
            Self::Monthly => "1mo",
        }
    }

    /// Observations per seasonal cycle at this cadence.
    pub const fn season_len(self) -> usize {
        match self {
            Self::Daily => 7,
            Self::Weekly => 52,
            Self::Monthly => 12,
        }
    }

    /// Step a unix-millis timestamp forward by one period. Monthly stepping is
    /// calendar-aware and falls back to a fixed 30-day step if the calendar
    /// math ever overflows, so the result is always strictly later.
    pub fn advance(self, ts_ms: i64) -> i64 {
        match self {
            Self::Daily => ts_ms + 86_400_000,
            Self::Weekly => ts_ms + 7 * 86_400_000,
            Self::Monthly => DateTime::<Utc>::from_timestamp_millis(ts_ms)
                .and_then(|dt| dt.checked_add_months(Months::new(1)))
                .map(|dt| dt.timestamp_millis())
                .unwrap_or(ts_ms + 30 * 86_400_000),
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = ParseIntervalError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "1d" => Ok(Self::Daily),
            "1wk" => Ok(Self::Weekly),
            "1mo" => Ok(Self::Monthly),
            other => Err(ParseIntervalError(other.to_owned())),
        }
    }
}

/// History window requested from a market data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
}

impl Period {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneMonth => "1mo",
            Self::ThreeMonths => "3mo",
            Self::SixMonths => "6mo",
            Self::OneYear => "1y",
        }
    }

    /// Observation count this window yields at `interval` (trading-day
    /// counts for daily data: 22 per month, 261 per year).
    pub const fn observations(self, interval: Interval) -> usize {
        match (self, interval) {
            (Self::OneMonth, Interval::Daily) => 22,
            (Self::OneMonth, Interval::Weekly) => 4,
            (Self::OneMonth, Interval::Monthly) => 1,
            (Self::ThreeMonths, Interval::Daily) => 66,
            (Self::ThreeMonths, Interval::Weekly) => 13,
            (Self::ThreeMonths, Interval::Monthly) => 3,
            (Self::SixMonths, Interval::Daily) => 131,
            (Self::SixMonths, Interval::Weekly) => 26,
            (Self::SixMonths, Interval::Monthly) => 6,
            (Self::OneYear, Interval::Daily) => 261,
            (Self::OneYear, Interval::Weekly) => 52,
            (Self::OneYear, Interval::Monthly) => 12,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = ParsePeriodError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "1mo" => Ok(Self::OneMonth),
            "3mo" => Ok(Self::ThreeMonths),
            "6mo" => Ok(Self::SixMonths),
            "1y" => Ok(Self::OneYear),
            other => Err(ParsePeriodError(other.to_owned())),
        }
    }
}

/// Time-ordered close history for one instrument over one (period, interval)
/// window. Construction validates ordering; the series never mutates after
/// that, a fresh fetch builds a fresh series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    symbol: String,
    interval: Interval,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Timestamps must be strictly increasing with no duplicates. An empty
    /// series is constructible; operations that need data fail on it
    /// explicitly instead.
    pub fn new(
        symbol: impl Into<String>,
        interval: Interval,
        points: Vec<PricePoint>,
    ) -> Result<Self, SeriesError> {
        for (i, pair) in points.windows(2).enumerate() {
            if pair[1].ts_ms == pair[0].ts_ms {
                return Err(SeriesError::Duplicate { ts_ms: pair[1].ts_ms, index: i + 1 });
            }
            if pair[1].ts_ms < pair[0].ts_ms {
                return Err(SeriesError::Unordered { index: i + 1 });
            }
        }
        Ok(Self { symbol: symbol.into(), interval, points })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn interval(&self) -> Interval {
        self.interval
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Latest observation (the final element; the series is time-ordered).
    pub fn latest(&self) -> Option<&PricePoint> {
        self.points.last()
    }
}

/// Opaque route identifier from the freight catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Route(pub String);

impl Route {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Route {
    fn from(name: &str) -> Self {
        Self(name.to_owned())
    }
}

/// One freight cost draw for a route. Never cached; every call re-samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreightQuote {
    pub route: Route,
    pub freight_cost: f64, // minor-unit rounded
    pub currency: String,
}

/// Landed cost of one route against the latest commodity close.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectivePriceRecord {
    pub route: Route,
    pub freight_cost: f64,
    pub commodity_price: f64,
    pub effective_price: f64, // commodity + freight * adjustment, 2 d.p.
    pub currency: String,
}

/// Point estimate with its confidence band, `lower <= estimate <= upper`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub ts_ms: i64,
    pub estimate: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Fitted history plus projected future, contiguous at the series cadence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    pub symbol: String,
    pub interval: Interval,
    pub history_len: usize,
    pub points: Vec<ForecastPoint>,
}

impl Forecast {
    /// Points covering the observed range.
    pub fn fitted(&self) -> &[ForecastPoint] {
        &self.points[..self.history_len]
    }

    /// Points beyond the last observation.
    pub fn projected(&self) -> &[ForecastPoint] {
        &self.points[self.history_len..]
    }

    pub fn horizon(&self) -> usize {
        self.points.len() - self.history_len
    }
}

/// Round to currency minor units (2 decimal places).
#[inline]
pub fn round_cents(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(ts_ms: i64, close: f64) -> PricePoint {
        PricePoint { ts_ms, close }
    }

    #[test]
    fn accepts_ordered_points_and_empty() {
        let s = PriceSeries::new("CL=F", Interval::Daily, vec![pt(1, 70.0), pt(2, 71.0)])
            .expect("must build");
        assert_eq!(s.len(), 2);
        assert_eq!(s.latest().expect("non-empty").close, 71.0);

        let empty = PriceSeries::new("CL=F", Interval::Daily, vec![]).expect("must build");
        assert!(empty.is_empty());
        assert!(empty.latest().is_none());
    }

    #[test]
    fn rejects_out_of_order_points() {
        let err = PriceSeries::new("CL=F", Interval::Daily, vec![pt(2, 70.0), pt(1, 71.0)])
            .expect_err("must fail");
        assert_eq!(err, SeriesError::Unordered { index: 1 });
    }

    #[test]
    fn rejects_duplicate_timestamps() {
        let err = PriceSeries::new("CL=F", Interval::Daily, vec![pt(1, 70.0), pt(1, 71.0)])
            .expect_err("must fail");
        assert!(matches!(err, SeriesError::Duplicate { ts_ms: 1, .. }));
    }

    #[test]
    fn parses_interval_and_period() {
        assert_eq!("1wk".parse::<Interval>().expect("must parse"), Interval::Weekly);
        assert_eq!("3mo".parse::<Period>().expect("must parse"), Period::ThreeMonths);
        assert!("2h".parse::<Interval>().is_err());
        assert!("5y".parse::<Period>().is_err());
    }

    #[test]
    fn monthly_advance_is_calendar_aware() {
        // 2024-01-15T00:00:00Z -> 2024-02-15T00:00:00Z (31 days in between)
        let jan15 = 1_705_276_800_000;
        assert_eq!(Interval::Monthly.advance(jan15), jan15 + 31 * 86_400_000);
        assert_eq!(Interval::Daily.advance(0), 86_400_000);
    }

    #[test]
    fn rounds_to_minor_units() {
        assert_eq!(round_cents(17.123_456), 17.12);
        assert_eq!(round_cents(17.126), 17.13);
        assert_eq!(round_cents(100.0), 100.0);
    }
}
