//! Temporal declarations: intervals, seasons, pools and time scales.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Upper bound (inclusive) for an instantaneous time scale period, in seconds.
pub const INSTANTANEOUS_SECONDS: i64 = 60;

/// The unit attached to a declared duration count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationUnit {
    #[default]
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl DurationUnit {
    /// Resolves a declared count in this unit to a concrete duration.
    pub fn duration(&self, count: i64) -> Duration {
        match self {
            DurationUnit::Seconds => Duration::seconds(count),
            DurationUnit::Minutes => Duration::minutes(count),
            DurationUnit::Hours => Duration::hours(count),
            DurationUnit::Days => Duration::days(count),
        }
    }
}

/// A date interval. Endpoints are `None` when not declared; an interval is
/// "fully declared" only when both endpoints are present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeInterval {
    pub minimum: Option<DateTime<Utc>>,
    pub maximum: Option<DateTime<Utc>>,
}

impl TimeInterval {
    /// Creates a fully declared interval.
    pub fn new(minimum: DateTime<Utc>, maximum: DateTime<Utc>) -> Self {
        Self {
            minimum: Some(minimum),
            maximum: Some(maximum),
        }
    }

    /// Returns true when both endpoints are declared.
    pub fn is_complete(&self) -> bool {
        self.minimum.is_some() && self.maximum.is_some()
    }

    /// Returns the span between the endpoints when both are declared.
    pub fn span(&self) -> Option<Duration> {
        match (self.minimum, self.maximum) {
            (Some(minimum), Some(maximum)) => Some(maximum - minimum),
            _ => None,
        }
    }

    /// Returns true when this interval intersects the other, treating the
    /// endpoints as inclusive. Both intervals must be fully declared.
    pub fn overlaps(&self, other: &TimeInterval) -> Option<bool> {
        match (self.minimum, self.maximum, other.minimum, other.maximum) {
            (Some(min), Some(max), Some(other_min), Some(other_max)) => {
                Some(min <= other_max && other_min <= max)
            }
            _ => None,
        }
    }
}

/// A lead-time interval, declared as counts of a duration unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadTimeInterval {
    pub minimum: Option<i64>,
    pub maximum: Option<i64>,
    #[serde(default)]
    pub unit: DurationUnit,
}

impl LeadTimeInterval {
    pub fn is_complete(&self) -> bool {
        self.minimum.is_some() && self.maximum.is_some()
    }

    pub fn minimum_duration(&self) -> Option<Duration> {
        self.minimum.map(|count| self.unit.duration(count))
    }

    pub fn maximum_duration(&self) -> Option<Duration> {
        self.maximum.map(|count| self.unit.duration(count))
    }
}

/// An analysis-duration interval, used to select analysis time-series data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisTimes {
    pub minimum: Option<i64>,
    pub maximum: Option<i64>,
    #[serde(default)]
    pub unit: DurationUnit,
}

impl AnalysisTimes {
    pub fn minimum_duration(&self) -> Option<Duration> {
        self.minimum.map(|count| self.unit.duration(count))
    }

    pub fn maximum_duration(&self) -> Option<Duration> {
        self.maximum.map(|count| self.unit.duration(count))
    }
}

/// A day and month within an unspecified year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonthDay {
    pub month: u32,
    pub day: u32,
}

/// A season bounded by two month-days. The lower bound may fall after the
/// upper bound, wrapping the season around a calendar year end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    pub minimum: MonthDay,
    pub maximum: MonthDay,
}

/// A generated sequence of pools: a period, and optionally a frequency with
/// which the period repeats across the governing interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimePools {
    pub period: u64,
    pub frequency: Option<u64>,
    #[serde(default)]
    pub unit: DurationUnit,
}

impl TimePools {
    pub fn period_duration(&self) -> Duration {
        self.unit.duration(self.period as i64)
    }
}

/// An explicitly declared pool window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub reference_dates: Option<TimeInterval>,
    pub valid_dates: Option<TimeInterval>,
    pub lead_times: Option<LeadTimeInterval>,
}

/// The aggregation function of a time scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeScaleFunction {
    Mean,
    Total,
    Minimum,
    Maximum,
}

impl std::fmt::Display for TimeScaleFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TimeScaleFunction::Mean => "mean",
            TimeScaleFunction::Total => "total",
            TimeScaleFunction::Minimum => "minimum",
            TimeScaleFunction::Maximum => "maximum",
        };
        write!(f, "{name}")
    }
}

/// The temporal aggregation of a time series: a function together with either
/// an explicit period or a fully declared month-day season.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeScale {
    pub function: Option<TimeScaleFunction>,
    pub period: Option<u64>,
    #[serde(default)]
    pub unit: DurationUnit,
    pub minimum_day: Option<u32>,
    pub minimum_month: Option<u32>,
    pub maximum_day: Option<u32>,
    pub maximum_month: Option<u32>,
}

impl TimeScale {
    /// Returns the explicit period when one is declared.
    pub fn period_duration(&self) -> Option<Duration> {
        self.period.map(|count| self.unit.duration(count as i64))
    }

    /// Returns true when the lower season bound is fully declared.
    pub fn has_lower_season(&self) -> bool {
        self.minimum_day.is_some() && self.minimum_month.is_some()
    }

    /// Returns true when the upper season bound is fully declared.
    pub fn has_upper_season(&self) -> bool {
        self.maximum_day.is_some() && self.maximum_month.is_some()
    }

    /// Returns true when both season bounds are fully declared.
    pub fn has_full_season(&self) -> bool {
        self.has_lower_season() && self.has_upper_season()
    }

    /// Returns true when any part of a season bound is declared.
    pub fn has_partial_season(&self) -> bool {
        self.minimum_day.is_some()
            || self.minimum_month.is_some()
            || self.maximum_day.is_some()
            || self.maximum_month.is_some()
    }

    /// An instantaneous scale has a period of at most sixty seconds, or a
    /// season whose bounds coincide.
    pub fn is_instantaneous(&self) -> bool {
        if let Some(period) = self.period_duration() {
            return period <= Duration::seconds(INSTANTANEOUS_SECONDS);
        }

        self.has_full_season()
            && self.minimum_day == self.maximum_day
            && self.minimum_month == self.maximum_month
    }
}
