//! Metric declarations, summary statistics and sampling uncertainty.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::MetricName;

/// The statistic used to collapse an ensemble into a single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnsembleAverageType {
    Mean,
    Median,
}

impl fmt::Display for EnsembleAverageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnsembleAverageType::Mean => write!(f, "mean"),
            EnsembleAverageType::Median => write!(f, "median"),
        }
    }
}

/// Optional per-metric parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricParameters {
    /// Overrides the evaluation-level ensemble average for this metric.
    pub ensemble_average: Option<EnsembleAverageType>,
}

/// A declared metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub name: MetricName,
    pub parameters: Option<MetricParameters>,
}

impl Metric {
    pub fn new(name: MetricName) -> Self {
        Self {
            name,
            parameters: None,
        }
    }
}

/// The statistic computed by a summary statistic declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryStatisticName {
    Mean,
    Median,
    Minimum,
    Maximum,
    StandardDeviation,
    Quantile,
}

/// The dimension over which a summary statistic is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryStatisticDimension {
    /// Across geographic features.
    Features,
    /// Across the members of each feature group.
    FeatureGroup,
    /// Across valid-date pools.
    ValidDatePools,
}

impl fmt::Display for SummaryStatisticDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SummaryStatisticDimension::Features => "features",
            SummaryStatisticDimension::FeatureGroup => "feature group",
            SummaryStatisticDimension::ValidDatePools => "valid date pools",
        };
        write!(f, "{name}")
    }
}

/// A summary statistic computed across raw evaluation statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistic {
    pub statistic: SummaryStatisticName,
    #[serde(default)]
    pub dimensions: Vec<SummaryStatisticDimension>,
    /// The probability of a quantile statistic.
    pub probability: Option<f64>,
}

/// Resampling configuration for estimating sampling uncertainty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleUncertainty {
    /// The number of resampled realizations.
    pub sample_size: Option<u64>,
    /// The quantiles of the resampled statistic distribution to report.
    #[serde(default)]
    pub quantiles: Vec<f64>,
}
