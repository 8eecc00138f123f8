//! Thresholds: cut-points that filter or classify pairs before metrics run.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::dataset::DatasetOrientation;

/// The kind of a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdType {
    /// A threshold expressed in real measurement units.
    Value,
    /// A threshold expressed as a probability of the underlying value.
    Probability,
    /// A threshold that classifies forecast probabilities into occurrences,
    /// only meaningful for ensemble forecasts.
    ProbabilityClassifier,
}

impl fmt::Display for ThresholdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ThresholdType::Value => "value_thresholds",
            ThresholdType::Probability => "probability_thresholds",
            ThresholdType::ProbabilityClassifier => "classifier_thresholds",
        };
        write!(f, "{name}")
    }
}

fn default_feature_name_from() -> DatasetOrientation {
    DatasetOrientation::Left
}

/// An in-band threshold declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    #[serde(rename = "type")]
    pub threshold_type: ThresholdType,
    #[serde(default)]
    pub values: Vec<f64>,
    /// The measurement unit of a value threshold; inferred when absent.
    pub unit: Option<String>,
    /// The feature this threshold applies to, when featureful.
    pub feature: Option<String>,
    /// The orientation whose feature names correlate thresholds to features.
    #[serde(default = "default_feature_name_from")]
    pub feature_name_from: DatasetOrientation,
}

impl Threshold {
    /// A featureless threshold of the prescribed type.
    pub fn new(threshold_type: ThresholdType, values: Vec<f64>) -> Self {
        Self {
            threshold_type,
            values,
            unit: None,
            feature: None,
            feature_name_from: default_feature_name_from(),
        }
    }
}

/// A remote provider of thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSource {
    pub uri: Option<String>,
    /// The orientation whose feature names correlate thresholds to features.
    #[serde(default = "default_feature_name_from")]
    pub feature_name_from: DatasetOrientation,
}

impl Default for ThresholdSource {
    fn default() -> Self {
        Self {
            uri: None,
            feature_name_from: default_feature_name_from(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_name_from_defaults_to_observed() {
        let threshold = Threshold::new(ThresholdType::Value, vec![12.5]);
        assert_eq!(threshold.feature_name_from, DatasetOrientation::Left);

        let source = ThresholdSource::default();
        assert_eq!(source.feature_name_from, DatasetOrientation::Left);
    }
}
