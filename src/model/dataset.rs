//! Dataset descriptors: the observed, predicted, baseline and covariate data.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::features::FeatureAuthority;
use super::time::TimeScale;

/// The role a dataset plays within an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetOrientation {
    /// The observed data, also known as the left data.
    Left,
    /// The predicted data, also known as the right data.
    Right,
    /// The baseline data.
    Baseline,
    /// A covariate dataset.
    Covariate,
}

impl fmt::Display for DatasetOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DatasetOrientation::Left => "observed",
            DatasetOrientation::Right => "predicted",
            DatasetOrientation::Baseline => "baseline",
            DatasetOrientation::Covariate => "covariate",
        };
        write!(f, "{name}")
    }
}

/// The type of a time-series dataset. Declared explicitly or inferred from
/// the data during ingest; `None` on a [`Dataset`] means "not yet known".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    Observations,
    Analyses,
    SingleValuedForecasts,
    EnsembleForecasts,
}

impl DataType {
    /// Returns true for forecast-like types.
    pub fn is_forecast(&self) -> bool {
        matches!(
            self,
            DataType::SingleValuedForecasts | DataType::EnsembleForecasts
        )
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Observations => "observations",
            DataType::Analyses => "analyses",
            DataType::SingleValuedForecasts => "single valued forecasts",
            DataType::EnsembleForecasts => "ensemble forecasts",
        };
        write!(f, "{name}")
    }
}

/// A shorthand for the API through which a data source is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceInterface {
    UsgsNwis,
    WrdsAhps,
    WrdsNwm,
    NwmShortRangeChannelRt,
    NwmMediumRangeEnsembleChannelRt,
    NwmAnalysisAssimChannelRt,
    NwmLongRangeChannelRt,
}

impl SourceInterface {
    /// The data types this interface can supply.
    pub fn data_types(&self) -> &'static [DataType] {
        match self {
            SourceInterface::UsgsNwis => &[DataType::Observations],
            SourceInterface::WrdsAhps => {
                &[DataType::SingleValuedForecasts, DataType::Observations]
            }
            SourceInterface::WrdsNwm => {
                &[DataType::SingleValuedForecasts, DataType::EnsembleForecasts]
            }
            SourceInterface::NwmShortRangeChannelRt => &[DataType::SingleValuedForecasts],
            SourceInterface::NwmMediumRangeEnsembleChannelRt => &[DataType::EnsembleForecasts],
            SourceInterface::NwmAnalysisAssimChannelRt => &[DataType::Analyses],
            SourceInterface::NwmLongRangeChannelRt => &[DataType::SingleValuedForecasts],
        }
    }

    /// Returns true for interfaces that read from a web service.
    pub fn is_web_service(&self) -> bool {
        matches!(
            self,
            SourceInterface::UsgsNwis | SourceInterface::WrdsAhps | SourceInterface::WrdsNwm
        )
    }

    /// Returns true for interfaces that cannot resolve data without declared
    /// geospatial features.
    pub fn requires_features(&self) -> bool {
        matches!(
            self,
            SourceInterface::NwmShortRangeChannelRt
                | SourceInterface::NwmMediumRangeEnsembleChannelRt
                | SourceInterface::NwmAnalysisAssimChannelRt
                | SourceInterface::NwmLongRangeChannelRt
        )
    }

    /// Returns true for interfaces that require a declared variable name.
    pub fn requires_variable(&self) -> bool {
        matches!(
            self,
            SourceInterface::UsgsNwis | SourceInterface::WrdsAhps | SourceInterface::WrdsNwm
        )
    }

    /// Returns true when any of the admissible data types is ensemble-like.
    pub fn is_ensemble_like(&self) -> bool {
        self.data_types().contains(&DataType::EnsembleForecasts)
    }

    /// Returns true when every admissible data type is forecast-like.
    pub fn is_forecast_only(&self) -> bool {
        self.data_types().iter().all(DataType::is_forecast)
    }

    /// The feature authority implied by this interface.
    pub fn feature_authority(&self) -> FeatureAuthority {
        match self {
            SourceInterface::UsgsNwis => FeatureAuthority::UsgsSiteCode,
            SourceInterface::WrdsAhps => FeatureAuthority::NwsLid,
            SourceInterface::WrdsNwm
            | SourceInterface::NwmShortRangeChannelRt
            | SourceInterface::NwmMediumRangeEnsembleChannelRt
            | SourceInterface::NwmAnalysisAssimChannelRt
            | SourceInterface::NwmLongRangeChannelRt => FeatureAuthority::NwmFeatureId,
        }
    }
}

impl fmt::Display for SourceInterface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceInterface::UsgsNwis => "usgs nwis",
            SourceInterface::WrdsAhps => "wrds ahps",
            SourceInterface::WrdsNwm => "wrds nwm",
            SourceInterface::NwmShortRangeChannelRt => "nwm short range channel rt",
            SourceInterface::NwmMediumRangeEnsembleChannelRt => {
                "nwm medium range ensemble channel rt"
            }
            SourceInterface::NwmAnalysisAssimChannelRt => "nwm analysis assim channel rt",
            SourceInterface::NwmLongRangeChannelRt => "nwm long range channel rt",
        };
        write!(f, "{name}")
    }
}

/// One source of time-series data within a dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// The location of the source, a URI.
    pub uri: Option<String>,
    /// The interface shorthand for reading the source.
    pub interface: Option<SourceInterface>,
}

/// The variable to evaluate within a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub label: Option<String>,
}

impl Variable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
        }
    }
}

/// A dataset descriptor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub label: Option<String>,
    pub variable: Option<Variable>,
    #[serde(default)]
    pub sources: Vec<Source>,
    /// The declared or inferred data type.
    #[serde(rename = "type")]
    pub data_type: Option<DataType>,
    pub feature_authority: Option<FeatureAuthority>,
    pub time_scale: Option<TimeScale>,
    pub unit: Option<String>,
}

impl Dataset {
    /// Returns true when any source uses a web-service interface.
    pub fn has_web_sources(&self) -> bool {
        self.sources
            .iter()
            .filter_map(|source| source.interface)
            .any(|interface| interface.is_web_service())
    }

    /// Returns true when any source declares the prescribed interface.
    pub fn has_interface(&self, interface: SourceInterface) -> bool {
        self.sources
            .iter()
            .any(|source| source.interface == Some(interface))
    }
}

/// The method used to synthesize a baseline from the observed data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeneratedBaselineMethod {
    Persistence,
    Climatology,
}

impl fmt::Display for GeneratedBaselineMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneratedBaselineMethod::Persistence => write!(f, "persistence"),
            GeneratedBaselineMethod::Climatology => write!(f, "climatology"),
        }
    }
}

/// Parameters of a generated baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeneratedBaseline {
    pub method: GeneratedBaselineMethod,
    pub minimum_date: Option<DateTime<Utc>>,
    pub maximum_date: Option<DateTime<Utc>>,
}

/// The baseline dataset, either supplied literally or generated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BaselineDataset {
    #[serde(flatten)]
    pub dataset: Dataset,
    /// Parameters of a generated baseline, when the baseline is synthesized.
    pub generated: Option<GeneratedBaseline>,
    /// Whether to compute separate metrics for the baseline.
    #[serde(default)]
    pub separate_metrics: bool,
}

/// The declared purpose of a covariate dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CovariatePurpose {
    /// The covariate participates in event detection.
    Detect,
    /// The covariate filters pairs by value.
    Filter,
}

/// A covariate dataset with optional filter bounds and rescaling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CovariateDataset {
    #[serde(flatten)]
    pub dataset: Dataset,
    /// Pairs are removed when the covariate value is below this bound.
    pub minimum: Option<f64>,
    /// Pairs are removed when the covariate value is above this bound.
    pub maximum: Option<f64>,
    pub purpose: Option<CovariatePurpose>,
    /// The function used to rescale the covariate to the evaluation scale.
    pub rescale_function: Option<super::time::TimeScaleFunction>,
}

impl CovariateDataset {
    /// The declared variable name, if any.
    pub fn variable_name(&self) -> Option<&str> {
        self.dataset
            .variable
            .as_ref()
            .map(|variable| variable.name.as_str())
    }

    /// Returns true when either filter bound is declared. A covariate without
    /// bounds and without a declared purpose is implicitly a detection one.
    pub fn has_filter_bounds(&self) -> bool {
        self.minimum.is_some() || self.maximum.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interface_properties() {
        assert!(SourceInterface::UsgsNwis.is_web_service());
        assert!(!SourceInterface::NwmShortRangeChannelRt.is_web_service());
        assert!(SourceInterface::NwmShortRangeChannelRt.requires_features());
        assert!(SourceInterface::WrdsNwm.requires_variable());
        assert!(SourceInterface::NwmMediumRangeEnsembleChannelRt.is_ensemble_like());
        assert!(SourceInterface::NwmShortRangeChannelRt.is_forecast_only());
        assert!(!SourceInterface::WrdsAhps.is_forecast_only());
    }

    #[test]
    fn test_dataset_source_queries() {
        let dataset = Dataset {
            sources: vec![
                Source {
                    uri: Some("https://example.com/nwis".to_string()),
                    interface: Some(SourceInterface::UsgsNwis),
                },
                Source {
                    uri: Some("data/observations.csv".to_string()),
                    interface: None,
                },
            ],
            ..Default::default()
        };

        assert!(dataset.has_web_sources());
        assert!(dataset.has_interface(SourceInterface::UsgsNwis));
        assert!(!dataset.has_interface(SourceInterface::WrdsNwm));
    }

    #[test]
    fn test_orientation_display() {
        assert_eq!(DatasetOrientation::Left.to_string(), "observed");
        assert_eq!(DatasetOrientation::Right.to_string(), "predicted");
    }
}
