//! The root declaration and its remaining value objects.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::dataset::{BaselineDataset, CovariateDataset, Dataset};
use super::features::{FeatureGroups, FeatureService, Features, SpatialMask};
use super::metrics::{EnsembleAverageType, Metric, SampleUncertainty, SummaryStatistic};
use super::thresholds::{Threshold, ThresholdSource};
use super::time::{
    AnalysisTimes, LeadTimeInterval, Season, TimeInterval, TimePools, TimeScale,
    TimeScaleFunction, TimeWindow,
};

/// An alias for a measurement unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitAlias {
    pub alias: String,
    pub unit: String,
}

/// Leniency when rescaling datasets whose time scale is incompletely known.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeScaleLenience {
    #[default]
    None,
    Observed,
    Predicted,
    Baseline,
    All,
}

/// The datasets that participate in event detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventDetectionDataset {
    Observed,
    Predicted,
    Baseline,
    Covariates,
}

impl fmt::Display for EventDetectionDataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventDetectionDataset::Observed => "observed",
            EventDetectionDataset::Predicted => "predicted",
            EventDetectionDataset::Baseline => "baseline",
            EventDetectionDataset::Covariates => "covariates",
        };
        write!(f, "{name}")
    }
}

/// How events detected across several datasets are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombinationMethod {
    #[default]
    Union,
    Intersection,
}

impl fmt::Display for CombinationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CombinationMethod::Union => write!(f, "union"),
            CombinationMethod::Intersection => write!(f, "intersection"),
        }
    }
}

/// The combination declaration for event detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EventDetectionCombination {
    #[serde(default)]
    pub method: CombinationMethod,
    /// How intersecting events are aggregated into one event.
    pub aggregation: Option<TimeScaleFunction>,
}

/// Tuning parameters for event detection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EventDetectionParameters {
    /// The detection window size, in units of the evaluation time scale.
    pub window_size: Option<u64>,
    /// The smoothing half-life, in the same units.
    pub half_life: Option<u64>,
    pub combination: Option<EventDetectionCombination>,
}

/// Automatic detection of notable sub-intervals, used to scope pooling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventDetection {
    #[serde(default)]
    pub datasets: Vec<EventDetectionDataset>,
    pub parameters: Option<EventDetectionParameters>,
}

/// The method used to cross-pair datasets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossPairMethod {
    #[default]
    Exact,
    Fuzzy,
}

/// The scope of cross-pairing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossPairScope {
    #[default]
    WithinFeatures,
    AcrossFeatures,
}

/// Cross-pairing of the predicted and baseline datasets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CrossPair {
    #[serde(default)]
    pub method: CrossPairMethod,
    #[serde(default)]
    pub scope: CrossPairScope,
}

impl CrossPair {
    /// Returns true for fuzzy cross-pairing across features, the mode that
    /// stabilizes pair counts for sampling uncertainty estimation.
    pub fn is_fuzzy_across_features(&self) -> bool {
        self.method == CrossPairMethod::Fuzzy && self.scope == CrossPairScope::AcrossFeatures
    }
}

/// A statistics output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Csv,
    Csv2,
    Netcdf,
    Netcdf2,
    Pairs,
    Png,
    Svg,
    Protobuf,
}

impl OutputFormat {
    /// Returns true for graphics formats.
    pub fn is_graphic(&self) -> bool {
        matches!(self, OutputFormat::Png | OutputFormat::Svg)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Csv2 => "csv2",
            OutputFormat::Netcdf => "netcdf",
            OutputFormat::Netcdf2 => "netcdf2",
            OutputFormat::Pairs => "pairs",
            OutputFormat::Png => "png",
            OutputFormat::Svg => "svg",
            OutputFormat::Protobuf => "protobuf",
        };
        write!(f, "{name}")
    }
}

/// The orientation of graphics outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphicsShape {
    LeadThreshold,
    ThresholdLead,
    IssuedDatePools,
    ValidDatePools,
}

impl fmt::Display for GraphicsShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GraphicsShape::LeadThreshold => "lead threshold",
            GraphicsShape::ThresholdLead => "threshold lead",
            GraphicsShape::IssuedDatePools => "issued date pools",
            GraphicsShape::ValidDatePools => "valid date pools",
        };
        write!(f, "{name}")
    }
}

/// The selected output formats.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Formats {
    #[serde(default)]
    pub formats: Vec<OutputFormat>,
    /// The orientation of any graphics formats.
    pub shape: Option<GraphicsShape>,
}

impl Formats {
    pub fn has(&self, format: OutputFormat) -> bool {
        self.formats.contains(&format)
    }

    pub fn has_graphics(&self) -> bool {
        self.formats.iter().any(OutputFormat::is_graphic)
    }
}

/// The root of the declaration model: a user-authored description of one
/// evaluation, constructed by the external parser and consumed read-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationDeclaration {
    pub label: Option<String>,
    /// The observed dataset.
    pub left: Option<Dataset>,
    /// The predicted dataset.
    pub right: Option<Dataset>,
    pub baseline: Option<BaselineDataset>,
    #[serde(default)]
    pub covariates: Vec<CovariateDataset>,
    /// The evaluation measurement unit.
    pub unit: Option<String>,
    #[serde(default)]
    pub unit_aliases: Vec<UnitAlias>,
    pub reference_dates: Option<TimeInterval>,
    pub valid_dates: Option<TimeInterval>,
    #[serde(default)]
    pub ignored_valid_dates: Vec<TimeInterval>,
    pub lead_times: Option<LeadTimeInterval>,
    pub analysis_times: Option<AnalysisTimes>,
    pub season: Option<Season>,
    /// Explicitly declared pools.
    #[serde(default)]
    pub time_pools: Vec<TimeWindow>,
    pub valid_date_pools: Option<TimePools>,
    pub reference_date_pools: Option<TimePools>,
    pub lead_time_pools: Option<TimePools>,
    /// The desired time scale of the evaluation.
    pub time_scale: Option<TimeScale>,
    #[serde(default)]
    pub rescale_lenience: TimeScaleLenience,
    #[serde(default)]
    pub thresholds: Vec<Threshold>,
    #[serde(default)]
    pub threshold_sources: Vec<ThresholdSource>,
    #[serde(default)]
    pub metrics: Vec<Metric>,
    /// The evaluation-level ensemble average, applied to all metrics that do
    /// not declare their own.
    pub ensemble_average: Option<EnsembleAverageType>,
    pub features: Option<Features>,
    pub feature_groups: Option<FeatureGroups>,
    pub feature_service: Option<FeatureService>,
    pub spatial_mask: Option<SpatialMask>,
    pub event_detection: Option<EventDetection>,
    #[serde(default)]
    pub summary_statistics: Vec<SummaryStatistic>,
    pub sample_uncertainty: Option<SampleUncertainty>,
    pub cross_pair: Option<CrossPair>,
    pub formats: Option<Formats>,
    /// Whether to combine graphics across the predicted and baseline data.
    #[serde(default)]
    pub combined_graphics: bool,
}
