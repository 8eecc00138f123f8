//! The metric catalog: every verification metric the engine knows about,
//! together with the static attributes the validation rules consult.
//!
//! The catalog is data, not behavior. Each metric carries the sample data
//! groups it consumes, the statistic group it produces, its bounds and
//! optimum, and whether it is a skill metric that needs an explicit baseline.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// The kind of paired sample data a metric consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleDataGroup {
    SingleValued,
    Ensemble,
    DiscreteProbability,
    Dichotomous,
    Multicategory,
    SingleValuedTimeSeries,
}

impl SampleDataGroup {
    /// Returns true for groups that require event thresholds to form pairs.
    pub fn is_categorical(&self) -> bool {
        matches!(
            self,
            SampleDataGroup::Dichotomous | SampleDataGroup::Multicategory
        )
    }
}

/// The kind of statistic a metric produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatisticGroup {
    DoubleScore,
    Diagram,
    BoxplotPerPool,
    BoxplotPerPair,
    Paired,
    DurationScore,
}

impl StatisticGroup {
    /// Returns true for scalar score statistics.
    pub fn is_score(&self) -> bool {
        matches!(
            self,
            StatisticGroup::DoubleScore | StatisticGroup::DurationScore
        )
    }
}

/// A verification metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricName {
    MeanError,
    MeanAbsoluteError,
    MeanSquareError,
    RootMeanSquareError,
    PearsonCorrelationCoefficient,
    KlingGuptaEfficiency,
    BiasFraction,
    SampleSize,
    VolumetricEfficiency,
    MeanSquareErrorSkillScore,
    ContinuousRankedProbabilityScore,
    ContinuousRankedProbabilitySkillScore,
    RankHistogram,
    BrierScore,
    BrierSkillScore,
    ReliabilityDiagram,
    RelativeOperatingCharacteristicDiagram,
    RelativeOperatingCharacteristicScore,
    ProbabilityOfDetection,
    ProbabilityOfFalseDetection,
    CriticalSuccessIndex,
    FrequencyBias,
    EquitableThreatScore,
    PeirceSkillScore,
    TimeToPeakError,
    TimeToPeakRelativeError,
    QuantileQuantileDiagram,
    ScatterPlot,
    BoxPlotOfErrors,
    BoxPlotOfPercentageErrors,
    BoxPlotOfErrorsByObservedValue,
    BoxPlotOfErrorsByForecastValue,
}

impl MetricName {
    /// Every metric in the catalog, in declaration order.
    pub const ALL: &'static [MetricName] = &[
        MetricName::MeanError,
        MetricName::MeanAbsoluteError,
        MetricName::MeanSquareError,
        MetricName::RootMeanSquareError,
        MetricName::PearsonCorrelationCoefficient,
        MetricName::KlingGuptaEfficiency,
        MetricName::BiasFraction,
        MetricName::SampleSize,
        MetricName::VolumetricEfficiency,
        MetricName::MeanSquareErrorSkillScore,
        MetricName::ContinuousRankedProbabilityScore,
        MetricName::ContinuousRankedProbabilitySkillScore,
        MetricName::RankHistogram,
        MetricName::BrierScore,
        MetricName::BrierSkillScore,
        MetricName::ReliabilityDiagram,
        MetricName::RelativeOperatingCharacteristicDiagram,
        MetricName::RelativeOperatingCharacteristicScore,
        MetricName::ProbabilityOfDetection,
        MetricName::ProbabilityOfFalseDetection,
        MetricName::CriticalSuccessIndex,
        MetricName::FrequencyBias,
        MetricName::EquitableThreatScore,
        MetricName::PeirceSkillScore,
        MetricName::TimeToPeakError,
        MetricName::TimeToPeakRelativeError,
        MetricName::QuantileQuantileDiagram,
        MetricName::ScatterPlot,
        MetricName::BoxPlotOfErrors,
        MetricName::BoxPlotOfPercentageErrors,
        MetricName::BoxPlotOfErrorsByObservedValue,
        MetricName::BoxPlotOfErrorsByForecastValue,
    ];

    /// The static attributes of this metric.
    pub fn attributes(&self) -> &'static MetricAttributes {
        REGISTRY
            .get(self)
            .unwrap_or_else(|| panic!("metric {self} is missing from the registry"))
    }

    /// Returns true when this metric consumes the prescribed sample group.
    pub fn is_in_group(&self, group: SampleDataGroup) -> bool {
        self.attributes().sample_groups.contains(&group)
    }

    /// The statistic group this metric produces.
    pub fn statistic_group(&self) -> StatisticGroup {
        self.attributes().statistic_group
    }

    /// Returns true for skill metrics.
    pub fn is_skill(&self) -> bool {
        self.attributes().is_skill
    }

    /// Returns true when this metric cannot use a default baseline, such as
    /// climatology, and requires one declared explicitly.
    pub fn requires_explicit_baseline(&self) -> bool {
        self.attributes().requires_explicit_baseline
    }

    /// Returns true when this metric only consumes categorical pairs, which
    /// require event thresholds.
    pub fn is_categorical(&self) -> bool {
        self.attributes()
            .sample_groups
            .iter()
            .all(SampleDataGroup::is_categorical)
    }

    /// Returns true when this metric produces a score statistic.
    pub fn is_score(&self) -> bool {
        self.statistic_group().is_score()
    }

    /// Returns true when graphics for this metric may be combined across
    /// the predicted and baseline datasets.
    pub fn supports_combined_graphics(&self) -> bool {
        !matches!(
            self.statistic_group(),
            StatisticGroup::Paired | StatisticGroup::BoxplotPerPool | StatisticGroup::BoxplotPerPair
        )
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MetricName::MeanError => "mean error",
            MetricName::MeanAbsoluteError => "mean absolute error",
            MetricName::MeanSquareError => "mean square error",
            MetricName::RootMeanSquareError => "root mean square error",
            MetricName::PearsonCorrelationCoefficient => "pearson correlation coefficient",
            MetricName::KlingGuptaEfficiency => "kling gupta efficiency",
            MetricName::BiasFraction => "bias fraction",
            MetricName::SampleSize => "sample size",
            MetricName::VolumetricEfficiency => "volumetric efficiency",
            MetricName::MeanSquareErrorSkillScore => "mean square error skill score",
            MetricName::ContinuousRankedProbabilityScore => "continuous ranked probability score",
            MetricName::ContinuousRankedProbabilitySkillScore => {
                "continuous ranked probability skill score"
            }
            MetricName::RankHistogram => "rank histogram",
            MetricName::BrierScore => "brier score",
            MetricName::BrierSkillScore => "brier skill score",
            MetricName::ReliabilityDiagram => "reliability diagram",
            MetricName::RelativeOperatingCharacteristicDiagram => {
                "relative operating characteristic diagram"
            }
            MetricName::RelativeOperatingCharacteristicScore => {
                "relative operating characteristic score"
            }
            MetricName::ProbabilityOfDetection => "probability of detection",
            MetricName::ProbabilityOfFalseDetection => "probability of false detection",
            MetricName::CriticalSuccessIndex => "critical success index",
            MetricName::FrequencyBias => "frequency bias",
            MetricName::EquitableThreatScore => "equitable threat score",
            MetricName::PeirceSkillScore => "peirce skill score",
            MetricName::TimeToPeakError => "time to peak error",
            MetricName::TimeToPeakRelativeError => "time to peak relative error",
            MetricName::QuantileQuantileDiagram => "quantile quantile diagram",
            MetricName::ScatterPlot => "scatter plot",
            MetricName::BoxPlotOfErrors => "box plot of errors",
            MetricName::BoxPlotOfPercentageErrors => "box plot of percentage errors",
            MetricName::BoxPlotOfErrorsByObservedValue => "box plot of errors by observed value",
            MetricName::BoxPlotOfErrorsByForecastValue => "box plot of errors by forecast value",
        };
        write!(f, "{name}")
    }
}

/// The static attributes of a metric.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricAttributes {
    /// The sample data groups the metric consumes.
    pub sample_groups: &'static [SampleDataGroup],
    /// The statistic group the metric produces.
    pub statistic_group: StatisticGroup,
    /// The lower bound of the statistic.
    pub minimum: f64,
    /// The upper bound of the statistic.
    pub maximum: f64,
    /// The value of a perfect statistic.
    pub optimum: f64,
    /// Whether the metric measures skill relative to a baseline.
    pub is_skill: bool,
    /// Whether the metric requires an explicitly declared baseline.
    pub requires_explicit_baseline: bool,
}

const SINGLE_VALUED: &[SampleDataGroup] = &[SampleDataGroup::SingleValued];
const ENSEMBLE: &[SampleDataGroup] = &[SampleDataGroup::Ensemble];
const DISCRETE_PROBABILITY: &[SampleDataGroup] = &[SampleDataGroup::DiscreteProbability];
const DICHOTOMOUS: &[SampleDataGroup] = &[SampleDataGroup::Dichotomous];
const TIME_SERIES: &[SampleDataGroup] = &[SampleDataGroup::SingleValuedTimeSeries];
const UNIVERSAL: &[SampleDataGroup] = &[
    SampleDataGroup::SingleValued,
    SampleDataGroup::Ensemble,
    SampleDataGroup::DiscreteProbability,
    SampleDataGroup::Dichotomous,
    SampleDataGroup::Multicategory,
];

static REGISTRY: Lazy<HashMap<MetricName, MetricAttributes>> = Lazy::new(|| {
    let mut registry = HashMap::new();

    let mut insert = |name: MetricName,
                      sample_groups: &'static [SampleDataGroup],
                      statistic_group: StatisticGroup,
                      minimum: f64,
                      maximum: f64,
                      optimum: f64,
                      is_skill: bool,
                      requires_explicit_baseline: bool| {
        registry.insert(
            name,
            MetricAttributes {
                sample_groups,
                statistic_group,
                minimum,
                maximum,
                optimum,
                is_skill,
                requires_explicit_baseline,
            },
        );
    };

    use MetricName::*;
    use StatisticGroup::*;

    insert(
        MeanError,
        SINGLE_VALUED,
        DoubleScore,
        f64::NEG_INFINITY,
        f64::INFINITY,
        0.0,
        false,
        false,
    );
    insert(
        MeanAbsoluteError,
        SINGLE_VALUED,
        DoubleScore,
        0.0,
        f64::INFINITY,
        0.0,
        false,
        false,
    );
    insert(
        MeanSquareError,
        SINGLE_VALUED,
        DoubleScore,
        0.0,
        f64::INFINITY,
        0.0,
        false,
        false,
    );
    insert(
        RootMeanSquareError,
        SINGLE_VALUED,
        DoubleScore,
        0.0,
        f64::INFINITY,
        0.0,
        false,
        false,
    );
    insert(
        PearsonCorrelationCoefficient,
        SINGLE_VALUED,
        DoubleScore,
        -1.0,
        1.0,
        1.0,
        false,
        false,
    );
    insert(
        KlingGuptaEfficiency,
        SINGLE_VALUED,
        DoubleScore,
        f64::NEG_INFINITY,
        1.0,
        1.0,
        false,
        false,
    );
    insert(
        BiasFraction,
        SINGLE_VALUED,
        DoubleScore,
        f64::NEG_INFINITY,
        f64::INFINITY,
        0.0,
        false,
        false,
    );
    insert(
        SampleSize,
        UNIVERSAL,
        DoubleScore,
        0.0,
        f64::INFINITY,
        f64::INFINITY,
        false,
        false,
    );
    insert(
        VolumetricEfficiency,
        SINGLE_VALUED,
        DoubleScore,
        f64::NEG_INFINITY,
        1.0,
        1.0,
        false,
        false,
    );
    insert(
        MeanSquareErrorSkillScore,
        SINGLE_VALUED,
        DoubleScore,
        f64::NEG_INFINITY,
        1.0,
        1.0,
        true,
        false,
    );
    insert(
        ContinuousRankedProbabilityScore,
        ENSEMBLE,
        DoubleScore,
        0.0,
        f64::INFINITY,
        0.0,
        false,
        false,
    );
    insert(
        ContinuousRankedProbabilitySkillScore,
        ENSEMBLE,
        DoubleScore,
        f64::NEG_INFINITY,
        1.0,
        1.0,
        true,
        true,
    );
    insert(
        RankHistogram,
        ENSEMBLE,
        Diagram,
        0.0,
        f64::INFINITY,
        f64::NAN,
        false,
        false,
    );
    insert(
        BrierScore,
        DISCRETE_PROBABILITY,
        DoubleScore,
        0.0,
        1.0,
        0.0,
        false,
        false,
    );
    insert(
        BrierSkillScore,
        DISCRETE_PROBABILITY,
        DoubleScore,
        f64::NEG_INFINITY,
        1.0,
        1.0,
        true,
        false,
    );
    insert(
        ReliabilityDiagram,
        DISCRETE_PROBABILITY,
        Diagram,
        0.0,
        1.0,
        f64::NAN,
        false,
        false,
    );
    insert(
        RelativeOperatingCharacteristicDiagram,
        DISCRETE_PROBABILITY,
        Diagram,
        0.0,
        1.0,
        f64::NAN,
        false,
        false,
    );
    insert(
        RelativeOperatingCharacteristicScore,
        DISCRETE_PROBABILITY,
        DoubleScore,
        0.0,
        1.0,
        1.0,
        true,
        false,
    );
    insert(
        ProbabilityOfDetection,
        DICHOTOMOUS,
        DoubleScore,
        0.0,
        1.0,
        1.0,
        false,
        false,
    );
    insert(
        ProbabilityOfFalseDetection,
        DICHOTOMOUS,
        DoubleScore,
        0.0,
        1.0,
        0.0,
        false,
        false,
    );
    insert(
        CriticalSuccessIndex,
        DICHOTOMOUS,
        DoubleScore,
        0.0,
        1.0,
        1.0,
        false,
        false,
    );
    insert(
        FrequencyBias,
        DICHOTOMOUS,
        DoubleScore,
        0.0,
        f64::INFINITY,
        1.0,
        false,
        false,
    );
    insert(
        EquitableThreatScore,
        DICHOTOMOUS,
        DoubleScore,
        -1.0 / 3.0,
        1.0,
        1.0,
        true,
        false,
    );
    insert(
        PeirceSkillScore,
        DICHOTOMOUS,
        DoubleScore,
        -1.0,
        1.0,
        1.0,
        true,
        false,
    );
    insert(
        TimeToPeakError,
        TIME_SERIES,
        Paired,
        f64::NEG_INFINITY,
        f64::INFINITY,
        0.0,
        false,
        false,
    );
    insert(
        TimeToPeakRelativeError,
        TIME_SERIES,
        Paired,
        f64::NEG_INFINITY,
        f64::INFINITY,
        0.0,
        false,
        false,
    );
    insert(
        QuantileQuantileDiagram,
        SINGLE_VALUED,
        Diagram,
        f64::NEG_INFINITY,
        f64::INFINITY,
        f64::NAN,
        false,
        false,
    );
    insert(
        ScatterPlot,
        SINGLE_VALUED,
        Diagram,
        f64::NEG_INFINITY,
        f64::INFINITY,
        f64::NAN,
        false,
        false,
    );
    insert(
        BoxPlotOfErrors,
        SINGLE_VALUED,
        BoxplotPerPool,
        f64::NEG_INFINITY,
        f64::INFINITY,
        0.0,
        false,
        false,
    );
    insert(
        BoxPlotOfPercentageErrors,
        SINGLE_VALUED,
        BoxplotPerPool,
        f64::NEG_INFINITY,
        f64::INFINITY,
        0.0,
        false,
        false,
    );
    insert(
        BoxPlotOfErrorsByObservedValue,
        ENSEMBLE,
        BoxplotPerPair,
        f64::NEG_INFINITY,
        f64::INFINITY,
        0.0,
        false,
        false,
    );
    insert(
        BoxPlotOfErrorsByForecastValue,
        ENSEMBLE,
        BoxplotPerPair,
        f64::NEG_INFINITY,
        f64::INFINITY,
        0.0,
        false,
        false,
    );

    registry
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_metric_has_attributes() {
        for name in MetricName::ALL {
            let attributes = name.attributes();
            assert!(
                !attributes.sample_groups.is_empty(),
                "metric {name} declares no sample groups"
            );
            assert!(
                attributes.minimum <= attributes.maximum,
                "metric {name} has inverted bounds"
            );
        }
        assert_eq!(MetricName::ALL.len(), REGISTRY.len());
    }

    #[test]
    fn test_skill_and_baseline_requirements() {
        assert!(MetricName::MeanSquareErrorSkillScore.is_skill());
        assert!(!MetricName::MeanSquareErrorSkillScore.requires_explicit_baseline());
        assert!(MetricName::ContinuousRankedProbabilitySkillScore.requires_explicit_baseline());
        assert!(!MetricName::MeanError.is_skill());
    }

    #[test]
    fn test_categorical_metrics() {
        assert!(MetricName::ProbabilityOfDetection.is_categorical());
        assert!(MetricName::FrequencyBias.is_categorical());
        assert!(!MetricName::MeanError.is_categorical());
        assert!(!MetricName::SampleSize.is_categorical());
    }

    #[test]
    fn test_combined_graphics_support() {
        assert!(MetricName::MeanError.supports_combined_graphics());
        assert!(!MetricName::TimeToPeakError.supports_combined_graphics());
        assert!(!MetricName::BoxPlotOfErrors.supports_combined_graphics());
        assert!(!MetricName::BoxPlotOfErrorsByObservedValue.supports_combined_graphics());
    }

    #[test]
    fn test_score_statistics() {
        assert!(MetricName::MeanError.is_score());
        assert!(!MetricName::TimeToPeakError.is_score());
        assert!(!MetricName::RankHistogram.is_score());
        assert!(!MetricName::ScatterPlot.is_score());
    }
}
