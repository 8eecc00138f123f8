//! The evaluation declaration model.
//!
//! A declaration is the user-authored description of an evaluation: which
//! datasets to compare, over what times and places, with which metrics and
//! output formats. The model is produced by an external parser, consumed
//! read-only by the validator and discarded once the evaluation proceeds or
//! is rejected. Nearly every field is optional; the validation rules in
//! [`crate::rules`] encode which combinations are coherent.

mod dataset;
mod declaration;
mod features;
mod metrics;
mod thresholds;
mod time;

pub use dataset::{
    BaselineDataset, CovariateDataset, CovariatePurpose, DataType, Dataset, DatasetOrientation,
    GeneratedBaseline, GeneratedBaselineMethod, Source, SourceInterface, Variable,
};
pub use declaration::{
    CombinationMethod, CrossPair, CrossPairMethod, CrossPairScope, EvaluationDeclaration,
    EventDetection, EventDetectionCombination, EventDetectionDataset, EventDetectionParameters,
    Formats, GraphicsShape, OutputFormat, TimeScaleLenience, UnitAlias,
};
pub use features::{
    FeatureAuthority, FeatureGroups, FeatureService, FeatureServiceGroup, Features, Geometry,
    GeometryGroup, GeometryTuple, SpatialMask,
};
pub use metrics::{
    EnsembleAverageType, Metric, MetricParameters, SampleUncertainty, SummaryStatistic,
    SummaryStatisticDimension, SummaryStatisticName,
};
pub use thresholds::{Threshold, ThresholdSource, ThresholdType};
pub use time::{
    AnalysisTimes, DurationUnit, LeadTimeInterval, MonthDay, Season, TimeInterval, TimePools,
    TimeScale, TimeScaleFunction, TimeWindow, INSTANTANEOUS_SECONDS,
};
