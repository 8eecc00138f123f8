//! Pure read-only queries over a declaration, shared across rule families.
//!
//! Every function here takes the declaration (or one of its parts) by
//! reference and computes an answer without side effects. Rules compose
//! these predicates rather than re-walking the model themselves.

use std::collections::BTreeSet;

use crate::model::{
    DataType, Dataset, DatasetOrientation, EvaluationDeclaration, FeatureAuthority, GeometryTuple,
    MetricParameters, ThresholdType,
};

/// Three-valued answer for questions the declaration may not settle. Strict
/// rules fire only on `False`; `Unknown` defers to the post-ingest pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ternary {
    True,
    False,
    Unknown,
}

impl Ternary {
    pub fn is_true(&self) -> bool {
        *self == Ternary::True
    }

    pub fn is_false(&self) -> bool {
        *self == Ternary::False
    }
}

/// Returns true when a baseline dataset is declared.
pub fn has_baseline(declaration: &EvaluationDeclaration) -> bool {
    declaration.baseline.is_some()
}

/// Returns true when the baseline is generated rather than supplied.
pub fn has_generated_baseline(declaration: &EvaluationDeclaration) -> bool {
    declaration
        .baseline
        .as_ref()
        .is_some_and(|baseline| baseline.generated.is_some())
}

/// Returns true when any feature groups are declared, explicitly or through
/// a pooled feature-service group.
pub fn has_feature_groups(declaration: &EvaluationDeclaration) -> bool {
    let explicit = declaration
        .feature_groups
        .as_ref()
        .is_some_and(|groups| !groups.groups.is_empty());

    explicit || has_pooled_feature_service(declaration)
}

/// Returns true when a feature service declares a pooled group.
pub fn has_pooled_feature_service(declaration: &EvaluationDeclaration) -> bool {
    declaration
        .feature_service
        .as_ref()
        .is_some_and(|service| service.has_pooled_group())
}

/// Returns true when an analysis-duration interval is declared with at least
/// one bound.
pub fn has_analysis_times(declaration: &EvaluationDeclaration) -> bool {
    declaration
        .analysis_times
        .is_some_and(|times| times.minimum.is_some() || times.maximum.is_some())
}

/// The dataset declared for an orientation, if any. Covariates are plural
/// and have no single dataset, so the covariate orientation returns `None`.
pub fn dataset_for(
    declaration: &EvaluationDeclaration,
    orientation: DatasetOrientation,
) -> Option<&Dataset> {
    match orientation {
        DatasetOrientation::Left => declaration.left.as_ref(),
        DatasetOrientation::Right => declaration.right.as_ref(),
        DatasetOrientation::Baseline => declaration
            .baseline
            .as_ref()
            .map(|baseline| &baseline.dataset),
        DatasetOrientation::Covariate => None,
    }
}

/// The primary datasets present in the declaration, in orientation order.
pub fn primary_datasets(
    declaration: &EvaluationDeclaration,
) -> impl Iterator<Item = (DatasetOrientation, &Dataset)> {
    [
        DatasetOrientation::Left,
        DatasetOrientation::Right,
        DatasetOrientation::Baseline,
    ]
    .into_iter()
    .filter_map(|orientation| dataset_for(declaration, orientation).map(|d| (orientation, d)))
}

/// Whether any primary dataset has the prescribed data type. `False` requires
/// both required datasets to be present and every present dataset to declare
/// some other type; an absent dataset leaves the question open until ingest,
/// just like an undeclared type.
pub fn has_data_type(declaration: &EvaluationDeclaration, data_type: DataType) -> Ternary {
    let mut all_known = declaration.left.is_some() && declaration.right.is_some();

    for (_, dataset) in primary_datasets(declaration) {
        match dataset.data_type {
            Some(declared) if declared == data_type => return Ternary::True,
            Some(_) => {}
            None => all_known = false,
        }
    }

    if all_known {
        Ternary::False
    } else {
        Ternary::Unknown
    }
}

/// The declaration keys that imply ensemble forecast data, sorted for stable
/// messaging.
pub fn ensemble_declaration(declaration: &EvaluationDeclaration) -> BTreeSet<String> {
    let mut keys = BTreeSet::new();

    for (orientation, dataset) in primary_datasets(declaration) {
        if dataset.data_type == Some(DataType::EnsembleForecasts) {
            keys.insert(format!("{orientation}.type"));
        }
        if dataset
            .sources
            .iter()
            .filter_map(|source| source.interface)
            .any(|interface| {
                interface.data_types() == [DataType::EnsembleForecasts]
            })
        {
            keys.insert(format!("{orientation}.sources.interface"));
        }
    }

    if declaration.ensemble_average.is_some() {
        keys.insert("ensemble_average".to_string());
    }

    if declaration
        .metrics
        .iter()
        .any(|metric| matches!(metric.parameters, Some(MetricParameters { ensemble_average: Some(_) })))
    {
        keys.insert("metrics.ensemble_average".to_string());
    }

    if has_thresholds_of_type(declaration, ThresholdType::ProbabilityClassifier) {
        keys.insert("classifier_thresholds".to_string());
    }

    keys
}

/// The declaration keys that imply forecast data, sorted for stable messaging.
pub fn forecast_declaration(declaration: &EvaluationDeclaration) -> BTreeSet<String> {
    let mut keys = BTreeSet::new();

    if declaration.reference_dates.is_some() {
        keys.insert("reference_dates".to_string());
    }
    if declaration.reference_date_pools.is_some() {
        keys.insert("reference_date_pools".to_string());
    }
    if declaration.lead_times.is_some() {
        keys.insert("lead_times".to_string());
    }
    if declaration.lead_time_pools.is_some() {
        keys.insert("lead_time_pools".to_string());
    }

    keys.extend(ensemble_declaration(declaration));

    keys
}

/// Returns true when any in-band threshold of the prescribed type exists.
/// Threshold sources supply value thresholds.
pub fn has_thresholds_of_type(
    declaration: &EvaluationDeclaration,
    threshold_type: ThresholdType,
) -> bool {
    let in_band = declaration
        .thresholds
        .iter()
        .any(|threshold| threshold.threshold_type == threshold_type);

    in_band || (threshold_type == ThresholdType::Value && !declaration.threshold_sources.is_empty())
}

/// Every feature tuple declared, whether as a singleton or inside a group.
pub fn features(declaration: &EvaluationDeclaration) -> Vec<&GeometryTuple> {
    let mut tuples = Vec::new();

    if let Some(features) = &declaration.features {
        tuples.extend(features.geometries.iter());
    }
    if let Some(groups) = &declaration.feature_groups {
        for group in &groups.groups {
            tuples.extend(group.geometries.iter());
        }
    }

    tuples
}

/// The declared feature names for one orientation, sorted and deduplicated.
pub fn feature_names_for(
    declaration: &EvaluationDeclaration,
    orientation: DatasetOrientation,
) -> BTreeSet<&str> {
    features(declaration)
        .into_iter()
        .filter_map(|tuple| match orientation {
            DatasetOrientation::Left => tuple.left.as_ref(),
            DatasetOrientation::Right => tuple.right.as_ref(),
            DatasetOrientation::Baseline => tuple.baseline.as_ref(),
            DatasetOrientation::Covariate => None,
        })
        .map(|geometry| geometry.name.as_str())
        .collect()
}

/// Feature tuples missing one of the two required sides.
pub fn sparse_features(declaration: &EvaluationDeclaration) -> Vec<&GeometryTuple> {
    features(declaration)
        .into_iter()
        .filter(|tuple| tuple.is_sparse())
        .collect()
}

/// The feature authorities of a dataset: the explicit declaration when there
/// is one, otherwise the authorities implied by the source interfaces.
pub fn feature_authorities(dataset: &Dataset) -> BTreeSet<FeatureAuthority> {
    if let Some(authority) = dataset.feature_authority {
        return BTreeSet::from([authority]);
    }

    dataset
        .sources
        .iter()
        .filter_map(|source| source.interface)
        .map(|interface| interface.feature_authority())
        .collect()
}

/// Returns true when any dataset source uses a web-service interface.
pub fn has_web_sources(declaration: &EvaluationDeclaration) -> bool {
    primary_datasets(declaration).any(|(_, dataset)| dataset.has_web_sources())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        BaselineDataset, Features, GeneratedBaseline, GeneratedBaselineMethod, Source,
        SourceInterface, Threshold, ThresholdSource,
    };

    fn declaration_with_types(
        left: Option<DataType>,
        right: Option<DataType>,
    ) -> EvaluationDeclaration {
        EvaluationDeclaration {
            left: Some(Dataset {
                data_type: left,
                ..Default::default()
            }),
            right: Some(Dataset {
                data_type: right,
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_has_data_type_three_values() {
        let known = declaration_with_types(
            Some(DataType::Observations),
            Some(DataType::EnsembleForecasts),
        );
        assert!(has_data_type(&known, DataType::EnsembleForecasts).is_true());
        assert!(has_data_type(&known, DataType::Analyses).is_false());

        let partial = declaration_with_types(Some(DataType::Observations), None);
        assert_eq!(
            has_data_type(&partial, DataType::EnsembleForecasts),
            Ternary::Unknown
        );
    }

    #[test]
    fn test_absent_datasets_leave_the_type_question_open() {
        let empty = EvaluationDeclaration::default();
        assert_eq!(
            has_data_type(&empty, DataType::SingleValuedForecasts),
            Ternary::Unknown
        );

        let one_sided = EvaluationDeclaration {
            left: Some(Dataset {
                data_type: Some(DataType::Observations),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(
            has_data_type(&one_sided, DataType::EnsembleForecasts),
            Ternary::Unknown
        );
    }

    #[test]
    fn test_ensemble_declaration_names_keys() {
        let mut declaration = declaration_with_types(
            Some(DataType::Observations),
            Some(DataType::EnsembleForecasts),
        );
        declaration.thresholds = vec![Threshold::new(
            ThresholdType::ProbabilityClassifier,
            vec![0.5],
        )];

        let keys = ensemble_declaration(&declaration);
        assert!(keys.contains("predicted.type"));
        assert!(keys.contains("classifier_thresholds"));
    }

    #[test]
    fn test_threshold_sources_imply_value_thresholds() {
        let declaration = EvaluationDeclaration {
            threshold_sources: vec![ThresholdSource::default()],
            ..Default::default()
        };
        assert!(has_thresholds_of_type(&declaration, ThresholdType::Value));
        assert!(!has_thresholds_of_type(
            &declaration,
            ThresholdType::Probability
        ));
    }

    #[test]
    fn test_feature_collection_spans_groups() {
        let declaration = EvaluationDeclaration {
            features: Some(Features {
                geometries: vec![GeometryTuple::of("DRRC2")],
            }),
            feature_groups: Some(crate::model::FeatureGroups {
                groups: vec![crate::model::GeometryGroup {
                    name: "basin".to_string(),
                    geometries: vec![GeometryTuple::of("DOLC2"), GeometryTuple::of("CREC1")],
                }],
            }),
            ..Default::default()
        };

        assert_eq!(features(&declaration).len(), 3);
        let names = feature_names_for(&declaration, DatasetOrientation::Left);
        assert!(names.contains("DRRC2"));
        assert!(names.contains("CREC1"));
    }

    #[test]
    fn test_feature_authorities_fall_back_to_interfaces() {
        let explicit = Dataset {
            feature_authority: Some(FeatureAuthority::Custom),
            sources: vec![Source {
                uri: None,
                interface: Some(SourceInterface::UsgsNwis),
            }],
            ..Default::default()
        };
        assert_eq!(
            feature_authorities(&explicit),
            BTreeSet::from([FeatureAuthority::Custom])
        );

        let implied = Dataset {
            sources: vec![Source {
                uri: None,
                interface: Some(SourceInterface::UsgsNwis),
            }],
            ..Default::default()
        };
        assert_eq!(
            feature_authorities(&implied),
            BTreeSet::from([FeatureAuthority::UsgsSiteCode])
        );
    }

    #[test]
    fn test_generated_baseline_query() {
        let declaration = EvaluationDeclaration {
            baseline: Some(BaselineDataset {
                generated: Some(GeneratedBaseline {
                    method: GeneratedBaselineMethod::Persistence,
                    minimum_date: None,
                    maximum_date: None,
                }),
                ..Default::default()
            }),
            ..Default::default()
        };

        assert!(has_baseline(&declaration));
        assert!(has_generated_baseline(&declaration));
    }
}
