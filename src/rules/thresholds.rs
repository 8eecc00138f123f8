//! Threshold rules: units and baseline-oriented feature correlation.

use crate::event::StatusEvent;
use crate::model::{DatasetOrientation, EvaluationDeclaration, ThresholdType};
use crate::query;

use super::quoted_list;

/// Missing baseline features are reported up to this many names.
const MISSING_FEATURE_LIMIT: usize = 10;

pub fn validate(declaration: &EvaluationDeclaration) -> Vec<StatusEvent> {
    let mut events = Vec::new();

    events.extend(value_thresholds_declare_a_unit(declaration));
    events.extend(baseline_orientation_has_a_baseline(declaration));
    events.extend(baseline_oriented_sources_have_baseline_features(declaration));

    events
}

fn value_thresholds_declare_a_unit(declaration: &EvaluationDeclaration) -> Vec<StatusEvent> {
    let unitless = declaration
        .thresholds
        .iter()
        .filter(|threshold| threshold.threshold_type == ThresholdType::Value)
        .filter(|threshold| threshold.unit.is_none())
        .count();

    if unitless == 0 {
        return Vec::new();
    }

    match &declaration.unit {
        Some(unit) => vec![StatusEvent::warn(format!(
            "The declaration contains {unitless} value threshold(s) without a declared 'unit'. \
             The evaluation 'unit' of '{unit}' will be assumed. Please declare the threshold \
             'unit' explicitly if that is not intended."
        ))],
        None => vec![StatusEvent::warn(format!(
            "The declaration contains {unitless} value threshold(s) without a declared 'unit' \
             and no evaluation 'unit' to fall back on. The unit will be inferred from the data, \
             which may be wrong. Please declare the threshold 'unit' explicitly."
        ))],
    }
}

fn baseline_orientation_has_a_baseline(declaration: &EvaluationDeclaration) -> Vec<StatusEvent> {
    if query::has_baseline(declaration) {
        return Vec::new();
    }

    let in_band = declaration
        .thresholds
        .iter()
        .any(|threshold| threshold.feature_name_from == DatasetOrientation::Baseline);
    let from_sources = declaration
        .threshold_sources
        .iter()
        .any(|source| source.feature_name_from == DatasetOrientation::Baseline);

    if in_band || from_sources {
        return vec![StatusEvent::error(
            "The declaration contains thresholds whose 'feature_name_from' is 'baseline', but \
             the declaration does not contain a 'baseline' dataset. Please declare a 'baseline' \
             or correlate the thresholds with another orientation and try again.",
        )];
    }

    Vec::new()
}

fn baseline_oriented_sources_have_baseline_features(
    declaration: &EvaluationDeclaration,
) -> Vec<StatusEvent> {
    let baseline_oriented = declaration
        .threshold_sources
        .iter()
        .any(|source| source.feature_name_from == DatasetOrientation::Baseline);

    if !baseline_oriented || !query::has_baseline(declaration) {
        return Vec::new();
    }

    let tuples = query::features(declaration);
    if tuples.is_empty() {
        return Vec::new();
    }

    let missing: Vec<&str> = tuples
        .iter()
        .filter(|tuple| !tuple.has_baseline())
        .map(|tuple| tuple.display_name())
        .collect();

    if !missing.is_empty() {
        let sample = quoted_list(missing.iter().take(MISSING_FEATURE_LIMIT));
        return vec![StatusEvent::error(format!(
            "The declaration contains a threshold source whose 'feature_name_from' is \
             'baseline', but {} feature tuple(s) have no 'baseline' feature, including: \
             {sample}. Please declare a 'baseline' feature for every tuple and try again.",
            missing.len()
        ))];
    }

    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        BaselineDataset, Features, Geometry, GeometryTuple, Threshold, ThresholdSource,
    };

    #[test]
    fn test_unitless_value_thresholds_are_a_warning() {
        let declaration = EvaluationDeclaration {
            thresholds: vec![Threshold::new(ThresholdType::Value, vec![10.0])],
            ..Default::default()
        };

        let events = validate(&declaration);
        assert!(events
            .iter()
            .any(|event| event.is_warn() && event.message.contains("without a declared 'unit'")));

        // An evaluation unit softens the message but the warning remains.
        let mut with_unit = declaration.clone();
        with_unit.unit = Some("m3/s".to_string());
        let events = validate(&with_unit);
        assert!(events
            .iter()
            .any(|event| event.is_warn() && event.message.contains("'m3/s' will be assumed")));
        assert!(!events.iter().any(|event| event.is_error()));
    }

    #[test]
    fn test_baseline_orientation_without_baseline_is_an_error() {
        let declaration = EvaluationDeclaration {
            threshold_sources: vec![ThresholdSource {
                uri: Some("https://thresholds.example.gov/".to_string()),
                feature_name_from: DatasetOrientation::Baseline,
            }],
            ..Default::default()
        };

        let events = validate(&declaration);
        assert!(events
            .iter()
            .any(|event| event.is_error() && event.message.contains("'feature_name_from'")));
    }

    #[test]
    fn test_baseline_oriented_source_reports_missing_features() {
        let declaration = EvaluationDeclaration {
            baseline: Some(BaselineDataset::default()),
            threshold_sources: vec![ThresholdSource {
                uri: None,
                feature_name_from: DatasetOrientation::Baseline,
            }],
            features: Some(Features {
                geometries: vec![
                    GeometryTuple {
                        left: Some(Geometry::new("DRRC2")),
                        right: Some(Geometry::new("DRRC2")),
                        baseline: Some(Geometry::new("DRRC2")),
                    },
                    GeometryTuple::of("DOLC2"),
                ],
            }),
            ..Default::default()
        };

        let events = validate(&declaration);
        assert!(events.iter().any(|event| {
            event.is_error()
                && event.message.contains("'DOLC2'")
                && !event.message.contains("'DRRC2'")
        }));
    }
}
