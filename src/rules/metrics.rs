//! Metric rules: duplicates, baseline requirements, thresholds for
//! categorical metrics and ensemble averaging.

use std::collections::BTreeMap;

use crate::catalog::{MetricName, SampleDataGroup};
use crate::event::StatusEvent;
use crate::model::{DataType, EvaluationDeclaration, ThresholdType};
use crate::query;

use super::quoted_list;

pub fn validate(declaration: &EvaluationDeclaration) -> Vec<StatusEvent> {
    if declaration.metrics.is_empty() {
        return Vec::new();
    }

    let mut events = Vec::new();

    events.extend(metrics_are_not_duplicated(declaration));
    events.extend(explicit_baseline_is_present(declaration));
    events.extend(categorical_metrics_have_thresholds(declaration));
    events.extend(timing_metrics_have_single_valued_forecasts(declaration));
    events.extend(ensemble_average_is_unambiguous(declaration));

    events
}

fn metrics_are_not_duplicated(declaration: &EvaluationDeclaration) -> Vec<StatusEvent> {
    let mut counts: BTreeMap<MetricName, usize> = BTreeMap::new();
    for metric in &declaration.metrics {
        *counts.entry(metric.name).or_insert(0) += 1;
    }

    let duplicates: Vec<MetricName> = counts
        .iter()
        .filter(|(_, count)| **count > 1)
        .map(|(name, _)| *name)
        .collect();

    if !duplicates.is_empty() {
        return vec![StatusEvent::warn(format!(
            "The declaration contains metrics that are declared more than once: {}. Each \
             declaration will be computed separately, which is only useful when the parameters \
             differ. Please check the 'metrics' declaration.",
            quoted_list(&duplicates)
        ))];
    }

    Vec::new()
}

fn explicit_baseline_is_present(declaration: &EvaluationDeclaration) -> Vec<StatusEvent> {
    if query::has_baseline(declaration) {
        return Vec::new();
    }

    let demanding: Vec<MetricName> = declaration
        .metrics
        .iter()
        .map(|metric| metric.name)
        .filter(|name| name.requires_explicit_baseline())
        .collect();

    if !demanding.is_empty() {
        return vec![StatusEvent::error(format!(
            "The declaration contains metrics that require an explicit 'baseline' dataset \
             ({}), but the declaration does not contain a 'baseline'. Please declare a \
             'baseline' or remove the metrics and try again.",
            quoted_list(&demanding)
        ))];
    }

    Vec::new()
}

fn categorical_metrics_have_thresholds(declaration: &EvaluationDeclaration) -> Vec<StatusEvent> {
    let categorical: Vec<MetricName> = declaration
        .metrics
        .iter()
        .map(|metric| metric.name)
        .filter(MetricName::is_categorical)
        .collect();

    if categorical.is_empty() {
        return Vec::new();
    }

    let mut events = Vec::new();

    let has_event_thresholds = query::has_thresholds_of_type(declaration, ThresholdType::Value)
        || query::has_thresholds_of_type(declaration, ThresholdType::Probability);

    if !has_event_thresholds {
        events.push(StatusEvent::error(format!(
            "The declaration contains categorical metrics ({}), which require either \
             'thresholds' or 'probability_thresholds' to define the events, but neither was \
             declared. Please declare the event thresholds and try again.",
            quoted_list(&categorical)
        )));
    }

    let has_classifiers =
        query::has_thresholds_of_type(declaration, ThresholdType::ProbabilityClassifier);

    if query::has_data_type(declaration, DataType::EnsembleForecasts).is_true() && !has_classifiers
    {
        events.push(StatusEvent::warn(format!(
            "The declaration contains categorical metrics ({}) for ensemble forecasts without \
             any 'classifier_thresholds'. The metrics will be computed from the ensemble \
             average only. Please declare 'classifier_thresholds' to classify forecast \
             probabilities.",
            quoted_list(&categorical)
        )));
    }

    events
}

fn timing_metrics_have_single_valued_forecasts(
    declaration: &EvaluationDeclaration,
) -> Vec<StatusEvent> {
    let timing: Vec<MetricName> = declaration
        .metrics
        .iter()
        .map(|metric| metric.name)
        .filter(|name| name.is_in_group(SampleDataGroup::SingleValuedTimeSeries))
        .collect();

    if timing.is_empty() {
        return Vec::new();
    }

    let predicted = declaration
        .right
        .as_ref()
        .and_then(|dataset| dataset.data_type);

    if let Some(declared) = predicted {
        if declared != DataType::SingleValuedForecasts {
            return vec![StatusEvent::error(format!(
                "The declaration contains timing metrics ({}), which require the 'predicted' \
                 dataset to have a data 'type' of 'single valued forecasts', but found \
                 '{declared}'. Please correct the data 'type' or remove the timing metrics and \
                 try again.",
                quoted_list(&timing)
            ))];
        }
    }

    Vec::new()
}

fn ensemble_average_is_unambiguous(declaration: &EvaluationDeclaration) -> Vec<StatusEvent> {
    let global = match declaration.ensemble_average {
        Some(global) => global,
        None => return Vec::new(),
    };

    let conflicting: Vec<MetricName> = declaration
        .metrics
        .iter()
        .filter(|metric| {
            metric
                .parameters
                .as_ref()
                .and_then(|parameters| parameters.ensemble_average)
                .is_some_and(|per_metric| per_metric != global)
        })
        .map(|metric| metric.name)
        .collect();

    if !conflicting.is_empty() {
        return vec![StatusEvent::warn(format!(
            "The declaration contains metrics whose 'ensemble_average' differs from the \
             evaluation-level 'ensemble_average' of '{global}': {}. The per-metric declaration \
             will be used. Please remove one of the two declarations if this is not intended.",
            quoted_list(&conflicting)
        ))];
    }

    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        BaselineDataset, DataType, Dataset, EnsembleAverageType, Metric, MetricParameters,
        Threshold,
    };

    fn with_metrics(metrics: Vec<Metric>) -> EvaluationDeclaration {
        EvaluationDeclaration {
            left: Some(Dataset {
                data_type: Some(DataType::Observations),
                ..Default::default()
            }),
            right: Some(Dataset {
                data_type: Some(DataType::SingleValuedForecasts),
                ..Default::default()
            }),
            metrics,
            ..Default::default()
        }
    }

    #[test]
    fn test_duplicate_metrics_are_a_warning() {
        let declaration = with_metrics(vec![
            Metric::new(MetricName::MeanError),
            Metric::new(MetricName::MeanError),
        ]);

        let events = validate(&declaration);
        assert!(events
            .iter()
            .any(|event| event.is_warn() && event.message.contains("'mean error'")));
    }

    #[test]
    fn test_crpss_requires_an_explicit_baseline() {
        let mut declaration = with_metrics(vec![Metric::new(
            MetricName::ContinuousRankedProbabilitySkillScore,
        )]);
        declaration.right.as_mut().unwrap().data_type = Some(DataType::EnsembleForecasts);

        let events = validate(&declaration);
        assert!(events.iter().any(|event| {
            event.is_error() && event.message.contains("require an explicit 'baseline'")
        }));

        declaration.baseline = Some(BaselineDataset::default());
        let events = validate(&declaration);
        assert!(!events.iter().any(|event| {
            event.message.contains("require an explicit 'baseline'")
        }));
    }

    #[test]
    fn test_categorical_metrics_require_event_thresholds() {
        let declaration = with_metrics(vec![Metric::new(MetricName::ProbabilityOfDetection)]);

        let events = validate(&declaration);
        assert!(events
            .iter()
            .any(|event| event.is_error() && event.message.contains("define the events")));

        let mut with_thresholds = declaration.clone();
        with_thresholds.thresholds =
            vec![Threshold::new(crate::model::ThresholdType::Value, vec![10.0])];
        let events = validate(&with_thresholds);
        assert!(!events.iter().any(|event| event.is_error()));
    }

    #[test]
    fn test_categorical_metrics_on_ensembles_without_classifiers_warn() {
        let mut declaration = with_metrics(vec![Metric::new(MetricName::ProbabilityOfDetection)]);
        declaration.right.as_mut().unwrap().data_type = Some(DataType::EnsembleForecasts);
        declaration.thresholds =
            vec![Threshold::new(crate::model::ThresholdType::Probability, vec![0.9])];

        let events = validate(&declaration);
        assert!(events
            .iter()
            .any(|event| event.is_warn() && event.message.contains("ensemble average only")));
    }

    #[test]
    fn test_timing_metrics_require_single_valued_forecasts() {
        let mut declaration = with_metrics(vec![Metric::new(MetricName::TimeToPeakError)]);
        declaration.right.as_mut().unwrap().data_type = Some(DataType::EnsembleForecasts);

        let events = validate(&declaration);
        assert!(events.iter().any(|event| {
            event.is_error() && event.message.contains("'time to peak error'")
        }));

        declaration.right.as_mut().unwrap().data_type = Some(DataType::SingleValuedForecasts);
        let events = validate(&declaration);
        assert!(!events.iter().any(|event| event.is_error()));

        // An unknown predicted type defers the question to ingest.
        declaration.right.as_mut().unwrap().data_type = None;
        let events = validate(&declaration);
        assert!(!events
            .iter()
            .any(|event| event.message.contains("timing metrics")));
    }

    #[test]
    fn test_conflicting_ensemble_average_is_a_warning() {
        let mut declaration = with_metrics(vec![Metric {
            name: MetricName::ContinuousRankedProbabilityScore,
            parameters: Some(MetricParameters {
                ensemble_average: Some(EnsembleAverageType::Median),
            }),
        }]);
        declaration.right.as_mut().unwrap().data_type = Some(DataType::EnsembleForecasts);
        declaration.ensemble_average = Some(EnsembleAverageType::Mean);

        let events = validate(&declaration);
        assert!(events
            .iter()
            .any(|event| event.is_warn() && event.message.contains("per-metric")));
    }
}
