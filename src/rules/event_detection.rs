//! Event detection rules.
//!
//! Event detection derives pools from the data itself, so it conflicts with
//! most explicit pooling declarations and only consumes observation-like
//! time series.

use crate::event::StatusEvent;
use crate::model::{
    CombinationMethod, CovariatePurpose, EvaluationDeclaration, EventDetectionDataset,
};
use crate::query;

pub fn validate(declaration: &EvaluationDeclaration) -> Vec<StatusEvent> {
    let detection = match &declaration.event_detection {
        Some(detection) => detection,
        None => return Vec::new(),
    };

    let mut events = Vec::new();

    events.extend(detection_datasets_are_not_forecasts(declaration, detection));
    events.extend(detection_excludes_other_pooling(declaration));
    events.extend(detection_excludes_feature_groups(declaration));
    events.extend(named_datasets_exist(declaration, detection));
    events.extend(covariates_have_detection_purpose(declaration, detection));
    events.extend(parameters_are_complete(detection));
    events.extend(combination_is_coherent(detection));

    events
}

fn detection_datasets_are_not_forecasts(
    declaration: &EvaluationDeclaration,
    detection: &crate::model::EventDetection,
) -> Vec<StatusEvent> {
    let mut events = Vec::new();

    for named in &detection.datasets {
        let orientation = match named {
            EventDetectionDataset::Observed => crate::model::DatasetOrientation::Left,
            EventDetectionDataset::Predicted => crate::model::DatasetOrientation::Right,
            EventDetectionDataset::Baseline => crate::model::DatasetOrientation::Baseline,
            EventDetectionDataset::Covariates => continue,
        };

        let is_forecast = query::dataset_for(declaration, orientation)
            .and_then(|dataset| dataset.data_type)
            .is_some_and(|data_type| data_type.is_forecast());

        if is_forecast {
            events.push(StatusEvent::error(format!(
                "The 'event_detection' names the '{named}' dataset, which has a forecast data \
                 'type'. Events cannot be detected from forecasts. Please remove the '{named}' \
                 dataset from the 'event_detection' and try again."
            )));
        }
    }

    events
}

fn detection_excludes_other_pooling(declaration: &EvaluationDeclaration) -> Vec<StatusEvent> {
    let mut events = Vec::new();

    if declaration.valid_date_pools.is_some() {
        events.push(StatusEvent::error(
            "The declaration contains both 'event_detection' and 'valid_date_pools', which both \
             generate pools over the valid dates and cannot be combined. Please remove one of \
             the two and try again.",
        ));
    }
    if !declaration.time_pools.is_empty() {
        events.push(StatusEvent::warn(
            "The declaration contains both 'event_detection' and explicit 'time_pools'. The \
             detected events will be combined with the explicit pools, which may not be \
             intended. Please check the pooling declaration.",
        ));
    }
    if declaration.lead_time_pools.is_some() {
        events.push(StatusEvent::warn(
            "The declaration contains both 'event_detection' and 'lead_time_pools'. The \
             detected events will be combined with the lead-time pools, which may not be \
             intended. Please check the pooling declaration.",
        ));
    }
    if declaration.reference_date_pools.is_some() {
        events.push(StatusEvent::warn(
            "The declaration contains both 'event_detection' and 'reference_date_pools'. The \
             detected events will be combined with the reference-date pools, which may not be \
             intended. Please check the pooling declaration.",
        ));
    }

    events
}

fn detection_excludes_feature_groups(declaration: &EvaluationDeclaration) -> Vec<StatusEvent> {
    if query::has_feature_groups(declaration) {
        return vec![StatusEvent::error(
            "The declaration contains both 'event_detection' and feature groups. Events are \
             detected per feature and cannot be pooled across the members of a feature group. \
             Please remove the 'event_detection' or the feature groups and try again.",
        )];
    }

    Vec::new()
}

fn named_datasets_exist(
    declaration: &EvaluationDeclaration,
    detection: &crate::model::EventDetection,
) -> Vec<StatusEvent> {
    let names_baseline = detection
        .datasets
        .contains(&EventDetectionDataset::Baseline);

    if names_baseline && !query::has_baseline(declaration) {
        return vec![StatusEvent::error(
            "The 'event_detection' names the 'baseline' dataset, but the declaration does not \
             contain a 'baseline'. Please declare a 'baseline' or remove it from the \
             'event_detection' and try again.",
        )];
    }

    Vec::new()
}

fn covariates_have_detection_purpose(
    declaration: &EvaluationDeclaration,
    detection: &crate::model::EventDetection,
) -> Vec<StatusEvent> {
    if !detection
        .datasets
        .contains(&EventDetectionDataset::Covariates)
    {
        return Vec::new();
    }

    let explicit = declaration
        .covariates
        .iter()
        .any(|covariate| covariate.purpose == Some(CovariatePurpose::Detect));
    // A covariate without a purpose and without filter bounds is implicitly
    // available for detection.
    let implicit = declaration
        .covariates
        .iter()
        .any(|covariate| covariate.purpose.is_none() && !covariate.has_filter_bounds());

    if !explicit && !implicit {
        return vec![StatusEvent::error(
            "The 'event_detection' names the 'covariates', but no covariate has a 'purpose' of \
             'detect' or qualifies implicitly. Please declare a covariate with a 'purpose' of \
             'detect' and try again.",
        )];
    }
    if !explicit && implicit {
        return vec![StatusEvent::warn(
            "The 'event_detection' names the 'covariates' and only covariates without an \
             explicit 'purpose' qualify. Those covariates will be used for detection. Please \
             declare a 'purpose' of 'detect' to make this explicit.",
        )];
    }

    Vec::new()
}

fn parameters_are_complete(detection: &crate::model::EventDetection) -> Vec<StatusEvent> {
    let mut events = Vec::new();

    let parameters = match &detection.parameters {
        Some(parameters) => parameters,
        None => return events,
    };

    if parameters.window_size.is_none() {
        events.push(StatusEvent::warn(
            "The 'event_detection' parameters do not declare a 'window_size'. A default will be \
             estimated from the evaluation time scale, which may not be appropriate. Please \
             declare a 'window_size' if the default is unsuitable.",
        ));
    }
    if parameters.half_life.is_none() {
        events.push(StatusEvent::warn(
            "The 'event_detection' parameters do not declare a 'half_life'. A default will be \
             estimated from the evaluation time scale, which may not be appropriate. Please \
             declare a 'half_life' if the default is unsuitable.",
        ));
    }

    events
}

fn combination_is_coherent(detection: &crate::model::EventDetection) -> Vec<StatusEvent> {
    let combination = match detection
        .parameters
        .as_ref()
        .and_then(|parameters| parameters.combination.as_ref())
    {
        Some(combination) => combination,
        None => return Vec::new(),
    };

    let mut events = Vec::new();

    if combination.method != CombinationMethod::Intersection && combination.aggregation.is_some() {
        events.push(StatusEvent::error(format!(
            "The 'event_detection' declares a combination 'method' of '{}' together with an \
             'aggregation', but an 'aggregation' is only applicable to an 'intersection'. \
             Please remove the 'aggregation' or use an 'intersection' and try again.",
            combination.method
        )));
    }

    if combination.method != CombinationMethod::Union && detection.datasets.len() <= 1 {
        events.push(StatusEvent::warn(format!(
            "The 'event_detection' declares a combination 'method' of '{}' for a single \
             dataset, which has no effect. Please remove the combination or add datasets.",
            combination.method
        )));
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        CovariateDataset, DataType, Dataset, EventDetection, EventDetectionCombination,
        EventDetectionParameters, TimePools, Variable,
    };

    fn detection_for(datasets: Vec<EventDetectionDataset>) -> EvaluationDeclaration {
        EvaluationDeclaration {
            left: Some(Dataset {
                data_type: Some(DataType::Observations),
                ..Default::default()
            }),
            right: Some(Dataset {
                data_type: Some(DataType::SingleValuedForecasts),
                ..Default::default()
            }),
            event_detection: Some(EventDetection {
                datasets,
                parameters: None,
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_forecast_dataset_cannot_feed_detection() {
        let declaration = detection_for(vec![EventDetectionDataset::Predicted]);
        let events = validate(&declaration);
        assert!(events.iter().any(|event| {
            event.is_error() && event.message.contains("cannot be detected from forecasts")
        }));
    }

    #[test]
    fn test_detection_conflicts_with_valid_date_pools() {
        let mut declaration = detection_for(vec![EventDetectionDataset::Observed]);
        declaration.valid_date_pools = Some(TimePools {
            period: 1,
            frequency: None,
            unit: Default::default(),
        });

        let events = validate(&declaration);
        assert!(events
            .iter()
            .any(|event| event.is_error() && event.message.contains("'valid_date_pools'")));
    }

    #[test]
    fn test_missing_baseline_named_by_detection_is_an_error() {
        let declaration = detection_for(vec![EventDetectionDataset::Baseline]);
        let events = validate(&declaration);
        assert!(events
            .iter()
            .any(|event| event.is_error() && event.message.contains("'baseline'")));
    }

    #[test]
    fn test_covariate_detection_purpose() {
        let mut declaration = detection_for(vec![EventDetectionDataset::Covariates]);
        declaration.covariates = vec![CovariateDataset {
            dataset: Dataset {
                variable: Some(Variable::new("precip")),
                ..Default::default()
            },
            minimum: Some(1.0),
            purpose: None,
            ..Default::default()
        }];

        let events = validate(&declaration);
        assert!(events.iter().any(|event| {
            event.is_error() && event.message.contains("'purpose' of 'detect'")
        }));

        declaration.covariates[0].minimum = None;
        let events = validate(&declaration);
        assert!(events.iter().any(|event| {
            event.is_warn() && event.message.contains("without an explicit 'purpose'")
        }));
    }

    #[test]
    fn test_union_with_aggregation_is_an_error() {
        let mut declaration = detection_for(vec![EventDetectionDataset::Observed]);
        declaration.event_detection.as_mut().unwrap().parameters =
            Some(EventDetectionParameters {
                window_size: Some(12),
                half_life: Some(6),
                combination: Some(EventDetectionCombination {
                    method: CombinationMethod::Union,
                    aggregation: Some(crate::model::TimeScaleFunction::Mean),
                }),
            });

        let events = validate(&declaration);
        assert!(events.iter().any(|event| {
            event.is_error() && event.message.contains("only applicable to an 'intersection'")
        }));
    }

    #[test]
    fn test_missing_tuning_parameters_are_warnings() {
        let mut declaration = detection_for(vec![EventDetectionDataset::Observed]);
        declaration.event_detection.as_mut().unwrap().parameters =
            Some(EventDetectionParameters::default());

        let events = validate(&declaration);
        assert!(events
            .iter()
            .any(|event| event.is_warn() && event.message.contains("'window_size'")));
        assert!(events
            .iter()
            .any(|event| event.is_warn() && event.message.contains("'half_life'")));
    }
}
