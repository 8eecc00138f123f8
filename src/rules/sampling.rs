//! Sampling uncertainty rules.

use crate::event::StatusEvent;
use crate::model::EvaluationDeclaration;
use crate::query;

/// Resample counts below this floor produce unstable quantiles.
const SAMPLE_SIZE_FLOOR: u64 = 1_000;
/// Resample counts above this ceiling are rejected outright.
const SAMPLE_SIZE_CEILING: u64 = 100_000;

pub fn validate(declaration: &EvaluationDeclaration) -> Vec<StatusEvent> {
    let sampling = match &declaration.sample_uncertainty {
        Some(sampling) => sampling,
        None => return Vec::new(),
    };

    let mut events = Vec::new();

    events.push(StatusEvent::warn(
        "The declaration contains 'sample_uncertainty', which resamples every statistic and \
         can increase the evaluation runtime considerably. Please remove the \
         'sample_uncertainty' if the confidence intervals are not needed.",
    ));

    if sampling.quantiles.is_empty() {
        events.push(StatusEvent::warn(
            "The 'sample_uncertainty' does not declare any 'quantiles'. Default quantiles will \
             be used. Please declare the 'quantiles' explicitly if the defaults are \
             unsuitable.",
        ));
    }

    let out_of_range: Vec<String> = sampling
        .quantiles
        .iter()
        .filter(|quantile| **quantile <= 0.0 || **quantile >= 1.0)
        .map(|quantile| quantile.to_string())
        .collect();
    if !out_of_range.is_empty() {
        events.push(StatusEvent::error(format!(
            "The 'sample_uncertainty' declares 'quantiles' outside the open interval (0, 1): \
             {}. Please declare quantiles strictly between 0 and 1 and try again.",
            out_of_range.join(", ")
        )));
    }

    if let Some(sample_size) = sampling.sample_size {
        if sample_size > SAMPLE_SIZE_CEILING {
            events.push(StatusEvent::error(format!(
                "The 'sample_uncertainty' declares a 'sample_size' of {sample_size}, which is \
                 larger than the maximum of {SAMPLE_SIZE_CEILING}. Please declare a smaller \
                 'sample_size' and try again."
            )));
        } else if sample_size < SAMPLE_SIZE_FLOOR {
            events.push(StatusEvent::warn(format!(
                "The 'sample_uncertainty' declares a 'sample_size' of {sample_size}, which is \
                 smaller than the recommended minimum of {SAMPLE_SIZE_FLOOR} and may produce \
                 unstable confidence intervals. Please consider a larger 'sample_size'."
            )));
        }
    }

    let fuzzy_across = declaration
        .cross_pair
        .as_ref()
        .is_some_and(|cross_pair| cross_pair.is_fuzzy_across_features());

    if query::has_baseline(declaration) && !fuzzy_across {
        events.push(StatusEvent::warn(
            "The declaration contains 'sample_uncertainty' and a 'baseline' without 'cross_pair' \
             declared as 'fuzzy' across features. The predicted and baseline statistics will be \
             resampled from different pairs, which weakens the comparison. Please declare \
             'cross_pair' with a 'method' of 'fuzzy' and a scope across features.",
        ));

        if query::has_feature_groups(declaration) {
            events.push(StatusEvent::warn(
                "The declaration contains 'sample_uncertainty', feature groups and a 'baseline' \
                 without fuzzy cross-pairing across features. The group statistics will be \
                 resampled from different pairs per member. Please declare 'cross_pair' with a \
                 'method' of 'fuzzy' and a scope across features.",
            ));
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        BaselineDataset, CrossPair, CrossPairMethod, CrossPairScope, SampleUncertainty,
    };

    fn with_sampling(sampling: SampleUncertainty) -> EvaluationDeclaration {
        EvaluationDeclaration {
            sample_uncertainty: Some(sampling),
            ..Default::default()
        }
    }

    #[test]
    fn test_presence_alone_is_a_warning() {
        let declaration = with_sampling(SampleUncertainty {
            sample_size: Some(5_000),
            quantiles: vec![0.05, 0.95],
        });

        let events = validate(&declaration);
        assert_eq!(events.len(), 1);
        assert!(events[0].is_warn());
        assert!(events[0].message.contains("runtime"));
    }

    #[test]
    fn test_sample_size_above_ceiling_is_an_error() {
        let declaration = with_sampling(SampleUncertainty {
            sample_size: Some(200_000),
            quantiles: vec![0.05, 0.95],
        });

        let events = validate(&declaration);
        assert!(events
            .iter()
            .any(|event| event.is_warn() && event.message.contains("runtime")));
        assert!(events
            .iter()
            .any(|event| event.is_error() && event.message.contains("100000")));
    }

    #[test]
    fn test_sample_size_below_floor_is_a_warning() {
        let declaration = with_sampling(SampleUncertainty {
            sample_size: Some(500),
            quantiles: vec![0.05, 0.95],
        });

        let events = validate(&declaration);
        assert!(events
            .iter()
            .any(|event| event.is_warn() && event.message.contains("1000")));
        assert!(!events.iter().any(|event| event.is_error()));
    }

    #[test]
    fn test_quantiles_must_be_in_the_open_unit_interval() {
        let declaration = with_sampling(SampleUncertainty {
            sample_size: Some(5_000),
            quantiles: vec![0.0, 0.5, 1.0],
        });

        let events = validate(&declaration);
        assert!(events
            .iter()
            .any(|event| event.is_error() && event.message.contains("open interval")));
    }

    #[test]
    fn test_baseline_without_fuzzy_cross_pairing_is_a_warning() {
        let mut declaration = with_sampling(SampleUncertainty {
            sample_size: Some(5_000),
            quantiles: vec![0.05, 0.95],
        });
        declaration.baseline = Some(BaselineDataset::default());

        let events = validate(&declaration);
        assert!(events
            .iter()
            .any(|event| event.is_warn() && event.message.contains("'cross_pair'")));

        declaration.cross_pair = Some(CrossPair {
            method: CrossPairMethod::Fuzzy,
            scope: CrossPairScope::AcrossFeatures,
        });
        let events = validate(&declaration);
        assert!(!events
            .iter()
            .any(|event| event.message.contains("'cross_pair'")));
    }
}
