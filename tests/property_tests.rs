//! Properties of the orchestrator: determinism, family concatenation and
//! the notification contract.

use decl_guard::model::{
    DataType, Dataset, DurationUnit, EvaluationDeclaration, LeadTimeInterval, SampleUncertainty,
    TimePools,
};
use decl_guard::rules;
use decl_guard::{notify, validate_business_logic};
use proptest::prelude::*;

fn data_type_strategy() -> impl Strategy<Value = Option<DataType>> {
    prop_oneof![
        Just(None),
        Just(Some(DataType::Observations)),
        Just(Some(DataType::Analyses)),
        Just(Some(DataType::SingleValuedForecasts)),
        Just(Some(DataType::EnsembleForecasts)),
    ]
}

prop_compose! {
    fn declaration_strategy()(
        left_type in data_type_strategy(),
        right_type in data_type_strategy(),
        has_left in any::<bool>(),
        has_right in any::<bool>(),
        lead_minimum in proptest::option::of(0i64..48),
        lead_maximum in proptest::option::of(0i64..48),
        pool_period in proptest::option::of(1u64..96),
        sample_size in proptest::option::of(1u64..200_000),
        quantile in proptest::option::of(-0.5f64..1.5),
    ) -> EvaluationDeclaration {
        EvaluationDeclaration {
            left: has_left.then(|| Dataset {
                data_type: left_type,
                ..Default::default()
            }),
            right: has_right.then(|| Dataset {
                data_type: right_type,
                ..Default::default()
            }),
            lead_times: lead_minimum.map(|minimum| LeadTimeInterval {
                minimum: Some(minimum),
                maximum: lead_maximum,
                unit: DurationUnit::Hours,
            }),
            lead_time_pools: pool_period.map(|period| TimePools {
                period,
                frequency: None,
                unit: DurationUnit::Hours,
            }),
            sample_uncertainty: sample_size.map(|size| SampleUncertainty {
                sample_size: Some(size),
                quantiles: quantile.into_iter().collect(),
            }),
            ..Default::default()
        }
    }
}

proptest! {
    #[test]
    fn validation_is_deterministic(declaration in declaration_strategy()) {
        let first = validate_business_logic(&declaration, false);
        let second = validate_business_logic(&declaration, false);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn orchestrator_equals_family_concatenation(declaration in declaration_strategy()) {
        let mut expected = Vec::new();
        expected.extend(rules::datasets::validate(&declaration, false));
        expected.extend(rules::covariates::validate(&declaration));
        expected.extend(rules::time::validate(&declaration));
        expected.extend(rules::event_detection::validate(&declaration));
        expected.extend(rules::features::validate(&declaration));
        expected.extend(rules::metrics::validate(&declaration));
        expected.extend(rules::summary_statistics::validate(&declaration));
        expected.extend(rules::thresholds::validate(&declaration));
        expected.extend(rules::sampling::validate(&declaration));
        expected.extend(rules::outputs::validate(&declaration));

        prop_assert_eq!(validate_business_logic(&declaration, false), expected);
    }

    #[test]
    fn notify_fails_exactly_when_errors_exist(declaration in declaration_strategy()) {
        let events = validate_business_logic(&declaration, false);
        let has_errors = events.iter().any(|event| event.is_error());
        prop_assert_eq!(notify(&events).is_err(), has_errors);
    }

    #[test]
    fn omitting_sources_never_adds_findings(declaration in declaration_strategy()) {
        let full = validate_business_logic(&declaration, false);
        let partial = validate_business_logic(&declaration, true);
        // Every finding of the partial pass also appears in the full pass.
        for event in &partial {
            prop_assert!(full.contains(event));
        }
    }
}
