//! Summary statistic rules.

use crate::catalog::StatisticGroup;
use crate::event::StatusEvent;
use crate::model::{EvaluationDeclaration, SummaryStatisticDimension, SummaryStatisticName};
use crate::query;

pub fn validate(declaration: &EvaluationDeclaration) -> Vec<StatusEvent> {
    if declaration.summary_statistics.is_empty() {
        return Vec::new();
    }

    let mut events = Vec::new();

    events.extend(dimensions_have_members(declaration));
    events.extend(quantiles_include_the_median_for_diagrams(declaration));

    events
}

fn has_dimension(
    declaration: &EvaluationDeclaration,
    dimension: SummaryStatisticDimension,
) -> bool {
    declaration
        .summary_statistics
        .iter()
        .any(|statistic| statistic.dimensions.contains(&dimension))
}

fn dimensions_have_members(declaration: &EvaluationDeclaration) -> Vec<StatusEvent> {
    let mut events = Vec::new();

    if has_dimension(declaration, SummaryStatisticDimension::FeatureGroup) {
        let multi_member = declaration
            .feature_groups
            .as_ref()
            .is_some_and(|groups| groups.groups.iter().any(|group| group.geometries.len() > 1))
            || query::has_pooled_feature_service(declaration);

        if !multi_member {
            events.push(StatusEvent::error(
                "The 'summary_statistics' declare a dimension of 'feature_group', but the \
                 declaration does not contain any feature group with more than one member to \
                 summarize across. Please declare multi-member 'feature_groups' and try again.",
            ));
        }
    }

    if has_dimension(declaration, SummaryStatisticDimension::ValidDatePools) {
        let has_pools =
            declaration.valid_date_pools.is_some() || declaration.event_detection.is_some();
        if !has_pools {
            events.push(StatusEvent::error(
                "The 'summary_statistics' declare a dimension of 'valid_date_pools', but the \
                 declaration does not contain 'valid_date_pools' or 'event_detection' to \
                 generate them. Please declare the pools and try again.",
            ));
        }
    }

    if has_dimension(declaration, SummaryStatisticDimension::Features)
        && query::features(declaration).is_empty()
        && declaration.feature_service.is_none()
    {
        events.push(StatusEvent::warn(
            "The 'summary_statistics' declare a dimension of 'features', but the declaration \
             does not contain any features. The statistics will summarize whatever features \
             are discovered from the data. Please declare the 'features' to make the summary \
             explicit.",
        ));
    }

    events
}

fn quantiles_include_the_median_for_diagrams(
    declaration: &EvaluationDeclaration,
) -> Vec<StatusEvent> {
    let quantiles: Vec<_> = declaration
        .summary_statistics
        .iter()
        .filter(|statistic| statistic.statistic == SummaryStatisticName::Quantile)
        .collect();

    if quantiles.is_empty() {
        return Vec::new();
    }

    let has_diagram_metrics = declaration
        .metrics
        .iter()
        .any(|metric| metric.name.statistic_group() == StatisticGroup::Diagram);
    let has_median = quantiles
        .iter()
        .any(|statistic| statistic.probability == Some(0.5));

    if has_diagram_metrics && !has_median {
        return vec![StatusEvent::warn(
            "The 'summary_statistics' declare quantiles for diagram metrics without a \
             'probability' of 0.5. Diagram quantiles cannot be plotted without the median. \
             Please add a quantile with a 'probability' of 0.5.",
        )];
    }

    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MetricName;
    use crate::model::{
        FeatureGroups, GeometryGroup, GeometryTuple, Metric, SummaryStatistic, TimePools,
    };

    fn statistic(
        name: SummaryStatisticName,
        dimensions: Vec<SummaryStatisticDimension>,
    ) -> SummaryStatistic {
        SummaryStatistic {
            statistic: name,
            dimensions,
            probability: None,
        }
    }

    #[test]
    fn test_feature_group_dimension_requires_multi_member_groups() {
        let mut declaration = EvaluationDeclaration {
            summary_statistics: vec![statistic(
                SummaryStatisticName::Mean,
                vec![SummaryStatisticDimension::FeatureGroup],
            )],
            ..Default::default()
        };

        let events = validate(&declaration);
        assert!(events
            .iter()
            .any(|event| event.is_error() && event.message.contains("'feature_group'")));

        declaration.feature_groups = Some(FeatureGroups {
            groups: vec![GeometryGroup {
                name: "basin".to_string(),
                geometries: vec![GeometryTuple::of("DRRC2"), GeometryTuple::of("DOLC2")],
            }],
        });
        assert!(validate(&declaration).is_empty());
    }

    #[test]
    fn test_valid_date_pool_dimension_requires_pools() {
        let mut declaration = EvaluationDeclaration {
            summary_statistics: vec![statistic(
                SummaryStatisticName::Median,
                vec![SummaryStatisticDimension::ValidDatePools],
            )],
            ..Default::default()
        };

        let events = validate(&declaration);
        assert!(events
            .iter()
            .any(|event| event.is_error() && event.message.contains("'valid_date_pools'")));

        declaration.valid_date_pools = Some(TimePools {
            period: 30,
            frequency: None,
            unit: crate::model::DurationUnit::Days,
        });
        assert!(validate(&declaration).is_empty());
    }

    #[test]
    fn test_feature_dimension_without_features_is_a_warning() {
        let declaration = EvaluationDeclaration {
            summary_statistics: vec![statistic(
                SummaryStatisticName::Mean,
                vec![SummaryStatisticDimension::Features],
            )],
            ..Default::default()
        };

        let events = validate(&declaration);
        assert!(events
            .iter()
            .any(|event| event.is_warn() && event.message.contains("'features'")));
    }

    #[test]
    fn test_diagram_quantiles_need_the_median() {
        let mut declaration = EvaluationDeclaration {
            metrics: vec![Metric::new(MetricName::RankHistogram)],
            summary_statistics: vec![SummaryStatistic {
                statistic: SummaryStatisticName::Quantile,
                dimensions: vec![SummaryStatisticDimension::Features],
                probability: Some(0.9),
            }],
            features: Some(crate::model::Features {
                geometries: vec![GeometryTuple::of("DRRC2")],
            }),
            ..Default::default()
        };

        let events = validate(&declaration);
        assert!(events
            .iter()
            .any(|event| event.is_warn() && event.message.contains("0.5")));

        declaration.summary_statistics.push(SummaryStatistic {
            statistic: SummaryStatisticName::Quantile,
            dimensions: vec![SummaryStatisticDimension::Features],
            probability: Some(0.5),
        });
        assert!(!validate(&declaration)
            .iter()
            .any(|event| event.message.contains("0.5")));
    }
}
