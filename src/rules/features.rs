//! Geospatial rules: feature declarations, authorities, featureful
//! thresholds and the spatial mask.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::event::StatusEvent;
use crate::model::{DatasetOrientation, EvaluationDeclaration};
use crate::query;

use super::quoted_list;

static WKT_GEOMETRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*(POINT|LINESTRING|POLYGON|MULTIPOINT|MULTILINESTRING|MULTIPOLYGON|GEOMETRYCOLLECTION)\s*\(",
    )
    .unwrap_or_else(|error| panic!("invalid well-known-text pattern: {error}"))
});

pub fn validate(declaration: &EvaluationDeclaration) -> Vec<StatusEvent> {
    let mut events = Vec::new();

    events.extend(features_are_declared_where_required(declaration));
    events.extend(baseline_features_have_a_baseline(declaration));
    events.extend(sparse_features_are_reconcilable(declaration));
    events.extend(featureful_thresholds_match_features(declaration));
    events.extend(spatial_mask_is_recognizable(declaration));

    events
}

fn has_any_feature_declaration(declaration: &EvaluationDeclaration) -> bool {
    !query::features(declaration).is_empty()
        || declaration
            .feature_service
            .as_ref()
            .is_some_and(|service| !service.groups.is_empty() || service.uri.is_some())
}

fn features_are_declared_where_required(
    declaration: &EvaluationDeclaration,
) -> Vec<StatusEvent> {
    if has_any_feature_declaration(declaration) {
        return Vec::new();
    }

    let mut events = Vec::new();
    for (orientation, dataset) in query::primary_datasets(declaration) {
        let demands_features = dataset.has_web_sources()
            || dataset
                .sources
                .iter()
                .filter_map(|source| source.interface)
                .any(|interface| interface.requires_features());

        if demands_features {
            events.push(StatusEvent::error(format!(
                "The '{orientation}' dataset reads from sources that cannot resolve data \
                 without declared geographic features, but the declaration contains no \
                 'features', 'feature_groups' or 'feature_service'. Please declare the features \
                 to evaluate and try again."
            )));
        }
    }

    events
}

fn baseline_features_have_a_baseline(declaration: &EvaluationDeclaration) -> Vec<StatusEvent> {
    if query::has_baseline(declaration) {
        return Vec::new();
    }

    let with_baseline: Vec<&str> = query::features(declaration)
        .into_iter()
        .filter(|tuple| tuple.has_baseline())
        .map(|tuple| tuple.display_name())
        .collect();

    if !with_baseline.is_empty() {
        return vec![StatusEvent::error(format!(
            "The declaration contains feature tuples with a 'baseline' feature ({}), but no \
             'baseline' dataset. Please declare a 'baseline' dataset or remove the baseline \
             features and try again.",
            quoted_list(&with_baseline)
        ))];
    }

    Vec::new()
}

fn sparse_features_are_reconcilable(declaration: &EvaluationDeclaration) -> Vec<StatusEvent> {
    let sparse = query::sparse_features(declaration);
    if sparse.is_empty() {
        return Vec::new();
    }

    let authorities: BTreeSet<_> = query::primary_datasets(declaration)
        .map(|(_, dataset)| query::feature_authorities(dataset))
        .filter(|set| !set.is_empty())
        .collect();

    let authorities_differ = authorities.len() > 1;
    let has_service = declaration.feature_service.is_some();

    if authorities_differ && !has_service {
        let names: Vec<&str> = sparse.iter().map(|tuple| tuple.display_name()).collect();
        return vec![StatusEvent::error(format!(
            "The declaration contains sparse feature tuples ({}) and the datasets use \
             different feature authorities, but no 'feature_service' is declared to correlate \
             the feature names. Please complete the feature tuples or declare a \
             'feature_service' and try again.",
            quoted_list(&names)
        ))];
    }

    Vec::new()
}

fn featureful_thresholds_match_features(
    declaration: &EvaluationDeclaration,
) -> Vec<StatusEvent> {
    let mut events = Vec::new();

    // Nothing to correlate against until features are declared.
    if query::features(declaration).is_empty() {
        return events;
    }

    for orientation in [
        DatasetOrientation::Left,
        DatasetOrientation::Right,
        DatasetOrientation::Baseline,
    ] {
        let featureful: Vec<&str> = declaration
            .thresholds
            .iter()
            .filter(|threshold| threshold.feature_name_from == orientation)
            .filter_map(|threshold| threshold.feature.as_deref())
            .collect();

        if featureful.is_empty() {
            continue;
        }

        let declared = query::feature_names_for(declaration, orientation);
        let missing: Vec<&str> = featureful
            .iter()
            .copied()
            .filter(|name| !declared.contains(name))
            .collect();

        if missing.is_empty() {
            continue;
        }

        let message = format!(
            "The declaration contains thresholds whose 'feature' names are correlated with the \
             '{orientation}' dataset, but {} of the {} named features were not declared for \
             that orientation: {}. Please correlate the thresholds with declared features and \
             try again.",
            missing.len(),
            featureful.len(),
            quoted_list(missing.iter().take(10))
        );

        if missing.len() == featureful.len() {
            events.push(StatusEvent::error(message));
        } else {
            events.push(StatusEvent::warn(message));
        }
    }

    events
}

fn spatial_mask_is_recognizable(declaration: &EvaluationDeclaration) -> Vec<StatusEvent> {
    let mask = match &declaration.spatial_mask {
        Some(mask) => mask,
        None => return Vec::new(),
    };

    if !WKT_GEOMETRY.is_match(&mask.wkt) {
        return vec![StatusEvent::error(format!(
            "The 'spatial_mask' declares a 'wkt' of '{}' that could not be recognized as a \
             geometry. Please declare the mask in well-known text, such as 'POLYGON ((...))', \
             and try again.",
            mask.wkt
        ))];
    }

    Vec::new()
}
