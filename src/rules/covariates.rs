//! Covariate rules: variable naming, filter bounds, feature authorities and
//! rescaling.

use std::collections::{BTreeMap, BTreeSet};

use crate::event::StatusEvent;
use crate::model::{EvaluationDeclaration, FeatureAuthority};
use crate::query;

use super::quoted_list;

pub fn validate(declaration: &EvaluationDeclaration) -> Vec<StatusEvent> {
    if declaration.covariates.is_empty() {
        return Vec::new();
    }

    let mut events = Vec::new();
    events.extend(variables_disambiguate_covariates(declaration));
    events.extend(variable_names_are_unique(declaration));
    events.extend(filter_bounds_are_ordered(declaration));
    events.extend(feature_authorities_match_a_primary(declaration));
    events.extend(rescaling_is_coherent(declaration));
    events
}

fn variables_disambiguate_covariates(declaration: &EvaluationDeclaration) -> Vec<StatusEvent> {
    if declaration.covariates.len() < 2 {
        return Vec::new();
    }

    let unnamed = declaration
        .covariates
        .iter()
        .filter(|covariate| covariate.variable_name().is_none())
        .count();

    if unnamed > 0 {
        return vec![StatusEvent::error(format!(
            "The declaration contains {} covariate datasets, which requires every covariate to \
             declare a 'variable' with a 'name', but {unnamed} covariate(s) did not. Please \
             declare a 'variable' for each covariate and try again.",
            declaration.covariates.len()
        ))];
    }

    Vec::new()
}

fn variable_names_are_unique(declaration: &EvaluationDeclaration) -> Vec<StatusEvent> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for covariate in &declaration.covariates {
        if let Some(name) = covariate.variable_name() {
            *counts.entry(name).or_insert(0) += 1;
        }
    }

    let duplicates: Vec<&str> = counts
        .iter()
        .filter(|(_, count)| **count > 1)
        .map(|(name, _)| *name)
        .collect();

    if !duplicates.is_empty() {
        return vec![StatusEvent::error(format!(
            "The declaration contains covariates whose variable names are not unique: {}. \
             Please declare a distinct 'variable' for each covariate and try again.",
            quoted_list(&duplicates)
        ))];
    }

    Vec::new()
}

fn filter_bounds_are_ordered(declaration: &EvaluationDeclaration) -> Vec<StatusEvent> {
    let mut events = Vec::new();

    for covariate in &declaration.covariates {
        if let (Some(minimum), Some(maximum)) = (covariate.minimum, covariate.maximum) {
            if minimum > maximum {
                let name = covariate.variable_name().unwrap_or("unnamed");
                events.push(StatusEvent::error(format!(
                    "The covariate '{name}' declares a 'minimum' of {minimum} that is larger \
                     than its 'maximum' of {maximum}. Please correct the filter bounds and try \
                     again."
                )));
            }
        }
    }

    events
}

fn feature_authorities_match_a_primary(declaration: &EvaluationDeclaration) -> Vec<StatusEvent> {
    let primary: BTreeSet<FeatureAuthority> = query::primary_datasets(declaration)
        .flat_map(|(_, dataset)| query::feature_authorities(dataset))
        .collect();

    if primary.is_empty() {
        return Vec::new();
    }

    let mut events = Vec::new();
    for covariate in &declaration.covariates {
        let authorities = query::feature_authorities(&covariate.dataset);
        if !authorities.is_empty() && authorities.is_disjoint(&primary) {
            let name = covariate.variable_name().unwrap_or("unnamed");
            events.push(StatusEvent::error(format!(
                "The covariate '{name}' declares a 'feature_authority' of {}, which does not \
                 match the feature authority of any of the 'observed', 'predicted' or \
                 'baseline' datasets ({}). Please align the feature authorities and try again.",
                quoted_list(&authorities),
                quoted_list(&primary)
            )));
        }
    }

    events
}

fn rescaling_is_coherent(declaration: &EvaluationDeclaration) -> Vec<StatusEvent> {
    let mut events = Vec::new();
    let has_evaluation_scale = declaration.time_scale.is_some();

    for covariate in &declaration.covariates {
        let name = covariate.variable_name().unwrap_or("unnamed");

        if covariate.rescale_function.is_some() && !has_evaluation_scale {
            events.push(StatusEvent::error(format!(
                "The covariate '{name}' declares a 'rescale_function', but the declaration does \
                 not contain an evaluation 'time_scale' to rescale to. Please declare the \
                 evaluation 'time_scale' or remove the 'rescale_function' and try again."
            )));
        }

        if covariate.rescale_function.is_none() && has_evaluation_scale {
            events.push(StatusEvent::warn(format!(
                "The covariate '{name}' does not declare a 'rescale_function' and the \
                 declaration contains an evaluation 'time_scale'. The covariate will be \
                 rescaled with the evaluation 'function'. Please declare a 'rescale_function' \
                 if that is not intended."
            )));
        }
    }

    events
}
