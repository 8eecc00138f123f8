//! Dataset rules: presence, sources, declared types, generated baselines and
//! time scales.

use chrono::Duration;
use url::Url;

use crate::event::StatusEvent;
use crate::model::{
    DataType, Dataset, EvaluationDeclaration, GeneratedBaselineMethod, TimeScale,
    TimeScaleFunction,
};
use crate::query;

use super::quoted_list;

/// Days a climatological baseline period must strictly exceed.
const CLIMATOLOGY_MINIMUM_DAYS: i64 = 365;

pub fn validate(declaration: &EvaluationDeclaration, omit_sources: bool) -> Vec<StatusEvent> {
    let mut events = Vec::new();

    if !omit_sources {
        events.extend(datasets_are_present(declaration));
        events.extend(sources_are_present(declaration));
        events.extend(source_interfaces_are_consistent(declaration));
        events.extend(source_uris_are_valid(declaration));
        events.extend(variables_are_declared(declaration));
        events.extend(web_service_dates_are_declared(declaration));
    }

    events.extend(declared_types_are_consistent(declaration));
    events.extend(ensemble_on_one_side_only(declaration));
    events.extend(generated_baseline_is_valid(declaration));
    events.extend(time_scales_are_valid(declaration));

    events
}

/// Every dataset in the declaration, with a display name for messaging.
fn all_datasets(declaration: &EvaluationDeclaration) -> Vec<(String, &Dataset)> {
    let mut datasets = Vec::new();

    if let Some(left) = &declaration.left {
        datasets.push(("observed".to_string(), left));
    }
    if let Some(right) = &declaration.right {
        datasets.push(("predicted".to_string(), right));
    }
    if let Some(baseline) = &declaration.baseline {
        datasets.push(("baseline".to_string(), &baseline.dataset));
    }
    for (index, covariate) in declaration.covariates.iter().enumerate() {
        let name = match covariate.variable_name() {
            Some(variable) => format!("covariate '{variable}'"),
            None => format!("covariate at position {index}"),
        };
        datasets.push((name, &covariate.dataset));
    }

    datasets
}

fn datasets_are_present(declaration: &EvaluationDeclaration) -> Vec<StatusEvent> {
    let mut events = Vec::new();

    if declaration.left.is_none() {
        events.push(StatusEvent::error(
            "The declaration does not contain an 'observed' dataset, which is required. Please \
             add an 'observed' dataset and try again.",
        ));
    }
    if declaration.right.is_none() {
        events.push(StatusEvent::error(
            "The declaration does not contain a 'predicted' dataset, which is required. Please \
             add a 'predicted' dataset and try again.",
        ));
    }

    events
}

fn sources_are_present(declaration: &EvaluationDeclaration) -> Vec<StatusEvent> {
    let mut events = Vec::new();

    for (name, dataset) in all_datasets(declaration) {
        // A generated baseline needs no sources of its own.
        if name == "baseline" && query::has_generated_baseline(declaration) {
            continue;
        }

        if dataset.sources.is_empty() {
            events.push(StatusEvent::error(format!(
                "The '{name}' dataset does not contain any sources. Please declare at least one \
                 source for the '{name}' dataset and try again."
            )));
        }
    }

    events
}

fn source_interfaces_are_consistent(declaration: &EvaluationDeclaration) -> Vec<StatusEvent> {
    let mut events = Vec::new();

    for (name, dataset) in all_datasets(declaration) {
        for source in &dataset.sources {
            let interface = match source.interface {
                Some(interface) => interface,
                None => {
                    let is_web_uri = source
                        .uri
                        .as_deref()
                        .is_some_and(|uri| uri.starts_with("http://") || uri.starts_with("https://"));
                    if is_web_uri {
                        let uri = source.uri.as_deref().unwrap_or_default();
                        events.push(StatusEvent::warn(format!(
                            "The '{name}' dataset contains a web source of '{uri}' without a \
                             declared 'interface'. The interface will be guessed from the URI, \
                             which is unreliable. Please declare the 'interface' explicitly."
                        )));
                    }
                    continue;
                }
            };

            if interface.is_web_service() && dataset.data_type.is_none() {
                let assumed = interface.data_types()[0];
                events.push(StatusEvent::warn(format!(
                    "The '{name}' dataset uses the '{interface}' interface without a declared \
                     data 'type'. A 'type' of '{assumed}' will be assumed. Please declare the \
                     'type' explicitly to avoid surprises."
                )));
            }

            if let Some(declared) = dataset.data_type {
                if !interface.data_types().contains(&declared) {
                    let admissible = quoted_list(interface.data_types().iter());
                    let strict = declared.is_forecast() || interface.is_forecast_only();
                    let message = format!(
                        "The '{name}' dataset declares a data 'type' of '{declared}', but the \
                         source interface '{interface}' supports {admissible}. Please correct \
                         the 'type' or the 'interface' and try again."
                    );
                    if strict {
                        events.push(StatusEvent::error(message));
                    } else {
                        events.push(StatusEvent::warn(message));
                    }
                }
            }
        }
    }

    events
}

fn source_uris_are_valid(declaration: &EvaluationDeclaration) -> Vec<StatusEvent> {
    let mut events = Vec::new();

    for (name, dataset) in all_datasets(declaration) {
        let mut invalid = Vec::new();
        for (position, source) in dataset.sources.iter().enumerate() {
            if let Some(uri) = &source.uri {
                match Url::parse(uri) {
                    Ok(_) => {}
                    // A bare path is a valid local source.
                    Err(url::ParseError::RelativeUrlWithoutBase) => {}
                    Err(_) => invalid.push(format!("'{uri}' at position {position}")),
                }
            }
        }

        if !invalid.is_empty() {
            events.push(StatusEvent::error(format!(
                "The '{name}' dataset contains source URIs that could not be parsed: {}. Please \
                 correct the URIs and try again.",
                invalid.join(", ")
            )));
        }
    }

    events
}

fn variables_are_declared(declaration: &EvaluationDeclaration) -> Vec<StatusEvent> {
    let mut events = Vec::new();

    for (name, dataset) in all_datasets(declaration) {
        if dataset.variable.is_some() {
            continue;
        }

        let demanding: Vec<_> = dataset
            .sources
            .iter()
            .filter_map(|source| source.interface)
            .filter(|interface| interface.requires_variable())
            .collect();

        if !demanding.is_empty() {
            events.push(StatusEvent::error(format!(
                "The '{name}' dataset uses a source interface of {} that requires a declared \
                 'variable', but no 'variable' was declared. Please declare the 'variable' and \
                 try again.",
                quoted_list(demanding)
            )));
        }
    }

    events
}

fn web_service_dates_are_declared(declaration: &EvaluationDeclaration) -> Vec<StatusEvent> {
    let mut events = Vec::new();

    let reference_complete = declaration
        .reference_dates
        .is_some_and(|interval| interval.is_complete());
    let valid_complete = declaration
        .valid_dates
        .is_some_and(|interval| interval.is_complete());

    for (name, dataset) in all_datasets(declaration) {
        if !dataset.has_web_sources() {
            continue;
        }

        match dataset.data_type {
            None => {
                if !reference_complete || !valid_complete {
                    events.push(StatusEvent::error(format!(
                        "The '{name}' dataset reads from web services and has an undeclared \
                         data 'type', which requires both the 'reference_dates' and the \
                         'valid_dates' to declare a 'minimum' and a 'maximum'. Please declare \
                         both intervals fully and try again."
                    )));
                }
            }
            Some(declared) if declared.is_forecast() => {
                if !reference_complete {
                    events.push(StatusEvent::error(format!(
                        "The '{name}' dataset reads forecasts from web services, which requires \
                         the 'reference_dates' to declare a 'minimum' and a 'maximum'. Please \
                         declare the 'reference_dates' fully and try again."
                    )));
                }
            }
            Some(_) => {
                if !valid_complete {
                    events.push(StatusEvent::error(format!(
                        "The '{name}' dataset reads from web services, which requires the \
                         'valid_dates' to declare a 'minimum' and a 'maximum'. Please declare \
                         the 'valid_dates' fully and try again."
                    )));
                }
            }
        }
    }

    events
}

fn declared_types_are_consistent(declaration: &EvaluationDeclaration) -> Vec<StatusEvent> {
    let mut events = Vec::new();

    let ensemble_keys = query::ensemble_declaration(declaration);
    if !ensemble_keys.is_empty()
        && query::has_data_type(declaration, DataType::EnsembleForecasts).is_false()
    {
        events.push(StatusEvent::error(format!(
            "The declaration includes options that require ensemble forecasts ({}), but none of \
             the declared datasets has a data 'type' of 'ensemble forecasts'. Please correct the \
             data 'type' or remove the ensemble declaration and try again.",
            quoted_list(&ensemble_keys)
        )));
    }

    if query::has_analysis_times(declaration)
        && query::has_data_type(declaration, DataType::Analyses).is_false()
    {
        events.push(StatusEvent::error(
            "The declaration includes 'analysis_times', but none of the declared datasets has a \
             data 'type' of 'analyses'. Please correct the data 'type' or remove the \
             'analysis_times' and try again.",
        ));
    }

    let forecast_keys: Vec<_> = query::forecast_declaration(declaration)
        .difference(&ensemble_keys)
        .cloned()
        .collect();
    let forecasts_absent = query::has_data_type(declaration, DataType::SingleValuedForecasts)
        .is_false()
        && query::has_data_type(declaration, DataType::EnsembleForecasts).is_false();
    if !forecast_keys.is_empty() && forecasts_absent {
        events.push(StatusEvent::error(format!(
            "The declaration includes options that require forecasts ({}), but none of the \
             declared datasets has a forecast data 'type'. Please correct the data 'type' or \
             remove the forecast declaration and try again.",
            quoted_list(&forecast_keys)
        )));
    }

    events
}

fn ensemble_on_one_side_only(declaration: &EvaluationDeclaration) -> Vec<StatusEvent> {
    let left_is_ensemble = declaration
        .left
        .as_ref()
        .is_some_and(|dataset| dataset.data_type == Some(DataType::EnsembleForecasts));
    let right_is_ensemble = declaration
        .right
        .as_ref()
        .is_some_and(|dataset| dataset.data_type == Some(DataType::EnsembleForecasts));

    if left_is_ensemble && right_is_ensemble {
        return vec![StatusEvent::error(
            "Both the 'observed' and 'predicted' datasets have a data 'type' of 'ensemble \
             forecasts', which is not supported. Please remove the ensemble forecasts from one \
             side of the evaluation and try again.",
        )];
    }

    Vec::new()
}

fn generated_baseline_is_valid(declaration: &EvaluationDeclaration) -> Vec<StatusEvent> {
    let mut events = Vec::new();

    let baseline = match &declaration.baseline {
        Some(baseline) => baseline,
        None => return events,
    };
    let generated = match &baseline.generated {
        Some(generated) => generated,
        None => return events,
    };

    if baseline
        .dataset
        .data_type
        .is_some_and(|data_type| data_type.is_forecast())
    {
        events.push(StatusEvent::error(format!(
            "The 'baseline' declares a generated 'method' of '{}', which is computed from \
             observation-like data, but the 'baseline' dataset has a forecast data 'type'. \
             Please correct the 'type' of the 'baseline' dataset and try again.",
            generated.method
        )));
    }

    match generated.method {
        GeneratedBaselineMethod::Persistence => {
            let ensemble_keys = query::ensemble_declaration(declaration);
            if !ensemble_keys.is_empty() {
                events.push(StatusEvent::error(format!(
                    "The declaration contains a generated 'baseline' with a method of \
                     'persistence', which does not support ensemble forecasts, but the \
                     declaration includes options that require ensemble forecasts ({}). Please \
                     remove the persistence baseline or the ensemble declaration and try again.",
                    quoted_list(&ensemble_keys)
                )));
            }
        }
        GeneratedBaselineMethod::Climatology => {
            events.extend(climatology_span_is_valid(declaration, generated));
        }
    }

    events
}

fn climatology_span_is_valid(
    declaration: &EvaluationDeclaration,
    generated: &crate::model::GeneratedBaseline,
) -> Vec<StatusEvent> {
    let required = Duration::days(CLIMATOLOGY_MINIMUM_DAYS);

    match (generated.minimum_date, generated.maximum_date) {
        (Some(minimum), Some(maximum)) => {
            if maximum <= minimum {
                return vec![StatusEvent::error(format!(
                    "The generated 'baseline' with a method of 'climatology' declares a \
                     'maximum_date' of '{maximum}' that is not later than the 'minimum_date' of \
                     '{minimum}'. Please correct the climatological period and try again."
                ))];
            }
            let span = maximum - minimum;
            if span <= required {
                return vec![StatusEvent::error(format!(
                    "The generated 'baseline' with a method of 'climatology' declares a period \
                     of {} day(s) between the 'minimum_date' of '{minimum}' and the \
                     'maximum_date' of '{maximum}', but a climatological baseline requires a \
                     period of more than {CLIMATOLOGY_MINIMUM_DAYS} days. Please widen the \
                     climatological period and try again.",
                    span.num_days()
                ))];
            }
            Vec::new()
        }
        _ => {
            let span = declaration
                .valid_dates
                .and_then(|interval| interval.span());
            match span {
                Some(span) if span > required => Vec::new(),
                Some(span) => vec![StatusEvent::error(format!(
                    "The generated 'baseline' with a method of 'climatology' does not declare \
                     an explicit period and the 'valid_dates' span only {} day(s), but a \
                     climatological baseline requires a period of more than \
                     {CLIMATOLOGY_MINIMUM_DAYS} days. Please widen the 'valid_dates' or declare \
                     an explicit climatological period and try again.",
                    span.num_days()
                ))],
                None => vec![StatusEvent::error(format!(
                    "The generated 'baseline' with a method of 'climatology' does not declare \
                     an explicit period and no fully declared 'valid_dates' were found, so a \
                     climatological period of more than {CLIMATOLOGY_MINIMUM_DAYS} days cannot \
                     be established. Please declare the 'minimum_date' and 'maximum_date' of \
                     the baseline, or fully declare the 'valid_dates', and try again."
                ))],
            }
        }
    }
}

fn time_scales_are_valid(declaration: &EvaluationDeclaration) -> Vec<StatusEvent> {
    let mut events = Vec::new();

    if let Some(scale) = &declaration.time_scale {
        events.extend(time_scale_is_well_formed(scale, "evaluation 'time_scale'"));
        if scale.is_instantaneous() {
            events.push(StatusEvent::warn(
                "The evaluation 'time_scale' is instantaneous. Instantaneous time scales do not \
                 require declaration and the 'time_scale' can be removed.",
            ));
        }
    }

    for (name, dataset) in all_datasets(declaration) {
        let scale = match &dataset.time_scale {
            Some(scale) => scale,
            None => continue,
        };
        let context = format!("'time_scale' of the '{name}' dataset");
        events.extend(time_scale_is_well_formed(scale, &context));

        let desired = match &declaration.time_scale {
            Some(desired) => desired,
            None => continue,
        };

        if let (Some(desired_period), Some(source_period)) =
            (desired.period_duration(), scale.period_duration())
        {
            let desired_seconds = desired_period.num_seconds();
            let source_seconds = source_period.num_seconds();
            if desired_seconds < source_seconds
                || (source_seconds > 0 && desired_seconds % source_seconds != 0)
            {
                events.push(StatusEvent::error(format!(
                    "The {context} declares a period of {source_seconds} seconds, which cannot \
                     be upscaled to the evaluation 'time_scale' period of {desired_seconds} \
                     seconds, because the evaluation period must be an integer multiple of the \
                     dataset period and no smaller. Please correct the time scales and try \
                     again."
                )));
            }
        }

        if desired.function == Some(TimeScaleFunction::Total)
            && !scale.is_instantaneous()
            && !matches!(
                scale.function,
                Some(TimeScaleFunction::Mean) | Some(TimeScaleFunction::Total)
            )
        {
            let found = scale
                .function
                .map(|function| function.to_string())
                .unwrap_or_else(|| "none".to_string());
            events.push(StatusEvent::error(format!(
                "The evaluation 'time_scale' declares a 'function' of 'total', which requires \
                 the {context} to be instantaneous or to declare a 'function' of 'mean' or \
                 'total', but found '{found}'. Please correct the time scale functions and try \
                 again."
            )));
        }
    }

    events
}

fn time_scale_is_well_formed(scale: &TimeScale, context: &str) -> Vec<StatusEvent> {
    let mut events = Vec::new();

    if scale.function.is_none() {
        events.push(StatusEvent::error(format!(
            "The {context} does not declare a 'function', which is required. Please declare a \
             'function' and try again."
        )));
    }

    if scale.period.is_some() && scale.has_partial_season() {
        events.push(StatusEvent::error(format!(
            "The {context} declares both a 'period' and a season, which is not allowed. Please \
             declare either a 'period' or a season, but not both, and try again."
        )));
    } else if scale.has_partial_season() && !scale.has_full_season() {
        events.push(StatusEvent::error(format!(
            "The {context} declares a partial season. A season requires both the day and the \
             month of each bound. Please complete the season declaration and try again."
        )));
    } else if scale.period.is_none() && !scale.has_partial_season() {
        events.push(StatusEvent::error(format!(
            "The {context} declares neither a 'period' nor a season. Please declare one of the \
             two and try again."
        )));
    }

    events
}
