//! Output format rules: deprecations, gridded output constraints, graphics
//! shapes and combined graphics.

use crate::catalog::MetricName;
use crate::event::StatusEvent;
use crate::model::{EvaluationDeclaration, GraphicsShape, OutputFormat};
use crate::query;

use super::quoted_list;

pub fn validate(declaration: &EvaluationDeclaration) -> Vec<StatusEvent> {
    let mut events = Vec::new();

    events.extend(deprecated_formats(declaration));
    events.extend(legacy_csv_handles_date_pools(declaration));
    events.extend(netcdf_formats_are_coherent(declaration));
    events.extend(graphics_shape_matches_pools(declaration));
    events.extend(combined_graphics_are_applicable(declaration));

    events
}

fn deprecated_formats(declaration: &EvaluationDeclaration) -> Vec<StatusEvent> {
    let formats = match &declaration.formats {
        Some(formats) => formats,
        None => return Vec::new(),
    };

    let mut events = Vec::new();

    if formats.has(OutputFormat::Csv) {
        events.push(StatusEvent::warn(
            "The 'output_formats' contain 'csv', which is deprecated and will be removed. \
             Please use 'csv2' instead.",
        ));
    }
    if formats.has(OutputFormat::Netcdf) {
        events.push(StatusEvent::warn(
            "The 'output_formats' contain 'netcdf', which is deprecated and will be removed. \
             Please use 'netcdf2' instead.",
        ));
    }

    events
}

fn legacy_csv_handles_date_pools(declaration: &EvaluationDeclaration) -> Vec<StatusEvent> {
    let has_csv = declaration
        .formats
        .as_ref()
        .is_some_and(|formats| formats.has(OutputFormat::Csv));
    let has_date_pools =
        declaration.valid_date_pools.is_some() || declaration.reference_date_pools.is_some();

    if !has_csv || !has_date_pools {
        return Vec::new();
    }

    let non_scores: Vec<MetricName> = declaration
        .metrics
        .iter()
        .map(|metric| metric.name)
        .filter(|name| !name.is_score())
        .collect();

    if !non_scores.is_empty() {
        return vec![StatusEvent::warn(format!(
            "The 'output_formats' contain the deprecated 'csv' format together with generated \
             date pools and metrics that do not produce scores ({}). The 'csv' format cannot \
             organize those statistics by pool and they will be omitted from it. Please use \
             'csv2' instead.",
            quoted_list(&non_scores)
        ))];
    }

    Vec::new()
}

fn netcdf_formats_are_coherent(declaration: &EvaluationDeclaration) -> Vec<StatusEvent> {
    let formats = match &declaration.formats {
        Some(formats) => formats,
        None => return Vec::new(),
    };

    let mut events = Vec::new();

    if formats.has(OutputFormat::Netcdf) && formats.has(OutputFormat::Netcdf2) {
        events.push(StatusEvent::error(
            "The 'output_formats' contain both 'netcdf' and 'netcdf2', which cannot be written \
             together. Please remove one of the two and try again.",
        ));
    }

    if formats.has(OutputFormat::Netcdf) && query::has_feature_groups(declaration) {
        events.push(StatusEvent::error(
            "The 'output_formats' contain 'netcdf', which does not support feature groups. \
             Please use 'netcdf2' or remove the feature groups and try again.",
        ));
    }

    if formats.has(OutputFormat::Netcdf2) && query::has_feature_groups(declaration) {
        events.push(StatusEvent::warn(
            "The 'output_formats' contain 'netcdf2' together with feature groups. The \
             statistics of each group member will be duplicated across the group. Please check \
             whether feature groups are needed.",
        ));
    }

    if formats.has(OutputFormat::Netcdf2) && !declaration.metrics.is_empty() {
        let has_scores = declaration.metrics.iter().any(|metric| metric.name.is_score());
        if !has_scores {
            events.push(StatusEvent::error(
                "The 'output_formats' contain 'netcdf2', which only records scores, but none of \
                 the declared 'metrics' produces a score. Please declare score metrics or \
                 remove 'netcdf2' and try again.",
            ));
        }
    }

    events
}

fn graphics_shape_matches_pools(declaration: &EvaluationDeclaration) -> Vec<StatusEvent> {
    let shape = match declaration.formats.as_ref().and_then(|formats| formats.shape) {
        Some(shape) => shape,
        None => return Vec::new(),
    };

    match shape {
        GraphicsShape::IssuedDatePools if declaration.reference_date_pools.is_none() => {
            vec![StatusEvent::error(
                "The 'output_formats' declare a graphics shape of 'issued_date_pools', but the \
                 declaration does not contain 'reference_date_pools'. Please declare the \
                 'reference_date_pools' or choose another shape and try again.",
            )]
        }
        GraphicsShape::ValidDatePools
            if declaration.valid_date_pools.is_none()
                && declaration.event_detection.is_none() =>
        {
            vec![StatusEvent::error(
                "The 'output_formats' declare a graphics shape of 'valid_date_pools', but the \
                 declaration does not contain 'valid_date_pools' or 'event_detection'. Please \
                 declare the pools or choose another shape and try again.",
            )]
        }
        _ => Vec::new(),
    }
}

fn combined_graphics_are_applicable(declaration: &EvaluationDeclaration) -> Vec<StatusEvent> {
    if !declaration.combined_graphics {
        return Vec::new();
    }

    let mut events = Vec::new();

    let has_graphics = declaration
        .formats
        .as_ref()
        .is_some_and(|formats| formats.has_graphics());
    if !has_graphics {
        events.push(StatusEvent::warn(
            "The declaration enables 'combined_graphics' without any graphics format, such as \
             'png' or 'svg'. The option has no effect. Please declare a graphics format or \
             remove 'combined_graphics'.",
        ));
    }

    match &declaration.baseline {
        None => {
            events.push(StatusEvent::warn(
                "The declaration enables 'combined_graphics' without a 'baseline'. There is \
                 nothing to combine with the predicted data and the option has no effect. \
                 Please declare a 'baseline' or remove 'combined_graphics'.",
            ));
        }
        Some(baseline) if !baseline.separate_metrics => {
            events.push(StatusEvent::warn(
                "The declaration enables 'combined_graphics', but the 'baseline' does not \
                 declare 'separate_metrics'. No separate baseline statistics exist to combine \
                 and the option has no effect. Please declare 'separate_metrics' on the \
                 'baseline' or remove 'combined_graphics'.",
            ));
        }
        Some(_) => {}
    }

    let unsupported: Vec<MetricName> = declaration
        .metrics
        .iter()
        .map(|metric| metric.name)
        .filter(|name| !name.supports_combined_graphics())
        .collect();
    if !unsupported.is_empty() {
        events.push(StatusEvent::warn(format!(
            "The declaration enables 'combined_graphics' together with metrics that cannot be \
             combined across datasets: {}. Those metrics will be plotted separately. Please \
             check the 'metrics' declaration.",
            quoted_list(&unsupported)
        )));
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BaselineDataset, Formats, Metric, TimePools};

    fn with_formats(formats: Vec<OutputFormat>) -> EvaluationDeclaration {
        EvaluationDeclaration {
            formats: Some(Formats {
                formats,
                shape: None,
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_deprecated_formats_warn_and_name_the_replacement() {
        let declaration = with_formats(vec![OutputFormat::Csv, OutputFormat::Png]);
        let events = validate(&declaration);
        assert!(events
            .iter()
            .any(|event| event.is_warn() && event.message.contains("'csv2'")));
    }

    #[test]
    fn test_legacy_csv_with_date_pools_and_non_score_metrics_warns() {
        let mut declaration = with_formats(vec![OutputFormat::Csv]);
        declaration.valid_date_pools = Some(TimePools {
            period: 30,
            frequency: None,
            unit: crate::model::DurationUnit::Days,
        });
        declaration.metrics = vec![
            Metric::new(MetricName::MeanError),
            Metric::new(MetricName::ScatterPlot),
        ];

        let events = validate(&declaration);
        assert!(events.iter().any(|event| {
            event.is_warn()
                && event.message.contains("'scatter plot'")
                && !event.message.contains("'mean error'")
        }));

        declaration.metrics = vec![Metric::new(MetricName::MeanError)];
        let events = validate(&declaration);
        assert!(!events
            .iter()
            .any(|event| event.message.contains("organize those statistics by pool")));
    }

    #[test]
    fn test_both_netcdf_formats_are_an_error() {
        let declaration = with_formats(vec![OutputFormat::Netcdf, OutputFormat::Netcdf2]);
        let events = validate(&declaration);
        assert!(events
            .iter()
            .any(|event| event.is_error() && event.message.contains("both 'netcdf'")));
    }

    #[test]
    fn test_netcdf2_without_score_metrics_is_an_error() {
        let mut declaration = with_formats(vec![OutputFormat::Netcdf2]);
        declaration.metrics = vec![Metric::new(MetricName::ScatterPlot)];

        let events = validate(&declaration);
        assert!(events
            .iter()
            .any(|event| event.is_error() && event.message.contains("only records scores")));

        declaration.metrics.push(Metric::new(MetricName::MeanError));
        assert!(validate(&declaration).is_empty());
    }

    #[test]
    fn test_netcdf2_with_no_metrics_implies_all_metrics() {
        let declaration = with_formats(vec![OutputFormat::Netcdf2]);
        assert!(validate(&declaration).is_empty());
    }

    #[test]
    fn test_graphics_shape_requires_matching_pools() {
        let mut declaration = with_formats(vec![OutputFormat::Png]);
        declaration.formats.as_mut().unwrap().shape = Some(GraphicsShape::ValidDatePools);

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
    fn test_combined_graphics_without_baseline_is_a_warning() {
        let mut declaration = with_formats(vec![OutputFormat::Png]);
        declaration.combined_graphics = true;

        let events = validate(&declaration);
        assert!(events
            .iter()
            .any(|event| event.is_warn() && event.message.contains("without a 'baseline'")));

        declaration.baseline = Some(BaselineDataset {
            separate_metrics: true,
            ..Default::default()
        });
        declaration.metrics = vec![Metric::new(MetricName::BoxPlotOfErrors)];
        let events = validate(&declaration);
        assert!(events
            .iter()
            .any(|event| event.is_warn() && event.message.contains("'box plot of errors'")));
    }
}
