//! Temporal rules: unit aliases, date intervals, seasons and pools.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::event::StatusEvent;
use crate::model::{EvaluationDeclaration, TimeInterval, TimePools};

use super::quoted_list;

pub fn validate(declaration: &EvaluationDeclaration) -> Vec<StatusEvent> {
    let mut events = Vec::new();

    events.extend(unit_aliases_are_unique(declaration));
    events.extend(intervals_are_ordered(declaration));
    events.extend(dates_overlap_after_lead_times(declaration));
    events.extend(ignored_valid_dates_are_sane(declaration));
    events.extend(season_is_sane(declaration));
    events.extend(pools_are_producible(declaration));
    events.extend(explicit_and_generated_pools(declaration));

    events
}

fn unit_aliases_are_unique(declaration: &EvaluationDeclaration) -> Vec<StatusEvent> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for alias in &declaration.unit_aliases {
        *counts.entry(alias.alias.as_str()).or_insert(0) += 1;
    }

    let duplicates: Vec<&str> = counts
        .iter()
        .filter(|(_, count)| **count > 1)
        .map(|(alias, _)| *alias)
        .collect();

    if !duplicates.is_empty() {
        return vec![StatusEvent::error(format!(
            "The 'unit_aliases' contain duplicate aliases: {}. Each alias may be declared only \
             once. Please remove the duplicates and try again.",
            quoted_list(&duplicates)
        ))];
    }

    Vec::new()
}

/// Checks one date interval for reversed or zero-width bounds.
fn check_interval(interval: &TimeInterval, name: &str) -> Vec<StatusEvent> {
    let (minimum, maximum) = match (interval.minimum, interval.maximum) {
        (Some(minimum), Some(maximum)) => (minimum, maximum),
        _ => return Vec::new(),
    };

    if maximum < minimum {
        return vec![StatusEvent::error(format!(
            "The {name} declare a 'maximum' of '{maximum}' that is before the 'minimum' of \
             '{minimum}'. Please correct the interval and try again."
        ))];
    }
    if maximum == minimum {
        return vec![StatusEvent::warn(format!(
            "The {name} declare a 'maximum' that is equal to the 'minimum' of '{minimum}', \
             which selects no data. Please check whether a wider interval was intended."
        ))];
    }

    Vec::new()
}

fn intervals_are_ordered(declaration: &EvaluationDeclaration) -> Vec<StatusEvent> {
    let mut events = Vec::new();

    if let Some(interval) = &declaration.reference_dates {
        events.extend(check_interval(interval, "'reference_dates'"));
    }
    if let Some(interval) = &declaration.valid_dates {
        events.extend(check_interval(interval, "'valid_dates'"));
    }

    if let Some(lead_times) = &declaration.lead_times {
        if let (Some(minimum), Some(maximum)) = (lead_times.minimum, lead_times.maximum) {
            if maximum < minimum {
                events.push(StatusEvent::error(format!(
                    "The 'lead_times' declare a 'maximum' of {maximum} that is before the \
                     'minimum' of {minimum}. Please correct the interval and try again."
                )));
            } else if maximum == minimum {
                events.push(StatusEvent::warn(format!(
                    "The 'lead_times' declare a 'maximum' that is equal to the 'minimum' of \
                     {minimum}, which selects a single lead duration. Please check whether a \
                     wider interval was intended."
                )));
            }
        }
    }

    if let Some(analysis_times) = &declaration.analysis_times {
        if let (Some(minimum), Some(maximum)) = (analysis_times.minimum, analysis_times.maximum) {
            if maximum < minimum {
                events.push(StatusEvent::error(format!(
                    "The 'analysis_times' declare a 'maximum' of {maximum} that is before the \
                     'minimum' of {minimum}. Please correct the interval and try again."
                )));
            }
        }
    }

    events
}

fn dates_overlap_after_lead_times(declaration: &EvaluationDeclaration) -> Vec<StatusEvent> {
    let (reference, valid) = match (&declaration.reference_dates, &declaration.valid_dates) {
        (Some(reference), Some(valid)) if reference.is_complete() && valid.is_complete() => {
            (reference, valid)
        }
        _ => return Vec::new(),
    };

    // Reversed intervals are reported elsewhere.
    if reference.maximum < reference.minimum || valid.maximum < valid.minimum {
        return Vec::new();
    }

    let lead_minimum = declaration
        .lead_times
        .as_ref()
        .and_then(|lead_times| lead_times.minimum_duration());
    let lead_maximum = declaration
        .lead_times
        .as_ref()
        .and_then(|lead_times| lead_times.maximum_duration());
    let lead_fully_known = declaration
        .lead_times
        .as_ref()
        .map(|lead_times| lead_times.is_complete())
        // Absent lead times mean no adjustment at all, which is fully known.
        .unwrap_or(true);

    let adjusted_minimum: DateTime<Utc> = match (reference.minimum, lead_minimum) {
        (Some(minimum), Some(lead)) => minimum + lead,
        (Some(minimum), None) => minimum,
        _ => return Vec::new(),
    };
    let adjusted_maximum: DateTime<Utc> = match (reference.maximum, lead_maximum) {
        (Some(maximum), Some(lead)) => maximum + lead,
        (Some(maximum), None) => maximum,
        _ => return Vec::new(),
    };

    let adjusted = TimeInterval::new(adjusted_minimum, adjusted_maximum);
    if adjusted.overlaps(valid) == Some(false) {
        let message = "The 'reference_dates', adjusted by the declared 'lead_times', do not \
                       overlap the 'valid_dates', so no data can be selected. Please align the \
                       'reference_dates', 'valid_dates' and 'lead_times' and try again.";
        if lead_fully_known {
            return vec![StatusEvent::error(message)];
        }
        return vec![StatusEvent::warn(message)];
    }

    Vec::new()
}

fn ignored_valid_dates_are_sane(declaration: &EvaluationDeclaration) -> Vec<StatusEvent> {
    let mut events = Vec::new();

    for (index, interval) in declaration.ignored_valid_dates.iter().enumerate() {
        let name = format!("'ignored_valid_dates' at position {index}");
        events.extend(check_interval(interval, &name));
    }

    // Deduplicate before looking for overlap and exhaustion, else repeated
    // intervals would double count.
    let mut complete: Vec<(DateTime<Utc>, DateTime<Utc>)> = declaration
        .ignored_valid_dates
        .iter()
        .filter_map(|interval| match (interval.minimum, interval.maximum) {
            (Some(minimum), Some(maximum)) if minimum <= maximum => Some((minimum, maximum)),
            _ => None,
        })
        .collect();
    complete.sort();
    complete.dedup();

    let mut overlapping = false;
    for pair in complete.windows(2) {
        if pair[1].0 <= pair[0].1 {
            overlapping = true;
        }
    }
    if overlapping {
        events.push(StatusEvent::warn(
            "The 'ignored_valid_dates' contain intervals that overlap each other. The \
             overlapping periods will be ignored once. Please check whether distinct intervals \
             were intended.",
        ));
    }

    if let Some(valid) = &declaration.valid_dates {
        if let (Some(valid_minimum), Some(valid_maximum)) = (valid.minimum, valid.maximum) {
            // Merge and test whether the union covers the whole valid span.
            let mut cursor = valid_minimum;
            let mut exhausted = false;
            for (minimum, maximum) in &complete {
                if *minimum <= cursor {
                    if *maximum >= valid_maximum {
                        exhausted = true;
                        break;
                    }
                    if *maximum > cursor {
                        cursor = *maximum;
                    }
                }
            }

            if exhausted {
                events.push(StatusEvent::error(
                    "The 'ignored_valid_dates' collectively cover the entire 'valid_dates' \
                     interval, so no data can be selected. Please narrow the \
                     'ignored_valid_dates' or widen the 'valid_dates' and try again.",
                ));
            }
        }
    }

    events
}

fn season_is_sane(declaration: &EvaluationDeclaration) -> Vec<StatusEvent> {
    let season = match &declaration.season {
        Some(season) => season,
        None => return Vec::new(),
    };

    if season.minimum == season.maximum {
        return vec![StatusEvent::error(
            "The 'season' declares equal lower and upper bounds, which selects no data. Please \
             widen the 'season' and try again.",
        )];
    }
    if season.minimum > season.maximum {
        return vec![StatusEvent::warn(
            "The 'season' declares a lower bound that falls after the upper bound, which wraps \
             the season around the end of the calendar year. Please check that a wrapped season \
             was intended.",
        )];
    }

    Vec::new()
}

fn pools_are_producible(declaration: &EvaluationDeclaration) -> Vec<StatusEvent> {
    let mut events = Vec::new();

    if let Some(pools) = &declaration.valid_date_pools {
        events.extend(date_pools_fit(
            pools,
            declaration.valid_dates.as_ref(),
            "valid_date_pools",
            "valid_dates",
        ));
    }
    if let Some(pools) = &declaration.reference_date_pools {
        events.extend(date_pools_fit(
            pools,
            declaration.reference_dates.as_ref(),
            "reference_date_pools",
            "reference_dates",
        ));
    }

    if let Some(pools) = &declaration.lead_time_pools {
        let interval = declaration.lead_times.as_ref();
        match interval {
            Some(lead_times) if lead_times.is_complete() => {
                let minimum = lead_times.minimum_duration().unwrap_or_default();
                let maximum = lead_times.maximum_duration().unwrap_or_default();
                if minimum + pools.period_duration() > maximum {
                    events.push(StatusEvent::error(
                        "The 'lead_time_pools' declare a 'period' that does not fit within the \
                         'lead_times', so no pools can be produced. Please widen the \
                         'lead_times' or shorten the pool 'period' and try again.",
                    ));
                }
            }
            _ => {
                events.push(StatusEvent::error(
                    "The 'lead_time_pools' require the 'lead_times' to declare both a 'minimum' \
                     and a 'maximum'. Please declare the 'lead_times' fully and try again.",
                ));
            }
        }
    }

    events
}

fn date_pools_fit(
    pools: &TimePools,
    interval: Option<&TimeInterval>,
    pool_name: &str,
    interval_name: &str,
) -> Vec<StatusEvent> {
    match interval {
        Some(interval) if interval.is_complete() => {
            let minimum = interval.minimum.unwrap_or_default();
            let maximum = interval.maximum.unwrap_or_default();
            if minimum + pools.period_duration() > maximum {
                return vec![StatusEvent::error(format!(
                    "The '{pool_name}' declare a 'period' that does not fit within the \
                     '{interval_name}', so no pools can be produced. Please widen the \
                     '{interval_name}' or shorten the pool 'period' and try again."
                ))];
            }
            Vec::new()
        }
        _ => vec![StatusEvent::error(format!(
            "The '{pool_name}' require the '{interval_name}' to declare both a 'minimum' and a \
             'maximum'. Please declare the '{interval_name}' fully and try again."
        ))],
    }
}

fn explicit_and_generated_pools(declaration: &EvaluationDeclaration) -> Vec<StatusEvent> {
    let generated = declaration.valid_date_pools.is_some()
        || declaration.reference_date_pools.is_some()
        || declaration.lead_time_pools.is_some();

    if !declaration.time_pools.is_empty() && generated {
        return vec![StatusEvent::warn(
            "The declaration contains both explicit 'time_pools' and generated pool sequences. \
             Both will be used, which may produce more pools than intended. Please check the \
             pooling declaration.",
        )];
    }

    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DurationUnit, LeadTimeInterval, MonthDay, Season, UnitAlias};
    use chrono::TimeZone;

    fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_reversed_interval_is_an_error_and_zero_width_a_warning() {
        let mut declaration = EvaluationDeclaration {
            valid_dates: Some(TimeInterval::new(date(2021, 6, 1), date(2021, 1, 1))),
            ..Default::default()
        };
        let events = validate(&declaration);
        assert!(events
            .iter()
            .any(|event| event.is_error() && event.message.contains("'valid_dates'")));

        declaration.valid_dates = Some(TimeInterval::new(date(2021, 6, 1), date(2021, 6, 1)));
        let events = validate(&declaration);
        assert!(events
            .iter()
            .any(|event| event.is_warn() && event.message.contains("'valid_dates'")));
        assert!(!events.iter().any(|event| event.is_error()));
    }

    #[test]
    fn test_lead_time_pool_that_cannot_fit_is_an_error() {
        let declaration = EvaluationDeclaration {
            lead_times: Some(LeadTimeInterval {
                minimum: Some(0),
                maximum: Some(24),
                unit: DurationUnit::Hours,
            }),
            lead_time_pools: Some(TimePools {
                period: 48,
                frequency: None,
                unit: DurationUnit::Hours,
            }),
            ..Default::default()
        };

        let events = validate(&declaration);
        assert!(events
            .iter()
            .any(|event| event.is_error() && event.message.contains("no pools can be produced")));
    }

    #[test]
    fn test_duplicate_unit_aliases_are_an_error() {
        let alias = UnitAlias {
            alias: "cfs".to_string(),
            unit: "ft3/s".to_string(),
        };
        let declaration = EvaluationDeclaration {
            unit_aliases: vec![alias.clone(), alias],
            ..Default::default()
        };

        let events = validate(&declaration);
        assert!(events
            .iter()
            .any(|event| event.is_error() && event.message.contains("'cfs'")));
    }

    #[test]
    fn test_non_overlapping_dates_are_an_error_when_lead_times_known() {
        let declaration = EvaluationDeclaration {
            reference_dates: Some(TimeInterval::new(date(2021, 1, 1), date(2021, 2, 1))),
            valid_dates: Some(TimeInterval::new(date(2022, 1, 1), date(2022, 2, 1))),
            lead_times: Some(LeadTimeInterval {
                minimum: Some(0),
                maximum: Some(24),
                unit: DurationUnit::Hours,
            }),
            ..Default::default()
        };

        let events = validate(&declaration);
        assert!(events
            .iter()
            .any(|event| event.is_error() && event.message.contains("do not overlap")));
    }

    #[test]
    fn test_partially_known_lead_times_downgrade_overlap_to_warning() {
        let declaration = EvaluationDeclaration {
            reference_dates: Some(TimeInterval::new(date(2021, 1, 1), date(2021, 2, 1))),
            valid_dates: Some(TimeInterval::new(date(2022, 1, 1), date(2022, 2, 1))),
            lead_times: Some(LeadTimeInterval {
                minimum: Some(0),
                maximum: None,
                unit: DurationUnit::Hours,
            }),
            ..Default::default()
        };

        let events = validate(&declaration);
        assert!(events
            .iter()
            .any(|event| event.is_warn() && event.message.contains("do not overlap")));
    }

    #[test]
    fn test_exhaustive_ignored_valid_dates_are_an_error() {
        let declaration = EvaluationDeclaration {
            valid_dates: Some(TimeInterval::new(date(2021, 1, 1), date(2021, 12, 31))),
            ignored_valid_dates: vec![
                TimeInterval::new(date(2021, 1, 1), date(2021, 7, 1)),
                TimeInterval::new(date(2021, 6, 1), date(2021, 12, 31)),
            ],
            ..Default::default()
        };

        let events = validate(&declaration);
        assert!(events
            .iter()
            .any(|event| event.is_error() && event.message.contains("entire 'valid_dates'")));
        assert!(events
            .iter()
            .any(|event| event.is_warn() && event.message.contains("overlap each other")));
    }

    #[test]
    fn test_zero_width_season_is_an_error_and_wrapped_season_a_warning() {
        let mut declaration = EvaluationDeclaration {
            season: Some(Season {
                minimum: MonthDay { month: 4, day: 1 },
                maximum: MonthDay { month: 4, day: 1 },
            }),
            ..Default::default()
        };
        let events = validate(&declaration);
        assert!(events
            .iter()
            .any(|event| event.is_error() && event.message.contains("'season'")));

        declaration.season = Some(Season {
            minimum: MonthDay { month: 11, day: 1 },
            maximum: MonthDay { month: 2, day: 28 },
        });
        let events = validate(&declaration);
        assert!(events
            .iter()
            .any(|event| event.is_warn() && event.message.contains("wraps")));
    }
}
