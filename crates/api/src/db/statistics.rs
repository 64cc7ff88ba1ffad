use std::collections::{BTreeMap, HashMap};
use time::{OffsetDateTime, UtcOffset};

use super::{MonthTemperature, Statistics};

/// One stored reading as needed for aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadingSample {
    pub id: i64,
    pub observed_at: OffsetDateTime,
    pub temperature: f64,
    pub temp_min: f64,
    pub temp_max: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionSample {
    pub reading_id: i64,
    pub condition_type: String,
}

pub fn month_label(at: OffsetDateTime) -> String {
    let date = at.to_offset(UtcOffset::UTC).date();
    format!("{:04}-{:02}", date.year(), date.month() as u8)
}

pub fn date_label(at: OffsetDateTime) -> String {
    let date = at.to_offset(UtcOffset::UTC).date();
    format!("{:04}-{:02}-{:02}", date.year(), date.month() as u8, date.day())
}

/// Builds the statistics of one location.
///
/// `readings` must be ordered by observation time, then id, and
/// `conditions` must follow the same reading order; first-seen order of
/// condition types per day depends on it.
pub fn summarize(
    count: i64,
    readings: &[ReadingSample],
    conditions: &[ConditionSample],
) -> Statistics {
    Statistics {
        count,
        month_temperature: monthly_temperatures(readings),
        daily_condition: daily_conditions(readings, conditions),
    }
}

struct MonthAccumulator {
    min: f64,
    max: f64,
    sum: f64,
    samples: u32,
}

/// Minimum of `temp_min`, maximum of `temp_max` and mean of `temperature`
/// for every calendar month, ascending.
pub fn monthly_temperatures(readings: &[ReadingSample]) -> Vec<MonthTemperature> {
    let mut months: BTreeMap<String, MonthAccumulator> = BTreeMap::new();

    for reading in readings {
        months
            .entry(month_label(reading.observed_at))
            .and_modify(|acc| {
                acc.min = acc.min.min(reading.temp_min);
                acc.max = acc.max.max(reading.temp_max);
                acc.sum += reading.temperature;
                acc.samples += 1;
            })
            .or_insert(MonthAccumulator {
                min: reading.temp_min,
                max: reading.temp_max,
                sum: reading.temperature,
                samples: 1,
            });
    }

    months
        .into_iter()
        .map(|(month, acc)| MonthTemperature {
            min: acc.min,
            max: acc.max,
            avg: acc.sum / f64::from(acc.samples),
            month,
        })
        .collect()
}

/// Distinct condition types per day, in first-seen order. Days whose
/// readings have no conditions map to an empty list.
pub fn daily_conditions(
    readings: &[ReadingSample],
    conditions: &[ConditionSample],
) -> BTreeMap<String, Vec<String>> {
    let mut days: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut reading_days: HashMap<i64, String> = HashMap::with_capacity(readings.len());

    for reading in readings {
        let day = date_label(reading.observed_at);
        days.entry(day.clone()).or_default();
        reading_days.insert(reading.id, day);
    }

    for condition in conditions {
        let Some(day) = reading_days.get(&condition.reading_id) else {
            continue;
        };
        let types = days.entry(day.clone()).or_default();
        if !types.contains(&condition.condition_type) {
            types.push(condition.condition_type.clone());
        }
    }

    days
}
