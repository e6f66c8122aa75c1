//! Merge rules for combining an incoming week with an already-stored one.
//!
//! Nutrition merges at field granularity (a partial incoming record must not
//! erase fields it does not carry), training sessions replace wholesale per
//! day, and mobility entries deduplicate by structural identity with the
//! incoming side winning.

use std::collections::HashSet;

use crate::models::week::{day_rank, DayNutrition, MobilitySession, Week};

/// Field-level merge of two records describing the same day: fields present
/// on the incoming side win, fields it omits keep the existing value.
pub fn merge_day_nutrition(existing: DayNutrition, incoming: DayNutrition) -> DayNutrition {
    DayNutrition {
        day: incoming.day,
        date: incoming.date.or(existing.date),
        total_kcal: incoming.total_kcal.or(existing.total_kcal),
        summary: incoming.summary.or(existing.summary),
        meals: incoming.meals.or(existing.meals),
    }
}

fn merge_nutrition(
    existing: Vec<DayNutrition>,
    incoming: Vec<DayNutrition>,
) -> Vec<DayNutrition> {
    let mut merged = existing;
    for entry in incoming {
        match merged.iter().position(|e| e.day == entry.day) {
            Some(index) => {
                let current = merged[index].clone();
                merged[index] = merge_day_nutrition(current, entry);
            }
            None => merged.push(entry),
        }
    }
    // stable sort keeps unrecognized day names in arrival order, after the
    // real weekdays
    merged.sort_by_key(|entry| day_rank(&entry.day));
    merged
}

fn merge_mobility(
    existing: Vec<MobilitySession>,
    incoming: Vec<MobilitySession>,
) -> Vec<MobilitySession> {
    let mut seen: HashSet<_> = HashSet::new();
    let mut merged = Vec::with_capacity(existing.len() + incoming.len());

    // incoming first so it wins identity collisions
    for entry in incoming.into_iter().chain(existing) {
        if seen.insert(entry.identity()) {
            merged.push(entry);
        }
    }

    merged.sort_by_key(|entry| day_rank(&entry.day));
    merged
}

/// Combines an incoming week with the stored week of the same label. With no
/// stored week the incoming one passes through, normalized to the same
/// sorted/deduplicated shape.
pub fn merge_week(existing: Option<Week>, incoming: Week) -> Week {
    let existing = existing.unwrap_or_else(|| Week::new(incoming.week_label.clone()));

    let mut training_data = existing.training_data;
    for (day, session) in incoming.training_data {
        // record-level replacement: a day present on both sides takes the
        // incoming session wholesale
        training_data.insert(day, session);
    }

    let mut extra = existing.extra;
    for (key, value) in incoming.extra {
        extra.insert(key, value);
    }

    Week {
        week_label: incoming.week_label,
        nutrition_data: merge_nutrition(existing.nutrition_data, incoming.nutrition_data),
        training_data,
        mobility_data: merge_mobility(existing.mobility_data, incoming.mobility_data),
        extra,
    }
}
