//! Derived read-only summaries over history: personal-record mining and
//! macro estimates for a day's calorie total.

use serde::{Deserialize, Serialize};

use crate::models::week::{Exercise, Week};

// markers the user writes into an exercise note to flag a personal record
const RECORD_MARKERS: [&str; 2] = ["🏆", "PR"];

// assumed kcal split and kcal-per-gram densities for the macro estimate
const PROTEIN_KCAL_SHARE: f64 = 0.30;
const CARBS_KCAL_SHARE: f64 = 0.45;
const FATS_KCAL_SHARE: f64 = 0.25;
const KCAL_PER_G_PROTEIN: f64 = 4.0;
const KCAL_PER_G_CARBS: f64 = 4.0;
const KCAL_PER_G_FAT: f64 = 9.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersonalRecord {
    pub exercise: String,
    /// Heaviest set, formatted as "weight x reps".
    pub best_set: String,
    pub week_label: String,
    /// Leading fragment of the week label, e.g. "Semana 09/02".
    pub date: String,
    pub note: String,
}

/// Scans every training session in history and returns one record per
/// exercise whose note carries a record marker, with its heaviest set.
pub fn extract_personal_records(history: &[Week]) -> Vec<PersonalRecord> {
    let mut records = Vec::new();

    for week in history {
        for session in week.training_data.values() {
            for exercise in &session.exercises {
                let Some(note) = exercise.note.as_deref() else {
                    continue;
                };
                if !RECORD_MARKERS.iter().any(|marker| note.contains(marker)) {
                    continue;
                }
                if let Some(best_set) = format_best_set(exercise) {
                    records.push(PersonalRecord {
                        exercise: exercise.name.clone(),
                        best_set,
                        week_label: week.week_label.clone(),
                        date: leading_fragment(&week.week_label),
                        note: note.to_string(),
                    });
                }
            }
        }
    }

    records
}

fn format_best_set(exercise: &Exercise) -> Option<String> {
    // first set wins ties, strictly heavier sets take over
    let best = exercise.sets.iter().reduce(|prev, current| {
        if current.weight_value().unwrap_or(0.0) > prev.weight_value().unwrap_or(0.0) {
            current
        } else {
            prev
        }
    })?;

    let weight = best
        .weight
        .as_ref()
        .map(json_display)
        .unwrap_or_else(|| "-".to_string());
    let reps = best
        .reps
        .as_ref()
        .map(json_display)
        .unwrap_or_else(|| "-".to_string());
    Some(format!("{weight} x {reps}"))
}

fn json_display(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(raw) => raw.clone(),
        other => other.to_string(),
    }
}

fn leading_fragment(label: &str) -> String {
    label
        .split(" - ")
        .next()
        .unwrap_or(label)
        .trim()
        .to_string()
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MacroEstimate {
    pub protein_g: i64,
    pub carbs_g: i64,
    pub fats_g: i64,
}

/// Rough macro split for a day's calorie total (30% protein / 45% carbs /
/// 25% fat at 4/4/9 kcal per gram), rounded to whole grams.
pub fn estimate_macros(total_kcal: f64) -> MacroEstimate {
    MacroEstimate {
        protein_g: (total_kcal * PROTEIN_KCAL_SHARE / KCAL_PER_G_PROTEIN).round() as i64,
        carbs_g: (total_kcal * CARBS_KCAL_SHARE / KCAL_PER_G_CARBS).round() as i64,
        fats_g: (total_kcal * FATS_KCAL_SHARE / KCAL_PER_G_FAT).round() as i64,
    }
}
