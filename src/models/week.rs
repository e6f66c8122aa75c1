use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map as JsonMap, Value as JsonValue};

/// Sort rank assigned to day names the engine does not recognize; they keep
/// their relative order but always land after Monday..Sunday.
pub const UNRANKED_DAY: u8 = 99;

/// Bounded weekday domain used as the training-map key. The stored JSON keys
/// this map by stringified day index (`"0"` = Monday .. `"6"` = Sunday);
/// nutrition and mobility entries carry the Spanish display name instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn index(self) -> u8 {
        match self {
            Weekday::Monday => 0,
            Weekday::Tuesday => 1,
            Weekday::Wednesday => 2,
            Weekday::Thursday => 3,
            Weekday::Friday => 4,
            Weekday::Saturday => 5,
            Weekday::Sunday => 6,
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Weekday::ALL.get(index as usize).copied()
    }

    /// Display name as it appears in the stored records.
    pub fn display_name(self) -> &'static str {
        match self {
            Weekday::Monday => "Lunes",
            Weekday::Tuesday => "Martes",
            Weekday::Wednesday => "Miércoles",
            Weekday::Thursday => "Jueves",
            Weekday::Friday => "Viernes",
            Weekday::Saturday => "Sábado",
            Weekday::Sunday => "Domingo",
        }
    }

    pub fn from_display_name(name: &str) -> Option<Self> {
        Weekday::ALL
            .into_iter()
            .find(|day| day.display_name() == name)
    }

    /// Monday = 1 .. Sunday = 7.
    pub fn rank(self) -> u8 {
        self.index() + 1
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Rank used when sorting day-keyed lists; unrecognized names sort last.
pub fn day_rank(name: &str) -> u8 {
    Weekday::from_display_name(name)
        .map(Weekday::rank)
        .unwrap_or(UNRANKED_DAY)
}

/// One calendar week of tracked data. `week_label` is the sole identity key
/// across merges. Top-level fields the engine does not model (importer
/// metadata) are preserved in `extra` and merged key-by-key like any other
/// top-level field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Week {
    pub week_label: String,
    #[serde(default)]
    pub nutrition_data: Vec<DayNutrition>,
    #[serde(
        default,
        serialize_with = "serialize_training_map",
        deserialize_with = "deserialize_training_map"
    )]
    pub training_data: BTreeMap<Weekday, TrainingSession>,
    #[serde(default)]
    pub mobility_data: Vec<MobilitySession>,
    #[serde(flatten)]
    pub extra: JsonMap<String, JsonValue>,
}

impl Week {
    pub fn new(week_label: impl Into<String>) -> Self {
        Self {
            week_label: week_label.into(),
            nutrition_data: Vec::new(),
            training_data: BTreeMap::new(),
            mobility_data: Vec::new(),
            extra: JsonMap::new(),
        }
    }
}

/// Nutrition record for a single day, keyed by `day`. Every payload field is
/// optional so a partial incoming record can update one field without
/// clobbering the rest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DayNutrition {
    pub day: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_kcal: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meals: Option<Vec<Meal>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Meal {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kcal: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Rest,
    Workout,
}

impl SessionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKind::Rest => "rest",
            SessionKind::Workout => "workout",
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Training session for one day. An absent map entry means "no data"; an
/// entry with `has_data == false` means "explicitly recorded as no session".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TrainingSession {
    #[serde(default)]
    pub has_data: bool,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<SessionKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sets: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exercises: Vec<Exercise>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sets: Vec<ExerciseSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// One set of an exercise. Weight and reps are user-authored and arrive as
/// either JSON numbers or strings ("45", "45kg"), so they are kept raw and
/// parsed on demand.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<JsonValue>,
}

impl ExerciseSet {
    pub fn weight_value(&self) -> Option<f64> {
        numeric_value(self.weight.as_ref())
    }

    pub fn reps_value(&self) -> Option<f64> {
        numeric_value(self.reps.as_ref())
    }
}

/// Leading-numeric-prefix parse, so "45kg" reads as 45.0. A minus sign only
/// counts at the front; a later one ends the prefix, so range-style input
/// like "45-50kg" still yields the leading number.
fn numeric_value(value: Option<&JsonValue>) -> Option<f64> {
    match value? {
        JsonValue::Number(number) => number.as_f64(),
        JsonValue::String(raw) => {
            let numeric: String = raw
                .trim()
                .chars()
                .enumerate()
                .take_while(|(position, c)| {
                    c.is_ascii_digit() || *c == '.' || (*c == '-' && *position == 0)
                })
                .map(|(_, c)| c)
                .collect();
            numeric.parse().ok()
        }
        _ => None,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MobilitySession {
    pub day: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_lossy_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub distance: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_lossy_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl MobilitySession {
    pub fn identity(&self) -> MobilityKey {
        MobilityKey {
            day: self.day.clone(),
            activity: self.activity.clone(),
            distance: self.distance.clone(),
        }
    }
}

/// Structural dedup identity for mobility entries, compared by value instead
/// of by concatenated string key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MobilityKey {
    pub day: String,
    pub activity: Option<String>,
    pub distance: Option<String>,
}

pub type History = Vec<Week>;

fn serialize_training_map<S>(
    map: &BTreeMap<Weekday, TrainingSession>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let keyed: BTreeMap<String, &TrainingSession> = map
        .iter()
        .map(|(day, session)| (day.index().to_string(), session))
        .collect();
    keyed.serialize(serializer)
}

/// Keys outside "0".."6" are dropped rather than failing the whole document;
/// merging is best-effort over user-authored files.
fn deserialize_training_map<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<Weekday, TrainingSession>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, TrainingSession>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|(key, session)| {
            key.parse::<u8>()
                .ok()
                .and_then(Weekday::from_index)
                .map(|day| (day, session))
        })
        .collect())
}

/// Accepts both JSON strings and bare numbers for user-authored fields.
fn deserialize_lossy_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<JsonValue>::deserialize(deserializer)?;
    Ok(value.and_then(|value| match value {
        JsonValue::String(raw) => Some(raw),
        JsonValue::Number(number) => Some(number.to_string()),
        _ => None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn weekday_roundtrips_between_index_and_name() {
        for day in Weekday::ALL {
            assert_eq!(Weekday::from_index(day.index()), Some(day));
            assert_eq!(Weekday::from_display_name(day.display_name()), Some(day));
        }
        assert_eq!(Weekday::from_index(7), None);
        assert_eq!(Weekday::from_display_name("Funday"), None);
    }

    #[test]
    fn day_rank_puts_unknown_names_last() {
        assert_eq!(day_rank("Lunes"), 1);
        assert_eq!(day_rank("Domingo"), 7);
        assert_eq!(day_rank("Funday"), UNRANKED_DAY);
    }

    #[test]
    fn week_deserializes_client_json() {
        let week: Week = serde_json::from_value(json!({
            "weekLabel": "Semana 09/02 - 15/02",
            "coach": "imported",
            "nutritionData": [
                { "day": "Lunes", "totalKcal": 2100, "meals": [
                    { "type": "Desayuno", "item": "Avena", "kcal": 450 }
                ]}
            ],
            "trainingData": {
                "0": { "hasData": true, "type": "workout", "title": "Empuje" },
                "9": { "hasData": true }
            },
            "mobilityData": [
                { "day": "Martes", "activity": "Run", "distance": 5, "duration": "30min" }
            ]
        }))
        .expect("week should deserialize");

        assert_eq!(week.week_label, "Semana 09/02 - 15/02");
        assert_eq!(week.extra.get("coach"), Some(&json!("imported")));
        assert_eq!(week.nutrition_data[0].total_kcal, Some(2100.0));
        // out-of-range training key is dropped, valid one kept
        assert_eq!(week.training_data.len(), 1);
        assert_eq!(
            week.training_data[&Weekday::Monday].kind,
            Some(SessionKind::Workout)
        );
        // numeric distance normalized to its string form
        assert_eq!(week.mobility_data[0].distance.as_deref(), Some("5"));
    }

    #[test]
    fn training_map_serializes_with_index_keys() {
        let mut week = Week::new("Semana 09/02 - 15/02");
        week.training_data.insert(
            Weekday::Wednesday,
            TrainingSession {
                has_data: true,
                ..TrainingSession::default()
            },
        );

        let value = serde_json::to_value(&week).expect("week should serialize");
        assert!(value["trainingData"].get("2").is_some());
    }

    #[test]
    fn exercise_set_parses_numeric_strings() {
        let set = ExerciseSet {
            weight: Some(json!("45kg")),
            reps: Some(json!(10)),
        };
        assert_eq!(set.weight_value(), Some(45.0));
        assert_eq!(set.reps_value(), Some(10.0));
    }

    #[test]
    fn exercise_set_reads_leading_number_from_range_strings() {
        let set = ExerciseSet {
            weight: Some(json!("45-50kg")),
            reps: Some(json!("10-12")),
        };
        assert_eq!(set.weight_value(), Some(45.0));
        assert_eq!(set.reps_value(), Some(10.0));

        // a leading sign still parses as a whole
        let negative = ExerciseSet {
            weight: Some(json!("-2.5kg")),
            reps: None,
        };
        assert_eq!(negative.weight_value(), Some(-2.5));
    }
}
