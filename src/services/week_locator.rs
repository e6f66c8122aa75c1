//! Resolves which week in history should be shown as "current".
//!
//! Resolution is three-tiered: an exact `DD/MM` hit in logged data beats any
//! label-range inference, so a user who already tracked something today lands
//! on that week even when the label text is malformed; the last stored week
//! is the fallback.

use chrono::{Datelike, Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::week::Week;

// two DD/MM fragments anywhere in the label, e.g. "Semana 09/02 - 15/02"
static LABEL_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{2})/(\d{2}).*?(\d{2})/(\d{2})").expect("label range pattern is valid")
});

/// Parses a week label into an inclusive `[start, end]` date range, both
/// sides defaulting to `today`'s calendar year.
///
/// Year rollover is a heuristic carried over for compatibility: an end month
/// numerically before the start month marks the range as spanning a year
/// boundary, so a January `today` pulls the start year back and any other
/// month pushes the end year forward. Either way the range stays exactly one
/// boundary wide; callers must not rely on it beyond adjacent-year ranges.
pub fn parse_label_range(label: &str, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    let captures = LABEL_RANGE.captures(label)?;

    let start_day: u32 = captures[1].parse().ok()?;
    let start_month: u32 = captures[2].parse().ok()?;
    let end_day: u32 = captures[3].parse().ok()?;
    let end_month: u32 = captures[4].parse().ok()?;

    let mut start_year = today.year();
    let mut end_year = today.year();
    if end_month < start_month {
        if today.month() == 1 {
            start_year -= 1;
        } else {
            end_year += 1;
        }
    }

    let start = NaiveDate::from_ymd_opt(start_year, start_month, start_day)?;
    let end = NaiveDate::from_ymd_opt(end_year, end_month, end_day)?;
    Some((start, end))
}

fn week_has_date(week: &Week, date_key: &str) -> bool {
    week.nutrition_data
        .iter()
        .any(|entry| entry.date.as_deref() == Some(date_key))
        || week
            .mobility_data
            .iter()
            .any(|entry| entry.date.as_deref() == Some(date_key))
}

/// Index of the week that contains `today`, per the three-tier resolution.
/// An empty history yields 0.
pub fn locate_current_week_on(history: &[Week], today: NaiveDate) -> usize {
    let date_key = format!("{:02}/{:02}", today.day(), today.month());

    // tier 1: an entry explicitly logged for today
    if let Some(index) = history.iter().position(|week| week_has_date(week, &date_key)) {
        return index;
    }

    // tier 2: label range containment
    if let Some(index) = history.iter().position(|week| {
        parse_label_range(&week.week_label, today)
            .map(|(start, end)| start <= today && today <= end)
            .unwrap_or(false)
    }) {
        return index;
    }

    // tier 3: most recently added week
    history.len().saturating_sub(1)
}

/// [`locate_current_week_on`] with `today` defaulting to the local date.
pub fn locate_current_week(history: &[Week]) -> usize {
    locate_current_week_on(history, Local::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::week::{DayNutrition, MobilitySession, Week};

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
    }

    fn week_with_nutrition_date(label: &str, date: &str) -> Week {
        let mut week = Week::new(label);
        week.nutrition_data.push(DayNutrition {
            day: "Lunes".into(),
            date: Some(date.into()),
            total_kcal: None,
            summary: None,
            meals: None,
        });
        week
    }

    #[test]
    fn label_range_within_one_year() {
        let today = date(2026, 2, 19);
        let range = parse_label_range("Semana 16/02 - 22/02", today);
        assert_eq!(range, Some((date(2026, 2, 16), date(2026, 2, 22))));
    }

    #[test]
    fn label_range_spanning_new_year_seen_from_december() {
        let today = date(2025, 12, 30);
        let range = parse_label_range("Semana 29/12 - 04/01", today);
        assert_eq!(range, Some((date(2025, 12, 29), date(2026, 1, 4))));
    }

    #[test]
    fn label_range_spanning_new_year_seen_from_january() {
        let today = date(2026, 1, 2);
        let range = parse_label_range("Semana 29/12 - 04/01", today);
        assert_eq!(range, Some((date(2025, 12, 29), date(2026, 1, 4))));
    }

    #[test]
    fn wrapped_range_does_not_swallow_later_january_dates() {
        let today = date(2026, 1, 20);
        let (start, end) =
            parse_label_range("Semana 29/12 - 04/01", today).expect("range should parse");
        assert_eq!((start, end), (date(2025, 12, 29), date(2026, 1, 4)));
        assert!(today > end, "a January date past the range must fall outside it");

        // and at the locator level: neither week contains the 20th, so the
        // last week wins by fallback instead of the wrapped range
        let history = vec![
            Week::new("Semana 29/12 - 04/01"),
            Week::new("Semana 05/01 - 11/01"),
        ];
        assert_eq!(locate_current_week_on(&history, today), 1);
    }

    #[test]
    fn unparseable_label_yields_no_range() {
        let today = date(2026, 2, 19);
        assert_eq!(parse_label_range("Semana sin fechas", today), None);
        assert_eq!(parse_label_range("Semana 9/2 - 15/2", today), None);
    }

    #[test]
    fn exact_date_hit_beats_label_ranges() {
        let history = vec![
            Week::new("Semana 16/02 - 22/02"),
            week_with_nutrition_date("Semana etiqueta rota", "19/02"),
        ];
        // the first week's label contains today, but the second week has an
        // entry logged for today
        assert_eq!(locate_current_week_on(&history, date(2026, 2, 19)), 1);
    }

    #[test]
    fn mobility_date_counts_as_exact_hit() {
        let mut week = Week::new("Semana sin fechas");
        week.mobility_data.push(MobilitySession {
            day: "Martes".into(),
            date: Some("10/03".into()),
            activity: Some("Run".into()),
            distance: None,
            duration: None,
            notes: None,
        });
        let history = vec![Week::new("otra"), week];

        assert_eq!(locate_current_week_on(&history, date(2026, 3, 10)), 1);
    }

    #[test]
    fn range_containment_locates_week() {
        let history = vec![
            Week::new("Semana 09/02 - 15/02"),
            Week::new("Semana 16/02 - 22/02"),
        ];
        assert_eq!(locate_current_week_on(&history, date(2026, 2, 19)), 1);
    }

    #[test]
    fn year_wrap_range_contains_early_january() {
        let history = vec![
            Week::new("Semana 22/12 - 28/12"),
            Week::new("Semana 29/12 - 04/01"),
        ];
        assert_eq!(locate_current_week_on(&history, date(2026, 1, 2)), 1);
    }

    #[test]
    fn no_match_falls_back_to_last_week() {
        let history = vec![
            Week::new("Semana 09/02 - 15/02"),
            Week::new("Semana 16/02 - 22/02"),
        ];
        assert_eq!(locate_current_week_on(&history, date(2026, 7, 1)), 1);
    }

    #[test]
    fn empty_history_yields_zero() {
        assert_eq!(locate_current_week_on(&[], date(2026, 2, 19)), 0);
    }
}
