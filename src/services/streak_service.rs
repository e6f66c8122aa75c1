//! Consecutive-activity streak over the full history.
//!
//! History flattens into one slot per calendar day (week order × Monday to
//! Sunday). A slot counts as active when any signal exists for it, including
//! an explicitly-logged rest session; a completely blank day breaks the
//! streak outright, while up to two consecutive rest-tracked days are
//! tolerated.

use crate::models::week::{Week, Weekday};

/// Rest-tracked days tolerated before the streak breaks.
const MAX_CONSECUTIVE_REST_DAYS: u32 = 2;

struct DaySlot {
    has_activity: bool,
    is_rest: bool,
}

fn flatten_slots(history: &[Week]) -> Vec<DaySlot> {
    let mut slots = Vec::with_capacity(history.len() * Weekday::ALL.len());

    for week in history {
        for day in Weekday::ALL {
            let name = day.display_name();
            let has_nutrition = week.nutrition_data.iter().any(|entry| entry.day == name);
            let has_mobility = week.mobility_data.iter().any(|entry| entry.day == name);
            let training = week.training_data.get(&day);
            let has_training = training.map(|session| session.has_data).unwrap_or(false);

            slots.push(DaySlot {
                // a training entry counts as tracked even with has_data ==
                // false: a logged rest day is still a logged day
                has_activity: has_nutrition || training.is_some() || has_mobility,
                is_rest: !has_training && !has_mobility,
            });
        }
    }

    slots
}

/// Length of the ongoing streak ending at the most recent active day.
pub fn calculate_streak(history: &[Week]) -> u32 {
    let slots = flatten_slots(history);

    let Some(last_active) = slots.iter().rposition(|slot| slot.has_activity) else {
        return 0;
    };

    let mut streak = 0u32;
    let mut consecutive_rest = 0u32;

    for slot in slots[..=last_active].iter().rev() {
        if !slot.has_activity {
            break;
        }
        if slot.is_rest {
            consecutive_rest += 1;
            if consecutive_rest > MAX_CONSECUTIVE_REST_DAYS {
                break;
            }
        } else {
            consecutive_rest = 0;
        }
        streak += 1;
    }

    streak
}
