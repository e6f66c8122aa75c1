//! Import reconciliation and the engine facade.
//!
//! Reconciliation is a pure transformation: each pass takes the stored weeks
//! and an imported batch and produces a brand-new history value, so readers
//! of the previous state never observe a partial update. The facade owns the
//! injected store, the reconciled history and the active-week pointer.

use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::models::week::Week;
use crate::services::merge_service::merge_week;
use crate::services::streak_service::calculate_streak;
use crate::services::week_locator::locate_current_week;
use crate::store::HistoryStore;

/// Normalizes a raw import document into a week batch. Accepts an array of
/// weeks, a bare week object, or a `{ "data": … }` wrapper. Any malformed
/// entry or an empty batch rejects the whole import; there is no partial
/// application.
pub fn parse_import_payload(raw: &str) -> AppResult<Vec<Week>> {
    let value: JsonValue = serde_json::from_str(raw)
        .map_err(|err| AppError::import_parse(format!("payload is not valid JSON: {err}")))?;

    let elements = match value {
        JsonValue::Array(items) => items,
        JsonValue::Object(mut object) => {
            let element = object
                .remove("data")
                .unwrap_or(JsonValue::Object(object));
            vec![element]
        }
        _ => {
            return Err(AppError::import_parse(
                "payload must be a week object or an array of weeks",
            ))
        }
    };

    if elements.is_empty() {
        return Err(AppError::import_parse("payload contains no weeks"));
    }

    let mut batch = Vec::with_capacity(elements.len());
    for element in elements {
        let week: Week = serde_json::from_value(element)
            .map_err(|err| AppError::import_parse(format!("week entry is malformed: {err}")))?;
        if week.week_label.trim().is_empty() {
            return Err(AppError::import_parse("week entry is missing a weekLabel"));
        }
        batch.push(week);
    }
    Ok(batch)
}

/// Folds an imported batch into the stored history: weeks with a known label
/// merge into their slot, unseen labels append. Returns a new sorted history.
pub fn reconcile(history: &[Week], batch: Vec<Week>) -> Vec<Week> {
    let mut updated = history.to_vec();

    for incoming in batch {
        match updated
            .iter()
            .position(|week| week.week_label == incoming.week_label)
        {
            Some(index) => {
                let existing = updated[index].clone();
                updated[index] = merge_week(Some(existing), incoming);
            }
            None => updated.push(merge_week(None, incoming)),
        }
    }

    // plain string comparison; chronological only while every label shares
    // the same "Semana DD/MM - DD/MM" literal format
    updated.sort_by(|a, b| a.week_label.cmp(&b.week_label));
    updated
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub weeks_merged: usize,
    /// False when the merge succeeded but the store rejected the write; the
    /// in-memory history is still updated and usable for the session.
    pub persisted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExportPayload {
    pub file_name: String,
    pub json: String,
}

pub struct HistoryService {
    store: Box<dyn HistoryStore>,
    history: Vec<Week>,
    active_week: usize,
}

impl HistoryService {
    /// Loads the history slot once. An unreadable slot is recovered as an
    /// empty history rather than a failure.
    pub fn new(store: Box<dyn HistoryStore>) -> Self {
        let history = match store.load() {
            Ok(history) => history,
            Err(err) => {
                warn!(target: "engine::storage", error = %err, "recovering with empty history");
                Vec::new()
            }
        };
        let active_week = locate_current_week(&history);
        Self {
            store,
            history,
            active_week,
        }
    }

    pub fn history(&self) -> &[Week] {
        &self.history
    }

    pub fn active_week(&self) -> usize {
        self.active_week
    }

    pub fn current_week(&self) -> Option<&Week> {
        self.history.get(self.active_week)
    }

    pub fn set_active_week(&mut self, index: usize) {
        self.active_week = index.min(self.history.len().saturating_sub(1));
    }

    pub fn streak(&self) -> u32 {
        calculate_streak(&self.history)
    }

    /// Parses and reconciles an import document, persists the result and
    /// recomputes the active week. A store write failure is logged and
    /// reported through [`ImportSummary::persisted`], never failing the
    /// import itself.
    pub fn import_payload(&mut self, raw: &str) -> AppResult<ImportSummary> {
        let batch = parse_import_payload(raw)?;
        let weeks_merged = batch.len();

        self.history = reconcile(&self.history, batch);

        let persisted = match self.store.save(&self.history) {
            Ok(()) => true,
            Err(err) => {
                warn!(
                    target: "engine::storage",
                    error = %err,
                    "history not persisted, continuing with in-memory state"
                );
                false
            }
        };

        self.active_week = locate_current_week(&self.history);
        info!(
            target: "engine::import",
            weeks = weeks_merged,
            total = self.history.len(),
            persisted,
            "import reconciled"
        );

        Ok(ImportSummary {
            weeks_merged,
            persisted,
        })
    }

    /// Serializes the full history, or a single week when a label filter is
    /// given, together with the suggested download filename.
    pub fn export(&self, week_label: Option<&str>) -> AppResult<ExportPayload> {
        match week_label {
            None => {
                let json = serde_json::to_string_pretty(&self.history)?;
                let date = Local::now().format("%Y-%m-%d");
                Ok(ExportPayload {
                    file_name: format!("fitness_backup_{date}.json"),
                    json,
                })
            }
            Some(label) => {
                let week = self
                    .history
                    .iter()
                    .find(|week| week.week_label == label)
                    .ok_or_else(|| AppError::week_not_found(label))?;
                let json = serde_json::to_string_pretty(std::slice::from_ref(week))?;
                Ok(ExportPayload {
                    file_name: format!("{}.json", sanitize_label(label)),
                    json,
                })
            }
        }
    }
}

/// Collapses anything that is not alphanumeric into single underscores.
fn sanitize_label(label: &str) -> String {
    let mut sanitized = String::with_capacity(label.len());
    let mut gap = false;
    for c in label.chars() {
        if c.is_alphanumeric() {
            sanitized.push(c);
            gap = false;
        } else if !gap {
            sanitized.push('_');
            gap = true;
        }
    }
    sanitized.trim_matches('_').to_string()
}
