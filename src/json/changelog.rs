//! Changelog dates order the database migrations of entities. Once written,
//! an entity's date never changes.

use chrono::{DateTime, TimeDelta, Utc};
use serde_json::Value;

/// Liquibase changelog date format.
pub const CHANGELOG_DATE_FORMAT: &str = "%Y%m%d%H%M%S";

pub fn format_changelog_date(date: DateTime<Utc>) -> String {
    date.format(CHANGELOG_DATE_FORMAT).to_string()
}

#[derive(Debug, Clone, Copy)]
pub struct ChangelogDates {
    base: DateTime<Utc>,
}

impl ChangelogDates {
    pub fn new(base: Option<DateTime<Utc>>) -> Self {
        Self {
            base: base.unwrap_or_else(Utc::now),
        }
    }

    /// Date of the `index`-th entity created in this import. One second apart
    /// so that entities created together keep their declaration order.
    pub fn fresh(&self, index: usize) -> String {
        let offset = TimeDelta::try_seconds(index as i64).unwrap_or_default();
        format_changelog_date(self.base + offset)
    }

    /// The date found on disk if there is one, else a fresh one.
    pub fn resolve(&self, index: usize, on_disk: Option<&Value>) -> String {
        on_disk
            .and_then(|json| json.get("changelogDate"))
            .and_then(|date| match date {
                Value::String(s) if !s.is_empty() => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .unwrap_or_else(|| self.fresh(index))
    }
}
