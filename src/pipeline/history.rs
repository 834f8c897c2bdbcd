use serde::{Deserialize, Serialize};

use crate::pipeline::slots::POSTER_SLOTS;

/// One item seen in a library, used to pick the posters for its wall.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub server: String,
    pub server_type: String,
    pub library_id: String,
    pub library_name: String,
    pub item_id: String,
    /// Seconds since the Unix epoch.
    pub timestamp: f64,
}

impl HistoryRecord {
    fn key_matches(&self, server: &str, library_id: &str) -> bool {
        self.server == server && self.library_id == library_id
    }

    /// Lenient parse of a stored record: ids may be numbers, the timestamp a numeric string.
    fn from_value(value: &serde_json::Value) -> Option<Self> {
        let obj = value.as_object()?;
        let text = |key: &str| obj.get(key)?.as_str().map(str::to_owned);
        let id = |key: &str| match obj.get(key)? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        };
        let timestamp = match obj.get("timestamp")? {
            serde_json::Value::Number(n) => n.as_f64()?,
            serde_json::Value::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        if !timestamp.is_finite() {
            return None;
        }
        Some(Self {
            server: text("server")?,
            server_type: text("server_type")?,
            library_id: id("library_id")?,
            library_name: text("library_name")?,
            item_id: id("item_id")?,
            timestamp,
        })
    }
}

/// What [`CoverHistory::record`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HistoryUpdate {
    /// The item already was the newest in its library.
    Unchanged,
    Added,
    /// The item was known and moved to the front.
    Refreshed,
}

/// Recently added items per `(server, library_id)`, at most nine each.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoverHistory {
    records: Vec<HistoryRecord>,
}

impl CoverHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps the well-formed records of a stored list and drops the rest.
    pub fn sanitize(values: &[serde_json::Value]) -> Self {
        let records: Vec<HistoryRecord> = values.iter().filter_map(HistoryRecord::from_value).collect();
        let dropped = values.len() - records.len();
        if dropped > 0 {
            tracing::warn!(dropped, "discarded malformed history records");
        }
        Self { records }
    }

    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Notes `entry` as the latest item of its library.
    ///
    /// A known item gets `entry.timestamp` unless it is already the newest. The library is then
    /// trimmed to its nine newest items.
    pub fn record(&mut self, entry: HistoryRecord) -> HistoryUpdate {
        let (server, library_id) = (entry.server.clone(), entry.library_id.clone());
        let newest = self
            .records
            .iter()
            .filter(|r| r.key_matches(&server, &library_id))
            .map(|r| r.timestamp)
            .fold(f64::NEG_INFINITY, f64::max);

        let outcome = match self
            .records
            .iter_mut()
            .find(|r| r.key_matches(&server, &library_id) && r.item_id == entry.item_id)
        {
            Some(existing) if existing.timestamp >= newest => {
                tracing::debug!(item = %entry.item_id, "item already newest in library");
                return HistoryUpdate::Unchanged;
            }
            Some(existing) => {
                existing.timestamp = entry.timestamp;
                HistoryUpdate::Refreshed
            }
            None => {
                self.records.push(entry);
                HistoryUpdate::Added
            }
        };
        self.trim(&server, &library_id);
        outcome
    }

    fn trim(&mut self, server: &str, library_id: &str) {
        let mut stamps: Vec<f64> = self
            .records
            .iter()
            .filter(|r| r.key_matches(server, library_id))
            .map(|r| r.timestamp)
            .collect();
        if stamps.len() <= POSTER_SLOTS {
            return;
        }
        stamps.sort_by(|a, b| b.total_cmp(a));
        let cutoff = stamps[POSTER_SLOTS - 1];
        let mut kept_at_cutoff = stamps[..POSTER_SLOTS].iter().filter(|&&t| t == cutoff).count();
        self.records.retain(|r| {
            if !r.key_matches(server, library_id) || r.timestamp > cutoff {
                return true;
            }
            if r.timestamp == cutoff && kept_at_cutoff > 0 {
                kept_at_cutoff -= 1;
                return true;
            }
            false
        });
    }

    /// Items of one library, newest first.
    pub fn library_items(&self, server: &str, library_id: &str) -> Vec<&HistoryRecord> {
        let mut items: Vec<&HistoryRecord> = self
            .records
            .iter()
            .filter(|r| r.key_matches(server, library_id))
            .collect();
        items.sort_by(|a, b| b.timestamp.total_cmp(&a.timestamp));
        items
    }

    /// Newest item of a library across all servers, if any.
    pub fn latest_in_library(&self, library_id: &str) -> Option<&HistoryRecord> {
        self.records
            .iter()
            .filter(|r| r.library_id == library_id)
            .max_by(|a, b| a.timestamp.total_cmp(&b.timestamp))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/history.rs"]
mod tests;
