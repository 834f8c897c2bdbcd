use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{CoverError, CoverResult};
use crate::pipeline::request::Title;

/// Library name to `[localized, latin]` title pairs.
///
/// Loading rejects entries with fewer than two strings; extra strings are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, Vec<String>>", into = "BTreeMap<String, Vec<String>>")]
pub struct TitleMap {
    entries: BTreeMap<String, (String, String)>,
}

impl TryFrom<BTreeMap<String, Vec<String>>> for TitleMap {
    type Error = CoverError;

    fn try_from(raw: BTreeMap<String, Vec<String>>) -> Result<Self, Self::Error> {
        let mut entries = BTreeMap::new();
        for (name, titles) in raw {
            let mut it = titles.into_iter();
            match (it.next(), it.next()) {
                (Some(localized), Some(latin)) => {
                    entries.insert(name, (localized, latin));
                }
                _ => {
                    return Err(CoverError::validation(format!(
                        "title entry '{name}' must list a localized and a latin title"
                    )));
                }
            }
        }
        Ok(Self { entries })
    }
}

impl From<TitleMap> for BTreeMap<String, Vec<String>> {
    fn from(map: TitleMap) -> Self {
        map.entries
            .into_iter()
            .map(|(name, (localized, latin))| (name, vec![localized, latin]))
            .collect()
    }
}

impl TitleMap {
    pub fn from_json(json: &str) -> CoverResult<Self> {
        serde_json::from_str(json).map_err(|e| CoverError::validation(format!("title map: {e}")))
    }

    pub fn insert(&mut self, library: impl Into<String>, localized: impl Into<String>, latin: impl Into<String>) {
        self.entries
            .insert(library.into(), (localized.into(), latin.into()));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact-name lookup. A miss yields an empty [`Title`]; composers apply their own fallback.
    pub fn resolve(&self, library_name: &str) -> Title {
        match self.entries.get(library_name) {
            Some((localized, latin)) => Title::new(localized.as_str(), latin.as_str()),
            None => {
                tracing::info!(library = library_name, "no title mapping for library");
                Title::default()
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/titles.rs"]
mod tests;
