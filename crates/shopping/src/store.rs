use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::canonical::canonicalize;
use crate::categorization::{CategorizationService, Category};
use crate::error::GroceryResult;
use crate::parser;
use crate::storage::{ChangeFeed, ListStorage, StorageChange};
use crate::units::{ReferenceAmount, to_reference_units};

/// Trim and collapse inner whitespace, keeping case
pub fn clean_for_store(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Dedup key: lowercase, whitespace-collapsed
pub fn normalized_key(text: &str) -> String {
    clean_for_store(text).to_lowercase()
}

/// One line on the grocery list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroceryEntry {
    display_text: String,
}

impl GroceryEntry {
    pub fn new(text: &str) -> Self {
        Self {
            display_text: clean_for_store(text),
        }
    }

    pub fn display_text(&self) -> &str {
        &self.display_text
    }

    pub fn normalized_key(&self) -> String {
        normalized_key(&self.display_text)
    }

    pub fn category(&self) -> Category {
        CategorizationService::categorize(&self.display_text)
    }

    /// Grams/ounces annotation when the text carries a convertible quantity
    pub fn conversion(&self) -> Option<ReferenceAmount> {
        let parsed = parser::parse(&self.display_text);
        to_reference_units(parsed.amount?, parsed.unit.as_deref()?)
    }
}

/// Decode a persisted list.
///
/// Returns `None` when the value is not a JSON array. Strings are cleaned,
/// objects contribute their string `name`, blanks and anything else are dropped.
pub fn decode_list(raw: &str) -> Option<Vec<GroceryEntry>> {
    let Ok(Value::Array(items)) = serde_json::from_str::<Value>(raw) else {
        return None;
    };

    let entries = items
        .iter()
        .filter_map(|item| match item {
            Value::String(text) => Some(text.as_str()),
            Value::Object(fields) => fields.get("name").and_then(Value::as_str),
            _ => None,
        })
        .map(GroceryEntry::new)
        .filter(|entry| !entry.display_text.is_empty())
        .collect();

    Some(entries)
}

pub fn encode_list(entries: &[GroceryEntry]) -> GroceryResult<String> {
    Ok(serde_json::to_string(entries)?)
}

/// Ordered, deduplicated grocery list bound to a storage collaborator.
///
/// Every mutation writes the full list back. Save failures are logged and the
/// in-memory list stays authoritative for this context.
pub struct GroceryList {
    entries: Vec<GroceryEntry>,
    /// Normalized keys of checked entries
    checked: HashSet<String>,
    storage: Box<dyn ListStorage>,
    changes: Option<Box<dyn ChangeFeed>>,
}

impl GroceryList {
    /// Load the list from storage. Missing, unreadable or malformed data
    /// yields an empty list.
    pub fn open(storage: impl ListStorage + 'static) -> Self {
        let entries = match storage.read() {
            Ok(Some(raw)) => decode_list(&raw).unwrap_or_else(|| {
                tracing::warn!("persisted grocery list is not a list, starting empty");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to load grocery list, starting empty");
                Vec::new()
            }
        };

        tracing::debug!(count = entries.len(), "grocery list loaded");

        Self {
            entries,
            checked: HashSet::new(),
            storage: Box::new(storage),
            changes: None,
        }
    }

    /// Load the list and subscribe to writes made by other contexts
    pub fn open_with_feed(
        storage: impl ListStorage + 'static,
        changes: impl ChangeFeed + 'static,
    ) -> Self {
        let mut list = Self::open(storage);
        list.changes = Some(Box::new(changes));
        list
    }

    pub fn entries(&self) -> &[GroceryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merge items into the list.
    ///
    /// With `preserve_quantities` the text is only whitespace-cleaned;
    /// otherwise it is canonicalized ("2 tbsp olive oil" → "Olive Oil").
    /// Duplicates of existing entries, and of earlier items in the same batch,
    /// are skipped. Returns how many entries were appended.
    pub fn add_many<I, S>(&mut self, items: I, preserve_quantities: bool) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen: HashSet<String> = self.entries.iter().map(|e| e.normalized_key()).collect();
        let mut added = 0;

        for item in items {
            let text = if preserve_quantities {
                clean_for_store(item.as_ref())
            } else {
                canonicalize(item.as_ref())
            };

            if text.is_empty() {
                continue;
            }

            if seen.insert(normalized_key(&text)) {
                self.entries.push(GroceryEntry::new(&text));
                added += 1;
            }
        }

        if added > 0 {
            tracing::debug!(added, total = self.entries.len(), "grocery items added");
            self.persist();
        }

        added
    }

    pub fn add_one(&mut self, item: &str) -> usize {
        self.add_many([item], false)
    }

    /// Remove the entry at `index`; out-of-range indexes are a no-op
    pub fn remove_at(&mut self, index: usize) -> bool {
        if index >= self.entries.len() {
            tracing::debug!(index, len = self.entries.len(), "remove index out of range");
            return false;
        }

        let removed = self.entries.remove(index);
        self.prune_checked();
        tracing::debug!(item = removed.display_text(), "grocery item removed");
        self.persist();
        true
    }

    /// Replace the text of the entry at `index` (explicit user edit).
    ///
    /// Refused when the index is out of range, the text is blank, or the new
    /// text would duplicate another entry.
    pub fn replace_at(&mut self, index: usize, text: &str) -> bool {
        let entry = GroceryEntry::new(text);
        if index >= self.entries.len() || entry.display_text.is_empty() {
            return false;
        }

        let key = entry.normalized_key();
        let collides = self
            .entries
            .iter()
            .enumerate()
            .any(|(i, e)| i != index && e.normalized_key() == key);
        if collides {
            tracing::debug!(index, text = entry.display_text(), "edit would duplicate an entry");
            return false;
        }

        let old_key = self.entries[index].normalized_key();
        if self.checked.remove(&old_key) {
            self.checked.insert(key);
        }
        self.entries[index] = entry;
        self.persist();
        true
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.checked.clear();
        tracing::debug!("grocery list cleared");
        self.persist();
    }

    pub fn has_item(&self, text: &str) -> bool {
        let key = normalized_key(text);
        self.entries.iter().any(|e| e.normalized_key() == key)
    }

    pub fn export_list(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|e| e.display_text.clone())
            .collect()
    }

    /// Import raw items, canonicalizing them like [`GroceryList::add_many`]
    pub fn import_list<I, S>(&mut self, items: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.add_many(items, false)
    }

    /// Flip the checked state of an entry. Returns the new state; unknown
    /// items are never checked.
    pub fn toggle_checked(&mut self, text: &str) -> bool {
        if !self.has_item(text) {
            return false;
        }

        let key = normalized_key(text);
        if self.checked.remove(&key) {
            false
        } else {
            self.checked.insert(key);
            true
        }
    }

    pub fn is_checked(&self, text: &str) -> bool {
        self.checked.contains(&normalized_key(text))
    }

    /// Uncheck everything, ready for the next shopping trip
    pub fn reset_checked(&mut self) {
        self.checked.clear();
    }

    /// Entries grouped by store section, in display order
    pub fn grouped(&self) -> Vec<(Category, Vec<&str>)> {
        CategorizationService::group_by_category(self.entries.iter().map(|e| e.display_text()))
    }

    /// Each entry with its grams/ounces annotation, when one exists
    pub fn conversions(&self) -> Vec<(&str, Option<ReferenceAmount>)> {
        self.entries
            .iter()
            .map(|e| (e.display_text(), e.conversion()))
            .collect()
    }

    /// Adopt a list written by another context.
    ///
    /// A removed value adopts an empty list; a value that is not a list is
    /// ignored. Returns whether the in-memory list was replaced.
    pub fn apply_external(&mut self, change: &StorageChange) -> bool {
        let entries = match change.new_value.as_deref() {
            None => Vec::new(),
            Some(raw) => match decode_list(raw) {
                Some(entries) => entries,
                None => {
                    tracing::warn!("ignoring external change that is not a list");
                    return false;
                }
            },
        };

        tracing::debug!(count = entries.len(), "adopting external grocery list");
        self.entries = entries;
        self.prune_checked();
        true
    }

    /// Drain pending change notifications. Returns how many were adopted.
    pub fn sync(&mut self) -> usize {
        let mut pending = Vec::new();
        if let Some(changes) = self.changes.as_mut() {
            while let Some(change) = changes.try_next() {
                pending.push(change);
            }
        }

        pending
            .iter()
            .filter(|change| self.apply_external(change))
            .count()
    }

    fn prune_checked(&mut self) {
        let keys: HashSet<String> = self.entries.iter().map(|e| e.normalized_key()).collect();
        self.checked.retain(|key| keys.contains(key));
    }

    fn persist(&self) {
        let result = encode_list(&self.entries).and_then(|raw| self.storage.write(&raw));
        if let Err(e) = result {
            tracing::warn!(error = %e, "failed to persist grocery list");
        }
    }
}
