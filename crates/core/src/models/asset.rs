use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Normalized identifier of a tracked asset (e.g. "bitcoin").
///
/// Always trimmed and lowercased, so equality is case-insensitive with
/// respect to whatever the user typed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AssetId(String);

impl AssetId {
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(CoreError::ValidationError(
                "Asset id must not be empty".into(),
            ));
        }
        if normalized.contains(',') {
            return Err(CoreError::ValidationError(format!(
                "Asset id '{normalized}' must not contain a comma"
            )));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for AssetId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<AssetId> for String {
    fn from(id: AssetId) -> Self {
        id.0
    }
}

impl std::str::FromStr for AssetId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Ordered, duplicate-free collection of the assets the user is watching.
///
/// Insertion order is display order. The set never shrinks below one
/// member: removing the last asset is refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<AssetId>", into = "Vec<AssetId>")]
pub struct TrackedSet {
    ids: Vec<AssetId>,
}

impl TrackedSet {
    /// Build a set from an initial list. Duplicates collapse onto their
    /// first occurrence; an empty list is rejected.
    pub fn new(ids: impl IntoIterator<Item = AssetId>) -> Result<Self, CoreError> {
        let mut set = Self { ids: Vec::new() };
        for id in ids {
            set.insert(id);
        }
        if set.ids.is_empty() {
            return Err(CoreError::ValidationError(
                "Tracked set needs at least one asset".into(),
            ));
        }
        Ok(set)
    }

    /// Parse and build from raw strings (e.g. `["bitcoin", "ethereum"]`).
    pub fn from_strs<S: AsRef<str>>(raw: &[S]) -> Result<Self, CoreError> {
        let ids = raw
            .iter()
            .map(|s| AssetId::parse(s.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(ids)
    }

    /// Append `id` unless it is already tracked. Returns true if it was added.
    pub fn insert(&mut self, id: AssetId) -> bool {
        if self.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Remove `id`, refusing to empty the set. Returns true if it was removed.
    pub fn remove(&mut self, id: &AssetId) -> bool {
        if !self.can_remove() {
            return false;
        }
        let before = self.ids.len();
        self.ids.retain(|existing| existing != id);
        self.ids.len() != before
    }

    pub fn contains(&self, id: &AssetId) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    /// Whether a removal could currently succeed.
    pub fn can_remove(&self) -> bool {
        self.ids.len() > 1
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Always false for a constructed set; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AssetId> {
        self.ids.iter()
    }

    pub fn as_slice(&self) -> &[AssetId] {
        &self.ids
    }

    /// Comma-joined ids, as the batch price endpoint expects them.
    pub fn joined(&self) -> String {
        join_ids(&self.ids)
    }
}

impl<'a> IntoIterator for &'a TrackedSet {
    type Item = &'a AssetId;
    type IntoIter = std::slice::Iter<'a, AssetId>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter()
    }
}

impl TryFrom<Vec<AssetId>> for TrackedSet {
    type Error = CoreError;

    fn try_from(ids: Vec<AssetId>) -> Result<Self, Self::Error> {
        Self::new(ids)
    }
}

impl From<TrackedSet> for Vec<AssetId> {
    fn from(set: TrackedSet) -> Self {
        set.ids
    }
}

impl Default for TrackedSet {
    fn default() -> Self {
        Self {
            ids: vec![
                AssetId("bitcoin".to_string()),
                AssetId("ethereum".to_string()),
            ],
        }
    }
}

pub fn join_ids(ids: &[AssetId]) -> String {
    ids.iter()
        .map(AssetId::as_str)
        .collect::<Vec<_>>()
        .join(",")
}
