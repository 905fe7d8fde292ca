use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Kind of source document, derived from its filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocType {
    Regular,
    Midseason,
    Final,
    PlayoffPreview,
    Lookback,
}

/// Filename-derived metadata for one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocMeta {
    pub filename: String,
    /// A year ("2024") or "special" for one-off documents.
    pub season: String,
    pub week: Option<u32>,
    #[serde(rename = "type")]
    pub doc_type: DocType,
}

/// Insertion-ordered string mapping. Serializes as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextMap(Vec<(String, String)>);

impl TextMap {
    pub fn new() -> Self {
        TextMap(Vec::new())
    }

    /// Insert unless the key is already present. Returns whether it was inserted.
    pub fn insert_first(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        let key = key.into();
        if self.contains_key(&key) {
            return false;
        }
        self.0.push((key, value.into()));
        true
    }

    /// Insert, replacing the value of an existing key in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    #[cfg(test)]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.iter().any(|(k, _)| k == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for TextMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tier {
    /// Text after "Tier N:".
    pub name: String,
    /// The whole heading line.
    pub full: String,
}

/// One ranked team inside a rankings document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamEntry {
    pub rank: u32,
    pub team_name: String,
    /// Canonical owner, empty when unresolved.
    pub owner: String,
    /// "LW rank" as printed in the document.
    pub previous_rank: Option<u32>,
    pub writeup: String,
    pub subsections: TextMap,
    pub tier: Option<String>,
    pub tier_full: Option<String>,
    pub tied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grouped_with: Option<Vec<String>>,
    /// Rank change against the previous document. Only set by the season pass.
    pub movement: Option<i32>,
}

impl TeamEntry {
    pub fn has_content(&self) -> bool {
        !self.writeup.trim().is_empty() || !self.subsections.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingDocument {
    pub title: String,
    pub intro: String,
    pub tiers: Vec<Tier>,
    pub teams: Vec<TeamEntry>,
    pub special_sections: TextMap,
    pub meta: DocMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LookbackEntry {
    pub rank: u32,
    pub owner: String,
    pub power_score: f64,
    pub writeup: String,
    pub comparison: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LookbackDocument {
    pub title: String,
    pub intro: String,
    pub entries: Vec<LookbackEntry>,
    pub meta: DocMeta,
}

/// Output of parsing one document; the grammar depends on `DocMeta::doc_type`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Document {
    Rankings(RankingDocument),
    Lookback(LookbackDocument),
}
