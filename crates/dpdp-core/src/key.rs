//! # Section Key
//!
//! The composite `(chapter_id, number)` identifier used by the completion
//! state, the handlers, and every presentation surface.
//!
//! The textual form is `{chapter_id}-{number}` (e.g. `ch2-6`). Catalog
//! validation forbids `-` inside chapter ids, so the first `-` always
//! separates the two halves.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

use crate::error::DpdpError;

/// Separator between chapter id and section number in the textual form.
pub const KEY_SEPARATOR: char = '-';

/// Composite identifier of one section within the catalog.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SectionKey {
    chapter_id: String,
    number: String,
}

impl SectionKey {
    /// Build a key from its two halves.
    pub fn new(chapter_id: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            chapter_id: chapter_id.into(),
            number: number.into(),
        }
    }

    /// The owning chapter's id.
    pub fn chapter_id(&self) -> &str {
        &self.chapter_id
    }

    /// The section number.
    pub fn number(&self) -> &str {
        &self.number
    }
}

impl std::fmt::Display for SectionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.chapter_id, KEY_SEPARATOR, self.number)
    }
}

impl FromStr for SectionKey {
    type Err = DpdpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(KEY_SEPARATOR) {
            Some((chapter, number)) if !chapter.is_empty() && !number.is_empty() => {
                Ok(Self::new(chapter, number))
            }
            _ => Err(DpdpError::Parse(format!(
                "section key must look like <chapter>-<number>, got {s:?}"
            ))),
        }
    }
}

// Keys serialize as strings so they can be JSON object keys.
impl Serialize for SectionKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SectionKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_dash_form() {
        assert_eq!(SectionKey::new("ch2", "6").to_string(), "ch2-6");
    }

    #[test]
    fn parse_splits_on_first_dash() {
        let key: SectionKey = "ch9-44".parse().unwrap();
        assert_eq!(key.chapter_id(), "ch9");
        assert_eq!(key.number(), "44");

        let key: SectionKey = "ch1-2-a".parse().unwrap();
        assert_eq!(key.chapter_id(), "ch1");
        assert_eq!(key.number(), "2-a");
    }

    #[test]
    fn parse_rejects_malformed() {
        assert!("ch1".parse::<SectionKey>().is_err());
        assert!("-1".parse::<SectionKey>().is_err());
        assert!("ch1-".parse::<SectionKey>().is_err());
        assert!("".parse::<SectionKey>().is_err());
    }

    #[test]
    fn serde_as_string() {
        let key = SectionKey::new("ch3", "11");
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"ch3-11\"");
        let back: SectionKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }

    #[test]
    fn usable_as_json_map_key() {
        let mut map = std::collections::BTreeMap::new();
        map.insert(SectionKey::new("ch1", "1"), true);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"ch1-1":true}"#);
    }
}
