//! Static temple and slot reference data, loaded once at startup.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::models::{Temple, TimeSlot, TimeSlotError};

const BUILTIN_DATA: &str = include_str!("../data/temples.json");

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to read temple data from {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("temple data is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("temple data lists no temples")]
    Empty,

    #[error("duplicate temple id '{0}'")]
    DuplicateTemple(String),

    #[error("invalid slot '{slot}': {source}")]
    InvalidSlot {
        slot: String,
        source: TimeSlotError,
    },
}

#[derive(Deserialize)]
struct RegistryFile {
    temples: Vec<Temple>,
    #[serde(default)]
    slots: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct TempleRegistry {
    temples: Vec<Temple>,
    index: HashMap<String, usize>,
    slots: Vec<String>,
}

impl TempleRegistry {
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::from_json(BUILTIN_DATA)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, RegistryError> {
        let file: RegistryFile = serde_json::from_str(raw)?;
        Self::new(file.temples, file.slots)
    }

    pub fn new(temples: Vec<Temple>, slots: Vec<String>) -> Result<Self, RegistryError> {
        if temples.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut index = HashMap::with_capacity(temples.len());
        for (position, temple) in temples.iter().enumerate() {
            if index.insert(temple.id.clone(), position).is_some() {
                return Err(RegistryError::DuplicateTemple(temple.id.clone()));
            }
        }

        // Canonicalise so lookups match the "HH:MM - HH:MM" spelling clients send.
        let mut seen = HashSet::new();
        let mut canonical = Vec::with_capacity(slots.len());
        for slot in slots {
            let parsed = TimeSlot::parse(&slot)
                .map_err(|source| RegistryError::InvalidSlot { slot, source })?;
            let text = parsed.to_string();
            if seen.insert(text.clone()) {
                canonical.push(text);
            }
        }

        tracing::debug!(
            temples = temples.len(),
            slots = canonical.len(),
            "Temple registry loaded"
        );

        Ok(Self {
            temples,
            index,
            slots: canonical,
        })
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Temple> {
        self.index.get(id).and_then(|&i| self.temples.get(i))
    }

    pub fn temples(&self) -> &[Temple] {
        &self.temples
    }

    pub fn slots(&self) -> &[String] {
        &self.slots
    }

    pub fn is_bookable_slot(&self, slot: &str) -> bool {
        self.slots.iter().any(|s| s == slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temple(id: &str, name: &str) -> Temple {
        Temple {
            id: id.to_string(),
            name: name.to_string(),
            location: None,
            description: None,
        }
    }

    #[test]
    fn test_builtin_registry_loads() {
        let registry = TempleRegistry::builtin().unwrap();
        assert!(!registry.temples().is_empty());
        assert!(registry.is_bookable_slot("08:00 - 09:00"));
        assert_eq!(
            registry.find_by_id("somnath").map(|t| t.name.as_str()),
            Some("Somnath Temple")
        );
    }

    #[test]
    fn test_find_by_id_unknown_is_none() {
        let registry =
            TempleRegistry::new(vec![temple("a", "Alpha")], vec!["08:00 - 09:00".into()]).unwrap();
        assert!(registry.find_by_id("b").is_none());
        assert!(registry.find_by_id("").is_none());
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let err = TempleRegistry::new(vec![temple("a", "Alpha"), temple("a", "Again")], vec![])
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateTemple(id) if id == "a"));
    }

    #[test]
    fn test_rejects_empty_and_bad_slots() {
        assert!(matches!(
            TempleRegistry::new(vec![], vec![]),
            Err(RegistryError::Empty)
        ));
        assert!(matches!(
            TempleRegistry::new(vec![temple("a", "Alpha")], vec!["noon".into()]),
            Err(RegistryError::InvalidSlot { .. })
        ));
    }

    #[test]
    fn test_slots_are_deduplicated() {
        let registry = TempleRegistry::new(
            vec![temple("a", "Alpha")],
            vec!["08:00 - 09:00".into(), "08:00 - 09:00".into()],
        )
        .unwrap();
        assert_eq!(registry.slots().len(), 1);
    }
}
