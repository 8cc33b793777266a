//! Work unit module - one document collection awaiting enrichment

use std::fmt;
use std::path::PathBuf;

/// Identifier of a work unit
///
/// A unit is named by the entity collection (directory) it was found in and
/// its own source name (file name). The pair is unique within a corpus even
/// when two entities hold files with the same name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnitId {
    /// Entity collection the unit belongs to: its directory relative to
    /// the corpus root, `/`-separated
    pub collection: String,

    /// Source name of the unit (usually the file name)
    pub name: String,
}

impl UnitId {
    /// Create a new unit identifier
    ///
    /// # Examples
    ///
    /// ```
    /// use sift_domain::UnitId;
    ///
    /// let id = UnitId::new("acme", "messages.json");
    /// assert_eq!(id.to_string(), "acme/messages.json");
    /// ```
    pub fn new(collection: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.collection.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}/{}", self.collection, self.name)
        }
    }
}

/// A unit of work read from the corpus
///
/// Immutable once read. The raw source is decoded into message fragments by
/// the extractor; the domain never interprets it.
#[derive(Debug, Clone)]
pub struct WorkUnit {
    /// Identifier of the unit
    pub id: UnitId,

    /// Where the unit was read from
    pub path: PathBuf,

    /// Raw source text (a JSON array of fragments)
    pub source: String,
}

impl WorkUnit {
    /// Create a work unit from an id and raw source, with no backing file
    pub fn in_memory(id: UnitId, source: impl Into<String>) -> Self {
        Self {
            path: PathBuf::from(id.to_string()),
            id,
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_id_display_without_collection() {
        let id = UnitId::new("", "loose.json");
        assert_eq!(id.to_string(), "loose.json");
    }

    #[test]
    fn test_unit_ids_distinguish_collections() {
        let a = UnitId::new("alpha", "1.json");
        let b = UnitId::new("beta", "1.json");
        assert_ne!(a, b);
    }

    #[test]
    fn test_in_memory_unit_path() {
        let unit = WorkUnit::in_memory(UnitId::new("acme", "a.json"), "[]");
        assert_eq!(unit.path, PathBuf::from("acme/a.json"));
        assert_eq!(unit.source, "[]");
    }
}
