//! Corpus traversal
//!
//! The corpus is a directory whose sub-directories are entity collections.
//! Every file with the configured extension inside a collection is one work
//! unit. Files lying directly in the corpus root belong to no entity and are
//! skipped. Units are yielded in file-system enumeration order, which is not
//! sorted and not guaranteed to be stable.

use crate::config::CorpusConfig;
use crate::error::ExtractorError;
use sift_domain::{UnitId, WorkUnit};
use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

/// A unit file found during the scan, not yet read
#[derive(Debug, Clone)]
struct UnitEntry {
    id: UnitId,
    path: PathBuf,
    position: usize,
    collection_size: usize,
}

/// Enumerates the work units of a corpus
///
/// The directory tree is scanned once up front; file contents are read
/// lazily, one unit per call to `next`.
///
/// # Examples
///
/// ```no_run
/// use sift_extractor::{CorpusConfig, CorpusWalker};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let walker = CorpusWalker::scan(&CorpusConfig::default())?;
/// println!("{} units", walker.len());
/// for unit in walker {
///     match unit {
///         Ok(unit) => println!("{}", unit.id),
///         Err(e) => eprintln!("{}", e),
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct CorpusWalker {
    entries: std::vec::IntoIter<UnitEntry>,
    total: usize,
    current_collection: Option<String>,
}

impl CorpusWalker {
    /// Scan the corpus described by `config`
    ///
    /// Fails only if the corpus root itself is missing or not a directory.
    /// Unreadable sub-directories are logged and skipped.
    pub fn scan(config: &CorpusConfig) -> Result<Self, ExtractorError> {
        Self::scan_dir(&config.data_dir, &config.extension)
    }

    /// Scan `root` for unit files with the given extension
    pub fn scan_dir(root: &Path, extension: &str) -> Result<Self, ExtractorError> {
        if !root.is_dir() {
            return Err(ExtractorError::Walk(format!(
                "{} is not a directory",
                root.display()
            )));
        }

        let mut entries = Vec::new();
        let mut sizes: HashMap<String, usize> = HashMap::new();

        for entry in WalkDir::new(root).min_depth(2) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable corpus entry: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let collection = collection_of(root, entry.path());

            // Every file counts towards the collection size, as progress is
            // reported against the whole directory listing
            let size = sizes.entry(collection.clone()).or_insert(0);
            *size += 1;
            let position = *size;

            if entry.path().extension() != Some(OsStr::new(extension)) {
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            entries.push(UnitEntry {
                id: UnitId::new(collection, name),
                path: entry.into_path(),
                position,
                collection_size: 0,
            });
        }

        for entry in &mut entries {
            entry.collection_size = sizes.get(&entry.id.collection).copied().unwrap_or(0);
        }

        let total = entries.len();
        Ok(Self {
            entries: entries.into_iter(),
            total,
            current_collection: None,
        })
    }

    /// Number of units found by the scan
    pub fn len(&self) -> usize {
        self.total
    }

    /// Whether the scan found no units
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    fn read(entry: UnitEntry) -> Result<WorkUnit, ExtractorError> {
        let source = fs::read_to_string(&entry.path).map_err(|e| {
            // Undecodable bytes are a property of the unit, not of the disk
            if e.kind() == std::io::ErrorKind::InvalidData {
                ExtractorError::malformed(&entry.id, format!("Not valid UTF-8: {}", e))
            } else {
                ExtractorError::Io {
                    path: entry.path.clone(),
                    source: e,
                }
            }
        })?;

        Ok(WorkUnit {
            id: entry.id,
            path: entry.path,
            source,
        })
    }
}

/// Directory of `path` relative to `root`, `/`-separated
///
/// Nested collections keep their full relative path so that `a/x/1.json`
/// and `b/x/1.json` stay distinct units.
fn collection_of(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .ok()
        .and_then(Path::parent)
        .map(|dir| {
            dir.components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/")
        })
        .unwrap_or_default()
}

impl Iterator for CorpusWalker {
    type Item = Result<WorkUnit, ExtractorError>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.entries.next()?;

        if self.current_collection.as_deref() != Some(entry.id.collection.as_str()) {
            info!("Processing collection: {}", entry.id.collection);
            self.current_collection = Some(entry.id.collection.clone());
        }
        info!(
            "Processing {}/{} ({})",
            entry.position, entry.collection_size, entry.id.name
        );

        Some(Self::read(entry))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}
