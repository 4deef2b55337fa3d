// Locating the tabulated silicon data (HEPS, MACOM, EMERC).
//
// Tables are looked up by logical name. Search order: the paths given in the
// configuration (files or directories), then `<dir>/bichsel-mc/data` for every entry of
// $XDG_DATA_DIRS, then the user data directory.

use crate::config::DepositionConfig;
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::{Path, PathBuf};

/// Directory name below each data root
pub const PROJECT_NAME: &str = "bichsel-mc";
/// File extension of the data tables
pub const TABLE_SUFFIX: &str = "TAB";
/// Used when $XDG_DATA_DIRS is unset or empty
const DEFAULT_XDG_DATA_DIRS: &str = "/usr/local/share/:/usr/share/";

/// Source of named, line-oriented data tables
pub trait TableReader {
    fn open(&self, name: &str) -> Result<Box<dyn BufRead>>;
}

/// Ordered list of files and directories searched for `<NAME>.TAB`
#[derive(Debug, Clone, Default)]
pub struct DataDirectories {
    paths: Vec<PathBuf>,
}

impl DataDirectories {
    /// Only the given paths, no system locations
    pub fn with_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        DataDirectories {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Configured paths followed by the system and user data directories
    pub fn from_config(config: &DepositionConfig) -> Self {
        let mut paths = config.data_paths.clone();

        let xdg = std::env::var("XDG_DATA_DIRS")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_XDG_DATA_DIRS.to_string());
        for dir in xdg.split(':').filter(|d| !d.is_empty()) {
            let candidate = Path::new(dir).join(PROJECT_NAME).join("data");
            if candidate.is_dir() {
                log::trace!("Registered global data path: {}", candidate.display());
                paths.push(candidate);
            }
        }

        if let Some(user_dir) = dirs::data_dir() {
            let candidate = user_dir.join(PROJECT_NAME).join("data");
            if candidate.is_dir() {
                log::trace!("Registered user data path: {}", candidate.display());
                paths.push(candidate);
            }
        }

        DataDirectories { paths }
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// First file matching `name`, if any
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        self.paths.iter().find_map(|path| {
            if path.is_dir() {
                let mut entries: Vec<PathBuf> = std::fs::read_dir(path)
                    .ok()?
                    .filter_map(|entry| entry.ok().map(|e| e.path()))
                    .filter(|p| p.is_file())
                    .collect();
                entries.sort();
                entries.into_iter().find(|p| is_table_file(p, name))
            } else if path.is_file() && is_table_file(path, name) {
                Some(path.clone())
            } else {
                None
            }
        })
    }
}

fn is_table_file(path: &Path, name: &str) -> bool {
    let stem = path.file_stem().and_then(|s| s.to_str());
    let ext = path.extension().and_then(|s| s.to_str());
    stem == Some(name) && ext == Some(TABLE_SUFFIX)
}

impl TableReader for DataDirectories {
    fn open(&self, name: &str) -> Result<Box<dyn BufRead>> {
        let path = self.resolve(name).ok_or_else(|| Error::TableNotFound {
            name: name.to_string(),
        })?;
        log::trace!("Reading data file {}", path.display());
        let file = File::open(&path)?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Tables held as strings, keyed by logical name
#[derive(Debug, Clone, Default)]
pub struct InMemoryTables {
    tables: HashMap<String, String>,
}

impl InMemoryTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, contents: impl Into<String>) {
        self.tables.insert(name.to_string(), contents.into());
    }
}

impl TableReader for InMemoryTables {
    fn open(&self, name: &str) -> Result<Box<dyn BufRead>> {
        let text = self.tables.get(name).ok_or_else(|| Error::TableNotFound {
            name: name.to_string(),
        })?;
        Ok(Box::new(Cursor::new(text.clone().into_bytes())))
    }
}
