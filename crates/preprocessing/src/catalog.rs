//! Indexes of input files: map files by date, profile files by name.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use netcdf_parser::MapKind;
use ocean_common::date_from_filename;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{PreprocessError, Result};

/// Extensions recognised as map files.
pub const MAP_EXTENSIONS: &[&str] = &["nc", "cdl"];

/// Map files of one kind, keyed by the date in their file name.
#[derive(Debug, Clone)]
pub struct MapCatalog {
    kind: MapKind,
    dir: PathBuf,
    files: BTreeMap<NaiveDate, PathBuf>,
}

impl MapCatalog {
    /// An empty catalog.
    pub fn new(kind: MapKind, dir: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            dir: dir.into(),
            files: BTreeMap::new(),
        }
    }

    /// Index the map files directly inside `dir`.
    ///
    /// Files are visited in name order. Files without a recognisable date
    /// are skipped; when two files carry the same date the first one wins.
    pub fn scan(dir: &Path, kind: MapKind) -> Result<Self> {
        let mut catalog = Self::new(kind, dir);
        for path in list_files(dir, MAP_EXTENSIONS)? {
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
            match date_from_filename(name) {
                Some(date) => {
                    catalog.insert(date, path);
                }
                None => debug!(kind = %kind, file = %path.display(), "No date in map file name"),
            }
        }

        if let Some((first, last)) = catalog.date_range() {
            info!(
                kind = %kind,
                dir = %dir.display(),
                maps = catalog.len(),
                first = %first,
                last = %last,
                "Indexed map files"
            );
        } else {
            warn!(kind = %kind, dir = %dir.display(), "No map files found");
        }

        Ok(catalog)
    }

    /// Register a file for `date`. Returns false, keeping the existing
    /// entry, if the date is already taken.
    pub fn insert(&mut self, date: NaiveDate, path: PathBuf) -> bool {
        if let Some(existing) = self.files.get(&date) {
            warn!(
                kind = %self.kind,
                date = %date,
                kept = %existing.display(),
                ignored = %path.display(),
                "Duplicate map date"
            );
            return false;
        }
        self.files.insert(date, path);
        true
    }

    /// The map file for exactly `date`.
    pub fn get(&self, date: NaiveDate) -> Option<&Path> {
        self.files.get(&date).map(PathBuf::as_path)
    }

    pub fn kind(&self) -> MapKind {
        self.kind
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// First and last indexed dates.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = *self.files.keys().next()?;
        let last = *self.files.keys().next_back()?;
        Some((first, last))
    }

    /// Indexed dates in ascending order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.files.keys().copied()
    }
}

/// Profile files directly inside `dir`, sorted by file name.
///
/// Fails if the directory holds no file with the given extension.
pub fn list_profile_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let files = list_files(dir, &[extension])?;
    if files.is_empty() {
        return Err(PreprocessError::NoInputFiles {
            dir: dir.to_path_buf(),
            extension: extension.to_string(),
        });
    }
    Ok(files)
}

/// Regular files directly inside `dir` whose extension matches one of
/// `extensions` (case-insensitive), in file name order.
fn list_files(dir: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(PreprocessError::MissingDirectory(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| PreprocessError::Scan {
            dir: dir.to_path_buf(),
            message: e.to_string(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let matches = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| extensions.iter().any(|want| e.eq_ignore_ascii_case(want)))
            .unwrap_or(false);
        if matches {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}
