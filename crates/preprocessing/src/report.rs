//! Per-file and per-run accounting of accepted and rejected profiles.

use std::collections::BTreeMap;
use std::path::PathBuf;

use grid_processor::CacheStats;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::RejectReason;

/// What happened to the profiles of one file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    /// Profiles that made it into the dataset.
    pub accepted: usize,
    /// Rejected profiles by reason.
    pub rejected: BTreeMap<RejectReason, usize>,
    /// Profiles accepted before a fatal error discarded them.
    pub discarded: usize,
    /// Fatal error that ended processing of the file.
    pub error: Option<String>,
}

impl FileReport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn accept(&mut self) {
        self.accepted += 1;
    }

    pub fn reject(&mut self, reason: RejectReason) {
        *self.rejected.entry(reason).or_default() += 1;
    }

    /// Record a fatal error; anything accepted so far is discarded.
    pub fn fail(&mut self, error: impl ToString) {
        self.discarded += self.accepted;
        self.accepted = 0;
        self.error = Some(error.to_string());
    }

    pub fn rejected_total(&self) -> usize {
        self.rejected.values().sum()
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Totals for a whole run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub files: Vec<FileReport>,
    pub cache: CacheStats,
}

impl RunSummary {
    pub fn new(files: Vec<FileReport>, cache: CacheStats) -> Self {
        Self { files, cache }
    }

    pub fn accepted(&self) -> usize {
        self.files.iter().map(|f| f.accepted).sum()
    }

    pub fn rejected(&self) -> usize {
        self.files.iter().map(FileReport::rejected_total).sum()
    }

    /// Rejections across all files by reason.
    pub fn by_reason(&self) -> BTreeMap<RejectReason, usize> {
        let mut totals = BTreeMap::new();
        for file in &self.files {
            for (reason, count) in &file.rejected {
                *totals.entry(*reason).or_default() += count;
            }
        }
        totals
    }

    pub fn failed_files(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|f| f.is_failed())
    }

    /// Emit the summary through `tracing`.
    pub fn log(&self) {
        for file in &self.files {
            info!(
                file = %file.path.display(),
                accepted = file.accepted,
                rejected = file.rejected_total(),
                reasons = ?file.rejected,
                "File summary"
            );
        }
        for file in self.failed_files() {
            warn!(
                file = %file.path.display(),
                discarded = file.discarded,
                error = file.error.as_deref().unwrap_or_default(),
                "File discarded"
            );
        }
        info!(
            files = self.files.len(),
            failed = self.failed_files().count(),
            accepted = self.accepted(),
            rejected = self.rejected(),
            reasons = ?self.by_reason(),
            cache_hits = self.cache.hits,
            cache_misses = self.cache.misses,
            cache_hit_rate = self.cache.hit_rate(),
            "Preprocessing summary"
        );
    }
}
