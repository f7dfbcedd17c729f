//! Turns profile files and map files into one aligned [`Dataset`].

use std::path::Path;
use std::sync::Arc;

use grid_processor::{interpolate_profile, CacheStats, MapCache, MapCropper, SurfaceWindow};
use netcdf_parser::{MapKind, MapReader};
use ocean_common::GridCell;
use profile_parser::{ProfileReader, RawProfile};
use rayon::prelude::*;
use tracing::{debug, error, info, instrument, warn};

use crate::catalog::{list_profile_files, MapCatalog};
use crate::config::PreprocessConfig;
use crate::dataset::{Dataset, DatasetBuilder, ProfileRow};
use crate::error::{PreprocessError, RejectReason, Result};
use crate::matcher::{MatchedMaps, Matcher};
use crate::report::{FileReport, RunSummary};

/// Result of processing one profile file.
///
/// A file that hit a fatal error carries no rows.
#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub report: FileReport,
    pub rows: Vec<ProfileRow>,
}

/// Orchestrates parsing, matching, interpolation and cropping.
///
/// Files are processed in parallel on a rayon pool, the records of one file
/// sequentially. Decoded maps are shared between workers through an LRU
/// cache keyed by kind and date.
pub struct DatasetAssembler {
    config: PreprocessConfig,
    ssh: MapCatalog,
    sst: MapCatalog,
    reader: Arc<dyn MapReader>,
    cache: MapCache,
    cropper: MapCropper,
    levels: Vec<f64>,
}

impl DatasetAssembler {
    /// Validate the configuration and index both map directories.
    pub fn new(config: PreprocessConfig, reader: Arc<dyn MapReader>) -> Result<Self> {
        config.validate()?;
        let ssh = MapCatalog::scan(&config.inputs.ssh_dir, MapKind::Ssh)?;
        let sst = MapCatalog::scan(&config.inputs.sst_dir, MapKind::Sst)?;
        Self::with_catalogs(config, ssh, sst, reader)
    }

    /// Build from catalogs that are already indexed.
    pub fn with_catalogs(
        config: PreprocessConfig,
        ssh: MapCatalog,
        sst: MapCatalog,
        reader: Arc<dyn MapReader>,
    ) -> Result<Self> {
        config.validate()?;
        let cache = MapCache::new(config.processing.cache.map_cache_entries);
        let cropper = MapCropper::new(config.processing.crop);
        let levels = config.processing.interpolation.grid().levels();

        Ok(Self {
            config,
            ssh,
            sst,
            reader,
            cache,
            cropper,
            levels,
        })
    }

    pub fn config(&self) -> &PreprocessConfig {
        &self.config
    }

    pub fn catalog(&self, kind: MapKind) -> &MapCatalog {
        match kind {
            MapKind::Ssh => &self.ssh,
            MapKind::Sst => &self.sst,
        }
    }

    /// Target pressure levels.
    pub fn levels(&self) -> &[f64] {
        &self.levels
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    fn matcher(&self) -> Matcher<'_> {
        Matcher::new(
            self.config.region(),
            self.config.grid.longitude,
            self.config.selection.period,
            &self.ssh,
            &self.sst,
        )
    }

    /// Process every profile file and assemble the dataset.
    ///
    /// Fails only for run-level problems: no input files, an unreadable
    /// profile directory, or a worker pool that cannot be built. Per-file
    /// failures are reported in the summary.
    pub fn run(&self) -> Result<(Dataset, RunSummary)> {
        let inputs = &self.config.inputs;
        let files = list_profile_files(&inputs.profile_dir, &inputs.profile_extension)?;

        info!(
            files = files.len(),
            ssh_maps = self.ssh.len(),
            sst_maps = self.sst.len(),
            levels = self.levels.len(),
            window_size = self.config.processing.crop.window_size,
            workers = self.config.workers,
            "Starting preprocessing"
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.workers)
            .thread_name(|i| format!("preprocess-{}", i))
            .build()
            .map_err(|e| PreprocessError::WorkerPool(e.to_string()))?;

        // Ordered collect keeps file order regardless of completion order
        let outcomes: Vec<FileOutcome> =
            pool.install(|| files.par_iter().map(|path| self.process_file(path)).collect());

        self.assemble(outcomes)
    }

    /// Concatenate outcomes, in the order given, into a dataset.
    pub fn assemble(&self, outcomes: Vec<FileOutcome>) -> Result<(Dataset, RunSummary)> {
        let mut builder = DatasetBuilder::new(&self.levels, self.config.processing.crop.window_size);
        let mut reports = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            builder.extend(outcome.rows)?;
            reports.push(outcome.report);
        }

        let dataset = builder.finish();
        let summary = RunSummary::new(reports, self.cache.stats());
        summary.log();
        Ok((dataset, summary))
    }

    /// Process one profile file. Never fails; a fatal error is recorded in
    /// the report and the file's rows are dropped.
    #[instrument(skip_all, fields(file = %path.display()))]
    pub fn process_file(&self, path: &Path) -> FileOutcome {
        let mut report = FileReport::new(path);

        let result = std::fs::read_to_string(path)
            .map_err(|source| PreprocessError::FileRead {
                path: path.to_path_buf(),
                source,
            })
            .and_then(|text| self.process_text(&text, path, &mut report));

        match result {
            Ok(rows) => {
                debug!(
                    accepted = report.accepted,
                    rejected = report.rejected_total(),
                    "Processed profile file"
                );
                FileOutcome { report, rows }
            }
            Err(e) => {
                error!(error = %e, accepted_before = report.accepted, "Discarding profile file");
                report.fail(&e);
                FileOutcome {
                    report,
                    rows: Vec::new(),
                }
            }
        }
    }

    /// Process the records of one file's text.
    ///
    /// Per-record problems are counted in `report`; per-file fatal errors
    /// are returned.
    pub fn process_text(
        &self,
        text: &str,
        path: &Path,
        report: &mut FileReport,
    ) -> Result<Vec<ProfileRow>> {
        let matcher = self.matcher();
        let mut rows = Vec::new();

        for item in ProfileReader::with_separator(text, &self.config.inputs.separator) {
            let raw = match item {
                Ok(raw) => raw,
                Err(source) => match RejectReason::from_parse_error(&source) {
                    Some(reason) => {
                        warn!(line = source.line(), error = %source, "Skipping malformed profile");
                        report.reject(reason);
                        continue;
                    }
                    None => {
                        return Err(PreprocessError::Parse {
                            path: path.to_path_buf(),
                            source,
                        })
                    }
                },
            };

            match self.process_record(&raw, &matcher) {
                Ok(row) => {
                    report.accept();
                    rows.push(row);
                }
                Err(PreprocessError::Rejected(reason)) => {
                    debug!(
                        line = raw.line,
                        date = %raw.header.observation_date,
                        lat = raw.header.latitude,
                        lon = raw.header.longitude,
                        reason = %reason,
                        "Profile rejected"
                    );
                    report.reject(reason);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(rows)
    }

    fn process_record(&self, raw: &RawProfile<'_>, matcher: &Matcher<'_>) -> Result<ProfileRow> {
        let header = &raw.header;
        let maps = matcher
            .match_header(header)
            .map_err(PreprocessError::Rejected)?;

        let record = raw.parse_samples().map_err(|e| {
            warn!(line = e.line(), error = %e, "Skipping profile with malformed data line");
            PreprocessError::Rejected(RejectReason::MalformedRecord)
        })?;

        let profile = interpolate_profile(
            &record.pressure,
            &record.salinity,
            &record.temperature,
            &self.config.processing.interpolation,
        )?;
        if !profile.is_complete() {
            return Err(PreprocessError::Rejected(RejectReason::Extrapolation));
        }

        let (ssh, sst) = self.crop_maps(&maps, header.latitude, header.longitude)?;

        let grid = &self.config.grid;
        let cell = GridCell::from_observation(
            header.observation_date,
            header.latitude,
            header.longitude,
            grid.epoch,
            grid.resolution,
            grid.longitude,
        );

        Ok(ProfileRow {
            cell,
            salinity: profile.salinity,
            temperature: profile.temperature,
            ssh,
            sst,
        })
    }

    fn crop_maps(
        &self,
        maps: &MatchedMaps<'_>,
        lat: f64,
        lon: f64,
    ) -> Result<(SurfaceWindow, SurfaceWindow)> {
        let ssh = self.crop_map(MapKind::Ssh, maps, lat, lon)?;
        let sst = self.crop_map(MapKind::Sst, maps, lat, lon)?;
        Ok((ssh, sst))
    }

    fn crop_map(
        &self,
        kind: MapKind,
        maps: &MatchedMaps<'_>,
        lat: f64,
        lon: f64,
    ) -> Result<SurfaceWindow> {
        let path = match kind {
            MapKind::Ssh => maps.ssh,
            MapKind::Sst => maps.sst,
        };
        let map = self
            .cache
            .get_or_load((kind, maps.date), || self.reader.read_map(path, kind))
            .map_err(|source| PreprocessError::MapRead {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(self.cropper.crop(&map, lat, lon)?)
    }
}
