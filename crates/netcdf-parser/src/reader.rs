//! File readers producing [`SurfaceMap`]s.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::cdl::CdlDocument;
use crate::decode::decode_surface_map;
use crate::error::{NetCdfError, NetCdfResult};
use crate::map::{MapKind, SurfaceMap};
use crate::variables::MapVariables;

/// Source of decoded surface maps.
///
/// Implementations must be shareable across the worker pool.
pub trait MapReader: Send + Sync {
    fn read_map(&self, path: &Path, kind: MapKind) -> NetCdfResult<SurfaceMap>;
}

/// Whether a file holds CDL text rather than binary NetCDF.
pub fn is_cdl_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("cdl"))
        .unwrap_or(false)
}

/// Read a map from a CDL text file (saved `ncdump` output).
pub fn read_cdl_file(path: &Path, kind: MapKind, variables: &MapVariables) -> NetCdfResult<SurfaceMap> {
    let text = std::fs::read_to_string(path)?;
    let doc = CdlDocument::parse(&text)?;
    decode_surface_map(&doc, kind, variables)
}

/// Reads NetCDF files through the `ncdump` command-line tool.
///
/// Files with a `.cdl` extension are parsed directly without a subprocess.
#[derive(Debug, Clone)]
pub struct NcdumpReader {
    variables: MapVariables,
    command: PathBuf,
}

impl NcdumpReader {
    pub fn new(variables: MapVariables) -> Self {
        Self {
            variables,
            command: PathBuf::from("ncdump"),
        }
    }

    /// Use a specific `ncdump` executable.
    pub fn with_command(mut self, command: impl Into<PathBuf>) -> Self {
        self.command = command.into();
        self
    }

    pub fn variables(&self) -> &MapVariables {
        &self.variables
    }

    fn run_ncdump(&self, args: &[&str], path: &Path) -> NetCdfResult<String> {
        let output = Command::new(&self.command)
            .args(args)
            .arg(path)
            .output()
            .map_err(|e| {
                NetCdfError::Ncdump(format!("Failed to run {}: {}", self.command.display(), e))
            })?;

        if !output.status.success() {
            return Err(NetCdfError::Ncdump(format!(
                "ncdump failed on {}: {}",
                path.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl MapReader for NcdumpReader {
    fn read_map(&self, path: &Path, kind: MapKind) -> NetCdfResult<SurfaceMap> {
        if is_cdl_path(path) {
            return read_cdl_file(path, kind, &self.variables);
        }

        // The header tells which of the candidate names the file uses, so
        // only those variables are dumped.
        let header = CdlDocument::parse(&self.run_ncdump(&["-h"], path)?)?;
        let mut wanted = Vec::with_capacity(3);
        for names in [
            &self.variables.latitude,
            &self.variables.longitude,
            self.variables.candidates(kind),
        ] {
            let (name, _) = header.find_variable(names).ok_or_else(|| {
                NetCdfError::Missing(format!("none of {:?} in {}", names, path.display()))
            })?;
            wanted.push(name.to_string());
        }

        let selection = wanted.join(",");
        debug!(path = %path.display(), variables = %selection, "Dumping map variables");

        let text = self.run_ncdump(&["-v", &selection, "-p", "9,17"], path)?;
        let doc = CdlDocument::parse(&text)?;
        decode_surface_map(&doc, kind, &self.variables)
    }
}

/// Reader used when nothing else is configured.
pub fn default_reader(variables: MapVariables) -> Box<dyn MapReader> {
    #[cfg(feature = "native")]
    {
        Box::new(crate::native::NativeReader::new(variables))
    }
    #[cfg(not(feature = "native"))]
    {
        Box::new(NcdumpReader::new(variables))
    }
}
