//! Variable-name configuration for map files.

use serde::{Deserialize, Serialize};

use crate::map::MapKind;

/// Names to look for when pulling a surface variable and its coordinates out
/// of a file. Each list is tried in order and the first name present wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapVariables {
    pub ssh: Vec<String>,
    pub sst: Vec<String>,
    pub latitude: Vec<String>,
    pub longitude: Vec<String>,
}

impl Default for MapVariables {
    fn default() -> Self {
        Self {
            ssh: to_strings(&["adt", "sla", "zos", "ssh"]),
            sst: to_strings(&["analysed_sst", "sst"]),
            latitude: to_strings(&["lat", "latitude"]),
            longitude: to_strings(&["lon", "longitude"]),
        }
    }
}

impl MapVariables {
    /// Candidate data variable names for a map kind.
    pub fn candidates(&self, kind: MapKind) -> &[String] {
        match kind {
            MapKind::Ssh => &self.ssh,
            MapKind::Sst => &self.sst,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        for (label, list) in [
            ("ssh", &self.ssh),
            ("sst", &self.sst),
            ("latitude", &self.latitude),
            ("longitude", &self.longitude),
        ] {
            if list.iter().all(|name| name.trim().is_empty()) {
                return Err(format!("no {} variable names configured", label));
            }
        }
        Ok(())
    }
}

fn to_strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}
