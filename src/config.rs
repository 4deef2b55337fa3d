// Configuration of the deposition model
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Parameters of the straggling model.
///
/// Deserializes from JSON; every field has a default so a steering file only needs to
/// list what it overrides. `energy_threshold` is derived from the temperature unless
/// given explicitly (Alig et al., PRB 22 (1980) 5565).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepositionConfig {
    /// Sensor temperature [K]
    pub temperature: f64,
    /// Energies above this cut [MeV] are followed as delta electrons
    pub delta_energy_cut: f64,
    /// Minimum photon energy [eV] that creates electron-hole pairs
    pub energy_threshold: Option<f64>,
    /// Poisson pair counting instead of the explicit phonon/ionization walk
    pub fast: bool,
    /// Deflect the generating particle on inelastic collisions
    pub deflect_primary: bool,
    /// Extra files or directories searched for the data tables, in order
    pub data_paths: Vec<PathBuf>,
}

impl Default for DepositionConfig {
    fn default() -> Self {
        DepositionConfig {
            temperature: 293.15,
            delta_energy_cut: 0.009,
            energy_threshold: None,
            fast: true,
            deflect_primary: false,
            data_paths: Vec::new(),
        }
    }
}

impl DepositionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: DepositionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Pair-creation threshold [eV].
    pub fn energy_threshold(&self) -> f64 {
        let t = self.temperature;
        self.energy_threshold
            .unwrap_or(1.5 * 1.17 - 4.73e-4 * t * t / (636.0 + t))
    }

    /// Reject physically meaningless parameters.
    pub fn validate(&self) -> Result<()> {
        if !(self.temperature > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "temperature must be positive, got {} K",
                self.temperature
            )));
        }
        if !(self.delta_energy_cut > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "delta_energy_cut must be positive, got {} MeV",
                self.delta_energy_cut
            )));
        }
        if let Some(threshold) = self.energy_threshold {
            if !(threshold > 0.0) {
                return Err(Error::InvalidConfig(format!(
                    "energy_threshold must be positive, got {} eV",
                    threshold
                )));
            }
        }
        Ok(())
    }
}
