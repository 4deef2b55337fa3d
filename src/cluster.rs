// Records produced by one event: clusters of electron-hole pairs, the stepped
// particles and the charges handed to the next stage of the detector chain.

use crate::geometry::SensorGeometry;
use crate::particle::ParticleType;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Electron-hole pairs created by one inelastic collision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub pairs: u32,
    /// Local position [mm]
    pub position: [f64; 3],
    /// Index of the generating particle in the event's MCParticle list
    pub particle: usize,
    /// Local time [ns]
    pub time: f64,
    /// Energy of the virtual photon [eV]
    pub energy: f64,
}

/// Charge carrier species of a deposit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CarrierType {
    Electron,
    Hole,
}

impl CarrierType {
    /// Sign of the carrier charge
    pub fn sign(self) -> i32 {
        match self {
            CarrierType::Electron => -1,
            CarrierType::Hole => 1,
        }
    }
}

/// Truth record of one particle stepped through the sensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MCParticle {
    pub local_start: [f64; 3],
    pub local_end: [f64; 3],
    pub global_start: [f64; 3],
    pub global_end: [f64; 3],
    pub particle_type: ParticleType,
    /// Kinetic energy [MeV] when the particle entered the queue
    pub energy_start: f64,
    /// Kinetic energy [MeV] when stepping stopped
    pub energy_end: f64,
    /// Sum of the photon energies [eV] this particle transferred
    pub energy_loss: f64,
    pub time_start: f64,
    pub time_end: f64,
    /// Index of the parent in the same event's list, `None` for the primary
    pub parent: Option<usize>,
}

impl MCParticle {
    /// Species code as used in steering files
    pub fn type_code(&self) -> u32 {
        self.particle_type.code()
    }

    /// Resolve the parent link against the event's particle list
    pub fn parent<'a>(&self, particles: &'a [MCParticle]) -> Option<&'a MCParticle> {
        self.parent.and_then(|index| particles.get(index))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositedCharge {
    pub carrier: CarrierType,
    pub charge: u32,
    pub local_position: [f64; 3],
    pub global_position: [f64; 3],
    pub local_time: f64,
    pub global_time: f64,
    /// Index of the particle that created the charge
    pub mc_particle: usize,
}

impl DepositedCharge {
    pub fn mc_particle<'a>(&self, particles: &'a [MCParticle]) -> Option<&'a MCParticle> {
        particles.get(self.mc_particle)
    }
}

/// Counters of one event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventSummary {
    pub steps: u64,
    pub inelastic: u64,
    pub elastic: u64,
    pub deltas: u64,
    /// Energy [eV] transferred in collisions minus what left as delta electrons
    pub total_energy_loss: f64,
    /// Energy [eV] converted into pairs locally
    pub ionization_energy: f64,
    pub pairs: u64,
    pub sum_pairs_squared: u64,
    pub clusters: usize,
    pub particles: usize,
}

impl EventSummary {
    pub fn rms_pairs(&self) -> f64 {
        (self.sum_pairs_squared as f64).sqrt()
    }

    /// Mean energy [eV] spent per pair, `None` without pairs
    pub fn energy_per_pair(&self) -> Option<f64> {
        (self.pairs > 0).then(|| self.ionization_energy / self.pairs as f64)
    }
}

/// Everything one call of the deposition model hands back
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DepositionOutput {
    pub mc_particles: Vec<MCParticle>,
    pub deposited_charges: Vec<DepositedCharge>,
    pub clusters: Vec<Cluster>,
    pub summary: EventSummary,
}

impl DepositionOutput {
    /// Total number of electron-hole pairs of the event
    pub fn total_pairs(&self) -> u64 {
        self.clusters.iter().map(|c| c.pairs as u64).sum()
    }

    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// One electron and one hole deposit per cluster, both carrying the cluster's pair
/// count.
pub fn charges_from_clusters<G: SensorGeometry + ?Sized>(
    clusters: &[Cluster],
    geometry: &G,
) -> Vec<DepositedCharge> {
    let mut charges = Vec::with_capacity(2 * clusters.len());
    for cluster in clusters {
        let local = Vector3::from(cluster.position);
        let global: [f64; 3] = geometry.local_to_global(&local).into();
        for carrier in [CarrierType::Electron, CarrierType::Hole] {
            charges.push(DepositedCharge {
                carrier,
                charge: cluster.pairs,
                local_position: cluster.position,
                global_position: global,
                local_time: cluster.time,
                global_time: cluster.time,
                mc_particle: cluster.particle,
            });
        }
    }
    charges
}
