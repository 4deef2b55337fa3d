// Collision parameters of a particle at its current kinetic energy.
//
// Inelastic: Bichsel's collision spectrum built from the dielectric tables, Sect. 3.3 of
// Rev. Mod. Phys. 43, 297 (1971). The four terms of the generalized oscillator strength
// are the distant transverse-free, longitudinal (Fano Eq. 46), transverse (Cherenkov-like)
// and close-collision contributions.
// Elastic: screened Rutherford with Moliere screening for electrons, a radiation-length
// estimate for heavier particles.

use crate::cross_sections::CrossSectionTables;
use crate::data::{
    ATOMIC_NUMBER, ATOMS_PER_CM3, CROSS_SECTION_PREFACTOR, ELECTRON_MASS,
    OSCILLATOR_STRENGTH_FACTOR, RADIATION_LENGTH, RYDBERG,
};
use crate::particle::{Particle, ParticleType};
use crate::utilities::first_exceeding;
use rand::Rng;

/// Parameters are recomputed once the energy drops below this fraction of the energy
/// they were computed at.
pub const UPDATE_FRACTION: f64 = 0.9;

#[derive(Debug, Clone)]
pub struct CollisionParameters {
    /// Inverse inelastic mean free path [1/cm]
    pub inelastic: f64,
    /// Inverse elastic mean free path [1/cm]
    pub elastic: f64,
    /// Screening parameter of the elastic angular distribution
    pub screening: f64,
    /// Normalized running integral of the collision spectrum over the populated bins
    pub cumulative: Vec<f64>,
    /// Highest populated bin, `None` when no inelastic collision is possible
    pub last_bin: Option<usize>,
    /// Maximum energy transfer [eV]
    pub max_energy_loss: f64,
    /// Mean energy loss per path length [eV/cm]
    pub stopping_power: f64,
    /// Kinetic energy the parameters belong to [MeV]
    pub energy: f64,
}

impl CollisionParameters {
    pub fn compute(tables: &CrossSectionTables, particle: &Particle) -> Self {
        let mass = particle.mass();
        let gamma = particle.gamma();
        let beta_squared = particle.beta_squared();
        let is_electron = particle.particle_type() == ParticleType::Electron;

        // Emax: Uehling, also Sternheimer & Peierls Eq. (53)
        let max_energy_loss_mev = if is_electron {
            0.5 * particle.energy()
        } else {
            mass * (gamma * gamma - 1.0)
                / (0.5 * mass / ELECTRON_MASS + 0.5 * ELECTRON_MASS / mass + gamma)
        };
        let max_energy_loss = max_energy_loss_mev * 1e6;

        let z = particle.particle_type().charge();
        let dec = z * z * ATOMS_PER_CM3 * CROSS_SECTION_PREFACTOR / beta_squared;
        let kinetic_ev = particle.energy() * 1e6;

        let n = tables.len();
        let mut spectrum = vec![0.0; n];
        let mut total = 0.0;
        let mut stopping_power = 0.0;
        let mut last_bin = None;

        for j in 0..n {
            let e = tables.energy[j];
            if e > max_energy_loss {
                break;
            }
            let df = tables.oscillator_strength[j];
            let eps1 = tables.dielectric_real[j];
            let eps2 = tables.dielectric_imag[j];

            let q1 = if e < 11.9 {
                tables.xkmn[j].powi(2) * RYDBERG
            } else if e < 100.0 {
                0.025f64.powi(2) * RYDBERG
            } else {
                RYDBERG
            };
            let qmin = e * e / (2.0 * ELECTRON_MASS * 1e6 * beta_squared);
            let distant = if e < 11.9 && q1 < qmin {
                0.0
            } else {
                e * df * (q1 / qmin).ln()
            };

            // Fano Eq. (47)
            let epbe = (1.0 - beta_squared * eps1).max(1e-20);
            let longitudinal = -0.5 * e * df * (epbe * epbe + (beta_squared * eps2).powi(2)).ln();

            // arctan approaches pi for beta^2 eps1 > 1
            let mut theta = (eps2 * beta_squared / epbe).atan();
            if theta < 0.0 {
                theta += std::f64::consts::PI;
            }
            let transverse = OSCILLATOR_STRENGTH_FACTOR
                * e
                * e
                * theta
                * (beta_squared - eps1 / (eps1 * eps1 + eps2 * eps2));

            // Uehling, Ann. Rev. Nucl. Sci. 4, 315 (1954), Eqs. 9 & 2
            let uef = if is_electron {
                1.0 + (e / (kinetic_ev - e)).powi(2)
                    + ((gamma - 1.0) / gamma * e / kinetic_ev).powi(2)
                    - (2.0 * gamma - 1.0) * e / (gamma * gamma * (kinetic_ev - e))
            } else {
                1.0 - e * beta_squared / max_energy_loss
            };
            // factor 2: the integral was over d(ln K) rather than d(ln Q)
            let close = 2.0 * tables.oscillator_strength_ae[j] * uef;

            let sig = distant + longitudinal + transverse + close;
            let de = tables.delta_energy[j];
            total += sig * de / (e * e);
            spectrum[j] = sig * dec / (e * e);
            stopping_power += spectrum[j] * e * de;
            last_bin = Some(j);
        }

        let mut cumulative = vec![0.0; n];
        let mut inelastic = total * dec;
        if let Some(last) = last_bin {
            let mut running = 0.0;
            for j in 0..=last {
                running += spectrum[j] * tables.delta_energy[j];
                cumulative[j] = running;
            }
            let norm = cumulative[last];
            if norm > 0.0 && inelastic > 0.0 {
                for value in cumulative.iter_mut().take(last + 1) {
                    *value /= norm;
                }
            } else {
                last_bin = None;
            }
        }
        if last_bin.is_none() {
            inelastic = 0.0;
            cumulative.iter_mut().for_each(|v| *v = 0.0);
        }

        let (elastic, screening) = if is_electron {
            electron_elastic(particle.energy(), particle.momentum())
        } else {
            let total_energy = particle.energy() + mass;
            let p2 = particle.momentum() * particle.momentum();
            let elastic = (2232.0 * RADIATION_LENGTH * (p2 / (total_energy * z)).powi(2))
                .min(10.0 * RADIATION_LENGTH);
            (elastic, 1.0)
        };

        log::trace!(
            "type {:?}, Ekin {} keV, beta {}, gamma {}, Emax {} eV, nlast {:?}, inelastic {} um, elastic {} um",
            particle.particle_type(),
            particle.energy() * 1e3,
            beta_squared.sqrt(),
            gamma,
            max_energy_loss,
            last_bin,
            if inelastic > 0.0 { 1e4 / inelastic } else { f64::INFINITY },
            1e4 / elastic
        );

        CollisionParameters {
            inelastic,
            elastic,
            screening,
            cumulative,
            last_bin,
            max_energy_loss,
            stopping_power,
            energy: particle.energy(),
        }
    }

    pub fn needs_update(&self, energy: f64) -> bool {
        energy < UPDATE_FRACTION * self.energy
    }

    /// Total mean free path [cm]
    pub fn total_mean_free_path(&self) -> f64 {
        1.0 / (self.inelastic + self.elastic)
    }

    /// Refresh the elastic part for an electron after it lost energy
    pub fn refresh_electron_elastic(&mut self, particle: &Particle) {
        let energy = particle.energy();
        let momentum = (energy * (energy + 2.0 * particle.mass())).sqrt();
        let (elastic, screening) = electron_elastic(energy, momentum);
        self.elastic = elastic;
        self.screening = screening;
    }

    /// Energy [eV] of the virtual photon of an inelastic collision, by inversion of the
    /// cumulative spectrum and uniformly within the selected bin.
    pub fn sample_energy_loss<R: Rng + ?Sized>(
        &self,
        tables: &CrossSectionTables,
        rng: &mut R,
    ) -> Option<f64> {
        let last = self.last_bin?;
        let yr: f64 = rng.gen();
        let bin = first_exceeding(&self.cumulative, 1, last, yr).min(tables.len() - 1);
        let low = tables.energy[bin - 1];
        let high = tables.energy[bin];
        Some(low + (high - low) * rng.gen::<f64>())
    }
}

/// Screened Rutherford cross section with Moliere screening: `(1/cm, screening)`.
pub fn electron_elastic(energy: f64, momentum: f64) -> (f64, f64) {
    let screening =
        2.0 * 2.61 * ATOMIC_NUMBER.powf(2.0 / 3.0) / (momentum * momentum) * 1e-6;
    let e2 = 14.4e-14; // [MeV cm]
    let ff = 0.5 * std::f64::consts::PI * e2 * e2 * ATOMIC_NUMBER * ATOMIC_NUMBER
        / (energy * energy);
    let s0el = 2.0 * ff / (screening * (2.0 + screening)); // [cm2/atom]
    (ATOMS_PER_CM3 * s0el, screening)
}
