// Kinematics of single collisions and the conversion of deposited energy into
// electron-hole pairs.

use crate::data::{ELECTRON_MASS, MEAN_PAIR_ENERGY, PHONON_COUPLING, PHONON_ENERGY};
use nalgebra::Vector3;
use rand::Rng;
use rand_distr::{Distribution, Poisson};

/// Direction with polar angle `acos(cos_theta)` and azimuth `phi` around the z axis.
pub fn polar_direction(cos_theta: f64, phi: f64) -> Vector3<f64> {
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    Vector3::new(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta)
}

/// Rotate `local`, given relative to `direction` as z axis, into the frame `direction` is
/// expressed in. The result is renormalized.
pub fn rotate_to_frame(direction: &Vector3<f64>, local: &Vector3<f64>) -> Vector3<f64> {
    let cz = direction.z;
    let sz = (1.0 - cz * cz).max(0.0).sqrt();
    let phif = direction.y.atan2(direction.x);
    let (sinf, cosf) = phif.sin_cos();
    Vector3::new(
        cz * cosf * local.x - sinf * local.y + sz * cosf * local.z,
        cz * sinf * local.x + cosf * local.y + sz * sinf * local.z,
        -sz * local.x + cz * local.z,
    )
    .normalize()
}

/// Cosine of the delta-ray emission angle for an energy transfer `energy_gamma` [eV] by a
/// particle of kinetic energy `kinetic` [MeV] (Penelope, Geant4). Clamped to 1.
pub fn delta_emission_cosine(energy_gamma: f64, kinetic: f64) -> f64 {
    let cost = (energy_gamma / (2.0 * ELECTRON_MASS * 1e6 + energy_gamma)
        * (kinetic + 2.0 * ELECTRON_MASS)
        / kinetic)
        .sqrt();
    cost.min(1.0)
}

/// Cosine of the deflection of the incoming particle after transferring `energy_loss`
/// [MeV] at kinetic energy `kinetic` [MeV] (penelope.f90).
pub fn primary_deflection_cosine(energy_loss: f64, kinetic: f64) -> f64 {
    let rb = kinetic + 2.0 * ELECTRON_MASS;
    let residual = (kinetic - energy_loss).max(0.0);
    (residual * rb / (kinetic * (rb - energy_loss))).sqrt().min(1.0)
}

/// Elastic scattering cosine for screening parameter `screening` and uniform `r`
/// (Chaoui 2006).
pub fn elastic_cosine(screening: f64, r: f64) -> f64 {
    1.0 - 2.0 * screening * r / (2.0 + screening - 2.0 * r)
}

/// First energy-share generator of the ionization cascade, built on the shape
/// 105/16 (1 - r)^2 sqrt(r) (integral 1, maximum 1.8782971).
pub fn gena1<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    loop {
        let r1: f64 = rng.gen();
        let r2: f64 = rng.gen();
        let alph1 = 105.0 / 16.0 * (1.0 - r1) * (1.0 - r1) * r1.sqrt();
        if alph1 <= 1.8783 * r2 {
            return r1;
        }
    }
}

/// Second energy-share generator, built on the shape 8/pi sqrt(r (1 - r)).
pub fn gena2<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    loop {
        let r1: f64 = rng.gen();
        let r2: f64 = rng.gen();
        let alph2 = 8.0 / std::f64::consts::PI * (r1 * (1.0 - r1)).sqrt();
        if alph2 <= 1.27324 * r2 {
            return r1;
        }
    }
}

/// Probability that a carrier of energy `energy` [eV] ionizes rather than emits a phonon
/// (Alig et al., PRB 22 (1980) 5565).
pub fn ionization_probability(energy: f64, threshold: f64) -> f64 {
    1.0 / (1.0
        + PHONON_COUPLING * 105.0 / (2.0 * std::f64::consts::PI) * (energy - PHONON_ENERGY).sqrt()
            / (energy - threshold).powf(3.5))
}

/// Outcome of converting the carriers of one inelastic collision
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PairYield {
    /// Electron-hole pairs created locally
    pub pairs: u32,
    /// Summed energy [eV] of the carriers kept locally
    pub local_energy: f64,
    /// Energies [eV] above the delta cut, to be followed as new electrons
    pub deltas: Vec<f64>,
}

/// Convert the carrier energies [eV] of a photoabsorption into pairs.
///
/// Energies above `delta_cut` [eV] are handed back as delta electrons. The rest is
/// either counted with Poisson statistics at 3.645 eV per pair (`fast`) or slowed down
/// by an explicit phonon / impact-ionization walk, whose secondaries re-enter the same
/// worklist.
pub fn convert_to_pairs<R: Rng + ?Sized>(
    mut carriers: Vec<f64>,
    delta_cut: f64,
    threshold: f64,
    fast: bool,
    rng: &mut R,
) -> PairYield {
    let mut result = PairYield::default();

    while let Some(mut energy) = carriers.pop() {
        if energy > delta_cut {
            result.deltas.push(energy);
            continue;
        }
        result.local_energy += energy;

        while !fast && energy > threshold {
            if rng.gen::<f64>() < ionization_probability(energy, threshold) {
                result.pairs += 1;
                let e1 = gena1(rng) * (energy - threshold);
                let e2 = gena2(rng) * (energy - threshold - e1);
                if e1 > threshold {
                    carriers.push(e1);
                }
                if e2 > threshold {
                    carriers.push(e2);
                }
                energy -= e1 + e2 + threshold;
            } else {
                energy -= PHONON_ENERGY;
            }
        }
    }

    if fast {
        result.pairs = poisson_pairs(result.local_energy, rng);
    }
    result
}

/// Poisson-distributed pair count for `energy` [eV]
pub fn poisson_pairs<R: Rng + ?Sized>(energy: f64, rng: &mut R) -> u32 {
    let mean = energy / MEAN_PAIR_ENERGY;
    match Poisson::new(mean) {
        Ok(poisson) if mean > 0.0 => {
            let n: f64 = poisson.sample(rng);
            n as u32
        }
        _ => 0,
    }
}
