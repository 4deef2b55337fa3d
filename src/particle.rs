use crate::data::SPEED_OF_LIGHT;
use crate::error::{Error, Result};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Species that can be stepped through the sensor.
///
/// The integer codes follow the enumeration used in steering files: 1 proton,
/// 2 pion, 3 kaon, 4 electron, 5 muon, 6-9 ions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticleType {
    Proton,
    Pion,
    Kaon,
    Electron,
    Muon,
    Helium,
    Lithium,
    Carbon,
    Iron,
}

impl ParticleType {
    pub fn from_code(code: u32) -> Result<Self> {
        match code {
            1 => Ok(ParticleType::Proton),
            2 => Ok(ParticleType::Pion),
            3 => Ok(ParticleType::Kaon),
            4 => Ok(ParticleType::Electron),
            5 => Ok(ParticleType::Muon),
            6 => Ok(ParticleType::Helium),
            7 => Ok(ParticleType::Lithium),
            8 => Ok(ParticleType::Carbon),
            9 => Ok(ParticleType::Iron),
            other => Err(Error::UnknownParticle(other)),
        }
    }

    pub fn code(self) -> u32 {
        match self {
            ParticleType::Proton => 1,
            ParticleType::Pion => 2,
            ParticleType::Kaon => 3,
            ParticleType::Electron => 4,
            ParticleType::Muon => 5,
            ParticleType::Helium => 6,
            ParticleType::Lithium => 7,
            ParticleType::Carbon => 8,
            ParticleType::Iron => 9,
        }
    }

    /// Rest mass [MeV]
    pub fn mass(self) -> f64 {
        match self {
            ParticleType::Proton => 938.2723,
            ParticleType::Pion => 139.578,
            ParticleType::Kaon => 493.67,
            ParticleType::Electron => 0.51099906,
            ParticleType::Muon => 105.65932,
            ParticleType::Helium => 3727.379,
            ParticleType::Lithium => 6533.833,
            ParticleType::Carbon => 11174.862,
            ParticleType::Iron => 52089.77,
        }
    }

    /// Charge number (absolute value)
    pub fn charge(self) -> f64 {
        match self {
            ParticleType::Helium => 2.0,
            ParticleType::Lithium => 3.0,
            ParticleType::Carbon => 6.0,
            ParticleType::Iron => 26.0,
            _ => 1.0,
        }
    }
}

/// A particle being stepped through the sensor, in local coordinates.
///
/// Lengths are in mm, times in ns and energies in MeV. The kinematic quantities are
/// cached and refreshed through [`Particle::set_energy`].
#[derive(Debug, Clone)]
pub struct Particle {
    position_start: Vector3<f64>,
    position: Vector3<f64>,
    direction: Vector3<f64>,
    time: f64,
    parent: Option<usize>,
    energy: f64,
    particle_type: ParticleType,
    gamma: f64,
    beta_squared: f64,
    momentum: f64,
    velocity: f64,
}

impl Particle {
    /// Create a particle at `position` moving along `direction` (normalized here).
    pub fn new(
        energy: f64,
        position: Vector3<f64>,
        direction: Vector3<f64>,
        particle_type: ParticleType,
        time: f64,
        parent: Option<usize>,
    ) -> Self {
        let mut particle = Self {
            position_start: position,
            position,
            direction: direction.normalize(),
            time,
            parent,
            energy,
            particle_type,
            gamma: 1.0,
            beta_squared: 0.0,
            momentum: 0.0,
            velocity: 0.0,
        };
        particle.update();
        particle
    }

    pub fn position(&self) -> Vector3<f64> {
        self.position
    }

    pub fn position_start(&self) -> Vector3<f64> {
        self.position_start
    }

    pub fn direction(&self) -> Vector3<f64> {
        self.direction
    }

    /// Replace the direction; the vector is renormalized to absorb rounding drift.
    pub fn set_direction(&mut self, direction: Vector3<f64>) {
        self.direction = direction.normalize();
    }

    /// Position after moving `step` mm along the current direction.
    pub fn position_after(&self, step: f64) -> Vector3<f64> {
        self.position + step * self.direction
    }

    /// Move by `step` mm and advance the local clock.
    pub fn step(&mut self, step: f64) {
        self.position = self.position_after(step);
        if self.velocity > 0.0 {
            self.time += step / self.velocity;
        }
    }

    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// Kinetic energy [MeV]
    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn set_energy(&mut self, energy: f64) {
        self.energy = energy.max(0.0);
        self.update();
    }

    pub fn particle_type(&self) -> ParticleType {
        self.particle_type
    }

    pub fn mass(&self) -> f64 {
        self.particle_type.mass()
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    pub fn beta_squared(&self) -> f64 {
        self.beta_squared
    }

    /// Momentum [MeV/c]
    pub fn momentum(&self) -> f64 {
        self.momentum
    }

    /// Velocity [mm/ns]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Local time [ns]
    pub fn time(&self) -> f64 {
        self.time
    }

    fn update(&mut self) {
        let mass = self.mass();
        self.gamma = self.energy / mass + 1.0;
        let beta_gamma = (self.gamma * self.gamma - 1.0).sqrt(); // p/m
        self.beta_squared = beta_gamma * beta_gamma / (1.0 + beta_gamma * beta_gamma);
        self.momentum = mass * beta_gamma;
        self.velocity = beta_gamma / self.gamma * SPEED_OF_LIGHT;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_particle_construction() {
        let p = Particle::new(
            1.0,
            Vector3::new(0.0, 1.0, 2.0),
            Vector3::new(0.0, 0.0, 2.0),
            ParticleType::Proton,
            0.5,
            None,
        );
        assert_eq!(p.position(), Vector3::new(0.0, 1.0, 2.0));
        assert_eq!(p.position_start(), p.position());
        assert_eq!(p.direction(), Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(p.energy(), 1.0);
        assert_eq!(p.time(), 0.5);
        assert!(p.parent().is_none());
    }

    #[test]
    fn test_kinematics_of_relativistic_electron() {
        let p = Particle::new(
            1.0,
            Vector3::zeros(),
            Vector3::z(),
            ParticleType::Electron,
            0.0,
            None,
        );
        let gamma = 1.0 / 0.51099906 + 1.0;
        assert!((p.gamma() - gamma).abs() < 1e-12);
        assert!((p.beta_squared() - (1.0 - 1.0 / (gamma * gamma))).abs() < 1e-12);
        assert!(p.beta_squared() < 1.0);
        // p^2 = T (T + 2m)
        let expected = (1.0f64 * (1.0 + 2.0 * 0.51099906)).sqrt();
        assert!((p.momentum() - expected).abs() < 1e-9);
        assert!(p.velocity() < SPEED_OF_LIGHT);
    }

    #[test]
    fn test_step_advances_time() {
        let mut p = Particle::new(
            100.0,
            Vector3::zeros(),
            Vector3::x(),
            ParticleType::Proton,
            0.0,
            Some(3),
        );
        let v = p.velocity();
        p.step(2.0);
        assert_eq!(p.position(), Vector3::new(2.0, 0.0, 0.0));
        assert!((p.time() - 2.0 / v).abs() < 1e-15);
        assert_eq!(p.position_start(), Vector3::zeros());
        assert_eq!(p.parent(), Some(3));
    }

    #[test]
    fn test_set_energy_updates_kinematics_and_clamps() {
        let mut p = Particle::new(
            10.0,
            Vector3::zeros(),
            Vector3::z(),
            ParticleType::Muon,
            0.0,
            None,
        );
        let gamma_before = p.gamma();
        p.set_energy(1.0);
        assert!(p.gamma() < gamma_before);
        p.set_energy(-1.0);
        assert_eq!(p.energy(), 0.0);
        assert_eq!(p.beta_squared(), 0.0);
    }

    #[test]
    fn test_particle_codes_round_trip() {
        for code in 1..=9 {
            let t = ParticleType::from_code(code).unwrap();
            assert_eq!(t.code(), code);
        }
        assert!(ParticleType::from_code(0).is_err());
        assert!(ParticleType::from_code(10).is_err());
    }

    #[test]
    fn test_ion_charges() {
        assert_eq!(ParticleType::Helium.charge(), 2.0);
        assert_eq!(ParticleType::Pion.charge(), 1.0);
    }
}
