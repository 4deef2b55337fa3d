use crate::error::{Error, Result};
use crate::geometry::SensorGeometry;
use crate::particle::{Particle, ParticleType};
use crate::stats::AngularDistribution;
use nalgebra::Vector3;
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Where primaries enter the sensor
#[derive(Debug, Clone, PartialEq)]
pub enum SourcePlacement {
    /// Track in the x-z plane entering the back face at z = -thickness/2. The incidence
    /// angle defaults to atan(pitch / thickness), so the track crosses one pixel; the
    /// track midpoint is spread uniformly over one pitch.
    PixelTrack {
        /// Incidence angle [deg], ignored unless |angle| < 91
        angle: Option<f64>,
    },
    /// Explicit beam with Gaussian spot size [mm] in local x and y
    Beam {
        position: [f64; 3],
        angle: AngularDistribution,
        size: [f64; 2],
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct BeamSource {
    pub particle_type: ParticleType,
    /// Kinetic energy [MeV]
    pub energy: f64,
    /// Gaussian sigma of the kinetic energy [MeV]
    pub energy_spread: f64,
    pub placement: SourcePlacement,
}

impl BeamSource {
    pub fn new(particle_type: ParticleType, energy: f64) -> Self {
        Self {
            particle_type,
            energy,
            energy_spread: 0.0,
            placement: SourcePlacement::PixelTrack { angle: None },
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.energy >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "source energy must not be negative, got {} MeV",
                self.energy
            )));
        }
        if !(self.energy_spread >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "energy spread must not be negative, got {} MeV",
                self.energy_spread
            )));
        }
        if let SourcePlacement::Beam { size, .. } = &self.placement {
            if !(size[0] >= 0.0 && size[1] >= 0.0) {
                return Err(Error::InvalidConfig(format!(
                    "beam size must not be negative, got {:?} mm",
                    size
                )));
            }
        }
        Ok(())
    }

    /// Incidence angle [rad] of the pixel track for `geometry`
    pub fn track_angle<G: SensorGeometry + ?Sized>(&self, geometry: &G) -> f64 {
        match self.placement {
            SourcePlacement::PixelTrack { angle: Some(angle) } if angle.abs() < 91.0 => {
                angle.to_radians()
            }
            _ => (geometry.pixel_pitch() / geometry.sensor_thickness()).atan(),
        }
    }

    /// Draw one primary in local sensor coordinates.
    pub fn sample<G, R>(&self, geometry: &G, rng: &mut R) -> Result<Particle>
    where
        G: SensorGeometry + ?Sized,
        R: Rng + ?Sized,
    {
        let energy = if self.energy_spread > 0.0 {
            let normal = Normal::new(self.energy, self.energy_spread)
                .map_err(|e| Error::InvalidConfig(format!("energy spread: {e}")))?;
            normal.sample(rng).max(0.0)
        } else {
            self.energy
        };

        let (position, direction) = match &self.placement {
            SourcePlacement::PixelTrack { .. } => {
                let thickness = geometry.sensor_thickness();
                let turn = self.track_angle(geometry);
                let width = thickness * turn.tan();
                let xm = geometry.pixel_pitch() * (rng.gen::<f64>() - 0.5);
                (
                    Vector3::new(xm - 0.5 * width, 0.0, -0.5 * thickness),
                    Vector3::new(turn.sin(), 0.0, turn.cos()),
                )
            }
            SourcePlacement::Beam {
                position,
                angle,
                size,
            } => {
                let mut position = Vector3::from(*position);
                for (axis, &sigma) in size.iter().enumerate() {
                    if sigma > 0.0 {
                        let normal = Normal::new(0.0, sigma)
                            .map_err(|e| Error::InvalidConfig(format!("beam size: {e}")))?;
                        position[axis] += normal.sample(rng);
                    }
                }
                (position, angle.sample(rng))
            }
        };

        log::trace!(
            "Primary {:?} with {} MeV at {:?} along {:?}",
            self.particle_type,
            energy,
            position,
            direction
        );
        Ok(Particle::new(
            energy,
            position,
            direction,
            self.particle_type,
            0.0,
            None,
        ))
    }
}
