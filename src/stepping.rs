// Stepping of a primary and all of its delta electrons through the sensor.
//
// Every particle of an event is taken from a FIFO queue and stepped collision by
// collision until it is absorbed or its next step would leave the sensor. Inelastic
// collisions hand their virtual photon to the shell-ionization model; the resulting
// carriers are either converted into electron-hole pairs on the spot or queued as new
// delta electrons.

use crate::bank::ParticleBank;
use crate::cluster::{charges_from_clusters, Cluster, DepositionOutput, EventSummary, MCParticle};
use crate::collision::CollisionParameters;
use crate::config::DepositionConfig;
use crate::cross_sections::CrossSectionTables;
use crate::data_paths::DataDirectories;
use crate::error::Result;
use crate::geometry::SensorGeometry;
use crate::ionizer::ionize;
use crate::particle::{Particle, ParticleType};
use crate::physics::{
    convert_to_pairs, delta_emission_cosine, elastic_cosine, polar_direction,
    primary_deflection_cosine, rotate_to_frame,
};
use rand::Rng;
use std::f64::consts::PI;
use std::sync::Arc;

/// Particles below this kinetic energy [MeV] stop
pub const ABSORPTION_ENERGY: f64 = 1e-6;

/// Where a particle is in its life cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    AwaitingUpdate,
    Stepping,
    Inelastic,
    Elastic,
    Absorbed,
    Exited,
}

/// A particle while it is being stepped, with the bookkeeping for its MCParticle
struct Track {
    particle: Particle,
    index: usize,
    energy_start: f64,
    time_start: f64,
    energy_loss: f64,
    params: Option<CollisionParameters>,
}

/// Buffers owned by one event
#[derive(Default)]
struct EventState {
    bank: ParticleBank,
    clusters: Vec<Cluster>,
    summary: EventSummary,
}

/// The Bichsel straggling model: tables, configuration and the stepping engine.
#[derive(Debug, Clone)]
pub struct DepositionBichsel {
    tables: Arc<CrossSectionTables>,
    config: DepositionConfig,
    energy_threshold: f64,
}

impl DepositionBichsel {
    pub fn new(tables: Arc<CrossSectionTables>, config: DepositionConfig) -> Result<Self> {
        config.validate()?;
        let energy_threshold = config.energy_threshold();
        log::info!(
            "Bichsel deposition: pair threshold {:.4} eV, delta cut {} keV, {} pair counting",
            energy_threshold,
            config.delta_energy_cut * 1e3,
            if config.fast { "fast" } else { "slow" }
        );
        Ok(DepositionBichsel {
            tables,
            config,
            energy_threshold,
        })
    }

    /// Load the tables from the configured data paths
    pub fn from_config(config: DepositionConfig) -> Result<Self> {
        config.validate()?;
        let directories = DataDirectories::from_config(&config);
        let tables = CrossSectionTables::load(&directories)?;
        Self::new(Arc::new(tables), config)
    }

    pub fn tables(&self) -> &CrossSectionTables {
        &self.tables
    }

    pub fn config(&self) -> &DepositionConfig {
        &self.config
    }

    /// Pair-creation threshold [eV]
    pub fn energy_threshold(&self) -> f64 {
        self.energy_threshold
    }

    /// Step `primary` and every delta electron it produces through the sensor.
    pub fn deposit<G, R>(&self, primary: Particle, geometry: &G, rng: &mut R) -> DepositionOutput
    where
        G: SensorGeometry + ?Sized,
        R: Rng + ?Sized,
    {
        let mut event = EventState::default();
        event.bank.add_source_particle(primary);
        let mut mc_particles: Vec<MCParticle> = Vec::new();

        while let Some(particle) = event.bank.pop_particle() {
            // Nothing else is recorded while this particle is stepped, so its record
            // lands at the current end of the list.
            let mut track = Track {
                index: mc_particles.len(),
                energy_start: particle.energy(),
                time_start: particle.time(),
                energy_loss: 0.0,
                params: None,
                particle,
            };
            let state = self.step_track(&mut track, geometry, &mut event, rng);
            log::debug!(
                "Particle {} ({:?}, parent {:?}) {:?} after losing {:.3} keV",
                track.index,
                track.particle.particle_type(),
                track.particle.parent(),
                state,
                track.energy_loss * 1e-3
            );
            mc_particles.push(record(&track, geometry));
        }

        debug_assert!(mc_particles
            .iter()
            .enumerate()
            .all(|(i, p)| p.parent.map_or(true, |parent| parent < i)));

        let mut summary = event.summary;
        summary.particles = mc_particles.len();
        log::debug!(
            "Event: {} particles, {} steps, {} inelastic, {} elastic, {} deltas, energy loss {:.3} keV, ionization {:.3} keV, {} pairs (rms {:.1})",
            summary.particles,
            summary.steps,
            summary.inelastic,
            summary.elastic,
            summary.deltas,
            summary.total_energy_loss * 1e-3,
            summary.ionization_energy * 1e-3,
            summary.pairs,
            summary.rms_pairs()
        );

        let deposited_charges = charges_from_clusters(&event.clusters, geometry);
        DepositionOutput {
            mc_particles,
            deposited_charges,
            clusters: event.clusters,
            summary,
        }
    }

    fn step_track<G, R>(
        &self,
        track: &mut Track,
        geometry: &G,
        event: &mut EventState,
        rng: &mut R,
    ) -> StepState
    where
        G: SensorGeometry + ?Sized,
        R: Rng + ?Sized,
    {
        let mut state = if track.particle.energy() > 0.0 {
            StepState::AwaitingUpdate
        } else {
            StepState::Absorbed
        };

        loop {
            state = match state {
                StepState::AwaitingUpdate => {
                    let params = CollisionParameters::compute(&self.tables, &track.particle);
                    if params.last_bin.is_none() {
                        // Emax below the lowest tabulated transfer: elastic steps only
                        log::debug!(
                            "Particle {} at {} eV has no inelastic channel",
                            track.index,
                            track.particle.energy() * 1e6
                        );
                    }
                    track.params = Some(params);
                    StepState::Stepping
                }
                StepState::Stepping => self.propose_step(track, geometry, event, rng),
                StepState::Inelastic => self.inelastic(track, event, rng),
                StepState::Elastic => {
                    event.summary.elastic += 1;
                    if let Some(params) = &track.params {
                        let cost = elastic_cosine(params.screening, rng.gen());
                        let phi = 2.0 * PI * rng.gen::<f64>();
                        let direction = rotate_to_frame(
                            &track.particle.direction(),
                            &polar_direction(cost, phi),
                        );
                        track.particle.set_direction(direction);
                    }
                    StepState::Stepping
                }
                StepState::Absorbed | StepState::Exited => return state,
            };
        }
    }

    /// Draw the free path, check it against the sensor and choose the collision type.
    fn propose_step<G, R>(
        &self,
        track: &mut Track,
        geometry: &G,
        event: &mut EventState,
        rng: &mut R,
    ) -> StepState
    where
        G: SensorGeometry + ?Sized,
        R: Rng + ?Sized,
    {
        let params = match &track.params {
            Some(params) if !params.needs_update(track.particle.energy()) => params,
            _ => return StepState::AwaitingUpdate,
        };

        let mean_free_path = params.total_mean_free_path();
        let step = -(1.0 - rng.gen::<f64>()).ln() * mean_free_path * 10.0; // [mm]
        let candidate = track.particle.position_after(step);
        if !geometry.is_within_sensor(&candidate) {
            log::trace!(
                "Particle {} leaves the sensor from {:?}",
                track.index,
                track.particle.position()
            );
            return StepState::Exited;
        }

        track.particle.step(step);
        event.summary.steps += 1;

        if rng.gen::<f64>() > mean_free_path * params.elastic {
            StepState::Inelastic
        } else {
            StepState::Elastic
        }
    }

    fn inelastic<R: Rng + ?Sized>(
        &self,
        track: &mut Track,
        event: &mut EventState,
        rng: &mut R,
    ) -> StepState {
        event.summary.inelastic += 1;
        let Some(params) = track.params.as_mut() else {
            return StepState::AwaitingUpdate;
        };
        let Some(mut energy_gamma) = params.sample_energy_loss(&self.tables, rng) else {
            return StepState::Stepping;
        };

        let particle = &mut track.particle;
        let kinetic = particle.energy();
        let mut residual = kinetic - energy_gamma * 1e-6;
        if residual < self.config.delta_energy_cut {
            energy_gamma = kinetic * 1e6;
            residual = 0.0;
        }
        track.energy_loss += energy_gamma;
        event.summary.total_energy_loss += energy_gamma;

        let cost = delta_emission_cosine(energy_gamma, kinetic);
        let phi = 2.0 * PI * rng.gen::<f64>();
        let delta_direction = rotate_to_frame(&particle.direction(), &polar_direction(cost, phi));

        let carriers = if energy_gamma > self.energy_threshold {
            ionize(energy_gamma, rng)
        } else {
            Vec::new()
        };
        let pair_yield = convert_to_pairs(
            carriers,
            self.config.delta_energy_cut * 1e6,
            self.energy_threshold,
            self.config.fast,
            rng,
        );

        for &energy in &pair_yield.deltas {
            event.bank.bank_secondary(Particle::new(
                energy * 1e-6,
                particle.position(),
                delta_direction,
                ParticleType::Electron,
                particle.time(),
                Some(track.index),
            ));
            event.summary.deltas += 1;
            event.summary.total_energy_loss -= energy;
        }

        let pairs = pair_yield.pairs as u64;
        event.summary.pairs += pairs;
        event.summary.sum_pairs_squared += pairs * pairs;
        event.summary.ionization_energy += pair_yield.local_energy;
        if pair_yield.pairs > 0 {
            event.clusters.push(Cluster {
                pairs: pair_yield.pairs,
                position: particle.position().into(),
                particle: track.index,
                time: particle.time(),
                energy: energy_gamma,
            });
            event.summary.clusters += 1;
        }
        log::trace!(
            "Particle {}: Eg {:.2} eV, {} pairs, {} deltas, residual {:.6} MeV",
            track.index,
            energy_gamma,
            pair_yield.pairs,
            pair_yield.deltas.len(),
            residual
        );

        if self.config.deflect_primary && residual > 0.0 {
            let cos_deflection = primary_deflection_cosine(energy_gamma * 1e-6, kinetic);
            let direction = rotate_to_frame(
                &particle.direction(),
                &polar_direction(cos_deflection, phi + PI),
            );
            particle.set_direction(direction);
        }

        particle.set_energy(residual);
        if residual < ABSORPTION_ENERGY {
            return StepState::Absorbed;
        }
        if particle.particle_type() == ParticleType::Electron {
            params.refresh_electron_elastic(particle);
        }
        StepState::Stepping
    }
}

fn record<G: SensorGeometry + ?Sized>(track: &Track, geometry: &G) -> MCParticle {
    let particle = &track.particle;
    let start = particle.position_start();
    let end = particle.position();
    MCParticle {
        local_start: start.into(),
        local_end: end.into(),
        global_start: geometry.local_to_global(&start).into(),
        global_end: geometry.local_to_global(&end).into(),
        particle_type: particle.particle_type(),
        energy_start: track.energy_start,
        energy_end: particle.energy(),
        energy_loss: track.energy_loss,
        time_start: track.time_start,
        time_end: particle.time(),
        parent: particle.parent(),
    }
}
