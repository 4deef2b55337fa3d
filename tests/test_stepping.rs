mod common;

use bichsel_mc::{
    CarrierType, DepositionConfig, FastRng, Particle, ParticleType, SensorBox, SensorGeometry,
};
use nalgebra::{Rotation3, Vector3};

fn primary(energy: f64, particle_type: ParticleType, direction: Vector3<f64>) -> Particle {
    Particle::new(energy, Vector3::zeros(), direction, particle_type, 0.0, None)
}

/// Slab that is only `thickness` thick along z but unbounded in x and y
struct Slab {
    thickness: f64,
}

impl SensorGeometry for Slab {
    fn is_within_sensor(&self, local: &Vector3<f64>) -> bool {
        local.z.abs() <= 0.5 * self.thickness
    }

    fn local_to_global(&self, local: &Vector3<f64>) -> Vector3<f64> {
        local + Vector3::new(0.0, 0.0, 100.0)
    }

    fn sensor_thickness(&self) -> f64 {
        self.thickness
    }

    fn pixel_pitch(&self) -> f64 {
        0.025
    }
}

#[test]
fn test_electron_deposits_all_its_energy() {
    let model = common::deposition(DepositionConfig::default());
    let sensor = SensorBox::new([1.0, 1.0, 1.0], 0.05);
    for event in 0..5 {
        let mut rng = FastRng::for_event(21, event);
        let electron = primary(0.05, ParticleType::Electron, Vector3::z());
        let output = model.deposit(electron, &sensor, &mut rng);
        assert!(
            (output.summary.total_energy_loss - 5e4).abs() < 1e-3,
            "event {}: {} eV",
            event,
            output.summary.total_energy_loss
        );
        for p in &output.mc_particles {
            assert_eq!(p.energy_end, 0.0);
        }
        // photons of the primary plus its deltas cover exactly the primary energy
        let photons: f64 = output.mc_particles.iter().map(|p| p.energy_loss).sum();
        let deltas: f64 = output.mc_particles[1..].iter().map(|p| p.energy_start * 1e6).sum();
        assert!((photons - deltas - 5e4).abs() < 1e-3);
    }
}

#[test]
fn test_slow_counting_deposits_pairs() {
    let mut config = DepositionConfig::default();
    config.fast = false;
    let model = common::deposition(config);
    let sensor = SensorBox::new([1.0, 1.0, 1.0], 0.05);
    let mut rng = FastRng::new(22);
    let electron = primary(0.02, ParticleType::Electron, Vector3::z());
    let output = model.deposit(electron, &sensor, &mut rng);
    let pairs = output.summary.pairs as f64;
    // low-energy carriers lose more to phonons than the 3.645 eV average
    assert!(pairs > 2e4 / 5.5 && pairs < 2e4 / 3.0, "{} pairs", pairs);
    assert!(output.clusters.iter().all(|c| c.pairs > 0));
}

#[test]
fn test_first_step_outside_gives_one_record() {
    let model = common::deposition(DepositionConfig::default());
    // starts on the back face moving out of the slab
    let slab = Slab { thickness: 0.05 };
    let mut rng = FastRng::new(23);
    let start = Particle::new(
        100.0,
        Vector3::new(0.0, 0.0, -0.025),
        -Vector3::z(),
        ParticleType::Proton,
        0.0,
        None,
    );
    let output = model.deposit(start, &slab, &mut rng);
    assert_eq!(output.mc_particles.len(), 1);
    let proton = &output.mc_particles[0];
    assert_eq!(proton.local_start, proton.local_end);
    assert!((proton.global_start[2] - 99.975).abs() < 1e-12);
    assert_eq!(proton.energy_end, proton.energy_start);
    assert!(output.clusters.is_empty());
}

#[test]
fn test_crossing_track_records() {
    let model = common::deposition(DepositionConfig::default());
    let slab = Slab { thickness: 0.05 };
    let mut rng = FastRng::new(24);
    let output = model.deposit(
        Particle::new(
            120e3,
            Vector3::new(0.0, 0.0, -0.025),
            Vector3::new(0.3, 0.0, 1.0),
            ParticleType::Pion,
            0.0,
            None,
        ),
        &slab,
        &mut rng,
    );

    let pion = &output.mc_particles[0];
    assert_eq!(pion.particle_type, ParticleType::Pion);
    assert!(pion.parent.is_none());
    assert!(pion.local_end[2].abs() <= 0.025);
    assert!(pion.energy_end < pion.energy_start);
    // nothing travels faster than light between its start and end points
    let start = Vector3::from(pion.local_start);
    let end = Vector3::from(pion.local_end);
    let flight = pion.time_end - pion.time_start;
    assert!(flight * 299.792458 >= (end - start).norm() * (1.0 - 1e-9));

    assert_eq!(output.deposited_charges.len(), 2 * output.clusters.len());
    for (pair, cluster) in output.deposited_charges.chunks(2).zip(&output.clusters) {
        assert_eq!(pair[0].carrier, CarrierType::Electron);
        assert_eq!(pair[1].carrier, CarrierType::Hole);
        assert_eq!(pair[0].charge, cluster.pairs);
        assert_eq!(pair[1].local_time, cluster.time);
        assert_eq!(pair[0].global_position[2], cluster.position[2] + 100.0);
        let owner = pair[0].mc_particle(&output.mc_particles).unwrap();
        assert!(owner.time_start <= cluster.time && cluster.time <= owner.time_end);
    }
    for (i, p) in output.mc_particles.iter().enumerate().skip(1) {
        let parent = p.parent(&output.mc_particles).unwrap();
        assert!(p.parent.unwrap() < i);
        assert!(p.time_start >= parent.time_start);
    }
}

#[test]
fn test_placed_sensor_transforms_records() {
    let model = common::deposition(DepositionConfig::default());
    let sensor = SensorBox::new([1.0, 1.0, 0.05], 0.025).placed(
        Vector3::new(5.0, 0.0, 0.0),
        Rotation3::from_axis_angle(&Vector3::y_axis(), std::f64::consts::PI),
    );
    let mut rng = FastRng::new(25);
    let output = model.deposit(
        Particle::new(
            100.0,
            Vector3::new(0.0, 0.0, -0.025),
            Vector3::z(),
            ParticleType::Proton,
            0.0,
            None,
        ),
        &sensor,
        &mut rng,
    );
    let proton = &output.mc_particles[0];
    assert!((proton.global_start[0] - 5.0).abs() < 1e-12);
    assert!((proton.global_start[2] - 0.025).abs() < 1e-12);
    for charge in &output.deposited_charges {
        assert!((charge.global_position[2] + charge.local_position[2]).abs() < 1e-12);
    }
}

#[test]
fn test_primary_deflection_keeps_bookkeeping() {
    let mut config = DepositionConfig::default();
    config.deflect_primary = true;
    let model = common::deposition(config);
    let sensor = SensorBox::new([1.0, 1.0, 1.0], 0.05);
    let mut rng = FastRng::new(26);
    let electron = primary(0.05, ParticleType::Electron, Vector3::x());
    let output = model.deposit(electron, &sensor, &mut rng);
    assert!((output.summary.total_energy_loss - 5e4).abs() < 1e-3);
}
