//! Monte Carlo simulation of energy deposition in thin silicon sensors.
//!
//! Charged particles are stepped collision by collision using Bichsel's straggling
//! model; virtual photons are absorbed by the silicon shells following Mazziotta and
//! converted into electron-hole pairs, with energetic electrons followed as delta rays.

pub mod bank;
pub mod bounding_box;
pub mod cluster;
pub mod collision;
pub mod config;
pub mod cross_sections;
pub mod data;
pub mod data_paths;
pub mod error;
pub mod fast_rng;
pub mod geometry;
pub mod ionizer;
pub mod model;
pub mod particle;
pub mod physics;
pub mod settings;
pub mod source;
pub mod stats;
pub mod stepping;
pub mod tally;
mod utilities;

pub use bank::ParticleBank;
pub use bounding_box::BoundingBox;
pub use cluster::{
    CarrierType, Cluster, DepositedCharge, DepositionOutput, EventSummary, MCParticle,
};
pub use collision::CollisionParameters;
pub use config::DepositionConfig;
pub use cross_sections::CrossSectionTables;
pub use data_paths::{DataDirectories, InMemoryTables, TableReader};
pub use error::{Error, Result};
pub use fast_rng::FastRng;
pub use geometry::{SensorBox, SensorGeometry};
pub use model::Model;
pub use particle::{Particle, ParticleType};
pub use settings::Settings;
pub use source::{BeamSource, SourcePlacement};
pub use stats::AngularDistribution;
pub use stepping::{DepositionBichsel, StepState};
pub use tally::{RunTally, SharedTally, Tally};
pub use utilities::interpolate_linear;
