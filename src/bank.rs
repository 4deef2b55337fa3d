// Delta-ray banking
//
// Every particle of an event (the primary and all delta electrons it spawns) passes
// through this FIFO before it is stepped. The cascade is a worklist, never recursion.

use crate::particle::Particle;
use std::collections::VecDeque;

/// Queue of particles waiting to be stepped within one event.
#[derive(Debug, Default)]
pub struct ParticleBank {
    queue: VecDeque<Particle>,
}

impl ParticleBank {
    pub fn new() -> Self {
        ParticleBank {
            queue: VecDeque::new(),
        }
    }

    /// Seed the bank with the primary of an event
    pub fn add_source_particle(&mut self, particle: Particle) {
        self.queue.push_back(particle);
    }

    /// Bank a delta electron produced by an inelastic collision
    pub fn bank_secondary(&mut self, particle: Particle) {
        self.queue.push_back(particle);
    }

    /// Next particle to step, `None` once the cascade is exhausted
    pub fn pop_particle(&mut self) -> Option<Particle> {
        self.queue.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }
}
