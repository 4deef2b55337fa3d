use crate::error::{Error, Result};
use crate::source::BeamSource;

/// Seed used when a run does not set one
pub const DEFAULT_SEED: u64 = 1;

#[derive(Debug, Clone)]
pub struct Settings {
    pub events: u64,
    pub seed: Option<u64>,
    /// Worker threads sharing the events of a run
    pub threads: usize,
    pub source: BeamSource,
}

impl Settings {
    pub fn new(events: u64, source: BeamSource) -> Self {
        Settings {
            events,
            seed: None,
            threads: 1,
            source,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed.unwrap_or(DEFAULT_SEED)
    }

    pub fn validate(&self) -> Result<()> {
        if self.threads == 0 {
            return Err(Error::InvalidConfig(
                "at least one worker thread is needed".to_string(),
            ));
        }
        self.source.validate()
    }
}
