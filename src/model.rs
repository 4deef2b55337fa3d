use crate::cluster::DepositionOutput;
use crate::error::{Error, Result};
use crate::fast_rng::FastRng;
use crate::geometry::SensorGeometry;
use crate::settings::Settings;
use crate::stepping::DepositionBichsel;
use crate::tally::{RunTally, SharedTally};
use rayon::prelude::*;

/// Deposition model, sensor and run settings bundled for running events.
#[derive(Debug, Clone)]
pub struct Model<G: SensorGeometry> {
    pub deposition: DepositionBichsel,
    pub geometry: G,
    pub settings: Settings,
}

impl<G: SensorGeometry + Sync> Model<G> {
    pub fn new(deposition: DepositionBichsel, geometry: G, settings: Settings) -> Result<Self> {
        settings.validate()?;
        Ok(Model {
            deposition,
            geometry,
            settings,
        })
    }

    /// Simulate event `event` on its own random stream. The result depends only on the
    /// run seed and the event number.
    pub fn run_event(&self, event: u64) -> Result<DepositionOutput> {
        let mut rng = FastRng::for_event(self.settings.seed(), event);
        let primary = self.settings.source.sample(&self.geometry, &mut rng)?;
        Ok(self.deposition.deposit(primary, &self.geometry, &mut rng))
    }

    /// Simulate all events of the run on a pool of `settings.threads` workers.
    pub fn run(&self) -> Result<RunTally> {
        let events = self.settings.events;
        let threads = self.settings.threads.max(1);
        log::info!(
            "Running {} events with seed {} on {} thread(s)",
            events,
            self.settings.seed(),
            threads
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| Error::InvalidConfig(format!("thread pool: {e}")))?;

        let tally = SharedTally::new();
        pool.install(|| {
            (0..events).into_par_iter().try_for_each(|event| -> Result<()> {
                let output = self.run_event(event)?;
                tally.score(&output.summary);
                Ok(())
            })
        })?;

        let tally = tally.into_inner();
        log::info!(
            "Run finished: {:.1} pairs, {:.2} clusters, {:.3} keV per event",
            tally.pairs.mean,
            tally.clusters.mean,
            tally.energy_loss.mean
        );
        Ok(tally)
    }
}
