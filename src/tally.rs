use crate::cluster::EventSummary;
use std::fmt;
use std::sync::Mutex;

/// Per-event scalar with running statistics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tally {
    pub name: String,
    pub units: String,
    /// Raw value per event, in the order the events were scored (completion order
    /// in a parallel run)
    pub event_data: Vec<f64>,
    pub mean: f64,
    /// Sample standard deviation of the per-event values
    pub std_dev: f64,
    /// Relative error of the mean
    pub rel_error: f64,
    pub n_events: u64,
}

impl Tally {
    pub fn with_name_and_units(name: &str, units: &str) -> Self {
        Self {
            name: name.to_string(),
            units: units.to_string(),
            ..Self::default()
        }
    }

    pub fn add_event(&mut self, value: f64) {
        self.event_data.push(value);
        self.update_statistics();
    }

    fn update_statistics(&mut self) {
        if self.event_data.is_empty() {
            self.mean = 0.0;
            self.std_dev = 0.0;
            self.rel_error = 0.0;
            self.n_events = 0;
            return;
        }

        let n = self.event_data.len() as f64;
        self.mean = self.event_data.iter().sum::<f64>() / n;
        let variance = self
            .event_data
            .iter()
            .map(|x| (x - self.mean).powi(2))
            .sum::<f64>()
            / (n - 1.0).max(1.0);
        self.std_dev = variance.sqrt();
        self.rel_error = if self.mean > 0.0 {
            self.std_dev / (self.mean * n.sqrt())
        } else {
            0.0
        };
        self.n_events = n as u64;
    }

    pub fn total(&self) -> f64 {
        self.event_data.iter().sum()
    }
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Tally name: {}", self.name)?;
        writeln!(f, "  Mean: {:.6} {} per event", self.mean, self.units)?;
        writeln!(f, "    Std Dev: {:.6}", self.std_dev)?;
        writeln!(
            f,
            "    Rel Error: {:.4} ({:.2}%)",
            self.rel_error,
            self.rel_error * 100.0
        )?;
        write!(f, "    Events: {}", self.n_events)
    }
}

/// Run-level statistics of pairs, clusters and energy loss per event
#[derive(Debug, Clone, PartialEq)]
pub struct RunTally {
    pub pairs: Tally,
    pub clusters: Tally,
    pub energy_loss: Tally,
}

impl Default for RunTally {
    fn default() -> Self {
        RunTally {
            pairs: Tally::with_name_and_units("Pairs", "pairs"),
            clusters: Tally::with_name_and_units("Clusters", "clusters"),
            energy_loss: Tally::with_name_and_units("Energy loss", "keV"),
        }
    }
}

impl RunTally {
    pub fn score(&mut self, summary: &EventSummary) {
        self.pairs.add_event(summary.pairs as f64);
        self.clusters.add_event(summary.clusters as f64);
        self.energy_loss.add_event(summary.total_energy_loss * 1e-3);
    }

    pub fn n_events(&self) -> u64 {
        self.pairs.n_events
    }
}

impl fmt::Display for RunTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.pairs)?;
        writeln!(f, "{}", self.clusters)?;
        write!(f, "{}", self.energy_loss)
    }
}

/// [`RunTally`] that several workers can score into
#[derive(Debug, Default)]
pub struct SharedTally(Mutex<RunTally>);

impl SharedTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self, summary: &EventSummary) {
        let mut tally = self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        tally.score(summary);
    }

    pub fn into_inner(self) -> RunTally {
        self.0
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    #[test]
    fn test_statistics() {
        let mut tally = Tally::with_name_and_units("Pairs", "pairs");
        for value in [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
            tally.add_event(value);
        }
        assert_eq!(tally.n_events, 8);
        assert!((tally.mean - 5.0).abs() < 1e-12);
        assert!((tally.std_dev - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
        assert!((tally.rel_error - tally.std_dev / (5.0 * 8f64.sqrt())).abs() < 1e-12);
        assert!((tally.total() - 40.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_event_has_no_spread() {
        let mut tally = Tally::with_name_and_units("Clusters", "clusters");
        tally.add_event(3.0);
        assert_eq!(tally.std_dev, 0.0);
        assert!(format!("{}", tally).contains("Clusters"));
    }

    #[test]
    fn test_shared_tally_across_threads() {
        let shared = SharedTally::new();
        (0..100u64).into_par_iter().for_each(|event| {
            let summary = EventSummary {
                pairs: 100 + event % 4,
                clusters: 10,
                total_energy_loss: 3645.0,
                ..EventSummary::default()
            };
            shared.score(&summary);
        });
        let tally = shared.into_inner();
        assert_eq!(tally.n_events(), 100);
        assert!((tally.pairs.mean - 101.5).abs() < 1e-12);
        assert!((tally.clusters.mean - 10.0).abs() < 1e-12);
        assert!((tally.energy_loss.mean - 3.645).abs() < 1e-12);
    }
}
