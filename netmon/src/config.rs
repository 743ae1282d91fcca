use crate::Error;
use std::time::Duration;

/// Configuration for the [`Simulator`](crate::Simulator).
#[derive(Clone, Debug)]
pub struct Config {
    /// Seed of the generator shared by failure injection, traffic generation, reply
    /// amplification, and tie-breaking.
    pub seed: u64,

    /// Delay between two ticks when driven by a [`Monitor`](crate::driver::Monitor).
    pub tick_interval: Duration,

    /// Maximum number of consecutive ticks a packet may wait at one element.
    ///
    /// A packet that would wait longer is dropped.
    pub expiry: u32,

    /// Probability (per tick) that an endpoint generates new traffic.
    pub generation_probability: f64,

    /// Upper bound (inclusive) on the number of packets an endpoint generates in one tick.
    pub max_generated: usize,

    /// Upper bound (inclusive) on the number of extra replies a service sends per request.
    pub max_replies: usize,

    /// Probability (per element, per tick) that an OK element breaks.
    pub failure_probability: f64,

    /// Whether elements may break at random.
    pub failures_enabled: bool,

    /// Number of ticks to run at construction, without notifying observers.
    pub warmup: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: 666,
            tick_interval: Duration::from_millis(1_500),
            expiry: 10,
            generation_probability: 0.02,
            max_generated: 14,
            max_replies: 2,
            failure_probability: 1.0 / 3_000.0,
            failures_enabled: false,
            warmup: 40,
        }
    }
}

impl Config {
    pub(crate) fn validate(&self) -> Result<(), Error> {
        for probability in [self.generation_probability, self.failure_probability] {
            if !(0.0..=1.0).contains(&probability) {
                return Err(Error::InvalidProbability(probability));
            }
        }
        Ok(())
    }
}
