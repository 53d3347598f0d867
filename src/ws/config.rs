#![expect(
    clippy::module_name_repetitions,
    reason = "Configuration types intentionally mirror the module name for clarity"
)]

use std::time::Duration;

use backoff::backoff::{Backoff, Constant};
use backoff::ExponentialBackoffBuilder;
use bon::Builder;

const DEFAULT_RECONNECT_INTERVAL_DURATION: Duration = Duration::from_secs(3);
const DEFAULT_MAX_RECONNECT_ATTEMPTS: u32 = 5;
const DEFAULT_INITIAL_BACKOFF_DURATION: Duration = Duration::from_secs(1);
const DEFAULT_MAX_BACKOFF_DURATION: Duration = Duration::from_secs(60);
const DEFAULT_BACKOFF_MULTIPLIER: f64 = 2.0;

/// Configuration for the real-time connection.
#[non_exhaustive]
#[derive(Debug, Clone, Default, Builder)]
pub struct Config {
    /// Topics announced in the connection URL and replayed after every (re)connect
    #[builder(default)]
    pub topics: Vec<String>,
    /// Reconnection strategy configuration
    #[builder(default)]
    pub reconnect: ReconnectConfig,
}

/// Configuration for automatic reconnection behavior.
#[non_exhaustive]
#[derive(Debug, Clone, Builder)]
pub struct ReconnectConfig {
    /// Maximum number of automatic reconnection attempts after an unexpected close.
    /// The counter resets on every successful open; `0` disables automatic reconnection.
    #[builder(default = DEFAULT_MAX_RECONNECT_ATTEMPTS)]
    pub max_attempts: u32,
    /// Delay policy between a close and the next attempt
    #[builder(default)]
    pub strategy: ReconnectStrategy,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_RECONNECT_ATTEMPTS,
            strategy: ReconnectStrategy::default(),
        }
    }
}

/// Delay applied before each automatic reconnection attempt.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum ReconnectStrategy {
    /// Same delay before every attempt
    Fixed(Duration),
    /// Jittered exponential backoff, reset on every successful open
    Exponential {
        /// Delay before the first attempt
        initial: Duration,
        /// Upper bound for any single delay
        max: Duration,
        /// Growth factor between consecutive delays
        multiplier: f64,
    },
}

impl Default for ReconnectStrategy {
    fn default() -> Self {
        Self::Fixed(DEFAULT_RECONNECT_INTERVAL_DURATION)
    }
}

impl ReconnectStrategy {
    /// Exponential backoff with the crate defaults (1s initial, 60s cap, doubling).
    #[must_use]
    pub fn exponential() -> Self {
        Self::Exponential {
            initial: DEFAULT_INITIAL_BACKOFF_DURATION,
            max: DEFAULT_MAX_BACKOFF_DURATION,
            multiplier: DEFAULT_BACKOFF_MULTIPLIER,
        }
    }

    /// Build the stateful delay generator for this strategy.
    pub(crate) fn backoff(&self) -> Box<dyn Backoff + Send> {
        match *self {
            Self::Fixed(interval) => Box::new(Constant::new(interval)),
            Self::Exponential {
                initial,
                max,
                multiplier,
            } => Box::new(
                ExponentialBackoffBuilder::default()
                    .with_initial_interval(initial)
                    .with_max_interval(max)
                    .with_multiplier(multiplier)
                    .with_max_elapsed_time(None) // attempts are bounded by max_attempts
                    .build(),
            ),
        }
    }

    /// Delay used when the generator yields nothing.
    pub(crate) fn fallback_delay(&self) -> Duration {
        match *self {
            Self::Fixed(interval) => interval,
            Self::Exponential { max, .. } => max,
        }
    }
}
