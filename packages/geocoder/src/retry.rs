//! Retry policy and attempt state machine for geocoding lookups.
//!
//! A lookup moves through
//!
//! ```text
//! Idle -> Attempting -> Resolved
//!              |
//!              +-> RetryWait -> Attempting -> ...
//!              |
//!              +-> Exhausted
//! ```
//!
//! The machine itself is pure: [`AttemptState::transition`] maps a state
//! and an [`AttemptEvent`] to the next state. The caller performs the
//! actual lookup and sleeps while in [`AttemptState::RetryWait`].

use std::time::Duration;

use ipc_dashboard_crime_models::GeocodedRegion;
use serde::Deserialize;

/// How many times to retry a failed lookup and how long to wait between
/// attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first one fails.
    pub max_retries: u32,
    /// Delay before the first retry; doubled for each subsequent retry.
    pub base_delay: Duration,
    /// Upper bound on a single delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(8),
        }
    }
}

impl RetryPolicy {
    /// A policy that retries `max_retries` times without waiting.
    #[must_use]
    pub const fn immediate(max_retries: u32) -> Self {
        Self {
            max_retries,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Total number of attempts, including the first.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Delay to wait after failed attempt number `attempt` (1-based).
    ///
    /// `base_delay * 2^(attempt - 1)`, capped at `max_delay`.
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        self.base_delay
            .checked_mul(1u32 << exponent)
            .map_or(self.max_delay, |d| d.min(self.max_delay))
    }
}

/// Retry settings as written in a service TOML file.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RetryConfig {
    /// Additional attempts after the first one fails.
    pub max_retries: u32,
    /// Delay before the first retry, in milliseconds.
    pub base_delay_ms: u64,
    /// Upper bound on a single delay, in milliseconds.
    pub max_delay_ms: u64,
}

impl From<RetryConfig> for RetryPolicy {
    fn from(config: RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: Duration::from_millis(config.base_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
        }
    }
}

/// Where a single lookup currently stands.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptState {
    /// No attempt made yet.
    Idle,
    /// Attempt number `attempt` (1-based) is in flight.
    Attempting {
        /// Current attempt number.
        attempt: u32,
    },
    /// Attempt `attempt` failed; waiting `delay` before the next one.
    RetryWait {
        /// The attempt that just failed.
        attempt: u32,
        /// How long to wait before retrying.
        delay: Duration,
    },
    /// The lookup succeeded.
    Resolved(GeocodedRegion),
    /// All attempts failed (or a failure was not retryable).
    Exhausted {
        /// Number of attempts made.
        attempts: u32,
    },
}

/// Inputs that drive [`AttemptState`] transitions.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptEvent {
    /// Begin the first attempt.
    Start,
    /// The in-flight attempt produced a result.
    Succeeded(GeocodedRegion),
    /// The in-flight attempt failed.
    Failed {
        /// Whether the failure is worth another attempt.
        retryable: bool,
    },
    /// The backoff delay has elapsed.
    WaitElapsed,
}

impl AttemptState {
    /// Returns the state that follows `self` on `event` under `policy`.
    ///
    /// Events that make no sense in the current state (e.g. `WaitElapsed`
    /// while attempting) leave the state unchanged.
    #[must_use]
    pub fn transition(self, event: AttemptEvent, policy: &RetryPolicy) -> Self {
        match (self, event) {
            (Self::Idle, AttemptEvent::Start) => Self::Attempting { attempt: 1 },
            (Self::Attempting { .. }, AttemptEvent::Succeeded(region)) => Self::Resolved(region),
            (Self::Attempting { attempt }, AttemptEvent::Failed { retryable }) => {
                if retryable && attempt < policy.max_attempts() {
                    Self::RetryWait {
                        attempt,
                        delay: policy.delay_after(attempt),
                    }
                } else {
                    Self::Exhausted { attempts: attempt }
                }
            }
            (Self::RetryWait { attempt, .. }, AttemptEvent::WaitElapsed) => Self::Attempting {
                attempt: attempt + 1,
            },
            (state, _) => state,
        }
    }

    /// Returns `true` for [`AttemptState::Resolved`] and
    /// [`AttemptState::Exhausted`].
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved(_) | Self::Exhausted { .. })
    }
}
