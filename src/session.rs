use thiserror::Error;

pub const MAX_PLAYERS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundConfig {
    pub bpm: u16,
    pub round_secs: u32,
    pub player_count: usize,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            bpm: 112,
            round_secs: 60,
            player_count: 2,
        }
    }
}

impl RoundConfig {
    /// Milliseconds between scheduled beats. Only meaningful after
    /// `validate` has passed (a zero bpm would divide by zero).
    pub fn beat_interval_ms(&self) -> f64 {
        60_000.0 / self.bpm as f64
    }

    pub fn round_ms(&self) -> f64 {
        self.round_secs as f64 * 1000.0
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bpm == 0 {
            return Err(ConfigError::ZeroTempo);
        }
        if self.round_secs == 0 {
            return Err(ConfigError::ZeroDuration);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("tempo must be at least 1 bpm")]
    ZeroTempo,
    #[error("round length must be at least 1 second")]
    ZeroDuration,
}

/// Round lifecycle. Hits are only scored while the round is running
/// (LeadIn or Active) and inside the scoring window; transitions are
/// driven by `start`, the clock, and `stop` only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    Idle,
    LeadIn,
    Active,
    Ended,
}

impl RoundPhase {
    pub fn is_running(self) -> bool {
        matches!(self, RoundPhase::LeadIn | RoundPhase::Active)
    }
}
