//! Error types surfaced by the engine and its configuration setters.

use thiserror::Error;

/// Errors produced while configuring or running a Markov chain engine.
///
/// Configuration errors are raised at the point of mis-configuration and
/// leave the prior configuration unchanged. Kernel failures are propagated
/// unmodified; the engine never retries or suppresses a failed transition.
#[derive(Debug, Error)]
pub enum McmcError {
    /// Thinning by zero would never record a sample.
    #[error("iterations per sample must be at least 1, got {0}")]
    InvalidIterationsPerSample(usize),

    /// A run of zero samples has no meaningful result.
    #[error("max samples must be at least 1, got {0}")]
    InvalidMaxSamples(usize),

    /// The engine was asked to run without an injected random generator.
    #[error("no random generator set; call set_seed or set_rng before initialize")]
    MissingRandomGenerator,

    /// A walk operation was called before `initialize`.
    #[error("engine has not been initialized")]
    NotInitialized,

    /// `previous_parameter` was called before the first sample was recorded.
    #[error("no sample has been recorded yet")]
    NoSampleRecorded,

    /// The transition kernel reported a failure.
    #[error("transition kernel failed: {0}")]
    Kernel(Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, McmcError>;
