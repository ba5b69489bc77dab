//! Unified error types for the sequencing library.
//!
//! A single `Error` enum that every subsystem can convert into, keeping
//! the caller's power-path error handling uniform. All variants are
//! `Copy`: the failing resource's index rides in the variant, and its
//! name is logged at the failure site rather than carried around.
//!
//! Every failure surfaced here has already been fully recovered locally
//! (rollback in exact reverse order); nothing is fatal at this layer.
//! The caller decides whether to retry, abort the probe, or propagate.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A clock bring-up step failed (already rolled back).
    Clock(ClockError),
    /// A regulator configure/enable step failed (already rolled back).
    Regulator(RegulatorError),
    /// Descriptor/slot arrays are inconsistent, or a board profile is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clock(e) => write!(f, "clock: {e}"),
            Self::Regulator(e) => write!(f, "regulator: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Clock sequencing errors
// ---------------------------------------------------------------------------

/// Failures on the clock bring-up path. `index` is the position in the
/// descriptor array at which the sequence stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockError {
    /// Clock lookup by name failed (no such clock / controller absent).
    Acquire { index: usize },
    /// The target rate was rejected by the controller.
    SetRate { index: usize },
    /// The clock could not be turned on.
    Activate { index: usize },
}

impl ClockError {
    /// Position in the descriptor array at which the sequence failed.
    pub const fn index(self) -> usize {
        match self {
            Self::Acquire { index } | Self::SetRate { index } | Self::Activate { index } => index,
        }
    }
}

impl fmt::Display for ClockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Acquire { index } => write!(f, "acquire failed at index {index}"),
            Self::SetRate { index } => write!(f, "set rate failed at index {index}"),
            Self::Activate { index } => write!(f, "activate failed at index {index}"),
        }
    }
}

impl From<ClockError> for Error {
    fn from(e: ClockError) -> Self {
        Self::Clock(e)
    }
}

// ---------------------------------------------------------------------------
// Regulator sequencing errors
// ---------------------------------------------------------------------------

/// Failures on the regulator configure/enable paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegulatorError {
    /// Regulator lookup by name failed.
    Acquire { index: usize },
    /// The voltage range was rejected (LDO rails only).
    SetVoltage { index: usize },
    /// The load current was rejected (LDO rails only).
    SetLoad { index: usize },
    /// The rail could not be switched on.
    Enable { index: usize },
    /// Enable attempted on a slot that was never acquired.
    InvalidHandle { index: usize },
}

impl RegulatorError {
    /// Position in the descriptor array at which the sequence failed.
    pub const fn index(self) -> usize {
        match self {
            Self::Acquire { index }
            | Self::SetVoltage { index }
            | Self::SetLoad { index }
            | Self::Enable { index }
            | Self::InvalidHandle { index } => index,
        }
    }
}

impl fmt::Display for RegulatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Acquire { index } => write!(f, "acquire failed at index {index}"),
            Self::SetVoltage { index } => write!(f, "set voltage failed at index {index}"),
            Self::SetLoad { index } => write!(f, "set load failed at index {index}"),
            Self::Enable { index } => write!(f, "enable failed at index {index}"),
            Self::InvalidHandle { index } => write!(f, "no handle at index {index}"),
        }
    }
}

impl From<RegulatorError> for Error {
    fn from(e: RegulatorError) -> Self {
        Self::Regulator(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
