//! Port traits — the boundary between the sequencing core and the platform.
//!
//! ```text
//!   Backend adapter ──▶ Bus trait ──▶ sequence / SensorPower (core)
//! ```
//!
//! Backends (sysfs shims, PMIC RPC clients, simulators) implement these
//! traits. The sequencers consume them via generics, so the core never
//! touches a real clock tree or PMIC directly.
//!
//! Handles are opaque associated types. The core stores them in
//! caller-owned `Option<Handle>` slots, where `None` models
//! "not yet acquired / already released". Teardown methods are
//! infallible by signature: a backend that cannot deactivate or release
//! cleanly must log and swallow the condition, because teardown failures
//! must never block device removal.

use core::fmt;

// ───────────────────────────────────────────────────────────────
// Backend error
// ───────────────────────────────────────────────────────────────

/// Errors a backend may return from the fallible (forward) operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusError {
    /// No resource with the requested name exists.
    NotFound,
    /// The requested rate, voltage range, or load is outside the
    /// resource's supported range.
    OutOfRange,
    /// The resource does not support the requested operation.
    Unsupported,
    /// The platform transport failed (bus stall, RPC error, ...).
    Io,
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "resource not found"),
            Self::OutOfRange => write!(f, "value out of supported range"),
            Self::Unsupported => write!(f, "operation not supported"),
            Self::Io => write!(f, "platform I/O error"),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Clock controller port
// ───────────────────────────────────────────────────────────────

/// Platform clock-tree access.
///
/// All calls are synchronous and may block on hardware/bus access.
pub trait ClockBus {
    /// Live reference to one clock. Dropping a handle without
    /// [`release`](Self::release) is a backend-defined leak.
    type Handle;

    /// Look up a clock by catalog name.
    fn acquire(&mut self, name: &str) -> Result<Self::Handle, BusError>;

    /// Program the clock to the given frequency.
    fn set_rate(&mut self, handle: &mut Self::Handle, rate_hz: u64) -> Result<(), BusError>;

    /// Turn the clock on.
    fn activate(&mut self, handle: &mut Self::Handle) -> Result<(), BusError>;

    /// Turn the clock off. Best-effort.
    fn deactivate(&mut self, handle: &mut Self::Handle);

    /// Return the handle to the platform. Best-effort.
    fn release(&mut self, handle: Self::Handle);
}

// ───────────────────────────────────────────────────────────────
// Regulator (PMIC) port
// ───────────────────────────────────────────────────────────────

/// Platform regulator access.
///
/// Acquisition/configuration and enable are deliberately separate
/// steps, mirroring real rails: a daemon configures every rail once at
/// probe, then may enable and disable the set repeatedly.
pub trait RegulatorBus {
    /// Live reference to one rail.
    type Handle;

    /// Look up a regulator by catalog name.
    fn acquire(&mut self, name: &str) -> Result<Self::Handle, BusError>;

    /// Constrain the output to `[min_uv, max_uv]` microvolts.
    fn set_voltage(
        &mut self,
        handle: &mut Self::Handle,
        min_uv: u32,
        max_uv: u32,
    ) -> Result<(), BusError>;

    /// Declare the expected load current in microamps (lets the PMIC
    /// pick an operating mode).
    fn set_load(&mut self, handle: &mut Self::Handle, load_ua: u32) -> Result<(), BusError>;

    /// Switch the rail on.
    fn enable(&mut self, handle: &mut Self::Handle) -> Result<(), BusError>;

    /// Switch the rail off. Best-effort.
    fn disable(&mut self, handle: &mut Self::Handle);

    /// Return the handle to the platform. Best-effort.
    fn release(&mut self, handle: Self::Handle);
}
