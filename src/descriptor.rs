//! Resource descriptors — the per-board description of what to sequence.
//!
//! Descriptors are immutable, caller-supplied, and order-significant:
//! acquisition runs in index order, release in exact reverse. They carry
//! no runtime state; live handles go in the parallel slot arrays owned
//! by the caller (see [`crate::sequence`]).

use serde::{Deserialize, Serialize};

/// Resource names as they appear in the platform's clock/regulator
/// catalogs (e.g. `cam_mclk`, `cam_vdig`).
pub type ResourceName = heapless::String<32>;

/// A named clock source with an optional target frequency.
///
/// `rate_hz: None` leaves the clock at whatever rate the platform
/// defaulted it to; `Some(hz)` programs the rate between acquisition
/// and activation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockDesc {
    pub name: ResourceName,
    pub rate_hz: Option<u64>,
}

/// Regulator variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegulatorKind {
    /// Fixed-output rail; enable/disable only.
    Fixed,
    /// Linear regulator with a programmable output range and load current.
    Ldo,
}

/// A named voltage rail.
///
/// `min_uv`/`max_uv` bound the output range and `load_ua` is the
/// expected load current; both are programmed on [`RegulatorKind::Ldo`]
/// rails only and ignored for [`RegulatorKind::Fixed`]. On teardown an
/// LDO is returned to zero load and a `[0, max_uv]` range before its
/// handle is released.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegulatorDesc {
    pub name: ResourceName,
    pub kind: RegulatorKind,
    pub min_uv: u32,
    pub max_uv: u32,
    pub load_ua: u32,
}

impl RegulatorDesc {
    /// Whether this rail takes voltage/load programming.
    pub fn is_ldo(&self) -> bool {
        self.kind == RegulatorKind::Ldo
    }
}
