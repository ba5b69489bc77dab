//! Simulated clock-tree and PMIC backends.
//!
//! Record every call so tests can assert on the exact command history,
//! count outstanding handles and active/enabled resources so tests can
//! assert leak-freedom after rollback, and inject failures per resource
//! name and operation.

use std::collections::BTreeSet;

use crate::ports::{BusError, ClockBus, RegulatorBus};

// ───────────────────────────────────────────────────────────────
// Clock bus
// ───────────────────────────────────────────────────────────────

/// Fallible clock operations a test can force to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ClockOp {
    Acquire,
    SetRate,
    Activate,
}

/// One recorded clock-bus call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClockCall {
    Acquire { name: String },
    SetRate { name: String, rate_hz: u64 },
    Activate { name: String },
    Deactivate { name: String },
    Release { name: String },
}

impl ClockCall {
    pub fn acquire(name: &str) -> Self {
        Self::Acquire { name: name.into() }
    }
    pub fn set_rate(name: &str, rate_hz: u64) -> Self {
        Self::SetRate { name: name.into(), rate_hz }
    }
    pub fn activate(name: &str) -> Self {
        Self::Activate { name: name.into() }
    }
    pub fn deactivate(name: &str) -> Self {
        Self::Deactivate { name: name.into() }
    }
    pub fn release(name: &str) -> Self {
        Self::Release { name: name.into() }
    }
}

/// Live handle to one simulated clock.
#[derive(Debug)]
pub struct SimClockHandle {
    name: String,
    active: bool,
}

impl SimClockHandle {
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// In-memory clock controller.
pub struct SimClockBus {
    known: BTreeSet<String>,
    fail: BTreeSet<(String, ClockOp)>,
    calls: Vec<ClockCall>,
    outstanding: usize,
    active: usize,
}

impl SimClockBus {
    /// A bus whose catalog contains exactly `names`.
    pub fn with_known(names: &[&str]) -> Self {
        Self {
            known: names.iter().map(|n| (*n).into()).collect(),
            fail: BTreeSet::new(),
            calls: Vec::new(),
            outstanding: 0,
            active: 0,
        }
    }

    /// Make every subsequent `op` on `name` fail.
    pub fn fail_on(&mut self, name: &str, op: ClockOp) {
        self.fail.insert((name.into(), op));
    }

    fn should_fail(&self, name: &str, op: ClockOp) -> bool {
        self.fail.contains(&(name.to_string(), op))
    }

    /// Full command history since construction or [`clear_calls`](Self::clear_calls).
    pub fn calls(&self) -> &[ClockCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Handles acquired and not yet released.
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    /// Clocks currently running.
    pub fn active(&self) -> usize {
        self.active
    }
}

impl ClockBus for SimClockBus {
    type Handle = SimClockHandle;

    fn acquire(&mut self, name: &str) -> Result<Self::Handle, BusError> {
        self.calls.push(ClockCall::acquire(name));
        if !self.known.contains(name) || self.should_fail(name, ClockOp::Acquire) {
            return Err(BusError::NotFound);
        }
        self.outstanding += 1;
        Ok(SimClockHandle { name: name.into(), active: false })
    }

    fn set_rate(&mut self, handle: &mut Self::Handle, rate_hz: u64) -> Result<(), BusError> {
        self.calls.push(ClockCall::set_rate(&handle.name, rate_hz));
        if self.should_fail(&handle.name, ClockOp::SetRate) {
            return Err(BusError::OutOfRange);
        }
        Ok(())
    }

    fn activate(&mut self, handle: &mut Self::Handle) -> Result<(), BusError> {
        self.calls.push(ClockCall::activate(&handle.name));
        if self.should_fail(&handle.name, ClockOp::Activate) {
            return Err(BusError::Io);
        }
        if !handle.active {
            handle.active = true;
            self.active += 1;
        }
        Ok(())
    }

    fn deactivate(&mut self, handle: &mut Self::Handle) {
        self.calls.push(ClockCall::deactivate(&handle.name));
        if handle.active {
            handle.active = false;
            self.active -= 1;
        }
    }

    fn release(&mut self, handle: Self::Handle) {
        self.calls.push(ClockCall::release(&handle.name));
        // Releasing a still-active clock would leave it running with no
        // owner; count it as no longer tracked either way.
        if handle.active {
            self.active -= 1;
        }
        self.outstanding -= 1;
    }
}

// ───────────────────────────────────────────────────────────────
// Regulator bus
// ───────────────────────────────────────────────────────────────

/// Fallible regulator operations a test can force to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RegOp {
    Acquire,
    SetVoltage,
    SetLoad,
    Enable,
}

/// One recorded regulator-bus call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegulatorCall {
    Acquire { name: String },
    SetVoltage { name: String, min_uv: u32, max_uv: u32 },
    SetLoad { name: String, load_ua: u32 },
    Enable { name: String },
    Disable { name: String },
    Release { name: String },
}

impl RegulatorCall {
    pub fn acquire(name: &str) -> Self {
        Self::Acquire { name: name.into() }
    }
    pub fn set_voltage(name: &str, min_uv: u32, max_uv: u32) -> Self {
        Self::SetVoltage { name: name.into(), min_uv, max_uv }
    }
    pub fn set_load(name: &str, load_ua: u32) -> Self {
        Self::SetLoad { name: name.into(), load_ua }
    }
    pub fn enable(name: &str) -> Self {
        Self::Enable { name: name.into() }
    }
    pub fn disable(name: &str) -> Self {
        Self::Disable { name: name.into() }
    }
    pub fn release(name: &str) -> Self {
        Self::Release { name: name.into() }
    }
}

/// Live handle to one simulated rail.
#[derive(Debug)]
pub struct SimRegulatorHandle {
    name: String,
    enabled: bool,
}

impl SimRegulatorHandle {
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// In-memory PMIC.
pub struct SimRegulatorBus {
    known: BTreeSet<String>,
    fail: BTreeSet<(String, RegOp)>,
    calls: Vec<RegulatorCall>,
    outstanding: usize,
    enabled: usize,
}

impl SimRegulatorBus {
    /// A bus whose catalog contains exactly `names`.
    pub fn with_known(names: &[&str]) -> Self {
        Self {
            known: names.iter().map(|n| (*n).into()).collect(),
            fail: BTreeSet::new(),
            calls: Vec::new(),
            outstanding: 0,
            enabled: 0,
        }
    }

    /// Make every subsequent `op` on `name` fail.
    pub fn fail_on(&mut self, name: &str, op: RegOp) {
        self.fail.insert((name.into(), op));
    }

    fn should_fail(&self, name: &str, op: RegOp) -> bool {
        self.fail.contains(&(name.to_string(), op))
    }

    /// Full command history since construction or [`clear_calls`](Self::clear_calls).
    pub fn calls(&self) -> &[RegulatorCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Handles acquired and not yet released.
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    /// Rails currently switched on.
    pub fn enabled(&self) -> usize {
        self.enabled
    }
}

impl RegulatorBus for SimRegulatorBus {
    type Handle = SimRegulatorHandle;

    fn acquire(&mut self, name: &str) -> Result<Self::Handle, BusError> {
        self.calls.push(RegulatorCall::acquire(name));
        if !self.known.contains(name) || self.should_fail(name, RegOp::Acquire) {
            return Err(BusError::NotFound);
        }
        self.outstanding += 1;
        Ok(SimRegulatorHandle { name: name.into(), enabled: false })
    }

    fn set_voltage(
        &mut self,
        handle: &mut Self::Handle,
        min_uv: u32,
        max_uv: u32,
    ) -> Result<(), BusError> {
        self.calls.push(RegulatorCall::set_voltage(&handle.name, min_uv, max_uv));
        if self.should_fail(&handle.name, RegOp::SetVoltage) {
            return Err(BusError::OutOfRange);
        }
        Ok(())
    }

    fn set_load(&mut self, handle: &mut Self::Handle, load_ua: u32) -> Result<(), BusError> {
        self.calls.push(RegulatorCall::set_load(&handle.name, load_ua));
        if self.should_fail(&handle.name, RegOp::SetLoad) {
            return Err(BusError::Unsupported);
        }
        Ok(())
    }

    fn enable(&mut self, handle: &mut Self::Handle) -> Result<(), BusError> {
        self.calls.push(RegulatorCall::enable(&handle.name));
        if self.should_fail(&handle.name, RegOp::Enable) {
            return Err(BusError::Io);
        }
        if !handle.enabled {
            handle.enabled = true;
            self.enabled += 1;
        }
        Ok(())
    }

    fn disable(&mut self, handle: &mut Self::Handle) {
        self.calls.push(RegulatorCall::disable(&handle.name));
        if handle.enabled {
            handle.enabled = false;
            self.enabled -= 1;
        }
    }

    fn release(&mut self, handle: Self::Handle) {
        self.calls.push(RegulatorCall::release(&handle.name));
        if handle.enabled {
            self.enabled -= 1;
        }
        self.outstanding -= 1;
    }
}
