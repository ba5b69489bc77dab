//! Whole-sensor power orchestration.
//!
//! [`SensorPower`] owns the slot arrays for one sensor and drives the
//! full bring-up path in the order real sensor drivers use: configure
//! regulators, switch the rails on, then bring up the clocks. Teardown
//! runs the exact reverse. A failure in a later stage rolls the earlier
//! stages back before the error is surfaced, so the buses are always
//! left with zero owned resources after a failed `power_up`.

use log::{debug, info};

use crate::config::{BoardProfile, MAX_CLOCKS, MAX_REGULATORS};
use crate::error::{Error, Result};
use crate::ports::{ClockBus, RegulatorBus};
use crate::sequence::{clock, regulator};

/// Power state for one sensor, generic over the backends' handle types.
///
/// Not `Sync`/`Clone` on purpose: one value per sensor, and the caller
/// serializes power transitions (typically under its device lock).
pub struct SensorPower<CH, RH> {
    profile: BoardProfile,
    clock_slots: heapless::Vec<Option<CH>, MAX_CLOCKS>,
    reg_slots: heapless::Vec<Option<RH>, MAX_REGULATORS>,
    powered: bool,
}

impl<CH, RH> SensorPower<CH, RH> {
    /// Build from a validated profile. Slot arrays are sized to the
    /// profile up front and never reallocate.
    pub fn new(profile: BoardProfile) -> Result<Self> {
        profile.validate().map_err(|e| match e {
            crate::config::ProfileError::Validation(msg) => Error::Config(msg),
            crate::config::ProfileError::Parse => Error::Config("profile parse failed"),
        })?;

        let mut clock_slots = heapless::Vec::new();
        for _ in 0..profile.clocks.len() {
            let _ = clock_slots.push(None);
        }
        let mut reg_slots = heapless::Vec::new();
        for _ in 0..profile.regulators.len() {
            let _ = reg_slots.push(None);
        }

        Ok(Self {
            profile,
            clock_slots,
            reg_slots,
            powered: false,
        })
    }

    pub fn profile(&self) -> &BoardProfile {
        &self.profile
    }

    pub fn is_powered(&self) -> bool {
        self.powered
    }

    /// Full bring-up: configure rails, switch them on, start clocks.
    ///
    /// Idempotent: calling on an already-powered sensor is a no-op, so
    /// a daemon retrying a probe path cannot double-acquire.
    pub fn power_up<CB, RB>(&mut self, clocks: &mut CB, regulators: &mut RB) -> Result<()>
    where
        CB: ClockBus<Handle = CH>,
        RB: RegulatorBus<Handle = RH>,
    {
        if self.powered {
            debug!("{}: already powered", self.profile.sensor);
            return Ok(());
        }

        regulator::configure(regulators, &self.profile.regulators, &mut self.reg_slots, true)?;

        if let Err(e) =
            regulator::power(regulators, &self.profile.regulators, &mut self.reg_slots, true)
        {
            let _ =
                regulator::configure(regulators, &self.profile.regulators, &mut self.reg_slots, false);
            return Err(e);
        }

        if let Err(e) = clock::apply(clocks, &self.profile.clocks, &mut self.clock_slots, true) {
            let _ =
                regulator::power(regulators, &self.profile.regulators, &mut self.reg_slots, false);
            let _ =
                regulator::configure(regulators, &self.profile.regulators, &mut self.reg_slots, false);
            return Err(e);
        }

        self.powered = true;
        info!("{}: powered up", self.profile.sensor);
        Ok(())
    }

    /// Full teardown, strictly reverse of [`power_up`](Self::power_up):
    /// clocks down, rails off, rails released. Best-effort; a no-op
    /// when the sensor is not powered.
    pub fn power_down<CB, RB>(&mut self, clocks: &mut CB, regulators: &mut RB)
    where
        CB: ClockBus<Handle = CH>,
        RB: RegulatorBus<Handle = RH>,
    {
        if !self.powered {
            return;
        }

        let _ = clock::apply(clocks, &self.profile.clocks, &mut self.clock_slots, false);
        let _ = regulator::power(regulators, &self.profile.regulators, &mut self.reg_slots, false);
        let _ =
            regulator::configure(regulators, &self.profile.regulators, &mut self.reg_slots, false);

        self.powered = false;
        info!("{}: powered down", self.profile.sensor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sim::{ClockOp, SimClockBus, SimRegulatorBus};
    use crate::error::ClockError;

    fn buses() -> (SimClockBus, SimRegulatorBus) {
        (
            SimClockBus::with_known(&["cam_mclk"]),
            SimRegulatorBus::with_known(&["cam_vdig", "cam_vana", "cam_vio"]),
        )
    }

    #[test]
    fn power_round_trip_leaves_nothing_owned() {
        let (mut clk, mut reg) = buses();
        let mut sensor = SensorPower::new(BoardProfile::default()).unwrap();

        sensor.power_up(&mut clk, &mut reg).unwrap();
        assert!(sensor.is_powered());
        assert_eq!(clk.active(), 1);
        assert_eq!(reg.enabled(), 3);

        sensor.power_down(&mut clk, &mut reg);
        assert!(!sensor.is_powered());
        assert_eq!((clk.outstanding(), clk.active()), (0, 0));
        assert_eq!((reg.outstanding(), reg.enabled()), (0, 0));
    }

    #[test]
    fn clock_failure_rolls_regulators_back() {
        let (mut clk, mut reg) = buses();
        clk.fail_on("cam_mclk", ClockOp::Activate);
        let mut sensor = SensorPower::new(BoardProfile::default()).unwrap();

        let err = sensor.power_up(&mut clk, &mut reg).unwrap_err();
        assert_eq!(err, Error::Clock(ClockError::Activate { index: 0 }));
        assert!(!sensor.is_powered());
        assert_eq!((clk.outstanding(), clk.active()), (0, 0));
        assert_eq!((reg.outstanding(), reg.enabled()), (0, 0));
    }

    #[test]
    fn repeated_power_up_is_a_no_op() {
        let (mut clk, mut reg) = buses();
        let mut sensor = SensorPower::new(BoardProfile::default()).unwrap();

        sensor.power_up(&mut clk, &mut reg).unwrap();
        let calls_after_first = clk.calls().len();
        sensor.power_up(&mut clk, &mut reg).unwrap();
        assert_eq!(clk.calls().len(), calls_after_first);
    }

    #[test]
    fn power_down_when_off_is_a_no_op() {
        let (mut clk, mut reg) = buses();
        let mut sensor = SensorPower::new(BoardProfile::default()).unwrap();
        sensor.power_down(&mut clk, &mut reg);
        assert!(clk.calls().is_empty());
        assert!(reg.calls().is_empty());
    }
}
