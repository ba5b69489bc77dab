//! Regulator configuration and enable sequencing.
//!
//! Two separate operations over the same caller-preserved slot array,
//! mirroring how real rails behave: [`configure`] acquires every rail
//! and programs LDO voltage/load once, then [`power`] switches the set
//! on and off — possibly many times — without ever releasing handles.
//!
//! Rollback is fully cascading: any forward failure unconfigures the
//! current rail's partially-applied state, then unwinds every earlier
//! rail identically, in exact reverse order.

use log::{debug, warn};

use crate::descriptor::RegulatorDesc;
use crate::error::{RegulatorError, Result};
use crate::ports::RegulatorBus;
use crate::sequence::check_parallel;

// ───────────────────────────────────────────────────────────────
// Acquire / configure / release
// ───────────────────────────────────────────────────────────────

/// Acquire and configure (`enable = true`) or unconfigure and release
/// the whole regulator set.
///
/// On the way up, each LDO rail gets its voltage range and load current
/// programmed between acquisition and the next index. On the way down,
/// each LDO is returned to zero load and a `[0, max_uv]` range before
/// its handle is released; teardown is best-effort and never fails.
pub fn configure<B: RegulatorBus>(
    bus: &mut B,
    descs: &[RegulatorDesc],
    slots: &mut [Option<B::Handle>],
    enable: bool,
) -> Result<()> {
    check_parallel(descs.len(), slots.len())?;
    if enable {
        configure_all(bus, descs, slots)
    } else {
        release_all(bus, descs, slots);
        Ok(())
    }
}

fn configure_all<B: RegulatorBus>(
    bus: &mut B,
    descs: &[RegulatorDesc],
    slots: &mut [Option<B::Handle>],
) -> Result<()> {
    for (i, desc) in descs.iter().enumerate() {
        let mut handle = match bus.acquire(&desc.name) {
            Ok(h) => h,
            Err(e) => {
                warn!("regulator {}: acquire failed: {}", desc.name, e);
                unwind(bus, descs, slots, i);
                return Err(RegulatorError::Acquire { index: i }.into());
            }
        };

        if desc.is_ldo() {
            if let Err(e) = bus.set_voltage(&mut handle, desc.min_uv, desc.max_uv) {
                warn!(
                    "regulator {}: set voltage [{}, {}] uV failed: {}",
                    desc.name, desc.min_uv, desc.max_uv, e
                );
                // Voltage was never applied; just hand the rail back.
                bus.release(handle);
                unwind(bus, descs, slots, i);
                return Err(RegulatorError::SetVoltage { index: i }.into());
            }
            if let Err(e) = bus.set_load(&mut handle, desc.load_ua) {
                warn!(
                    "regulator {}: set load {} uA failed: {}",
                    desc.name, desc.load_ua, e
                );
                let _ = bus.set_voltage(&mut handle, 0, desc.max_uv);
                bus.release(handle);
                unwind(bus, descs, slots, i);
                return Err(RegulatorError::SetLoad { index: i }.into());
            }
        }

        slots[i] = Some(handle);
        debug!("regulator {}: configured", desc.name);
    }
    Ok(())
}

fn release_all<B: RegulatorBus>(
    bus: &mut B,
    descs: &[RegulatorDesc],
    slots: &mut [Option<B::Handle>],
) {
    for (desc, slot) in descs.iter().zip(slots.iter_mut()).rev() {
        if let Some(handle) = slot.take() {
            unconfigure_one(bus, desc, handle);
            debug!("regulator {}: released", desc.name);
        }
    }
}

/// Unconfigure slots `0..upto` in reverse order.
fn unwind<B: RegulatorBus>(
    bus: &mut B,
    descs: &[RegulatorDesc],
    slots: &mut [Option<B::Handle>],
    upto: usize,
) {
    for (desc, slot) in descs[..upto].iter().zip(slots[..upto].iter_mut()).rev() {
        if let Some(handle) = slot.take() {
            unconfigure_one(bus, desc, handle);
        }
    }
}

/// Reverse one rail's applied configuration and release it.
/// Best-effort: reset failures must not block teardown.
fn unconfigure_one<B: RegulatorBus>(bus: &mut B, desc: &RegulatorDesc, mut handle: B::Handle) {
    if desc.is_ldo() {
        let _ = bus.set_load(&mut handle, 0);
        let _ = bus.set_voltage(&mut handle, 0, desc.max_uv);
    }
    bus.release(handle);
}

// ───────────────────────────────────────────────────────────────
// Enable / disable (separate step, handles stay owned by configure)
// ───────────────────────────────────────────────────────────────

/// Switch the configured set on (`enable = true`) or off.
///
/// Every slot must have been filled by a prior successful [`configure`];
/// an empty slot on the way up is [`RegulatorError::InvalidHandle`] and
/// unwinds the rails already switched on. No handle is acquired or
/// released here. Disable is best-effort and skips empty slots, which
/// tolerates arrays left behind by an earlier partial failure.
pub fn power<B: RegulatorBus>(
    bus: &mut B,
    descs: &[RegulatorDesc],
    slots: &mut [Option<B::Handle>],
    enable: bool,
) -> Result<()> {
    check_parallel(descs.len(), slots.len())?;
    if enable {
        power_on_all(bus, descs, slots)
    } else {
        power_off_all(bus, descs, slots);
        Ok(())
    }
}

fn power_on_all<B: RegulatorBus>(
    bus: &mut B,
    descs: &[RegulatorDesc],
    slots: &mut [Option<B::Handle>],
) -> Result<()> {
    for i in 0..descs.len() {
        let desc = &descs[i];
        match slots[i].as_mut() {
            None => {
                warn!("regulator {}: enable on empty slot", desc.name);
                power_unwind(bus, slots, i);
                return Err(RegulatorError::InvalidHandle { index: i }.into());
            }
            Some(handle) => {
                if let Err(e) = bus.enable(handle) {
                    warn!("regulator {}: enable failed: {}", desc.name, e);
                    power_unwind(bus, slots, i);
                    return Err(RegulatorError::Enable { index: i }.into());
                }
            }
        }
        debug!("regulator {}: on", desc.name);
    }
    Ok(())
}

fn power_off_all<B: RegulatorBus>(
    bus: &mut B,
    descs: &[RegulatorDesc],
    slots: &mut [Option<B::Handle>],
) {
    for (desc, slot) in descs.iter().zip(slots.iter_mut()).rev() {
        if let Some(handle) = slot.as_mut() {
            bus.disable(handle);
            debug!("regulator {}: off", desc.name);
        }
    }
}

/// Disable slots `0..upto` in reverse order. Handles stay in place.
fn power_unwind<B: RegulatorBus>(bus: &mut B, slots: &mut [Option<B::Handle>], upto: usize) {
    for slot in slots[..upto].iter_mut().rev() {
        if let Some(handle) = slot.as_mut() {
            bus.disable(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sim::{RegOp, RegulatorCall, SimRegulatorBus};
    use crate::descriptor::RegulatorKind;
    use crate::error::Error;

    fn ldo(name: &str, min_uv: u32, max_uv: u32, load_ua: u32) -> RegulatorDesc {
        RegulatorDesc {
            name: name.try_into().unwrap(),
            kind: RegulatorKind::Ldo,
            min_uv,
            max_uv,
            load_ua,
        }
    }

    fn fixed(name: &str) -> RegulatorDesc {
        RegulatorDesc {
            name: name.try_into().unwrap(),
            kind: RegulatorKind::Fixed,
            min_uv: 0,
            max_uv: 0,
            load_ua: 0,
        }
    }

    #[test]
    fn configure_programs_ldo_rails_only() {
        let mut bus = SimRegulatorBus::with_known(&["cam_vdig", "cam_vio"]);
        let descs = [ldo("cam_vdig", 1_200_000, 1_200_000, 105_000), fixed("cam_vio")];
        let mut slots = [None, None];

        configure(&mut bus, &descs, &mut slots, true).unwrap();

        assert!(slots.iter().all(Option::is_some));
        assert_eq!(
            bus.calls(),
            &[
                RegulatorCall::acquire("cam_vdig"),
                RegulatorCall::set_voltage("cam_vdig", 1_200_000, 1_200_000),
                RegulatorCall::set_load("cam_vdig", 105_000),
                RegulatorCall::acquire("cam_vio"),
            ]
        );
    }

    #[test]
    fn voltage_failure_cascades_to_all_priors() {
        let mut bus = SimRegulatorBus::with_known(&["cam_vdig", "cam_vana", "cam_vio"]);
        bus.fail_on("cam_vana", RegOp::SetVoltage);
        let descs = [
            ldo("cam_vdig", 1_200_000, 1_200_000, 105_000),
            ldo("cam_vana", 2_800_000, 2_850_000, 85_600),
            fixed("cam_vio"),
        ];
        let mut slots = [None, None, None];

        let err = configure(&mut bus, &descs, &mut slots, true).unwrap_err();

        assert_eq!(err, Error::Regulator(RegulatorError::SetVoltage { index: 1 }));
        assert!(slots.iter().all(Option::is_none));
        assert_eq!(bus.outstanding(), 0);
        // cam_vio was never reached.
        assert!(!bus
            .calls()
            .iter()
            .any(|c| c == &RegulatorCall::acquire("cam_vio")));
    }

    #[test]
    fn release_resets_ldo_before_handing_back() {
        let mut bus = SimRegulatorBus::with_known(&["cam_vdig"]);
        let descs = [ldo("cam_vdig", 1_200_000, 1_250_000, 105_000)];
        let mut slots = [None];

        configure(&mut bus, &descs, &mut slots, true).unwrap();
        bus.clear_calls();
        configure(&mut bus, &descs, &mut slots, false).unwrap();

        assert_eq!(
            bus.calls(),
            &[
                RegulatorCall::set_load("cam_vdig", 0),
                RegulatorCall::set_voltage("cam_vdig", 0, 1_250_000),
                RegulatorCall::release("cam_vdig"),
            ]
        );
        assert!(slots[0].is_none());
    }

    #[test]
    fn power_on_empty_slot_is_invalid_handle() {
        let mut bus = SimRegulatorBus::with_known(&["cam_vdig", "cam_vio"]);
        let descs = [fixed("cam_vdig"), fixed("cam_vio")];
        let mut slots = [None, None];
        configure(&mut bus, &descs, &mut slots, true).unwrap();

        // Simulate a slot the caller lost.
        let orphan = slots[1].take();

        let err = power(&mut bus, &descs, &mut slots, true).unwrap_err();
        assert_eq!(err, Error::Regulator(RegulatorError::InvalidHandle { index: 1 }));
        // Index 0 was enabled, then unwound.
        assert_eq!(bus.enabled(), 0);

        slots[1] = orphan;
        configure(&mut bus, &descs, &mut slots, false).unwrap();
    }

    #[test]
    fn power_cycle_is_repeatable_without_reacquiring() {
        let mut bus = SimRegulatorBus::with_known(&["cam_vdig"]);
        let descs = [fixed("cam_vdig")];
        let mut slots = [None];
        configure(&mut bus, &descs, &mut slots, true).unwrap();

        for _ in 0..3 {
            power(&mut bus, &descs, &mut slots, true).unwrap();
            assert_eq!(bus.enabled(), 1);
            power(&mut bus, &descs, &mut slots, false).unwrap();
            assert_eq!(bus.enabled(), 0);
        }
        // Still exactly one outstanding handle, acquired once.
        assert_eq!(bus.outstanding(), 1);
    }
}
