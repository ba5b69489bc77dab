//! Clock bring-up and teardown in board-defined order.
//!
//! Enable walks the descriptor array forward: acquire by name, program
//! the target rate when one is given, activate. Disable walks backward:
//! deactivate, release. A failure at index `i` releases the handle
//! acquired for `i` (if any) and then tears down indices `i-1..0`, so
//! the slot array always satisfies: after a failed enable at `k`, slots
//! `[0, k]` are `None` and slots `(k, N)` were never touched.

use log::{debug, warn};

use crate::descriptor::ClockDesc;
use crate::error::{ClockError, Result};
use crate::ports::ClockBus;
use crate::sequence::check_parallel;

/// Enable (`enable = true`) or disable the whole clock set.
///
/// `slots` must parallel `descs` and must be preserved by the caller
/// between the enable and disable calls. Disable is best-effort and
/// never fails; empty slots are skipped, which tolerates arrays left
/// behind by an earlier partial failure.
pub fn apply<B: ClockBus>(
    bus: &mut B,
    descs: &[ClockDesc],
    slots: &mut [Option<B::Handle>],
    enable: bool,
) -> Result<()> {
    check_parallel(descs.len(), slots.len())?;
    if enable {
        enable_all(bus, descs, slots)
    } else {
        disable_all(bus, descs, slots);
        Ok(())
    }
}

fn enable_all<B: ClockBus>(
    bus: &mut B,
    descs: &[ClockDesc],
    slots: &mut [Option<B::Handle>],
) -> Result<()> {
    for (i, desc) in descs.iter().enumerate() {
        let mut handle = match bus.acquire(&desc.name) {
            Ok(h) => h,
            Err(e) => {
                warn!("clock {}: acquire failed: {}", desc.name, e);
                unwind(bus, slots, i);
                return Err(ClockError::Acquire { index: i }.into());
            }
        };

        if let Some(rate_hz) = desc.rate_hz {
            if let Err(e) = bus.set_rate(&mut handle, rate_hz) {
                warn!("clock {}: set rate {} Hz failed: {}", desc.name, rate_hz, e);
                bus.release(handle);
                unwind(bus, slots, i);
                return Err(ClockError::SetRate { index: i }.into());
            }
        }

        if let Err(e) = bus.activate(&mut handle) {
            warn!("clock {}: activate failed: {}", desc.name, e);
            bus.release(handle);
            unwind(bus, slots, i);
            return Err(ClockError::Activate { index: i }.into());
        }

        slots[i] = Some(handle);
        debug!("clock {}: active", desc.name);
    }
    Ok(())
}

fn disable_all<B: ClockBus>(bus: &mut B, descs: &[ClockDesc], slots: &mut [Option<B::Handle>]) {
    for (desc, slot) in descs.iter().zip(slots.iter_mut()).rev() {
        if let Some(mut handle) = slot.take() {
            bus.deactivate(&mut handle);
            bus.release(handle);
            debug!("clock {}: released", desc.name);
        }
    }
}

/// Deactivate and release slots `0..upto` in reverse order.
fn unwind<B: ClockBus>(bus: &mut B, slots: &mut [Option<B::Handle>], upto: usize) {
    for slot in slots[..upto].iter_mut().rev() {
        if let Some(mut handle) = slot.take() {
            bus.deactivate(&mut handle);
            bus.release(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sim::{ClockCall, ClockOp, SimClockBus};
    use crate::error::Error;

    fn descs(names: &[(&str, Option<u64>)]) -> Vec<ClockDesc> {
        names
            .iter()
            .map(|(n, r)| ClockDesc {
                name: (*n).try_into().unwrap(),
                rate_hz: *r,
            })
            .collect()
    }

    #[test]
    fn enable_acquires_in_order_and_programs_rates() {
        let mut bus = SimClockBus::with_known(&["cam_mclk", "cam_iface"]);
        let descs = descs(&[("cam_mclk", Some(24_000_000)), ("cam_iface", None)]);
        let mut slots = [None, None];

        apply(&mut bus, &descs, &mut slots, true).unwrap();

        assert!(slots.iter().all(Option::is_some));
        assert_eq!(bus.active(), 2);
        assert_eq!(
            bus.calls(),
            &[
                ClockCall::acquire("cam_mclk"),
                ClockCall::set_rate("cam_mclk", 24_000_000),
                ClockCall::activate("cam_mclk"),
                ClockCall::acquire("cam_iface"),
                ClockCall::activate("cam_iface"),
            ]
        );
    }

    #[test]
    fn rate_failure_releases_current_and_priors() {
        let mut bus = SimClockBus::with_known(&["cam_mclk", "cam_iface"]);
        bus.fail_on("cam_iface", ClockOp::SetRate);
        let descs = descs(&[("cam_mclk", Some(24_000_000)), ("cam_iface", Some(1))]);
        let mut slots = [None, None];

        let err = apply(&mut bus, &descs, &mut slots, true).unwrap_err();

        assert_eq!(err, Error::Clock(ClockError::SetRate { index: 1 }));
        assert!(slots.iter().all(Option::is_none));
        assert_eq!(bus.outstanding(), 0);
        assert_eq!(bus.active(), 0);
    }

    #[test]
    fn acquire_failure_at_zero_touches_nothing_else() {
        let mut bus = SimClockBus::with_known(&["cam_iface"]);
        let descs = descs(&[("cam_mclk", None), ("cam_iface", None)]);
        let mut slots = [None, None];

        let err = apply(&mut bus, &descs, &mut slots, true).unwrap_err();

        assert_eq!(err, Error::Clock(ClockError::Acquire { index: 0 }));
        // Never reached index 1.
        assert_eq!(bus.calls(), &[ClockCall::acquire("cam_mclk")]);
    }

    #[test]
    fn length_mismatch_is_a_config_error() {
        let mut bus = SimClockBus::with_known(&["cam_mclk"]);
        let descs = descs(&[("cam_mclk", None)]);
        let mut slots: [Option<_>; 2] = [None, None];

        assert!(matches!(
            apply(&mut bus, &descs, &mut slots, true),
            Err(Error::Config(_))
        ));
    }
}
