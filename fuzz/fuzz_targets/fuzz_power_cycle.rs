//! Fuzz target: sensor power cycling under arbitrary fault scripts.
//!
//! Interprets the fuzz input as a script of power transitions plus
//! failure injections on the sim buses and verifies:
//! - No panics under arbitrary byte inputs
//! - A failed or absent power-up never strands handles
//! - A final power_down always returns both buses to zero
//!
//! cargo fuzz run fuzz_power_cycle

#![no_main]

use campower::adapters::sim::{ClockOp, RegOp, SimClockBus, SimRegulatorBus};
use campower::{BoardProfile, SensorPower};
use libfuzzer_sys::fuzz_target;

const CLOCKS: [&str; 1] = ["cam_mclk"];
const RAILS: [&str; 3] = ["cam_vdig", "cam_vana", "cam_vio"];

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let mut clk = SimClockBus::with_known(&CLOCKS);
    let mut reg = SimRegulatorBus::with_known(&RAILS);
    let mut sensor = match SensorPower::new(BoardProfile::default()) {
        Ok(s) => s,
        Err(_) => return,
    };

    for &byte in data {
        match byte % 12 {
            0 => {
                let _ = sensor.power_up(&mut clk, &mut reg);
            }
            1 => sensor.power_down(&mut clk, &mut reg),
            2 => clk.fail_on(CLOCKS[0], ClockOp::Acquire),
            3 => clk.fail_on(CLOCKS[0], ClockOp::SetRate),
            4 => clk.fail_on(CLOCKS[0], ClockOp::Activate),
            n => {
                let rail = RAILS[(n as usize) % RAILS.len()];
                let op = match n % 4 {
                    0 => RegOp::Acquire,
                    1 => RegOp::SetVoltage,
                    2 => RegOp::SetLoad,
                    _ => RegOp::Enable,
                };
                reg.fail_on(rail, op);
            }
        }

        if !sensor.is_powered() {
            assert_eq!(clk.outstanding(), 0, "clock handle stranded while unpowered");
            assert_eq!(reg.outstanding(), 0, "regulator handle stranded while unpowered");
        }
    }

    sensor.power_down(&mut clk, &mut reg);
    assert_eq!((clk.outstanding(), clk.active()), (0, 0));
    assert_eq!((reg.outstanding(), reg.enabled()), (0, 0));
});
