//! Camera sensor power-sequencing library.
//!
//! Brings a sensor's clocks and voltage regulators up in board-defined
//! order and tears them down in exact reverse order, rolling back
//! partially-applied state when any intermediate step fails. Platform
//! access (clock tree, PMIC) lives behind the port traits in
//! [`ports`], so the sequencing core never touches hardware directly.
//!
//! Single-threaded by design: callers serialize power-up/power-down per
//! device; slot arrays are exclusively borrowed for each call.

#![deny(unused_must_use)]

pub mod adapters;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod ports;
pub mod power;
pub mod sequence;

pub use config::BoardProfile;
pub use error::{Error, Result};
pub use power::SensorPower;
