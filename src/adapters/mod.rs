//! Backend adapters — concrete implementations of the bus port traits.
//!
//! Production deployments plug in platform-specific backends (sysfs
//! shims, PMIC RPC clients). This crate ships the in-memory simulators
//! used by the test suite and by daemons running in bench/bring-up mode.

pub mod sim;
