//! Ordered resource sequencers with symmetric rollback.
//!
//! Each sequencer walks a descriptor array forward on enable and
//! backward on disable, over a caller-preserved parallel slot array of
//! `Option<Handle>`. The first failure on the forward path unwinds
//! every previously applied step in exact reverse order before the
//! error is surfaced, so an observer never sees a half-applied array.
//!
//! Per-index lifecycle: `Unacquired → Acquired → Configured → Enabled`,
//! reversed on teardown.

pub mod clock;
pub mod regulator;

use crate::error::{Error, Result};

/// Both sequencers require the slot array to parallel the descriptor
/// array exactly; a mismatch is a caller bug surfaced as a typed error
/// rather than an out-of-bounds access.
pub(crate) fn check_parallel(descs: usize, slots: usize) -> Result<()> {
    if descs == slots {
        Ok(())
    } else {
        Err(Error::Config("descriptor and slot arrays differ in length"))
    }
}
