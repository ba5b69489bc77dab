//! Board profiles
//!
//! The per-board description of one sensor's power resources: which
//! clocks and rails exist, in what order they come up, and what rates,
//! voltage ranges, and loads they take. Profiles arrive from the
//! platform's board description (JSON) and can be persisted compactly
//! (postcard) by the managing daemon.

use serde::{Deserialize, Serialize};

use crate::descriptor::{ClockDesc, RegulatorDesc, RegulatorKind, ResourceName};

/// Upper bound on clocks per sensor; slot arrays never reallocate.
pub const MAX_CLOCKS: usize = 8;
/// Upper bound on regulators per sensor.
pub const MAX_REGULATORS: usize = 8;

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// One sensor's ordered resource lists. List order is bring-up order;
/// teardown runs in exact reverse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardProfile {
    /// Sensor name, for logs only.
    pub sensor: ResourceName,
    pub clocks: heapless::Vec<ClockDesc, MAX_CLOCKS>,
    pub regulators: heapless::Vec<RegulatorDesc, MAX_REGULATORS>,
}

impl Default for BoardProfile {
    fn default() -> Self {
        let mut clocks = heapless::Vec::new();
        let _ = clocks.push(ClockDesc {
            name: name("cam_mclk"),
            rate_hz: Some(24_000_000),
        });

        let mut regulators = heapless::Vec::new();
        let _ = regulators.push(RegulatorDesc {
            name: name("cam_vdig"),
            kind: RegulatorKind::Ldo,
            min_uv: 1_200_000,
            max_uv: 1_200_000,
            load_ua: 105_000,
        });
        let _ = regulators.push(RegulatorDesc {
            name: name("cam_vana"),
            kind: RegulatorKind::Ldo,
            min_uv: 2_800_000,
            max_uv: 2_850_000,
            load_ua: 85_600,
        });
        let _ = regulators.push(RegulatorDesc {
            name: name("cam_vio"),
            kind: RegulatorKind::Fixed,
            min_uv: 1_800_000,
            max_uv: 1_800_000,
            load_ua: 0,
        });

        Self {
            sensor: name("default_sensor"),
            clocks,
            regulators,
        }
    }
}

// Profile literals are compile-time names well under the cap.
fn name(n: &str) -> ResourceName {
    ResourceName::try_from(n).unwrap_or_default()
}

impl BoardProfile {
    /// Parse a profile from a board-description JSON document and
    /// validate it.
    pub fn from_json_str(s: &str) -> Result<Self, ProfileError> {
        let profile: Self = serde_json::from_str(s).map_err(|_| ProfileError::Parse)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Serialize for compact daemon-side persistence.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ProfileError> {
        postcard::to_stdvec(self).map_err(|_| ProfileError::Parse)
    }

    /// Restore a persisted profile and validate it.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProfileError> {
        let profile: Self = postcard::from_bytes(bytes).map_err(|_| ProfileError::Parse)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Reject profiles the sequencers cannot honor: empty or duplicate
    /// resource names (a duplicate would be double-acquired), inverted
    /// voltage ranges, and LDO rails with no usable range.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.sensor.is_empty() {
            return Err(ProfileError::Validation("sensor name is empty"));
        }
        let mut seen: heapless::Vec<&str, { MAX_CLOCKS + MAX_REGULATORS }> = heapless::Vec::new();
        for clock in &self.clocks {
            if clock.name.is_empty() {
                return Err(ProfileError::Validation("clock name is empty"));
            }
            if seen.contains(&clock.name.as_str()) {
                return Err(ProfileError::Validation("duplicate clock name"));
            }
            let _ = seen.push(clock.name.as_str());
        }
        for reg in &self.regulators {
            if reg.name.is_empty() {
                return Err(ProfileError::Validation("regulator name is empty"));
            }
            if seen.contains(&reg.name.as_str()) {
                return Err(ProfileError::Validation("duplicate resource name"));
            }
            let _ = seen.push(reg.name.as_str());
            if reg.min_uv > reg.max_uv {
                return Err(ProfileError::Validation("regulator min_uv above max_uv"));
            }
            if reg.is_ldo() && reg.max_uv == 0 {
                return Err(ProfileError::Validation("LDO rail with zero voltage range"));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors loading or validating a board profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileError {
    /// The document failed to parse or exceeds the fixed capacities.
    Parse,
    /// A field failed range validation; the message names which.
    Validation(&'static str),
}

impl core::fmt::Display for ProfileError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Parse => write!(f, "profile parse failed"),
            Self::Validation(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl std::error::Error for ProfileError {}
