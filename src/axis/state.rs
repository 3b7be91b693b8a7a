//! Homing states and the outcomes of blocking operations.

/// Progress of the homing procedure.
///
/// `Idle → Seeking → BackedOff → Zeroed`. Without a home switch the
/// procedure jumps straight from `Idle` to `Zeroed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HomingState {
    /// Not homing.
    #[default]
    Idle,
    /// Running at constant speed toward the switch.
    Seeking,
    /// Retracting off the triggered switch.
    BackedOff,
    /// Position redefined as zero.
    Zeroed,
}

impl HomingState {
    /// State name for display/debugging.
    pub fn name(self) -> &'static str {
        match self {
            HomingState::Idle => "Idle",
            HomingState::Seeking => "Seeking",
            HomingState::BackedOff => "BackedOff",
            HomingState::Zeroed => "Zeroed",
        }
    }
}

/// Result of [`Axis::home`](super::Axis::home).
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HomeOutcome {
    /// Position is now zero.
    Homed,
    /// The e-stop latch cut homing short; position is not zeroed.
    Aborted {
        /// State homing was in when the latch was seen.
        state: HomingState,
    },
}

impl HomeOutcome {
    /// True if homing completed.
    pub fn is_homed(self) -> bool {
        self == HomeOutcome::Homed
    }
}

/// Result of a blocking move.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MoveOutcome {
    /// Distance to go reached zero.
    Completed,
    /// The e-stop latch ended the move early.
    Aborted,
}

impl MoveOutcome {
    /// True if the move ran to completion.
    pub fn is_completed(self) -> bool {
        self == MoveOutcome::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_names() {
        assert_eq!(HomingState::default().name(), "Idle");
        assert_eq!(HomingState::BackedOff.name(), "BackedOff");
    }

    #[test]
    fn test_outcomes() {
        assert!(HomeOutcome::Homed.is_homed());
        assert!(!HomeOutcome::Aborted { state: HomingState::Seeking }.is_homed());
        assert!(MoveOutcome::Completed.is_completed());
        assert!(!MoveOutcome::Aborted.is_completed());
    }
}
