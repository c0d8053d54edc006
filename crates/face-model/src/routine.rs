//! The exercise routine.

use serde::{Deserialize, Serialize};

/// Gesture the user is asked to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepId {
    Blink,
    Smile,
    BrowRaise,
}

/// One step of the routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Step {
    pub id: StepId,
    pub instruction: &'static str,
}

/// The fixed step sequence, in order.
pub const ROUTINE: [Step; 3] = [
    Step {
        id: StepId::Blink,
        instruction: "Blink both eyes",
    },
    Step {
        id: StepId::Smile,
        instruction: "Smile",
    },
    Step {
        id: StepId::BrowRaise,
        instruction: "Raise your eyebrows",
    },
];

/// Number of steps in the routine.
pub const ROUTINE_LEN: usize = ROUTINE.len();

/// Step at `index`, clamped to the last step.
pub fn step_at(index: usize) -> Step {
    ROUTINE[index.min(ROUTINE_LEN - 1)]
}

/// Whether `index` is the final step of the routine.
pub fn is_last_step(index: usize) -> bool {
    index + 1 >= ROUTINE_LEN
}

impl std::fmt::Display for StepId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StepId::Blink => "blink",
            StepId::Smile => "smile",
            StepId::BrowRaise => "brow_raise",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routine_order() {
        let ids: Vec<StepId> = ROUTINE.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![StepId::Blink, StepId::Smile, StepId::BrowRaise]);
    }

    #[test]
    fn test_last_step() {
        assert!(!is_last_step(0));
        assert!(!is_last_step(1));
        assert!(is_last_step(2));
        assert_eq!(step_at(7).id, StepId::BrowRaise);
    }
}
