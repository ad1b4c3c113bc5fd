//! Screening state machine: tracks which field the candidate is on.

use serde::{Deserialize, Serialize};

use super::model::{CandidateProfile, TechnicalQuestion};

/// Phases of the profile conversation.
///
/// `Collecting(i)` walks the fields in order. `Completed` and `Exited` are
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "field_index", rename_all = "snake_case")]
pub enum SessionPhase {
    Collecting(usize),
    Completed,
    Exited,
}

impl SessionPhase {
    /// Check if a transition from `self` to `target` is valid for a form of
    /// `field_count` fields.
    pub fn can_transition_to(&self, target: SessionPhase, field_count: usize) -> bool {
        use SessionPhase::*;
        match (*self, target) {
            (Collecting(i), Collecting(j)) => j == i || (j == i + 1 && j < field_count),
            (Collecting(i), Completed) => i + 1 == field_count || field_count == 0,
            (Collecting(_), Exited) => true,
            _ => false,
        }
    }

    /// Whether the conversation is over.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Exited)
    }
}

impl Default for SessionPhase {
    fn default() -> Self {
        Self::Collecting(0)
    }
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Collecting(i) => write!(f, "collecting({i})"),
            Self::Completed => write!(f, "completed"),
            Self::Exited => write!(f, "exited"),
        }
    }
}

/// One candidate's conversation state.
///
/// Owned by the host (one per session id); the driver only mutates it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionState {
    pub phase: SessionPhase,
    pub profile: CandidateProfile,
    /// Technical questions selected once the profile is complete.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub questions: Vec<TechnicalQuestion>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the field currently being asked, if still collecting.
    pub fn cursor(&self) -> Option<usize> {
        match self.phase {
            SessionPhase::Collecting(i) => Some(i),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }
}
