//! Screening conversation: profile form, question selection, and the
//! simulated technical interview.
//!
//! The driver and selector are pure: they only touch the `SessionState`
//! handed to them. `SessionManager` owns the per-session state and talks to
//! the candidate store.

pub mod bank;
pub mod driver;
pub mod fields;
pub mod interview;
pub mod manager;
pub mod model;
pub mod routes;
pub mod selector;
pub mod state;

pub use bank::QuestionBank;
pub use driver::{DEFAULT_EXIT_KEYWORDS, Driver, Prompt, SessionResult};
pub use fields::{FieldDef, FieldName, FieldSpec, Validator};
pub use interview::{InterviewState, InterviewStep, QuestionPrompt};
pub use manager::{SessionManager, SessionStatus, Turn};
pub use model::{BasicInfo, CandidateProfile, CandidateRecord, TechnicalAnswer, TechnicalQuestion};
pub use routes::{ScreeningRouteState, screening_routes};
pub use selector::QuestionSelector;
pub use state::{SessionPhase, SessionState};
