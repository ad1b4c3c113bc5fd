//! Conversation driver: validates answers and walks the field list.

use serde::Serialize;
use tracing::{debug, info};

use crate::error::AnswerError;

use super::fields::{FieldDef, FieldName, FieldSpec};
use super::model::TechnicalQuestion;
use super::selector::QuestionSelector;
use super::state::{SessionPhase, SessionState};

/// Exit keywords recognized when none are configured.
pub const DEFAULT_EXIT_KEYWORDS: &[&str] = &["exit", "quit", "bye", "stop", "goodbye"];

/// The question to show the candidate next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prompt {
    pub field: FieldName,
    /// Zero-based position of the field in the form.
    pub index: usize,
    pub total: usize,
    pub text: String,
    /// Why the previous answer was rejected, when re-prompting.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection: Option<AnswerError>,
}

/// Outcome of submitting one answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionResult {
    NextPrompt(Prompt),
    Completed(Vec<TechnicalQuestion>),
    Exited,
}

/// Stateless driver shared across sessions.
#[derive(Debug, Clone)]
pub struct Driver {
    fields: FieldSpec,
    selector: QuestionSelector,
    exit_keywords: Vec<String>,
}

impl Driver {
    pub fn new(fields: FieldSpec, selector: QuestionSelector) -> Self {
        Self {
            fields,
            selector,
            exit_keywords: DEFAULT_EXIT_KEYWORDS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Replace the exit keyword set. Keywords are matched case-insensitively.
    pub fn with_exit_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.exit_keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        self
    }

    pub fn fields(&self) -> &FieldSpec {
        &self.fields
    }

    pub fn selector(&self) -> &QuestionSelector {
        &self.selector
    }

    /// Whether `text` (after trimming) is one of the exit keywords.
    pub fn is_exit(&self, text: &str) -> bool {
        let normalized = text.trim().to_lowercase();
        self.exit_keywords.iter().any(|k| *k == normalized)
    }

    /// The prompt for the current field, or `None` once the session is over.
    pub fn current_prompt(&self, session: &SessionState) -> Option<Prompt> {
        session.cursor().and_then(|i| self.prompt_at(i, None))
    }

    fn prompt_at(&self, index: usize, rejection: Option<AnswerError>) -> Option<Prompt> {
        self.fields
            .get(index)
            .map(|def| self.prompt_for(index, def, rejection))
    }

    fn prompt_for(&self, index: usize, def: &FieldDef, rejection: Option<AnswerError>) -> Prompt {
        Prompt {
            field: def.name,
            index,
            total: self.fields.len(),
            text: def.prompt.clone(),
            rejection,
        }
    }

    /// Submit one answer to the session.
    ///
    /// Exit keywords win over validation at any field. Empty or malformed
    /// answers re-prompt the same field without touching the session.
    pub fn submit_answer(&self, session: &mut SessionState, raw_text: &str) -> SessionResult {
        let index = match session.phase {
            SessionPhase::Collecting(i) => i,
            SessionPhase::Completed => return SessionResult::Completed(session.questions.clone()),
            SessionPhase::Exited => return SessionResult::Exited,
        };

        let text = raw_text.trim();
        if self.is_exit(text) {
            info!(field_index = index, "Candidate exited the screening");
            self.set_phase(session, SessionPhase::Exited);
            return SessionResult::Exited;
        }

        let Some(def) = self.fields.get(index) else {
            // An empty form has nothing to ask; treat it as done.
            return self.complete(session);
        };

        if let Err(rejection) = def.validator.check(def.name, text) {
            debug!(field = %def.name, reason = %rejection, "Answer rejected");
            return SessionResult::NextPrompt(self.prompt_for(index, def, Some(rejection)));
        }

        session.profile.insert(def.name, def.validator.normalize(text));
        debug!(field = %def.name, "Answer accepted");

        let next = index + 1;
        match self.prompt_at(next, None) {
            Some(prompt) => {
                self.set_phase(session, SessionPhase::Collecting(next));
                SessionResult::NextPrompt(prompt)
            }
            None => self.complete(session),
        }
    }

    fn complete(&self, session: &mut SessionState) -> SessionResult {
        let tech_stack = session.profile.get(FieldName::TechStack).unwrap_or("");
        let questions = self.selector.select_tagged(tech_stack);
        info!(questions = questions.len(), "Profile complete, technical questions selected");
        session.questions = questions.clone();
        self.set_phase(session, SessionPhase::Completed);
        SessionResult::Completed(questions)
    }

    fn set_phase(&self, session: &mut SessionState, target: SessionPhase) {
        debug_assert!(
            session.phase.can_transition_to(target, self.fields.len()),
            "Cannot transition from {} to {}",
            session.phase,
            target
        );
        session.phase = target;
    }
}
