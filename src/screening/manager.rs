//! SessionManager: one isolated screening session per session id.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{SessionError, StoreError};
use crate::store::CandidateStore;

use super::driver::{Driver, Prompt, SessionResult};
use super::fields::FieldName;
use super::interview::{InterviewState, InterviewStep, QuestionPrompt};
use super::model::{CandidateProfile, CandidateRecord};
use super::state::{SessionPhase, SessionState};

/// What the host should show after a submitted answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Turn {
    /// Ask (or re-ask) a profile field.
    Prompt(Prompt),
    /// Ask (or re-ask) a technical question.
    Question(QuestionPrompt),
    /// All questions answered; the session can be submitted.
    InterviewFinished,
    /// The candidate left. The session is closed and nothing is saved.
    Exited,
}

/// A live session: the driver state plus the interview once it starts.
#[derive(Debug, Clone)]
struct Session {
    state: SessionState,
    interview: Option<InterviewState>,
    created_at: DateTime<Utc>,
}

impl Session {
    fn new() -> Self {
        Self {
            state: SessionState::new(),
            interview: None,
            created_at: Utc::now(),
        }
    }
}

/// Snapshot of a session for status endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    pub session_id: Uuid,
    #[serde(flatten)]
    pub phase: SessionPhase,
    pub profile: CandidateProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<Prompt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionPrompt>,
    pub interview_finished: bool,
    /// Fraction of the screening done, in `0.0..=1.0`.
    pub progress: f32,
    pub created_at: DateTime<Utc>,
}

/// Coordinates sessions: routes answers to the driver or the interview,
/// checks for returning candidates, and saves finished screenings.
///
/// Each session sits behind its own mutex, so a slow store lookup for one
/// candidate does not block the others.
pub struct SessionManager {
    driver: Arc<Driver>,
    store: Arc<dyn CandidateStore>,
    sessions: RwLock<HashMap<Uuid, Arc<Mutex<Session>>>>,
}

impl SessionManager {
    pub fn new(driver: Arc<Driver>, store: Arc<dyn CandidateStore>) -> Self {
        Self {
            driver,
            store,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn driver(&self) -> &Driver {
        &self.driver
    }

    /// Start a new session and return its id with the first prompt.
    pub async fn create(&self) -> (Uuid, Option<Prompt>) {
        let id = Uuid::new_v4();
        let session = Session::new();
        let prompt = self.driver.current_prompt(&session.state);
        self.sessions
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(session)));
        info!(session_id = %id, "Screening session started");
        (id, prompt)
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    async fn session(&self, id: Uuid) -> Result<Arc<Mutex<Session>>, SessionError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(SessionError::NotFound { id })
    }

    async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    /// Submit one line of candidate input.
    ///
    /// An exit keyword closes the session in any phase.
    pub async fn submit(&self, id: Uuid, text: &str) -> Result<Turn, SessionError> {
        let handle = self.session(id).await?;
        let mut session = handle.lock().await;
        let phase = session.state.phase;

        let turn = match phase {
            SessionPhase::Collecting(_) => self.submit_profile_answer(id, &mut session, text).await?,
            SessionPhase::Completed => self.submit_interview_answer(id, &mut session, text),
            SessionPhase::Exited => Turn::Exited,
        };

        if turn == Turn::Exited {
            self.remove(id).await;
        }
        Ok(turn)
    }

    /// Drive the profile form.
    ///
    /// The answer is applied to a copy of the state and only committed once
    /// the returning-candidate lookup has passed, so a store failure leaves
    /// the session on the same field.
    async fn submit_profile_answer(
        &self,
        id: Uuid,
        session: &mut Session,
        text: &str,
    ) -> Result<Turn, SessionError> {
        let before = session.state.cursor();
        let mut pending = session.state.clone();
        let result = self.driver.submit_answer(&mut pending, text);

        if let Some((email, phone)) = self.accepted_contact(before, &pending, &result) {
            if self.store.exists(&email, &phone).await? {
                warn!(session_id = %id, "Returning candidate, closing session");
                self.remove(id).await;
                return Err(SessionError::DuplicateCandidate);
            }
        }
        session.state = pending;

        let turn = match result {
            SessionResult::NextPrompt(prompt) => Turn::Prompt(prompt),
            SessionResult::Completed(questions) => {
                let interview = InterviewState::new(questions);
                let turn = match interview.current() {
                    Some(q) => Turn::Question(q),
                    None => Turn::InterviewFinished,
                };
                session.interview = Some(interview);
                info!(session_id = %id, "Profile collected, starting interview");
                turn
            }
            SessionResult::Exited => Turn::Exited,
        };
        Ok(turn)
    }

    /// Contact details to look up when the email or phone field was just
    /// accepted.
    fn accepted_contact(
        &self,
        before: Option<usize>,
        after: &SessionState,
        result: &SessionResult,
    ) -> Option<(String, String)> {
        let advanced = !matches!(result, SessionResult::Exited) && after.cursor() != before;
        let accepted = before
            .filter(|_| advanced)
            .and_then(|i| self.driver.fields().get(i))
            .map(|def| def.name)?;
        if !matches!(accepted, FieldName::Email | FieldName::Phone) {
            return None;
        }
        let profile = &after.profile;
        Some((
            profile.get(FieldName::Email).unwrap_or("").to_string(),
            profile.get(FieldName::Phone).unwrap_or("").to_string(),
        ))
    }

    fn submit_interview_answer(&self, id: Uuid, session: &mut Session, text: &str) -> Turn {
        if self.driver.is_exit(text) {
            info!(session_id = %id, "Candidate left during the interview");
            return Turn::Exited;
        }

        let Session {
            state, interview, ..
        } = session;
        let interview =
            interview.get_or_insert_with(|| InterviewState::new(state.questions.clone()));
        match interview.answer(text) {
            InterviewStep::NextQuestion(q) => Turn::Question(q),
            InterviewStep::Finished => {
                info!(
                    session_id = %id,
                    answers = interview.answers().len(),
                    "Interview finished"
                );
                Turn::InterviewFinished
            }
        }
    }

    /// Current status of a session.
    pub async fn status(&self, id: Uuid) -> Result<SessionStatus, SessionError> {
        let handle = self.session(id).await?;
        let session = handle.lock().await;
        let interview = session.interview.as_ref();

        Ok(SessionStatus {
            session_id: id,
            phase: session.state.phase,
            profile: session.state.profile.clone(),
            prompt: self.driver.current_prompt(&session.state),
            question: interview.and_then(InterviewState::current),
            interview_finished: interview.is_some_and(InterviewState::is_finished),
            progress: self.progress(&session),
            created_at: session.created_at,
        })
    }

    /// Fields count for one step each, the interview for one more.
    fn progress(&self, session: &Session) -> f32 {
        let steps = (self.driver.fields().len() + 1) as f32;
        let done = match session.state.phase {
            SessionPhase::Collecting(i) => i as f32,
            SessionPhase::Exited => return 0.0,
            SessionPhase::Completed => {
                let interview_done = match &session.interview {
                    Some(iv) if iv.total() > 0 => iv.cursor() as f32 / iv.total() as f32,
                    _ => 1.0,
                };
                self.driver.fields().len() as f32 + interview_done
            }
        };
        (done / steps).min(1.0)
    }

    /// Save a finished screening and close the session.
    pub async fn finalize(&self, id: Uuid) -> Result<CandidateRecord, SessionError> {
        let handle = self.session(id).await?;
        let session = handle.lock().await;
        let not_ready = |reason: &str| SessionError::NotReady {
            id,
            reason: reason.to_string(),
        };

        if session.state.phase != SessionPhase::Completed {
            return Err(not_ready("profile is incomplete"));
        }
        let record = match &session.interview {
            Some(iv) if iv.is_finished() => {
                CandidateRecord::new(&session.state.profile, iv.answers().to_vec())
            }
            _ => return Err(not_ready("technical questions are unanswered")),
        };

        match self.store.save(&record).await {
            Ok(()) => {}
            Err(StoreError::Duplicate { .. }) => return Err(SessionError::DuplicateCandidate),
            Err(e) => return Err(e.into()),
        }

        self.remove(id).await;
        info!(session_id = %id, record_id = %record.id, "Screening submitted");
        Ok(record)
    }

    /// Drop a session without saving. Returns whether it existed.
    pub async fn discard(&self, id: Uuid) -> bool {
        let removed = self.remove(id).await;
        if removed {
            info!(session_id = %id, "Screening session discarded");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::screening::{FieldSpec, QuestionBank, QuestionSelector};
    use crate::store::JsonFileStore;

    /// In-memory store for manager tests.
    #[derive(Default)]
    struct MemoryStore {
        records: Mutex<Vec<CandidateRecord>>,
    }

    #[async_trait]
    impl CandidateStore for MemoryStore {
        async fn exists(&self, email: &str, phone: &str) -> Result<bool, StoreError> {
            Ok(self.records.lock().await.iter().any(|r| r.matches(email, phone)))
        }

        async fn save(&self, record: &CandidateRecord) -> Result<(), StoreError> {
            let mut records = self.records.lock().await;
            if records.iter().any(|r| r.matches(record.email(), record.phone())) {
                return Err(StoreError::Duplicate {
                    email: record.email().to_string(),
                });
            }
            records.push(record.clone());
            Ok(())
        }

        async fn list(&self) -> Result<Vec<CandidateRecord>, StoreError> {
            Ok(self.records.lock().await.clone())
        }
    }

    const PROFILE: [&str; 7] = [
        "Ada Lovelace",
        "ada@example.com",
        "+14155552671",
        "5",
        "Backend Engineer",
        "London",
        "Python, django",
    ];

    fn manager() -> (SessionManager, Arc<MemoryStore>) {
        let bank = QuestionBank::from_entries([
            ("python", vec!["Q1".to_string(), "Q2".to_string()]),
            ("django", vec!["Q3".to_string()]),
        ]);
        let driver = Driver::new(FieldSpec::default(), QuestionSelector::new(Arc::new(bank)));
        let store = Arc::new(MemoryStore::default());
        (SessionManager::new(Arc::new(driver), store.clone()), store)
    }

    async fn fill_profile(m: &SessionManager, id: Uuid, answers: &[&str]) -> Turn {
        let mut last = Turn::Exited;
        for answer in answers {
            last = m.submit(id, answer).await.unwrap();
        }
        last
    }

    #[tokio::test]
    async fn create_returns_first_prompt() {
        let (m, _) = manager();
        let (id, prompt) = m.create().await;
        assert_eq!(prompt.unwrap().field, FieldName::FullName);
        let status = m.status(id).await.unwrap();
        assert_eq!(status.phase, SessionPhase::Collecting(0));
        assert_eq!(status.progress, 0.0);
        assert_eq!(m.len().await, 1);
    }

    #[tokio::test]
    async fn full_screening_is_saved() {
        let (m, store) = manager();
        let (id, _) = m.create().await;

        match fill_profile(&m, id, &PROFILE).await {
            Turn::Question(q) => {
                assert_eq!(q.question, "Q1");
                assert_eq!(q.total, 3);
            }
            other => panic!("unexpected turn {other:?}"),
        }

        assert!(matches!(m.submit(id, "answer one").await.unwrap(), Turn::Question(_)));
        assert!(matches!(m.submit(id, "answer two").await.unwrap(), Turn::Question(_)));
        assert_eq!(m.submit(id, "answer three").await.unwrap(), Turn::InterviewFinished);

        let status = m.status(id).await.unwrap();
        assert!(status.interview_finished);
        assert_eq!(status.progress, 1.0);

        let record = m.finalize(id).await.unwrap();
        assert_eq!(record.basic_info.get("Full Name"), Some("Ada Lovelace"));
        assert_eq!(record.technical_answers.len(), 3);
        assert_eq!(record.technical_answers[2].answer, "answer three");

        assert_eq!(store.list().await.unwrap().len(), 1);
        assert!(matches!(m.status(id).await, Err(SessionError::NotFound { .. })));
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let (m, _) = manager();
        let (a, _) = m.create().await;
        let (b, _) = m.create().await;

        m.submit(a, "Ada").await.unwrap();
        assert_eq!(m.submit(b, "exit").await.unwrap(), Turn::Exited);

        let sa = m.status(a).await.unwrap();
        assert_eq!(sa.phase, SessionPhase::Collecting(1));
        assert_eq!(sa.profile.get(FieldName::FullName), Some("Ada"));
        assert!(matches!(m.status(b).await, Err(SessionError::NotFound { .. })));
        assert_eq!(m.len().await, 1);
    }

    #[tokio::test]
    async fn exit_during_profile_closes_session() {
        let (m, _) = manager();
        let mut ids = Vec::new();
        for _ in 0..20 {
            let (id, _) = m.create().await;
            ids.push(id);
        }
        for (i, id) in ids.iter().enumerate() {
            // Leave from a different field each time
            fill_profile(&m, *id, &PROFILE[..i % 6]).await;
            assert_eq!(m.submit(*id, "exit").await.unwrap(), Turn::Exited);
        }
        assert!(m.is_empty().await);
        assert!(matches!(
            m.submit(ids[0], "Ada").await,
            Err(SessionError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let (m, _) = manager();
        let id = Uuid::new_v4();
        assert!(matches!(m.submit(id, "hi").await, Err(SessionError::NotFound { .. })));
        assert!(matches!(m.finalize(id).await, Err(SessionError::NotFound { .. })));
        assert!(!m.discard(id).await);
    }

    #[tokio::test]
    async fn finalize_requires_finished_interview() {
        let (m, _) = manager();
        let (id, _) = m.create().await;
        assert!(matches!(m.finalize(id).await, Err(SessionError::NotReady { .. })));

        fill_profile(&m, id, &PROFILE).await;
        assert!(matches!(m.finalize(id).await, Err(SessionError::NotReady { .. })));
        assert!(m.status(id).await.unwrap().progress < 1.0);
    }

    #[tokio::test]
    async fn blank_interview_answer_reasks() {
        let (m, _) = manager();
        let (id, _) = m.create().await;
        fill_profile(&m, id, &PROFILE).await;
        match m.submit(id, "  ").await.unwrap() {
            Turn::Question(q) => {
                assert_eq!(q.number, 1);
                assert!(q.rejection.is_some());
            }
            other => panic!("unexpected turn {other:?}"),
        }
    }

    #[tokio::test]
    async fn exit_during_interview_discards_session() {
        let (m, store) = manager();
        let (id, _) = m.create().await;
        fill_profile(&m, id, &PROFILE).await;
        assert_eq!(m.submit(id, "Quit").await.unwrap(), Turn::Exited);
        assert!(m.status(id).await.is_err());
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn returning_candidate_is_stopped_at_email() {
        let (m, _) = manager();
        let (first, _) = m.create().await;
        fill_profile(&m, first, &PROFILE).await;
        for answer in ["a", "b", "c"] {
            m.submit(first, answer).await.unwrap();
        }
        m.finalize(first).await.unwrap();

        let (second, _) = m.create().await;
        m.submit(second, "Ada Again").await.unwrap();
        let err = m.submit(second, "ADA@example.com").await.unwrap_err();
        assert!(matches!(err, SessionError::DuplicateCandidate));
        assert!(m.status(second).await.is_err());
    }

    #[tokio::test]
    async fn returning_candidate_is_stopped_at_reformatted_phone() {
        let (m, store) = manager();
        let mut profile = CandidateProfile::default();
        profile.insert(FieldName::Email, "ada@example.com".to_string());
        profile.insert(FieldName::Phone, "+14155552671".to_string());
        store.save(&CandidateRecord::new(&profile, Vec::new())).await.unwrap();

        let (id, _) = m.create().await;
        m.submit(id, "Someone Else").await.unwrap();
        m.submit(id, "someone@example.com").await.unwrap();
        let err = m.submit(id, "+1 415-555-2671").await.unwrap_err();
        assert!(matches!(err, SessionError::DuplicateCandidate));
        assert!(m.is_empty().await);
    }

    #[tokio::test]
    async fn store_failure_does_not_accept_answer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        tokio::fs::write(&path, "{corrupt").await.unwrap();

        let bank = QuestionBank::from_entries([("python", vec!["Q1".to_string()])]);
        let driver = Driver::new(FieldSpec::default(), QuestionSelector::new(Arc::new(bank)));
        let m = SessionManager::new(Arc::new(driver), Arc::new(JsonFileStore::new(&path)));

        let (id, _) = m.create().await;
        m.submit(id, "Ada").await.unwrap();
        assert!(matches!(
            m.submit(id, "ada@example.com").await,
            Err(SessionError::Store(_))
        ));

        let status = m.status(id).await.unwrap();
        assert_eq!(status.phase, SessionPhase::Collecting(1));
        assert!(status.profile.get(FieldName::Email).is_none());

        // Retrying once the store is readable goes to the same field
        tokio::fs::write(&path, "[]").await.unwrap();
        match m.submit(id, "ada@example.com").await.unwrap() {
            Turn::Prompt(p) => assert_eq!(p.field, FieldName::Phone),
            other => panic!("unexpected turn {other:?}"),
        }
    }

    #[tokio::test]
    async fn exit_after_known_email_is_still_exit() {
        let (m, store) = manager();
        let mut profile = CandidateProfile::default();
        profile.insert(FieldName::Email, "ada@example.com".to_string());
        store.save(&CandidateRecord::new(&profile, Vec::new())).await.unwrap();

        let (id, _) = m.create().await;
        m.submit(id, "Ada").await.unwrap();
        assert!(m.submit(id, "ada@example.com").await.is_err());

        let (id, _) = m.create().await;
        m.submit(id, "Ada").await.unwrap();
        assert_eq!(m.submit(id, "bye").await.unwrap(), Turn::Exited);
    }

    #[tokio::test]
    async fn rejected_email_does_not_trigger_lookup() {
        let (m, _) = manager();
        let (id, _) = m.create().await;
        m.submit(id, "Ada").await.unwrap();
        match m.submit(id, "not-an-email").await.unwrap() {
            Turn::Prompt(p) => assert_eq!(p.field, FieldName::Email),
            other => panic!("unexpected turn {other:?}"),
        }
    }

    #[tokio::test]
    async fn discard_removes_session() {
        let (m, _) = manager();
        let (id, _) = m.create().await;
        assert!(m.discard(id).await);
        assert!(m.is_empty().await);
    }
}
