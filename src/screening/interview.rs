//! Simulated technical interview: one answer per selected question.

use serde::{Deserialize, Serialize};

use crate::error::AnswerError;

use super::model::{TechnicalAnswer, TechnicalQuestion};

/// A technical question as presented to the candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionPrompt {
    pub tech: String,
    pub question: String,
    /// One-based position, for "Question 2 of 6".
    pub number: usize,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection: Option<AnswerError>,
}

impl QuestionPrompt {
    pub fn heading(&self) -> String {
        format!("{} - Question {} of {}", self.tech, self.number, self.total)
    }
}

/// Outcome of answering one technical question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterviewStep {
    NextQuestion(QuestionPrompt),
    Finished,
}

/// Progress through the selected technical questions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InterviewState {
    questions: Vec<TechnicalQuestion>,
    answers: Vec<TechnicalAnswer>,
}

impl InterviewState {
    pub fn new(questions: Vec<TechnicalQuestion>) -> Self {
        Self {
            questions,
            answers: Vec::new(),
        }
    }

    /// Index of the question awaiting an answer.
    pub fn cursor(&self) -> usize {
        self.answers.len()
    }

    pub fn is_finished(&self) -> bool {
        self.cursor() >= self.questions.len()
    }

    pub fn answers(&self) -> &[TechnicalAnswer] {
        &self.answers
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// The question awaiting an answer, if any.
    pub fn current(&self) -> Option<QuestionPrompt> {
        self.prompt(None)
    }

    fn prompt(&self, rejection: Option<AnswerError>) -> Option<QuestionPrompt> {
        let index = self.cursor();
        self.questions.get(index).map(|q| QuestionPrompt {
            tech: q.tech.clone(),
            question: q.question.clone(),
            number: index + 1,
            total: self.questions.len(),
            rejection,
        })
    }

    /// Record an answer to the current question.
    ///
    /// Blank answers re-ask the same question. Answering a finished
    /// interview is a no-op.
    pub fn answer(&mut self, raw_text: &str) -> InterviewStep {
        let text = raw_text.trim();
        let Some(question) = self.questions.get(self.cursor()) else {
            return InterviewStep::Finished;
        };

        if text.is_empty() {
            return match self.prompt(Some(AnswerError::EmptyAnswer)) {
                Some(prompt) => InterviewStep::NextQuestion(prompt),
                None => InterviewStep::Finished,
            };
        }

        self.answers.push(TechnicalAnswer {
            tech: question.tech.clone(),
            question: question.question.clone(),
            answer: text.to_string(),
        });

        match self.current() {
            Some(prompt) => InterviewStep::NextQuestion(prompt),
            None => InterviewStep::Finished,
        }
    }
}
