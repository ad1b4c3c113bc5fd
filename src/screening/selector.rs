//! Question selector: maps a free-text tech stack to technical questions.

use std::collections::HashSet;
use std::sync::Arc;

use super::bank::QuestionBank;
use super::model::TechnicalQuestion;

/// Tech tag used for the fallback question.
pub const GENERAL_TECH: &str = "general";

/// Fallback used when the tech stack answer is blank.
pub const DEFAULT_FALLBACK_QUESTION: &str =
    "Tell me about a recent technical project you are proud of.";

/// Split a tech stack answer into lowercase keyword tokens, in order.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| c == ',' || c == ';' || c == '/' || c.is_whitespace())
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Stateless selector over a shared, read-only question bank.
#[derive(Debug, Clone)]
pub struct QuestionSelector {
    bank: Arc<QuestionBank>,
}

impl QuestionSelector {
    pub fn new(bank: Arc<QuestionBank>) -> Self {
        Self { bank }
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Questions for every matched technology, in token order. Aliases
    /// count as their keyword, so "Node.js, node" asks once.
    pub fn select_questions(&self, tech_stack: &str) -> Vec<String> {
        self.select_tagged(tech_stack)
            .into_iter()
            .map(|q| q.question)
            .collect()
    }

    /// Like [`select_questions`](Self::select_questions), keeping the
    /// matched technology alongside each question.
    pub fn select_tagged(&self, tech_stack: &str) -> Vec<TechnicalQuestion> {
        let mut seen = HashSet::new();
        let mut selected = Vec::new();

        for token in tokenize(tech_stack) {
            let Some((tech, questions)) = self.bank.resolve(&token) else {
                continue;
            };
            if !seen.insert(tech) {
                continue;
            }
            selected.extend(questions.iter().map(|q| TechnicalQuestion {
                tech: tech.to_string(),
                question: q.clone(),
            }));
        }

        if selected.is_empty() {
            selected.push(fallback_question(tech_stack));
        }
        selected
    }
}

fn fallback_question(tech_stack: &str) -> TechnicalQuestion {
    let raw = tech_stack.trim();
    let question = if raw.is_empty() {
        DEFAULT_FALLBACK_QUESTION.to_string()
    } else {
        format!("Tell me more about your experience with {raw}.")
    };
    TechnicalQuestion {
        tech: GENERAL_TECH.to_string(),
        question,
    }
}
