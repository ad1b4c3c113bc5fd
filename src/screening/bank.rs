//! Question bank: technology keyword -> canned technical questions.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::ConfigError;

/// Alternate spellings accepted by the built-in bank, mapped to their key.
const BUILTIN_ALIASES: &[(&str, &str)] = &[
    ("python3", "python"),
    ("js", "javascript"),
    ("ts", "typescript"),
    ("react.js", "react"),
    ("reactjs", "react"),
    ("node.js", "node"),
    ("nodejs", "node"),
    ("springboot", "spring"),
    ("golang", "go"),
    ("mysql", "sql"),
    ("postgres", "postgresql"),
    ("psql", "postgresql"),
    ("mongo", "mongodb"),
    ("k8s", "kubernetes"),
];

/// Static lookup table from lowercase technology keyword to questions.
///
/// Loaded once at startup and read-only afterwards. Aliases map alternate
/// spellings ("node.js", "postgres") onto a keyword.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    entries: HashMap<String, Vec<String>>,
    aliases: HashMap<String, String>,
}

#[derive(Deserialize)]
#[serde(transparent)]
struct RawBank(HashMap<String, serde_json::Value>);

impl QuestionBank {
    /// Build a bank from raw entries. Keys are trimmed and lowercased;
    /// blank questions and entries left empty are dropped.
    pub fn from_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Vec<String>)>,
        K: AsRef<str>,
    {
        let mut map: HashMap<String, Vec<String>> = HashMap::new();
        for (key, questions) in entries {
            let key = key.as_ref().trim().to_lowercase();
            let questions: Vec<String> = questions
                .into_iter()
                .map(|q| q.trim().to_string())
                .filter(|q| !q.is_empty())
                .collect();
            if key.is_empty() || questions.is_empty() {
                debug!(key = %key, "Skipping empty question bank entry");
                continue;
            }
            map.entry(key).or_default().extend(questions);
        }
        Self {
            entries: map,
            aliases: HashMap::new(),
        }
    }

    /// Add alternate spellings for existing keywords. Both sides are
    /// normalized like keys; aliases that shadow a keyword are ignored.
    pub fn with_aliases<I, A, K>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = (A, K)>,
        A: AsRef<str>,
        K: AsRef<str>,
    {
        for (alias, key) in aliases {
            let alias = alias.as_ref().trim().to_lowercase();
            let key = key.as_ref().trim().to_lowercase();
            if alias.is_empty() || self.entries.contains_key(&alias) {
                continue;
            }
            if !self.entries.contains_key(&key) {
                debug!(alias = %alias, key = %key, "Skipping alias for unknown keyword");
                continue;
            }
            self.aliases.insert(alias, key);
        }
        self
    }

    /// Parse a JSON object of the form `{ "python": ["...", "..."] }`.
    ///
    /// Entries whose value is not a list of strings are skipped, so a
    /// malformed entry behaves like a technology with no questions.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let raw: RawBank = serde_json::from_str(json)?;
        let entries = raw.0.into_iter().filter_map(|(key, value)| {
            match serde_json::from_value::<Vec<String>>(value) {
                Ok(questions) => Some((key, questions)),
                Err(e) => {
                    warn!(key = %key, error = %e, "Ignoring malformed question bank entry");
                    None
                }
            }
        });
        Ok(Self::from_entries(entries))
    }

    /// Load a bank from a JSON file.
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let err = |reason: String| ConfigError::QuestionBank {
            path: path.display().to_string(),
            reason,
        };
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| err(e.to_string()))?;
        let bank = Self::from_json_str(&text).map_err(|e| err(e.to_string()))?;
        info!(path = %path.display(), technologies = bank.len(), "Loaded question bank");
        Ok(bank)
    }

    /// Questions for a keyword or alias (must already be lowercase).
    pub fn get(&self, keyword: &str) -> Option<&[String]> {
        self.resolve(keyword).map(|(_, questions)| questions)
    }

    /// The keyword a token names, with its questions.
    pub fn resolve(&self, token: &str) -> Option<(&str, &[String])> {
        let key = match self.entries.get_key_value(token) {
            Some((key, _)) => key.as_str(),
            None => self.aliases.get(token)?.as_str(),
        };
        self.entries.get(key).map(|questions| (key, questions.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The built-in bank used when no file is configured.
    pub fn builtin() -> Self {
        let q = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self::from_entries([
            (
                "python",
                q(&[
                    "What is the difference between a list and a tuple in Python?",
                    "How do generators differ from regular functions, and when would you use one?",
                    "Explain how the GIL affects multithreaded Python programs.",
                ]),
            ),
            (
                "django",
                q(&[
                    "How does Django's ORM translate a queryset into SQL, and when is it evaluated?",
                    "What is middleware in Django and how would you write your own?",
                    "How would you avoid N+1 queries in a Django view?",
                ]),
            ),
            (
                "flask",
                q(&[
                    "How do blueprints help structure a larger Flask application?",
                    "What are the application and request contexts in Flask?",
                    "How would you handle configuration for different environments in Flask?",
                ]),
            ),
            (
                "javascript",
                q(&[
                    "Explain the event loop and how promises are scheduled relative to timers.",
                    "What is the difference between `==` and `===`?",
                    "How do closures work, and where have you relied on one?",
                ]),
            ),
            (
                "typescript",
                q(&[
                    "What is the difference between an interface and a type alias?",
                    "How do generics with constraints work in TypeScript?",
                    "What does `unknown` give you that `any` does not?",
                ]),
            ),
            (
                "react",
                q(&[
                    "When does a React component re-render, and how do you prevent unnecessary renders?",
                    "Explain the rules of hooks and why they exist.",
                    "How would you manage state shared across distant components?",
                ]),
            ),
            (
                "node",
                q(&[
                    "How does Node.js handle concurrent I/O on a single thread?",
                    "What are streams in Node.js and when would you use them?",
                    "How do you handle errors in async Express middleware?",
                ]),
            ),
            (
                "java",
                q(&[
                    "Explain the difference between checked and unchecked exceptions.",
                    "How does garbage collection work in the JVM at a high level?",
                    "What are the contracts between `equals` and `hashCode`?",
                ]),
            ),
            (
                "spring",
                q(&[
                    "How does dependency injection work in Spring?",
                    "What does `@Transactional` do, and what are its pitfalls?",
                    "How would you structure configuration for multiple profiles in Spring Boot?",
                ]),
            ),
            (
                "rust",
                q(&[
                    "Explain ownership and borrowing, and what the borrow checker prevents.",
                    "When would you reach for `Rc<RefCell<T>>` versus `Arc<Mutex<T>>`?",
                    "How do traits and generics enable zero-cost abstractions?",
                ]),
            ),
            (
                "go",
                q(&[
                    "How do goroutines and channels coordinate concurrent work?",
                    "How are interfaces satisfied in Go?",
                    "How do you propagate cancellation with `context.Context`?",
                ]),
            ),
            (
                "sql",
                q(&[
                    "What is the difference between an INNER JOIN and a LEFT JOIN?",
                    "How do indexes speed up queries, and what do they cost?",
                    "Explain transaction isolation levels.",
                ]),
            ),
            (
                "postgresql",
                q(&[
                    "How would you investigate a slow query in PostgreSQL?",
                    "What is MVCC and how does VACUUM relate to it?",
                    "When would you use a JSONB column?",
                ]),
            ),
            (
                "mongodb",
                q(&[
                    "How do you model one-to-many relationships in MongoDB?",
                    "What is the aggregation pipeline?",
                    "How does sharding work in MongoDB?",
                ]),
            ),
            (
                "docker",
                q(&[
                    "What is the difference between an image and a container?",
                    "How do multi-stage builds reduce image size?",
                    "How would you persist data for a containerized database?",
                ]),
            ),
            (
                "kubernetes",
                q(&[
                    "What is the difference between a Deployment and a StatefulSet?",
                    "How do liveness and readiness probes differ?",
                    "How does a Service route traffic to pods?",
                ]),
            ),
            (
                "aws",
                q(&[
                    "How do IAM roles differ from IAM users?",
                    "When would you choose Lambda over ECS?",
                    "How would you design a highly available setup across availability zones?",
                ]),
            ),
            (
                "git",
                q(&[
                    "What is the difference between merge and rebase?",
                    "How would you recover a commit you accidentally reset away?",
                    "Describe a branching strategy you have used on a team.",
                ]),
            ),
        ])
        .with_aliases(BUILTIN_ALIASES.iter().copied())
    }
}
