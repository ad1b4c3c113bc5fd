//! Candidate profile fields, their prompts, and their validation rules.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::AnswerError;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern"));

/// Characters a phone answer may contain before separators are stripped.
static PHONE_CHARS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9 ().\-]+$").expect("phone charset pattern"));

/// E.164 shape: optional `+`, no leading zero, 7 to 15 digits.
static PHONE_DIGITS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[1-9][0-9]{6,14}$").expect("phone digits pattern"));

static YEARS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+(?:\.[0-9]+)?)").expect("years pattern"));

/// Upper bound accepted for years of experience.
const MAX_YEARS_OF_EXPERIENCE: f64 = 60.0;

/// One piece of candidate information, in question order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    FullName,
    Email,
    Phone,
    Experience,
    DesiredPosition,
    Location,
    TechStack,
}

impl FieldName {
    /// All fields in the order they are asked.
    pub const ALL: [FieldName; 7] = [
        Self::FullName,
        Self::Email,
        Self::Phone,
        Self::Experience,
        Self::DesiredPosition,
        Self::Location,
        Self::TechStack,
    ];

    /// Human-readable label, also used as the key in saved records.
    pub fn label(&self) -> &'static str {
        match self {
            Self::FullName => "Full Name",
            Self::Email => "Email",
            Self::Phone => "Phone Number",
            Self::Experience => "Years of Experience",
            Self::DesiredPosition => "Desired Position(s)",
            Self::Location => "Current Location",
            Self::TechStack => "Tech Stack",
        }
    }
}

impl std::fmt::Display for FieldName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::FullName => "full_name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Experience => "experience",
            Self::DesiredPosition => "desired_position",
            Self::Location => "location",
            Self::TechStack => "tech_stack",
        };
        write!(f, "{s}")
    }
}

/// Validation rule applied to a trimmed, non-empty answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validator {
    NonEmpty,
    Email,
    Phone,
    YearsOfExperience,
}

impl Validator {
    /// Check `value` (already trimmed) against this rule.
    pub fn check(&self, field: FieldName, value: &str) -> Result<(), AnswerError> {
        if value.is_empty() {
            return Err(AnswerError::EmptyAnswer);
        }

        let invalid = |reason: &str| AnswerError::InvalidFormat {
            field,
            reason: reason.to_string(),
        };

        match self {
            Self::NonEmpty => Ok(()),
            Self::Email => {
                if is_valid_email(value) {
                    Ok(())
                } else {
                    Err(invalid("expected something like name@example.com"))
                }
            }
            Self::Phone => {
                if is_valid_phone(value) {
                    Ok(())
                } else {
                    Err(invalid(
                        "use digits with an optional leading +, between 7 and 15 digits",
                    ))
                }
            }
            Self::YearsOfExperience => match parse_years(value) {
                Some(years) if years <= MAX_YEARS_OF_EXPERIENCE => Ok(()),
                Some(_) => Err(invalid("expected at most 60 years")),
                None => Err(invalid("start your answer with a number, e.g. 3 or 4.5")),
            },
        }
    }

    /// Canonical form stored for an accepted answer.
    pub fn normalize(&self, value: &str) -> String {
        match self {
            Self::Phone => normalize_phone(value),
            _ => value.to_string(),
        }
    }
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Accepts common separators (spaces, dashes, dots, parentheses), then
/// requires the remaining digits to look like an E.164 number.
pub fn is_valid_phone(value: &str) -> bool {
    if !PHONE_CHARS_RE.is_match(value) {
        return false;
    }
    PHONE_DIGITS_RE.is_match(&normalize_phone(value))
}

/// Strip separators from a phone number, keeping a leading `+`.
///
/// `"+1 (415) 555-2671"` and `"+14155552671"` normalize to the same string.
pub fn normalize_phone(value: &str) -> String {
    let value = value.trim();
    let digits = value.chars().filter(char::is_ascii_digit);
    if value.starts_with('+') {
        std::iter::once('+').chain(digits).collect()
    } else {
        digits.collect()
    }
}

/// Leading number of a years-of-experience answer ("3.5 years" -> 3.5).
pub fn parse_years(value: &str) -> Option<f64> {
    YEARS_RE
        .captures(value)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// A single question in the profile form.
#[derive(Debug, Clone)]
pub struct FieldDef {
    pub name: FieldName,
    pub prompt: String,
    pub validator: Validator,
}

/// The ordered, immutable list of profile questions.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    fields: Vec<FieldDef>,
}

impl Default for FieldSpec {
    fn default() -> Self {
        let def = |name, prompt: &str, validator| FieldDef {
            name,
            prompt: prompt.to_string(),
            validator,
        };
        Self {
            fields: vec![
                def(
                    FieldName::FullName,
                    "Hi, I'm TalentScout! Let's start with your full name.",
                    Validator::NonEmpty,
                ),
                def(
                    FieldName::Email,
                    "What's the best email address to reach you at?",
                    Validator::Email,
                ),
                def(
                    FieldName::Phone,
                    "And your phone number?",
                    Validator::Phone,
                ),
                def(
                    FieldName::Experience,
                    "How many years of professional experience do you have?",
                    Validator::YearsOfExperience,
                ),
                def(
                    FieldName::DesiredPosition,
                    "Which position(s) are you applying for?",
                    Validator::NonEmpty,
                ),
                def(
                    FieldName::Location,
                    "Where are you currently located?",
                    Validator::NonEmpty,
                ),
                def(
                    FieldName::TechStack,
                    "Finally, list your tech stack: languages, frameworks, databases and tools.",
                    Validator::NonEmpty,
                ),
            ],
        }
    }
}

impl FieldSpec {
    pub fn new(fields: Vec<FieldDef>) -> Self {
        Self { fields }
    }

    pub fn get(&self, index: usize) -> Option<&FieldDef> {
        self.fields.get(index)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter()
    }
}
