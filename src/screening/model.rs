//! Candidate profile and screening record models.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use super::fields::{FieldName, normalize_phone};

/// Answers collected so far, keyed by field.
///
/// A field is only inserted after its answer passed validation. Iteration
/// follows question order because `FieldName` orders that way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateProfile {
    values: BTreeMap<FieldName, String>,
}

impl CandidateProfile {
    pub fn get(&self, field: FieldName) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    pub(crate) fn insert(&mut self, field: FieldName, value: String) {
        self.values.insert(field, value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldName, &str)> {
        self.values.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Label-keyed view in question order, the shape saved under `basic_info`.
    pub fn to_labeled(&self) -> BasicInfo {
        BasicInfo {
            entries: self
                .iter()
                .map(|(k, v)| (k.label().to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Render the profile as a markdown summary.
    pub fn to_summary(&self) -> String {
        let mut parts = vec!["### Your Info".to_string()];
        for (field, value) in self.iter() {
            parts.push(format!("- **{}:** {}", field.label(), value));
        }
        parts.join("\n")
    }
}

/// Profile answers keyed by field label.
///
/// Serialized as a JSON object whose keys keep the order they were
/// inserted in, so saved records list fields in question order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasicInfo {
    entries: Vec<(String, String)>,
}

impl BasicInfo {
    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == label)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Serialize for BasicInfo {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl<'de> Deserialize<'de> for BasicInfo {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BasicInfoVisitor;

        impl<'de> Visitor<'de> for BasicInfoVisitor {
            type Value = BasicInfo;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field labels to answers")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<BasicInfo, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((label, value)) = map.next_entry::<String, String>()? {
                    entries.push((label, value));
                }
                Ok(BasicInfo { entries })
            }
        }

        deserializer.deserialize_map(BasicInfoVisitor)
    }
}

/// A technical question picked from the question bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnicalQuestion {
    /// Matched technology keyword, or `"general"` for the fallback.
    pub tech: String,
    pub question: String,
}

/// A candidate's answer to one technical question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnicalAnswer {
    pub tech: String,
    pub question: String,
    pub answer: String,
}

/// A finished screening, as persisted in the data file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub id: Uuid,
    /// Profile answers keyed by field label ("Email", "Phone Number", ...).
    pub basic_info: BasicInfo,
    pub technical_answers: Vec<TechnicalAnswer>,
    pub submitted_at: DateTime<Utc>,
}

impl CandidateRecord {
    pub fn new(profile: &CandidateProfile, technical_answers: Vec<TechnicalAnswer>) -> Self {
        Self {
            id: Uuid::new_v4(),
            basic_info: profile.to_labeled(),
            technical_answers,
            submitted_at: Utc::now(),
        }
    }

    pub fn email(&self) -> &str {
        self.basic_info.get(FieldName::Email.label()).unwrap_or("")
    }

    pub fn phone(&self) -> &str {
        self.basic_info.get(FieldName::Phone.label()).unwrap_or("")
    }

    /// Same candidate: email matches case-insensitively, or phone matches
    /// once separators are stripped.
    pub fn matches(&self, email: &str, phone: &str) -> bool {
        let email = email.trim();
        let phone = normalize_phone(phone);
        (!email.is_empty() && self.email().eq_ignore_ascii_case(email))
            || (!phone.is_empty() && normalize_phone(self.phone()) == phone)
    }
}
