use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::domain::{CandidateDraft, RegistrationSubmission};
use crate::workflows::is_valid_email;

const MIN_NAME_CHARS: usize = 2;

/// Field-level problems with a registration, keyed by submitted field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub fields: BTreeMap<&'static str, Vec<String>>,
}

impl ValidationError {
    fn push(&mut self, field: &'static str, message: &str) {
        self.fields
            .entry(field)
            .or_default()
            .push(message.to_string());
    }

    pub fn messages(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or_default()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.fields.keys().copied().collect();
        write!(f, "validation failed for: {}", fields.join(", "))
    }
}

impl std::error::Error for ValidationError {}

/// Turns raw submissions into drafts, trimming text and rejecting malformed input.
#[derive(Debug, Clone, Default)]
pub struct RegistrationGuard;

impl RegistrationGuard {
    pub fn draft_from_submission(
        &self,
        submission: RegistrationSubmission,
    ) -> Result<CandidateDraft, ValidationError> {
        let mut errors = ValidationError::default();

        let name = submission.name.trim().to_string();
        if name.chars().count() < MIN_NAME_CHARS {
            errors.push("name", "Name must be at least 2 characters.");
        }

        let email = submission.email.trim().to_string();
        if !is_valid_email(&email) {
            errors.push("email", "Please enter a valid email address.");
        }

        if !errors.fields.is_empty() {
            return Err(errors);
        }

        let contact = submission
            .contact
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        Ok(CandidateDraft {
            name,
            email,
            contact,
            skills: submission.skills,
        })
    }
}
