use super::domain::LeadSubmission;
use serde::Serialize;
use std::fmt;

const MIN_NAME_CHARS: usize = 2;
const MIN_PHONE_CHARS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadField {
    Name,
    Phone,
    Service,
}

impl LeadField {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Phone => "phone",
            Self::Service => "service",
        }
    }
}

/// One inline error message attached to a form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: LeadField,
    pub message: String,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field.label(), self.message)
    }
}

/// Client-side schema check run before any delivery attempt. Values are
/// trimmed first so whitespace padding cannot satisfy a length rule.
pub fn validate_submission(submission: &LeadSubmission) -> Result<(), Vec<FieldViolation>> {
    let mut violations = Vec::new();

    if submission.name.trim().chars().count() < MIN_NAME_CHARS {
        violations.push(FieldViolation {
            field: LeadField::Name,
            message: format!("must be at least {MIN_NAME_CHARS} characters"),
        });
    }

    if submission.phone.trim().chars().count() < MIN_PHONE_CHARS {
        violations.push(FieldViolation {
            field: LeadField::Phone,
            message: format!("must be at least {MIN_PHONE_CHARS} characters"),
        });
    }

    if submission.service.trim().is_empty() {
        violations.push(FieldViolation {
            field: LeadField::Service,
            message: "select a service".to_string(),
        });
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_submission() -> LeadSubmission {
        LeadSubmission {
            name: "Anna".to_string(),
            phone: "+7 900 123".to_string(),
            email: None,
            service: "apartment-selection".to_string(),
            message: Some("Looking for a two-room apartment".to_string()),
            source: "website".to_string(),
            property_id: Some(42),
        }
    }

    #[test]
    fn two_character_name_is_the_lower_boundary() {
        let mut submission = valid_submission();
        submission.name = "Li".to_string();
        assert!(validate_submission(&submission).is_ok());

        submission.name = "L".to_string();
        let violations = validate_submission(&submission).expect_err("short name rejected");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, LeadField::Name);
    }

    #[test]
    fn ten_character_phone_is_the_lower_boundary() {
        let mut submission = valid_submission();
        submission.phone = "8900123456".to_string();
        assert!(validate_submission(&submission).is_ok());

        submission.phone = "890012345".to_string();
        let violations = validate_submission(&submission).expect_err("short phone rejected");
        assert_eq!(violations[0].field, LeadField::Phone);
    }

    #[test]
    fn whitespace_padding_does_not_satisfy_length_rules() {
        let mut submission = valid_submission();
        submission.name = " A        ".to_string();
        let violations = validate_submission(&submission).expect_err("padded name rejected");
        assert_eq!(violations[0].field, LeadField::Name);
    }

    #[test]
    fn missing_service_collects_its_own_violation() {
        let mut submission = valid_submission();
        submission.service = String::new();
        submission.name = String::new();
        let violations = validate_submission(&submission).expect_err("two violations");
        assert_eq!(violations.len(), 2);
        assert!(violations.iter().any(|v| v.field == LeadField::Service));
    }
}
