//! Form validation: `User` -> per-field error messages.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::User;

pub const REQUIRED: &str = "This field is required";
pub const INVALID_TELEPHONE: &str = "Please enter a valid telephone number";
pub const INVALID_EMAIL: &str = "Please enter a valid email address";

/// Validated fields of a user record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Firstname,
    Name,
    Telephone,
    Email,
    Role,
    Status,
    Position,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Firstname,
        Field::Name,
        Field::Telephone,
        Field::Email,
        Field::Role,
        Field::Status,
        Field::Position,
    ];

    /// Empty string, or the unset sentinel for coded fields. A code of 0 is a real value.
    pub fn is_missing(self, user: &User) -> bool {
        match self {
            Field::Firstname => user.firstname.is_empty(),
            Field::Name => user.name.is_empty(),
            Field::Telephone => user.telephone.is_empty(),
            Field::Email => user.email.is_empty(),
            Field::Role => user.role.is_empty(),
            Field::Status => user.status.is_unset(),
            Field::Position => user.position.is_unset(),
        }
    }
}

/// One optional message per known field. Empty means the record may be submitted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub firstname: Option<String>,
    pub name: Option<String>,
    pub telephone: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
    pub position: Option<String>,
}

impl FieldErrors {
    pub fn get(&self, field: Field) -> Option<&str> {
        self.slot(field).as_deref()
    }

    pub fn set(&mut self, field: Field, message: impl Into<String>) {
        *self.slot_mut(field) = Some(message.into());
    }

    pub fn is_empty(&self) -> bool {
        Field::ALL.iter().all(|f| self.slot(*f).is_none())
    }

    pub fn len(&self) -> usize {
        Field::ALL.iter().filter(|f| self.slot(**f).is_some()).count()
    }

    fn slot(&self, field: Field) -> &Option<String> {
        match field {
            Field::Firstname => &self.firstname,
            Field::Name => &self.name,
            Field::Telephone => &self.telephone,
            Field::Email => &self.email,
            Field::Role => &self.role,
            Field::Status => &self.status,
            Field::Position => &self.position,
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Firstname => &mut self.firstname,
            Field::Name => &mut self.name,
            Field::Telephone => &mut self.telephone,
            Field::Email => &mut self.email,
            Field::Role => &mut self.role,
            Field::Status => &mut self.status,
            Field::Position => &mut self.position,
        }
    }
}

fn is_digits(s: &str) -> bool {
    static REGEX: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("valid regex"));
    REGEX.is_match(s)
}

/// Loose `text@text.text`, matched anywhere in the input.
fn looks_like_email(s: &str) -> bool {
    static REGEX: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("valid regex"));
    REGEX.is_match(s)
}

/// Validate a record for submission.
///
/// When any required field is missing, every missing field gets a
/// required-error in the same pass. Format checks for telephone and email run
/// afterwards and overwrite whatever message those fields had.
pub fn validate(user: &User) -> FieldErrors {
    let mut errors = FieldErrors::default();

    if Field::ALL.iter().any(|f| f.is_missing(user)) {
        for field in Field::ALL {
            if field.is_missing(user) {
                errors.set(field, REQUIRED);
            }
        }
    }

    if !user.telephone.is_empty() && !is_digits(&user.telephone) {
        errors.set(Field::Telephone, INVALID_TELEPHONE);
    }

    if !user.email.is_empty() && !looks_like_email(&user.email) {
        errors.set(Field::Email, INVALID_EMAIL);
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Position, Status};

    fn complete() -> User {
        User {
            firstname: "Ada".into(),
            name: "Lovelace".into(),
            telephone: "5551234".into(),
            email: "ada@example.com".into(),
            role: "Administrator".into(),
            status: Status::Inactive,
            position: Position::Auditor,
            ..User::blank()
        }
    }

    #[test]
    fn zero_codes_are_valid() {
        let errors = validate(&complete());
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn blank_template_marks_every_field_required() {
        let errors = validate(&User::blank());
        assert_eq!(errors.len(), 7);
        for f in Field::ALL {
            assert_eq!(errors.get(f), Some(REQUIRED));
        }
    }

    #[test]
    fn single_missing_field_only_marks_that_field() {
        let mut u = complete();
        u.position = Position::Unset;
        let errors = validate(&u);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(Field::Position), Some(REQUIRED));
    }

    #[test]
    fn format_errors_override_and_stand_alone() {
        let mut u = complete();
        u.telephone = "55-12".into();
        u.email = "nope".into();
        let errors = validate(&u);
        assert_eq!(errors.get(Field::Telephone), Some(INVALID_TELEPHONE));
        assert_eq!(errors.get(Field::Email), Some(INVALID_EMAIL));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn email_pattern_is_loose() {
        assert!(looks_like_email("a@b.c"));
        assert!(looks_like_email("x a@b.c y"));
        assert!(!looks_like_email("a@b"));
        assert!(!looks_like_email("@b.c"));
    }
}
