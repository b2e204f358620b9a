//! Registration form validation rules.
//!
//! Every field is checked independently and reports only its first failing
//! rule, so one submit attempt can surface several errors at once.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::model::{RegistrationForm, RegistrationRecord};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^[A-Za-z0-9._%+\-]+@",
        r"[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?",
        r"(?:\.[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?)*",
        r"\.[A-Za-z]{2,}$",
    ))
    .expect("email pattern compiles")
});

const MIN_NAME_LEN: usize = 2;
const MIN_PHONE_LEN: usize = 10;

/// Fields of the registration form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    FirstName,
    LastName,
    Gender,
    Country,
    Email,
    Phone,
    AcceptTerms,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::FirstName,
        Field::LastName,
        Field::Gender,
        Field::Country,
        Field::Email,
        Field::Phone,
        Field::AcceptTerms,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Gender => "gender",
            Self::Country => "country",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::AcceptTerms => "acceptTerms",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Field-keyed validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }

    /// Record or clear the message for one field.
    pub fn set(&mut self, field: Field, message: Option<String>) {
        match message {
            Some(msg) => self.0.insert(field, msg),
            None => self.0.remove(&field),
        };
    }
}

/// Check one field, returning its first failing rule's message.
pub fn validate_field(field: Field, form: &RegistrationForm) -> Option<String> {
    let msg = match field {
        Field::FirstName => check_name(
            &form.first_name,
            "First name is required",
            "First name must be at least 2 characters",
        ),
        Field::LastName => check_name(
            &form.last_name,
            "Last name is required",
            "Last name must be at least 2 characters",
        ),
        // The enum type already constrains membership.
        Field::Gender => form.gender.is_none().then_some("Please select a gender"),
        Field::Country => form
            .country
            .trim()
            .is_empty()
            .then_some("Please select a country"),
        Field::Email => {
            if form.email.trim().is_empty() {
                Some("Email is required")
            } else if !EMAIL_RE.is_match(form.email.trim()) {
                Some("Please enter a valid email address")
            } else {
                None
            }
        }
        Field::Phone => {
            if form.phone.trim().is_empty() {
                Some("Phone number is required")
            } else if form.phone.chars().count() < MIN_PHONE_LEN {
                Some("Phone number must be at least 10 characters")
            } else {
                None
            }
        }
        Field::AcceptTerms => (form.accept_terms != Some(true))
            .then_some("You must accept the terms and conditions"),
    };
    msg.map(String::from)
}

fn check_name(
    value: &str,
    required: &'static str,
    too_short: &'static str,
) -> Option<&'static str> {
    let value = value.trim();
    if value.is_empty() {
        Some(required)
    } else if value.chars().count() < MIN_NAME_LEN {
        Some(too_short)
    } else {
        None
    }
}

/// Validate the whole form. On success the validated record is returned.
pub fn validate(form: &RegistrationForm) -> Result<RegistrationRecord, FieldErrors> {
    let mut errors = FieldErrors::default();
    for field in Field::ALL {
        errors.set(field, validate_field(field, form));
    }

    match (errors.is_empty(), form.gender) {
        (true, Some(gender)) => Ok(RegistrationRecord {
            first_name: form.first_name.trim().to_string(),
            last_name: form.last_name.trim().to_string(),
            gender,
            country: form.country.trim().to_string(),
            email: form.email.trim().to_string(),
            phone: form.phone.clone(),
            accept_terms: true,
        }),
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registration::model::Gender;

    fn valid_form() -> RegistrationForm {
        RegistrationForm {
            first_name: "Omar".into(),
            last_name: "Farouk".into(),
            gender: Some(Gender::Male),
            country: "AE".into(),
            email: "omar@example.com".into(),
            phone: "(050) - 1234".into(),
            accept_terms: Some(true),
        }
    }

    #[test]
    fn valid_form_produces_record() {
        let record = validate(&valid_form()).unwrap();
        assert_eq!(record.first_name, "Omar");
        assert_eq!(record.gender, Gender::Male);
        assert!(record.accept_terms);
    }

    #[test]
    fn empty_form_reports_every_field() {
        let errors = validate(&RegistrationForm::default()).unwrap_err();
        assert_eq!(errors.len(), 7);
        for field in Field::ALL {
            assert!(errors.contains(field), "missing error for {field}");
        }
        assert_eq!(errors.get(Field::FirstName), Some("First name is required"));
        assert_eq!(
            errors.get(Field::AcceptTerms),
            Some("You must accept the terms and conditions")
        );
    }

    #[test]
    fn short_names_fail_min_length() {
        let form = RegistrationForm {
            first_name: "A".into(),
            last_name: "B".into(),
            ..valid_form()
        };
        let errors = validate(&form).unwrap_err();
        assert_eq!(
            errors.get(Field::FirstName),
            Some("First name must be at least 2 characters")
        );
        assert_eq!(
            errors.get(Field::LastName),
            Some("Last name must be at least 2 characters")
        );
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn email_shape() {
        for bad in ["plain", "a@b", "a@@b.com", "a b@c.com", "@example.com"] {
            let form = RegistrationForm {
                email: bad.into(),
                ..valid_form()
            };
            assert_eq!(
                validate_field(Field::Email, &form).as_deref(),
                Some("Please enter a valid email address"),
                "{bad} should be rejected"
            );
        }
        for good in ["a@b.co", "first.last+tag@sub.example.org"] {
            let form = RegistrationForm {
                email: good.into(),
                ..valid_form()
            };
            assert!(validate_field(Field::Email, &form).is_none(), "{good}");
        }
    }

    #[test]
    fn phone_length_counts_formatted_characters() {
        // 9 characters including punctuation
        let form = RegistrationForm {
            phone: "(050) - 1".into(),
            ..valid_form()
        };
        assert_eq!(
            validate_field(Field::Phone, &form).as_deref(),
            Some("Phone number must be at least 10 characters")
        );

        // 10 characters, only 5 of them digits
        let form = RegistrationForm {
            phone: "(050) - 12".into(),
            ..valid_form()
        };
        assert!(validate_field(Field::Phone, &form).is_none());
    }

    #[test]
    fn accept_terms_rejects_false_and_absent() {
        for accept in [None, Some(false)] {
            let form = RegistrationForm {
                accept_terms: accept,
                ..valid_form()
            };
            assert!(validate_field(Field::AcceptTerms, &form).is_some());
        }
    }

    #[test]
    fn field_names_serialize_camel_case() {
        let json = serde_json::to_string(&Field::AcceptTerms).unwrap();
        assert_eq!(json, "\"acceptTerms\"");
    }
}
