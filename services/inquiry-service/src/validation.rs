use serde_json::{Map, Value};

use crate::models::{FieldError, Inquiry};

const NAME_MAX_CHARS: usize = 120;
const EMAIL_MAX_CHARS: usize = 254;
const MESSAGE_MAX_CHARS: usize = 5000;
const OPTIONAL_MAX_CHARS: usize = 200;

/// Every violation found in a payload, in field order.
#[derive(Debug, thiserror::Error)]
#[error("inquiry payload has {} invalid field(s)", .errors.len())]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn fields(&self) -> Vec<&str> {
        self.errors
            .iter()
            .filter_map(|error| error.loc.first().map(String::as_str))
            .collect()
    }
}

/// Checks an untyped request body against the inquiry schema.
///
/// All fields are checked before returning so callers get the complete list of
/// problems. Text values are trimmed; unknown keys are ignored.
pub fn validate(payload: &Value) -> Result<Inquiry, ValidationError> {
    let Some(fields) = payload.as_object() else {
        return Err(ValidationError {
            errors: vec![FieldError::new(
                "body",
                "model_type",
                "Input should be a valid dictionary",
            )],
        });
    };

    let name = required_text(fields, "name", NAME_MAX_CHARS);
    let email = required_text(fields, "email", EMAIL_MAX_CHARS).and_then(check_email);
    let message = required_text(fields, "message", MESSAGE_MAX_CHARS);
    let company = optional_text(fields, "company", OPTIONAL_MAX_CHARS);
    let phone = optional_text(fields, "phone", OPTIONAL_MAX_CHARS);
    let subject = optional_text(fields, "subject", OPTIONAL_MAX_CHARS);

    match (name, email, message, company, phone, subject) {
        (Ok(name), Ok(email), Ok(message), Ok(company), Ok(phone), Ok(subject)) => Ok(Inquiry {
            name,
            email,
            message,
            company,
            phone,
            subject,
        }),
        (name, email, message, company, phone, subject) => {
            let errors = [
                name.err(),
                email.err(),
                message.err(),
                company.err(),
                phone.err(),
                subject.err(),
            ]
            .into_iter()
            .flatten()
            .collect();
            Err(ValidationError { errors })
        }
    }
}

fn required_text(
    fields: &Map<String, Value>,
    field: &str,
    max_chars: usize,
) -> Result<String, FieldError> {
    match fields.get(field) {
        None => Err(FieldError::new(field, "missing", "Field required")),
        Some(value) => text(field, value, max_chars),
    }
}

fn optional_text(
    fields: &Map<String, Value>,
    field: &str,
    max_chars: usize,
) -> Result<Option<String>, FieldError> {
    match fields.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(raw)) if raw.trim().is_empty() => Ok(None),
        Some(value) => text(field, value, max_chars).map(Some),
    }
}

fn text(field: &str, value: &Value, max_chars: usize) -> Result<String, FieldError> {
    let Some(raw) = value.as_str() else {
        return Err(FieldError::new(
            field,
            "string_type",
            "Input should be a valid string",
        ));
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FieldError::new(
            field,
            "string_too_short",
            "String should have at least 1 character",
        ));
    }
    if trimmed.chars().count() > max_chars {
        return Err(FieldError::new(
            field,
            "string_too_long",
            format!("String should have at most {max_chars} characters"),
        ));
    }
    Ok(trimmed.to_string())
}

fn check_email(email: String) -> Result<String, FieldError> {
    match email_problem(&email) {
        None => Ok(email),
        Some(reason) => Err(FieldError::new(
            "email",
            "value_error",
            format!("value is not a valid email address: {reason}"),
        )),
    }
}

fn email_problem(email: &str) -> Option<&'static str> {
    if email.chars().any(char::is_whitespace) {
        return Some("it must not contain whitespace");
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Some("an email address must have an @-sign");
    };
    if local.is_empty() {
        return Some("there must be something before the @-sign");
    }
    if domain.contains('@') {
        return Some("an email address must have exactly one @-sign");
    }
    if domain.is_empty() {
        return Some("there must be something after the @-sign");
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return Some("the part before the @-sign has a misplaced period");
    }
    if !domain.contains('.') {
        return Some("the domain name must contain a period");
    }
    if domain.split('.').any(str::is_empty) {
        return Some("the domain name has an empty label");
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_minimal_inquiry() {
        let payload = json!({"name": "Ada", "email": "ada@example.com", "message": "hello"});
        let inquiry = validate(&payload).unwrap();
        assert_eq!(inquiry.name, "Ada");
        assert_eq!(inquiry.email, "ada@example.com");
        assert_eq!(inquiry.message, "hello");
        assert_eq!(inquiry.company, None);
    }

    #[test]
    fn trims_text_and_keeps_optional_fields() {
        let payload = json!({
            "name": "  Grace Hopper ",
            "email": " grace@navy.mil ",
            "message": "Compilers?\n",
            "company": "US Navy",
            "phone": "   ",
            "subject": null,
            "referrer": "ignored"
        });
        let inquiry = validate(&payload).unwrap();
        assert_eq!(inquiry.name, "Grace Hopper");
        assert_eq!(inquiry.email, "grace@navy.mil");
        assert_eq!(inquiry.message, "Compilers?");
        assert_eq!(inquiry.company.as_deref(), Some("US Navy"));
        assert_eq!(inquiry.phone, None);
        assert_eq!(inquiry.subject, None);
    }

    #[test]
    fn missing_field_is_named() {
        let payload = json!({"email": "ada@example.com", "message": "hello"});
        let err = validate(&payload).unwrap_err();
        assert_eq!(err.fields(), vec!["name"]);
        assert_eq!(err.errors[0].kind, "missing");
    }

    #[test]
    fn reports_every_violation() {
        let payload = json!({"name": "", "email": "not-an-email", "phone": 42});
        let err = validate(&payload).unwrap_err();
        assert_eq!(err.fields(), vec!["name", "email", "message", "phone"]);
        let kinds: Vec<_> = err.errors.iter().map(|error| error.kind).collect();
        assert_eq!(
            kinds,
            vec!["string_too_short", "value_error", "missing", "string_type"]
        );
    }

    #[test]
    fn rejects_non_object_body() {
        let err = validate(&json!(["name", "email"])).unwrap_err();
        assert_eq!(err.fields(), vec!["body"]);
        assert_eq!(err.errors[0].kind, "model_type");
    }

    #[test]
    fn rejects_overlong_message() {
        let payload = json!({
            "name": "Ada",
            "email": "ada@example.com",
            "message": "x".repeat(MESSAGE_MAX_CHARS + 1)
        });
        let err = validate(&payload).unwrap_err();
        assert_eq!(err.fields(), vec!["message"]);
        assert_eq!(err.errors[0].kind, "string_too_long");
    }

    #[test]
    fn email_shapes() {
        for valid in ["a@b.co", "first.last+tag@sub.example.org"] {
            assert_eq!(email_problem(valid), None, "{valid}");
        }
        for invalid in [
            "plain",
            "@example.com",
            "ada@",
            "ada@@example.com",
            "ada@localhost",
            "ada@example..com",
            ".ada@example.com",
            "a da@example.com",
        ] {
            assert!(email_problem(invalid).is_some(), "{invalid}");
        }
    }
}
