//! The authoritative check on a submitted contact. Nothing reaches the database without passing
//! through [`validate`] first.
use super::{AgeInput, ContactFields, ContactInput};
use serde::Serialize;
use std::fmt;

pub const MIN_AGE: f64 = 0.0;
pub const MAX_AGE: f64 = 150.0;

lazy_static::lazy_static! {
    /// `local@domain.tld`, with no whitespace or extra `@` anywhere.
    pub static ref EMAIL: regex::Regex = regex::Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    /// Digits, whitespace, `+`, `-` and parentheses, nothing else.
    pub static ref PHONE: regex::Regex = regex::Regex::new(r"^[\d\s+\-()]+$").unwrap();
}

/// Every problem found with a submission, keyed by field name, in form order.
#[derive(Serialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct FieldErrors(Vec<(&'static str, &'static str)>);

impl FieldErrors {
    fn push(&mut self, field: &'static str, message: &'static str) {
        self.0.push((field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.0.iter().find(|(f, _)| *f == field).map(|(_, m)| *m)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.0.iter().copied()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, (_, message)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            f.write_str(message)?;
        }
        Ok(())
    }
}

fn blank(field: Option<&String>) -> bool {
    field.map_or(true, |s| s.trim().is_empty())
}

/// Checks all four business fields at once, reporting every failure rather than the first.
///
/// Values are passed through as submitted; only the emptiness checks look at trimmed text.
pub fn validate(input: &ContactInput) -> Result<ContactFields, FieldErrors> {
    let mut errors = FieldErrors::default();

    if blank(input.name.as_ref()) {
        errors.push("name", "Name is required");
    }

    if blank(input.email.as_ref()) {
        errors.push("email", "Email is required");
    } else if !input.email.as_deref().map_or(false, |e| EMAIL.is_match(e)) {
        errors.push("email", "Invalid email format");
    }

    if blank(input.phone.as_ref()) {
        errors.push("phone", "Phone number is required");
    } else if !input.phone.as_deref().map_or(false, |p| PHONE.is_match(p)) {
        errors.push("phone", "Invalid phone number format");
    }

    let age = match parse_age(input.age.as_ref()) {
        Ok(age) => Some(age),
        Err(message) => {
            errors.push("age", message);
            None
        }
    };

    match (errors.is_empty(), age) {
        (true, Some(age)) => Ok(ContactFields {
            name: input.name.clone().unwrap_or_default(),
            email: input.email.clone().unwrap_or_default(),
            phone: input.phone.clone().unwrap_or_default(),
            age,
        }),
        _ => Err(errors),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn parse_age(age: Option<&AgeInput>) -> Result<i64, &'static str> {
    const OUT_OF_RANGE: &str = "Age must be a number between 0 and 150";

    let n = match age {
        None => return Err("Age is required"),
        Some(AgeInput::Number(n)) => *n,
        Some(AgeInput::Text(s)) if s.trim().is_empty() => return Err("Age is required"),
        Some(AgeInput::Text(s)) => s.trim().parse::<f64>().map_err(|_| OUT_OF_RANGE)?,
    };

    if !n.is_finite() || !(MIN_AGE..=MAX_AGE).contains(&n) {
        return Err(OUT_OF_RANGE);
    }
    if n.fract() != 0.0 {
        return Err("Age must be a whole number");
    }

    // in range and whole, so the cast is exact
    Ok(n as i64)
}

#[cfg(test)]
mod test {
    use super::*;

    fn input(name: &str, email: &str, phone: &str, age: AgeInput) -> ContactInput {
        ContactInput {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            phone: Some(phone.to_string()),
            age: Some(age),
        }
    }

    #[test]
    fn accepts_a_well_formed_contact() {
        let fields = validate(&ContactInput::new("Alice", "alice@x.com", "555-1234", 30))
            .expect("alice should be valid");
        assert_eq!(fields.name, "Alice");
        assert_eq!(fields.email, "alice@x.com");
        assert_eq!(fields.phone, "555-1234");
        assert_eq!(fields.age, 30);
    }

    #[test]
    fn reports_every_failing_field_together() {
        let errors = validate(&input("", "bad", "abc", AgeInput::Number(999.0)))
            .expect_err("nothing about this is valid");

        assert_eq!(errors.len(), 4);
        assert_eq!(errors.get("name"), Some("Name is required"));
        assert_eq!(errors.get("email"), Some("Invalid email format"));
        assert_eq!(errors.get("phone"), Some("Invalid phone number format"));
        assert_eq!(errors.get("age"), Some("Age must be a number between 0 and 150"));
        assert_eq!(
            errors.to_string(),
            "Name is required; Invalid email format; Invalid phone number format; \
                Age must be a number between 0 and 150"
        );
    }

    #[test]
    fn missing_fields_are_required() {
        let errors = validate(&ContactInput::default()).expect_err("empty input");
        assert_eq!(errors.get("name"), Some("Name is required"));
        assert_eq!(errors.get("email"), Some("Email is required"));
        assert_eq!(errors.get("phone"), Some("Phone number is required"));
        assert_eq!(errors.get("age"), Some("Age is required"));
    }

    #[test]
    fn whitespace_only_counts_as_empty() {
        let errors = validate(&input("   ", " \t", "  ", AgeInput::Text(" ".into())))
            .expect_err("whitespace isn't a value");
        assert_eq!(errors.get("name"), Some("Name is required"));
        assert_eq!(errors.get("email"), Some("Email is required"));
        assert_eq!(errors.get("phone"), Some("Phone number is required"));
        assert_eq!(errors.get("age"), Some("Age is required"));
    }

    #[test]
    fn email_shape() {
        for good in &["a@b.c", "first.last@sub.example.org", "x+y@d.io"] {
            assert!(EMAIL.is_match(good), "{} should be accepted", good);
        }
        for bad in &["bad", "a@b", "@b.com", "a@.", "a b@c.com", "a@b c.com", "a@@b.com", " a@b.com"] {
            assert!(!EMAIL.is_match(bad), "{} should be rejected", bad);
        }
    }

    #[test]
    fn phone_shape() {
        for good in &["555-1234", "+1 (555) 123 4567", "0123456789"] {
            assert!(PHONE.is_match(good), "{} should be accepted", good);
        }
        for bad in &["abc", "555-1234 ext. 5", "555_1234", "555.1234"] {
            assert!(!PHONE.is_match(bad), "{} should be rejected", bad);
        }
    }

    #[test]
    fn age_bounds_are_inclusive() {
        for (age, ok) in &[(-1.0, false), (0.0, true), (150.0, true), (150.5, false), (151.0, false)] {
            let res = validate(&input("A", "a@b.co", "1", AgeInput::Number(*age)));
            assert_eq!(res.is_ok(), *ok, "age {}", age);
        }
    }

    #[test]
    fn age_may_arrive_as_text() {
        let fields = validate(&input("A", "a@b.co", "1", AgeInput::Text(" 42 ".into())))
            .expect("text age should parse");
        assert_eq!(fields.age, 42);

        let errors = validate(&input("A", "a@b.co", "1", AgeInput::Text("forty".into())))
            .expect_err("words aren't numbers");
        assert_eq!(errors.get("age"), Some("Age must be a number between 0 and 150"));
    }

    #[test]
    fn fractional_age_is_rejected() {
        let errors = validate(&input("A", "a@b.co", "1", AgeInput::Text("30.5".into())))
            .expect_err("half years aren't stored");
        assert_eq!(errors.get("age"), Some("Age must be a whole number"));
    }

    #[test]
    fn age_arrives_untagged_from_json() {
        let from_number: ContactInput = serde_json::from_str(r#"{"age": 31}"#).unwrap();
        assert_eq!(from_number.age, Some(AgeInput::Number(31.0)));
        let from_text: ContactInput = serde_json::from_str(r#"{"age": "31"}"#).unwrap();
        assert_eq!(from_text.age, Some(AgeInput::Text("31".into())));
    }
}
