//! What the user typed, and a quick local check of it before anything is sent. The server runs
//! its own validation regardless; this only saves a round trip for obvious mistakes.
use crate::Contact;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};

/// The contact form, exactly as typed. `age` is text because that's what the input holds.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub age: String,
}

impl ContactForm {
    pub fn new(name: &str, email: &str, phone: &str, age: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            age: age.to_string(),
        }
    }

    /// Prefills the form for editing an existing contact.
    pub fn from_contact(contact: &Contact) -> Self {
        Self {
            name: contact.name.clone(),
            email: contact.email.clone(),
            phone: contact.phone.clone(),
            age: contact.age.to_string(),
        }
    }
}

/// Field name to message.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FormErrors(pub BTreeMap<&'static str, &'static str>);

impl FormErrors {
    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.0.get(field).copied()
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let messages: Vec<_> = self.0.values().copied().collect();
        f.write_str(&messages.join(", "))
    }
}

/// One or more characters with no whitespace and no `@`.
fn plain_run(s: &str) -> bool {
    !s.is_empty() && !s.chars().any(|c| c.is_whitespace() || c == '@')
}

fn looks_like_email(email: &str) -> bool {
    let mut halves = email.splitn(2, '@');
    let (local, domain) = match (halves.next(), halves.next()) {
        (Some(local), Some(domain)) => (local, domain),
        _ => return false,
    };

    // some dot in the domain has to have text on both sides of it
    plain_run(local)
        && plain_run(domain)
        && domain
            .char_indices()
            .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

fn looks_like_phone(phone: &str) -> bool {
    phone
        .chars()
        .all(|c| c.is_ascii_digit() || c.is_whitespace() || "+-()".contains(c))
}

pub fn validate_form(form: &ContactForm) -> Result<(), FormErrors> {
    let mut errors = BTreeMap::new();

    if form.name.trim().is_empty() {
        errors.insert("name", "Name is required");
    }

    if form.email.trim().is_empty() {
        errors.insert("email", "Email is required");
    } else if !looks_like_email(&form.email) {
        errors.insert("email", "Invalid email format");
    }

    if form.phone.trim().is_empty() {
        errors.insert("phone", "Phone number is required");
    } else if !looks_like_phone(&form.phone) {
        errors.insert("phone", "Invalid phone number format");
    }

    if form.age.trim().is_empty() {
        errors.insert("age", "Age is required");
    } else {
        match form.age.trim().parse::<f64>() {
            Ok(age) if (0.0..=150.0).contains(&age) => {}
            _ => {
                errors.insert("age", "Age must be a number between 0 and 150");
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(FormErrors(errors))
    }
}
