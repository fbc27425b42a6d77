//! Field-by-field form entry.
//!
//! Both front ends collect multi-field forms one answer at a time through a
//! [`PromptSequence`]: the CLI reads a line per field, the TUI feeds the
//! input line. Finished sequences convert into the library's form types.

use event_hub::models::{AttendanceMode, ContactMethod, Registration};
use event_hub::views::add_event::{parse_capacity, parse_date, parse_time};
use event_hub::views::{EventForm, EventTypeChoice, FormError, LoginForm, SignupForm};
use std::collections::HashMap;

/// Answer that empties an optional field instead of keeping its default
pub const CLEAR_ANSWER: &str = "-";

/// How an answer is entered and checked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Hidden while typing in the TUI
    Secret,
    /// One of the labels, by name or 1-based number
    Choice(Vec<&'static str>),
    /// `YYYY-MM-DD`
    Date,
    /// `HH:MM`
    Time,
    /// Whole number of 0 or more
    Count,
}

/// One prompted field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Used when the answer is left blank
    pub default: Option<String>,
    /// Only asked when another field has the given value
    pub visible_when: Option<(&'static str, &'static str)>,
}

impl FieldSpec {
    pub fn text(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            kind: FieldKind::Text,
            required: false,
            default: None,
            visible_when: None,
        }
    }

    pub fn secret(key: &'static str, label: &'static str) -> Self {
        Self {
            kind: FieldKind::Secret,
            ..Self::text(key, label)
        }
    }

    /// Text field checked with the given kind
    pub fn checked(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            kind,
            ..Self::text(key, label)
        }
    }

    pub fn choice(key: &'static str, label: &'static str, choices: Vec<&'static str>) -> Self {
        Self {
            kind: FieldKind::Choice(choices),
            ..Self::text(key, label)
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        let default = default.into();
        self.default = (!default.is_empty()).then_some(default);
        self
    }

    pub fn visible_when(mut self, key: &'static str, value: &'static str) -> Self {
        self.visible_when = Some((key, value));
        self
    }

    pub fn is_secret(&self) -> bool {
        self.kind == FieldKind::Secret
    }

    /// Prompt line, e.g. `Event Attendance Mode [1] In-Person [2] Virtual (In-Person): `
    pub fn prompt(&self) -> String {
        let mut prompt = self.label.to_string();
        if let FieldKind::Choice(choices) = &self.kind {
            for (idx, choice) in choices.iter().enumerate() {
                prompt.push_str(&format!(" [{}] {}", idx + 1, choice));
            }
        }
        if let Some(default) = self.default.as_deref().filter(|_| !self.is_secret()) {
            prompt.push_str(&format!(" ({})", default));
        }
        prompt.push_str(": ");
        prompt
    }

    /// Check an answer and return the value to store
    fn accept(&self, input: &str) -> Result<String, String> {
        let value = match self.kind {
            FieldKind::Secret => input.to_string(),
            _ => input.trim().to_string(),
        };

        if !self.required && value == CLEAR_ANSWER {
            return Ok(String::new());
        }

        if value.is_empty() {
            return match &self.default {
                Some(default) => Ok(default.clone()),
                None if self.required => Err(format!("{} is required", self.label)),
                None => Ok(String::new()),
            };
        }

        match &self.kind {
            FieldKind::Choice(choices) => resolve_choice(choices, &value).ok_or_else(|| {
                format!("Choose one of: {}", choices.join(", "))
            }),
            FieldKind::Date => parse_date(&value).map(|_| value).map_err(|e| e.to_string()),
            FieldKind::Time => parse_time(&value).map(|_| value).map_err(|e| e.to_string()),
            FieldKind::Count => parse_capacity(&value)
                .map(|_| value)
                .map_err(|e| e.to_string()),
            FieldKind::Text | FieldKind::Secret => Ok(value),
        }
    }
}

fn resolve_choice(choices: &[&'static str], value: &str) -> Option<String> {
    if let Ok(position) = value.parse::<usize>() {
        return position
            .checked_sub(1)
            .and_then(|idx| choices.get(idx))
            .map(|choice| choice.to_string());
    }
    choices
        .iter()
        .find(|choice| choice.eq_ignore_ascii_case(value))
        .map(|choice| choice.to_string())
}

/// Answers collected so far for one form
#[derive(Debug, Clone)]
pub struct PromptSequence {
    title: &'static str,
    fields: Vec<FieldSpec>,
    values: HashMap<&'static str, String>,
    cursor: usize,
}

impl PromptSequence {
    pub fn new(title: &'static str, fields: Vec<FieldSpec>) -> Self {
        let mut sequence = Self {
            title,
            fields,
            values: HashMap::new(),
            cursor: 0,
        };
        sequence.skip_hidden();
        sequence
    }

    pub fn title(&self) -> &'static str {
        self.title
    }

    /// Field awaiting an answer
    pub fn current(&self) -> Option<&FieldSpec> {
        self.fields.get(self.cursor)
    }

    pub fn is_complete(&self) -> bool {
        self.cursor >= self.fields.len()
    }

    /// Record an answer for the current field and move on.
    ///
    /// On error the same field stays current.
    pub fn answer(&mut self, input: &str) -> Result<(), String> {
        let Some(field) = self.current() else {
            return Ok(());
        };
        let value = field.accept(input)?;
        let key = field.key;
        self.values.insert(key, value);
        self.cursor += 1;
        self.skip_hidden();
        Ok(())
    }

    /// Stored answer, empty if the field was skipped
    pub fn value(&self, key: &str) -> &str {
        self.values.get(key).map_or("", String::as_str)
    }

    fn skip_hidden(&mut self) {
        while let Some(field) = self.fields.get(self.cursor) {
            match field.visible_when {
                Some((key, expected)) if self.value(key) != expected => self.cursor += 1,
                _ => break,
            }
        }
    }
}

// ============================================================================
// Forms
// ============================================================================

/// Registration modal fields, defaulting to `previous` for a resubmission
pub fn registration_prompts(previous: &Registration) -> PromptSequence {
    PromptSequence::new(
        "Register for event",
        vec![
            FieldSpec::text("full_name", "Full Name").with_default(&previous.full_name),
            FieldSpec::text("email", "Email").with_default(&previous.email),
            FieldSpec::text("phone_number", "Phone Number").with_default(&previous.phone_number),
            FieldSpec::choice(
                "preferred_contact_method",
                "Preferred Contact Method",
                vec!["Email", "Phone"],
            )
            .with_default(previous.preferred_contact_method.to_string()),
            FieldSpec::text("city", "City").with_default(&previous.city),
            FieldSpec::choice(
                "event_attendance_mode",
                "Event Attendance Mode",
                vec!["In-Person", "Virtual"],
            )
            .with_default(previous.event_attendance_mode.to_string()),
            FieldSpec::text("emergency_contact", "Emergency Contact")
                .with_default(&previous.emergency_contact),
        ],
    )
}

/// Registration fields from a finished sequence
pub fn to_registration(prompts: &PromptSequence) -> Registration {
    Registration {
        full_name: prompts.value("full_name").to_string(),
        email: prompts.value("email").to_string(),
        phone_number: prompts.value("phone_number").to_string(),
        preferred_contact_method: match prompts.value("preferred_contact_method") {
            "Phone" => ContactMethod::Phone,
            _ => ContactMethod::Email,
        },
        city: prompts.value("city").to_string(),
        event_attendance_mode: match prompts.value("event_attendance_mode") {
            "Virtual" => AttendanceMode::Virtual,
            _ => AttendanceMode::InPerson,
        },
        emergency_contact: prompts.value("emergency_contact").to_string(),
    }
}

/// Add Event fields, defaulting to `previous` for a resubmission.
///
/// The custom type is only asked for "Other".
pub fn event_prompts(previous: &EventForm) -> PromptSequence {
    let types = EventTypeChoice::ALL
        .iter()
        .map(EventTypeChoice::label)
        .collect();
    let previous_type = previous.event_type.map_or("", |choice| choice.label());

    PromptSequence::new(
        "Add event",
        vec![
            FieldSpec::text("title", "Title")
                .required()
                .with_default(&previous.title),
            FieldSpec::text("description", "Description")
                .required()
                .with_default(&previous.description),
            FieldSpec::checked("date", "Date (YYYY-MM-DD)", FieldKind::Date)
                .required()
                .with_default(&previous.date),
            FieldSpec::checked("time", "Time (HH:MM)", FieldKind::Time)
                .required()
                .with_default(&previous.time),
            FieldSpec::text("location", "Location")
                .required()
                .with_default(&previous.location),
            FieldSpec::choice("event_type", "Event Type", types)
                .required()
                .with_default(previous_type),
            FieldSpec::text("custom_event_type", "Custom Event Type")
                .required()
                .with_default(&previous.custom_event_type)
                .visible_when("event_type", EventTypeChoice::Other.label()),
            FieldSpec::text("organizer", "Organizer")
                .required()
                .with_default(&previous.organizer),
            FieldSpec::checked("capacity", "Capacity", FieldKind::Count)
                .required()
                .with_default(&previous.capacity),
        ],
    )
}

/// Add Event form from a finished sequence
pub fn to_event_form(prompts: &PromptSequence) -> Result<EventForm, FormError> {
    let event_type = match prompts.value("event_type") {
        "" => None,
        label => Some(label.parse::<EventTypeChoice>()?),
    };

    Ok(EventForm {
        title: prompts.value("title").to_string(),
        description: prompts.value("description").to_string(),
        date: prompts.value("date").to_string(),
        time: prompts.value("time").to_string(),
        location: prompts.value("location").to_string(),
        event_type,
        custom_event_type: prompts.value("custom_event_type").to_string(),
        organizer: prompts.value("organizer").to_string(),
        capacity: prompts.value("capacity").to_string(),
    })
}

/// Login fields; the username defaults to the OS user
pub fn login_prompts(default_username: &str) -> PromptSequence {
    PromptSequence::new(
        "Login",
        vec![
            FieldSpec::text("username", "Username")
                .required()
                .with_default(default_username),
            FieldSpec::secret("password", "Password").required(),
        ],
    )
}

pub fn to_login_form(prompts: &PromptSequence) -> LoginForm {
    LoginForm {
        username: prompts.value("username").to_string(),
        password: prompts.value("password").to_string(),
    }
}

/// Signup fields; everything after the password is optional
pub fn signup_prompts() -> PromptSequence {
    PromptSequence::new(
        "Sign up",
        vec![
            FieldSpec::text("username", "Username").required(),
            FieldSpec::secret("password", "Password").required(),
            FieldSpec::text("email", "Email"),
            FieldSpec::text("full_name", "Full Name"),
            FieldSpec::text("phone_number", "Phone Number"),
            FieldSpec::text("bio", "Bio"),
            FieldSpec::text("location", "Location"),
            FieldSpec::text("interests", "Interests"),
        ],
    )
}

pub fn to_signup_form(prompts: &PromptSequence) -> SignupForm {
    SignupForm {
        username: prompts.value("username").to_string(),
        password: prompts.value("password").to_string(),
        email: prompts.value("email").to_string(),
        full_name: prompts.value("full_name").to_string(),
        phone_number: prompts.value("phone_number").to_string(),
        bio: prompts.value("bio").to_string(),
        location: prompts.value("location").to_string(),
        interests: prompts.value("interests").to_string(),
    }
}
