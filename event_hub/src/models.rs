//! Data models exchanged with the events API.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Event ID type
pub type EventId = i64;

/// Event as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    /// Username of the creator; read-only, set by the server
    #[serde(default)]
    pub user: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub time: Option<NaiveTime>,
    pub location: String,
    pub event_type: String,
    pub organizer: String,
    pub capacity: u32,
    /// Server-assigned code shown to attendees, distinct from `id`
    #[serde(default)]
    pub event_code: String,
}

/// Payload for creating an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub location: String,
    pub event_type: String,
    pub organizer: String,
    pub capacity: u32,
}

/// How an attendee prefers to be contacted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactMethod {
    #[default]
    Email,
    Phone,
}

impl fmt::Display for ContactMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContactMethod::Email => write!(f, "Email"),
            ContactMethod::Phone => write!(f, "Phone"),
        }
    }
}

/// How an attendee will attend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttendanceMode {
    #[default]
    #[serde(rename = "In-Person")]
    InPerson,
    Virtual,
}

impl fmt::Display for AttendanceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttendanceMode::InPerson => write!(f, "In-Person"),
            AttendanceMode::Virtual => write!(f, "Virtual"),
        }
    }
}

/// Attendee details submitted when registering for an event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub preferred_contact_method: ContactMethod,
    pub city: String,
    pub event_attendance_mode: AttendanceMode,
    pub emergency_contact: String,
}

/// Current user's profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub username: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub bio: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub phone_number: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub interests: Option<String>,
    /// Absolute URL or server-relative path of the profile picture
    #[serde(default, deserialize_with = "empty_as_none")]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub created_events: Vec<Event>,
    #[serde(default)]
    pub registered_events: Vec<Event>,
}

/// Image selected for upload as the profile picture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileImage {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ProfileImage {
    /// Build an image, guessing the MIME type from the file extension
    pub fn from_file_name(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        let mime_type = match extension.as_str() {
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "gif" => "image/gif",
            "webp" => "image/webp",
            _ => "application/octet-stream",
        }
        .to_string();

        Self {
            file_name,
            mime_type,
            bytes,
        }
    }
}

/// Username/password pair exchanged for tokens
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Access/refresh pair issued by `POST /token/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Account creation request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interests: Option<String>,
}

/// Body of `GET /events/{id}/registration_count/`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationCount {
    pub registration_count: u32,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_deserializes_server_shape() {
        let event: Event = serde_json::from_value(json!({
            "id": 7,
            "user": "alice",
            "title": "RustConf",
            "description": "Talks",
            "date": "2026-05-01",
            "time": "09:30:00",
            "event_type": "Conference",
            "organizer": "Rust Foundation",
            "location": "Portland",
            "capacity": 300,
            "event_code": "#ABCDEFGHIJ0123456789"
        }))
        .unwrap();

        assert_eq!(event.id, 7);
        assert_eq!(event.user.as_deref(), Some("alice"));
        assert_eq!(event.time, NaiveTime::from_hms_opt(9, 30, 0));
        assert_eq!(event.capacity, 300);
    }

    #[test]
    fn test_event_null_time() {
        let event: Event = serde_json::from_value(json!({
            "id": 1,
            "user": null,
            "title": "Meetup",
            "description": "",
            "date": "2026-01-10",
            "time": null,
            "event_type": "Networking Event",
            "organizer": "Org",
            "location": "Online",
            "capacity": 0,
            "event_code": "#X"
        }))
        .unwrap();

        assert!(event.time.is_none());
        assert!(event.user.is_none());
    }

    #[test]
    fn test_registration_serializes_choice_labels() {
        let registration = Registration {
            full_name: "Ada Lovelace".to_string(),
            preferred_contact_method: ContactMethod::Phone,
            event_attendance_mode: AttendanceMode::InPerson,
            ..Default::default()
        };

        let value = serde_json::to_value(&registration).unwrap();
        assert_eq!(value["preferred_contact_method"], "Phone");
        assert_eq!(value["event_attendance_mode"], "In-Person");
    }

    #[test]
    fn test_registration_defaults() {
        let registration = Registration::default();
        assert_eq!(registration.preferred_contact_method, ContactMethod::Email);
        assert_eq!(registration.event_attendance_mode, AttendanceMode::InPerson);
        assert!(registration.full_name.is_empty());
    }

    #[test]
    fn test_profile_empty_strings_become_none() {
        let profile: Profile = serde_json::from_value(json!({
            "username": "bob",
            "email": "bob@example.com",
            "full_name": "",
            "profile_picture": null,
            "phone_number": "",
            "bio": "Hi",
            "location": "",
            "interests": "",
            "created_events": [],
            "registered_events": []
        }))
        .unwrap();

        assert_eq!(profile.bio.as_deref(), Some("Hi"));
        assert!(profile.full_name.is_none());
        assert!(profile.profile_picture.is_none());
        assert!(profile.location.is_none());
    }

    #[test]
    fn test_signup_request_skips_missing_fields() {
        let request = SignupRequest {
            username: "carol".to_string(),
            password: "secret".to_string(),
            bio: Some("Hello".to_string()),
            ..Default::default()
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["bio"], "Hello");
        assert!(value.get("email").is_none());
    }

    #[test]
    fn test_profile_image_mime_guess() {
        assert_eq!(
            ProfileImage::from_file_name("me.PNG", vec![]).mime_type,
            "image/png"
        );
        assert_eq!(
            ProfileImage::from_file_name("me.jpeg", vec![]).mime_type,
            "image/jpeg"
        );
        assert_eq!(
            ProfileImage::from_file_name("me", vec![]).mime_type,
            "application/octet-stream"
        );
    }
}
