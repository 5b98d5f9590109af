use std::sync::OnceLock;

use actix_csrf::extractor::{CsrfGuarded, CsrfToken};
use chrono::NaiveDate;
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::helper::sanitization_helpers::strip_all_html;
use crate::models::{
    AnnouncementType, EventCategory, NewAnnouncement, NewEvent, NewPrayerTime, NewRecord, NewResource,
    RecordKind, ResourceCategory,
};

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Invalid email address")]
    InvalidEmail,
    #[error("Password must be at least 6 characters")]
    PasswordTooShort,
    #[error("{0} is required")]
    Required(&'static str),
    #[error("Invalid {0}: '{1}'")]
    InvalidChoice(&'static str, String),
    #[error("Event date must be a valid date (YYYY-MM-DD)")]
    InvalidDate,
    #[error("Resource URL must be an absolute http or https link")]
    InvalidUrl,
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"))
}

pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email.trim())
}

fn clean(value: &str) -> String {
    strip_all_html(value)
}

fn required(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let cleaned = clean(value);
    if cleaned.is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(cleaned)
}

/// Checkboxes post a value only when checked.
fn checked(value: &Option<String>) -> bool {
    value.is_some()
}

macro_rules! csrf_guarded {
    ($($form:ty),* $(,)?) => {
        $(impl CsrfGuarded for $form {
            fn csrf_token(&self) -> &CsrfToken {
                &self.csrf_token
            }
        })*
    };
}

#[derive(Deserialize)]
pub struct AnnouncementForm {
    pub csrf_token: CsrfToken,
    #[serde(default)]
    pub title_en: String,
    #[serde(default)]
    pub title_ur: String,
    #[serde(default)]
    pub content_en: String,
    #[serde(default)]
    pub content_ur: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    pub is_active: Option<String>,
}

#[derive(Deserialize)]
pub struct EventForm {
    pub csrf_token: CsrfToken,
    #[serde(default)]
    pub title_en: String,
    #[serde(default)]
    pub title_ur: String,
    #[serde(default)]
    pub description_en: String,
    #[serde(default)]
    pub description_ur: String,
    #[serde(default)]
    pub event_date: String,
    #[serde(default)]
    pub event_time: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub category: String,
    pub is_active: Option<String>,
}

#[derive(Deserialize)]
pub struct ResourceForm {
    pub csrf_token: CsrfToken,
    #[serde(default)]
    pub title_en: String,
    #[serde(default)]
    pub title_ur: String,
    #[serde(default)]
    pub description_en: String,
    #[serde(default)]
    pub description_ur: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub resource_url: String,
    pub is_active: Option<String>,
}

#[derive(Deserialize)]
pub struct PrayerTimeForm {
    pub csrf_token: CsrfToken,
    #[serde(default)]
    pub prayer_name: String,
    #[serde(default)]
    pub iqamah_time: String,
    pub is_active: Option<String>,
}

#[derive(Deserialize)]
pub struct CredentialsForm {
    pub csrf_token: CsrfToken,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Delete and toggle buttons. `confirm` is set by the confirmation page,
/// `current` carries the active flag the operator saw.
#[derive(Deserialize)]
pub struct RecordActionForm {
    pub csrf_token: CsrfToken,
    pub confirm: Option<String>,
    pub current: Option<String>,
}

impl RecordActionForm {
    pub fn current_flag(&self) -> Option<bool> {
        self.current.as_deref().and_then(|v| v.trim().parse::<bool>().ok())
    }
}

csrf_guarded!(AnnouncementForm, EventForm, ResourceForm, PrayerTimeForm, RecordActionForm, CredentialsForm);

/// A create form for one record kind.
pub trait RecordForm {
    /// Kind the form creates, known even when validation fails.
    const KIND: RecordKind;

    fn into_record(self) -> Result<NewRecord, ValidationError>;
}

fn choice<T>(value: &str, field: &'static str, default: T, parse: fn(&str) -> Option<T>) -> Result<T, ValidationError> {
    if value.trim().is_empty() {
        return Ok(default);
    }
    parse(value).ok_or_else(|| ValidationError::InvalidChoice(field, value.trim().to_string()))
}

impl RecordForm for AnnouncementForm {
    const KIND: RecordKind = RecordKind::Announcement;

    fn into_record(self) -> Result<NewRecord, ValidationError> {
        Ok(NewRecord::Announcement(NewAnnouncement {
            title_en: required(&self.title_en, "Title (English)")?,
            title_ur: clean(&self.title_ur),
            content_en: clean(&self.content_en),
            content_ur: clean(&self.content_ur),
            kind: choice(&self.kind, "announcement type", AnnouncementType::Info, AnnouncementType::parse)?,
            is_active: checked(&self.is_active),
        }))
    }
}

impl RecordForm for EventForm {
    const KIND: RecordKind = RecordKind::Event;

    fn into_record(self) -> Result<NewRecord, ValidationError> {
        let title_en = required(&self.title_en, "Title (English)")?;
        let date = required(&self.event_date, "Event date")?;
        let event_date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
            .map_err(|_| ValidationError::InvalidDate)?
            .format("%Y-%m-%d")
            .to_string();
        Ok(NewRecord::Event(NewEvent {
            title_en,
            title_ur: clean(&self.title_ur),
            description_en: clean(&self.description_en),
            description_ur: clean(&self.description_ur),
            event_date,
            event_time: clean(&self.event_time),
            location: clean(&self.location),
            category: choice(&self.category, "event category", EventCategory::General, EventCategory::parse)?,
            is_active: checked(&self.is_active),
        }))
    }
}

impl RecordForm for ResourceForm {
    const KIND: RecordKind = RecordKind::Resource;

    fn into_record(self) -> Result<NewRecord, ValidationError> {
        let title_en = required(&self.title_en, "Title (English)")?;
        let resource_url = match self.resource_url.trim() {
            "" => None,
            raw => {
                let parsed = Url::parse(raw).map_err(|_| ValidationError::InvalidUrl)?;
                if !matches!(parsed.scheme(), "http" | "https") {
                    return Err(ValidationError::InvalidUrl);
                }
                Some(parsed.to_string())
            }
        };
        Ok(NewRecord::Resource(NewResource {
            title_en,
            title_ur: clean(&self.title_ur),
            description_en: clean(&self.description_en),
            description_ur: clean(&self.description_ur),
            category: choice(&self.category, "resource category", ResourceCategory::General, ResourceCategory::parse)?,
            resource_url,
            is_active: checked(&self.is_active),
        }))
    }
}

impl RecordForm for PrayerTimeForm {
    const KIND: RecordKind = RecordKind::PrayerTime;

    fn into_record(self) -> Result<NewRecord, ValidationError> {
        Ok(NewRecord::PrayerTime(NewPrayerTime {
            prayer_name: required(&self.prayer_name, "Prayer name")?,
            iqamah_time: required(&self.iqamah_time, "Iqamah time")?,
            is_active: checked(&self.is_active),
        }))
    }
}
