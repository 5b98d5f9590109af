use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The two locales the site is published in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ur,
}

impl Locale {
    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ur => "ur",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" | "en-us" | "en-gb" => Some(Locale::En),
            "ur" | "ur-pk" => Some(Locale::Ur),
            _ => None,
        }
    }

    /// Text direction for the `dir` attribute.
    pub fn dir(self) -> &'static str {
        match self {
            Locale::En => "ltr",
            Locale::Ur => "rtl",
        }
    }

    pub fn other(self) -> Self {
        match self {
            Locale::En => Locale::Ur,
            Locale::Ur => Locale::En,
        }
    }

    /// Picks the Urdu variant when it is filled in, the English one otherwise.
    pub fn pick<'a>(self, en: &'a str, ur: &'a str) -> &'a str {
        match self {
            Locale::Ur if !ur.trim().is_empty() => ur,
            _ => en,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnouncementType {
    Info,
    Urgent,
    Event,
}

impl AnnouncementType {
    pub const ALL: [AnnouncementType; 3] = [AnnouncementType::Info, AnnouncementType::Urgent, AnnouncementType::Event];

    pub fn as_str(self) -> &'static str {
        match self {
            AnnouncementType::Info => "info",
            AnnouncementType::Urgent => "urgent",
            AnnouncementType::Event => "event",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value.trim())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    General,
    Education,
    Youth,
    Prayer,
}

impl EventCategory {
    pub const ALL: [EventCategory; 4] = [EventCategory::General, EventCategory::Education, EventCategory::Youth, EventCategory::Prayer];

    pub fn as_str(self) -> &'static str {
        match self {
            EventCategory::General => "general",
            EventCategory::Education => "education",
            EventCategory::Youth => "youth",
            EventCategory::Prayer => "prayer",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == value.trim())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceCategory {
    General,
    Quran,
    Hadith,
    Fiqh,
}

impl ResourceCategory {
    pub const ALL: [ResourceCategory; 4] = [ResourceCategory::General, ResourceCategory::Quran, ResourceCategory::Hadith, ResourceCategory::Fiqh];

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceCategory::General => "general",
            ResourceCategory::Quran => "quran",
            ResourceCategory::Hadith => "hadith",
            ResourceCategory::Fiqh => "fiqh",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == value.trim())
    }
}

// --- Stored records, one struct per table ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
    pub id: String,
    pub title_en: String,
    pub title_ur: String,
    pub content_en: String,
    pub content_ur: String,
    #[serde(rename = "type")]
    pub kind: AnnouncementType,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub title_en: String,
    pub title_ur: String,
    pub description_en: String,
    pub description_ur: String,
    pub event_date: String,
    pub event_time: String,
    pub location: String,
    pub category: EventCategory,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationalResource {
    pub id: String,
    pub title_en: String,
    pub title_ur: String,
    pub description_en: String,
    pub description_ur: String,
    pub category: ResourceCategory,
    pub resource_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrayerTime {
    pub id: String,
    pub prayer_name: String,
    pub iqamah_time: String,
    pub is_active: bool,
}

// --- Insert payloads. Ids, timestamps and defaults are filled in by the store ---

#[derive(Debug, Clone, PartialEq)]
pub struct NewAnnouncement {
    pub title_en: String,
    pub title_ur: String,
    pub content_en: String,
    pub content_ur: String,
    pub kind: AnnouncementType,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub title_en: String,
    pub title_ur: String,
    pub description_en: String,
    pub description_ur: String,
    pub event_date: String,
    pub event_time: String,
    pub location: String,
    pub category: EventCategory,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewResource {
    pub title_en: String,
    pub title_ur: String,
    pub description_en: String,
    pub description_ur: String,
    pub category: ResourceCategory,
    pub resource_url: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPrayerTime {
    pub prayer_name: String,
    pub iqamah_time: String,
    pub is_active: bool,
}

/// The four kinds of record the admin panel manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Announcement,
    Event,
    Resource,
    PrayerTime,
}

impl RecordKind {
    pub const ALL: [RecordKind; 4] = [RecordKind::Announcement, RecordKind::Event, RecordKind::Resource, RecordKind::PrayerTime];

    pub fn table(self) -> &'static str {
        match self {
            RecordKind::Announcement => "announcements",
            RecordKind::Event => "events",
            RecordKind::Resource => "educational_resources",
            RecordKind::PrayerTime => "prayer_times",
        }
    }

    /// URL segment and tab name.
    pub fn slug(self) -> &'static str {
        match self {
            RecordKind::Announcement => "announcements",
            RecordKind::Event => "events",
            RecordKind::Resource => "resources",
            RecordKind::PrayerTime => "prayer_times",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.slug() == slug)
    }

    pub fn label(self) -> &'static str {
        match self {
            RecordKind::Announcement => "Announcements",
            RecordKind::Event => "Events",
            RecordKind::Resource => "Resources",
            RecordKind::PrayerTime => "Prayer Times",
        }
    }
}

/// A create request for exactly one kind.
#[derive(Debug, Clone, PartialEq)]
pub enum NewRecord {
    Announcement(NewAnnouncement),
    Event(NewEvent),
    Resource(NewResource),
    PrayerTime(NewPrayerTime),
}

impl NewRecord {
    pub fn kind(&self) -> RecordKind {
        match self {
            NewRecord::Announcement(_) => RecordKind::Announcement,
            NewRecord::Event(_) => RecordKind::Event,
            NewRecord::Resource(_) => RecordKind::Resource,
            NewRecord::PrayerTime(_) => RecordKind::PrayerTime,
        }
    }
}

/// The result of reading one table, tagged by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Collection {
    Announcements(Vec<Announcement>),
    Events(Vec<Event>),
    Resources(Vec<EducationalResource>),
    PrayerTimes(Vec<PrayerTime>),
}

impl Collection {
    pub fn kind(&self) -> RecordKind {
        match self {
            Collection::Announcements(_) => RecordKind::Announcement,
            Collection::Events(_) => RecordKind::Event,
            Collection::Resources(_) => RecordKind::Resource,
            Collection::PrayerTimes(_) => RecordKind::PrayerTime,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Collection::Announcements(v) => v.len(),
            Collection::Events(v) => v.len(),
            Collection::Resources(v) => v.len(),
            Collection::PrayerTimes(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A logged-in account as seen by the site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operator {
    pub id: String,
    pub email: String,
    pub is_admin: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Notification {
    pub message: String,
    pub r#type: String, // 'success' or 'error'
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ContactMessage {
    pub id: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub received_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Subscriber {
    pub email: String,
    pub subscribed_at: DateTime<Utc>,
}

pub mod content_store;
pub mod db_operations;
pub mod identity;
