use chrono::NaiveDate;
use redb::Database;
use serde::{Deserialize, Serialize};

use crate::helper::catalog::{self, TitledText};
use crate::helper::form_helpers::{is_valid_email, ValidationError};
use crate::helper::sanitization_helpers::strip_all_html;
use crate::helper::tasbeeh::TasbeehState;
use crate::helper::translation::{lookup, t};
use crate::models::content_store::ContentStore;
use crate::models::db_operations::inbox_db_operations::{self, InboxError};
use crate::models::{Announcement, Collection, EducationalResource, Event, Locale, PrayerTime, RecordKind};

#[derive(Debug, Serialize, PartialEq)]
pub struct PrayerRow {
    pub name: String,
    pub time: String,
}

#[derive(Debug, Serialize)]
pub struct AnnouncementCard {
    pub title: String,
    pub content: String,
    pub kind: &'static str,
    pub date: String,
}

#[derive(Debug, Serialize)]
pub struct EventCard {
    pub title: String,
    pub description: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub category: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ResourceCard {
    pub title: String,
    pub description: String,
    pub category: &'static str,
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TextCard {
    pub title: String,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct GalleryCard {
    pub title: String,
    pub image: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ContactDetails {
    pub address: String,
    pub phone: &'static str,
    pub phone_href: &'static str,
    pub email: &'static str,
    pub map_url: &'static str,
}

#[derive(Debug, Serialize)]
pub struct PhraseView {
    pub index: usize,
    pub arabic: &'static str,
    pub transliteration: &'static str,
    pub meaning: &'static str,
}

#[derive(Debug, Serialize)]
pub struct TasbeehView {
    pub phrases: Vec<PhraseView>,
    pub selected: usize,
    pub count: u32,
    pub target: u32,
    pub progress: u32,
    pub complete: bool,
}

/// Store-backed rows for the public page, active only.
#[derive(Debug, Default)]
pub struct PublicContent {
    pub announcements: Vec<Announcement>,
    pub events: Vec<Event>,
    pub resources: Vec<EducationalResource>,
    pub prayer_times: Vec<PrayerTime>,
}

/// Reads one table for the public site. When the store is unreachable the
/// built-in catalog is shown instead.
pub fn fetch_or_fallback(store: &dyn ContentStore, kind: RecordKind, today: NaiveDate) -> Collection {
    match store.fetch(kind) {
        Ok(collection) => collection,
        Err(e) => {
            log::error!("Could not load {} for the public site, using catalog: {}", kind.table(), e);
            catalog::fallback_collection(kind, today)
        }
    }
}

/// Drops inactive rows.
pub fn active_only(collection: Collection) -> Collection {
    match collection {
        Collection::Announcements(rows) => Collection::Announcements(rows.into_iter().filter(|r| r.is_active).collect()),
        Collection::Events(rows) => Collection::Events(rows.into_iter().filter(|r| r.is_active).collect()),
        Collection::Resources(rows) => Collection::Resources(rows.into_iter().filter(|r| r.is_active).collect()),
        Collection::PrayerTimes(rows) => Collection::PrayerTimes(rows.into_iter().filter(|r| r.is_active).collect()),
    }
}

fn collect_content(mut load: impl FnMut(RecordKind) -> Collection) -> PublicContent {
    let mut content = PublicContent::default();
    for kind in RecordKind::ALL {
        match active_only(load(kind)) {
            Collection::Announcements(rows) => content.announcements = rows,
            Collection::Events(rows) => content.events = rows,
            Collection::Resources(rows) => content.resources = rows,
            Collection::PrayerTimes(rows) => content.prayer_times = rows,
        }
    }
    content
}

pub fn load_public_content(store: &dyn ContentStore, today: NaiveDate) -> PublicContent {
    collect_content(|kind| fetch_or_fallback(store, kind, today))
}

/// The built-in catalog for every table, used when the store cannot be asked at all.
pub fn catalog_content(today: NaiveDate) -> PublicContent {
    collect_content(|kind| catalog::fallback_collection(kind, today))
}

fn prayer_display_name(locale: Locale, name: &str) -> String {
    let key = format!("prayers.{}", name.trim().to_lowercase());
    lookup(locale, &key).map(str::to_string).unwrap_or_else(|| name.to_string())
}

/// Active prayers in the order they fall during the day.
pub fn prayer_rows(locale: Locale, prayers: &[PrayerTime]) -> Vec<PrayerRow> {
    let mut active: Vec<&PrayerTime> = prayers.iter().filter(|p| p.is_active).collect();
    active.sort_by(|a, b| {
        catalog::prayer_rank(&a.prayer_name)
            .cmp(&catalog::prayer_rank(&b.prayer_name))
            .then_with(|| a.prayer_name.cmp(&b.prayer_name))
    });
    active
        .into_iter()
        .map(|p| PrayerRow { name: prayer_display_name(locale, &p.prayer_name), time: p.iqamah_time.clone() })
        .collect()
}

pub fn jumuah_row(locale: Locale) -> PrayerRow {
    PrayerRow { name: t(locale, "prayers.jumma").to_string(), time: catalog::JUMUAH_TIME.to_string() }
}

pub fn announcement_cards(locale: Locale, rows: &[Announcement]) -> Vec<AnnouncementCard> {
    rows.iter()
        .filter(|a| a.is_active)
        .map(|a| AnnouncementCard {
            title: locale.pick(&a.title_en, &a.title_ur).to_string(),
            content: locale.pick(&a.content_en, &a.content_ur).to_string(),
            kind: a.kind.as_str(),
            date: a.created_at.format("%b %-d, %Y").to_string(),
        })
        .collect()
}

fn event_date_label(raw: &str) -> String {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|d| d.format("%A, %B %-d").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

pub fn event_cards(locale: Locale, rows: &[Event]) -> Vec<EventCard> {
    rows.iter()
        .filter(|e| e.is_active)
        .map(|e| EventCard {
            title: locale.pick(&e.title_en, &e.title_ur).to_string(),
            description: locale.pick(&e.description_en, &e.description_ur).to_string(),
            date: event_date_label(&e.event_date),
            time: e.event_time.clone(),
            location: e.location.clone(),
            category: e.category.as_str(),
        })
        .collect()
}

pub fn resource_cards(locale: Locale, rows: &[EducationalResource]) -> Vec<ResourceCard> {
    rows.iter()
        .filter(|r| r.is_active)
        .map(|r| ResourceCard {
            title: locale.pick(&r.title_en, &r.title_ur).to_string(),
            description: locale.pick(&r.description_en, &r.description_ur).to_string(),
            category: r.category.as_str(),
            url: r.resource_url.clone(),
        })
        .collect()
}

fn text_cards(locale: Locale, items: &[TitledText]) -> Vec<TextCard> {
    items
        .iter()
        .map(|i| TextCard { title: i.title.get(locale).to_string(), text: i.text.get(locale).to_string() })
        .collect()
}

pub fn about_cards(locale: Locale) -> Vec<TextCard> {
    catalog::ABOUT_SECTIONS
        .iter()
        .map(|(title, text)| TextCard { title: t(locale, title).to_string(), text: t(locale, text).to_string() })
        .collect()
}

pub fn service_cards(locale: Locale) -> Vec<TextCard> {
    text_cards(locale, &catalog::SERVICES)
}

pub fn donation_cards(locale: Locale) -> Vec<TextCard> {
    text_cards(locale, &catalog::DONATIONS)
}

pub fn guideline_cards(locale: Locale) -> Vec<TextCard> {
    text_cards(locale, &catalog::VISITOR_GUIDELINES)
}

pub fn gallery_cards(locale: Locale) -> Vec<GalleryCard> {
    catalog::GALLERY
        .iter()
        .map(|g| GalleryCard { title: g.title.get(locale).to_string(), image: g.image })
        .collect()
}

pub fn contact_details(locale: Locale) -> ContactDetails {
    ContactDetails {
        address: format!("{}, {}", t(locale, "hero.mosque"), t(locale, "contact.location")),
        phone: catalog::PHONE_DISPLAY,
        phone_href: catalog::PHONE_HREF,
        email: catalog::EMAIL,
        map_url: catalog::MAP_URL,
    }
}

pub fn tasbeeh_view(state: &TasbeehState) -> TasbeehView {
    TasbeehView {
        phrases: catalog::TASBEEH_PHRASES
            .iter()
            .enumerate()
            .map(|(index, p)| PhraseView {
                index,
                arabic: p.arabic,
                transliteration: p.transliteration,
                meaning: p.meaning,
            })
            .collect(),
        selected: state.phrase,
        count: state.count,
        target: state.target,
        progress: state.progress(),
        complete: state.is_complete(),
    }
}

// --- Inbox ---

#[derive(Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Deserialize)]
pub struct NewsletterForm {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Inbox(#[from] InboxError),
}

impl SubmitError {
    /// Translation key of the message shown to the visitor.
    pub fn message_key(&self) -> &'static str {
        match self {
            SubmitError::Invalid(ValidationError::InvalidEmail) => "form.invalidEmail",
            SubmitError::Invalid(_) => "form.required",
            SubmitError::Inbox(_) => "form.failed",
        }
    }
}

pub fn submit_contact(db: &Database, form: &ContactForm) -> Result<(), SubmitError> {
    let name = strip_all_html(&form.name);
    let subject = strip_all_html(&form.subject);
    let message = strip_all_html(&form.message);
    let email = form.email.trim();
    if name.is_empty() || email.is_empty() || subject.is_empty() || message.is_empty() {
        return Err(ValidationError::Required("All contact fields").into());
    }
    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail.into());
    }
    let stored = inbox_db_operations::store_contact_message(db, &name, email, &subject, &message)?;
    log::info!("Contact message {} received from {}", stored.id, stored.email);
    Ok(())
}

/// Returns `false` when the address was already on the list.
pub fn submit_newsletter(db: &Database, form: &NewsletterForm) -> Result<bool, SubmitError> {
    let email = form.email.trim();
    if email.is_empty() {
        return Err(ValidationError::Required("Email").into());
    }
    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail.into());
    }
    Ok(inbox_db_operations::subscribe(db, email)?)
}
