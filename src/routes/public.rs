use actix_session::Session;
use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::{web, HttpResponse, Responder};
use chrono::{Datelike, Local};
use redb::Database;
use serde::Deserialize;
use tera::{Context, Tera};

use crate::helper::public_helpers::{self, ContactForm, NewsletterForm};
use crate::helper::tasbeeh::{TasbeehAction, TasbeehState};
use crate::helper::translation::{self, t};
use crate::middleware::{SelectedLocale, LANG_COOKIE};
use crate::models::{Collection, Locale, Notification, RecordKind};
use crate::routes::{redirect, render};
use crate::AppState;

const NOTICE_KEY: &str = "public_notice";

#[derive(Deserialize)]
pub struct TasbeehForm {
    phrase: Option<usize>,
}

pub fn config_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/is_server_active", web::get().to(is_server_active))
            .route("/prayer-times", web::get().to(api_prayer_times))
            .route("/announcements", web::get().to(api_announcements))
            .route("/events", web::get().to(api_events))
            .route("/resources", web::get().to(api_resources))
            .route("/i18n/{locale}", web::get().to(api_translations)),
    );
}

pub fn config_site(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(home_page))
        .route("/lang/{code}", web::get().to(switch_language))
        .route("/contact", web::post().to(contact_action))
        .route("/newsletter", web::post().to(newsletter_action))
        .route("/tasbeeh/{action}", web::post().to(tasbeeh_action));
}

async fn is_server_active() -> impl Responder {
    HttpResponse::Ok().body("active")
}

async fn api_collection(state: web::Data<AppState>, kind: RecordKind) -> HttpResponse {
    let store = state.store.clone();
    match web::block(move || store.fetch(kind)).await {
        Ok(Ok(collection)) => match public_helpers::active_only(collection) {
            Collection::Announcements(rows) => HttpResponse::Ok().json(rows),
            Collection::Events(rows) => HttpResponse::Ok().json(rows),
            Collection::Resources(rows) => HttpResponse::Ok().json(rows),
            Collection::PrayerTimes(rows) => HttpResponse::Ok().json(rows),
        },
        Ok(Err(e)) => {
            log::error!("Failed to fetch {} for the API: {}", kind.table(), e);
            HttpResponse::InternalServerError().finish()
        }
        Err(e) => {
            log::error!("Blocking task failed while fetching {}: {}", kind.table(), e);
            HttpResponse::InternalServerError().finish()
        }
    }
}

async fn api_prayer_times(state: web::Data<AppState>) -> impl Responder {
    api_collection(state, RecordKind::PrayerTime).await
}

async fn api_announcements(state: web::Data<AppState>) -> impl Responder {
    api_collection(state, RecordKind::Announcement).await
}

async fn api_events(state: web::Data<AppState>) -> impl Responder {
    api_collection(state, RecordKind::Event).await
}

async fn api_resources(state: web::Data<AppState>) -> impl Responder {
    api_collection(state, RecordKind::Resource).await
}

async fn api_translations(locale: web::Path<String>) -> impl Responder {
    match Locale::from_code(&locale) {
        Some(locale) => HttpResponse::Ok().json(translation::table(locale)),
        None => HttpResponse::NotFound().body("Unknown locale"),
    }
}

fn set_notice(session: &Session, message: &str, r#type: &str) {
    let notice = Notification { message: message.to_string(), r#type: r#type.to_string() };
    if let Err(e) = session.insert(NOTICE_KEY, &notice) {
        log::warn!("Could not store notice in session: {}", e);
    }
}

async fn home_page(
    locale: SelectedLocale,
    session: Session,
    state: web::Data<AppState>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let SelectedLocale(locale) = locale;
    let today = Local::now().date_naive();
    let store = state.store.clone();

    let content = match web::block(move || public_helpers::load_public_content(store.as_ref(), today)).await {
        Ok(content) => content,
        Err(e) => {
            log::error!("Blocking task failed while loading the home page, using catalog: {}", e);
            public_helpers::catalog_content(today)
        }
    };

    let mut ctx = Context::new();
    ctx.insert("lang", locale.code());
    ctx.insert("dir", locale.dir());
    ctx.insert("other_lang", locale.other().code());
    ctx.insert("prayers", &public_helpers::prayer_rows(locale, &content.prayer_times));
    ctx.insert("jumuah", &public_helpers::jumuah_row(locale));
    ctx.insert("about", &public_helpers::about_cards(locale));
    ctx.insert("services", &public_helpers::service_cards(locale));
    ctx.insert("announcements", &public_helpers::announcement_cards(locale, &content.announcements));
    ctx.insert("events", &public_helpers::event_cards(locale, &content.events));
    ctx.insert("resources", &public_helpers::resource_cards(locale, &content.resources));
    ctx.insert("donations", &public_helpers::donation_cards(locale));
    ctx.insert("tasbeeh", &public_helpers::tasbeeh_view(&TasbeehState::load(&session)));
    ctx.insert("gallery", &public_helpers::gallery_cards(locale));
    ctx.insert("guidelines", &public_helpers::guideline_cards(locale));
    ctx.insert("contact", &public_helpers::contact_details(locale));
    ctx.insert("year", &Local::now().year());

    if let Ok(Some(notice)) = session.get::<Notification>(NOTICE_KEY) {
        ctx.insert("notice", &notice);
        session.remove(NOTICE_KEY);
    }

    render(&tera, "public/index.html", &ctx)
}

async fn switch_language(code: web::Path<String>, config: web::Data<crate::config::Config>) -> impl Responder {
    let locale = Locale::from_code(&code).unwrap_or_else(|| config.locale());
    let cookie = Cookie::build(LANG_COOKIE, locale.code())
        .path("/")
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::days(365))
        .finish();
    HttpResponse::Found()
        .append_header(("location", "/"))
        .cookie(cookie)
        .finish()
}

async fn contact_action(
    locale: SelectedLocale,
    session: Session,
    inbox: web::Data<Database>,
    form: web::Form<ContactForm>,
) -> impl Responder {
    let SelectedLocale(locale) = locale;
    let form = form.into_inner();
    match web::block(move || public_helpers::submit_contact(&inbox, &form)).await {
        Ok(Ok(())) => set_notice(&session, t(locale, "contact.success"), "success"),
        Ok(Err(e)) => {
            log::warn!("Contact form rejected: {}", e);
            set_notice(&session, t(locale, e.message_key()), "error");
        }
        Err(e) => {
            log::error!("Blocking task failed while storing contact message: {}", e);
            set_notice(&session, t(locale, "form.failed"), "error");
        }
    }
    redirect("/#contact")
}

async fn newsletter_action(
    locale: SelectedLocale,
    session: Session,
    inbox: web::Data<Database>,
    form: web::Form<NewsletterForm>,
) -> impl Responder {
    let SelectedLocale(locale) = locale;
    let form = form.into_inner();
    match web::block(move || public_helpers::submit_newsletter(&inbox, &form)).await {
        Ok(Ok(true)) => set_notice(&session, t(locale, "newsletter.success"), "success"),
        Ok(Ok(false)) => set_notice(&session, t(locale, "newsletter.already"), "success"),
        Ok(Err(e)) => {
            log::warn!("Newsletter signup rejected: {}", e);
            set_notice(&session, t(locale, e.message_key()), "error");
        }
        Err(e) => {
            log::error!("Blocking task failed while storing subscriber: {}", e);
            set_notice(&session, t(locale, "form.failed"), "error");
        }
    }
    redirect("/#newsletter")
}

async fn tasbeeh_action(
    session: Session,
    action: web::Path<String>,
    form: web::Form<TasbeehForm>,
) -> impl Responder {
    let Some(action) = TasbeehAction::parse(&action, form.phrase) else {
        return HttpResponse::BadRequest().body("Unknown tasbeeh action.");
    };
    TasbeehState::load(&session).apply(action).save(&session);
    redirect("/#tasbeeh")
}
