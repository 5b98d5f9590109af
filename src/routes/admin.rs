use actix_csrf::extractor::{Csrf, CsrfGuarded, CsrfToken};
use actix_session::Session;
use actix_web::{web, HttpResponse, Responder};
use redb::Database;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tera::{Context, Tera};

use crate::config::Config;
use crate::helper::auth_helpers::{self, GateState};
use crate::helper::content_manager::{DeleteConfirmation, RefreshReport};
use crate::helper::form_helpers::{
    AnnouncementForm, CredentialsForm, EventForm, PrayerTimeForm, RecordActionForm, RecordForm, ResourceForm,
};
use crate::middleware::AdminGate;
use crate::models::db_operations::inbox_db_operations;
use crate::models::{AnnouncementType, EventCategory, Notification, Operator, RecordKind, ResourceCategory};
use crate::routes::{redirect, render};
use crate::AppState;

const INBOX_TAB: &str = "inbox";
const INBOX_PAGE_SIZE: usize = 50;

#[derive(Serialize)]
struct TabLink {
    slug: &'static str,
    label: &'static str,
    count: usize,
}

#[derive(Deserialize)]
pub struct TabQuery {
    tab: Option<String>,
}

#[derive(Deserialize)]
pub struct DeleteQuery {
    kind: String,
    id: String,
}

pub fn config_admin(cfg: &mut web::ServiceConfig) {
    cfg.route("/login", web::get().to(show_login))
        .route("/login", web::post().to(handle_login))
        .route("/signup", web::post().to(handle_signup))
        .route("/logout", web::post().to(handle_logout))
        .route("/dashboard", web::get().to(show_dashboard))
        .route("/announcements/create", web::post().to(create_action::<AnnouncementForm>))
        .route("/events/create", web::post().to(create_action::<EventForm>))
        .route("/resources/create", web::post().to(create_action::<ResourceForm>))
        .route("/prayer_times/create", web::post().to(create_action::<PrayerTimeForm>))
        .route("/confirm_delete", web::get().to(confirm_delete))
        .route("/{kind}/{id}/delete", web::post().to(delete_action))
        .route("/{kind}/{id}/toggle", web::post().to(toggle_action));
}

fn set_notification(session: &Session, message: &str, r#type: &str) {
    let notification = Notification { message: message.to_string(), r#type: r#type.to_string() };
    if let Err(e) = session.insert("notification", &notification) {
        log::warn!("Could not store notification in session: {}", e);
    }
}

fn take_notification(session: &Session, ctx: &mut Context) {
    if let Ok(Some(notification)) = session.get::<Notification>("notification") {
        ctx.insert("notification", &notification);
        session.remove("notification");
    }
}

fn dashboard_url(config: &Config, kind: RecordKind) -> String {
    format!("{}/dashboard?tab={}", config.admin_base_url(), kind.slug())
}

/// Mutations are only for administrators. Anyone else is sent back through
/// the dashboard, which renders the login redirect or the access-denied view.
fn require_admin(gate: AdminGate, config: &Config) -> Result<Operator, HttpResponse> {
    match gate.0 {
        GateState::Admin(operator) => Ok(operator),
        GateState::Anonymous => Err(redirect(&format!("{}/login", config.admin_base_url()))),
        GateState::NotAdmin(operator) => {
            log::warn!("Non-admin {} attempted an admin action", operator.email);
            Err(redirect(&format!("{}/dashboard", config.admin_base_url())))
        }
    }
}

fn report_refresh(session: &Session, report: &RefreshReport, success: &str) {
    match report.load_error() {
        Some(load_error) => set_notification(session, &format!("{}. {}", success, load_error), "error"),
        None => set_notification(session, success, "success"),
    }
}

// --- Auth gate ---

async fn show_login(
    gate: AdminGate,
    session: Session,
    tera: web::Data<Tera>,
    token: CsrfToken,
    config: web::Data<Config>,
    query: web::Query<TabQuery>,
) -> impl Responder {
    if !matches!(gate.0, GateState::Anonymous) {
        return redirect(&format!("{}/dashboard", config.admin_base_url()));
    }

    let mut ctx = Context::new();
    ctx.insert("admin_base_url", &config.admin_base_url());
    ctx.insert("csrf_token", token.get());
    ctx.insert("tab", if query.tab.as_deref() == Some("signup") { "signup" } else { "login" });
    take_notification(&session, &mut ctx);

    render(&tera, "admin/login.html", &ctx)
}

async fn handle_login(
    session: Session,
    state: web::Data<AppState>,
    form: Csrf<web::Form<CredentialsForm>>,
    config: web::Data<Config>,
) -> impl Responder {
    let base = config.admin_base_url();
    let CredentialsForm { email, password, .. } = form.into_inner().into_inner();
    let identity = state.identity.clone();

    let result = web::block(move || auth_helpers::sign_in(identity.as_ref(), &email, &password)).await;
    match result {
        Ok(Ok(operator)) => match auth_helpers::start_session(&session, &operator) {
            Ok(()) => {
                log::info!("Operator {} signed in", operator.email);
                redirect(&format!("{}/dashboard", base))
            }
            Err(e) => {
                log::error!("Could not start session for {}: {}", operator.email, e);
                set_notification(&session, "Could not start your session. Please try again.", "error");
                redirect(&format!("{}/login", base))
            }
        },
        Ok(Err(e)) => {
            log::warn!("Sign-in failed: {}", e);
            set_notification(&session, &e.user_message(), "error");
            redirect(&format!("{}/login", base))
        }
        Err(e) => {
            log::error!("Blocking task failed during sign-in: {}", e);
            set_notification(&session, "Something went wrong. Please try again.", "error");
            redirect(&format!("{}/login", base))
        }
    }
}

async fn handle_signup(
    session: Session,
    state: web::Data<AppState>,
    form: Csrf<web::Form<CredentialsForm>>,
    config: web::Data<Config>,
) -> impl Responder {
    let base = config.admin_base_url();
    let CredentialsForm { email, password, .. } = form.into_inner().into_inner();
    let identity = state.identity.clone();

    let result = web::block(move || auth_helpers::sign_up(identity.as_ref(), &email, &password)).await;
    match result {
        Ok(Ok(operator)) => {
            log::info!("New operator account {} created", operator.email);
            set_notification(&session, "Account created! You can now login.", "success");
            redirect(&format!("{}/login", base))
        }
        Ok(Err(e)) => {
            log::warn!("Sign-up failed: {}", e);
            set_notification(&session, &e.user_message(), "error");
            redirect(&format!("{}/login?tab=signup", base))
        }
        Err(e) => {
            log::error!("Blocking task failed during sign-up: {}", e);
            set_notification(&session, "Something went wrong. Please try again.", "error");
            redirect(&format!("{}/login?tab=signup", base))
        }
    }
}

async fn handle_logout(session: Session) -> impl Responder {
    auth_helpers::sign_out(&session);
    redirect("/")
}

// --- Content manager ---

#[allow(clippy::too_many_arguments)]
async fn show_dashboard(
    gate: AdminGate,
    session: Session,
    tera: web::Data<Tera>,
    state: web::Data<AppState>,
    inbox: web::Data<Database>,
    token: CsrfToken,
    config: web::Data<Config>,
    query: web::Query<TabQuery>,
) -> impl Responder {
    let base = config.admin_base_url();
    let mut ctx = Context::new();
    ctx.insert("admin_base_url", &base);
    ctx.insert("csrf_token", token.get());

    let operator = match gate.0 {
        GateState::Anonymous => return redirect(&format!("{}/login", base)),
        GateState::NotAdmin(operator) => {
            ctx.insert("operator", &operator);
            return render(&tera, "admin/access_denied.html", &ctx);
        }
        GateState::Admin(operator) => operator,
    };

    let refreshed = state.manager.refetch_all().await;
    if let Some(load_error) = refreshed.report.load_error() {
        ctx.insert("load_error", load_error);
    }
    take_notification(&session, &mut ctx);

    let tab = match query.tab.as_deref() {
        Some(INBOX_TAB) => INBOX_TAB,
        Some(slug) => RecordKind::from_slug(slug).unwrap_or(RecordKind::Announcement).slug(),
        None => RecordKind::Announcement.slug(),
    };

    let inbox_db = inbox.clone();
    let inbox_data = web::block(move || {
        let messages = inbox_db_operations::read_latest_messages(&inbox_db, INBOX_PAGE_SIZE)?;
        let subscribers = inbox_db_operations::subscriber_count(&inbox_db)?;
        Ok::<_, inbox_db_operations::InboxError>((messages, subscribers))
    })
    .await;
    match inbox_data {
        Ok(Ok((messages, subscribers))) => {
            ctx.insert("messages", &messages);
            ctx.insert("subscriber_count", &subscribers);
        }
        Ok(Err(e)) => {
            log::error!("Failed to read inbox for dashboard: {}", e);
            ctx.insert("inbox_error", "Failed to load inbox");
        }
        Err(e) => log::error!("Blocking task failed while reading inbox: {}", e),
    }

    let snapshot = refreshed.snapshot;
    let tabs: Vec<TabLink> = RecordKind::ALL
        .iter()
        .map(|k| TabLink { slug: k.slug(), label: k.label(), count: snapshot.count(*k) })
        .collect();

    ctx.insert("operator", &operator);
    ctx.insert("tab", tab);
    ctx.insert("tabs", &tabs);
    ctx.insert("content", &snapshot);
    ctx.insert("announcement_types", &AnnouncementType::ALL.map(AnnouncementType::as_str));
    ctx.insert("event_categories", &EventCategory::ALL.map(EventCategory::as_str));
    ctx.insert("resource_categories", &ResourceCategory::ALL.map(ResourceCategory::as_str));

    render(&tera, "admin/dashboard.html", &ctx)
}

async fn create_action<F>(
    gate: AdminGate,
    session: Session,
    state: web::Data<AppState>,
    form: Csrf<web::Form<F>>,
    config: web::Data<Config>,
) -> impl Responder
where
    F: RecordForm + CsrfGuarded + DeserializeOwned + 'static,
{
    if let Err(response) = require_admin(gate, &config) {
        return response;
    }

    let record = match form.into_inner().into_inner().into_record() {
        Ok(record) => record,
        Err(e) => {
            set_notification(&session, &e.to_string(), "error");
            return redirect(&dashboard_url(&config, F::KIND));
        }
    };
    let kind = record.kind();

    match state.manager.create(record).await {
        Ok((id, refreshed)) => {
            log::info!("Created {} record {}", kind.table(), id);
            report_refresh(&session, &refreshed.report, "Item created successfully");
        }
        Err(e) => {
            log::error!("Failed to create {} record: {}", kind.table(), e);
            set_notification(&session, &e.to_string(), "error");
        }
    }
    redirect(&dashboard_url(&config, kind))
}

async fn confirm_delete(
    gate: AdminGate,
    query: web::Query<DeleteQuery>,
    state: web::Data<AppState>,
    tera: web::Data<Tera>,
    token: CsrfToken,
    config: web::Data<Config>,
) -> impl Responder {
    if let Err(response) = require_admin(gate, &config) {
        return response;
    }
    let DeleteQuery { kind: slug, id } = query.into_inner();
    let Some(kind) = RecordKind::from_slug(&slug) else {
        return HttpResponse::NotFound().body("Unknown record kind.");
    };

    let mut title = state.manager.snapshot().title_of(kind, &id);
    if title.is_none() {
        title = state.manager.refetch_all().await.snapshot.title_of(kind, &id);
    }
    let Some(title) = title else {
        return HttpResponse::NotFound().body("Record not found.");
    };

    let mut ctx = Context::new();
    ctx.insert("admin_base_url", &config.admin_base_url());
    ctx.insert("csrf_token", token.get());
    ctx.insert("kind", kind.slug());
    ctx.insert("kind_label", kind.label());
    ctx.insert("id", &id);
    ctx.insert("title", &title);
    render(&tera, "admin/confirm_delete.html", &ctx)
}

async fn delete_action(
    gate: AdminGate,
    session: Session,
    path: web::Path<(String, String)>,
    state: web::Data<AppState>,
    form: Csrf<web::Form<RecordActionForm>>,
    config: web::Data<Config>,
) -> impl Responder {
    if let Err(response) = require_admin(gate, &config) {
        return response;
    }
    let (slug, id) = path.into_inner();
    let Some(kind) = RecordKind::from_slug(&slug) else {
        return HttpResponse::NotFound().body("Unknown record kind.");
    };

    let form = form.into_inner().into_inner();
    let Some(confirmed) = DeleteConfirmation::from_form_value(form.confirm.as_deref()) else {
        return redirect(&dashboard_url(&config, kind));
    };

    match state.manager.delete(kind, &id, confirmed).await {
        Ok(refreshed) => {
            log::info!("Deleted {} record {}", kind.table(), id);
            report_refresh(&session, &refreshed.report, "Item deleted successfully");
        }
        Err(e) => {
            log::error!("Failed to delete {} record {}: {}", kind.table(), id, e);
            set_notification(&session, &e.to_string(), "error");
        }
    }
    redirect(&dashboard_url(&config, kind))
}

async fn toggle_action(
    gate: AdminGate,
    session: Session,
    path: web::Path<(String, String)>,
    state: web::Data<AppState>,
    form: Csrf<web::Form<RecordActionForm>>,
    config: web::Data<Config>,
) -> impl Responder {
    if let Err(response) = require_admin(gate, &config) {
        return response;
    }
    let (slug, id) = path.into_inner();
    let Some(kind) = RecordKind::from_slug(&slug) else {
        return HttpResponse::NotFound().body("Unknown record kind.");
    };

    let form = form.into_inner().into_inner();
    let current = form.current_flag().or_else(|| state.manager.snapshot().is_active(kind, &id));
    let Some(current) = current else {
        set_notification(&session, "Unknown item state. Reload the dashboard and try again.", "error");
        return redirect(&dashboard_url(&config, kind));
    };

    match state.manager.toggle_active(kind, &id, current).await {
        Ok(refreshed) => {
            let status = if current { "hidden" } else { "visible" };
            log::info!("Set {} record {} {}", kind.table(), id, status);
            report_refresh(&session, &refreshed.report, &format!("Item is now {}", status));
        }
        Err(e) => {
            log::error!("Failed to toggle {} record {}: {}", kind.table(), id, e);
            set_notification(&session, &e.to_string(), "error");
        }
    }
    redirect(&dashboard_url(&config, kind))
}
