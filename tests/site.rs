//! End-to-end tests for the public site, the JSON API and the admin gate.

use std::sync::Arc;

use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use masjid_backend::config::{Config, WebConfig};
use masjid_backend::models::content_store::{ContentStore, SqliteContentStore};
use masjid_backend::models::db_operations::{inbox_db_operations, users_db_operations};
use masjid_backend::models::identity::SqliteIdentityService;
use masjid_backend::models::{AnnouncementType, Collection, NewAnnouncement, NewRecord, RecordKind};
use masjid_backend::setup::db_setup;
use masjid_backend::{routes, AppState, DbPool};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use redb::Database;
use rusqlite::Connection;
use tempfile::TempDir;

const ADMIN: &str = "/management/test-admin";

struct Fixture {
    _dir: TempDir,
    config: Config,
    pool: DbPool,
    state: web::Data<AppState>,
    inbox: web::Data<Database>,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let content_path = dir.path().join("content.db");
    let mut conn = Connection::open(&content_path).unwrap();
    db_setup::create_content_tables(&mut conn).unwrap();

    let inbox = Database::create(dir.path().join("inbox.db")).unwrap();
    db_setup::setup_inbox_db(&inbox).unwrap();

    let pool = Pool::builder()
        .max_size(4)
        .build(SqliteConnectionManager::file(&content_path))
        .unwrap();
    let state = AppState::new(
        Arc::new(SqliteContentStore::new(pool.clone())),
        Arc::new(SqliteIdentityService::new(pool.clone())),
    );

    let config = Config {
        web: WebConfig { host: "127.0.0.1".into(), port: 0 },
        database_path: dir.path().display().to_string(),
        allowed_origins: String::new(),
        log_level: "warn".into(),
        session_secret_key: "ab".repeat(64),
        admin_url_prefix: "test-admin".into(),
        use_secure_cookies: false,
        default_locale: "en".into(),
    };

    Fixture { _dir: dir, config, pool, state: web::Data::new(state), inbox: web::Data::new(inbox) }
}

fn announcement(title: &str, is_active: bool) -> NewRecord {
    NewRecord::Announcement(NewAnnouncement {
        title_en: title.into(),
        title_ur: String::new(),
        content_en: format!("{} body", title),
        content_ur: String::new(),
        kind: AnnouncementType::Info,
        is_active,
    })
}

macro_rules! app {
    ($fx:expr) => {{
        let tera = routes::load_templates(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/**/*.html")).unwrap();
        test::init_service(
            App::new()
                .app_data(web::Data::new($fx.config.clone()))
                .app_data(web::Data::new(tera))
                .app_data($fx.inbox.clone())
                .app_data($fx.state.clone())
                .configure(routes::public::config_api)
                .service(routes::site_service(&$fx.config, Key::from(&[7u8; 64]))),
        )
        .await
    }};
}

fn location(resp: &ServiceResponse) -> String {
    resp.headers().get(header::LOCATION).unwrap().to_str().unwrap().to_string()
}

/// Merges the response's cookies into the jar, replacing same-named ones.
fn keep_cookies(jar: &mut Vec<Cookie<'static>>, resp: &ServiceResponse) {
    for cookie in resp.response().cookies() {
        jar.retain(|c| c.name() != cookie.name());
        jar.push(cookie.into_owned());
    }
}

fn with_cookies(mut req: test::TestRequest, jar: &[Cookie<'static>]) -> test::TestRequest {
    for cookie in jar {
        req = req.cookie(cookie.clone());
    }
    req
}

fn csrf_token_in(body: &str) -> String {
    let marker = "name=\"csrf_token\" value=\"";
    let start = body.find(marker).expect("page has a csrf field") + marker.len();
    let end = body[start..].find('"').unwrap();
    body[start..start + end].to_string()
}

async fn read_string(resp: ServiceResponse) -> String {
    String::from_utf8(test::read_body(resp).await.to_vec()).unwrap()
}

/// Logs in through the real login form and returns the POST response.
macro_rules! login {
    ($app:expr, $jar:expr, $email:expr, $password:expr) => {{
        let resp = test::call_service(&$app, test::TestRequest::get().uri(&format!("{}/login", ADMIN)).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        keep_cookies(&mut $jar, &resp);
        let token = csrf_token_in(&read_string(resp).await);

        let req = with_cookies(test::TestRequest::post().uri(&format!("{}/login", ADMIN)), &$jar)
            .set_form([("csrf_token", token.as_str()), ("email", $email), ("password", $password)])
            .to_request();
        let resp = test::call_service(&$app, req).await;
        keep_cookies(&mut $jar, &resp);
        resp
    }};
}

#[actix_web::test]
async fn home_page_lists_only_active_records() {
    let fx = fixture();
    fx.state.store.insert(&announcement("Visible Notice", true)).unwrap();
    fx.state.store.insert(&announcement("Hidden Notice", false)).unwrap();
    let app = app!(fx);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = read_string(resp).await;
    assert!(body.contains("Visible Notice"));
    assert!(!body.contains("Hidden Notice"));
    assert!(body.contains("<html lang=\"en\" dir=\"ltr\">"));
}

#[actix_web::test]
async fn api_returns_active_announcements_as_json() {
    let fx = fixture();
    fx.state.store.insert(&announcement("Eid Prayer", true)).unwrap();
    fx.state.store.insert(&announcement("Draft", false)).unwrap();
    let app = app!(fx);

    let rows: Vec<serde_json::Value> =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/api/announcements").to_request()).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["title_en"], "Eid Prayer");
    assert_eq!(rows[0]["type"], "info");

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/is_server_active").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn translation_tables_are_served_per_locale() {
    let fx = fixture();
    let app = app!(fx);

    let table: serde_json::Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/api/i18n/ur").to_request()).await;
    assert!(table.get("nav.home").is_some());

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/i18n/fr").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn language_switch_sets_cookie_and_renders_rtl() {
    let fx = fixture();
    let app = app!(fx);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/lang/ur").to_request()).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    let lang = resp.response().cookies().find(|c| c.name() == "lang").expect("lang cookie").into_owned();
    assert_eq!(lang.value(), "ur");

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").cookie(lang).to_request()).await;
    let body = read_string(resp).await;
    assert!(body.contains("<html lang=\"ur\" dir=\"rtl\">"));
}

#[actix_web::test]
async fn newsletter_signup_is_idempotent() {
    let fx = fixture();
    let app = app!(fx);

    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri("/newsletter")
            .set_form([("email", "Reader@Example.com")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(location(&resp), "/#newsletter");
    }
    assert_eq!(inbox_db_operations::subscriber_count(&fx.inbox).unwrap(), 1);
}

#[actix_web::test]
async fn contact_message_lands_in_inbox() {
    let fx = fixture();
    let app = app!(fx);

    let req = test::TestRequest::post()
        .uri("/contact")
        .set_form([
            ("name", "Bilal"),
            ("email", "bilal@example.com"),
            ("subject", "Nikah booking"),
            ("message", "<b>Is</b> the hall free on Saturday?"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), "/#contact");

    let messages = inbox_db_operations::read_latest_messages(&fx.inbox, 10).unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].message, "Is the hall free on Saturday?");
}

#[actix_web::test]
async fn tasbeeh_counter_survives_between_requests() {
    let fx = fixture();
    let app = app!(fx);
    let mut jar = Vec::new();
    let no_fields: [(&str, &str); 0] = [];

    for _ in 0..3 {
        let req = with_cookies(test::TestRequest::post().uri("/tasbeeh/increment"), &jar)
            .set_form(no_fields)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(location(&resp), "/#tasbeeh");
        keep_cookies(&mut jar, &resp);
    }

    let resp = test::call_service(&app, with_cookies(test::TestRequest::get().uri("/"), &jar).to_request()).await;
    let body = read_string(resp).await;
    assert!(body.contains("3 / 33"));

    let req = with_cookies(test::TestRequest::post().uri("/tasbeeh/spin"), &jar).set_form(no_fields).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn anonymous_dashboard_redirects_to_login() {
    let fx = fixture();
    let app = app!(fx);

    let resp = test::call_service(&app, test::TestRequest::get().uri(&format!("{}/dashboard", ADMIN)).to_request()).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("{}/login", ADMIN));
}

#[actix_web::test]
async fn login_without_csrf_token_is_rejected() {
    let fx = fixture();
    let app = app!(fx);

    let req = test::TestRequest::post()
        .uri(&format!("{}/login", ADMIN))
        .set_form([("csrf_token", "forged"), ("email", "a@b.co"), ("password", "secret1")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_client_error());
}

#[actix_web::test]
async fn non_admin_sees_access_denied_and_can_log_out() {
    let fx = fixture();
    {
        let conn = fx.pool.get().unwrap();
        users_db_operations::create_user(&conn, "member@masjid.org", "member-pass", false).unwrap();
    }
    let app = app!(fx);
    let mut jar = Vec::new();

    let resp = login!(app, jar, "member@masjid.org", "member-pass");
    assert_eq!(location(&resp), format!("{}/dashboard", ADMIN));

    let resp = test::call_service(&app, with_cookies(test::TestRequest::get().uri(&format!("{}/dashboard", ADMIN)), &jar).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    keep_cookies(&mut jar, &resp);
    let body = read_string(resp).await;
    assert!(body.contains("You don't have admin privileges"));

    let resp = test::call_service(&app, with_cookies(test::TestRequest::post().uri(&format!("{}/logout", ADMIN)), &jar).to_request()).await;
    assert_eq!(location(&resp), "/");
    keep_cookies(&mut jar, &resp);

    let resp = test::call_service(&app, with_cookies(test::TestRequest::get().uri(&format!("{}/dashboard", ADMIN)), &jar).to_request()).await;
    assert_eq!(location(&resp), format!("{}/login", ADMIN));
}

#[actix_web::test]
async fn wrong_password_flashes_error_on_login_page() {
    let fx = fixture();
    {
        let conn = fx.pool.get().unwrap();
        users_db_operations::create_user(&conn, "imam@masjid.org", "right-pass", true).unwrap();
    }
    let app = app!(fx);
    let mut jar = Vec::new();

    let resp = login!(app, jar, "imam@masjid.org", "wrong-pass");
    assert_eq!(location(&resp), format!("{}/login", ADMIN));

    let resp = test::call_service(&app, with_cookies(test::TestRequest::get().uri(&format!("{}/login", ADMIN)), &jar).to_request()).await;
    let body = read_string(resp).await;
    assert!(body.contains("notice-error"));
}

#[actix_web::test]
async fn malformed_email_flashes_validation_message_on_login_page() {
    let fx = fixture();
    let app = app!(fx);
    let mut jar = Vec::new();

    let resp = login!(app, jar, "not-an-email", "whatever-pass");
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("{}/login", ADMIN));

    let resp = test::call_service(&app, with_cookies(test::TestRequest::get().uri(&format!("{}/login", ADMIN)), &jar).to_request()).await;
    let body = read_string(resp).await;
    assert!(body.contains("notice-error"));
    assert!(body.contains("Invalid email address"));
}

#[actix_web::test]
async fn invalid_event_returns_to_events_tab() {
    let fx = fixture();
    {
        let conn = fx.pool.get().unwrap();
        users_db_operations::create_user(&conn, "imam@masjid.org", "imam-pass", true).unwrap();
    }
    let app = app!(fx);
    let mut jar = Vec::new();

    login!(app, jar, "imam@masjid.org", "imam-pass");
    let resp = test::call_service(&app, with_cookies(test::TestRequest::get().uri(&format!("{}/dashboard", ADMIN)), &jar).to_request()).await;
    keep_cookies(&mut jar, &resp);
    let token = csrf_token_in(&read_string(resp).await);

    let req = with_cookies(test::TestRequest::post().uri(&format!("{}/events/create", ADMIN)), &jar)
        .set_form([
            ("csrf_token", token.as_str()),
            ("title_en", "Youth halaqa"),
            ("title_ur", ""),
            ("description_en", ""),
            ("description_ur", ""),
            ("event_date", "2026-02-30"),
            ("event_time", "7:00 PM"),
            ("location", ""),
            ("category", "youth"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), format!("{}/dashboard?tab=events", ADMIN));
    keep_cookies(&mut jar, &resp);

    match fx.state.store.fetch(RecordKind::Event).unwrap() {
        Collection::Events(rows) => assert!(rows.is_empty()),
        _ => panic!("expected events"),
    }

    let resp = test::call_service(&app, with_cookies(test::TestRequest::get().uri(&format!("{}/dashboard?tab=events", ADMIN)), &jar).to_request()).await;
    let body = read_string(resp).await;
    assert!(body.contains("Event date must be a valid date"));
    assert!(body.contains("Add Event"));
}

#[actix_web::test]
async fn admin_creates_toggles_and_deletes_an_announcement() {
    let fx = fixture();
    {
        let conn = fx.pool.get().unwrap();
        users_db_operations::create_user(&conn, "imam@masjid.org", "imam-pass", true).unwrap();
    }
    let app = app!(fx);
    let mut jar = Vec::new();

    login!(app, jar, "imam@masjid.org", "imam-pass");

    let resp = test::call_service(&app, with_cookies(test::TestRequest::get().uri(&format!("{}/dashboard", ADMIN)), &jar).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    keep_cookies(&mut jar, &resp);
    let body = read_string(resp).await;
    assert!(body.contains("No announcements yet. Create your first one!"));
    let token = csrf_token_in(&body);

    let req = with_cookies(test::TestRequest::post().uri(&format!("{}/announcements/create", ADMIN)), &jar)
        .set_form([
            ("csrf_token", token.as_str()),
            ("title_en", "Jumuah moved"),
            ("title_ur", ""),
            ("content_en", "Khutbah starts at 2:15 PM"),
            ("content_ur", ""),
            ("type", "urgent"),
            ("is_active", "on"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), format!("{}/dashboard?tab=announcements", ADMIN));
    keep_cookies(&mut jar, &resp);

    let rows = match fx.state.store.fetch(RecordKind::Announcement).unwrap() {
        Collection::Announcements(rows) => rows,
        _ => panic!("expected announcements"),
    };
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].kind, AnnouncementType::Urgent);
    let id = rows[0].id.clone();

    let req = with_cookies(test::TestRequest::post().uri(&format!("{}/announcements/{}/toggle", ADMIN, id)), &jar)
        .set_form([("csrf_token", token.as_str()), ("current", "true")])
        .to_request();
    test::call_service(&app, req).await;
    assert_eq!(fx.state.manager.snapshot().is_active(RecordKind::Announcement, &id), Some(false));

    let resp = test::call_service(
        &app,
        with_cookies(test::TestRequest::get().uri(&format!("{}/confirm_delete?kind=announcements&id={}", ADMIN, id)), &jar)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    keep_cookies(&mut jar, &resp);
    let body = read_string(resp).await;
    assert!(body.contains("Are you sure you want to delete this item?"));
    let token = csrf_token_in(&body);

    let req = with_cookies(test::TestRequest::post().uri(&format!("{}/announcements/{}/delete", ADMIN, id)), &jar)
        .set_form([("csrf_token", token.as_str()), ("confirm", "yes")])
        .to_request();
    test::call_service(&app, req).await;
    assert_eq!(fx.state.manager.snapshot().count(RecordKind::Announcement), 0);
}
