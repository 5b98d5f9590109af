use actix_csrf::CsrfMiddleware;
use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::HttpServiceFactory;
use actix_web::http::Method;
use actix_web::{web, HttpResponse};
use rand::prelude::StdRng;
use tera::Tera;

use crate::config::Config;
use crate::helper::translation;

pub mod admin;
pub mod public;

/// Loads every template and registers the `t` translation filter.
pub fn load_templates(glob: &str) -> tera::Result<Tera> {
    let mut tera = Tera::new(glob)?;
    tera.register_filter("t", translation::translate_filter);
    Ok(tera)
}

pub fn session_middleware(key: Key, secure: bool) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_secure(secure)
        .cookie_http_only(true)
        .cookie_same_site(SameSite::Lax)
        .build()
}

/// GET pages that render admin forms get a fresh token cookie.
fn admin_csrf(base: &str) -> CsrfMiddleware<StdRng> {
    CsrfMiddleware::<StdRng>::new()
        .set_cookie(Method::GET, format!("{}/login", base))
        .set_cookie(Method::GET, format!("{}/dashboard", base))
        .set_cookie(Method::GET, format!("{}/confirm_delete", base))
}

/// Everything that needs the session: the public page and its forms, and the
/// admin area under `/management/{ADMIN_URL_PREFIX}`.
pub fn site_service(config: &Config, session_key: Key) -> impl HttpServiceFactory {
    let base = config.admin_base_url();
    web::scope("")
        .wrap(session_middleware(session_key, config.use_secure_cookies))
        .service(
            web::scope("/management").service(
                web::scope(&config.admin_url_prefix)
                    .wrap(admin_csrf(&base))
                    .configure(admin::config_admin),
            ),
        )
        .configure(public::config_site)
}

pub(crate) fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found().append_header(("location", location)).finish()
}

pub(crate) fn render(tera: &Tera, template: &str, ctx: &tera::Context) -> HttpResponse {
    match tera.render(template, ctx) {
        Ok(rendered) => HttpResponse::Ok().content_type("text/html; charset=utf-8").body(rendered),
        Err(err) => {
            log::error!("Template rendering error in {}: {:?}", template, err);
            HttpResponse::InternalServerError().body("Error rendering page.")
        }
    }
}
