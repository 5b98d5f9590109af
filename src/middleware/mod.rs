use actix_session::SessionExt;
use actix_web::{dev, web, Error, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use serde::Deserialize;
use std::future::{ready, Ready};

use crate::config::Config;
use crate::helper::auth_helpers::{self, GateState};
use crate::models::Locale;
use crate::AppState;

pub const LANG_COOKIE: &str = "lang";

#[derive(Deserialize)]
struct LangQuery {
    lang: Option<String>,
}

/// The locale for this request: `?lang=`, then the `lang` cookie, then the
/// configured default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectedLocale(pub Locale);

impl SelectedLocale {
    pub fn resolve(req: &HttpRequest) -> Locale {
        let from_query = web::Query::<LangQuery>::from_query(req.query_string())
            .ok()
            .and_then(|q| q.lang.as_deref().and_then(Locale::from_code));
        let from_cookie = || req.cookie(LANG_COOKIE).and_then(|c| Locale::from_code(c.value()));
        let default = || {
            req.app_data::<web::Data<Config>>()
                .map(|config| config.locale())
                .unwrap_or_default()
        };
        from_query.or_else(from_cookie).unwrap_or_else(default)
    }
}

impl FromRequest for SelectedLocale {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        ready(Ok(SelectedLocale(SelectedLocale::resolve(req))))
    }
}

/// Resolves the session against the identity service. Lookup failures are
/// logged and treated as anonymous.
pub struct AdminGate(pub GateState);

impl FromRequest for AdminGate {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        let operator_id = auth_helpers::session_operator_id(&req.get_session());
        let state = req.app_data::<web::Data<AppState>>().cloned();

        Box::pin(async move {
            let (Some(operator_id), Some(state)) = (operator_id, state) else {
                return Ok(AdminGate(GateState::Anonymous));
            };
            let identity = state.identity.clone();
            let resolved = web::block(move || auth_helpers::resolve_gate(identity.as_ref(), Some(&operator_id))).await;
            match resolved {
                Ok(Ok(gate)) => Ok(AdminGate(gate)),
                Ok(Err(e)) => {
                    log::error!("Identity lookup failed while resolving admin gate: {}", e);
                    Ok(AdminGate(GateState::Anonymous))
                }
                Err(e) => {
                    log::error!("Blocking task failed while resolving admin gate: {}", e);
                    Ok(AdminGate(GateState::Anonymous))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::Cookie;
    use actix_web::test::TestRequest;

    #[test]
    fn query_beats_cookie_beats_default() {
        let req = TestRequest::with_uri("/?lang=ur").cookie(Cookie::new(LANG_COOKIE, "en")).to_http_request();
        assert_eq!(SelectedLocale::resolve(&req), Locale::Ur);

        let req = TestRequest::with_uri("/").cookie(Cookie::new(LANG_COOKIE, "ur")).to_http_request();
        assert_eq!(SelectedLocale::resolve(&req), Locale::Ur);

        let req = TestRequest::with_uri("/?lang=fr").to_http_request();
        assert_eq!(SelectedLocale::resolve(&req), Locale::En);
    }
}
