use actix_session::Session;
use thiserror::Error;

use crate::helper::form_helpers::{is_valid_email, ValidationError, MIN_PASSWORD_LEN};
use crate::models::identity::{IdentityError, IdentityService};
use crate::models::Operator;

pub const SESSION_OPERATOR_KEY: &str = "operator_id";

#[derive(Error, Debug)]
pub enum AuthError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Identity(#[from] IdentityError),
}

impl AuthError {
    /// Text shown on the login page.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::Invalid(e) => e.to_string(),
            AuthError::Identity(e) => friendly_auth_error(&e.to_string()),
        }
    }
}

/// Maps known identity service messages to friendlier wording.
pub fn friendly_auth_error(raw: &str) -> String {
    if raw.contains("User already registered") {
        "This email is already registered. Please login instead.".to_string()
    } else if raw.contains("Invalid login credentials") {
        "Invalid email or password. Please try again.".to_string()
    } else {
        raw.to_string()
    }
}

pub fn validate_credentials(email: &str, password: &str) -> Result<(), ValidationError> {
    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}

/// Validates first; the identity service is only called with well-formed input.
pub fn sign_in(identity: &dyn IdentityService, email: &str, password: &str) -> Result<Operator, AuthError> {
    validate_credentials(email, password)?;
    Ok(identity.sign_in(email.trim(), password)?)
}

pub fn sign_up(identity: &dyn IdentityService, email: &str, password: &str) -> Result<Operator, AuthError> {
    validate_credentials(email, password)?;
    Ok(identity.sign_up(email.trim(), password)?)
}

/// Where a request to the admin area ends up.
#[derive(Debug, Clone, PartialEq)]
pub enum GateState {
    Anonymous,
    NotAdmin(Operator),
    Admin(Operator),
}

pub fn resolve_gate(identity: &dyn IdentityService, operator_id: Option<&str>) -> Result<GateState, IdentityError> {
    let Some(id) = operator_id else {
        return Ok(GateState::Anonymous);
    };
    match identity.find_operator(id)? {
        None => Ok(GateState::Anonymous),
        Some(operator) if identity.is_admin(&operator.id)? => Ok(GateState::Admin(operator)),
        Some(operator) => Ok(GateState::NotAdmin(operator)),
    }
}

pub fn session_operator_id(session: &Session) -> Option<String> {
    session.get::<String>(SESSION_OPERATOR_KEY).unwrap_or(None)
}

pub fn start_session(session: &Session, operator: &Operator) -> Result<(), actix_session::SessionInsertError> {
    session.renew();
    session.insert(SESSION_OPERATOR_KEY, &operator.id)
}

/// Always succeeds.
pub fn sign_out(session: &Session) {
    session.purge();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingIdentity {
        calls: AtomicUsize,
        admin: bool,
    }

    impl CountingIdentity {
        fn new(admin: bool) -> Self {
            CountingIdentity { calls: AtomicUsize::new(0), admin }
        }

        fn operator(&self) -> Operator {
            Operator { id: "op-1".into(), email: "imam@masjid.org".into(), is_admin: self.admin }
        }
    }

    impl IdentityService for CountingIdentity {
        fn sign_in(&self, _email: &str, _password: &str) -> Result<Operator, IdentityError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(IdentityError::InvalidCredentials)
        }

        fn sign_up(&self, _email: &str, _password: &str) -> Result<Operator, IdentityError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(IdentityError::AlreadyRegistered)
        }

        fn find_operator(&self, user_id: &str) -> Result<Option<Operator>, IdentityError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok((user_id == "op-1").then(|| self.operator()))
        }

        fn is_admin(&self, _user_id: &str) -> Result<bool, IdentityError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.admin)
        }
    }

    #[test]
    fn invalid_email_never_reaches_the_identity_service() {
        let identity = CountingIdentity::new(false);
        let err = sign_in(&identity, "not-an-email", "secret1").unwrap_err();
        assert_eq!(err.user_message(), "Invalid email address");
        assert_eq!(identity.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn short_password_never_reaches_the_identity_service() {
        let identity = CountingIdentity::new(false);
        let err = sign_up(&identity, "imam@masjid.org", "12345").unwrap_err();
        assert_eq!(err.user_message(), "Password must be at least 6 characters");
        assert_eq!(identity.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn service_errors_are_mapped_to_friendly_text() {
        let identity = CountingIdentity::new(false);
        let err = sign_in(&identity, "imam@masjid.org", "secret1").unwrap_err();
        assert_eq!(err.user_message(), "Invalid email or password. Please try again.");

        let err = sign_up(&identity, "imam@masjid.org", "secret1").unwrap_err();
        assert_eq!(err.user_message(), "This email is already registered. Please login instead.");
        assert_eq!(identity.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn unknown_errors_pass_through() {
        assert_eq!(friendly_auth_error("Email rate limit exceeded"), "Email rate limit exceeded");
    }

    #[test]
    fn gate_has_three_outcomes() {
        let member = CountingIdentity::new(false);
        assert_eq!(resolve_gate(&member, None).unwrap(), GateState::Anonymous);
        assert_eq!(resolve_gate(&member, Some("gone")).unwrap(), GateState::Anonymous);
        assert!(matches!(resolve_gate(&member, Some("op-1")).unwrap(), GateState::NotAdmin(_)));

        let admin = CountingIdentity::new(true);
        assert!(matches!(resolve_gate(&admin, Some("op-1")).unwrap(), GateState::Admin(_)));
    }
}
