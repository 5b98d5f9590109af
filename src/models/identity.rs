//! Account sign-in, sign-up and administrator lookup.

use crate::models::db_operations::users_db_operations;
use crate::models::Operator;
use crate::DbPool;
use thiserror::Error;

/// Messages match the wording of the hosted identity service the site was
/// built against, so the login page can map them to friendlier text.
#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("User already registered")]
    AlreadyRegistered,
    #[error("Invalid login credentials")]
    InvalidCredentials,
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),
}

pub trait IdentityService: Send + Sync {
    fn sign_in(&self, email: &str, password: &str) -> Result<Operator, IdentityError>;

    /// New accounts are never administrators; that role is granted out of band.
    fn sign_up(&self, email: &str, password: &str) -> Result<Operator, IdentityError>;

    /// Looks up the account behind a session, `None` if it no longer exists.
    fn find_operator(&self, user_id: &str) -> Result<Option<Operator>, IdentityError>;

    fn is_admin(&self, user_id: &str) -> Result<bool, IdentityError>;
}

pub struct SqliteIdentityService {
    pool: DbPool,
}

impl SqliteIdentityService {
    pub fn new(pool: DbPool) -> Self {
        SqliteIdentityService { pool }
    }
}

impl IdentityService for SqliteIdentityService {
    fn sign_in(&self, email: &str, password: &str) -> Result<Operator, IdentityError> {
        let conn = self.pool.get()?;
        let operator = users_db_operations::verify_credentials(&conn, email, password)?
            .ok_or(IdentityError::InvalidCredentials)?;
        if let Err(e) = users_db_operations::update_last_login_time(&conn, &operator.id) {
            log::warn!("Could not record login time for {}: {}", operator.email, e);
        }
        Ok(operator)
    }

    fn sign_up(&self, email: &str, password: &str) -> Result<Operator, IdentityError> {
        let conn = self.pool.get()?;
        if users_db_operations::email_exists(&conn, email)? {
            return Err(IdentityError::AlreadyRegistered);
        }
        Ok(users_db_operations::create_user(&conn, email, password, false)?)
    }

    fn find_operator(&self, user_id: &str) -> Result<Option<Operator>, IdentityError> {
        let conn = self.pool.get()?;
        Ok(users_db_operations::read_user_by_id(&conn, user_id)?)
    }

    fn is_admin(&self, user_id: &str) -> Result<bool, IdentityError> {
        let conn = self.pool.get()?;
        Ok(users_db_operations::is_admin(&conn, user_id)?)
    }
}
