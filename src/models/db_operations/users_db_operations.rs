use crate::models::Operator;
use crate::models::db_operations::content_db_operations::format_timestamp;
use bcrypt::{hash, verify, BcryptError};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Error as RusqliteError};
use uuid::Uuid;

fn bcrypt_to_rusqlite_error(e: BcryptError) -> RusqliteError {
    RusqliteError::ToSqlConversionFailure(Box::new(e))
}

/// Emails are matched case-insensitively; they are stored lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn create_user(
    conn: &Connection,
    email: &str,
    password: &str,
    is_admin: bool,
) -> Result<Operator, RusqliteError> {
    let id = Uuid::new_v4().to_string();
    let email = normalize_email(email);
    let hashed_password = hash(password, bcrypt::DEFAULT_COST).map_err(bcrypt_to_rusqlite_error)?;
    conn.execute(
        "INSERT INTO users (id, email, password_hash, is_admin, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![id, email, hashed_password, is_admin, format_timestamp(Utc::now())],
    )?;
    Ok(Operator { id, email, is_admin })
}

pub fn email_exists(conn: &Connection, email: &str) -> Result<bool, RusqliteError> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM users WHERE email = ?1)",
        [normalize_email(email)],
        |row| row.get(0),
    )
}

pub fn read_user_by_id(conn: &Connection, user_id: &str) -> Result<Option<Operator>, RusqliteError> {
    conn.query_row(
        "SELECT id, email, is_admin FROM users WHERE id = ?1",
        [user_id],
        |row| Ok(Operator { id: row.get(0)?, email: row.get(1)?, is_admin: row.get(2)? }),
    )
    .optional()
}

pub fn read_admins(conn: &Connection) -> Result<Vec<Operator>, RusqliteError> {
    let mut stmt = conn.prepare("SELECT id, email, is_admin FROM users WHERE is_admin = 1 ORDER BY email")?;
    let rows = stmt.query_map([], |row| {
        Ok(Operator { id: row.get(0)?, email: row.get(1)?, is_admin: row.get(2)? })
    })?;
    rows.collect()
}

/// Returns the operator when the email exists and the password matches.
pub fn verify_credentials(
    conn: &Connection,
    email: &str,
    password: &str,
) -> Result<Option<Operator>, RusqliteError> {
    let res: Option<(String, String, String, bool)> = conn.query_row(
        "SELECT id, email, password_hash, is_admin FROM users WHERE email = ?1",
        [normalize_email(email)],
        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
    ).optional()?;

    if let Some((id, email, hash, is_admin)) = res {
        if verify(password, &hash).unwrap_or(false) {
            return Ok(Some(Operator { id, email, is_admin }));
        }
    }
    Ok(None)
}

pub fn is_admin(conn: &Connection, user_id: &str) -> Result<bool, RusqliteError> {
    let flag: Option<bool> = conn.query_row(
        "SELECT is_admin FROM users WHERE id = ?1",
        [user_id],
        |row| row.get(0),
    ).optional()?;
    Ok(flag.unwrap_or(false))
}

pub fn set_admin(conn: &Connection, email: &str, is_admin: bool) -> Result<usize, RusqliteError> {
    conn.execute(
        "UPDATE users SET is_admin = ?1 WHERE email = ?2",
        params![is_admin, normalize_email(email)],
    )
}

pub fn update_password(conn: &Connection, email: &str, new_password: &str) -> Result<usize, RusqliteError> {
    let hashed_password = hash(new_password, bcrypt::DEFAULT_COST).map_err(bcrypt_to_rusqlite_error)?;
    conn.execute(
        "UPDATE users SET password_hash = ?1 WHERE email = ?2",
        params![hashed_password, normalize_email(email)],
    )
}

pub fn update_last_login_time(conn: &Connection, user_id: &str) -> Result<(), RusqliteError> {
    let now = format_timestamp(Utc::now());
    conn.execute("UPDATE users SET last_login_time = ?1 WHERE id = ?2", params![now, user_id])?;
    Ok(())
}
