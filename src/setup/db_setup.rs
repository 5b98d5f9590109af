use redb::{Database, CommitError, StorageError, TableError, TransactionError};
use rusqlite::Connection;
use thiserror::Error;

use crate::helper::catalog;
use crate::models::db_operations::{content_db_operations, inbox_db_operations};
use crate::models::RecordKind;

#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Rusqlite error: {0}")]
    Rusqlite(#[from] rusqlite::Error),
    #[error("Redb storage error: {0}")]
    RedbStorage(#[from] StorageError),
    #[error("Redb transaction error: {0}")]
    RedbTransaction(#[from] TransactionError),
    #[error("Redb table error: {0}")]
    RedbTable(#[from] TableError),
    #[error("Redb commit error: {0}")]
    RedbCommit(#[from] CommitError),
}

/// Creates the four content tables and the operator accounts table.
pub fn create_content_tables(conn: &mut Connection) -> Result<(), SetupError> {
    let tx = conn.transaction()?;
    tx.execute(
        "CREATE TABLE IF NOT EXISTS announcements (
            id TEXT PRIMARY KEY,
            title_en TEXT NOT NULL,
            title_ur TEXT NOT NULL DEFAULT '',
            content_en TEXT NOT NULL DEFAULT '',
            content_ur TEXT NOT NULL DEFAULT '',
            type TEXT NOT NULL DEFAULT 'info' CHECK(type IN ('info', 'urgent', 'event')),
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL
        )",
        [],
    )?;

    tx.execute(
        "CREATE TABLE IF NOT EXISTS events (
            id TEXT PRIMARY KEY,
            title_en TEXT NOT NULL,
            title_ur TEXT NOT NULL DEFAULT '',
            description_en TEXT NOT NULL DEFAULT '',
            description_ur TEXT NOT NULL DEFAULT '',
            event_date TEXT NOT NULL,
            event_time TEXT NOT NULL DEFAULT '',
            location TEXT NOT NULL DEFAULT '',
            category TEXT NOT NULL DEFAULT 'general' CHECK(category IN ('general', 'education', 'youth', 'prayer')),
            is_active INTEGER NOT NULL DEFAULT 1
        )",
        [],
    )?;

    tx.execute(
        "CREATE TABLE IF NOT EXISTS educational_resources (
            id TEXT PRIMARY KEY,
            title_en TEXT NOT NULL,
            title_ur TEXT NOT NULL DEFAULT '',
            description_en TEXT NOT NULL DEFAULT '',
            description_ur TEXT NOT NULL DEFAULT '',
            category TEXT NOT NULL DEFAULT 'general' CHECK(category IN ('general', 'quran', 'hadith', 'fiqh')),
            resource_url TEXT,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL
        )",
        [],
    )?;

    tx.execute(
        "CREATE TABLE IF NOT EXISTS prayer_times (
            id TEXT PRIMARY KEY,
            prayer_name TEXT NOT NULL,
            iqamah_time TEXT NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 1
        )",
        [],
    )?;

    tx.execute(
        "CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            is_admin INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            last_login_time TEXT
        )",
        [],
    )?;

    tx.commit()?;
    Ok(())
}

/// Copies the built-in catalog into every content table that is still empty.
/// Returns how many rows were inserted.
pub fn seed_catalog_defaults(conn: &Connection) -> Result<usize, SetupError> {
    let mut inserted = 0;
    for kind in RecordKind::ALL {
        if content_db_operations::count_rows(conn, kind)? > 0 {
            continue;
        }
        for record in catalog::seed_records(kind, chrono::Local::now().date_naive()) {
            content_db_operations::insert_record(conn, &record)?;
            inserted += 1;
        }
    }
    Ok(inserted)
}

pub fn setup_inbox_db(db: &Database) -> Result<(), SetupError> {
    let write_txn = db.begin_write()?;
    {
        write_txn.open_table(inbox_db_operations::MESSAGES)?;
        write_txn.open_table(inbox_db_operations::MESSAGE_CHRONOLOGICAL_INDEX)?;
        write_txn.open_table(inbox_db_operations::SUBSCRIBERS)?;
    }
    write_txn.commit()?;
    Ok(())
}
