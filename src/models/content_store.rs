//! The row store behind the admin panel and the public site.
//!
//! Handlers never touch SQL directly; they go through [`ContentStore`], which
//! treats every call as a request that may fail.

use crate::models::db_operations::content_db_operations;
use crate::models::{Collection, NewRecord, RecordKind};
use crate::DbPool;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),
    #[error("No {0} record with id '{1}'")]
    NotFound(&'static str, String),
}

pub trait ContentStore: Send + Sync {
    /// Reads a whole table in the kind's admin ordering.
    fn fetch(&self, kind: RecordKind) -> Result<Collection, StoreError>;

    /// Inserts exactly one row and returns its id.
    fn insert(&self, record: &NewRecord) -> Result<String, StoreError>;

    fn delete(&self, kind: RecordKind, id: &str) -> Result<(), StoreError>;

    fn set_active(&self, kind: RecordKind, id: &str, is_active: bool) -> Result<(), StoreError>;
}

pub struct SqliteContentStore {
    pool: DbPool,
}

impl SqliteContentStore {
    pub fn new(pool: DbPool) -> Self {
        SqliteContentStore { pool }
    }
}

impl ContentStore for SqliteContentStore {
    fn fetch(&self, kind: RecordKind) -> Result<Collection, StoreError> {
        let conn = self.pool.get()?;
        Ok(content_db_operations::read_collection(&conn, kind)?)
    }

    fn insert(&self, record: &NewRecord) -> Result<String, StoreError> {
        let conn = self.pool.get()?;
        Ok(content_db_operations::insert_record(&conn, record)?)
    }

    fn delete(&self, kind: RecordKind, id: &str) -> Result<(), StoreError> {
        let conn = self.pool.get()?;
        match content_db_operations::delete_record(&conn, kind, id)? {
            0 => Err(StoreError::NotFound(kind.table(), id.to_string())),
            _ => Ok(()),
        }
    }

    fn set_active(&self, kind: RecordKind, id: &str, is_active: bool) -> Result<(), StoreError> {
        let conn = self.pool.get()?;
        match content_db_operations::update_is_active(&conn, kind, id, is_active)? {
            0 => Err(StoreError::NotFound(kind.table(), id.to_string())),
            _ => Ok(()),
        }
    }
}
