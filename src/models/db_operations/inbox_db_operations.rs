use redb::{Database, ReadableTable, TableDefinition, CommitError, StorageError, TableError, TransactionError};
use crate::models::{ContactMessage, Subscriber};
use uuid::Uuid;
use chrono::Utc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InboxError {
    #[error("Redb storage error: {0}")]
    RedbStorage(#[from] StorageError),
    #[error("Redb transaction error: {0}")]
    RedbTransaction(#[from] TransactionError),
    #[error("Redb table error: {0}")]
    RedbTable(#[from] TableError),
    #[error("Redb commit error: {0}")]
    RedbCommit(#[from] CommitError),
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

pub const MESSAGES: TableDefinition<&[u8; 16], &str> = TableDefinition::new("contact_messages");
// Keyed by negated receive time so forward iteration yields newest first.
pub const MESSAGE_CHRONOLOGICAL_INDEX: TableDefinition<(i64, &[u8; 16]), ()> = TableDefinition::new("contact_messages_chronological_index");
pub const SUBSCRIBERS: TableDefinition<&str, &str> = TableDefinition::new("newsletter_subscribers");

pub fn store_contact_message(
    db: &Database,
    name: &str,
    email: &str,
    subject: &str,
    message: &str,
) -> Result<ContactMessage, InboxError> {
    let message_uuid = Uuid::new_v4();
    let record = ContactMessage {
        id: message_uuid.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        subject: subject.to_string(),
        message: message.to_string(),
        received_at: Utc::now(),
    };
    let record_json = serde_json::to_string(&record)?;

    let write_txn = db.begin_write()?;
    {
        let mut messages_table = write_txn.open_table(MESSAGES)?;
        let mut chrono_index = write_txn.open_table(MESSAGE_CHRONOLOGICAL_INDEX)?;

        let id_bytes = message_uuid.into_bytes();
        messages_table.insert(&id_bytes, record_json.as_str())?;
        chrono_index.insert((-record.received_at.timestamp_micros(), &id_bytes), ())?;
    }
    write_txn.commit()?;

    Ok(record)
}

pub fn read_latest_messages(db: &Database, limit: usize) -> Result<Vec<ContactMessage>, InboxError> {
    let read_txn = db.begin_read()?;
    let chrono_index = read_txn.open_table(MESSAGE_CHRONOLOGICAL_INDEX)?;
    let messages_table = read_txn.open_table(MESSAGES)?;

    let mut messages = Vec::new();
    for item in chrono_index.iter()?.take(limit) {
        let (key, _value) = item?;
        let id_bytes = key.value().1;
        if let Some(json) = messages_table.get(id_bytes)? {
            messages.push(serde_json::from_str(json.value())?);
        }
    }
    Ok(messages)
}

/// Adds the address to the newsletter list. Returns `false` when it was
/// already subscribed, in which case the original subscription is kept.
pub fn subscribe(db: &Database, email: &str) -> Result<bool, InboxError> {
    let key = email.trim().to_lowercase();
    let write_txn = db.begin_write()?;
    let added = {
        let mut table = write_txn.open_table(SUBSCRIBERS)?;
        let exists = table.get(key.as_str())?.is_some();
        if !exists {
            let record = Subscriber { email: key.clone(), subscribed_at: Utc::now() };
            let json = serde_json::to_string(&record)?;
            table.insert(key.as_str(), json.as_str())?;
        }
        !exists
    };
    write_txn.commit()?;
    Ok(added)
}

pub fn read_subscribers(db: &Database) -> Result<Vec<Subscriber>, InboxError> {
    let read_txn = db.begin_read()?;
    let table = read_txn.open_table(SUBSCRIBERS)?;
    let mut subscribers = Vec::new();
    for item in table.iter()? {
        let (_email, json) = item?;
        subscribers.push(serde_json::from_str(json.value())?);
    }
    Ok(subscribers)
}

pub fn subscriber_count(db: &Database) -> Result<u64, InboxError> {
    let read_txn = db.begin_read()?;
    let table = read_txn.open_table(SUBSCRIBERS)?;
    Ok(table.len()?)
}
