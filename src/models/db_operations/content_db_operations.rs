use crate::models::{
    Announcement, AnnouncementType, Collection, EducationalResource, Event, EventCategory,
    NewRecord, PrayerTime, RecordKind, ResourceCategory,
};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Error as RusqliteError, Row};
use uuid::Uuid;

fn conversion_error(column: usize, message: String) -> RusqliteError {
    RusqliteError::FromSqlConversionFailure(column, Type::Text, message.into())
}

fn timestamp_column(row: &Row, column: usize) -> Result<DateTime<Utc>, RusqliteError> {
    let raw: String = row.get(column)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(column, format!("bad timestamp '{}': {}", raw, e)))
}

fn enum_column<T>(row: &Row, column: usize, parse: fn(&str) -> Option<T>) -> Result<T, RusqliteError> {
    let raw: String = row.get(column)?;
    parse(&raw).ok_or_else(|| conversion_error(column, format!("unknown value '{}'", raw)))
}

/// Timestamps are written in one fixed RFC 3339 shape so that text ordering
/// matches chronological ordering.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// ORDER BY clause the admin list uses for each kind.
pub fn order_clause(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Announcement => "created_at DESC, rowid DESC",
        RecordKind::Event => "event_date ASC, rowid ASC",
        RecordKind::Resource => "created_at DESC, rowid DESC",
        RecordKind::PrayerTime => "prayer_name ASC",
    }
}

pub fn read_announcements(conn: &Connection) -> Result<Vec<Announcement>, RusqliteError> {
    let sql = format!(
        "SELECT id, title_en, title_ur, content_en, content_ur, type, is_active, created_at FROM announcements ORDER BY {}",
        order_clause(RecordKind::Announcement)
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| {
        Ok(Announcement {
            id: row.get(0)?,
            title_en: row.get(1)?,
            title_ur: row.get(2)?,
            content_en: row.get(3)?,
            content_ur: row.get(4)?,
            kind: enum_column(row, 5, AnnouncementType::parse)?,
            is_active: row.get(6)?,
            created_at: timestamp_column(row, 7)?,
        })
    })?;
    rows.collect()
}

pub fn read_events(conn: &Connection) -> Result<Vec<Event>, RusqliteError> {
    let sql = format!(
        "SELECT id, title_en, title_ur, description_en, description_ur, event_date, event_time, location, category, is_active FROM events ORDER BY {}",
        order_clause(RecordKind::Event)
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| {
        Ok(Event {
            id: row.get(0)?,
            title_en: row.get(1)?,
            title_ur: row.get(2)?,
            description_en: row.get(3)?,
            description_ur: row.get(4)?,
            event_date: row.get(5)?,
            event_time: row.get(6)?,
            location: row.get(7)?,
            category: enum_column(row, 8, EventCategory::parse)?,
            is_active: row.get(9)?,
        })
    })?;
    rows.collect()
}

pub fn read_resources(conn: &Connection) -> Result<Vec<EducationalResource>, RusqliteError> {
    let sql = format!(
        "SELECT id, title_en, title_ur, description_en, description_ur, category, resource_url, is_active, created_at FROM educational_resources ORDER BY {}",
        order_clause(RecordKind::Resource)
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| {
        Ok(EducationalResource {
            id: row.get(0)?,
            title_en: row.get(1)?,
            title_ur: row.get(2)?,
            description_en: row.get(3)?,
            description_ur: row.get(4)?,
            category: enum_column(row, 5, ResourceCategory::parse)?,
            resource_url: row.get(6)?,
            is_active: row.get(7)?,
            created_at: timestamp_column(row, 8)?,
        })
    })?;
    rows.collect()
}

pub fn read_prayer_times(conn: &Connection) -> Result<Vec<PrayerTime>, RusqliteError> {
    let sql = format!(
        "SELECT id, prayer_name, iqamah_time, is_active FROM prayer_times ORDER BY {}",
        order_clause(RecordKind::PrayerTime)
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| {
        Ok(PrayerTime {
            id: row.get(0)?,
            prayer_name: row.get(1)?,
            iqamah_time: row.get(2)?,
            is_active: row.get(3)?,
        })
    })?;
    rows.collect()
}

pub fn read_collection(conn: &Connection, kind: RecordKind) -> Result<Collection, RusqliteError> {
    Ok(match kind {
        RecordKind::Announcement => Collection::Announcements(read_announcements(conn)?),
        RecordKind::Event => Collection::Events(read_events(conn)?),
        RecordKind::Resource => Collection::Resources(read_resources(conn)?),
        RecordKind::PrayerTime => Collection::PrayerTimes(read_prayer_times(conn)?),
    })
}

/// Inserts one row and returns its freshly generated id.
pub fn insert_record(conn: &Connection, record: &NewRecord) -> Result<String, RusqliteError> {
    let id = Uuid::new_v4().to_string();
    let now = format_timestamp(Utc::now());

    match record {
        NewRecord::Announcement(a) => conn.execute(
            "INSERT INTO announcements (id, title_en, title_ur, content_en, content_ur, type, is_active, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![id, a.title_en, a.title_ur, a.content_en, a.content_ur, a.kind.as_str(), a.is_active, now],
        )?,
        NewRecord::Event(e) => conn.execute(
            "INSERT INTO events (id, title_en, title_ur, description_en, description_ur, event_date, event_time, location, category, is_active) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![id, e.title_en, e.title_ur, e.description_en, e.description_ur, e.event_date, e.event_time, e.location, e.category.as_str(), e.is_active],
        )?,
        NewRecord::Resource(r) => conn.execute(
            "INSERT INTO educational_resources (id, title_en, title_ur, description_en, description_ur, category, resource_url, is_active, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![id, r.title_en, r.title_ur, r.description_en, r.description_ur, r.category.as_str(), r.resource_url, r.is_active, now],
        )?,
        NewRecord::PrayerTime(p) => conn.execute(
            "INSERT INTO prayer_times (id, prayer_name, iqamah_time, is_active) VALUES (?1, ?2, ?3, ?4)",
            params![id, p.prayer_name, p.iqamah_time, p.is_active],
        )?,
    };
    Ok(id)
}

pub fn delete_record(conn: &Connection, kind: RecordKind, id: &str) -> Result<usize, RusqliteError> {
    let sql = format!("DELETE FROM {} WHERE id = ?1", kind.table());
    conn.execute(&sql, [id])
}

/// Single-column update of the visibility flag.
pub fn update_is_active(conn: &Connection, kind: RecordKind, id: &str, is_active: bool) -> Result<usize, RusqliteError> {
    let sql = format!("UPDATE {} SET is_active = ?1 WHERE id = ?2", kind.table());
    conn.execute(&sql, params![is_active, id])
}

pub fn count_rows(conn: &Connection, kind: RecordKind) -> Result<i64, RusqliteError> {
    let sql = format!("SELECT COUNT(*) FROM {}", kind.table());
    conn.query_row(&sql, [], |row| row.get(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewAnnouncement, NewEvent, NewPrayerTime};
    use crate::setup::db_setup;

    fn test_conn() -> Connection {
        let mut conn = Connection::open_in_memory().unwrap();
        db_setup::create_content_tables(&mut conn).unwrap();
        conn
    }

    fn prayer(name: &str) -> NewRecord {
        NewRecord::PrayerTime(NewPrayerTime {
            prayer_name: name.to_string(),
            iqamah_time: "1:00 PM".to_string(),
            is_active: true,
        })
    }

    #[test]
    fn prayer_times_are_read_in_name_order() {
        let conn = test_conn();
        for name in ["Isha", "Asr", "Fajr"] {
            insert_record(&conn, &prayer(name)).unwrap();
        }
        let names: Vec<String> = read_prayer_times(&conn).unwrap().into_iter().map(|p| p.prayer_name).collect();
        assert_eq!(names, vec!["Asr", "Fajr", "Isha"]);
    }

    #[test]
    fn events_are_read_chronologically() {
        let conn = test_conn();
        for date in ["2026-12-01", "2026-01-15", "2026-06-30"] {
            let event = NewRecord::Event(NewEvent {
                title_en: format!("Event {}", date),
                title_ur: String::new(),
                description_en: String::new(),
                description_ur: String::new(),
                event_date: date.to_string(),
                event_time: "7:00 PM".to_string(),
                location: String::new(),
                category: EventCategory::General,
                is_active: true,
            });
            insert_record(&conn, &event).unwrap();
        }
        let dates: Vec<String> = read_events(&conn).unwrap().into_iter().map(|e| e.event_date).collect();
        assert_eq!(dates, vec!["2026-01-15", "2026-06-30", "2026-12-01"]);
    }

    #[test]
    fn newest_announcement_comes_first() {
        let conn = test_conn();
        for title in ["first", "second"] {
            let record = NewRecord::Announcement(NewAnnouncement {
                title_en: title.to_string(),
                title_ur: String::new(),
                content_en: String::new(),
                content_ur: String::new(),
                kind: AnnouncementType::Info,
                is_active: true,
            });
            insert_record(&conn, &record).unwrap();
        }
        let titles: Vec<String> = read_announcements(&conn).unwrap().into_iter().map(|a| a.title_en).collect();
        assert_eq!(titles, vec!["second", "first"]);
    }

    #[test]
    fn update_and_delete_report_affected_rows() {
        let conn = test_conn();
        let id = insert_record(&conn, &prayer("Fajr")).unwrap();

        assert_eq!(update_is_active(&conn, RecordKind::PrayerTime, &id, false).unwrap(), 1);
        assert!(!read_prayer_times(&conn).unwrap()[0].is_active);

        assert_eq!(delete_record(&conn, RecordKind::PrayerTime, &id).unwrap(), 1);
        assert_eq!(delete_record(&conn, RecordKind::PrayerTime, &id).unwrap(), 0);
        assert_eq!(count_rows(&conn, RecordKind::PrayerTime).unwrap(), 0);
    }
}
