//! Cached view of the four content tables for the admin dashboard.
//!
//! Every mutation is a single store request followed by a full refetch of all
//! four tables. The cache is never patched locally. Each refetch is stamped
//! with a generation when it starts, and a refetch that finishes after a newer
//! one has already been cached is discarded.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use actix_web::web;
use futures_util::future::join4;
use serde::Serialize;
use thiserror::Error;

use crate::models::content_store::{ContentStore, StoreError};
use crate::models::{Announcement, Collection, EducationalResource, Event, NewRecord, PrayerTime, RecordKind};

pub const LOAD_ERROR: &str = "Failed to load data";

#[derive(Error, Debug)]
pub enum ManagerError {
    #[error("{0}")]
    Store(#[from] StoreError),
    #[error("Background task failed: {0}")]
    Blocking(String),
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ContentSnapshot {
    pub announcements: Vec<Announcement>,
    pub events: Vec<Event>,
    pub resources: Vec<EducationalResource>,
    pub prayer_times: Vec<PrayerTime>,
}

impl ContentSnapshot {
    fn replace(&mut self, collection: Collection) {
        match collection {
            Collection::Announcements(rows) => self.announcements = rows,
            Collection::Events(rows) => self.events = rows,
            Collection::Resources(rows) => self.resources = rows,
            Collection::PrayerTimes(rows) => self.prayer_times = rows,
        }
    }

    pub fn count(&self, kind: RecordKind) -> usize {
        match kind {
            RecordKind::Announcement => self.announcements.len(),
            RecordKind::Event => self.events.len(),
            RecordKind::Resource => self.resources.len(),
            RecordKind::PrayerTime => self.prayer_times.len(),
        }
    }

    /// Current active flag of a cached record.
    pub fn is_active(&self, kind: RecordKind, id: &str) -> Option<bool> {
        match kind {
            RecordKind::Announcement => self.announcements.iter().find(|r| r.id == id).map(|r| r.is_active),
            RecordKind::Event => self.events.iter().find(|r| r.id == id).map(|r| r.is_active),
            RecordKind::Resource => self.resources.iter().find(|r| r.id == id).map(|r| r.is_active),
            RecordKind::PrayerTime => self.prayer_times.iter().find(|r| r.id == id).map(|r| r.is_active),
        }
    }

    /// Label shown on the delete confirmation page.
    pub fn title_of(&self, kind: RecordKind, id: &str) -> Option<String> {
        match kind {
            RecordKind::Announcement => self.announcements.iter().find(|r| r.id == id).map(|r| r.title_en.clone()),
            RecordKind::Event => self.events.iter().find(|r| r.id == id).map(|r| r.title_en.clone()),
            RecordKind::Resource => self.resources.iter().find(|r| r.id == id).map(|r| r.title_en.clone()),
            RecordKind::PrayerTime => self.prayer_times.iter().find(|r| r.id == id).map(|r| r.prayer_name.clone()),
        }
    }
}

/// Which tables could not be read during a refetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RefreshReport {
    pub failed: Vec<RecordKind>,
}

impl RefreshReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// One generic message no matter how many tables failed.
    pub fn load_error(&self) -> Option<&'static str> {
        if self.is_complete() { None } else { Some(LOAD_ERROR) }
    }
}

/// Outcome of one refetch: the rows to render and which tables failed.
#[derive(Debug, Clone, Default)]
pub struct Refreshed {
    pub snapshot: ContentSnapshot,
    pub report: RefreshReport,
}

/// Proof that the operator confirmed a delete. Only a confirmed form can
/// produce one.
#[derive(Debug)]
pub struct DeleteConfirmation(());

impl DeleteConfirmation {
    pub fn from_form_value(value: Option<&str>) -> Option<Self> {
        match value.map(str::trim) {
            Some("yes") => Some(DeleteConfirmation(())),
            _ => None,
        }
    }
}

#[derive(Default)]
struct Cached {
    generation: u64,
    snapshot: ContentSnapshot,
}

pub struct AdminContentManager {
    store: Arc<dyn ContentStore>,
    next_generation: AtomicU64,
    cached: RwLock<Cached>,
}

impl AdminContentManager {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        AdminContentManager { store, next_generation: AtomicU64::new(0), cached: RwLock::new(Cached::default()) }
    }

    fn read_snapshot(&self) -> RwLockReadGuard<'_, Cached> {
        self.cached.read().unwrap_or_else(|poisoned| {
            log::error!("RwLock for the content snapshot was poisoned! Using stale data.");
            poisoned.into_inner()
        })
    }

    fn write_snapshot(&self) -> RwLockWriteGuard<'_, Cached> {
        self.cached.write().unwrap_or_else(|poisoned| {
            log::error!("RwLock for the content snapshot was poisoned during refresh! Recovering lock.");
            poisoned.into_inner()
        })
    }

    /// Rows from the newest refetch that has finished so far.
    pub fn snapshot(&self) -> ContentSnapshot {
        self.read_snapshot().snapshot.clone()
    }

    async fn run<T, F>(&self, call: F) -> Result<T, ManagerError>
    where
        F: FnOnce(&dyn ContentStore) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        web::block(move || call(store.as_ref()))
            .await
            .map_err(|e| ManagerError::Blocking(e.to_string()))?
            .map_err(ManagerError::from)
    }

    /// Reads all four tables concurrently and waits for every one of them.
    /// Tables that fail keep their previously cached rows. If a refetch that
    /// started later has already been cached, its rows are returned instead.
    pub async fn refetch_all(&self) -> Refreshed {
        let generation = self.next_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let (announcements, events, resources, prayer_times) = join4(
            self.run(|s| s.fetch(RecordKind::Announcement)),
            self.run(|s| s.fetch(RecordKind::Event)),
            self.run(|s| s.fetch(RecordKind::Resource)),
            self.run(|s| s.fetch(RecordKind::PrayerTime)),
        )
        .await;

        let mut report = RefreshReport::default();
        let mut cached = self.write_snapshot();
        let mut snapshot = cached.snapshot.clone();
        let results = [
            (RecordKind::Announcement, announcements),
            (RecordKind::Event, events),
            (RecordKind::Resource, resources),
            (RecordKind::PrayerTime, prayer_times),
        ];
        for (kind, result) in results {
            match result {
                Ok(collection) => snapshot.replace(collection),
                Err(e) => {
                    log::error!("Failed to fetch {}: {}", kind.table(), e);
                    report.failed.push(kind);
                }
            }
        }

        if generation > cached.generation {
            cached.generation = generation;
            cached.snapshot = snapshot.clone();
        } else {
            log::debug!("Discarding refetch {} older than cached {}", generation, cached.generation);
            snapshot = cached.snapshot.clone();
        }
        Refreshed { snapshot, report }
    }

    /// One insert, then a refetch. Returns the new id.
    pub async fn create(&self, record: NewRecord) -> Result<(String, Refreshed), ManagerError> {
        let id = self.run(move |s| s.insert(&record)).await?;
        Ok((id, self.refetch_all().await))
    }

    pub async fn delete(
        &self,
        kind: RecordKind,
        id: &str,
        _confirmed: DeleteConfirmation,
    ) -> Result<Refreshed, ManagerError> {
        let id = id.to_string();
        self.run(move |s| s.delete(kind, &id)).await?;
        Ok(self.refetch_all().await)
    }

    /// Writes `!current`, where `current` is the flag the operator saw.
    pub async fn toggle_active(
        &self,
        kind: RecordKind,
        id: &str,
        current: bool,
    ) -> Result<Refreshed, ManagerError> {
        let id = id.to_string();
        self.run(move |s| s.set_active(kind, &id, !current)).await?;
        Ok(self.refetch_all().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnnouncementType, NewAnnouncement};
    use chrono::Utc;
    use futures_util::future::join;
    use std::collections::HashSet;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct Recorded {
        announcements: Vec<Announcement>,
        prayer_times: Vec<PrayerTime>,
        inserts: Vec<NewRecord>,
        set_active_calls: Vec<(String, bool)>,
        deletes: usize,
        fetches: usize,
        failing: HashSet<RecordKind>,
        slow_announcements: Option<Duration>,
    }

    #[derive(Default)]
    struct RecordingStore {
        state: Mutex<Recorded>,
    }

    impl RecordingStore {
        fn with_announcement(id: &str, is_active: bool) -> Self {
            let store = RecordingStore::default();
            store.state.lock().unwrap().announcements.push(Announcement {
                id: id.to_string(),
                title_en: "Eid".into(),
                title_ur: String::new(),
                content_en: String::new(),
                content_ur: String::new(),
                kind: AnnouncementType::Info,
                is_active,
                created_at: Utc::now(),
            });
            store
        }
    }

    fn boom() -> StoreError {
        StoreError::Database(rusqlite::Error::InvalidQuery)
    }

    impl ContentStore for RecordingStore {
        fn fetch(&self, kind: RecordKind) -> Result<Collection, StoreError> {
            let mut state = self.state.lock().unwrap();
            state.fetches += 1;
            if state.failing.contains(&kind) {
                return Err(boom());
            }
            let rows = match kind {
                RecordKind::Announcement => Collection::Announcements(state.announcements.clone()),
                RecordKind::Event => Collection::Events(Vec::new()),
                RecordKind::Resource => Collection::Resources(Vec::new()),
                RecordKind::PrayerTime => Collection::PrayerTimes(state.prayer_times.clone()),
            };
            // Rows are read before the delay, so a slow read returns old data.
            let delay = if kind == RecordKind::Announcement { state.slow_announcements.take() } else { None };
            drop(state);
            if let Some(delay) = delay {
                std::thread::sleep(delay);
            }
            Ok(rows)
        }

        fn insert(&self, record: &NewRecord) -> Result<String, StoreError> {
            let mut state = self.state.lock().unwrap();
            state.inserts.push(record.clone());
            let id = format!("id-{}", state.inserts.len());
            match record {
                NewRecord::Announcement(a) => state.announcements.push(Announcement {
                    id: id.clone(),
                    title_en: a.title_en.clone(),
                    title_ur: a.title_ur.clone(),
                    content_en: a.content_en.clone(),
                    content_ur: a.content_ur.clone(),
                    kind: a.kind,
                    is_active: a.is_active,
                    created_at: Utc::now(),
                }),
                NewRecord::PrayerTime(p) => state.prayer_times.push(PrayerTime {
                    id: id.clone(),
                    prayer_name: p.prayer_name.clone(),
                    iqamah_time: p.iqamah_time.clone(),
                    is_active: p.is_active,
                }),
                _ => {}
            }
            Ok(id)
        }

        fn delete(&self, kind: RecordKind, id: &str) -> Result<(), StoreError> {
            let mut state = self.state.lock().unwrap();
            state.deletes += 1;
            let before = state.announcements.len();
            state.announcements.retain(|a| a.id != id);
            if state.announcements.len() == before {
                return Err(StoreError::NotFound(kind.table(), id.to_string()));
            }
            Ok(())
        }

        fn set_active(&self, _kind: RecordKind, id: &str, is_active: bool) -> Result<(), StoreError> {
            let mut state = self.state.lock().unwrap();
            state.set_active_calls.push((id.to_string(), is_active));
            for a in state.announcements.iter_mut().filter(|a| a.id == id) {
                a.is_active = is_active;
            }
            Ok(())
        }
    }

    fn manager(store: &Arc<RecordingStore>) -> AdminContentManager {
        AdminContentManager::new(Arc::clone(store) as Arc<dyn ContentStore>)
    }

    #[actix_web::test]
    async fn refetch_reads_each_table_once() {
        let store = Arc::new(RecordingStore::with_announcement("a1", true));
        let manager = manager(&store);

        let refreshed = manager.refetch_all().await;
        assert!(refreshed.report.is_complete());
        assert_eq!(refreshed.snapshot.announcements.len(), 1);
        assert_eq!(store.state.lock().unwrap().fetches, 4);
        assert_eq!(manager.snapshot().announcements.len(), 1);
    }

    #[actix_web::test]
    async fn toggling_twice_restores_flag_with_two_writes() {
        let store = Arc::new(RecordingStore::with_announcement("a1", true));
        let manager = manager(&store);
        manager.refetch_all().await;

        let seen = manager.snapshot().is_active(RecordKind::Announcement, "a1").unwrap();
        manager.toggle_active(RecordKind::Announcement, "a1", seen).await.unwrap();
        let seen = manager.snapshot().is_active(RecordKind::Announcement, "a1").unwrap();
        assert!(!seen);
        manager.toggle_active(RecordKind::Announcement, "a1", seen).await.unwrap();

        assert_eq!(manager.snapshot().is_active(RecordKind::Announcement, "a1"), Some(true));
        let state = store.state.lock().unwrap();
        assert_eq!(state.set_active_calls, vec![("a1".to_string(), false), ("a1".to_string(), true)]);
    }

    #[actix_web::test]
    async fn urgent_announcement_is_one_insert_then_visible() {
        let store = Arc::new(RecordingStore::default());
        let manager = manager(&store);
        let record = NewRecord::Announcement(NewAnnouncement {
            title_en: "Test".into(),
            title_ur: "ٹیسٹ".into(),
            content_en: "Body".into(),
            content_ur: "باڈی".into(),
            kind: AnnouncementType::Urgent,
            is_active: true,
        });

        let (id, refreshed) = manager.create(record.clone()).await.unwrap();
        assert!(refreshed.report.is_complete());

        let state = store.state.lock().unwrap();
        assert_eq!(state.inserts, vec![record]);
        assert_eq!(state.fetches, 4);
        drop(state);

        let snapshot = manager.snapshot();
        let created = snapshot.announcements.iter().find(|a| a.id == id).unwrap();
        assert_eq!(created.kind, AnnouncementType::Urgent);
        assert_eq!(created.title_ur, "ٹیسٹ");
        assert_eq!(created.content_ur, "باڈی");
    }

    #[actix_web::test]
    async fn slow_earlier_refetch_does_not_overwrite_later_create() {
        let store = Arc::new(RecordingStore::default());
        store.state.lock().unwrap().slow_announcements = Some(Duration::from_millis(400));
        let manager = manager(&store);
        let record = NewRecord::Announcement(NewAnnouncement {
            title_en: "Test".into(),
            title_ur: String::new(),
            content_en: String::new(),
            content_ur: String::new(),
            kind: AnnouncementType::Urgent,
            is_active: true,
        });

        let (slow, created) = join(manager.refetch_all(), async {
            actix_web::rt::time::sleep(Duration::from_millis(50)).await;
            manager.create(record).await
        })
        .await;
        let (id, created) = created.unwrap();

        assert_eq!(store.state.lock().unwrap().announcements.len(), 1);
        assert_eq!(created.snapshot.announcements.len(), 1);
        assert_eq!(manager.snapshot().announcements.len(), 1);
        assert_eq!(manager.snapshot().announcements[0].id, id);
        assert_eq!(slow.snapshot.announcements.len(), 1);
    }

    #[actix_web::test]
    async fn deleted_record_disappears_from_next_snapshot() {
        let store = Arc::new(RecordingStore::with_announcement("a1", true));
        let manager = manager(&store);
        manager.refetch_all().await;

        let confirmed = DeleteConfirmation::from_form_value(Some("yes")).unwrap();
        manager.delete(RecordKind::Announcement, "a1", confirmed).await.unwrap();
        assert!(manager.snapshot().announcements.is_empty());
        assert_eq!(store.state.lock().unwrap().deletes, 1);
    }

    #[actix_web::test]
    async fn failed_mutation_skips_refetch_and_keeps_store_message() {
        let store = Arc::new(RecordingStore::default());
        let manager = manager(&store);

        let confirmed = DeleteConfirmation::from_form_value(Some("yes")).unwrap();
        let err = manager.delete(RecordKind::Announcement, "missing", confirmed).await.unwrap_err();
        assert_eq!(err.to_string(), "No announcements record with id 'missing'");
        assert_eq!(store.state.lock().unwrap().fetches, 0);
    }

    #[actix_web::test]
    async fn partial_failure_keeps_stale_rows_and_reports_once() {
        let store = Arc::new(RecordingStore::with_announcement("a1", true));
        let manager = manager(&store);
        manager.refetch_all().await;

        {
            let mut state = store.state.lock().unwrap();
            state.failing.insert(RecordKind::Announcement);
            state.failing.insert(RecordKind::Event);
            state.announcements.clear();
            state.prayer_times.push(PrayerTime {
                id: "p1".into(),
                prayer_name: "Fajr".into(),
                iqamah_time: "6:30 AM".into(),
                is_active: true,
            });
        }

        let report = manager.refetch_all().await.report;
        assert_eq!(report.failed, vec![RecordKind::Announcement, RecordKind::Event]);
        assert_eq!(report.load_error(), Some(LOAD_ERROR));

        let snapshot = manager.snapshot();
        assert_eq!(snapshot.announcements.len(), 1);
        assert_eq!(snapshot.prayer_times.len(), 1);
    }

    #[test]
    fn only_yes_confirms_a_delete() {
        assert!(DeleteConfirmation::from_form_value(Some("yes")).is_some());
        assert!(DeleteConfirmation::from_form_value(Some("no")).is_none());
        assert!(DeleteConfirmation::from_form_value(None).is_none());
    }
}
