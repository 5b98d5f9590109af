use std::sync::Arc;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
pub type DbPool = Pool<SqliteConnectionManager>;

use crate::helper::content_manager::AdminContentManager;
use crate::models::content_store::ContentStore;
use crate::models::identity::IdentityService;

/// Shared, explicitly passed application context. Locale and the logged-in
/// operator are per-request extractors, not part of this struct.
pub struct AppState {
    pub store: Arc<dyn ContentStore>,
    pub identity: Arc<dyn IdentityService>,
    pub manager: AdminContentManager,
}

impl AppState {
    pub fn new(store: Arc<dyn ContentStore>, identity: Arc<dyn IdentityService>) -> Self {
        let manager = AdminContentManager::new(Arc::clone(&store));
        AppState { store, identity, manager }
    }
}

pub mod config;
pub mod helper;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod setup;
