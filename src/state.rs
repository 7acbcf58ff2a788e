//! Application state shared across handlers.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use crate::db::DbPool;
use crate::domain::Library;
use crate::srs::SelectionPolicy;

/// Application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,

    /// Content library; replaced wholesale by the import page
    pub library: Arc<RwLock<Library>>,

    /// Where the library is persisted on disk
    pub data_file: PathBuf,

    /// Due-card selection policy, resolved at startup
    pub policy: SelectionPolicy,
}

impl AppState {
    pub fn new(db: DbPool, library: Library, data_file: PathBuf, policy: SelectionPolicy) -> Self {
        Self {
            db,
            library: Arc::new(RwLock::new(library)),
            data_file,
            policy,
        }
    }
}
