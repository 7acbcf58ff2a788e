//! Content library loading and persistence (`data.json`).
//!
//! The library file is the hand-off point for external content producers:
//! lesson imports, manual edits, and scraped vocabulary all arrive as a
//! replacement `data.json`.

use chrono::Utc;
use std::fs;
use std::path::Path;

use crate::domain::{Book, Library, Meta};

/// Load the library, creating a default skeleton on first run.
///
/// A corrupt file is logged and served as the default in memory; it is NOT
/// overwritten, so the broken content stays on disk for inspection.
pub fn load_library(path: &Path) -> Library {
    if !path.exists() {
        tracing::info!("No content library at {}, writing default", path.display());
        let library = default_library();
        if let Err(e) = save_library(path, &library) {
            tracing::warn!("Could not write default library: {}", e);
        }
        return library;
    }

    match fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(library) => library,
            Err(e) => {
                tracing::warn!("Could not parse {}: {}", path.display(), e);
                default_library()
            }
        },
        Err(e) => {
            tracing::warn!("Could not read {}: {}", path.display(), e);
            default_library()
        }
    }
}

pub fn save_library(path: &Path, library: &Library) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(library)?;
    fs::write(path, json)
}

/// Empty book shells matching the printed course material
pub fn default_library() -> Library {
    let mut library = Library {
        meta: Meta {
            version: "2.0".to_string(),
            created: Utc::now().to_rfc3339(),
        },
        ..Library::default()
    };

    for (key, title) in [
        ("forty_lessons", "40 Lessons"),
        ("expressions", "800 Everyday Expressions"),
        ("professional", "Professional English"),
    ] {
        library.books.insert(
            key.to_string(),
            Book {
                title: title.to_string(),
                lessons: Vec::new(),
            },
        );
    }

    library
}
