//! Route prefixes declared by `host.json` files.
//!
//! Each function project may carry a `host.json` whose
//! `extensions.http.routePrefix` is prepended to every HTTP route of the
//! source files below it:
//!
//! ```json
//! { "version": "2.0", "extensions": { "http": { "routePrefix": "api/v2" } } }
//! ```

use log::{debug, warn};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const HOST_FILE: &str = "host.json";

/// The parts of `host.json` that matter for routing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    pub version: String,
    pub extensions: Extensions,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Extensions {
    pub http: HttpExtension,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HttpExtension {
    pub route_prefix: Option<String>,
}

impl HostConfig {
    pub fn parse(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    pub fn route_prefix(&self) -> Option<&str> {
        self.extensions
            .http
            .route_prefix
            .as_deref()
            .filter(|prefix| !prefix.is_empty())
    }
}

/// Route prefix per project directory.
#[derive(Debug, Clone, Default)]
pub struct RoutePrefixes {
    prefixes: HashMap<PathBuf, String>,
}

impl RoutePrefixes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every `host.json` below `root`.
    ///
    /// Unreadable or malformed files are logged and skipped.
    pub fn load(root: &Path) -> Self {
        let mut prefixes = Self::new();

        for entry in WalkDir::new(root)
            .into_iter()
            .filter_entry(|e| e.path() == root || !e.file_name().to_string_lossy().starts_with('.'))
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Failed to access path while locating {}: {}", HOST_FILE, e);
                    continue;
                }
            };
            if !entry.file_type().is_file() || entry.file_name() != HOST_FILE {
                continue;
            }

            let path = entry.path();
            let content = match fs::read_to_string(path) {
                Ok(content) => content,
                Err(e) => {
                    warn!("Error reading host file {}: {}", path.display(), e);
                    continue;
                }
            };
            let config = match HostConfig::parse(&content) {
                Ok(config) => config,
                Err(e) => {
                    warn!("Error parsing host file {}: {}", path.display(), e);
                    continue;
                }
            };

            if let (Some(dir), Some(prefix)) = (path.parent(), config.route_prefix()) {
                debug!("Route prefix '{}' for {}", prefix, dir.display());
                prefixes.insert(dir.to_path_buf(), prefix.to_string());
            }
        }

        prefixes
    }

    pub fn insert(&mut self, dir: PathBuf, prefix: String) {
        self.prefixes.insert(dir, prefix);
    }

    /// The prefix of the nearest enclosing project of `source`.
    pub fn prefix_for(&self, source: &Path) -> Option<&str> {
        source
            .ancestors()
            .skip(1)
            .find_map(|dir| self.prefixes.get(dir))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}
