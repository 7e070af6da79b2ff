//! URL uniqueness registry.
//!
//! One [`PathCollisionDetector`] lives for one build pass. Paths are
//! compared ignoring leading and trailing slashes, and a registered path is
//! never reassigned.

use std::collections::HashMap;

/// A candidate URL and the source that claims it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathRecord {
    /// Path in registry form: `/a/b/` (or `/`).
    pub normalized_path: String,
    /// Human-readable source identifier, reported on collision.
    pub source_name: String,
}

impl PathRecord {
    #[must_use]
    pub fn new(path: &str, source_name: impl Into<String>) -> Self {
        Self {
            normalized_path: normalize_key(path),
            source_name: source_name.into(),
        }
    }
}

/// Two sources resolved to the same URL.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("Path {path} of {rejected} is already used by {existing}")]
pub struct PathCollision {
    pub path: String,
    /// Source that registered the path first and keeps it.
    pub existing: String,
    /// Source whose page is dropped.
    pub rejected: String,
}

fn normalize_key(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_owned()
    } else {
        format!("/{trimmed}/")
    }
}

/// Registry mapping normalized paths to the source that owns them.
#[derive(Debug)]
pub struct PathCollisionDetector {
    paths: HashMap<String, String>,
    last_unique: bool,
}

impl Default for PathCollisionDetector {
    fn default() -> Self {
        Self {
            paths: HashMap::new(),
            last_unique: true,
        }
    }
}

impl PathCollisionDetector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `record` unless its path belongs to another source.
    ///
    /// Re-registering a path under the same source name is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`PathCollision`] naming both sources when the path is
    /// already owned by a different source. The registry is unchanged.
    pub fn try_insert(&mut self, record: PathRecord) -> Result<(), PathCollision> {
        if let Some(existing) = self.paths.get(&record.normalized_path) {
            if *existing == record.source_name {
                return Ok(());
            }
            tracing::warn!(
                path = %record.normalized_path,
                existing = %existing,
                rejected = %record.source_name,
                "Path collision: two sources generate the same URL"
            );
            return Err(PathCollision {
                path: record.normalized_path,
                existing: existing.clone(),
                rejected: record.source_name,
            });
        }

        self.paths
            .insert(record.normalized_path, record.source_name);
        Ok(())
    }

    /// Register `record` and remember whether it collided.
    ///
    /// Pair with [`is_unique`](Self::is_unique); prefer
    /// [`try_insert`](Self::try_insert) which does both in one step.
    pub fn add(&mut self, record: PathRecord) -> &mut Self {
        self.last_unique = self.try_insert(record).is_ok();
        self
    }

    /// Whether the preceding [`add`](Self::add) did not collide.
    #[must_use]
    pub fn is_unique(&self) -> bool {
        self.last_unique
    }

    /// Whether `path` is already registered.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains_key(&normalize_key(path))
    }

    /// Source owning `path`, if any.
    #[must_use]
    pub fn owner(&self, path: &str) -> Option<&str> {
        self.paths.get(&normalize_key(path)).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
