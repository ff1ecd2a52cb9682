// Checkpoint files for the visited, domain and exclusion sets

use outlink_scanner::CrawlState;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum CheckpointError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed checkpoint {path}: {reason}")]
    MalformedState { path: PathBuf, reason: String },
}

pub type Result<T> = std::result::Result<T, CheckpointError>;

/// The sets a checkpoint can hold, one file each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Urls,
    Domains,
    Exclusions,
}

impl Entity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Entity::Urls => "urls",
            Entity::Domains => "domains",
            Entity::Exclusions => "exclusions",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            Entity::Urls => "urls.json",
            Entity::Domains => "domains.json",
            Entity::Exclusions => "exclusions.json",
        }
    }
}

/// A directory of `{ "<entity>": [...], "count": n }` documents.
///
/// Writes rewrite the whole file in place. A crash mid-write can leave a
/// truncated file behind, which the next load reports as malformed.
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    dir: PathBuf,
}

impl CheckpointStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, entity: Entity) -> PathBuf {
        self.dir.join(entity.file_name())
    }

    pub fn exists(&self, entity: Entity) -> bool {
        self.path_for(entity).exists()
    }

    /// Read one set. A missing file is an empty set.
    pub fn load(&self, entity: Entity) -> Result<BTreeSet<String>> {
        let path = self.path_for(entity);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No checkpoint at {}, starting empty", path.display());
                return Ok(BTreeSet::new());
            }
            Err(source) => return Err(CheckpointError::Io { path, source }),
        };
        decode(entity, &path, &raw)
    }

    pub fn save(&self, entity: Entity, entries: &BTreeSet<String>) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|source| CheckpointError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.path_for(entity);
        fs::write(&path, encode(entity, entries))
            .map_err(|source| CheckpointError::Io { path, source })
    }

    /// Load visited URLs and domains, plus exclusions when asked to.
    pub fn load_state(&self, include_exclusions: bool) -> Result<CrawlState> {
        let mut state = CrawlState::new();
        state.visited = self.load(Entity::Urls)?;
        state.domains = self.load(Entity::Domains)?;
        if include_exclusions {
            state.exclusions = self.load(Entity::Exclusions)?;
        }
        Ok(state)
    }

    pub fn save_state(&self, state: &CrawlState, include_exclusions: bool) -> Result<()> {
        self.save(Entity::Urls, &state.visited)?;
        self.save(Entity::Domains, &state.domains)?;
        if include_exclusions {
            self.save(Entity::Exclusions, &state.exclusions)?;
        }
        Ok(())
    }

    /// Remove every checkpoint file. Files that are already gone are fine.
    pub fn clear(&self) -> Result<()> {
        for entity in [Entity::Urls, Entity::Domains, Entity::Exclusions] {
            let path = self.path_for(entity);
            match fs::remove_file(&path) {
                Ok(()) => debug!("Removed {}", path.display()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(source) => return Err(CheckpointError::Io { path, source }),
            }
        }
        Ok(())
    }
}

/// Serialize a set. `count` always matches the array length.
pub fn encode(entity: Entity, entries: &BTreeSet<String>) -> String {
    let mut document = Map::new();
    document.insert(
        entity.as_str().to_string(),
        Value::Array(entries.iter().cloned().map(Value::String).collect()),
    );
    document.insert("count".to_string(), Value::from(entries.len()));

    let mut out = Value::Object(document).to_string();
    out.push('\n');
    out
}

pub fn decode(entity: Entity, path: &Path, raw: &str) -> Result<BTreeSet<String>> {
    let malformed = |reason: String| CheckpointError::MalformedState {
        path: path.to_path_buf(),
        reason,
    };

    let value: Value = serde_json::from_str(raw).map_err(|e| malformed(e.to_string()))?;
    let document = value
        .as_object()
        .ok_or_else(|| malformed("expected a JSON object".to_string()))?;

    let items = document
        .get(entity.as_str())
        .and_then(Value::as_array)
        .ok_or_else(|| malformed(format!("missing \"{}\" array", entity.as_str())))?;
    let count = document
        .get("count")
        .and_then(Value::as_u64)
        .ok_or_else(|| malformed("missing integer \"count\"".to_string()))?;

    let mut entries = BTreeSet::new();
    for item in items {
        let entry = item
            .as_str()
            .ok_or_else(|| malformed(format!("non-string entry {}", item)))?;
        entries.insert(entry.to_string());
    }

    if count as usize != items.len() {
        warn!(
            "{} says count {} but holds {} entries, using the entries",
            path.display(),
            count,
            items.len()
        );
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_encode_shape() {
        let encoded = encode(Entity::Domains, &set(&["http://b.com/", "http://a.com/"]));
        let value: Value = serde_json::from_str(&encoded).unwrap();

        assert_eq!(value["count"], 2);
        assert_eq!(value["domains"][0], "http://a.com/");
        assert_eq!(value["domains"][1], "http://b.com/");
    }

    #[test]
    fn test_decode_rejects_wrong_entity_key() {
        let raw = r#"{ "domains": ["http://a.com/"], "count": 1 }"#;
        let result = decode(Entity::Urls, Path::new("urls.json"), raw);
        assert!(matches!(result, Err(CheckpointError::MalformedState { .. })));
    }

    #[test]
    fn test_decode_collapses_duplicates() {
        let raw = r#"{ "urls": ["http://a.com/", "http://a.com/"], "count": 2 }"#;
        let entries = decode(Entity::Urls, Path::new("urls.json"), raw).unwrap();
        assert_eq!(entries, set(&["http://a.com/"]));
    }
}
