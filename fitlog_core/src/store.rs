//! Key-value persistence for raw records.
//!
//! Records live under fixed string keys as JSON text. The [`KeyValueStore`]
//! trait is the seam the tracker is built on; [`FileStore`] keeps the whole
//! key space in a single JSON object file with locking and atomic
//! replacement, [`MemoryStore`] backs tests and embedding.

use crate::{Error, Result};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Fixed store keys
pub mod keys {
    pub const PROFILE: &str = "calorieData";
    pub const MEALS: &str = "meals";
    pub const WORKOUTS: &str = "workouts";
    pub const WEIGHT_ENTRIES: &str = "weightEntries";
    pub const DAILY_CALORIE_GOAL: &str = "dailyCalorieGoal";
    pub const GOAL_WEIGHT: &str = "goalWeight";
}

/// Text store addressed by named keys
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-process store
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style seeding, handy for fixtures
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// What a read of the store file found
enum Snapshot {
    Values(BTreeMap<String, String>),
    /// The file exists but its contents could not be read back
    Damaged,
}

/// Single-file JSON store (`{"key": "text", ...}`)
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path a damaged store file is moved to before it is overwritten
    pub fn quarantine_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".corrupt");
        self.path.with_file_name(name)
    }

    /// Read the whole key space with a shared lock
    ///
    /// A missing file is an empty store. A file that cannot be read is logged
    /// and also treated as empty, so a damaged store never blocks logging new
    /// data.
    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        Ok(match self.read_snapshot()? {
            Snapshot::Values(values) => values,
            Snapshot::Damaged => BTreeMap::new(),
        })
    }

    fn read_snapshot(&self) -> Result<Snapshot> {
        if !self.path.exists() {
            tracing::debug!("No store file at {:?}, starting empty", self.path);
            return Ok(Snapshot::Values(BTreeMap::new()));
        }

        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!("Unable to open store {:?}: {}. Starting empty.", self.path, e);
                return Ok(Snapshot::Values(BTreeMap::new()));
            }
        };

        if let Err(e) = file.lock_shared() {
            tracing::warn!("Unable to lock store {:?}: {}. Starting empty.", self.path, e);
            return Ok(Snapshot::Values(BTreeMap::new()));
        }

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        if let Err(e) = reader.read_to_string(&mut contents) {
            let _ = file.unlock();
            tracing::warn!("Failed to read store {:?}: {}. Starting empty.", self.path, e);
            return Ok(Snapshot::Damaged);
        }

        file.unlock()?;

        if contents.trim().is_empty() {
            return Ok(Snapshot::Values(BTreeMap::new()));
        }

        match serde_json::from_str::<BTreeMap<String, String>>(&contents) {
            Ok(values) => Ok(Snapshot::Values(values)),
            Err(e) => {
                tracing::warn!("Failed to parse store {:?}: {}. Starting empty.", self.path, e);
                Ok(Snapshot::Damaged)
            }
        }
    }

    /// Move a damaged store aside so the next write cannot destroy it
    fn quarantine(&self) -> Result<()> {
        let backup = self.quarantine_path();
        std::fs::rename(&self.path, &backup)?;
        tracing::warn!("Moved damaged store {:?} to {:?}", self.path, backup);
        Ok(())
    }

    /// Atomically replace the store file
    ///
    /// Writes to a temp file in the same directory, syncs it, then renames it
    /// over the original.
    fn write_all(&self, values: &BTreeMap<String, String>) -> Result<()> {
        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            serde_json::to_writer_pretty(&mut writer, values)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut values = match self.read_snapshot()? {
            Snapshot::Values(values) => values,
            Snapshot::Damaged => {
                self.quarantine()?;
                BTreeMap::new()
            }
        };
        values.insert(key.to_string(), value.to_string());
        self.write_all(&values)?;
        tracing::debug!("Saved key {} to {:?}", key, self.path);
        Ok(())
    }
}

/// Load and deserialize a JSON record, falling back to `T::default()`
///
/// Corrupt JSON is logged and treated as absent.
pub fn load_json<T, S>(store: &S, key: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
    S: KeyValueStore + ?Sized,
{
    let Some(text) = store.get(key)? else {
        return Ok(T::default());
    };

    match serde_json::from_str(&text) {
        Ok(value) => Ok(value),
        Err(e) => {
            tracing::warn!("Failed to parse stored {}: {}. Using defaults.", key, e);
            Ok(T::default())
        }
    }
}

/// Serialize a record as JSON and store it under `key`
pub fn save_json<T, S>(store: &mut S, key: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let text = serde_json::to_string(value)?;
    store.set(key, &text)
}
