use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Serialize, de::DeserializeOwned};
use tracing::warn;

use crate::store::schema::LastQueryData;

const LAST_QUERY_FILE: &str = "last_query.json";

pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(data_dir())
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    /// Missing, unreadable and malformed files all yield the default.
    fn load<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        let path = self.file_path(name);
        if !path.exists() {
            return T::default();
        }
        match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|err| {
                warn!(path = %path.display(), %err, "ignoring malformed store file");
                T::default()
            }),
            Err(err) => {
                warn!(path = %path.display(), %err, "failed to read store file");
                T::default()
            }
        }
    }

    /// Write to a temp file, fsync, then rename into place.
    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    pub fn load_last_query(&self) -> LastQueryData {
        let data: LastQueryData = self.load(LAST_QUERY_FILE);
        if data.needs_reset() {
            LastQueryData::default()
        } else {
            data
        }
    }

    pub fn save_last_query(&self, data: &LastQueryData) -> Result<()> {
        self.save(LAST_QUERY_FILE, data)
    }
}

/// `<data_dir>/rackr`, also home to the log file.
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rackr")
}
