use std::{
    fs::{self, File},
    io::{self, BufReader, BufWriter, Write as _},
    path::{Path, PathBuf},
};

use serde_json::{Map, Value};
use sushi_engine::{ScoreKey, ScoreStore};

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum StoreError {
    #[display("score file I/O failed: {_0}")]
    Io(io::Error),
    #[display("score file is not valid JSON: {_0}")]
    Json(serde_json::Error),
    #[display("stored {key} is not a non-negative integer: {value}")]
    #[from(ignore)]
    InvalidValue { key: ScoreKey, value: Value },
}

/// [`ScoreStore`] backed by a JSON object on disk.
///
/// Values are kept in memory; writes only mark the store dirty and
/// [`flush`](ScoreStore::flush) rewrites the whole file.
///
/// ```json
/// { "highscore": 42, "lastScore": 17 }
/// ```
#[derive(Debug)]
pub struct JsonFileScoreStore {
    path: PathBuf,
    values: Map<String, Value>,
    dirty: bool,
}

impl JsonFileScoreStore {
    /// Opens the store at `path`.
    ///
    /// A missing file is an empty store. A file that cannot be read, or
    /// that does not hold a JSON object, is logged and also treated as
    /// empty; the next flush replaces it.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match read_file(&path) {
            Ok(Value::Object(values)) => values,
            Ok(other) => {
                tracing::warn!(
                    path = %path.display(),
                    content = %other,
                    "score file does not hold a JSON object, starting empty"
                );
                Map::new()
            }
            Err(StoreError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "score file not found, starting empty");
                Map::new()
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "score file unreadable, starting empty"
                );
                Map::new()
            }
        };
        Self {
            path,
            values,
            dirty: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Removes all stored scores. Takes effect on the next flush.
    pub fn clear(&mut self) {
        self.values.clear();
        self.dirty = true;
    }

    fn write_file(&self) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let tmp_path = self.path.with_extension("json.tmp");
        let mut writer = BufWriter::new(File::create(&tmp_path)?);
        serde_json::to_writer_pretty(&mut writer, &self.values)?;
        writeln!(writer)?;
        writer.flush()?;
        drop(writer);
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

fn read_file(path: &Path) -> Result<Value, StoreError> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

impl ScoreStore for JsonFileScoreStore {
    type Error = StoreError;

    fn read_int(&mut self, key: ScoreKey) -> Result<Option<usize>, Self::Error> {
        let Some(value) = self.values.get(key.as_str()) else {
            return Ok(None);
        };
        value
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| StoreError::InvalidValue {
                key,
                value: value.clone(),
            })
    }

    fn write_int(&mut self, key: ScoreKey, value: usize) -> Result<(), Self::Error> {
        self.values.insert(key.as_str().to_owned(), Value::from(value));
        self.dirty = true;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        if !self.dirty {
            return Ok(());
        }
        self.write_file()?;
        self.dirty = false;
        tracing::debug!(path = %self.path.display(), "scores saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::process;

    use sushi_engine::ScoreBoard;

    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("sushi-neko-{}", process::id()))
            .join(format!("{name}.json"))
    }

    #[test]
    fn test_missing_file_is_empty() {
        let mut store = JsonFileScoreStore::open(temp_path("missing"));
        assert_eq!(store.read_int(ScoreKey::HighScore).unwrap(), None);
    }

    #[test]
    fn test_flush_persists_values() {
        let path = temp_path("persist");
        let mut store = JsonFileScoreStore::open(&path);
        store.write_int(ScoreKey::HighScore, 42).unwrap();
        store.write_int(ScoreKey::LastScore, 17).unwrap();
        store.flush().unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["highscore"], 42);
        assert_eq!(json["lastScore"], 17);

        let mut reopened = JsonFileScoreStore::open(&path);
        assert_eq!(reopened.read_int(ScoreKey::HighScore).unwrap(), Some(42));
        assert_eq!(reopened.read_int(ScoreKey::LastScore).unwrap(), Some(17));
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_writes_are_not_visible_on_disk_before_flush() {
        let path = temp_path("unflushed");
        let mut store = JsonFileScoreStore::open(&path);
        store.write_int(ScoreKey::LastScore, 3).unwrap();
        assert!(!path.exists());
        assert_eq!(store.read_int(ScoreKey::LastScore).unwrap(), Some(3));
    }

    #[test]
    fn test_unparsable_file_loads_as_zero_and_is_replaced() {
        let path = temp_path("unparsable");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not json").unwrap();

        let mut store = JsonFileScoreStore::open(&path);
        assert_eq!(ScoreBoard::load(&mut store), ScoreBoard::default());
        // nothing was written, so the broken file is left alone
        store.flush().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "not json");

        store.write_int(ScoreKey::LastScore, 5).unwrap();
        store.flush().unwrap();
        let mut reopened = JsonFileScoreStore::open(&path);
        assert_eq!(reopened.read_int(ScoreKey::LastScore).unwrap(), Some(5));
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_non_object_file_loads_as_zero() {
        let path = temp_path("array");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "[1, 2]").unwrap();

        let mut store = JsonFileScoreStore::open(&path);
        assert_eq!(store.read_int(ScoreKey::HighScore).unwrap(), None);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_invalid_values_read_as_errors_and_load_as_zero() {
        let path = temp_path("invalid-values");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{ "highscore": -3, "lastScore": 1.5 }"#).unwrap();

        let mut store = JsonFileScoreStore::open(&path);
        assert!(matches!(
            store.read_int(ScoreKey::HighScore),
            Err(StoreError::InvalidValue {
                key: ScoreKey::HighScore,
                ..
            })
        ));
        assert!(matches!(
            store.read_int(ScoreKey::LastScore),
            Err(StoreError::InvalidValue {
                key: ScoreKey::LastScore,
                ..
            })
        ));
        assert_eq!(ScoreBoard::load(&mut store), ScoreBoard::default());

        store.write_int(ScoreKey::HighScore, 8).unwrap();
        store.write_int(ScoreKey::LastScore, 8).unwrap();
        store.flush().unwrap();
        let mut reopened = JsonFileScoreStore::open(&path);
        assert_eq!(reopened.read_int(ScoreKey::HighScore).unwrap(), Some(8));
        assert_eq!(reopened.read_int(ScoreKey::LastScore).unwrap(), Some(8));
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_reset_replaces_invalid_file() {
        let path = temp_path("reset-invalid");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{ "highscore": "lots" }"#).unwrap();

        let mut store = JsonFileScoreStore::open(&path);
        store.clear();
        store.flush().unwrap();
        let json: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json, serde_json::json!({}));
        fs::remove_file(&path).unwrap();
    }
}
