use std::path::PathBuf;

use bankrollgod_core::errors::Result;
use bankrollgod_core::sessions::{SessionRecoveryMap, SessionStateStoreTrait};

use super::json_file::JsonFile;

pub const SESSION_STATE_FILE: &str = "active_sessions.json";

/// The session recovery document, persisted as `active_sessions.json`.
#[derive(Debug)]
pub struct FileSessionStateStore {
    file: JsonFile<SessionRecoveryMap>,
}

impl FileSessionStateStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: JsonFile::new(path),
        }
    }

    pub fn in_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self::new(data_dir.into().join(SESSION_STATE_FILE))
    }
}

impl SessionStateStoreTrait for FileSessionStateStore {
    fn load_all(&self) -> Result<SessionRecoveryMap> {
        self.file.read()
    }

    fn save_all(&self, states: &SessionRecoveryMap) -> Result<()> {
        self.file.write(states)
    }

    fn clear(&self) -> Result<()> {
        self.file.remove()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bankrollgod_core::sessions::SessionRecoveryRecord;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_document_is_keyed_by_session_id_with_camel_case_records() {
        let dir = tempdir().unwrap();
        let store = FileSessionStateStore::in_dir(dir.path());

        let mut states = SessionRecoveryMap::new();
        states.insert(
            "31".to_string(),
            SessionRecoveryRecord::new("7", Some("Sunday grind".to_string())),
        );
        store.save_all(&states).unwrap();

        let raw: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(dir.path().join(SESSION_STATE_FILE)).unwrap(),
        )
        .unwrap();
        assert_eq!(raw["31"]["bankrollId"], "7");
        assert_eq!(raw["31"]["sessionName"], "Sunday grind");

        assert_eq!(store.load_all().unwrap(), states);
    }

    #[test]
    fn test_clear_removes_everything() {
        let dir = tempdir().unwrap();
        let store = FileSessionStateStore::in_dir(dir.path());
        let mut states = SessionRecoveryMap::new();
        states.insert("1".to_string(), SessionRecoveryRecord::new("2", None));
        store.save_all(&states).unwrap();

        store.clear().unwrap();

        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_empty_file_reads_as_empty_map() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(SESSION_STATE_FILE), "").unwrap();
        let store = FileSessionStateStore::in_dir(dir.path());
        assert!(store.load_all().unwrap().is_empty());
    }
}
