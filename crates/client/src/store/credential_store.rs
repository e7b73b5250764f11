use std::path::PathBuf;

use bankrollgod_core::auth::{CredentialStoreTrait, StoredCredentials};
use bankrollgod_core::errors::Result;

use super::json_file::JsonFile;

pub const CREDENTIALS_FILE: &str = "credentials.json";

/// Token and user persisted between runs as `credentials.json`.
#[derive(Debug)]
pub struct FileCredentialStore {
    file: JsonFile<StoredCredentials>,
}

impl FileCredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: JsonFile::new(path),
        }
    }

    /// Store at `<data_dir>/credentials.json`.
    pub fn in_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self::new(data_dir.into().join(CREDENTIALS_FILE))
    }
}

impl CredentialStoreTrait for FileCredentialStore {
    fn load(&self) -> Result<StoredCredentials> {
        self.file.read()
    }

    fn save(&self, credentials: &StoredCredentials) -> Result<()> {
        self.file.write(credentials)
    }

    fn clear(&self) -> Result<()> {
        self.file.remove()
    }
}
