use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

use tracing::info;

use crate::domain::artifact::ModelArtifact;
use crate::domain::errors::StoreError;
use crate::domain::ports::ModelStore;

/// Filesystem-backed artifact store. The artifact (regression plus
/// scaler) is one JSON file; saves go through a temp file and an atomic
/// rename so concurrent readers never observe a partial write.
pub struct FsModelStore {
    file_path: PathBuf,
}

impl FsModelStore {
    pub fn new(file_path: PathBuf) -> Self {
        Self { file_path }
    }

    fn path_string(&self) -> String {
        self.file_path.display().to_string()
    }
}

impl ModelStore for FsModelStore {
    fn load(&self) -> Result<Option<ModelArtifact>, StoreError> {
        if !self.file_path.exists() {
            // Normal initial state: nothing trained yet.
            return Ok(None);
        }

        let file = File::open(&self.file_path).map_err(|e| StoreError::Read {
            path: self.path_string(),
            reason: e.to_string(),
        })?;
        let artifact =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| StoreError::Corrupt {
                path: self.path_string(),
                reason: e.to_string(),
            })?;
        Ok(Some(artifact))
    }

    fn save(&self, artifact: &ModelArtifact) -> Result<(), StoreError> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::Write {
                path: self.path_string(),
                reason: e.to_string(),
            })?;
        }

        // Atomic write: write to temp file then rename.
        let temp_path = self.file_path.with_extension("tmp");
        let file = File::create(&temp_path).map_err(|e| StoreError::Write {
            path: self.path_string(),
            reason: e.to_string(),
        })?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, artifact).map_err(|e| StoreError::Write {
            path: self.path_string(),
            reason: e.to_string(),
        })?;
        writer.flush().map_err(|e| StoreError::Write {
            path: self.path_string(),
            reason: e.to_string(),
        })?;
        fs::rename(&temp_path, &self.file_path).map_err(|e| StoreError::Write {
            path: self.path_string(),
            reason: e.to_string(),
        })?;

        info!("Saved model artifact to {:?}", self.file_path);
        Ok(())
    }

    fn available(&self) -> bool {
        self.file_path.exists()
    }

    fn path(&self) -> String {
        self.path_string()
    }
}
