//! Content store
//!
//! Audio bytes live under `upload_root`, one file per asset, named by an
//! opaque storage key. Metadata lives in `audio_assets` and refers to the file
//! by that key (relative to `upload_root`).
//!
//! Write order for an upload:
//! 1. Validate input and resolve artist and album (nothing written on failure)
//! 2. Write bytes to `<key>.part`, then rename to `<key>`
//! 3. Insert metadata; on failure remove the file again

use musicbox_common::db::AudioAsset;
use musicbox_common::{uuid_utils, Error, Result};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, error, info, warn};

use crate::db;
use crate::db::audio::NewAudioAsset;

/// One audio upload as received from a client
#[derive(Debug, Clone)]
pub struct AudioUpload {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub title: String,
    pub artist_id: i64,
    pub album_id: i64,
    pub duration_seconds: i64,
}

impl AudioUpload {
    fn validate(&self) -> Result<()> {
        if self.file_name.trim().is_empty() {
            return Err(Error::InvalidInput("file name must not be empty".to_string()));
        }
        if self.title.trim().is_empty() {
            return Err(Error::InvalidInput("title must not be empty".to_string()));
        }
        if self.duration_seconds < 0 {
            return Err(Error::InvalidInput(format!(
                "duration must not be negative: {}",
                self.duration_seconds
            )));
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct ContentStore {
    db: SqlitePool,
    upload_root: PathBuf,
}

impl ContentStore {
    pub fn new(db: SqlitePool, upload_root: PathBuf) -> Self {
        Self { db, upload_root }
    }

    pub fn upload_root(&self) -> &Path {
        &self.upload_root
    }

    /// Store an uploaded file and record its metadata
    pub async fn save_audio(&self, upload: AudioUpload) -> Result<AudioAsset> {
        upload.validate()?;

        if db::artists::find_artist(&self.db, upload.artist_id).await?.is_none() {
            return Err(Error::not_found("artist", upload.artist_id));
        }
        if db::albums::find_album(&self.db, upload.album_id).await?.is_none() {
            return Err(Error::not_found("album", upload.album_id));
        }

        let key = uuid_utils::storage_key(&upload.file_name);
        let final_path = self.upload_root.join(&key);

        self.write_file(&key, &upload.bytes).await?;

        let new_asset = NewAudioAsset {
            title: upload.title,
            duration_seconds: upload.duration_seconds,
            artist_id: upload.artist_id,
            album_id: upload.album_id,
            file_path: key,
            original_file_name: upload.file_name,
            size_bytes: upload.bytes.len() as i64,
        };

        match db::audio::insert_audio_asset(&self.db, &new_asset).await {
            Ok(asset) => {
                info!(
                    id = asset.id,
                    file = %asset.file_path,
                    size_bytes = asset.size_bytes,
                    "Stored audio '{}'",
                    asset.title
                );
                Ok(asset)
            }
            Err(e) => {
                error!("Audio metadata insert failed, removing {}: {}", final_path.display(), e);
                if let Err(remove_err) = fs::remove_file(&final_path).await {
                    warn!("Failed to remove {}: {}", final_path.display(), remove_err);
                }
                Err(e)
            }
        }
    }

    /// Metadata for one asset
    pub async fn get_audio_metadata(&self, id: i64) -> Result<AudioAsset> {
        db::audio::find_audio_asset(&self.db, id)
            .await?
            .ok_or_else(|| Error::not_found("audio", id))
    }

    /// Full contents of one asset's file
    ///
    /// A metadata row whose file is gone is reported as
    /// [`Error::DanglingReference`], not as not-found.
    pub async fn get_audio_bytes(&self, id: i64) -> Result<Vec<u8>> {
        let asset = self.get_audio_metadata(id).await?;
        let path = self.resolve(&asset.file_path)?;

        match fs::read(&path).await {
            Ok(bytes) => {
                debug!(id, size = bytes.len(), "Read audio file");
                Ok(bytes)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(id, "Audio file missing: {}", path.display());
                Err(Error::DanglingReference { id, path })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// All assets in id order
    pub async fn list_audio(&self) -> Result<Vec<AudioAsset>> {
        db::audio::list_audio_assets(&self.db).await
    }

    async fn write_file(&self, key: &str, bytes: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.upload_root).await?;

        let final_path = self.upload_root.join(key);
        let part_path = self.upload_root.join(format!("{}.part", key));

        let written = match fs::write(&part_path, bytes).await {
            Ok(()) => fs::rename(&part_path, &final_path).await,
            Err(e) => Err(e),
        };

        if let Err(e) = written {
            error!("Writing {} failed: {}", final_path.display(), e);
            remove_part_file(&part_path).await;
            return Err(e.into());
        }

        Ok(())
    }

    /// Map a stored key to a path inside `upload_root`
    fn resolve(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key.contains('/') || key.contains('\\') || key.contains("..") {
            return Err(Error::Internal(format!("invalid storage key: {:?}", key)));
        }
        Ok(self.upload_root.join(key))
    }
}

/// Best-effort cleanup of a partial write; a leftover `.part` file is logged
async fn remove_part_file(path: &Path) {
    match fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to remove partial upload {}: {}", path.display(), e),
    }
}
