//! JSON-file profile store: one `<key>.json` per record.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use formpilot_protocols::{
    AUTOFILL_ENABLED_KEY, CV_KEY, CvRecord, PROFILE_KEY, Profile, ProfileStore, StoreError,
};

pub struct FileProfileStore {
    directory: PathBuf,
}

impl FileProfileStore {
    pub fn new(directory: PathBuf) -> Self {
        Self { directory }
    }

    pub fn directory(&self) -> &PathBuf {
        &self.directory
    }

    pub(crate) fn record_path(&self, key: &str) -> PathBuf {
        self.directory.join(format!("{}.json", key))
    }

    async fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let path = self.record_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let json = tokio::fs::read_to_string(&path).await?;
        Ok(Some(serde_json::from_str(&json)?))
    }

    async fn write<T: Serialize + Sync>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.directory).await?;
        let json = serde_json::to_string_pretty(value)?;
        let path = self.record_path(key);
        tokio::fs::write(&path, json).await?;
        debug!("Saved {} to {:?}", key, path);
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for FileProfileStore {
    async fn load_profile(&self) -> Result<Option<Profile>, StoreError> {
        self.read(PROFILE_KEY).await
    }

    async fn save_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        self.write(PROFILE_KEY, profile).await
    }

    async fn load_cv(&self) -> Result<Option<CvRecord>, StoreError> {
        self.read(CV_KEY).await
    }

    async fn save_cv(&self, cv: &CvRecord) -> Result<(), StoreError> {
        self.write(CV_KEY, cv).await
    }

    async fn autofill_enabled(&self) -> Result<bool, StoreError> {
        Ok(self.read::<bool>(AUTOFILL_ENABLED_KEY).await?.unwrap_or(true))
    }

    async fn set_autofill_enabled(&self, enabled: bool) -> Result<(), StoreError> {
        self.write(AUTOFILL_ENABLED_KEY, &enabled).await
    }
}
