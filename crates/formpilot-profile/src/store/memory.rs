//! In-memory profile store.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;

use formpilot_protocols::{
    AUTOFILL_ENABLED_KEY, CV_KEY, CvRecord, PROFILE_KEY, Profile, ProfileStore, StoreError,
};

/// Key-value store held in memory. Records are kept as JSON values so the
/// behavior matches the file store.
pub struct MemoryProfileStore {
    records: RwLock<HashMap<String, serde_json::Value>>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Store pre-populated with a profile and optional CV.
    pub fn with_records(profile: Profile, cv: Option<CvRecord>) -> Result<Self, StoreError> {
        let mut records = HashMap::new();
        records.insert(PROFILE_KEY.to_string(), serde_json::to_value(&profile)?);
        if let Some(cv) = cv {
            records.insert(CV_KEY.to_string(), serde_json::to_value(&cv)?);
        }
        Ok(Self {
            records: RwLock::new(records),
        })
    }

    async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let records = self.records.read().await;
        match records.get(key) {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }

    async fn put<T: Serialize + Sync>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let value = serde_json::to_value(value)?;
        self.records.write().await.insert(key.to_string(), value);
        Ok(())
    }
}

impl Default for MemoryProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn load_profile(&self) -> Result<Option<Profile>, StoreError> {
        self.get(PROFILE_KEY).await
    }

    async fn save_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        self.put(PROFILE_KEY, profile).await
    }

    async fn load_cv(&self) -> Result<Option<CvRecord>, StoreError> {
        self.get(CV_KEY).await
    }

    async fn save_cv(&self, cv: &CvRecord) -> Result<(), StoreError> {
        self.put(CV_KEY, cv).await
    }

    async fn autofill_enabled(&self) -> Result<bool, StoreError> {
        Ok(self.get::<bool>(AUTOFILL_ENABLED_KEY).await?.unwrap_or(true))
    }

    async fn set_autofill_enabled(&self, enabled: bool) -> Result<(), StoreError> {
        self.put(AUTOFILL_ENABLED_KEY, &enabled).await
    }
}
