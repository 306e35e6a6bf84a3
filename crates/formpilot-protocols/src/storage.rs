//! Storage collaborator protocol.
//!
//! Records live under fixed keys; the engine only ever reads and writes whole
//! records.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::types::{CvRecord, Profile};

pub const PROFILE_KEY: &str = "userProfile";
pub const CV_KEY: &str = "cvData";
pub const AUTOFILL_ENABLED_KEY: &str = "autofillEnabled";

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn load_profile(&self) -> Result<Option<Profile>, StoreError>;

    async fn save_profile(&self, profile: &Profile) -> Result<(), StoreError>;

    async fn load_cv(&self) -> Result<Option<CvRecord>, StoreError>;

    async fn save_cv(&self, cv: &CvRecord) -> Result<(), StoreError>;

    /// Whether autofill is switched on. A missing flag means enabled.
    async fn autofill_enabled(&self) -> Result<bool, StoreError>;

    async fn set_autofill_enabled(&self, enabled: bool) -> Result<(), StoreError>;
}
