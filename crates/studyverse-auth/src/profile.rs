//! User profile documents.
//!
//! Profiles are stored as JSON documents keyed by uid. Saving merges the new
//! fields into the stored document instead of replacing it, so fields written
//! by another client survive.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use studyverse_core::UserId;
use tracing::debug;

use crate::errors::{AuthError, AuthResult};
use crate::identity::Identity;

/// Editable profile of a student.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    /// Full name.
    pub display_name: String,
    /// Avatar URL.
    #[serde(rename = "photoURL")]
    pub photo_url: String,
    /// Phone number.
    pub phone_number: String,
    /// Class or grade, e.g. `"10th Grade"`.
    pub class_name: String,
    /// Board or university.
    pub board: String,
    /// School name.
    pub school_name: String,
}

impl UserProfile {
    /// Profile prefilled from the identity service.
    pub fn prefilled(identity: &Identity) -> Self {
        Self {
            display_name: identity.display_name.clone().unwrap_or_default(),
            photo_url: identity.photo_url.clone().unwrap_or_default(),
            ..Self::default()
        }
    }

    /// Overlay non-empty fields of a stored profile.
    #[must_use]
    pub fn overlay(mut self, stored: &UserProfile) -> Self {
        let pairs = [
            (&mut self.display_name, &stored.display_name),
            (&mut self.photo_url, &stored.photo_url),
            (&mut self.phone_number, &stored.phone_number),
            (&mut self.class_name, &stored.class_name),
            (&mut self.board, &stored.board),
            (&mut self.school_name, &stored.school_name),
        ];
        for (field, value) in pairs {
            if !value.trim().is_empty() {
                field.clone_from(value);
            }
        }
        self
    }

    /// Class, if set.
    pub fn class_name(&self) -> Option<&str> {
        Some(self.class_name.trim()).filter(|v| !v.is_empty())
    }

    /// Board, if set.
    pub fn board(&self) -> Option<&str> {
        Some(self.board.trim()).filter(|v| !v.is_empty())
    }
}

/// Profile document storage.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Load the stored profile, if any.
    async fn load(&self, uid: &UserId) -> AuthResult<Option<UserProfile>>;

    /// Merge the profile into the stored document.
    async fn save(&self, uid: &UserId, profile: &UserProfile) -> AuthResult<()>;
}

/// Process-local profile store.
#[derive(Default)]
pub struct InMemoryProfileStore {
    documents: Mutex<HashMap<UserId, Value>>,
}

impl InMemoryProfileStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored document.
    pub fn document(&self, uid: &UserId) -> Option<Value> {
        self.documents.lock().get(uid).cloned()
    }

    /// Insert a raw document, replacing any existing one.
    pub fn insert_document(&self, uid: UserId, document: Value) {
        let _ = self.documents.lock().insert(uid, document);
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn load(&self, uid: &UserId) -> AuthResult<Option<UserProfile>> {
        let document = self.document(uid);
        document
            .map(|doc| serde_json::from_value(doc).map_err(Into::into))
            .transpose()
    }

    async fn save(&self, uid: &UserId, profile: &UserProfile) -> AuthResult<()> {
        let Value::Object(update) = serde_json::to_value(profile)? else {
            return Err(AuthError::Store {
                message: "profile did not serialize to an object".into(),
            });
        };
        let mut documents = self.documents.lock();
        let entry = documents
            .entry(uid.clone())
            .or_insert_with(|| Value::Object(serde_json::Map::new()));
        if let Value::Object(existing) = entry {
            existing.extend(update);
        } else {
            *entry = Value::Object(update);
        }
        debug!(uid = %uid, "profile saved");
        Ok(())
    }
}
