//! Identity provider.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use studyverse_core::UserId;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::errors::{AuthError, AuthResult};

/// A signed-in user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Stable user identifier.
    pub uid: UserId,
    /// Email, when the account has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Display name from the identity service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Avatar URL from the identity service.
    #[serde(rename = "photoURL", skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl Identity {
    /// Identity with a fresh uid and nothing else.
    pub fn anonymous() -> Self {
        Self {
            uid: UserId::new(),
            email: None,
            display_name: None,
            photo_url: None,
        }
    }
}

/// Federated sign-in providers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FederatedProvider {
    /// Google account sign-in.
    Google,
}

/// Signs users in and out and publishes the current identity.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an account and sign it in.
    async fn sign_up_with_password(&self, email: &str, password: &str) -> AuthResult<Identity>;

    /// Sign in with email and password.
    async fn sign_in_with_password(&self, email: &str, password: &str) -> AuthResult<Identity>;

    /// Sign in through a federated provider.
    async fn sign_in_with_provider(&self, provider: FederatedProvider) -> AuthResult<Identity>;

    /// Sign the current user out.
    async fn sign_out(&self) -> AuthResult<()>;

    /// Currently signed-in identity.
    fn current(&self) -> Option<Identity>;

    /// Stream of identity changes; the receiver starts at the current value.
    fn subscribe(&self) -> watch::Receiver<Option<Identity>>;
}

struct Account {
    password: String,
    identity: Identity,
}

/// Process-local identity provider.
pub struct InMemoryIdentityProvider {
    accounts: Mutex<HashMap<String, Account>>,
    federated: Mutex<HashMap<FederatedProvider, Identity>>,
    current: watch::Sender<Option<Identity>>,
}

impl InMemoryIdentityProvider {
    /// Provider with no accounts and nobody signed in.
    pub fn new() -> Self {
        let (current, _) = watch::channel(None);
        Self {
            accounts: Mutex::new(HashMap::new()),
            federated: Mutex::new(HashMap::new()),
            current,
        }
    }

    /// Pre-register the identity a federated provider resolves to.
    #[must_use]
    pub fn with_federated_identity(self, provider: FederatedProvider, identity: Identity) -> Self {
        let _ = self.federated.lock().insert(provider, identity);
        self
    }

    fn publish(&self, identity: Option<Identity>) {
        let _ = self.current.send_replace(identity);
    }
}

impl Default for InMemoryIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn sign_up_with_password(&self, email: &str, password: &str) -> AuthResult<Identity> {
        let key = normalize_email(email);
        if key.is_empty() || password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }
        let identity = {
            let mut accounts = self.accounts.lock();
            if accounts.contains_key(&key) {
                return Err(AuthError::EmailInUse);
            }
            let identity = Identity {
                email: Some(key.clone()),
                ..Identity::anonymous()
            };
            let _ = accounts.insert(
                key,
                Account {
                    password: password.to_string(),
                    identity: identity.clone(),
                },
            );
            identity
        };
        info!(uid = %identity.uid, "account created");
        self.publish(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> AuthResult<Identity> {
        let key = normalize_email(email);
        let identity = {
            let accounts = self.accounts.lock();
            match accounts.get(&key) {
                Some(account) if account.password == password => account.identity.clone(),
                _ => {
                    warn!("password sign-in rejected");
                    return Err(AuthError::InvalidCredentials);
                }
            }
        };
        debug!(uid = %identity.uid, "signed in with password");
        self.publish(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_in_with_provider(&self, provider: FederatedProvider) -> AuthResult<Identity> {
        let identity = self
            .federated
            .lock()
            .entry(provider)
            .or_insert_with(Identity::anonymous)
            .clone();
        debug!(uid = %identity.uid, ?provider, "signed in with provider");
        self.publish(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> AuthResult<()> {
        if self.current.borrow().is_none() {
            return Err(AuthError::NotSignedIn);
        }
        self.publish(None);
        Ok(())
    }

    fn current(&self) -> Option<Identity> {
        self.current.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.current.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[tokio::test]
    async fn sign_up_then_sign_in() {
        let auth = InMemoryIdentityProvider::new();
        let created = auth.sign_up_with_password("Student@Example.com", "pw").await.unwrap();
        auth.sign_out().await.unwrap();
        assert!(auth.current().is_none());

        let signed_in = auth.sign_in_with_password("student@example.com", "pw").await.unwrap();
        assert_eq!(signed_in.uid, created.uid);
        assert_eq!(auth.current(), Some(signed_in));
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let auth = InMemoryIdentityProvider::new();
        let _ = auth.sign_up_with_password("a@b.c", "right").await.unwrap();
        assert_matches!(
            auth.sign_in_with_password("a@b.c", "wrong").await,
            Err(AuthError::InvalidCredentials)
        );
        assert_matches!(
            auth.sign_in_with_password("nobody@b.c", "right").await,
            Err(AuthError::InvalidCredentials)
        );
    }

    #[tokio::test]
    async fn duplicate_sign_up_is_rejected() {
        let auth = InMemoryIdentityProvider::new();
        let _ = auth.sign_up_with_password("a@b.c", "pw").await.unwrap();
        assert_matches!(
            auth.sign_up_with_password("a@b.c", "pw2").await,
            Err(AuthError::EmailInUse)
        );
    }

    #[tokio::test]
    async fn federated_sign_in_is_stable() {
        let known = Identity {
            display_name: Some("Asha".into()),
            ..Identity::anonymous()
        };
        let auth = InMemoryIdentityProvider::new()
            .with_federated_identity(FederatedProvider::Google, known.clone());
        let first = auth.sign_in_with_provider(FederatedProvider::Google).await.unwrap();
        let second = auth.sign_in_with_provider(FederatedProvider::Google).await.unwrap();
        assert_eq!(first, known);
        assert_eq!(second.uid, known.uid);
    }

    #[tokio::test]
    async fn subscribers_see_changes() {
        let auth = InMemoryIdentityProvider::new();
        let mut rx = auth.subscribe();
        assert!(rx.borrow().is_none());

        let identity = auth.sign_in_with_provider(FederatedProvider::Google).await.unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().as_ref(), Some(&identity));

        auth.sign_out().await.unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_none());
    }

    #[tokio::test]
    async fn sign_out_requires_session() {
        let auth = InMemoryIdentityProvider::new();
        assert_matches!(auth.sign_out().await, Err(AuthError::NotSignedIn));
    }

    #[test]
    fn identity_json_uses_photo_url_key() {
        let identity = Identity {
            photo_url: Some("https://example.com/a.png".into()),
            ..Identity::anonymous()
        };
        let json = serde_json::to_value(identity).unwrap();
        assert_eq!(json["photoURL"], "https://example.com/a.png");
        assert!(json.get("email").is_none());
    }
}
