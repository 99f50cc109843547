//! Authorization Guard
//!
//! Binds mutating operations to the authenticated user. The owner of a record
//! always comes from the verified identity, never from the request body.

use std::sync::Arc;

use crate::auth::models::RequestIdentity;
use crate::database::{CredentialStore, Rental, User};
use crate::error::AuthError;

pub struct AuthorizationGuard {
    store: Arc<dyn CredentialStore>,
}

impl AuthorizationGuard {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Map the request identity to its stored user
    pub async fn current_user(&self, identity: &RequestIdentity) -> Result<User, AuthError> {
        match self.store.find_by_email(&identity.email).await {
            Ok(Some(user)) => Ok(user),
            Ok(None) => {
                tracing::warn!("Token subject {} has no user record", identity.email);
                Err(AuthError::Authorization("unknown user".to_string()))
            }
            Err(e) => {
                tracing::error!("User lookup failed for {}: {}", identity.email, e);
                Err(AuthError::Authorization("could not resolve user".to_string()))
            }
        }
    }

    /// Resolve the current user and require that they own `rental`
    pub async fn require_owner(&self, identity: &RequestIdentity, rental: &Rental) -> Result<User, AuthError> {
        let user = self.current_user(identity).await?;
        if rental.user_id != user.id {
            tracing::warn!("User {} denied access to rental {}", user.id, rental.id);
            return Err(AuthError::Authorization(format!("rental {} belongs to another user", rental.id)));
        }
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{BikeStore, InMemoryStore, NewUser, RentalStore, StoreResult};
    use crate::error::StoreError;
    use async_trait::async_trait;

    /// Store whose backend is always down
    struct UnavailableStore;

    #[async_trait]
    impl CredentialStore for UnavailableStore {
        async fn find_by_email(&self, _email: &str) -> StoreResult<Option<User>> {
            Err(StoreError::Backend(anyhow::anyhow!("connection refused")))
        }

        async fn create_user(&self, _user: NewUser) -> StoreResult<User> {
            Err(StoreError::Backend(anyhow::anyhow!("connection refused")))
        }
    }

    fn identity(email: &str) -> RequestIdentity {
        RequestIdentity {
            email: email.to_string(),
            expires_at: 0,
        }
    }

    async fn seeded() -> (Arc<InMemoryStore>, User, User) {
        let store = Arc::new(InMemoryStore::new());
        let mut users = Vec::new();
        for email in ["owner@example.com", "other@example.com"] {
            users.push(
                store
                    .create_user(NewUser {
                        email: email.to_string(),
                        password_hash: "hash".to_string(),
                        name: "Jane".to_string(),
                        surname: "Roe".to_string(),
                        age: 25,
                    })
                    .await
                    .unwrap(),
            );
        }
        let other = users.pop().unwrap();
        let owner = users.pop().unwrap();
        (store, owner, other)
    }

    #[tokio::test]
    async fn test_current_user_resolves_id() {
        let (store, owner, _) = seeded().await;
        let guard = AuthorizationGuard::new(store);
        let user = guard.current_user(&identity("owner@example.com")).await.unwrap();
        assert_eq!(user.id, owner.id);
    }

    #[tokio::test]
    async fn test_unknown_subject_is_authorization_error() {
        let (store, _, _) = seeded().await;
        let guard = AuthorizationGuard::new(store);
        let result = guard.current_user(&identity("ghost@example.com")).await;
        assert!(matches!(result, Err(AuthError::Authorization(_))));
    }

    #[tokio::test]
    async fn test_only_owner_passes() {
        let (store, owner, _) = seeded().await;
        let bike = store.create_bike("Bike X", "available").await.unwrap();
        let rental = store.create_rental(owner.id, bike.id).await.unwrap();
        let guard = AuthorizationGuard::new(store);

        assert!(guard.require_owner(&identity("owner@example.com"), &rental).await.is_ok());
        let denied = guard.require_owner(&identity("other@example.com"), &rental).await;
        assert!(matches!(denied, Err(AuthError::Authorization(_))));
    }

    #[tokio::test]
    async fn test_store_failure_is_authorization_error() {
        let guard = AuthorizationGuard::new(Arc::new(UnavailableStore));
        let result = guard.current_user(&identity("owner@example.com")).await;
        assert!(matches!(result, Err(AuthError::Authorization(_))));
    }
}
