//! Auth Gateway
//!
//! Login (credential check, then token issuance) and registration (validation,
//! then store write).

use std::sync::Arc;

use crate::auth::jwt::{IssuedToken, JwtService};
use crate::auth::password::{hash_password, verify_password};
use crate::database::{CredentialStore, NewUser};
use crate::error::{AuthError, StoreError};

/// Fields accepted at registration
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub name: String,
    pub surname: String,
    pub age: i32,
}

pub struct AuthGateway {
    store: Arc<dyn CredentialStore>,
    jwt_service: Arc<JwtService>,
    /// Verified against when the email is unknown, so both failure paths do the same work.
    dummy_hash: String,
}

/// Emails are compared case-insensitively and without surrounding whitespace.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl AuthGateway {
    pub fn new(store: Arc<dyn CredentialStore>, jwt_service: Arc<JwtService>) -> anyhow::Result<Self> {
        Ok(Self {
            store,
            jwt_service,
            dummy_hash: hash_password("dummy-password-for-timing")?,
        })
    }

    /// Check credentials and issue a session token.
    ///
    /// Unknown email, wrong password and lookup failures all return
    /// `AuthError::Authentication`.
    pub async fn login(&self, email: &str, password: &str) -> Result<IssuedToken, AuthError> {
        let email = normalize_email(email);
        tracing::info!("Login attempt for email: {}", email);

        let user = match self.store.find_by_email(&email).await {
            Ok(user) => user,
            Err(e) => {
                tracing::error!("User lookup failed during login: {}", e);
                None
            }
        };

        let (password_hash, known) = match &user {
            Some(user) => (user.password_hash.as_str(), true),
            None => (self.dummy_hash.as_str(), false),
        };

        let matches = verify_password(password, password_hash).unwrap_or_else(|e| {
            tracing::error!("Stored password hash unusable: {}", e);
            false
        });

        if !known || !matches {
            tracing::info!("Login rejected for email: {}", email);
            return Err(AuthError::Authentication);
        }

        let issued = self.jwt_service.issue(&email).map_err(|e| {
            tracing::error!("Error generating token: {}", e);
            e
        })?;

        tracing::info!("Login succeeded for email: {}", email);
        Ok(issued)
    }

    /// Create a new user, returning its id
    pub async fn register(&self, registration: Registration) -> Result<i32, AuthError> {
        let email = normalize_email(&registration.email);

        if email.is_empty() || !email.contains('@') {
            return Err(AuthError::Registration("a valid email is required".to_string()));
        }
        if registration.password.is_empty() {
            return Err(AuthError::Registration("password must not be empty".to_string()));
        }
        if registration.age < 0 {
            return Err(AuthError::Registration("age must not be negative".to_string()));
        }

        let password_hash = hash_password(&registration.password).map_err(|e| {
            tracing::error!("Failed to hash password: {}", e);
            AuthError::Registration("failed to register user".to_string())
        })?;

        let user = self
            .store
            .create_user(NewUser {
                email: email.clone(),
                password_hash,
                name: registration.name,
                surname: registration.surname,
                age: registration.age,
            })
            .await
            .map_err(|e| match e {
                StoreError::Duplicate => {
                    tracing::info!("Registration rejected, email already exists: {}", email);
                    AuthError::Registration("email already registered".to_string())
                }
                other => {
                    tracing::error!("failed to create user: {}", other);
                    AuthError::Registration("failed to register user".to_string())
                }
            })?;

        tracing::info!("Registered user {} ({})", user.id, email);
        Ok(user.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{InMemoryStore, StoreResult, User};
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

    fn gateway() -> AuthGateway {
        let jwt = Arc::new(JwtService::new(
            Some("test_secret"),
            "bike-rental-server",
            std::time::Duration::from_secs(3600),
        ));
        AuthGateway::new(Arc::new(InMemoryStore::new()), jwt).unwrap()
    }

    fn registration(email: &str, password: &str) -> Registration {
        Registration {
            email: email.to_string(),
            password: password.to_string(),
            name: "John".to_string(),
            surname: "Doe".to_string(),
            age: 30,
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let gateway = gateway();
        gateway.register(registration("user@example.com", "pw1")).await.unwrap();

        let issued = gateway.login("user@example.com", "pw1").await.unwrap();
        assert_eq!(gateway.jwt_service.verify(&issued.token).unwrap(), "user@example.com");
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email_are_indistinguishable() {
        let gateway = gateway();
        gateway.register(registration("user@example.com", "pw1")).await.unwrap();

        let wrong_password = gateway.login("user@example.com", "pw2").await.unwrap_err();
        let unknown_email = gateway.login("nouser@example.com", "pw1").await.unwrap_err();

        assert!(matches!(wrong_password, AuthError::Authentication));
        assert!(matches!(unknown_email, AuthError::Authentication));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn test_duplicate_registration_fails() {
        let gateway = gateway();
        gateway.register(registration("user@example.com", "pw1")).await.unwrap();

        let second = gateway.register(registration("User@Example.com ", "other")).await;
        assert!(matches!(second, Err(AuthError::Registration(_))));
    }

    #[tokio::test]
    async fn test_email_is_normalized() {
        let gateway = gateway();
        gateway.register(registration("  Rider@Example.COM", "pw1")).await.unwrap();

        let issued = gateway.login("rider@example.com", "pw1").await.unwrap();
        assert_eq!(gateway.jwt_service.verify(&issued.token).unwrap(), "rider@example.com");
    }

    #[tokio::test]
    async fn test_invalid_registration_rejected() {
        let gateway = gateway();
        assert!(matches!(gateway.register(registration("", "pw1")).await, Err(AuthError::Registration(_))));
        assert!(matches!(gateway.register(registration("a@b.c", "")).await, Err(AuthError::Registration(_))));

        let mut negative_age = registration("a@b.c", "pw1");
        negative_age.age = -1;
        assert!(matches!(gateway.register(negative_age).await, Err(AuthError::Registration(_))));
    }

    #[tokio::test]
    async fn test_login_without_signing_key_fails_with_signing_error() {
        let store = Arc::new(InMemoryStore::new());
        let unsigned = AuthGateway::new(
            store.clone(),
            Arc::new(JwtService::new(None, "bike-rental-server", std::time::Duration::from_secs(60))),
        )
        .unwrap();
        unsigned.register(registration("user@example.com", "pw1")).await.unwrap();

        let result = unsigned.login("user@example.com", "pw1").await;
        assert!(matches!(result, Err(AuthError::Signing(_))));
    }

    #[tokio::test]
    async fn test_store_failures_map_to_domain_errors() {
        let jwt = Arc::new(JwtService::new(
            Some("test_secret"),
            "bike-rental-server",
            std::time::Duration::from_secs(3600),
        ));
        let gateway = AuthGateway::new(Arc::new(UnavailableStore), jwt).unwrap();

        let login = gateway.login("user@example.com", "pw1").await;
        assert!(matches!(login, Err(AuthError::Authentication)));

        let register = gateway.register(registration("user@example.com", "pw1")).await;
        match register {
            Err(AuthError::Registration(msg)) => assert_eq!(msg, "failed to register user"),
            other => panic!("expected registration error, got {:?}", other),
        }
    }
}
