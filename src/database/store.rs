//! Store traits
//!
//! The handlers and the auth core only see these traits. `DatabaseConnection`
//! implements them against Postgres and `InMemoryStore` keeps everything in
//! process memory.

use async_trait::async_trait;

use crate::database::models::{Bike, NewUser, Rental, RentalUpdate, User};
use crate::error::StoreError;

pub type StoreResult<T> = Result<T, StoreError>;

/// Persists user records. `email` is unique.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// `Ok(None)` when no user has this email
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Fails with `StoreError::Duplicate` if the email is taken
    async fn create_user(&self, user: NewUser) -> StoreResult<User>;
}

#[async_trait]
pub trait BikeStore: Send + Sync {
    async fn create_bike(&self, model: &str, status: &str) -> StoreResult<Bike>;
    async fn get_bike(&self, id: i32) -> StoreResult<Bike>;
    async fn update_bike(&self, id: i32, model: &str, status: &str) -> StoreResult<Bike>;
    async fn delete_bike(&self, id: i32) -> StoreResult<Bike>;
    async fn list_bikes(&self) -> StoreResult<Vec<Bike>>;
}

#[async_trait]
pub trait RentalStore: Send + Sync {
    /// Fails with `StoreError::NotFound` if the bike or user does not exist
    async fn create_rental(&self, user_id: i32, bike_id: i32) -> StoreResult<Rental>;
    async fn get_rental(&self, id: i32) -> StoreResult<Rental>;
    async fn update_rental(&self, id: i32, update: RentalUpdate) -> StoreResult<Rental>;
    async fn delete_rental(&self, id: i32) -> StoreResult<Rental>;
    async fn list_rentals(&self) -> StoreResult<Vec<Rental>>;
}

/// Everything the server needs from its backing store
pub trait Store: CredentialStore + BikeStore + RentalStore {}

impl<T: CredentialStore + BikeStore + RentalStore> Store for T {}
