//! In-memory store
//!
//! Used when no `DATABASE_URL` is configured, and by the tests. A single
//! `RwLock` guards all tables, so every write is serialized.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::BTreeMap;

use crate::database::models::{Bike, NewUser, Rental, RentalUpdate, User, RENTAL_STATUS_ONGOING};
use crate::database::store::{BikeStore, CredentialStore, RentalStore, StoreResult};
use crate::error::StoreError;

#[derive(Default)]
struct Tables {
    users: BTreeMap<i32, User>,
    bikes: BTreeMap<i32, Bike>,
    rentals: BTreeMap<i32, Rental>,
    next_user_id: i32,
    next_bike_id: i32,
    next_rental_id: i32,
}

fn next_id(counter: &mut i32) -> i32 {
    *counter += 1;
    *counter
}

#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for InMemoryStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read();
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let mut tables = self.tables.write();
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate);
        }
        let id = next_id(&mut tables.next_user_id);
        let record = User {
            id,
            email: user.email,
            password_hash: user.password_hash,
            name: user.name,
            surname: user.surname,
            age: user.age,
        };
        tables.users.insert(id, record.clone());
        Ok(record)
    }
}

#[async_trait]
impl BikeStore for InMemoryStore {
    async fn create_bike(&self, model: &str, status: &str) -> StoreResult<Bike> {
        let mut tables = self.tables.write();
        let id = next_id(&mut tables.next_bike_id);
        let bike = Bike {
            id,
            model: model.to_string(),
            status: status.to_string(),
        };
        tables.bikes.insert(id, bike.clone());
        Ok(bike)
    }

    async fn get_bike(&self, id: i32) -> StoreResult<Bike> {
        self.tables.read().bikes.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn update_bike(&self, id: i32, model: &str, status: &str) -> StoreResult<Bike> {
        let mut tables = self.tables.write();
        let bike = tables.bikes.get_mut(&id).ok_or(StoreError::NotFound)?;
        bike.model = model.to_string();
        bike.status = status.to_string();
        Ok(bike.clone())
    }

    async fn delete_bike(&self, id: i32) -> StoreResult<Bike> {
        let mut tables = self.tables.write();
        let bike = tables.bikes.remove(&id).ok_or(StoreError::NotFound)?;
        tables.rentals.retain(|_, r| r.bike_id != id);
        Ok(bike)
    }

    async fn list_bikes(&self) -> StoreResult<Vec<Bike>> {
        Ok(self.tables.read().bikes.values().cloned().collect())
    }
}

#[async_trait]
impl RentalStore for InMemoryStore {
    async fn create_rental(&self, user_id: i32, bike_id: i32) -> StoreResult<Rental> {
        let mut tables = self.tables.write();
        if !tables.users.contains_key(&user_id) || !tables.bikes.contains_key(&bike_id) {
            return Err(StoreError::NotFound);
        }
        let id = next_id(&mut tables.next_rental_id);
        let rental = Rental {
            id,
            user_id,
            bike_id,
            status: RENTAL_STATUS_ONGOING.to_string(),
            start_time: Utc::now(),
            end_time: None,
        };
        tables.rentals.insert(id, rental.clone());
        Ok(rental)
    }

    async fn get_rental(&self, id: i32) -> StoreResult<Rental> {
        self.tables.read().rentals.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn update_rental(&self, id: i32, update: RentalUpdate) -> StoreResult<Rental> {
        let mut tables = self.tables.write();
        let rental = tables.rentals.get_mut(&id).ok_or(StoreError::NotFound)?;
        rental.status = update.status;
        rental.end_time = update.end_time;
        Ok(rental.clone())
    }

    async fn delete_rental(&self, id: i32) -> StoreResult<Rental> {
        self.tables.write().rentals.remove(&id).ok_or(StoreError::NotFound)
    }

    async fn list_rentals(&self) -> StoreResult<Vec<Rental>> {
        Ok(self.tables.read().rentals.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password_hash: "hash".to_string(),
            name: "John".to_string(),
            surname: "Doe".to_string(),
            age: 30,
        }
    }

    #[tokio::test]
    async fn test_email_is_unique() {
        let store = InMemoryStore::new();
        let first = store.create_user(new_user("user@example.com")).await.unwrap();
        assert_eq!(first.id, 1);

        let second = store.create_user(new_user("user@example.com")).await;
        assert!(matches!(second, Err(StoreError::Duplicate)));

        let found = store.find_by_email("user@example.com").await.unwrap().unwrap();
        assert_eq!(found.id, first.id);
        assert!(store.find_by_email("nouser@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_bike_crud() {
        let store = InMemoryStore::new();
        let bike = store.create_bike("Test Bike", "available").await.unwrap();

        let fetched = store.get_bike(bike.id).await.unwrap();
        assert_eq!(fetched, bike);

        let updated = store.update_bike(bike.id, "New Model", "in_service").await.unwrap();
        assert_eq!(updated.model, "New Model");
        assert_eq!(updated.status, "in_service");

        store.delete_bike(bike.id).await.unwrap();
        assert!(matches!(store.get_bike(bike.id).await, Err(StoreError::NotFound)));
        assert!(store.list_bikes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rental_requires_existing_bike() {
        let store = InMemoryStore::new();
        let user = store.create_user(new_user("rider@example.com")).await.unwrap();

        assert!(matches!(store.create_rental(user.id, 42).await, Err(StoreError::NotFound)));

        let bike = store.create_bike("Bike X", "available").await.unwrap();
        let rental = store.create_rental(user.id, bike.id).await.unwrap();
        assert_eq!(rental.status, RENTAL_STATUS_ONGOING);
        assert!(rental.end_time.is_none());
    }
}
