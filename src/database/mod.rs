//! # Database Module
//!
//! Store traits for users, bikes and rentals, with a Postgres implementation
//! (tokio-postgres + deadpool, refinery migrations) and an in-memory one.

pub mod connection;
pub mod memory;
pub mod migrations;
pub mod models;
pub mod store;

pub use connection::DatabaseConnection;
pub use memory::InMemoryStore;
pub use models::*;
pub use store::{BikeStore, CredentialStore, RentalStore, Store, StoreResult};
