// # Routes Module
//
// HTTP route handlers, one submodule per API area. Each module exposes a
// `create_*_routes` function that `server.rs` merges into the main router.

/// Health check endpoint
pub mod health;

/// Login, registration and the sample protected call
pub mod auth;

/// Bike CRUD
pub mod bikes;

/// Rental CRUD bound to the authenticated user
pub mod rentals;

/// Extractors that report rejections as `ApiError`
pub mod extract;
