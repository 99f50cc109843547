//! # Authentication Module
//!
//! Session tokens, password hashing, login/registration, identity resolution
//! from request metadata, and the ownership guard used by mutating routes.

pub mod gateway;
pub mod guard;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;

pub use gateway::{AuthGateway, Registration};
pub use guard::AuthorizationGuard;
pub use jwt::JwtService;
pub use middleware::AuthMiddleware;
pub use models::RequestIdentity;
