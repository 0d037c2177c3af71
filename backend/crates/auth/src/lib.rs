//! Admin Authentication
//!
//! Session lifecycle for the admin backend: credential login with a
//! brute-force lockout, short-lived access tokens with rotating refresh
//! sessions, and self-service profile management.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


pub use application::config::AuthConfig;
pub use application::tokens::{TokenIssuer, TokenKind, TokenPair};
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgAuthRepository;
pub use presentation::router::{auth_router, auth_router_generic};
