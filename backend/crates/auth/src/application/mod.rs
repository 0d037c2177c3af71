//! Application Layer
//!
//! Use cases orchestrating the domain entities and repositories.

pub mod config;
pub mod login;
pub mod logout;
pub mod profile;
pub mod refresh;
pub mod tokens;
