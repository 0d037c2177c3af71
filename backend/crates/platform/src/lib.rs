//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Password hashing (Argon2id, NIST SP 800-63B compliant)
//! - Cookie management
//! - Client identification (IP / User-Agent extraction)
//! - Lockout policy configuration

pub mod client;
pub mod cookie;
pub mod lockout;
pub mod password;
