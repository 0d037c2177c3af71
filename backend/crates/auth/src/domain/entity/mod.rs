//! Domain Entities

pub mod admin;
pub mod failed_attempt;
pub mod refresh_session;
