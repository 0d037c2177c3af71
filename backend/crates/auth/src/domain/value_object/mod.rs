//! Value Objects

pub mod admin_id;
pub mod email;
pub mod username;
