//! Routed pages.

pub mod entity;
pub mod home;
pub mod not_found;
