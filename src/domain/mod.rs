//! Core domain types and logic.

pub mod error;
pub mod export;
pub mod fixed_point;
pub mod import;
pub mod record;
pub mod resolver;
pub mod settings;
