//! # Domain Layer

pub mod config;
pub mod endpoint;
pub mod errors;
pub mod health;
pub mod pool;
