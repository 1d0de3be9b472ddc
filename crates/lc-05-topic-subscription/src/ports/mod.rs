//! # Ports Layer
//!
//! - **Inbound (Driving)**: topic subscription API
//! - **Outbound (Driven)**: mirror node streaming transport

pub mod inbound;
pub mod outbound;
