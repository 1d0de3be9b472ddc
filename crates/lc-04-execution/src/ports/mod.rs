//! # Ports Layer
//!
//! - **Inbound (Driving)**: the request abstraction the engine drives
//! - **Outbound (Driven)**: the transport used to reach network nodes

pub mod inbound;
pub mod outbound;
