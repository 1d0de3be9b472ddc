//! # Ports Layer
//!
//! - **Inbound (Driving)**: API that callers use to obtain ids
//! - **Outbound (Driven)**: the time source the generator reads

pub mod inbound;
pub mod outbound;
