//! Cross-crate scenarios, driven through scripted node and mirror
//! transports.

mod execution_flows;
mod topic_flows;
