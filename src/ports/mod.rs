//! Port traits: the seams between the pure domain and its collaborators.

pub mod config_port;
pub mod data_port;
pub mod sentiment_port;
