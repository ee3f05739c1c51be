//! stockdash: single-ticker stock analysis dashboard.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`]. The CLI in [`cli`] wires them up.

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod logging;
pub mod ports;
