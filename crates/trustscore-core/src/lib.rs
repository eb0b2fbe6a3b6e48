//! # Trust Score Core
//!
//! Domain types for the wallet trust score dashboard.
//!
//! This crate holds everything that does not talk to the network: account
//! identifier validation, the on-chain trust record, score banding and the
//! view models rendered by the dashboard API.

pub mod chain;
pub mod error;
pub mod models;
pub mod score;
pub mod views;

pub use chain::*;
pub use error::*;
pub use models::*;
pub use score::*;
pub use views::*;
