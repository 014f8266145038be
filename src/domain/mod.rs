//! Core domain types and the portfolio return engine.

pub mod ticker;
pub mod price;
pub mod basket;
pub mod normalize;
pub mod rollover;
pub mod benchmark;
pub mod metrics;
pub mod comparison;
pub mod config_validation;
pub mod error;
