//! Core types shared across the crate.

pub mod error;

pub use error::{DepgraphError, ErrorContext, user_friendly_error};
