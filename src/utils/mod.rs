//! The `utils` module holds the pieces every other module leans on: the
//! crate-wide error type and logging initialisation.

pub mod error;
pub mod logging;

pub use error::{GatewayError, Result};

#[cfg(test)]
mod tests;
