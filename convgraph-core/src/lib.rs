//! convgraph Core - Fundamental types
//!
//! This crate provides the core types used throughout convgraph:
//! - `Value`: a scalar or an ordered vector of numbers
//! - `Unit`: an opaque unit identifier, or the explicit unitless marker
//! - `ConversionError`: errors raised while building a table or running a
//!   custom transform

mod value;
mod unit;
mod error;

pub use value::Value;
pub use unit::{Unit, RESERVED_UNITLESS};
pub use error::{ConversionError, ConversionResult, codes};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Value, Unit, ConversionError, ConversionResult};
    pub use crate::error::codes;
}
