//! Conversion errors
//!
//! An unknown or unreachable unit pair is not an error: the facade reports it
//! as `Ok(None)`. The variants here cover bad tables (raised when the table
//! is built) and failures inside custom transforms (propagated unchanged).

use crate::Unit;
use thiserror::Error;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const MALFORMED_EDGE: &str = "MALFORMED_EDGE";
    pub const DIV_ZERO: &str = "DIV_ZERO";
    pub const SHAPE_MISMATCH: &str = "SHAPE_MISMATCH";
    pub const DOMAIN_ERROR: &str = "DOMAIN_ERROR";
}

pub type ConversionResult<T> = Result<T, ConversionError>;

/// Error type for table construction and transform evaluation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("Malformed edge {from} -> {to}: {reason}")]
    MalformedEdge { from: Unit, to: Unit, reason: String },

    #[error("Division by zero: edge {from} -> {to} has factor 0 and cannot be reversed")]
    DivisionByZero { from: Unit, to: Unit },

    #[error("Shape mismatch in {transform}: {details}")]
    ShapeMismatch { transform: String, details: String },

    #[error("Domain error: {0}")]
    Domain(String),
}

impl ConversionError {
    pub fn malformed(from: &Unit, to: &Unit, reason: impl Into<String>) -> Self {
        Self::MalformedEdge { from: from.clone(), to: to.clone(), reason: reason.into() }
    }

    pub fn div_zero(from: &Unit, to: &Unit) -> Self {
        Self::DivisionByZero { from: from.clone(), to: to.clone() }
    }

    /// A custom transform received `got` extra values but needs `expected`
    pub fn extra_arity(transform: &str, expected: usize, got: usize) -> Self {
        Self::ShapeMismatch {
            transform: transform.to_string(),
            details: format!("expects {} extra value(s), got {}", expected, got),
        }
    }

    pub fn domain(details: impl Into<String>) -> Self {
        Self::Domain(details.into())
    }

    /// Machine-readable code, one of [`codes`]
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedEdge { .. } => codes::MALFORMED_EDGE,
            Self::DivisionByZero { .. } => codes::DIV_ZERO,
            Self::ShapeMismatch { .. } => codes::SHAPE_MISMATCH,
            Self::Domain(_) => codes::DOMAIN_ERROR,
        }
    }

    /// Hint for fixing the error
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::MalformedEdge { .. } => {
                "Give the edge a finite factor, a func/func_inv pair, or set ignore"
            }
            Self::DivisionByZero { .. } => {
                "Use a non-zero factor or declare the reverse edge explicitly"
            }
            Self::ShapeMismatch { .. } => {
                "Pass the extra values the custom conversion documents"
            }
            Self::Domain(_) => "Check the input value and extra parameters",
        }
    }

    /// True for errors raised while building a table
    pub fn is_table_error(&self) -> bool {
        matches!(self, Self::MalformedEdge { .. } | Self::DivisionByZero { .. })
    }
}
