//! Unit identifiers
//!
//! Units are opaque, case-sensitive symbols matched verbatim. The engine never
//! decomposes them: `"kJ/kg-K"` is one identifier, not an expression.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Symbols conventionally meaning "no unit". They stay ordinary named units
/// and are linked to [`Unit::Unitless`] through ignore edges.
pub const RESERVED_UNITLESS: [&str; 3] = ["", "-", "nd"];

/// A unit of measurement
///
/// Serializes as a string, with `Unitless` as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum Unit {
    /// A unit symbol such as `"kPa"` or `"K (rel)"`
    Named(String),
    /// The explicit "no unit" marker
    Unitless,
}

impl Unit {
    pub fn named(symbol: impl Into<String>) -> Self {
        Unit::Named(symbol.into())
    }

    pub fn symbol(&self) -> Option<&str> {
        match self {
            Unit::Named(s) => Some(s),
            Unit::Unitless => None,
        }
    }

    pub fn is_unitless(&self) -> bool {
        matches!(self, Unit::Unitless)
    }

    /// True for `Unitless` and for the reserved "no unit" symbols
    pub fn is_reserved(&self) -> bool {
        match self {
            Unit::Unitless => true,
            Unit::Named(s) => RESERVED_UNITLESS.contains(&s.as_str()),
        }
    }
}

impl From<&str> for Unit {
    fn from(s: &str) -> Self {
        Unit::Named(s.to_string())
    }
}

impl From<String> for Unit {
    fn from(s: String) -> Self {
        Unit::Named(s)
    }
}

impl From<&Unit> for Unit {
    fn from(u: &Unit) -> Self {
        u.clone()
    }
}

impl From<Option<&str>> for Unit {
    fn from(s: Option<&str>) -> Self {
        s.map_or(Unit::Unitless, Unit::from)
    }
}

impl From<Option<String>> for Unit {
    fn from(s: Option<String>) -> Self {
        s.map_or(Unit::Unitless, Unit::Named)
    }
}

impl From<Unit> for Option<String> {
    fn from(u: Unit) -> Self {
        match u {
            Unit::Named(s) => Some(s),
            Unit::Unitless => None,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Named(s) => write!(f, "{}", s),
            Unit::Unitless => write!(f, "<unitless>"),
        }
    }
}
