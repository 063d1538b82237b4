//! Numeric values flowing through a conversion
//!
//! A value is either a single number or an ordered sequence of numbers.
//! Every transform keeps the shape category: a scalar stays a scalar and a
//! vector stays a vector, even when it holds a single element.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Scalar or vector payload of a conversion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Scalar(f64),
    Vector(Vec<f64>),
}

impl Value {
    // ========== Safe Accessors (never panic) ==========

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Value::Scalar(x) => Some(*x),
            Value::Vector(_) => None,
        }
    }

    pub fn as_vector(&self) -> Option<&[f64]> {
        match self {
            Value::Vector(v) => Some(v),
            Value::Scalar(_) => None,
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Value::Scalar(_))
    }

    pub fn is_vector(&self) -> bool {
        matches!(self, Value::Vector(_))
    }

    /// Number of elements (1 for a scalar)
    pub fn len(&self) -> usize {
        match self {
            Value::Scalar(_) => 1,
            Value::Vector(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Vector(v) if v.is_empty())
    }

    /// Type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Scalar(_) => "Scalar",
            Value::Vector(_) => "Vector",
        }
    }

    /// Iterate over the elements, treating a scalar as a single element
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        let slice: &[f64] = match self {
            Value::Scalar(x) => std::slice::from_ref(x),
            Value::Vector(v) => v,
        };
        slice.iter().copied()
    }

    // ========== Element-wise Operations ==========

    /// Apply `f` to every element, keeping the shape
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Value {
        match self {
            Value::Scalar(x) => Value::Scalar(f(*x)),
            Value::Vector(v) => Value::Vector(v.iter().map(|&x| f(x)).collect()),
        }
    }

    /// Fallible element-wise map; the first error aborts
    pub fn try_map<E>(&self, f: impl Fn(f64) -> Result<f64, E>) -> Result<Value, E> {
        match self {
            Value::Scalar(x) => f(*x).map(Value::Scalar),
            Value::Vector(v) => v.iter()
                .map(|&x| f(x))
                .collect::<Result<Vec<_>, E>>()
                .map(Value::Vector),
        }
    }

    /// `value * factor + add`, element-wise
    pub fn scale(&self, factor: f64, add: f64) -> Value {
        self.map(|x| x * factor + add)
    }

    /// Compare with a relative tolerance; shapes must match
    pub fn approx_eq(&self, other: &Value, rel_tol: f64) -> bool {
        fn close(a: f64, b: f64, rel_tol: f64) -> bool {
            if a == b {
                return true;
            }
            let scale = a.abs().max(b.abs()).max(1.0);
            (a - b).abs() <= rel_tol * scale
        }

        match (self, other) {
            (Value::Scalar(a), Value::Scalar(b)) => close(*a, *b, rel_tol),
            (Value::Vector(a), Value::Vector(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| close(*x, *y, rel_tol))
            }
            _ => false,
        }
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Scalar(x)
    }
}

impl From<i32> for Value {
    fn from(x: i32) -> Self {
        Value::Scalar(f64::from(x))
    }
}

impl From<Vec<f64>> for Value {
    fn from(v: Vec<f64>) -> Self {
        Value::Vector(v)
    }
}

impl From<&[f64]> for Value {
    fn from(v: &[f64]) -> Self {
        Value::Vector(v.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for Value {
    fn from(v: [f64; N]) -> Self {
        Value::Vector(v.to_vec())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(x) => write!(f, "{}", x),
            Value::Vector(v) => {
                let parts: Vec<String> = v.iter().map(|x| x.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_keeps_scalar_shape() {
        let v = Value::from(2.0).map(|x| x * 3.0);
        assert_eq!(v, Value::Scalar(6.0));
    }

    #[test]
    fn test_map_keeps_single_element_vector() {
        let v = Value::from(vec![2.0]).scale(10.0, 1.0);
        assert_eq!(v, Value::Vector(vec![21.0]));
        assert!(v.is_vector());
    }

    #[test]
    fn test_try_map_stops_on_error() {
        let v = Value::from([1.0, 0.0, 2.0]);
        let res: Result<Value, &str> = v.try_map(|x| if x == 0.0 { Err("zero") } else { Ok(1.0 / x) });
        assert_eq!(res, Err("zero"));
    }

    #[test]
    fn test_len_and_iter() {
        assert_eq!(Value::from(4.0).len(), 1);
        assert_eq!(Value::from([1.0, 2.0, 3.0]).iter().sum::<f64>(), 6.0);
        assert!(Value::Vector(vec![]).is_empty());
        assert!(!Value::Scalar(0.0).is_empty());
    }

    #[test]
    fn test_approx_eq() {
        assert!(Value::from(273.15).approx_eq(&Value::from(273.150000000001), 1e-12));
        assert!(!Value::from(1.0).approx_eq(&Value::from(vec![1.0]), 1e-9));
        assert!(!Value::from([1.0, 2.0]).approx_eq(&Value::from([1.0]), 1e-9));
    }

    #[test]
    fn test_serde_untagged_shape() {
        assert_eq!(serde_json::to_string(&Value::from(1.5)).unwrap(), "1.5");
        assert_eq!(serde_json::to_string(&Value::from([1.0, 2.5])).unwrap(), "[1.0,2.5]");

        let back: Value = serde_json::from_str("[3.0]").unwrap();
        assert_eq!(back, Value::Vector(vec![3.0]));
        let back: Value = serde_json::from_str("3.0").unwrap();
        assert_eq!(back, Value::Scalar(3.0));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from(2.5).to_string(), "2.5");
        assert_eq!(Value::from([1.0, 2.5]).to_string(), "[1, 2.5]");
    }
}
