//! Evaluate a single edge

use convgraph_core::{ConversionError, ConversionResult, Value};
use crate::edge::{CustomTransform, Edge, Transform};

/// Apply one edge to a scalar or vector value
///
/// `ignore` short-circuits everything else. Custom transforms receive `extra`
/// as-is and their errors propagate unchanged.
pub fn apply(edge: &Edge, value: &Value, extra: &[f64]) -> ConversionResult<Value> {
    if edge.ignore {
        return Ok(value.clone());
    }

    match &edge.transform {
        Transform::Custom { forward, .. } => apply_custom(&**forward, value, extra),
        Transform::Linear { factor, add } => Ok(value.scale(*factor, *add)),
    }
}

/// Run a custom transform; its output must keep the input's shape
fn apply_custom(transform: &dyn CustomTransform, value: &Value, extra: &[f64]) -> ConversionResult<Value> {
    let result = transform.apply(value, extra)?;
    let same_shape = match (value, &result) {
        (Value::Scalar(_), Value::Scalar(_)) => true,
        (Value::Vector(a), Value::Vector(b)) => a.len() == b.len(),
        _ => false,
    };
    if !same_shape {
        return Err(ConversionError::ShapeMismatch {
            transform: transform.name().to_string(),
            details: format!(
                "returned {} of length {} for {} of length {}",
                result.type_name(), result.len(), value.type_name(), value.len(),
            ),
        });
    }
    Ok(result)
}

/// Apply an edge's inverse transform
///
/// For linear edges this solves `value * factor + add` for the input.
pub fn apply_inverse(edge: &Edge, value: &Value, extra: &[f64]) -> ConversionResult<Value> {
    if edge.ignore {
        return Ok(value.clone());
    }

    match &edge.transform {
        Transform::Custom { inverse, .. } => apply_custom(&**inverse, value, extra),
        Transform::Linear { factor, add } => {
            if *factor == 0.0 {
                return Err(ConversionError::domain("linear edge with factor 0 has no inverse"));
            }
            Ok(value.map(|x| (x - add) / factor))
        }
    }
}
