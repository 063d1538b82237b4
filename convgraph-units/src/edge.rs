//! Conversion edges
//!
//! [`EdgeSpec`] is what a table author writes: every field optional, the way
//! a conversion row reads. [`Edge`] is the validated form the engine
//! evaluates, with the transform as a tagged variant.

use std::fmt;
use std::sync::Arc;
use serde::{Serialize, Deserialize};
use convgraph_core::{ConversionError, ConversionResult, Unit, Value};

/// A conversion that cannot be written as `value * factor + add`
///
/// Implementations document how many `extra` values they read and report
/// [`ConversionError::ShapeMismatch`] when the caller supplies fewer.
pub trait CustomTransform: Send + Sync {
    fn name(&self) -> &str;
    fn apply(&self, value: &Value, extra: &[f64]) -> ConversionResult<Value>;
}

/// Closure-backed [`CustomTransform`], built by [`transform_fn`]
pub struct FnTransform<F> {
    name: String,
    f: F,
}

impl<F> CustomTransform for FnTransform<F>
where
    F: Fn(&Value, &[f64]) -> ConversionResult<Value> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, value: &Value, extra: &[f64]) -> ConversionResult<Value> {
        (self.f)(value, extra)
    }
}

/// Wrap a closure as a shareable custom transform
pub fn transform_fn<F>(name: &str, f: F) -> Arc<dyn CustomTransform>
where
    F: Fn(&Value, &[f64]) -> ConversionResult<Value> + Send + Sync + 'static,
{
    Arc::new(FnTransform { name: name.to_string(), f })
}

/// Authored description of a direct conversion
#[derive(Clone, Default)]
pub struct EdgeSpec {
    pub ignore: bool,
    pub factor: Option<f64>,
    pub add: Option<f64>,
    pub func: Option<Arc<dyn CustomTransform>>,
    pub func_inv: Option<Arc<dyn CustomTransform>>,
}

impl EdgeSpec {
    /// `output = input * factor`
    pub fn factor(factor: f64) -> Self {
        EdgeSpec { factor: Some(factor), ..Default::default() }
    }

    /// `output = input * factor + add`
    pub fn offset(factor: f64, add: f64) -> Self {
        EdgeSpec { factor: Some(factor), add: Some(add), ..Default::default() }
    }

    /// Identity in both directions
    pub fn ignore() -> Self {
        EdgeSpec { ignore: true, ..Default::default() }
    }

    pub fn custom(func: Arc<dyn CustomTransform>, func_inv: Arc<dyn CustomTransform>) -> Self {
        EdgeSpec { func: Some(func), func_inv: Some(func_inv), ..Default::default() }
    }

    pub fn with_ignore(mut self, ignore: bool) -> Self {
        self.ignore = ignore;
        self
    }

    /// Validate into an evaluable edge
    pub fn validate(&self, from: &Unit, to: &Unit) -> ConversionResult<Edge> {
        let transform = match (&self.func, &self.func_inv) {
            (Some(forward), Some(inverse)) => Transform::Custom {
                forward: Arc::clone(forward),
                inverse: Arc::clone(inverse),
            },
            (Some(_), None) => {
                return Err(ConversionError::malformed(from, to, "func given without func_inv"));
            }
            (None, Some(_)) => {
                return Err(ConversionError::malformed(from, to, "func_inv given without func"));
            }
            // identity whatever the factor says
            (None, None) if self.ignore => Transform::Linear { factor: 1.0, add: 0.0 },
            (None, None) => {
                let add = self.add.unwrap_or(0.0);
                if !add.is_finite() {
                    return Err(ConversionError::malformed(from, to, "offset is not finite"));
                }
                match self.factor {
                    Some(factor) if !factor.is_finite() => {
                        return Err(ConversionError::malformed(from, to, "factor is not finite"));
                    }
                    Some(factor) => Transform::Linear { factor, add },
                    None => {
                        return Err(ConversionError::malformed(
                            from, to, "needs a factor, a func/func_inv pair, or ignore",
                        ));
                    }
                }
            }
        };

        Ok(Edge { ignore: self.ignore, transform })
    }
}

impl fmt::Debug for EdgeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EdgeSpec")
            .field("ignore", &self.ignore)
            .field("factor", &self.factor)
            .field("add", &self.add)
            .field("func", &self.func.as_ref().map(|t| t.name().to_string()))
            .field("func_inv", &self.func_inv.as_ref().map(|t| t.name().to_string()))
            .finish()
    }
}

/// How an edge maps its input
#[derive(Clone)]
pub enum Transform {
    Linear { factor: f64, add: f64 },
    Custom {
        forward: Arc<dyn CustomTransform>,
        inverse: Arc<dyn CustomTransform>,
    },
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transform::Linear { factor, add } => f.debug_struct("Linear")
                .field("factor", factor)
                .field("add", add)
                .finish(),
            Transform::Custom { forward, inverse } => f.debug_struct("Custom")
                .field("forward", &forward.name())
                .field("inverse", &inverse.name())
                .finish(),
        }
    }
}

/// Validated conversion edge
#[derive(Debug, Clone)]
pub struct Edge {
    /// Identity regardless of the transform
    pub ignore: bool,
    pub transform: Transform,
}

impl Edge {
    pub fn identity() -> Self {
        Edge { ignore: true, transform: Transform::Linear { factor: 1.0, add: 0.0 } }
    }

    pub fn linear(factor: f64, add: f64) -> Self {
        Edge { ignore: false, transform: Transform::Linear { factor, add } }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self.transform, Transform::Custom { .. })
    }

    /// Short label used in traces
    pub fn kind(&self) -> EdgeKind {
        if self.ignore {
            EdgeKind::Ignore
        } else if self.is_custom() {
            EdgeKind::Custom
        } else {
            EdgeKind::Linear
        }
    }

    /// Derive the reverse edge (expander rules 2-4)
    ///
    /// The caller is responsible for rule 1: an explicit reverse wins and this
    /// is never consulted for it.
    pub fn reverse(&self, from: &Unit, to: &Unit) -> ConversionResult<Edge> {
        match &self.transform {
            Transform::Custom { forward, inverse } => Ok(Edge {
                ignore: self.ignore,
                transform: Transform::Custom {
                    forward: Arc::clone(inverse),
                    inverse: Arc::clone(forward),
                },
            }),
            Transform::Linear { .. } if self.ignore => Ok(Edge::identity()),
            Transform::Linear { factor, add } => {
                if *factor == 0.0 {
                    return Err(ConversionError::div_zero(from, to));
                }
                Ok(Edge::linear(1.0 / factor, -add / factor))
            }
        }
    }
}

/// Category of an edge, for traces and diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Ignore,
    Linear,
    Custom,
}

/// Whether a table entry was authored or produced by the expander
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeOrigin {
    Explicit,
    Derived,
}
