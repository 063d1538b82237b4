//! convgraph Units - Conversion-graph engine
//!
//! Converts numeric values between units using a table of known direct
//! conversions. Missing reverses are derived when the table is built, and
//! pairs with no direct entry are chained through the fewest intermediate
//! units.
//!
//! ```
//! use convgraph_units::Converter;
//! use convgraph_core::Value;
//!
//! let conv = Converter::new();
//! assert_eq!(conv.convert(1.0, "kPa", "Pa", ()).unwrap(), Some(Value::Scalar(1000.0)));
//! assert_eq!(conv.convert(1.0, "kPa", "furlong", ()).unwrap(), None);
//! ```

mod edge;
mod table;
mod path;
mod eval;
mod custom;
mod defaults;
mod context;
mod converter;

pub use edge::{CustomTransform, Edge, EdgeKind, EdgeOrigin, EdgeSpec, FnTransform, Transform, transform_fn};
pub use table::{expand, EdgeKey, EdgeTable, RawTable, TableEntry};
pub use path::{hops, shortest_path, Adjacency};
pub use eval::{apply, apply_inverse};
pub use custom::{AreaToVolume, VolumeToArea};
pub use defaults::{default_table, K2C};
pub use context::{ConvertContext, TraceStep};
pub use converter::{ConvertRequest, Converter, ConverterBuilder, Extra};

use std::sync::LazyLock;
use convgraph_core::{ConversionResult, Unit, Value};

/// Shared engine over the default table
pub static CONVERTER: LazyLock<Converter> = LazyLock::new(Converter::new);

/// Convert with the shared default engine
pub fn convert(
    value: impl Into<Value>,
    from: impl Into<Unit>,
    to: impl Into<Unit>,
    extra: impl Into<Extra>,
) -> ConversionResult<Option<Value>> {
    CONVERTER.convert(value, from, to, extra)
}
